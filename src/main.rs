//! Host Network Diagnostics - command-line entry point
//!
//! Collects system health and network reachability once, prints the live
//! view and writes the report file.

use clap::Parser;
use host_net_diag::{app::App, cli::Cli, error::ErrorReporter};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();

    if cli.should_show_topic_help() {
        println!("{}", cli.display_help());
        return;
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    let result = match App::new(cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
