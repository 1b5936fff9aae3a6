//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    diagnostics::DiagnosticAggregator,
    error::{AppError, ErrorReporter, Result},
    logging::LoggerFactory,
    models::{Config, Summary},
    output::{Delivery, OutputCoordinator},
    probe::{ProbeCatalog, SystemProbeInvoker},
    providers::SystemMetricProvider,
};
use std::sync::Arc;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::config)?;
        Ok(Self { cli })
    }

    /// Load configuration, collect, deliver, optionally wait for Enter.
    ///
    /// Probe and metric failures end up in the report; only configuration and
    /// internal failures make this return an error.
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli.clone())?;
        let warnings = validate_config(&config)?;

        if config.debug {
            eprintln!(
                "{} v{} ({}, {}, built {})",
                crate::PKG_NAME,
                crate::VERSION,
                crate::GIT_COMMIT,
                crate::TARGET_TRIPLE,
                crate::BUILD_TIME
            );
            eprintln!("\nConfiguration Summary:");
            eprintln!("{}\n", display_config_summary(&config));
        }

        for warning in &warnings {
            eprintln!("{}", warning.format(config.enable_color));
        }

        let summary = collect(&config).await;
        deliver(&config, &summary)?;

        if config.pause {
            wait_for_enter().await?;
        }

        Ok(())
    }
}

/// One full collection pass against the real host
async fn collect(config: &Config) -> Summary {
    let factory = LoggerFactory::new(config.clone());
    let logger = factory.create_logger("APP");

    logger
        .info("Starting diagnostics")
        .field("targets", config.targets.len())
        .log()
        .await;

    let aggregator = DiagnosticAggregator::new(
        Arc::new(SystemProbeInvoker::new()),
        Arc::new(SystemMetricProvider::new()),
        ProbeCatalog::default(),
        config.clone(),
    )
    .with_loggers(
        factory.create_logger("DIAG"),
        factory.create_probe_logger(),
    );

    let mut steps = factory.create_step_logger();
    aggregator.run_with_steps(&mut steps).await
}

/// Console first, then the files. Output that cannot be written is
/// reported but does not fail the run.
fn deliver(config: &Config, summary: &Summary) -> Result<()> {
    let delivery = OutputCoordinator::from_config(config).deliver(summary);
    settle(delivery, &ErrorReporter::new(config.enable_color, config.verbose))
}

/// Report recoverable delivery failures; the first other one is returned
fn settle(delivery: Delivery, reporter: &ErrorReporter) -> Result<()> {
    let mut fatal = None;
    for error in delivery.failures {
        if error.is_recoverable() {
            reporter.report_error(&error);
        } else if fatal.is_none() {
            fatal = Some(error);
        }
    }
    fatal.map_or(Ok(()), Err)
}

async fn wait_for_enter() -> Result<()> {
    println!("Press Enter to exit...");
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| ())
    })
    .await
    .map_err(|e| AppError::internal(format!("Input task failed: {}", e)))??;
    Ok(())
}
