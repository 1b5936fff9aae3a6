//! Command-line interface

pub mod help;

pub use help::HelpSystem;

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Host Network Diagnostics - collects system health and network reachability into one report
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "hostdiag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Probe target, IP literal or hostname (repeatable, comma-separated values allowed)
    #[arg(short = 't', long = "target", action = ArgAction::Append, value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Echo requests per ping probe
    #[arg(short = 'c', long)]
    pub ping_count: Option<u32>,

    /// Timeout for each probe invocation, in seconds
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub probe_timeout: Option<u64>,

    /// Timeout for the speed test, in seconds
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub speedtest_timeout: Option<u64>,

    /// Maximum number of targets probed at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Overall deadline for the per-target probes, in seconds
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub run_deadline: Option<u64>,

    /// Report file path (overwritten on every run)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Also write the summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Location of the speed-test executable
    #[arg(long, value_name = "PATH")]
    pub speedtest_path: Option<PathBuf>,

    /// Speed-test server identifier
    #[arg(long, value_name = "ID")]
    pub speedtest_server: Option<String>,

    /// Do not run the speed test
    #[arg(long)]
    pub skip_speedtest: bool,

    /// Do not run traceroute against the targets
    #[arg(long)]
    pub skip_traceroute: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause: bool,

    /// Show help for a specific topic (config, env, probes, output)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(target) = self.targets.iter().find(|t| t.trim().is_empty()) {
            return Err(format!("Empty --target value '{}'", target));
        }

        Ok(())
    }

    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Topic help, or the list of topics when the topic is unknown
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        match self.help_topic.as_deref() {
            Some(topic) => help_system
                .display_topic_help(topic, use_colors)
                .unwrap_or_else(|| {
                    format!(
                        "Unknown help topic: '{}'\n\nAvailable topics: {}\n",
                        topic,
                        HelpSystem::TOPICS.join(", ")
                    )
                }),
            None => help_system.display_topic_help("config", use_colors).unwrap_or_default(),
        }
    }
}

/// Parse a positive number of seconds
fn parse_seconds(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    match s.parse::<u64>() {
        Ok(0) => Err("Duration must be greater than 0".to_string()),
        Ok(secs) => Ok(secs),
        Err(_) => Err(format!("Invalid duration: {}", s)),
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    cfg!(unix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = Cli::parse_from(["hostdiag"]);
        assert!(cli.targets.is_empty());
        assert_eq!(cli.ping_count, None);
        assert_eq!(cli.probe_timeout, None);
        assert!(!cli.skip_speedtest);
        assert!(!cli.pause);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::parse_from([
            "hostdiag",
            "--target", "8.8.8.8",
            "-t", "example.com,1.1.1.1",
            "--ping-count", "4",
            "--probe-timeout", "30",
            "--speedtest-timeout", "60",
            "--concurrency", "3",
            "--run-deadline", "90",
            "--report", "out/report.txt",
            "--json", "out/summary.json",
            "--speedtest-path", "/opt/speedtest",
            "--speedtest-server", "1234",
            "--skip-speedtest",
            "--skip-traceroute",
            "--no-color",
            "--verbose",
            "--debug",
            "--pause",
        ]);

        assert_eq!(cli.targets, vec!["8.8.8.8", "example.com", "1.1.1.1"]);
        assert_eq!(cli.ping_count, Some(4));
        assert_eq!(cli.probe_timeout, Some(30));
        assert_eq!(cli.speedtest_timeout, Some(60));
        assert_eq!(cli.concurrency, Some(3));
        assert_eq!(cli.run_deadline, Some(90));
        assert_eq!(cli.report, Some(PathBuf::from("out/report.txt")));
        assert_eq!(cli.json, Some(PathBuf::from("out/summary.json")));
        assert_eq!(cli.speedtest_path, Some(PathBuf::from("/opt/speedtest")));
        assert_eq!(cli.speedtest_server.as_deref(), Some("1234"));
        assert!(cli.skip_speedtest && cli.skip_traceroute);
        assert!(cli.no_color && cli.verbose && cli.debug && cli.pause);
        assert!(!cli.use_colors());
    }

    #[test]
    fn test_color_flag_conflict() {
        let cli = Cli::parse_from(["hostdiag", "--color", "--no-color"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["hostdiag", "--color"]);
        assert!(cli.use_colors());
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("15"), Ok(15));
        assert!(parse_seconds("0").is_err());
        assert!(parse_seconds("+5").is_err());
        assert!(parse_seconds("0x10").is_err());
        assert!(parse_seconds("ten").is_err());
    }

    #[test]
    fn test_invalid_duration_rejected_by_clap() {
        assert!(Cli::try_parse_from(["hostdiag", "--probe-timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["hostdiag", "--ping-count", "many"]).is_err());
    }

    #[test]
    fn test_help_topics() {
        let cli = Cli::parse_from(["hostdiag", "--no-color", "--help-topic", "env"]);
        assert!(cli.should_show_topic_help());
        assert!(cli.display_help().contains("HOSTDIAG_TARGETS"));

        let cli = Cli::parse_from(["hostdiag", "--no-color", "--help-topic", "bogus"]);
        let help = cli.display_help();
        assert!(help.contains("Unknown help topic: 'bogus'"));
        assert!(help.contains("probes"));
    }
}
