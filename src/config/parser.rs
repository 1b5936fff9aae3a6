//! Configuration assembly from defaults, .env, environment and CLI arguments

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that layers the CLI over environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Defaults, then `.env`, then process environment, then CLI flags
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        self.parse_without_env_file(&mut config)?;

        Ok(config)
    }

    fn parse_without_env_file(&self, config: &mut Config) -> Result<()> {
        EnvManager::validate_current_env()?;
        config.merge_from_env()?;
        self.apply_cli_overrides(config);
        config.validate()
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if !cli.targets.is_empty() {
            config.targets = cli.targets.iter().map(|t| t.trim().to_string()).collect();
        }
        if let Some(count) = cli.ping_count {
            config.ping_count = count;
        }
        if let Some(timeout) = cli.probe_timeout {
            config.probe_timeout_seconds = timeout;
        }
        if let Some(timeout) = cli.speedtest_timeout {
            config.speedtest_timeout_seconds = timeout;
        }
        if let Some(concurrency) = cli.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(deadline) = cli.run_deadline {
            config.run_deadline_seconds = Some(deadline);
        }
        if let Some(ref path) = cli.report {
            config.report_path = path.clone();
        }
        if let Some(ref path) = cli.json {
            config.json_path = Some(path.clone());
        }
        if let Some(ref path) = cli.speedtest_path {
            config.speedtest_path = path.clone();
        }
        if let Some(ref server) = cli.speedtest_server {
            config.speedtest_server_id = server.trim().to_string();
        }

        config.skip_speedtest |= cli.skip_speedtest;
        config.skip_traceroute |= cli.skip_traceroute;

        // --color forces; otherwise the terminal and --no-color can only turn it off
        config.enable_color = cli.color || (config.enable_color && cli.use_colors());

        // CLI-only
        config.verbose = cli.verbose;
        config.debug = cli.debug;
        config.pause = cli.pause;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!("{}", display_config_summary(config));
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Configuration summary for verbose and debug output
pub fn display_config_summary(config: &Config) -> String {
    let deadline = config
        .run_deadline_seconds
        .map(|s| format!("{}s", s))
        .unwrap_or_else(|| "none".to_string());
    let speedtest = if config.skip_speedtest {
        "skipped".to_string()
    } else {
        format!(
            "{} (server {}, timeout {}s)",
            config.speedtest_path.display(),
            config.speedtest_server_id,
            config.speedtest_timeout_seconds
        )
    };

    let mut summary = vec![
        format!("Targets: {}", config.targets.join(", ")),
        format!("Ping Count: {}", config.ping_count),
        format!("Probe Timeout: {}s", config.probe_timeout_seconds),
        format!("Concurrency: {}", config.concurrency),
        format!("Run Deadline: {}", deadline),
        format!("Traceroute: {}", if config.skip_traceroute { "skipped" } else { "enabled" }),
        format!("Speed Test: {}", speedtest),
        format!("Report: {}", config.report_path.display()),
    ];
    if let Some(ref json) = config.json_path {
        summary.push(format!("JSON Export: {}", json.display()));
    }
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
