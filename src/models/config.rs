//! Configuration data model and validation

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Probe targets (IP literals or hostnames), processed in this order
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,

    /// Echo requests per ping probe
    #[serde(default = "default_ping_count")]
    pub ping_count: u32,

    /// Timeout for every single probe invocation
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_seconds: u64,

    /// Timeout for the speed-test binary
    #[serde(default = "default_speedtest_timeout_secs")]
    pub speedtest_timeout_seconds: u64,

    /// Maximum number of targets probed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Overall deadline for the per-target probes; unbounded when absent
    #[serde(default)]
    pub run_deadline_seconds: Option<u64>,

    /// Where the text report is written (overwritten on every run)
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Optional JSON export of the summary
    #[serde(default)]
    pub json_path: Option<PathBuf>,

    /// Expected location of the third-party speed-test executable
    #[serde(default = "default_speedtest_path")]
    pub speedtest_path: PathBuf,

    /// Speed-test server identifier
    #[serde(default = "default_speedtest_server_id")]
    pub speedtest_server_id: String,

    /// Skip the speed test entirely
    #[serde(default)]
    pub skip_speedtest: bool,

    /// Skip the per-target traceroute
    #[serde(default)]
    pub skip_traceroute: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Wait for Enter before exiting
    #[serde(default)]
    pub pause: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            ping_count: default_ping_count(),
            probe_timeout_seconds: default_probe_timeout_secs(),
            speedtest_timeout_seconds: default_speedtest_timeout_secs(),
            concurrency: default_concurrency(),
            run_deadline_seconds: None,
            report_path: default_report_path(),
            json_path: None,
            speedtest_path: default_speedtest_path(),
            speedtest_server_id: default_speedtest_server_id(),
            skip_speedtest: false,
            skip_traceroute: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            pause: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get probe timeout as Duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }

    /// Get speed-test timeout as Duration
    pub fn speedtest_timeout(&self) -> Duration {
        Duration::from_secs(self.speedtest_timeout_seconds)
    }

    /// Get the run deadline as Duration, if any
    pub fn run_deadline(&self) -> Option<Duration> {
        self.run_deadline_seconds.map(Duration::from_secs)
    }

    /// Validate the configuration and return the first error
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(AppError::config("At least one target is required"));
        }

        for target in &self.targets {
            if target.trim().is_empty() {
                return Err(AppError::config("Target cannot be empty"));
            }
            if target.chars().any(char::is_whitespace) {
                return Err(AppError::config(format!("Target '{}' must not contain whitespace", target)));
            }
            if target.starts_with('-') {
                return Err(AppError::config(format!("Target '{}' must not start with '-'", target)));
            }
        }

        if self.ping_count == 0 {
            return Err(AppError::config("Ping count must be greater than 0"));
        }

        if self.ping_count > 100 {
            return Err(AppError::config("Ping count cannot exceed 100"));
        }

        if self.probe_timeout_seconds == 0 {
            return Err(AppError::config("Probe timeout must be greater than 0"));
        }

        if self.probe_timeout_seconds > 600 {
            return Err(AppError::config("Probe timeout cannot exceed 600 seconds"));
        }

        if self.speedtest_timeout_seconds == 0 {
            return Err(AppError::config("Speed-test timeout must be greater than 0"));
        }

        if self.concurrency == 0 {
            return Err(AppError::config("Concurrency must be greater than 0"));
        }

        if self.concurrency > crate::defaults::MAX_CONCURRENCY {
            return Err(AppError::config(format!(
                "Concurrency cannot exceed {}",
                crate::defaults::MAX_CONCURRENCY
            )));
        }

        if self.run_deadline_seconds == Some(0) {
            return Err(AppError::config("Run deadline must be greater than 0"));
        }

        if self.speedtest_server_id.trim().is_empty() {
            return Err(AppError::config("Speed-test server id cannot be empty"));
        }

        if self.report_path.as_os_str().is_empty() {
            return Err(AppError::config("Report path cannot be empty"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(targets) = std::env::var("HOSTDIAG_TARGETS") {
            self.targets = split_list(&targets);
        }

        if let Ok(count) = std::env::var("HOSTDIAG_PING_COUNT") {
            self.ping_count = count.parse()
                .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_PING_COUNT value '{}': {}", count, e)))?;
        }

        if let Ok(timeout) = std::env::var("HOSTDIAG_PROBE_TIMEOUT") {
            self.probe_timeout_seconds = timeout.parse()
                .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_PROBE_TIMEOUT value '{}': {}", timeout, e)))?;
        }

        if let Ok(timeout) = std::env::var("HOSTDIAG_SPEEDTEST_TIMEOUT") {
            self.speedtest_timeout_seconds = timeout.parse()
                .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_SPEEDTEST_TIMEOUT value '{}': {}", timeout, e)))?;
        }

        if let Ok(concurrency) = std::env::var("HOSTDIAG_CONCURRENCY") {
            self.concurrency = concurrency.parse()
                .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_CONCURRENCY value '{}': {}", concurrency, e)))?;
        }

        if let Ok(deadline) = std::env::var("HOSTDIAG_RUN_DEADLINE") {
            self.run_deadline_seconds = Some(deadline.parse()
                .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_RUN_DEADLINE value '{}': {}", deadline, e)))?);
        }

        if let Ok(path) = std::env::var("HOSTDIAG_REPORT_PATH") {
            self.report_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("HOSTDIAG_JSON_PATH") {
            self.json_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("HOSTDIAG_SPEEDTEST_PATH") {
            self.speedtest_path = PathBuf::from(path);
        }

        if let Ok(server) = std::env::var("HOSTDIAG_SPEEDTEST_SERVER") {
            self.speedtest_server_id = server.trim().to_string();
        }

        if let Ok(skip) = std::env::var("HOSTDIAG_SKIP_SPEEDTEST") {
            self.skip_speedtest = skip.parse()
                .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_SKIP_SPEEDTEST value '{}': {}", skip, e)))?;
        }

        if let Ok(skip) = std::env::var("HOSTDIAG_SKIP_TRACEROUTE") {
            self.skip_traceroute = skip.parse()
                .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_SKIP_TRACEROUTE value '{}': {}", skip, e)))?;
        }

        if let Ok(enable_color) = std::env::var("HOSTDIAG_ENABLE_COLOR") {
            self.enable_color = enable_color.parse()
                .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Split a comma-separated list, dropping blank entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Directory holding the running executable, falling back to the working directory
fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

// Default value functions for serde
fn default_targets() -> Vec<String> {
    crate::defaults::DEFAULT_TARGETS
        .iter()
        .map(|&s| s.to_string())
        .collect()
}

fn default_ping_count() -> u32 {
    crate::defaults::DEFAULT_PING_COUNT
}

fn default_probe_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_PROBE_TIMEOUT.as_secs()
}

fn default_speedtest_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_SPEEDTEST_TIMEOUT.as_secs()
}

/// Probes are I/O bound: two per core, capped at the default target count
pub fn default_concurrency() -> usize {
    (num_cpus::get() * 2).clamp(2, crate::defaults::DEFAULT_TARGETS.len())
}

fn default_report_path() -> PathBuf {
    program_dir().join(crate::defaults::DEFAULT_REPORT_FILE_NAME)
}

fn default_speedtest_path() -> PathBuf {
    program_dir().join(crate::defaults::SPEEDTEST_BINARY_NAME)
}

fn default_speedtest_server_id() -> String {
    crate::defaults::DEFAULT_SPEEDTEST_SERVER_ID.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
