//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the working directory if it exists.
    ///
    /// Variables already present in the process environment win over the file.
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Example `.env` file content
    pub fn create_example_env_content() -> String {
        r#"# Host Network Diagnostics Configuration
#
# Values here are used as defaults and can be overridden by
# command-line arguments.

# Probe targets, processed and reported in this order (comma-separated)
# HOSTDIAG_TARGETS=8.8.8.8,1.1.1.1,github.com

# Echo requests per ping probe
# HOSTDIAG_PING_COUNT=15

# Timeout for each probe invocation, and for the speed test, in seconds
# HOSTDIAG_PROBE_TIMEOUT=120
# HOSTDIAG_SPEEDTEST_TIMEOUT=180

# Targets probed at the same time
# HOSTDIAG_CONCURRENCY=4

# Overall deadline for the per-target probes, in seconds
# HOSTDIAG_RUN_DEADLINE=300

# Report locations
# HOSTDIAG_REPORT_PATH=NetworkDiagnosticReport.txt
# HOSTDIAG_JSON_PATH=NetworkDiagnosticReport.json

# Speed test
# HOSTDIAG_SPEEDTEST_PATH=/usr/local/bin/speedtest
# HOSTDIAG_SPEEDTEST_SERVER=18335
# HOSTDIAG_SKIP_SPEEDTEST=false

# HOSTDIAG_SKIP_TRACEROUTE=false
# HOSTDIAG_ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Validate one variable's value before it is merged
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "HOSTDIAG_TARGETS" => {
                let targets = crate::models::config::split_list(value);
                if targets.is_empty() {
                    return Err(AppError::config("HOSTDIAG_TARGETS must name at least one target"));
                }
                if let Some(bad) = targets.iter().find(|t| t.chars().any(char::is_whitespace) || t.starts_with('-')) {
                    return Err(AppError::config(format!("Invalid HOSTDIAG_TARGETS entry '{}'", bad)));
                }
            }
            "HOSTDIAG_PING_COUNT" => {
                let count: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_PING_COUNT value '{}': {}", value, e)))?;
                if count == 0 || count > 100 {
                    return Err(AppError::config(format!(
                        "HOSTDIAG_PING_COUNT must be between 1 and 100, got: {}",
                        count
                    )));
                }
            }
            "HOSTDIAG_PROBE_TIMEOUT" | "HOSTDIAG_SPEEDTEST_TIMEOUT" | "HOSTDIAG_RUN_DEADLINE" => {
                let seconds: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if seconds == 0 {
                    return Err(AppError::config(format!("{} must be greater than 0", key)));
                }
            }
            "HOSTDIAG_CONCURRENCY" => {
                let concurrency: usize = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid HOSTDIAG_CONCURRENCY value '{}': {}", value, e)))?;
                if concurrency == 0 || concurrency > crate::defaults::MAX_CONCURRENCY {
                    return Err(AppError::config(format!(
                        "HOSTDIAG_CONCURRENCY must be between 1 and {}, got: {}",
                        crate::defaults::MAX_CONCURRENCY,
                        concurrency
                    )));
                }
            }
            "HOSTDIAG_SPEEDTEST_SERVER" => {
                if value.is_empty() {
                    return Err(AppError::config("HOSTDIAG_SPEEDTEST_SERVER cannot be empty"));
                }
            }
            "HOSTDIAG_REPORT_PATH" | "HOSTDIAG_JSON_PATH" | "HOSTDIAG_SPEEDTEST_PATH" => {
                if value.is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", key)));
                }
            }
            "HOSTDIAG_SKIP_SPEEDTEST" | "HOSTDIAG_SKIP_TRACEROUTE" | "HOSTDIAG_ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Supported variables with descriptions and examples
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("HOSTDIAG_TARGETS", "Comma-separated probe targets", "8.8.8.8,1.1.1.1,github.com"),
            ("HOSTDIAG_PING_COUNT", "Echo requests per ping (1-100)", "15"),
            ("HOSTDIAG_PROBE_TIMEOUT", "Per-probe timeout in seconds (1-600)", "120"),
            ("HOSTDIAG_SPEEDTEST_TIMEOUT", "Speed-test timeout in seconds", "180"),
            ("HOSTDIAG_CONCURRENCY", "Targets probed at the same time (1-64)", "4"),
            ("HOSTDIAG_RUN_DEADLINE", "Deadline for all target probes in seconds", "300"),
            ("HOSTDIAG_REPORT_PATH", "Report file path", "NetworkDiagnosticReport.txt"),
            ("HOSTDIAG_JSON_PATH", "Optional JSON export path", "NetworkDiagnosticReport.json"),
            ("HOSTDIAG_SPEEDTEST_PATH", "Speed-test executable", "/usr/local/bin/speedtest"),
            ("HOSTDIAG_SPEEDTEST_SERVER", "Speed-test server id", "18335"),
            ("HOSTDIAG_SKIP_SPEEDTEST", "Skip the speed test", "false"),
            ("HOSTDIAG_SKIP_TRACEROUTE", "Skip traceroute", "false"),
            ("HOSTDIAG_ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Validate all currently set variables, stopping at the first bad value
    pub fn validate_current_env() -> Result<()> {
        for (name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(name) {
                Self::validate_env_var(name, &value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_example_content_lists_every_variable() {
        let content = EnvManager::create_example_env_content();
        for (name, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", name)), "{} missing", name);
        }
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("HOSTDIAG_TARGETS", "8.8.8.8, github.com").is_ok());
        assert!(EnvManager::validate_env_var("HOSTDIAG_PING_COUNT", "15").is_ok());
        assert!(EnvManager::validate_env_var("HOSTDIAG_PROBE_TIMEOUT", "30").is_ok());
        assert!(EnvManager::validate_env_var("HOSTDIAG_CONCURRENCY", "8").is_ok());
        assert!(EnvManager::validate_env_var("HOSTDIAG_SKIP_SPEEDTEST", "true").is_ok());
        assert!(EnvManager::validate_env_var("UNRELATED", "anything").is_ok());

        assert!(EnvManager::validate_env_var("HOSTDIAG_TARGETS", " , ").is_err());
        assert!(EnvManager::validate_env_var("HOSTDIAG_TARGETS", "-n").is_err());
        assert!(EnvManager::validate_env_var("HOSTDIAG_PING_COUNT", "0").is_err());
        assert!(EnvManager::validate_env_var("HOSTDIAG_PING_COUNT", "101").is_err());
        assert!(EnvManager::validate_env_var("HOSTDIAG_RUN_DEADLINE", "0").is_err());
        assert!(EnvManager::validate_env_var("HOSTDIAG_CONCURRENCY", "65").is_err());
        assert!(EnvManager::validate_env_var("HOSTDIAG_SPEEDTEST_SERVER", "").is_err());
        assert!(EnvManager::validate_env_var("HOSTDIAG_ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_load_env_file_from_path() {
        let _guard = crate::testing::global_state_lock();
        std::env::remove_var("HOSTDIAG_ENV_FILE_PROBE");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "HOSTDIAG_ENV_FILE_PROBE=loaded").unwrap();
        EnvManager::load_env_file_from(file.path(), false).unwrap();

        assert_eq!(std::env::var("HOSTDIAG_ENV_FILE_PROBE").unwrap(), "loaded");
        std::env::remove_var("HOSTDIAG_ENV_FILE_PROBE");
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let path = Path::new("definitely/not/here/.env");
        assert!(EnvManager::load_env_file_from(path, false).is_ok());
    }

    #[test]
    fn test_validate_current_env_reports_bad_values() {
        let _guard = crate::testing::global_state_lock();
        std::env::set_var("HOSTDIAG_PING_COUNT", "zero");
        let result = EnvManager::validate_current_env();
        std::env::remove_var("HOSTDIAG_PING_COUNT");

        let error = result.unwrap_err();
        assert_eq!(error.category(), "CONFIG");
        assert!(error.to_string().contains("HOSTDIAG_PING_COUNT"));
    }
}
