//! Advisory configuration checks on top of `Config::validate`

use crate::{error::Result, models::Config};
use colored::*;
use std::collections::HashSet;
use std::net::IpAddr;

/// Configuration validator producing non-fatal warnings
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run the hard checks, then collect warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_targets(&config.targets));
        warnings.extend(Self::validate_performance_settings(config, num_cpus::get()));
        warnings.extend(Self::validate_speedtest(config));
        Ok(warnings)
    }

    fn validate_targets(targets: &[String]) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for target in targets {
            if !seen.insert(target.trim()) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Target '{}' is listed more than once and will be probed once", target),
                ));
                continue;
            }

            if let Ok(ip) = target.parse::<IpAddr>() {
                if ip.is_loopback() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Target {} is a loopback address", ip),
                    ));
                } else if is_private(&ip) {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Target {} is in a private range, results only describe the local network", ip),
                    ));
                }
            }
        }

        warnings
    }

    fn validate_performance_settings(config: &Config, cpus: usize) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.concurrency > cpus * 4 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Concurrency {} is high for {} CPUs; parallel probes may distort each other's latency",
                    config.concurrency, cpus
                ),
            ));
        }

        if let Some(deadline) = config.run_deadline_seconds {
            if deadline < config.probe_timeout_seconds {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Run deadline {}s is shorter than the probe timeout {}s; slow probes will be cut off",
                        deadline, config.probe_timeout_seconds
                    ),
                ));
            }
        }

        if config.ping_count > 50 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Ping count {} makes every target take at least {} seconds", config.ping_count, config.ping_count),
            ));
        }

        warnings
    }

    fn validate_speedtest(config: &Config) -> Vec<ValidationWarning> {
        if config.skip_speedtest || config.speedtest_path.exists() {
            return Vec::new();
        }
        vec![ValidationWarning::new(
            ValidationLevel::Info,
            format!(
                "Speed-test executable not found at {}; the speed test will be reported as unavailable",
                config.speedtest_path.display()
            ),
        )]
    }
}

fn is_private(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local(),
        // fc00::/7 unique local
        IpAddr::V6(v6) => (v6.segments()[0] & 0xfe00) == 0xfc00,
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if !use_color {
            return format!("[{}] {}", self.level.as_str(), self.message);
        }
        let tag = match self.level {
            ValidationLevel::Info => self.level.as_str().blue().bold(),
            ValidationLevel::Warning => self.level.as_str().yellow().bold(),
        };
        format!("[{}] {}", tag, self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(warnings: &[ValidationWarning]) -> Vec<&str> {
        warnings.iter().map(|w| w.message.as_str()).collect()
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut config = Config::default();
        config.ping_count = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_targets_warn_once() {
        let targets = vec!["github.com".to_string(), "8.8.8.8".to_string(), "github.com".to_string()];
        let warnings = ConfigValidator::validate_targets(&targets);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, ValidationLevel::Warning);
        assert!(warnings[0].message.contains("'github.com'"));
    }

    #[test]
    fn test_private_and_loopback_targets() {
        let targets = vec![
            "127.0.0.1".to_string(),
            "192.168.1.1".to_string(),
            "fd00::1".to_string(),
            "1.1.1.1".to_string(),
        ];
        let warnings = ConfigValidator::validate_targets(&targets);
        let texts = messages(&warnings);
        assert_eq!(texts.len(), 3);
        assert!(texts[0].contains("loopback"));
        assert!(texts[1].contains("private"));
        assert!(texts[2].contains("fd00::1"));
    }

    #[test]
    fn test_performance_warnings() {
        let mut config = Config::default();
        config.concurrency = 9;
        config.run_deadline_seconds = Some(30);
        config.probe_timeout_seconds = 120;

        let warnings = ConfigValidator::validate_performance_settings(&config, 2);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].message.contains("Concurrency 9"));
        assert!(warnings[1].message.contains("Run deadline 30s"));

        config.concurrency = 8;
        config.run_deadline_seconds = Some(600);
        assert!(ConfigValidator::validate_performance_settings(&config, 2).is_empty());
    }

    #[test]
    fn test_missing_speedtest_binary_is_info() {
        let mut config = Config::default();
        config.speedtest_path = "/nonexistent/speedtest".into();
        let warnings = ConfigValidator::validate_speedtest(&config);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, ValidationLevel::Info);

        config.skip_speedtest = true;
        assert!(ConfigValidator::validate_speedtest(&config).is_empty());
    }

    #[test]
    fn test_warning_format_plain() {
        let warning = ValidationWarning::new(ValidationLevel::Warning, "careful".to_string());
        assert_eq!(warning.format(false), "[WARNING] careful");
    }
}
