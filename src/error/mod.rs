//! Error handling for the diagnostics collector
//!
//! Probe and provider failures never surface as `AppError` during a run: the
//! aggregator turns them into "unavailable" markers inside the summary. The
//! variants below exist for the boundaries that can fail as a whole
//! (configuration, persistence) and for reporting.

use colored::{Color, Colorize};
use thiserror::Error;

/// Errors that can stop or degrade a diagnostic run
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid settings from flags, environment or `.env`
    #[error("Configuration error: {0}")]
    Config(String),

    /// A setting parsed but failed a range or consistency check
    #[error("Invalid setting: {0}")]
    Validation(String),

    /// A probe tool or binary is missing or could not be started
    #[error("Probe unavailable: {0}")]
    ProbeUnavailable(String),

    /// A probe exceeded its timeout
    #[error("Probe timed out: {0}")]
    ProbeTimeout(String),

    /// An OS metric query failed or was denied
    #[error("Metric unavailable: {0}")]
    ProviderUnavailable(String),

    /// The report or JSON export could not be written
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Console or prompt I/O
    #[error("I/O failure: {0}")]
    Io(String),

    /// A configuration value or document could not be decoded
    #[error("Cannot parse {0}")]
    Parse(String),

    /// Anything that indicates a bug in the collector itself
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn probe_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ProbeUnavailable(message.into())
    }

    pub fn probe_timeout<S: Into<String>>(message: S) -> Self {
        Self::ProbeTimeout(message.into())
    }

    pub fn provider_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ProviderUnavailable(message.into())
    }

    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence(message.into())
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Short tag printed in brackets and attached to log entries
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::ProbeUnavailable(_) => "PROBE",
            Self::ProbeTimeout(_) => "TIMEOUT",
            Self::ProviderUnavailable(_) => "PROVIDER",
            Self::Persistence(_) => "PERSIST",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether the run still produces its summary and report after this
    /// error. Console I/O counts: the report file does not depend on it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ProbeUnavailable(_)
                | Self::ProbeTimeout(_)
                | Self::ProviderUnavailable(_)
                | Self::Persistence(_)
                | Self::Io(_)
        )
    }

    /// Process exit code when this error stops the program.
    ///
    /// A completed run exits with 0 even when probes failed; these codes are
    /// only used when the process stops because of this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::ProbeUnavailable(_) | Self::ProbeTimeout(_) | Self::ProviderUnavailable(_) => 2,
            Self::Persistence(_) | Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// What the user can do about it, if anything
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                Some("Check your .env file, HOSTDIAG_* variables or command line arguments (see --help-topic env).")
            }
            Self::ProbeUnavailable(_) => Some("Install the tool or make sure it is on PATH."),
            Self::ProbeTimeout(_) => Some("Raise --probe-timeout or --run-deadline."),
            Self::ProviderUnavailable(_) => Some("Some metrics need elevated privileges on this platform."),
            Self::Persistence(_) => Some("Check permissions and free space, or pick another path with --report."),
            Self::Io(_) => None,
            Self::Internal(_) => Some("This is a bug; please report it with the output of --debug."),
        }
    }

    fn color(&self) -> Color {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => Color::Red,
            Self::ProbeUnavailable(_) | Self::ProviderUnavailable(_) => Color::Yellow,
            Self::ProbeTimeout(_) => Color::Blue,
            Self::Persistence(_) | Self::Io(_) => Color::Cyan,
            Self::Internal(_) => Color::BrightRed,
        }
    }

    /// `[CATEGORY] message`, colored by severity when requested
    pub fn format_for_console(&self, use_color: bool) -> String {
        let message = self.to_string();
        if !use_color {
            return format!("[{}] {}", self.category(), message);
        }
        let color = self.color();
        format!("[{}] {}", self.category().color(color).bold(), message.color(color))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!(".env file: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("integer: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("boolean: {}", error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(format!("{:#}", error))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Prints errors to stderr for the user
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// One tagged line, plus the suggestion in verbose mode
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            if let Some(hint) = error.suggestion() {
                eprintln!("  Suggestion: {}", hint);
            }
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_stop_with_code_one() {
        for error in [
            AppError::config("--color conflicts with --no-color"),
            AppError::validation("ping count must be between 1 and 100"),
            AppError::parse("integer: invalid digit found in string"),
        ] {
            assert!(!error.is_recoverable());
            assert_eq!(error.exit_code(), 1);
        }
    }

    #[test]
    fn test_probe_and_provider_errors_are_recoverable() {
        let missing = AppError::probe_unavailable("'tracert' is not available on this host");
        assert_eq!(missing.category(), "PROBE");
        assert!(missing.is_recoverable());

        let denied = AppError::provider_unavailable("disk enumeration denied");
        assert_eq!(denied.category(), "PROVIDER");
        assert_eq!(denied.to_string(), "Metric unavailable: disk enumeration denied");
    }

    #[test]
    fn test_persistence_failure_does_not_halt() {
        let error = AppError::persistence("Failed to write /ro/report.txt: read-only file system");
        assert!(error.is_recoverable());
        assert_eq!(error.category(), "PERSIST");
        assert!(error.suggestion().unwrap().contains("--report"));
    }

    #[test]
    fn test_closed_console_is_recoverable() {
        let error: AppError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed").into();
        assert_eq!(error.category(), "IO");
        assert!(error.is_recoverable());
        assert_eq!(error.suggestion(), None);
        assert_eq!(error.to_string(), "I/O failure: stdout closed");
    }

    #[test]
    fn test_value_conversions_name_the_kind() {
        let int_error: AppError = "fifteen".parse::<u32>().unwrap_err().into();
        assert!(int_error.to_string().starts_with("Cannot parse integer:"));

        let bool_error: AppError = "maybe".parse::<bool>().unwrap_err().into();
        assert!(bool_error.to_string().starts_with("Cannot parse boolean:"));

        let json_error: AppError = serde_json::from_str::<serde_json::Value>("{targets").unwrap_err().into();
        assert_eq!(json_error.category(), "PARSE");
    }

    #[test]
    fn test_env_file_error_is_configuration() {
        let error: AppError = dotenv::Error::LineParse("HOSTDIAG_PING_COUNT".to_string(), 3).into();
        assert_eq!(error.category(), "CONFIG");
        assert!(error.to_string().contains(".env file"));
    }

    #[test]
    fn test_console_formatting() {
        let _guard = crate::testing::global_state_lock();
        let error = AppError::probe_timeout("'ping' did not finish within 120s");
        assert_eq!(error.format_for_console(false), "[TIMEOUT] Probe timed out: 'ping' did not finish within 120s");

        colored::control::set_override(true);
        let colored_line = error.format_for_console(true);
        colored::control::unset_override();
        assert!(colored_line.contains("'ping' did not finish"));
        assert!(colored_line.contains("\u{1b}["));
    }
}
