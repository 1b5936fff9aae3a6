//! External diagnostic command invocation
//!
//! Every probe runs through a [`ProbeInvoker`] with a mandatory timeout. The
//! invoker never panics and never lets a failure escape as anything but a
//! [`ProbeError`]; the aggregator turns those into failed probe results.

pub mod catalog;
pub mod command;

pub use catalog::{Platform, ProbeCatalog};
pub use command::SystemProbeInvoker;

use crate::error::AppError;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A command line to execute: program plus arguments, no shell involved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProbeCommand {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured output of a finished command
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

impl ProbeOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout, followed by stderr when the latter is not empty
    pub fn combined_text(&self) -> String {
        let stderr = self.stderr.trim_end();
        if stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.trim().is_empty() {
            stderr.to_string()
        } else {
            format!("{}\n{}", self.stdout.trim_end(), stderr)
        }
    }

    /// Human-readable reason for a non-zero exit
    pub fn failure_reason(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Failure at the probe boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// The executable could not be found
    #[error("'{program}' is not available on this host")]
    NotFound { program: String },

    /// The executable exists but could not be started
    #[error("failed to launch '{program}': {message}")]
    Launch { program: String, message: String },

    /// The command did not finish within its timeout and was killed
    #[error("'{program}' did not finish within {}s", timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    /// The overall run deadline passed before the command finished
    #[error("run deadline exceeded")]
    DeadlineExceeded { program: String },
}

impl ProbeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout { .. } | ProbeError::DeadlineExceeded { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProbeError::NotFound { .. })
    }
}

impl From<ProbeError> for AppError {
    fn from(error: ProbeError) -> Self {
        match error {
            ProbeError::Timeout { .. } | ProbeError::DeadlineExceeded { .. } => {
                AppError::probe_timeout(error.to_string())
            }
            _ => AppError::probe_unavailable(error.to_string()),
        }
    }
}

/// Seam for running external diagnostic commands
#[async_trait]
pub trait ProbeInvoker: Send + Sync {
    /// Run `command`, killing it if it exceeds `timeout`
    async fn invoke(&self, command: &ProbeCommand, timeout: Duration) -> Result<ProbeOutput, ProbeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ProbeOutput {
        ProbeOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_command_display() {
        let command = ProbeCommand::new("ping").args(["-c", "15"]).arg("8.8.8.8");
        assert_eq!(command.to_string(), "ping -c 15 8.8.8.8");
    }

    #[test]
    fn test_combined_text() {
        assert_eq!(output("out\n", "", Some(0)).combined_text(), "out\n");
        assert_eq!(output("", "err\n", Some(1)).combined_text(), "err");
        assert_eq!(output("out\n", "err\n", Some(1)).combined_text(), "out\nerr");
    }

    #[test]
    fn test_failure_reason() {
        assert!(output("", "", Some(0)).success());
        assert_eq!(output("", "", Some(2)).failure_reason(), "exited with status 2");
        assert_eq!(output("", "", None).failure_reason(), "terminated by signal");
    }

    #[test]
    fn test_probe_error_conversion() {
        let timeout = ProbeError::Timeout {
            program: "tracert".into(),
            timeout: Duration::from_secs(120),
        };
        assert!(timeout.is_timeout());
        assert_eq!(timeout.to_string(), "'tracert' did not finish within 120s");
        let app: AppError = timeout.into();
        assert_eq!(app.category(), "TIMEOUT");

        let deadline = ProbeError::DeadlineExceeded { program: "ping".into() };
        assert!(deadline.is_timeout());
        assert_eq!(deadline.to_string(), "run deadline exceeded");

        let missing = ProbeError::NotFound { program: "traceroute".into() };
        assert!(missing.is_not_found());
        let app: AppError = missing.into();
        assert_eq!(app.category(), "PROBE");
    }
}
