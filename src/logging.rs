//! Structured logging for the diagnostic run
//!
//! Entries carry a level, the emitting component, a session id shared by
//! every logger of one run, and arbitrary `serde_json` fields. Everything is
//! written to stderr so that the rendered report on stdout stays clean.
//!
//! Two specialized loggers sit on top of [`Logger`]:
//! - [`ProbeLogger`] records one entry per external command invocation
//! - [`StepLogger`] records start and finish of each pipeline step

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::probe::{ProbeCommand, ProbeError, ProbeOutput};
use crate::types::ProbeKind;
use chrono::{DateTime, Local};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Severity, ordered from chatty to critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    fn color(&self) -> Color {
        match self {
            LogLevel::Debug => Color::Cyan,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    /// Threshold for a run: `--debug` > `--verbose` > warnings only
    pub fn for_config(config: &Config) -> Self {
        if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            other => return Err(AppError::parse(format!("log level '{}'", other))),
        };
        Ok(level)
    }
}

/// One structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub message: String,
    /// Sorted so console lines are stable
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// `time LEVEL component: message key=value`
    Console,
    /// One JSON object per line
    Json,
    /// Level initial, component and message only
    Compact,
}

/// Logger for one component of the run
#[derive(Debug, Clone)]
pub struct Logger {
    component: String,
    threshold: LogLevel,
    format: LogFormat,
    use_color: bool,
    session: Option<Arc<str>>,
}

impl Logger {
    pub fn new<S: Into<String>>(component: S) -> Self {
        Self {
            component: component.into(),
            threshold: LogLevel::Info,
            format: LogFormat::Console,
            use_color: false,
            session: None,
        }
    }

    /// Debug runs log JSON lines so they can be piped into a file and filtered
    pub fn with_config<S: Into<String>>(component: S, config: &Config) -> Self {
        Self {
            component: component.into(),
            threshold: LogLevel::for_config(config),
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            use_color: config.enable_color,
            session: None,
        }
    }

    pub fn in_session(mut self, session: Arc<str>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }

    pub fn entry(&self, level: LogLevel, message: &str) -> EntryBuilder<'_> {
        EntryBuilder {
            logger: self,
            entry: LogEntry {
                timestamp: Local::now(),
                level,
                component: self.component.clone(),
                session: self.session.as_deref().map(str::to_string),
                message: message.to_string(),
                fields: BTreeMap::new(),
            },
        }
    }

    pub fn debug(&self, message: &str) -> EntryBuilder<'_> {
        self.entry(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> EntryBuilder<'_> {
        self.entry(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> EntryBuilder<'_> {
        self.entry(LogLevel::Warn, message)
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => {
                let level = format!("{:<5}", entry.level.as_str());
                let level = if self.use_color {
                    level.color(entry.level.color()).to_string()
                } else {
                    level
                };
                let mut line = format!(
                    "{} {} {}: {}",
                    entry.timestamp.format("%H:%M:%S%.3f"),
                    level,
                    entry.component,
                    entry.message
                );
                for (key, value) in &entry.fields {
                    line.push_str(&format!(" {}={}", key, value));
                }
                line
            }
            // Serializing a map of JSON values cannot fail
            LogFormat::Json => serde_json::to_string(entry).unwrap_or_default(),
            LogFormat::Compact => format!("{} {}: {}", &entry.level.as_str()[..1], entry.component, entry.message),
        }
    }

    async fn emit(&self, entry: LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }
        let mut line = self.render(&entry);
        line.push('\n');
        let mut stderr = tokio::io::stderr();
        // Losing a log line must never affect the run
        let _ = stderr.write_all(line.as_bytes()).await;
    }
}

/// Attaches fields to one entry before it is written
pub struct EntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl EntryBuilder<'_> {
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), value);
        }
        self
    }

    pub fn duration(self, duration: Duration) -> Self {
        self.field("duration_ms", duration.as_millis() as u64)
    }

    /// Category and recoverability of the error behind this entry
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("recoverable", error.is_recoverable())
    }

    pub async fn log(self) {
        self.logger.emit(self.entry).await;
    }
}

/// One entry per external command invocation
#[derive(Debug, Clone)]
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PROBE", config),
        }
    }

    pub async fn log_started(&self, command: &ProbeCommand, target: Option<&str>) {
        let mut entry = self
            .logger
            .debug(&format!("Running {}", command))
            .field("program", &command.program);
        if let Some(target) = target {
            entry = entry.field("target", target);
        }
        entry.log().await;
    }

    /// Missing tools are expected on some hosts and log at Info; other
    /// failures log at Warn
    pub async fn log_finished(
        &self,
        command: &ProbeCommand,
        kind: Option<ProbeKind>,
        target: Option<&str>,
        outcome: &std::result::Result<ProbeOutput, ProbeError>,
    ) {
        let entry = match outcome {
            Ok(output) => {
                let status = match output.exit_code {
                    Some(code) => format!("exit {}", code),
                    None => "terminated by signal".to_string(),
                };
                let level = if output.success() { LogLevel::Debug } else { LogLevel::Info };
                self.logger
                    .entry(level, &format!("{} finished ({})", command.program, status))
                    .field("exit_code", output.exit_code)
                    .field("success", output.success())
                    .duration(output.duration)
            }
            Err(error) => {
                let level = if error.is_not_found() { LogLevel::Info } else { LogLevel::Warn };
                let failure = AppError::from(error.clone());
                self.logger
                    .entry(level, &format!("{} failed: {}", command.program, error))
                    .field("success", false)
                    .field("timed_out", error.is_timeout())
                    .error_info(&failure)
            }
        };

        let mut entry = entry.field("program", &command.program);
        if let Some(kind) = kind {
            entry = entry.field("probe", kind.name());
        }
        if let Some(target) = target {
            entry = entry.field("target", target);
        }
        entry.log().await;
    }
}

/// Start and finish timing of pipeline steps
///
/// When the structured step entries are filtered out (the default Warn
/// threshold), the logger prints short progress lines to stderr instead, so
/// a run that takes minutes is never silent.
#[derive(Debug)]
pub struct StepLogger {
    logger: Logger,
    open: HashMap<String, Instant>,
    progress: bool,
}

impl StepLogger {
    pub fn new(config: &Config) -> Self {
        Logger::with_config("STEP", config).into()
    }

    /// Whether plain progress lines are printed
    pub fn shows_progress(&self) -> bool {
        self.progress
    }

    pub async fn start_step(&mut self, step: &str) {
        self.open.insert(step.to_string(), Instant::now());
        self.print_progress(progress_started(step)).await;
        self.logger.info(&format!("{} started", step)).field("step", step).log().await;
    }

    /// Report one finished target chain; `done` counts completions so far
    pub async fn target_finished(&self, target: &str, done: usize, total: usize, succeeded: usize, probes: usize) {
        self.print_progress(progress_target(target, done, total, succeeded, probes))
            .await;
        self.logger
            .info(&format!("{} probed", target))
            .field("target", target)
            .field("completed", done)
            .field("succeeded", succeeded)
            .log()
            .await;
    }

    async fn print_progress(&self, line: String) {
        if !self.progress {
            return;
        }
        let mut stderr = tokio::io::stderr();
        let _ = stderr.write_all(format!("{}\n", line).as_bytes()).await;
    }

    /// Returns the elapsed time, or `None` for a step that was never started
    pub async fn finish_step(&mut self, step: &str, detail: &str) -> Option<Duration> {
        let Some(started) = self.open.remove(step) else {
            self.logger
                .warn(&format!("{} finished without being started", step))
                .field("step", step)
                .log()
                .await;
            return None;
        };

        let elapsed = started.elapsed();
        self.print_progress(progress_finished(step, detail, elapsed)).await;
        self.logger
            .info(&format!("{} finished: {}", step, detail))
            .field("step", step)
            .duration(elapsed)
            .log()
            .await;
        Some(elapsed)
    }

    pub fn active_steps(&self) -> usize {
        self.open.len()
    }
}

impl From<Logger> for StepLogger {
    fn from(logger: Logger) -> Self {
        Self {
            progress: !logger.enabled(LogLevel::Info),
            logger,
            open: HashMap::new(),
        }
    }
}

fn progress_started(step: &str) -> String {
    format!("==> {}...", step)
}

fn progress_finished(step: &str, detail: &str, elapsed: Duration) -> String {
    format!("    {}: {} ({:.1}s)", step, detail, elapsed.as_secs_f64())
}

fn progress_target(target: &str, done: usize, total: usize, succeeded: usize, probes: usize) -> String {
    format!("    [{}/{}] {}: {}/{} probes succeeded", done, total, target, succeeded, probes)
}

impl From<Logger> for ProbeLogger {
    fn from(logger: Logger) -> Self {
        Self { logger }
    }
}

/// Creates loggers that share one session id
pub struct LoggerFactory {
    config: Config,
    session: Arc<str>,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session: Uuid::new_v4().to_string().into(),
        }
    }

    pub fn create_logger(&self, component: &str) -> Logger {
        Logger::with_config(component, &self.config).in_session(Arc::clone(&self.session))
    }

    pub fn create_probe_logger(&self) -> ProbeLogger {
        self.create_logger("PROBE").into()
    }

    pub fn create_step_logger(&self) -> StepLogger {
        self.create_logger("STEP").into()
    }

    pub fn session_id(&self) -> &str {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ping_entry(logger: &Logger) -> LogEntry {
        logger
            .info("ping finished (exit 0)")
            .field("target", "8.8.8.8")
            .field("exit_code", 0)
            .entry
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str(" Warning ").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Debug);
        let error = LogLevel::from_str("fatal").unwrap_err();
        assert_eq!(error.category(), "PARSE");
    }

    #[test]
    fn test_threshold_follows_flags() {
        let quiet = Logger::with_config("DIAG", &Config::default());
        assert!(!quiet.enabled(LogLevel::Info));
        assert!(quiet.enabled(LogLevel::Warn));

        let verbose = Config {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(LogLevel::for_config(&verbose), LogLevel::Info);

        let debug = Logger::with_config(
            "DIAG",
            &Config {
                debug: true,
                verbose: true,
                ..Default::default()
            },
        );
        assert!(debug.enabled(LogLevel::Debug));
        assert_eq!(debug.format, LogFormat::Json);
    }

    #[test]
    fn test_console_line_sorts_fields() {
        let logger = Logger::new("PROBE");
        let line = logger.render(&ping_entry(&logger));
        assert!(line.ends_with("INFO  PROBE: ping finished (exit 0) exit_code=0 target=\"8.8.8.8\""));
    }

    #[test]
    fn test_json_line_carries_session() {
        let logger = Logger::new("PROBE")
            .with_format(LogFormat::Json)
            .in_session(Arc::from("run-42"));
        let parsed: LogEntry = serde_json::from_str(&logger.render(&ping_entry(&logger))).unwrap();
        assert_eq!(parsed.session.as_deref(), Some("run-42"));
        assert_eq!(parsed.fields["target"], "8.8.8.8");
        assert_eq!(parsed.level, LogLevel::Info);
    }

    #[test]
    fn test_compact_line() {
        let logger = Logger::new("STEP").with_format(LogFormat::Compact);
        let entry = logger.warn("speedtest finished: unavailable").entry;
        assert_eq!(logger.render(&entry), "W STEP: speedtest finished: unavailable");
    }

    #[tokio::test]
    async fn test_step_timing() {
        let mut steps = StepLogger::new(&Config::default());
        steps.start_step("static info").await;
        assert_eq!(steps.active_steps(), 1);

        assert!(steps.finish_step("static info", "ok").await.is_some());
        assert_eq!(steps.active_steps(), 0);
        assert!(steps.finish_step("never started", "ok").await.is_none());
    }

    #[tokio::test]
    async fn test_probe_logger_accepts_all_outcomes() {
        let probes = ProbeLogger::new(&Config::default());
        let command = ProbeCommand::new("ping").args(["-c", "1", "8.8.8.8"]);
        let ok = Ok(ProbeOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: Some(0),
            duration: Duration::from_millis(12),
        });
        let timed_out = Err(ProbeError::Timeout {
            program: "ping".to_string(),
            timeout: Duration::from_secs(1),
        });

        probes.log_started(&command, Some("8.8.8.8")).await;
        probes
            .log_finished(&command, Some(ProbeKind::Ping), Some("8.8.8.8"), &ok)
            .await;
        probes.log_finished(&command, None, None, &timed_out).await;
    }

    #[test]
    fn test_factory_shares_session() {
        let factory = LoggerFactory::new(Config::default());
        let app = factory.create_logger("APP");
        let diag = factory.create_logger("DIAG");

        assert_eq!(app.component(), "APP");
        assert_eq!(app.session(), Some(factory.session_id()));
        assert_eq!(app.session(), diag.session());
        assert_ne!(factory.session_id(), LoggerFactory::new(Config::default()).session_id());
    }

    #[test]
    fn test_default_run_prints_progress() {
        assert!(StepLogger::new(&Config::default()).shows_progress());

        let verbose = Config {
            verbose: true,
            ..Default::default()
        };
        assert!(!StepLogger::new(&verbose).shows_progress());
    }

    #[test]
    fn test_progress_lines() {
        assert_eq!(progress_started("target probes"), "==> target probes...");
        assert_eq!(
            progress_finished("speedtest", "unavailable", Duration::from_millis(1300)),
            "    speedtest: unavailable (1.3s)"
        );
        assert_eq!(
            progress_target("8.8.8.8", 2, 9, 3, 3),
            "    [2/9] 8.8.8.8: 3/3 probes succeeded"
        );
    }

    #[test]
    fn test_probe_failure_carries_error_category() {
        let logger = Logger::new("PROBE");
        let failure = AppError::from(ProbeError::NotFound {
            program: "traceroute".to_string(),
        });
        let entry = logger.info("traceroute failed").error_info(&failure).entry;

        assert_eq!(entry.fields["error_category"], "PROBE");
        assert_eq!(entry.fields["recoverable"], true);
    }
}
