//! Destinations for the rendered views

use super::colored::ColorScheme;
use super::renderer::LiveLine;
use crate::error::{AppError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Receives the live view
pub trait LiveSink {
    fn emit(&mut self, lines: &[LiveLine]) -> Result<()>;
}

/// Receives the report document and the JSON export
pub trait DocumentSink {
    fn persist(&mut self, document: &str) -> Result<()>;

    fn persist_json(&mut self, path: &Path, json: &str) -> Result<()>;
}

/// Writes live lines to stdout, colored when enabled
pub struct ConsoleSink {
    enable_color: bool,
    scheme: ColorScheme,
}

impl ConsoleSink {
    pub fn new(enable_color: bool) -> Self {
        Self {
            enable_color,
            scheme: ColorScheme::default(),
        }
    }

    fn format_line(&self, line: &LiveLine) -> String {
        if self.enable_color {
            self.scheme.paint(line)
        } else {
            line.text.clone()
        }
    }
}

impl LiveSink for ConsoleSink {
    fn emit(&mut self, lines: &[LiveLine]) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for line in lines {
            writeln!(handle, "{}", self.format_line(line))?;
        }
        handle.flush()?;
        Ok(())
    }
}

/// Overwrites the report file on every run
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .map_err(|e| AppError::persistence(format!("Failed to write {}: {}", path.display(), e)))
}

impl DocumentSink for FileSink {
    fn persist(&mut self, document: &str) -> Result<()> {
        write_file(&self.path, document)
    }

    fn persist_json(&mut self, path: &Path, json: &str) -> Result<()> {
        write_file(path, json)
    }
}

/// Captured output, shared with the caller through an `Arc`
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    inner: Arc<Mutex<Captured>>,
}

/// Everything a [`MemorySink`] received
#[derive(Debug, Default, Clone)]
pub struct Captured {
    pub live: Vec<LiveLine>,
    pub documents: Vec<String>,
    pub json: Vec<(PathBuf, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> Captured {
        self.inner.lock().map(|captured| captured.clone()).unwrap_or_default()
    }

    fn with<F: FnOnce(&mut Captured)>(&self, f: F) -> Result<()> {
        let mut captured = self
            .inner
            .lock()
            .map_err(|_| AppError::internal("memory sink lock poisoned"))?;
        f(&mut captured);
        Ok(())
    }
}

impl LiveSink for MemorySink {
    fn emit(&mut self, lines: &[LiveLine]) -> Result<()> {
        self.with(|captured| captured.live.extend_from_slice(lines))
    }
}

impl DocumentSink for MemorySink {
    fn persist(&mut self, document: &str) -> Result<()> {
        self.with(|captured| captured.documents.push(document.to_string()))
    }

    fn persist_json(&mut self, path: &Path, json: &str) -> Result<()> {
        self.with(|captured| captured.json.push((path.to_path_buf(), json.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::renderer::Tone;
    use tempfile::TempDir;

    #[test]
    fn test_file_sink_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("NetworkDiagnosticReport.txt");
        let mut sink = FileSink::new(&path);

        sink.persist("first run\n").unwrap();
        sink.persist("second run\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second run\n");
    }

    #[test]
    fn test_file_sink_failure_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(dir.path().join("missing").join("report.txt"));
        let error = sink.persist("report").unwrap_err();
        assert_eq!(error.category(), "PERSIST");
    }

    #[test]
    fn test_memory_sink_captures() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer
            .emit(&[LiveLine {
                tone: Tone::Normal,
                text: "Hostname: diag-host".to_string(),
            }])
            .unwrap();
        writer.persist("doc").unwrap();

        let captured = sink.captured();
        assert_eq!(captured.live.len(), 1);
        assert_eq!(captured.documents, vec!["doc".to_string()]);
    }

    #[test]
    fn test_console_line_without_color() {
        let sink = ConsoleSink::new(false);
        let line = LiveLine {
            tone: Tone::Bad,
            text: "Ping x: failed".to_string(),
        };
        assert_eq!(sink.format_line(&line), "Ping x: failed");
    }
}
