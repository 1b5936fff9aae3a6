//! Rendering and delivery of the run summary
//!
//! The [`ReportRenderer`] turns a [`Summary`] into a live view and a report
//! document; the [`OutputCoordinator`] hands them to their sinks in a fixed
//! order: console first, then the report file, then the optional JSON export.

mod colored;
mod renderer;
mod sink;
mod table;

pub use colored::ColorScheme;
pub use renderer::{probe_line, LiveLine, ReportRenderer, Tone, REPORT_TITLE};
pub use sink::{Captured, ConsoleSink, DocumentSink, FileSink, LiveSink, MemorySink};
pub use table::{Alignment, Column, RowData, TableFormat};

use crate::{error::AppError, models::Summary};
use std::path::PathBuf;

/// Delivers both renderings of a summary
pub struct OutputCoordinator {
    renderer: ReportRenderer,
    live: Box<dyn LiveSink>,
    document: Box<dyn DocumentSink>,
    json_path: Option<PathBuf>,
}

impl OutputCoordinator {
    pub fn new(live: Box<dyn LiveSink>, document: Box<dyn DocumentSink>) -> Self {
        Self {
            renderer: ReportRenderer::new(),
            live,
            document,
            json_path: None,
        }
    }

    /// Console plus report file as configured
    pub fn from_config(config: &crate::models::Config) -> Self {
        Self::new(
            Box::new(ConsoleSink::new(config.enable_color)),
            Box::new(FileSink::new(config.report_path.clone())),
        )
        .with_json_export(config.json_path.clone())
    }

    pub fn with_json_export(mut self, path: Option<PathBuf>) -> Self {
        self.json_path = path;
        self
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// Emit the live view, then persist the document and JSON export.
    ///
    /// Every destination is attempted even when an earlier one failed, so a
    /// closed stdout never costs the report file. Failures come back in
    /// delivery order.
    pub fn deliver(&mut self, summary: &Summary) -> Delivery {
        let mut failures = Vec::new();

        let lines = self.renderer.render_live(summary);
        if let Err(error) = self.live.emit(&lines) {
            failures.push(error);
        }

        let document = self.renderer.render_document(summary);
        if let Err(error) = self.document.persist(&document) {
            failures.push(error);
        }

        if let Some(path) = &self.json_path {
            let written = summary
                .to_json()
                .and_then(|json| self.document.persist_json(path, &json));
            if let Err(error) = written {
                failures.push(error);
            }
        }

        Delivery { failures }
    }
}

/// What went wrong while delivering one summary
#[derive(Debug, Default)]
pub struct Delivery {
    pub failures: Vec<AppError>,
}

impl Delivery {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Categories of the failures, in delivery order
    pub fn categories(&self) -> Vec<&'static str> {
        self.failures.iter().map(AppError::category).collect()
    }
}
