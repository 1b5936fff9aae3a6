//! Host Network Diagnostics
//!
//! A single-shot diagnostic collector that gathers local system health
//! metrics, probes network reachability to a configured list of targets
//! (DNS lookup, ping, traceroute), optionally runs a bandwidth speed test,
//! and renders one immutable summary both to the console and to a report
//! file.

pub mod app;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod parsers;
pub mod probe;
pub mod providers;
pub mod stats;
pub mod testing;
pub mod types;

// Re-export commonly used types
pub use diagnostics::DiagnosticAggregator;
pub use error::{AppError, Result};
pub use models::{Config, Summary};
pub use output::{ReportRenderer, OutputCoordinator};
pub use types::{LatencyRating, ProbeKind};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata set by `build.rs`
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// Probed in this order; the rendered reports keep it.
    pub const DEFAULT_TARGETS: &[&str] = &[
        "8.8.8.8",          // Google DNS
        "1.1.1.1",          // Cloudflare DNS
        "9.9.9.9",          // Quad9
        "208.67.222.222",   // OpenDNS
        "google.com",
        "cloudflare.com",
        "microsoft.com",
        "amazon.com",
        "github.com",
    ];
    pub const DEFAULT_PING_COUNT: u32 = 15;
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(120);
    pub const DEFAULT_SPEEDTEST_TIMEOUT: Duration = Duration::from_secs(180);
    pub const DEFAULT_SPEEDTEST_SERVER_ID: &str = "18335";
    pub const DEFAULT_REPORT_FILE_NAME: &str = "NetworkDiagnosticReport.txt";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const MAX_CONCURRENCY: usize = 64;

    #[cfg(windows)]
    pub const SPEEDTEST_BINARY_NAME: &str = "speedtest.exe";
    #[cfg(not(windows))]
    pub const SPEEDTEST_BINARY_NAME: &str = "speedtest";
}
