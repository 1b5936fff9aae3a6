//! Data models and structures for the diagnostics collector

pub mod config;
pub mod summary;

// Re-export main model types
pub use config::Config;
pub use summary::{
    AdapterInfo, DiskInfo, Gigabytes, InterfaceCounters, LinkSpeed, MemoryUsage, Metric,
    ProbeDetails, ProbeResult, ProbeTally, SpeedtestResult, Summary, SummaryBuilder, Target,
    Uptime, WifiState,
};
