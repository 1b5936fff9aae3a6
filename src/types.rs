//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Kind of network probe run against a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeKind {
    /// A-record resolution
    DnsLookup,
    /// Round-trip latency probe
    Ping,
    /// Hop-path trace
    Traceroute,
}

impl ProbeKind {
    /// Per-target execution and rendering order
    pub const ORDERED: [ProbeKind; 3] = [ProbeKind::DnsLookup, ProbeKind::Ping, ProbeKind::Traceroute];

    /// Get a human-readable name for this probe kind
    pub fn name(&self) -> &'static str {
        match self {
            ProbeKind::DnsLookup => "DNS Lookup",
            ProbeKind::Ping => "Ping",
            ProbeKind::Traceroute => "Traceroute",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Latency quality classification based on average round-trip time.
///
/// Never constructed from raw input, only derived through
/// [`LatencyRating::from_average`]. A value exactly on a boundary belongs to
/// the better band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LatencyRating {
    /// Up to 20ms
    Excellent,
    /// Up to 40ms
    Good,
    /// Up to 100ms
    Acceptable,
    /// Up to 200ms
    Poor,
    /// Above 200ms, or no reply at all
    Bad,
}

impl LatencyRating {
    /// Classify an average round-trip time in milliseconds.
    ///
    /// `None` (no successful attempt) and NaN classify as `Bad`.
    pub fn from_average(average_ms: Option<f64>) -> Self {
        match average_ms {
            Some(ms) if ms <= 20.0 => Self::Excellent,
            Some(ms) if ms <= 40.0 => Self::Good,
            Some(ms) if ms <= 100.0 => Self::Acceptable,
            Some(ms) if ms <= 200.0 => Self::Poor,
            _ => Self::Bad,
        }
    }

    /// Get descriptive text
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Acceptable => "Acceptable",
            Self::Poor => "Poor",
            Self::Bad => "Bad",
        }
    }
}

impl fmt::Display for LatencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
