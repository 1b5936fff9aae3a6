//! OS metric providers
//!
//! Each query is independent and may fail on its own; the aggregator turns
//! a [`ProviderError`] into an unavailable marker on the affected field.

pub mod adapters;
pub mod system;

pub use system::SystemMetricProvider;

use crate::error::AppError;
use crate::models::{AdapterInfo, DiskInfo, InterfaceCounters, MemoryUsage, Uptime};
use async_trait::async_trait;
use thiserror::Error;

/// Failure at the metric boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The platform offers no source for this metric
    #[error("{metric} is not supported on this platform")]
    Unsupported { metric: String },

    /// The source exists but the query failed
    #[error("{metric} query failed: {message}")]
    Query { metric: String, message: String },
}

impl ProviderError {
    pub fn unsupported<S: Into<String>>(metric: S) -> Self {
        ProviderError::Unsupported { metric: metric.into() }
    }

    pub fn query<S: Into<String>, M: Into<String>>(metric: S, message: M) -> Self {
        ProviderError::Query {
            metric: metric.into(),
            message: message.into(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        AppError::provider_unavailable(error.to_string())
    }
}

/// Seam for host metric snapshots
#[async_trait]
pub trait MetricProvider: Send + Sync {
    async fn hostname(&self) -> Result<String, ProviderError>;

    async fn uptime(&self) -> Result<Uptime, ProviderError>;

    /// Global CPU utilisation in percent, sampled over a short interval
    async fn cpu_load_percent(&self) -> Result<f64, ProviderError>;

    async fn memory(&self) -> Result<MemoryUsage, ProviderError>;

    /// Mounted volumes in enumeration order; an empty list is not an error
    async fn disks(&self) -> Result<Vec<DiskInfo>, ProviderError>;

    /// Bytes received and transmitted per interface since boot
    async fn interface_counters(&self) -> Result<Vec<InterfaceCounters>, ProviderError>;

    /// Adapters that are up, used where no enumeration command exists
    async fn adapters(&self) -> Result<Vec<AdapterInfo>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProviderError::unsupported("hostname").to_string(),
            "hostname is not supported on this platform"
        );
        assert_eq!(
            ProviderError::query("memory", "zero total").to_string(),
            "memory query failed: zero total"
        );
    }

    #[test]
    fn test_conversion_to_app_error() {
        let app: AppError = ProviderError::unsupported("uptime").into();
        assert_eq!(app.category(), "PROVIDER");
    }
}
