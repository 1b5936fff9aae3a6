//! `sysinfo`-backed metric provider

use super::{adapters, MetricProvider, ProviderError};
use crate::models::{AdapterInfo, DiskInfo, Gigabytes, InterfaceCounters, MemoryUsage, Uptime};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use sysinfo::{Disks, Networks, System};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Reads live host metrics
#[derive(Debug, Clone)]
pub struct SystemMetricProvider {
    sysfs_net: PathBuf,
}

impl Default for SystemMetricProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemMetricProvider {
    pub fn new() -> Self {
        Self {
            sysfs_net: PathBuf::from(adapters::SYSFS_NET),
        }
    }
}

/// Run a blocking sysinfo query off the async workers
async fn blocking<T, F>(metric: &'static str, query: F) -> Result<T, ProviderError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ProviderError> + Send + 'static,
{
    tokio::task::spawn_blocking(query)
        .await
        .map_err(|e| ProviderError::query(metric, e.to_string()))?
}

#[async_trait]
impl MetricProvider for SystemMetricProvider {
    async fn hostname(&self) -> Result<String, ProviderError> {
        System::host_name().ok_or_else(|| ProviderError::unsupported("hostname"))
    }

    async fn uptime(&self) -> Result<Uptime, ProviderError> {
        Ok(Uptime(Duration::from_secs(System::uptime())))
    }

    async fn cpu_load_percent(&self) -> Result<f64, ProviderError> {
        blocking("cpu load", || {
            let mut sys = System::new();
            // Usage is a delta between two refreshes
            sys.refresh_cpu();
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            sys.refresh_cpu();

            if sys.cpus().is_empty() {
                return Err(ProviderError::unsupported("cpu load"));
            }
            let usage = sys.global_cpu_info().cpu_usage() as f64;
            Ok((usage * 100.0).round() / 100.0)
        })
        .await
    }

    async fn memory(&self) -> Result<MemoryUsage, ProviderError> {
        blocking("memory", || {
            let mut sys = System::new();
            sys.refresh_memory();

            let total_mb = sys.total_memory() / BYTES_PER_MB;
            if total_mb == 0 {
                return Err(ProviderError::query("memory", "total memory reported as zero"));
            }
            Ok(MemoryUsage::new(total_mb, sys.available_memory() / BYTES_PER_MB))
        })
        .await
    }

    async fn disks(&self) -> Result<Vec<DiskInfo>, ProviderError> {
        blocking("disks", || {
            let disks = Disks::new_with_refreshed_list();
            Ok(disks
                .list()
                .iter()
                .map(|disk| {
                    let total = disk.total_space();
                    let free = disk.available_space().min(total);
                    DiskInfo::new(
                        disk.mount_point().to_string_lossy().into_owned(),
                        Gigabytes::from_bytes(total - free),
                        Gigabytes::from_bytes(free),
                    )
                })
                .collect())
        })
        .await
    }

    async fn interface_counters(&self) -> Result<Vec<InterfaceCounters>, ProviderError> {
        blocking("interface counters", || {
            let networks = Networks::new_with_refreshed_list();
            let mut counters: Vec<InterfaceCounters> = networks
                .iter()
                .map(|(name, data)| InterfaceCounters {
                    name: name.clone(),
                    received_bytes: data.total_received(),
                    transmitted_bytes: data.total_transmitted(),
                })
                .collect();
            counters.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(counters)
        })
        .await
    }

    async fn adapters(&self) -> Result<Vec<AdapterInfo>, ProviderError> {
        if cfg!(target_os = "linux") {
            let root = self.sysfs_net.clone();
            blocking("adapters", move || {
                adapters::read_sysfs_adapters(&root).map_err(|e| ProviderError::query("adapters", e.to_string()))
            })
            .await
        } else {
            blocking("adapters", || Ok(adapters::active_network_adapters(&Networks::new_with_refreshed_list())))
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_totals_are_consistent() {
        let provider = SystemMetricProvider::new();
        if let Ok(memory) = provider.memory().await {
            assert_eq!(memory.used_mb + memory.free_mb, memory.total_mb);
            assert!((0.0..=100.0).contains(&memory.percent));
        }
    }

    #[tokio::test]
    async fn test_disk_totals_are_consistent() {
        let provider = SystemMetricProvider::new();
        let disks = provider.disks().await.unwrap();
        for disk in disks {
            assert_eq!(disk.used_gb + disk.free_gb, disk.total_gb);
        }
    }

    #[tokio::test]
    async fn test_cpu_load_is_a_percentage() {
        let provider = SystemMetricProvider::new();
        if let Ok(load) = provider.cpu_load_percent().await {
            assert!(load >= 0.0);
        }
    }

    #[tokio::test]
    async fn test_interface_counters_sorted() {
        let provider = SystemMetricProvider::new();
        let counters = provider.interface_counters().await.unwrap();
        let names: Vec<&str> = counters.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
