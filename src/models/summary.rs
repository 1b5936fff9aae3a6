//! Summary data model: the single immutable aggregate produced by one run

use crate::stats::PingStatistics;
use crate::types::{LatencyRating, ProbeKind};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Marker used for fields whose collection never ran
pub const NOT_COLLECTED: &str = "not collected";

/// Default SSID text when the WLAN query reports no connection
pub const NO_WIFI_SSID: &str = "No active WiFi connections detected";

/// Default signal text when the WLAN query reports no signal
pub const NO_WIFI_SIGNAL: &str = "N/A";

/// A summary field that is either collected or explicitly unavailable.
///
/// Every field of a [`Summary`] is one of these (or a plain value), so
/// renderers never meet an absent field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Metric<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Metric<T> {
    /// Convert a provider/probe outcome, keeping the failure text as reason
    pub fn from_result<E: fmt::Display>(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Available(value),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }

    pub fn unavailable<S: Into<String>>(reason: S) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn as_ref(&self) -> Metric<&T> {
        match self {
            Self::Available(value) => Metric::Available(value),
            Self::Unavailable(reason) => Metric::Unavailable(reason.clone()),
        }
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Render the value with `f`, or the unavailable marker with its reason
    pub fn display_with<F>(&self, f: F) -> String
    where
        F: FnOnce(&T) -> String,
    {
        match self {
            Self::Available(value) => f(value),
            Self::Unavailable(reason) => format!("unavailable ({})", reason),
        }
    }
}

/// A probe target: an IP literal or hostname from the configured list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new<S: Into<String>>(identifier: S) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields parsed out of a probe's raw output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeDetails {
    Dns { addresses: Vec<String> },
    Ping { statistics: PingStatistics, rating: LatencyRating },
    Traceroute { hops: Option<usize> },
}

/// Outcome of one probe kind against one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub target: Target,
    pub kind: ProbeKind,
    pub raw_output: String,
    pub succeeded: bool,
    pub error_detail: Option<String>,
    pub details: ProbeDetails,
}

impl ProbeResult {
    /// A probe that could not run or did not finish; parsed fields take
    /// their documented defaults (a failed ping rates `Bad`).
    pub fn failed(target: Target, kind: ProbeKind, raw_output: String, error_detail: String) -> Self {
        let details = match kind {
            ProbeKind::DnsLookup => ProbeDetails::Dns { addresses: Vec::new() },
            ProbeKind::Ping => ProbeDetails::Ping {
                statistics: PingStatistics::empty(),
                rating: LatencyRating::Bad,
            },
            ProbeKind::Traceroute => ProbeDetails::Traceroute { hops: None },
        };
        Self {
            target,
            kind,
            raw_output,
            succeeded: false,
            error_detail: Some(error_detail),
            details,
        }
    }

    /// Latency rating if this is a ping result
    pub fn rating(&self) -> Option<LatencyRating> {
        match &self.details {
            ProbeDetails::Ping { rating, .. } => Some(*rating),
            _ => None,
        }
    }
}

/// Memory counters in megabytes; `used_mb + free_mb == total_mb` holds by construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total_mb: u64,
    pub free_mb: u64,
    pub used_mb: u64,
    pub percent: f64,
}

impl MemoryUsage {
    /// Derive usage from total and free; free is clamped to total.
    pub fn new(total_mb: u64, free_mb: u64) -> Self {
        let free_mb = free_mb.min(total_mb);
        let used_mb = total_mb - free_mb;
        let percent = if total_mb == 0 {
            0.0
        } else {
            round2(used_mb as f64 / total_mb as f64 * 100.0)
        };
        Self { total_mb, free_mb, used_mb, percent }
    }
}

/// Fixed-point gigabytes with two decimals, so sums stay exact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gigabytes(u64);

impl Gigabytes {
    const BYTES_PER_GB: u128 = 1024 * 1024 * 1024;

    pub fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    /// Round a byte count to the nearest hundredth of a gigabyte
    pub fn from_bytes(bytes: u64) -> Self {
        let hundredths = (bytes as u128 * 100 + Self::BYTES_PER_GB / 2) / Self::BYTES_PER_GB;
        Self(hundredths as u64)
    }

    pub fn hundredths(&self) -> u64 {
        self.0
    }
}

impl std::ops::Add for Gigabytes {
    type Output = Gigabytes;

    fn add(self, rhs: Gigabytes) -> Gigabytes {
        Gigabytes(self.0 + rhs.0)
    }
}

impl fmt::Display for Gigabytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// One filesystem-backed volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub volume_name: String,
    pub used_gb: Gigabytes,
    pub free_gb: Gigabytes,
    pub total_gb: Gigabytes,
}

impl DiskInfo {
    /// The total is always derived, never taken from the provider
    pub fn new<S: Into<String>>(volume_name: S, used_gb: Gigabytes, free_gb: Gigabytes) -> Self {
        Self {
            volume_name: volume_name.into(),
            used_gb,
            free_gb,
            total_gb: used_gb + free_gb,
        }
    }
}

/// Negotiated adapter link speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSpeed {
    Mbps(u64),
    Unknown,
}

impl fmt::Display for LinkSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkSpeed::Mbps(speed) => write!(f, "{} Mbps", speed),
            LinkSpeed::Unknown => f.write_str("unknown"),
        }
    }
}

/// A network adapter that was up at snapshot time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterInfo {
    pub name: String,
    pub description: String,
    pub mac_address: String,
    pub link_speed: LinkSpeed,
    pub connection_type: String,
    pub status: String,
}

/// Byte counters for one interface since boot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceCounters {
    pub name: String,
    pub received_bytes: u64,
    pub transmitted_bytes: u64,
}

/// Current wireless association
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiState {
    pub ssid: String,
    pub signal_percent: String,
}

impl WifiState {
    /// State reported when no association is found
    pub fn disconnected() -> Self {
        Self {
            ssid: NO_WIFI_SSID.to_string(),
            signal_percent: NO_WIFI_SIGNAL.to_string(),
        }
    }
}

/// Throughput figures reported by the speed-test binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedtestResult {
    pub download: String,
    pub upload: String,
}

/// Time since boot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uptime(pub Duration);

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;
        write!(
            f,
            "{}, {}, {}, {}",
            count(days, "day"),
            count(hours, "hour"),
            count(minutes, "minute"),
            count(seconds, "second")
        )
    }
}

fn count(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// Per probe kind success tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProbeTally {
    pub succeeded: usize,
    pub total: usize,
}

/// The root aggregate of one diagnostic run.
///
/// Built exactly once through [`SummaryBuilder`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub generated_at: DateTime<Local>,
    pub hostname: Metric<String>,
    pub uptime: Metric<Uptime>,
    pub cpu_load_percent: Metric<f64>,
    pub memory: Metric<MemoryUsage>,
    pub wifi: Metric<WifiState>,
    pub ip_config: Metric<String>,
    pub adapters: Metric<Vec<AdapterInfo>>,
    pub disks: Metric<Vec<DiskInfo>>,
    pub interfaces: Metric<Vec<InterfaceCounters>>,
    pub targets: Vec<Target>,
    pub probes: Vec<ProbeResult>,
    pub speedtest: Metric<SpeedtestResult>,
}

impl Summary {
    /// Probe results for one target in DNS, Ping, Traceroute order
    pub fn probes_for<'a>(&'a self, target: &'a Target) -> impl Iterator<Item = &'a ProbeResult> + 'a {
        self.probes.iter().filter(move |probe| &probe.target == target)
    }

    /// Success tally for one probe kind
    pub fn tally(&self, kind: ProbeKind) -> ProbeTally {
        self.probes
            .iter()
            .filter(|probe| probe.kind == kind)
            .fold(ProbeTally::default(), |mut tally, probe| {
                tally.total += 1;
                if probe.succeeded {
                    tally.succeeded += 1;
                }
                tally
            })
    }

    /// Export the summary as JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Accumulates independent step results into one [`Summary`].
///
/// Steps that never reported are filled with an unavailable marker, and
/// probe results are resequenced into configured target order on `build`.
#[derive(Debug)]
pub struct SummaryBuilder {
    targets: Vec<Target>,
    hostname: Option<Metric<String>>,
    uptime: Option<Metric<Uptime>>,
    cpu_load_percent: Option<Metric<f64>>,
    memory: Option<Metric<MemoryUsage>>,
    wifi: Option<Metric<WifiState>>,
    ip_config: Option<Metric<String>>,
    adapters: Option<Metric<Vec<AdapterInfo>>>,
    disks: Option<Metric<Vec<DiskInfo>>>,
    interfaces: Option<Metric<Vec<InterfaceCounters>>>,
    probes: Vec<ProbeResult>,
    speedtest: Option<Metric<SpeedtestResult>>,
}

impl SummaryBuilder {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            hostname: None,
            uptime: None,
            cpu_load_percent: None,
            memory: None,
            wifi: None,
            ip_config: None,
            adapters: None,
            disks: None,
            interfaces: None,
            probes: Vec::new(),
            speedtest: None,
        }
    }

    pub fn hostname(mut self, value: Metric<String>) -> Self {
        self.hostname = Some(value);
        self
    }

    pub fn uptime(mut self, value: Metric<Uptime>) -> Self {
        self.uptime = Some(value);
        self
    }

    pub fn cpu_load_percent(mut self, value: Metric<f64>) -> Self {
        self.cpu_load_percent = Some(value);
        self
    }

    pub fn memory(mut self, value: Metric<MemoryUsage>) -> Self {
        self.memory = Some(value);
        self
    }

    pub fn wifi(mut self, value: Metric<WifiState>) -> Self {
        self.wifi = Some(value);
        self
    }

    pub fn ip_config(mut self, value: Metric<String>) -> Self {
        self.ip_config = Some(value);
        self
    }

    pub fn adapters(mut self, value: Metric<Vec<AdapterInfo>>) -> Self {
        self.adapters = Some(value);
        self
    }

    pub fn disks(mut self, value: Metric<Vec<DiskInfo>>) -> Self {
        self.disks = Some(value);
        self
    }

    pub fn interfaces(mut self, value: Metric<Vec<InterfaceCounters>>) -> Self {
        self.interfaces = Some(value);
        self
    }

    pub fn probes<I: IntoIterator<Item = ProbeResult>>(mut self, results: I) -> Self {
        self.probes.extend(results);
        self
    }

    pub fn speedtest(mut self, value: Metric<SpeedtestResult>) -> Self {
        self.speedtest = Some(value);
        self
    }

    /// Finalize the summary stamped with `generated_at`
    pub fn build(self, generated_at: DateTime<Local>) -> Summary {
        let mut probes = self.probes;
        let targets = self.targets;
        // Stable sort: duplicates of a target keep their arrival order
        probes.sort_by_key(|probe| {
            let target_index = targets
                .iter()
                .position(|target| target == &probe.target)
                .unwrap_or(usize::MAX);
            let kind_index = ProbeKind::ORDERED
                .iter()
                .position(|kind| *kind == probe.kind)
                .unwrap_or(usize::MAX);
            (target_index, kind_index)
        });

        Summary {
            generated_at,
            hostname: self.hostname.unwrap_or_else(not_collected),
            uptime: self.uptime.unwrap_or_else(not_collected),
            cpu_load_percent: self.cpu_load_percent.unwrap_or_else(not_collected),
            memory: self.memory.unwrap_or_else(not_collected),
            wifi: self.wifi.unwrap_or_else(not_collected),
            ip_config: self.ip_config.unwrap_or_else(not_collected),
            adapters: self.adapters.unwrap_or_else(not_collected),
            disks: self.disks.unwrap_or_else(not_collected),
            interfaces: self.interfaces.unwrap_or_else(not_collected),
            targets,
            probes,
            speedtest: self.speedtest.unwrap_or_else(not_collected),
        }
    }
}

fn not_collected<T>() -> Metric<T> {
    Metric::unavailable(NOT_COLLECTED)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
