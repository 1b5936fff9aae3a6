//! Deterministic stand-ins for the probe and metric seams
//!
//! Used by the aggregator tests and the integration tests; nothing here
//! touches the host.

use crate::models::{AdapterInfo, DiskInfo, Gigabytes, InterfaceCounters, LinkSpeed, MemoryUsage, Uptime};
use crate::probe::{ProbeCommand, ProbeError, ProbeInvoker, ProbeOutput};
use crate::providers::{MetricProvider, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// What a mocked command does when invoked
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// Finish after `delay` with the given output
    Output {
        stdout: String,
        exit_code: i32,
        delay: Duration,
    },
    /// The executable does not exist
    NotFound,
    /// The command never finishes within its timeout
    Hang,
}

impl MockResponse {
    pub fn stdout<S: Into<String>>(stdout: S) -> Self {
        MockResponse::Output {
            stdout: stdout.into(),
            exit_code: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn failing<S: Into<String>>(stdout: S, exit_code: i32) -> Self {
        MockResponse::Output {
            stdout: stdout.into(),
            exit_code,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed<S: Into<String>>(stdout: S, delay: Duration) -> Self {
        MockResponse::Output {
            stdout: stdout.into(),
            exit_code: 0,
            delay,
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    program: String,
    argument: Option<String>,
    response: MockResponse,
}

/// Answers commands from a rule table; unmatched programs are not found.
///
/// Rules added later take precedence, so a target-specific rule can
/// override a program-wide one.
#[derive(Debug, Default)]
pub struct MockProbeInvoker {
    rules: Vec<Rule>,
    calls: Mutex<Vec<ProbeCommand>>,
}

impl MockProbeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to every invocation of `program`
    pub fn on(mut self, program: &str, response: MockResponse) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            argument: None,
            response,
        });
        self
    }

    /// Respond to invocations of `program` carrying `argument`
    pub fn on_arg(mut self, program: &str, argument: &str, response: MockResponse) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            argument: Some(argument.to_string()),
            response,
        });
        self
    }

    /// Commands received so far, in invocation order
    pub fn calls(&self) -> Vec<ProbeCommand> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn response_for(&self, command: &ProbeCommand) -> MockResponse {
        self.rules
            .iter()
            .rev()
            .find(|rule| {
                rule.program == command.program
                    && rule
                        .argument
                        .as_ref()
                        .map_or(true, |argument| command.args.contains(argument))
            })
            .map(|rule| rule.response.clone())
            .unwrap_or(MockResponse::NotFound)
    }
}

#[async_trait]
impl ProbeInvoker for MockProbeInvoker {
    async fn invoke(&self, command: &ProbeCommand, timeout: Duration) -> Result<ProbeOutput, ProbeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }

        match self.response_for(command) {
            MockResponse::NotFound => Err(ProbeError::NotFound {
                program: command.program.clone(),
            }),
            MockResponse::Hang => {
                tokio::time::sleep(timeout).await;
                Err(ProbeError::Timeout {
                    program: command.program.clone(),
                    timeout,
                })
            }
            MockResponse::Output {
                stdout,
                exit_code,
                delay,
            } => {
                if delay >= timeout {
                    tokio::time::sleep(timeout).await;
                    return Err(ProbeError::Timeout {
                        program: command.program.clone(),
                        timeout,
                    });
                }
                tokio::time::sleep(delay).await;
                Ok(ProbeOutput {
                    stdout,
                    stderr: String::new(),
                    exit_code: Some(exit_code),
                    duration: delay,
                })
            }
        }
    }
}

/// Fixed metric values; every query can be switched to a failure
#[derive(Debug, Clone)]
pub struct MockMetricProvider {
    pub hostname: Result<String, ProviderError>,
    pub uptime: Result<Uptime, ProviderError>,
    pub cpu_load_percent: Result<f64, ProviderError>,
    pub memory: Result<MemoryUsage, ProviderError>,
    pub disks: Result<Vec<DiskInfo>, ProviderError>,
    pub interface_counters: Result<Vec<InterfaceCounters>, ProviderError>,
    pub adapters: Result<Vec<AdapterInfo>, ProviderError>,
}

impl Default for MockMetricProvider {
    fn default() -> Self {
        Self {
            hostname: Ok("diag-host".to_string()),
            uptime: Ok(Uptime(Duration::from_secs(93_784))),
            cpu_load_percent: Ok(12.5),
            memory: Ok(MemoryUsage::new(16_384, 6_144)),
            disks: Ok(vec![
                DiskInfo::new("C:", Gigabytes::from_hundredths(31_250), Gigabytes::from_hundredths(16_375)),
                DiskInfo::new("D:", Gigabytes::from_hundredths(1_000), Gigabytes::from_hundredths(92_163)),
            ]),
            interface_counters: Ok(vec![InterfaceCounters {
                name: "Ethernet".to_string(),
                received_bytes: 1_234_567_890,
                transmitted_bytes: 98_765_432,
            }]),
            adapters: Ok(vec![AdapterInfo {
                name: "Ethernet".to_string(),
                description: "Intel(R) Ethernet Connection I219-V".to_string(),
                mac_address: "00-1A-2B-3C-4D-5E".to_string(),
                link_speed: LinkSpeed::Mbps(1000),
                connection_type: "802.3".to_string(),
                status: "Up".to_string(),
            }]),
        }
    }
}

impl MockMetricProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query fails
    pub fn failing() -> Self {
        let fail = |metric: &str| ProviderError::unsupported(metric);
        Self {
            hostname: Err(fail("hostname")),
            uptime: Err(fail("uptime")),
            cpu_load_percent: Err(fail("cpu load")),
            memory: Err(fail("memory")),
            disks: Err(fail("disks")),
            interface_counters: Err(fail("interface counters")),
            adapters: Err(fail("adapters")),
        }
    }

    pub fn with_disks(mut self, disks: Vec<DiskInfo>) -> Self {
        self.disks = Ok(disks);
        self
    }
}

#[async_trait]
impl MetricProvider for MockMetricProvider {
    async fn hostname(&self) -> Result<String, ProviderError> {
        self.hostname.clone()
    }

    async fn uptime(&self) -> Result<Uptime, ProviderError> {
        self.uptime.clone()
    }

    async fn cpu_load_percent(&self) -> Result<f64, ProviderError> {
        self.cpu_load_percent.clone()
    }

    async fn memory(&self) -> Result<MemoryUsage, ProviderError> {
        self.memory.clone()
    }

    async fn disks(&self) -> Result<Vec<DiskInfo>, ProviderError> {
        self.disks.clone()
    }

    async fn interface_counters(&self) -> Result<Vec<InterfaceCounters>, ProviderError> {
        self.interface_counters.clone()
    }

    async fn adapters(&self) -> Result<Vec<AdapterInfo>, ProviderError> {
        self.adapters.clone()
    }
}

/// Tool output generators in the Linux formats
pub mod samples {
    /// `ping` output with one reply per entry of `times_ms`
    pub fn ping(target: &str, times_ms: &[f64]) -> String {
        let mut out = format!("PING {0} ({0}) 56(84) bytes of data.\n", target);
        for (seq, time) in times_ms.iter().enumerate() {
            out.push_str(&format!(
                "64 bytes from {}: icmp_seq={} ttl=57 time={} ms\n",
                target,
                seq + 1,
                time
            ));
        }
        out.push_str(&format!(
            "\n--- {} ping statistics ---\n{} packets transmitted, {} received\n",
            target,
            times_ms.len(),
            times_ms.len()
        ));
        out
    }

    /// `nslookup` answer listing `addresses` for `name`
    pub fn nslookup(name: &str, addresses: &[&str]) -> String {
        let mut out = String::from("Server:\t\t127.0.0.53\nAddress:\t127.0.0.53#53\n\nNon-authoritative answer:\n");
        for address in addresses {
            out.push_str(&format!("Name:\t{}\nAddress: {}\n", name, address));
        }
        out
    }

    /// `traceroute` output with `hops` responding hops
    pub fn traceroute(target: &str, hops: usize) -> String {
        let mut out = format!("traceroute to {0} ({0}), 30 hops max, 60 byte packets\n", target);
        for hop in 1..=hops {
            out.push_str(&format!(" {}  10.0.{}.1  {}.000 ms\n", hop, hop, hop * 2));
        }
        out
    }

    pub const SPEEDTEST: &str = "
   Speedtest by Ookla

      Server: Example ISP - Stockholm (id: 18335)
    Download:   512.34 Mbps (data used: 600.1 MB)
      Upload:    98.76 Mbps (data used: 110.4 MB)
";

    pub const WLAN_CONNECTED: &str = "    Name                   : Wi-Fi
    State                  : connected
    SSID                   : HomeNetwork
    BSSID                  : 10:20:30:40:50:60
    Signal                 : 92%
";

    pub const WLAN_DISCONNECTED: &str = "    Name                   : Wi-Fi
    State                  : disconnected
";

    pub const IP_CONFIG: &str = "1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN
    inet 127.0.0.1/8 scope host lo
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc fq_codel state UP
    inet 192.168.1.20/24 brd 192.168.1.255 scope global eth0
";
}

/// Serializes unit tests that touch process-wide state (environment, color override)
#[cfg(test)]
pub(crate) fn global_state_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
