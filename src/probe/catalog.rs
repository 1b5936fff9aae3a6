//! Platform-specific command lines for every probe the collector runs

use super::ProbeCommand;
use crate::models::Target;
use std::path::Path;

/// Host platform family, selecting the tool set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Platform this binary was compiled for; other Unix systems use the Linux tool set
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
            Platform::MacOs => "macOS",
        }
    }
}

/// Builds the command line for each probe on a given platform
#[derive(Debug, Clone)]
pub struct ProbeCatalog {
    platform: Platform,
}

impl Default for ProbeCatalog {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

impl ProbeCatalog {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Full IP configuration dump
    pub fn ip_config(&self) -> ProbeCommand {
        match self.platform {
            Platform::Windows => ProbeCommand::new("ipconfig").arg("/all"),
            Platform::Linux => ProbeCommand::new("ip").args(["address", "show"]),
            Platform::MacOs => ProbeCommand::new("ifconfig").arg("-a"),
        }
    }

    /// Wireless interface state as key:value lines
    pub fn wlan(&self) -> ProbeCommand {
        match self.platform {
            Platform::Windows => ProbeCommand::new("netsh").args(["wlan", "show", "interfaces"]),
            Platform::Linux => ProbeCommand::new("nmcli").args([
                "-m", "multiline", "-f", "ACTIVE,SSID,SIGNAL", "device", "wifi", "list", "--rescan", "no",
            ]),
            Platform::MacOs => ProbeCommand::new(
                "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport",
            )
            .arg("-I"),
        }
    }

    /// A-record lookup
    pub fn dns_lookup(&self, target: &Target) -> ProbeCommand {
        ProbeCommand::new("nslookup").arg("-type=A").arg(target.as_str())
    }

    /// Latency probe with a fixed echo count
    pub fn ping(&self, target: &Target, count: u32) -> ProbeCommand {
        let count_flag = match self.platform {
            Platform::Windows => "-n",
            Platform::Linux | Platform::MacOs => "-c",
        };
        ProbeCommand::new("ping")
            .arg(count_flag)
            .arg(count.to_string())
            .arg(target.as_str())
    }

    /// Hop-path trace without reverse name resolution
    pub fn traceroute(&self, target: &Target) -> ProbeCommand {
        match self.platform {
            Platform::Windows => ProbeCommand::new("tracert")
                .args(["-d", "-h", "30", "-w", "1000"])
                .arg(target.as_str()),
            Platform::Linux | Platform::MacOs => ProbeCommand::new("traceroute")
                .args(["-n", "-m", "30", "-w", "1"])
                .arg(target.as_str()),
        }
    }

    /// Adapter enumeration as JSON; only Windows needs a tool for this
    pub fn adapter_enumeration(&self) -> Option<ProbeCommand> {
        match self.platform {
            Platform::Windows => Some(ProbeCommand::new("powershell").args([
                "-NoProfile",
                "-NonInteractive",
                "-Command",
                "Get-NetAdapter | Select-Object Name,InterfaceDescription,MacAddress,LinkSpeed,Speed,MediaType,Status | ConvertTo-Json -Compress",
            ])),
            Platform::Linux | Platform::MacOs => None,
        }
    }

    /// Third-party throughput test against a fixed server
    pub fn speedtest(&self, binary: &Path, server_id: &str) -> ProbeCommand {
        ProbeCommand::new(binary.to_string_lossy().into_owned())
            .arg(format!("--server-id={}", server_id))
            .args(["--accept-license", "--accept-gdpr"])
    }
}
