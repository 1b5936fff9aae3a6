//! Adapter enumeration without an external command

use crate::models::{AdapterInfo, LinkSpeed};
use crate::parsers::parse_link_speed;
use std::fs;
use std::io;
use std::path::Path;
use sysinfo::Networks;

/// Kernel view of network interfaces on Linux
pub const SYSFS_NET: &str = "/sys/class/net";

/// Read adapters that are up from a sysfs `class/net` directory, sorted by name.
///
/// Link speed comes from the `speed` attribute (Mbps); virtual and
/// wireless interfaces usually report none and are recorded as unknown.
pub fn read_sysfs_adapters(root: &Path) -> io::Result<Vec<AdapterInfo>> {
    let mut names: Vec<String> = fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let mut adapters = Vec::new();
    for name in names {
        let dir = root.join(&name);
        let status = read_attribute(&dir, "operstate").unwrap_or_default();
        if !status.eq_ignore_ascii_case("up") {
            continue;
        }

        let link_speed = read_attribute(&dir, "speed")
            .and_then(|speed| speed.parse::<i64>().ok())
            .filter(|speed| *speed > 0)
            .map(|speed| parse_link_speed(&format!("{} Mbps", speed)))
            .unwrap_or(LinkSpeed::Unknown);

        let connection_type = if dir.join("wireless").exists() {
            "Wireless"
        } else if dir.join("device").exists() {
            "Ethernet"
        } else {
            "Virtual"
        };

        let description = fs::read_link(dir.join("device").join("driver"))
            .ok()
            .and_then(|driver| driver.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| connection_type.to_lowercase());

        adapters.push(AdapterInfo {
            name,
            description,
            mac_address: read_attribute(&dir, "address").unwrap_or_default(),
            link_speed,
            connection_type: connection_type.to_string(),
            status: "Up".to_string(),
        });
    }

    Ok(adapters)
}

fn read_attribute(dir: &Path, attribute: &str) -> Option<String> {
    fs::read_to_string(dir.join(attribute))
        .ok()
        .map(|value| value.trim().to_string())
}

/// Interfaces that carried traffic since boot, for platforms without sysfs
pub fn active_network_adapters(networks: &Networks) -> Vec<AdapterInfo> {
    let mut adapters: Vec<AdapterInfo> = networks
        .iter()
        .filter(|(_, data)| data.total_received() > 0 || data.total_transmitted() > 0)
        .map(|(name, data)| AdapterInfo {
            name: name.clone(),
            description: name.clone(),
            mac_address: data.mac_address().to_string(),
            link_speed: LinkSpeed::Unknown,
            connection_type: "Unknown".to_string(),
            status: "Up".to_string(),
        })
        .collect();
    adapters.sort_by(|a, b| a.name.cmp(&b.name));
    adapters
}
