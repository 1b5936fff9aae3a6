//! Adapter descriptors: link speed text and Windows `Get-NetAdapter` JSON

use super::cached_regex;
use crate::models::{AdapterInfo, LinkSpeed};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

static MBPS: OnceLock<Regex> = OnceLock::new();

/// Parse a descriptor such as `1000 Mbps` or `866.7 Mbps`.
///
/// Only the Mbps unit is accepted; anything else, or a value that rounds
/// to zero, is `Unknown`.
pub fn parse_link_speed(descriptor: &str) -> LinkSpeed {
    let re = cached_regex(&MBPS, r"(\d+(?:\.\d+)?)\s*Mbps");

    re.captures(descriptor)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .map(|mbps| mbps.round() as u64)
        .filter(|mbps| *mbps > 0)
        .map(LinkSpeed::Mbps)
        .unwrap_or(LinkSpeed::Unknown)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NetAdapterRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    interface_description: Option<String>,
    #[serde(default)]
    mac_address: Option<String>,
    #[serde(default)]
    link_speed: Option<String>,
    /// Bits per second
    #[serde(default)]
    speed: Option<u64>,
    #[serde(default)]
    media_type: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// A single adapter is emitted as an object, several as an array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NetAdapterJson {
    Many(Vec<NetAdapterRecord>),
    One(NetAdapterRecord),
}

/// Decode `Get-NetAdapter | ConvertTo-Json` output, keeping adapters that are up.
///
/// Empty output means no adapters. Malformed JSON is an error.
pub fn parse_adapter_json(text: &str) -> Result<Vec<AdapterInfo>, serde_json::Error> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let records = match serde_json::from_str::<NetAdapterJson>(text)? {
        NetAdapterJson::Many(records) => records,
        NetAdapterJson::One(record) => vec![record],
    };

    Ok(records
        .into_iter()
        .filter(|record| {
            record
                .status
                .as_deref()
                .is_some_and(|status| status.eq_ignore_ascii_case("up"))
        })
        .map(|record| {
            let link_speed = match record.speed {
                Some(bits) if bits >= 1_000_000 => LinkSpeed::Mbps(bits / 1_000_000),
                _ => record
                    .link_speed
                    .as_deref()
                    .map(parse_link_speed)
                    .unwrap_or(LinkSpeed::Unknown),
            };

            AdapterInfo {
                name: record.name.unwrap_or_default(),
                description: record.interface_description.unwrap_or_default(),
                mac_address: record.mac_address.unwrap_or_default(),
                link_speed,
                connection_type: record.media_type.unwrap_or_else(|| "Unknown".to_string()),
                status: record.status.unwrap_or_default(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ADAPTERS: &str = r#"[{"Name":"Ethernet","InterfaceDescription":"Intel(R) Ethernet Connection I219-V","MacAddress":"00-1A-2B-3C-4D-5E","LinkSpeed":"1 Gbps","Speed":1000000000,"MediaType":"802.3","Status":"Up"},{"Name":"Wi-Fi","InterfaceDescription":"Intel(R) Wi-Fi 6 AX201 160MHz","MacAddress":"A4-B1-C1-D2-E3-F4","LinkSpeed":"0 bps","Speed":0,"MediaType":"Native 802.11","Status":"Disconnected"}]"#;

    #[test]
    fn test_link_speed_descriptors() {
        assert_eq!(parse_link_speed("1000 Mbps"), LinkSpeed::Mbps(1000));
        assert_eq!(parse_link_speed("866.7 Mbps"), LinkSpeed::Mbps(867));
        assert_eq!(parse_link_speed("100Mbps"), LinkSpeed::Mbps(100));
        assert_eq!(parse_link_speed("1 Gbps"), LinkSpeed::Unknown);
        assert_eq!(parse_link_speed(""), LinkSpeed::Unknown);
    }

    #[test]
    fn test_only_up_adapters_are_kept() {
        let adapters = parse_adapter_json(TWO_ADAPTERS).unwrap();
        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters[0].name, "Ethernet");
        assert_eq!(adapters[0].link_speed, LinkSpeed::Mbps(1000));
        assert_eq!(adapters[0].connection_type, "802.3");
    }

    #[test]
    fn test_single_object_output() {
        let json = r#"{"Name":"Ethernet 2","LinkSpeed":"100 Mbps","Status":"Up"}"#;
        let adapters = parse_adapter_json(json).unwrap();
        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters[0].link_speed, LinkSpeed::Mbps(100));
        assert_eq!(adapters[0].mac_address, "");
    }

    #[test]
    fn test_sub_megabit_speed_is_unknown() {
        let json = r#"{"Name":"Serial","LinkSpeed":"500 Kbps","Speed":500000,"Status":"Up"}"#;
        let adapters = parse_adapter_json(json).unwrap();
        assert_eq!(adapters[0].link_speed, LinkSpeed::Unknown);

        assert_eq!(parse_link_speed("0.4 Mbps"), LinkSpeed::Unknown);
        assert_eq!(parse_link_speed("0 Mbps"), LinkSpeed::Unknown);
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_adapter_json("  \r\n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(parse_adapter_json("Get-NetAdapter : not recognized").is_err());
    }
}
