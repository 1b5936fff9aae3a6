//! WLAN interface state parsing

use super::cached_regex;
use crate::models::summary::{WifiState, NO_WIFI_SIGNAL, NO_WIFI_SSID};
use regex::Regex;
use std::sync::OnceLock;

static SSID: OnceLock<Regex> = OnceLock::new();
static SIGNAL: OnceLock<Regex> = OnceLock::new();
static ACTIVE: OnceLock<Regex> = OnceLock::new();

/// Extract SSID and signal strength from key:value lines.
///
/// Keys match case-insensitively and the first match wins. `BSSID` lines
/// never match the SSID key. A bare numeric signal gets a `%` suffix.
/// When the text is a list of networks with an `ACTIVE:` key, only the
/// active block is considered.
pub fn parse_wifi_state(text: &str) -> WifiState {
    let text = active_block(text);

    let ssid_re = cached_regex(&SSID, r"(?im)^[ \t]*SSID[ \t]*:[ \t]*(\S.*?)[ \t]*\r?$");
    let signal_re = cached_regex(&SIGNAL, r"(?im)^[ \t]*Signal[ \t]*:[ \t]*(\S.*?)[ \t]*\r?$");

    let ssid = ssid_re
        .captures(text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| NO_WIFI_SSID.to_string());

    let signal_percent = signal_re
        .captures(text)
        .map(|caps| normalize_signal(&caps[1]))
        .unwrap_or_else(|| NO_WIFI_SIGNAL.to_string());

    WifiState { ssid, signal_percent }
}

fn normalize_signal(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        format!("{}%", value)
    } else {
        value.to_string()
    }
}

/// Narrow a multi-network listing to the block whose `ACTIVE` value is yes
fn active_block(text: &str) -> &str {
    let active_re = cached_regex(&ACTIVE, r"(?im)^[ \t]*ACTIVE[ \t]*:[ \t]*(\S*)");

    let starts: Vec<(usize, bool)> = active_re
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let active = caps[1].eq_ignore_ascii_case("yes");
            Some((start, active))
        })
        .collect();

    if starts.is_empty() {
        return text;
    }

    for (index, (start, active)) in starts.iter().enumerate() {
        if *active {
            let end = starts.get(index + 1).map(|(next, _)| *next).unwrap_or(text.len());
            return &text[*start..end];
        }
    }

    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETSH_CONNECTED: &str = "\r
There is 1 interface on the system: \r
\r
    Name                   : Wi-Fi\r
    Description            : Intel(R) Wi-Fi 6 AX201 160MHz\r
    GUID                   : 2a1f7c2b-8d1e-4e5b-9a0c-1f2e3d4c5b6a\r
    Physical address       : a4:b1:c1:d2:e3:f4\r
    State                  : connected\r
    SSID                   : HomeNetwork\r
    BSSID                  : 10:20:30:40:50:60\r
    Network type           : Infrastructure\r
    Radio type             : 802.11ax\r
    Authentication         : WPA2-Personal\r
    Channel                : 36\r
    Receive rate (Mbps)    : 1201\r
    Transmit rate (Mbps)   : 1201\r
    Signal                 : 92%\r
    Profile                : HomeNetwork\r
";

    const NETSH_DISCONNECTED: &str = "
There is 1 interface on the system:

    Name                   : Wi-Fi
    Description            : Intel(R) Wi-Fi 6 AX201 160MHz
    State                  : disconnected
    Radio status           : Hardware On
                             Software On
";

    const NMCLI_MULTILINE: &str = "ACTIVE:                                  no
SSID:                                    Neighbour
SIGNAL:                                  40
ACTIVE:                                  yes
SSID:                                    Office-5G
SIGNAL:                                  78
";

    #[test]
    fn test_netsh_connected() {
        let state = parse_wifi_state(NETSH_CONNECTED);
        assert_eq!(state.ssid, "HomeNetwork");
        assert_eq!(state.signal_percent, "92%");
    }

    #[test]
    fn test_netsh_disconnected_yields_defaults() {
        let state = parse_wifi_state(NETSH_DISCONNECTED);
        assert_eq!(state.ssid, "No active WiFi connections detected");
        assert_eq!(state.signal_percent, "N/A");
    }

    #[test]
    fn test_no_wireless_interface() {
        let state = parse_wifi_state("There is no wireless interface on the system.\n");
        assert_eq!(state, WifiState::disconnected());
    }

    #[test]
    fn test_bssid_does_not_match_ssid() {
        let state = parse_wifi_state("    BSSID : 10:20:30:40:50:60\n");
        assert_eq!(state.ssid, "No active WiFi connections detected");
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let state = parse_wifi_state("ssid: lower\nsignal: 55%\n");
        assert_eq!(state.ssid, "lower");
        assert_eq!(state.signal_percent, "55%");
    }

    #[test]
    fn test_first_match_wins() {
        let state = parse_wifi_state("SSID : first\nSSID : second\n");
        assert_eq!(state.ssid, "first");
    }

    #[test]
    fn test_nmcli_active_block_selected() {
        let state = parse_wifi_state(NMCLI_MULTILINE);
        assert_eq!(state.ssid, "Office-5G");
        assert_eq!(state.signal_percent, "78%");
    }

    #[test]
    fn test_nmcli_without_active_network() {
        let text = "ACTIVE: no\nSSID: Neighbour\nSIGNAL: 40\n";
        assert_eq!(parse_wifi_state(text), WifiState::disconnected());
    }

    #[test]
    fn test_airport_output_without_signal() {
        let text = "     agrCtlRSSI: -52\n          state: running\n           SSID: CafeWifi\n";
        let state = parse_wifi_state(text);
        assert_eq!(state.ssid, "CafeWifi");
        assert_eq!(state.signal_percent, "N/A");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_wifi_state(""), WifiState::disconnected());
    }
}
