//! Pure text-extraction functions over raw probe output
//!
//! None of these fail: a missing pattern yields the documented default
//! (an empty list, `None`, or a placeholder string). Samples of the tool
//! formats each parser understands live in its tests.

pub mod adapter;
pub mod dns;
pub mod ping;
pub mod speedtest;
pub mod traceroute;
pub mod wlan;

pub use adapter::{parse_adapter_json, parse_link_speed};
pub use dns::parse_resolved_addresses;
pub use ping::{parse_ping, parse_round_trip_times};
pub use speedtest::{extract_labeled_value, parse_speedtest};
pub use traceroute::parse_hop_count;
pub use wlan::parse_wifi_state;

use regex::Regex;
use std::sync::OnceLock;

/// Compile a built-in pattern once
pub(crate) fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern is valid"))
}
