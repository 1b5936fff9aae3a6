//! Hop counting over traceroute and tracert output

use super::cached_regex;
use regex::Regex;
use std::sync::OnceLock;

static HOP_LINE: OnceLock<Regex> = OnceLock::new();

/// Highest hop number listed, `None` when the output has no hop lines
pub fn parse_hop_count(text: &str) -> Option<usize> {
    let re = cached_regex(&HOP_LINE, r"(?m)^[ \t]*(\d+)[ \t]+\S");

    re.captures_iter(text)
        .filter_map(|caps| caps[1].parse::<usize>().ok())
        .max()
}
