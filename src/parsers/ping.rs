//! Round-trip time extraction from ping output

use super::cached_regex;
use crate::stats::PingStatistics;
use regex::Regex;
use std::sync::OnceLock;

static REPLY_TIME: OnceLock<Regex> = OnceLock::new();

/// Per-reply round-trip times in milliseconds, in output order.
///
/// Matches `time=12.3 ms` (Unix) as well as `time=12ms` and `time<1ms`
/// (Windows). A `<1ms` reply counts as 1ms. The Unix summary line
/// (`time 14021ms`) has no relation sign and is ignored.
pub fn parse_round_trip_times(text: &str) -> Vec<f64> {
    let re = cached_regex(&REPLY_TIME, r"(?i)\btime\s*[=<]\s*(\d+(?:\.\d+)?)\s*ms");

    re.captures_iter(text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .collect()
}

/// Statistics for a ping run of `sent` echo requests
pub fn parse_ping(text: &str, sent: u32) -> PingStatistics {
    PingStatistics::from_samples(sent, &parse_round_trip_times(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_PING: &str = "\r
Pinging 8.8.8.8 with 32 bytes of data:\r
Reply from 8.8.8.8: bytes=32 time=14ms TTL=117\r
Reply from 8.8.8.8: bytes=32 time=16ms TTL=117\r
Request timed out.\r
Reply from 8.8.8.8: bytes=32 time=15ms TTL=117\r
\r
Ping statistics for 8.8.8.8:\r
    Packets: Sent = 4, Received = 3, Lost = 1 (25% loss),\r
Approximate round trip times in milli-seconds:\r
    Minimum = 14ms, Maximum = 16ms, Average = 15ms\r
";

    const LINUX_PING: &str = "PING 1.1.1.1 (1.1.1.1) 56(84) bytes of data.
64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=10.4 ms
64 bytes from 1.1.1.1: icmp_seq=2 ttl=57 time=11.6 ms

--- 1.1.1.1 ping statistics ---
2 packets transmitted, 2 received, 0% packet loss, time 1001ms
rtt min/avg/max/mdev = 10.400/11.000/11.600/0.600 ms
";

    const UNREACHABLE: &str = "PING 10.255.255.1 (10.255.255.1) 56(84) bytes of data.

--- 10.255.255.1 ping statistics ---
4 packets transmitted, 0 received, 100% packet loss, time 3062ms
";

    #[test]
    fn test_windows_replies() {
        assert_eq!(parse_round_trip_times(WINDOWS_PING), vec![14.0, 16.0, 15.0]);

        let stats = parse_ping(WINDOWS_PING, 4);
        assert_eq!(stats.received, 3);
        assert_eq!(stats.loss_percent, 25.0);
        assert_eq!(stats.average_ms, Some(15.0));
    }

    #[test]
    fn test_linux_replies_ignore_summary() {
        assert_eq!(parse_round_trip_times(LINUX_PING), vec![10.4, 11.6]);
        assert_eq!(parse_ping(LINUX_PING, 2).average_ms, Some(11.0));
    }

    #[test]
    fn test_sub_millisecond_reply() {
        let text = "Reply from 192.168.1.1: bytes=32 time<1ms TTL=64";
        assert_eq!(parse_round_trip_times(text), vec![1.0]);
    }

    #[test]
    fn test_no_replies() {
        let stats = parse_ping(UNREACHABLE, 4);
        assert_eq!(stats.received, 0);
        assert_eq!(stats.average_ms, None);
        assert_eq!(stats.loss_percent, 100.0);
    }
}
