//! Throughput extraction from speedtest CLI output

use crate::models::SpeedtestResult;

/// Placeholder for a throughput value the tool did not report
pub const MISSING_VALUE: &str = "N/A";

/// Text following `label` on the first line that contains it.
///
/// The label match is case-sensitive. Returns `None` when no line carries
/// the label.
pub fn extract_labeled_value(text: &str, label: &str) -> Option<String> {
    text.lines()
        .find_map(|line| line.find(label).map(|pos| line[pos + label.len()..].trim().to_string()))
}

/// Download and upload values, `N/A` for whichever is missing
pub fn parse_speedtest(text: &str) -> SpeedtestResult {
    let value = |label| extract_labeled_value(text, label).unwrap_or_else(|| MISSING_VALUE.to_string());

    SpeedtestResult {
        download: value("Download:"),
        upload: value("Upload:"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OOKLA_OUTPUT: &str = "
   Speedtest by Ookla

      Server: Example ISP - Stockholm (id: 18335)
         ISP: Example Broadband
Idle Latency:     3.12 ms   (jitter: 0.21ms, low: 2.98ms, high: 3.40ms)
    Download:   512.34 Mbps (data used: 600.1 MB)
      Upload:    98.76 Mbps (data used: 110.4 MB)
 Packet Loss:     0.0%
  Result URL: https://www.speedtest.net/result/c/00000000-0000-0000-0000-000000000000
";

    #[test]
    fn test_ookla_output() {
        let result = parse_speedtest(OOKLA_OUTPUT);
        assert_eq!(result.download, "512.34 Mbps (data used: 600.1 MB)");
        assert_eq!(result.upload, "98.76 Mbps (data used: 110.4 MB)");
    }

    #[test]
    fn test_missing_upload() {
        let result = parse_speedtest("Download: 100 Mbps\n[error] Upload test failed\n");
        assert_eq!(result.download, "100 Mbps");
        assert_eq!(result.upload, "N/A");
    }

    #[test]
    fn test_label_is_case_sensitive() {
        assert_eq!(extract_labeled_value("download: 5 Mbps", "Download:"), None);
    }

    #[test]
    fn test_first_matching_line_wins() {
        let text = "Download: 1 Mbps\nDownload: 2 Mbps\n";
        assert_eq!(extract_labeled_value(text, "Download:").as_deref(), Some("1 Mbps"));
    }

    #[test]
    fn test_empty_output() {
        let result = parse_speedtest("");
        assert_eq!(result.download, MISSING_VALUE);
        assert_eq!(result.upload, MISSING_VALUE);
    }
}
