//! Round-trip time statistics for latency probes

use serde::{Deserialize, Serialize};

/// Aggregate of the individual replies of one ping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingStatistics {
    /// Echo requests sent (the configured attempt count)
    pub sent: u32,
    /// Replies with a round-trip time
    pub received: u32,
    /// Percentage of requests without a reply
    pub loss_percent: f64,
    /// Arithmetic mean of the reply times; `None` with zero replies
    pub average_ms: Option<f64>,
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
}

impl PingStatistics {
    /// Statistics for a run that produced no replies at all
    pub fn empty() -> Self {
        Self {
            sent: 0,
            received: 0,
            loss_percent: 100.0,
            average_ms: None,
            min_ms: None,
            max_ms: None,
        }
    }

    /// Compute statistics from per-reply round-trip times.
    ///
    /// `sent` is raised to the number of samples when the tool reported more
    /// replies than requested (duplicates).
    pub fn from_samples(sent: u32, samples: &[f64]) -> Self {
        let received = samples.len() as u32;
        let sent = sent.max(received);

        if samples.is_empty() {
            return Self { sent, ..Self::empty() };
        }

        let sum: f64 = samples.iter().sum();
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let loss_percent = if sent == 0 {
            0.0
        } else {
            round2((sent - received) as f64 / sent as f64 * 100.0)
        };

        Self {
            sent,
            received,
            loss_percent,
            average_ms: Some(round2(sum / samples.len() as f64)),
            min_ms: Some(min),
            max_ms: Some(max),
        }
    }

    /// Format the average for display
    pub fn format_average(&self) -> String {
        match self.average_ms {
            Some(avg) => format!("{:.2}ms", avg),
            None => "no reply".to_string(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_samples() {
        let stats = PingStatistics::from_samples(4, &[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(stats.average_ms, Some(25.0));
        assert_eq!(stats.min_ms, Some(10.0));
        assert_eq!(stats.max_ms, Some(40.0));
        assert_eq!(stats.loss_percent, 0.0);
    }

    #[test]
    fn test_partial_loss() {
        let stats = PingStatistics::from_samples(15, &[18.0; 12]);
        assert_eq!(stats.received, 12);
        assert_eq!(stats.loss_percent, 20.0);
        assert_eq!(stats.average_ms, Some(18.0));
    }

    #[test]
    fn test_no_replies() {
        let stats = PingStatistics::from_samples(15, &[]);
        assert_eq!(stats.sent, 15);
        assert_eq!(stats.received, 0);
        assert_eq!(stats.average_ms, None);
        assert_eq!(stats.loss_percent, 100.0);
        assert_eq!(stats.format_average(), "no reply");
    }

    #[test]
    fn test_duplicate_replies_raise_sent() {
        let stats = PingStatistics::from_samples(2, &[1.0, 1.0, 1.0]);
        assert_eq!(stats.sent, 3);
        assert_eq!(stats.loss_percent, 0.0);
    }
}
