//! Property tests: the live view and the report document never disagree

use host_net_diag::{
    models::{DiskInfo, Gigabytes, Summary},
    output::ReportRenderer,
    probe::{Platform, ProbeCatalog},
    testing::{samples, MockMetricProvider, MockProbeInvoker, MockResponse},
    DiagnosticAggregator, LatencyRating, ProbeKind,
};
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Scenario {
    ping_times: Vec<f64>,
    wifi_connected: bool,
    disks: Vec<(u64, u64)>,
    metrics_fail: bool,
}

fn scenario() -> impl Strategy<Value = Scenario> {
    (
        prop::collection::vec(0.5f64..400.0, 0..15),
        any::<bool>(),
        prop::collection::vec((0u64..200_000, 0u64..200_000), 0..4),
        any::<bool>(),
    )
        .prop_map(|(ping_times, wifi_connected, disks, metrics_fail)| Scenario {
            ping_times,
            wifi_connected,
            disks,
            metrics_fail,
        })
}

fn run(scenario: &Scenario) -> Summary {
    let ping = if scenario.ping_times.is_empty() {
        MockResponse::failing("Request timed out.\n", 1)
    } else {
        MockResponse::stdout(samples::ping("9.9.9.9", &scenario.ping_times))
    };
    let wlan = if scenario.wifi_connected {
        "ACTIVE: yes\nSSID: Cafe\nSIGNAL: 55\n"
    } else {
        ""
    };
    let invoker = MockProbeInvoker::new()
        .on("nslookup", MockResponse::stdout(samples::nslookup("9.9.9.9", &["9.9.9.9"])))
        .on("ping", ping)
        .on("nmcli", MockResponse::stdout(wlan));

    let provider = if scenario.metrics_fail {
        MockMetricProvider::failing()
    } else {
        let disks = scenario
            .disks
            .iter()
            .enumerate()
            .map(|(i, (used, free))| {
                DiskInfo::new(format!("/mnt/{}", i), Gigabytes::from_hundredths(*used), Gigabytes::from_hundredths(*free))
            })
            .collect();
        MockMetricProvider::new().with_disks(disks)
    };

    let mut config = host_net_diag::Config {
        targets: vec!["9.9.9.9".to_string()],
        ping_count: 15,
        skip_speedtest: true,
        ..Default::default()
    };
    config.enable_color = false;

    let aggregator = DiagnosticAggregator::new(
        Arc::new(invoker),
        Arc::new(provider),
        ProbeCatalog::new(Platform::Linux),
        config,
    );
    tokio_test::block_on(aggregator.run())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn live_lines_appear_verbatim_in_document(scenario in scenario()) {
        let summary = run(&scenario);
        let renderer = ReportRenderer::new();
        let document = renderer.render_document(&summary);
        let document_lines: Vec<&str> = document.lines().collect();

        for line in renderer.render_live(&summary) {
            prop_assert!(
                document_lines.contains(&line.text.as_str()),
                "live line missing from document: {:?}",
                line.text
            );
        }
    }

    #[test]
    fn rating_follows_average(scenario in scenario()) {
        let summary = run(&scenario);
        let ping = summary.probes.iter().find(|p| p.kind == ProbeKind::Ping).unwrap();

        let expected = if scenario.ping_times.is_empty() {
            LatencyRating::Bad
        } else {
            let mean = scenario.ping_times.iter().sum::<f64>() / scenario.ping_times.len() as f64;
            LatencyRating::from_average(Some((mean * 100.0).round() / 100.0))
        };
        prop_assert_eq!(ping.rating(), Some(expected));
    }

    #[test]
    fn disk_totals_are_used_plus_free(scenario in scenario()) {
        let summary = run(&scenario);
        if let Some(disks) = summary.disks.available() {
            prop_assert_eq!(disks.len(), scenario.disks.len());
            for disk in disks {
                prop_assert_eq!(disk.total_gb.hundredths(), disk.used_gb.hundredths() + disk.free_gb.hundredths());
            }
        }
    }
}
