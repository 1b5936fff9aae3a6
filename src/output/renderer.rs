//! Live view and report document rendering
//!
//! Both renderings format every shared field through the same functions
//! in this module, so a value never reads differently on the console and
//! in the report. The live view carries derived fields only; the document
//! adds the raw tool output.

use super::table::{Column, RowData, TableFormat};
use crate::models::{
    AdapterInfo, DiskInfo, InterfaceCounters, Metric, ProbeDetails, ProbeResult, Summary,
};
use crate::types::{LatencyRating, ProbeKind};

/// Report title, first line of both renderings
pub const REPORT_TITLE: &str = "Network Diagnostic Report";

/// Presentation hint for a console line; never changes its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Normal,
    Good,
    Warning,
    Bad,
    Muted,
}

impl Tone {
    fn for_rating(rating: LatencyRating) -> Self {
        match rating {
            LatencyRating::Excellent | LatencyRating::Good => Tone::Good,
            LatencyRating::Acceptable | LatencyRating::Poor => Tone::Warning,
            LatencyRating::Bad => Tone::Bad,
        }
    }

    fn for_metric<T>(metric: &Metric<T>) -> Self {
        if metric.is_available() {
            Tone::Normal
        } else {
            Tone::Muted
        }
    }
}

/// One line of the live view
#[derive(Debug, Clone, PartialEq)]
pub struct LiveLine {
    pub tone: Tone,
    pub text: String,
}

impl LiveLine {
    fn new<S: Into<String>>(tone: Tone, text: S) -> Self {
        Self { tone, text: text.into() }
    }
}

/// Renders a [`Summary`] for the console and for the persisted report
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_live(&self, summary: &Summary) -> Vec<LiveLine> {
        let mut lines = Vec::new();
        let mut push = |tone: Tone, text: String| lines.push(LiveLine::new(tone, text));

        for line in banner() {
            push(Tone::Heading, line);
        }
        push(Tone::Normal, generated_line(summary));
        push(Tone::for_metric(&summary.hostname), hostname_line(summary));
        push(Tone::for_metric(&summary.uptime), uptime_line(summary));

        push(Tone::Heading, section("System Performance"));
        push(Tone::for_metric(&summary.cpu_load_percent), cpu_line(summary));
        push(Tone::for_metric(&summary.memory), memory_line(summary));

        push(Tone::Heading, section("Disk Usage"));
        for line in disk_lines(&summary.disks) {
            push(Tone::for_metric(&summary.disks), line);
        }

        push(Tone::Heading, section("WiFi"));
        for line in wifi_lines(summary) {
            push(Tone::for_metric(&summary.wifi), line);
        }

        push(Tone::Heading, section("Target Probes"));
        for target in &summary.targets {
            for probe in summary.probes_for(target) {
                push(probe_tone(probe), probe_line(probe));
            }
        }

        push(Tone::Heading, section("Speedtest"));
        for line in speedtest_lines(summary) {
            push(Tone::for_metric(&summary.speedtest), line);
        }

        push(Tone::Heading, section("Adapter Link Speed"));
        for line in link_speed_lines(&summary.adapters) {
            push(Tone::for_metric(&summary.adapters), line);
        }

        push(Tone::Heading, section("Interface Throughput"));
        for line in interface_lines(&summary.interfaces) {
            push(Tone::for_metric(&summary.interfaces), line);
        }

        push(Tone::Heading, section("Run Summary"));
        for (kind, line) in tally_lines(summary) {
            let tally = summary.tally(kind);
            let tone = if tally.succeeded == tally.total { Tone::Good } else { Tone::Warning };
            push(tone, line);
        }

        lines
    }

    pub fn render_document(&self, summary: &Summary) -> String {
        let mut out: Vec<String> = banner();
        out.push(generated_line(summary));
        out.push(hostname_line(summary));
        out.push(uptime_line(summary));

        out.push(String::new());
        out.push(section("System Performance"));
        out.push(cpu_line(summary));
        out.push(memory_line(summary));

        out.push(String::new());
        out.push(section("Disk Usage"));
        out.extend(disk_lines(&summary.disks));

        out.push(String::new());
        out.push(section("IP Configuration"));
        match &summary.ip_config {
            Metric::Available(text) => out.extend(text.trim_end().lines().map(str::to_string)),
            unavailable => out.push(unavailable.display_with(|_| String::new())),
        }

        out.push(String::new());
        out.push(section("MAC Addresses"));
        out.extend(mac_lines(&summary.adapters));

        out.push(String::new());
        out.push(section("Adapter Link Speed"));
        out.extend(link_speed_lines(&summary.adapters));

        out.push(String::new());
        out.push(section("Interface Throughput"));
        out.extend(interface_lines(&summary.interfaces));

        out.push(String::new());
        out.push(section("WiFi"));
        out.extend(wifi_lines(summary));

        out.push(String::new());
        out.push(section("Target Probes"));
        for target in &summary.targets {
            for probe in summary.probes_for(target) {
                out.push(probe_line(probe));
                let raw = probe.raw_output.trim_end();
                if !raw.is_empty() {
                    out.extend(raw.lines().map(str::to_string));
                }
                out.push(String::new());
            }
        }

        out.push(section("Speedtest"));
        out.extend(speedtest_lines(summary));

        out.push(String::new());
        out.push(section("Adapter Details"));
        out.extend(adapter_detail_lines(&summary.adapters));

        out.push(String::new());
        out.push(section("Run Summary"));
        out.extend(tally_lines(summary).into_iter().map(|(_, line)| line));

        let mut document = out.join("\n");
        document.push('\n');
        document
    }
}

fn banner() -> Vec<String> {
    let border = "=".repeat(REPORT_TITLE.len() + 4);
    vec![border.clone(), format!("  {}", REPORT_TITLE), border]
}

fn section(title: &str) -> String {
    format!("--- {} ---", title)
}

fn generated_line(summary: &Summary) -> String {
    format!("Generated: {}", summary.generated_at.format("%Y-%m-%d %H:%M:%S"))
}

fn hostname_line(summary: &Summary) -> String {
    format!("Hostname: {}", summary.hostname.display_with(|name| name.clone()))
}

fn uptime_line(summary: &Summary) -> String {
    format!("Uptime: {}", summary.uptime.display_with(|uptime| uptime.to_string()))
}

fn cpu_line(summary: &Summary) -> String {
    format!("CPU Load: {}", summary.cpu_load_percent.display_with(|load| format!("{:.2}%", load)))
}

fn memory_line(summary: &Summary) -> String {
    let value = summary.memory.display_with(|memory| {
        format!(
            "{} MB used of {} MB ({:.2}%), {} MB free",
            memory.used_mb, memory.total_mb, memory.percent, memory.free_mb
        )
    });
    format!("Memory: {}", value)
}

fn disk_lines(disks: &Metric<Vec<DiskInfo>>) -> Vec<String> {
    match disks {
        Metric::Available(disks) => {
            let rows: Vec<RowData> = disks
                .iter()
                .map(|disk| {
                    vec![
                        disk.volume_name.clone(),
                        disk.used_gb.to_string(),
                        disk.free_gb.to_string(),
                        disk.total_gb.to_string(),
                    ]
                })
                .collect();
            TableFormat::new(vec![
                Column::left("Volume"),
                Column::right("Used (GB)"),
                Column::right("Free (GB)"),
                Column::right("Total (GB)"),
            ])
            .render(&rows)
        }
        Metric::Unavailable(reason) => vec![format!("Disks: unavailable ({})", reason)],
    }
}

fn wifi_lines(summary: &Summary) -> Vec<String> {
    match &summary.wifi {
        Metric::Available(wifi) => vec![
            format!("SSID: {}", wifi.ssid),
            format!("Signal: {}", wifi.signal_percent),
        ],
        Metric::Unavailable(reason) => vec![format!("WiFi: unavailable ({})", reason)],
    }
}

fn probe_tone(probe: &ProbeResult) -> Tone {
    match (&probe.details, probe.succeeded) {
        (ProbeDetails::Ping { rating, .. }, _) => Tone::for_rating(*rating),
        (_, true) => Tone::Good,
        (_, false) if probe.error_detail.as_deref() == Some(crate::diagnostics::SKIPPED) => Tone::Muted,
        (_, false) => Tone::Bad,
    }
}

/// Derived one-line summary of a probe result
pub fn probe_line(probe: &ProbeResult) -> String {
    let target = &probe.target;
    let mut line = match &probe.details {
        ProbeDetails::Dns { addresses } => {
            if addresses.is_empty() {
                format!("{} {}: {}", ProbeKind::DnsLookup, target, status_word(probe))
            } else {
                format!("{} {}: {} ({})", ProbeKind::DnsLookup, target, status_word(probe), addresses.join(", "))
            }
        }
        ProbeDetails::Ping { statistics, rating } => format!(
            "{} {}: average {}, {}/{} replies, {:.1}% loss, rating {}",
            ProbeKind::Ping,
            target,
            statistics.format_average(),
            statistics.received,
            statistics.sent,
            statistics.loss_percent,
            rating
        ),
        ProbeDetails::Traceroute { hops } => match hops {
            Some(hops) => format!("{} {}: {} hops", ProbeKind::Traceroute, target, hops),
            None => format!("{} {}: {}", ProbeKind::Traceroute, target, status_word(probe)),
        },
    };

    if let Some(detail) = &probe.error_detail {
        line.push_str(&format!(" [{}]", detail));
    }
    line
}

fn status_word(probe: &ProbeResult) -> &'static str {
    if probe.succeeded {
        "ok"
    } else {
        "failed"
    }
}

fn speedtest_lines(summary: &Summary) -> Vec<String> {
    match &summary.speedtest {
        Metric::Available(result) => vec![
            format!("Download: {}", result.download),
            format!("Upload: {}", result.upload),
        ],
        Metric::Unavailable(reason) => vec![format!("Speedtest: unavailable ({})", reason)],
    }
}

fn mac_lines(adapters: &Metric<Vec<AdapterInfo>>) -> Vec<String> {
    match adapters {
        Metric::Available(adapters) => adapters
            .iter()
            .map(|adapter| format!("{}: {}", adapter.name, adapter.mac_address))
            .collect(),
        Metric::Unavailable(reason) => vec![format!("Adapters: unavailable ({})", reason)],
    }
}

fn link_speed_lines(adapters: &Metric<Vec<AdapterInfo>>) -> Vec<String> {
    match adapters {
        Metric::Available(adapters) => {
            let rows: Vec<RowData> = adapters
                .iter()
                .map(|adapter| vec![adapter.name.clone(), adapter.link_speed.to_string()])
                .collect();
            TableFormat::new(vec![Column::left("Adapter"), Column::right("Link Speed")]).render(&rows)
        }
        Metric::Unavailable(reason) => vec![format!("Adapters: unavailable ({})", reason)],
    }
}

fn interface_lines(interfaces: &Metric<Vec<InterfaceCounters>>) -> Vec<String> {
    match interfaces {
        Metric::Available(interfaces) => {
            let rows: Vec<RowData> = interfaces
                .iter()
                .map(|counters| {
                    vec![
                        counters.name.clone(),
                        counters.received_bytes.to_string(),
                        counters.transmitted_bytes.to_string(),
                    ]
                })
                .collect();
            TableFormat::new(vec![
                Column::left("Interface"),
                Column::right("Received (bytes)"),
                Column::right("Sent (bytes)"),
            ])
            .render(&rows)
        }
        Metric::Unavailable(reason) => vec![format!("Interfaces: unavailable ({})", reason)],
    }
}

fn adapter_detail_lines(adapters: &Metric<Vec<AdapterInfo>>) -> Vec<String> {
    match adapters {
        Metric::Available(adapters) => adapters
            .iter()
            .flat_map(|adapter| {
                vec![
                    format!("Name: {}", adapter.name),
                    format!("  Description: {}", adapter.description),
                    format!("  MAC Address: {}", adapter.mac_address),
                    format!("  Link Speed: {}", adapter.link_speed),
                    format!("  Connection Type: {}", adapter.connection_type),
                    format!("  Status: {}", adapter.status),
                ]
            })
            .collect(),
        Metric::Unavailable(reason) => vec![format!("Adapters: unavailable ({})", reason)],
    }
}

fn tally_lines(summary: &Summary) -> Vec<(ProbeKind, String)> {
    ProbeKind::ORDERED
        .iter()
        .map(|kind| {
            let tally = summary.tally(*kind);
            (*kind, format!("{}: {}/{} succeeded", kind, tally.succeeded, tally.total))
        })
        .collect()
}
