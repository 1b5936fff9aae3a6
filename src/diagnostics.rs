//! Diagnostic run orchestration
//!
//! One run walks a fixed pipeline:
//! static info, per-target probe chains (DNS lookup, ping, rating,
//! traceroute), adapter info, performance info, speed test, finalize.
//! Every step is isolated: a failure becomes an unavailable field or a
//! failed probe result, and the run always reaches finalize.

use crate::{
    error::AppError,
    logging::{Logger, ProbeLogger, StepLogger},
    models::{
        AdapterInfo, Config, Metric, ProbeDetails, ProbeResult, SpeedtestResult, Summary, SummaryBuilder, Target,
        WifiState,
    },
    parsers::{parse_adapter_json, parse_hop_count, parse_ping, parse_resolved_addresses, parse_speedtest, parse_wifi_state},
    probe::{ProbeCatalog, ProbeCommand, ProbeError, ProbeInvoker, ProbeOutput},
    providers::{MetricProvider, ProviderError},
    types::{LatencyRating, ProbeKind},
};
use chrono::Local;
use futures::future::join_all;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;

/// Reason recorded for steps disabled by configuration
pub const SKIPPED: &str = "skipped";

/// Collects every metric and probe of one run into a [`Summary`]
pub struct DiagnosticAggregator {
    invoker: Arc<dyn ProbeInvoker>,
    provider: Arc<dyn MetricProvider>,
    catalog: ProbeCatalog,
    config: Config,
    limiter: Semaphore,
    logger: Logger,
    probe_logger: ProbeLogger,
}

impl DiagnosticAggregator {
    pub fn new(
        invoker: Arc<dyn ProbeInvoker>,
        provider: Arc<dyn MetricProvider>,
        catalog: ProbeCatalog,
        config: Config,
    ) -> Self {
        let limiter = Semaphore::new(config.concurrency.max(1));
        Self {
            logger: Logger::with_config("DIAG".to_string(), &config),
            probe_logger: ProbeLogger::new(&config),
            invoker,
            provider,
            catalog,
            config,
            limiter,
        }
    }

    /// Replace the default loggers, e.g. with ones sharing a session id
    pub fn with_loggers(mut self, logger: Logger, probe_logger: ProbeLogger) -> Self {
        self.logger = logger;
        self.probe_logger = probe_logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configured targets in order, each probed once
    pub fn targets(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = Vec::with_capacity(self.config.targets.len());
        for identifier in &self.config.targets {
            let target = Target::new(identifier.trim());
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }

    /// Run the whole pipeline with a private step logger
    pub async fn run(&self) -> Summary {
        let mut steps = StepLogger::new(&self.config);
        self.run_with_steps(&mut steps).await
    }

    pub async fn run_with_steps(&self, steps: &mut StepLogger) -> Summary {
        let started = std::time::Instant::now();
        let deadline = self.config.run_deadline().map(|limit| Instant::now() + limit);
        let targets = self.targets();
        let mut builder = SummaryBuilder::new(targets.clone());

        steps.start_step("static info").await;
        builder = self.collect_static_info(builder).await;
        steps.finish_step("static info", "hostname, uptime, ip configuration, wifi").await;

        steps.start_step("target probes").await;
        let probes = self.probe_targets(&targets, deadline, steps).await;
        let succeeded = probes.iter().filter(|probe| probe.succeeded).count();
        steps
            .finish_step("target probes", &format!("{}/{} probes succeeded", succeeded, probes.len()))
            .await;
        builder = builder.probes(probes);

        steps.start_step("adapter info").await;
        builder = builder.adapters(self.collect_adapters().await);
        steps.finish_step("adapter info", "done").await;

        steps.start_step("performance info").await;
        builder = self.collect_performance_info(builder).await;
        steps.finish_step("performance info", "cpu, memory, disks, interfaces").await;

        steps.start_step("speedtest").await;
        let speedtest = self.run_speedtest().await;
        let outcome = if speedtest.is_available() { "completed" } else { "unavailable" };
        builder = builder.speedtest(speedtest);
        steps.finish_step("speedtest", outcome).await;

        let summary = builder.build(Local::now());
        self.logger
            .info("Diagnostic run finished")
            .field("targets", summary.targets.len())
            .field("probes", summary.probes.len())
            .duration(started.elapsed())
            .log()
            .await;
        summary
    }

    async fn collect_static_info(&self, builder: SummaryBuilder) -> SummaryBuilder {
        let ip_command = self.catalog.ip_config();
        let wlan_command = self.catalog.wlan();
        let timeout = self.config.probe_timeout();

        let (hostname, uptime, ip_config, wlan) = tokio::join!(
            self.provider.hostname(),
            self.provider.uptime(),
            self.invoke(&ip_command, timeout, None, None, None),
            self.invoke(&wlan_command, timeout, None, None, None),
        );

        let ip_config = match ip_config {
            Ok(output) if output.success() => Metric::Available(output.combined_text()),
            Ok(output) => Metric::unavailable(format!("{} {}", ip_command.program, output.failure_reason())),
            Err(e) => Metric::unavailable(e.to_string()),
        };

        builder
            .hostname(self.provider_metric("hostname", hostname).await)
            .uptime(self.provider_metric("uptime", uptime).await)
            .ip_config(ip_config)
            .wifi(wifi_metric(wlan))
    }

    /// Run every target chain, at most `concurrency` at a time.
    ///
    /// Completions are reported as they happen; the returned results keep
    /// configured target order.
    async fn probe_targets(
        &self,
        targets: &[Target],
        deadline: Option<Instant>,
        steps: &StepLogger,
    ) -> Vec<ProbeResult> {
        let completed = AtomicUsize::new(0);
        let chains = targets.iter().map(|target| {
            let completed = &completed;
            async move {
                // The semaphore is never closed
                let _permit = self.limiter.acquire().await.ok();
                let results = self.probe_target(target, deadline).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                let succeeded = results.iter().filter(|probe| probe.succeeded).count();
                steps
                    .target_finished(target.as_str(), done, targets.len(), succeeded, results.len())
                    .await;
                results
            }
        });

        join_all(chains).await.into_iter().flatten().collect()
    }

    async fn probe_target(&self, target: &Target, deadline: Option<Instant>) -> Vec<ProbeResult> {
        let timeout = self.config.probe_timeout();

        let dns_command = self.catalog.dns_lookup(target);
        let dns = self
            .invoke(&dns_command, timeout, Some(ProbeKind::DnsLookup), Some(target), deadline)
            .await;
        let dns = dns_result(target, dns);

        let ping_command = self.catalog.ping(target, self.config.ping_count);
        let ping = self
            .invoke(&ping_command, timeout, Some(ProbeKind::Ping), Some(target), deadline)
            .await;
        let ping = ping_result(target, self.config.ping_count, ping);

        if let Some(rating) = ping.rating() {
            self.logger
                .debug(&format!("{} rated {}", target, rating))
                .field("target", target.as_str())
                .field("rating", rating.to_string())
                .log()
                .await;
        }

        let traceroute = if self.config.skip_traceroute {
            ProbeResult::failed(target.clone(), ProbeKind::Traceroute, String::new(), SKIPPED.to_string())
        } else {
            let command = self.catalog.traceroute(target);
            let outcome = self
                .invoke(&command, timeout, Some(ProbeKind::Traceroute), Some(target), deadline)
                .await;
            traceroute_result(target, outcome)
        };

        vec![dns, ping, traceroute]
    }

    async fn collect_adapters(&self) -> Metric<Vec<AdapterInfo>> {
        match self.catalog.adapter_enumeration() {
            Some(command) => match self.invoke(&command, self.config.probe_timeout(), None, None, None).await {
                Ok(output) if output.success() => match parse_adapter_json(&output.stdout) {
                    Ok(adapters) => Metric::Available(adapters),
                    Err(e) => Metric::unavailable(format!("unreadable adapter list: {}", e)),
                },
                Ok(output) => Metric::unavailable(format!("{} {}", command.program, output.failure_reason())),
                Err(e) => Metric::unavailable(e.to_string()),
            },
            None => self.provider_metric("adapters", self.provider.adapters().await).await,
        }
    }

    async fn collect_performance_info(&self, builder: SummaryBuilder) -> SummaryBuilder {
        let (cpu, memory, disks, interfaces) = tokio::join!(
            self.provider.cpu_load_percent(),
            self.provider.memory(),
            self.provider.disks(),
            self.provider.interface_counters(),
        );

        builder
            .cpu_load_percent(self.provider_metric("cpu load", cpu).await)
            .memory(self.provider_metric("memory", memory).await)
            .disks(self.provider_metric("disks", disks).await)
            .interfaces(self.provider_metric("interface counters", interfaces).await)
    }

    /// Downgrade a provider failure to an unavailable field, logging it
    async fn provider_metric<T>(&self, metric: &str, result: Result<T, ProviderError>) -> Metric<T> {
        if let Err(error) = &result {
            let failure = AppError::from(error.clone());
            self.logger
                .info(&format!("{} unavailable: {}", metric, error))
                .field("metric", metric)
                .error_info(&failure)
                .log()
                .await;
        }
        Metric::from_result(result)
    }

    async fn run_speedtest(&self) -> Metric<SpeedtestResult> {
        if self.config.skip_speedtest {
            return Metric::unavailable(SKIPPED);
        }

        let path = &self.config.speedtest_path;
        let command = self.catalog.speedtest(path, &self.config.speedtest_server_id);
        match self.invoke(&command, self.config.speedtest_timeout(), None, None, None).await {
            Ok(output) if output.success() => Metric::Available(parse_speedtest(&output.stdout)),
            Ok(output) => Metric::unavailable(format!("speedtest {}", output.failure_reason())),
            Err(ProbeError::NotFound { .. }) => {
                Metric::unavailable(format!("Speedtest executable not found at {}", path.display()))
            }
            Err(e) => Metric::unavailable(e.to_string()),
        }
    }

    /// Invoke with logging, cut short at the run deadline
    async fn invoke(
        &self,
        command: &ProbeCommand,
        timeout: Duration,
        kind: Option<ProbeKind>,
        target: Option<&Target>,
        deadline: Option<Instant>,
    ) -> Result<ProbeOutput, ProbeError> {
        let target_name = target.map(Target::as_str);
        self.probe_logger.log_started(command, target_name).await;

        let invocation = self.invoker.invoke(command, timeout);
        let outcome = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, invocation)
                .await
                .unwrap_or_else(|_| {
                    Err(ProbeError::DeadlineExceeded {
                        program: command.program.clone(),
                    })
                }),
            None => invocation.await,
        };

        self.probe_logger
            .log_finished(command, kind, target_name, &outcome)
            .await;
        outcome
    }
}

fn wifi_metric(outcome: Result<ProbeOutput, ProbeError>) -> Metric<WifiState> {
    match outcome {
        // A stopped WLAN service exits non-zero but still means "not connected"
        Ok(output) => Metric::Available(parse_wifi_state(&output.stdout)),
        Err(e) => Metric::unavailable(e.to_string()),
    }
}

fn dns_result(target: &Target, outcome: Result<ProbeOutput, ProbeError>) -> ProbeResult {
    let output = match outcome {
        Ok(output) => output,
        Err(e) => return ProbeResult::failed(target.clone(), ProbeKind::DnsLookup, String::new(), e.to_string()),
    };

    let addresses: Vec<String> = parse_resolved_addresses(&output.stdout)
        .into_iter()
        .map(|address| address.to_string())
        .collect();
    let is_literal = target.as_str().parse::<IpAddr>().is_ok();

    let error_detail = if !output.success() {
        Some(output.failure_reason())
    } else if addresses.is_empty() && !is_literal {
        Some("no addresses in answer".to_string())
    } else {
        None
    };

    ProbeResult {
        target: target.clone(),
        kind: ProbeKind::DnsLookup,
        raw_output: output.combined_text(),
        succeeded: error_detail.is_none(),
        error_detail,
        details: ProbeDetails::Dns { addresses },
    }
}

fn ping_result(target: &Target, sent: u32, outcome: Result<ProbeOutput, ProbeError>) -> ProbeResult {
    let output = match outcome {
        Ok(output) => output,
        Err(e) => return ProbeResult::failed(target.clone(), ProbeKind::Ping, String::new(), e.to_string()),
    };

    let statistics = parse_ping(&output.stdout, sent);
    let rating = LatencyRating::from_average(statistics.average_ms);
    let error_detail = (statistics.received == 0).then(|| format!("no replies ({})", output.failure_reason()));

    ProbeResult {
        target: target.clone(),
        kind: ProbeKind::Ping,
        raw_output: output.combined_text(),
        succeeded: error_detail.is_none(),
        error_detail,
        details: ProbeDetails::Ping { statistics, rating },
    }
}

fn traceroute_result(target: &Target, outcome: Result<ProbeOutput, ProbeError>) -> ProbeResult {
    let output = match outcome {
        Ok(output) => output,
        Err(e) => return ProbeResult::failed(target.clone(), ProbeKind::Traceroute, String::new(), e.to_string()),
    };

    let hops = parse_hop_count(&output.stdout);
    let error_detail = hops.is_none().then(|| format!("no hops listed ({})", output.failure_reason()));

    ProbeResult {
        target: target.clone(),
        kind: ProbeKind::Traceroute,
        raw_output: output.combined_text(),
        succeeded: error_detail.is_none(),
        error_detail,
        details: ProbeDetails::Traceroute { hops },
    }
}
