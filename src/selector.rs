//! Selection façade
//!
//! [`NetSelector`] validates the run configuration and the host list, hands
//! the hosts to the [`Dispatcher`] and ranks what comes back.

use crate::{
    error::{AppError, Result},
    executor::Dispatcher,
    log_debug, log_info,
    logging::{LogLevel, Logger, PerformanceLogger},
    models::{Host, ProbeOutcome},
    prober::{IcmpProber, Prober},
    stats::{Ranker, SelectionSummary},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for one selection run
///
/// Platform defaults are resolved when the value is created and never
/// re-queried during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Echo requests per host
    pub attempts: u32,
    /// Ceiling for each host's probe session
    pub timeout: Duration,
    /// Number of workers probing in parallel
    pub concurrency: usize,
    /// Use raw ICMP sockets
    pub privileged: bool,
    /// Emit per-packet trace output
    pub debug: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            attempts: crate::defaults::DEFAULT_ATTEMPTS,
            timeout: crate::defaults::DEFAULT_TIMEOUT,
            concurrency: crate::defaults::DEFAULT_CONCURRENCY,
            privileged: crate::defaults::default_privileged(),
            debug: false,
        }
    }
}

impl SelectorConfig {
    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(AppError::config("attempts must be at least 1"));
        }
        if self.attempts > crate::defaults::MAX_ATTEMPTS {
            return Err(AppError::config(format!(
                "attempts cannot exceed {}",
                crate::defaults::MAX_ATTEMPTS
            )));
        }
        if self.concurrency == 0 {
            return Err(AppError::config("concurrency must be at least 1"));
        }
        if self.timeout.is_zero() {
            return Err(AppError::config("timeout must be greater than 0"));
        }
        Ok(())
    }

    /// Upper bound on a run's wall time: `ceil(hosts / concurrency) × timeout`
    pub fn worst_case_duration(&self, hosts: usize) -> Duration {
        let concurrency = self.concurrency.max(1);
        let rounds = hosts.div_ceil(concurrency) as u32;
        self.timeout * rounds
    }
}

/// Finds the fastest responding hosts in a list
pub struct NetSelector {
    hosts: Vec<Host>,
    config: SelectorConfig,
    prober: Arc<dyn Prober>,
    logger: Logger,
}

impl NetSelector {
    /// Create a selector probing with ICMP under the default configuration
    pub fn new(hosts: Vec<Host>) -> Self {
        Self::with_prober(hosts, Arc::new(IcmpProber::new()))
    }

    /// Create a selector using a custom prober
    pub fn with_prober(hosts: Vec<Host>, prober: Arc<dyn Prober>) -> Self {
        let config = SelectorConfig::default();
        let logger = Logger::with_level("SELECT".to_string(), LogLevel::Warn, false);
        Self {
            hosts,
            config,
            prober,
            logger,
        }
    }

    /// Replace the run configuration
    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the logger
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Probe every host and return outcomes, fastest reachable host first
    ///
    /// Fails without probing anything when the configuration or any host is
    /// invalid. Per-host probe failures are reported as outcomes.
    pub async fn select(&self) -> Result<Vec<ProbeOutcome>> {
        let (ranked, _) = self.select_with_summary().await?;
        Ok(ranked)
    }

    /// Like [`select`](Self::select), also returning a run summary
    pub async fn select_with_summary(&self) -> Result<(Vec<ProbeOutcome>, SelectionSummary)> {
        self.config.validate()?;

        let hosts = self
            .hosts
            .iter()
            .map(Host::sanitized)
            .collect::<Result<Vec<_>>>()?;

        log_info!(
            self.logger,
            "Probing {} host(s) with {} worker(s), {} attempt(s) each",
            hosts.len(),
            self.config.concurrency,
            self.config.attempts
        );

        let mut perf = PerformanceLogger::new(self.logger.child("PERF"));
        perf.start_timing("selection").await;
        let started = Instant::now();

        let dispatcher = Dispatcher::new(self.prober.clone(), self.config.clone(), self.logger.child("PROBE"));
        let outcomes = dispatcher.run(&hosts).await?;
        let ranked = Ranker::rank(outcomes);

        let elapsed = started.elapsed();
        perf.end_timing("selection").await;

        let summary = SelectionSummary::from_ranked(&ranked, elapsed);
        perf.log_batch_summary(summary.total, elapsed).await;

        if let Some(fastest) = &summary.fastest {
            log_debug!(self.logger, "Fastest host: {}", fastest);
        }

        Ok((ranked, summary))
    }
}

/// Build hosts from raw strings and select among them over ICMP
pub async fn select_hosts(addresses: &[String], config: SelectorConfig) -> Result<Vec<ProbeOutcome>> {
    let hosts = addresses
        .iter()
        .map(|address| Host::parse(address))
        .collect::<Result<Vec<_>>>()?;

    NetSelector::new(hosts).with_config(config).select().await
}
