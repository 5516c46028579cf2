//! Concurrent probe dispatch
//!
//! The [`Dispatcher`] queues every host up front and starts a fixed pool of
//! workers that pull hosts off the queue until it is drained. Each probe
//! produces exactly one [`ProbeOutcome`]; outcomes are returned in the order
//! they completed.

use crate::{
    error::{AppError, Result},
    logging::{Logger, ProbeLogger},
    models::{Host, ProbeOutcome},
    prober::{ProbeError, ProbeRequest, Prober},
    selector::SelectorConfig,
};
use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;

/// Slack granted to a prober beyond its own timeout before the worker gives up on it
const PROBE_GRACE: Duration = Duration::from_millis(500);

/// Runs probes for a list of hosts on a bounded worker pool
pub struct Dispatcher {
    prober: Arc<dyn Prober>,
    config: SelectorConfig,
    probe_logger: ProbeLogger,
}

impl Dispatcher {
    pub fn new(prober: Arc<dyn Prober>, config: SelectorConfig, logger: Logger) -> Self {
        Self {
            prober,
            config,
            probe_logger: ProbeLogger::new(logger),
        }
    }

    /// Number of workers a run over `hosts` hosts will start
    pub fn worker_count(&self, hosts: usize) -> usize {
        self.config.concurrency.max(1).min(hosts)
    }

    /// Probe every host once and collect one outcome per host
    pub async fn run(&self, hosts: &[Host]) -> Result<Vec<ProbeOutcome>> {
        if hosts.is_empty() {
            return Ok(Vec::new());
        }

        let total = hosts.len();
        let (job_sender, job_receiver) = mpsc::channel::<Host>(total);
        for host in hosts {
            job_sender
                .send(host.clone())
                .await
                .map_err(|_| AppError::internal("probe queue closed before dispatch"))?;
        }
        // Workers stop once the queue is drained.
        drop(job_sender);

        let job_receiver = Arc::new(Mutex::new(job_receiver));
        let (result_sender, mut result_receiver) = mpsc::channel::<ProbeOutcome>(total);

        let mut workers = Vec::with_capacity(self.worker_count(total));
        for worker in 0..self.worker_count(total) {
            let jobs = job_receiver.clone();
            let results = result_sender.clone();
            let prober = self.prober.clone();
            let config = self.config.clone();
            let probe_logger = self.probe_logger.clone();

            workers.push(tokio::spawn(async move {
                probe_logger.log_worker_started(worker).await;
                let mut probed = 0;

                loop {
                    let next = jobs.lock().await.recv().await;
                    let Some(host) = next else {
                        break;
                    };

                    let outcome = probe_host(prober.as_ref(), host, &config).await;
                    probe_logger.log_outcome(&outcome, worker).await;
                    probed += 1;

                    if results.send(outcome).await.is_err() {
                        break;
                    }
                }

                probe_logger.log_worker_finished(worker, probed).await;
            }));
        }
        drop(result_sender);

        let mut outcomes = Vec::with_capacity(total);
        while outcomes.len() < total {
            match result_receiver.recv().await {
                Some(outcome) => outcomes.push(outcome),
                None => break,
            }
        }

        for joined in join_all(workers).await {
            if let Err(e) = joined {
                return Err(AppError::internal(format!("probe worker failed: {}", e)));
            }
        }

        if outcomes.len() != total {
            return Err(AppError::internal(format!(
                "expected {} probe outcomes, collected {}",
                total,
                outcomes.len()
            )));
        }

        Ok(outcomes)
    }
}

/// Run one probe session, turning every failure mode into an outcome
async fn probe_host(prober: &dyn Prober, host: Host, config: &SelectorConfig) -> ProbeOutcome {
    let request = ProbeRequest::new(&host, config);
    let session = AssertUnwindSafe(prober.probe(&request)).catch_unwind();

    let result = match timeout(config.timeout + PROBE_GRACE, session).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(ProbeError::unavailable(
            &request.address,
            format!("{} prober panicked", prober.name()),
        )),
        Err(_) => Err(ProbeError::timeout(&request.address, config.timeout, None)),
    };

    match result {
        Ok(statistics) => ProbeOutcome::success(host, statistics),
        Err(error) => ProbeOutcome::failure(host, error),
    }
}
