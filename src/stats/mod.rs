//! Ranking and run summaries

use crate::models::ProbeOutcome;
use crate::types::ProbeStatus;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Orders probe outcomes by preference
pub struct Ranker;

impl Ranker {
    /// Successful outcomes by ascending average RTT, then failed ones
    ///
    /// Both partitions keep their incoming order among equals, so ranking an
    /// already ranked list leaves it unchanged.
    pub fn rank(outcomes: Vec<ProbeOutcome>) -> Vec<ProbeOutcome> {
        let (mut successful, failed): (Vec<_>, Vec<_>) = outcomes.into_iter().partition(|o| o.success);
        successful.sort_by_key(ProbeOutcome::avg_rtt);
        successful.extend(failed);
        successful
    }

    /// Whether `outcomes` is already in ranked order
    pub fn is_ranked(outcomes: &[ProbeOutcome]) -> bool {
        let first_failure = outcomes.iter().position(|o| !o.success).unwrap_or(outcomes.len());
        let (successful, failed) = outcomes.split_at(first_failure);

        failed.iter().all(|o| !o.success)
            && successful.windows(2).all(|pair| pair[0].avg_rtt() <= pair[1].avg_rtt())
    }
}

/// Aggregate figures for one selection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Failures where the host never answered in time
    pub timeouts: usize,
    /// Failures where probing could not start
    pub unavailable: usize,
    /// Share of hosts that answered, in percent
    pub success_rate: f64,
    /// Address of the best host, if any answered
    pub fastest: Option<String>,
    pub fastest_avg: Option<Duration>,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl SelectionSummary {
    pub fn from_ranked(outcomes: &[ProbeOutcome], elapsed: Duration) -> Self {
        let total = outcomes.len();
        let successful = outcomes.iter().filter(|o| o.success).count();
        let count_status = |status: ProbeStatus| outcomes.iter().filter(|o| o.status() == status).count();

        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64 * 100.0
        };

        let best = outcomes.iter().filter(|o| o.success).min_by_key(|o| o.avg_rtt());

        Self {
            total,
            successful,
            failed: total - successful,
            timeouts: count_status(ProbeStatus::Timeout),
            unavailable: count_status(ProbeStatus::Unavailable),
            success_rate,
            fastest: best.map(|o| o.host.address.clone()),
            fastest_avg: best.map(ProbeOutcome::avg_rtt),
            elapsed,
        }
    }

    pub fn any_responded(&self) -> bool {
        self.successful > 0
    }
}
