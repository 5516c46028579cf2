//! Probe statistics and per-host outcome models

use crate::models::Host;
use crate::prober::ProbeError;
use crate::types::ProbeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Aggregate statistics for one probe session against one host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeStatistics {
    /// Echo requests sent
    pub packets_sent: u32,

    /// Echo replies received
    pub packets_received: u32,

    /// Percentage of requests without a reply
    pub packet_loss: f64,

    /// Address actually probed after resolution
    pub resolved_addr: Option<IpAddr>,

    /// Round-trip time of every reply, in arrival order
    pub rtts: Vec<Duration>,

    pub min_rtt: Duration,
    pub max_rtt: Duration,
    pub avg_rtt: Duration,

    /// Population standard deviation of `rtts`
    pub std_dev_rtt: Duration,
}

impl ProbeStatistics {
    /// Derive statistics from the replies of a session that sent `sent` requests
    pub fn from_rtts(sent: u32, rtts: Vec<Duration>, resolved_addr: Option<IpAddr>) -> Self {
        let received = (rtts.len() as u32).min(sent);
        let packet_loss = if sent == 0 {
            0.0
        } else {
            100.0 * f64::from(sent - received) / f64::from(sent)
        };

        if rtts.is_empty() {
            return Self {
                packets_sent: sent,
                packets_received: 0,
                packet_loss,
                resolved_addr,
                ..Default::default()
            };
        }

        let min_rtt = rtts.iter().copied().min().unwrap_or_default();
        let max_rtt = rtts.iter().copied().max().unwrap_or_default();
        let total: Duration = rtts.iter().sum();
        let avg_rtt = total / rtts.len() as u32;

        let mean = avg_rtt.as_secs_f64();
        let variance = rtts
            .iter()
            .map(|rtt| {
                let delta = rtt.as_secs_f64() - mean;
                delta * delta
            })
            .sum::<f64>()
            / rtts.len() as f64;
        let std_dev_rtt = Duration::from_secs_f64(variance.sqrt());

        Self {
            packets_sent: sent,
            packets_received: received,
            packet_loss,
            resolved_addr,
            rtts,
            min_rtt,
            max_rtt,
            avg_rtt,
            std_dev_rtt,
        }
    }

    /// `100 - packet_loss`, rounded to a whole percentage
    pub fn success_percent(&self) -> u32 {
        (100.0 - self.packet_loss).round().clamp(0.0, 100.0) as u32
    }

    /// Average latency in whole milliseconds
    pub fn avg_ms(&self) -> u128 {
        self.avg_rtt.as_millis()
    }
}

/// Result of probing one host in one selection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Copy of the probed host
    pub host: Host,

    pub success: bool,

    /// Present exactly when `success` is false
    pub error: Option<ProbeError>,

    /// Zero-valued when `success` is false
    pub statistics: ProbeStatistics,

    /// When the probe session finished
    pub completed_at: DateTime<Utc>,
}

impl ProbeOutcome {
    /// Outcome of a probe session that got at least one reply
    pub fn success(host: Host, statistics: ProbeStatistics) -> Self {
        Self {
            host,
            success: true,
            error: None,
            statistics,
            completed_at: Utc::now(),
        }
    }

    /// Outcome of a probe session that failed
    pub fn failure(host: Host, error: ProbeError) -> Self {
        Self {
            host,
            success: false,
            error: Some(error),
            statistics: ProbeStatistics::default(),
            completed_at: Utc::now(),
        }
    }

    pub fn avg_rtt(&self) -> Duration {
        self.statistics.avg_rtt
    }

    pub fn status(&self) -> ProbeStatus {
        match &self.error {
            None => ProbeStatus::Success,
            Some(ProbeError::Unavailable { .. }) => ProbeStatus::Unavailable,
            Some(ProbeError::Timeout { .. }) => ProbeStatus::Timeout,
        }
    }
}
