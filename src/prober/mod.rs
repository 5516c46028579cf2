//! Probe collaborators
//!
//! A [`Prober`] runs one probe session against one address and reports the
//! aggregate statistics. The selection engine only depends on this trait;
//! [`IcmpProber`] is the ICMP echo implementation used by the CLI.

pub mod icmp;

pub use icmp::IcmpProber;

use crate::error::AppError;
use crate::models::{Host, ProbeStatistics};
use crate::selector::SelectorConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Parameters of a single probe session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeRequest {
    /// Bare hostname or IP literal
    pub address: String,
    /// Echo requests to send
    pub attempts: u32,
    /// Ceiling for the whole session, resolution included
    pub timeout: Duration,
    /// Use a raw socket instead of a datagram ICMP socket
    pub privileged: bool,
    /// Print per-packet trace lines
    pub debug: bool,
}

impl ProbeRequest {
    /// Build the request for `host` under the run configuration
    pub fn new(host: &Host, config: &SelectorConfig) -> Self {
        Self {
            address: host.address.clone(),
            attempts: config.attempts,
            timeout: config.timeout,
            privileged: config.privileged,
            debug: config.debug,
        }
    }
}

/// Why a probe session produced no usable statistics
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProbeError {
    /// The session could not start
    #[error("cannot probe {address}: {reason}")]
    Unavailable { address: String, reason: String },

    /// The session started but no timely reply arrived
    #[error("no reply from {address} within {}ms", .timeout.as_millis())]
    Timeout {
        address: String,
        timeout: Duration,
        /// Whatever was measured before the budget ran out
        partial: Option<ProbeStatistics>,
    },
}

impl ProbeError {
    pub fn unavailable<A: Into<String>, R: Into<String>>(address: A, reason: R) -> Self {
        Self::Unavailable {
            address: address.into(),
            reason: reason.into(),
        }
    }

    pub fn timeout<A: Into<String>>(address: A, timeout: Duration, partial: Option<ProbeStatistics>) -> Self {
        Self::Timeout {
            address: address.into(),
            timeout,
            partial,
        }
    }

    /// Statistics gathered before a timeout, if any
    pub fn partial_statistics(&self) -> Option<&ProbeStatistics> {
        match self {
            Self::Timeout { partial, .. } => partial.as_ref(),
            Self::Unavailable { .. } => None,
        }
    }
}

impl From<ProbeError> for AppError {
    fn from(error: ProbeError) -> Self {
        match error {
            ProbeError::Unavailable { .. } => AppError::probe_unavailable(error.to_string()),
            ProbeError::Timeout { .. } => AppError::probe_timeout(error.to_string()),
        }
    }
}

/// Runs a probe session against one address
///
/// Implementations must return within `request.timeout` and must fail fast
/// when the session cannot be set up at all.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe `request.address` `request.attempts` times
    async fn probe(&self, request: &ProbeRequest) -> Result<ProbeStatistics, ProbeError>;

    /// Name used in logs
    fn name(&self) -> &str {
        "prober"
    }
}
