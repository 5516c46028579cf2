//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// ICMP socket flavour used for a probe session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// Raw socket; needs root, CAP_NET_RAW or Administrator
    Privileged,
    /// Datagram ICMP socket available to ordinary users where the OS allows it
    Unprivileged,
}

impl Transport {
    /// Map the `privileged` flag onto a transport
    pub fn from_privileged(privileged: bool) -> Self {
        if privileged {
            Self::Privileged
        } else {
            Self::Unprivileged
        }
    }

    /// Socket type handed to the ICMP client
    pub fn socket_type(&self) -> socket2::Type {
        match self {
            Self::Privileged => socket2::Type::RAW,
            Self::Unprivileged => socket2::Type::DGRAM,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Privileged => "privileged",
            Self::Unprivileged => "unprivileged",
        }
    }
}

/// Final classification of one host in a selection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStatus {
    /// At least one echo reply came back
    Success,
    /// Probing could not start
    Unavailable,
    /// Probing ran out of time or got no reply
    Timeout,
}

impl ProbeStatus {
    /// Short label for tables and logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unavailable => "UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
        }
    }
}
