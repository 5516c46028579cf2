//! netselect
//!
//! Finds the fastest host in a list by sending a batch of ICMP echo probes
//! to each one and ranking the hosts by average round-trip latency.
//! Probing fans out over a bounded worker pool; ranking is deterministic
//! for a fixed set of outcomes.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod prober;
pub mod selector;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::Dispatcher;
pub use models::{Config, Host, ProbeOutcome, ProbeStatistics};
pub use output::{ColoredFormatter, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use prober::{IcmpProber, ProbeError, ProbeRequest, Prober};
pub use selector::{select_hosts, NetSelector, SelectorConfig};
pub use stats::{Ranker, SelectionSummary};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata injected by build.rs
pub mod build_info {
    pub const BUILD_TIME: &str = env!("BUILD_TIME");
    pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
    pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

    /// One-line version banner used by `--version`
    pub fn version_line() -> String {
        match GIT_COMMIT {
            Some(commit) => format!(
                "{} {} ({}, built {}, {})",
                super::PKG_NAME,
                super::VERSION,
                commit,
                BUILD_TIME,
                TARGET_TRIPLE
            ),
            None => format!(
                "{} {} (built {}, {})",
                super::PKG_NAME,
                super::VERSION,
                BUILD_TIME,
                TARGET_TRIPLE
            ),
        }
    }
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_ATTEMPTS: u32 = 3;
    /// Echo sequence numbers are 16 bits wide
    pub const MAX_ATTEMPTS: u32 = u16::MAX as u32;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const MAX_TIMEOUT_SECS: u64 = 300;
    pub const DEFAULT_CONCURRENCY: usize = 1;
    pub const DEFAULT_OUTPUT_ROWS: usize = 3;
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Delay between consecutive echo requests to the same host
    pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(1);

    /// Longest wait for a single echo reply
    pub const DEFAULT_PACKET_WAIT: Duration = Duration::from_secs(1);

    /// Raw ICMP sockets are the only working transport on Windows.
    pub fn default_privileged() -> bool {
        cfg!(target_os = "windows")
    }
}
