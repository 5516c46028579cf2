//! Data models and structures for netselect

pub mod config;
pub mod host;
pub mod outcome;

// Re-export main model types
pub use config::Config;
pub use host::{sanitize_address, Host};
pub use outcome::{ProbeOutcome, ProbeStatistics};
