//! Configuration sanity checks beyond hard validation
//!
//! [`Config::validate`] rejects configurations that cannot run. The checks
//! here accept the configuration but point out settings that are likely to
//! produce a slow or misleading selection.

use crate::{
    error::Result,
    models::{sanitize_address, Config},
};
use std::collections::HashSet;
use std::net::IpAddr;

/// Warning severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// A configuration remark shown before probing starts
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    pub fn format(&self, use_color: bool) -> String {
        use colored::Colorize;

        let tag = format!("[{}]", self.level.as_str());
        let tag = match (use_color, self.level) {
            (false, _) => tag,
            (true, ValidationLevel::Info) => tag.blue().to_string(),
            (true, ValidationLevel::Warning) => tag.yellow().to_string(),
        };
        format!("{} {}", tag, self.message)
    }
}

/// Worst-case run time above which a warning is shown
const WORST_CASE_WARN_SECS: u64 = 120;

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Hard-validate `config`, then collect advisory warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Self::validate_hosts(&config.hosts)?;
        warnings.extend(Self::validate_probe_settings(config));
        Ok(warnings)
    }

    fn validate_hosts(hosts: &[String]) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for raw in hosts {
            let address = sanitize_address(raw)?;

            if !seen.insert(address.clone()) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Host '{}' is listed more than once and will be probed repeatedly", address),
                ));
            }

            if let Ok(ip) = address.parse::<IpAddr>() {
                if ip.is_loopback() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Host '{}' is a loopback address and will always rank first", address),
                    ));
                } else if ip.is_unspecified() || ip.is_multicast() {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("Host '{}' is not a unicast address and will not answer", address),
                    ));
                }
            }
        }

        Ok(warnings)
    }

    fn validate_probe_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.attempts < 3 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} attempt(s) per host may not give a stable average (recommended: >= 3)",
                    config.attempts
                ),
            ));
        }

        // Echo requests go out one per second.
        let session_secs = u64::from(config.attempts).saturating_sub(1);
        if session_secs >= config.timeout_seconds {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} attempts take at least {}s, but the timeout is {}s; every host will time out",
                    config.attempts, session_secs, config.timeout_seconds
                ),
            ));
        }

        if cfg!(windows) && !config.privileged {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Unprivileged ICMP sockets are not available on Windows; use --privileged".to_string(),
            ));
        }

        if !config.hosts.is_empty() && config.concurrency > config.hosts.len() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Concurrency {} exceeds the {} host(s) given; only {} worker(s) will run",
                    config.concurrency,
                    config.hosts.len(),
                    config.hosts.len()
                ),
            ));
        }

        if config.output > config.hosts.len() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Only {} host(s) available to show", config.hosts.len()),
            ));
        }

        let rounds = config.hosts.len().div_ceil(config.concurrency.max(1)) as u64;
        let worst_case = rounds * config.timeout_seconds;
        if worst_case > WORST_CASE_WARN_SECS {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Worst case run time is {}s; raise --concurrency to shorten it",
                    worst_case
                ),
            ));
        }

        warnings
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
