//! Application configuration model and validation

use crate::error::{AppError, ErrorContext, Result};
use crate::logging::LogFormat;
use crate::selector::SelectorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variables understood by [`Config::merge_from_env`]
pub mod env_keys {
    pub const HOSTS: &str = "NETSELECT_HOSTS";
    pub const ATTEMPTS: &str = "NETSELECT_ATTEMPTS";
    pub const CONCURRENCY: &str = "NETSELECT_CONCURRENCY";
    pub const TIMEOUT: &str = "NETSELECT_TIMEOUT";
    pub const PRIVILEGED: &str = "NETSELECT_PRIVILEGED";
    pub const OUTPUT: &str = "NETSELECT_OUTPUT";
    pub const ENABLE_COLOR: &str = "ENABLE_COLOR";
    pub const LOG_FORMAT: &str = "NETSELECT_LOG_FORMAT";

    pub const ALL: &[&str] = &[HOSTS, ATTEMPTS, CONCURRENCY, TIMEOUT, PRIVILEGED, OUTPUT, ENABLE_COLOR, LOG_FORMAT];
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Hosts to probe, as given
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Echo requests per host
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Hosts probed in parallel
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-host probe ceiling
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Use raw ICMP sockets
    #[serde(default = "crate::defaults::default_privileged")]
    pub privileged: bool,

    /// Rows shown in the ranking table
    #[serde(default = "default_output_rows")]
    pub output: usize,

    /// Print the ranking as JSON instead of a table
    #[serde(default)]
    pub json: bool,

    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    #[serde(default)]
    pub verbose: bool,

    /// Per-packet trace output and debug logging
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            attempts: default_attempts(),
            concurrency: default_concurrency(),
            timeout_seconds: default_timeout_secs(),
            privileged: crate::defaults::default_privileged(),
            output: default_output_rows(),
            json: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate the configuration, stopping at the first problem
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(AppError::config("At least one host is required"));
        }

        if let Some(blank) = self.hosts.iter().position(|h| h.trim().is_empty()) {
            return Err(AppError::invalid_address(format!("Host #{} is empty", blank + 1)));
        }

        if self.attempts == 0 {
            return Err(AppError::config("Attempts must be at least 1"));
        }

        if self.attempts > crate::defaults::MAX_ATTEMPTS {
            return Err(AppError::config(format!(
                "Attempts cannot exceed {}",
                crate::defaults::MAX_ATTEMPTS
            )));
        }

        if self.concurrency == 0 {
            return Err(AppError::config("Concurrency must be at least 1"));
        }

        if self.output == 0 {
            return Err(AppError::config("Output rows must be at least 1"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > crate::defaults::MAX_TIMEOUT_SECS {
            return Err(AppError::config(format!(
                "Timeout cannot exceed {} seconds",
                crate::defaults::MAX_TIMEOUT_SECS
            )));
        }

        Ok(())
    }

    /// Run configuration for the selection engine
    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            attempts: self.attempts,
            timeout: self.timeout(),
            concurrency: self.concurrency,
            privileged: self.privileged,
            debug: self.debug,
        }
    }

    /// Merge process environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_source(|key| std::env::var(key).ok())
    }

    /// Merge values looked up through `lookup`, keyed by [`env_keys`] names
    pub fn merge_from_source<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hosts) = lookup(env_keys::HOSTS) {
            self.hosts = split_list(&hosts);
        }

        if let Some(attempts) = lookup(env_keys::ATTEMPTS) {
            self.attempts = attempts
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value '{}'", env_keys::ATTEMPTS, attempts))?;
        }

        if let Some(concurrency) = lookup(env_keys::CONCURRENCY) {
            self.concurrency = concurrency
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value '{}'", env_keys::CONCURRENCY, concurrency))?;
        }

        if let Some(timeout) = lookup(env_keys::TIMEOUT) {
            self.timeout_seconds = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value '{}'", env_keys::TIMEOUT, timeout))?;
        }

        if let Some(privileged) = lookup(env_keys::PRIVILEGED) {
            self.privileged = parse_flag(env_keys::PRIVILEGED, &privileged)?;
        }

        if let Some(output) = lookup(env_keys::OUTPUT) {
            self.output = output
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} value '{}'", env_keys::OUTPUT, output))?;
        }

        if let Some(enable_color) = lookup(env_keys::ENABLE_COLOR) {
            self.enable_color = parse_flag(env_keys::ENABLE_COLOR, &enable_color)?;
        }

        if let Some(log_format) = lookup(env_keys::LOG_FORMAT) {
            self.log_format = log_format.parse()?;
        }

        Ok(())
    }
}

/// Split a comma or whitespace separated host list
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::config(format!(
            "Invalid {} value '{}': expected true or false",
            key, value
        ))),
    }
}

fn default_attempts() -> u32 {
    crate::defaults::DEFAULT_ATTEMPTS
}

fn default_concurrency() -> usize {
    crate::defaults::DEFAULT_CONCURRENCY
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_output_rows() -> usize {
    crate::defaults::DEFAULT_OUTPUT_ROWS
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
