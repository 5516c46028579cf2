//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::config::env_keys;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load a specific env file if present; variables already set win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Example `.env` file content
    pub fn create_example_env_content() -> String {
        r#"# netselect configuration
#
# Values here are defaults; command-line arguments override them.

# Hosts to probe (comma or whitespace separated, URLs allowed)
# NETSELECT_HOSTS=mirror1.example.org,https://mirror2.example.org/debian

# Echo requests per host
# NETSELECT_ATTEMPTS=3

# Hosts probed in parallel
# NETSELECT_CONCURRENCY=1

# Per-host timeout in seconds (1-300)
# NETSELECT_TIMEOUT=30

# Use raw ICMP sockets (requires root or CAP_NET_RAW)
# NETSELECT_PRIVILEGED=false

# Rows shown in the ranking
# NETSELECT_OUTPUT=3

# Log format: console, json or compact
# NETSELECT_LOG_FORMAT=console

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Check one variable's value without applying it
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            env_keys::HOSTS => {
                for host in crate::models::config::split_list(value) {
                    crate::models::sanitize_address(&host)?;
                }
            }
            env_keys::ATTEMPTS => {
                let attempts: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if attempts == 0 || attempts > crate::defaults::MAX_ATTEMPTS {
                    return Err(AppError::config(format!(
                        "{} must be between 1 and {}, got: {}",
                        key,
                        crate::defaults::MAX_ATTEMPTS,
                        attempts
                    )));
                }
            }
            env_keys::CONCURRENCY | env_keys::OUTPUT => {
                let count: usize = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if count == 0 {
                    return Err(AppError::config(format!("{} must be at least 1", key)));
                }
            }
            env_keys::TIMEOUT => {
                let timeout: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if timeout == 0 || timeout > crate::defaults::MAX_TIMEOUT_SECS {
                    return Err(AppError::config(format!(
                        "{} must be between 1 and {}, got: {}",
                        key,
                        crate::defaults::MAX_TIMEOUT_SECS,
                        timeout
                    )));
                }
            }
            env_keys::PRIVILEGED | env_keys::ENABLE_COLOR => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            env_keys::LOG_FORMAT => {
                value.parse::<crate::logging::LogFormat>()?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Supported variables as (name, description, example)
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (env_keys::HOSTS, "Hosts to probe, comma separated", "mirror1.example.org,10.0.0.1"),
            (env_keys::ATTEMPTS, "Echo requests per host", "3"),
            (env_keys::CONCURRENCY, "Hosts probed in parallel", "4"),
            (env_keys::TIMEOUT, "Per-host timeout in seconds (1-300)", "30"),
            (env_keys::PRIVILEGED, "Use raw ICMP sockets", "false"),
            (env_keys::OUTPUT, "Rows shown in the ranking", "3"),
            (env_keys::LOG_FORMAT, "Log format: console, json or compact", "json"),
            (env_keys::ENABLE_COLOR, "Enable colored output", "true"),
        ]
    }

    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n\n");

        help.push_str("Example .env file:\n\n");
        help.push_str(&Self::create_example_env_content());

        help
    }

    /// Warnings for every set variable that would fail to apply
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| {
                let value = std::env::var(name).ok()?;
                Self::validate_env_var(name, &value).err().map(|e| e.to_string())
            })
            .collect()
    }

    /// Validate the lines of an env file; `None` when the file does not exist
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let warnings = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once('=')?;
                Self::validate_env_var(key.trim(), value)
                    .err()
                    .map(|e| format!("Line '{}': {}", line, e))
            })
            .collect();

        Ok(Some(warnings))
    }
}
