//! Configuration assembly from defaults, env files, environment and CLI

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};
use std::path::PathBuf;

/// Builds the final [`Config`] for a run
///
/// Sources are layered lowest to highest: defaults, `.env`, process
/// environment, then command-line arguments. The result is validated.
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read defaults from a different env file
    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = path.into();
        self
    }

    /// Parse and validate the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;
        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Apply command-line values on top of `config` without validating
    pub fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        let cli = &self.cli;

        if !cli.hosts.is_empty() {
            config.hosts = cli.hosts.clone();
        }
        if let Some(attempts) = cli.attempts {
            config.attempts = attempts;
        }
        if let Some(concurrency) = cli.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = cli.timeout {
            config.timeout_seconds = timeout;
        }
        if let Some(output) = cli.output {
            config.output = output;
        }
        if let Some(privileged) = cli.privileged_override() {
            config.privileged = privileged;
        }
        if let Some(color) = cli.color_override() {
            config.enable_color = color;
        }
        if let Some(format) = &cli.log_format {
            config.log_format = format.parse()?;
        }

        // CLI-only switches
        config.json = cli.json;
        config.verbose = cli.verbose;
        config.debug = cli.debug;

        if config.debug {
            eprintln!(
                "Final config: hosts={}, attempts={}, concurrency={}, timeout={}s, privileged={}",
                config.hosts.len(),
                config.attempts,
                config.concurrency,
                config.timeout_seconds,
                config.privileged
            );
        }

        Ok(())
    }
}

/// Human-readable configuration dump for `--verbose`
pub fn display_config_summary(config: &Config) -> String {
    let summary = [
        format!("Hosts: {}", config.hosts.join(", ")),
        format!("Attempts: {}", config.attempts),
        format!("Concurrency: {}", config.concurrency),
        format!("Timeout: {}s", config.timeout_seconds),
        format!("Privileged: {}", config.privileged),
        format!("Output rows: {}", config.output),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];

    summary.join("\n")
}
