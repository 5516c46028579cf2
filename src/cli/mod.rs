//! Command-line interface

use clap::Parser;

const AFTER_HELP: &str = "\
EXAMPLES:
    netselect mirror1.example.org mirror2.example.org
    netselect -c 8 -a 5 -o 1 $(cat mirrors.txt)
    netselect --json https://deb.example.org/debian/ 192.0.2.10

Hosts may be given as hostnames, IP addresses or URLs; URLs are reduced to
their host. Defaults can also be set through NETSELECT_* environment
variables or a .env file (see --env-help).";

/// Pick the fastest hosts from a list by ICMP round-trip latency
#[derive(Parser, Debug, Clone)]
#[command(name = "netselect")]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Hosts to probe (hostname, IP address or URL)
    #[arg(value_name = "HOST")]
    pub hosts: Vec<String>,

    /// Echo requests sent to each host [default: 3]
    #[arg(short, long, value_name = "N")]
    pub attempts: Option<u32>,

    /// Hosts probed in parallel [default: 1]
    #[arg(short, long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-host timeout in seconds [default: 30]
    #[arg(short, long, value_name = "SECS", value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Number of ranked hosts to show [default: 3]
    #[arg(short, long, value_name = "N")]
    pub output: Option<usize>,

    /// Use raw ICMP sockets (needs root or CAP_NET_RAW)
    #[arg(long)]
    pub privileged: bool,

    /// Use unprivileged datagram ICMP sockets
    #[arg(long)]
    pub unprivileged: bool,

    /// Print the ranking as JSON
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show progress and a run summary
    #[arg(long)]
    pub verbose: bool,

    /// Print per-packet traces and debug logs
    #[arg(long)]
    pub debug: bool,

    /// Log format: console, json or compact
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// List supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,

    /// Print version information and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

impl Cli {
    /// Check for conflicting or missing arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.privileged && self.unprivileged {
            return Err("Cannot specify both --privileged and --unprivileged".to_string());
        }

        Ok(())
    }

    /// Socket mode requested on the command line, if any
    pub fn privileged_override(&self) -> Option<bool> {
        if self.privileged {
            Some(true)
        } else if self.unprivileged {
            Some(false)
        } else {
            None
        }
    }

    /// Color choice from flags, `None` to defer to configuration
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }
}

/// Parse a timeout in whole seconds
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > crate::defaults::MAX_TIMEOUT_SECS {
                Err(format!(
                    "Duration cannot exceed {} seconds",
                    crate::defaults::MAX_TIMEOUT_SECS
                ))
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if std::env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }

    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    cfg!(unix)
}
