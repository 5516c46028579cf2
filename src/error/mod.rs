//! Error handling for netselect

use thiserror::Error;

/// Custom error types for netselect
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A host string is URL-shaped but has no scheme or host component
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The prober could not begin (unresolvable host, missing privilege)
    #[error("Probe unavailable: {0}")]
    ProbeUnavailable(String),

    /// Probing started but did not finish within the configured ceiling
    #[error("Probe timeout: {0}")]
    ProbeTimeout(String),

    /// I/O errors (file operations, sockets, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (numbers, booleans, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new invalid address error
    pub fn invalid_address<S: Into<String>>(message: S) -> Self {
        Self::InvalidAddress(message.into())
    }

    /// Create a new probe unavailable error
    pub fn probe_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ProbeUnavailable(message.into())
    }

    /// Create a new probe timeout error
    pub fn probe_timeout<S: Into<String>>(message: S) -> Self {
        Self::ProbeTimeout(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::InvalidAddress(_) => "ADDRESS",
            Self::ProbeUnavailable(_) => "UNAVAILABLE",
            Self::ProbeTimeout(_) => "TIMEOUT",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Check the values passed to --attempts, --concurrency, --timeout and --output.", msg)
            }
            Self::InvalidAddress(msg) => {
                format!("Invalid host address: {}\n\nSuggestion: Pass a bare hostname or IP (example.com, 10.0.0.1) or a full URL with scheme (https://example.com/path).", msg)
            }
            Self::ProbeUnavailable(msg) => {
                format!("Could not probe: {}\n\nSuggestion: Check that the host resolves. Raw ICMP needs root or CAP_NET_RAW; try --unprivileged, or allow datagram ICMP via net.ipv4.ping_group_range.", msg)
            }
            Self::ProbeTimeout(msg) => {
                format!("No timely reply: {}\n\nSuggestion: Increase the timeout with --timeout or check whether the host filters ICMP.", msg)
            }
            Self::Io(msg) => {
                format!("I/O operation failed: {}\n\nSuggestion: Check file permissions and socket availability.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse value: {}\n\nSuggestion: Check the format of your environment variables and arguments.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::InvalidAddress(_) | Self::Parse(_) => 1,
            Self::ProbeUnavailable(_) | Self::ProbeTimeout(_) => 2,
            Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Prefix the message with context while keeping the category
    pub fn with_prefix(self, context: &str) -> Self {
        let join = |msg: String| format!("{}: {}", context, msg);
        match self {
            Self::Config(msg) => Self::Config(join(msg)),
            Self::Validation(msg) => Self::Validation(join(msg)),
            Self::InvalidAddress(msg) => Self::InvalidAddress(join(msg)),
            Self::ProbeUnavailable(msg) => Self::ProbeUnavailable(join(msg)),
            Self::ProbeTimeout(msg) => Self::ProbeTimeout(join(msg)),
            Self::Io(msg) => Self::Io(join(msg)),
            Self::Parse(msg) => Self::Parse(join(msg)),
            Self::Internal(msg) => Self::Internal(join(msg)),
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::InvalidAddress(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::ProbeUnavailable(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::ProbeTimeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::invalid_address(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_prefix(&f()))
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }

    /// Render the report without printing it
    pub fn render(&self, error: &AppError) -> String {
        let mut report = error.format_for_console(self.use_color);
        if self.verbose {
            report.push_str("\n\n");
            report.push_str(&error.user_friendly_message());
        }
        report
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

/// Install a panic hook that adds a bug-report hint before the default report
///
/// The hook never exits the process. Panics inside a prober are still caught
/// by the dispatcher and become failed outcomes; a panic that escapes the
/// application is turned into exit code 99 by the caller.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        eprintln!("Application panic: this is a bug; please report it together with the command line used.");
        default_hook(panic_info);
    }));
}

/// Turn a caught panic payload into an internal error
pub fn panic_to_error(payload: &(dyn std::any::Any + Send)) -> AppError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    AppError::internal(format!("panic: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("Invalid configuration");
        assert_eq!(config_error.category(), "CONFIG");
        assert_eq!(config_error.exit_code(), 1);

        let unavailable = AppError::probe_unavailable("permission denied");
        assert_eq!(unavailable.category(), "UNAVAILABLE");
        assert_eq!(unavailable.exit_code(), 2);
    }

    #[test]
    fn test_error_display() {
        let error = AppError::invalid_address("://bad");
        let display = error.to_string();
        assert!(display.contains("Invalid address"));
        assert!(display.contains("://bad"));
    }

    #[test]
    fn test_error_categories() {
        let errors = [
            AppError::config("config"),
            AppError::validation("validation"),
            AppError::invalid_address("address"),
            AppError::probe_unavailable("unavailable"),
            AppError::probe_timeout("timeout"),
            AppError::io("io"),
            AppError::parse("parse"),
            AppError::internal("internal"),
        ];

        let expected_categories = [
            "CONFIG", "VALIDATION", "ADDRESS", "UNAVAILABLE", "TIMEOUT", "IO", "PARSE", "INTERNAL",
        ];

        for (error, expected) in errors.iter().zip(expected_categories.iter()) {
            assert_eq!(error.category(), *expected);
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("test").exit_code(), 1);
        assert_eq!(AppError::invalid_address("test").exit_code(), 1);
        assert_eq!(AppError::probe_timeout("test").exit_code(), 2);
        assert_eq!(AppError::io("test").exit_code(), 5);
        assert_eq!(AppError::internal("test").exit_code(), 99);
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = AppError::invalid_address("file:///etc/hosts");
        let message = error.user_friendly_message();
        assert!(message.contains("Invalid host address"));
        assert!(message.contains("Suggestion:"));
        assert!(message.contains("file:///etc/hosts"));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "socket denied");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "not_a_number".parse::<u32>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let bool_error = "maybe".parse::<bool>().unwrap_err();
        let app_error: AppError = bool_error.into();
        assert!(app_error.to_string().contains("Boolean parse error"));
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let url_error = url::Url::parse("://bad").unwrap_err();
        let app_error: AppError = url_error.into();
        assert_eq!(app_error.category(), "ADDRESS");
        assert!(app_error.to_string().contains("URL parse error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert_eq!(app_error.category(), "PARSE");
    }

    #[test]
    fn test_dotenv_error_conversion() {
        let dotenv_error = dotenv::Error::LineParse(".env".to_string(), 1);
        let app_error: AppError = dotenv_error.into();
        assert_eq!(app_error.category(), "CONFIG");
        assert!(app_error.to_string().contains("Environment file error"));
    }

    #[test]
    fn test_anyhow_integration() {
        let anyhow_error = anyhow::anyhow!("worker vanished");
        let app_error: AppError = anyhow_error.into();
        assert_eq!(app_error.category(), "INTERNAL");

        let app_error = AppError::config("Test config error");
        let anyhow_error = anyhow::anyhow!(app_error);
        assert!(anyhow_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_context_keeps_category() {
        let result: std::result::Result<u32, std::num::ParseIntError> = "x".parse::<u32>();
        let error = result.with_context(|| "Invalid NETSELECT_ATTEMPTS".to_string()).unwrap_err();
        assert_eq!(error.category(), "PARSE");
        assert!(error.to_string().contains("Invalid NETSELECT_ATTEMPTS"));

        let result: Result<()> = Err(AppError::io("read failed"));
        let error = result.context("While loading .env").unwrap_err();
        assert_eq!(error.category(), "IO");
        assert!(error.to_string().contains("While loading .env: read failed"));
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::config("Test error");
        let formatted_no_color = error.format_for_console(false);
        let formatted_color = error.format_for_console(true);

        assert_eq!(formatted_no_color, "[CONFIG] Configuration error: Test error");
        assert!(formatted_color.contains("CONFIG"));
        assert!(formatted_color.contains("Test error"));
    }

    #[test]
    fn test_error_reporter_render() {
        let reporter = ErrorReporter::new(false, true);
        let rendered = reporter.render(&AppError::probe_timeout("mirror.example"));
        assert!(rendered.starts_with("[TIMEOUT]"));
        assert!(rendered.contains("Suggestion:"));

        let terse = ErrorReporter::new(false, false).render(&AppError::probe_timeout("mirror.example"));
        assert!(!terse.contains("Suggestion:"));

        let reporter = ErrorReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.verbose);
    }

    #[test]
    fn test_panic_payload_becomes_internal_error() {
        let caught = std::panic::catch_unwind(|| panic!("worker lost")).unwrap_err();
        let error = panic_to_error(caught.as_ref());
        assert!(matches!(error, AppError::Internal(_)));
        assert!(error.to_string().contains("worker lost"));
        assert_eq!(error.exit_code(), 99);

        let formatted = std::panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert!(panic_to_error(formatted.as_ref()).to_string().contains("code 7"));
    }
}
