//! Error handling for the zero packet probe

use crate::models::IpFamily;
use thiserror::Error;

/// Custom error types for the zero packet probe
///
/// Only resolution-phase failures are fatal; per-attempt probe failures are
/// reported as [`crate::models::ProbeOutcome`] values, never as errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// No address of the requested family exists for the host, or the
    /// resolution query itself failed
    #[error("Unknown host: no {family} address found for '{host}'")]
    UnknownHost { host: String, family: IpFamily },

    /// The local network stack cannot open sockets of the requested family
    #[error("Unsupported address family: {family} is not available on this system")]
    UnsupportedFamily { family: IpFamily },

    /// Resolver plumbing errors (reading system DNS configuration, etc.)
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (ports, numbers, addresses)
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

    /// Create a new unknown-host error
    pub fn unknown_host<S: Into<String>>(host: S, family: IpFamily) -> Self {
        Self::UnknownHost {
            host: host.into(),
            family,
        }
    }

    /// Create a new unsupported-family error
    pub fn unsupported_family(family: IpFamily) -> Self {
        Self::UnsupportedFamily { family }
    }

    /// Create a new resolver error
    pub fn resolver<S: Into<String>>(message: S) -> Self {
        Self::Resolver(message.into())
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
            Self::UnknownHost { .. } => "DNS",
            Self::UnsupportedFamily { .. } => "DNS",
            Self::Resolver(_) => "DNS",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get exit code for this error type
    ///
    /// A completed run always exits 0, including the "host absent" verdict;
    /// these codes only apply when the run could not complete.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1, // Invalid configuration/usage
            Self::UnknownHost { .. } | Self::UnsupportedFamily { .. } | Self::Resolver(_) => 2, // Resolution failure
            Self::Io(_) => 5,       // I/O issues
            Self::Internal(_) => 99, // Internal/unexpected errors
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::UnknownHost { .. } | Self::UnsupportedFamily { .. } | Self::Resolver(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
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

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {}", error))
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

impl From<std::net::AddrParseError> for AppError {
    fn from(error: std::net::AddrParseError) -> Self {
        Self::parse(format!("IP address parse error: {}", error))
    }
}

impl From<trust_dns_resolver::error::ResolveError> for AppError {
    fn from(error: trust_dns_resolver::error::ResolveError) -> Self {
        Self::resolver(error.to_string())
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AppError::config("x").category(), "CONFIG");
        assert_eq!(AppError::validation("x").category(), "VALIDATION");
        assert_eq!(
            AppError::unknown_host("nowhere", IpFamily::V4).category(),
            "DNS"
        );
        assert_eq!(
            AppError::unsupported_family(IpFamily::V6).category(),
            "DNS"
        );
        assert_eq!(AppError::io("x").category(), "IO");
        assert_eq!(AppError::parse("x").category(), "PARSE");
        assert_eq!(AppError::internal("x").category(), "INTERNAL");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("x").exit_code(), 1);
        assert_eq!(AppError::validation("x").exit_code(), 1);
        assert_eq!(AppError::parse("x").exit_code(), 1);
        assert_eq!(
            AppError::unknown_host("nowhere", IpFamily::V4).exit_code(),
            2
        );
        assert_eq!(AppError::unsupported_family(IpFamily::V6).exit_code(), 2);
        assert_eq!(AppError::internal("x").exit_code(), 99);
    }

    #[test]
    fn test_unknown_host_message_names_family() {
        let err = AppError::unknown_host("example.invalid", IpFamily::V6);
        let msg = err.to_string();
        assert!(msg.contains("example.invalid"));
        assert!(msg.contains("IPv6"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");
        assert!(app_error.to_string().contains("refused"));
    }

    #[test]
    fn test_addr_parse_error_conversion() {
        let addr_error = "not-an-ip".parse::<std::net::IpAddr>().unwrap_err();
        let app_error: AppError = addr_error.into();
        assert_eq!(app_error.category(), "PARSE");
    }

    #[test]
    fn test_console_formatting_plain() {
        let err = AppError::config("bad ports");
        let formatted = err.format_for_console(false);
        assert_eq!(formatted, "[CONFIG] Configuration error: bad ports");
    }
}
