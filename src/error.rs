//! Error types for the arbitrage scanner.

use thiserror::Error;

/// Top-level error type for the scanner.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration validation error.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Quote source error.
    #[error("quote error: {0}")]
    Quote(#[from] QuoteError),

    /// A refresh was requested while one was already running.
    #[error("refresh already in flight")]
    AlreadyRefreshing,
}

/// Quote source errors.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The source could not produce a snapshot.
    #[error("quote source unavailable: {reason}")]
    Unavailable {
        /// What went wrong.
        reason: String,
    },

    /// The fetch exceeded its deadline.
    #[error("quote fetch timed out after {timeout_ms}ms")]
    Timeout {
        /// Deadline that was exceeded, in milliseconds.
        timeout_ms: u64,
    },
}

/// Result type alias using ScannerError.
pub type Result<T> = std::result::Result<T, ScannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = ScannerError::InvalidConfig("REFRESH_INTERVAL_SECS must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: REFRESH_INTERVAL_SECS must be > 0"
        );

        let err = ScannerError::AlreadyRefreshing;
        assert_eq!(err.to_string(), "refresh already in flight");
    }

    #[test]
    fn quote_error_converts_to_scanner_error() {
        let quote_err = QuoteError::Timeout { timeout_ms: 10_000 };
        let err: ScannerError = quote_err.into();
        assert_eq!(
            err.to_string(),
            "quote error: quote fetch timed out after 10000ms"
        );
    }

    #[test]
    fn unavailable_includes_reason() {
        let err = QuoteError::Unavailable {
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "quote source unavailable: connection refused"
        );
    }
}
