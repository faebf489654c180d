//! Result and error types for the core library

use rust_decimal::Decimal;
use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a feed error
    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Per-record mapping failure
///
/// Never fatal to a batch: the mapper reports the failure and moves on to
/// the next source record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("no account mapping for source account {0}")]
    UnmappedAccount(String),

    #[error("amount {0} cannot be represented in minor units")]
    InvalidAmount(Decimal),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = Error::config("missing ledger path");
        assert!(err.to_string().contains("Configuration error"));

        let err = Error::not_found("provider: csv");
        assert!(err.to_string().contains("Not found"));
    }

    #[test]
    fn test_map_error_display() {
        let err = MapError::UnmappedAccount("acct-9".to_string());
        assert_eq!(
            err.to_string(),
            "no account mapping for source account acct-9"
        );
    }
}
