//! Error handling module
//!
//! Centralized error type for callers that drive both aggregates.

use crate::config::ConfigError;
use crate::domain::error::{money_code, money_kind};
use crate::domain::{CardError, ErrorKind, MoneyError, PaymentError};

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Domain errors
    #[error(transparent)]
    Card(#[from] CardError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    // Startup errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Stable code for the outer layer
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Card(e) => e.code(),
            AppError::Payment(e) => e.code(),
            AppError::Money(e) => money_code(e),
            AppError::Config(_) => "config_error",
        }
    }

    /// `None` for errors outside the domain taxonomy
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Card(e) => Some(e.kind()),
            AppError::Payment(e) => Some(e.kind()),
            AppError::Money(e) => Some(money_kind(e)),
            AppError::Config(_) => None,
        }
    }

    /// Check if this is a client error (the request can never succeed as sent)
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::Card(e) => e.is_client_error(),
            AppError::Payment(e) => e.is_client_error(),
            AppError::Money(e) => !matches!(e, MoneyError::Overflow),
            AppError::Config(_) => false,
        }
    }
}
