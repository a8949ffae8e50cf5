//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Every failure a use case can produce maps onto one variant here; the
/// server layer translates the variant into an HTTP status and uses the
/// display text as the response message. A use case that returns an error
/// has performed no writes.
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced user id does not resolve to a registered user
    #[error("User not found")]
    UserNotFound,

    /// Withdrawal amount exceeds the current balance
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Statement absent, or owned by a different user than the caller
    #[error("Statement not found")]
    StatementNotFound,

    /// Registration attempted with an email that is already taken
    #[error("Email already in use")]
    EmailAlreadyInUse,

    /// Authentication failure. One variant and one message for both
    /// "unknown email" and "wrong password" so the response never reveals
    /// which field was wrong.
    #[error("Incorrect email or password")]
    IncorrectCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a token error
    pub fn token(msg: impl Into<String>) -> Self {
        Self::Token(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
