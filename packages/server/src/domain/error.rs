//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId must be a positive integer
    #[error("UserId must be positive (got {0})")]
    UserIdNotPositive(i64),

    /// UserId could not be parsed
    #[error("UserId must be an integer (got: {0})")]
    UserIdInvalidFormat(String),
}

/// Errors reported by the message store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The referenced user does not exist (e.g. the peer was removed)
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// The backing database failed
    #[error("Database error: {0}")]
    Database(String),
}
