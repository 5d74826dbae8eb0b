//! The module contains the error the engine can throw.
//!
//! The kinds mirror how the HTTP layer reports failures:
//!
//! - [`NotFound`] a referenced entity does not exist.
//! - [`Forbidden`] the caller lacks the required association or authority.
//! - [`AlreadyGranted`] a sharing request whose end state already holds;
//!   callers surface it as informational, not as a hard failure.
//! - [`Conflict`] a state-incompatible request (duplicate tag, double like,
//!   tag still referenced, ...).
//! - [`InvalidArgument`] malformed input the persistence layer never sees.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`AlreadyGranted`]: EngineError::AlreadyGranted
//!  [`Conflict`]: EngineError::Conflict
//!  [`InvalidArgument`]: EngineError::InvalidArgument
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("already granted: {0}")]
    AlreadyGranted(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::AlreadyGranted(a), Self::AlreadyGranted(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidArgument(a), Self::InvalidArgument(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
