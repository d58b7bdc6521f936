//! Business-rule failures shared by the catalog and bundle aggregates.
//!
//! Bundle composition rules have their own error type in the bundles crate;
//! this one covers what every storefront record has in common: it must exist,
//! be addressed by a well-formed id, and only be changed by its seller.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Rejected input; the message is shown to the seller as-is.
    #[error("{0}")]
    Validation(String),

    /// Malformed id, or a command addressed to a different record.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Never created, or already deleted.
    #[error("not found")]
    NotFound,

    /// Duplicate creation or a stale version.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The acting seller is not the record's owner.
    #[error("not the owner of this record")]
    NotOwner,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Command id differs from the loaded record's id.
    pub fn id_mismatch(expected: impl core::fmt::Display, got: impl core::fmt::Display) -> Self {
        Self::InvalidId(format!("command for {got} sent to {expected}"))
    }
}
