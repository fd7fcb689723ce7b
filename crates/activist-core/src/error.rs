//! Error types for Activist Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Tenant already exists: {0}")]
    DuplicateSlug(String),

    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Storage could not be read or written. The message never carries the
    /// underlying OS error text.
    #[error("Persistence unavailable: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
