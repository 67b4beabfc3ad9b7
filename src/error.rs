//! Error types for yt-card-filter.
//!
//! Parsing and extraction never fail: they degrade to "unknown". Errors only
//! come out of configuration handling and the removal collaborator.

/// Error type for configuration and card-processing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration JSON could not be read or written.
    #[error("Configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration store rejected a load or save.
    #[error("Configuration store failed: {0}")]
    Store(String),

    /// The card (or its container) is no longer attached to the page.
    #[error("Card is detached from the page")]
    Detached,

    /// No HTML was supplied.
    #[error("Empty input document")]
    EmptyInput,
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
