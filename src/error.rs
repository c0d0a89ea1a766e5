//! Error types for the effects engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the effects engine
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the engine
    #[error("Engine initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load a page
    #[error("Failed to load page: {0}")]
    LoadError(String),

    /// Failed to produce a state snapshot
    #[error("Snapshot failed: {0}")]
    SnapshotError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Network error
    #[cfg(feature = "fetch")]
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
