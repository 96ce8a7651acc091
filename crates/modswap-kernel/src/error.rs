//! Typed errors for the host ports.

use thiserror::Error;

/// Errors surfaced by the host dispatch subsystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostError {
    /// The host loader failed while loading a module.
    #[error("module load failed: {0}")]
    LoadFailed(String),

    /// The host failed while unloading a module.
    #[error("module unload failed: {0}")]
    UnloadFailed(String),

    /// A hook callback returned an error.
    #[error("hook callback failed: {0}")]
    Hook(String),

    /// An I/O error surfaced during a host operation.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for host failures that don't fit the above categories.
    #[error("{0}")]
    Other(String),
}

/// Result type for host port operations.
pub type HostResult<T> = Result<T, HostError>;
