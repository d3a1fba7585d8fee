//! Error types for poketrack

use thiserror::Error;

/// Unified error type for poketrack operations
#[derive(Debug, Error)]
pub enum PokeTrackError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// File I/O error (data directory, catalog file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse a JSON catalog file
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The shared database connection lock was poisoned by a panicking holder
    #[error("Database lock poisoned")]
    LockPoisoned,
}

/// Short alias used across the crate
pub type Error = PokeTrackError;

/// Result alias for poketrack operations
pub type Result<T> = std::result::Result<T, PokeTrackError>;
