//! Error types for the particle-life engine.
//!
//! The tick path never fails; these errors cover construction from an
//! invalid configuration, checked edits forwarded from untrusted input, and
//! snapshot export.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A species index outside `[0, M)`
    #[error("species {species} out of range (species count {species_count})")]
    SpeciesOutOfRange {
        species: usize,
        species_count: usize,
    },

    /// Configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// File system errors
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
