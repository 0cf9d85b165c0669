//! Error types for scene construction and buffer serialization.

use thiserror::Error;

/// Main error type for tracebox operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene has no primitives to build a hierarchy over
    #[error("Scene is empty: at least one primitive is required")]
    EmptyScene,

    /// Flat GPU buffer is too small for the entities written into it
    #[error("{buffer} buffer capacity exceeded: {required} rows required, {capacity} available")]
    CapacityExceeded {
        buffer: &'static str,
        required: usize,
        capacity: usize,
    },

    /// Degenerate primitive parameters (radius, rectangle bounds, empty mesh)
    #[error("Invalid primitive: {0}")]
    InvalidPrimitive(String),

    /// Material handle does not exist in the scene
    #[error("Unknown material handle: {0}")]
    UnknownMaterial(u32),

    /// Primitive handle does not exist in the scene
    #[error("Unknown primitive handle: {0}")]
    UnknownPrimitive(u32),

    /// Reference scene name not recognized
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// Malformed buffer dump
    #[error("Invalid dump: {0}")]
    InvalidDump(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid primitive error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidPrimitive(msg.into())
    }
}

/// Result type alias for tracebox operations.
pub type Result<T> = std::result::Result<T, Error>;
