//! Error type for this crate.
use std::io;

/// A result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// A mapping entry references a field that does not exist in the fields config.
    #[error("field resolution error: path `{path}` references missing field {index}")]
    FieldResolution { path: String, index: i64 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("node `{0}` is not a leaf")]
    NotALeaf(String),
    #[error("leaf `{0}` has no fields")]
    EmptyLeaf(String),
    #[error("no leaf selected")]
    NoSelection,
    #[error("no leaf found for path `{0}`")]
    LeafNotFound(String),
    /// The selected leaf does not offer the identifier toggle.
    #[error("leaf `{0}` cannot be used as the identifier")]
    IdentifierNotOffered(String),
    #[error("check found {0} error(s)")]
    Diagnostics(usize),
}
