//! Error types for projection access.

use thiserror::Error;

/// Result type alias for objectify operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when building or indexing a projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Markup parsing failed on the explicit XML entry path.
    #[error(transparent)]
    Parse(#[from] objectify_xml::Error),

    /// A positional index into a sequence was out of bounds.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A mapping was indexed with a key it does not contain.
    ///
    /// Positional indexes into mappings report the stringified position as
    /// the missing key.
    #[error("no entry for key {key:?}")]
    KeyNotFound { key: String },
}
