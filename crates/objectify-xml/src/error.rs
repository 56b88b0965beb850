//! Error types for element construction and XML parsing.

use thiserror::Error;

/// Result type alias for objectify-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building element trees or parsing XML.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}")]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred, when known.
        position: Option<u64>,
    },

    /// The document ended while an element was still open.
    #[error("unexpected end of input, expected closing tag </{tag}>")]
    UnexpectedEof {
        /// Name of the element left open.
        tag: String,
    },

    /// A closing tag did not match the element it was closing.
    #[error("mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// Structurally invalid XML (e.g. a stray closing tag).
    #[error("invalid XML structure: {message}")]
    InvalidStructure { message: String },

    /// The document contains no root element.
    #[error("empty XML document: no root element found")]
    EmptyDocument,

    /// The document contains more than one root element.
    #[error("invalid XML: multiple root elements")]
    MultipleRoots,

    /// An element was constructed from a payload kind it cannot hold.
    #[error("Invalid child type: {found}")]
    InvalidChildType {
        /// Runtime type name of the offending payload.
        found: &'static str,
    },

    /// An attempt was made to reassign an immutable attribute.
    #[error("attribute {attribute:?} of {type_name:?} objects is not writable")]
    NotWritable {
        attribute: &'static str,
        type_name: &'static str,
    },
}
