//! Error types for ADM parsing and validation.

use thiserror::Error;

/// Result type alias for ADM operations.
pub type Result<T> = std::result::Result<T, AdmError>;

/// Errors that can occur while building or consuming an ADM graph.
#[derive(Error, Debug)]
pub enum AdmError {
    /// Malformed XML, or a scalar value that could not be converted.
    #[error("XML parse error at byte {position}: {reason}")]
    XmlParse {
        /// Byte offset into the `axml` payload.
        position: u64,
        /// Description of the failure.
        reason: String,
    },

    /// The filtered ADM contains no audio objects.
    #[error("No audioObject present")]
    NoObjects,
}

impl AdmError {
    /// Create an XML parse error at a byte position.
    pub fn xml_parse(position: u64, reason: impl Into<String>) -> Self {
        AdmError::XmlParse {
            position,
            reason: reason.into(),
        }
    }
}
