//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while reading, writing or coercing records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Xml {
        /// Byte offset reported by the reader.
        position: u64,
        /// Description of the syntax error.
        message: String,
    },

    /// Serializing the element tree failed.
    #[error("XML write failed: {message}")]
    WriteFailed {
        /// Description of the write error.
        message: String,
    },

    /// A raw field could not be coerced to the requested type.
    #[error("field {field}: cannot read {raw:?} as {expected}")]
    InvalidValue {
        /// Name of the field being coerced.
        field: String,
        /// The raw text found in the document.
        raw: String,
        /// The expected semantic type.
        expected: &'static str,
    },

    /// A typed record requires a field that is absent.
    #[error("required field {field} missing from {record} record")]
    MissingField {
        /// Record kind being decoded.
        record: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Document bytes are not valid UTF-8.
    #[error("invalid UTF-8 in document")]
    InvalidUtf8,
}

impl CodecError {
    /// Creates a malformed XML error.
    pub fn xml(position: u64, message: impl Into<String>) -> Self {
        Self::Xml {
            position,
            message: message.into(),
        }
    }

    /// Creates a write failure error.
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::WriteFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        raw: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            raw: raw.into(),
            expected,
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(record: &'static str, field: &'static str) -> Self {
        Self::MissingField { record, field }
    }
}
