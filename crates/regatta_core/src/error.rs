//! Error types for the regatta store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The closed set of failure kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A file, section, keyed row or snapshot does not exist.
    NotFound,
    /// The document is not well-formed or lacks a required part.
    Malformed,
    /// The operation would create a duplicate key.
    Conflict,
    /// Caller-supplied data is incomplete or out of bounds.
    Validation,
    /// The filesystem failed underneath the operation.
    Io,
}

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document file does not exist.
    #[error("document not found: {}", path.display())]
    DocumentNotFound {
        /// Path that was opened.
        path: PathBuf,
    },

    /// A top-level section is missing from the document.
    #[error("section not found: {section}")]
    SectionNotFound {
        /// Section element name.
        section: String,
    },

    /// No row carries the requested key.
    #[error("no row in {section} with {key_field} = {key_value}")]
    RowNotFound {
        /// Section searched.
        section: String,
        /// Key field compared.
        key_field: String,
        /// Key value looked for.
        key_value: String,
    },

    /// The snapshot file does not exist.
    #[error("snapshot not found: {}", path.display())]
    SnapshotNotFound {
        /// Path that was given.
        path: PathBuf,
    },

    /// The starting template is missing.
    #[error("template not found: {}", path.display())]
    TemplateNotFound {
        /// Configured template path.
        path: PathBuf,
    },

    /// The document is not a valid scoring document.
    #[error("malformed document: {message}")]
    Malformed {
        /// Description of the problem.
        message: String,
    },

    /// A key already exists.
    #[error("conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// Caller input was rejected.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the problem.
        message: String,
    },

    /// XML or field codec error.
    #[error("codec error: {0}")]
    Codec(#[from] regatta_codec::CodecError),

    /// Snapshot metadata could not be (de)serialized.
    #[error("metadata error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// Creates a section-not-found error.
    pub fn section_not_found(section: impl Into<String>) -> Self {
        Self::SectionNotFound {
            section: section.into(),
        }
    }

    /// Creates a row-not-found error.
    pub fn row_not_found(
        section: impl Into<String>,
        key_field: impl Into<String>,
        key_value: impl Into<String>,
    ) -> Self {
        Self::RowNotFound {
            section: section.into(),
            key_field: key_field.into(),
            key_value: key_value.into(),
        }
    }

    /// Creates a malformed-document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Maps the error onto its kind.
    ///
    /// Codec errors count as malformed: they come from parsing the document
    /// or coercing a field read from it.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DocumentNotFound { .. }
            | Self::SectionNotFound { .. }
            | Self::RowNotFound { .. }
            | Self::SnapshotNotFound { .. }
            | Self::TemplateNotFound { .. } => ErrorKind::NotFound,
            Self::Malformed { .. } | Self::Codec(_) | Self::Json(_) => ErrorKind::Malformed,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}
