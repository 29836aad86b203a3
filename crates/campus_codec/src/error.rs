//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A table name outside the fixed schema.
    #[error("unknown table: {name}")]
    UnknownTable {
        /// The name that was not recognized.
        name: String,
    },

    /// The buffer does not start with the workbook magic bytes.
    #[error("not a workbook document")]
    BadMagic,

    /// The workbook was written by an unsupported format version.
    #[error("unsupported workbook format version {found}, expected {expected}")]
    UnsupportedFormat {
        /// Version found in the buffer.
        found: u8,
        /// Version this build reads.
        expected: u8,
    },

    /// Failed to encode a workbook.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode a workbook body.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },
}

impl CodecError {
    /// Creates an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Creates a decoding error.
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }
}
