//! # Error Types
//!
//! Comprehensive error handling for the codec.
//!
//! This module defines every failure the schema loader, encoder and decoder
//! can report. All errors are local, synchronous conditions returned to the
//! immediate caller; the codec has no retry policy of its own.
//!
//! ## Error Categories
//! - **Schema Errors**: truncated blobs, unknown type or protocol names
//! - **Encode Errors**: value shape mismatches, depth overruns, oversized output
//! - **Decode Errors**: length prefixes or table entries pointing outside the buffer
//!
//! The one deliberate non-error: a decoded field-table entry whose tag the
//! target type does not declare is skipped silently (its payload is still
//! consumed so the data-segment cursor stays positioned). That is the wire
//! format's forward-compatibility contract, not a swallowed failure.
//!
//! All errors implement `std::error::Error` for interoperability.

use serde::Serialize;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common error cases.
pub mod constants {
    /// Struct-level framing errors
    pub const ERR_SHORT_HEADER: &str = "Buffer shorter than its entry-count header";
    pub const ERR_SHORT_FIELD_TABLE: &str = "Buffer shorter than its declared field table";
    pub const ERR_SHORT_LENGTH_PREFIX: &str = "Data segment ends inside a length prefix";
    pub const ERR_SHORT_PAYLOAD: &str = "Length prefix points past the end of the data segment";

    /// Field payload errors
    pub const ERR_INLINE_NOT_SCALAR: &str = "Inline entry on a field that is not integer or boolean";
    pub const ERR_BAD_INTEGER_WIDTH: &str = "Integer payload is neither 4 nor 8 bytes";
    pub const ERR_BAD_DOUBLE_WIDTH: &str = "Double payload is not 8 bytes";
    pub const ERR_BOOLEAN_NOT_INLINE: &str = "Boolean field carried in the data segment";
    pub const ERR_INVALID_UTF8: &str = "String payload is not valid UTF-8";

    /// Nested structure errors
    pub const ERR_STRUCT_LENGTH: &str = "Nested struct did not consume its declared payload";
    pub const ERR_PARTIAL_ELEMENT: &str = "Array element would read past the payload boundary";
}

/// CodecError is the primary error type for all schema and codec operations.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum CodecError {
    #[error("Schema blob truncated")]
    SchemaTruncated,

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("Type mismatch on field `{field}`: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("Structure too deeply nested")]
    DepthExceeded,

    #[error("Malformed buffer: {0}")]
    MalformedBuffer(&'static str),

    #[error("Unsupported field type: {0:#x}")]
    UnsupportedFieldType(u32),

    #[error("Encoded message too large: {0} bytes")]
    OversizedMessage(usize),
}

impl CodecError {
    /// Shorthand for the common mismatch case.
    pub(crate) fn mismatch(field: &str, expected: &'static str) -> Self {
        CodecError::TypeMismatch {
            field: field.to_string(),
            expected,
        }
    }
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
