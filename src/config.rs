//! # Configuration
//!
//! Wire-layout constants and tunable codec limits.
//!
//! The byte-layout constants are contractual: they describe the existing wire
//! format and must not change. `CodecLimits` bundles the two resource bounds
//! the codec enforces (recursion depth and encoded size) so callers with
//! unusual requirements can tighten or relax them per call via
//! [`crate::codec::encode_with_limits`] / [`crate::codec::decode_with_limits`].

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};

/// Bytes occupied by a struct's leading entry-count header.
pub const SIZEOF_HEADER: usize = 2;

/// Bytes occupied by one field-table entry.
pub const SIZEOF_FIELD: usize = 2;

/// Bytes occupied by a data-segment length prefix.
pub const SIZEOF_LENGTH: usize = 4;

/// Maximum struct nesting depth for both encode and decode.
pub const MAX_DEPTH: usize = 64;

/// Largest integer value an inline field-table entry can carry.
///
/// The inline wire form stores `value + 1` shifted left by one, so a 16-bit
/// entry tops out at `0x7FFE`. Larger non-negative integers take the 4-byte
/// data-segment form.
pub const MAX_INLINE: i64 = 0x7FFE;

/// Max allowed encoded message size (16 MiB).
pub const MAX_MESSAGE_SIZE: usize = 0x0100_0000;

/// Resource bounds applied to a single encode or decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecLimits {
    /// Maximum struct nesting depth.
    pub max_depth: usize,

    /// Maximum size of an encoded message in bytes.
    pub max_message_size: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl CodecLimits {
    /// Validate that the limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(CodecError::DepthExceeded);
        }
        if self.max_message_size < SIZEOF_HEADER {
            return Err(CodecError::OversizedMessage(self.max_message_size));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_valid() {
        let limits = CodecLimits::default();
        assert!(limits.validate().is_ok());
        assert_eq!(limits.max_depth, 64);
        assert_eq!(limits.max_message_size, 16 * 1024 * 1024);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let limits = CodecLimits {
            max_depth: 0,
            ..CodecLimits::default()
        };
        assert_eq!(limits.validate(), Err(CodecError::DepthExceeded));
    }
}
