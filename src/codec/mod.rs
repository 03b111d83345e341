//! # Codec
//!
//! Value trees and the encode/decode walks that bind them to schema types.
//!
//! ## Components
//! - **Value**: the dynamically-typed tree the application manipulates
//! - **Encoder**: value tree + [`Type`] → wire bytes
//! - **Decoder**: wire bytes + [`Type`] → value tree
//!
//! Both walks are purely synchronous with no I/O or suspension points; a
//! call either returns a complete result or fails immediately. Recursion
//! depth is the only internally bounded resource.

pub mod decoder;
pub mod encoder;
pub mod value;

pub use decoder::decode_with_limits;
pub use encoder::encode_with_limits;
pub use value::{Map, Value};

use crate::config::CodecLimits;
use crate::error::{CodecError, Result};
use crate::schema::{Schema, Type};
use crate::utils::packing::{pack, unpack};

impl Schema {
    /// Encode a value tree as the named type.
    pub fn encode(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        let ty = self
            .query_type(type_name)
            .ok_or_else(|| CodecError::UnknownType(type_name.to_string()))?;
        encode_with_limits(self, ty, value, &CodecLimits::default())
    }

    /// Encode a value tree as a pre-resolved type handle.
    pub fn encode_type(&self, ty: &Type, value: &Value) -> Result<Vec<u8>> {
        encode_with_limits(self, ty, value, &CodecLimits::default())
    }

    /// Decode a buffer as the named type.
    pub fn decode(&self, type_name: &str, buf: &[u8]) -> Result<Value> {
        let ty = self
            .query_type(type_name)
            .ok_or_else(|| CodecError::UnknownType(type_name.to_string()))?;
        decode_with_limits(self, ty, buf, &CodecLimits::default())
    }

    /// Decode a buffer as a pre-resolved type handle.
    pub fn decode_type(&self, ty: &Type, buf: &[u8]) -> Result<Value> {
        decode_with_limits(self, ty, buf, &CodecLimits::default())
    }

    /// Encode then run the output through the [`pack`] stream hook.
    pub fn encode_packed(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        Ok(pack(&self.encode(type_name, value)?))
    }

    /// Run the input through the [`unpack`] stream hook, then decode.
    pub fn decode_packed(&self, type_name: &str, buf: &[u8]) -> Result<Value> {
        self.decode(type_name, &unpack(buf))
    }
}
