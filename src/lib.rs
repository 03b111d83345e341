//! # sproto-codec
//!
//! Schema-driven, tag-sparse binary message codec.
//!
//! A compact, self-describing wire format: each encoded struct is a table of
//! 2-byte entries naming which tags are present (or skipped), followed by a
//! data segment of length-prefixed payloads. Small integers and booleans
//! ride inline in their table entry at zero data-segment cost; unknown tags
//! decode by skipping their payload, so old readers handle new writers.
//!
//! Message types and request/response protocols come from a precompiled
//! binary schema blob parsed once at startup. The codec is transport
//! agnostic: it only consumes and produces byte sequences.
//!
//! ## Modules
//! - **core**: wire primitives and the field-table entry encoding
//! - **schema**: blob loading, the type/protocol model, query caching
//! - **codec**: value trees, encoder, decoder
//! - **utils**: the identity pack/unpack stream hooks
//!
//! ## Example
//! ```no_run
//! use sproto_codec::{load_schema, Value};
//!
//! # fn main() -> sproto_codec::Result<()> {
//! let blob = std::fs::read("game.spb").expect("schema blob");
//! let schema = load_schema(&blob)?;
//!
//! let login: Value = [("token".to_string(), Value::from("abc123"))]
//!     .into_iter()
//!     .collect();
//! let bytes = schema.encode("login.req", &login)?;
//! let back = schema.decode("login.req", &bytes)?;
//! assert_eq!(back.get("token"), Some(&Value::from("abc123")));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod core;
pub mod error;
pub mod schema;
pub mod utils;

pub use codec::{decode_with_limits, encode_with_limits, Map, Value};
pub use config::CodecLimits;
pub use error::{CodecError, Result};
pub use schema::{Field, FieldKind, Protocol, ProtocolQuery, Schema, Type};
pub use utils::{pack, unpack};

/// Parse a schema blob. Convenience alias for [`Schema::load`].
pub fn load_schema(blob: &[u8]) -> Result<Schema> {
    Schema::load(blob)
}
