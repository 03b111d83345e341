//! # Schema Handling
//!
//! Loading, modelling and querying compiled schema blobs.
//!
//! ## Components
//! - **Types**: the arena-backed [`Schema`] / [`Type`] / [`Field`] /
//!   [`Protocol`] model
//! - **Loader**: the binary blob parser with its truncation contract
//! - **Cache**: memoized name/tag lookups over the parsed tables

pub mod cache;
pub mod loader;
pub mod types;

pub use types::{Field, FieldKind, Protocol, ProtocolQuery, Schema, Type};

use crate::error::{CodecError, Result};

impl Schema {
    /// Look up a type by name. First lookup scans the arena and memoizes the
    /// result; later lookups hit the cache.
    pub fn query_type(&self, name: &str) -> Option<&Type> {
        let index = self
            .cache
            .type_index(name, || self.types.iter().position(|t| t.name == name))?;
        self.types.get(index)
    }

    /// Look up a protocol by name or numeric tag.
    ///
    /// ```
    /// # use sproto_codec::Schema;
    /// # let schema = Schema::load(&[0u8, 0, 0, 0]).unwrap();
    /// let by_name = schema.query_protocol("login");
    /// let by_tag = schema.query_protocol(10u32);
    /// assert!(by_name.is_none() && by_tag.is_none());
    /// ```
    pub fn query_protocol<'a>(&self, query: impl Into<ProtocolQuery<'a>>) -> Option<&Protocol> {
        let index = match query.into() {
            ProtocolQuery::Name(name) => self
                .cache
                .protocol_by_name(name, || self.protocols.iter().position(|p| p.name == name)),
            ProtocolQuery::Tag(tag) => self
                .cache
                .protocol_by_tag(tag, || self.protocols.iter().position(|p| p.tag == tag)),
        }?;
        self.protocols.get(index)
    }

    /// Like [`query_protocol`](Schema::query_protocol), but a missing
    /// protocol is an error rather than `None`.
    pub fn protocol<'a>(&self, query: impl Into<ProtocolQuery<'a>>) -> Result<&Protocol> {
        let query = query.into();
        self.query_protocol(query).ok_or_else(|| {
            CodecError::UnknownProtocol(match query {
                ProtocolQuery::Name(name) => name.to_string(),
                ProtocolQuery::Tag(tag) => format!("#{tag}"),
            })
        })
    }
}
