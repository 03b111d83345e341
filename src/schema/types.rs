//! # Schema Data Model
//!
//! The in-memory form of a parsed schema blob.
//!
//! All [`Type`]s live in one owned arena inside [`Schema`], indexed by parse
//! order. Struct-typed fields and protocol request/response slots store arena
//! indices rather than owning references, so mutually and self-referential
//! types form no ownership cycles. A `Schema` is immutable once loaded and
//! safe to share read-only across threads.

use serde::{Deserialize, Serialize};

use crate::schema::cache::QueryCache;

/// Base wire types a field can declare.
///
/// The array flag is carried separately on [`Field`]; the code's low seven
/// bits select the base type. Codes this crate does not understand are kept
/// verbatim so they can be reported at encode/decode time instead of
/// poisoning the whole schema at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Integer,
    Boolean,
    Str,
    Struct,
    Double,
    /// A base type code this crate does not implement.
    Other(u32),
}

/// Array marker bit in a field's wire type code.
pub const TYPE_ARRAY_FLAG: u32 = 0x80;

impl FieldKind {
    /// Decode the base type from a wire type code (array bit already masked).
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => FieldKind::Integer,
            1 => FieldKind::Boolean,
            2 => FieldKind::Str,
            3 => FieldKind::Struct,
            4 => FieldKind::Double,
            other => FieldKind::Other(other),
        }
    }
}

/// One field of a [`Type`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Numeric wire identifier. Tags ascend within a type but need not be
    /// contiguous.
    pub tag: u32,
    /// Field name, the key used in decoded value trees.
    pub name: String,
    /// Base wire type.
    pub kind: FieldKind,
    /// Whether the field holds an array of `kind` elements.
    pub array: bool,
    /// For integers: a fixed-point scale factor (0 = plain integer).
    /// For strings: non-zero marks the payload as raw bytes, not UTF-8.
    pub extra: u32,
    /// Tag of the array element field acting as a map key, where the schema
    /// declares one. Carried through for map-style arrays; the codec does not
    /// interpret it.
    pub key: Option<u32>,
    /// Arena index of the referenced type, for struct fields whose type name
    /// was already registered when this field was parsed.
    pub struct_ref: Option<usize>,
}

impl Field {
    /// Whether an integer field carries a fixed-point scale factor.
    pub fn scale(&self) -> Option<u32> {
        match self.kind {
            FieldKind::Integer if self.extra != 0 => Some(self.extra),
            _ => None,
        }
    }

    /// Whether a string field's payload is raw bytes rather than UTF-8.
    pub fn raw_bytes(&self) -> bool {
        matches!(self.kind, FieldKind::Str) && self.extra != 0
    }
}

/// A named, ordered sequence of fields. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type {
    /// Type name, unique within a schema.
    pub name: String,
    /// Fields in ascending tag order.
    pub fields: Vec<Field>,
}

impl Type {
    /// Find the field declared for `tag`, if any.
    pub fn field_by_tag(&self, tag: u32) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Find a field by name, if any.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One message exchange shape: a tagged name with optional request and
/// response types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    /// Numeric wire identifier.
    pub tag: u32,
    /// Protocol name.
    pub name: String,
    /// Arena index of the request type, if the protocol declares one.
    pub request: Option<usize>,
    /// Arena index of the response type, if the protocol declares one.
    pub response: Option<usize>,
}

/// A fully parsed schema: the type arena, the protocol table and the lookup
/// cache that fronts them.
///
/// Constructed once from a binary blob via [`Schema::load`](crate::Schema::load)
/// and never mutated afterwards.
#[derive(Debug)]
pub struct Schema {
    pub(crate) types: Vec<Type>,
    pub(crate) protocols: Vec<Protocol>,
    pub(crate) cache: QueryCache,
}

/// Lookup key for [`Schema::query_protocol`](crate::Schema::query_protocol):
/// protocols are identified interchangeably by name or numeric tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolQuery<'a> {
    Name(&'a str),
    Tag(u32),
}

impl<'a> From<&'a str> for ProtocolQuery<'a> {
    fn from(name: &'a str) -> Self {
        ProtocolQuery::Name(name)
    }
}

impl From<u32> for ProtocolQuery<'_> {
    fn from(tag: u32) -> Self {
        ProtocolQuery::Tag(tag)
    }
}

impl Schema {
    /// All types in parse order.
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// All protocols in parse order.
    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }

    /// Resolve an arena index produced by [`Field::struct_ref`] or a
    /// [`Protocol`] slot.
    pub fn type_at(&self, index: usize) -> Option<&Type> {
        self.types.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_kind_codes() {
        assert_eq!(FieldKind::from_code(0), FieldKind::Integer);
        assert_eq!(FieldKind::from_code(4), FieldKind::Double);
        assert_eq!(FieldKind::from_code(9), FieldKind::Other(9));
    }

    #[test]
    fn scale_only_applies_to_integers() {
        let mut f = Field {
            tag: 0,
            name: "price".into(),
            kind: FieldKind::Integer,
            array: false,
            extra: 100,
            key: None,
            struct_ref: None,
        };
        assert_eq!(f.scale(), Some(100));
        f.kind = FieldKind::Str;
        assert_eq!(f.scale(), None);
        assert!(f.raw_bytes());
    }
}
