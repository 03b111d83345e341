//! # Schema Loader
//!
//! Parses a precompiled binary schema blob into the in-memory [`Schema`].
//!
//! ## Blob Layout
//! ```text
//! [TypeCount(4)]
//!   per type:     [NameLen(4)] [BodyLen(4)] [Name] [Body]
//!   type body:    [FieldCount(4)]
//!     per field:  [Tag(4)] [TypeCode(4)] [NameLen(4)] [Extra(4)] [Name]
//! [ProtoCount(4)]                          -- only if bytes remain
//!   per proto:    [Tag(4)] [NameLen(4)] [ReqLen(4)] [RespLen(4)]
//!                 [Name] [ReqTypeName?] [RespTypeName?]
//! ```
//! All integers little-endian. A field's type code keeps the base type in its
//! low seven bits; bit `0x80` marks an array.
//!
//! ## Truncation Contract
//! A short buffer is never read out of bounds and never panics the loader:
//! parsing stops at the first element that does not fit and whatever types
//! and protocols were fully parsed before that point are returned. Only a
//! buffer too short to hold the leading type count is rejected outright.
//!
//! ## Reference Resolution
//! A struct-typed field resolves by name against the types registered so far;
//! a type's own name is registered before its body is parsed, so self and
//! backward references resolve while forward references stay unresolved (a
//! preserved limitation of the single-pass format). Protocol request and
//! response names resolve after all types, so they see the full arena.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::core::wire::Reader;
use crate::error::{CodecError, Result};
use crate::schema::cache::QueryCache;
use crate::schema::types::{Field, FieldKind, Protocol, Schema, Type, TYPE_ARRAY_FLAG};

/// Error context for the fixed head of a field record.
const FIELD_RECORD_HEAD: &str = "schema field record";
/// Error context for the fixed head of a protocol record.
const PROTO_RECORD_HEAD: &str = "schema protocol record";

impl Schema {
    /// Parse a schema blob. See the module docs for the layout and the
    /// truncation contract.
    pub fn load(blob: &[u8]) -> Result<Schema> {
        let mut reader = Reader::new(blob);
        let type_count = reader
            .u32("schema type count")
            .map_err(|_| CodecError::SchemaTruncated)?;

        let mut types: Vec<Type> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for _ in 0..type_count {
            let Some((name, body)) = read_type_record(&mut reader) else {
                warn!(
                    parsed = types.len(),
                    declared = type_count,
                    "schema blob truncated inside type table"
                );
                break;
            };
            // Register the name before parsing the body so the body's struct
            // fields can reference this type (or any earlier one) by name.
            let index = types.len();
            by_name.insert(name.clone(), index);
            types.push(Type {
                name,
                fields: Vec::new(),
            });
            types[index].fields = parse_fields(body, &by_name);
        }

        let mut protocols: Vec<Protocol> = Vec::new();
        if reader.remaining() > 0 {
            match reader.u32("schema protocol count") {
                Ok(proto_count) => {
                    for _ in 0..proto_count {
                        let Some(proto) = read_protocol_record(&mut reader, &by_name) else {
                            warn!(
                                parsed = protocols.len(),
                                declared = proto_count,
                                "schema blob truncated inside protocol table"
                            );
                            break;
                        };
                        protocols.push(proto);
                    }
                }
                Err(_) => {
                    warn!("schema blob truncated before protocol count");
                }
            }
        }

        debug!(
            types = types.len(),
            protocols = protocols.len(),
            "schema loaded"
        );

        Ok(Schema {
            types,
            protocols,
            cache: QueryCache::new(),
        })
    }
}

/// Read one `[NameLen][BodyLen][Name][Body]` record, or `None` on truncation.
fn read_type_record<'a>(reader: &mut Reader<'a>) -> Option<(String, &'a [u8])> {
    let name_len = reader.u32("type name length").ok()? as usize;
    let body_len = reader.u32("type body length").ok()? as usize;
    let name = reader.take(name_len, "type name").ok()?;
    let body = reader.take(body_len, "type body").ok()?;
    Some((String::from_utf8_lossy(name).into_owned(), body))
}

/// Parse a type body into its field list, stopping at the first truncated
/// field record. Fields come out in ascending tag order.
fn parse_fields(body: &[u8], by_name: &HashMap<String, usize>) -> Vec<Field> {
    let mut reader = Reader::new(body);
    let Ok(field_count) = reader.u32("field count") else {
        return Vec::new();
    };

    let mut fields = Vec::with_capacity(field_count.min(256) as usize);
    for _ in 0..field_count {
        let Some(field) = read_field_record(&mut reader, by_name) else {
            trace!(
                parsed = fields.len(),
                declared = field_count,
                "type body truncated inside field list"
            );
            break;
        };
        fields.push(field);
    }
    fields.sort_by_key(|f| f.tag);
    fields
}

fn read_field_record(reader: &mut Reader<'_>, by_name: &HashMap<String, usize>) -> Option<Field> {
    let tag = reader.u32(FIELD_RECORD_HEAD).ok()?;
    let code = reader.u32(FIELD_RECORD_HEAD).ok()?;
    let name_len = reader.u32(FIELD_RECORD_HEAD).ok()? as usize;
    let extra = reader.u32(FIELD_RECORD_HEAD).ok()?;
    let name = reader.take(name_len, "field name").ok()?;
    let name = String::from_utf8_lossy(name).into_owned();

    let kind = FieldKind::from_code(code & !TYPE_ARRAY_FLAG & 0x7F);
    let struct_ref = match kind {
        // The record carries no separate type name; a struct field resolves
        // by its own name against the types registered so far.
        FieldKind::Struct => by_name.get(&name).copied(),
        _ => None,
    };

    Some(Field {
        tag,
        name,
        kind,
        array: code & TYPE_ARRAY_FLAG != 0,
        extra,
        key: None,
        struct_ref,
    })
}

fn read_protocol_record(
    reader: &mut Reader<'_>,
    by_name: &HashMap<String, usize>,
) -> Option<Protocol> {
    let tag = reader.u32(PROTO_RECORD_HEAD).ok()?;
    let name_len = reader.u32(PROTO_RECORD_HEAD).ok()? as usize;
    let req_len = reader.u32(PROTO_RECORD_HEAD).ok()? as usize;
    let resp_len = reader.u32(PROTO_RECORD_HEAD).ok()? as usize;
    let name = reader.take(name_len, "protocol name").ok()?;
    let name = String::from_utf8_lossy(name).into_owned();

    let mut resolve = |len: usize| -> Option<Option<usize>> {
        if len == 0 {
            return Some(None);
        }
        let type_name = reader.take(len, "protocol type name").ok()?;
        let type_name = String::from_utf8_lossy(type_name);
        Some(by_name.get(type_name.as_ref()).copied())
    };

    let request = resolve(req_len)?;
    let response = resolve(resp_len)?;

    Some(Protocol {
        tag,
        name,
        request,
        response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal blob builders mirroring the layout in the module docs.
    fn push_u32(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    fn field_record(tag: u32, code: u32, extra: u32, name: &str) -> Vec<u8> {
        let mut out = Vec::new();
        push_u32(&mut out, tag);
        push_u32(&mut out, code);
        push_u32(&mut out, name.len() as u32);
        push_u32(&mut out, extra);
        out.extend_from_slice(name.as_bytes());
        out
    }

    fn type_body(fields: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        push_u32(&mut out, fields.len() as u32);
        for f in fields {
            out.extend_from_slice(f);
        }
        out
    }

    fn blob(types: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut out = Vec::new();
        push_u32(&mut out, types.len() as u32);
        for (name, body) in types {
            push_u32(&mut out, name.len() as u32);
            push_u32(&mut out, body.len() as u32);
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(body);
        }
        out
    }

    #[test]
    fn parses_types_and_fields() {
        let body = type_body(&[
            field_record(0, 0, 0, "id"),
            field_record(1, 2, 0, "name"),
            field_record(3, 0x80, 0, "scores"),
        ]);
        let schema = Schema::load(&blob(&[("player", body)])).unwrap();

        let ty = schema.query_type("player").unwrap();
        assert_eq!(ty.fields.len(), 3);
        assert_eq!(ty.fields[0].kind, FieldKind::Integer);
        assert_eq!(ty.fields[1].kind, FieldKind::Str);
        assert!(ty.fields[2].array);
        assert_eq!(ty.fields[2].kind, FieldKind::Integer);
    }

    #[test]
    fn fields_are_sorted_by_tag() {
        let body = type_body(&[
            field_record(5, 0, 0, "later"),
            field_record(1, 0, 0, "earlier"),
        ]);
        let schema = Schema::load(&blob(&[("t", body)])).unwrap();
        let tags: Vec<u32> = schema.query_type("t").unwrap().fields.iter().map(|f| f.tag).collect();
        assert_eq!(tags, vec![1, 5]);
    }

    #[test]
    fn struct_field_resolves_backward_and_self() {
        let inner = type_body(&[field_record(0, 0, 0, "id")]);
        let node = type_body(&[
            field_record(0, 0, 0, "value"),
            // references the enclosing type by name
            field_record(1, 3, 0, "node"),
            // backward reference to the earlier type
            field_record(2, 3, 0, "inner"),
        ]);
        let schema = Schema::load(&blob(&[("inner", inner), ("node", node)])).unwrap();

        let node_ty = schema.query_type("node").unwrap();
        assert_eq!(node_ty.field_by_tag(1).unwrap().struct_ref, Some(1));
        assert_eq!(node_ty.field_by_tag(2).unwrap().struct_ref, Some(0));
    }

    #[test]
    fn forward_struct_reference_stays_unresolved() {
        let early = type_body(&[field_record(0, 3, 0, "late")]);
        let late = type_body(&[field_record(0, 0, 0, "id")]);
        let schema = Schema::load(&blob(&[("early", early), ("late", late)])).unwrap();
        assert_eq!(
            schema.query_type("early").unwrap().field_by_tag(0).unwrap().struct_ref,
            None
        );
    }

    #[test]
    fn empty_blob_is_truncated() {
        assert!(matches!(Schema::load(&[]), Err(CodecError::SchemaTruncated)));
        assert!(matches!(Schema::load(&[1, 0]), Err(CodecError::SchemaTruncated)));
    }

    #[test]
    fn truncated_type_table_returns_partial_schema() {
        let body = type_body(&[field_record(0, 0, 0, "id")]);
        let mut bytes = blob(&[("whole", body)]);
        // Claim a second type that is not there.
        bytes[0] = 2;
        let schema = Schema::load(&bytes).unwrap();
        assert_eq!(schema.types().len(), 1);
        assert!(schema.query_type("whole").is_some());
    }

    #[test]
    fn protocols_resolve_request_and_response() {
        let req = type_body(&[field_record(0, 0, 0, "what")]);
        let resp = type_body(&[field_record(0, 1, 0, "ok")]);
        let mut bytes = blob(&[("login.req", req), ("login.resp", resp)]);
        push_u32(&mut bytes, 1); // protocol count
        push_u32(&mut bytes, 10); // tag
        push_u32(&mut bytes, 5); // name len
        push_u32(&mut bytes, 9); // request len
        push_u32(&mut bytes, 10); // response len
        bytes.extend_from_slice(b"login");
        bytes.extend_from_slice(b"login.req");
        bytes.extend_from_slice(b"login.resp");

        let schema = Schema::load(&bytes).unwrap();
        let proto = schema.query_protocol(10u32).unwrap();
        assert_eq!(proto.name, "login");
        assert_eq!(proto.request, Some(0));
        assert_eq!(proto.response, Some(1));
        assert_eq!(schema.type_at(proto.request.unwrap()).unwrap().name, "login.req");
    }

    #[test]
    fn protocol_without_types_has_empty_slots() {
        let mut bytes = blob(&[]);
        push_u32(&mut bytes, 1);
        push_u32(&mut bytes, 1); // tag
        push_u32(&mut bytes, 9); // name len
        push_u32(&mut bytes, 0); // no request
        push_u32(&mut bytes, 0); // no response
        bytes.extend_from_slice(b"heartbeat");

        let schema = Schema::load(&bytes).unwrap();
        let proto = schema.query_protocol("heartbeat").unwrap();
        assert_eq!(proto.tag, 1);
        assert_eq!(proto.request, None);
        assert_eq!(proto.response, None);
    }
}
