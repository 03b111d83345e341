//! Shared schema-blob builders for the integration tests.
//!
//! These mirror the blob layout the loader documents: a type count, then
//! per-type name/body records, then an optional protocol section.

#![allow(dead_code)]

use sproto_codec::Value;

pub fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// One field record: tag, wire type code, extra, name.
pub fn field(tag: u32, code: u32, extra: u32, name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, tag);
    push_u32(&mut out, code);
    push_u32(&mut out, name.len() as u32);
    push_u32(&mut out, extra);
    out.extend_from_slice(name.as_bytes());
    out
}

/// A type body from its field records.
pub fn type_body(fields: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, fields.len() as u32);
    for f in fields {
        out.extend_from_slice(f);
    }
    out
}

/// A whole blob from named type bodies, without a protocol section.
pub fn blob(types: &[(&str, Vec<u8>)]) -> Vec<u8> {
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

/// Append a protocol section to a blob. Each entry is
/// `(tag, name, request type name, response type name)`; empty names mean
/// "no such type".
pub fn append_protocols(out: &mut Vec<u8>, protocols: &[(u32, &str, &str, &str)]) {
    push_u32(out, protocols.len() as u32);
    for (tag, name, request, response) in protocols {
        push_u32(out, *tag);
        push_u32(out, name.len() as u32);
        push_u32(out, request.len() as u32);
        push_u32(out, response.len() as u32);
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(request.as_bytes());
        out.extend_from_slice(response.as_bytes());
    }
}

/// Build a struct value from name/value pairs.
pub fn strukt(pairs: &[(&str, Value)]) -> Value {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

// Wire type codes, as the blob format defines them.
pub const T_INTEGER: u32 = 0;
pub const T_BOOLEAN: u32 = 1;
pub const T_STRING: u32 = 2;
pub const T_STRUCT: u32 = 3;
pub const T_DOUBLE: u32 = 4;
pub const T_ARRAY: u32 = 0x80;
