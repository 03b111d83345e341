//! # Decoder
//!
//! Reconstructs a value tree from an encoded buffer and the [`Type`] it was
//! produced for.
//!
//! The walk mirrors the encoder: a running tag cursor starts at -1 and every
//! field-table entry advances it by one (skip entries by their extra count on
//! top). Referenced entries always consume the next length-prefixed run of
//! the data segment, even when the resolved tag is unknown to the target
//! type: the payload is discarded but the cursor stays positioned, which is
//! what makes schema-superset buffers decode cleanly against older types.
//!
//! Every length and width read is bounds-checked; malformed input surfaces
//! as [`CodecError::MalformedBuffer`], never an out-of-bounds read.

use tracing::trace;

use crate::codec::value::{Map, Value};
use crate::config::{CodecLimits, SIZEOF_FIELD};
use crate::core::entry::FieldEntry;
use crate::core::wire::{combine64, expand64, read_f64, read_u16, read_u32, Reader};
use crate::error::{constants, CodecError, Result};
use crate::schema::{Field, FieldKind, Schema, Type};

struct DecodeCtx<'a> {
    schema: &'a Schema,
    limits: &'a CodecLimits,
}

/// Decode `buf` as wire type `ty` into a struct value tree.
///
/// Trailing bytes after the top-level data segment are ignored; nested
/// structs by contrast must consume exactly their declared payload.
pub fn decode_with_limits(
    schema: &Schema,
    ty: &Type,
    buf: &[u8],
    limits: &CodecLimits,
) -> Result<Value> {
    limits.validate()?;
    let ctx = DecodeCtx { schema, limits };
    let (map, _consumed) = decode_struct(&ctx, ty, buf, 0)?;
    Ok(Value::Struct(map))
}

/// Decode one struct, returning its field map and the number of bytes of
/// `buf` it consumed.
fn decode_struct(ctx: &DecodeCtx<'_>, ty: &Type, buf: &[u8], depth: usize) -> Result<(Map, usize)> {
    if depth >= ctx.limits.max_depth {
        return Err(CodecError::DepthExceeded);
    }

    let mut reader = Reader::new(buf);
    let entry_count = reader.u16(constants::ERR_SHORT_HEADER)? as usize;
    let table = reader.take(entry_count * SIZEOF_FIELD, constants::ERR_SHORT_FIELD_TABLE)?;

    let mut map = Map::new();
    let mut tag: i64 = -1;

    for i in 0..entry_count {
        let word = read_u16(&[table[i * SIZEOF_FIELD], table[i * SIZEOF_FIELD + 1]]);
        let entry = FieldEntry::from_word(word);
        tag += 1;

        match entry {
            FieldEntry::Skip(extra) => {
                tag += extra as i64;
            }
            FieldEntry::Inline(raw) => {
                let Some(field) = ty.field_by_tag(tag as u32) else {
                    trace!(tag, "skipping inline entry for unknown tag");
                    continue;
                };
                if field.array {
                    return Err(CodecError::MalformedBuffer(constants::ERR_INLINE_NOT_SCALAR));
                }
                match field.kind {
                    FieldKind::Integer => {
                        map.insert(field.name.clone(), scaled_integer(field, raw as i64));
                    }
                    FieldKind::Boolean => {
                        // 0 and 1 are the only represented states; anything
                        // else leaves the field absent.
                        if raw <= 1 {
                            map.insert(field.name.clone(), Value::Bool(raw == 1));
                        }
                    }
                    _ => {
                        return Err(CodecError::MalformedBuffer(constants::ERR_INLINE_NOT_SCALAR))
                    }
                }
            }
            FieldEntry::Referenced => {
                // Consume the run first so unknown tags leave the data
                // cursor correctly positioned for the fields after them.
                let payload = reader.length_prefixed()?;
                let Some(field) = ty.field_by_tag(tag as u32) else {
                    trace!(tag, len = payload.len(), "skipping payload for unknown tag");
                    continue;
                };
                let value = decode_payload(ctx, field, payload, depth)?;
                map.insert(field.name.clone(), value);
            }
        }
    }

    Ok((map, reader.consumed()))
}

/// Materialize one referenced field from its data-segment payload.
fn decode_payload(
    ctx: &DecodeCtx<'_>,
    field: &Field,
    payload: &[u8],
    depth: usize,
) -> Result<Value> {
    if field.array {
        return decode_array(ctx, field, payload, depth).map(Value::Array);
    }

    match field.kind {
        FieldKind::Integer => {
            let raw = match payload.len() {
                4 => expand64(read_u32(&[payload[0], payload[1], payload[2], payload[3]])),
                8 => {
                    let low = read_u32(&[payload[0], payload[1], payload[2], payload[3]]);
                    let high = read_u32(&[payload[4], payload[5], payload[6], payload[7]]);
                    combine64(low, high)
                }
                _ => return Err(CodecError::MalformedBuffer(constants::ERR_BAD_INTEGER_WIDTH)),
            };
            Ok(scaled_integer(field, raw))
        }
        FieldKind::Double => {
            let bytes: [u8; 8] = payload
                .try_into()
                .map_err(|_| CodecError::MalformedBuffer(constants::ERR_BAD_DOUBLE_WIDTH))?;
            Ok(Value::Double(read_f64(&bytes)))
        }
        FieldKind::Str => decode_string(field, payload),
        FieldKind::Struct => {
            let sub_ty = resolve_struct(ctx, field)?;
            let (sub_map, consumed) = decode_struct(ctx, sub_ty, payload, depth + 1)?;
            if consumed != payload.len() {
                return Err(CodecError::MalformedBuffer(constants::ERR_STRUCT_LENGTH));
            }
            Ok(Value::Struct(sub_map))
        }
        FieldKind::Boolean => Err(CodecError::MalformedBuffer(constants::ERR_BOOLEAN_NOT_INLINE)),
        FieldKind::Other(code) => Err(CodecError::UnsupportedFieldType(code)),
    }
}

/// Decode an array payload: fixed-width elements packed back-to-back,
/// string/struct elements individually length-prefixed, until the payload is
/// exhausted. A partial trailing element is malformed input.
fn decode_array(
    ctx: &DecodeCtx<'_>,
    field: &Field,
    payload: &[u8],
    depth: usize,
) -> Result<Vec<Value>> {
    let mut elements = Vec::new();
    let mut reader = Reader::new(payload);

    while reader.remaining() > 0 {
        let element = match field.kind {
            FieldKind::Integer => {
                let bytes = reader.take(4, constants::ERR_PARTIAL_ELEMENT)?;
                let raw = expand64(read_u32(&[bytes[0], bytes[1], bytes[2], bytes[3]]));
                scaled_integer(field, raw)
            }
            FieldKind::Double => {
                let bytes: [u8; 8] = reader
                    .take(8, constants::ERR_PARTIAL_ELEMENT)?
                    .try_into()
                    .map_err(|_| CodecError::MalformedBuffer(constants::ERR_PARTIAL_ELEMENT))?;
                Value::Double(read_f64(&bytes))
            }
            FieldKind::Boolean => {
                let byte = reader.take(1, constants::ERR_PARTIAL_ELEMENT)?[0];
                Value::Bool(byte != 0)
            }
            FieldKind::Str => {
                let bytes = reader.length_prefixed()?;
                decode_string(field, bytes)?
            }
            FieldKind::Struct => {
                let sub_ty = resolve_struct(ctx, field)?;
                let bytes = reader.length_prefixed()?;
                let (sub_map, consumed) = decode_struct(ctx, sub_ty, bytes, depth + 1)?;
                if consumed != bytes.len() {
                    return Err(CodecError::MalformedBuffer(constants::ERR_STRUCT_LENGTH));
                }
                Value::Struct(sub_map)
            }
            FieldKind::Other(code) => return Err(CodecError::UnsupportedFieldType(code)),
        };
        elements.push(element);
    }

    Ok(elements)
}

fn decode_string(field: &Field, payload: &[u8]) -> Result<Value> {
    if field.raw_bytes() {
        Ok(Value::Bytes(payload.to_vec()))
    } else {
        String::from_utf8(payload.to_vec())
            .map(Value::Str)
            .map_err(|_| CodecError::MalformedBuffer(constants::ERR_INVALID_UTF8))
    }
}

/// Fixed-point integers recover to a double scaled back down; plain integers
/// stay integers.
fn scaled_integer(field: &Field, raw: i64) -> Value {
    match field.scale() {
        Some(scale) => Value::Double(raw as f64 / scale as f64),
        None => Value::Int(raw),
    }
}

fn resolve_struct<'s>(ctx: &DecodeCtx<'s>, field: &Field) -> Result<&'s Type> {
    field
        .struct_ref
        .and_then(|index| ctx.schema.type_at(index))
        .ok_or_else(|| CodecError::UnknownType(field.name.clone()))
}
