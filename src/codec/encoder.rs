//! # Encoder
//!
//! Walks a [`Type`]'s field list against a value tree and produces the
//! field-table-plus-data-segment wire layout.
//!
//! Per struct the output is a 2-byte entry count, the field table, then the
//! data segment holding every variable-length payload in emission order.
//! Booleans and small non-negative integers ride inline in their table entry;
//! everything else becomes a length-prefixed data-segment run. Fields are
//! emitted in ascending tag order with skip entries jumping over absent tags.
//!
//! Encoding is all-or-nothing: any failure (shape mismatch, depth overrun,
//! oversized output) returns an error and no byte sequence.

use bytes::{BufMut, BytesMut};

use crate::codec::value::{Map, Value};
use crate::config::{CodecLimits, MAX_INLINE, SIZEOF_LENGTH};
use crate::core::entry::FieldEntry;
use crate::core::wire::{fits_word, split64, write_f64};
use crate::error::{CodecError, Result};
use crate::schema::{Field, FieldKind, Schema, Type};

/// Threaded through the recursive walk; holds everything that is not
/// per-struct state.
struct EncodeCtx<'a> {
    schema: &'a Schema,
    limits: &'a CodecLimits,
}

/// Encode `value` (a struct value tree) as wire type `ty`.
pub fn encode_with_limits(
    schema: &Schema,
    ty: &Type,
    value: &Value,
    limits: &CodecLimits,
) -> Result<Vec<u8>> {
    limits.validate()?;
    let map = value
        .as_struct()
        .ok_or_else(|| CodecError::mismatch(&ty.name, "struct"))?;

    let ctx = EncodeCtx { schema, limits };
    let mut out = BytesMut::new();
    encode_struct(&ctx, ty, map, 0, &mut out)?;

    if out.len() > limits.max_message_size {
        return Err(CodecError::OversizedMessage(out.len()));
    }
    Ok(out.to_vec())
}

fn encode_struct(
    ctx: &EncodeCtx<'_>,
    ty: &Type,
    map: &Map,
    depth: usize,
    out: &mut BytesMut,
) -> Result<()> {
    if depth >= ctx.limits.max_depth {
        return Err(CodecError::DepthExceeded);
    }

    let mut entries: Vec<FieldEntry> = Vec::with_capacity(ty.fields.len());
    let mut data = BytesMut::new();
    let mut last_tag: i64 = -1;

    for field in &ty.fields {
        let Some(value) = map.get(&field.name) else {
            continue;
        };

        let entry = encode_field(ctx, field, value, depth, &mut data)?;

        let gap = field.tag as i64 - last_tag;
        // A single skip entry covers at most 0x8000 absent tags, so wider
        // gaps are bridged with a chain of skip entries.
        let mut absent = gap - 1;
        while absent > 0 {
            let chunk = absent.min(0x8000);
            entries.push(FieldEntry::skip_run(chunk as u32));
            absent -= chunk;
        }
        entries.push(entry);
        last_tag = field.tag as i64;
    }

    if entries.len() > u16::MAX as usize {
        return Err(CodecError::OversizedMessage(entries.len() * 2));
    }

    out.put_u16_le(entries.len() as u16);
    for entry in entries {
        out.put_u16_le(entry.to_word());
    }
    out.extend_from_slice(&data);
    Ok(())
}

/// Encode one present field, appending any variable payload to `data` and
/// returning the field-table entry that references it.
fn encode_field(
    ctx: &EncodeCtx<'_>,
    field: &Field,
    value: &Value,
    depth: usize,
    data: &mut BytesMut,
) -> Result<FieldEntry> {
    if field.array {
        let elements = value
            .as_array()
            .ok_or_else(|| CodecError::mismatch(&field.name, "array"))?;
        encode_array(ctx, field, elements, depth, data)?;
        return Ok(FieldEntry::Referenced);
    }

    match field.kind {
        FieldKind::Integer => {
            let n = integer_value(field, value)?;
            if (0..=MAX_INLINE).contains(&n) {
                return Ok(FieldEntry::Inline(n as u16));
            }
            if fits_word(n) {
                data.put_u32_le(4);
                data.put_u32_le(n as i32 as u32);
            } else {
                let (low, high) = split64(n);
                data.put_u32_le(8);
                data.put_u32_le(low);
                data.put_u32_le(high);
            }
            Ok(FieldEntry::Referenced)
        }
        FieldKind::Boolean => {
            let b = value
                .as_bool()
                .ok_or_else(|| CodecError::mismatch(&field.name, "boolean"))?;
            Ok(FieldEntry::Inline(b as u16))
        }
        FieldKind::Double => {
            let d = value
                .as_double()
                .ok_or_else(|| CodecError::mismatch(&field.name, "double"))?;
            data.put_u32_le(8);
            data.put_slice(&write_f64(d));
            Ok(FieldEntry::Referenced)
        }
        FieldKind::Str => {
            let bytes = string_payload(field, value)?;
            data.put_u32_le(bytes.len() as u32);
            data.put_slice(bytes);
            Ok(FieldEntry::Referenced)
        }
        FieldKind::Struct => {
            let sub_map = value
                .as_struct()
                .ok_or_else(|| CodecError::mismatch(&field.name, "struct"))?;
            let sub_ty = resolve_struct(ctx, field)?;
            with_length_prefix(data, |data| {
                encode_struct(ctx, sub_ty, sub_map, depth + 1, data)
            })?;
            Ok(FieldEntry::Referenced)
        }
        FieldKind::Other(code) => Err(CodecError::UnsupportedFieldType(code)),
    }
}

/// Encode an array field as one length-prefixed payload of concatenated
/// elements. Fixed-width elements pack back-to-back; string and struct
/// elements are individually length-prefixed.
fn encode_array(
    ctx: &EncodeCtx<'_>,
    field: &Field,
    elements: &[Value],
    depth: usize,
    data: &mut BytesMut,
) -> Result<()> {
    with_length_prefix(data, |data| {
        match field.kind {
            FieldKind::Integer => {
                for element in elements {
                    let n = integer_value(field, element)?;
                    // Array elements travel in the fixed 4-byte form.
                    if !fits_word(n) {
                        return Err(CodecError::mismatch(
                            &field.name,
                            "integer within the 32-bit array element range",
                        ));
                    }
                    data.put_u32_le(n as i32 as u32);
                }
            }
            FieldKind::Boolean => {
                for element in elements {
                    let b = element
                        .as_bool()
                        .ok_or_else(|| CodecError::mismatch(&field.name, "boolean"))?;
                    data.put_u8(b as u8);
                }
            }
            FieldKind::Double => {
                for element in elements {
                    let d = element
                        .as_double()
                        .ok_or_else(|| CodecError::mismatch(&field.name, "double"))?;
                    data.put_slice(&write_f64(d));
                }
            }
            FieldKind::Str => {
                for element in elements {
                    let bytes = string_payload(field, element)?;
                    data.put_u32_le(bytes.len() as u32);
                    data.put_slice(bytes);
                }
            }
            FieldKind::Struct => {
                let sub_ty = resolve_struct(ctx, field)?;
                for element in elements {
                    let sub_map = element
                        .as_struct()
                        .ok_or_else(|| CodecError::mismatch(&field.name, "struct"))?;
                    with_length_prefix(data, |data| {
                        encode_struct(ctx, sub_ty, sub_map, depth + 1, data)
                    })?;
                }
            }
            FieldKind::Other(code) => return Err(CodecError::UnsupportedFieldType(code)),
        }
        Ok(())
    })
}

/// Reserve a 4-byte length prefix, run `body`, then patch the prefix with the
/// number of bytes the body appended.
fn with_length_prefix(
    data: &mut BytesMut,
    body: impl FnOnce(&mut BytesMut) -> Result<()>,
) -> Result<()> {
    let start = data.len();
    data.put_u32_le(0);
    body(data)?;
    let len = (data.len() - start - SIZEOF_LENGTH) as u32;
    data[start..start + SIZEOF_LENGTH].copy_from_slice(&len.to_le_bytes());
    Ok(())
}

/// The raw integer an integer field carries on the wire, with the
/// fixed-point scale factor applied.
fn integer_value(field: &Field, value: &Value) -> Result<i64> {
    match (value, field.scale()) {
        (Value::Int(n), None) => Ok(*n),
        (Value::Int(n), Some(scale)) => n.checked_mul(scale as i64).ok_or_else(|| {
            CodecError::mismatch(&field.name, "fixed-point value within the 64-bit range")
        }),
        (Value::Double(d), Some(scale)) => Ok((d * scale as f64).floor() as i64),
        _ => Err(CodecError::mismatch(&field.name, "integer")),
    }
}

/// The byte payload of a string field: raw bytes when the field is flagged
/// as not-UTF-8, the string's UTF-8 bytes otherwise.
fn string_payload<'v>(field: &Field, value: &'v Value) -> Result<&'v [u8]> {
    if field.raw_bytes() {
        value
            .as_bytes()
            .ok_or_else(|| CodecError::mismatch(&field.name, "bytes"))
    } else {
        value
            .as_str()
            .map(str::as_bytes)
            .ok_or_else(|| CodecError::mismatch(&field.name, "string"))
    }
}

fn resolve_struct<'s>(ctx: &EncodeCtx<'s>, field: &Field) -> Result<&'s Type> {
    field
        .struct_ref
        .and_then(|index| ctx.schema.type_at(index))
        .ok_or_else(|| CodecError::UnknownType(field.name.clone()))
}
