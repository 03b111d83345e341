//! Property-based tests using proptest
//!
//! These validate the codec invariants across randomly generated value trees
//! and random byte soup, ensuring robust behavior under all inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::*;
use proptest::prelude::*;
use sproto_codec::{Schema, Value};

fn scalar_schema() -> Schema {
    let body = type_body(&[
        field(0, T_INTEGER, 0, "count"),
        field(1, T_BOOLEAN, 0, "flag"),
        field(2, T_STRING, 0, "name"),
        field(3, T_DOUBLE, 0, "ratio"),
        field(4, T_INTEGER | T_ARRAY, 0, "ints"),
        field(5, T_STRING | T_ARRAY, 0, "names"),
    ]);
    Schema::load(&blob(&[("msg", body)])).expect("schema loads")
}

// Property: any 64-bit integer survives the inline/word/double-word split
proptest! {
    #[test]
    fn prop_integer_roundtrip(n in any::<i64>()) {
        let schema = scalar_schema();
        let value = strukt(&[("count", Value::Int(n))]);
        let bytes = schema.encode("msg", &value).expect("encode");
        let back = schema.decode("msg", &bytes).expect("decode");
        prop_assert_eq!(back.get("count"), Some(&Value::Int(n)));
    }
}

// Property: any string round-trips byte-for-byte
proptest! {
    #[test]
    fn prop_string_roundtrip(s in ".*") {
        let schema = scalar_schema();
        let value = strukt(&[("name", Value::from(s.as_str()))]);
        let bytes = schema.encode("msg", &value).expect("encode");
        let back = schema.decode("msg", &bytes).expect("decode");
        prop_assert_eq!(back.get("name"), Some(&Value::from(s.as_str())));
    }
}

// Property: full scalar + array trees round-trip modulo absent fields
proptest! {
    #[test]
    fn prop_mixed_tree_roundtrip(
        count in any::<i64>(),
        flag in any::<bool>(),
        name in ".{0,64}",
        ratio in any::<f64>().prop_filter("NaN is not comparable", |d| !d.is_nan()),
        ints in prop::collection::vec(any::<i32>(), 0..32),
        names in prop::collection::vec(".{0,16}", 0..8),
    ) {
        let schema = scalar_schema();
        let value = strukt(&[
            ("count", Value::Int(count)),
            ("flag", Value::Bool(flag)),
            ("name", Value::from(name.as_str())),
            ("ratio", Value::Double(ratio)),
            ("ints", Value::Array(ints.iter().map(|&i| Value::Int(i as i64)).collect())),
            ("names", Value::Array(names.iter().map(|s| Value::from(s.as_str())).collect())),
        ]);
        let bytes = schema.encode("msg", &value).expect("encode");
        let back = schema.decode("msg", &bytes).expect("decode");
        prop_assert_eq!(back, value);
    }
}

// Property: encoding is deterministic
proptest! {
    #[test]
    fn prop_encode_deterministic(count in any::<i64>(), name in ".{0,32}") {
        let schema = scalar_schema();
        let value = strukt(&[("count", Value::Int(count)), ("name", Value::from(name.as_str()))]);
        let first = schema.encode("msg", &value).expect("encode");
        let second = schema.encode("msg", &value).expect("encode");
        prop_assert_eq!(first, second);
    }
}

// Property: the decoder never panics on arbitrary bytes
proptest! {
    #[test]
    fn prop_decoder_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let schema = scalar_schema();
        let _ = schema.decode("msg", &data);
    }
}

// Property: the schema loader never panics on arbitrary bytes
proptest! {
    #[test]
    fn prop_loader_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = Schema::load(&data);
    }
}

// Property: truncating a valid encoding never panics the decoder
proptest! {
    #[test]
    fn prop_truncated_encode_never_panics(
        count in any::<i64>(),
        name in ".{0,32}",
        cut in any::<prop::sample::Index>(),
    ) {
        let schema = scalar_schema();
        let value = strukt(&[("count", Value::Int(count)), ("name", Value::from(name.as_str()))]);
        let bytes = schema.encode("msg", &value).expect("encode");
        let cut = cut.index(bytes.len() + 1);
        let _ = schema.decode("msg", &bytes[..cut]);
    }
}

// Property: truncating a valid schema blob yields partial results or a
// truncation error, never a crash
proptest! {
    #[test]
    fn prop_truncated_blob_is_safe(cut in any::<prop::sample::Index>()) {
        let inner = type_body(&[field(0, T_INTEGER, 0, "id")]);
        let body = type_body(&[field(0, T_STRUCT, 0, "inner"), field(1, T_STRING, 0, "name")]);
        let mut bytes = blob(&[("inner", inner), ("msg", body)]);
        append_protocols(&mut bytes, &[(1, "fetch", "msg", "inner")]);

        let cut = cut.index(bytes.len() + 1);
        match Schema::load(&bytes[..cut]) {
            Ok(schema) => prop_assert!(schema.types().len() <= 2),
            Err(err) => prop_assert_eq!(err, sproto_codec::CodecError::SchemaTruncated),
        }
    }
}
