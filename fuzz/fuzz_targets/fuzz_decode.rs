#![no_main]

use libfuzzer_sys::fuzz_target;
use sproto_codec::{Schema, Value};
use std::sync::OnceLock;

static SCHEMA: OnceLock<Schema> = OnceLock::new();

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn field(tag: u32, code: u32, extra: u32, name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, tag);
    push_u32(&mut out, code);
    push_u32(&mut out, name.len() as u32);
    push_u32(&mut out, extra);
    out.extend_from_slice(name.as_bytes());
    out
}

fn schema() -> &'static Schema {
    SCHEMA.get_or_init(|| {
        // One type exercising every field kind, arrays and self-recursion.
        let mut body = Vec::new();
        push_u32(&mut body, 8);
        for record in [
            field(0, 0, 0, "count"),
            field(1, 1, 0, "flag"),
            field(2, 2, 0, "name"),
            field(3, 2, 1, "payload"),
            field(4, 4, 0, "ratio"),
            field(5, 0, 100, "price"),
            field(6, 3, 0, "msg"),
            field(7, 0x80, 0, "ints"),
        ] {
            body.extend_from_slice(&record);
        }
        let mut blob = Vec::new();
        push_u32(&mut blob, 1);
        push_u32(&mut blob, 3);
        push_u32(&mut blob, body.len() as u32);
        blob.extend_from_slice(b"msg");
        blob.extend_from_slice(&body);
        Schema::load(&blob).expect("fuzz schema loads")
    })
}

fuzz_target!(|data: &[u8]| {
    // Fuzz buffer decoding - test for panics, out-of-bounds reads, recursion
    if let Ok(value) = schema().decode("msg", data) {
        // Anything that decodes must re-encode without panicking.
        let _ = schema().encode("msg", &value);
        let _ = matches!(value, Value::Struct(_));
    }
});
