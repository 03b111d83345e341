#![no_main]

use libfuzzer_sys::fuzz_target;
use sproto_codec::Schema;

fuzz_target!(|data: &[u8]| {
    // Fuzz schema blob parsing - test for panics, out-of-bounds reads, loops
    let _ = Schema::load(data);
});
