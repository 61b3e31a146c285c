//! Fuzz target for Dart string literal escaping.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sketchport::codegen::fuzz_string_literal;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_string_literal(text);
});
