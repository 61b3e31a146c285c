//! Fuzz target for detector payload validation and interpretation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sketchport::interpret::{interpret_boxes, parse_payload, InterpretOptions};

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(payload) = parse_payload(text) {
        let _ = interpret_boxes(1080, 1920, &payload.boxes, &InterpretOptions::default());
    }
});
