//! Fuzz target for project document parsing and generation.
//!
//! Any document that parses must either generate or fail with an error,
//! never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sketchport::codegen::generate_project;
use sketchport::ir::io_json::from_json_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(project) = from_json_slice(data) {
        let _ = generate_project(&project);
    }
});
