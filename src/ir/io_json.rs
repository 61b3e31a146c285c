//! JSON serialization for the project document.
//!
//! This is the Project Store boundary: the editor persists exactly this
//! document, the interpreter writes it and the code generator reads it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::model::Project;
use crate::error::SketchportError;

/// Reads a project from a JSON file.
///
/// # Errors
/// Returns [`SketchportError::ProjectRead`] if the file cannot be opened and
/// [`SketchportError::ProjectJsonParse`] if it is not a valid document.
pub fn read_project_json(path: &Path) -> Result<Project, SketchportError> {
    let file = File::open(path).map_err(|source| SketchportError::ProjectRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| SketchportError::ProjectJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a project to a JSON file (pretty-printed).
///
/// # Errors
/// Returns [`SketchportError::ProjectWrite`] if the file cannot be created or
/// flushed and [`SketchportError::ProjectJsonWrite`] if serialization fails.
pub fn write_project_json(path: &Path, project: &Project) -> Result<(), SketchportError> {
    let write_err = |source| SketchportError::ProjectWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, project).map_err(|source| {
        SketchportError::ProjectJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(write_err)
}

/// Reads a project from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Project, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a project from raw bytes.
///
/// Useful for fuzzing and for documents fetched from a store as bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<Project, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Writes a project to a JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(project: &Project) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(project)
}
