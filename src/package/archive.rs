//! Zip archive writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::packaging;
use crate::error::SketchportError;

/// Zips every file under `dir` into `archive_path`.
///
/// Entry names are forward-slash paths relative to `dir`, added in sorted
/// order. Returns the number of entries written.
pub fn write_archive(dir: &Path, archive_path: &Path) -> Result<usize, SketchportError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(|e| packaging(dir, format!("failed while traversing work dir: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| packaging(entry.path(), e))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((name, entry.path().to_path_buf()));
    }
    files.sort();

    let file = File::create(archive_path).map_err(|e| packaging(archive_path, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, path) in &files {
        let contents = fs::read(path).map_err(|e| packaging(path, e))?;
        add_file_to_zip(&mut zip, name, &contents, options.unix_permissions(file_mode(path)))?;
    }

    zip.finish()?;
    tracing::debug!(entries = files.len(), archive = %archive_path.display(), "wrote archive");
    Ok(files.len())
}

/// Adds one entry, refusing names that would escape the extraction dir.
fn add_file_to_zip<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    contents: &[u8],
    options: SimpleFileOptions,
) -> Result<(), SketchportError> {
    if name.split('/').any(|part| part == "..") || name.starts_with('/') || name.starts_with('\\') {
        return Err(packaging(Path::new(name), "invalid archive entry name"));
    }

    zip.start_file(name, options)?;
    zip.write_all(contents).map_err(|e| packaging(Path::new(name), e))?;
    Ok(())
}

/// Keeps executables such as `gradlew` runnable after extraction.
#[cfg(unix)]
fn file_mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(meta) if meta.permissions().mode() & 0o111 != 0 => 0o755,
        _ => 0o644,
    }
}

#[cfg(not(unix))]
fn file_mode(_path: &Path) -> u32 {
    0o644
}
