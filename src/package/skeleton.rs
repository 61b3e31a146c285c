//! Skeleton copy.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use super::packaging;
use crate::error::SketchportError;

/// Returns true if `relative` is a deny-list entry or lies under one.
///
/// Entries are matched from the skeleton root, so `build` skips `build/` but
/// not `android/app/build.gradle`.
pub fn is_denied(relative: &Path, deny_list: &[String]) -> bool {
    deny_list.iter().any(|denied| {
        let denied = Path::new(denied.trim_end_matches('/'));
        relative.starts_with(denied)
    })
}

/// Copies the skeleton at `src` into `dst`, skipping denied paths.
///
/// Symlinks are not followed. Returns the number of files copied.
pub fn copy_skeleton(src: &Path, dst: &Path, deny_list: &[String]) -> Result<usize, SketchportError> {
    let mut copied = 0;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .path()
                .strip_prefix(src)
                .map(|relative| !is_denied(relative, deny_list))
                .unwrap_or(false)
        });

    for entry in walker {
        let entry = entry.map_err(|e| packaging(src, format!("failed while traversing skeleton: {e}")))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| packaging(entry.path(), e))?;
        let target = dst.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| packaging(&target, e))?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target).map_err(|e| packaging(entry.path(), e))?;
            copied += 1;
        } else {
            tracing::debug!(path = %entry.path().display(), "skipping non-regular skeleton entry");
        }
    }

    tracing::debug!(files = copied, src = %src.display(), "copied skeleton");
    Ok(copied)
}
