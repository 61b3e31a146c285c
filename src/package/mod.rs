//! Export packaging.
//!
//! An export copies the Flutter project skeleton into a per-invocation
//! working directory, writes the generated sources over it under `lib/`,
//! zips the result and streams the archive to the caller. The working
//! directory and archive are deleted when the export ends, whatever the
//! outcome.

mod archive;
mod skeleton;

pub use archive::write_archive;
pub use skeleton::{copy_skeleton, is_denied};

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

use uuid::Uuid;

use crate::codegen::{self, naming, SourceTree};
use crate::error::SketchportError;
use crate::ir::Project;

/// Skeleton paths that are never copied, relative to the skeleton root.
pub const DEFAULT_DENY_LIST: &[&str] = &[
    ".dart_tool",
    ".gradle",
    ".idea",
    "build",
    "android/.gradle",
];

/// Working paths older than this are left over from an export that never
/// finished, and are swept before the next export of the same project.
pub const STALE_WORKSPACE_AGE: Duration = Duration::from_secs(60 * 60);

/// Where and how to build an export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    /// Root of the Flutter project skeleton.
    pub skeleton_dir: PathBuf,
    /// Directory that holds the per-invocation working paths.
    pub work_root: PathBuf,
    /// Relative path prefixes skipped while copying the skeleton.
    pub deny_list: Vec<String>,
    /// Download name override; derived from the project name when absent.
    pub archive_name: Option<String>,
    /// Minimum age of a leftover working path before it is swept.
    pub stale_after: Duration,
}

impl ExportOptions {
    /// Options with the system temp dir as work root and the default deny list.
    pub fn new(skeleton_dir: impl Into<PathBuf>) -> Self {
        Self {
            skeleton_dir: skeleton_dir.into(),
            work_root: std::env::temp_dir(),
            deny_list: DEFAULT_DENY_LIST.iter().map(|s| s.to_string()).collect(),
            archive_name: None,
            stale_after: STALE_WORKSPACE_AGE,
        }
    }
}

/// What an export produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    /// Suggested download name, e.g. `Shop.zip`.
    pub archive_name: String,
    pub skeleton_files: usize,
    pub generated_files: usize,
    /// Entries in the archive (skeleton and generated, overlaps counted once).
    pub entries: usize,
    /// Bytes streamed to the sink.
    pub bytes: u64,
}

/// The working directory and archive path of one export.
///
/// Both are removed on drop.
#[derive(Debug)]
pub struct ExportWorkspace {
    dir: PathBuf,
    archive: PathBuf,
}

impl ExportWorkspace {
    /// Reserves `<work_root>/<slug>-<uuid>/` and its sibling `.zip`.
    pub fn create(work_root: &Path, slug: &str) -> Result<Self, SketchportError> {
        let stem = format!("{slug}-{}", Uuid::new_v4());
        let workspace = Self {
            dir: work_root.join(&stem),
            archive: work_root.join(format!("{stem}.zip")),
        };

        fs::create_dir_all(&workspace.dir).map_err(|e| packaging(&workspace.dir, e))?;
        tracing::debug!(dir = %workspace.dir.display(), "created export workspace");
        Ok(workspace)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    fn remove(&self) {
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.dir.display(), "failed to remove work dir: {e}");
            }
        }
        if let Err(e) = fs::remove_file(&self.archive) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.archive.display(), "failed to remove archive: {e}");
            }
        }
    }
}

impl Drop for ExportWorkspace {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Removes `<slug>-<uuid>` directories and archives in `work_root` that were
/// last modified at least `max_age` ago. Returns how many were removed.
///
/// Younger entries may belong to an export that is still running and are
/// left alone.
pub fn sweep_stale_workspaces(work_root: &Path, slug: &str, max_age: Duration) -> usize {
    let entries = match fs::read_dir(work_root) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %work_root.display(), "failed to scan work root: {e}");
            }
            return 0;
        }
    };

    let now = SystemTime::now();
    let mut removed = 0;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        if !file_name.to_str().is_some_and(|name| is_workspace_name(name, slug)) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if !age.is_some_and(|age| age >= max_age) {
            continue;
        }

        let path = entry.path();
        let result = if metadata.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), "removed stale export workspace");
                removed += 1;
            }
            Err(e) => tracing::warn!(path = %path.display(), "failed to remove stale entry: {e}"),
        }
    }
    removed
}

/// `<slug>-<uuid>` or `<slug>-<uuid>.zip`.
fn is_workspace_name(name: &str, slug: &str) -> bool {
    name.strip_prefix(slug)
        .and_then(|rest| rest.strip_prefix('-'))
        .map(|rest| rest.strip_suffix(".zip").unwrap_or(rest))
        .is_some_and(|id| Uuid::parse_str(id).is_ok())
}

/// Generates the project, packages it and streams the zip into `sink`.
///
/// # Errors
/// - [`SketchportError::MissingSkeleton`] if the skeleton dir does not exist.
/// - Generation errors from [`codegen::generate_project`].
/// - [`SketchportError::Packaging`] or [`SketchportError::Archive`] on
///   filesystem, archive or sink failures.
pub fn export_project<W: Write>(
    project: &Project,
    opts: &ExportOptions,
    sink: &mut W,
) -> Result<ExportSummary, SketchportError> {
    if !opts.skeleton_dir.is_dir() {
        return Err(SketchportError::MissingSkeleton {
            path: opts.skeleton_dir.clone(),
        });
    }

    let tree = codegen::generate_project(project)?;

    let archive_name = opts
        .archive_name
        .clone()
        .unwrap_or_else(|| archive_file_name(project.name.as_deref().unwrap_or_default()));
    let slug = naming::route_id(project.name.as_deref().unwrap_or("project"));
    sweep_stale_workspaces(&opts.work_root, &slug, opts.stale_after);
    let workspace = ExportWorkspace::create(&opts.work_root, &slug)?;

    let skeleton_files = copy_skeleton(&opts.skeleton_dir, workspace.dir(), &opts.deny_list)?;
    let generated_files = write_source_tree(&tree, workspace.dir())?;
    let entries = write_archive(workspace.dir(), workspace.archive())?;

    let mut archive =
        File::open(workspace.archive()).map_err(|e| packaging(workspace.archive(), e))?;
    let bytes = io::copy(&mut archive, sink).map_err(|e| packaging(workspace.archive(), e))?;
    sink.flush().map_err(|e| packaging(workspace.archive(), e))?;

    tracing::info!(
        archive = %archive_name,
        screens = tree.units.len(),
        skeleton_files,
        generated_files,
        entries,
        bytes,
        "exported project"
    );

    Ok(ExportSummary {
        archive_name,
        skeleton_files,
        generated_files,
        entries,
        bytes,
    })
}

/// Writes the generated sources under `dir`, creating parent directories.
///
/// Returns the number of files written.
pub fn write_source_tree(tree: &SourceTree, dir: &Path) -> Result<usize, SketchportError> {
    let mut written = 0;
    for file in tree.files() {
        let relative = Path::new(&file.path);
        if !is_plain_relative(relative) {
            return Err(packaging(relative, "generated path escapes the output dir"));
        }

        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| packaging(parent, e))?;
        }
        fs::write(&path, &file.contents).map_err(|e| packaging(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote generated file");
        written += 1;
    }
    Ok(written)
}

/// Download name for a project: its name with unsafe characters replaced,
/// plus `.zip`.
pub fn archive_file_name(project_name: &str) -> String {
    let cleaned: String = project_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());

    if cleaned.is_empty() {
        "project.zip".to_string()
    } else {
        format!("{cleaned}.zip")
    }
}

fn is_plain_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

pub(crate) fn packaging(path: &Path, err: impl std::fmt::Display) -> SketchportError {
    SketchportError::Packaging {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DeviceProfile, Element, LabelProps, Rect, Screen, Widget};
    use std::io::{Cursor, Read};

    fn project() -> Project {
        let mut project = Project::new(DeviceProfile::Mobile);
        project.name = Some("Shop / Demo".into());
        project.screens.push(Screen::new("s1", "Home").with_element(Element::new(
            "label-1",
            Rect::from_xywh(0.1, 0.1, 0.5, 0.05),
            Widget::Label(LabelProps::default()),
        )));
        project
    }

    fn skeleton(root: &Path) {
        let files = [
            ("pubspec.yaml", "name: app\n"),
            ("lib/main.dart", "// skeleton main\n"),
            ("android/app/build.gradle", "android {}\n"),
            ("android/.gradle/cache.bin", "x"),
            (".dart_tool/package_config.json", "{}"),
            ("build/app.apk", "binary"),
        ];
        for (path, contents) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    fn options(skeleton_dir: &Path, work_root: &Path) -> ExportOptions {
        ExportOptions {
            work_root: work_root.to_path_buf(),
            ..ExportOptions::new(skeleton_dir)
        }
    }

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn exports_skeleton_and_generated_sources() {
        let skel = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        skeleton(skel.path());

        let mut sink = Vec::new();
        let summary = export_project(&project(), &options(skel.path(), work.path()), &mut sink)
            .unwrap();

        assert_eq!(summary.archive_name, "Shop _ Demo.zip");
        assert_eq!(summary.skeleton_files, 3);
        assert_eq!(summary.generated_files, 2);
        assert_eq!(summary.entries, 4);
        assert_eq!(summary.bytes, sink.len() as u64);

        let mut archive = zip::ZipArchive::new(Cursor::new(sink.clone())).unwrap();
        let mut main = String::new();
        archive
            .by_name("lib/main.dart")
            .unwrap()
            .read_to_string(&mut main)
            .unwrap();
        assert!(main.contains("runApp(const GeneratedApp())"));

        assert_eq!(
            entry_names(sink),
            vec![
                "android/app/build.gradle",
                "lib/main.dart",
                "lib/screens/home_screen.dart",
                "pubspec.yaml",
            ]
        );
    }

    #[test]
    fn workspace_is_removed_after_export() {
        let skel = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        skeleton(skel.path());

        export_project(&project(), &options(skel.path(), work.path()), &mut Vec::new()).unwrap();
        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "client went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failure_cleans_up() {
        let skel = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        skeleton(skel.path());

        let err = export_project(&project(), &options(skel.path(), work.path()), &mut BrokenSink)
            .unwrap_err();
        assert!(matches!(err, SketchportError::Packaging { .. }));
        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_skeleton_is_a_generation_error() {
        let work = tempfile::tempdir().unwrap();
        let err = export_project(
            &project(),
            &options(&work.path().join("nope"), work.path()),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Generation);
    }

    #[test]
    fn empty_project_writes_nothing() {
        let skel = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        skeleton(skel.path());

        let empty = Project::new(DeviceProfile::Mobile);
        let err = export_project(&empty, &options(skel.path(), work.path()), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, SketchportError::NoScreens));
        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }

    #[test]
    fn concurrent_workspaces_do_not_collide() {
        let work = tempfile::tempdir().unwrap();
        let a = ExportWorkspace::create(work.path(), "shop").unwrap();
        let b = ExportWorkspace::create(work.path(), "shop").unwrap();
        assert_ne!(a.dir(), b.dir());
        assert!(a.dir().is_dir() && b.dir().is_dir());

        drop(a);
        assert!(b.dir().is_dir());
    }

    fn set_age(path: &Path, age: Duration) {
        let file = File::open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn stale_workspaces_are_swept() {
        let work = tempfile::tempdir().unwrap();
        let two_hours = Duration::from_secs(2 * 60 * 60);

        let stale_dir = work.path().join(format!("shop-{}", Uuid::new_v4()));
        fs::create_dir_all(stale_dir.join("lib")).unwrap();
        fs::write(stale_dir.join("lib/main.dart"), "// left behind").unwrap();
        set_age(&stale_dir, two_hours);

        let stale_zip = work.path().join(format!("shop-{}.zip", Uuid::new_v4()));
        fs::write(&stale_zip, "PK").unwrap();
        set_age(&stale_zip, two_hours);

        let running = work.path().join(format!("shop-{}", Uuid::new_v4()));
        fs::create_dir(&running).unwrap();

        let other_project = work.path().join(format!("shopping-{}", Uuid::new_v4()));
        fs::create_dir(&other_project).unwrap();
        set_age(&other_project, two_hours);

        let unrelated = work.path().join("shop-notes");
        fs::write(&unrelated, "keep me").unwrap();
        set_age(&unrelated, two_hours);

        let removed = sweep_stale_workspaces(work.path(), "shop", STALE_WORKSPACE_AGE);
        assert_eq!(removed, 2);
        assert!(!stale_dir.exists());
        assert!(!stale_zip.exists());
        assert!(running.is_dir());
        assert!(other_project.is_dir());
        assert!(unrelated.is_file());
    }

    #[test]
    fn export_sweeps_leftovers_of_the_same_project() {
        let skel = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        skeleton(skel.path());

        let leftover = work.path().join(format!("shop_demo-{}", Uuid::new_v4()));
        fs::create_dir(&leftover).unwrap();
        set_age(&leftover, Duration::from_secs(3 * 60 * 60));

        export_project(&project(), &options(skel.path(), work.path()), &mut Vec::new()).unwrap();
        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }

    #[test]
    fn sweeping_a_missing_work_root_is_a_no_op() {
        let work = tempfile::tempdir().unwrap();
        let missing = work.path().join("absent");
        assert_eq!(sweep_stale_workspaces(&missing, "shop", Duration::ZERO), 0);
    }

    #[test]
    fn archive_names_are_sanitized() {
        assert_eq!(archive_file_name("Shop"), "Shop.zip");
        assert_eq!(archive_file_name("../etc/passwd"), "_etc_passwd.zip");
        assert_eq!(archive_file_name("  "), "project.zip");
        assert_eq!(archive_file_name("Café App"), "Café App.zip");
    }

    #[test]
    fn write_source_tree_creates_directories() {
        let out = tempfile::tempdir().unwrap();
        let tree = codegen::generate_project(&project()).unwrap();

        let written = write_source_tree(&tree, out.path()).unwrap();
        assert_eq!(written, 2);
        assert!(out.path().join("lib/main.dart").is_file());
        assert!(out.path().join("lib/screens/home_screen.dart").is_file());
    }
}
