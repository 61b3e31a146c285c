//! Optional YAML configuration file.
//!
//! Every field is optional. CLI flags override the file, and the file
//! overrides built-in defaults.
//!
//! ```yaml
//! skeleton_dir: templates/flutter
//! work_dir: /var/tmp/sketchport
//! deny_list: [.dart_tool, .gradle, .idea, build, android/.gradle, ios/Pods]
//! font_policy:
//!   mode: proportional
//!   ratio: 0.6
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SketchportError;
use crate::interpret::FontPolicy;
use crate::package::{ExportOptions, DEFAULT_DENY_LIST};

/// File-level settings shared by the subcommands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Flutter project skeleton copied into every export.
    pub skeleton_dir: Option<PathBuf>,
    /// Where per-export working directories are created.
    pub work_dir: Option<PathBuf>,
    /// Skeleton paths to skip; replaces the built-in list when set.
    pub deny_list: Option<Vec<String>>,
    /// Font size inference used by `interpret`.
    pub font_policy: Option<FontPolicy>,
}

impl Config {
    /// Reads a config file.
    ///
    /// Relative paths inside the file are resolved against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self, SketchportError> {
        let text = fs::read_to_string(path).map_err(|e| SketchportError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_yaml_str(&text).map_err(|e| SketchportError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.skeleton_dir = config.skeleton_dir.map(|p| base.join(p));
        config.work_dir = config.work_dir.map(|p| base.join(p));

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Export options after layering CLI values over this file.
    ///
    /// # Errors
    /// [`SketchportError::InvalidInput`] if no skeleton dir is known.
    pub fn export_options(
        &self,
        skeleton_dir: Option<PathBuf>,
        work_dir: Option<PathBuf>,
        archive_name: Option<String>,
    ) -> Result<ExportOptions, SketchportError> {
        let skeleton_dir = skeleton_dir
            .or_else(|| self.skeleton_dir.clone())
            .ok_or_else(|| {
                SketchportError::invalid_input(
                    "no skeleton dir given (use --skeleton, SKETCHPORT_SKELETON or skeleton_dir)",
                )
            })?;

        let mut opts = ExportOptions::new(skeleton_dir);
        if let Some(work_dir) = work_dir.or_else(|| self.work_dir.clone()) {
            opts.work_root = work_dir;
        }
        opts.deny_list = self
            .deny_list
            .clone()
            .unwrap_or_else(|| DEFAULT_DENY_LIST.iter().map(|s| s.to_string()).collect());
        opts.archive_name = archive_name;
        Ok(opts)
    }

    pub fn font_policy(&self) -> FontPolicy {
        self.font_policy.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
    }

    #[test]
    fn parses_full_file() {
        let config = Config::from_yaml_str(
            "skeleton_dir: skel\nwork_dir: /tmp/work\ndeny_list: [build]\nfont_policy:\n  mode: proportional\n  ratio: 0.5\n",
        )
        .unwrap();
        assert_eq!(config.skeleton_dir, Some(PathBuf::from("skel")));
        assert_eq!(config.deny_list, Some(vec!["build".to_string()]));
        assert_eq!(config.font_policy(), FontPolicy::Proportional { ratio: 0.5 });
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_yaml_str("skeleton: x\n").is_err());
    }

    #[test]
    fn cli_values_override_file() {
        let config = Config {
            skeleton_dir: Some("from-file".into()),
            work_dir: Some("work-from-file".into()),
            ..Default::default()
        };

        let opts = config
            .export_options(Some("from-cli".into()), None, None)
            .unwrap();
        assert_eq!(opts.skeleton_dir, PathBuf::from("from-cli"));
        assert_eq!(opts.work_root, PathBuf::from("work-from-file"));
        assert_eq!(opts.deny_list.len(), DEFAULT_DENY_LIST.len());
    }

    #[test]
    fn missing_skeleton_is_invalid_input() {
        let err = Config::default().export_options(None, None, None).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InputValidation);
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sketchport.yaml");
        fs::write(&path, "skeleton_dir: skel\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.skeleton_dir, Some(dir.path().join("skel")));
    }
}
