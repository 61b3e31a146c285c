use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// Machine-readable classification of a [`SketchportError`].
///
/// Every error maps to exactly one kind, so callers (and the CLI exit code)
/// can tell failures apart without matching on individual variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The IR or the caller's input is malformed (no screens, bad document).
    InputValidation,
    /// The detector produced nothing usable.
    Interpretation,
    /// A project-wide precondition for code generation is missing, or the
    /// project document cannot be read or written.
    Generation,
    /// Filesystem or archive failure while packaging an export.
    Packaging,
}

impl ErrorKind {
    /// Stable code used in CLI output and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InputValidation => "input_validation",
            ErrorKind::Interpretation => "interpretation",
            ErrorKind::Generation => "generation",
            ErrorKind::Packaging => "packaging",
        }
    }

    /// Process exit status used by the CLI for this kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::InputValidation => 2,
            ErrorKind::Interpretation => 3,
            ErrorKind::Generation => 4,
            ErrorKind::Packaging => 5,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The main error type for sketchport operations.
#[derive(Debug, Error)]
pub enum SketchportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read project document {path}: {source}")]
    ProjectRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse project JSON from {path}: {source}")]
    ProjectJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write project document {path}: {source}")]
    ProjectWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write project JSON to {path}: {source}")]
    ProjectJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Project has no screens")]
    NoScreens,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Detector returned no boxes")]
    NoBoxes,

    #[error("Detector payload unusable after {attempts} attempt(s): {message}")]
    DetectionExhausted { attempts: usize, message: String },

    #[error("Failed to read sketch image: {message}")]
    SketchImage { message: String },

    #[error("Project skeleton not found at {path}")]
    MissingSkeleton { path: PathBuf },

    #[error("Failed to read config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Failed to package export at {path}: {message}")]
    Packaging { path: PathBuf, message: String },

    #[error("Failed to write archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl SketchportError {
    /// Returns the machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SketchportError::ProjectJsonParse { .. }
            | SketchportError::NoScreens
            | SketchportError::InvalidInput { .. }
            | SketchportError::ValidationFailed { .. }
            | SketchportError::Config { .. } => ErrorKind::InputValidation,
            SketchportError::NoBoxes
            | SketchportError::DetectionExhausted { .. }
            | SketchportError::SketchImage { .. } => ErrorKind::Interpretation,
            SketchportError::MissingSkeleton { .. }
            | SketchportError::ProjectRead { .. }
            | SketchportError::ProjectWrite { .. }
            | SketchportError::ProjectJsonWrite { .. } => ErrorKind::Generation,
            SketchportError::Io(_)
            | SketchportError::Packaging { .. }
            | SketchportError::Archive(_) => ErrorKind::Packaging,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        SketchportError::InvalidInput {
            message: message.into(),
        }
    }
}
