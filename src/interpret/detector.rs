//! The detector boundary.
//!
//! A detector turns sketch image bytes plus extraction instructions into a
//! payload document. It is an opaque, blocking round trip; this module only
//! adds schema validation and a fixed number of retries on top.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::payload::{parse_payload, DetectorPayload};
use crate::error::SketchportError;
use crate::ir::ElementKind;

/// How many times the detector is asked before giving up.
pub const DETECT_ATTEMPTS: usize = 3;

/// One detection round trip.
#[derive(Clone, Copy, Debug)]
pub struct DetectionRequest<'a> {
    /// Encoded sketch image.
    pub image: &'a [u8],
    /// Natural-language extraction instructions.
    pub instructions: &'a str,
}

/// Failure of the detector itself (as opposed to a bad payload).
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("detector unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read payload file {path}: {source}")]
    PayloadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can answer a detection request with a payload document.
pub trait Detector {
    fn detect(&self, request: &DetectionRequest<'_>) -> Result<String, DetectorError>;
}

impl<F> Detector for F
where
    F: Fn(&DetectionRequest<'_>) -> Result<String, DetectorError>,
{
    fn detect(&self, request: &DetectionRequest<'_>) -> Result<String, DetectorError> {
        self(request)
    }
}

/// Replays a payload previously captured to a file.
#[derive(Clone, Debug)]
pub struct PayloadFileDetector {
    path: PathBuf,
}

impl PayloadFileDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Detector for PayloadFileDetector {
    fn detect(&self, _request: &DetectionRequest<'_>) -> Result<String, DetectorError> {
        std::fs::read_to_string(&self.path).map_err(|source| DetectorError::PayloadFile {
            path: self.path.clone(),
            source,
        })
    }
}

/// Extraction instructions sent with every request.
pub fn instructions() -> String {
    let kinds: Vec<&str> = ElementKind::ALL.iter().map(|k| k.as_str()).collect();
    format!(
        "Identify every UI component drawn in this sketch. Answer with JSON only, \
         shaped as {{\"boxes\": [{{\"kind\", \"text\"?, \"bb\": {{\"x\", \"y\", \"w\", \"h\"}}, \
         \"headers\"?, \"rows\"?, \"items\"?, \"options\"?, \"url\"?}}]}}. \
         \"bb\" is the component's bounding box in image pixels. \
         \"kind\" must be one of: {}. \
         Report every piece of text inside a Sidebar or BottomNav as its own Label.",
        kinds.join(", ")
    )
}

/// Asks the detector for a payload, retrying until one passes schema
/// validation or [`DETECT_ATTEMPTS`] is reached.
///
/// # Errors
/// Returns [`SketchportError::DetectionExhausted`] carrying the last failure.
pub fn detect_payload(
    detector: &dyn Detector,
    image: &[u8],
) -> Result<DetectorPayload, SketchportError> {
    let instructions = instructions();
    let request = DetectionRequest {
        image,
        instructions: &instructions,
    };

    let mut last_error = String::new();
    for attempt in 1..=DETECT_ATTEMPTS {
        let result = detector
            .detect(&request)
            .map_err(|e| e.to_string())
            .and_then(|text| parse_payload(&text).map_err(|e| e.to_string()));

        match result {
            Ok(payload) => {
                tracing::debug!(
                    attempt,
                    boxes = payload.boxes.len(),
                    "detector payload accepted"
                );
                return Ok(payload);
            }
            Err(message) => {
                tracing::warn!(
                    attempt,
                    max = DETECT_ATTEMPTS,
                    "detector payload rejected: {message}"
                );
                last_error = message;
            }
        }
    }

    Err(SketchportError::DetectionExhausted {
        attempts: DETECT_ATTEMPTS,
        message: last_error,
    })
}
