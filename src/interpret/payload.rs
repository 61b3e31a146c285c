//! Detector payload schema.
//!
//! The detector answers with `{ "boxes": [...] }`. Every box names one of the
//! closed element kinds and carries a pixel-space `bb`; everything else is
//! optional detail. Payloads are validated here, once, before interpretation.

use serde::Deserialize;
use thiserror::Error;

use crate::ir::{ElementKind, Pixel, Rect};

/// A schema-valid detector response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectorPayload {
    pub boxes: Vec<DetectedBox>,
}

/// One detected component.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedBox {
    pub kind: ElementKind,
    /// Bounding box in image pixels.
    pub bb: Rect<Pixel>,
    pub text: Option<String>,
    pub headers: Option<Vec<String>>,
    pub rows: Option<Vec<Vec<String>>>,
    pub items: Option<Vec<String>>,
    pub options: Option<Vec<String>>,
    pub url: Option<String>,
    /// Explicit size intent: a canvas fraction when `<= 1`, pixels otherwise.
    pub font_size: Option<f64>,
}

impl DetectedBox {
    /// Creates a box with no optional detail.
    pub fn new(kind: ElementKind, bb: Rect<Pixel>) -> Self {
        Self {
            kind,
            bb,
            text: None,
            headers: None,
            rows: None,
            items: None,
            options: None,
            url: None,
            font_size: None,
        }
    }

    /// Sets the text (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Why a payload was rejected.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("box {index} has unknown kind '{kind}'")]
    UnknownKind { index: usize, kind: String },

    #[error("box {index} has an invalid bb: {message}")]
    InvalidBox { index: usize, message: String },
}

#[derive(Deserialize)]
struct RawPayload {
    boxes: Vec<RawBox>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBox {
    kind: String,
    bb: Rect<Pixel>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    headers: Option<Vec<String>>,
    #[serde(default)]
    rows: Option<Vec<Vec<String>>>,
    #[serde(default)]
    items: Option<Vec<String>>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    font_size: Option<f64>,
}

/// Parses and validates a detector response.
///
/// A response wrapped in a Markdown code fence is accepted, since text-model
/// detectors commonly answer that way.
pub fn parse_payload(text: &str) -> Result<DetectorPayload, PayloadError> {
    let raw: RawPayload = serde_json::from_str(strip_code_fence(text))?;

    let boxes = raw
        .boxes
        .into_iter()
        .enumerate()
        .map(|(index, raw)| validate_box(index, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DetectorPayload { boxes })
}

fn validate_box(index: usize, raw: RawBox) -> Result<DetectedBox, PayloadError> {
    let kind = ElementKind::from_tag(&raw.kind).ok_or_else(|| PayloadError::UnknownKind {
        index,
        kind: raw.kind.clone(),
    })?;

    let bb = raw.bb;
    if !bb.is_finite() {
        return Err(PayloadError::InvalidBox {
            index,
            message: "non-finite coordinates".into(),
        });
    }
    if bb.x < 0.0 || bb.y < 0.0 || bb.w < 0.0 || bb.h < 0.0 {
        return Err(PayloadError::InvalidBox {
            index,
            message: format!("negative value in {bb:?}"),
        });
    }

    Ok(DetectedBox {
        kind,
        bb,
        text: raw.text,
        headers: raw.headers,
        rows: raw.rows,
        items: raw.items,
        options: raw.options,
        url: raw.url,
        font_size: raw.font_size.filter(|s| s.is_finite() && *s > 0.0),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_payload() {
        let payload = parse_payload(
            r#"{"boxes":[{"kind":"Button","text":"Go","bb":{"x":10,"y":20,"w":100,"h":40}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.boxes.len(), 1);
        assert_eq!(payload.boxes[0].kind, ElementKind::Button);
        assert_eq!(payload.boxes[0].text.as_deref(), Some("Go"));
        assert_eq!(payload.boxes[0].bb, Rect::from_xywh(10.0, 20.0, 100.0, 40.0));
    }

    #[test]
    fn accepts_fenced_payload() {
        let text = "```json\n{\"boxes\":[]}\n```";
        assert!(parse_payload(text).unwrap().boxes.is_empty());
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = parse_payload(r#"{"boxes":[{"kind":"Slider","bb":{"x":0,"y":0,"w":1,"h":1}}]}"#)
            .unwrap_err();
        assert!(matches!(err, PayloadError::UnknownKind { index: 0, .. }));
    }

    #[test]
    fn rejects_negative_bb() {
        let err = parse_payload(r#"{"boxes":[{"kind":"Label","bb":{"x":-5,"y":0,"w":1,"h":1}}]}"#)
            .unwrap_err();
        assert!(matches!(err, PayloadError::InvalidBox { index: 0, .. }));
    }

    #[test]
    fn rejects_missing_boxes_and_garbage() {
        assert!(matches!(parse_payload("{}"), Err(PayloadError::Json(_))));
        assert!(matches!(parse_payload("I see a button"), Err(PayloadError::Json(_))));
    }

    #[test]
    fn ignores_nonsense_font_size() {
        let payload = parse_payload(
            r#"{"boxes":[{"kind":"Label","fontSize":-3,"bb":{"x":0,"y":0,"w":1,"h":1}}]}"#,
        )
        .unwrap();
        assert_eq!(payload.boxes[0].font_size, None);
    }
}
