//! Font size inference for detected text.

use serde::{Deserialize, Serialize};

/// Pixel-height buckets of the stepped policy: `(max box height, font size)`.
const STEPS: [(f64, f64); 4] = [(24.0, 0.016), (40.0, 0.02), (64.0, 0.025), (96.0, 0.032)];
const LARGEST_STEP: f64 = 0.04;

/// How a font size is derived when a box carries no explicit size.
///
/// Sizes are fractions of canvas height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FontPolicy {
    /// Bucket the box's pixel height into a small fixed set of sizes.
    #[default]
    Stepped,
    /// A fixed share of the box's normalized height.
    Proportional { ratio: f64 },
}

impl FontPolicy {
    /// Font size for a box `box_height` pixels tall on an image
    /// `image_height` pixels tall.
    pub fn font_size(&self, box_height: f64, image_height: f64) -> f64 {
        match *self {
            FontPolicy::Stepped => STEPS
                .iter()
                .find(|(max, _)| box_height <= *max)
                .map(|(_, size)| *size)
                .unwrap_or(LARGEST_STEP),
            FontPolicy::Proportional { ratio } => {
                let size = ratio * box_height / image_height;
                if size.is_finite() {
                    size.clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }

    /// Resolves explicit size intent from the detector.
    ///
    /// Values up to one are already canvas fractions; larger values are read
    /// as pixels on the sketch.
    pub fn explicit(size: f64, image_height: f64) -> f64 {
        if size <= 1.0 {
            size
        } else {
            (size / image_height).clamp(0.0, 1.0)
        }
    }
}
