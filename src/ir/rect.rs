//! Axis-aligned rectangles in XYWH format.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::{Normalized, Pixel};

/// An axis-aligned rectangle: top-left corner plus width and height.
///
/// The `TSpace` parameter should be either [`Pixel`] or [`Normalized`], so a
/// detector box can never be stored in the IR without going through
/// [`Rect::<Pixel>::to_normalized`].
///
/// Like the rest of the IR this type is permissive: negative or out-of-range
/// values can be represented, and validation reports them.
#[derive(Clone, Copy, PartialEq)]
pub struct Rect<TSpace> {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Rect<TSpace> {
    /// Creates a rectangle from its top-left corner and size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            _space: PhantomData,
        }
    }

    /// Right edge (`x + w`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (`y + h`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Returns the area. May be negative for malformed rectangles.
    #[inline]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Returns true if all four values are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Returns true if `other` lies fully inside this rectangle (edges included).
    pub fn contains(&self, other: &Rect<TSpace>) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl Rect<Pixel> {
    /// Converts a pixel rectangle into canvas fractions.
    ///
    /// The result is clamped so that every field lies in `[0, 1]` and the
    /// rectangle does not extend past the right or bottom edge. Callers must
    /// pass positive image dimensions.
    pub fn to_normalized(&self, image_width: f64, image_height: f64) -> Rect<Normalized> {
        let x = clamp_unit(self.x / image_width);
        let y = clamp_unit(self.y / image_height);
        let w = (self.w / image_width).clamp(0.0, 1.0 - x);
        let h = (self.h / image_height).clamp(0.0, 1.0 - y);
        Rect::from_xywh(x, y, w, h)
    }
}

impl Rect<Normalized> {
    /// Returns true if every field is in `[0, 1]` and the rectangle stays on
    /// the canvas, allowing `tolerance` for float noise.
    pub fn is_on_canvas(&self, tolerance: f64) -> bool {
        let unit = |v: f64| (-tolerance..=1.0 + tolerance).contains(&v);
        self.is_finite()
            && unit(self.x)
            && unit(self.y)
            && unit(self.w)
            && unit(self.h)
            && self.right() <= 1.0 + tolerance
            && self.bottom() <= 1.0 + tolerance
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl<TSpace> std::fmt::Debug for Rect<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rect")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

impl<TSpace> Default for Rect<TSpace> {
    fn default() -> Self {
        Self::from_xywh(0.0, 0.0, 0.0, 0.0)
    }
}

// Custom serde implementation to avoid TSpace: Serialize/Deserialize bounds
impl<TSpace> Serialize for Rect<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Rect", 4)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.serialize_field("w", &self.w)?;
        state.serialize_field("h", &self.h)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for Rect<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RectData {
            x: f64,
            y: f64,
            w: f64,
            h: f64,
        }
        let data = RectData::deserialize(deserializer)?;
        Ok(Rect::from_xywh(data.x, data.y, data.w, data.h))
    }
}
