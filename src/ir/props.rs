//! Closed, per-variant property records.
//!
//! Every field has a documented default, and every record deserializes with
//! `#[serde(default)]`, so a document that omits optional detail still yields
//! a complete record. The same defaults are used by the sketch interpreter.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Default font size, as a fraction of canvas height.
pub const DEFAULT_FONT_SIZE: f64 = 0.02;

/// Label props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LabelProps {
    pub text: String,
    pub font_size: f64,
    pub color: Color,
    pub bold: bool,
}

impl Default for LabelProps {
    fn default() -> Self {
        Self {
            text: "Label".into(),
            font_size: 0.025,
            color: Color::rgb(0x111827),
            bold: false,
        }
    }
}

/// Horizontal text alignment for paragraphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Paragraph props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParagraphProps {
    pub text: String,
    pub font_size: f64,
    pub color: Color,
    pub align: TextAlign,
}

impl Default for ParagraphProps {
    fn default() -> Self {
        Self {
            text: "Lorem ipsum dolor sit amet, consectetur adipiscing elit.".into(),
            font_size: DEFAULT_FONT_SIZE,
            color: Color::rgb(0x374151),
            align: TextAlign::Left,
        }
    }
}

/// Single-line text input props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputTextProps {
    pub placeholder: String,
    pub font_size: f64,
    /// Hides the typed characters (password field).
    pub obscured: bool,
}

impl Default for InputTextProps {
    fn default() -> Self {
        Self {
            placeholder: "Enter text".into(),
            font_size: DEFAULT_FONT_SIZE,
            obscured: false,
        }
    }
}

/// Date input props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputDateProps {
    pub placeholder: String,
    pub font_size: f64,
}

impl Default for InputDateProps {
    fn default() -> Self {
        Self {
            placeholder: "Select a date".into(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Button props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonProps {
    pub text: String,
    pub bg_color: Color,
    pub text_color: Color,
    /// Corner radius in logical pixels.
    pub border_radius: f64,
    pub font_size: f64,
}

impl Default for ButtonProps {
    fn default() -> Self {
        Self {
            text: "Button".into(),
            bg_color: Color::rgb(0x007bff),
            text_color: Color::rgb(0xffffff),
            border_radius: 4.0,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Hyperlink props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkProps {
    pub text: String,
    pub url: String,
    pub color: Color,
    pub font_size: f64,
}

impl Default for LinkProps {
    fn default() -> Self {
        Self {
            text: "Link".into(),
            url: "https://example.com".into(),
            color: Color::rgb(0x2563eb),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Table props.
///
/// `col_widths` are fractions of the table width, one per header, summing to
/// one. [`TableProps::normalize_col_widths`] restores that invariant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableProps {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub col_widths: Vec<f64>,
    pub font_size: f64,
    pub header_color: Color,
}

impl Default for TableProps {
    fn default() -> Self {
        Self {
            headers: vec!["Column 1".into(), "Column 2".into()],
            rows: Vec::new(),
            col_widths: vec![0.5, 0.5],
            font_size: 0.018,
            header_color: Color::rgb(0xe5e7eb),
        }
    }
}

impl TableProps {
    /// Makes `col_widths` match `headers` and sum to one.
    ///
    /// Mismatched lengths or non-positive totals fall back to an even split.
    pub fn normalize_col_widths(&mut self) {
        let n = self.headers.len();
        if n == 0 {
            self.col_widths.clear();
            return;
        }

        let total: f64 = self.col_widths.iter().sum();
        let usable = self.col_widths.len() == n
            && total.is_finite()
            && total > 0.0
            && self.col_widths.iter().all(|w| w.is_finite() && *w >= 0.0);

        if usable {
            for w in &mut self.col_widths {
                *w /= total;
            }
        } else {
            self.col_widths = vec![1.0 / n as f64; n];
        }
    }
}

/// Checkbox props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckboxProps {
    pub text: String,
    pub checked: bool,
    pub font_size: f64,
}

impl Default for CheckboxProps {
    fn default() -> Self {
        Self {
            text: "Option".into(),
            checked: false,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Dropdown selector props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorProps {
    pub options: Vec<String>,
    pub font_size: f64,
}

impl Default for SelectorProps {
    fn default() -> Self {
        Self {
            options: default_selector_options(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// The two example options given to selectors that carry none.
pub fn default_selector_options() -> Vec<String> {
    vec!["Option 1".into(), "Option 2".into()]
}

/// One navigation entry of a Sidebar or BottomNav.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavItem {
    pub text: String,
    /// Name of the screen this item navigates to.
    pub target_screen: String,
    /// Material icon name (BottomNav only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl NavItem {
    pub fn new(text: impl Into<String>, target_screen: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_screen: target_screen.into(),
            icon: None,
        }
    }
}

/// Collapsible side menu props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SidebarProps {
    pub title: String,
    pub items: Vec<NavItem>,
    /// Whether the menu starts expanded.
    pub visible: bool,
    pub bg_color: Color,
    pub text_color: Color,
    pub item_color: Color,
}

impl Default for SidebarProps {
    fn default() -> Self {
        Self {
            title: "Menu".into(),
            items: Vec::new(),
            visible: true,
            bg_color: Color::rgb(0x1f2937),
            text_color: Color::rgb(0xffffff),
            item_color: Color::rgb(0x374151),
        }
    }
}

/// Bottom navigation bar props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BottomNavProps {
    pub items: Vec<NavItem>,
    pub bg_color: Color,
    pub active_color: Color,
    pub inactive_color: Color,
}

impl Default for BottomNavProps {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            bg_color: Color::rgb(0xffffff),
            active_color: Color::rgb(0x2563eb),
            inactive_color: Color::rgb(0x6b7280),
        }
    }
}

/// Rectangle and ellipse props.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeProps {
    pub fill: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Color>,
    pub border_width: f64,
    /// Corner radius in logical pixels (ignored for ellipses).
    pub border_radius: f64,
}

impl Default for ShapeProps {
    fn default() -> Self {
        Self {
            fill: Color::rgb(0xe5e7eb),
            border_color: None,
            border_width: 0.0,
            border_radius: 0.0,
        }
    }
}

/// How an image fills its rect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

/// Image props.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageProps {
    pub url: String,
    pub fit: ImageFit,
}

/// Video and audio props.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaProps {
    pub url: String,
    pub autoplay: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let props: ButtonProps = serde_json::from_str(r#"{"text":"Go"}"#).unwrap();
        assert_eq!(props.text, "Go");
        assert_eq!(props.bg_color, Color::rgb(0x007bff));
        assert_eq!(props.font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn col_widths_rescaled_to_one() {
        let mut table = TableProps {
            headers: vec!["a".into(), "b".into()],
            col_widths: vec![1.0, 3.0],
            ..Default::default()
        };
        table.normalize_col_widths();
        assert_eq!(table.col_widths, vec![0.25, 0.75]);
    }

    #[test]
    fn col_widths_mismatch_falls_back_to_even_split() {
        let mut table = TableProps {
            headers: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            col_widths: vec![0.5, 0.5],
            ..Default::default()
        };
        table.normalize_col_widths();
        assert_eq!(table.col_widths, vec![0.25; 4]);
    }

    #[test]
    fn nav_item_uses_camel_case() {
        let item: NavItem =
            serde_json::from_str(r#"{"text":"Home","targetScreen":"Home"}"#).unwrap();
        assert_eq!(item.target_screen, "Home");
    }
}
