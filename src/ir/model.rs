//! Core design model for the sketchport intermediate representation.
//!
//! A [`Project`] is what the editor persists, what the sketch interpreter
//! produces and what the code generator reads. Elements are decoded into
//! closed per-variant prop records once, at this boundary, so downstream
//! code never deals with an untyped prop bag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ElementId, ScreenId};
use super::props::{
    BottomNavProps, ButtonProps, CheckboxProps, ImageProps, InputDateProps, InputTextProps,
    LabelProps, LinkProps, MediaProps, ParagraphProps, SelectorProps, ShapeProps, SidebarProps,
    TableProps,
};
use super::rect::Rect;
use super::space::Normalized;

/// A complete design: a device profile plus an ordered list of screens.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Optional display name, used for the export archive name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Reference canvas the design was drawn on.
    #[serde(default)]
    pub device_profile: DeviceProfile,

    /// All screens, in navigation order. The first one is the app's home.
    #[serde(default)]
    pub screens: Vec<Screen>,
}

impl Project {
    /// Creates an empty project for the given profile.
    pub fn new(device_profile: DeviceProfile) -> Self {
        Self {
            name: None,
            device_profile,
            screens: Vec::new(),
        }
    }

    /// Looks up a screen by its exact name.
    pub fn screen_by_name(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.name == name)
    }
}

/// Reference canvas size class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceProfile {
    Tablet,
    MobileSmall,
    #[default]
    Mobile,
}

impl DeviceProfile {
    /// Stable document name of the profile.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceProfile::Tablet => "tablet",
            DeviceProfile::MobileSmall => "mobile-small",
            DeviceProfile::Mobile => "mobile",
        }
    }

    /// Reference canvas in logical pixels (width, height).
    pub fn canvas_size(&self) -> (f64, f64) {
        match self {
            DeviceProfile::Tablet => (800.0, 1280.0),
            DeviceProfile::MobileSmall => (360.0, 640.0),
            DeviceProfile::Mobile => (390.0, 844.0),
        }
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tablet" => Ok(DeviceProfile::Tablet),
            "mobile-small" => Ok(DeviceProfile::MobileSmall),
            "mobile" => Ok(DeviceProfile::Mobile),
            other => Err(format!(
                "unknown device profile '{other}' (expected tablet, mobile-small or mobile)"
            )),
        }
    }
}

impl Serialize for DeviceProfile {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceProfile {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|message: String| {
            tracing::warn!("{message}; using mobile");
            DeviceProfile::Mobile
        }))
    }
}

/// One screen of the app.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub id: ScreenId,

    /// Display name; unique within the project, drives route and file names.
    pub name: String,

    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Screen {
    /// Creates an empty screen.
    pub fn new(id: impl Into<ScreenId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Adds an element (builder style).
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }
}

/// The closed set of element kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    Label,
    Paragraph,
    InputText,
    InputDate,
    Button,
    Link,
    Table,
    Checkbox,
    Selector,
    Sidebar,
    BottomNav,
    Rectangle,
    Ellipse,
    Image,
    Video,
    Audio,
}

impl ElementKind {
    /// Every kind, in document order.
    pub const ALL: [ElementKind; 16] = [
        ElementKind::Label,
        ElementKind::Paragraph,
        ElementKind::InputText,
        ElementKind::InputDate,
        ElementKind::Button,
        ElementKind::Link,
        ElementKind::Table,
        ElementKind::Checkbox,
        ElementKind::Selector,
        ElementKind::Sidebar,
        ElementKind::BottomNav,
        ElementKind::Rectangle,
        ElementKind::Ellipse,
        ElementKind::Image,
        ElementKind::Video,
        ElementKind::Audio,
    ];

    /// The `kind` tag used in documents and detector payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Label => "Label",
            ElementKind::Paragraph => "Paragraph",
            ElementKind::InputText => "InputText",
            ElementKind::InputDate => "InputDate",
            ElementKind::Button => "Button",
            ElementKind::Link => "Link",
            ElementKind::Table => "Table",
            ElementKind::Checkbox => "Checkbox",
            ElementKind::Selector => "Selector",
            ElementKind::Sidebar => "Sidebar",
            ElementKind::BottomNav => "BottomNav",
            ElementKind::Rectangle => "Rectangle",
            ElementKind::Ellipse => "Ellipse",
            ElementKind::Image => "Image",
            ElementKind::Video => "Video",
            ElementKind::Audio => "Audio",
        }
    }

    /// Parses a `kind` tag. Returns `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        ElementKind::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    /// Overlays are drawn above everything else.
    pub fn is_overlay(&self) -> bool {
        matches!(self, ElementKind::Sidebar | ElementKind::BottomNav)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific part of an element.
#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    Label(LabelProps),
    Paragraph(ParagraphProps),
    InputText(InputTextProps),
    InputDate(InputDateProps),
    Button(ButtonProps),
    Link(LinkProps),
    Table(TableProps),
    Checkbox(CheckboxProps),
    Selector(SelectorProps),
    Sidebar(SidebarProps),
    BottomNav(BottomNavProps),
    Rectangle(ShapeProps),
    Ellipse(ShapeProps),
    Image(ImageProps),
    Video(MediaProps),
    Audio(MediaProps),
    /// A kind this version does not know. Kept verbatim so the document
    /// round-trips, and rendered as an inert placeholder.
    Unknown {
        kind: String,
        props: serde_json::Value,
    },
}

impl Widget {
    /// The known kind of this widget, or `None` for [`Widget::Unknown`].
    pub fn kind(&self) -> Option<ElementKind> {
        Some(match self {
            Widget::Label(_) => ElementKind::Label,
            Widget::Paragraph(_) => ElementKind::Paragraph,
            Widget::InputText(_) => ElementKind::InputText,
            Widget::InputDate(_) => ElementKind::InputDate,
            Widget::Button(_) => ElementKind::Button,
            Widget::Link(_) => ElementKind::Link,
            Widget::Table(_) => ElementKind::Table,
            Widget::Checkbox(_) => ElementKind::Checkbox,
            Widget::Selector(_) => ElementKind::Selector,
            Widget::Sidebar(_) => ElementKind::Sidebar,
            Widget::BottomNav(_) => ElementKind::BottomNav,
            Widget::Rectangle(_) => ElementKind::Rectangle,
            Widget::Ellipse(_) => ElementKind::Ellipse,
            Widget::Image(_) => ElementKind::Image,
            Widget::Video(_) => ElementKind::Video,
            Widget::Audio(_) => ElementKind::Audio,
            Widget::Unknown { .. } => return None,
        })
    }

    /// The `kind` tag, including unknown ones.
    pub fn kind_tag(&self) -> &str {
        match self {
            Widget::Unknown { kind, .. } => kind,
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }

    /// Default props for a known kind.
    pub fn default_for(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Label => Widget::Label(Default::default()),
            ElementKind::Paragraph => Widget::Paragraph(Default::default()),
            ElementKind::InputText => Widget::InputText(Default::default()),
            ElementKind::InputDate => Widget::InputDate(Default::default()),
            ElementKind::Button => Widget::Button(Default::default()),
            ElementKind::Link => Widget::Link(Default::default()),
            ElementKind::Table => Widget::Table(Default::default()),
            ElementKind::Checkbox => Widget::Checkbox(Default::default()),
            ElementKind::Selector => Widget::Selector(Default::default()),
            ElementKind::Sidebar => Widget::Sidebar(Default::default()),
            ElementKind::BottomNav => Widget::BottomNav(Default::default()),
            ElementKind::Rectangle => Widget::Rectangle(Default::default()),
            ElementKind::Ellipse => Widget::Ellipse(Default::default()),
            ElementKind::Image => Widget::Image(Default::default()),
            ElementKind::Video => Widget::Video(Default::default()),
            ElementKind::Audio => Widget::Audio(Default::default()),
        }
    }
}

/// A positioned UI element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawElement", into = "RawElement")]
pub struct Element {
    pub id: ElementId,

    /// Position and size as fractions of the canvas.
    pub rect: Rect<Normalized>,

    /// Paint order; negative is decorative background, large is overlay.
    pub z_index: i32,

    pub widget: Widget,
}

impl Element {
    /// Creates an element with `z_index` 0.
    pub fn new(id: impl Into<ElementId>, rect: Rect<Normalized>, widget: Widget) -> Self {
        Self {
            id: id.into(),
            rect,
            z_index: 0,
            widget,
        }
    }

    /// Sets the z-index (builder style).
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Shortcut for `self.widget.kind()`.
    pub fn kind(&self) -> Option<ElementKind> {
        self.widget.kind()
    }
}

/// Wire shape of an element: `{id, kind, rect, zIndex, props}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    id: ElementId,
    kind: String,
    rect: Rect<Normalized>,
    #[serde(default)]
    z_index: i32,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    props: serde_json::Value,
}

impl From<RawElement> for Element {
    fn from(raw: RawElement) -> Self {
        let widget = match ElementKind::from_tag(&raw.kind) {
            Some(kind) => decode_widget(kind, &raw.id, raw.props),
            None => Widget::Unknown {
                kind: raw.kind,
                props: raw.props,
            },
        };

        Element {
            id: raw.id,
            rect: raw.rect,
            z_index: raw.z_index,
            widget,
        }
    }
}

impl From<Element> for RawElement {
    fn from(element: Element) -> Self {
        let kind = element.widget.kind_tag().to_string();
        let props = match element.widget {
            Widget::Label(p) => serde_json::to_value(p),
            Widget::Paragraph(p) => serde_json::to_value(p),
            Widget::InputText(p) => serde_json::to_value(p),
            Widget::InputDate(p) => serde_json::to_value(p),
            Widget::Button(p) => serde_json::to_value(p),
            Widget::Link(p) => serde_json::to_value(p),
            Widget::Table(p) => serde_json::to_value(p),
            Widget::Checkbox(p) => serde_json::to_value(p),
            Widget::Selector(p) => serde_json::to_value(p),
            Widget::Sidebar(p) => serde_json::to_value(p),
            Widget::BottomNav(p) => serde_json::to_value(p),
            Widget::Rectangle(p) | Widget::Ellipse(p) => serde_json::to_value(p),
            Widget::Image(p) => serde_json::to_value(p),
            Widget::Video(p) | Widget::Audio(p) => serde_json::to_value(p),
            Widget::Unknown { props, .. } => Ok(props),
        }
        // Prop records contain only strings, numbers and bools.
        .unwrap_or(serde_json::Value::Null);

        RawElement {
            id: element.id,
            kind,
            rect: element.rect,
            z_index: element.z_index,
            props,
        }
    }
}

/// Decodes the prop record of a known kind, defaulting on any failure.
fn decode_widget(kind: ElementKind, id: &ElementId, props: serde_json::Value) -> Widget {
    if props.is_null() {
        return Widget::default_for(kind);
    }

    fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, String> {
        serde_json::from_value(value).map_err(|e| e.to_string())
    }

    let decoded = match kind {
        ElementKind::Label => decode(props).map(Widget::Label),
        ElementKind::Paragraph => decode(props).map(Widget::Paragraph),
        ElementKind::InputText => decode(props).map(Widget::InputText),
        ElementKind::InputDate => decode(props).map(Widget::InputDate),
        ElementKind::Button => decode(props).map(Widget::Button),
        ElementKind::Link => decode(props).map(Widget::Link),
        ElementKind::Table => decode::<TableProps>(props).map(|mut table| {
            table.normalize_col_widths();
            Widget::Table(table)
        }),
        ElementKind::Checkbox => decode(props).map(Widget::Checkbox),
        ElementKind::Selector => decode::<SelectorProps>(props).map(|mut selector| {
            if selector.options.is_empty() {
                selector.options = super::props::default_selector_options();
            }
            Widget::Selector(selector)
        }),
        ElementKind::Sidebar => decode(props).map(Widget::Sidebar),
        ElementKind::BottomNav => decode(props).map(Widget::BottomNav),
        ElementKind::Rectangle => decode(props).map(Widget::Rectangle),
        ElementKind::Ellipse => decode(props).map(Widget::Ellipse),
        ElementKind::Image => decode(props).map(Widget::Image),
        ElementKind::Video => decode(props).map(Widget::Video),
        ElementKind::Audio => decode(props).map(Widget::Audio),
    };

    decoded.unwrap_or_else(|message| {
        tracing::warn!(element = %id, %kind, "malformed props, using defaults: {message}");
        Widget::default_for(kind)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::props::LabelProps;

    #[test]
    fn test_project_creation() {
        let project = Project {
            name: Some("Demo".into()),
            device_profile: DeviceProfile::Tablet,
            screens: vec![Screen::new("s1", "Home").with_element(Element::new(
                "e1",
                Rect::from_xywh(0.1, 0.1, 0.8, 0.1),
                Widget::Label(LabelProps::default()),
            ))],
        };

        assert_eq!(project.screens.len(), 1);
        assert_eq!(project.screen_by_name("Home").unwrap().elements.len(), 1);
        assert_eq!(project.device_profile.canvas_size(), (800.0, 1280.0));
    }

    #[test]
    fn unknown_profile_falls_back_to_mobile() {
        let project: Project =
            serde_json::from_str(r#"{"deviceProfile":"watch","screens":[]}"#).unwrap();
        assert_eq!(project.device_profile, DeviceProfile::Mobile);
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let json = r#"{"id":"x","kind":"Carousel","rect":{"x":0,"y":0,"w":0.5,"h":0.5},"props":{"a":1}}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind(), None);
        assert_eq!(element.widget.kind_tag(), "Carousel");

        let back = serde_json::to_value(&element).unwrap();
        assert_eq!(back["kind"], "Carousel");
        assert_eq!(back["props"]["a"], 1);
    }

    #[test]
    fn malformed_props_default_instead_of_failing() {
        let json = r#"{"id":"b","kind":"Button","rect":{"x":0,"y":0,"w":0.5,"h":0.1},"props":{"text":42}}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.widget, Widget::Button(ButtonProps::default()));
    }

    #[test]
    fn missing_props_default() {
        let json = r#"{"id":"s","kind":"Selector","rect":{"x":0,"y":0,"w":0.5,"h":0.1}}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        match element.widget {
            Widget::Selector(props) => assert_eq!(props.options.len(), 2),
            other => panic!("expected selector, got {other:?}"),
        }
    }

    #[test]
    fn kind_tags_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ElementKind::from_tag("label"), None);
    }
}
