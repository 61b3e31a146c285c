//! Sketch interpretation: detector boxes to IR elements.
//!
//! The interpreter takes the pixel-space boxes a detector reported for one
//! sketch and produces the elements of one screen:
//!
//! 1. Labels drawn inside a Sidebar (or BottomNav) are absorbed into its
//!    title and items and never appear on their own.
//! 2. Pixel boxes are normalized to canvas fractions.
//! 3. Text elements get a font size, explicit or inferred by [`FontPolicy`].
//! 4. Anything the detector left out takes the IR defaults.
//!
//! Interpretation is all-or-nothing: on failure no elements are returned.

mod detector;
mod font;
mod payload;

pub use detector::{
    detect_payload, instructions, DetectionRequest, Detector, DetectorError,
    PayloadFileDetector, DETECT_ATTEMPTS,
};
pub use font::FontPolicy;
pub use payload::{parse_payload, DetectedBox, DetectorPayload, PayloadError};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SketchportError;
use crate::ir::{
    default_selector_options, BottomNavProps, ButtonProps, CheckboxProps, Element, ElementKind,
    ImageProps, InputDateProps, InputTextProps, LabelProps, LinkProps, MediaProps, NavItem,
    ParagraphProps, Screen, ScreenId, SelectorProps, SidebarProps, TableProps, Widget,
};

/// z-index of decorative shapes.
pub const BACKGROUND_Z: i32 = -1;
/// z-index of navigation overlays.
pub const OVERLAY_Z: i32 = 100;

/// Options for interpretation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InterpretOptions {
    /// Font size inference for boxes without explicit size.
    pub font_policy: FontPolicy,
    /// Navigation targets for absorbed items, by position. Items beyond the
    /// list target the screen named by their own text.
    pub targets: Vec<String>,
}

/// What absorbing contained Labels produced for one navigation box.
#[derive(Default)]
struct Absorbed {
    title: Option<String>,
    items: Vec<String>,
}

/// Interprets detector boxes into the elements of one screen.
///
/// # Errors
/// - [`SketchportError::InvalidInput`] if either image dimension is zero.
/// - [`SketchportError::NoBoxes`] if `boxes` is empty.
pub fn interpret_boxes(
    image_width: u32,
    image_height: u32,
    boxes: &[DetectedBox],
    opts: &InterpretOptions,
) -> Result<Vec<Element>, SketchportError> {
    if image_width == 0 || image_height == 0 {
        return Err(SketchportError::invalid_input(format!(
            "image dimensions must be positive, got {image_width}x{image_height}"
        )));
    }
    if boxes.is_empty() {
        return Err(SketchportError::NoBoxes);
    }

    let (iw, ih) = (f64::from(image_width), f64::from(image_height));
    let (absorbed, consumed) = absorb_labels(boxes);

    let mut counters: HashMap<ElementKind, usize> = HashMap::new();
    let mut elements = Vec::with_capacity(boxes.len());
    for (index, detected) in boxes.iter().enumerate() {
        if consumed[index] {
            continue;
        }

        let counter = counters.entry(detected.kind).or_default();
        *counter += 1;
        let id = format!("{}-{}", detected.kind.as_str().to_ascii_lowercase(), counter);

        let font_size = match detected.font_size {
            Some(size) => FontPolicy::explicit(size, ih),
            None => opts.font_policy.font_size(detected.bb.h, ih),
        };
        let widget = build_widget(detected, absorbed.get(&index), font_size, &opts.targets);

        let element = Element::new(id, detected.bb.to_normalized(iw, ih), widget)
            .with_z_index(default_z_index(detected.kind));
        tracing::debug!(element = %element.id, kind = %detected.kind, "interpreted box");
        elements.push(element);
    }

    tracing::info!(
        boxes = boxes.len(),
        elements = elements.len(),
        absorbed = consumed.iter().filter(|c| **c).count(),
        "interpreted sketch"
    );
    Ok(elements)
}

/// Interprets a validated payload into a named screen.
pub fn interpret_screen(
    id: impl Into<ScreenId>,
    name: impl Into<String>,
    image_width: u32,
    image_height: u32,
    payload: &DetectorPayload,
    opts: &InterpretOptions,
) -> Result<Screen, SketchportError> {
    let elements = interpret_boxes(image_width, image_height, &payload.boxes, opts)?;
    let mut screen = Screen::new(id, name);
    screen.elements = elements;
    Ok(screen)
}

/// Runs the whole pipeline for one sketch image: reads its dimensions, asks
/// the detector (with retries) and interprets the result.
///
/// # Errors
/// [`SketchportError::SketchImage`] if the image format is not recognized,
/// plus everything [`detect_payload`] and [`interpret_boxes`] return.
pub fn interpret_sketch(
    detector: &dyn Detector,
    image: &[u8],
    screen_name: &str,
    opts: &InterpretOptions,
) -> Result<Screen, SketchportError> {
    let size = imagesize::blob_size(image).map_err(|e| SketchportError::SketchImage {
        message: e.to_string(),
    })?;
    let width = u32::try_from(size.width).unwrap_or(u32::MAX);
    let height = u32::try_from(size.height).unwrap_or(u32::MAX);
    tracing::debug!(width, height, "read sketch dimensions");

    let payload = detect_payload(detector, image)?;
    let id = format!("screen-{}", crate::codegen::naming::route_id(screen_name));
    interpret_screen(id, screen_name, width, height, &payload, opts)
}

fn default_z_index(kind: ElementKind) -> i32 {
    match kind {
        ElementKind::Rectangle | ElementKind::Ellipse => BACKGROUND_Z,
        kind if kind.is_overlay() => OVERLAY_Z,
        _ => 0,
    }
}

/// Finds Labels fully inside Sidebar and BottomNav boxes.
///
/// Returns the absorbed text per navigation box index, and a flag per box
/// telling whether it was consumed. A Label inside two navigation boxes goes
/// to the first one in payload order.
fn absorb_labels(boxes: &[DetectedBox]) -> (HashMap<usize, Absorbed>, Vec<bool>) {
    let mut consumed = vec![false; boxes.len()];
    let mut absorbed = HashMap::new();

    for (nav_index, nav) in boxes.iter().enumerate() {
        if !nav.kind.is_overlay() {
            continue;
        }

        let mut inside: Vec<usize> = boxes
            .iter()
            .enumerate()
            .filter(|(i, b)| {
                b.kind == ElementKind::Label && !consumed[*i] && nav.bb.contains(&b.bb)
            })
            .map(|(i, _)| i)
            .collect();
        if inside.is_empty() {
            continue;
        }

        // Sidebars read top to bottom, bottom bars left to right.
        if nav.kind == ElementKind::Sidebar {
            inside.sort_by(|a, b| boxes[*a].bb.y.total_cmp(&boxes[*b].bb.y));
        } else {
            inside.sort_by(|a, b| boxes[*a].bb.x.total_cmp(&boxes[*b].bb.x));
        }

        let mut texts = inside.iter().map(|i| {
            consumed[*i] = true;
            boxes[*i].text.clone().filter(|t| !t.trim().is_empty())
        });
        // A blank title falls back to the sidebar default.
        let title = if nav.kind == ElementKind::Sidebar {
            texts.next().flatten()
        } else {
            None
        };
        let items = texts
            .enumerate()
            .map(|(n, text)| text.unwrap_or_else(|| format!("Item {}", n + 1)))
            .collect();

        absorbed.insert(nav_index, Absorbed { title, items });
    }

    (absorbed, consumed)
}

fn nav_items(texts: &[String], targets: &[String]) -> Vec<NavItem> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let target = targets.get(i).cloned().unwrap_or_else(|| text.clone());
            NavItem::new(text.clone(), target)
        })
        .collect()
}

/// Builds the prop record of one box, defaulting whatever is missing.
fn build_widget(
    detected: &DetectedBox,
    absorbed: Option<&Absorbed>,
    font_size: f64,
    targets: &[String],
) -> Widget {
    let text = detected.text.clone().filter(|t| !t.trim().is_empty());
    let url = detected.url.clone().filter(|u| !u.trim().is_empty());

    match detected.kind {
        ElementKind::Label => {
            let defaults = LabelProps::default();
            Widget::Label(LabelProps {
                text: text.unwrap_or(defaults.text),
                font_size,
                ..defaults
            })
        }
        ElementKind::Paragraph => {
            let defaults = ParagraphProps::default();
            Widget::Paragraph(ParagraphProps {
                text: text.unwrap_or(defaults.text),
                font_size,
                ..defaults
            })
        }
        ElementKind::InputText => {
            let defaults = InputTextProps::default();
            let placeholder = text.unwrap_or(defaults.placeholder);
            Widget::InputText(InputTextProps {
                obscured: looks_like_password(&placeholder),
                placeholder,
                font_size,
            })
        }
        ElementKind::InputDate => {
            let defaults = InputDateProps::default();
            Widget::InputDate(InputDateProps {
                placeholder: text.unwrap_or(defaults.placeholder),
                font_size,
            })
        }
        ElementKind::Button => {
            let defaults = ButtonProps::default();
            Widget::Button(ButtonProps {
                text: text.unwrap_or(defaults.text),
                font_size,
                ..defaults
            })
        }
        ElementKind::Link => {
            let defaults = LinkProps::default();
            Widget::Link(LinkProps {
                text: text.unwrap_or(defaults.text),
                url: url.unwrap_or(defaults.url),
                font_size,
                ..defaults
            })
        }
        ElementKind::Table => {
            let defaults = TableProps::default();
            let mut table = TableProps {
                headers: detected.headers.clone().unwrap_or(defaults.headers),
                rows: detected.rows.clone().unwrap_or_default(),
                col_widths: Vec::new(),
                font_size,
                ..defaults
            };
            table.normalize_col_widths();
            Widget::Table(table)
        }
        ElementKind::Checkbox => {
            let defaults = CheckboxProps::default();
            Widget::Checkbox(CheckboxProps {
                text: text.unwrap_or(defaults.text),
                font_size,
                ..defaults
            })
        }
        ElementKind::Selector => {
            let options = detected
                .options
                .clone()
                .filter(|o| !o.is_empty())
                .unwrap_or_else(default_selector_options);
            Widget::Selector(SelectorProps { options, font_size })
        }
        ElementKind::Sidebar => {
            let defaults = SidebarProps::default();
            let (title, items) = match absorbed {
                Some(found) => (found.title.clone(), found.items.clone()),
                None => (text, detected.items.clone().unwrap_or_default()),
            };
            Widget::Sidebar(SidebarProps {
                title: title.unwrap_or(defaults.title.clone()),
                items: nav_items(&items, targets),
                ..defaults
            })
        }
        ElementKind::BottomNav => {
            let items = match absorbed {
                Some(found) => found.items.clone(),
                None => detected.items.clone().unwrap_or_default(),
            };
            Widget::BottomNav(BottomNavProps {
                items: nav_items(&items, targets),
                ..Default::default()
            })
        }
        ElementKind::Rectangle => Widget::Rectangle(Default::default()),
        ElementKind::Ellipse => Widget::Ellipse(Default::default()),
        ElementKind::Image => Widget::Image(ImageProps {
            url: url.unwrap_or_default(),
            ..Default::default()
        }),
        ElementKind::Video => Widget::Video(MediaProps {
            url: url.unwrap_or_default(),
            ..Default::default()
        }),
        ElementKind::Audio => Widget::Audio(MediaProps {
            url: url.unwrap_or_default(),
            ..Default::default()
        }),
    }
}

fn looks_like_password(placeholder: &str) -> bool {
    let lower = placeholder.to_lowercase();
    ["password", "contraseña", "passcode", "pin"]
        .iter()
        .any(|word| lower.split(|c: char| !c.is_alphanumeric()).any(|w| w == *word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Pixel, Rect};

    fn bb(x: f64, y: f64, w: f64, h: f64) -> Rect<Pixel> {
        Rect::from_xywh(x, y, w, h)
    }

    fn label(text: &str, rect: Rect<Pixel>) -> DetectedBox {
        DetectedBox::new(ElementKind::Label, rect).with_text(text)
    }

    #[test]
    fn sidebar_absorbs_contained_labels() {
        let boxes = vec![
            DetectedBox::new(ElementKind::Sidebar, bb(0.0, 0.0, 200.0, 800.0)),
            label("Menu", bb(10.0, 10.0, 150.0, 30.0)),
            label("Home", bb(10.0, 50.0, 150.0, 30.0)),
        ];

        let elements = interpret_boxes(800, 800, &boxes, &InterpretOptions::default()).unwrap();

        assert_eq!(elements.len(), 1);
        match &elements[0].widget {
            Widget::Sidebar(props) => {
                assert_eq!(props.title, "Menu");
                let items: Vec<&str> = props.items.iter().map(|i| i.text.as_str()).collect();
                assert_eq!(items, vec!["Home"]);
                assert_eq!(props.items[0].target_screen, "Home");
            }
            other => panic!("expected sidebar, got {other:?}"),
        }
        assert_eq!(elements[0].z_index, OVERLAY_Z);
        assert_eq!(elements[0].rect, Rect::from_xywh(0.0, 0.0, 0.25, 1.0));
    }

    #[test]
    fn blank_absorbed_labels_take_defaults() {
        let boxes = vec![
            DetectedBox::new(ElementKind::Sidebar, bb(0.0, 0.0, 200.0, 800.0)),
            DetectedBox::new(ElementKind::Label, bb(10.0, 10.0, 150.0, 30.0)),
            label("  ", bb(10.0, 50.0, 150.0, 30.0)),
            label("Home", bb(10.0, 90.0, 150.0, 30.0)),
        ];

        let elements = interpret_boxes(800, 800, &boxes, &InterpretOptions::default()).unwrap();
        assert_eq!(elements.len(), 1);
        let Widget::Sidebar(props) = &elements[0].widget else {
            panic!("expected sidebar");
        };
        assert_eq!(props.title, SidebarProps::default().title);
        let items: Vec<&str> = props.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(items, vec!["Item 1", "Home"]);
    }

    #[test]
    fn absorbed_items_keep_vertical_order_and_take_targets() {
        let boxes = vec![
            label("Settings", bb(10.0, 200.0, 150.0, 30.0)),
            DetectedBox::new(ElementKind::Sidebar, bb(0.0, 0.0, 200.0, 800.0)),
            label("Profile", bb(10.0, 100.0, 150.0, 30.0)),
            label("Menu", bb(10.0, 10.0, 150.0, 30.0)),
            label("Outside", bb(300.0, 10.0, 150.0, 30.0)),
        ];
        let opts = InterpretOptions {
            targets: vec!["Account".into()],
            ..Default::default()
        };

        let elements = interpret_boxes(800, 800, &boxes, &opts).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].id.as_str(), "sidebar-1");
        assert_eq!(elements[1].id.as_str(), "label-1");

        let Widget::Sidebar(props) = &elements[0].widget else {
            panic!("expected sidebar");
        };
        assert_eq!(props.title, "Menu");
        assert_eq!(props.items[0], NavItem::new("Profile", "Account"));
        assert_eq!(props.items[1], NavItem::new("Settings", "Settings"));
    }

    #[test]
    fn label_is_absorbed_by_first_sidebar_only() {
        let boxes = vec![
            DetectedBox::new(ElementKind::Sidebar, bb(0.0, 0.0, 200.0, 800.0)),
            DetectedBox::new(ElementKind::Sidebar, bb(0.0, 0.0, 300.0, 800.0)),
            label("Start", bb(10.0, 10.0, 150.0, 30.0)),
        ];
        let elements = interpret_boxes(800, 800, &boxes, &InterpretOptions::default()).unwrap();

        let titles: Vec<&str> = elements
            .iter()
            .filter_map(|e| match &e.widget {
                Widget::Sidebar(p) => Some(p.title.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0], "Start");
        assert_eq!(titles[1], SidebarProps::default().title);
        assert!(elements.iter().all(|e| e.kind() != Some(ElementKind::Label)));
    }

    #[test]
    fn bottom_nav_absorbs_left_to_right() {
        let boxes = vec![
            DetectedBox::new(ElementKind::BottomNav, bb(0.0, 700.0, 400.0, 100.0)),
            label("Cart", bb(300.0, 720.0, 80.0, 30.0)),
            label("Home", bb(20.0, 720.0, 80.0, 30.0)),
        ];
        let elements = interpret_boxes(400, 800, &boxes, &InterpretOptions::default()).unwrap();

        assert_eq!(elements.len(), 1);
        let Widget::BottomNav(props) = &elements[0].widget else {
            panic!("expected bottom nav");
        };
        let items: Vec<&str> = props.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(items, vec!["Home", "Cart"]);
    }

    #[test]
    fn defaults_fill_missing_detail() {
        let boxes = vec![
            DetectedBox::new(ElementKind::Selector, bb(0.0, 0.0, 100.0, 30.0)),
            DetectedBox::new(ElementKind::Button, bb(0.0, 40.0, 100.0, 30.0)),
            DetectedBox::new(ElementKind::Rectangle, bb(0.0, 0.0, 400.0, 400.0)),
        ];
        let elements = interpret_boxes(400, 400, &boxes, &InterpretOptions::default()).unwrap();

        assert_eq!(elements.len(), 3);
        let Widget::Selector(selector) = &elements[0].widget else {
            panic!("expected selector");
        };
        assert_eq!(selector.options, default_selector_options());
        let Widget::Button(button) = &elements[1].widget else {
            panic!("expected button");
        };
        assert_eq!(button.text, "Button");
        assert_eq!(button.font_size, 0.02);
        assert_eq!(elements[2].z_index, BACKGROUND_Z);
    }

    #[test]
    fn explicit_font_size_wins() {
        let mut big = label("Title", bb(0.0, 0.0, 300.0, 20.0));
        big.font_size = Some(0.05);
        let elements = interpret_boxes(400, 800, &[big], &InterpretOptions::default()).unwrap();
        let Widget::Label(props) = &elements[0].widget else {
            panic!("expected label");
        };
        assert_eq!(props.font_size, 0.05);
    }

    #[test]
    fn password_inputs_are_obscured() {
        let boxes = vec![
            DetectedBox::new(ElementKind::InputText, bb(0.0, 0.0, 100.0, 30.0)).with_text("Password"),
            DetectedBox::new(ElementKind::InputText, bb(0.0, 40.0, 100.0, 30.0)).with_text("Email"),
        ];
        let elements = interpret_boxes(400, 400, &boxes, &InterpretOptions::default()).unwrap();
        let obscured: Vec<bool> = elements
            .iter()
            .map(|e| matches!(&e.widget, Widget::InputText(p) if p.obscured))
            .collect();
        assert_eq!(obscured, vec![true, false]);
    }

    #[test]
    fn zero_dimensions_are_invalid_input() {
        let boxes = vec![label("x", bb(0.0, 0.0, 1.0, 1.0))];
        let err = interpret_boxes(0, 100, &boxes, &InterpretOptions::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InputValidation);
    }

    #[test]
    fn empty_boxes_fail_interpretation() {
        let err = interpret_boxes(100, 100, &[], &InterpretOptions::default()).unwrap_err();
        assert!(matches!(err, SketchportError::NoBoxes));
        assert_eq!(err.kind(), crate::error::ErrorKind::Interpretation);
    }

    #[test]
    fn oversized_boxes_are_clamped() {
        let boxes = vec![label("wide", bb(700.0, 10.0, 500.0, 30.0))];
        let elements = interpret_boxes(800, 800, &boxes, &InterpretOptions::default()).unwrap();
        let rect = elements[0].rect;
        assert!(rect.right() <= 1.0);
        assert!(rect.is_on_canvas(0.0));
    }

    #[test]
    fn sketch_pipeline_reads_image_size() {
        // PNG signature and IHDR declaring an 800x800 image.
        let mut png = vec![
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x03, 0x20, 0x00, 0x00, 0x03, 0x20, 0x08, 0x06, 0x00, 0x00,
            0x00,
        ];
        png.extend_from_slice(&[0u8; 16]);

        let detector = |_: &DetectionRequest<'_>| -> Result<String, DetectorError> {
            Ok(r#"{"boxes":[{"kind":"Label","text":"Hi","bb":{"x":80,"y":80,"w":400,"h":40}}]}"#
                .to_string())
        };
        let screen =
            interpret_sketch(&detector, &png, "Home", &InterpretOptions::default()).unwrap();

        assert_eq!(screen.name, "Home");
        assert_eq!(screen.id.as_str(), "screen-home");
        assert_eq!(screen.elements[0].rect, Rect::from_xywh(0.1, 0.1, 0.5, 0.05));
    }

    #[test]
    fn unrecognized_image_is_reported() {
        let detector = |_: &DetectionRequest<'_>| -> Result<String, DetectorError> {
            Ok(r#"{"boxes":[]}"#.to_string())
        };
        let err = interpret_sketch(&detector, b"not an image", "Home", &InterpretOptions::default())
            .unwrap_err();
        assert!(matches!(err, SketchportError::SketchImage { .. }));
    }
}
