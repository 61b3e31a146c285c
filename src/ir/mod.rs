//! Intermediate Representation (IR) for sketchport.
//!
//! This module defines the typed design model that sits between the sketch
//! interpreter and the code generator. The two never talk to each other;
//! the serialized [`Project`] is their only contract.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: Marker types keep detector pixel rectangles and
//!    canvas-fraction rectangles apart at compile time.
//!
//! 2. **Resolution Independence**: Element rects and font sizes are fractions
//!    of the canvas, so one design renders on every device profile.
//!
//! 3. **Closed Props, Validated Once**: Each element kind has its own prop
//!    record. Missing or malformed props are defaulted when the document is
//!    decoded, never at the point of use.
//!
//! # Example
//!
//! ```
//! use sketchport::ir::{DeviceProfile, Element, LabelProps, Project, Rect, Screen, Widget};
//!
//! let mut project = Project::new(DeviceProfile::Mobile);
//! project.screens.push(Screen::new("s1", "Home").with_element(Element::new(
//!     "title",
//!     Rect::from_xywh(0.1, 0.1, 0.8, 0.1),
//!     Widget::Label(LabelProps { text: "Hello".into(), ..Default::default() }),
//! )));
//! ```

mod color;
mod ids;
pub mod io_json;
mod model;
mod props;
mod rect;
mod space;

// Re-export core types for convenient access
pub use color::{Color, ParseColorError};
pub use ids::{ElementId, ScreenId};
pub use model::{DeviceProfile, Element, ElementKind, Project, Screen, Widget};
pub use props::{
    default_selector_options, BottomNavProps, ButtonProps, CheckboxProps, ImageFit, ImageProps,
    InputDateProps, InputTextProps, LabelProps, LinkProps, MediaProps, NavItem, ParagraphProps,
    SelectorProps, ShapeProps, SidebarProps, TableProps, TextAlign, DEFAULT_FONT_SIZE,
};
pub use rect::Rect;
pub use space::{Normalized, Pixel};
