//! Per-kind widget handlers.
//!
//! Dispatch is a single match on [`Widget`]; each handler is a pure function
//! of the element's props and the screen context, returning a Dart widget
//! expression. Everything except the sidebar is placed by a plain
//! `Positioned`; the sidebar animates its own position.

mod controls;
mod media;
mod navigation;
mod placeholder;
mod shapes;
mod table;
mod text;

use super::dart::positioned;
use super::{Fragment, ScreenContext};
use crate::ir::{Element, Widget};

/// Generates the Stack child (or children) for one element.
pub(crate) fn emit(element: &Element, ctx: &mut ScreenContext<'_>) -> Fragment {
    tracing::debug!(
        element = %element.id,
        kind = element.widget.kind_tag(),
        "emitting element"
    );

    let rect = &element.rect;
    let code = match &element.widget {
        Widget::Label(props) => positioned(rect, text::label(props)),
        Widget::Paragraph(props) => positioned(rect, text::paragraph(props)),
        Widget::Link(props) => positioned(rect, text::link(props)),
        Widget::InputText(props) => positioned(rect, controls::text_input(props, ctx)),
        Widget::InputDate(props) => positioned(rect, controls::date_input(props, ctx)),
        Widget::Button(props) => positioned(rect, controls::button(props)),
        Widget::Checkbox(props) => positioned(rect, controls::checkbox(props, ctx)),
        Widget::Selector(props) => positioned(rect, controls::selector(props, ctx)),
        Widget::Table(props) => positioned(rect, table::table(props)),
        Widget::Sidebar(props) => navigation::sidebar(rect, props, ctx),
        Widget::BottomNav(props) => positioned(rect, navigation::bottom_nav(props, ctx)),
        Widget::Rectangle(props) => positioned(rect, shapes::rectangle(props)),
        Widget::Ellipse(props) => positioned(rect, shapes::ellipse(props, ctx)),
        Widget::Image(props) => positioned(rect, media::image(props)),
        Widget::Video(props) => positioned(rect, media::video(props, ctx)),
        Widget::Audio(props) => positioned(rect, media::audio(props, ctx)),
        Widget::Unknown { kind, .. } => {
            tracing::warn!(
                element = %element.id,
                kind = kind.as_str(),
                "unknown element kind; rendering placeholder"
            );
            positioned(rect, placeholder::unknown(kind))
        }
    };

    Fragment {
        element_id: element.id.clone(),
        z_index: element.z_index,
        code,
    }
}
