//! Sidebar and bottom navigation.
//!
//! Both resolve item targets through the route table; an item whose target
//! names no screen is rendered with a null handler.

use crate::codegen::dart::{color, font_size, height, list, string_literal, width, Call};
use crate::codegen::ScreenContext;
use crate::ir::{BottomNavProps, NavItem, Normalized, Rect, SidebarProps};

/// Material icon names the generator knows to exist.
const KNOWN_ICONS: &[&str] = &[
    "home",
    "search",
    "settings",
    "person",
    "menu",
    "favorite",
    "notifications",
    "shopping_cart",
    "info",
    "list",
    "chat",
    "calendar_today",
];

const ITEM_FONT_SIZE: f64 = 0.014;
const SIDEBAR_FONT_SIZE: f64 = 0.02;
const TITLE_FONT_SIZE: f64 = 0.025;

fn icon(item: &NavItem) -> &str {
    item.icon
        .as_deref()
        .filter(|name| KNOWN_ICONS.contains(name))
        .unwrap_or("circle")
}

fn navigate(path: Option<&str>) -> String {
    match path {
        Some(path) => format!(
            "() => Navigator.pushReplacementNamed(context, {})",
            string_literal(path)
        ),
        None => "null".to_string(),
    }
}

/// The sidebar slides off-canvas when hidden and keeps a toggle button at its
/// top-left corner, so it emits two Stack children.
pub(super) fn sidebar(
    rect: &Rect<Normalized>,
    props: &SidebarProps,
    ctx: &mut ScreenContext<'_>,
) -> String {
    if ctx.sidebar_visible.is_none() {
        ctx.sidebar_visible = Some(props.visible);
    }

    let mut entries = vec![Call::new("Padding")
        .named("padding", "const EdgeInsets.fromLTRB(16, 48, 16, 16)")
        .named(
            "child",
            Call::new("Text")
                .positional(string_literal(&props.title))
                .named("overflow", "TextOverflow.ellipsis")
                .named(
                    "style",
                    Call::new("TextStyle")
                        .named("color", format!("const {}", color(props.text_color)))
                        .named("fontSize", font_size(TITLE_FONT_SIZE))
                        .named("fontWeight", "FontWeight.bold"),
                ),
        )
        .render()];

    for item in &props.items {
        let handler = navigate(ctx.route_path(&item.target_screen));
        entries.push(
            Call::new("ListTile")
                .named("tileColor", format!("const {}", color(props.item_color)))
                .named(
                    "title",
                    Call::new("Text")
                        .positional(string_literal(&item.text))
                        .named(
                            "style",
                            Call::new("TextStyle")
                                .named("color", format!("const {}", color(props.text_color)))
                                .named("fontSize", font_size(SIDEBAR_FONT_SIZE)),
                        ),
                )
                .named("onTap", handler)
                .render(),
        );
    }

    let panel = Call::new("AnimatedPositioned")
        .named("duration", "const Duration(milliseconds: 250)")
        .named(
            "left",
            format!("_sidebarVisible ? {} : -({})", width(rect.x), width(rect.w)),
        )
        .named("top", height(rect.y))
        .named("width", width(rect.w))
        .named("height", height(rect.h))
        .named(
            "child",
            Call::new("Material")
                .named("color", format!("const {}", color(props.bg_color)))
                .named("elevation", "8")
                .named(
                    "child",
                    Call::new("ListView")
                        .named("padding", "EdgeInsets.zero")
                        .named("children", list("", &entries)),
                ),
        );

    let toggle = Call::new("Positioned")
        .named("left", width(rect.x))
        .named("top", height(rect.y))
        .named(
            "child",
            Call::new("IconButton")
                .named("icon", "Icon(_sidebarVisible ? Icons.close : Icons.menu)")
                .named(
                    "color",
                    format!(
                        "_sidebarVisible ? const {} : Colors.black87",
                        color(props.text_color)
                    ),
                )
                .named(
                    "onPressed",
                    "() => setState(() => _sidebarVisible = !_sidebarVisible)",
                ),
        );

    format!("{},\n{}", panel.render(), toggle.render())
}

pub(super) fn bottom_nav(props: &BottomNavProps, ctx: &mut ScreenContext<'_>) -> String {
    let paths: Vec<Option<&str>> = props
        .items
        .iter()
        .map(|item| ctx.route_path(&item.target_screen))
        .collect();

    let current = format!("/{}", ctx.current_route);
    let start = paths
        .iter()
        .position(|p| *p == Some(current.as_str()))
        .unwrap_or(0);
    if ctx.nav_index.is_none() {
        ctx.nav_index = Some(start);
    }

    let active = color(props.active_color);
    let inactive = color(props.inactive_color);

    let items: Vec<String> = props
        .items
        .iter()
        .zip(&paths)
        .enumerate()
        .map(|(i, (item, path))| {
            let tint = format!("_navIndex == {i} ? const {active} : const {inactive}");
            let on_tap = match path {
                Some(path) => format!(
                    "() {{\n  setState(() => _navIndex = {i});\n  Navigator.pushReplacementNamed(context, {});\n}}",
                    string_literal(path)
                ),
                None => "null".to_string(),
            };

            let column = Call::new("Column")
                .named("mainAxisSize", "MainAxisSize.min")
                .named(
                    "children",
                    list(
                        "",
                        &[
                            Call::new("Icon")
                                .positional(format!("Icons.{}", icon(item)))
                                .named("color", tint.clone())
                                .render(),
                            Call::new("Text")
                                .positional(string_literal(&item.text))
                                .named(
                                    "style",
                                    Call::new("TextStyle")
                                        .named("fontSize", font_size(ITEM_FONT_SIZE))
                                        .named("color", tint),
                                )
                                .render(),
                        ],
                    ),
                );

            Call::new("Expanded")
                .named(
                    "child",
                    Call::new("InkWell").named("onTap", on_tap).named(
                        "child",
                        Call::new("Center").named(
                            "child",
                            Call::new("FittedBox")
                                .named("fit", "BoxFit.scaleDown")
                                .named("child", column),
                        ),
                    ),
                )
                .render()
        })
        .collect();

    Call::new("Material")
        .named("color", format!("const {}", color(props.bg_color)))
        .named("elevation", "8")
        .named("child", Call::new("Row").named("children", list("", &items)))
        .render()
}
