//! Flutter code generation.
//!
//! [`generate_project`] compiles a validated [`Project`] into a
//! [`SourceTree`]: one source unit per screen plus the app entry module. The
//! generator is pure; every call builds its own registry and route table, so
//! generating the same project twice yields identical text.
//!
//! Layout is resolution independent: each screen lays its elements out in a
//! `Stack` inside an `AspectRatio` box that matches the device profile, and
//! every coordinate and font size is a fraction of the live constraints.

mod dart;
mod entry;
pub mod naming;
mod registry;
mod widgets;

pub use naming::ScreenNames;
pub use registry::{AuxComponent, AuxRegistry, AuxSignature};

use crate::error::SketchportError;
use crate::ir::{DeviceProfile, Element, ElementId, Project, Screen, ScreenId};
use crate::validation::{
    validate_project, IssueCode, Severity, ValidateOptions, ValidationReport,
};

/// Directory (inside the skeleton) that receives generated sources.
pub const SOURCE_ROOT: &str = "lib";

/// A generated file, addressed by its forward-slash path relative to the
/// project skeleton root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub contents: String,
}

/// One route: a screen's name and the identifiers derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    pub screen_name: String,
    pub names: ScreenNames,
}

/// Route table of a project, in screen order. The first entry is home.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn from_project(project: &Project) -> Self {
        Self {
            entries: project
                .screens
                .iter()
                .map(|screen| RouteEntry {
                    screen_name: screen.name.clone(),
                    names: ScreenNames::from_name(&screen.name),
                })
                .collect(),
        }
    }

    /// Resolves a navigation target (a screen name) by its derived route id.
    pub fn resolve(&self, target: &str) -> Option<&RouteEntry> {
        let wanted = naming::route_id(target);
        self.entries.iter().find(|e| e.names.route_id == wanted)
    }

    pub fn home(&self) -> Option<&RouteEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generated code for one element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub element_id: ElementId,
    pub z_index: i32,
    pub code: String,
}

/// Generated source for one screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub screen_id: ScreenId,
    pub names: ScreenNames,
    /// Helper definitions, sorted by signature.
    pub aux: Vec<AuxComponent>,
    /// Stack children in paint order.
    pub children: Vec<Fragment>,
    pub file: SourceFile,
}

/// Everything generated for a project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceTree {
    /// `lib/main.dart`.
    pub entry: SourceFile,
    pub units: Vec<SourceUnit>,
    pub routes: RouteTable,
}

impl SourceTree {
    /// All generated files: the entry module first, then screens in order.
    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        std::iter::once(&self.entry).chain(self.units.iter().map(|u| &u.file))
    }
}

/// Mutable state threaded through the widget handlers of one screen.
pub(crate) struct ScreenContext<'a> {
    pub(crate) routes: &'a RouteTable,
    /// Route id of the screen being generated.
    pub(crate) current_route: &'a str,
    pub(crate) registry: AuxRegistry,
    /// Initial value of the sidebar visibility field, if the screen has one.
    pub(crate) sidebar_visible: Option<bool>,
    /// Initial value of the bottom-nav index field, if the screen has one.
    pub(crate) nav_index: Option<usize>,
}

impl<'a> ScreenContext<'a> {
    fn new(routes: &'a RouteTable, current_route: &'a str) -> Self {
        Self {
            routes,
            current_route,
            registry: AuxRegistry::new(),
            sidebar_visible: None,
            nav_index: None,
        }
    }

    /// Resolves a navigation target to a route path, logging dangling ones.
    pub(crate) fn route_path(&self, target: &str) -> Option<&'a str> {
        let resolved = self.routes.resolve(target).map(|e| e.names.route_path.as_str());
        if resolved.is_none() {
            tracing::warn!(
                screen = self.current_route,
                nav_target = target,
                "navigation target does not name a screen; item will be inert"
            );
        }
        resolved
    }
}

/// Issue codes that make generation impossible.
fn blocks_generation(code: IssueCode) -> bool {
    matches!(
        code,
        IssueCode::NoScreens
            | IssueCode::EmptyScreenName
            | IssueCode::DuplicateScreenName
            | IssueCode::RouteCollision
    )
}

/// Generates the source tree for a whole project.
///
/// # Errors
/// Fails with an input validation error if the project has no screens or if
/// screen names cannot produce distinct routes. Element-level problems are
/// logged and rendered around.
pub fn generate_project(project: &Project) -> Result<SourceTree, SketchportError> {
    let report = validate_project(project, &ValidateOptions::default());
    if report.has(IssueCode::NoScreens) {
        return Err(SketchportError::NoScreens);
    }

    let mut fatal = ValidationReport::new();
    for issue in &report.issues {
        if issue.severity == Severity::Error && blocks_generation(issue.code) {
            fatal.add(issue.clone());
        } else {
            tracing::warn!(code = ?issue.code, context = %issue.context, "{}", issue.message);
        }
    }
    if !fatal.is_ok() {
        return Err(SketchportError::ValidationFailed {
            error_count: fatal.error_count(),
            warning_count: 0,
            report: fatal,
        });
    }

    let routes = RouteTable::from_project(project);
    let units: Vec<SourceUnit> = project
        .screens
        .iter()
        .map(|screen| generate_screen(screen, project.device_profile, &routes))
        .collect();
    let entry = entry::render_entry(project, &routes);

    tracing::info!(
        screens = units.len(),
        profile = %project.device_profile,
        "generated source tree"
    );

    Ok(SourceTree {
        entry,
        units,
        routes,
    })
}

/// Generates the source unit for one screen.
pub fn generate_screen(
    screen: &Screen,
    profile: DeviceProfile,
    routes: &RouteTable,
) -> SourceUnit {
    let names = ScreenNames::from_name(&screen.name);
    let mut ctx = ScreenContext::new(routes, &names.route_id);

    let children: Vec<Fragment> = paint_order(&screen.elements)
        .into_iter()
        .map(|element| widgets::emit(element, &mut ctx))
        .collect();

    let ScreenContext {
        registry,
        sidebar_visible,
        nav_index,
        ..
    } = ctx;
    let aux = registry.into_components();

    let contents = render_screen(&names, profile, &aux, &children, sidebar_visible, nav_index);
    tracing::debug!(
        screen = %screen.name,
        children = children.len(),
        aux = aux.len(),
        "generated screen"
    );

    SourceUnit {
        screen_id: screen.id.clone(),
        file: SourceFile {
            path: format!("{SOURCE_ROOT}/screens/{}", names.file_name),
            contents,
        },
        names,
        aux,
        children,
    }
}

/// Orders elements for painting: overlays last, then by z-index. The sort is
/// stable, so equal keys keep document order.
fn paint_order(elements: &[Element]) -> Vec<&Element> {
    let mut ordered: Vec<&Element> = elements.iter().collect();
    ordered.sort_by_key(|e| (e.kind().is_some_and(|k| k.is_overlay()), e.z_index));
    ordered
}

fn render_screen(
    names: &ScreenNames,
    profile: DeviceProfile,
    aux: &[AuxComponent],
    children: &[Fragment],
    sidebar_visible: Option<bool>,
    nav_index: Option<usize>,
) -> String {
    let class = &names.class_name;
    let (canvas_w, canvas_h) = profile.canvas_size();

    let mut out = String::new();
    out.push_str("// Generated by sketchport. Do not edit by hand.\n");
    out.push_str("import 'package:flutter/material.dart';\n");
    out.push_str("import 'package:url_launcher/url_launcher.dart';\n\n");

    for component in aux {
        out.push_str(&component.code);
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "class {class} extends StatefulWidget {{\n  const {class}({{super.key}});\n\n  @override\n  State<{class}> createState() => _{class}State();\n}}\n\n"
    ));

    out.push_str(&format!("class _{class}State extends State<{class}> {{\n"));
    let mut has_fields = false;
    if let Some(visible) = sidebar_visible {
        out.push_str(&format!("  bool _sidebarVisible = {visible};\n"));
        has_fields = true;
    }
    if let Some(index) = nav_index {
        out.push_str(&format!("  int _navIndex = {index};\n"));
        has_fields = true;
    }
    if has_fields {
        out.push('\n');
    }

    out.push_str("  @override\n  Widget build(BuildContext context) {\n");
    out.push_str("    return Scaffold(\n");
    out.push_str("      backgroundColor: Colors.white,\n");
    out.push_str("      body: SafeArea(\n");
    out.push_str("        child: Center(\n");
    out.push_str("          child: AspectRatio(\n");
    out.push_str(&format!(
        "            aspectRatio: {} / {},\n",
        dart::double(canvas_w),
        dart::double(canvas_h)
    ));
    out.push_str("            child: LayoutBuilder(\n");
    out.push_str(&format!(
        "              builder: (context, {}) => Stack(\n",
        dart::CONSTRAINTS
    ));
    out.push_str("                clipBehavior: Clip.hardEdge,\n");
    out.push_str("                children: [\n");
    for child in children {
        out.push_str(&dart::indent(&child.code, 18));
        out.push_str(",\n");
    }
    out.push_str("                ],\n");
    out.push_str("              ),\n");
    out.push_str("            ),\n");
    out.push_str("          ),\n");
    out.push_str("        ),\n");
    out.push_str("      ),\n");
    out.push_str("    );\n");
    out.push_str("  }\n");
    out.push_str("}\n");
    out
}

/// Fuzz-only entrypoint for Dart string escaping.
///
/// Asserts that no quote, interpolation or line break survives unescaped.
#[cfg(feature = "fuzzing")]
pub fn fuzz_string_literal(input: &str) {
    let literal = dart::string_literal(input);
    let inner = &literal[1..literal.len() - 1];
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        assert!(
            !matches!(c, '\'' | '$' | '\n' | '\r'),
            "unescaped {c:?} in {literal}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{
        ButtonProps, CheckboxProps, LabelProps, NavItem, Rect, ShapeProps, SidebarProps, Widget,
    };

    fn home_project() -> Project {
        let mut project = Project::new(DeviceProfile::Mobile);
        project.screens.push(
            Screen::new("s1", "Home")
                .with_element(Element::new(
                    "label-1",
                    Rect::from_xywh(0.1, 0.1, 0.8, 0.1),
                    Widget::Label(LabelProps {
                        text: "Hello".into(),
                        ..Default::default()
                    }),
                ))
                .with_element(Element::new(
                    "button-1",
                    Rect::from_xywh(0.1, 0.3, 0.8, 0.1),
                    Widget::Button(ButtonProps {
                        text: "Go".into(),
                        ..Default::default()
                    }),
                )),
        );
        project
    }

    #[test]
    fn home_screen_with_label_and_button() {
        let tree = generate_project(&home_project()).unwrap();

        assert_eq!(tree.units.len(), 1);
        let unit = &tree.units[0];
        assert_eq!(unit.children.len(), 2);
        assert!(unit.aux.is_empty());
        assert_eq!(tree.routes.len(), 1);
        assert_eq!(tree.routes.home().unwrap().names.route_id, "home");

        assert_eq!(unit.file.path, "lib/screens/home_screen.dart");
        assert!(unit.file.contents.contains("class HomeScreen extends StatefulWidget"));
        assert!(unit.file.contents.contains("'Hello'"));
        assert!(unit.file.contents.contains("'Go'"));
        assert!(unit.file.contents.contains("aspectRatio: 390.0 / 844.0"));
    }

    #[test]
    fn no_screens_is_fatal() {
        let err = generate_project(&Project::new(DeviceProfile::Mobile)).unwrap_err();
        assert!(matches!(err, SketchportError::NoScreens));
    }

    #[test]
    fn route_collision_is_fatal() {
        let mut project = home_project();
        project.screens.push(Screen::new("s2", "home"));
        let err = generate_project(&project).unwrap_err();
        match err {
            SketchportError::ValidationFailed { report, .. } => {
                assert!(report.has(IssueCode::RouteCollision))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn spacing_variants_get_distinct_classes() {
        let mut project = home_project();
        project.screens.push(Screen::new("s2", "Home Page"));
        project.screens.push(Screen::new("s3", "HomePage"));

        let tree = generate_project(&project).unwrap();
        let classes: std::collections::HashSet<&str> = tree
            .units
            .iter()
            .map(|u| u.names.class_name.as_str())
            .collect();
        assert_eq!(classes.len(), 3);
        assert!(tree.entry.contents.contains("'/home_page': (context) => const HomePageScreen()"));
        assert!(tree.entry.contents.contains("'/homepage': (context) => const HomepageScreen()"));
    }

    #[test]
    fn class_collision_is_fatal() {
        let mut project = home_project();
        project.screens.push(Screen::new("s2", "Step 2b"));
        project.screens.push(Screen::new("s3", "Step2b"));

        match generate_project(&project).unwrap_err() {
            SketchportError::ValidationFailed { report, .. } => {
                assert!(report.has(IssueCode::RouteCollision))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn element_errors_do_not_block_generation() {
        let mut project = home_project();
        project.screens[0].elements[0].rect = Rect::from_xywh(0.5, 0.5, 0.9, 0.9);
        let tree = generate_project(&project).unwrap();
        assert!(tree.units[0].file.contents.contains("width: constraints.maxWidth * 0.9000"));
    }

    #[test]
    fn checkboxes_share_one_helper() {
        let mut project = home_project();
        for i in 0..2 {
            project.screens[0].elements.push(Element::new(
                format!("checkbox-{i}"),
                Rect::from_xywh(0.1, 0.5 + 0.1 * i as f64, 0.5, 0.05),
                Widget::Checkbox(CheckboxProps::default()),
            ));
        }

        let tree = generate_project(&project).unwrap();
        let unit = &tree.units[0];
        assert_eq!(unit.aux.len(), 1);
        assert_eq!(unit.aux[0].signature, AuxSignature::Checkbox);
        assert_eq!(
            unit.file.contents.matches("class _CheckboxField extends").count(),
            1
        );
        let calls = unit
            .children
            .iter()
            .filter(|c| c.code.contains("_CheckboxField("))
            .count();
        assert_eq!(calls, 2);
    }

    #[test]
    fn unknown_kind_renders_placeholder() {
        let mut project = home_project();
        project.screens[0].elements.push(Element::new(
            "mystery",
            Rect::from_xywh(0.0, 0.8, 0.5, 0.1),
            Widget::Unknown {
                kind: "Carousel".into(),
                props: serde_json::Value::Null,
            },
        ));

        let tree = generate_project(&project).unwrap();
        let unit = &tree.units[0];
        assert_eq!(unit.children.len(), 3);
        assert!(unit.children[2].code.contains("IgnorePointer"));
        assert!(unit.children[2].code.contains("'Carousel'"));
    }

    #[test]
    fn generation_is_idempotent() {
        let project = home_project();
        assert_eq!(
            generate_project(&project).unwrap(),
            generate_project(&project).unwrap()
        );
    }

    #[test]
    fn overlays_paint_last_and_backgrounds_first() {
        let mut screen = Screen::new("s1", "Home")
            .with_element(
                Element::new(
                    "sidebar",
                    Rect::from_xywh(0.0, 0.0, 0.3, 1.0),
                    Widget::Sidebar(SidebarProps::default()),
                )
                .with_z_index(0),
            )
            .with_element(Element::new(
                "label",
                Rect::from_xywh(0.4, 0.1, 0.5, 0.1),
                Widget::Label(LabelProps::default()),
            ))
            .with_element(
                Element::new(
                    "background",
                    Rect::from_xywh(0.0, 0.0, 1.0, 1.0),
                    Widget::Rectangle(ShapeProps::default()),
                )
                .with_z_index(-1),
            );
        screen.elements.push(Element::new(
            "label-2",
            Rect::from_xywh(0.4, 0.3, 0.5, 0.1),
            Widget::Label(LabelProps::default()),
        ));

        let routes = RouteTable::default();
        let unit = generate_screen(&screen, DeviceProfile::Mobile, &routes);
        let order: Vec<&str> = unit.children.iter().map(|c| c.element_id.as_str()).collect();
        assert_eq!(order, vec!["background", "label", "label-2", "sidebar"]);
    }

    #[test]
    fn sidebar_navigation_resolves_routes() {
        let mut project = home_project();
        project.screens.push(Screen::new("s2", "Settings"));
        project.screens[0].elements.push(
            Element::new(
                "sidebar",
                Rect::from_xywh(0.0, 0.0, 0.3, 1.0),
                Widget::Sidebar(SidebarProps {
                    items: vec![
                        NavItem::new("Settings", "settings"),
                        NavItem::new("Profile", "Profile"),
                    ],
                    ..Default::default()
                }),
            )
            .with_z_index(100),
        );

        let tree = generate_project(&project).unwrap();
        let contents = &tree.units[0].file.contents;
        assert!(contents.contains("bool _sidebarVisible = true;"));
        assert!(contents.contains("Navigator.pushReplacementNamed(context, '/settings')"));
        assert!(contents.contains("onTap: null"));
        assert!(tree.entry.contents.contains("'/settings': (context) => const SettingsScreen()"));
    }
}
