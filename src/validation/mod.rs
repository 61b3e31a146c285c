//! Project validation for sketchport.
//!
//! This module checks a project before generation:
//! - Structural integrity (at least one screen, unique IDs and names)
//! - Naming (screen names must derive distinct route identifiers)
//! - Geometry (rects are finite fractions of the canvas)
//! - References (navigation targets name existing screens)

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::{HashMap, HashSet};

use crate::codegen::naming::{route_id, ScreenNames};
use crate::ir::{ElementId, ElementKind, NavItem, Project, Screen, ScreenId, Widget};

/// Float slack allowed when checking that rects stay on the canvas.
pub const RECT_TOLERANCE: f64 = 1e-6;

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Validates a project and returns a report of all issues found.
///
/// Only problems that make generation meaningless are errors. Anything the
/// generator can render around (an unknown kind, a dangling navigation
/// target) is a warning, unless `opts.strict` promotes it.
pub fn validate_project(project: &Project, opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    if project.screens.is_empty() {
        report.add(ValidationIssue::error(
            IssueCode::NoScreens,
            "Project has no screens",
            IssueContext::Project,
        ));
    } else {
        validate_screen_names(project, &mut report);

        let screen_routes: HashSet<String> =
            project.screens.iter().map(|s| route_id(&s.name)).collect();
        for screen in &project.screens {
            validate_elements(screen, &screen_routes, &mut report);
        }
    }

    if opts.strict {
        report.promote_warnings();
    }
    report
}

/// Validates screen ids, names and the route and class identifiers derived
/// from names.
fn validate_screen_names(project: &Project, report: &mut ValidationReport) {
    let mut seen_ids: HashMap<&ScreenId, usize> = HashMap::new();
    let mut seen_names: HashMap<&str, usize> = HashMap::new();
    let mut seen_routes: HashMap<String, &str> = HashMap::new();
    let mut seen_classes: HashMap<String, &str> = HashMap::new();

    for (idx, screen) in project.screens.iter().enumerate() {
        let context = || IssueContext::Screen {
            name: screen.name.clone(),
        };

        if let Some(first_idx) = seen_ids.get(&screen.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateScreenId,
                format!(
                    "Duplicate screen ID {} (first seen at index {})",
                    screen.id, first_idx
                ),
                context(),
            ));
        } else {
            seen_ids.insert(&screen.id, idx);
        }

        if screen.name.trim().is_empty() {
            report.add(ValidationIssue::error(
                IssueCode::EmptyScreenName,
                format!("Screen at index {} has an empty name", idx),
                context(),
            ));
            continue;
        }

        if let Some(first_idx) = seen_names.get(screen.name.as_str()) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateScreenName,
                format!(
                    "Duplicate screen name '{}' (first seen at index {})",
                    screen.name, first_idx
                ),
                context(),
            ));
            continue;
        }
        seen_names.insert(&screen.name, idx);

        let names = ScreenNames::from_name(&screen.name);
        if let Some(other) = seen_routes.get(&names.route_id) {
            report.add(ValidationIssue::error(
                IssueCode::RouteCollision,
                format!(
                    "Screen names '{}' and '{}' both map to route '{}'",
                    other, screen.name, names.route_id
                ),
                context(),
            ));
            continue;
        }
        seen_routes.insert(names.route_id, &screen.name);

        if let Some(other) = seen_classes.get(&names.class_name) {
            report.add(ValidationIssue::error(
                IssueCode::RouteCollision,
                format!(
                    "Screen names '{}' and '{}' both map to class '{}'",
                    other, screen.name, names.class_name
                ),
                context(),
            ));
        } else {
            seen_classes.insert(names.class_name, &screen.name);
        }
    }
}

/// Validates the elements of one screen.
///
/// Navigation targets are matched by derived route id, the same way the
/// generator resolves them.
fn validate_elements(
    screen: &Screen,
    screen_routes: &HashSet<String>,
    report: &mut ValidationReport,
) {
    let mut seen_ids: HashMap<&ElementId, usize> = HashMap::new();
    let mut overlay_counts: HashMap<ElementKind, usize> = HashMap::new();

    for (idx, element) in screen.elements.iter().enumerate() {
        let context = || IssueContext::Element {
            screen: screen.name.clone(),
            id: element.id.to_string(),
        };

        if let Some(first_idx) = seen_ids.get(&element.id) {
            report.add(ValidationIssue::error(
                IssueCode::DuplicateElementId,
                format!(
                    "Duplicate element ID {} (first seen at index {})",
                    element.id, first_idx
                ),
                context(),
            ));
        } else {
            seen_ids.insert(&element.id, idx);
        }

        let rect = &element.rect;
        if !rect.is_finite() {
            report.add(ValidationIssue::error(
                IssueCode::RectNotFinite,
                format!(
                    "Non-finite rect ({}, {}, {}, {})",
                    rect.x, rect.y, rect.w, rect.h
                ),
                context(),
            ));
        } else if !rect.is_on_canvas(RECT_TOLERANCE) {
            report.add(ValidationIssue::error(
                IssueCode::RectOutOfBounds,
                format!(
                    "Rect ({:.4}, {:.4}, {:.4}, {:.4}) leaves the unit canvas",
                    rect.x, rect.y, rect.w, rect.h
                ),
                context(),
            ));
        } else if rect.area() <= 0.0 {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyRect,
                "Zero-area rect will not be visible",
                context(),
            ));
        }

        let nav_items: &[NavItem] = match &element.widget {
            Widget::Sidebar(props) => &props.items,
            Widget::BottomNav(props) => &props.items,
            Widget::Unknown { kind, .. } => {
                report.add(ValidationIssue::warning(
                    IssueCode::UnknownElementKind,
                    format!("Unknown element kind '{}' will render as a placeholder", kind),
                    context(),
                ));
                &[]
            }
            _ => &[],
        };

        if let Some(kind) = element.kind().filter(ElementKind::is_overlay) {
            *overlay_counts.entry(kind).or_default() += 1;
        }

        for item in nav_items {
            if !screen_routes.contains(&route_id(&item.target_screen)) {
                report.add(ValidationIssue::warning(
                    IssueCode::UnknownTargetScreen,
                    format!(
                        "Item '{}' targets unknown screen '{}'",
                        item.text, item.target_screen
                    ),
                    context(),
                ));
            }
        }
    }

    let mut overlays: Vec<_> = overlay_counts.into_iter().filter(|(_, n)| *n > 1).collect();
    overlays.sort();
    for (kind, count) in overlays {
        report.add(ValidationIssue::warning(
            IssueCode::MultipleOverlays,
            format!("{} {} elements; only one per screen is supported", count, kind),
            IssueContext::Screen {
                name: screen.name.clone(),
            },
        ));
    }
}
