#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use sketchport::interpret::DetectedBox;
use sketchport::ir::{
    DeviceProfile, Element, ElementKind, NavItem, Normalized, Pixel, Project, Rect, Screen, Widget,
};

pub const EPS_RECT: f64 = 1e-9;

/// Screen names with pairwise distinct route ids.
const SCREEN_NAMES: [&str; 6] = [
    "Home",
    "Profile",
    "Settings",
    "Cart",
    "Order History",
    "Ayuda",
];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_kind() -> BoxedStrategy<ElementKind> {
    proptest::sample::select(ElementKind::ALL.to_vec()).boxed()
}

/// Pixel boxes that may spill past the image edges, as detectors' boxes do.
pub fn arb_pixel_box(width: u32, height: u32) -> BoxedStrategy<Rect<Pixel>> {
    let (w, h) = (width as f64, height as f64);
    (0.0..=w * 1.2, 0.0..=h * 1.2, 0.0..=w * 1.5, 0.0..=h * 1.5)
        .prop_map(|(x, y, bw, bh)| Rect::from_xywh(x, y, bw, bh))
        .boxed()
}

pub fn arb_detected_box(width: u32, height: u32) -> BoxedStrategy<DetectedBox> {
    (
        arb_kind(),
        arb_pixel_box(width, height),
        proptest::option::of("[A-Za-z ]{0,16}"),
    )
        .prop_map(|(kind, bb, text)| {
            let mut detected = DetectedBox::new(kind, bb);
            detected.text = text;
            detected
        })
        .boxed()
}

/// Image dimensions plus a non-empty list of boxes for them.
pub fn arb_sketch(max_boxes: usize) -> BoxedStrategy<(u32, u32, Vec<DetectedBox>)> {
    assert!(max_boxes > 0, "max_boxes must be > 0");
    (1u32..=4096, 1u32..=4096)
        .prop_flat_map(move |(w, h)| {
            (
                Just(w),
                Just(h),
                proptest::collection::vec(arb_detected_box(w, h), 1..=max_boxes),
            )
        })
        .boxed()
}

/// On-canvas rects on a 1/1000 grid, so stored documents reload bit-exact.
fn arb_unit_rect() -> BoxedStrategy<Rect<Normalized>> {
    (0u32..1000, 0u32..1000)
        .prop_flat_map(|(x, y)| (Just(x), Just(y), 0..=1000 - x, 0..=1000 - y))
        .prop_map(|(x, y, w, h)| {
            let unit = |v: u32| v as f64 / 1000.0;
            Rect::from_xywh(unit(x), unit(y), unit(w), unit(h))
        })
        .boxed()
}

type ElementSeed = (ElementKind, Rect<Normalized>, Vec<String>);

fn arb_element(targets: Vec<String>) -> BoxedStrategy<ElementSeed> {
    (
        arb_kind(),
        arb_unit_rect(),
        proptest::collection::vec(proptest::sample::select(targets), 0..=3),
    )
        .boxed()
}

/// Valid projects: distinct screen names, on-canvas rects, mixed kinds and
/// navigation between the project's own screens.
pub fn arb_project(max_screens: usize, max_elements: usize) -> BoxedStrategy<Project> {
    assert!(max_screens > 0 && max_screens <= SCREEN_NAMES.len());

    proptest::sample::subsequence(SCREEN_NAMES.to_vec(), 1..=max_screens)
        .prop_flat_map(move |names| {
            let targets: Vec<String> = names.iter().map(|n| n.to_string()).collect();
            let screens = names
                .iter()
                .map(|_| proptest::collection::vec(arb_element(targets.clone()), 0..=max_elements))
                .collect::<Vec<_>>();
            (Just(names), screens)
        })
        .prop_map(|(names, screens)| {
            let mut project = Project::new(DeviceProfile::Mobile);
            project.name = Some("Generated".into());
            for (screen_idx, (name, elements)) in names.iter().zip(screens).enumerate() {
                let mut screen = Screen::new(format!("s{screen_idx}"), *name);
                for (idx, (kind, rect, targets)) in elements.into_iter().enumerate() {
                    let mut widget = Widget::default_for(kind);
                    let items = targets.iter().map(|t| NavItem::new(t.clone(), t.clone()));
                    match &mut widget {
                        Widget::Sidebar(props) => props.items = items.collect(),
                        Widget::BottomNav(props) => props.items = items.collect(),
                        _ => {}
                    }
                    let element = Element::new(format!("e{idx}"), rect, widget)
                        .with_z_index(idx as i32 % 3);
                    screen.elements.push(element);
                }
                project.screens.push(screen);
            }
            project
        })
        .boxed()
}
