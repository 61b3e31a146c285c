use std::collections::HashSet;

use proptest::prelude::*;
use sketchport::codegen::generate_project;
use sketchport::ir::io_json::{from_json_str, to_json_string};

mod proptest_helpers;

fn files(project: &sketchport::ir::Project) -> Vec<sketchport::codegen::SourceFile> {
    generate_project(project)
        .expect("valid project generates")
        .files()
        .cloned()
        .collect()
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn generation_is_idempotent(project in proptest_helpers::arb_project(4, 12)) {
        prop_assert_eq!(files(&project), files(&project));
    }

    #[test]
    fn one_file_per_screen_plus_entry(project in proptest_helpers::arb_project(6, 6)) {
        let files = files(&project);
        prop_assert_eq!(files.len(), project.screens.len() + 1);

        let paths: HashSet<_> = files.iter().map(|f| f.path.as_str()).collect();
        prop_assert_eq!(paths.len(), files.len());
        prop_assert!(paths.contains("lib/main.dart"));
    }

    #[test]
    fn stored_document_generates_the_same_sources(project in proptest_helpers::arb_project(4, 8)) {
        let json = to_json_string(&project).expect("serialize project");
        let restored = from_json_str(&json).expect("parse project");

        prop_assert_eq!(files(&restored), files(&project));
    }

    #[test]
    fn every_element_is_rendered(project in proptest_helpers::arb_project(3, 10)) {
        let tree = generate_project(&project).expect("valid project generates");

        for (screen, unit) in project.screens.iter().zip(&tree.units) {
            prop_assert_eq!(unit.children.len(), screen.elements.len());
        }
    }
}
