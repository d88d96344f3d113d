//! Import extraction properties
//!
//! - Superset: extra dynamic/late/conditional forms never shrink the result
//! - Idempotence: two scans of an unchanged tree agree
//! - Constant folding of `__import__` / `importlib.import_module`
//! - Stdlib and local-module filtering

mod common;

use common::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use reqscan_core::features::import_extraction::{
    extract_imports, extract_imports_from_sources, ImportKind,
};
use reqscan_core::features::parsing::SourceModule;
use reqscan_core::features::stdlib_filter::{filter_stdlib, StdlibTable};
use reqscan_core::shared::models::DiagnosticKind;

fn names_of(source: &str) -> Vec<String> {
    extract_imports_from_sources(&[SourceModule::new("mod.py", source)]).module_names()
}

fn module_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}".prop_map(|s| format!("pkg_{s}"))
}

proptest! {
    #[test]
    fn adding_import_forms_never_shrinks_result(
        base in prop::collection::vec(module_name(), 0..6),
        late in prop::collection::vec(module_name(), 0..4),
        guarded in prop::collection::vec(module_name(), 0..4),
        dynamic in prop::collection::vec(module_name(), 0..4),
    ) {
        let static_only = fixture_static_imports(&base);
        let enriched = format!(
            "{}{}",
            static_only,
            fixture_dynamic_imports(&late, &guarded, &dynamic)
        );

        let before = names_of(&static_only);
        let after = names_of(&enriched);
        for name in &before {
            prop_assert!(after.contains(name), "{} lost", name);
        }
        for name in late.iter().chain(&guarded).chain(&dynamic) {
            prop_assert!(after.contains(name), "{} not found", name);
        }
    }
}

#[test]
fn test_web_service_tree() {
    let project = fixture_web_service();
    let scan = extract_imports(project.path(), &[]).unwrap();

    assert_eq!(
        scan.module_names(),
        vec![
            "os", "json", "flask", "service", "sqlalchemy", "ujson", "re", "importlib", "yaml",
            "redis",
        ]
    );
    assert_eq!(scan.files_scanned, 4);
    assert!(scan.local_modules.contains(&"service".to_string()));

    let kinds: Vec<(&str, ImportKind)> = scan
        .records
        .iter()
        .filter(|r| r.kind != ImportKind::Static)
        .map(|r| (r.module_root_name.as_str(), r.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("ujson", ImportKind::Conditional),
            ("yaml", ImportKind::Late),
            ("redis", ImportKind::DynamicLiteral),
        ]
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let project = fixture_web_service();
    let first = extract_imports(project.path(), &[]).unwrap();
    let second = extract_imports(project.path(), &[]).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.local_modules, second.local_modules);
}

#[test]
fn test_dunder_import_is_folded() {
    let names = names_of("mod = __import__(\"matplotlib\" + \".pyplot\", fromlist=[''])\n");
    assert_eq!(names, vec!["matplotlib"]);
}

#[test]
fn test_non_literal_name_is_never_guessed() {
    let scan = extract_imports_from_sources(&[SourceModule::new(
        "plugins.py",
        "import importlib\nfor p in PLUGINS:\n    importlib.import_module(p)\n",
    )]);

    assert_eq!(scan.module_names(), vec!["importlib"]);
    assert_diagnostic_count(&scan.diagnostics, DiagnosticKind::UnresolvableDynamicImport, 1);
}

#[test]
fn test_stdlib_filter() {
    let table = StdlibTable::from_names(["os", "sys"]);
    let names = names_of("import os, sys, requests\n");
    assert_eq!(filter_stdlib(&names, &table, &[]), vec!["requests"]);
}

#[test]
fn test_exclusions_and_local_modules_filtered() {
    let project = fixture_web_service();
    let scan = extract_imports(project.path(), &[]).unwrap();
    let table = StdlibTable::default();

    let mut exclusions = scan.local_modules.clone();
    exclusions.push("ujson".to_string());
    assert_eq!(
        filter_stdlib(&scan.module_names(), &table, &exclusions),
        vec!["flask", "sqlalchemy", "yaml", "redis"]
    );
}

#[test]
fn test_excluded_directory_is_not_scanned() {
    let project = fixture_web_service().file("legacy/old.py", "import cgi_tools\n");

    let all = extract_imports(project.path(), &[]).unwrap();
    assert!(all.module_names().contains(&"cgi_tools".to_string()));

    let pruned = extract_imports(project.path(), &["legacy".to_string()]).unwrap();
    assert!(!pruned.module_names().contains(&"cgi_tools".to_string()));
    assert!(!pruned.module_names().contains(&"should_not_be_seen".to_string()));
}
