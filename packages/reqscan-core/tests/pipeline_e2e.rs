//! End-to-end scans through ScanPipeline

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::fs;

use reqscan_core::config::{LibraryRequest, ReqscanConfig, ResolutionMode};
use reqscan_core::features::registry::InMemoryRegistry;
use reqscan_core::pipeline::{render_requirements, write_output, PinStyle, ScanPipeline};
use reqscan_core::shared::models::{DiagnosticKind, ErrorKind, PackageOrigin};

fn registry() -> InMemoryRegistry {
    InMemoryRegistry::new()
        .with_project("Flask", "3.0.0", &["Werkzeug>=3.0.0", "click>=8.1.3", "asgiref>=3.2; extra == \"async\""])
        .with_project("werkzeug", "3.0.1", &["MarkupSafe>=2.1.1"])
        .with_project("click", "8.1.7", &[])
        .with_project("markupsafe", "2.1.3", &[])
        .with_project("redis", "5.0.1", &[])
        .with_project("ujson", "5.9.0", &[])
        .with_project("gunicorn", "21.2.0", &["packaging"])
        .with_project("packaging", "23.2", &[])
}

fn inventory() -> Box<dyn reqscan_core::PackageInventory> {
    InventoryBuilder::new()
        .installed("SQLAlchemy", "2.0.23", &["sqlalchemy"])
        .installed("PyYAML", "6.0.1", &["yaml", "_yaml"])
        .boxed()
}

#[test]
fn test_full_scan() {
    let project = fixture_web_service();
    let pipeline = ScanPipeline::new(ReqscanConfig::default(), inventory())
        .unwrap()
        .with_registry(Box::new(registry()));

    let report = pipeline.run(project.path(), true).unwrap();

    assert_eq!(
        pinned(&report.packages),
        vec![
            "Flask==3.0.0",
            "SQLAlchemy==2.0.23",
            "ujson==5.9.0",
            "PyYAML==6.0.1",
            "redis==5.0.1",
        ]
    );
    assert_eq!(report.packages[0].origin, PackageOrigin::Remote);
    assert_eq!(report.packages[1].origin, PackageOrigin::Override);
    assert_eq!(report.packages[3].origin, PackageOrigin::Override);
    assert!(report.unknown.is_empty());
    assert_eq!(report.files_scanned, 4);
    assert_eq!(report.env_vars.len(), 3);
    assert_no_duplicate_packages(&report.packages);
}

#[test]
fn test_transitive_with_libraries() {
    let project = fixture_web_service();
    let config = ReqscanConfig::default()
        .max_depth(3)
        .libraries(vec![LibraryRequest::parse("gunicorn").unwrap()]);
    let pipeline = ScanPipeline::new(config, inventory())
        .unwrap()
        .with_registry(Box::new(registry()));

    let report = pipeline.run(project.path(), false).unwrap();
    let names: Vec<&str> = report
        .packages
        .iter()
        .map(|p| p.distribution_name.as_str())
        .collect();

    assert_eq!(
        names,
        vec![
            "Flask",
            "SQLAlchemy",
            "ujson",
            "PyYAML",
            "redis",
            "gunicorn",
            "werkzeug",
            "click",
            "packaging",
            "markupsafe",
        ]
    );
    assert!(report.package("asgiref").is_none());
    assert_no_duplicate_packages(&report.packages);
}

#[test]
fn test_offline_compat_scan_reports_unknowns() {
    let project = fixture_web_service();
    let config = ReqscanConfig::default()
        .mode(ResolutionMode::Compat)
        .offline()
        .build()
        .unwrap();
    let pipeline = ScanPipeline::new(config, inventory()).unwrap();

    let report = pipeline.run(project.path(), false).unwrap();
    assert_eq!(pinned(&report.packages), vec!["SQLAlchemy==2.0.23", "PyYAML==6.0.1"]);
    assert_eq!(report.unknown, vec!["flask", "ujson", "redis"]);
    assert_diagnostic_count(&report.diagnostics, DiagnosticKind::UnknownPackage, 3);
}

#[test]
fn test_render_and_write() {
    let project = fixture_web_service();
    let pipeline = ScanPipeline::new(ReqscanConfig::default(), inventory())
        .unwrap()
        .with_registry(Box::new(registry()));
    let report = pipeline.run(project.path(), false).unwrap();

    let text = render_requirements(&report.packages, PinStyle::Compat);
    assert!(text.starts_with("Flask~=3.0.0\nSQLAlchemy~=2.0.23\n"));

    let out = project.join("requirements.txt");
    write_output(&out, &text, false).unwrap();
    assert_eq!(fs::read_to_string(&out).unwrap(), text);

    let err = write_output(&out, "", false).unwrap_err();
    assert_eq!(err.kind, ErrorKind::IO);
}

#[test]
fn test_unreadable_files_do_not_abort() {
    let project = ProjectFixture::new()
        .file("ok.py", "import requests\n")
        .file("broken.py", "def f(:\n    pass\n");
    fs::write(project.join("latin1.py"), b"# caf\xe9\nimport chardet\n").unwrap();

    let pipeline = ScanPipeline::new(
        ReqscanConfig::default().offline(),
        InventoryBuilder::new()
            .installed("requests", "2.31.0", &["requests"])
            .boxed(),
    )
    .unwrap();
    let report = pipeline.run(project.path(), true).unwrap();

    assert_eq!(pinned(&report.packages), vec!["requests==2.31.0"]);
    assert_diagnostic_count(&report.diagnostics, DiagnosticKind::UnparsableSource, 1);
    assert_diagnostic_count(&report.diagnostics, DiagnosticKind::UnreadableSource, 1);
}

#[test]
fn test_empty_tree_is_fatal() {
    let project = ProjectFixture::new().file("README.md", "# nothing here\n");
    let pipeline = ScanPipeline::new(ReqscanConfig::default(), inventory()).unwrap();

    let err = pipeline.run(project.path(), false).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoSourceFiles);
}
