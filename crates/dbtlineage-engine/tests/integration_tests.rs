//! Integration tests for lineage requests against on-disk projects

use dbtlineage_core::{Config, LineageEntry};
use dbtlineage_dbt::ManifestError;
use dbtlineage_engine::{
    lineage_for_file, resolve_lineage, LineageError, LineageSession, UpdateOutcome,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
    "metadata": {
        "dbt_schema_version": "https://schemas.getdbt.com/dbt/manifest/v11.json",
        "dbt_version": "1.7.0",
        "generated_at": "2024-01-01T00:00:00Z"
    },
    "nodes": {
        "model.proj.stg_orders": {
            "unique_id": "model.proj.stg_orders",
            "resource_type": "model",
            "name": "stg_orders",
            "package_name": "proj",
            "original_file_path": "models/staging/stg_orders.sql",
            "depends_on": {"macros": [], "nodes": ["source.proj.raw.orders_src"]}
        },
        "model.proj.orders": {
            "unique_id": "model.proj.orders",
            "resource_type": "model",
            "name": "orders",
            "package_name": "proj",
            "original_file_path": "models/orders.sql",
            "depends_on": {"macros": [], "nodes": ["model.proj.stg_orders", "source.proj.raw.orders_src"]}
        },
        "model.proj.reporting": {
            "unique_id": "model.proj.reporting",
            "resource_type": "model",
            "name": "reporting",
            "package_name": "proj",
            "original_file_path": "models/marts/reporting.sql",
            "depends_on": {"macros": [], "nodes": ["model.proj.orders"]}
        }
    },
    "sources": {
        "source.proj.raw.orders_src": {
            "unique_id": "source.proj.raw.orders_src",
            "source_name": "raw",
            "name": "orders_src",
            "schema": "raw",
            "original_file_path": "models/staging/sources.yml"
        }
    }
}"#;

fn project_with_manifest(manifest: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dbt_project.yml"), "name: proj\n").unwrap();
    std::fs::create_dir_all(dir.path().join("target")).unwrap();
    std::fs::write(dir.path().join("target/manifest.json"), manifest).unwrap();
    dir
}

#[test]
fn resolves_orders_from_disk() {
    let project = project_with_manifest(MANIFEST);
    let config = Config::discover(project.path()).unwrap();

    let result = resolve_lineage(project.path(), "orders", &config)
        .unwrap()
        .unwrap();

    assert_eq!(result.current, LineageEntry::new("orders", "models/orders.sql"));
    assert_eq!(
        result.upstream,
        vec![
            LineageEntry::new("stg_orders", "models/staging/stg_orders.sql"),
            LineageEntry::new("raw.orders_src", "models/staging/sources.yml"),
        ]
    );
    assert_eq!(
        result.downstream,
        vec![LineageEntry::new("reporting", "models/marts/reporting.sql")]
    );
}

#[test]
fn source_name_is_silent_miss() {
    let project = project_with_manifest(MANIFEST);
    let config = Config::discover(project.path()).unwrap();

    let result = resolve_lineage(project.path(), "orders_src", &config).unwrap();
    assert_eq!(result, None);
}

#[test]
fn missing_manifest_is_artifact_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::discover(dir.path()).unwrap();

    let err = resolve_lineage(dir.path(), "orders", &config).unwrap_err();
    assert!(err.is_artifact_missing());
    assert!(err.to_string().contains("manifest.json"));
}

#[test]
fn corrupt_manifest_is_artifact_corrupt() {
    let project = project_with_manifest("{ this is not json");
    let config = Config::discover(project.path()).unwrap();

    let err = resolve_lineage(project.path(), "orders", &config).unwrap_err();
    assert!(matches!(
        err,
        LineageError::Manifest(ManifestError::ArtifactCorrupt(_))
    ));
}

#[test]
fn manifest_is_reread_per_request() {
    let project = project_with_manifest(MANIFEST);
    let config = Config::discover(project.path()).unwrap();

    let before = resolve_lineage(project.path(), "reporting", &config).unwrap().unwrap();
    assert!(before.downstream.is_empty());

    let rebuilt = MANIFEST.replace(
        r#""sources": {"#,
        r#""sources": {}, "unused": {"#,
    );
    let rebuilt = rebuilt.replace(
        r#""model.proj.reporting": {"#,
        r#""model.proj.dashboard": {
            "resource_type": "model",
            "name": "dashboard",
            "original_file_path": "models/marts/dashboard.sql",
            "depends_on": {"nodes": ["model.proj.reporting"]}
        },
        "model.proj.reporting": {"#,
    );
    std::fs::write(project.path().join("target/manifest.json"), rebuilt).unwrap();

    let after = resolve_lineage(project.path(), "reporting", &config).unwrap().unwrap();
    assert_eq!(
        after.downstream,
        vec![LineageEntry::new("dashboard", "models/marts/dashboard.sql")]
    );
    // Sources were dropped from the rebuilt manifest
    let orders = resolve_lineage(project.path(), "orders", &config).unwrap().unwrap();
    assert_eq!(orders.upstream.len(), 1);
}

#[test]
fn configured_manifest_location() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("build")).unwrap();
    std::fs::write(dir.path().join("build/manifest.json"), MANIFEST).unwrap();
    std::fs::write(
        dir.path().join("dbtlineage.toml"),
        r#"manifest_path = "build/manifest.json""#,
    )
    .unwrap();

    let config = Config::discover(dir.path()).unwrap();
    let result = resolve_lineage(dir.path(), "stg_orders", &config).unwrap();
    assert!(result.is_some());
}

#[test]
fn file_driven_session() {
    let project = project_with_manifest(MANIFEST);
    let config = Config::discover(project.path()).unwrap();
    let mut session = LineageSession::new();
    session.open();

    for file in ["models/orders.sql", "models/staging/sources.yml", "seeds/countries.csv"] {
        let ticket = session.begin_request().unwrap();
        let outcome = lineage_for_file(project.path(), Path::new(file), &config).unwrap();
        session.complete(ticket, outcome);
    }

    // sources.yml names no model and the csv is not a model file: orders stays up
    assert_eq!(session.title(), Some("Lineage: orders".to_string()));

    let ticket = session.begin_request().unwrap();
    let outcome = lineage_for_file(project.path(), Path::new("models/marts/reporting.sql"), &config)
        .unwrap();
    assert_eq!(session.complete(ticket, outcome), UpdateOutcome::Applied);
    assert_eq!(session.title(), Some("Lineage: reporting".to_string()));
}

#[test]
fn disk_load_keeps_manifest_order() {
    let project = project_with_manifest(
        r#"{
            "nodes": {
                "model.z.dup": {"resource_type": "model", "name": "dup", "original_file_path": "z/dup.sql"},
                "model.a.dup": {"resource_type": "model", "name": "dup", "original_file_path": "a/dup.sql"},
                "model.p.base": {"resource_type": "model", "name": "base", "original_file_path": "base.sql"},
                "model.p.zeta": {"resource_type": "model", "name": "zeta", "original_file_path": "zeta.sql",
                                 "depends_on": {"nodes": ["model.p.base"]}},
                "model.p.alpha": {"resource_type": "model", "name": "alpha", "original_file_path": "alpha.sql",
                                  "depends_on": {"nodes": ["model.p.base"]}}
            }
        }"#,
    );
    let config = Config::discover(project.path()).unwrap();

    let dup = resolve_lineage(project.path(), "dup", &config).unwrap().unwrap();
    assert_eq!(dup.current.path, "z/dup.sql");

    let base = resolve_lineage(project.path(), "base", &config).unwrap().unwrap();
    let names: Vec<_> = base.downstream.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
}
