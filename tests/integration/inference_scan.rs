//! Structure inference over files on disk

use super::{fresh_root, schema};
use datasystems::{DataSystem, DataSystemError, DataSystemsConfig, Schema, SchemaError};
use serde_json::json;
use std::fs;
use std::path::Path;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "x").unwrap();
}

fn file_name_schema(path: &Path) -> Result<Schema, SchemaError> {
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    Ok(schema(json!({ "source": name })))
}

#[test]
fn test_skip_and_continue() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project", "dataset"]).unwrap();
    touch(&root, "acme/widgets/sales/2024.csv");
    touch(&root, "acme/loose.csv");

    let report = system.infer_structure("*.csv", file_name_schema, 0).unwrap();

    assert_eq!(report.matched, 2);
    assert_eq!(report.added, vec![root.join("acme/widgets/sales")]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, root.join("acme/loose.csv"));
    assert_eq!(report.skipped[0].index, 1);

    let entries: Vec<_> = system.iter_entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "acme/widgets/sales");
    assert_eq!(entries[0].schema.get("source"), Some(&json!("2024.csv")));
}

#[test]
fn test_exact_depth_keeps_file_name_coordinate() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    touch(&root, "acme/Widgets.CSV");

    let report = system
        .infer_structure("*.CSV", |_: &Path| Ok::<_, SchemaError>(Schema::new()), 0)
        .unwrap();
    assert_eq!(report.added, vec![root.join("acme/widgetscsv")]);
}

#[test]
fn test_cut_levels_walks_up_from_fitting_paths() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project", "dataset"]).unwrap();
    touch(&root, "acme/widgets/sales/a.csv");
    touch(&root, "acme/widgets/sales/b.csv");
    touch(&root, "acme/readme.csv");

    let report = system.infer_structure("*.csv", file_name_schema, 1).unwrap();

    // a file name is never promoted into a missing coordinate
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, root.join("acme/readme.csv"));
    assert_eq!(
        report.added,
        vec![root.join("acme/widgets"), root.join("acme/widgets")]
    );
    let paths: Vec<_> = system.iter_entries().map(|e| e.path.clone()).collect();
    assert_eq!(paths, vec!["acme/widgets"]);
    let entry = system.iter_entries().next().unwrap();
    assert_eq!(entry.schema.get("source"), Some(&json!("b.csv")));
}

#[test]
fn test_cut_levels_bounded_by_hierarchy() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    touch(&root, "acme/a.csv");

    let result = system.infer_structure("*.csv", file_name_schema, 2);
    assert!(matches!(result, Err(DataSystemError::Argument(_))));
    assert_eq!(system.iter_entries().count(), 0);
}

#[test]
fn test_empty_filler_rejected() {
    let (_temp_dir, root) = fresh_root();
    let mut config = DataSystemsConfig::default();
    config.inference.filler = "__".to_string();
    let mut system =
        DataSystem::create_with_config(&root, ["domain", "project", "dataset"], config).unwrap();
    touch(&root, "acme/widgets/sales/a.csv");

    let result = system.infer_structure("*.csv", file_name_schema, 1);
    assert!(matches!(result, Err(DataSystemError::Argument(_))));
    assert_eq!(system.iter_entries().count(), 0);
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_name_is_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    fs::create_dir_all(root.join("acme/widgets")).unwrap();
    let bad = root
        .join("acme/widgets")
        .join(OsStr::from_bytes(b"bad\xff.csv"));
    fs::write(&bad, "x").unwrap();
    touch(&root, "zeta/gadgets/good.csv");

    let report = system.infer_structure("*.csv", file_name_schema, 0).unwrap();

    assert_eq!(report.matched, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, bad);
    assert_eq!(report.added, vec![root.join("zeta/gadgets")]);
    assert_eq!(system.iter_entries().count(), 1);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_does_not_abort_scan() {
    let (_temp_dir, root) = fresh_root();
    let mut config = DataSystemsConfig::default();
    config.inference.follow_links = true;
    let mut system =
        DataSystem::create_with_config(&root, ["domain", "project"], config).unwrap();
    touch(&root, "acme/widgets/good.csv");
    std::os::unix::fs::symlink("/nonexistent/datasystems-target", root.join("acme/dangling"))
        .unwrap();

    let report = system.infer_structure("*.csv", file_name_schema, 0).unwrap();

    assert_eq!(report.matched, 1);
    assert_eq!(report.added, vec![root.join("acme/widgets")]);
    assert_eq!(system.iter_entries().count(), 1);
}

#[test]
fn test_unreadable_root_fails_scan() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain"]).unwrap();
    fs::remove_dir_all(&root).unwrap();

    let result = system.infer_structure("*.csv", file_name_schema, 0);
    assert!(matches!(result, Err(DataSystemError::Walk(_))));
}

#[test]
fn test_provider_error_aborts_scan() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    touch(&root, "acme/a.csv");
    touch(&root, "globex/b.csv");

    let mut calls = 0;
    let result = system.infer_structure(
        "*.csv",
        |path: &Path| -> Result<Schema, SchemaError> {
            calls += 1;
            if path.ends_with("globex/b.csv") {
                return Err("unreadable".into());
            }
            Ok(Schema::new())
        },
        0,
    );

    match result {
        Err(DataSystemError::SchemaComputation { path, .. }) => {
            assert_eq!(path, root.join("globex/b.csv"))
        }
        other => panic!("expected schema failure, got {:?}", other),
    }
    assert_eq!(calls, 2);
    // entries added before the failure are kept
    assert_eq!(system.iter_entries().count(), 1);
}

#[test]
fn test_index_document_never_indexed() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain"]).unwrap();
    touch(&root, "data.json");

    let report = system
        .infer_structure("*.json", |_: &Path| Ok::<_, SchemaError>(Schema::new()), 0)
        .unwrap();
    assert_eq!(report.matched, 1);
    assert_eq!(report.added, vec![root.join("datajson")]);
}

#[test]
fn test_infer_keys() {
    let (_temp_dir, root) = fresh_root();
    let system = DataSystem::create(&root, ["domain"]).unwrap();
    assert_eq!(
        system.infer_keys(root.join("acme/widgets/x.csv")).unwrap(),
        vec!["acme", "widgets", "x.csv"]
    );
}
