//! Index document persistence across handles

use super::{fresh_root, schema};
use datasystems::{ConfigLoader, DataSystem, DataSystemError, Schema};
use serde_json::json;
use std::fs;

#[test]
fn test_hierarchy_round_trip() {
    let (_temp_dir, root) = fresh_root();
    DataSystem::create(&root, ["domain", "project"]).unwrap();

    let reopened = DataSystem::open(&root).unwrap();
    assert_eq!(reopened.hierarchy(), &["domain", "project"][..]);
    assert_eq!(reopened.root(), root.as_path());

    let same = DataSystem::create(&root, ["domain", "project"]).unwrap();
    assert_eq!(same.hierarchy(), reopened.hierarchy());
}

#[test]
fn test_hierarchy_mismatch() {
    let (_temp_dir, root) = fresh_root();
    DataSystem::create(&root, ["domain", "project"]).unwrap();

    for other in [&["domain"][..], &["project", "domain"][..], &["domain", "project", "x"][..]] {
        match DataSystem::create(&root, other.iter().copied()) {
            Err(DataSystemError::HierarchyMismatch { given, found, .. }) => {
                assert_eq!(given, other);
                assert_eq!(found, vec!["domain", "project"]);
            }
            result => panic!("expected mismatch, got {:?}", result),
        }
    }
}

#[test]
fn test_add_persists_document_layout() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    system.add("acme/widgets", schema(json!({"rows": 10}))).unwrap();
    system.add(root.join("globex"), Schema::new()).unwrap();

    let document: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(root.join(".datasystems-config.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        document,
        json!({
            "hierarchy": ["domain", "project"],
            "structure": {
                "acme": {"widgets": {"path": "acme/widgets", "schema": {"rows": 10}}},
                "globex": {"path": "globex", "schema": {}}
            }
        })
    );

    let reopened = DataSystem::open(&root).unwrap();
    assert_eq!(reopened.structure(), system.structure());
}

#[test]
fn test_add_merges_schema_keys() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    system
        .add("acme/widgets", schema(json!({"rows": 10, "owner": "ops"})))
        .unwrap();
    system
        .add("acme/widgets", schema(json!({"rows": 12, "format": "csv"})))
        .unwrap();

    let entry = system.structure().entry(&["acme", "widgets"]).unwrap();
    assert_eq!(
        serde_json::Value::Object(entry.schema.clone()),
        json!({"rows": 12, "owner": "ops", "format": "csv"})
    );
}

#[test]
fn test_idempotent_re_add() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    let fields = schema(json!({"k": "v"}));

    system.add("acme/widgets", fields.clone()).unwrap();
    let after_first = system.structure().clone();
    let bytes_first = fs::read(root.join(".datasystems-config.json")).unwrap();

    system.add("acme/widgets", fields).unwrap();
    assert_eq!(system.structure(), &after_first);
    assert_eq!(
        fs::read(root.join(".datasystems-config.json")).unwrap(),
        bytes_first
    );
}

#[test]
fn test_malformed_document_on_open() {
    let (_temp_dir, root) = fresh_root();
    fs::create_dir(&root).unwrap();
    fs::write(root.join(".datasystems-config.json"), "{\"structure\": {}}").unwrap();
    assert!(matches!(
        DataSystem::open(&root),
        Err(DataSystemError::Malformed(_))
    ));
}

#[test]
fn test_config_file_selects_document_name() {
    let (temp_dir, root) = fresh_root();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[index]\nfile_name = \"catalogue.json\"\natomic_write = false\n",
    )
    .unwrap();
    let config = ConfigLoader::load_from_file(&config_path).unwrap();

    let mut system = DataSystem::create_with_config(&root, ["domain"], config.clone()).unwrap();
    system.add("acme", Schema::new()).unwrap();

    assert!(root.join("catalogue.json").is_file());
    assert!(!DataSystem::is_system(&root));
    let reopened = DataSystem::open_with_config(&root, config).unwrap();
    assert_eq!(reopened.iter_entries().count(), 1);
}
