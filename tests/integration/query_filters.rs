//! Filtering and key lookup over a populated system

use super::{fresh_root, schema};
use datasystems::{filters, DataSystem, Filters, NameArg, Schema};
use serde_json::json;

fn populated() -> (tempfile::TempDir, DataSystem) {
    let (temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    system.add("acme/widgets", schema(json!({"k": "v"}))).unwrap();
    system.add("acme/gadgets", schema(json!({"rows": 3}))).unwrap();
    system.add("globex/widgets", Schema::new()).unwrap();
    (temp_dir, system)
}

fn paths<'a>(entries: impl Iterator<Item = &'a datasystems::Entry>) -> Vec<String> {
    entries.map(|e| e.path.clone()).collect()
}

#[test]
fn test_iter_entries_in_stored_order() {
    let (_temp_dir, system) = populated();
    assert_eq!(
        paths(system.iter_entries()),
        vec!["acme/gadgets", "acme/widgets", "globex/widgets"]
    );
}

#[test]
fn test_filter_correctness() {
    let (_temp_dir, system) = populated();

    let mut by_domain = paths(system.iter_filter(&filters([("domain", "ACME")])));
    by_domain.sort();
    assert_eq!(by_domain, vec!["acme/gadgets", "acme/widgets"]);

    let widgets = paths(system.iter_filter(&filters([("domain", "acme"), ("project", "widgets")])));
    assert_eq!(widgets, vec!["acme/widgets"]);

    let none = paths(system.iter_filter(&filters([("domain", "initech")])));
    assert!(none.is_empty());
}

#[test]
fn test_find_round_trip() {
    let (_temp_dir, system) = populated();

    for key in ["k", "K"] {
        let found: Vec<_> = system.find(key, &Filters::new()).collect();
        assert_eq!(found.len(), 1, "key {:?}", key);
        assert_eq!(found[0].path, "acme/widgets");
        assert_eq!(found[0].schema.get("k"), Some(&json!("v")));
    }

    let scoped = system.find("rows", &filters([("project", "widgets")])).count();
    assert_eq!(scoped, 0);
}

#[test]
fn test_named_path_is_found() {
    let (_temp_dir, root) = fresh_root();
    let mut system = DataSystem::create(&root, ["domain", "project"]).unwrap();
    let path = system
        .name(&[NameArg::from("Acme Corp"), NameArg::named("project", "Q3 Report")])
        .unwrap();
    system.add(&path, schema(json!({"Owner": "finance"}))).unwrap();

    let entry = system.find("owner", &filters([("domain", "acmecorp")])).next().unwrap();
    assert_eq!(entry.path, "acmecorp/q3report");
}
