use std::fs;
use tempfile::tempdir;
use timeline_core::{
    CategoryStyle, Document, DocumentChange, DocumentError, DocumentStore, Era, Item, ItemType,
};

const JAN_2023: i64 = 1_672_531_200_000;
const JAN_2024: i64 = 1_704_067_200_000;

fn populated_store() -> DocumentStore {
    let mut store = DocumentStore::new();
    store.load_str("{}");
    let lane = store.add_group("Platform").unwrap();

    let mut item = Item::new("deploy", "Deploy v2", ItemType::Range, JAN_2023);
    item.group = Some(lane);
    item.end = Some(JAN_2024);
    item.class_name = Some("release".to_string());
    item.description = serde_json::json!({"ops": [{"insert": "notes\n"}]});
    store.add_item(item).unwrap();

    store
        .add_era("era-1", Era::new("Migration", JAN_2023, JAN_2024, "#ffeecc"))
        .unwrap();
    store.add_marker("m1", "Freeze", JAN_2024).unwrap();
    store.set_display_window(JAN_2023, JAN_2024).unwrap();
    store
}

#[test]
fn save_then_load_reproduces_the_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("timeline.json");
    let store = populated_store();

    store.save(&path).unwrap();

    let mut reloaded = DocumentStore::with_source(&path);
    let report = reloaded.load();
    assert!(report.is_clean());
    assert_eq!(reloaded.document(), store.document());
}

#[test]
fn saved_file_uses_expected_keys_and_pretty_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("timeline.json");
    populated_store().save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \""));
    assert!(text.ends_with("}\n"));

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    for section in Document::SECTIONS {
        assert!(value.get(section).is_some(), "missing section {section}");
    }
    assert_eq!(value["configuration"]["startDate"], JAN_2023);
    assert_eq!(value["items"][0]["className"], "release");
    assert_eq!(value["items"][0]["type"], "range");
    assert_eq!(value["item_categories"]["release"]["bg"], CategoryStyle::default().bg);
}

#[test]
fn loading_the_same_file_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("timeline.json");
    populated_store().save(&path).unwrap();

    let mut store = DocumentStore::with_source(&path);
    store.load();
    let first = store.document().cloned();
    store.load();

    assert_eq!(store.document().cloned(), first);
}

#[test]
fn missing_sections_are_backfilled_on_load() {
    let mut store = DocumentStore::new();
    let report = store.load_str(r#"{"groups": [], "markers": null}"#);

    assert!(report.fallback.is_none());
    assert!(report.backfilled.contains(&"markers"));
    assert!(report.backfilled.contains(&"items"));
    assert!(!report.backfilled.contains(&"groups"));
    assert!(store.is_valid());
    assert!(store.document().unwrap().markers.is_empty());
}

#[test]
fn malformed_file_loads_as_empty_document_and_still_notifies() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ definitely not json").unwrap();

    let mut store = DocumentStore::with_source(&path);
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&seen);
    store.subscribe(move |change, _| sink.borrow_mut().push(change));

    let report = store.load();

    assert!(report.fallback.is_some());
    assert_eq!(store.document(), Some(&Document::default()));
    assert_eq!(*seen.borrow(), vec![DocumentChange::Loaded]);
}

#[test]
fn missing_file_loads_as_empty_document() {
    let dir = tempdir().unwrap();
    let mut store = DocumentStore::new();

    store.load_from(dir.path().join("absent.json"));

    assert!(store.is_valid());
    assert_eq!(store.document(), Some(&Document::default()));
}

#[test]
fn groups_are_sorted_by_position_on_load() {
    let mut store = DocumentStore::new();
    store.load_str(
        r#"{"groups": [
            {"id": "c", "name": "C", "position": 3},
            {"id": "a", "name": "A", "position": 1, "children": [
                {"id": "a2", "name": "A2", "position": 2},
                {"id": "a1", "name": "A1", "position": 1}
            ]},
            {"id": "b", "name": "B", "position": 2}
        ]}"#,
    );

    let groups = &store.document().unwrap().groups;
    let roots: Vec<_> = groups.iter().map(|group| group.id.as_str()).collect();
    assert_eq!(roots, vec!["a", "b", "c"]);
    let children: Vec<_> = groups[0]
        .children
        .iter()
        .map(|group| group.id.as_str())
        .collect();
    assert_eq!(children, vec!["a1", "a2"]);
}

#[test]
fn save_to_unwritable_destination_reports_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("timeline.json");

    let err = populated_store().save(&path).unwrap_err();

    assert!(matches!(err, DocumentError::Io { .. }));
}

#[test]
fn save_to_source_requires_a_bound_path() {
    let store = populated_store();
    assert!(matches!(
        store.save_to_source(),
        Err(DocumentError::NotLoaded)
    ));
}
