use serde_json::json;

use jex::document::Document;
use jex::edit::EditOps;
use jex::path::NodePath;
use jex::viewer::Viewer;

/// The full cycle: parse -> flatten -> collapse -> mutate -> re-flatten,
/// with the selection and collapse state rebuilt against the new lines.
#[test]
fn test_edit_cycle_end_to_end() {
    let mut doc = Document::new();
    doc.format(r#"{"a": 1, "b": [2, 3]}"#).unwrap();

    let mut viewer = Viewer::new(20);
    viewer.rebuild(doc.value());
    assert_eq!(viewer.visible_len(), 7);

    // collapse "b", then delete b[0] through the edit layer
    let b = NodePath::parse("b").unwrap();
    assert!(viewer.goto(&b));
    viewer.toggle_selected();
    assert_eq!(viewer.visible_len(), 5);

    let next = EditOps::delete(doc.value().unwrap(), &NodePath::parse("b[0]").unwrap()).unwrap();
    doc.replace_value(next).unwrap();
    assert_eq!(doc.value().unwrap(), &json!({"a": 1, "b": [3]}));

    // the canonical text is the write-back signal for the host
    let reparsed: serde_json::Value = serde_json::from_str(doc.text()).unwrap();
    assert_eq!(&reparsed, doc.value().unwrap());

    // collapse state resets with the new flatten; everything expanded again
    viewer.rebuild(doc.value());
    assert_eq!(viewer.visible_len(), 6);
    assert!(viewer.goto(&b));
}

#[test]
fn test_parse_failure_keeps_viewer_intact() {
    let mut doc = Document::new();
    doc.format(r#"{"a": 1}"#).unwrap();

    let mut viewer = Viewer::new(20);
    viewer.rebuild(doc.value());
    let lines_before = viewer.visible_len();

    assert!(doc.format(r#"{"a":}"#).is_err());
    assert!(doc.error().is_some());

    // the host re-renders from the untouched last good value
    viewer.rebuild(doc.value());
    assert_eq!(viewer.visible_len(), lines_before);
}

#[test]
fn test_stale_selection_is_dropped_after_mutation() {
    let mut doc = Document::new();
    doc.format(r#"{"list": [10, 20]}"#).unwrap();

    let mut viewer = Viewer::new(20);
    viewer.rebuild(doc.value());

    let last = NodePath::parse("list[1]").unwrap();
    assert!(viewer.goto(&last));
    assert!(viewer.selected_node(doc.value().unwrap()).is_some());

    let next = EditOps::delete(doc.value().unwrap(), &last).unwrap();
    doc.replace_value(next).unwrap();
    viewer.rebuild(doc.value());

    // the old path no longer exists in the new line sequence
    assert!(!viewer.goto(&last));
    // the viewer still reports a valid (clamped) selection
    assert!(viewer.selected_node(doc.value().unwrap()).is_some());
}

#[test]
fn test_insert_appends_and_reveal_finds_it() {
    let mut doc = Document::new();
    doc.format(r#"{"a": {"deep": {"x": 1}}}"#).unwrap();

    let mut viewer = Viewer::new(20);
    viewer.rebuild(doc.value());
    viewer.collapse_all();

    let deep = NodePath::parse("a.deep").unwrap();
    let next = EditOps::insert(doc.value().unwrap(), &deep, Some("y"), json!(true)).unwrap();
    doc.replace_value(next).unwrap();
    viewer.rebuild(doc.value());

    let target = NodePath::parse("a.deep.y").unwrap();
    assert!(viewer.goto(&target));
    assert_eq!(viewer.selected_line().unwrap().text(), "\"y\": true");
}
