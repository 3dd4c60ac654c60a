use proptest::prelude::*;
use serde_json::{Map, Value};

use jex::edit::EditOps;
use jex::path::NodePath;
use jex::tree::{brackets_balanced, flatten, reassemble, CollapseState, LineKind};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|pairs| {
                let mut map = Map::new();
                for (k, v) in pairs {
                    map.insert(k, v);
                }
                Value::Object(map)
            }),
        ]
    })
}

/// Documents with a non-empty container at the root, so collapse/delete
/// targets always exist.
fn arb_container() -> impl Strategy<Value = Value> {
    prop::collection::vec(arb_json(), 1..5).prop_map(Value::Array)
}

proptest! {
    /// Re-assembling the text from flatten output and parsing it yields the
    /// original value.
    #[test]
    fn flatten_reserialize_round_trip(value in arb_json()) {
        let text = reassemble(&flatten(&value));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(parsed, value);
    }

    /// Every collapsible open has a matching close at the same level with
    /// the same bracket family, properly nested.
    #[test]
    fn flatten_brackets_balance(value in arb_json()) {
        prop_assert!(brackets_balanced(&flatten(&value)));
    }

    /// Flattening has no hidden state.
    #[test]
    fn flatten_is_deterministic(value in arb_json()) {
        let first: Vec<String> = flatten(&value).iter().map(|l| l.text()).collect();
        let second: Vec<String> = flatten(&value).iter().map(|l| l.text()).collect();
        prop_assert_eq!(first, second);
    }

    /// Collapsing a container hides exactly the lines that have it as a
    /// proper ancestor, and nothing else.
    #[test]
    fn collapse_hides_exactly_the_descendants(value in arb_container(), pick in any::<prop::sample::Index>()) {
        let lines = flatten(&value);
        let collapsible: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.collapsible && l.kind == LineKind::ContainerOpen)
            .map(|(i, _)| i)
            .collect();
        prop_assume!(!collapsible.is_empty());

        let target = &lines[collapsible[pick.index(collapsible.len())]];
        let mut state = CollapseState::new();
        state.toggle(target);

        for line in &lines {
            let is_descendant = line.path.ancestors().any(|a| a == target.path);
            prop_assert_eq!(state.is_visible(line), !is_descendant);
        }
    }

    /// Expanding an ancestor restores the prior visibility of its subtree.
    #[test]
    fn expand_restores_nested_collapse_state(value in arb_container(), pick in any::<prop::sample::Index>()) {
        let lines = flatten(&value);
        let collapsible: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.collapsible)
            .map(|(i, _)| i)
            .collect();
        prop_assume!(collapsible.len() >= 2);

        let outer = &lines[collapsible[0]];
        let inner = &lines[collapsible[pick.index(collapsible.len())]];

        let mut state = CollapseState::new();
        state.toggle(inner);
        let before: Vec<bool> = lines.iter().map(|l| state.is_visible(l)).collect();

        state.toggle(outer);
        state.toggle(outer);
        let after: Vec<bool> = lines.iter().map(|l| state.is_visible(l)).collect();
        prop_assert_eq!(before, after);
    }

    /// expand_all / collapse_all are idempotent.
    #[test]
    fn expand_and_collapse_all_idempotent(value in arb_json()) {
        let lines = flatten(&value);
        let mut state = CollapseState::new();

        state.collapse_all(&lines);
        let collapsed_once: Vec<bool> = lines.iter().map(|l| state.is_visible(l)).collect();
        state.collapse_all(&lines);
        let collapsed_twice: Vec<bool> = lines.iter().map(|l| state.is_visible(l)).collect();
        prop_assert_eq!(collapsed_once, collapsed_twice);

        state.expand_all();
        state.expand_all();
        prop_assert!(lines.iter().all(|l| state.is_visible(l)));
    }

    /// Mutations never alter the input document.
    #[test]
    fn mutations_do_not_touch_the_input(value in arb_json(), pick in any::<prop::sample::Index>()) {
        let snapshot = value.clone();
        let lines = flatten(&value);
        let target = &lines[pick.index(lines.len())];

        let _ = EditOps::update(&value, &target.path, Value::Null);
        let _ = EditOps::insert(&value, &target.path, Some("k"), Value::Bool(true));
        let _ = EditOps::delete(&value, &target.path);
        prop_assert_eq!(&value, &snapshot);
    }

    /// A successful delete removes exactly the addressed node.
    #[test]
    fn delete_then_resolve_fails(value in arb_container(), pick in any::<prop::sample::Index>()) {
        let lines = flatten(&value);
        let deletable: Vec<&jex::Line> = lines
            .iter()
            .filter(|l| !l.path.is_root() && l.kind != LineKind::ContainerClose)
            .collect();
        prop_assume!(!deletable.is_empty());

        let target = deletable[pick.index(deletable.len())];
        let next = EditOps::delete(&value, &target.path).unwrap();

        // the old path either no longer resolves or now points at a shifted
        // sibling; the document shrank either way
        let count_before = flatten(&value).len();
        let count_after = flatten(&next).len();
        prop_assert!(count_after < count_before);
    }

    /// Path display round-trips through parse.
    #[test]
    fn path_display_parse_round_trip(value in arb_json(), pick in any::<prop::sample::Index>()) {
        let lines = flatten(&value);
        let target = &lines[pick.index(lines.len())];
        let reparsed = NodePath::parse(&target.path.to_string()).unwrap();
        prop_assert_eq!(&reparsed, &target.path);
    }
}
