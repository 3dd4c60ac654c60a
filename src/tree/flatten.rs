use serde_json::Value;

use crate::path::NodePath;
use crate::tree::line::{Bracket, FragKind, Fragment, Line, LineKind};

/// Flatten a JSON value into its ordered display lines.
///
/// Produces one line per scalar, one per container open and one per container
/// close, depth-first, matching pretty-printed JSON order. Object members are
/// visited in insertion order. Deterministic: two passes over the same value
/// yield identical sequences.
pub fn flatten(value: &Value) -> Vec<Line> {
    let mut lines = Vec::new();
    push_value(value, NodePath::root(), 0, true, None, &mut lines);
    debug_assert!(
        brackets_balanced(&lines),
        "flatten produced an unmatched bracket pair"
    );
    lines
}

fn push_value(
    value: &Value,
    path: NodePath,
    level: usize,
    last_sibling: bool,
    key: Option<&str>,
    out: &mut Vec<Line>,
) {
    match value {
        Value::Object(map) => {
            if map.is_empty() {
                out.push(empty_container(path, level, last_sibling, key, Bracket::Brace));
                return;
            }
            out.push(container_open(path.clone(), level, last_sibling, key, Bracket::Brace));
            let count = map.len();
            for (i, (k, child)) in map.iter().enumerate() {
                push_value(child, path.child_key(k), level + 1, i + 1 == count, Some(k), out);
            }
            out.push(container_close(path, level, last_sibling, Bracket::Brace));
        }
        Value::Array(items) => {
            if items.is_empty() {
                out.push(empty_container(path, level, last_sibling, key, Bracket::Square));
                return;
            }
            out.push(container_open(path.clone(), level, last_sibling, key, Bracket::Square));
            let count = items.len();
            for (i, child) in items.iter().enumerate() {
                push_value(child, path.child_index(i), level + 1, i + 1 == count, None, out);
            }
            out.push(container_close(path, level, last_sibling, Bracket::Square));
        }
        scalar => {
            let mut fragments = key_prefix(key);
            fragments.push(Fragment::scalar(scalar));
            if !last_sibling {
                fragments.push(Fragment::new(FragKind::Comma, ","));
            }
            out.push(Line {
                path,
                level,
                kind: LineKind::Scalar,
                bracket: None,
                key: key.map(str::to_string),
                last_sibling,
                collapsible: false,
                fragments,
            });
        }
    }
}

fn key_prefix(key: Option<&str>) -> Vec<Fragment> {
    match key {
        Some(k) => vec![
            Fragment::new(FragKind::Key, Value::String(k.to_string()).to_string()),
            Fragment::new(FragKind::Colon, ": "),
        ],
        None => Vec::new(),
    }
}

fn container_open(
    path: NodePath,
    level: usize,
    last_sibling: bool,
    key: Option<&str>,
    bracket: Bracket,
) -> Line {
    let mut fragments = key_prefix(key);
    fragments.push(Fragment::new(FragKind::Bracket, bracket.open()));
    Line {
        path,
        level,
        kind: LineKind::ContainerOpen,
        bracket: Some(bracket),
        key: key.map(str::to_string),
        last_sibling,
        collapsible: true,
        fragments,
    }
}

fn container_close(path: NodePath, level: usize, last_sibling: bool, bracket: Bracket) -> Line {
    let mut fragments = vec![Fragment::new(FragKind::Bracket, bracket.close())];
    if !last_sibling {
        fragments.push(Fragment::new(FragKind::Comma, ","));
    }
    Line {
        path,
        level,
        kind: LineKind::ContainerClose,
        bracket: Some(bracket),
        key: None,
        last_sibling,
        collapsible: false,
        fragments,
    }
}

/// Zero-member containers render as a single `{}` / `[]` line with no
/// matching close and nothing to collapse.
fn empty_container(
    path: NodePath,
    level: usize,
    last_sibling: bool,
    key: Option<&str>,
    bracket: Bracket,
) -> Line {
    let mut fragments = key_prefix(key);
    fragments.push(Fragment::new(FragKind::Bracket, bracket.pair()));
    if !last_sibling {
        fragments.push(Fragment::new(FragKind::Comma, ","));
    }
    Line {
        path,
        level,
        kind: LineKind::ContainerOpen,
        bracket: Some(bracket),
        key: key.map(str::to_string),
        last_sibling,
        collapsible: false,
        fragments,
    }
}

/// Every collapsible open must have exactly one close at the same level with
/// the same bracket family, properly nested.
pub fn brackets_balanced(lines: &[Line]) -> bool {
    let mut stack: Vec<(usize, Bracket)> = Vec::new();
    for line in lines {
        match line.kind {
            LineKind::ContainerOpen if line.collapsible => {
                if let Some(&(level, _)) = stack.last() {
                    if line.level <= level {
                        return false;
                    }
                }
                match line.bracket {
                    Some(b) => stack.push((line.level, b)),
                    None => return false,
                }
            }
            LineKind::ContainerClose => match stack.pop() {
                Some((level, bracket)) => {
                    if level != line.level || Some(bracket) != line.bracket {
                        return false;
                    }
                }
                None => return false,
            },
            _ => {
                if let Some(&(level, _)) = stack.last() {
                    if line.level <= level {
                        return false;
                    }
                }
            }
        }
    }
    stack.is_empty()
}

/// Reassemble the document text from flattened lines, markup stripped.
/// Parsing the result yields a value deep-equal to the flattened one.
pub fn reassemble(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.text());
        out.push('\n');
    }
    out
}
