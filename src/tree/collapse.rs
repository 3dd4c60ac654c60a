use std::collections::HashSet;

use crate::path::NodePath;
use crate::tree::line::Line;

/// Per-container collapsed/expanded record.
///
/// Only collapsed paths are stored; an absent entry means expanded, so a
/// fresh state renders everything expanded. The state is rebuilt from
/// scratch whenever a new document is flattened; entries are never migrated
/// across array-index shifts.
#[derive(Debug, Clone, Default)]
pub struct CollapseState {
    collapsed: HashSet<NodePath>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, path: &NodePath) -> bool {
        self.collapsed.contains(path)
    }

    /// A line is visible iff none of its proper ancestors is collapsed.
    /// Close lines carry their container's own path, so a collapsed
    /// container keeps both its open and close lines on screen while its
    /// children disappear.
    pub fn is_visible(&self, line: &Line) -> bool {
        if self.collapsed.is_empty() {
            return true;
        }
        line.path.ancestors().all(|a| !self.collapsed.contains(&a))
    }

    /// Flip the entry for this line's container. Toggling a non-collapsible
    /// line is a no-op. Descendant entries are untouched, so re-expanding a
    /// container restores whatever collapse state its subtree had.
    pub fn toggle(&mut self, line: &Line) {
        if !line.collapsible {
            return;
        }
        if !self.collapsed.remove(&line.path) {
            self.collapsed.insert(line.path.clone());
        }
    }

    pub fn collapse(&mut self, line: &Line) {
        if line.collapsible {
            self.collapsed.insert(line.path.clone());
        }
    }

    pub fn expand(&mut self, path: &NodePath) {
        self.collapsed.remove(path);
    }

    /// Clear every entry; equivalent to "no container collapsed".
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Mark every collapsible container-open line collapsed.
    pub fn collapse_all(&mut self, lines: &[Line]) {
        self.collapsed = lines
            .iter()
            .filter(|l| l.collapsible && l.is_container_open())
            .map(|l| l.path.clone())
            .collect();
    }

    /// Expand every proper ancestor of `path` so the target becomes visible.
    /// Siblings keep their state; the target itself is not expanded.
    pub fn reveal(&mut self, path: &NodePath) {
        for ancestor in path.ancestors() {
            self.collapsed.remove(&ancestor);
        }
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::flatten::flatten;
    use serde_json::json;

    fn sample() -> Vec<Line> {
        flatten(&json!({"a": 1, "b": [2, 3]}))
    }

    fn visible_texts(lines: &[Line], state: &CollapseState) -> Vec<String> {
        lines
            .iter()
            .filter(|l| state.is_visible(l))
            .map(|l| l.text())
            .collect()
    }

    fn line_at<'a>(lines: &'a [Line], text: &str) -> &'a Line {
        lines.iter().find(|l| l.text() == text).unwrap()
    }

    #[test]
    fn test_default_is_all_expanded() {
        let lines = sample();
        let state = CollapseState::new();
        assert_eq!(visible_texts(&lines, &state).len(), lines.len());
    }

    #[test]
    fn test_collapse_hides_descendants_but_not_close_line() {
        let lines = sample();
        let mut state = CollapseState::new();
        state.toggle(line_at(&lines, "\"b\": ["));
        assert_eq!(
            visible_texts(&lines, &state),
            vec!["{", "\"a\": 1,", "\"b\": [", "]", "}"]
        );
    }

    #[test]
    fn test_toggle_non_collapsible_is_noop() {
        let lines = sample();
        let mut state = CollapseState::new();
        state.toggle(line_at(&lines, "\"a\": 1,"));
        assert_eq!(state.collapsed_count(), 0);
    }

    #[test]
    fn test_nested_collapse_is_sticky() {
        let lines = flatten(&json!({"outer": {"inner": [1]}}));
        let mut state = CollapseState::new();
        let outer = line_at(&lines, "\"outer\": {");
        let inner = line_at(&lines, "\"inner\": [");

        state.toggle(inner);
        let before: Vec<String> = visible_texts(&lines, &state);

        state.toggle(outer);
        assert!(!state.is_visible(inner));

        state.toggle(outer);
        assert_eq!(visible_texts(&lines, &state), before);
    }

    #[test]
    fn test_collapse_all_and_expand_all_are_idempotent() {
        let lines = sample();
        let mut state = CollapseState::new();

        state.collapse_all(&lines);
        let once = state.collapsed_count();
        state.collapse_all(&lines);
        assert_eq!(state.collapsed_count(), once);

        state.expand_all();
        state.expand_all();
        assert_eq!(state.collapsed_count(), 0);
    }

    #[test]
    fn test_reveal_expands_ancestors_only() {
        let lines = flatten(&json!({"a": {"b": [1]}, "c": {"d": 2}}));
        let mut state = CollapseState::new();
        state.collapse_all(&lines);

        let target = crate::path::NodePath::root()
            .child_key("a")
            .child_key("b")
            .child_index(0);
        state.reveal(&target);

        assert!(!state.is_collapsed(&crate::path::NodePath::root()));
        assert!(!state.is_collapsed(&crate::path::NodePath::root().child_key("a")));
        assert!(!state.is_collapsed(&crate::path::NodePath::root().child_key("a").child_key("b")));
        // sibling subtree untouched
        assert!(state.is_collapsed(&crate::path::NodePath::root().child_key("c")));
    }
}
