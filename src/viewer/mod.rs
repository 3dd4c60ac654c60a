use serde_json::Value;

use crate::path::NodePath;
use crate::tree::{flatten, CollapseState, Line, LineKind};
use crate::ui::viewport::Viewport;

/// What kind of container holds the selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    Root,
    Object,
    Array,
}

/// Transient selection state driving the inline editor and breadcrumb.
/// Dropped whenever its path stops resolving after a mutation.
#[derive(Debug, Clone)]
pub struct SelectedNode {
    pub path: NodePath,
    pub parent: ParentKind,
    pub key: Option<String>,
    pub preview: String,
}

/// The viewer controller: flattened lines, collapse state, selection and
/// scroll position, owned in one place and handed by reference to the pure
/// render functions. Each render cycle is a function of (document value,
/// collapse state, scroll position) with no hidden state.
pub struct Viewer {
    lines: Vec<Line>,
    collapse: CollapseState,
    visible: Vec<usize>,
    selected: usize,
    pub viewport: Viewport,
    pub wrap: bool,
}

impl Viewer {
    pub fn new(height: usize) -> Self {
        Self {
            lines: Vec::new(),
            collapse: CollapseState::new(),
            visible: Vec::new(),
            selected: 0,
            viewport: Viewport::new(height, 1, 2),
            wrap: false,
        }
    }

    /// Re-flatten for a new document. Collapse state resets to the default
    /// (everything expanded); selection and scroll are clamped.
    pub fn rebuild(&mut self, value: Option<&Value>) {
        self.lines = match value {
            Some(v) => flatten(v),
            None => Vec::new(),
        };
        self.collapse = CollapseState::new();
        self.refresh_visible();
    }

    /// Recompute the visible index list from the collapse state. Safe to
    /// call redundantly; reapplying the same state is a no-op.
    pub fn refresh_visible(&mut self) {
        self.visible = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.collapse.is_visible(line))
            .map(|(i, _)| i)
            .collect();
        debug_assert!(
            self.visible.iter().all(|&i| i < self.lines.len()),
            "visibility referenced a line outside the flattened sequence"
        );
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
        self.viewport.clamp(self.visible.len());
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn collapse_state(&self) -> &CollapseState {
        &self.collapse
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_line(&self, vis_idx: usize) -> Option<&Line> {
        self.visible.get(vis_idx).and_then(|&i| self.lines.get(i))
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_line(&self) -> Option<&Line> {
        self.visible_line(self.selected)
    }

    /// Selection details for the breadcrumb and inline editor.
    pub fn selected_node(&self, doc: &Value) -> Option<SelectedNode> {
        let line = self.selected_line()?;
        let value = line.path.resolve(doc)?;
        let parent = match line.path.parent() {
            None => ParentKind::Root,
            Some(parent_path) => match parent_path.resolve(doc)? {
                Value::Object(_) => ParentKind::Object,
                Value::Array(_) => ParentKind::Array,
                _ => return None,
            },
        };
        Some(SelectedNode {
            path: line.path.clone(),
            parent,
            key: line.key.clone(),
            preview: preview_of(value),
        })
    }

    pub fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, last as isize) as usize;
        self.viewport.scroll_into_view(self.selected, self.visible.len());
    }

    pub fn half_page(&self) -> isize {
        (self.viewport.items_per_page() / 2).max(1) as isize
    }

    /// Toggle collapse at the selection, keeping the same line selected.
    pub fn toggle_selected(&mut self) {
        let Some(line) = self.selected_line().cloned() else {
            return;
        };
        self.collapse.toggle(&line);
        self.refresh_visible();
        self.select_path(&line.path);
    }

    /// `h`: collapse the selected container, or jump to the parent when the
    /// selection is not collapsible.
    pub fn collapse_selected(&mut self) {
        let Some(line) = self.selected_line().cloned() else {
            return;
        };
        if line.collapsible && !self.collapse.is_collapsed(&line.path) {
            self.collapse.collapse(&line);
            self.refresh_visible();
            self.select_path(&line.path);
        } else if let Some(parent) = line.path.parent() {
            self.select_path(&parent);
        }
    }

    /// `l`: expand the selected container.
    pub fn expand_selected(&mut self) {
        let Some(line) = self.selected_line().cloned() else {
            return;
        };
        if self.collapse.is_collapsed(&line.path) {
            self.collapse.expand(&line.path);
            self.refresh_visible();
            self.select_path(&line.path);
        }
    }

    pub fn expand_all(&mut self) {
        self.collapse.expand_all();
        self.refresh_visible();
    }

    pub fn collapse_all(&mut self) {
        self.collapse.collapse_all(&self.lines);
        self.refresh_visible();
    }

    /// Jump between a container's open and close lines. Both ends carry the
    /// container's path, so the partner is the visible line with the same
    /// path and the opposite kind.
    pub fn jump_matching(&mut self) {
        let Some(line) = self.selected_line() else {
            return;
        };
        let target_kind = match line.kind {
            LineKind::ContainerOpen if line.collapsible => LineKind::ContainerClose,
            LineKind::ContainerClose => LineKind::ContainerOpen,
            _ => return,
        };
        let path = line.path.clone();
        let found = self.visible.iter().position(|&i| {
            let l = &self.lines[i];
            l.path == path && l.kind == target_kind
        });
        if let Some(vis_idx) = found {
            self.selected = vis_idx;
            self.viewport.scroll_into_view(self.selected, self.visible.len());
        }
    }

    /// Reveal `path` (expand its ancestors), select it, and scroll it into
    /// view. Returns false when the path has no line in the current tree.
    pub fn goto(&mut self, path: &NodePath) -> bool {
        if !self.lines.iter().any(|l| &l.path == path) {
            return false;
        }
        self.collapse.reveal(path);
        self.refresh_visible();
        self.select_path(path)
    }

    fn select_path(&mut self, path: &NodePath) -> bool {
        let found = self
            .visible
            .iter()
            .position(|&i| &self.lines[i].path == path);
        match found {
            Some(vis_idx) => {
                self.selected = vis_idx;
                self.viewport.scroll_into_view(self.selected, self.visible.len());
                true
            }
            None => false,
        }
    }
}

fn preview_of(value: &Value) -> String {
    match value {
        Value::Object(map) => format!("{{…{}}}", map.len()),
        Value::Array(items) => format!("[…{}]", items.len()),
        scalar => scalar.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::NodePath;
    use serde_json::json;

    fn viewer_for(value: &Value) -> Viewer {
        let mut viewer = Viewer::new(10);
        viewer.rebuild(Some(value));
        viewer
    }

    fn visible_texts(viewer: &Viewer) -> Vec<String> {
        (0..viewer.visible_len())
            .filter_map(|i| viewer.visible_line(i))
            .map(|l| l.text())
            .collect()
    }

    #[test]
    fn test_rebuild_defaults_to_all_expanded() {
        let viewer = viewer_for(&json!({"a": 1, "b": [2, 3]}));
        assert_eq!(viewer.visible_len(), 7);
    }

    #[test]
    fn test_toggle_keeps_selection_on_container() {
        let mut viewer = viewer_for(&json!({"a": 1, "b": [2, 3]}));
        viewer.move_selection(2); // "b": [
        viewer.toggle_selected();
        assert_eq!(
            visible_texts(&viewer),
            vec!["{", "\"a\": 1,", "\"b\": [", "]", "}"]
        );
        assert_eq!(viewer.selected_line().unwrap().text(), "\"b\": [");
        viewer.toggle_selected();
        assert_eq!(viewer.visible_len(), 7);
    }

    #[test]
    fn test_selection_clamped_when_visible_shrinks() {
        let mut viewer = viewer_for(&json!({"b": [1, 2, 3, 4, 5]}));
        viewer.move_selection(6); // last element
        viewer.goto(&NodePath::parse("b").unwrap());
        viewer.toggle_selected();
        assert!(viewer.selected_index() < viewer.visible_len());
    }

    #[test]
    fn test_goto_reveals_nested_target() {
        let mut viewer = viewer_for(&json!({"a": {"b": {"c": 1}}}));
        viewer.collapse_all();
        assert!(viewer.goto(&NodePath::parse("a.b.c").unwrap()));
        assert_eq!(viewer.selected_line().unwrap().text(), "\"c\": 1");
    }

    #[test]
    fn test_goto_missing_path_is_refused() {
        let mut viewer = viewer_for(&json!({"a": 1}));
        assert!(!viewer.goto(&NodePath::parse("zzz").unwrap()));
    }

    #[test]
    fn test_selected_node_reports_parent_kind() {
        let doc = json!({"a": 1, "b": [2]});
        let mut viewer = viewer_for(&doc);
        viewer.move_selection(1); // "a": 1,
        let node = viewer.selected_node(&doc).unwrap();
        assert_eq!(node.parent, ParentKind::Object);
        assert_eq!(node.key.as_deref(), Some("a"));

        viewer.move_selection(2); // first array element
        let node = viewer.selected_node(&doc).unwrap();
        assert_eq!(node.parent, ParentKind::Array);
        assert_eq!(node.path, NodePath::parse("b[0]").unwrap());
    }

    #[test]
    fn test_refresh_visible_is_idempotent() {
        let mut viewer = viewer_for(&json!({"a": {"b": 1}}));
        viewer.move_selection(1);
        viewer.toggle_selected();
        let before = visible_texts(&viewer);
        viewer.refresh_visible();
        viewer.refresh_visible();
        assert_eq!(visible_texts(&viewer), before);
    }
}
