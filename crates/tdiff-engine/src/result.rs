//! The default result tree.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Node `0` is
//! a synthetic root that carries no inputs; a run's top-level position is
//! its only child. Removed nodes stay in the arena but are no longer
//! reachable from the root.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use tdiff_structure::Named;
use tdiff_types::{ChangeCode, ChangeKind, Direction, Side};

use crate::emit::ResultSink;
use crate::report::{DiffReport, DiffSummary, ReportEntry};

/// Handle to a node of a [`ResultTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One changed position.
#[derive(Clone, Debug)]
pub struct ResultNode<T> {
    ancestor: Option<T>,
    left: Option<T>,
    right: Option<T>,
    code: ChangeCode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<T> ResultNode<T> {
    pub fn ancestor(&self) -> Option<&T> {
        self.ancestor.as_ref()
    }

    pub fn left(&self) -> Option<&T> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&T> {
        self.right.as_ref()
    }

    pub fn endpoint(&self, side: Side) -> Option<&T> {
        match side {
            Side::Ancestor => self.ancestor(),
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    pub fn code(&self) -> ChangeCode {
        self.code
    }

    pub fn kind(&self) -> ChangeKind {
        self.code.kind()
    }

    pub fn direction(&self) -> Direction {
        self.code.direction()
    }

    pub fn is_conflict(&self) -> bool {
        self.code.is_conflict()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Parent-linked tree of changed positions.
#[derive(Clone, Debug)]
pub struct ResultTree<T> {
    nodes: Vec<ResultNode<T>>,
}

impl<T> Default for ResultTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultTree<T> {
    const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![ResultNode {
                ancestor: None,
                left: None,
                right: None,
                code: ChangeCode::NO_CHANGE,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The synthetic root.
    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// The first top-level position, if anything changed.
    pub fn top(&self) -> Option<NodeId> {
        self.children(Self::ROOT).first().copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&ResultNode<T>> {
        self.nodes.get(id.0)
    }

    /// Create a node under `parent` and return its handle.
    ///
    /// If `parent` is not a node of this tree the new node is created
    /// detached.
    pub fn add(
        &mut self,
        parent: NodeId,
        code: ChangeCode,
        ancestor: Option<T>,
        left: Option<T>,
        right: Option<T>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = match self.nodes.get_mut(parent.0) {
            Some(node) => {
                node.children.push(id);
                Some(parent)
            }
            None => None,
        };
        self.nodes.push(ResultNode {
            ancestor,
            left,
            right,
            code,
            parent,
            children: Vec::new(),
        });
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Replace the code of a node, for example after a caller merged it.
    pub fn set_code(&mut self, id: NodeId, code: ChangeCode) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.code = code;
        }
    }

    /// Detach `id` and its subtree from the tree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == Self::ROOT {
            return;
        }
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
        }
    }

    /// Detach `id`, then every ancestor that was left without children by
    /// the removal, stopping below the root.
    pub fn remove_to_root(&mut self, id: NodeId) {
        let mut current = id;
        loop {
            let parent = self.parent(current);
            self.remove(current);
            match parent {
                Some(p) if p != Self::ROOT && !self.has_children(p) => current = p,
                _ => break,
            }
        }
    }

    /// Returns `true` if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while current != Self::ROOT {
            match self.parent(current) {
                Some(p) => current = p,
                None => return false,
            }
        }
        true
    }

    /// Number of nodes reachable from the root, not counting the root.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_children(Self::ROOT)
    }

    /// Attached nodes below the root with their depth (top-level positions
    /// are at depth `0`), parents before children, in document order.
    pub fn walk(&self) -> Walk<'_, T> {
        let stack = self
            .children(Self::ROOT)
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();
        Walk { tree: self, stack }
    }

    /// Counts of changed leaves by kind.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for (id, _) in self.walk() {
            if !self.has_children(id) {
                summary.record(self[id].code);
            }
        }
        summary
    }
}

impl<T: Named> ResultTree<T> {
    /// Display name of a node: the left and right names, joined as
    /// `"left - right"` when they differ, else the ancestor name.
    pub fn name(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return UNKNOWN_NAME.to_string();
        };
        let left = node.left().map(Named::name);
        let right = node.right().map(Named::name);
        match (left, right) {
            (Some(l), Some(r)) if l == r => l.to_string(),
            (Some(l), Some(r)) => format!("{l} - {r}"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => node
                .ancestor()
                .map_or_else(|| UNKNOWN_NAME.to_string(), |a| a.name().to_string()),
        }
    }

    /// Names from the top-level position down to `id`.
    pub fn path(&self, id: NodeId) -> Vec<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == Self::ROOT {
                break;
            }
            names.push(self.name(node));
            current = self.parent(node);
        }
        names.reverse();
        names
    }

    /// Returns `true` if two nodes stand for the same position, that is,
    /// their paths of names are equal.
    pub fn same_position(&self, a: NodeId, b: NodeId) -> bool {
        self.path(a) == self.path(b)
    }

    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.name(c) == name)
    }

    /// Follow `path` from the root.
    pub fn find_by_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        path.iter()
            .try_fold(Self::ROOT, |node, name| self.find_child(node, name.as_ref()))
    }

    /// A serialisable snapshot of the attached tree.
    pub fn to_report(&self) -> DiffReport {
        DiffReport {
            summary: self.summary(),
            entries: self
                .children(Self::ROOT)
                .iter()
                .map(|&id| self.report_entry(id))
                .collect(),
        }
    }

    fn report_entry(&self, id: NodeId) -> ReportEntry {
        let code = self[id].code;
        ReportEntry {
            name: self.name(id),
            code,
            kind: code.kind(),
            direction: code.direction(),
            pseudo_conflict: code.is_pseudo_conflict(),
            children: self
                .children(id)
                .iter()
                .map(|&c| self.report_entry(c))
                .collect(),
        }
    }
}

const UNKNOWN_NAME: &str = "<unknown>";

impl<T> Index<NodeId> for ResultTree<T> {
    type Output = ResultNode<T>;

    fn index(&self, id: NodeId) -> &ResultNode<T> {
        &self.nodes[id.0]
    }
}

impl<T: Clone> ResultSink<T> for ResultTree<T> {
    type Context = NodeId;

    fn on_position(
        &mut self,
        parent: &NodeId,
        code: ChangeCode,
        ancestor: Option<&T>,
        left: Option<&T>,
        right: Option<&T>,
    ) -> NodeId {
        self.add(*parent, code, ancestor.cloned(), left.cloned(), right.cloned())
    }
}

/// Pre-order iterator over the attached nodes of a [`ResultTree`].
pub struct Walk<'t, T> {
    tree: &'t ResultTree<T>,
    stack: Vec<(NodeId, usize)>,
}

impl<T> Iterator for Walk<'_, T> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().map(|&c| (c, depth + 1)));
        Some((id, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    /// project (change)
    ///   src (change)
    ///     main.rs (right change)
    ///     util.rs (left addition)
    ///   README (conflicting change, pseudo)
    /// ```
    fn sample() -> (ResultTree<&'static str>, [NodeId; 5]) {
        let mut tree = ResultTree::new();
        let root = tree.root();
        let project = tree.add(root, ChangeCode::CHANGE, Some("project"), Some("project"), Some("project"));
        let src = tree.add(project, ChangeCode::CHANGE, Some("src"), Some("src"), Some("src"));
        let main = tree.add(src, ChangeCode::RIGHT | ChangeCode::CHANGE, Some("main.rs"), Some("main.rs"), Some("main.rs"));
        let util = tree.add(src, ChangeCode::LEFT | ChangeCode::ADDITION, None, Some("util.rs"), None);
        let readme = tree.add(
            project,
            ChangeCode::CONFLICTING | ChangeCode::CHANGE | ChangeCode::PSEUDO_CONFLICT,
            Some("README"),
            Some("README"),
            Some("README"),
        );
        (tree, [project, src, main, util, readme])
    }

    #[test]
    fn new_tree_is_empty() {
        let tree: ResultTree<&str> = ResultTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.top(), None);
        assert!(tree.is_attached(tree.root()));
    }

    #[test]
    fn structure_links() {
        let (tree, [project, src, main, util, readme]) = sample();
        assert_eq!(tree.top(), Some(project));
        assert_eq!(tree.parent(project), Some(tree.root()));
        assert_eq!(tree.children(project), &[src, readme]);
        assert_eq!(tree.children(src), &[main, util]);
        assert_eq!(tree.parent(util), Some(src));
        assert!(!tree.has_children(main));
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn walk_is_pre_order_with_depth() {
        let (tree, [project, src, main, util, readme]) = sample();
        let walked: Vec<(NodeId, usize)> = tree.walk().collect();
        assert_eq!(walked, vec![(project, 0), (src, 1), (main, 2), (util, 2), (readme, 1)]);
    }

    #[test]
    fn names_and_paths() {
        let (mut tree, [_, src, _, util, _]) = sample();
        assert_eq!(tree.name(util), "util.rs");
        assert_eq!(tree.path(util), vec!["project", "src", "util.rs"]);
        assert_eq!(tree.find_by_path(&["project", "src", "util.rs"]), Some(util));
        assert_eq!(tree.find_by_path(&["project", "nope"]), None);

        let renamed = tree.add(src, ChangeCode::CHANGE, None, Some("old.rs"), Some("new.rs"));
        assert_eq!(tree.name(renamed), "old.rs - new.rs");

        let gone = tree.add(src, ChangeCode::CONFLICTING | ChangeCode::DELETION, Some("gone.rs"), None, None);
        assert_eq!(tree.name(gone), "gone.rs");
        assert_eq!(tree.name(tree.root()), UNKNOWN_NAME);
    }

    #[test]
    fn identity_is_the_path_of_names() {
        let (mut tree, [project, _, main, _, _]) = sample();
        let other_src = tree.add(project, ChangeCode::CHANGE, None, Some("src"), Some("src"));
        let other_main = tree.add(other_src, ChangeCode::CHANGE, None, Some("main.rs"), Some("main.rs"));
        assert_ne!(main, other_main);
        assert!(tree.same_position(main, other_main));
        assert!(!tree.same_position(main, other_src));
    }

    #[test]
    fn remove_detaches_a_subtree() {
        let (mut tree, [project, src, main, _, readme]) = sample();
        tree.remove(src);
        assert_eq!(tree.children(project), &[readme]);
        assert!(!tree.is_attached(src));
        assert!(!tree.is_attached(main));
        assert_eq!(tree.len(), 2);

        tree.remove(tree.root());
        assert!(tree.is_attached(tree.root()));
    }

    #[test]
    fn remove_to_root_prunes_emptied_ancestors() {
        let (mut tree, [project, src, main, util, readme]) = sample();
        tree.remove_to_root(main);
        assert!(tree.is_attached(src));
        tree.remove_to_root(util);
        assert!(!tree.is_attached(src));
        assert!(tree.is_attached(project));
        tree.remove_to_root(readme);
        assert!(tree.is_empty());
    }

    #[test]
    fn set_code_marks_merged() {
        let (mut tree, [_, _, main, _, _]) = sample();
        tree.set_code(main, ChangeCode::NO_CHANGE);
        assert!(tree[main].code().is_unchanged());
    }

    #[test]
    fn summary_counts_leaves() {
        let (tree, _) = sample();
        let summary = tree.summary();
        assert_eq!(summary.changes, 2);
        assert_eq!(summary.additions, 1);
        assert_eq!(summary.deletions, 0);
        assert_eq!(summary.conflicts, 1);
        assert_eq!(summary.pseudo_conflicts, 1);
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_clean());
    }

    #[test]
    fn node_accessors() {
        let (tree, [_, _, _, util, readme]) = sample();
        let node = &tree[util];
        assert_eq!(node.endpoint(Side::Left), Some(&"util.rs"));
        assert_eq!(node.endpoint(Side::Ancestor), None);
        assert_eq!(node.kind(), ChangeKind::Addition);
        assert_eq!(node.direction(), Direction::Left);
        assert!(tree[readme].is_conflict());
        assert!(tree.get(NodeId(99)).is_none());
    }

    #[test]
    fn report_serialises_to_json() {
        let (tree, _) = sample();
        let report = tree.to_report();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].name, "project");
        assert_eq!(report.entries[0].children[0].children.len(), 2);

        let json = serde_json::to_string(&report).unwrap();
        let back: DiffReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn tree_is_a_result_sink() {
        let mut tree: ResultTree<&str> = ResultTree::new();
        let root = tree.root();
        let top = tree.on_position(&root, ChangeCode::ADDITION, None, None, Some(&"x"));
        assert_eq!(tree.top(), Some(top));
        assert_eq!(tree[top].right(), Some(&"x"));
    }
}
