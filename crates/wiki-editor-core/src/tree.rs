//! Expansion state of the page tree navigator.
//!
//! The tree is built once from server-rendered markup. Nodes live in an
//! arena and only know their children; ancestor chains are found by
//! descending from the roots. Expansion is derived state, never persisted.

/// Index of a node in a [`TreeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Page path, unique within the tree.
    pub path: String,
    pub children: Vec<NodeId>,
    /// Node has a collapsible children container.
    pub has_container: bool,
    /// Node has a toggle button.
    pub has_toggle: bool,
    pub expanded: bool,
    pub active: bool,
}

/// What a restore or toggle changed, so a host can patch only those nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeChanges {
    pub activated: Vec<NodeId>,
    pub expanded: Vec<NodeId>,
}

impl TreeChanges {
    pub fn is_empty(&self) -> bool {
        self.activated.is_empty() && self.expanded.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreeState {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as a root).
    ///
    /// `expanded` is the collapse state the markup was rendered with.
    /// Nodes without a container can never be expanded.
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        path: impl Into<String>,
        has_container: bool,
        has_toggle: bool,
        expanded: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            path: path.into(),
            children: Vec::new(),
            has_container,
            has_toggle,
            expanded: has_container && expanded,
            active: false,
        });
        match parent.and_then(|p| self.nodes.get_mut(p.0)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All nodes whose path equals `path`.
    pub fn find_by_path(&self, path: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.path == path)
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    /// The chain from a root down to `id`'s parent, root first.
    ///
    /// Found by walking containment from the roots, so it needs no parent
    /// pointers. Empty for roots and unknown ids.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        for &root in &self.roots {
            if self.descend(root, id, &mut chain) {
                chain.pop();
                return chain;
            }
        }
        Vec::new()
    }

    fn descend(&self, at: NodeId, target: NodeId, chain: &mut Vec<NodeId>) -> bool {
        chain.push(at);
        if at == target {
            return true;
        }
        for &child in &self.nodes[at.0].children {
            if self.descend(child, target, chain) {
                return true;
            }
        }
        chain.pop();
        false
    }

    /// Mark the node(s) at `current_path` active and expand the node itself
    /// plus every ancestor, whatever their previous collapse state.
    pub fn restore(&mut self, current_path: &str) -> TreeChanges {
        let mut changes = TreeChanges::default();
        if current_path.is_empty() {
            return changes;
        }

        for id in self.find_by_path(current_path) {
            self.nodes[id.0].active = true;
            changes.activated.push(id);

            let mut to_expand = self.ancestors(id);
            to_expand.push(id);
            for node_id in to_expand {
                let node = &mut self.nodes[node_id.0];
                if node.has_container && !node.expanded {
                    node.expanded = true;
                    changes.expanded.push(node_id);
                }
            }
        }

        tracing::debug!(
            current_path,
            activated = changes.activated.len(),
            expanded = changes.expanded.len(),
            "restored tree state"
        );
        changes
    }

    /// Flip one node's children visibility. Siblings and descendants keep
    /// their own state. Returns the new expansion state, or `None` when the
    /// node has nothing to collapse.
    pub fn toggle(&mut self, id: NodeId) -> Option<bool> {
        let node = self.nodes.get_mut(id.0)?;
        if !node.has_container {
            return None;
        }
        node.expanded = !node.expanded;
        Some(node.expanded)
    }

    /// Whether the node can be seen: every ancestor is expanded.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.ancestors(id).iter().all(|a| self.nodes[a.0].expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// docs
    /// ├── guides
    /// │   ├── guides/setup
    /// │   │   └── guides/setup/linux
    /// │   └── guides/faq
    /// └── api
    fn sample(collapsed: bool) -> (TreeState, [NodeId; 6]) {
        let expanded = !collapsed;
        let mut tree = TreeState::new();
        let docs = tree.add_node(None, "docs", true, true, expanded);
        let guides = tree.add_node(Some(docs), "guides", true, true, expanded);
        let setup = tree.add_node(Some(guides), "guides/setup", true, true, expanded);
        let linux = tree.add_node(Some(setup), "guides/setup/linux", false, false, false);
        let faq = tree.add_node(Some(guides), "guides/faq", true, true, false);
        let api = tree.add_node(Some(docs), "api", true, true, false);
        (tree, [docs, guides, setup, linux, faq, api])
    }

    #[test]
    fn test_ancestors_by_containment() {
        let (tree, [docs, guides, setup, linux, _, api]) = sample(true);
        assert_eq!(tree.ancestors(linux), vec![docs, guides, setup]);
        assert_eq!(tree.ancestors(api), vec![docs]);
        assert!(tree.ancestors(docs).is_empty());
    }

    #[test]
    fn test_restore_expands_all_ancestors_of_deep_leaf() {
        for collapsed in [true, false] {
            let (mut tree, [docs, guides, setup, linux, faq, api]) = sample(collapsed);
            tree.restore("guides/setup/linux");

            for id in [docs, guides, setup] {
                assert!(tree.node(id).unwrap().expanded);
            }
            assert!(tree.node(linux).unwrap().active);
            assert!(tree.is_visible(linux));
            // Unrelated branches are untouched.
            assert!(!tree.node(faq).unwrap().expanded);
            assert!(!tree.node(api).unwrap().expanded);
        }
    }

    #[test]
    fn test_restore_reports_only_changes() {
        let (mut tree, [docs, guides, setup, linux, ..]) = sample(true);
        let changes = tree.restore("guides/setup/linux");
        assert_eq!(changes.activated, vec![linux]);
        assert_eq!(changes.expanded, vec![docs, guides, setup]);

        let (mut tree, _) = sample(false);
        assert!(tree.restore("guides/setup/linux").expanded.is_empty());
    }

    #[test]
    fn test_restore_expands_active_folder_itself() {
        let (mut tree, [_, _, _, _, faq, _]) = sample(true);
        tree.restore("guides/faq");
        assert!(tree.node(faq).unwrap().expanded);
    }

    #[test]
    fn test_empty_or_unknown_path_activates_nothing() {
        let (mut tree, _) = sample(true);
        assert!(tree.restore("").is_empty());
        assert!(tree.restore("missing/page").is_empty());
    }

    #[test]
    fn test_toggle_is_local() {
        let (mut tree, [docs, guides, setup, linux, faq, _]) = sample(false);
        assert_eq!(tree.toggle(setup), Some(false));
        assert_eq!(tree.toggle(docs), Some(false));
        assert_eq!(tree.toggle(docs), Some(true));

        // Re-expanding the parent leaves the collapsed child collapsed.
        assert!(tree.node(guides).unwrap().expanded);
        assert!(!tree.node(setup).unwrap().expanded);
        assert!(!tree.node(faq).unwrap().expanded);
        assert!(!tree.is_visible(linux));
        assert_eq!(tree.toggle(linux), None);
    }
}
