//! Page tree navigator bound to `[data-tree-node]` markup.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use web_sys::{Document, Element};

use wiki_editor_core::{NodeId, TreeState};

use crate::dom::{current_path, own_descendant, query_all, set_classes};

const NODE: &str = "[data-tree-node]";

/// The elements belonging to one tree node.
#[derive(Debug, Clone)]
struct NodeElements {
    id: NodeId,
    node: Element,
    link: Option<Element>,
    container: Option<Element>,
    toggle: Option<Element>,
}

impl NodeElements {
    fn render(&self, expanded: bool, active: bool) {
        if active {
            if let Some(link) = &self.link {
                set_classes(link, &["is-active"], true);
            }
        }
        if let Some(container) = &self.container {
            set_classes(container, &["hidden"], !expanded);
        }
        if let Some(toggle) = &self.toggle {
            let _ = toggle.set_attribute("aria-expanded", if expanded { "true" } else { "false" });
            if let Ok(Some(icon)) = toggle.query_selector("[data-icon]") {
                set_classes(&icon, &["rotate-90"], expanded);
            }
        }
    }
}

struct Tree {
    state: TreeState,
    elements: Vec<NodeElements>,
}

impl Tree {
    fn build(document: &Document) -> Self {
        let mut state = TreeState::new();
        let mut elements: Vec<NodeElements> = Vec::new();

        // Document order puts every parent before its children.
        for node in query_all(document, NODE) {
            let parent = node
                .parent_element()
                .and_then(|p| p.closest(NODE).ok().flatten())
                .and_then(|p| elements.iter().find(|e| e.node == p))
                .map(|e| e.id);

            let link = own_descendant(&node, "[data-tree-link]", NODE);
            let container = own_descendant(&node, "[data-tree-children]", NODE);
            let toggle = own_descendant(&node, "[data-tree-toggle]", NODE);
            let path = link
                .as_ref()
                .and_then(|l| l.get_attribute("data-path"))
                .unwrap_or_default();
            let expanded = container
                .as_ref()
                .is_some_and(|c| !c.class_list().contains("hidden"));

            let id = state.add_node(parent, path, container.is_some(), toggle.is_some(), expanded);
            elements.push(NodeElements {
                id,
                node,
                link,
                container,
                toggle,
            });
        }

        Self { state, elements }
    }

    fn render(&self, id: NodeId) {
        if let (Some(node), Some(elements)) = (self.state.node(id), self.elements.get(id.index())) {
            elements.render(node.expanded, node.active);
        }
    }
}

/// A bound tree navigator. Dropping it unbinds the toggles.
pub struct TreeView {
    tree: Rc<RefCell<Tree>>,
    _listeners: Vec<EventListener>,
}

impl TreeView {
    /// Build the tree from the page, restore it for `body[data-current-path]`,
    /// and bind the toggles. `None` when the page has no tree.
    pub fn attach(document: &Document) -> Option<Self> {
        let tree = Tree::build(document);
        if tree.state.is_empty() {
            tracing::debug!("no tree on this page");
            return None;
        }

        let path = current_path(document);
        let tree = Rc::new(RefCell::new(tree));
        {
            let mut t = tree.borrow_mut();
            let changes = t.state.restore(&path);
            for id in changes.activated.iter().chain(&changes.expanded) {
                t.render(*id);
            }
        }

        let mut listeners = Vec::new();
        let toggles: Vec<(NodeId, Element)> = tree
            .borrow()
            .elements
            .iter()
            .filter_map(|e| e.toggle.clone().map(|t| (e.id, t)))
            .collect();
        for (id, toggle) in toggles {
            let tree = Rc::clone(&tree);
            listeners.push(EventListener::new(&toggle, "click", move |_| {
                let mut t = tree.borrow_mut();
                if t.state.toggle(id).is_some() {
                    t.render(id);
                }
            }));
        }

        Some(Self {
            tree,
            _listeners: listeners,
        })
    }

    pub fn state(&self) -> std::cell::Ref<'_, TreeState> {
        std::cell::Ref::map(self.tree.borrow(), |t| &t.state)
    }
}
