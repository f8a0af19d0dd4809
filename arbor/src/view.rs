//! Tree view: renders a node model through tree items and routes input.

use std::collections::HashMap;

use tuidom::{Element, Event, Role};

use crate::context::TreeContext;
use crate::events::{EventResult, InputEvent, KeyEvent};
use crate::item::{KeyHandler, TreeItemProps, TreeItemState, use_tree_item};
use crate::store::{LevelContext, TreeStore};

// =============================================================================
// TreeNode
// =============================================================================

/// A node in the tree with a label and children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a new leaf node (no children).
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create a new branch node with children.
    pub fn branch(id: impl Into<String>, label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children,
        }
    }

    pub fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }

    /// Id of the subtree this node owns, if it has children.
    pub fn subtree_id(&self) -> Option<String> {
        self.is_branch().then(|| format!("{}-subtree", self.id))
    }
}

// =============================================================================
// TreeView
// =============================================================================

/// Renders [`TreeNode`]s as tree items and dispatches events to them.
///
/// Only each visible item's props and level are kept between renders. Items
/// are evaluated afresh against the store whenever they are rendered or
/// receive input, so a batch of events never acts on a stale open state.
#[derive(Debug)]
pub struct TreeView {
    id: String,
    roots: Vec<TreeNode>,
    key_handlers: HashMap<String, KeyHandler>,
    items: HashMap<String, (u16, TreeItemProps)>,
}

impl TreeView {
    pub fn new(id: impl Into<String>, roots: Vec<TreeNode>) -> Self {
        Self {
            id: id.into(),
            roots,
            key_handlers: HashMap::new(),
            items: HashMap::new(),
        }
    }

    /// Register a key handler that runs before an item's built-in key behavior.
    pub fn on_item_key(
        mut self,
        item_id: impl Into<String>,
        f: impl Fn(&KeyEvent) -> EventResult + Send + Sync + 'static,
    ) -> Self {
        self.key_handlers.insert(item_id.into(), KeyHandler::new(f));
        self
    }

    /// Current state of an item visible in the last render.
    pub fn item(&self, store: &TreeStore, id: &str) -> Option<TreeItemState> {
        let (level, props) = self.items.get(id)?;
        Some(use_tree_item(props, &store.context(*level)))
    }

    /// Render the visible tree and hand it to the store for focus resolution.
    pub fn render(&mut self, store: &TreeStore) -> Element {
        let focused = store.focused();

        let mut items = HashMap::new();
        let children = render_level(
            &self.roots,
            store.root_context(),
            &self.key_handlers,
            focused.as_deref(),
            &mut items,
        );
        self.items = items;

        let root = Element::div()
            .id(self.id.clone())
            .role(Role::Tree)
            .children(children);
        store.set_tree(root.clone());
        root
    }

    /// Route a targeted key press or click to the item it is aimed at.
    pub fn handle_event(&self, store: &TreeStore, event: &Event) -> EventResult {
        let Some(input) = InputEvent::from_event(event) else {
            return EventResult::Ignored;
        };
        let Some((level, props)) = self.items.get(input.target()) else {
            log::trace!("[tree_view] no item for {}", input.target());
            return EventResult::Ignored;
        };

        let ctx = store.context(*level);
        let state = use_tree_item(props, &ctx);
        match &input {
            InputEvent::Key(key) => state.on_key_down(key, &ctx),
            InputEvent::Click(click) => {
                store.focus(&click.target);
                state.on_click(click, &ctx)
            }
        }
    }
}

fn render_level(
    nodes: &[TreeNode],
    ctx: LevelContext<'_>,
    key_handlers: &HashMap<String, KeyHandler>,
    focused: Option<&str>,
    items: &mut HashMap<String, (u16, TreeItemProps)>,
) -> Vec<Element> {
    let mut elements = Vec::with_capacity(nodes.len());

    for node in nodes {
        let mut props = TreeItemProps::new(node.id.clone()).label(node.label.clone());
        if let Some(subtree) = node.subtree_id() {
            props = props.aria_owns(subtree);
        }
        if let Some(handler) = key_handlers.get(&node.id) {
            props = props.key_handler(handler.clone());
        }

        let state = use_tree_item(&props, &ctx);
        elements.push(state.root.clone().focused(focused == Some(node.id.as_str())));

        if state.open && let Some(subtree) = state.subtree_id() {
            let group = Element::div()
                .id(subtree.to_string())
                .role(Role::Group)
                .children(render_level(
                    &node.children,
                    ctx.nested(),
                    key_handlers,
                    focused,
                    items,
                ));
            elements.push(group);
        }

        items.insert(node.id.clone(), (ctx.level(), props));
    }

    elements
}
