//! The tree item controller.
//!
//! A tree item owns no state. Every evaluation reads the props and the tree
//! context and derives whether the item is a branch, whether it is open, and
//! the element it renders as. Input handlers live on the evaluated state and
//! turn clicks and key presses into at most one [`TreeCommand`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tuidom::{Content, Element, Key, Role, Tag};

use crate::context::TreeContext;
use crate::events::{ClickEvent, EventResult, KeyEvent};
use crate::request::{OpenChangeKind, OpenChangeRequest, TreeCommand};

/// Attributes the controller sets itself; passthrough values for these are dropped.
const RESERVED_ATTRS: &[&str] = &["tabindex", "role", "aria-owns", "aria-level", "aria-expanded"];

// =============================================================================
// KeyHandler
// =============================================================================

/// Caller-supplied key handler, run before the built-in key behavior.
///
/// Returning [`EventResult::Consumed`] stops the built-in behavior for that
/// key press.
#[derive(Clone)]
pub struct KeyHandler(Arc<dyn Fn(&KeyEvent) -> EventResult + Send + Sync>);

impl KeyHandler {
    pub fn new(f: impl Fn(&KeyEvent) -> EventResult + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, event: &KeyEvent) -> EventResult {
        (self.0)(event)
    }
}

impl fmt::Debug for KeyHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHandler(..)")
    }
}

impl PartialEq for KeyHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for KeyHandler {}

// =============================================================================
// TreeItemProps
// =============================================================================

/// Inputs to a tree item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItemProps {
    /// Id of the rendered root element.
    pub id: String,
    /// Identifier of the owned subtree. Present only on branches.
    pub aria_owns: Option<String>,
    /// Element type to render as.
    pub tag: Tag,
    pub on_key_down: Option<KeyHandler>,
    /// Passthrough attributes.
    pub attrs: BTreeMap<String, String>,
    pub content: Content,
}

impl TreeItemProps {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            aria_owns: None,
            tag: Tag::Div,
            on_key_down: None,
            attrs: BTreeMap::new(),
            content: Content::None,
        }
    }

    pub fn aria_owns(mut self, subtree: impl Into<String>) -> Self {
        self.aria_owns = Some(subtree.into());
        self
    }

    /// Render as the given element type.
    pub fn as_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    pub fn on_key_down(
        mut self,
        f: impl Fn(&KeyEvent) -> EventResult + Send + Sync + 'static,
    ) -> Self {
        self.on_key_down = Some(KeyHandler::new(f));
        self
    }

    pub fn key_handler(mut self, handler: KeyHandler) -> Self {
        self.on_key_down = Some(handler);
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn label(self, text: impl Into<String>) -> Self {
        self.content(Content::Text(text.into()))
    }
}

// =============================================================================
// Disclosure
// =============================================================================

/// Where an item stands with respect to its subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disclosure<'a> {
    Leaf,
    /// Branch whose subtree is closed.
    Collapsed(&'a str),
    /// Branch whose subtree is open.
    Expanded(&'a str),
}

// =============================================================================
// TreeItemState
// =============================================================================

/// The result of evaluating a tree item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItemState {
    pub is_leaf: bool,
    /// True only for branches whose subtree the context reports open.
    pub open: bool,
    /// Element descriptor for the item.
    pub root: Element,
    on_key_down: Option<KeyHandler>,
}

/// Evaluate a tree item against its context.
pub fn use_tree_item(props: &TreeItemProps, ctx: &dyn TreeContext) -> TreeItemState {
    TreeItemState::evaluate(props, ctx)
}

impl TreeItemState {
    pub fn evaluate(props: &TreeItemProps, ctx: &dyn TreeContext) -> Self {
        let is_branch = props.aria_owns.is_some();
        let open = props
            .aria_owns
            .as_deref()
            .is_some_and(|subtree| ctx.is_subtree_open(subtree));

        let passthrough = props
            .attrs
            .iter()
            .filter(|(key, _)| !RESERVED_ATTRS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()));

        // aria-expanded is left off: focus navigation misbehaves when it is set.
        let mut root = Element::new(props.tag.clone())
            .id(props.id.clone())
            .attrs(passthrough)
            .content(props.content.clone())
            .tab_index(0)
            .aria_level(ctx.level())
            .role(Role::TreeItem)
            .focusable(true)
            .clickable(true);
        if let Some(subtree) = &props.aria_owns {
            root = root.aria_owns(subtree.clone());
        }

        Self {
            is_leaf: !is_branch,
            open,
            root,
            on_key_down: props.on_key_down.clone(),
        }
    }

    /// Identifier of the owned subtree, for branches.
    pub fn subtree_id(&self) -> Option<&str> {
        self.root.aria_owns.as_deref()
    }

    pub fn disclosure(&self) -> Disclosure<'_> {
        match (self.subtree_id(), self.open) {
            (None, _) => Disclosure::Leaf,
            (Some(subtree), false) => Disclosure::Collapsed(subtree),
            (Some(subtree), true) => Disclosure::Expanded(subtree),
        }
    }

    /// Pointer activation: branches toggle, leaves ignore it.
    pub fn on_click(&self, event: &ClickEvent, ctx: &dyn TreeContext) -> EventResult {
        let Some(subtree) = self.subtree_id() else {
            return EventResult::Ignored;
        };

        let request = OpenChangeRequest {
            event: event.clone().into(),
            open: !self.open,
            kind: OpenChangeKind::Click,
            id: subtree.to_string(),
        };
        log::debug!("[tree_item] {} click -> open={}", self.root.id, request.open);
        ctx.request_open_change(request);
        EventResult::Consumed
    }

    /// Key press: the caller's handler runs first and may consume the key;
    /// otherwise Enter, Right and Left drive the built-in behavior.
    pub fn on_key_down(&self, event: &KeyEvent, ctx: &dyn TreeContext) -> EventResult {
        if let Some(handler) = &self.on_key_down
            && handler.call(event).is_handled()
        {
            log::trace!("[tree_item] {} {:?} consumed by caller", self.root.id, event.key);
            return EventResult::Consumed;
        }

        match self.key_command(event) {
            Some(command) => {
                log::debug!("[tree_item] {} {:?} -> {:?}", self.root.id, event.key, command);
                ctx.dispatch(command);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    /// The command a key press maps to, if any.
    ///
    /// One arm per key and disclosure, so a key press yields at most one command.
    pub fn key_command(&self, event: &KeyEvent) -> Option<TreeCommand> {
        let request = |open: bool, kind: OpenChangeKind, subtree: &str| {
            TreeCommand::OpenChange(OpenChangeRequest {
                event: event.clone().into(),
                open,
                kind,
                id: subtree.to_string(),
            })
        };
        let from = || self.root.id.clone();

        match (event.key, self.disclosure()) {
            (Key::Enter, Disclosure::Leaf) => None,
            (Key::Enter, Disclosure::Collapsed(subtree)) => {
                Some(request(true, OpenChangeKind::Enter, subtree))
            }
            (Key::Enter, Disclosure::Expanded(subtree)) => {
                Some(request(false, OpenChangeKind::Enter, subtree))
            }

            (Key::Right, Disclosure::Leaf) => None,
            (Key::Right, Disclosure::Collapsed(subtree)) => {
                Some(request(true, OpenChangeKind::ArrowRight, subtree))
            }
            (Key::Right, Disclosure::Expanded(_)) => {
                Some(TreeCommand::FocusFirstSubtreeItem { from: from() })
            }

            (Key::Left, Disclosure::Leaf | Disclosure::Collapsed(_)) => {
                Some(TreeCommand::FocusSubtreeOwnerItem { from: from() })
            }
            (Key::Left, Disclosure::Expanded(subtree)) => {
                Some(request(false, OpenChangeKind::ArrowLeft, subtree))
            }

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use super::*;

    struct Ctx {
        open: HashSet<String>,
        sent: RefCell<Vec<TreeCommand>>,
    }

    impl TreeContext for Ctx {
        fn level(&self) -> u16 {
            3
        }

        fn is_subtree_open(&self, id: &str) -> bool {
            self.open.contains(id)
        }

        fn dispatch(&self, command: TreeCommand) {
            self.sent.borrow_mut().push(command);
        }
    }

    fn ctx(open: &[&str]) -> Ctx {
        Ctx {
            open: open.iter().map(|s| s.to_string()).collect(),
            sent: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_disclosure_follows_context() {
        let props = TreeItemProps::new("a").aria_owns("a-sub");

        let closed = use_tree_item(&props, &ctx(&[]));
        assert_eq!(closed.disclosure(), Disclosure::Collapsed("a-sub"));

        let opened = use_tree_item(&props, &ctx(&["a-sub"]));
        assert_eq!(opened.disclosure(), Disclosure::Expanded("a-sub"));

        let leaf = use_tree_item(&TreeItemProps::new("b"), &ctx(&["a-sub"]));
        assert_eq!(leaf.disclosure(), Disclosure::Leaf);
    }

    #[test]
    fn test_key_command_is_pure() {
        let ctx = ctx(&[]);
        let state = use_tree_item(&TreeItemProps::new("a").aria_owns("a-sub"), &ctx);
        let event = KeyEvent::new("a", Key::Right);

        assert_eq!(state.key_command(&event), state.key_command(&event));
        assert!(ctx.sent.borrow().is_empty());
    }

    #[test]
    fn test_level_comes_from_context() {
        let state = use_tree_item(&TreeItemProps::new("a"), &ctx(&[]));
        assert_eq!(state.root.aria_level, Some(3));
    }
}
