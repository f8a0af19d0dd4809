//! A tree context that owns open subtrees and focus.
//!
//! `TreeStore` is the state a tree shares with all of its items: the set of
//! open subtree ids, the focused element, and the element tree from the
//! last render (used to resolve focus moves). Items talk to it through a
//! [`LevelContext`], which adds the level they are rendered at.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, RwLock};

use crossterm::event::Event as CrosstermEvent;
use thiserror::Error;
use tuidom::{
    Element, Event, FocusState, Role, collect_focusable, find_ancestors, find_element, find_owner,
};

use crate::context::TreeContext;
use crate::request::{OpenChangeRequest, TreeCommand};

// =============================================================================
// Configuration
// =============================================================================

/// Whether an open change request is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenChangeDecision {
    #[default]
    Accept,
    Veto,
}

type OpenChangeCallback = Arc<dyn Fn(&OpenChangeRequest) -> OpenChangeDecision + Send + Sync>;

/// Tree configuration.
#[derive(Clone)]
pub struct TreeConfig {
    /// Level of the root items.
    pub root_level: u16,
    /// Subtrees open when the store is created.
    pub default_open: Vec<String>,
    on_open_change: Option<OpenChangeCallback>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_level: 1,
            default_open: Vec::new(),
            on_open_change: None,
        }
    }
}

impl fmt::Debug for TreeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeConfig")
            .field("root_level", &self.root_level)
            .field("default_open", &self.default_open)
            .field("on_open_change", &self.on_open_change.is_some())
            .finish()
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level of the root items.
    pub fn root_level(mut self, level: u16) -> Self {
        self.root_level = level;
        self
    }

    /// Open a subtree initially.
    pub fn open(mut self, subtree: impl Into<String>) -> Self {
        self.default_open.push(subtree.into());
        self
    }

    /// Decide on every open change before it is applied.
    pub fn on_open_change(
        mut self,
        f: impl Fn(&OpenChangeRequest) -> OpenChangeDecision + Send + Sync + 'static,
    ) -> Self {
        self.on_open_change = Some(Arc::new(f));
        self
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Reasons a focus move cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("tree has not been rendered yet")]
    NotRendered,

    #[error("element not found: {0}")]
    UnknownElement(String),

    #[error("element {0} does not own a subtree")]
    NotABranch(String),

    #[error("subtree {0} is not rendered")]
    SubtreeNotRendered(String),

    #[error("subtree {0} has no focusable items")]
    EmptySubtree(String),

    #[error("element {0} is not inside an owned subtree")]
    NoOwner(String),

    #[error("tree state lock poisoned")]
    Poisoned,
}

// =============================================================================
// TreeStore
// =============================================================================

#[derive(Debug, Default)]
struct StoreInner {
    open: BTreeSet<String>,
    focus: FocusState,
    tree: Option<Element>,
    requests: Vec<OpenChangeRequest>,
}

/// Shared tree state. Clones share the same state.
#[derive(Debug, Clone)]
pub struct TreeStore {
    config: TreeConfig,
    inner: Arc<RwLock<StoreInner>>,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl TreeStore {
    pub fn new(config: TreeConfig) -> Self {
        let inner = StoreInner {
            open: config.default_open.iter().cloned().collect(),
            ..Default::default()
        };
        Self {
            config,
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Context for items rendered at `level`.
    pub fn context(&self, level: u16) -> LevelContext<'_> {
        LevelContext { store: self, level }
    }

    /// Context for the root items.
    pub fn root_context(&self) -> LevelContext<'_> {
        self.context(self.config.root_level)
    }

    // -------------------------------------------------------------------------
    // Open subtrees
    // -------------------------------------------------------------------------

    pub fn is_open(&self, subtree: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.open.contains(subtree))
            .unwrap_or(false)
    }

    /// Open subtree ids, sorted.
    pub fn open_subtrees(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.open.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Set a subtree's state directly, bypassing the open change callback.
    /// Returns true if the state changed.
    pub fn set_open(&self, subtree: &str, open: bool) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if open {
            guard.open.insert(subtree.to_string())
        } else {
            guard.open.remove(subtree)
        }
    }

    /// Drain the log of open change requests received, including vetoed ones.
    pub fn take_requests(&self) -> Vec<OpenChangeRequest> {
        self.inner
            .write()
            .map(|mut g| std::mem::take(&mut g.requests))
            .unwrap_or_default()
    }

    fn handle_open_change(&self, request: OpenChangeRequest) {
        let decision = self
            .config
            .on_open_change
            .as_ref()
            .map(|f| f(&request))
            .unwrap_or_default();

        let Ok(mut guard) = self.inner.write() else {
            log::warn!("[tree] dropping open change for {}: lock poisoned", request.id);
            return;
        };

        if decision == OpenChangeDecision::Accept {
            let changed = if request.open {
                guard.open.insert(request.id.clone())
            } else {
                guard.open.remove(&request.id)
            };
            log::debug!(
                "[tree] {:?} {} open={} changed={}",
                request.kind,
                request.id,
                request.open,
                changed
            );
        } else {
            log::debug!("[tree] {:?} {} vetoed", request.kind, request.id);
        }
        guard.requests.push(request);
    }

    // -------------------------------------------------------------------------
    // Rendered tree and focus
    // -------------------------------------------------------------------------

    /// Record the element tree focus moves are resolved against.
    pub fn set_tree(&self, tree: Element) {
        if let Ok(mut guard) = self.inner.write() {
            guard.tree = Some(tree);
        }
    }

    pub fn focused(&self) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.focus.focused().map(str::to_string))
    }

    /// Focus an element. Returns true if focus changed.
    pub fn focus(&self, id: &str) -> bool {
        self.inner
            .write()
            .map(|mut g| g.focus.focus(id))
            .unwrap_or(false)
    }

    /// Translate raw terminal input into events against the rendered tree.
    pub fn process_events(&self, raw: &[CrosstermEvent]) -> Vec<Event> {
        let Ok(mut guard) = self.inner.write() else {
            return Vec::new();
        };
        let StoreInner { focus, tree, .. } = &mut *guard;
        match tree {
            Some(tree) => focus.process_events(raw, tree),
            None => Vec::new(),
        }
    }

    /// Focus the first item of the subtree owned by `from`.
    /// Returns the newly focused id.
    pub fn focus_first_subtree_item(&self, from: &str) -> Result<String, TreeError> {
        let target = {
            let guard = self.inner.read().map_err(|_| TreeError::Poisoned)?;
            let tree = guard.tree.as_ref().ok_or(TreeError::NotRendered)?;
            let item =
                find_element(tree, from).ok_or_else(|| TreeError::UnknownElement(from.to_string()))?;
            let subtree = item
                .aria_owns
                .as_deref()
                .ok_or_else(|| TreeError::NotABranch(from.to_string()))?;
            let group = find_element(tree, subtree)
                .ok_or_else(|| TreeError::SubtreeNotRendered(subtree.to_string()))?;
            collect_focusable(group)
                .into_iter()
                .next()
                .ok_or_else(|| TreeError::EmptySubtree(subtree.to_string()))?
        };
        self.focus_resolved(target)
    }

    /// Focus the item owning the subtree that contains `from`.
    /// Returns the newly focused id.
    pub fn focus_subtree_owner_item(&self, from: &str) -> Result<String, TreeError> {
        let target = {
            let guard = self.inner.read().map_err(|_| TreeError::Poisoned)?;
            let tree = guard.tree.as_ref().ok_or(TreeError::NotRendered)?;
            let ancestors = find_ancestors(tree, from)
                .ok_or_else(|| TreeError::UnknownElement(from.to_string()))?;
            ancestors
                .iter()
                .rev()
                .filter(|el| el.role == Some(Role::Group))
                .find_map(|group| find_owner(tree, &group.id))
                .map(|owner| owner.id.clone())
                .ok_or_else(|| TreeError::NoOwner(from.to_string()))?
        };
        self.focus_resolved(target)
    }

    fn focus_resolved(&self, target: String) -> Result<String, TreeError> {
        let mut guard = self.inner.write().map_err(|_| TreeError::Poisoned)?;
        guard.focus.focus(&target);
        Ok(target)
    }

    /// Apply a command from a tree item.
    pub fn apply(&self, command: TreeCommand) {
        match command {
            TreeCommand::OpenChange(request) => self.handle_open_change(request),
            TreeCommand::FocusFirstSubtreeItem { from } => {
                if let Err(err) = self.focus_first_subtree_item(&from) {
                    log::warn!("[tree] focus first subtree item from {from}: {err}");
                }
            }
            TreeCommand::FocusSubtreeOwnerItem { from } => {
                // Root-level items have no owner; moving left from them does nothing.
                if let Err(err) = self.focus_subtree_owner_item(&from) {
                    log::debug!("[tree] focus subtree owner from {from}: {err}");
                }
            }
        }
    }
}

// =============================================================================
// LevelContext
// =============================================================================

/// A [`TreeStore`] seen from items at one level.
#[derive(Debug, Clone, Copy)]
pub struct LevelContext<'a> {
    store: &'a TreeStore,
    level: u16,
}

impl LevelContext<'_> {
    /// Context for the items of a subtree opened at this level.
    pub fn nested(&self) -> Self {
        Self {
            store: self.store,
            level: self.level.saturating_add(1),
        }
    }
}

impl TreeContext for LevelContext<'_> {
    fn level(&self) -> u16 {
        self.level
    }

    fn is_subtree_open(&self, id: &str) -> bool {
        self.store.is_open(id)
    }

    fn dispatch(&self, command: TreeCommand) {
        self.store.apply(command);
    }
}
