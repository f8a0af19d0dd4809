//! The boundary between a tree item and the tree that owns it.

use crate::request::{OpenChangeRequest, TreeCommand};

/// State and entry points a tree provides to each of its items.
///
/// The open-subtree set and the level belong to the tree; items only read
/// them. All mutation goes through [`TreeContext::dispatch`], which is
/// fire-and-forget: items never wait for or inspect the outcome.
///
/// Items evaluated against a context assume it describes the tree they are
/// rendered in. A context that answers for a different tree is a caller
/// error, not something items guard against.
pub trait TreeContext {
    /// Depth of the items this context serves, 1 for the root level.
    fn level(&self) -> u16;

    /// Whether the subtree with this identifier is open.
    fn is_subtree_open(&self, id: &str) -> bool;

    /// Deliver a command to the tree.
    fn dispatch(&self, command: TreeCommand);

    fn request_open_change(&self, request: OpenChangeRequest) {
        self.dispatch(TreeCommand::OpenChange(request));
    }

    fn focus_first_subtree_item(&self, current: &str) {
        self.dispatch(TreeCommand::FocusFirstSubtreeItem {
            from: current.to_string(),
        });
    }

    fn focus_subtree_owner_item(&self, current: &str) {
        self.dispatch(TreeCommand::FocusSubtreeOwnerItem {
            from: current.to_string(),
        });
    }
}
