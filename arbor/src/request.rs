//! Commands a tree item sends to its owning context.

use crate::events::InputEvent;

/// What triggered an open change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenChangeKind {
    Click,
    ArrowRight,
    ArrowLeft,
    Enter,
}

/// Ask the tree context to open or close a subtree.
///
/// The context decides whether to honor it; the item never observes the
/// outcome except through the open state of its next evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenChangeRequest {
    /// The input that caused the request.
    pub event: InputEvent,
    /// Desired state of the subtree.
    pub open: bool,
    pub kind: OpenChangeKind,
    /// Subtree identifier (the item's `aria-owns`).
    pub id: String,
}

/// One-way message from a tree item to its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeCommand {
    OpenChange(OpenChangeRequest),
    /// Move focus to the first item of the subtree owned by `from`.
    FocusFirstSubtreeItem { from: String },
    /// Move focus to the item owning the subtree that contains `from`.
    FocusSubtreeOwnerItem { from: String },
}
