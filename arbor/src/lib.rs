//! Tree items: leaf/branch classification, disclosure state read from an
//! owning tree context, and keyboard/pointer input translated into open
//! requests and focus moves.

pub mod context;
pub mod events;
pub mod item;
pub mod request;
pub mod store;
pub mod view;

pub use context::TreeContext;
pub use events::{ClickEvent, EventResult, InputEvent, KeyEvent};
pub use item::{Disclosure, KeyHandler, TreeItemProps, TreeItemState, use_tree_item};
pub use request::{OpenChangeKind, OpenChangeRequest, TreeCommand};
pub use store::{LevelContext, OpenChangeDecision, TreeConfig, TreeError, TreeStore};
pub use view::{TreeNode, TreeView};

pub mod prelude {
    pub use crate::context::TreeContext;
    pub use crate::events::{EventResult, KeyEvent};
    pub use crate::item::{TreeItemProps, TreeItemState, use_tree_item};
    pub use crate::request::{OpenChangeKind, OpenChangeRequest, TreeCommand};
    pub use crate::store::{TreeConfig, TreeStore};
    pub use crate::view::{TreeNode, TreeView};

    pub use tuidom::{Element, Event, Key};
}
