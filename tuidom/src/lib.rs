pub mod element;
pub mod event;
pub mod focus;

pub use element::{find_ancestors, find_element, find_owner, Content, Element, Role, Tag};
pub use event::{Event, Key, Modifiers, MouseButton};
pub use focus::{collect_focusable, FocusState};
