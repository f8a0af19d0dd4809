//! Input events as seen by a tree item.
//!
//! These are the targeted subset of [`tuidom::Event`]: a key press or a
//! pointer activation aimed at one element.

use tuidom::{Event, Key, Modifiers, MouseButton};

// =============================================================================
// Event Result
// =============================================================================

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

// =============================================================================
// Input Events
// =============================================================================

/// A key press aimed at an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Element that had focus when the key was pressed.
    pub target: String,
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(target: impl Into<String>, key: Key) -> Self {
        Self {
            target: target.into(),
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A pointer activation of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: String,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl ClickEvent {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }
}

/// The input that caused an open change, handed to the tree context so it
/// can inspect the originating key or button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Click(ClickEvent),
}

impl InputEvent {
    pub fn target(&self) -> &str {
        match self {
            Self::Key(e) => &e.target,
            Self::Click(e) => &e.target,
        }
    }

    /// Narrow a runtime event to a targeted input event.
    ///
    /// Untargeted key presses and non-input events yield `None`.
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::Key {
                target: Some(target),
                key,
                modifiers,
            } => Some(Self::Key(KeyEvent {
                target: target.clone(),
                key: *key,
                modifiers: *modifiers,
            })),
            Event::Click {
                target: Some(target),
                button,
                modifiers,
            } => Some(Self::Click(ClickEvent {
                target: target.clone(),
                button: *button,
                modifiers: *modifiers,
            })),
            _ => None,
        }
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}

impl From<ClickEvent> for InputEvent {
    fn from(event: ClickEvent) -> Self {
        Self::Click(event)
    }
}
