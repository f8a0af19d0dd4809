use crossterm::event::{Event as CrosstermEvent, KeyEventKind};

use crate::element::Element;
use crate::event::{Event, Key, Modifiers};

/// Tracks which element is currently focused and processes events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    focused: Option<String>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the currently focused element ID.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Programmatically focus an element by ID.
    /// Returns true if focus changed.
    pub fn focus(&mut self, id: &str) -> bool {
        if self.focused.as_deref() == Some(id) {
            return false;
        }
        log::debug!("[focus] {:?} -> {}", self.focused, id);
        self.focused = Some(id.to_string());
        true
    }

    /// Clear focus.
    /// Returns true if there was something focused.
    pub fn blur(&mut self) -> bool {
        self.focused.take().is_some()
    }

    /// Focus the next element in tab order (Tab navigation).
    /// Returns the newly focused element ID if focus changed.
    pub fn focus_next(&mut self, root: &Element) -> Option<String> {
        let focusable = collect_focusable(root);
        let new_focus = match &self.focused {
            None => focusable.first()?.clone(),
            Some(current) => match focusable.iter().position(|id| id == current) {
                Some(i) => focusable[(i + 1) % focusable.len()].clone(),
                None => focusable.first()?.clone(),
            },
        };
        self.focus(&new_focus).then_some(new_focus)
    }

    /// Focus the previous element in tab order (Shift+Tab navigation).
    /// Returns the newly focused element ID if focus changed.
    pub fn focus_prev(&mut self, root: &Element) -> Option<String> {
        let focusable = collect_focusable(root);
        let new_focus = match &self.focused {
            None => focusable.last()?.clone(),
            Some(current) => match focusable.iter().position(|id| id == current) {
                Some(0) | None => focusable.last()?.clone(),
                Some(i) => focusable[i - 1].clone(),
            },
        };
        self.focus(&new_focus).then_some(new_focus)
    }

    /// Process raw crossterm events and produce high-level events.
    ///
    /// Tab/BackTab move focus through the tab order and Escape clears focus.
    /// Every other key press is emitted as a key event targeted at the
    /// focused element. Mouse input is not translated here since it needs
    /// layout information to find a target.
    pub fn process_events(&mut self, raw: &[CrosstermEvent], root: &Element) -> Vec<Event> {
        let mut events = Vec::new();

        for raw_event in raw {
            match raw_event {
                CrosstermEvent::Key(key_event) => {
                    // Only process key press events (not release/repeat on some terminals)
                    if key_event.kind != KeyEventKind::Press {
                        continue;
                    }

                    let key: Key = key_event.code.into();
                    let modifiers: Modifiers = key_event.modifiers.into();

                    if matches!(key, Key::Tab | Key::BackTab) {
                        let step: fn(&mut Self, &Element) -> Option<String> = if key == Key::Tab {
                            Self::focus_next
                        } else {
                            Self::focus_prev
                        };
                        self.navigate(root, &mut events, step);
                        continue;
                    }

                    // Escape blurs focused element; only emits key event if nothing focused
                    if key == Key::Escape {
                        if let Some(old) = self.focused.take() {
                            events.push(Event::Blur {
                                target: old,
                                new_target: None,
                            });
                            continue;
                        }
                    }

                    events.push(Event::Key {
                        target: self.focused.clone(),
                        key,
                        modifiers,
                    });
                }

                CrosstermEvent::Resize(width, height) => {
                    events.push(Event::Resize {
                        width: *width,
                        height: *height,
                    });
                }

                _ => {}
            }
        }

        events
    }

    fn navigate(
        &mut self,
        root: &Element,
        events: &mut Vec<Event>,
        step: fn(&mut Self, &Element) -> Option<String>,
    ) {
        let old = self.focused.clone();
        if let Some(new) = step(self, root) {
            if let Some(old) = old {
                events.push(Event::Blur {
                    target: old,
                    new_target: Some(new.clone()),
                });
            }
            events.push(Event::Focus { target: new });
        }
    }
}

/// Collect the IDs of all elements in tab order, in tree order.
pub fn collect_focusable(element: &Element) -> Vec<String> {
    let mut result = Vec::new();
    collect_focusable_recursive(element, &mut result);
    result
}

fn collect_focusable_recursive(element: &Element, result: &mut Vec<String>) {
    if element.in_tab_order() {
        result.push(element.id.clone());
    }
    for child in element.content.children() {
        collect_focusable_recursive(child, result);
    }
}
