use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Element type the descriptor is rendered as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Generic container.
    #[default]
    Div,
    Span,
    Li,
    Custom(String),
}

impl Tag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Div => "div",
            Self::Span => "span",
            Self::Li => "li",
            Self::Custom(name) => name,
        }
    }
}

/// Accessibility role hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Tree,
    TreeItem,
    Group,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::TreeItem => "treeitem",
            Self::Group => "group",
        }
    }
}

/// An abstract element descriptor.
///
/// Descriptors are plain data: two elements built from the same inputs
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: Tag,

    // Content
    pub content: Content,

    // Accessibility hints
    pub role: Option<Role>,
    /// Sequential focus order. `Some(0)` participates in Tab navigation,
    /// negative values are focusable only programmatically.
    pub tab_index: Option<i32>,
    pub aria_owns: Option<String>,
    pub aria_level: Option<u16>,

    // Interaction
    pub focusable: bool,
    pub clickable: bool,

    // State (focused is set by runtime enrichment, disabled is set by user/widgets)
    /// Whether this element is currently focused. Set by runtime enrichment, not by user.
    pub focused: bool,
    /// Whether this element is disabled. Disabled elements don't receive input.
    pub disabled: bool,

    /// Passthrough attributes, rendered verbatim.
    pub attrs: BTreeMap<String, String>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            tag: Tag::Div,
            content: Content::None,
            role: None,
            tab_index: None,
            aria_owns: None,
            aria_level: None,
            focusable: false,
            clickable: false,
            focused: false,
            disabled: false,
            attrs: BTreeMap::new(),
        }
    }
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            id: generate_id(tag.as_str()),
            tag,
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new(Tag::Div)
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: generate_id("text"),
            tag: Tag::Span,
            content: Content::Text(content.into()),
            ..Default::default()
        }
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    pub fn content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    // Accessibility
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn aria_owns(mut self, owns: impl Into<String>) -> Self {
        self.aria_owns = Some(owns.into());
        self
    }

    pub fn aria_level(mut self, level: u16) -> Self {
        self.aria_level = Some(level);
        self
    }

    // Interaction
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    // State
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Whether Tab navigation may land on this element.
    pub fn in_tab_order(&self) -> bool {
        self.focusable && !self.disabled && self.tab_index.is_none_or(|index| index >= 0)
    }

    // Attributes
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn attrs(mut self, attrs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn get_attr(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }
}
