mod content;
mod node;

pub use content::Content;
pub use node::{Element, Role, Tag};

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.content.children() {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

/// Find the ancestors of an element, outermost first.
///
/// Returns `None` if the element is not in the tree. The element itself is
/// not part of the returned chain.
pub fn find_ancestors<'a>(root: &'a Element, id: &str) -> Option<Vec<&'a Element>> {
    let mut chain = Vec::new();
    if collect_ancestors(root, id, &mut chain) {
        Some(chain)
    } else {
        None
    }
}

fn collect_ancestors<'a>(element: &'a Element, id: &str, chain: &mut Vec<&'a Element>) -> bool {
    if element.id == id {
        return true;
    }

    chain.push(element);
    for child in element.content.children() {
        if collect_ancestors(child, id, chain) {
            return true;
        }
    }
    chain.pop();

    false
}

/// Find the element whose `aria-owns` points at `owned_id`.
pub fn find_owner<'a>(root: &'a Element, owned_id: &str) -> Option<&'a Element> {
    if root.aria_owns.as_deref() == Some(owned_id) {
        return Some(root);
    }

    root.content
        .children()
        .iter()
        .find_map(|child| find_owner(child, owned_id))
}
