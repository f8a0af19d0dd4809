use arbor::{
    EventResult, OpenChangeDecision, OpenChangeKind, TreeConfig, TreeError, TreeNode, TreeStore,
    TreeView,
};
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use tuidom::{Element, Event, Key, Modifiers, MouseButton, Role, find_element};

fn nodes() -> Vec<TreeNode> {
    vec![
        TreeNode::branch(
            "docs",
            "Docs",
            vec![
                TreeNode::leaf("readme", "README"),
                TreeNode::branch("guides", "Guides", vec![TreeNode::leaf("intro", "Intro")]),
            ],
        ),
        TreeNode::leaf("src", "src"),
    ]
}

fn key(target: &str, key: Key) -> Event {
    Event::Key {
        target: Some(target.to_string()),
        key,
        modifiers: Modifiers::NONE,
    }
}

fn click(target: &str) -> Event {
    Event::Click {
        target: Some(target.to_string()),
        button: MouseButton::Left,
        modifiers: Modifiers::NONE,
    }
}

fn ids(root: &Element) -> Vec<String> {
    root.content.children().iter().map(|e| e.id.clone()).collect()
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_closed_tree() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());
    let root = view.render(&store);

    assert_eq!(root.role, Some(Role::Tree));
    assert_eq!(ids(&root), vec!["docs", "src"]);

    let docs = view.item(&store, "docs").unwrap();
    assert!(!docs.is_leaf);
    assert!(!docs.open);
    assert_eq!(docs.root.aria_owns.as_deref(), Some("docs-subtree"));
    assert!(view.item(&store, "src").unwrap().is_leaf);
    assert!(view.item(&store, "readme").is_none());
}

#[test]
fn test_render_open_subtree_nests_level() {
    let store = TreeStore::new(TreeConfig::new().open("docs-subtree"));
    let mut view = TreeView::new("files", nodes());
    let root = view.render(&store);

    assert_eq!(ids(&root), vec!["docs", "docs-subtree", "src"]);
    let group = find_element(&root, "docs-subtree").unwrap();
    assert_eq!(group.role, Some(Role::Group));
    assert_eq!(ids(group), vec!["readme", "guides"]);

    assert_eq!(view.item(&store, "docs").unwrap().root.aria_level, Some(1));
    assert_eq!(view.item(&store, "readme").unwrap().root.aria_level, Some(2));
}

#[test]
fn test_render_marks_focused_item() {
    let store = TreeStore::default();
    store.focus("src");
    let mut view = TreeView::new("files", nodes());
    let root = view.render(&store);

    assert!(find_element(&root, "src").unwrap().focused);
    assert!(!find_element(&root, "docs").unwrap().focused);
}

// ============================================================================
// Keyboard Walkthrough
// ============================================================================

#[test]
fn test_keyboard_walkthrough() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());
    view.render(&store);
    store.focus("docs");

    // Right on a closed branch opens it without moving focus
    assert_eq!(view.handle_event(&store, &key("docs", Key::Right)), EventResult::Consumed);
    assert!(store.is_open("docs-subtree"));
    assert_eq!(store.focused().as_deref(), Some("docs"));

    // The next render observes the new state
    view.render(&store);
    assert!(view.item(&store, "docs").unwrap().open);

    // Right on an open branch moves into the subtree
    view.handle_event(&store, &key("docs", Key::Right));
    assert_eq!(store.focused().as_deref(), Some("readme"));
    assert!(store.is_open("docs-subtree"));

    // Left on a leaf goes back to the owner
    view.handle_event(&store, &key("readme", Key::Left));
    assert_eq!(store.focused().as_deref(), Some("docs"));

    // Left on an open branch closes it
    view.handle_event(&store, &key("docs", Key::Left));
    assert!(!store.is_open("docs-subtree"));

    // Left on a closed root-level branch has no owner to go to
    view.render(&store);
    view.handle_event(&store, &key("docs", Key::Left));
    assert_eq!(store.focused().as_deref(), Some("docs"));
    assert_eq!(store.focus_subtree_owner_item("docs"), Err(TreeError::NoOwner("docs".into())));

    let kinds: Vec<_> = store.take_requests().iter().map(|r| (r.kind, r.open)).collect();
    assert_eq!(
        kinds,
        vec![(OpenChangeKind::ArrowRight, true), (OpenChangeKind::ArrowLeft, false)]
    );
}

#[test]
fn test_enter_toggles_nested_branch() {
    let store = TreeStore::new(TreeConfig::new().open("docs-subtree"));
    let mut view = TreeView::new("files", nodes());
    view.render(&store);

    view.handle_event(&store, &key("guides", Key::Enter));
    assert!(store.is_open("guides-subtree"));

    let root = view.render(&store);
    let intro = find_element(&root, "intro").unwrap();
    assert_eq!(intro.aria_level, Some(3));

    // Left from a level-3 leaf goes to its own owner, not the root branch
    view.handle_event(&store, &key("intro", Key::Left));
    assert_eq!(store.focused().as_deref(), Some("guides"));

    view.handle_event(&store, &key("guides", Key::Enter));
    assert!(!store.is_open("guides-subtree"));
}

#[test]
fn test_focus_first_needs_rendered_subtree() {
    let store = TreeStore::new(TreeConfig::new().open("docs-subtree"));
    let mut view = TreeView::new("files", nodes());
    view.render(&store);

    // docs is open, but the tree handed to the store lacks its group
    let docs = view.item(&store, "docs").unwrap();
    assert!(docs.open);
    store.set_tree(Element::div().id("files").child(docs.root));

    assert_eq!(
        store.focus_first_subtree_item("docs"),
        Err(TreeError::SubtreeNotRendered("docs-subtree".into()))
    );
    view.handle_event(&store, &key("docs", Key::Right));
    assert_eq!(store.focused(), None);
    assert!(store.is_open("docs-subtree"));
    assert!(store.take_requests().is_empty());
}

// ============================================================================
// Events Between Renders
// ============================================================================

#[test]
fn test_enter_twice_without_render_toggles_back() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());
    view.render(&store);

    view.handle_event(&store, &key("docs", Key::Enter));
    view.handle_event(&store, &key("docs", Key::Enter));

    assert!(!store.is_open("docs-subtree"));
    let opens: Vec<_> = store.take_requests().iter().map(|r| r.open).collect();
    assert_eq!(opens, vec![true, false]);
}

#[test]
fn test_batched_terminal_events_see_current_state() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());
    view.render(&store);
    store.focus("docs");

    let enter = CrosstermEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    let events = store.process_events(&[enter.clone(), enter]);
    assert_eq!(events.len(), 2);

    for event in &events {
        assert_eq!(view.handle_event(&store, event), EventResult::Consumed);
    }
    assert!(!store.is_open("docs-subtree"));
}

#[test]
fn test_right_twice_without_render_opens_once() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());
    view.render(&store);
    store.focus("docs");

    view.handle_event(&store, &key("docs", Key::Right));
    assert!(view.item(&store, "docs").unwrap().open);

    // The second Right targets the open branch; its group is not rendered yet
    view.handle_event(&store, &key("docs", Key::Right));
    assert!(store.is_open("docs-subtree"));
    assert_eq!(store.focused().as_deref(), Some("docs"));

    let requests: Vec<_> = store.take_requests().iter().map(|r| (r.kind, r.open)).collect();
    assert_eq!(requests, vec![(OpenChangeKind::ArrowRight, true)]);
}

#[test]
fn test_click_after_click_without_render_closes() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());
    view.render(&store);

    view.handle_event(&store, &click("docs"));
    view.handle_event(&store, &click("docs"));
    assert!(store.open_subtrees().is_empty());
}

// ============================================================================
// Clicks, Vetoes and Caller Handlers
// ============================================================================

#[test]
fn test_click_toggles_and_focuses() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());
    view.render(&store);

    assert_eq!(view.handle_event(&store, &click("src")), EventResult::Ignored);
    assert_eq!(store.focused().as_deref(), Some("src"));
    assert!(store.open_subtrees().is_empty());

    assert_eq!(view.handle_event(&store, &click("docs")), EventResult::Consumed);
    assert_eq!(store.open_subtrees(), vec!["docs-subtree"]);

    view.render(&store);
    view.handle_event(&store, &click("docs"));
    assert!(store.open_subtrees().is_empty());
}

#[test]
fn test_vetoed_request_leaves_tree_closed() {
    let store = TreeStore::new(TreeConfig::new().on_open_change(|req| {
        if req.kind == OpenChangeKind::Click {
            OpenChangeDecision::Veto
        } else {
            OpenChangeDecision::Accept
        }
    }));
    let mut view = TreeView::new("files", nodes());
    view.render(&store);

    view.handle_event(&store, &click("docs"));
    assert!(!store.is_open("docs-subtree"));

    view.handle_event(&store, &key("docs", Key::Enter));
    assert!(store.is_open("docs-subtree"));
    assert_eq!(store.take_requests().len(), 2);
}

#[test]
fn test_item_key_handler_can_consume() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes()).on_item_key("docs", |event| {
        if event.key == Key::Enter {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    });
    view.render(&store);

    assert_eq!(view.handle_event(&store, &key("docs", Key::Enter)), EventResult::Consumed);
    assert!(!store.is_open("docs-subtree"));

    view.handle_event(&store, &key("docs", Key::Right));
    assert!(store.is_open("docs-subtree"));
}

#[test]
fn test_events_for_unknown_targets_are_ignored() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());
    view.render(&store);

    assert_eq!(view.handle_event(&store, &key("nope", Key::Enter)), EventResult::Ignored);
    let untargeted = Event::Key {
        target: None,
        key: Key::Enter,
        modifiers: Modifiers::NONE,
    };
    assert_eq!(view.handle_event(&store, &untargeted), EventResult::Ignored);
}

// ============================================================================
// Terminal Input
// ============================================================================

#[test]
fn test_process_events_uses_rendered_tree() {
    let store = TreeStore::default();
    let mut view = TreeView::new("files", nodes());

    let tab = CrosstermEvent::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));

    // Nothing rendered yet
    assert!(store.process_events(&[tab.clone()]).is_empty());

    view.render(&store);
    let events = store.process_events(&[tab]);
    assert_eq!(events, vec![Event::Focus { target: "docs".to_string() }]);

    let right = CrosstermEvent::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
    let events = store.process_events(&[right]);
    assert_eq!(events, vec![key("docs", Key::Right)]);

    view.handle_event(&store, &events[0]);
    assert!(store.is_open("docs-subtree"));
}
