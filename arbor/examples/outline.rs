use std::fs::File;
use std::io::{self, Write};

use arbor::{TreeNode, TreeStore, TreeView};
use crossterm::cursor::MoveTo;
use crossterm::event::read;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use simplelog::{Config, LevelFilter, WriteLogger};
use tuidom::{Element, Event, Key, Role};

fn main() -> io::Result<()> {
    // Set up file logging
    let log_file = File::create("outline.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let store = TreeStore::default();
    let mut view = TreeView::new("outline", nodes());

    terminal::enable_raw_mode()?;
    let result = run(&store, &mut view);
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    result
}

fn run(store: &TreeStore, view: &mut TreeView) -> io::Result<()> {
    let mut out = io::stdout();

    loop {
        let root = view.render(store);
        draw(&mut out, &root, store)?;

        let raw = read()?;
        for event in store.process_events(&[raw]) {
            if let Event::Key {
                key: Key::Char('q'), ..
            } = &event
            {
                return Ok(());
            }
            view.handle_event(store, &event);
        }
    }
}

fn draw(out: &mut impl Write, root: &Element, store: &TreeStore) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    write!(out, "Tab/Shift+Tab move, Enter/Left/Right open and close, q quits\r\n\r\n")?;

    let mut lines = Vec::new();
    outline(root, store, &mut lines);
    for line in lines {
        write!(out, "{line}\r\n")?;
    }
    out.flush()
}

fn outline(element: &Element, store: &TreeStore, lines: &mut Vec<String>) {
    if element.role == Some(Role::TreeItem) {
        let depth = element.aria_level.unwrap_or(1).saturating_sub(1) as usize;
        let marker = match &element.aria_owns {
            Some(subtree) if store.is_open(subtree) => "▾",
            Some(_) => "▸",
            None => " ",
        };
        let cursor = if element.focused { ">" } else { " " };
        let label = element.content.text().unwrap_or_default();
        lines.push(format!("{cursor} {}{marker} {label}", "  ".repeat(depth)));
    }

    for child in element.content.children() {
        outline(child, store, lines);
    }
}

fn nodes() -> Vec<TreeNode> {
    vec![
        TreeNode::branch(
            "fruit",
            "Fruit",
            vec![
                TreeNode::leaf("apple", "Apple"),
                TreeNode::branch(
                    "citrus",
                    "Citrus",
                    vec![TreeNode::leaf("lemon", "Lemon"), TreeNode::leaf("lime", "Lime")],
                ),
            ],
        ),
        TreeNode::branch(
            "vegetables",
            "Vegetables",
            vec![TreeNode::leaf("carrot", "Carrot"), TreeNode::leaf("leek", "Leek")],
        ),
        TreeNode::leaf("bread", "Bread"),
    ]
}
