use super::{breadcrumb, draw, tree_prefix};
use crate::config::Config;
use crate::fold::{self, FoldOptions};
use crate::formats::markdown::MarkdownFormat;
use crate::input::parse_page;
use crate::outline::Outline;
use ratatui::{backend::TestBackend, Terminal};

fn outline() -> Outline {
    let config = Config::default();
    let source = "## Design\n\n### Wiring\n\n#### Relays\n\n### Frame\n\n## Results\n";
    let mut doc = parse_page(source, &MarkdownFormat, &config).unwrap();
    let region = fold::locate_region(&doc);
    let options = FoldOptions::new(["overview"], &[2, 3, 4]);
    let plan = fold::fold(&mut doc, region, &options);
    Outline::new("robot.md", &plan)
}

#[test]
fn test_tree_prefix() {
    assert_eq!(tree_prefix(0, true, &[]), "");
    assert_eq!(tree_prefix(1, false, &[]), "├── ");
    assert_eq!(tree_prefix(2, true, &[true]), "│   └── ");
    assert_eq!(tree_prefix(2, false, &[false]), "    ├── ");
}

#[test]
fn test_breadcrumb_follows_parents() {
    let mut o = outline();
    assert_eq!(breadcrumb(&o), "Design");
    o.select_next();
    o.toggle();
    o.select_next();
    assert_eq!(breadcrumb(&o), "Design > Wiring > Relays");
}

#[test]
fn test_draw_renders_visible_sections() {
    let o = outline();
    let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
    terminal.draw(|f| draw(f, &o)).unwrap();

    let buffer = terminal.backend().buffer().clone();
    let text: String = buffer
        .content()
        .iter()
        .map(ratatui::buffer::Cell::symbol)
        .collect();
    assert!(text.contains("robot.md"));
    assert!(text.contains("Design"));
    assert!(text.contains("Wiring"));
    assert!(text.contains("Frame"));
    assert!(!text.contains("Relays"), "closed sections hide children");
}
