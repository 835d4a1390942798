//! The UI renders a page outline into the terminal.
//!
//! The outline view shows the folded sections as a tree using box-drawing characters, with a
//! breadcrumb for the selected section and a help bar.

use crate::outline::{Outline, Row};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const HELP: &str = "↑/↓: Navigate | ←: Parent | Enter/Space: Open/Close | Home/End | q: Quit";

/// Renders the outline with its breadcrumb and help bar.
pub fn draw(f: &mut Frame, outline: &Outline) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let breadcrumb = Paragraph::new(breadcrumb(outline))
        .block(Block::default().borders(Borders::ALL).title(outline.name.as_str()));
    f.render_widget(breadcrumb, chunks[0]);

    let rows = outline.rows();
    let mut guides: Vec<bool> = Vec::new();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            guides.truncate(row.depth);
            let prefix = tree_prefix(row.depth, row.is_last, guides.get(1..).unwrap_or(&[][..]));
            guides.push(!row.is_last);
            ListItem::new(row_line(outline, row, prefix)).style(row_style(outline, row))
        })
        .collect();

    let title = format!("Sections ({} of {})", rows.len(), outline.sections().len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, chunks[1]);

    let help = Paragraph::new(HELP).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

/// Titles from the outermost section down to the selected one.
#[must_use]
pub fn breadcrumb(outline: &Outline) -> String {
    let sections = outline.sections();
    let mut parts = Vec::new();
    let mut current = (outline.current() < sections.len()).then_some(outline.current());
    while let Some(idx) = current {
        parts.push(sections[idx].title.as_str());
        current = sections[idx].parent_index;
    }
    parts.reverse();
    parts.join(" > ")
}

/// Box-drawing prefix for a row at `depth`; `guides[i]` says whether the ancestor at depth
/// `i + 1` has later siblings.
fn tree_prefix(depth: usize, is_last: bool, guides: &[bool]) -> String {
    if depth == 0 {
        return String::new();
    }
    let mut prefix = String::new();
    for i in 0..depth - 1 {
        if guides.get(i).copied().unwrap_or(false) {
            prefix.push_str("│   ");
        } else {
            prefix.push_str("    ");
        }
    }
    prefix.push_str(if is_last { "└── " } else { "├── " });
    prefix
}

fn row_line(outline: &Outline, row: &Row, prefix: String) -> Line<'static> {
    let section = &outline.sections()[row.index];
    let marker = match (section.children_indices.is_empty(), outline.is_open(row.index)) {
        (true, true) => "• ",
        (true, false) => "◦ ",
        (false, true) => "▾ ",
        (false, false) => "▸ ",
    };
    let colour = match section.level {
        1 | 2 => Color::Cyan,
        3 => Color::Blue,
        _ => Color::Magenta,
    };
    Line::from(vec![
        Span::raw(prefix),
        Span::styled(marker, Style::default().fg(Color::DarkGray)),
        Span::styled(section.title.clone(), Style::default().fg(colour)),
    ])
}

fn row_style(outline: &Outline, row: &Row) -> Style {
    if row.index == outline.current() {
        Style::default().add_modifier(Modifier::REVERSED)
    } else if row.depth == 0 {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
