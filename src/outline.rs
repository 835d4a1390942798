//! Browsing state for the folded sections of one page.
//!
//! The outline mirrors the disclosure widgets: a closed section hides every section nested in it.
//! Navigation only ever lands on visible rows.

use crate::fold::FoldPlan;
use crate::section::Section;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A visible outline row.
pub struct Row {
    /// Section index in the plan.
    pub index: usize,
    /// Nesting depth, 0 for top-level sections.
    pub depth: usize,
    /// Whether no later sibling follows this section.
    pub is_last: bool,
}

#[derive(Clone, Debug)]
/// Sections of a page with their open flags and a cursor.
pub struct Outline {
    /// Name shown above the outline.
    pub name: String,
    sections: Vec<Section>,
    open: Vec<bool>,
    current: usize,
}

impl Outline {
    #[must_use]
    /// Start browsing `plan` with every section as it was folded.
    pub fn new(name: impl Into<String>, plan: &FoldPlan) -> Self {
        Self {
            name: name.into(),
            open: plan.sections.iter().map(|s| s.open).collect(),
            sections: plan.sections.clone(),
            current: 0,
        }
    }

    #[must_use]
    /// Every section, in plan order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// Index of the selected section.
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    /// Whether section `index` is expanded.
    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    fn is_visible(&self, index: usize) -> bool {
        let mut parent = self.sections[index].parent_index;
        while let Some(p) = parent {
            if !self.open[p] {
                return false;
            }
            parent = self.sections[p].parent_index;
        }
        true
    }

    fn depth(&self, index: usize) -> usize {
        std::iter::successors(self.sections[index].parent_index, |&p| {
            self.sections[p].parent_index
        })
        .count()
    }

    fn is_last_sibling(&self, index: usize) -> bool {
        match self.sections[index].parent_index {
            Some(p) => self.sections[p].children_indices.last() == Some(&index),
            None => !self.sections[index + 1..]
                .iter()
                .any(Section::is_top_level),
        }
    }

    #[must_use]
    /// Rows currently shown, in document order.
    pub fn rows(&self) -> Vec<Row> {
        (0..self.sections.len())
            .filter(|&i| self.is_visible(i))
            .map(|index| Row {
                index,
                depth: self.depth(index),
                is_last: self.is_last_sibling(index),
            })
            .collect()
    }

    /// Move to the next visible section. Returns whether the cursor moved.
    pub fn select_next(&mut self) -> bool {
        let next = (self.current + 1..self.sections.len()).find(|&i| self.is_visible(i));
        self.move_to(next)
    }

    /// Move to the previous visible section. Returns whether the cursor moved.
    pub fn select_prev(&mut self) -> bool {
        let prev = (0..self.current).rev().find(|&i| self.is_visible(i));
        self.move_to(prev)
    }

    /// Move to the enclosing section. Returns whether the cursor moved.
    pub fn select_parent(&mut self) -> bool {
        let parent = self
            .sections
            .get(self.current)
            .and_then(|s| s.parent_index);
        self.move_to(parent)
    }

    /// Move to the first section.
    pub fn select_first(&mut self) -> bool {
        let first = (!self.sections.is_empty()).then_some(0);
        self.move_to(first)
    }

    /// Move to the last visible section.
    pub fn select_last(&mut self) -> bool {
        let last = (0..self.sections.len()).rev().find(|&i| self.is_visible(i));
        self.move_to(last)
    }

    /// Flip the selected section between open and closed. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        match self.open.get_mut(self.current) {
            Some(open) => {
                *open = !*open;
                *open
            }
            None => false,
        }
    }

    fn move_to(&mut self, target: Option<usize>) -> bool {
        match target {
            Some(i) if i != self.current => {
                self.current = i;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
