//! Mutually exclusive tab panels.
//!
//! Buttons name their panel in `data-tab`; panels carry the matching `id`. A button whose target
//! matches no panel still becomes the active button while every panel is hidden. That mismatch is
//! kept as-is.

use crate::dom::{Document, NodeId};

/// Class of tab buttons.
pub const BUTTON_CLASS: &str = "tab-button";
/// Class of tab panels.
pub const PANEL_CLASS: &str = "tab-content";
/// Attribute on a button naming its panel's id.
pub const TARGET_ATTR: &str = "data-tab";
/// Class marking the active button and panel.
pub const ACTIVE_CLASS: &str = "active";

#[derive(Clone, Debug, PartialEq, Eq)]
/// The page's tab buttons and panels and which pair is active.
pub struct TabSwitcher {
    buttons: Vec<(NodeId, String)>,
    panels: Vec<(NodeId, String)>,
    active: Option<(usize, Option<usize>)>,
}

impl TabSwitcher {
    /// Collect buttons and panels below `root`. `None` when the page has no tab buttons.
    #[must_use]
    pub fn discover(doc: &Document, root: NodeId) -> Option<Self> {
        let buttons: Vec<(NodeId, String)> = doc
            .find_all(root, |el| el.has_class(BUTTON_CLASS))
            .into_iter()
            .map(|b| (b, doc.attr(b, TARGET_ATTR).unwrap_or_default().to_string()))
            .collect();
        if buttons.is_empty() {
            return None;
        }
        let panels: Vec<(NodeId, String)> = doc
            .find_all(root, |el| el.has_class(PANEL_CLASS))
            .into_iter()
            .map(|p| (p, doc.attr(p, "id").unwrap_or_default().to_string()))
            .collect();
        // Markup may ship with a pair already active.
        let active = buttons
            .iter()
            .position(|&(b, _)| doc.has_class(b, ACTIVE_CLASS))
            .map(|i| {
                let panel = panels
                    .iter()
                    .position(|&(p, _)| doc.has_class(p, ACTIVE_CLASS));
                (i, panel)
            });
        Some(Self {
            buttons,
            panels,
            active,
        })
    }

    #[must_use]
    /// Index of the button owning `node`, if `node` is or lies inside a tab button.
    pub fn button_index(&self, doc: &Document, node: NodeId) -> Option<usize> {
        let button = doc.closest(node, |el| el.has_class(BUTTON_CLASS))?;
        self.buttons.iter().position(|&(b, _)| b == button)
    }

    #[must_use]
    /// Node of button `index`.
    pub fn button(&self, index: usize) -> Option<NodeId> {
        self.buttons.get(index).map(|&(b, _)| b)
    }

    #[must_use]
    /// Active button index and, when its target resolved, active panel index.
    pub fn active(&self) -> Option<(usize, Option<usize>)> {
        self.active
    }

    #[must_use]
    /// Number of tab buttons.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    #[must_use]
    /// Whether there are no tab buttons.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Make button `index` and its panel the only active pair, writing the classes to `doc`.
    /// Out-of-range indices are ignored.
    pub fn select(&mut self, doc: &mut Document, index: usize) {
        let Some((_, target)) = self.buttons.get(index) else {
            return;
        };
        let panel = self.panels.iter().position(|(_, id)| id == target);
        if panel.is_none() {
            log::debug!("tab target `{target}` matches no panel");
        }
        self.active = Some((index, panel));

        for (i, &(button, _)) in self.buttons.iter().enumerate() {
            doc.set_class(button, ACTIVE_CLASS, i == index);
        }
        for (i, &(node, _)) in self.panels.iter().enumerate() {
            doc.set_class(node, ACTIVE_CLASS, Some(i) == panel);
        }
    }
}

#[cfg(test)]
#[path = "tests/tabs.rs"]
mod tests;
