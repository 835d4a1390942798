//! Control bars and the action vocabulary their buttons carry.

use crate::dom::{Document, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Attribute holding a button's action identifier.
pub const ACTION_ATTR: &str = "data-action";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// What a control button does.
pub enum Action {
    /// Return to the default view or camera pose.
    Reset,
    /// Zoom in one step.
    ZoomIn,
    /// Zoom out one step.
    ZoomOut,
    /// Enter or leave full-frame presentation.
    Fullscreen,
    /// Toggle automatic rotation of a model.
    Rotate,
}

impl Action {
    /// Every action, in identifier order.
    pub const ALL: [Self; 5] = [
        Self::Reset,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::Fullscreen,
        Self::Rotate,
    ];

    #[must_use]
    /// Identifier written to `data-action`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
            Self::Fullscreen => "fullscreen",
            Self::Rotate => "rotate",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Self::Reset => "⟲",
            Self::ZoomIn => "+",
            Self::ZoomOut => "−",
            Self::Fullscreen => "⛶",
            Self::Rotate => "↻",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Reset => "Reset view",
            Self::ZoomIn => "Zoom in",
            Self::ZoomOut => "Zoom out",
            Self::Fullscreen => "Toggle fullscreen",
            Self::Rotate => "Toggle auto-rotate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown control action `{0}`")]
/// An identifier outside the action vocabulary.
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A generated bar of buttons.
pub struct ControlBar {
    /// The bar element.
    pub bar: NodeId,
    /// Buttons in display order.
    pub buttons: Vec<(Action, NodeId)>,
}

impl ControlBar {
    /// Create a detached bar with class `class` and one button per action.
    pub fn build(doc: &mut Document, class: &str, actions: &[Action]) -> Self {
        let bar = doc.create_element("div");
        doc.add_class(bar, class);
        let buttons = actions
            .iter()
            .map(|&action| {
                let button = doc.create_element("button");
                doc.set_attr(button, "type", "button");
                doc.set_attr(button, ACTION_ATTR, action.as_str());
                doc.set_attr(button, "title", action.title());
                doc.set_attr(button, "aria-label", action.title());
                doc.add_class(button, "control-btn");
                let glyph = doc.create_text(action.glyph());
                doc.append_child(button, glyph);
                doc.append_child(bar, button);
                (action, button)
            })
            .collect();
        Self { bar, buttons }
    }

    #[must_use]
    /// The button for `action`, if the bar has one.
    pub fn button(&self, action: Action) -> Option<NodeId> {
        self.buttons
            .iter()
            .find(|(a, _)| *a == action)
            .map(|&(_, b)| b)
    }
}

#[must_use]
/// The button enclosing `node` and its parsed action.
pub fn action_at(doc: &Document, node: NodeId) -> Option<(NodeId, Action)> {
    let button = doc.closest(node, |el| el.attr(ACTION_ATTR).is_some())?;
    let action = doc.attr(button, ACTION_ATTR)?.parse().ok()?;
    Some((button, action))
}

#[cfg(test)]
#[path = "tests/controls.rs"]
mod tests;
