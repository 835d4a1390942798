//! Section representation for folded content regions.
//!
//! A section is the collapsible unit produced from one heading. Sections track their position in
//! the nesting through parent/child indices into the plan that produced them, and hold the
//! document nodes that moved under the heading.

use crate::dom::NodeId;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
/// Collapsible division of a content region, derived from one heading.
pub struct Section {
    /// Heading text, trimmed.
    pub title: String,
    /// Heading level, 1 to 6.
    pub level: usize,
    /// Whether the disclosure widget starts expanded.
    pub open: bool,
    /// The heading element this section was built from.
    pub heading: NodeId,
    /// Sibling nodes that followed the heading up to the next heading of equal or higher rank.
    pub content: Vec<NodeId>,
    /// Index of the enclosing section in the plan.
    pub parent_index: Option<usize>,
    /// Indices of directly nested sections.
    pub children_indices: Vec<usize>,
}

impl Section {
    #[must_use]
    /// Whether no other section encloses this one.
    pub fn is_top_level(&self) -> bool {
        self.parent_index.is_none()
    }
}
