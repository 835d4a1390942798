//! Folding heading-delimited content into nested disclosure widgets.
//!
//! Folding happens in two steps. [`plan`] reads the document and works out which nodes belong
//! under which heading, producing an arena of [`Section`]s linked by index. [`apply`] then
//! performs every move in one pass. Keeping the plan pure means the nesting rules can be checked
//! without touching a document at all.
//!
//! The stop rule is purely numeric: a heading's content runs until the next sibling heading whose
//! level is equal or lower (more important). Nothing checks that levels increase one step at a
//! time, so an `h3` followed directly by an `h2` simply ends at the `h2`.

use crate::config::Config;
use crate::dom::{Document, NodeId};
use crate::section::Section;
use serde::Serialize;
use std::collections::HashMap;

/// Class on every generated disclosure widget.
pub const WIDGET_CLASS: &str = "collapsible-section";
/// Class on the summary row holding the original heading.
pub const SUMMARY_CLASS: &str = "section-summary";
/// Class on the body that receives the folded content.
pub const BODY_CLASS: &str = "section-content";

#[must_use]
/// Comparison form of a heading title: trimmed and lower-cased.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[derive(Clone, Debug, PartialEq)]
/// Which headings are folded.
pub struct FoldOptions {
    excluded: Vec<String>,
    levels: Vec<usize>,
}

impl FoldOptions {
    /// Options folding `levels` and leaving the `excluded` titles alone.
    pub fn new<I, S>(excluded: I, levels: &[usize]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            excluded: excluded
                .into_iter()
                .map(|t| normalize_title(t.as_ref()))
                .collect(),
            levels: levels.to_vec(),
        }
    }

    #[must_use]
    /// Options taken from the site configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.excluded_titles, &config.fold_levels)
    }

    #[must_use]
    /// Whether a heading with this text is never folded.
    pub fn is_excluded(&self, title: &str) -> bool {
        let title = normalize_title(title);
        self.excluded.iter().any(|t| *t == title)
    }

    #[must_use]
    /// Whether headings of this level are folded.
    pub fn targets(&self, level: usize) -> bool {
        self.levels.contains(&level)
    }
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
/// Every section to create, in document order.
pub struct FoldPlan {
    /// Section arena; parent and child links are indices into this vector.
    pub sections: Vec<Section>,
}

impl FoldPlan {
    #[must_use]
    /// Whether nothing would be folded.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    /// Number of sections in the plan.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Sections not nested in any other, with their indices.
    pub fn roots(&self) -> impl Iterator<Item = (usize, &Section)> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_top_level())
    }

    #[must_use]
    /// First section with the given title.
    pub fn find(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

#[must_use]
/// The content region of a page: its first `main` element.
pub fn locate_region(doc: &Document) -> Option<NodeId> {
    doc.find_first(doc.root(), |el| el.tag == "main")
}

fn inside_widget(doc: &Document, node: NodeId, region: NodeId) -> bool {
    doc.ancestors(node)
        .take_while(|&a| a != region)
        .any(|a| doc.tag(a) == Some("details"))
}

#[must_use]
/// Work out the sections for every qualifying heading under `region`.
///
/// Qualifying headings are chosen once, up front: targeted level, not already inside a
/// disclosure widget, title not excluded. Excluded headings still end the content of the
/// section before them, as does any other heading of equal or lower level.
pub fn plan(doc: &Document, region: NodeId, options: &FoldOptions) -> FoldPlan {
    let qualifying: Vec<(NodeId, usize)> = doc
        .descendants(region)
        .into_iter()
        .filter_map(|n| doc.heading_level(n).map(|level| (n, level)))
        .filter(|&(n, level)| {
            options.targets(level)
                && !inside_widget(doc, n, region)
                && !options.is_excluded(&doc.text_content(n))
        })
        .collect();

    let mut plan = FoldPlan::default();
    // Innermost section owning each moved node so far.
    let mut owner: HashMap<NodeId, usize> = HashMap::new();

    for (heading, level) in qualifying {
        let content: Vec<NodeId> = doc
            .following_siblings(heading)
            .iter()
            .copied()
            .take_while(|&s| doc.heading_level(s).is_none_or(|l| l > level))
            .collect();

        let parent_index = std::iter::once(heading)
            .chain(doc.ancestors(heading))
            .take_while(|&n| n != region)
            .find_map(|n| owner.get(&n).copied());

        let index = plan.sections.len();
        if let Some(parent) = parent_index {
            plan.sections[parent].children_indices.push(index);
        }
        for &node in &content {
            owner.insert(node, index);
        }

        plan.sections.push(Section {
            title: doc.text_content(heading).trim().to_string(),
            level,
            open: index == 0,
            heading,
            content,
            parent_index,
            children_indices: Vec::new(),
        });
    }

    plan
}

/// Rewrite the document according to `plan`, returning the created widgets in plan order.
///
/// Each heading is replaced by a `details` widget; the heading moves into the widget's
/// `summary` and the section content into the widget's body.
pub fn apply(doc: &mut Document, plan: &FoldPlan) -> Vec<NodeId> {
    let mut widgets = Vec::with_capacity(plan.len());

    for section in &plan.sections {
        let widget = doc.create_element("details");
        doc.add_class(widget, WIDGET_CLASS);
        doc.add_class(widget, &format!("level-{}", section.level));
        if section.open {
            doc.set_attr(widget, "open", "");
        }

        let summary = doc.create_element("summary");
        doc.add_class(summary, SUMMARY_CLASS);
        let body = doc.create_element("div");
        doc.add_class(body, BODY_CLASS);

        doc.insert_before(section.heading, widget);
        doc.append_child(widget, summary);
        doc.append_child(widget, body);
        doc.append_child(summary, section.heading);
        for &node in &section.content {
            doc.append_child(body, node);
        }

        widgets.push(widget);
    }

    widgets
}

/// Plan and apply folding for `region`. An absent region folds nothing.
pub fn fold(doc: &mut Document, region: Option<NodeId>, options: &FoldOptions) -> FoldPlan {
    let Some(region) = region else {
        log::debug!("no content region; skipping section folding");
        return FoldPlan::default();
    };
    let plan = plan(doc, region, options);
    apply(doc, &plan);
    log::debug!("folded {} sections", plan.len());
    plan
}

#[must_use]
/// Whether a disclosure widget is expanded.
pub fn is_open(doc: &Document, widget: NodeId) -> bool {
    doc.has_attr(widget, "open")
}

/// Flip a disclosure widget between expanded and collapsed, returning the new state.
pub fn toggle(doc: &mut Document, widget: NodeId) -> bool {
    if is_open(doc, widget) {
        doc.remove_attr(widget, "open");
        false
    } else {
        doc.set_attr(widget, "open", "");
        true
    }
}

#[cfg(test)]
#[path = "tests/fold.rs"]
mod tests;
