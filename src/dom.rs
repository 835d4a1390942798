//! Arena document tree that the page components read from and write to.
//!
//! Nodes live in a single `Vec` and refer to each other by index, the same way sections refer
//! to their parent and children. Moving a node never invalidates a [`NodeId`]: detached nodes
//! stay in the arena and can be reattached anywhere.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether `tag` (lowercase) is a void element.
#[must_use]
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
/// Stable handle to a node inside one [`Document`].
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    /// Position of the node in its document's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Tag, attributes, classes and inline style of an element node.
pub struct Element {
    /// Lower-case tag name.
    pub tag: String,
    /// Attributes other than `class` and `style`, in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Class list in insertion order, without duplicates.
    pub classes: Vec<String>,
    /// Inline style properties.
    pub style: BTreeMap<String, String>,
}

impl Element {
    #[must_use]
    /// Bare element with the given tag.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    /// Value of an attribute, if set.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    /// Heading level for `h1`..`h6`.
    pub fn heading_level(&self) -> Option<usize> {
        let digit = self.tag.strip_prefix('h')?;
        match digit.parse::<usize>() {
            Ok(level) if (1..=6).contains(&level) => Some(level),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Payload of a node.
pub enum NodeKind {
    /// Element with optional children.
    Element(Element),
    /// Text, escaped when rendered.
    Text(String),
    /// Pre-rendered markup, emitted verbatim.
    Raw(String),
}

#[derive(Clone, Debug)]
/// One arena slot.
pub struct Node {
    /// What the node holds.
    pub kind: NodeKind,
    /// Containing node, `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,
    /// Child nodes in document order.
    pub children: Vec<NodeId>,
}

#[derive(Clone, Debug)]
/// A rendered page: a `body` root and everything reachable from it.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    /// Empty document holding only its `body` root.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.push(NodeKind::Element(Element::new("body")));
        doc
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    #[must_use]
    /// The `body` root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    /// Always false: the root exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    /// Arena slot for `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// New detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element::new(tag)))
    }

    /// New detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// New detached raw-markup node.
    pub fn create_raw(&mut self, markup: &str) -> NodeId {
        self.push(NodeKind::Raw(markup.to_string()))
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Refuses (and logs) moves that would put a node inside itself.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.contains(child, parent) {
            log::debug!("refusing to append {child:?} inside its own subtree");
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Move `node` directly before `reference`. No-op when `reference` is detached.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        self.insert_relative(reference, node, 0);
    }

    /// Move `node` directly after `reference`. No-op when `reference` is detached.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        self.insert_relative(reference, node, 1);
    }

    fn insert_relative(&mut self, reference: NodeId, node: NodeId, shift: usize) {
        if reference == node || self.contains(node, reference) {
            return;
        }
        self.detach(node);
        let Some(parent) = self.nodes[reference.0].parent else {
            return;
        };
        let siblings = &mut self.nodes[parent.0].children;
        let position = siblings
            .iter()
            .position(|&c| c == reference)
            .map_or(siblings.len(), |p| p + shift);
        siblings.insert(position, node);
        self.nodes[node.0].parent = Some(parent);
    }

    /// Remove `id` from its parent, keeping its own subtree intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    #[must_use]
    /// Containing node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    /// Children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[must_use]
    /// Siblings after `id`, nearest first. Empty for detached nodes.
    pub fn following_siblings(&self, id: NodeId) -> &[NodeId] {
        let Some(parent) = self.parent(id) else {
            return &[];
        };
        let siblings = self.children(parent);
        siblings
            .iter()
            .position(|&c| c == id)
            .map_or(&[][..], |p| &siblings[p + 1..])
    }

    #[must_use]
    /// Sibling directly after `id`.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.following_siblings(id).first().copied()
    }

    #[must_use]
    /// All nodes below `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Parents of `id` from nearest to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    #[must_use]
    /// Whether `id` is `ancestor` or lies below it.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    #[must_use]
    /// Element payload of `id`.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable element payload of `id`.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    #[must_use]
    /// Tag name of an element node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    #[must_use]
    /// Heading level of `id` if it is `h1`..`h6`.
    pub fn heading_level(&self, id: NodeId) -> Option<usize> {
        self.element(id).and_then(Element::heading_level)
    }

    /// `id` itself or its nearest ancestor whose element matches `pred`.
    pub fn closest(&self, id: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| self.element(n).is_some_and(&pred))
    }

    /// Elements below `root` matching `pred`, in document order.
    pub fn find_all(&self, root: NodeId, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.element(n).is_some_and(&pred))
            .collect()
    }

    /// First element below `root` matching `pred`.
    pub fn find_first(&self, root: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&n| self.element(n).is_some_and(&pred))
    }

    #[must_use]
    /// Concatenated text of `id` and everything below it. Raw markup contributes nothing.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for n in std::iter::once(id).chain(self.descendants(id)) {
            if let NodeKind::Text(t) = &self.nodes[n.0].kind {
                text.push_str(t);
            }
        }
        text
    }

    #[must_use]
    /// Attribute value on an element.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    #[must_use]
    /// Whether the element carries attribute `name`.
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set or replace an attribute. An empty value renders as a boolean attribute.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            if let Some(slot) = el.attrs.iter_mut().find(|(n, _)| n == name) {
                slot.1 = value.to_string();
            } else {
                el.attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attrs.retain(|(n, _)| n != name);
        }
    }

    #[must_use]
    /// Whether the element has `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Add `class` unless already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        self.set_class(id, class, true);
    }

    /// Add or remove `class` depending on `on`.
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) {
        if let Some(el) = self.element_mut(id) {
            let present = el.has_class(class);
            if on && !present {
                el.classes.push(class.to_string());
            } else if !on && present {
                el.classes.retain(|c| c != class);
            }
        }
    }

    #[must_use]
    /// Inline style property value.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.style.get(property))
            .map(String::as_str)
    }

    /// Set an inline style property.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.style.insert(property.to_string(), value.to_string());
        }
    }

    #[must_use]
    /// Markup for the children of the root.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for &child in self.children(self.root) {
            self.write_html(child, &mut out);
        }
        out
    }

    #[must_use]
    /// Markup for `id` and its subtree.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => out.push_str(&escape(text, false)),
            NodeKind::Raw(markup) => out.push_str(markup),
            NodeKind::Element(el) => {
                let _ = write!(out, "<{}", el.tag);
                for (name, value) in &el.attrs {
                    if value.is_empty() {
                        let _ = write!(out, " {name}");
                    } else {
                        let _ = write!(out, " {name}=\"{}\"", escape(value, true));
                    }
                }
                if !el.classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", escape(&el.classes.join(" "), true));
                }
                if !el.style.is_empty() {
                    let style = el
                        .style
                        .iter()
                        .map(|(k, v)| format!("{k}: {v}"))
                        .collect::<Vec<_>>()
                        .join("; ");
                    let _ = write!(out, " style=\"{}\"", escape(&style, true));
                }
                out.push('>');
                if is_void_tag(&el.tag) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/dom.rs"]
mod tests;
