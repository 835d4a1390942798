//! Inline content: emphasis, code spans, links and images inside one block.
//!
//! Text between inline nodes is copied through as text nodes. Delimiters never reach the
//! document. Reference links are not resolved; their source text is kept.

use super::{node_text, Image};
use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::formats::Format;
use std::collections::BTreeMap;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, Query, QueryCursor, Tree};

/// Images of one inline tree keyed by start byte, with their end byte.
pub(super) type Images = BTreeMap<usize, (usize, Image)>;

pub(super) struct InlineParser {
    parser: Parser,
    images: Query,
}

impl InlineParser {
    pub(super) fn new<F: Format>(format: &F) -> Result<Self> {
        let language = format.inline_language();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let images = Query::new(&language, format.image_query())?;
        Ok(Self { parser, images })
    }

    pub(super) fn parse(&mut self, text: &str) -> Result<Tree> {
        self.parser
            .parse(text, None)
            .ok_or_else(|| Error::Parse("inline text".to_string()))
    }

    /// Every image in `tree`.
    pub(super) fn images(&self, tree: &Tree, text: &str) -> Result<Images> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.images, tree.root_node(), text.as_bytes());
        let names = self.images.capture_names();
        let mut found = Images::new();

        while let Some(m) = matches.next() {
            let mut image = Image::default();
            let mut span = None;
            for capture in m.captures {
                let value = node_text(capture.node, text)?;
                match names[capture.index as usize] {
                    "image" => span = Some((capture.node.start_byte(), capture.node.end_byte())),
                    "src" => image.src = value.trim_matches(['<', '>']).to_string(),
                    "alt" => image.alt = value.trim_matches(['[', ']']).to_string(),
                    "title" => image.title = Some(value.trim_matches(['"', '\'']).to_string()),
                    _ => {}
                }
            }
            if let Some((start, end)) = span {
                found.insert(start, (end, image));
            }
        }
        Ok(found)
    }
}

/// The image spanning all of `text`, if `text` is nothing but one image.
pub(super) fn sole_image(images: &Images, text: &str) -> Option<Image> {
    images
        .get(&0)
        .filter(|(end, _)| *end == text.len())
        .map(|(_, image)| image.clone())
}

/// Append the content of inline tree `root` to `parent`.
pub(super) fn render(
    doc: &mut Document,
    parent: NodeId,
    root: Node,
    text: &str,
    images: &Images,
) -> Result<()> {
    let mut writer = Writer { doc, text, images };
    writer.span(parent, root, root.start_byte(), root.end_byte())
}

struct Writer<'a> {
    doc: &'a mut Document,
    text: &'a str,
    images: &'a Images,
}

impl Writer<'_> {
    /// Children of `node` that lie in `lo..hi`, with the text between them.
    fn span(&mut self, parent: NodeId, node: Node, lo: usize, hi: usize) -> Result<()> {
        let mut pos = lo;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.end_byte() <= lo || child.start_byte() >= hi {
                continue;
            }
            self.push_text(parent, pos, child.start_byte());
            self.node(parent, child)?;
            pos = pos.max(child.end_byte());
        }
        self.push_text(parent, pos, hi);
        Ok(())
    }

    fn node(&mut self, parent: NodeId, node: Node) -> Result<()> {
        match node.kind() {
            "emphasis_delimiter" | "code_span_delimiter" => {}
            "emphasis" => self.wrap(parent, node, "em")?,
            "strong_emphasis" => self.wrap(parent, node, "strong")?,
            "strikethrough" => self.wrap(parent, node, "del")?,
            "code_span" => {
                let raw = node_text(node, self.text)?.trim_matches('`');
                let code = match raw.strip_prefix(' ').and_then(|r| r.strip_suffix(' ')) {
                    Some(inner) if !inner.trim().is_empty() => inner,
                    _ => raw,
                };
                self.element_with_text(parent, "code", code);
            }
            "inline_link" => self.link(parent, node)?,
            "image" => self.image(parent, node),
            "uri_autolink" | "email_autolink" => {
                let target = node_text(node, self.text)?.trim_matches(['<', '>']);
                let a = self.element_with_text(parent, "a", target);
                let href = if node.kind() == "email_autolink" {
                    format!("mailto:{target}")
                } else {
                    target.to_string()
                };
                self.doc.set_attr(a, "href", &href);
            }
            "hard_line_break" => {
                let br = self.doc.create_element("br");
                self.doc.append_child(parent, br);
            }
            "backslash_escape" => {
                let escaped = node_text(node, self.text)?.trim_start_matches('\\');
                self.append_text(parent, escaped);
            }
            "entity_reference" | "numeric_character_reference" => {
                let decoded = html_escape::decode_html_entities(node_text(node, self.text)?);
                self.append_text(parent, &decoded);
            }
            "html_tag" => {
                let raw = self.doc.create_raw(node_text(node, self.text)?);
                self.doc.append_child(parent, raw);
            }
            _ => self.span(parent, node, node.start_byte(), node.end_byte())?,
        }
        Ok(())
    }

    fn wrap(&mut self, parent: NodeId, node: Node, tag: &str) -> Result<()> {
        let el = self.doc.create_element(tag);
        self.doc.append_child(parent, el);
        self.span(el, node, node.start_byte(), node.end_byte())
    }

    fn link(&mut self, parent: NodeId, node: Node) -> Result<()> {
        let a = self.doc.create_element("a");
        self.doc.append_child(parent, a);
        let mut label = None;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "link_destination" => {
                    let href = node_text(child, self.text)?.trim_matches(['<', '>']);
                    self.doc.set_attr(a, "href", href);
                }
                "link_title" => {
                    let title = node_text(child, self.text)?.trim_matches(['"', '\'']);
                    self.doc.set_attr(a, "title", title);
                }
                "link_text" => label = Some(child),
                _ => {}
            }
        }
        if let Some(label) = label {
            let (mut lo, mut hi) = (label.start_byte(), label.end_byte());
            if self.text.as_bytes().get(lo) == Some(&b'[') {
                lo += 1;
            }
            if hi > lo && self.text.as_bytes().get(hi - 1) == Some(&b']') {
                hi -= 1;
            }
            self.span(a, label, lo, hi)?;
        }
        Ok(())
    }

    fn image(&mut self, parent: NodeId, node: Node) {
        let Some((_, image)) = self.images.get(&node.start_byte()) else {
            log::debug!("image at byte {} has no destination", node.start_byte());
            return;
        };
        let img = self.doc.create_element("img");
        self.doc.set_attr(img, "src", &image.src);
        self.doc.set_attr(img, "alt", &image.alt);
        if let Some(title) = &image.title {
            self.doc.set_attr(img, "title", title);
        }
        self.doc.append_child(parent, img);
    }

    fn push_text(&mut self, parent: NodeId, from: usize, to: usize) {
        if let Some(gap) = self.text.get(from..to) {
            self.append_text(parent, gap);
        }
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if !text.is_empty() {
            let t = self.doc.create_text(text);
            self.doc.append_child(parent, t);
        }
    }

    fn element_with_text(&mut self, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let el = self.doc.create_element(tag);
        self.append_text(el, text);
        self.doc.append_child(parent, el);
        el
    }
}
