//! Raw HTML blocks written inside a page.
//!
//! A block is converted into document nodes only when it is self-contained: it parses without
//! errors and every non-void element it opens is closed inside it. Anything else, such as a lone
//! `<div>` opener wrapping Markdown further down, is kept as raw markup.

use super::node_text;
use crate::dom::{is_void_tag, Document, NodeId};
use crate::error::{Error, Result};
use crate::formats::Format;
use tree_sitter::{Node, Parser};

pub(super) struct HtmlParser {
    parser: Parser,
}

impl HtmlParser {
    pub(super) fn new<F: Format>(format: &F) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(&format.html_language())?;
        Ok(Self { parser })
    }

    /// Convert `markup` into nodes under `parent`. Returns `false`, adding nothing, when the
    /// block is not self-contained.
    pub(super) fn convert(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        markup: &str,
    ) -> Result<bool> {
        let tree = self
            .parser
            .parse(markup, None)
            .ok_or_else(|| Error::Parse("html block".to_string()))?;
        let root = tree.root_node();
        if root.has_error() || !closed(root, markup) {
            return Ok(false);
        }
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            append(doc, parent, child, markup)?;
        }
        Ok(true)
    }
}

/// Whether every element under `node` is closed by an end tag or `/>`, or is void.
fn closed(node: Node, markup: &str) -> bool {
    let mut cursor = node.walk();
    let all_closed = node.named_children(&mut cursor).all(|child| match child.kind() {
        "erroneous_end_tag" => false,
        "element" => {
            let tag = tag_name(child, markup).unwrap_or_default();
            let ended = child
                .named_child(child.named_child_count().saturating_sub(1))
                .is_some_and(|last| matches!(last.kind(), "end_tag" | "self_closing_tag"));
            (ended || is_void_tag(&tag.to_ascii_lowercase())) && closed(child, markup)
        }
        _ => true,
    });
    all_closed
}

fn tag_name<'s>(element: Node, markup: &'s str) -> Option<&'s str> {
    let open = element.named_child(0)?;
    let mut cursor = open.walk();
    let name = open
        .named_children(&mut cursor)
        .find(|c| c.kind() == "tag_name")?;
    name.utf8_text(markup.as_bytes()).ok()
}

fn append(doc: &mut Document, parent: NodeId, node: Node, markup: &str) -> Result<()> {
    match node.kind() {
        "element" | "script_element" | "style_element" => element(doc, parent, node, markup)?,
        "text" | "entity" => {
            let text = html_escape::decode_html_entities(node_text(node, markup)?);
            let t = doc.create_text(&text);
            doc.append_child(parent, t);
        }
        // script and style bodies, comments, doctypes
        _ => {
            let raw = doc.create_raw(node_text(node, markup)?);
            doc.append_child(parent, raw);
        }
    }
    Ok(())
}

fn element(doc: &mut Document, parent: NodeId, node: Node, markup: &str) -> Result<()> {
    let Some(open) = node.named_child(0) else {
        return Ok(());
    };
    let tag = tag_name(node, markup).unwrap_or("div");
    let el = doc.create_element(tag);
    doc.append_child(parent, el);

    let mut cursor = open.walk();
    for attribute in open
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "attribute")
    {
        set_attribute(doc, el, attribute, markup)?;
    }

    // Whitespace between child nodes is not part of any node; copy it across.
    let mut pos = open.end_byte();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor).skip(1) {
        if child.kind() == "end_tag" {
            gap(doc, el, markup, pos, child.start_byte());
            return Ok(());
        }
        gap(doc, el, markup, pos, child.start_byte());
        append(doc, el, child, markup)?;
        pos = child.end_byte();
    }
    Ok(())
}

fn gap(doc: &mut Document, parent: NodeId, markup: &str, from: usize, to: usize) {
    if let Some(space) = markup.get(from..to).filter(|s| !s.is_empty()) {
        let t = doc.create_text(space);
        doc.append_child(parent, t);
    }
}

fn set_attribute(doc: &mut Document, el: NodeId, attribute: Node, markup: &str) -> Result<()> {
    let mut name = "";
    let mut value = String::new();
    let mut cursor = attribute.walk();
    for part in attribute.named_children(&mut cursor) {
        match part.kind() {
            "attribute_name" => name = node_text(part, markup)?,
            "attribute_value" => value = decode(node_text(part, markup)?),
            "quoted_attribute_value" => {
                let quoted = node_text(part, markup)?;
                value = decode(quoted.trim_matches(['"', '\'']));
            }
            _ => {}
        }
    }
    match name.to_ascii_lowercase().as_str() {
        "" => {}
        "class" => {
            for class in value.split_whitespace() {
                doc.add_class(el, class);
            }
        }
        "style" => {
            for declaration in value.split(';') {
                if let Some((property, v)) = declaration.split_once(':') {
                    doc.set_style(el, property.trim(), v.trim());
                }
            }
        }
        lower => doc.set_attr(el, lower, &value),
    }
    Ok(())
}

fn decode(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}
