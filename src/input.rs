//! Locating page files and building documents from them.
//!
//! Pages are parsed with the block grammar of a [`Format`]; every block becomes an element under
//! a single `main` content region. Paragraph and heading text is parsed again with the inline
//! grammar: a paragraph that is one image becomes an `img` or `model-viewer` element, anything
//! else is rendered inline. Raw HTML blocks are parsed with the HTML grammar so that tab markup,
//! zoomable images and model widgets written as HTML attach like their Markdown forms.

mod html;
mod inline;

use crate::config::Config;
use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::formats::Format;
use crate::viewport::ZOOMABLE_ATTR;
use html::HtmlParser;
use inline::InlineParser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Asset suffixes shown with a model widget instead of an image.
pub const MODEL_EXTENSIONS: [&str; 2] = ["glb", "gltf"];

/// Expand `paths` into page files.
///
/// Directories are walked recursively in sorted order, keeping files whose extension is one of
/// `extensions`. Files named directly are always kept.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub fn find_pages(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, extensions, &mut pages)?;
        } else if path.is_file() {
            pages.push(path.clone());
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
            .into());
        }
    }
    Ok(pages)
}

fn collect_dir(dir: &Path, extensions: &[String], pages: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_dir(&path, extensions, pages)?;
        } else if has_extension(&path, extensions) {
            pages.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Read and parse the page at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_page<F: Format>(path: &Path, format: &F, config: &Config) -> Result<Document> {
    let source = fs::read_to_string(path)?;
    parse_page(&source, format, config).map_err(|e| match e {
        Error::Parse(what) => Error::Parse(format!("{}: {what}", path.display())),
        other => other,
    })
}

/// Build a document from page source.
///
/// # Errors
///
/// Returns an error if a grammar or query cannot be loaded, or the parser produces no tree.
pub fn parse_page<F: Format>(source: &str, format: &F, config: &Config) -> Result<Document> {
    let mut parser = Parser::new();
    parser.set_language(&format.language())?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| Error::Parse("page source".to_string()))?;

    let mut doc = Document::new();
    let region = doc.create_element("main");
    let root = doc.root();
    doc.append_child(root, region);

    let mut builder = PageBuilder {
        source,
        format,
        config,
        inline: InlineParser::new(format)?,
        html: HtmlParser::new(format)?,
        doc,
    };
    builder.blocks(tree.root_node(), region)?;
    Ok(builder.doc)
}

/// An image written as `![alt](src "title")`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    /// Image destination.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Title, if given.
    pub title: Option<String>,
}

impl Image {
    /// Whether the destination names a 3D model asset.
    #[must_use]
    pub fn is_model(&self) -> bool {
        let path = self.src.split(['?', '#']).next().unwrap_or_default();
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| MODEL_EXTENSIONS.iter().any(|m| m.eq_ignore_ascii_case(ext)))
    }
}

fn node_text<'s>(node: Node, source: &'s str) -> Result<&'s str> {
    node.utf8_text(source.as_bytes())
        .map_err(|e| Error::Parse(format!("{} node: {e}", node.kind())))
}

struct PageBuilder<'a, F: Format> {
    source: &'a str,
    format: &'a F,
    config: &'a Config,
    inline: InlineParser,
    html: HtmlParser,
    doc: Document,
}

impl<F: Format> PageBuilder<'_, F> {
    fn blocks(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "section" => self.blocks(child, parent)?,
                "atx_heading" | "setext_heading" => self.heading(child, parent)?,
                "paragraph" => self.paragraph(child, parent)?,
                "fenced_code_block" | "indented_code_block" => self.code(child, parent)?,
                "html_block" => self.html_block(child, parent)?,
                "thematic_break" => {
                    let hr = self.doc.create_element("hr");
                    self.doc.append_child(parent, hr);
                }
                "block_quote" => {
                    let quote = self.doc.create_element("blockquote");
                    self.doc.append_child(parent, quote);
                    self.blocks(child, quote)?;
                }
                "list" => self.list(child, parent)?,
                other => log::trace!("skipping {other} block"),
            }
        }
        Ok(())
    }

    fn heading(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let mut cursor = node.walk();
        let level = node
            .children(&mut cursor)
            .find_map(|c| self.format.heading_level(c.kind()));
        let Some(level) = level else {
            log::debug!("heading without a level marker at byte {}", node.start_byte());
            return Ok(());
        };
        let title = match node.child_by_field_name("heading_content") {
            Some(content) => node_text(content, self.source)?.trim(),
            None => "",
        };
        let heading = self.text_element(parent, &format!("h{level}"), "");
        self.inline_content(heading, title)
    }

    fn paragraph(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let text = node_text(node, self.source)?.trim();
        let tree = self.inline.parse(text)?;
        let images = self.inline.images(&tree, text)?;
        if let Some(image) = inline::sole_image(&images, text) {
            self.figure(&image, parent);
            return Ok(());
        }
        let p = self.text_element(parent, "p", "");
        inline::render(&mut self.doc, p, tree.root_node(), text, &images)
    }

    fn inline_content(&mut self, parent: NodeId, text: &str) -> Result<()> {
        let tree = self.inline.parse(text)?;
        let images = self.inline.images(&tree, text)?;
        inline::render(&mut self.doc, parent, tree.root_node(), text, &images)
    }

    fn html_block(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let markup = node_text(node, self.source)?;
        if !self.html.convert(&mut self.doc, parent, markup)? {
            log::debug!("keeping html block at byte {} as raw markup", node.start_byte());
            let raw = self.doc.create_raw(markup);
            self.doc.append_child(parent, raw);
        }
        Ok(())
    }

    fn figure(&mut self, image: &Image, parent: NodeId) {
        let doc = &mut self.doc;
        let el = if image.is_model() {
            let widget = doc.create_element("model-viewer");
            doc.set_attr(widget, "camera-controls", "");
            widget
        } else {
            let img = doc.create_element("img");
            match image.title.as_deref() {
                Some(title) if title == self.config.zoom_marker => {
                    doc.set_attr(img, ZOOMABLE_ATTR, "");
                }
                Some(title) => doc.set_attr(img, "title", title),
                None => {}
            }
            img
        };
        doc.set_attr(el, "src", &image.src);
        doc.set_attr(el, "alt", &image.alt);
        doc.append_child(parent, el);
    }

    fn code(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let (body, language) = if node.kind() == "fenced_code_block" {
            let mut cursor = node.walk();
            let mut body = "";
            let mut language = None;
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "code_fence_content" => body = node_text(child, self.source)?,
                    "info_string" => {
                        language = node_text(child, self.source)?.split_whitespace().next();
                    }
                    _ => {}
                }
            }
            (body, language)
        } else {
            (node_text(node, self.source)?, None)
        };

        let pre = self.doc.create_element("pre");
        self.doc.append_child(parent, pre);
        let code = self.text_element(pre, "code", body);
        if let Some(language) = language {
            self.doc.add_class(code, &format!("language-{language}"));
        }
        Ok(())
    }

    fn list(&mut self, node: Node, parent: NodeId) -> Result<()> {
        let mut cursor = node.walk();
        let items: Vec<Node> = node.named_children(&mut cursor).collect();
        let ordered = items.first().is_some_and(|item| {
            let mut c = item.walk();
            let marker = item.named_children(&mut c).next();
            marker.is_some_and(|m| {
                matches!(m.kind(), "list_marker_dot" | "list_marker_parenthesis")
            })
        });
        let list = self.doc.create_element(if ordered { "ol" } else { "ul" });
        self.doc.append_child(parent, list);
        for item in items.into_iter().filter(|i| i.kind() == "list_item") {
            let li = self.doc.create_element("li");
            self.doc.append_child(list, li);
            self.blocks(item, li)?;
        }
        Ok(())
    }

    fn text_element(&mut self, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let el = self.doc.create_element(tag);
        if !text.is_empty() {
            let t = self.doc.create_text(text);
            self.doc.append_child(el, t);
        }
        self.doc.append_child(parent, el);
        el
    }
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
