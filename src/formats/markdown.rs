//! Markdown format implementation using tree-sitter-md.
//!
//! The block grammar gives headings (ATX `#` and setext underlines), paragraphs, code and raw
//! HTML. Paragraph and heading text is parsed again with the inline grammar, and raw HTML blocks
//! with tree-sitter-html.

use crate::formats::Format;

/// Tree-sitter grammars and queries for Markdown pages.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn inline_language(&self) -> tree_sitter::Language {
        tree_sitter_md::INLINE_LANGUAGE.into()
    }

    fn html_language(&self) -> tree_sitter::Language {
        tree_sitter_html::LANGUAGE.into()
    }

    fn image_query(&self) -> &'static str {
        "(image (image_description)? @alt (link_destination) @src (link_title)? @title) @image"
    }

    fn heading_level(&self, marker: &str) -> Option<usize> {
        match marker {
            "atx_h1_marker" | "setext_h1_underline" => Some(1),
            "atx_h2_marker" | "setext_h2_underline" => Some(2),
            "atx_h3_marker" => Some(3),
            "atx_h4_marker" => Some(4),
            "atx_h5_marker" => Some(5),
            "atx_h6_marker" => Some(6),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
