//! Format trait and implementations for different page sources.
//!
//! A `Format` names the tree-sitter grammars a page source is parsed with and the queries used to
//! pick structure out of them. The page builder in [`crate::input`] is written against this trait
//! only.

pub mod markdown;

/// Grammars and queries for one page source language.
pub trait Format {
    /// Grammar for the block structure of a page.
    fn language(&self) -> tree_sitter::Language;

    /// Grammar for the text inside a single block.
    fn inline_language(&self) -> tree_sitter::Language;

    /// Grammar for raw HTML blocks embedded in a page.
    fn html_language(&self) -> tree_sitter::Language;

    /// Query over the inline grammar matching images. Captures `@image` and `@src`, optionally
    /// `@alt` and `@title`.
    fn image_query(&self) -> &str;

    /// Heading level for the kind of a heading's marker or underline node.
    fn heading_level(&self, marker: &str) -> Option<usize>;
}
