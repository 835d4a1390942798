//! Error types shared by the page pipeline.
//!
//! Only the outer layers (reading pages, loading config, parsing scripts) can fail in a way the
//! caller must see. Component-level failures (a model that will not load, a fullscreen request the
//! host refuses) are handled where they happen and never reach these types.

use std::io;
use thiserror::Error;

/// Failure while turning files into an attached page.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a page file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The tree-sitter grammar could not be loaded into a parser.
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// A tree-sitter query failed to compile.
    #[error("invalid query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// The parser gave up without producing a tree.
    #[error("could not parse {0}")]
    Parse(String),
    /// The configuration file was present but unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// An event script did not match the expected JSON shape.
    #[error("invalid event script: {0}")]
    Script(#[from] serde_json::Error),
    /// An event script referred to a component the page does not have.
    #[error("no {kind} with index {index} on this page")]
    MissingTarget {
        /// Component family named by the script.
        kind: &'static str,
        /// Index the script asked for.
        index: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
