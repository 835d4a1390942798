use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use tree_sitter::{Parser, Query};

#[test]
fn test_heading_levels_from_markers() {
    let format = MarkdownFormat;
    assert_eq!(format.heading_level("atx_h1_marker"), Some(1));
    assert_eq!(format.heading_level("atx_h3_marker"), Some(3));
    assert_eq!(format.heading_level("atx_h6_marker"), Some(6));
    assert_eq!(format.heading_level("setext_h2_underline"), Some(2));
    assert_eq!(format.heading_level("paragraph"), None);
}

#[test]
fn test_image_query_compiles_against_inline_grammar() {
    let format = MarkdownFormat;
    let query = Query::new(&format.inline_language(), format.image_query()).unwrap();
    for name in ["image", "src", "alt", "title"] {
        assert!(
            query.capture_index_for_name(name).is_some(),
            "missing capture {name}"
        );
    }
}

#[test]
fn test_block_grammar_loads() {
    let mut parser = Parser::new();
    parser.set_language(&MarkdownFormat.language()).unwrap();
    let tree = parser.parse("# Title\n\nBody\n", None).unwrap();
    assert_eq!(tree.root_node().kind(), "document");
}

#[test]
fn test_html_grammar_loads() {
    let mut parser = Parser::new();
    parser.set_language(&MarkdownFormat.html_language()).unwrap();
    let tree = parser.parse("<p class=\"a\">x</p>", None).unwrap();
    let element = tree.root_node().named_child(0).unwrap();
    assert_eq!(element.kind(), "element");
    assert!(!tree.root_node().has_error());
}
