//! Syntax tree to document model projection.

use crate::ast::SyntaxNode;

use super::DocumentNode;

/// Build the rich-document tree for a parsed syntax tree.
///
/// Deterministic single pass. Recognized kinds map one-to-one; kinds outside
/// the display model (block quotes, thematic breaks, raw HTML) are silently
/// omitted, and non-text inline children (emphasis, links, code spans) are
/// dropped. This lossy projection mirrors what the model can re-render.
pub fn build(tree: &SyntaxNode) -> DocumentNode {
    match tree {
        SyntaxNode::Root { children, .. } => {
            DocumentNode::root(children.iter().filter_map(build_block).collect())
        }
        other => DocumentNode::root(build_block(other).into_iter().collect()),
    }
}

fn build_block(node: &SyntaxNode) -> Option<DocumentNode> {
    match node {
        SyntaxNode::Paragraph { children, .. } => {
            Some(DocumentNode::paragraph(text_children(children)))
        }
        SyntaxNode::Heading {
            depth, children, ..
        } => Some(DocumentNode::heading(*depth, text_children(children))),
        SyntaxNode::CodeBlock {
            language, value, ..
        } => Some(DocumentNode::code_block(
            language.clone(),
            vec![DocumentNode::text(value.clone())],
        )),
        SyntaxNode::List {
            ordered, children, ..
        } => Some(DocumentNode::list(
            *ordered,
            children.iter().filter_map(build_list_item).collect(),
        )),
        // A bare list item outside a list has no display mapping.
        _ => None,
    }
}

fn build_list_item(node: &SyntaxNode) -> Option<DocumentNode> {
    let SyntaxNode::ListItem { children, .. } = node else {
        return None;
    };
    let mut item_children = Vec::new();
    for child in children {
        match child {
            // Item paragraphs flatten into the item's text runs.
            SyntaxNode::Paragraph { children, .. } => {
                item_children.extend(text_children(children));
            }
            // Nested lists keep their structure.
            SyntaxNode::List {
                ordered, children, ..
            } => item_children.push(DocumentNode::list(
                *ordered,
                children.iter().filter_map(build_list_item).collect(),
            )),
            _ => {}
        }
    }
    Some(DocumentNode::list_item(item_children))
}

/// Project inline children: text survives, everything else is dropped.
fn text_children(children: &[SyntaxNode]) -> Vec<DocumentNode> {
    children
        .iter()
        .filter_map(|child| match child {
            SyntaxNode::Text { value, .. } => Some(DocumentNode::text(value.clone())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast;
    use crate::model::{DocumentNode, HeadingTag};

    fn build_text(source: &str) -> DocumentNode {
        build(&ast::parse(source).unwrap())
    }

    #[test]
    fn test_paragraph_keeps_text_runs() {
        let root = build_text("Some text.");
        assert_eq!(root.children().len(), 1);
        let DocumentNode::Paragraph { children, .. } = &root.children()[0] else {
            panic!("paragraph expected");
        };
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].text_content(), "Some text.");
    }

    #[test]
    fn test_heading_carries_level_tag() {
        let root = build_text("### Deep");
        let DocumentNode::Heading { tag, .. } = &root.children()[0] else {
            panic!("heading expected");
        };
        assert_eq!(*tag, HeadingTag::H3);
    }

    #[test]
    fn test_inline_formatting_is_dropped() {
        // The projection keeps only plain text runs; styled spans vanish.
        let root = build_text("before *styled* after");
        let paragraph = &root.children()[0];
        assert_eq!(paragraph.text_content(), "before  after");
    }

    #[test]
    fn test_unrecognized_blocks_are_omitted() {
        let root = build_text("# Kept\n\n> quoted away\n\n---\n\nAlso kept.");
        assert_eq!(root.children().len(), 2);
        assert!(matches!(root.children()[0], DocumentNode::Heading { .. }));
        assert!(matches!(
            root.children()[1],
            DocumentNode::Paragraph { .. }
        ));
    }

    #[test]
    fn test_list_projection_nests_items() {
        let root = build_text("- one\n- two\n  - nested\n");
        let DocumentNode::List { ordered, children, .. } = &root.children()[0] else {
            panic!("list expected");
        };
        assert!(!ordered);
        assert_eq!(children.len(), 2);
        let DocumentNode::ListItem { children: item, .. } = &children[1] else {
            panic!("list item expected");
        };
        assert!(item.iter().any(|c| matches!(c, DocumentNode::List { .. })));
    }

    #[test]
    fn test_code_block_nests_literal_text() {
        let root = build_text("```rust\nfn f() {}\n```");
        let DocumentNode::CodeBlock { language, children, .. } = &root.children()[0] else {
            panic!("code block expected");
        };
        assert_eq!(language.as_deref(), Some("rust"));
        assert_eq!(children[0].text_content(), "fn f() {}\n");
    }

    #[test]
    fn test_build_is_deterministic() {
        let tree = ast::parse("# A\n\ntext\n\n- x\n").unwrap();
        assert_eq!(build(&tree), build(&tree));
    }

    #[test]
    fn test_empty_source_builds_empty_root() {
        let root = build_text("");
        assert!(root.children().is_empty());
    }
}
