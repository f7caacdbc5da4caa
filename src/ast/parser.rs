//! Conversion from comrak's arena tree to [`SyntaxNode`].

use comrak::nodes::{AstNode, ListType, NodeValue, Sourcepos};
use comrak::{Arena, Options, parse_document};

use super::{MAX_NESTING_DEPTH, ParseError, Position, SyntaxNode};

/// Parse markdown source into an owned syntax tree.
///
/// Deterministic: identical input always yields a structurally identical
/// tree. Fails only on pathological nesting; no partial tree is returned.
///
/// # Errors
///
/// Returns [`ParseError::NestingTooDeep`] when container nesting exceeds
/// [`MAX_NESTING_DEPTH`].
pub fn parse(source: &str) -> Result<SyntaxNode, ParseError> {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);
    let children = convert_children(root, 0)?;
    Ok(SyntaxNode::Root {
        children,
        position: position_of(root),
    })
}

fn create_options() -> Options {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.subscript = true;

    options
}

/// Outcome of converting one comrak node.
enum Converted {
    /// Maps to a syntax node.
    Node(SyntaxNode),
    /// Kind outside our grammar whose inline content should survive
    /// (strikethrough, superscript, and similar wrappers).
    Splice,
    /// Kind outside our grammar with nothing to keep (images, tables).
    Skip,
}

fn convert_children<'a>(
    node: &'a AstNode<'a>,
    depth: usize,
) -> Result<Vec<SyntaxNode>, ParseError> {
    let mut out = Vec::new();
    for child in node.children() {
        push_converted(child, depth, &mut out)?;
    }
    Ok(out)
}

fn push_converted<'a>(
    node: &'a AstNode<'a>,
    depth: usize,
    out: &mut Vec<SyntaxNode>,
) -> Result<(), ParseError> {
    match convert(node, depth)? {
        Converted::Node(converted) => {
            // Merge adjacent text runs so soft breaks don't fragment them.
            if let (
                Some(SyntaxNode::Text { value: prev, .. }),
                SyntaxNode::Text { value, .. },
            ) = (out.last_mut(), &converted)
            {
                prev.push_str(value);
                return Ok(());
            }
            out.push(converted);
        }
        Converted::Splice => {
            for child in node.children() {
                push_converted(child, depth, out)?;
            }
        }
        Converted::Skip => {}
    }
    Ok(())
}

fn convert<'a>(node: &'a AstNode<'a>, depth: usize) -> Result<Converted, ParseError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ParseError::NestingTooDeep {
            max: MAX_NESTING_DEPTH,
            line: node.data.borrow().sourcepos.start.line,
        });
    }

    let position = position_of(node);
    let converted = match &node.data.borrow().value {
        NodeValue::Paragraph => Converted::Node(SyntaxNode::Paragraph {
            children: convert_children(node, depth + 1)?,
            position,
        }),
        NodeValue::Heading(heading) => Converted::Node(SyntaxNode::Heading {
            depth: heading.level.clamp(1, 6),
            children: convert_children(node, depth + 1)?,
            position,
        }),
        NodeValue::CodeBlock(code_block) => {
            let language = code_block
                .info
                .split_whitespace()
                .next()
                .filter(|s| !s.is_empty())
                .map(ToString::to_string);
            Converted::Node(SyntaxNode::CodeBlock {
                language,
                value: code_block.literal.clone(),
                position,
            })
        }
        NodeValue::List(list) => Converted::Node(SyntaxNode::List {
            ordered: list.list_type == ListType::Ordered,
            children: convert_children(node, depth + 1)?,
            position,
        }),
        NodeValue::Item(_) | NodeValue::TaskItem(_) => Converted::Node(SyntaxNode::ListItem {
            children: convert_children(node, depth + 1)?,
            position,
        }),
        NodeValue::BlockQuote => Converted::Node(SyntaxNode::BlockQuote {
            children: convert_children(node, depth + 1)?,
            position,
        }),
        NodeValue::ThematicBreak => Converted::Node(SyntaxNode::ThematicBreak { position }),
        NodeValue::HtmlBlock(html) => Converted::Node(SyntaxNode::Html {
            value: html.literal.clone(),
            position,
        }),
        NodeValue::HtmlInline(literal) => Converted::Node(SyntaxNode::Html {
            value: literal.clone(),
            position,
        }),
        NodeValue::Text(text) => Converted::Node(SyntaxNode::Text {
            value: text.clone(),
            position,
        }),
        NodeValue::SoftBreak | NodeValue::LineBreak => Converted::Node(SyntaxNode::Text {
            value: "\n".to_string(),
            position,
        }),
        NodeValue::Emph => Converted::Node(SyntaxNode::Emphasis {
            children: convert_children(node, depth + 1)?,
            position,
        }),
        NodeValue::Strong => Converted::Node(SyntaxNode::Strong {
            children: convert_children(node, depth + 1)?,
            position,
        }),
        NodeValue::Code(code) => Converted::Node(SyntaxNode::InlineCode {
            value: code.literal.clone(),
            position,
        }),
        NodeValue::Link(link) => Converted::Node(SyntaxNode::Link {
            url: link.url.clone(),
            children: convert_children(node, depth + 1)?,
            position,
        }),
        // Inline wrappers we don't model; keep their text content.
        NodeValue::Strikethrough
        | NodeValue::Superscript
        | NodeValue::Subscript
        | NodeValue::Underline => Converted::Splice,
        NodeValue::Document => Converted::Node(SyntaxNode::Root {
            children: convert_children(node, depth + 1)?,
            position,
        }),
        _ => Converted::Skip,
    };
    Ok(converted)
}

fn position_of<'a>(node: &'a AstNode<'a>) -> Option<Position> {
    let pos: Sourcepos = node.data.borrow().sourcepos;
    // comrak reports 0:0 for synthesized nodes
    if pos.start.line == 0 {
        return None;
    }
    Some(Position {
        start_line: pos.start.line,
        start_column: pos.start.column,
        end_line: pos.end.line,
        end_column: pos.end.column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heading_and_paragraph() {
        let tree = parse("# Title\n\nSome text.").unwrap();
        let SyntaxNode::Root { children, .. } = &tree else {
            panic!("root expected");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(
            children[0],
            SyntaxNode::Heading { depth: 1, .. }
        ));
        assert!(matches!(children[1], SyntaxNode::Paragraph { .. }));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = "# A\n\n- one\n- two\n\n```rust\nfn f() {}\n```\n";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn test_heading_position_is_one_based() {
        let tree = parse("# Title").unwrap();
        let heading = &tree.children()[0];
        let pos = heading.position().expect("position");
        assert_eq!(pos.start_line, 1);
        assert_eq!(pos.start_column, 1);
    }

    #[test]
    fn test_code_block_keeps_language_and_literal() {
        let tree = parse("```rust\nfn main() {}\n```").unwrap();
        let SyntaxNode::CodeBlock { language, value, .. } = &tree.children()[0] else {
            panic!("code block expected");
        };
        assert_eq!(language.as_deref(), Some("rust"));
        assert_eq!(value, "fn main() {}\n");
    }

    #[test]
    fn test_ordered_list_flag() {
        let tree = parse("1. one\n2. two").unwrap();
        let SyntaxNode::List { ordered, children, .. } = &tree.children()[0] else {
            panic!("list expected");
        };
        assert!(ordered);
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_emphasis_survives_as_inline_container() {
        let tree = parse("some *emphasis* here").unwrap();
        let para = &tree.children()[0];
        assert!(
            para.children()
                .iter()
                .any(|c| matches!(c, SyntaxNode::Emphasis { .. })),
            "paragraph children: {:?}",
            para.children()
        );
    }

    #[test]
    fn test_strikethrough_text_is_spliced() {
        let tree = parse("a ~~gone~~ b").unwrap();
        assert_eq!(tree.children()[0].plain_text(), "a gone b");
    }

    #[test]
    fn test_soft_breaks_merge_into_text_runs() {
        let tree = parse("line one\nline two").unwrap();
        let para = &tree.children()[0];
        assert_eq!(para.children().len(), 1);
        assert_eq!(para.plain_text(), "line one\nline two");
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let source = "> ".repeat(MAX_NESTING_DEPTH + 8) + "x";
        let result = parse(&source);
        assert!(matches!(result, Err(ParseError::NestingTooDeep { .. })));
    }

    #[test]
    fn test_table_is_skipped() {
        // Tables are outside the modeled grammar; parse must not fail.
        let tree = parse("| a | b |\n|---|---|\n| 1 | 2 |").unwrap();
        // Without the table extension enabled this parses as paragraphs,
        // which is fine: the point is no panic and a coherent tree.
        assert!(matches!(tree, SyntaxNode::Root { .. }));
    }
}
