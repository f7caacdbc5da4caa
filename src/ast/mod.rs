//! Markdown syntax tree.
//!
//! The grammar itself is comrak's; [`parse`] converts the arena-allocated
//! comrak tree into an owned [`SyntaxNode`] tree that the linter and the
//! document model builder consume.

mod parser;

pub use parser::parse;

use thiserror::Error;

/// Maximum container nesting accepted before a parse is rejected.
///
/// Deeply nested input (thousands of `>` markers, for instance) would
/// otherwise recurse without bound during conversion.
pub const MAX_NESTING_DEPTH: usize = 128;

/// A 1-based line/column span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

/// Parsed markdown structure.
///
/// Closed set of node kinds: the display model recognizes a subset of these
/// and silently drops the rest (the lossy-projection policy lives in
/// [`crate::model::build`], not here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    /// Document root.
    Root {
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
    /// Block of inline content.
    Paragraph {
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
    /// ATX or setext heading, depth 1-6.
    Heading {
        depth: u8,
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
    /// Fenced or indented code block.
    CodeBlock {
        language: Option<String>,
        value: String,
        position: Option<Position>,
    },
    /// Ordered or bullet list.
    List {
        ordered: bool,
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
    /// An item within a list.
    ListItem {
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
    /// Quoted block.
    BlockQuote {
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
    /// Horizontal rule.
    ThematicBreak { position: Option<Position> },
    /// Raw HTML block, kept verbatim.
    Html {
        value: String,
        position: Option<Position>,
    },
    /// Plain text run.
    Text {
        value: String,
        position: Option<Position>,
    },
    /// Emphasized inline span.
    Emphasis {
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
    /// Strong inline span.
    Strong {
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
    /// Inline code span.
    InlineCode {
        value: String,
        position: Option<Position>,
    },
    /// Hyperlink with inline content.
    Link {
        url: String,
        children: Vec<SyntaxNode>,
        position: Option<Position>,
    },
}

impl SyntaxNode {
    /// Short kind name, as shown by `--ast`.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Root { .. } => "root",
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::CodeBlock { .. } => "code",
            Self::List { .. } => "list",
            Self::ListItem { .. } => "listItem",
            Self::BlockQuote { .. } => "blockquote",
            Self::ThematicBreak { .. } => "thematicBreak",
            Self::Html { .. } => "html",
            Self::Text { .. } => "text",
            Self::Emphasis { .. } => "emphasis",
            Self::Strong { .. } => "strong",
            Self::InlineCode { .. } => "inlineCode",
            Self::Link { .. } => "link",
        }
    }

    /// Child nodes; empty for leaf kinds.
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            Self::Root { children, .. }
            | Self::Paragraph { children, .. }
            | Self::Heading { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children, .. }
            | Self::BlockQuote { children, .. }
            | Self::Emphasis { children, .. }
            | Self::Strong { children, .. }
            | Self::Link { children, .. } => children,
            Self::CodeBlock { .. }
            | Self::ThematicBreak { .. }
            | Self::Html { .. }
            | Self::Text { .. }
            | Self::InlineCode { .. } => &[],
        }
    }

    /// Literal value for leaf kinds, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::CodeBlock { value, .. }
            | Self::Html { value, .. }
            | Self::Text { value, .. }
            | Self::InlineCode { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Source span, when the parser reported one.
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Root { position, .. }
            | Self::Paragraph { position, .. }
            | Self::Heading { position, .. }
            | Self::CodeBlock { position, .. }
            | Self::List { position, .. }
            | Self::ListItem { position, .. }
            | Self::BlockQuote { position, .. }
            | Self::ThematicBreak { position }
            | Self::Html { position, .. }
            | Self::Text { position, .. }
            | Self::Emphasis { position, .. }
            | Self::Strong { position, .. }
            | Self::InlineCode { position, .. }
            | Self::Link { position, .. } => *position,
        }
    }

    /// Concatenated plain text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Self::Text { value, .. } | Self::InlineCode { value, .. } = self {
            out.push_str(value);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }
}

/// Fatal parse failure; no partial tree is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("markdown nesting exceeds {max} levels at line {line}")]
    NestingTooDeep { max: usize, line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_ast_display() {
        let node = SyntaxNode::Heading {
            depth: 2,
            children: Vec::new(),
            position: None,
        };
        assert_eq!(node.kind(), "heading");
    }

    #[test]
    fn test_leaf_has_no_children() {
        let node = SyntaxNode::Text {
            value: "hi".to_string(),
            position: None,
        };
        assert!(node.children().is_empty());
        assert_eq!(node.value(), Some("hi"));
    }

    #[test]
    fn test_plain_text_flattens_inline_spans() {
        let node = SyntaxNode::Paragraph {
            children: vec![
                SyntaxNode::Text {
                    value: "a ".to_string(),
                    position: None,
                },
                SyntaxNode::Strong {
                    children: vec![SyntaxNode::Text {
                        value: "b".to_string(),
                        position: None,
                    }],
                    position: None,
                },
            ],
            position: None,
        };
        assert_eq!(node.plain_text(), "a b");
    }
}
