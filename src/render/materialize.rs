//! Page materialization: document nodes to presentation lines.
//!
//! A materialized page is a read-only line structure scoped to just that
//! page's nodes. A placeholder reserves exactly the same number of rows so
//! releasing or adding pages never shifts the scroll position.

use unicode_width::UnicodeWidthChar;

use crate::model::DocumentNode;

/// Kind of a presentation line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Heading text with level (1-6)
    Heading(u8),
    /// Paragraph text
    Paragraph,
    /// Code block fence/label line
    CodeFence,
    /// Code block content line
    Code,
    /// List item line with nesting depth
    ListItem(usize),
    /// Spacer between blocks
    Blank,
    /// Reserved row of an unmaterialized page
    Placeholder,
}

/// One presentation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    pub content: String,
    pub kind: LineKind,
}

impl PageLine {
    fn new(content: impl Into<String>, kind: LineKind) -> Self {
        Self {
            content: content.into(),
            kind,
        }
    }

    const fn blank() -> Self {
        Self {
            content: String::new(),
            kind: LineKind::Blank,
        }
    }
}

/// A page's live presentation: real lines or equal-height placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub index: usize,
    pub materialized: bool,
    pub lines: Vec<PageLine>,
}

impl PageView {
    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

/// Materialize one page's node slice into presentation lines.
pub fn materialize_page(index: usize, nodes: &[DocumentNode], width: u16) -> PageView {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    for node in nodes {
        write_block(node, width, &mut lines);
    }
    PageView {
        index,
        materialized: true,
        lines,
    }
}

/// An unmaterialized page: `height` reserved placeholder rows.
pub fn placeholder_page(index: usize, height: usize) -> PageView {
    PageView {
        index,
        materialized: false,
        lines: vec![PageLine::new(String::new(), LineKind::Placeholder); height],
    }
}

/// Row count a page occupies, materialized or not.
///
/// Computed by the same layout pass as [`materialize_page`] so placeholders
/// always reserve exactly the materialized height.
pub fn page_height(nodes: &[DocumentNode], width: u16) -> usize {
    materialize_page(0, nodes, width).height()
}

fn write_block(node: &DocumentNode, width: usize, lines: &mut Vec<PageLine>) {
    match node {
        DocumentNode::Heading { tag, .. } => {
            let level = tag.level();
            let prefix = "#".repeat(usize::from(level));
            lines.push(PageLine::new(
                format!("{prefix} {}", node.text_content()),
                LineKind::Heading(level),
            ));
            lines.push(PageLine::blank());
        }
        DocumentNode::Paragraph { .. } => {
            let text = node.text_content();
            for wrapped in wrap_text(&text, width) {
                lines.push(PageLine::new(wrapped, LineKind::Paragraph));
            }
            lines.push(PageLine::blank());
        }
        DocumentNode::CodeBlock { language, .. } => {
            let label = language.as_deref().unwrap_or("");
            lines.push(PageLine::new(format!("```{label}"), LineKind::CodeFence));
            let literal = node.text_content();
            for raw in literal.lines() {
                lines.push(PageLine::new(raw, LineKind::Code));
            }
            lines.push(PageLine::new("```", LineKind::CodeFence));
            lines.push(PageLine::blank());
        }
        DocumentNode::List { .. } => {
            write_list(node, 0, width, lines);
            lines.push(PageLine::blank());
        }
        // Root never appears inside a page; bare text/items have no block
        // rendering of their own.
        _ => {}
    }
}

fn write_list(list: &DocumentNode, depth: usize, width: usize, lines: &mut Vec<PageLine>) {
    let DocumentNode::List { ordered, children, .. } = list else {
        return;
    };
    for (position, item) in children.iter().enumerate() {
        let marker = if *ordered {
            format!("{}. ", position + 1)
        } else {
            "- ".to_string()
        };
        let indent = "  ".repeat(depth);
        let text: String = item
            .children()
            .iter()
            .filter(|c| matches!(c, DocumentNode::Text { .. }))
            .map(DocumentNode::text_content)
            .collect();
        let lead = format!("{indent}{marker}");
        let continuation = " ".repeat(lead.chars().count());
        let available = width.saturating_sub(lead.chars().count()).max(1);
        for (i, wrapped) in wrap_text(&text, available).into_iter().enumerate() {
            let prefix = if i == 0 { &lead } else { &continuation };
            lines.push(PageLine::new(
                format!("{prefix}{wrapped}"),
                LineKind::ListItem(depth),
            ));
        }
        for nested in item
            .children()
            .iter()
            .filter(|c| matches!(c, DocumentNode::List { .. }))
        {
            write_list(nested, depth + 1, width, lines);
        }
    }
}

/// Greedy display-width word wrap. Soft breaks in the text count as spaces.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = display_width(word);
        let sep = usize::from(!current.is_empty());
        if current_width + sep + word_width <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }
        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
        } else {
            // Hard-break words wider than the content area.
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}
