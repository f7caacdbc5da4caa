//! Structural linting of markdown source.
//!
//! A fixed, ordered set of rules runs over the raw text and the parsed
//! syntax tree. Rule order is the output order: diagnostics are appended in
//! detection order and are stable across calls for identical input. A rule
//! that fails internally contributes no diagnostics; it never aborts the
//! pipeline.

use std::fmt;
use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::ast::SyntaxNode;

/// Indentation unit expected before nested list markers.
pub const LIST_INDENT_UNIT: usize = 2;

/// Maximum run of consecutive blank lines tolerated.
pub const MAX_CONSECUTIVE_BLANK_LINES: usize = 2;

/// A structural-defect report with an optional 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub reason: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl Diagnostic {
    fn at(reason: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            reason: reason.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    fn unpositioned(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            line: None,
            column: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{line}:{column} {}", self.reason),
            (Some(line), None) => write!(f, "{line} {}", self.reason),
            _ => write!(f, "unknown position: {}", self.reason),
        }
    }
}

/// Internal failure of a single rule; recovered by the runner.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule expects a root syntax node, got {0}")]
    NotARoot(&'static str),
}

type RuleFn = fn(&str, &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError>;

struct Rule {
    name: &'static str,
    check: RuleFn,
}

/// The fixed rule set, in evaluation order.
const RULES: &[Rule] = &[
    Rule {
        name: "heading-space",
        check: check_heading_space,
    },
    Rule {
        name: "list-item-indent",
        check: check_list_item_indent,
    },
    Rule {
        name: "consecutive-blank-lines",
        check: check_consecutive_blank_lines,
    },
    Rule {
        name: "trailing-whitespace",
        check: check_trailing_whitespace,
    },
    Rule {
        name: "final-newline",
        check: check_final_newline,
    },
    Rule {
        name: "heading-increment",
        check: check_heading_increment,
    },
];

/// Run every rule against one document snapshot.
///
/// Never fails: a rule error is downgraded to "no diagnostics from that
/// rule". An empty result means the document is clean.
pub fn lint(source: &str, tree: &SyntaxNode) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for rule in RULES {
        match (rule.check)(source, tree) {
            Ok(found) => diagnostics.extend(found),
            Err(err) => {
                tracing::warn!(rule = rule.name, error = %err, "lint rule failed, skipping");
            }
        }
    }
    diagnostics
}

/// 1-based line spans of every code block, fences included.
///
/// The text rules skip these lines: a `#` or list marker inside a code
/// block is code, not structure, and must never gate a rewrite.
fn code_block_lines(tree: &SyntaxNode) -> Vec<RangeInclusive<usize>> {
    fn collect(node: &SyntaxNode, out: &mut Vec<RangeInclusive<usize>>) {
        if let SyntaxNode::CodeBlock { position, .. } = node {
            if let Some(pos) = position {
                out.push(pos.start_line..=pos.end_line);
            }
            return;
        }
        for child in node.children() {
            collect(child, out);
        }
    }
    let mut spans = Vec::new();
    collect(tree, &mut spans);
    spans
}

fn in_code_block(spans: &[RangeInclusive<usize>], line: usize) -> bool {
    spans.iter().any(|span| span.contains(&line))
}

static UNSPACED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[^#\s]").expect("valid regex"));

fn check_heading_space(source: &str, tree: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
    let code_spans = code_block_lines(tree);
    let mut out = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if in_code_block(&code_spans, idx + 1) {
            continue;
        }
        if UNSPACED_HEADING.is_match(line) {
            out.push(Diagnostic::at(
                "Missing space after # in heading",
                idx + 1,
                1,
            ));
        }
    }
    Ok(out)
}

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)([-*+]|\d{1,9}[.)])\s").expect("valid regex"));

fn check_list_item_indent(source: &str, tree: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
    let code_spans = code_block_lines(tree);
    let mut out = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if in_code_block(&code_spans, idx + 1) {
            continue;
        }
        let Some(captures) = LIST_MARKER.captures(line) else {
            continue;
        };
        let indent = &captures[1];
        if indent.contains('\t') || indent.len() % LIST_INDENT_UNIT != 0 {
            out.push(Diagnostic::at(
                format!(
                    "List item has incorrect indentation: expected a multiple of {LIST_INDENT_UNIT} spaces"
                ),
                idx + 1,
                indent.len() + 1,
            ));
        }
    }
    Ok(out)
}

fn check_consecutive_blank_lines(
    source: &str,
    tree: &SyntaxNode,
) -> Result<Vec<Diagnostic>, RuleError> {
    let code_spans = code_block_lines(tree);
    let mut out = Vec::new();
    let mut run = 0usize;
    for (idx, line) in source.lines().enumerate() {
        if in_code_block(&code_spans, idx + 1) {
            run = 0;
            continue;
        }
        if line.trim().is_empty() {
            run += 1;
            if run == MAX_CONSECUTIVE_BLANK_LINES + 1 {
                // One diagnostic per run, reported at the first excess line.
                out.push(Diagnostic::at(
                    format!(
                        "More than {MAX_CONSECUTIVE_BLANK_LINES} consecutive blank lines"
                    ),
                    idx + 1,
                    1,
                ));
            }
        } else {
            run = 0;
        }
    }
    Ok(out)
}

fn check_trailing_whitespace(
    source: &str,
    tree: &SyntaxNode,
) -> Result<Vec<Diagnostic>, RuleError> {
    let code_spans = code_block_lines(tree);
    let mut out = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if in_code_block(&code_spans, idx + 1) {
            continue;
        }
        let trimmed = line.trim_end();
        if trimmed.len() < line.len() {
            out.push(Diagnostic::at(
                "Trailing whitespace",
                idx + 1,
                trimmed.chars().count() + 1,
            ));
        }
    }
    Ok(out)
}

fn check_final_newline(source: &str, _tree: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
    if source.is_empty() || source.ends_with('\n') {
        return Ok(Vec::new());
    }
    // No meaningful position for an absent character.
    Ok(vec![Diagnostic::unpositioned("Missing final newline")])
}

fn check_heading_increment(
    _source: &str,
    tree: &SyntaxNode,
) -> Result<Vec<Diagnostic>, RuleError> {
    let SyntaxNode::Root { children, .. } = tree else {
        return Err(RuleError::NotARoot(tree.kind()));
    };
    let mut out = Vec::new();
    let mut previous: Option<u8> = None;
    for node in children {
        let SyntaxNode::Heading { depth, position, .. } = node else {
            continue;
        };
        if let Some(prev) = previous
            && *depth > prev + 1
        {
            let (line, column) = position.map_or((None, None), |p| {
                (Some(p.start_line), Some(p.start_column))
            });
            out.push(Diagnostic {
                reason: format!("Heading level jumps from h{prev} to h{depth}"),
                line,
                column,
            });
        }
        previous = Some(*depth);
    }
    Ok(out)
}
