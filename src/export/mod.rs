//! Minimal HTML export of the document model.
//!
//! One-directional fixed mapping (no round-trip guarantee):
//! Heading→`h{level}`, Paragraph→`p`, CodeBlock→`pre><code`,
//! List→`ul`/`ol` with `li` per item, Text→escaped text.

use crate::model::{DocumentNode, DocumentState, SerializationError};

/// Render a document node to HTML.
pub fn render_html(node: &DocumentNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Deserialize a wire-format state and render it to HTML.
///
/// # Errors
///
/// Returns a [`SerializationError`] for malformed input; the failure is
/// fatal for this export only.
pub fn export_html(json: &str) -> Result<String, SerializationError> {
    let state = DocumentState::from_json(json)?;
    Ok(render_html(&state.root))
}

fn write_node(node: &DocumentNode, out: &mut String) {
    match node {
        DocumentNode::Root { children, .. } => {
            for child in children {
                write_node(child, out);
                out.push('\n');
            }
        }
        DocumentNode::Paragraph { children, .. } => {
            out.push_str("<p>");
            write_children(children, out);
            out.push_str("</p>");
        }
        DocumentNode::Heading { tag, children, .. } => {
            let level = tag.level();
            out.push_str(&format!("<h{level}>"));
            write_children(children, out);
            out.push_str(&format!("</h{level}>"));
        }
        DocumentNode::CodeBlock {
            language, children, ..
        } => {
            match language {
                Some(lang) => {
                    out.push_str("<pre><code class=\"language-");
                    html_escape::encode_double_quoted_attribute_to_string(lang, out);
                    out.push_str("\">");
                }
                None => out.push_str("<pre><code>"),
            }
            write_children(children, out);
            out.push_str("</code></pre>");
        }
        DocumentNode::List {
            ordered, children, ..
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>"));
            write_children(children, out);
            out.push_str(&format!("</{tag}>"));
        }
        DocumentNode::ListItem { children, .. } => {
            out.push_str("<li>");
            write_children(children, out);
            out.push_str("</li>");
        }
        DocumentNode::Text { text, .. } => {
            html_escape::encode_text_to_string(text, out);
        }
    }
}

fn write_children(children: &[DocumentNode], out: &mut String) {
    for child in children {
        write_node(child, out);
    }
}
