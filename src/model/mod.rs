//! Portable rich-document model.
//!
//! A display-oriented, serializable projection of the syntax tree, shaped
//! after the Lexical editor-state JSON. Rebuilt in full on every successful
//! parse and never mutated in place; [`DocumentState`] is the unit of
//! persistence and transmission.

mod builder;
mod pages;

pub use builder::build;
pub use pages::{DEFAULT_NODES_PER_PAGE, Pages};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Schema version stamped on every node.
pub const NODE_VERSION: u32 = 1;

/// Text direction of a document node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Heading tag, `h1` through `h6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingTag {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingTag {
    /// Tag for a syntax-tree heading depth; out-of-range depths clamp.
    pub const fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => Self::H1,
            2 => Self::H2,
            3 => Self::H3,
            4 => Self::H4,
            5 => Self::H5,
            _ => Self::H6,
        }
    }

    pub const fn level(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
            Self::H5 => 5,
            Self::H6 => 6,
        }
    }
}

/// Shared fields of every element node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMeta {
    /// Style flags; 0 means unstyled.
    #[serde(default)]
    pub format: u32,
    #[serde(default)]
    pub indent: u32,
    pub version: u32,
    #[serde(default)]
    pub direction: Direction,
}

impl Default for ElementMeta {
    fn default() -> Self {
        Self {
            format: 0,
            indent: 0,
            version: NODE_VERSION,
            direction: Direction::Ltr,
        }
    }
}

/// A node of the rich-document model.
///
/// Closed sum type: the builder's kind-mapping table is exhaustively checked
/// against these variants at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentNode {
    Root {
        #[serde(flatten)]
        meta: ElementMeta,
        children: Vec<DocumentNode>,
    },
    Paragraph {
        #[serde(flatten)]
        meta: ElementMeta,
        children: Vec<DocumentNode>,
    },
    Heading {
        tag: HeadingTag,
        #[serde(flatten)]
        meta: ElementMeta,
        children: Vec<DocumentNode>,
    },
    #[serde(rename = "code")]
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(flatten)]
        meta: ElementMeta,
        children: Vec<DocumentNode>,
    },
    List {
        ordered: bool,
        #[serde(flatten)]
        meta: ElementMeta,
        children: Vec<DocumentNode>,
    },
    #[serde(rename = "listitem")]
    ListItem {
        #[serde(flatten)]
        meta: ElementMeta,
        children: Vec<DocumentNode>,
    },
    Text {
        text: String,
        #[serde(default)]
        format: u32,
        version: u32,
    },
}

impl DocumentNode {
    pub fn root(children: Vec<DocumentNode>) -> Self {
        Self::Root {
            meta: ElementMeta::default(),
            children,
        }
    }

    pub fn paragraph(children: Vec<DocumentNode>) -> Self {
        Self::Paragraph {
            meta: ElementMeta::default(),
            children,
        }
    }

    pub fn heading(depth: u8, children: Vec<DocumentNode>) -> Self {
        Self::Heading {
            tag: HeadingTag::from_depth(depth),
            meta: ElementMeta::default(),
            children,
        }
    }

    pub fn code_block(language: Option<String>, children: Vec<DocumentNode>) -> Self {
        Self::CodeBlock {
            language,
            meta: ElementMeta::default(),
            children,
        }
    }

    pub fn list(ordered: bool, children: Vec<DocumentNode>) -> Self {
        Self::List {
            ordered,
            meta: ElementMeta::default(),
            children,
        }
    }

    pub fn list_item(children: Vec<DocumentNode>) -> Self {
        Self::ListItem {
            meta: ElementMeta::default(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            format: 0,
            version: NODE_VERSION,
        }
    }

    /// Child nodes; empty for text leaves.
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            Self::Root { children, .. }
            | Self::Paragraph { children, .. }
            | Self::Heading { children, .. }
            | Self::CodeBlock { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children, .. } => children,
            Self::Text { .. } => &[],
        }
    }

    /// Concatenated text content of this subtree.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text { text, .. } => text.clone(),
            _ => {
                let mut out = String::new();
                for child in self.children() {
                    out.push_str(&child.text_content());
                }
                out
            }
        }
    }
}

/// Failure to serialize or deserialize a document state.
///
/// Fatal only for the operation that needed the serialized form; the last
/// good in-memory tree stays valid.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("invalid document state JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document state root must be a root node, got {0:?}")]
    NotARoot(Box<DocumentNode>),
}

/// A complete serializable document: the unit of persistence/transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentState {
    pub root: DocumentNode,
}

impl DocumentState {
    /// State with a single empty root, used before any upload.
    pub fn empty() -> Self {
        Self {
            root: DocumentNode::root(Vec::new()),
        }
    }

    /// Serialize to the wire format.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::Json`] if encoding fails.
    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize and validate a wire-format state.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or when the top-level node is not
    /// a root.
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        let state: Self = serde_json::from_str(json)?;
        if !matches!(state.root, DocumentNode::Root { .. }) {
            return Err(SerializationError::NotARoot(Box::new(state.root)));
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_tag_round_trip() {
        for depth in 1..=6u8 {
            assert_eq!(HeadingTag::from_depth(depth).level(), depth);
        }
        assert_eq!(HeadingTag::from_depth(0), HeadingTag::H1);
        assert_eq!(HeadingTag::from_depth(9), HeadingTag::H6);
    }

    #[test]
    fn test_json_shape_matches_lexical_convention() {
        let state = DocumentState {
            root: DocumentNode::root(vec![DocumentNode::paragraph(vec![DocumentNode::text(
                "hi",
            )])]),
        };
        let json = state.to_json().unwrap();
        assert!(json.contains(r#""type":"root""#));
        assert!(json.contains(r#""type":"paragraph""#));
        assert!(json.contains(r#""type":"text""#));
        assert!(json.contains(r#""direction":"ltr""#));
        assert!(json.contains(r#""version":1"#));
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let state = DocumentState {
            root: DocumentNode::root(vec![
                DocumentNode::heading(2, vec![DocumentNode::text("T")]),
                DocumentNode::list(
                    true,
                    vec![DocumentNode::list_item(vec![DocumentNode::text("x")])],
                ),
                DocumentNode::code_block(
                    Some("rust".to_string()),
                    vec![DocumentNode::text("fn f() {}")],
                ),
            ]),
        };
        let json = state.to_json().unwrap();
        assert_eq!(DocumentState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            DocumentState::from_json("{not json"),
            Err(SerializationError::Json(_))
        ));
    }

    #[test]
    fn test_non_root_top_level_is_rejected() {
        let json = r#"{"root":{"type":"text","text":"x","format":0,"version":1}}"#;
        assert!(matches!(
            DocumentState::from_json(json),
            Err(SerializationError::NotARoot(_))
        ));
    }
}
