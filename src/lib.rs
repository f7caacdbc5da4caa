// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. render::PageLine)
    clippy::module_name_repetitions
)]

//! # Markwell
//!
//! A markdown ingest pipeline and terminal viewer.
//!
//! Markwell turns raw markdown into a lint-checked, repairable document
//! model and renders it in fixed-size pages:
//! - Structural lint diagnostics with source positions
//! - A bounded auto-repair cycle for common formatting mistakes
//! - A serializable rich-document model with HTML export
//! - Windowed pagination that materializes pages near the viewport
//! - File watching for live preview
//!
//! ## Architecture
//!
//! Markwell uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`ast`]: Markdown parsing into a positioned syntax tree
//! - [`lint`]: Structural rules and diagnostics
//! - [`repair`]: Text rewrites driven by diagnostics
//! - [`model`]: The rich document model and pagination
//! - [`pipeline`]: Versioned ingest orchestration
//! - [`render`]: Windowed page materialization
//! - [`export`]: HTML export of the document model
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: File watching

pub mod app;
pub mod ast;
pub mod config;
pub mod export;
pub mod lint;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod repair;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::ast::SyntaxNode;
    pub use crate::lint::Diagnostic;
    pub use crate::model::{DocumentNode, DocumentState};
    pub use crate::pipeline::Pipeline;
    pub use crate::render::{Strategy, VisibilityWindow};
    pub use crate::ui::viewport::Viewport;
}
