//! Pipeline orchestration: parse, lint, build, versioned publication.
//!
//! Each submitted source snapshot gets a monotonically increasing version.
//! Linting runs on a scoped worker thread while the document model is built
//! on the calling thread; both read the same immutable snapshot and are
//! joined before the combined result is returned. Acceptance is
//! last-submitted-version-wins: a result raced out by a newer submission is
//! rejected regardless of completion order.

use crate::ast::{self, ParseError, SyntaxNode};
use crate::lint::{self, Diagnostic};
use crate::model::{self, DocumentState};
use crate::repair;

/// Default bound on repair/relint passes.
pub const DEFAULT_REPAIR_PASSES: usize = 4;

/// The joined result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    /// Version stamped at submission.
    pub version: u64,
    /// The parsed syntax tree.
    pub tree: SyntaxNode,
    /// Structural diagnostics, in rule order. Empty means clean.
    pub diagnostics: Vec<Diagnostic>,
    /// The serializable rich-document state.
    pub state: DocumentState,
}

/// Versioned pipeline front door.
#[derive(Debug, Default)]
pub struct Pipeline {
    submitted: u64,
    accepted: Option<u64>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full pipeline on one source snapshot.
    ///
    /// # Errors
    ///
    /// A [`ParseError`] is fatal for this run; no partial result is
    /// produced and previously accepted state is untouched.
    pub fn submit(&mut self, source: &str) -> Result<PipelineRun, ParseError> {
        self.submitted += 1;
        let version = self.submitted;
        tracing::debug!(version, bytes = source.len(), "pipeline run submitted");

        let tree = ast::parse(source)?;
        let (diagnostics, state) = std::thread::scope(|scope| {
            let lint_task = scope.spawn(|| lint::lint(source, &tree));
            let state = DocumentState {
                root: model::build(&tree),
            };
            // A panicking lint worker yields no diagnostics for this run.
            (lint_task.join().unwrap_or_default(), state)
        });

        tracing::debug!(
            version,
            diagnostics = diagnostics.len(),
            nodes = state.root.children().len(),
            "pipeline run complete"
        );
        Ok(PipelineRun {
            version,
            tree,
            diagnostics,
            state,
        })
    }

    /// Accept a completed run, unless a newer submission superseded it.
    ///
    /// Returns false for stale runs; the caller must discard them.
    pub fn accept(&mut self, run: &PipelineRun) -> bool {
        if run.version != self.submitted {
            tracing::debug!(
                version = run.version,
                submitted = self.submitted,
                "discarding stale pipeline run"
            );
            return false;
        }
        self.accepted = Some(run.version);
        true
    }

    /// Version of the most recently accepted run, if any.
    pub const fn accepted_version(&self) -> Option<u64> {
        self.accepted
    }
}

/// Repair, re-lint, and repeat until clean, stable, or out of passes.
///
/// Returns the final text and its residual diagnostics (empty when the
/// repaired text lints clean). Text that fails to parse mid-cycle is
/// returned as-is with the diagnostics that triggered the last repair.
pub fn repair_cycle(source: &str, max_passes: usize) -> (String, Vec<Diagnostic>) {
    let mut text = source.to_string();
    let mut diagnostics = match ast::parse(&text) {
        Ok(tree) => lint::lint(&text, &tree),
        Err(_) => return (text, Vec::new()),
    };

    for pass in 0..max_passes {
        if diagnostics.is_empty() {
            return (text, diagnostics);
        }
        let fixed = repair::repair(&text, &diagnostics);
        if fixed == text {
            // No rule applied; remaining diagnostics are residual.
            return (text, diagnostics);
        }
        tracing::debug!(pass, "repair pass rewrote the document");
        text = fixed;
        diagnostics = match ast::parse(&text) {
            Ok(tree) => lint::lint(&text, &tree),
            Err(_) => return (text, diagnostics),
        };
    }
    (text, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_produces_joined_result() {
        let mut pipeline = Pipeline::new();
        let run = pipeline.submit("#Title\n\nSome text.\n").unwrap();
        assert_eq!(run.version, 1);
        assert!(!run.diagnostics.is_empty());
        assert_eq!(run.state.root.children().len(), 2);
    }

    #[test]
    fn test_versions_increase_monotonically() {
        let mut pipeline = Pipeline::new();
        let first = pipeline.submit("a\n").unwrap();
        let second = pipeline.submit("b\n").unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
    }

    #[test]
    fn test_last_submitted_version_wins() {
        let mut pipeline = Pipeline::new();
        let stale = pipeline.submit("old\n").unwrap();
        let fresh = pipeline.submit("new\n").unwrap();

        // Completion order is irrelevant: the stale run loses even when
        // offered last.
        assert!(pipeline.accept(&fresh));
        assert!(!pipeline.accept(&stale));
        assert_eq!(pipeline.accepted_version(), Some(fresh.version));
    }

    #[test]
    fn test_parse_error_leaves_no_partial_result() {
        let mut pipeline = Pipeline::new();
        let good = pipeline.submit("fine\n").unwrap();
        assert!(pipeline.accept(&good));

        let deep = "> ".repeat(200) + "x";
        assert!(pipeline.submit(&deep).is_err());
        assert_eq!(pipeline.accepted_version(), Some(good.version));
    }

    #[test]
    fn test_repair_cycle_reaches_clean_state() {
        let (text, diagnostics) =
            repair_cycle("#Title\n\nSome text.\n\n\n\nMore text.\n", DEFAULT_REPAIR_PASSES);
        assert_eq!(text, "# Title\n\nSome text.\n\nMore text.\n");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_repair_cycle_reports_residual_diagnostics() {
        // Missing final newline has no repair rule: it stays residual.
        let (text, diagnostics) = repair_cycle("body  ", DEFAULT_REPAIR_PASSES);
        assert_eq!(text, "body");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].reason.contains("final newline"));
    }

    #[test]
    fn test_repair_cycle_leaves_code_block_content_alone() {
        // A `#` at the start of a code line is code, not a heading; the
        // cycle must not rewrite it.
        let source = "# Title\n\n```c\n#include <stdio.h>\n```\n";
        let (text, diagnostics) = repair_cycle(source, DEFAULT_REPAIR_PASSES);
        assert_eq!(text, source);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_repair_cycle_noop_on_clean_text() {
        let source = "# Title\n\nBody.\n";
        let (text, diagnostics) = repair_cycle(source, DEFAULT_REPAIR_PASSES);
        assert_eq!(text, source);
        assert!(diagnostics.is_empty());
    }
}
