use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::lint::Diagnostic;
use crate::model::{DocumentState, Pages};
use crate::pipeline::Pipeline;
use crate::render::{
    PageObserver, PageView, Strategy, VisibilityWindow, materialize_page, page_height,
    placeholder_page,
};
use crate::ui::DOCUMENT_LEFT_PADDING;
use crate::ui::viewport::Viewport;

/// How long a toast stays visible.
const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Raw markdown source currently loaded
    pub source: String,
    /// Path to the source file
    pub file_path: PathBuf,
    /// Last accepted document state
    pub state: DocumentState,
    /// Diagnostics from the last accepted run
    pub diagnostics: Vec<Diagnostic>,
    /// Version-stamped ingest pipeline
    pub pipeline: Pipeline,
    /// Page materialization strategy
    pub strategy: Strategy,
    /// Root children per page
    pub nodes_per_page: usize,
    /// Viewport managing scroll position
    pub viewport: Viewport,
    /// Whether the diagnostics panel is visible
    pub diagnostics_visible: bool,
    /// Whether file watching is enabled
    pub watch_enabled: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Error from the most recent failed ingest; the previous state stays rendered
    pub last_error: Option<String>,
    window: VisibilityWindow,
    observer: PageObserver,
    page_views: Vec<PageView>,
    page_heights: Vec<usize>,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("watch_enabled", &self.watch_enabled)
            .field("diagnostics", &self.diagnostics.len())
            .field("pages", &self.page_views.len())
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(
            PathBuf::new(),
            String::new(),
            (80, 24),
            Strategy::default(),
            crate::model::DEFAULT_NODES_PER_PAGE,
        )
    }
}

impl Model {
    /// Create a new model and run the initial ingest.
    pub fn new(
        file_path: PathBuf,
        source: String,
        terminal_size: (u16, u16),
        strategy: Strategy,
        nodes_per_page: usize,
    ) -> Self {
        let mut model = Self {
            source: String::new(),
            file_path,
            state: DocumentState::empty(),
            diagnostics: Vec::new(),
            pipeline: Pipeline::new(),
            strategy,
            nodes_per_page: nodes_per_page.max(1),
            viewport: Viewport::new(terminal_size.0, terminal_size.1.saturating_sub(1), 0),
            diagnostics_visible: false,
            watch_enabled: false,
            should_quit: false,
            last_error: None,
            window: VisibilityWindow::new(strategy, 0),
            observer: PageObserver::bind(&VisibilityWindow::new(strategy, 0), &[]),
            page_views: Vec::new(),
            page_heights: Vec::new(),
            toast: None,
        };
        model.replace_document(source);
        model
    }

    /// Content width available for page layout.
    pub fn content_width(&self) -> u16 {
        self.viewport
            .width()
            .saturating_sub(DOCUMENT_LEFT_PADDING)
            .max(1)
    }

    /// Submit new source through the pipeline.
    ///
    /// On success the accepted state replaces the current one and the
    /// materialization window resets to the initial prefix. On parse failure
    /// the previous state stays rendered and the error is surfaced instead.
    pub fn replace_document(&mut self, source: String) {
        match self.pipeline.submit(&source) {
            Ok(run) => {
                if !self.pipeline.accept(&run) {
                    return;
                }
                self.source = source;
                self.diagnostics = run.diagnostics;
                self.state = run.state;
                self.last_error = None;
                self.reset_pages();
            }
            Err(err) => {
                self.source = source;
                self.last_error = Some(err.to_string());
                self.show_toast(ToastLevel::Error, format!("Ingest failed: {err}"));
            }
        }
    }

    /// Reload the watched file from disk and re-ingest.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn reload_from_disk(&mut self) -> Result<()> {
        let source = std::fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        self.replace_document(source);
        Ok(())
    }

    /// Run the bounded repair cycle over the current source and re-ingest
    /// the result. Returns how many diagnostics remain.
    pub fn apply_repair(&mut self) -> usize {
        let (repaired, residual) =
            crate::pipeline::repair_cycle(&self.source, crate::pipeline::DEFAULT_REPAIR_PASSES);
        let residual_count = residual.len();
        if repaired != self.source {
            self.replace_document(repaired);
        }
        residual_count
    }

    /// Rebuild the page set from the current state, resetting the window to
    /// the initial prefix and invalidating outstanding observations.
    fn reset_pages(&mut self) {
        let pages = Pages::new(&self.state.root, self.nodes_per_page);
        self.window.reset(pages.page_count());
        self.rebuild_page_views();
        self.viewport.set_total_rows(self.observer.total_rows());
    }

    /// Recompute layout after a width change. Window membership survives,
    /// only the line layout is redone.
    pub fn relayout(&mut self) {
        self.rebuild_page_views();
        self.viewport.set_total_rows(self.observer.total_rows());
    }

    /// Feed the currently visible rows back into the window and materialize
    /// whatever the strategy admits. Returns true when pages changed.
    pub fn sync_window(&mut self) -> bool {
        let events = self.observer.events_for(&self.viewport.visible_range());
        let token = self.observer.token();
        let mut changed = false;
        for event in events {
            if self.window.observe(token, event) {
                changed = true;
            }
        }
        if changed {
            self.rebuild_page_views();
            self.viewport.set_total_rows(self.observer.total_rows());
        }
        changed
    }

    fn rebuild_page_views(&mut self) {
        let width = self.content_width();
        let pages = Pages::new(&self.state.root, self.nodes_per_page);
        self.page_heights = pages.iter().map(|nodes| page_height(nodes, width)).collect();
        self.page_views = (0..pages.page_count())
            .map(|i| {
                if self.window.is_materialized(i) {
                    materialize_page(i, pages.slice(i), width)
                } else {
                    placeholder_page(i, self.page_heights[i])
                }
            })
            .collect();
        self.observer = PageObserver::bind(&self.window, &self.page_heights);
    }

    /// The page views in document order.
    pub fn page_views(&self) -> &[PageView] {
        &self.page_views
    }

    /// Presentation lines for the current viewport, in render order.
    pub fn visible_lines(&self) -> Vec<&crate::render::PageLine> {
        let range = self.viewport.visible_range();
        self.page_views
            .iter()
            .flat_map(|view| view.lines.iter())
            .skip(range.start)
            .take(range.len())
            .collect()
    }

    pub const fn window(&self) -> &VisibilityWindow {
        &self.window
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|t| (t.message.as_str(), t.level))
    }

    /// Drop the toast once expired. Returns true when one was removed.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
            return true;
        }
        false
    }

    /// Whether the given path has a markdown extension.
    pub fn is_markdown_path(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                matches!(
                    ext.to_ascii_lowercase().as_str(),
                    "md" | "markdown" | "mdown" | "mkd"
                )
            })
    }
}
