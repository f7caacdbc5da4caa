//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::model::DEFAULT_NODES_PER_PAGE;
use crate::render::Strategy;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    watch_enabled: bool,
    fix_enabled: bool,
    strategy: Strategy,
    nodes_per_page: usize,
}

impl App {
    /// Create a new application for the given file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            watch_enabled: false,
            fix_enabled: false,
            strategy: Strategy::default(),
            nodes_per_page: DEFAULT_NODES_PER_PAGE,
        }
    }

    /// Enable or disable file watching.
    #[must_use]
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Run the repair cycle once before first render.
    #[must_use]
    pub const fn with_fix(mut self, enabled: bool) -> Self {
        self.fix_enabled = enabled;
        self
    }

    /// Set the page materialization strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set how many root nodes each page holds.
    #[must_use]
    pub fn with_nodes_per_page(mut self, nodes_per_page: usize) -> Self {
        self.nodes_per_page = nodes_per_page.max(1);
        self
    }
}
