//! Visibility-driven page materialization state machine.
//!
//! Each page is either materialized or a placeholder. Transitions are driven
//! by observation events; a generation counter invalidates observations that
//! were bound to a superseded document.

use std::collections::BTreeSet;

/// Pages materialized up front.
pub const DEFAULT_INITIAL_PAGES: usize = 3;

/// Pages appended per sentinel hit under the monotonic strategy.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// Windowing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Sliding window of at most three pages centered on the last visible
    /// page; pages leaving the window are released.
    #[default]
    Neighbor,
    /// Append-only growth triggered by the trailing sentinel; nothing is
    /// released until a document reset.
    Monotonic,
}

/// A visibility report from the viewport observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEvent {
    /// A specific page intersected the viewport.
    PageVisible(usize),
    /// The trailing sentinel after the last materialized page intersected
    /// the viewport.
    SentinelVisible,
}

/// Token binding an observation to one document generation.
///
/// Events delivered with a stale token are ignored, so observations bound to
/// a replaced document can never fire state updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationToken(u64);

/// Materialization state over all pages of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityWindow {
    strategy: Strategy,
    page_count: usize,
    initial_pages: usize,
    batch_size: usize,
    generation: u64,
    materialized: BTreeSet<usize>,
}

impl VisibilityWindow {
    pub fn new(strategy: Strategy, page_count: usize) -> Self {
        let mut window = Self {
            strategy,
            page_count,
            initial_pages: DEFAULT_INITIAL_PAGES,
            batch_size: DEFAULT_BATCH_SIZE,
            generation: 0,
            materialized: BTreeSet::new(),
        };
        window.materialize_prefix();
        window
    }

    /// Override the initial prefix size.
    #[must_use]
    pub fn with_initial_pages(mut self, initial_pages: usize) -> Self {
        self.initial_pages = initial_pages.max(1);
        self.materialized.clear();
        self.materialize_prefix();
        self
    }

    /// Override the monotonic growth batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// Token for the current document generation.
    pub const fn token(&self) -> ObservationToken {
        ObservationToken(self.generation)
    }

    pub fn is_materialized(&self, page: usize) -> bool {
        self.materialized.contains(&page)
    }

    /// Materialized page indices, in document order.
    pub fn materialized(&self) -> impl Iterator<Item = usize> + '_ {
        self.materialized.iter().copied()
    }

    pub fn materialized_count(&self) -> usize {
        self.materialized.len()
    }

    /// Atomically rebind the window to a replaced document.
    ///
    /// Resets to the initial prefix and bumps the generation so that any
    /// observation still holding the old token becomes inert.
    pub fn reset(&mut self, page_count: usize) {
        self.page_count = page_count;
        self.generation += 1;
        self.materialized.clear();
        self.materialize_prefix();
        tracing::debug!(
            page_count,
            generation = self.generation,
            "visibility window reset"
        );
    }

    /// Apply one visibility event.
    ///
    /// Returns true when the materialized set changed. Stale tokens and
    /// redundant transitions (window unchanged) are no-ops, so the caller
    /// can skip downstream re-render work when this returns false.
    pub fn observe(&mut self, token: ObservationToken, event: VisibilityEvent) -> bool {
        if token.0 != self.generation {
            tracing::trace!(?event, "ignoring observation from stale generation");
            return false;
        }
        if self.page_count == 0 {
            return false;
        }
        let next = match (self.strategy, event) {
            (Strategy::Neighbor, VisibilityEvent::PageVisible(page)) => {
                self.neighbor_set(page.min(self.page_count - 1))
            }
            (Strategy::Monotonic, VisibilityEvent::SentinelVisible) => {
                let mut next = self.materialized.clone();
                let grown = self.materialized.len().saturating_add(self.batch_size);
                next.extend(self.materialized.len()..grown.min(self.page_count));
                next
            }
            // Events the active strategy does not subscribe to.
            _ => return false,
        };
        if next == self.materialized {
            return false;
        }
        self.materialized = next;
        true
    }

    fn neighbor_set(&self, center: usize) -> BTreeSet<usize> {
        let mut next = BTreeSet::new();
        next.insert(center);
        if center > 0 {
            next.insert(center - 1);
        }
        if center + 1 < self.page_count {
            next.insert(center + 1);
        }
        next
    }

    fn materialize_prefix(&mut self) {
        self.materialized
            .extend(0..self.initial_pages.min(self.page_count));
    }
}
