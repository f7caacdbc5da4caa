//! Viewport observation: scroll position to visibility events.
//!
//! The observer is an explicitly owned, scoped resource. It is bound to one
//! document generation at creation; when the document is replaced the old
//! observer is dropped and a fresh one bound, so its events carry a token
//! the window will reject. No process-wide state.

use std::ops::Range;

use super::window::{ObservationToken, VisibilityEvent, VisibilityWindow};

/// Maps visible rows to page/sentinel visibility events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageObserver {
    token: ObservationToken,
    /// Row span of each page, in document order.
    bounds: Vec<Range<usize>>,
    /// First row past the last page; reaching it means the trailing
    /// sentinel is on screen.
    sentinel_row: usize,
}

impl PageObserver {
    /// Bind an observer to the window's current generation.
    pub fn bind(window: &VisibilityWindow, page_heights: &[usize]) -> Self {
        let mut bounds = Vec::with_capacity(page_heights.len());
        let mut row = 0usize;
        for height in page_heights {
            bounds.push(row..row + height);
            row += height;
        }
        Self {
            token: window.token(),
            bounds,
            sentinel_row: row,
        }
    }

    pub const fn token(&self) -> ObservationToken {
        self.token
    }

    /// Total rows across all pages.
    pub const fn total_rows(&self) -> usize {
        self.sentinel_row
    }

    /// Events for the rows currently on screen, top to bottom.
    ///
    /// Page events report every page intersecting the viewport; the trailing
    /// sentinel fires when the viewport reaches the end of the last page.
    pub fn events_for(&self, visible: &Range<usize>) -> Vec<VisibilityEvent> {
        let mut events = Vec::new();
        for (page, bounds) in self.bounds.iter().enumerate() {
            if bounds.start < visible.end && visible.start < bounds.end {
                events.push(VisibilityEvent::PageVisible(page));
            }
        }
        if visible.end >= self.sentinel_row {
            events.push(VisibilityEvent::SentinelVisible);
        }
        events
    }

    /// The page containing `row`, if any.
    pub fn page_at(&self, row: usize) -> Option<usize> {
        self.bounds
            .iter()
            .position(|bounds| bounds.contains(&row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::window::Strategy;

    fn observer(heights: &[usize]) -> (VisibilityWindow, PageObserver) {
        let window = VisibilityWindow::new(Strategy::Neighbor, heights.len());
        let observer = PageObserver::bind(&window, heights);
        (window, observer)
    }

    #[test]
    fn test_events_for_pages_under_viewport() {
        let (_, observer) = observer(&[10, 10, 10, 10]);
        let events = observer.events_for(&(5..15));
        assert_eq!(
            events,
            vec![
                VisibilityEvent::PageVisible(0),
                VisibilityEvent::PageVisible(1)
            ]
        );
    }

    #[test]
    fn test_sentinel_fires_at_document_end() {
        let (_, observer) = observer(&[10, 10]);
        let events = observer.events_for(&(12..20));
        assert!(events.contains(&VisibilityEvent::SentinelVisible));
    }

    #[test]
    fn test_zero_height_pages_emit_nothing() {
        let (_, observer) = observer(&[0, 0]);
        let events = observer.events_for(&(0..0));
        assert_eq!(events, vec![VisibilityEvent::SentinelVisible]);
    }

    #[test]
    fn test_page_at_row() {
        let (_, observer) = observer(&[4, 6, 2]);
        assert_eq!(observer.page_at(0), Some(0));
        assert_eq!(observer.page_at(5), Some(1));
        assert_eq!(observer.page_at(10), Some(2));
        assert_eq!(observer.page_at(12), None);
    }

    #[test]
    fn test_stale_observer_cannot_move_reset_window() {
        let heights = vec![5, 5, 5, 5, 5, 5];
        let (mut window, stale_observer) = observer(&heights);

        // Document replaced: window resets, a new observer is bound.
        window.reset(3);
        let fresh_observer = PageObserver::bind(&window, &[5, 5, 5]);

        for event in stale_observer.events_for(&(25..30)) {
            assert!(
                !window.observe(stale_observer.token(), event),
                "stale observation fired a state update"
            );
        }
        let before: Vec<_> = window.materialized().collect();
        assert_eq!(before, vec![0, 1, 2]);

        for event in fresh_observer.events_for(&(10..15)) {
            window.observe(fresh_observer.token(), event);
        }
        assert!(window.is_materialized(2));
    }
}
