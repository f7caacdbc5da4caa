//! Viewport management for scrolling.
//!
//! Tracks the visible row range over the concatenated page views. Total row
//! count covers placeholders too, so scroll geometry is stable no matter
//! which pages are currently materialized.

use std::ops::Range;

/// The visible portion of the paginated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_rows: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_rows: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_rows,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// The visible row range, clamped to the document.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_rows);
        self.offset..end
    }

    /// Scroll position as 0-100.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    pub const fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset = (self.offset + rows).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn half_page_up(&mut self) {
        self.scroll_up(self.height as usize / 2);
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.height as usize / 2);
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Resize, clamping the offset if the document now fits.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the row count (after reload or re-layout).
    pub fn set_total_rows(&mut self, total: usize) {
        self.total_rows = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = Viewport::new(80, 24, 100);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..24);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(10);
        vp.scroll_up(100);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_page_down_then_half_page_up() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 24);
        vp.half_page_up();
        assert_eq!(vp.offset(), 12);
    }

    #[test]
    fn test_go_to_bottom_and_top() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.go_to_bottom();
        assert_eq!(vp.offset(), 76);
        vp.go_to_top();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_visible_range_with_short_document() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
    }

    #[test]
    fn test_resize_keeps_valid_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(50);
        vp.resize(80, 60);
        assert_eq!(vp.offset(), 40);
    }

    #[test]
    fn test_set_total_rows_adjusts_offset() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(76);
        vp.set_total_rows(30);
        assert_eq!(vp.offset(), 6);
    }

    #[test]
    fn test_scroll_percent_bounds() {
        let mut vp = Viewport::new(80, 24, 100);
        assert_eq!(vp.scroll_percent(), 0);
        vp.go_to_bottom();
        assert_eq!(vp.scroll_percent(), 100);
        let short = Viewport::new(80, 24, 10);
        assert_eq!(short.scroll_percent(), 100);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_never_exceeds_bounds(
                total_rows in 0..10000usize,
                height in 1..100u16,
                scroll in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_rows);
                vp.scroll_down(scroll);
                prop_assert!(vp.offset() <= total_rows.saturating_sub(height as usize));
            }

            #[test]
            fn visible_range_within_document(
                total_rows in 0..10000usize,
                height in 1..100u16,
                scroll in 0..10000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_rows);
                vp.scroll_down(scroll);
                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total_rows);
            }
        }
    }
}
