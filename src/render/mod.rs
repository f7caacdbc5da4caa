//! Windowed, visibility-driven rendering.
//!
//! Pages near the viewport are materialized into presentation lines; the
//! rest are equal-height placeholders. [`window`] holds the materialization
//! state machine, [`observer`] turns scroll positions into visibility
//! events, [`materialize`] produces the lines themselves.

pub mod materialize;
pub mod observer;
pub mod window;

pub use materialize::{LineKind, PageLine, PageView, materialize_page, page_height, placeholder_page};
pub use observer::PageObserver;
pub use window::{
    DEFAULT_BATCH_SIZE, DEFAULT_INITIAL_PAGES, ObservationToken, Strategy, VisibilityEvent,
    VisibilityWindow,
};
