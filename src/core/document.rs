//! The host page as seen by the tracker.
//!
//! The tracker never owns cards.  It asks a [`Document`] for the ordered list
//! of candidates under its container, reads their layout, and reflects marker
//! changes back.  Marker state lives on the host and is read back on every
//! pass.  Anything that can answer these questions can be tracked:
//! a browser DOM binding, a terminal list, or the in-memory
//! [`Page`](super::page::Page).

use std::fmt::Debug;

use thiserror::Error;

use super::selector::Selector;

/// A card's document-relative vertical extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    pub top: f64,
    pub height: f64,
}

impl CardRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Failure to read a card's layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The card is detached or has not been laid out yet.
    #[error("layout unavailable for candidate {index}")]
    Unavailable { index: usize },
}

/// Host document interface.
pub trait Document {
    /// Opaque reference to one card.  Compared by equality to tell whether
    /// two handles denote the same card.
    type Handle: Clone + PartialEq + Debug;

    /// Cards under the container matching `selector`, in document order.
    fn query(&self, selector: &Selector) -> Vec<Self::Handle>;

    /// Does `handle` match `selector`?
    fn matches(&self, handle: &Self::Handle, selector: &Selector) -> bool;

    /// Document-relative layout of a card.
    fn layout(&self, handle: &Self::Handle) -> Result<CardRect, LayoutError>;

    /// Current vertical scroll offset of the window.
    fn scroll_offset(&self) -> f64;

    /// Height of the visible window area.
    fn viewport_height(&self) -> f64;

    /// Total scrollable height of the document.
    fn document_height(&self) -> f64;

    /// Does the card currently carry the marker `class` on the host?
    ///
    /// The tracker rebuilds its marker map from this on every query, so it
    /// must reflect whatever [`Document::apply_marker`] last wrote as well as
    /// any marker the host set itself.
    fn is_marked(&self, handle: &Self::Handle, class: &str) -> bool;

    /// Reflect a marker change onto the host (toggle a class, restyle a row).
    fn apply_marker(&mut self, handle: &Self::Handle, class: &str, active: bool);

    /// Called once when a tracker attaches to the container.
    fn mark_enabled(&mut self) {}
}
