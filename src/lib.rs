//! Active-card tracking for scrolling lists.
//!
//! Given an ordered set of cards and a scroll position, [`ViewportTracker`]
//! keeps exactly one card marked active and notifies observers (with veto
//! support) whenever that card changes.  The [`core`] module is independent
//! of any rendering layer; the binary wraps it in a small terminal demo.

pub mod config;
pub mod core;

pub use crate::core::document::{CardRect, Document, LayoutError};
pub use crate::core::observer::{CardChange, Callbacks, ChangeObserver, Decision, NoopObserver};
pub use crate::core::page::{Card, Page};
pub use crate::core::selector::{Selector, SelectorError};
pub use crate::core::tracker::{
    Branch, GeometryMode, ListenOutcome, TrackerError, TrackerOptions, TrackerState, Transition,
    ViewportTracker,
};
pub use crate::core::viewport::{Geometry, Strategy};
