//! Core algorithms – selectors, page geometry, and active-card tracking.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod document;
pub mod markers;
pub mod observer;
pub mod page;
pub mod selector;
pub mod tracker;
pub mod viewport;
