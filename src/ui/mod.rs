//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! Widgets read the page and tracker; they never run a tracker pass.

pub mod card_list;
pub mod layout;
pub mod log_panel;
pub mod smooth_scroll;
pub mod theme;
