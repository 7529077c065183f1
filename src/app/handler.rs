//! Input handling: maps key/mouse events to scrolling and tracker settings.
//!
//! Scrolling only moves the smooth scroller's target; the page offset itself
//! changes on [`tick`], which is also where scroll passes are dispatched.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use viewport_detector::config::Action;
use viewport_detector::core::document::Document;
use viewport_detector::core::tracker::TrackerError;

use super::event::LayoutEvent;
use super::state::{AppState, LogEntry, LogKind};

/// Rows per mouse-wheel notch.
const WHEEL_ROWS: f64 = 3.0;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let step = state.config.scroll_step;
    let page_rows = (state.page.viewport_height() - 1.0).max(1.0);

    match action {
        Action::ScrollUp => scroll_by(state, -step),
        Action::ScrollDown => scroll_by(state, step),
        Action::PageUp => scroll_by(state, -page_rows),
        Action::PageDown => scroll_by(state, page_rows),
        Action::Top => scroll_to(state, 0.0),
        Action::Bottom => {
            let bottom = state.page.max_scroll();
            scroll_to(state, bottom);
        }
        Action::ToggleStrategy => report(state, AppState::cycle_strategy),
        Action::ToggleGeometry => report(state, AppState::toggle_geometry),
        Action::ToggleVeto => toggle_veto(state),
        Action::CorruptMarkers => corrupt_markers(state),
        Action::Quit => state.should_quit = true,
    }
}

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => scroll_by(state, WHEEL_ROWS),
        MouseEventKind::ScrollUp => scroll_by(state, -WHEEL_ROWS),
        _ => {}
    }
}

/// Terminal resized: the page viewport follows the card pane height.
pub fn handle_resize(state: &mut AppState, viewport_rows: u16) {
    state.page.set_viewport_height(f64::from(viewport_rows));
    let offset = state.page.scroll_offset();
    state.smooth.snap(offset);
    state.dispatch(LayoutEvent::Resize);
}

/// Advance the smooth scroller and run a scroll pass if the page moved.
pub fn tick(state: &mut AppState) {
    if !state.smooth.tick() {
        return;
    }
    if state.page.scroll_to(state.smooth.current()) {
        state.dispatch(LayoutEvent::Scroll);
    }
}

fn scroll_by(state: &mut AppState, delta: f64) {
    let target = state.smooth.target() + delta;
    scroll_to(state, target);
}

fn scroll_to(state: &mut AppState, target: f64) {
    let clamped = target.clamp(0.0, state.page.max_scroll());
    state.smooth.set_target(clamped);
}

fn report(state: &mut AppState, f: fn(&mut AppState) -> Result<(), TrackerError>) {
    if let Err(err) = f(state) {
        tracing::warn!("tracker rebuild failed: {err}");
        state.status_message = Some(format!("Error: {err}"));
        return;
    }
    state.dispatch(LayoutEvent::Resize);
}

/// Veto the card below the active one (the one a downward scroll hits next).
fn toggle_veto(state: &mut AppState) {
    let observer = state.tracker.observer_mut();
    if observer.veto.take().is_some() {
        state.status_message = Some("Veto off".into());
        return;
    }
    let next = state.tracker.active_index().map_or(0, |i| i + 1);
    state.tracker.observer_mut().veto = Some(next);
    state.status_message = Some(format!("Vetoing card {}", next + 1));
}

/// Mark an extra card active on the page behind the tracker's back so the
/// next pass has to repair it.
fn corrupt_markers(state: &mut AppState) {
    let candidates = state.page.query(state.tracker.selector());
    let count = candidates.len();
    if count < 2 {
        return;
    }
    let extra = match state.tracker.active_index() {
        Some(i) => (i + count / 2) % count,
        None => 0,
    };
    let class = state.tracker.active_class().to_string();
    state.page.apply_marker(&candidates[extra], &class, true);
    state.push_log(LogEntry::now(LogKind::Note(format!(
        "marked card {} on the page",
        extra + 1
    ))));
    state.dispatch(LayoutEvent::Scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewport_detector::config::AppConfig;
    use viewport_detector::core::page::Page;

    fn state() -> AppState {
        let page = Page::stacked(10, 5.0, 1.0, 12.0);
        let mut s = AppState::new(page, AppConfig::default()).unwrap();
        s.dispatch(LayoutEvent::Ready);
        s
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn settle(s: &mut AppState) {
        for _ in 0..200 {
            tick(s);
        }
    }

    #[test]
    fn end_key_scrolls_to_last_card() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::End));
        settle(&mut s);
        assert_eq!(s.page.scroll_offset(), s.page.max_scroll());
        assert_eq!(s.tracker.active_index(), Some(9));
    }

    #[test]
    fn scrolling_back_up_returns_to_first() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::PageDown));
        settle(&mut s);
        assert_ne!(s.tracker.active_index(), Some(0));
        handle_key(&mut s, press(KeyCode::Home));
        settle(&mut s);
        assert_eq!(s.tracker.active_index(), Some(0));
    }

    #[test]
    fn corrupt_markers_is_repaired() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('x')));
        assert_eq!(s.tracker.markers().active_count(), 1);
        let marked = s.page.cards.iter().filter(|c| c.has_class("active-card")).count();
        assert_eq!(marked, 1);
        assert!(s
            .log
            .iter()
            .any(|e| matches!(e.kind, LogKind::Repaired { .. })));
    }

    #[test]
    fn veto_toggle_round_trips() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('v')));
        assert_eq!(s.tracker.observer().veto, Some(1));
        handle_key(&mut s, press(KeyCode::Char('v')));
        assert_eq!(s.tracker.observer().veto, None);
    }

    #[test]
    fn resize_updates_page_viewport() {
        let mut s = state();
        handle_resize(&mut s, 30);
        assert_eq!(s.page.viewport_height(), 30.0);
        assert!(matches!(s.last_outcome, Some((LayoutEvent::Resize, _))));
    }

    #[test]
    fn quit_key_sets_flag() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('q')));
        assert!(s.should_quit);
    }
}
