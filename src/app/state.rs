//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use viewport_detector::config::AppConfig;
use viewport_detector::core::observer::{CardChange, ChangeObserver, Decision};
use viewport_detector::core::page::{CardId, Page};
use viewport_detector::core::tracker::{
    GeometryMode, ListenOutcome, TrackerError, TrackerOptions, ViewportTracker,
};
use viewport_detector::core::viewport::Strategy;

use super::event::LayoutEvent;
use crate::ui::smooth_scroll::SmoothScroll;

/// Entries kept in the side log.
const LOG_CAPACITY: usize = 200;

/// What happened, for the log panel.
#[derive(Debug, Clone, PartialEq)]
pub enum LogKind {
    Changed { index: usize, previous: Option<CardId> },
    Vetoed { index: usize },
    Repaired { kept: usize },
    Note(String),
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub kind: LogKind,
}

impl LogEntry {
    pub fn now(kind: LogKind) -> Self {
        Self {
            at: Local::now(),
            kind,
        }
    }
}

/// Observer wired into the demo tracker.  Queues log entries and vetoes one
/// chosen card index.
#[derive(Debug, Default)]
pub struct DemoObserver {
    pub veto: Option<usize>,
    pending: Vec<LogEntry>,
}

impl ChangeObserver<CardId> for DemoObserver {
    fn before_change(&mut self, change: &CardChange<'_, CardId>) -> Decision {
        if self.veto == Some(change.index) {
            self.pending
                .push(LogEntry::now(LogKind::Vetoed { index: change.index }));
            return Decision::Cancel;
        }
        Decision::Proceed
    }

    fn after_change(&mut self, change: &CardChange<'_, CardId>) {
        self.pending.push(LogEntry::now(LogKind::Changed {
            index: change.index,
            previous: change.previous.copied(),
        }));
    }
}

pub type DemoTracker = ViewportTracker<Page, DemoObserver>;

/// Top-level application state.
pub struct AppState {
    pub page: Page,
    pub tracker: DemoTracker,
    pub config: AppConfig,
    /// Newest entry last.
    pub log: VecDeque<LogEntry>,
    pub smooth: SmoothScroll,
    pub last_outcome: Option<(LayoutEvent, ListenOutcome)>,
    /// Number of passes run so far.
    pub passes: u64,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(mut page: Page, config: AppConfig) -> Result<Self, TrackerError> {
        let tracker =
            ViewportTracker::create(&mut page, config.tracker.clone(), DemoObserver::default())?;
        let smooth = SmoothScroll::new(config.smooth_scroll_speed);
        Ok(Self {
            page,
            tracker,
            config,
            log: VecDeque::new(),
            smooth,
            last_outcome: None,
            passes: 0,
            should_quit: false,
            status_message: None,
        })
    }

    /// Run one tracker pass for `event` and collect its log entries.
    pub fn dispatch(&mut self, event: LayoutEvent) -> ListenOutcome {
        let outcome = self.tracker.listen(&mut self.page);
        self.passes += 1;

        let pending = std::mem::take(&mut self.tracker.observer_mut().pending);
        for entry in pending {
            self.push_log(entry);
        }
        if let Some(kept) = outcome.repaired {
            self.push_log(LogEntry::now(LogKind::Repaired { kept }));
        }

        tracing::trace!(event = event.label(), ?outcome, "pass");
        self.last_outcome = Some((event, outcome));
        outcome
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(entry);
    }

    /// Rebuild the tracker with new options, keeping the veto setting.  The
    /// active card carries over through the page's marker classes.
    pub fn rebuild_tracker(&mut self, options: TrackerOptions) -> Result<(), TrackerError> {
        let veto = self.tracker.observer().veto;
        let observer = DemoObserver {
            veto,
            ..DemoObserver::default()
        };
        self.tracker = ViewportTracker::create(&mut self.page, options.clone(), observer)?;
        self.config.tracker = options;
        Ok(())
    }

    pub fn cycle_strategy(&mut self) -> Result<(), TrackerError> {
        let mut options = self.config.tracker.clone();
        let idx = Strategy::ALL
            .iter()
            .position(|s| *s == options.strategy)
            .unwrap_or(0);
        options.strategy = Strategy::ALL[(idx + 1) % Strategy::ALL.len()];
        self.rebuild_tracker(options)?;
        self.status_message = Some(format!("Viewport test: {}", self.tracker.strategy()));
        Ok(())
    }

    pub fn toggle_geometry(&mut self) -> Result<(), TrackerError> {
        let mut options = self.config.tracker.clone();
        options.geometry = match options.geometry {
            GeometryMode::Cached => GeometryMode::PerPass,
            GeometryMode::PerPass => GeometryMode::Cached,
        };
        self.rebuild_tracker(options)?;
        self.status_message = Some(format!("Geometry: {}", geometry_label(self.tracker.geometry_mode())));
        Ok(())
    }
}

pub fn geometry_label(mode: GeometryMode) -> &'static str {
    match mode {
        GeometryMode::Cached => "cached",
        GeometryMode::PerPass => "per pass",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let page = Page::stacked(6, 5.0, 1.0, 12.0);
        AppState::new(page, AppConfig::default()).unwrap()
    }

    #[test]
    fn dispatch_logs_transitions() {
        let mut s = state();
        let out = s.dispatch(LayoutEvent::Ready);
        assert_eq!(out.changed, Some(0));
        assert_eq!(s.passes, 1);
        assert!(matches!(
            s.log.back().map(|e| &e.kind),
            Some(LogKind::Changed { index: 0, previous: None })
        ));
    }

    #[test]
    fn veto_is_logged() {
        let mut s = state();
        s.tracker.observer_mut().veto = Some(0);
        let out = s.dispatch(LayoutEvent::Load);
        assert_eq!(out.vetoed, Some(0));
        assert!(matches!(
            s.log.back().map(|e| &e.kind),
            Some(LogKind::Vetoed { index: 0 })
        ));
    }

    #[test]
    fn rebuild_keeps_active_card_and_veto() {
        let mut s = state();
        s.dispatch(LayoutEvent::Ready);
        s.tracker.observer_mut().veto = Some(3);
        s.cycle_strategy().unwrap();
        assert_eq!(s.tracker.strategy(), Strategy::BoundingRect);
        assert_eq!(s.tracker.active_index(), Some(0));
        assert_eq!(s.tracker.observer().veto, Some(3));
        s.toggle_geometry().unwrap();
        assert_eq!(s.config.tracker.geometry, GeometryMode::PerPass);
    }

    #[test]
    fn log_is_bounded() {
        let mut s = state();
        for i in 0..(LOG_CAPACITY + 10) {
            s.push_log(LogEntry::now(LogKind::Note(i.to_string())));
        }
        assert_eq!(s.log.len(), LOG_CAPACITY);
    }
}
