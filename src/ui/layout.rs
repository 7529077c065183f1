//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Card pane on the left, event log on the right, status bar at the bottom.
pub struct AppLayout {
    pub cards_area: Rect,
    pub log_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // panes
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);

        Self {
            cards_area: panes[0],
            log_area: panes[1],
            status_area: rows[1],
        }
    }

    /// Rows available for cards inside the bordered card pane.
    pub fn card_viewport_rows(&self) -> u16 {
        self.cards_area.height.saturating_sub(2)
    }
}
