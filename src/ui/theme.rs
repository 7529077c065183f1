//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────
    pub fn card_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_card_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn detached_card_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    }

    /// Rows inside the threshold band at the top/bottom of the viewport.
    pub fn threshold_gutter_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    // ── log ────────────────────────────────────────────────────
    pub fn log_time_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn log_change_style() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn log_veto_style() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn log_repair_style() -> Style {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
