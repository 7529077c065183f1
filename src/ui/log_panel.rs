//! Side panel listing recent tracker activity, newest at the bottom.

use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::app::state::{LogEntry, LogKind};

use super::theme::Theme;

pub struct LogPanel<'a> {
    entries: &'a VecDeque<LogEntry>,
    block: Option<Block<'a>>,
}

impl<'a> LogPanel<'a> {
    pub fn new(entries: &'a VecDeque<LogEntry>) -> Self {
        Self {
            entries,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// Card numbers are shown 1-based, matching the card titles.
pub fn describe(kind: &LogKind) -> (String, ratatui::style::Style) {
    match kind {
        LogKind::Changed { index, previous } => {
            let from = previous.map_or_else(|| "none".to_string(), |p| format!("card {}", p + 1));
            (
                format!("card {} active (was {from})", index + 1),
                Theme::log_change_style(),
            )
        }
        LogKind::Vetoed { index } => (
            format!("card {} vetoed", index + 1),
            Theme::log_veto_style(),
        ),
        LogKind::Repaired { kept } => (
            format!("repaired markers, kept card {}", kept + 1),
            Theme::log_repair_style(),
        ),
        LogKind::Note(text) => (text.clone(), Theme::card_style()),
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = match &self.block {
            Some(block) => block.inner(area).height,
            None => area.height,
        } as usize;

        let skip = self.entries.len().saturating_sub(visible);
        let lines: Vec<Line> = self
            .entries
            .iter()
            .skip(skip)
            .map(|entry| {
                let (text, style) = describe(&entry.kind);
                Line::from(vec![
                    Span::styled(entry.at.format("%H:%M:%S ").to_string(), Theme::log_time_style()),
                    Span::styled(text, style),
                ])
            })
            .collect();

        let mut paragraph = Paragraph::new(lines);
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}
