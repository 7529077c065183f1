//! Ratatui widget that draws the page's cards at the current scroll offset.
//!
//! One page unit is one terminal row.  Cards carrying the active class are
//! highlighted, detached cards are dimmed, and a gutter on the left marks
//! the threshold band at both viewport edges.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use viewport_detector::core::document::Document;
use viewport_detector::core::page::{Card, Page};

use super::theme::Theme;

pub struct CardList<'a> {
    page: &'a Page,
    active_class: &'a str,
    threshold: f64,
    block: Option<Block<'a>>,
}

impl<'a> CardList<'a> {
    pub fn new(page: &'a Page, active_class: &'a str) -> Self {
        Self {
            page,
            active_class,
            threshold: 0.0,
            block: None,
        }
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// The card covering document row `y`, with its index.
    fn card_at(&self, y: f64) -> Option<(usize, &'a Card)> {
        self.page
            .cards
            .iter()
            .enumerate()
            .find(|(_, c)| y >= c.top && y < c.top + c.height)
    }

    fn card_row(&self, index: usize, card: &Card, y: f64, width: usize) -> Line<'static> {
        let rows = card.height.ceil().max(1.0) as usize;
        let r = (y - card.top).floor() as usize;
        let active = card.has_class(self.active_class);

        let text = if rows == 1 {
            boxed('[', ' ', ']', &card.title, width)
        } else if r == 0 {
            boxed('┌', '─', '┐', &format!(" {} ", card.title), width)
        } else if r + 1 >= rows {
            boxed('└', '─', '┘', "", width)
        } else if r == 1 {
            let mut detail = format!(" #{index}  top {}  h {}", card.top, card.height);
            if active {
                detail.push_str("  ● active");
            }
            if !card.attached {
                detail.push_str("  (detached)");
            }
            boxed('│', ' ', '│', &detail, width)
        } else {
            boxed('│', ' ', '│', "", width)
        };

        let style = if !card.attached {
            Theme::detached_card_style()
        } else if active {
            Theme::active_card_style()
        } else {
            Theme::card_style()
        };
        Line::from(Span::styled(text, style))
    }
}

/// `left` + label + `fill` padding + `right`, exactly `width` chars wide.
fn boxed(left: char, fill: char, right: char, label: &str, width: usize) -> String {
    if width < 2 {
        return String::new();
    }
    let inner = width - 2;
    let mut s = String::with_capacity(width * 3);
    s.push(left);
    let mut used = 0;
    for ch in label.chars().take(inner) {
        s.push(ch);
        used += 1;
    }
    for _ in used..inner {
        s.push(fill);
    }
    s.push(right);
    s
}

impl Widget for CardList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width < 4 || inner.height == 0 {
            return;
        }

        let scroll = self.page.scroll_offset().floor();
        let height = f64::from(inner.height);
        let card_width = usize::from(inner.width - 1);

        for row in 0..inner.height {
            let y = inner.y + row;
            let rel = f64::from(row);

            let in_band = rel < self.threshold || rel >= height - self.threshold;
            if in_band && self.threshold > 0.0 {
                buf.set_string(inner.x, y, "▏", Theme::threshold_gutter_style());
            }

            if let Some((index, card)) = self.card_at(scroll + rel) {
                let line = self.card_row(index, card, scroll + rel, card_width);
                buf.set_line(inner.x + 1, y, &line, inner.width - 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn boxed_pads_and_truncates() {
        assert_eq!(boxed('[', '.', ']', "ab", 6), "[ab..]");
        assert_eq!(boxed('[', '.', ']', "abcdef", 5), "[abc]");
        assert_eq!(boxed('[', '.', ']', "x", 1), "");
    }

    #[test]
    fn draws_cards_from_scroll_offset() {
        let mut page = Page::stacked(3, 4.0, 1.0, 6.0);
        page.scroll_to(5.0);
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        CardList::new(&page, "active-card").render(area, &mut buf);

        // Row 0 is the top edge of the second card.
        assert!(row_text(&buf, 0).contains("Card 2"));
        assert!(row_text(&buf, 3).contains('└'));
        // Row 4 is the gap between cards.
        assert_eq!(row_text(&buf, 4).trim(), "");
        assert!(row_text(&buf, 5).contains("Card 3"));
    }

    #[test]
    fn active_card_is_labelled() {
        let mut page = Page::stacked(2, 4.0, 0.0, 8.0);
        page.cards[0].add_class("active-card");
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        CardList::new(&page, "active-card").render(area, &mut buf);
        assert!(row_text(&buf, 1).contains("active"));
        assert!(!row_text(&buf, 5).contains("active"));
    }

    #[test]
    fn threshold_gutter_marks_both_edges() {
        let page = Page::stacked(1, 10.0, 0.0, 10.0);
        let area = Rect::new(0, 0, 12, 10);
        let mut buf = Buffer::empty(area);
        CardList::new(&page, "active-card")
            .threshold(2.0)
            .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "▏");
        assert_eq!(buf[(0, 1)].symbol(), "▏");
        assert_eq!(buf[(0, 5)].symbol(), " ");
        assert_eq!(buf[(0, 9)].symbol(), "▏");
    }
}
