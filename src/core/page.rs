//! In-memory page model: a container of stacked cards inside a scrolling
//! window.
//!
//! This is the [`Document`] used by the terminal demo and the tests.  Cards
//! are laid out top-to-bottom with a fixed gap, or placed explicitly.

use super::document::{CardRect, Document, LayoutError};
use super::selector::{ElementRef, Selector};

/// Index into [`Page::cards`].
pub type CardId = usize;

/// One element on the page.
#[derive(Debug, Clone)]
pub struct Card {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub title: String,
    pub top: f64,
    pub height: f64,
    /// Detached cards still exist but have no layout.
    pub attached: bool,
}

impl Card {
    pub fn new(tag: &str, title: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            title: title.into(),
            top,
            height,
            attached: true,
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    fn element(&self) -> ElementRef<'_> {
        ElementRef {
            tag: &self.tag,
            id: self.id.as_deref(),
            classes: &self.classes,
        }
    }
}

/// A scrolling window over a single container of cards.
#[derive(Debug, Clone)]
pub struct Page {
    pub cards: Vec<Card>,
    /// Classes on the container element itself.
    pub container_classes: Vec<String>,
    scroll_offset: f64,
    viewport_height: f64,
    /// Space below the last card (footer, padding).
    trailing_space: f64,
}

impl Page {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            cards: Vec::new(),
            container_classes: Vec::new(),
            scroll_offset: 0.0,
            viewport_height: viewport_height.max(0.0),
            trailing_space: 0.0,
        }
    }

    /// Stack `count` `li` cards of equal height separated by `gap`.  Cards
    /// get ids `card-1`, `card-2`, ….
    pub fn stacked(count: usize, card_height: f64, gap: f64, viewport_height: f64) -> Self {
        let mut page = Self::new(viewport_height);
        for i in 0..count {
            let card = Card::new("li", format!("Card {}", i + 1), 0.0, card_height)
                .with_id(&format!("card-{}", i + 1));
            page.push_stacked(card, gap);
        }
        page
    }

    /// Append a card directly below the current last one.
    pub fn push_stacked(&mut self, mut card: Card, gap: f64) -> CardId {
        card.top = match self.cards.last() {
            Some(last) => last.top + last.height + gap,
            None => 0.0,
        };
        self.push(card)
    }

    /// Append a card at the position it already carries.
    pub fn push(&mut self, card: Card) -> CardId {
        self.cards.push(card);
        self.cards.len() - 1
    }

    /// Insert a card at `index` and lay every card out again, top to bottom.
    pub fn insert_stacked(&mut self, index: usize, card: Card, gap: f64) -> CardId {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
        let mut top = 0.0;
        for card in &mut self.cards {
            card.top = top;
            top += card.height + gap;
        }
        index
    }

    pub fn with_trailing_space(mut self, space: f64) -> Self {
        self.trailing_space = space.max(0.0);
        self
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    /// Scroll to an absolute offset, clamped to the scrollable range.
    /// Returns `true` if the offset changed.
    pub fn scroll_to(&mut self, offset: f64) -> bool {
        let clamped = offset.clamp(0.0, self.max_scroll());
        let changed = clamped != self.scroll_offset;
        self.scroll_offset = clamped;
        changed
    }

    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.scroll_to(self.scroll_offset + delta)
    }

    /// Resize the window.  The scroll offset is re-clamped.
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.scroll_to(self.scroll_offset);
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    pub fn is_enabled(&self) -> bool {
        self.container_classes
            .iter()
            .any(|c| c == ENABLED_CLASS)
    }
}

/// Class added to a container once a tracker is attached to it.
pub const ENABLED_CLASS: &str = "viewport-detector-enabled";

impl Document for Page {
    type Handle = CardId;

    fn query(&self, selector: &Selector) -> Vec<CardId> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, card)| selector.matches(&card.element()))
            .map(|(id, _)| id)
            .collect()
    }

    fn matches(&self, handle: &CardId, selector: &Selector) -> bool {
        self.cards
            .get(*handle)
            .is_some_and(|card| selector.matches(&card.element()))
    }

    fn layout(&self, handle: &CardId) -> Result<CardRect, LayoutError> {
        match self.cards.get(*handle) {
            Some(card) if card.attached => Ok(CardRect::new(card.top, card.height)),
            _ => Err(LayoutError::Unavailable { index: *handle }),
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn document_height(&self) -> f64 {
        let content = self
            .cards
            .iter()
            .filter(|c| c.attached)
            .map(|c| c.top + c.height)
            .fold(0.0, f64::max);
        (content + self.trailing_space).max(self.viewport_height)
    }

    fn is_marked(&self, handle: &CardId, class: &str) -> bool {
        self.cards.get(*handle).is_some_and(|card| card.has_class(class))
    }

    fn apply_marker(&mut self, handle: &CardId, class: &str, active: bool) {
        if let Some(card) = self.cards.get_mut(*handle) {
            if active {
                card.add_class(class);
            } else {
                card.remove_class(class);
            }
        }
    }

    fn mark_enabled(&mut self) {
        if !self.is_enabled() {
            self.container_classes.push(ENABLED_CLASS.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_cards_follow_each_other() {
        let page = Page::stacked(3, 100.0, 10.0, 200.0);
        assert_eq!(page.cards[0].top, 0.0);
        assert_eq!(page.cards[1].top, 110.0);
        assert_eq!(page.cards[2].top, 220.0);
        assert_eq!(page.document_height(), 320.0);
        assert_eq!(page.cards[2].id.as_deref(), Some("card-3"));
    }

    #[test]
    fn insert_restacks_following_cards() {
        let mut page = Page::stacked(2, 100.0, 0.0, 300.0);
        let id = page.insert_stacked(0, Card::new("li", "new", 0.0, 50.0), 0.0);
        assert_eq!(id, 0);
        assert_eq!(page.cards[0].title, "new");
        assert_eq!(page.cards[1].top, 50.0);
        assert_eq!(page.cards[2].top, 150.0);
        assert_eq!(page.cards[2].id.as_deref(), Some("card-2"));
    }

    #[test]
    fn scroll_is_clamped() {
        let mut page = Page::stacked(5, 100.0, 0.0, 300.0);
        assert!(page.scroll_to(1000.0));
        assert_eq!(page.scroll_offset(), 200.0);
        assert!(!page.scroll_by(50.0));
        assert!(page.scroll_to(-10.0));
        assert_eq!(page.scroll_offset(), 0.0);
    }

    #[test]
    fn short_document_is_at_least_one_viewport() {
        let page = Page::stacked(1, 50.0, 0.0, 300.0);
        assert_eq!(page.document_height(), 300.0);
        assert_eq!(page.max_scroll(), 0.0);
    }

    #[test]
    fn detached_card_has_no_layout() {
        let mut page = Page::stacked(2, 100.0, 0.0, 300.0);
        page.cards[1].attached = false;
        assert!(page.layout(&0).is_ok());
        assert_eq!(page.layout(&1), Err(LayoutError::Unavailable { index: 1 }));
    }

    #[test]
    fn query_respects_selector_and_order() {
        let mut page = Page::new(300.0);
        page.push_stacked(Card::new("li", "a", 0.0, 10.0), 0.0);
        page.push_stacked(Card::new("div", "b", 0.0, 10.0), 0.0);
        page.push_stacked(Card::new("li", "c", 0.0, 10.0).with_class("x"), 0.0);
        assert_eq!(page.query(&Selector::parse("li").unwrap()), vec![0, 2]);
        assert_eq!(page.query(&Selector::parse(".x").unwrap()), vec![2]);
    }

    #[test]
    fn markers_toggle_classes() {
        let mut page = Page::stacked(2, 10.0, 0.0, 100.0);
        page.apply_marker(&1, "active-card", true);
        assert!(page.cards[1].has_class("active-card"));
        assert!(page.is_marked(&1, "active-card"));
        page.apply_marker(&1, "active-card", false);
        assert!(!page.is_marked(&1, "active-card"));
        assert!(!page.is_marked(&7, "active-card"));
    }
}
