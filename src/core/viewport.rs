//! In-viewport tests.
//!
//! Two interchangeable strategies decide whether a card counts as visible.
//! Both shrink the card by `threshold` on each edge before comparing against
//! the window, so a card only needs its core on screen.
//!
//! * [`OffsetTest`] compares document-relative edges with the scroll band
//!   `[scroll, scroll + viewport)`:
//!   `scroll < top + threshold && scroll + viewport > bottom - threshold`.
//! * [`BoundingRectTest`] works on the window-relative rectangle:
//!   `rect.top + threshold >= 0 && rect.bottom - threshold <= viewport`.
//!
//! They differ only at the exact edges (strict vs. inclusive comparison).
//! Neither fails: a card whose layout cannot be read is not in the viewport.

use std::fmt;

use super::document::{CardRect, Document, LayoutError};

/// Window geometry and tolerance for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub scroll_offset: f64,
    pub viewport_height: f64,
    pub threshold: f64,
}

/// Strategy interface for the visibility test.
pub trait ViewportTest: fmt::Debug + Send + Sync {
    /// Visibility of an already-measured card.
    fn contains(&self, rect: CardRect, geometry: &Geometry) -> bool;

    /// Visibility of a card read from `doc`.  Layout failures count as
    /// "not in viewport".
    fn is_in_viewport<D: Document + ?Sized>(
        &self,
        doc: &D,
        handle: &D::Handle,
        geometry: &Geometry,
    ) -> bool
    where
        Self: Sized,
    {
        match doc.layout(handle) {
            Ok(rect) => self.contains(rect, geometry),
            Err(LayoutError::Unavailable { index }) => {
                tracing::trace!(index, "layout unavailable, treating as off-screen");
                false
            }
        }
    }
}

/// Scroll-offset / height based test.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetTest;

impl ViewportTest for OffsetTest {
    fn contains(&self, rect: CardRect, g: &Geometry) -> bool {
        let view_top = g.scroll_offset;
        let view_bottom = view_top + g.viewport_height;
        view_top < rect.top + g.threshold && view_bottom > rect.bottom() - g.threshold
    }
}

/// Window-relative bounding rectangle test.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingRectTest;

impl ViewportTest for BoundingRectTest {
    fn contains(&self, rect: CardRect, g: &Geometry) -> bool {
        let top = rect.top - g.scroll_offset;
        let bottom = top + rect.height;
        top + g.threshold >= 0.0 && bottom - g.threshold <= g.viewport_height
    }
}

/// Configuration-level choice of visibility test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Offset,
    BoundingRect,
}

impl Strategy {
    pub const ALL: &[Strategy] = &[Strategy::Offset, Strategy::BoundingRect];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Offset => "offset",
            Strategy::BoundingRect => "bounding-rect",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "offset" => Some(Strategy::Offset),
            "bounding-rect" | "bounding_rect" | "rect" => Some(Strategy::BoundingRect),
            _ => None,
        }
    }

    pub fn contains(self, rect: CardRect, geometry: &Geometry) -> bool {
        match self {
            Strategy::Offset => OffsetTest.contains(rect, geometry),
            Strategy::BoundingRect => BoundingRectTest.contains(rect, geometry),
        }
    }

    pub fn is_in_viewport<D: Document + ?Sized>(
        self,
        doc: &D,
        handle: &D::Handle,
        geometry: &Geometry,
    ) -> bool {
        match self {
            Strategy::Offset => OffsetTest.is_in_viewport(doc, handle, geometry),
            Strategy::BoundingRect => BoundingRectTest.is_in_viewport(doc, handle, geometry),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(scroll: f64, viewport: f64, threshold: f64) -> Geometry {
        Geometry {
            scroll_offset: scroll,
            viewport_height: viewport,
            threshold,
        }
    }

    #[test]
    fn offset_test_matches_worked_example() {
        let g = geo(250.0, 300.0, 20.0);
        // 250 < 200 + 20 is false.
        assert!(!OffsetTest.contains(CardRect::new(200.0, 100.0), &g));
        // 250 < 320 and 550 > 380.
        assert!(OffsetTest.contains(CardRect::new(300.0, 100.0), &g));
        // 550 > 500 - 20 holds, 250 < 420 holds.
        assert!(OffsetTest.contains(CardRect::new(400.0, 100.0), &g));
        // 550 > 580 fails.
        assert!(!OffsetTest.contains(CardRect::new(500.0, 100.0), &g));
    }

    #[test]
    fn strategies_differ_only_on_edges() {
        // Card exactly filling the viewport, zero threshold.
        let g = geo(100.0, 100.0, 0.0);
        let rect = CardRect::new(100.0, 100.0);
        assert!(!OffsetTest.contains(rect, &g));
        assert!(BoundingRectTest.contains(rect, &g));

        let inner = CardRect::new(120.0, 50.0);
        assert!(OffsetTest.contains(inner, &g));
        assert!(BoundingRectTest.contains(inner, &g));
    }

    #[test]
    fn larger_threshold_never_loses_cards() {
        let rects: Vec<CardRect> = (0..20).map(|i| CardRect::new(i as f64 * 37.0, 90.0)).collect();
        for strategy in Strategy::ALL {
            for scroll in [0.0, 45.0, 200.0, 333.0] {
                let mut prev = 0usize;
                for t in [0.0, 5.0, 18.0, 40.0, 90.0] {
                    let g = geo(scroll, 250.0, t);
                    let count = rects.iter().filter(|r| strategy.contains(**r, &g)).count();
                    assert!(count >= prev, "{strategy} scroll={scroll} t={t}");
                    prev = count;
                }
            }
        }
    }

    #[test]
    fn strategy_labels_round_trip() {
        for s in Strategy::ALL {
            assert_eq!(Strategy::from_label(s.label()), Some(*s));
        }
        assert_eq!(Strategy::from_label("rect"), Some(Strategy::BoundingRect));
        assert_eq!(Strategy::from_label("nope"), None);
    }
}
