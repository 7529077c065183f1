//! Headless replay: run the tracker over a list of scroll offsets and report
//! each pass on stdout.  Handy for checking a configuration without a TUI.

use std::fmt;

use viewport_detector::core::document::Document;
use viewport_detector::core::observer::{CardChange, ChangeObserver, Decision};
use viewport_detector::core::page::{CardId, Page};
use viewport_detector::core::tracker::{Branch, TrackerError, TrackerOptions, ViewportTracker};

/// One replayed pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceLine {
    pub offset: f64,
    pub branch: Branch,
    pub active: Option<usize>,
    pub changed: Option<usize>,
    pub vetoed: Option<usize>,
    pub repaired: Option<usize>,
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |i| i.to_string());
        write!(
            f,
            "offset={:<8} branch={:<7} active={:<3} changed={:<3} vetoed={:<3} repaired={}",
            self.offset,
            format!("{:?}", self.branch).to_lowercase(),
            opt(self.active),
            opt(self.changed),
            opt(self.vetoed),
            opt(self.repaired),
        )
    }
}

#[derive(Debug, Default)]
struct VetoOne(Option<usize>);

impl ChangeObserver<CardId> for VetoOne {
    fn before_change(&mut self, change: &CardChange<'_, CardId>) -> Decision {
        (Some(change.index) != self.0).into()
    }
}

/// Replay `offsets` against `page`.  The page scroll is clamped, so the
/// reported offset is the one actually used.
pub fn replay(
    mut page: Page,
    options: TrackerOptions,
    veto: Option<usize>,
    offsets: &[f64],
) -> Result<Vec<TraceLine>, TrackerError> {
    let mut tracker = ViewportTracker::create(&mut page, options, VetoOne(veto))?;
    let mut lines = Vec::with_capacity(offsets.len());

    for &offset in offsets {
        page.scroll_to(offset);
        let out = tracker.listen(&mut page);
        lines.push(TraceLine {
            offset: page.scroll_offset(),
            branch: out.branch,
            active: tracker.active_index(),
            changed: out.changed,
            vetoed: out.vetoed,
            repaired: out.repaired,
        });
    }

    Ok(lines)
}
