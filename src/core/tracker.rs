//! Active-card tracking.
//!
//! [`ViewportTracker`] picks exactly one "active" card out of an ordered list
//! as the window scrolls.  The host calls [`ViewportTracker::listen`] on every
//! layout-relevant event (content ready, load, resize, scroll); each call is
//! one complete, synchronous pass:
//!
//! 1. scrolled to the very top → the first card;
//! 2. scrolled to the very bottom → the last card;
//! 3. otherwise, only if the active card has left the viewport, the first
//!    visible card that is not already active;
//! 4. if more than one card ended up marked, all markers are reset and one
//!    boundary card (the boundary selector match, else the first card) keeps
//!    the marker.
//!
//! `listen` takes `&mut self`, so passes never overlap.  Hosts that drive the
//! tracker from several threads wrap it in a `Mutex`.

use thiserror::Error;

use super::document::Document;
use super::markers::ActiveMarkers;
use super::observer::{CardChange, ChangeObserver, Decision};
use super::selector::{Selector, SelectorError};
use super::viewport::{Geometry, Strategy};

// ───────────────────────────────────────── options ───────────

/// When card and viewport heights are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryMode {
    /// Measure once in [`ViewportTracker::create`]; later resizes are not
    /// picked up.
    #[default]
    Cached,
    /// Re-measure at the start of every pass.
    PerPass,
}

/// Construction options.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerOptions {
    /// Which children of the container are candidates.
    pub selector: String,
    /// Fraction of the first card's height used as the edge tolerance.
    pub sensitivity: f64,
    /// Marker name reflected onto the active card.
    pub active_class: String,
    /// Card kept active when invariant repair has to pick one.
    pub boundary_selector: Option<String>,
    pub strategy: Strategy,
    pub geometry: GeometryMode,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            selector: "li".into(),
            sensitivity: 0.2,
            active_class: "active-card".into(),
            boundary_selector: None,
            strategy: Strategy::Offset,
            geometry: GeometryMode::Cached,
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid {option}: {source}")]
    Selector {
        option: &'static str,
        #[source]
        source: SelectorError,
    },

    #[error("sensitivity must be finite and non-negative, got {0}")]
    Sensitivity(f64),

    #[error("active class must not be empty")]
    EmptyActiveClass,
}

// ───────────────────────────────────────── state ─────────────

/// Measured geometry and last-transition bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState<H> {
    /// Card that was active right before the last committed transition.
    pub previous: Option<H>,
    /// `card_height * sensitivity`.
    pub threshold: f64,
    pub sensitivity: f64,
    pub card_height: f64,
    pub viewport_height: f64,
}

/// Result of a single activation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The card was already active.
    Unchanged,
    /// `before_change` returned [`Decision::Cancel`].
    Vetoed,
    Changed,
}

/// Which rule a pass took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// No candidates.
    Empty,
    Top,
    Bottom,
    /// Active card left the viewport; a scan ran.
    Scan,
    /// Active card still visible; nothing to do.
    Steady,
}

/// Summary of one [`ViewportTracker::listen`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenOutcome {
    pub branch: Branch,
    /// Index of the card that became active, if a transition committed.
    pub changed: Option<usize>,
    /// Index whose activation was vetoed.
    pub vetoed: Option<usize>,
    /// Invariant repair ran and kept this index.
    pub repaired: Option<usize>,
}

impl ListenOutcome {
    fn new(branch: Branch) -> Self {
        Self {
            branch,
            changed: None,
            vetoed: None,
            repaired: None,
        }
    }

    fn record(&mut self, index: usize, transition: Transition) {
        match transition {
            Transition::Changed => self.changed = Some(index),
            Transition::Vetoed => self.vetoed = Some(index),
            Transition::Unchanged => {}
        }
    }
}

// ───────────────────────────────────────── tracker ───────────

/// Tracks the single active card of one container.
pub struct ViewportTracker<D: Document, O> {
    selector: Selector,
    boundary: Option<Selector>,
    active_class: String,
    strategy: Strategy,
    geometry_mode: GeometryMode,
    state: TrackerState<D::Handle>,
    markers: ActiveMarkers,
    observer: O,
}

impl<D, O> ViewportTracker<D, O>
where
    D: Document,
    O: ChangeObserver<D::Handle>,
{
    /// Attach a tracker to `doc`'s container and measure its geometry.
    ///
    /// An empty container, or a first card that cannot be measured, yields a
    /// zero threshold rather than an error.
    pub fn create(doc: &mut D, options: TrackerOptions, observer: O) -> Result<Self, TrackerError> {
        let selector = Selector::parse(&options.selector).map_err(|source| {
            TrackerError::Selector {
                option: "selector",
                source,
            }
        })?;
        let boundary = options
            .boundary_selector
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(Selector::parse)
            .transpose()
            .map_err(|source| TrackerError::Selector {
                option: "boundary selector",
                source,
            })?;
        if !options.sensitivity.is_finite() || options.sensitivity < 0.0 {
            return Err(TrackerError::Sensitivity(options.sensitivity));
        }
        if options.active_class.trim().is_empty() {
            return Err(TrackerError::EmptyActiveClass);
        }

        let mut tracker = Self {
            selector,
            boundary,
            active_class: options.active_class,
            strategy: options.strategy,
            geometry_mode: options.geometry,
            state: TrackerState {
                previous: None,
                threshold: 0.0,
                sensitivity: options.sensitivity,
                card_height: 0.0,
                viewport_height: 0.0,
            },
            markers: ActiveMarkers::default(),
            observer,
        };

        let candidates = tracker.candidates(doc);
        tracker.measure(doc, &candidates);
        doc.mark_enabled();

        tracing::debug!(
            selector = %tracker.selector,
            candidates = candidates.len(),
            threshold = tracker.state.threshold,
            strategy = %tracker.strategy,
            "tracker attached"
        );
        Ok(tracker)
    }

    /// Query the candidates and read their markers back from the host.
    fn candidates(&mut self, doc: &D) -> Vec<D::Handle> {
        let candidates = doc.query(&self.selector);
        self.markers
            .sync(candidates.iter().map(|c| doc.is_marked(c, &self.active_class)));
        candidates
    }

    fn measure(&mut self, doc: &D, candidates: &[D::Handle]) {
        self.state.card_height = match candidates.first().map(|c| doc.layout(c)) {
            Some(Ok(rect)) => rect.height,
            Some(Err(err)) => {
                tracing::warn!("cannot measure first card ({err}); threshold falls back to 0");
                0.0
            }
            None => 0.0,
        };
        self.state.threshold = self.state.card_height * self.state.sensitivity;
        self.state.viewport_height = doc.viewport_height();
    }

    fn geometry(&self, scroll_offset: f64) -> Geometry {
        Geometry {
            scroll_offset,
            viewport_height: self.state.viewport_height,
            threshold: self.state.threshold,
        }
    }

    // ── the pass ────────────────────────────────────────────────

    /// Recompute the active card.  Call on every scroll, resize and load.
    pub fn listen(&mut self, doc: &mut D) -> ListenOutcome {
        let candidates = self.candidates(doc);
        if candidates.is_empty() {
            return ListenOutcome::new(Branch::Empty);
        }

        if self.geometry_mode == GeometryMode::PerPass {
            self.measure(doc, &candidates);
        }

        let scroll = doc.scroll_offset();
        let last = candidates.len() - 1;

        let mut outcome;
        if scroll <= 0.0 {
            tracing::trace!(scroll, "top of document");
            outcome = ListenOutcome::new(Branch::Top);
            let t = self.activate_in(doc, &candidates, 0);
            outcome.record(0, t);
        } else if self.state.viewport_height + scroll >= doc.document_height() {
            tracing::trace!(scroll, "bottom of document");
            outcome = ListenOutcome::new(Branch::Bottom);
            let t = self.activate_in(doc, &candidates, last);
            outcome.record(last, t);
        } else {
            let geometry = self.geometry(scroll);
            let active_visible = self
                .markers
                .first_active()
                .is_some_and(|i| self.strategy.is_in_viewport(&*doc, &candidates[i], &geometry));

            if active_visible {
                outcome = ListenOutcome::new(Branch::Steady);
            } else {
                outcome = ListenOutcome::new(Branch::Scan);
                let hit = candidates.iter().enumerate().position(|(i, card)| {
                    !self.markers.is_active(i)
                        && self.strategy.is_in_viewport(&*doc, card, &geometry)
                });
                if let Some(index) = hit {
                    let t = self.activate_in(doc, &candidates, index);
                    outcome.record(index, t);
                }
            }
        }

        outcome.repaired = self.repair(doc, &candidates);
        outcome
    }

    /// Reset to a single boundary card when more than one card is marked.
    fn repair(&mut self, doc: &mut D, candidates: &[D::Handle]) -> Option<usize> {
        if self.markers.active_count() <= 1 {
            return None;
        }
        let keep = self
            .boundary
            .as_ref()
            .and_then(|sel| candidates.iter().position(|c| doc.matches(c, sel)))
            .unwrap_or(0);

        let cleared = self.markers.set_only(keep);
        for i in &cleared {
            doc.apply_marker(&candidates[*i], &self.active_class, false);
        }
        doc.apply_marker(&candidates[keep], &self.active_class, true);
        tracing::debug!(keep, cleared = ?cleared, "repaired multiple active markers");
        Some(keep)
    }

    // ── activation ─────────────────────────────────────────────

    /// Switch the marker to `candidates[index]`, consulting the observer.
    fn activate_in(&mut self, doc: &mut D, candidates: &[D::Handle], index: usize) -> Transition {
        let Some(card) = candidates.get(index) else {
            return Transition::Unchanged;
        };
        if self.markers.is_active(index) {
            return Transition::Unchanged;
        }

        let previous = self.markers.first_active().and_then(|i| candidates.get(i));
        let change = CardChange {
            index,
            card,
            previous,
        };

        if self.observer.before_change(&change) == Decision::Cancel {
            tracing::debug!(index, "activation vetoed");
            return Transition::Vetoed;
        }

        let cleared = self.markers.set_only(index);
        for i in &cleared {
            doc.apply_marker(&candidates[*i], &self.active_class, false);
        }
        doc.apply_marker(card, &self.active_class, true);
        self.state.previous = previous.cloned();

        tracing::debug!(index, previous = ?previous, "active card changed");
        self.observer.after_change(&change);
        Transition::Changed
    }

    /// Activate the first card.
    pub fn activate_first(&mut self, doc: &mut D) -> Transition {
        let candidates = self.candidates(doc);
        self.activate_in(doc, &candidates, 0)
    }

    /// Activate the last card (reported with index `count - 1`).
    pub fn activate_last(&mut self, doc: &mut D) -> Transition {
        let candidates = self.candidates(doc);
        let last = candidates.len().saturating_sub(1);
        self.activate_in(doc, &candidates, last)
    }

    /// Activate the card at `index`.  Out-of-range indices do nothing.
    pub fn activate_at(&mut self, doc: &mut D, index: usize) -> Transition {
        let candidates = self.candidates(doc);
        self.activate_in(doc, &candidates, index)
    }

    /// Tolerant visibility test for one card at the current scroll offset.
    pub fn is_in_viewport(&self, doc: &D, handle: &D::Handle) -> bool {
        let geometry = self.geometry(doc.scroll_offset());
        self.strategy.is_in_viewport(doc, handle, &geometry)
    }

    // ── accessors ──────────────────────────────────────────────

    pub fn active_index(&self) -> Option<usize> {
        self.markers.first_active()
    }

    /// Candidates found by the most recent query (create, pass or activation).
    pub fn candidate_count(&self) -> usize {
        self.markers.len()
    }

    pub fn previous(&self) -> Option<&D::Handle> {
        self.state.previous.as_ref()
    }

    pub fn threshold(&self) -> f64 {
        self.state.threshold
    }

    pub fn state(&self) -> &TrackerState<D::Handle> {
        &self.state
    }

    pub fn markers(&self) -> &ActiveMarkers {
        &self.markers
    }

    /// Selector picking the candidates out of the container.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn active_class(&self) -> &str {
        &self.active_class
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn geometry_mode(&self) -> GeometryMode {
        self.geometry_mode
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

impl<D, O> std::fmt::Debug for ViewportTracker<D, O>
where
    D: Document,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportTracker")
            .field("selector", &self.selector)
            .field("strategy", &self.strategy)
            .field("geometry_mode", &self.geometry_mode)
            .field("state", &self.state)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

// ───────────────────────────────────────── tests ─────────────
