//! Change notifications.
//!
//! Observers get two hooks per transition: [`ChangeObserver::before_change`]
//! may veto it, [`ChangeObserver::after_change`] reports a committed one.
//! The older single-callback contract ([`Callbacks::card_change`]) is the
//! reduced case where the veto always lets the change through.

/// Payload passed to both hooks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardChange<'a, H> {
    /// Position of the card in the candidate list.
    pub index: usize,
    pub card: &'a H,
    /// Card that was active before this transition, if any.
    pub previous: Option<&'a H>,
}

/// Answer from [`ChangeObserver::before_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decision {
    #[default]
    Proceed,
    Cancel,
}

impl From<bool> for Decision {
    /// `false` cancels, anything else proceeds.
    fn from(allow: bool) -> Self {
        if allow {
            Decision::Proceed
        } else {
            Decision::Cancel
        }
    }
}

impl From<()> for Decision {
    fn from(_: ()) -> Self {
        Decision::Proceed
    }
}

/// Receives activation events from a tracker.
pub trait ChangeObserver<H> {
    fn before_change(&mut self, _change: &CardChange<'_, H>) -> Decision {
        Decision::Proceed
    }

    fn after_change(&mut self, _change: &CardChange<'_, H>) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<H> ChangeObserver<H> for NoopObserver {}

type BeforeFn<H> = Box<dyn FnMut(&CardChange<'_, H>) -> Decision + Send>;
type AfterFn<H> = Box<dyn FnMut(&CardChange<'_, H>) + Send>;

/// Closure-backed observer.
pub struct Callbacks<H> {
    before: Option<BeforeFn<H>>,
    after: Option<AfterFn<H>>,
}

impl<H> Default for Callbacks<H> {
    fn default() -> Self {
        Self {
            before: None,
            after: None,
        }
    }
}

impl<H> Callbacks<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Veto hook.  Return `false` (or [`Decision::Cancel`]) to block the
    /// transition; `true`, `()` or [`Decision::Proceed`] let it through.
    pub fn on_before_change<F, R>(mut self, mut f: F) -> Self
    where
        F: FnMut(&CardChange<'_, H>) -> R + Send + 'static,
        R: Into<Decision>,
    {
        self.before = Some(Box::new(move |c| f(c).into()));
        self
    }

    pub fn on_after_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(&CardChange<'_, H>) + Send + 'static,
    {
        self.after = Some(Box::new(f));
        self
    }

    /// Single-callback form: notified after every change, never vetoes.
    pub fn card_change<F>(f: F) -> Self
    where
        F: FnMut(&CardChange<'_, H>) + Send + 'static,
    {
        Self::new().on_after_change(f)
    }
}

impl<H> ChangeObserver<H> for Callbacks<H> {
    fn before_change(&mut self, change: &CardChange<'_, H>) -> Decision {
        match self.before.as_mut() {
            Some(f) => f(change),
            None => Decision::Proceed,
        }
    }

    fn after_change(&mut self, change: &CardChange<'_, H>) {
        if let Some(f) = self.after.as_mut() {
            f(change);
        }
    }
}

impl<H> std::fmt::Debug for Callbacks<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}
