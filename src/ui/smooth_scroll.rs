//! Eased scrolling with exponential ease-out.
//!
//! Scroll requests move the *target* offset immediately; the visible offset
//! chases it a fraction of the remaining distance per tick, so one key press
//! produces a short burst of scroll events instead of a single jump.

/// Offset animator, in page rows.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    current: f64,
    target: f64,
    /// `remaining *= (1 - speed)` each tick.  Higher speed = faster settle.
    speed: f64,
}

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    /// Set where scrolling should end up.  The caller clamps to the page.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Jump straight to `offset` with no animation.
    pub fn snap(&mut self, offset: f64) {
        self.current = offset;
        self.target = offset;
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// Advance one frame.  Returns `true` if the visible offset moved.
    pub fn tick(&mut self) -> bool {
        let remaining = self.target - self.current;
        if remaining == 0.0 {
            return false;
        }
        let next = self.target - remaining * (1.0 - self.speed);
        // Settle once the leftover is under a third of a row.
        self.current = if (self.target - next).abs() < 0.3 {
            self.target
        } else {
            next
        };
        true
    }

    pub fn is_animating(&self) -> bool {
        self.current != self.target
    }
}
