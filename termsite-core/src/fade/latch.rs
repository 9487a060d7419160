//! Hidden latch with seen-high hysteresis
//!
//! ```text
//!             down, sticky, opacity <= 0.001
//!   Open ───────────────────────────────────────▶ Locked
//!    │ up, coverage >= end-eps                     │ up, coverage >= end-eps
//!    ▼                                             ▼
//!   OpenSeenHigh ──── down, sticky, ... ────▶ LockedSeenHigh
//!                                                  │ up, crossed below end-eps
//!   Open ◀─────────────────────────────────────────┘
//! ```

use serde::Serialize;

use super::config::LOCK_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Latch {
    #[default]
    Open,
    /// Coverage has been above the high-water mark on an upward frame
    OpenSeenHigh,
    /// Faded out while sticky; held at 0 until unlocked
    Locked,
    LockedSeenHigh,
}

impl Latch {
    pub fn is_locked(self) -> bool {
        matches!(self, Latch::Locked | Latch::LockedSeenHigh)
    }

    pub fn seen_high(self) -> bool {
        matches!(self, Latch::OpenSeenHigh | Latch::LockedSeenHigh)
    }

    fn lock(self) -> Self {
        if self.seen_high() {
            Latch::LockedSeenHigh
        } else {
            Latch::Locked
        }
    }

    fn mark_seen_high(self) -> Self {
        if self.is_locked() {
            Latch::LockedSeenHigh
        } else {
            Latch::OpenSeenHigh
        }
    }

    /// Transition for a downward (or unchanged) frame
    ///
    /// `candidate` is the opacity the card would get, i.e. the smaller of the
    /// previous and the eased opacity.
    pub fn on_down(self, sticky: bool, candidate: f64) -> Self {
        if sticky && candidate <= LOCK_THRESHOLD {
            self.lock()
        } else {
            self
        }
    }

    /// Transition for an upward frame
    ///
    /// The seen-high mark is taken from either side of the frame, so a single
    /// fast frame from above the mark to below it both marks and unlocks.
    pub fn on_up(self, coverage: f64, prev_coverage: f64, high_water: f64) -> Self {
        let mut next = self;
        if coverage >= high_water || prev_coverage >= high_water {
            next = next.mark_seen_high();
        }

        let crossed_below = prev_coverage > high_water && coverage <= high_water;
        if next == Latch::LockedSeenHigh && crossed_below {
            Latch::Open
        } else {
            next
        }
    }
}
