//=========================================================================
// Fade Timer
//=========================================================================
//
// Three-state countdown gating the start of a screen fade.
//
// Lifecycle (per activation of the owning state node):
//   Pending ──arm()──> Counting(remaining) ──advance()──> Complete
//
// Transitions only move forward. `reset()` returns to Pending and is
// meant to be called from the owner's `on_enter`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== FadeTimer ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeTimer {
    /// Not yet armed.
    #[default]
    Pending,

    /// Armed, with the time left before it fires.
    Counting(Duration),

    /// Fired. Will not fire again until reset.
    Complete,
}

impl FadeTimer {
    /// Arms the timer. Only has an effect while `Pending`.
    ///
    /// Returns `true` if the timer was armed by this call.
    pub fn arm(&mut self, duration: Duration) -> bool {
        if *self != Self::Pending {
            return false;
        }
        *self = Self::Counting(duration);
        true
    }

    /// Counts down by `tick`. Returns `true` exactly once, on the call
    /// where the remaining time reaches zero.
    pub fn advance(&mut self, tick: Duration) -> bool {
        match *self {
            Self::Counting(remaining) => {
                let remaining = remaining.saturating_sub(tick);
                if remaining.is_zero() {
                    *self = Self::Complete;
                    true
                } else {
                    *self = Self::Counting(remaining);
                    false
                }
            }
            Self::Pending | Self::Complete => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Pending;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_counting(&self) -> bool {
        matches!(self, Self::Counting(_))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
