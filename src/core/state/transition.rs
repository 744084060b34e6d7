//=========================================================================
// Transition Requests
//=========================================================================
//
// Out-parameter written by the active node's `advance_frame`.
//
// At most one request survives a frame. Requests carry a priority and
// a new request only replaces the pending one if it ranks strictly
// higher, so the outcome does not depend on the order in which a node
// checks its conditions:
//
//   Automatic < Interaction < Cancel
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::StateKey;

//=== Priority ============================================================

/// Rank of a transition request. Later variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Timer or fade completion.
    Automatic,

    /// Explicit user choice: confirm, pause, unpause, menu buttons.
    Interaction,

    /// Back / escape.
    Cancel,
}

//=== Transition ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<S: StateKey> {
    /// Remain in the current state.
    Stay,

    /// Switch to `target` at the end of this frame's advance.
    To { target: S, priority: Priority },
}

impl<S: StateKey> Default for Transition<S> {
    fn default() -> Self {
        Self::Stay
    }
}

impl<S: StateKey> Transition<S> {
    /// Requests a switch to `target`.
    ///
    /// Returns `true` if this request is now the pending one.
    pub fn request(&mut self, target: S, priority: Priority) -> bool {
        let replaces = match *self {
            Self::Stay => true,
            Self::To { priority: pending, .. } => priority > pending,
        };
        if replaces {
            *self = Self::To { target, priority };
        }
        replaces
    }

    pub fn target(&self) -> Option<S> {
        match *self {
            Self::Stay => None,
            Self::To { target, .. } => Some(target),
        }
    }

    pub fn priority(&self) -> Option<Priority> {
        match *self {
            Self::Stay => None,
            Self::To { priority, .. } => Some(priority),
        }
    }

    pub fn is_stay(&self) -> bool {
        matches!(self, Self::Stay)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
