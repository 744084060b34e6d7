//=========================================================================
// State Tracker
//=========================================================================
//
// Low-level trigger state with per-frame edge detection.
//
// Architecture:
//   InputEvent → process_events() → HashSet<Trigger> (held) → query
//
// Frame lifecycle: begin_frame() → process_events() → query
//
// Keys and mouse buttons are folded into a single `Trigger` space so
// control bindings can mix both freely.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, Modifiers, Trigger};

//=== StateTracker ========================================================

/// Tracks persistent state (triggers held) and per-frame edges
/// (triggers that went down or up during the current frame).
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    down: HashSet<Trigger>,
    cursor: (f32, f32),
    modifiers: Modifiers,

    //--- Frame Edges (reset each frame via begin_frame()) ----------------
    went_down: HashSet<Trigger>,
    went_up: HashSet<Trigger>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            down: HashSet::new(),
            cursor: (0.0, 0.0),
            modifiers: Modifiers::NONE,
            went_down: HashSet::new(),
            went_up: HashSet::new(),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears frame edges. Held state is preserved.
    pub(super) fn begin_frame(&mut self) {
        self.went_down.clear();
        self.went_up.clear();
    }

    /// Folds a batch of events into the tracked state.
    pub(super) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Forgets every held trigger, e.g. when the window loses focus and
    /// release events will never arrive.
    pub(super) fn release_all(&mut self) {
        self.went_up.extend(self.down.drain());
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = modifiers;
                self.press(Trigger::Key(key));
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = modifiers;
                self.release(Trigger::Key(key));
            }
            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = modifiers;
                self.press(Trigger::Mouse(button));
            }
            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = modifiers;
                self.release(Trigger::Mouse(button));
            }
            InputEvent::MouseMoved { x, y } => {
                self.cursor = (x, y);
            }
            InputEvent::Unidentified => {}
        }
    }

    fn press(&mut self, trigger: Trigger) {
        // Auto-repeat delivers KeyDown for held keys; only the first counts
        if self.down.insert(trigger) {
            self.went_down.insert(trigger);
        }
    }

    fn release(&mut self, trigger: Trigger) {
        if self.down.remove(&trigger) {
            self.went_up.insert(trigger);
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns `true` while the trigger is held.
    pub fn is_down(&self, trigger: Trigger) -> bool {
        self.down.contains(&trigger)
    }

    /// Returns `true` only on the frame the trigger transitioned UP → DOWN.
    pub fn went_down(&self, trigger: Trigger) -> bool {
        self.went_down.contains(&trigger)
    }

    /// Returns `true` only on the frame the trigger transitioned DOWN → UP.
    pub fn went_up(&self, trigger: Trigger) -> bool {
        self.went_up.contains(&trigger)
    }

    /// Cursor position in screen coordinates (pixels, top-left origin).
    pub fn cursor_position(&self) -> (f32, f32) {
        self.cursor
    }

    /// Modifier state reported with the most recent discrete event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
