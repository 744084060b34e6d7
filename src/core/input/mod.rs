//=========================================================================
// Input System
//
// High-level interface for input handling within the runtime.
// Wraps the per-frame `StateTracker` and resolves logical controls.
//
// Responsibilities:
// - Fold each frame's batch of platform events into trigger state
// - Track the render-surface size, refreshed once per frame
// - Expose "is down" / "went down this frame" queries per control
// - Hold the cursor-capture flag the platform applies to the window
//
// Notes:
// Advanced exactly once per frame by the frame loop (step 2), before
// the simulation and the active state node run.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod bindings;
pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use bindings::{Control, ControlBindings};
pub use event::{InputEvent, KeyCode, Modifiers, MouseButton, Trigger};
pub use state_tracker::StateTracker;

//=== External Crates =====================================================

use log::{debug, trace};

//=== InputSystem =========================================================

/// Per-frame input snapshot plus control bindings.
pub struct InputSystem {
    tracker: StateTracker,
    bindings: ControlBindings,
    surface_size: (u32, u32),
    relative_mouse_mode: bool,
    exit_requested: bool,
    minimized: bool,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    pub fn new(bindings: ControlBindings) -> Self {
        Self {
            tracker: StateTracker::new(),
            bindings,
            surface_size: (0, 0),
            relative_mouse_mode: false,
            exit_requested: false,
            minimized: false,
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Advances input by one frame.
    ///
    /// Clears last frame's edges, applies this frame's events, and stores
    /// the current render-surface size.
    pub fn advance_frame(&mut self, events: &[InputEvent], surface_size: (u32, u32)) {
        self.tracker.begin_frame();
        self.tracker.process_events(events);

        if surface_size != self.surface_size {
            debug!("Render surface resized to {}x{}", surface_size.0, surface_size.1);
            self.surface_size = surface_size;
        }

        if !events.is_empty() {
            trace!("Input frame consumed {} events", events.len());
        }
    }

    /// Drops all held triggers (focus lost, app backgrounded).
    pub fn release_all(&mut self) {
        self.tracker.release_all();
    }

    //--- Control Queries --------------------------------------------------

    /// Returns `true` if any trigger bound to `control` went down this frame.
    pub fn went_down(&self, control: Control) -> bool {
        self.bindings
            .triggers(control)
            .iter()
            .any(|&t| self.tracker.went_down(t))
    }

    /// Returns `true` while any trigger bound to `control` is held.
    pub fn is_down(&self, control: Control) -> bool {
        self.bindings
            .triggers(control)
            .iter()
            .any(|&t| self.tracker.is_down(t))
    }

    /// Raw trigger state, bypassing bindings.
    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }

    pub fn bindings(&self) -> &ControlBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut ControlBindings {
        &mut self.bindings
    }

    //--- Window State -----------------------------------------------------

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    /// Cursor capture: `true` hides the cursor and reports relative motion.
    pub fn set_relative_mouse_mode(&mut self, enabled: bool) {
        if self.relative_mouse_mode != enabled {
            debug!("Relative mouse mode {}", if enabled { "on" } else { "off" });
        }
        self.relative_mouse_mode = enabled;
    }

    pub fn relative_mouse_mode(&self) -> bool {
        self.relative_mouse_mode
    }

    /// Set by the frame loop when the window is closed.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
    }

    /// True while the render surface has zero area.
    pub fn minimized(&self) -> bool {
        self.minimized
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new(ControlBindings::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
