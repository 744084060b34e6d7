//=========================================================================
// Controls & Bindings
//=========================================================================
//
// Maps physical triggers (keys, mouse buttons) to logical controls.
//
// Architecture:
//   Control → Vec<Trigger> → StateTracker query (any trigger matches)
//
// State nodes never ask about raw keys; they ask whether "Back" went
// down this frame, and the bindings decide which keys mean "Back".
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, MouseButton, Trigger};

//=== Control =============================================================

/// Logical controls consumed by the state nodes and the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// Accept / fire. Arms the intro countdown.
    Confirm,

    /// Cancel / escape. Always wins over other transition requests.
    Back,

    /// Toggle pause from gameplay, or unpause from the pause menu.
    Pause,

    /// Leave the application. Observed by the frame loop, not by states.
    Quit,
}

//=== ControlBindings =====================================================

/// Control → trigger table.
///
/// Deserializes from a TOML table:
///
/// ```toml
/// [bindings]
/// confirm = [{ key = "Space" }, { mouse = "Left" }]
/// back = [{ key = "Escape" }]
/// ```
///
/// Controls missing from the table are unbound.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ControlBindings {
    table: HashMap<Control, Vec<Trigger>>,
}

impl ControlBindings {
    /// Creates an empty table; every control is unbound.
    pub fn empty() -> Self {
        Self { table: HashMap::new() }
    }

    //--- Binding API ------------------------------------------------------

    /// Adds a trigger to a control. Duplicate bindings are ignored.
    pub fn bind(&mut self, control: Control, trigger: Trigger) {
        let triggers = self.table.entry(control).or_default();
        if !triggers.contains(&trigger) {
            triggers.push(trigger);
        }
    }

    /// Builder-style [`bind`](Self::bind).
    pub fn with(mut self, control: Control, trigger: Trigger) -> Self {
        self.bind(control, trigger);
        self
    }

    /// Removes every trigger from a control.
    pub fn unbind(&mut self, control: Control) {
        self.table.remove(&control);
    }

    //--- Query API --------------------------------------------------------

    /// Triggers bound to `control` (empty if unbound).
    pub fn triggers(&self, control: Control) -> &[Trigger] {
        self.table.get(&control).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ControlBindings {
    /// Desktop defaults. `Quit` is left unbound so Escape keeps its
    /// "back to menu" meaning inside the states.
    fn default() -> Self {
        Self::empty()
            .with(Control::Confirm, Trigger::Key(KeyCode::Space))
            .with(Control::Confirm, Trigger::Key(KeyCode::Enter))
            .with(Control::Confirm, Trigger::Mouse(MouseButton::Left))
            .with(Control::Back, Trigger::Key(KeyCode::Escape))
            .with(Control::Back, Trigger::Key(KeyCode::BrowserBack))
            .with(Control::Pause, Trigger::Key(KeyCode::KeyP))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
