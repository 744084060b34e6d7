//=========================================================================
// Input Event Types
//
// Defines the engine-side representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. Winit)
// into a unified format consumed by the input system.
//
// Responsibilities:
// - Represent keyboard and mouse inputs in a stable, portable way
// - Carry modifier key state (Shift, Ctrl, Alt) alongside discrete events
// - Name physical triggers (key or mouse button) for control bindings
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (per-frame down / went-down sets)
//         ↓
//    Controls (Confirm, Back, Pause, Quit)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::Deserialize;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// For example, `KeyA` is always the same physical key regardless of
/// keyboard layout (QWERTY vs AZERTY).
///
/// Names match the TOML spelling used in control bindings, e.g.
/// `{ key = "Escape" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Hardware or browser "back" key (Android back button, media keyboards).
    BrowserBack,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== Trigger =============================================================

/// A physical input that can be bound to a control.
///
/// Deserializes from `{ key = "Space" }` or `{ mouse = "Left" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Key(KeyCode),
    Mouse(MouseButton),
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// # Event Types
///
/// - **KeyDown/KeyUp**: Discrete keyboard events with modifier state
/// - **MouseButtonDown/MouseButtonUp**: Discrete mouse button events
/// - **MouseMoved**: Continuous cursor position updates
/// - **Unidentified**: Unknown/unsupported events (ignored by the tracker)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Key released.
    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Mouse button pressed.
    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Mouse button released.
    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Mouse cursor moved to new position.
    ///
    /// Coordinates are in screen space (pixels, top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// Unrecognized or unsupported event.
    Unidentified,
}

impl InputEvent {
    /// Returns true for cursor motion, which the platform coalesces
    /// (last position wins) instead of queueing.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMoved { .. })
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// The system does not distinguish between left/right variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Shift key held (either left or right).
    pub shift: bool,

    /// Ctrl key held (either left or right, Command on macOS).
    pub ctrl: bool,

    /// Alt key held (either left or right, Option on macOS).
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

//=========================================================================
// Unit Tests
//=========================================================================
