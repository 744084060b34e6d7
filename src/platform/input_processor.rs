//=========================================================================
// Input Processor
//=========================================================================
//
// Translates winit window events into runtime `InputEvent`s.
//
// Modifier state arrives separately (`ModifiersChanged`) and is stamped
// onto every subsequent key and button event. Auto-repeat key presses
// and keys with no runtime equivalent are dropped here so they never
// reach the channel.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = state.into();
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Translation ------------------------------------------------------

    pub(crate) fn process_key_event(&self, event: &KeyEvent) -> Option<InputEvent> {
        if event.repeat {
            return None;
        }
        match event.physical_key {
            PhysicalKey::Code(code) => self.key(code.into(), event.state),
            PhysicalKey::Unidentified(_) => None,
        }
    }

    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        let button = MouseButton::from(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    pub(crate) fn process_mouse_move(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved {
            x: x as f32,
            y: y as f32,
        }
    }

    fn key(&self, key: KeyCode, state: ElementState) -> Option<InputEvent> {
        if key == KeyCode::Unidentified {
            return None;
        }
        let modifiers = self.modifiers;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        })
    }
}

//=== Conversions =========================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => Self::Left,
            WinitMouseButton::Right => Self::Right,
            WinitMouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

// Both enums spell physical keys the same way, so the table is a list
// of shared variant names.
macro_rules! same_name_keys {
    ($code:expr; $($name:ident),+ $(,)?) => {
        match $code {
            $(WinitKeyCode::$name => KeyCode::$name,)+
            _ => KeyCode::Unidentified,
        }
    };
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        same_name_keys!(code;
            Digit0, Digit1, Digit2, Digit3, Digit4,
            Digit5, Digit6, Digit7, Digit8, Digit9,
            KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
            KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
            KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
            ArrowDown, ArrowLeft, ArrowRight, ArrowUp,
            Space, Enter, Escape, Tab, Backspace, Delete,
            BrowserBack,
        )
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_are_stamped_on_button_events() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(ModifiersState::SHIFT | ModifiersState::CONTROL);

        let event = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);
        assert_eq!(
            event,
            InputEvent::MouseButtonDown {
                button: MouseButton::Left,
                modifiers: Modifiers { shift: true, ctrl: true, alt: false },
            }
        );
    }

    #[test]
    fn modifier_state_is_sticky_until_changed() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(ModifiersState::ALT);
        assert_eq!(processor.modifiers(), Modifiers::ALT);

        processor.update_modifiers(ModifiersState::empty());
        assert_eq!(processor.modifiers(), Modifiers::NONE);
    }

    #[test]
    fn release_maps_to_button_up() {
        let processor = InputProcessor::new();
        let event = processor.process_mouse_button(WinitMouseButton::Back, ElementState::Released);
        assert!(matches!(
            event,
            InputEvent::MouseButtonUp { button: MouseButton::Other, .. }
        ));
    }

    #[test]
    fn control_keys_translate() {
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
        assert_eq!(KeyCode::from(WinitKeyCode::BrowserBack), KeyCode::BrowserBack);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyP), KeyCode::KeyP);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::Enter);
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);

        let processor = InputProcessor::new();
        assert!(processor.key(KeyCode::Unidentified, ElementState::Pressed).is_none());
        assert!(processor.key(KeyCode::Space, ElementState::Pressed).is_some());
    }

    #[test]
    fn cursor_position_is_narrowed() {
        let processor = InputProcessor::new();
        assert_eq!(
            processor.process_mouse_move(10.5, 20.25),
            InputEvent::MouseMoved { x: 10.5, y: 20.25 }
        );
    }
}
