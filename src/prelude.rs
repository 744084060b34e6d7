//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_runtime::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineError};
pub use crate::platform::PlatformEvent;

// Frame loop and context
pub use crate::core::context::AppContext;
pub use crate::core::frame_loop::{FrameLoop, StepOutcome};

// Configuration
pub use crate::core::config::Config;

// Input
pub use crate::core::input::{Control, ControlBindings, InputEvent, KeyCode, MouseButton, Trigger};

// State machine
pub use crate::core::state::{Priority, StateKey, StateMachine, StateNode, Transition};
pub use crate::states::GameState;

// Collaborator boundaries
pub use crate::core::audio::AudioEngine;
pub use crate::core::render::Renderer;
pub use crate::core::ui::MenuUi;
pub use crate::core::world::Simulation;
