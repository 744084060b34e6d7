//=========================================================================
// Application Context
//=========================================================================
//
// Shared collaborators handed to state nodes on every lifecycle call.
//
// Architecture:
//   FrameLoop owns AppContext
//     └─ StateMachine dispatch → StateNode::*(&mut AppContext)
//
// Nodes borrow the context for the duration of one call and never keep
// references into it, so there is no process-wide shared state.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioEngine, LapCrossfade};
use crate::core::config::Config;
use crate::core::fader::FullScreenFader;
use crate::core::input::InputSystem;
use crate::core::render::Renderer;
use crate::core::ui::MenuUi;
use crate::core::world::Simulation;

//=== AppContext ==========================================================

/// Shared engine objects accessible to state nodes.
///
/// # Available Data
///
/// - `config`: immutable tunables snapshot
/// - `input`: this frame's input (advanced by the loop before dispatch)
/// - `world`: the entity-component simulation
/// - `renderer`, `audio`, `ui`: output collaborators
/// - `fader`: the full-screen fade overlay
/// - `music`: lap music, shared so any node leaving the Gameplay/Pause
///   pair can stop it
pub struct AppContext {
    pub config: Config,
    pub input: InputSystem,
    pub world: Box<dyn Simulation>,
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioEngine>,
    pub ui: Box<dyn MenuUi>,
    pub fader: FullScreenFader,
    pub music: LapCrossfade,
    quit_requested: bool,
}

impl AppContext {
    pub fn new(
        config: Config,
        world: Box<dyn Simulation>,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioEngine>,
        ui: Box<dyn MenuUi>,
    ) -> Self {
        let input = InputSystem::new(config.bindings.clone());
        let music = LapCrossfade::new(config.gameplay.music_crossfade());
        Self {
            config,
            input,
            world,
            renderer,
            audio,
            ui,
            fader: FullScreenFader::new(),
            music,
            quit_requested: false,
        }
    }

    //--- Quit Signal ------------------------------------------------------

    /// Asks the frame loop to stop after the current frame.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}
