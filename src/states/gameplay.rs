//=========================================================================
// Gameplay State
//=========================================================================
//
// Live play: the camera follows the player and the lap music crossfades
// as the simulation's lap counter advances.
//
// The lap music lives in the shared context. It keeps running across a
// Pause round-trip; leaving for any other state (directly, or through
// Pause) stops every lap track.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::GameState;
use crate::core::audio::{play_if_loaded, SoundId};
use crate::core::camera::CameraRig;
use crate::core::config::Config;
use crate::core::context::AppContext;
use crate::core::input::Control;
use crate::core::state::{Priority, StateNode, Transition};
use crate::core::world::PlayerState;

//=== GameplayState =======================================================

pub struct GameplayState {
    cameras: CameraRig,
    sound_pause: Option<SoundId>,
}

impl GameplayState {
    pub fn new(config: &Config) -> Self {
        Self {
            cameras: CameraRig::new(&config.viewport),
            sound_pause: None,
        }
    }
}

impl StateNode<GameState> for GameplayState {
    fn initialize(&mut self, context: &mut AppContext) {
        let gameplay = &context.config.gameplay;
        context.music.bind(context.audio.as_ref(), &gameplay.lap_tracks);

        self.sound_pause = context.audio.sound_handle(&gameplay.pause_sound);
        if self.sound_pause.is_none() {
            warn!("Pause sound '{}' missing from sound bank", gameplay.pause_sound);
        }
    }

    fn on_enter(&mut self, previous: Option<GameState>, context: &mut AppContext) {
        info!("Entering gameplay (from {:?})", previous);

        context.world.set_player_state(PlayerState::Active);
        context.input.set_relative_mouse_mode(true);
        self.cameras.follow(context.world.as_ref(), context.input.surface_size());

        // Still playing when resuming from Pause.
        let lap = context.world.active_lap();
        context.music.start(context.audio.as_mut(), lap);
    }

    fn on_exit(&mut self, next: GameState, context: &mut AppContext) {
        if next == GameState::Pause {
            play_if_loaded(context.audio.as_mut(), self.sound_pause);
        } else {
            debug!("Stopping lap music on exit to {:?}", next);
            context.music.stop(context.audio.as_mut());
        }
    }

    fn advance_frame(
        &mut self,
        tick: Duration,
        context: &mut AppContext,
        transition: &mut Transition<GameState>,
    ) {
        self.cameras.follow(context.world.as_ref(), context.input.surface_size());

        let lap = context.world.active_lap();
        context.music.advance(context.audio.as_mut(), lap, tick);

        if context.input.went_down(Control::Pause) {
            transition.request(GameState::Pause, Priority::Interaction);
        }
        if context.input.went_down(Control::Back) {
            transition.request(GameState::Pause, Priority::Cancel);
        }
    }

    fn render_prep(&mut self, context: &mut AppContext) {
        self.cameras.prep(context.renderer.as_mut(), context.world.as_ref());
    }

    fn render(&mut self, context: &mut AppContext) {
        self.cameras.draw(context.renderer.as_mut(), context.world.as_ref());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
