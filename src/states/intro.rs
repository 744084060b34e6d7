//=========================================================================
// Intro State
//=========================================================================
//
// The player waits inside a box until they confirm. A short countdown
// then starts a fade-out-then-in, and gameplay begins once the fade
// completes. The master bus is ducked for the whole stay.
//
// Per activation:
//   on_enter: timer Pending, player moved into the box, bus → 0
//   Confirm ─arm─> countdown ─fire─> fader.start() ─complete─> Gameplay
//   Back (any time) ─> Menu
//   on_exit:  player restored, bus → 1
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::GameState;
use crate::core::audio::BusFader;
use crate::core::camera::{CameraRig, Vec3};
use crate::core::config::Config;
use crate::core::context::AppContext;
use crate::core::fade_timer::FadeTimer;
use crate::core::fader::FadeMode;
use crate::core::input::Control;
use crate::core::state::{Priority, StateNode, Transition};
use crate::core::world::{EntityId, PlayerState};

//=== IntroState ==========================================================

pub struct IntroState {
    cameras: CameraRig,
    fade_timer: FadeTimer,
    master_bus: BusFader,
    intro_box: Option<EntityId>,

    /// Player position before being moved into the box.
    original_position: Option<Vec3>,
}

impl IntroState {
    pub fn new(config: &Config) -> Self {
        Self {
            cameras: CameraRig::new(&config.viewport),
            fade_timer: FadeTimer::Pending,
            master_bus: BusFader::new(config.audio.master_bus.clone()),
            intro_box: None,
            original_position: None,
        }
    }

    pub fn fade_timer(&self) -> FadeTimer {
        self.fade_timer
    }

    fn set_box_visibility(&self, context: &mut AppContext, visible: bool) {
        if let Some(entity) = self.intro_box {
            context.world.set_visibility_recursively(entity, visible);
        }
    }
}

impl StateNode<GameState> for IntroState {
    fn initialize(&mut self, context: &mut AppContext) {
        self.master_bus.bind(context.audio.as_ref());

        let name = &context.config.intro.box_entity;
        self.intro_box = context.world.entity_by_name(name);
        if self.intro_box.is_none() {
            warn!("Intro box entity '{}' not found", name);
        }
    }

    fn on_enter(&mut self, previous: Option<GameState>, context: &mut AppContext) {
        info!("Entering intro (from {:?})", previous);

        self.fade_timer.reset();
        context.fader.cancel();

        context.world.set_player_state(PlayerState::Active);

        if let Some(player) = context.world.player() {
            if let Some(position) = context.world.position(player) {
                self.original_position = Some(position);
                let held = position + context.config.intro.holding_offset;
                context.world.set_position(player, held);
            }
        }

        self.cameras.follow(context.world.as_ref(), context.input.surface_size());
        self.set_box_visibility(context, true);

        let wait = context.config.intro.fade_wait();
        self.master_bus.fade_to(context.audio.as_mut(), 0.0, wait);
    }

    fn on_exit(&mut self, next: GameState, context: &mut AppContext) {
        debug!("Leaving intro for {:?}", next);

        if let (Some(player), Some(position)) = (context.world.player(), self.original_position.take()) {
            context.world.set_position(player, position);
        }

        let wait = context.config.intro.fade_wait();
        self.master_bus.fade_to(context.audio.as_mut(), 1.0, wait);
    }

    fn advance_frame(
        &mut self,
        tick: Duration,
        context: &mut AppContext,
        transition: &mut Transition<GameState>,
    ) {
        self.cameras.follow(context.world.as_ref(), context.input.surface_size());

        let intro = &context.config.intro;

        if context.input.went_down(Control::Confirm) && self.fade_timer.arm(intro.fade_wait()) {
            debug!("Intro countdown armed for {:?}", intro.fade_wait());
        }

        if self.fade_timer.advance(tick) {
            context.fader.start(
                intro.fade_transition(),
                intro.fade_color,
                FadeMode::FadeOutThenIn,
                Vec3::new(-1.0, 1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
            );
        }

        if context.input.went_down(Control::Back) {
            transition.request(GameState::Menu, Priority::Cancel);
        }

        if context.fader.advance_frame(tick) {
            self.set_box_visibility(context, false);
            transition.request(GameState::Gameplay, Priority::Automatic);
        }
    }

    fn render_prep(&mut self, context: &mut AppContext) {
        self.cameras.prep(context.renderer.as_mut(), context.world.as_ref());
    }

    fn render(&mut self, context: &mut AppContext) {
        self.cameras.draw(context.renderer.as_mut(), context.world.as_ref());
        context.fader.render(context.renderer.as_mut());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
