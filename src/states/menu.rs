//=========================================================================
// Menu State
//=========================================================================
//
// Title menu: "Start" enters the intro, "Quit" raises the quit signal
// observed by the frame loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::info;

//=== Internal Dependencies ===============================================

use super::GameState;
use crate::core::camera::CameraRig;
use crate::core::config::Config;
use crate::core::context::AppContext;
use crate::core::state::{Priority, StateNode, Transition};
use crate::core::ui::MenuLayout;
use crate::core::world::PlayerState;

//=== MenuChoice ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Start,
    Quit,
}

//=== MenuState ===========================================================

pub struct MenuState {
    cameras: CameraRig,
    layout: MenuLayout,
    pending_choice: Option<MenuChoice>,
}

impl MenuState {
    pub fn new(config: &Config) -> Self {
        let size = config.pause.button_size;
        Self {
            cameras: CameraRig::new(&config.viewport),
            layout: MenuLayout::new()
                .background(config.pause.background.clone())
                .item("Start", size)
                .item("Quit", size),
            pending_choice: None,
        }
    }
}

impl StateNode<GameState> for MenuState {
    fn on_enter(&mut self, previous: Option<GameState>, context: &mut AppContext) {
        info!("Entering menu (from {:?})", previous);

        self.pending_choice = None;
        context.world.set_player_state(PlayerState::Disabled);
        context.input.set_relative_mouse_mode(false);
        self.cameras.follow(context.world.as_ref(), context.input.surface_size());
    }

    fn advance_frame(
        &mut self,
        _tick: Duration,
        context: &mut AppContext,
        transition: &mut Transition<GameState>,
    ) {
        self.cameras.follow(context.world.as_ref(), context.input.surface_size());

        match self.pending_choice.take() {
            Some(MenuChoice::Start) => {
                transition.request(GameState::Intro, Priority::Interaction);
            }
            Some(MenuChoice::Quit) => {
                info!("Quit selected from menu");
                context.request_quit();
            }
            None => {}
        }
    }

    fn render_prep(&mut self, context: &mut AppContext) {
        self.cameras.prep(context.renderer.as_mut(), context.world.as_ref());
    }

    fn render(&mut self, context: &mut AppContext) {
        self.cameras.draw(context.renderer.as_mut(), context.world.as_ref());
    }

    fn handle_ui(&mut self, context: &mut AppContext) {
        context.renderer.set_culling(false);

        self.pending_choice = match context.ui.run(&self.layout, &context.input) {
            Some(0) => Some(MenuChoice::Start),
            Some(1) => Some(MenuChoice::Quit),
            _ => None,
        };
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
