//=========================================================================
// Pause State
//=========================================================================
//
// Overlay menu with two choices over a frozen world view.
//
// The UI pass runs after `advance_frame`, so a button activated in
// `handle_ui` is stored and consumed by the next `advance_frame`
// alongside that frame's key shortcuts. Once the request is resolved,
// exactly one confirmation sound plays.
//
// Lap music survives only the return to Gameplay; any other exit stops
// it.
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
use crate::core::ui::MenuLayout;
use crate::core::world::PlayerState;

const CONTINUE_ITEM: usize = 0;
const RETURN_TO_TITLE_ITEM: usize = 1;

//=== PauseState ==========================================================

pub struct PauseState {
    cameras: CameraRig,
    layout: MenuLayout,
    sound_continue: Option<SoundId>,
    sound_exit: Option<SoundId>,

    /// Choice made in last frame's UI pass.
    pending_choice: Option<GameState>,
}

impl PauseState {
    pub fn new(config: &Config) -> Self {
        let pause = &config.pause;
        Self {
            cameras: CameraRig::new(&config.viewport),
            layout: MenuLayout::new()
                .background(pause.background.clone())
                .item("Continue", pause.button_size)
                .item("Return to Title", pause.button_size),
            sound_continue: None,
            sound_exit: None,
            pending_choice: None,
        }
    }
}

impl StateNode<GameState> for PauseState {
    fn initialize(&mut self, context: &mut AppContext) {
        let pause = &context.config.pause;
        let audio = context.audio.as_ref();

        self.sound_continue = audio.sound_handle(&pause.continue_sound);
        self.sound_exit = audio.sound_handle(&pause.exit_sound);

        for (name, handle) in [
            (&pause.continue_sound, self.sound_continue),
            (&pause.exit_sound, self.sound_exit),
        ] {
            if handle.is_none() {
                warn!("Pause sound '{}' missing from sound bank", name);
            }
        }
    }

    fn on_enter(&mut self, previous: Option<GameState>, context: &mut AppContext) {
        info!("Entering pause (from {:?})", previous);

        self.pending_choice = None;
        context.world.set_player_state(PlayerState::Disabled);
        context.input.set_relative_mouse_mode(false);
        self.cameras.follow(context.world.as_ref(), context.input.surface_size());
    }

    fn on_exit(&mut self, next: GameState, context: &mut AppContext) {
        if next != GameState::Gameplay && context.music.is_playing() {
            debug!("Stopping lap music on exit to {:?}", next);
            context.music.stop(context.audio.as_mut());
        }
    }

    fn advance_frame(
        &mut self,
        _tick: Duration,
        context: &mut AppContext,
        transition: &mut Transition<GameState>,
    ) {
        self.cameras.follow(context.world.as_ref(), context.input.surface_size());

        if let Some(choice) = self.pending_choice.take() {
            transition.request(choice, Priority::Interaction);
        }
        if context.input.went_down(Control::Pause) {
            transition.request(GameState::Gameplay, Priority::Interaction);
        }
        if context.input.went_down(Control::Back) {
            transition.request(GameState::Menu, Priority::Cancel);
        }

        match transition.target() {
            Some(GameState::Gameplay) => {
                play_if_loaded(context.audio.as_mut(), self.sound_continue);
            }
            Some(GameState::Menu) => {
                context.world.set_in_cardboard(false);
                play_if_loaded(context.audio.as_mut(), self.sound_exit);
            }
            _ => {}
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
            Some(CONTINUE_ITEM) => Some(GameState::Gameplay),
            Some(RETURN_TO_TITLE_ITEM) => Some(GameState::Menu),
            _ => None,
        };
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode};
    use crate::core::testing::{key_down, press, test_context, Fakes, LAP_TRACKS};

    const TICK: Duration = Duration::from_millis(16);

    fn entered() -> (PauseState, AppContext, Fakes) {
        let (mut context, fakes) = test_context();
        let mut pause = PauseState::new(&context.config);
        pause.initialize(&mut context);
        pause.on_enter(Some(GameState::Gameplay), &mut context);
        (pause, context, fakes)
    }

    /// Runs a UI pass (optionally activating `item`), then the next
    /// frame's advance with `events`.
    fn frame(
        pause: &mut PauseState,
        context: &mut AppContext,
        fakes: &Fakes,
        item: Option<usize>,
        events: &[InputEvent],
    ) -> Option<GameState> {
        if let Some(item) = item {
            fakes.ui.press(item);
        }
        pause.handle_ui(context);

        press(context, events);
        let mut transition = Transition::default();
        pause.advance_frame(TICK, context, &mut transition);
        transition.target()
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn on_enter_disables_player_and_releases_cursor() {
        let (mut context, fakes) = test_context();
        context.input.set_relative_mouse_mode(true);
        let mut pause = PauseState::new(&context.config);
        pause.initialize(&mut context);

        pause.on_enter(Some(GameState::Gameplay), &mut context);

        assert_eq!(fakes.world.state().player_state, PlayerState::Disabled);
        assert!(!context.input.relative_mouse_mode());
    }

    #[test]
    fn idle_frame_stays_silent() {
        let (mut pause, mut context, fakes) = entered();
        assert_eq!(frame(&mut pause, &mut context, &fakes, None, &[]), None);
        assert!(fakes.audio.played_names().is_empty());
    }

    //--- Choices ----------------------------------------------------------

    #[test]
    fn continue_button_resumes_gameplay() {
        let (mut pause, mut context, fakes) = entered();
        let target = frame(&mut pause, &mut context, &fakes, Some(0), &[]);

        assert_eq!(target, Some(GameState::Gameplay));
        assert_eq!(fakes.audio.played_names(), vec!["continue"]);
    }

    #[test]
    fn continue_button_and_unpause_key_play_one_sound() {
        let (mut pause, mut context, fakes) = entered();
        let target = frame(
            &mut pause,
            &mut context,
            &fakes,
            Some(0),
            &[key_down(KeyCode::KeyP)],
        );

        assert_eq!(target, Some(GameState::Gameplay));
        assert_eq!(fakes.audio.played_names(), vec!["continue"]);
    }

    #[test]
    fn return_to_title_leaves_cardboard_mode() {
        let (mut pause, mut context, fakes) = entered();
        let target = frame(&mut pause, &mut context, &fakes, Some(1), &[]);

        assert_eq!(target, Some(GameState::Menu));
        assert!(!fakes.world.state().in_cardboard);
        assert_eq!(fakes.audio.played_names(), vec!["exit"]);
    }

    #[test]
    fn exit_to_menu_stops_lap_music() {
        let (mut pause, mut context, fakes) = entered();
        context.music.bind(context.audio.as_ref(), &LAP_TRACKS);
        context.music.start(context.audio.as_mut(), 1);

        pause.on_exit(GameState::Menu, &mut context);

        assert!(!context.music.is_playing());
        assert_eq!(fakes.audio.log().stopped.len(), LAP_TRACKS.len());
    }

    #[test]
    fn exit_to_gameplay_keeps_lap_music() {
        let (mut pause, mut context, fakes) = entered();
        context.music.bind(context.audio.as_ref(), &LAP_TRACKS);
        context.music.start(context.audio.as_mut(), 1);

        pause.on_exit(GameState::Gameplay, &mut context);

        assert!(context.music.is_playing());
        assert!(fakes.audio.log().stopped.is_empty());
    }

    #[test]
    fn back_overrides_continue_choice() {
        let (mut pause, mut context, fakes) = entered();
        let target = frame(
            &mut pause,
            &mut context,
            &fakes,
            Some(0),
            &[key_down(KeyCode::Escape)],
        );

        assert_eq!(target, Some(GameState::Menu));
        assert_eq!(fakes.audio.played_names(), vec!["exit"]);
    }

    #[test]
    fn choice_is_consumed_once() {
        let (mut pause, mut context, fakes) = entered();
        frame(&mut pause, &mut context, &fakes, Some(0), &[]);
        assert_eq!(frame(&mut pause, &mut context, &fakes, None, &[]), None);
    }

    #[test]
    fn reentry_discards_stale_choice() {
        let (mut pause, mut context, fakes) = entered();
        fakes.ui.press(1);
        pause.handle_ui(&mut context);

        pause.on_enter(Some(GameState::Gameplay), &mut context);

        press(&mut context, &[]);
        let mut transition = Transition::default();
        pause.advance_frame(TICK, &mut context, &mut transition);
        assert!(transition.is_stay());
    }

    //--- UI ---------------------------------------------------------------

    #[test]
    fn ui_pass_disables_culling_and_draws_menu() {
        let (mut pause, mut context, fakes) = entered();
        pause.handle_ui(&mut context);

        assert_eq!(fakes.renderer.log().culling, Some(false));
        let log = fakes.ui.log();
        let layouts = &log.layouts;
        assert_eq!(layouts.len(), 1);
        assert_eq!(
            layouts[0].background.as_deref(),
            Some("textures/ui_background_base.webp")
        );
        assert_eq!(layouts[0].items.len(), 2);
        assert_eq!(layouts[0].items[0].size, 100.0);
    }
}
