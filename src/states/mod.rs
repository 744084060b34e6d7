//=========================================================================
// Application States
//=========================================================================
//
// The concrete state nodes and their identifiers.
//
// Edges:
//   Intro    → Gameplay  (fade completion)    Intro → Menu  (back)
//   Gameplay → Pause     (pause / back)
//   Pause    → Gameplay  (continue / unpause) Pause → Menu  (return / back)
//   Menu     → Intro     (start)
//
// Initial state: Intro. There is no terminal state; quitting is
// observed by the frame loop.
//
//=========================================================================

//=== Module Declarations =================================================

mod gameplay;
mod intro;
mod menu;
mod pause;

//=== Public API ==========================================================

pub use gameplay::GameplayState;
pub use intro::IntroState;
pub use menu::MenuState;
pub use pause::PauseState;

//=== Internal Dependencies ===============================================

use crate::core::config::Config;
use crate::core::state::{StateKey, StateMachine};

//=== GameState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Intro,
    Gameplay,
    Pause,
    Menu,
}

impl StateKey for GameState {}

impl GameState {
    pub const INITIAL: Self = Self::Intro;
}

/// Builds a machine with every stock node registered.
pub fn stock_machine(config: &Config) -> StateMachine<GameState> {
    let mut machine = StateMachine::new();
    machine.register(GameState::Intro, IntroState::new(config));
    machine.register(GameState::Gameplay, GameplayState::new(config));
    machine.register(GameState::Pause, PauseState::new(config));
    machine.register(GameState::Menu, MenuState::new(config));
    machine
}

//=========================================================================
// Unit Tests
//=========================================================================
