//=========================================================================
// Aetheric Runtime: Library Root
//
// A fixed-cadence frame loop driving a small state machine (Intro,
// Gameplay, Pause, Menu) with timed screen fades and audio crossfades.
//
// Typical usage:
// ```no_run
// use aetheric_runtime::prelude::*;
//
// EngineBuilder::<GameState>::new()
//     .with_renderer(|config| make_renderer(config))
//     .with_world(|config| make_world(config))
//     .with_stock_states()
//     .build()?
//     .run()?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the loop, clock, state machine and the collaborator
// boundaries. `states` holds the stock state nodes built on top of it.
//
pub mod core;
pub mod states;

//--- Hosts ---------------------------------------------------------------
//
// `platform` runs the frame loop inside winit. `engine` assembles
// everything and picks a host.
//
pub mod engine;
pub mod platform;

pub mod prelude;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
