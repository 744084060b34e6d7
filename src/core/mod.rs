//=========================================================================
// Core Systems
//
// Everything the frame loop drives, independent of any window system.
//
// Layout:
// ```text
//   clock       FrameClock, TimeSource          (tick production)
//   frame_loop  FrameLoop, StepOutcome          (per-frame ordering)
//   state       StateMachine, StateNode         (active node, transitions)
//   context     AppContext                      (shared collaborators)
//   input       InputSystem, controls, bindings
//   fade_timer  FadeTimer                       (one-shot countdown)
//   fader       FullScreenFader                 (overlay opacity)
//   audio       AudioEngine boundary, crossfades
//   camera      Camera, CameraRig
//   config      Config (TOML)
//   render / ui / world                         (collaborator boundaries)
// ```
//
// Notes:
// The simulation, renderer, audio mixer and menu UI are supplied from
// outside through the traits declared here. The core never owns their
// internals.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod audio;
pub mod camera;
pub mod clock;
pub mod config;
pub mod context;
pub mod fade_timer;
pub mod fader;
pub mod frame_loop;
pub mod input;
pub mod render;
pub mod state;
pub mod ui;
pub mod world;

#[cfg(test)]
pub(crate) mod testing;
