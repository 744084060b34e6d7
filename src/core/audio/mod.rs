//=========================================================================
// Audio Boundary
//=========================================================================
//
// The mixing engine is an external collaborator. The runtime only
// decides *when* to play a sound or ramp a gain and with which target
// and duration; ramp curves and timing are the engine's business.
//
// Architecture:
//   StateNode ──play_sound / fade_to / set_gain──> AudioEngine
//   FrameLoop ──advance_frame(seconds)──────────> AudioEngine
//
// Audio is non-essential: if the engine fails to initialize the
// runtime substitutes `SilentAudio` and keeps going.
//
//=========================================================================

//=== Module Declarations =================================================

mod crossfade;

//=== Public API ==========================================================

pub use crossfade::{BusFader, LapCrossfade};

//=== External Dependencies ===============================================

use std::time::Duration;

use thiserror::Error;

//=== Handles =============================================================

/// Named mix bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusId(pub u32);

/// Loaded sound definition from the sound bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// A playing sound instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u32);

/// Anything whose gain can be ramped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GainTarget {
    Bus(BusId),
    Channel(ChannelId),
}

//=== AudioError ==========================================================

/// Audio failures. Always degraded, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("audio engine initialization failed: {0}")]
    Init(String),

    #[error("failed to load sound bank {path}: {reason}")]
    SoundBank { path: String, reason: String },
}

//=== AudioEngine =========================================================

/// Boundary contract of the audio mixing engine.
pub trait AudioEngine {
    /// Loads a bank of sound definitions.
    fn load_sound_bank(&mut self, path: &str) -> Result<(), AudioError>;

    fn find_bus(&self, name: &str) -> Option<BusId>;

    fn sound_handle(&self, name: &str) -> Option<SoundId>;

    /// Starts a sound. Returns `None` if no channel could be allocated.
    fn play_sound(&mut self, sound: SoundId) -> Option<ChannelId>;

    fn stop(&mut self, channel: ChannelId);

    /// Sets a channel's gain immediately.
    fn set_gain(&mut self, channel: ChannelId, gain: f32);

    /// Fire-and-forget ramp of `target` toward `gain` over `duration`.
    fn fade_to(&mut self, target: GainTarget, gain: f32, duration: Duration);

    /// Suspends or resumes all output (application backgrounding).
    fn pause(&mut self, paused: bool);

    /// Called by the frame loop exactly once per emitted tick.
    fn advance_frame(&mut self, elapsed_seconds: f32);
}

//=== SilentAudio =========================================================

/// Audio engine stand-in used when the real one failed to start.
///
/// Every lookup misses, so callers see the same inert handles they
/// would for a sound bank missing an entry.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioEngine for SilentAudio {
    fn load_sound_bank(&mut self, _path: &str) -> Result<(), AudioError> {
        Ok(())
    }

    fn find_bus(&self, _name: &str) -> Option<BusId> {
        None
    }

    fn sound_handle(&self, _name: &str) -> Option<SoundId> {
        None
    }

    fn play_sound(&mut self, _sound: SoundId) -> Option<ChannelId> {
        None
    }

    fn stop(&mut self, _channel: ChannelId) {}

    fn set_gain(&mut self, _channel: ChannelId, _gain: f32) {}

    fn fade_to(&mut self, _target: GainTarget, _gain: f32, _duration: Duration) {}

    fn pause(&mut self, _paused: bool) {}

    fn advance_frame(&mut self, _elapsed_seconds: f32) {}
}

//--- Helpers -------------------------------------------------------------

/// Plays a sound if the handle resolved. Returns whether it started.
pub fn play_if_loaded(audio: &mut dyn AudioEngine, sound: Option<SoundId>) -> bool {
    match sound {
        Some(sound) => audio.play_sound(sound).is_some(),
        None => false,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
