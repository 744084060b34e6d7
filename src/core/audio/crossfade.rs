//=========================================================================
// Gain Ramps
//=========================================================================
//
// Two small helpers layered on top of `AudioEngine`:
//
//   BusFader      named bus resolved once, then ramped fire-and-forget
//   LapCrossfade  per-lap music tracks crossfaded as the lap advances
//
// Both degrade silently when a handle did not resolve.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{AudioEngine, BusId, ChannelId, GainTarget, SoundId};

//=== BusFader ============================================================

#[derive(Debug, Clone)]
pub struct BusFader {
    name: String,
    bus: Option<BusId>,
}

impl BusFader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bus: None,
        }
    }

    /// Resolves the bus handle. Returns whether it was found.
    pub fn bind(&mut self, audio: &dyn AudioEngine) -> bool {
        self.bus = audio.find_bus(&self.name);
        if self.bus.is_none() {
            warn!("Audio bus '{}' not found; fades on it are disabled", self.name);
        }
        self.bus.is_some()
    }

    /// Ramps the bus toward `gain` (clamped to `[0, 1]`).
    pub fn fade_to(&self, audio: &mut dyn AudioEngine, gain: f32, duration: Duration) {
        if let Some(bus) = self.bus {
            audio.fade_to(GainTarget::Bus(bus), gain.clamp(0.0, 1.0), duration);
        }
    }

    pub fn bus(&self) -> Option<BusId> {
        self.bus
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

//=== LapCrossfade ========================================================

/// All lap tracks play simultaneously; only their gains move.
///
/// Lap `n` maps to track `clamp(n, 1, len) - 1`. When the lap changes
/// every track ramps from the gain it had at that moment: the new lap's
/// track toward `1`, the rest toward `0`, over `duration`. A lap change
/// that lands mid-crossfade therefore picks up where the gains are.
#[derive(Debug, Clone)]
pub struct LapCrossfade {
    tracks: Vec<Option<SoundId>>,
    channels: Vec<Option<ChannelId>>,
    gains: Vec<f32>,
    start_gains: Vec<f32>,
    duration: Duration,
    elapsed: Duration,
    current_lap: u32,
    playing: bool,
}

impl LapCrossfade {
    pub fn new(duration: Duration) -> Self {
        Self {
            tracks: Vec::new(),
            channels: Vec::new(),
            gains: Vec::new(),
            start_gains: Vec::new(),
            duration,
            elapsed: duration,
            current_lap: 1,
            playing: false,
        }
    }

    /// Resolves one sound handle per lap track name.
    pub fn bind<S: AsRef<str>>(&mut self, audio: &dyn AudioEngine, names: &[S]) {
        self.tracks = names
            .iter()
            .map(|name| {
                let handle = audio.sound_handle(name.as_ref());
                if handle.is_none() {
                    warn!("Lap track '{}' missing from sound bank", name.as_ref());
                }
                handle
            })
            .collect();
    }

    //--- Playback ---------------------------------------------------------

    /// Starts every track, with only `lap`'s track audible.
    ///
    /// No-op while already playing.
    pub fn start(&mut self, audio: &mut dyn AudioEngine, lap: u32) {
        if self.playing {
            return;
        }

        let audible = self.track_index(lap);
        self.gains = (0..self.tracks.len())
            .map(|index| if Some(index) == audible { 1.0 } else { 0.0 })
            .collect();
        self.start_gains = self.gains.clone();
        self.channels = self
            .tracks
            .iter()
            .zip(&self.gains)
            .map(|(track, &gain)| {
                let channel = audio.play_sound((*track)?)?;
                audio.set_gain(channel, gain);
                Some(channel)
            })
            .collect();

        self.current_lap = lap;
        self.elapsed = self.duration;
        self.playing = true;
        debug!("Lap music started on lap {}", lap);
    }

    /// Follows the simulation's lap counter, ramping gains by `tick`.
    pub fn advance(&mut self, audio: &mut dyn AudioEngine, lap: u32, tick: Duration) {
        if !self.playing {
            return;
        }

        if lap != self.current_lap {
            let retarget = self.track_index(lap) != self.track_index(self.current_lap);
            self.current_lap = lap;
            if retarget {
                debug!("Lap {}: crossfading music", lap);
                self.start_gains = self.gains.clone();
                self.elapsed = Duration::ZERO;
            }
        }

        if self.is_settled() {
            return;
        }

        self.elapsed = (self.elapsed + tick).min(self.duration);
        let percent = self.percent();
        let audible = self.track_index(self.current_lap);

        for index in 0..self.gains.len() {
            let target = if Some(index) == audible { 1.0 } else { 0.0 };
            let gain = if percent >= 1.0 {
                target
            } else {
                let from = self.start_gains[index];
                from + (target - from) * percent
            };
            self.set_gain_at(audio, index, gain);
        }
    }

    /// Stops every track.
    pub fn stop(&mut self, audio: &mut dyn AudioEngine) {
        for channel in self.channels.drain(..).flatten() {
            audio.stop(channel);
        }
        self.playing = false;
        self.elapsed = self.duration;
    }

    //--- Queries ----------------------------------------------------------

    /// Crossfade progress in `[0, 1]`; exactly `1.0` once settled.
    pub fn percent(&self) -> f32 {
        if self.is_settled() {
            return 1.0;
        }
        self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_lap(&self) -> u32 {
        self.current_lap
    }

    //--- Internals --------------------------------------------------------

    fn is_settled(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn track_index(&self, lap: u32) -> Option<usize> {
        let count = self.tracks.len();
        if count == 0 {
            return None;
        }
        Some((lap as usize).clamp(1, count) - 1)
    }

    fn set_gain_at(&mut self, audio: &mut dyn AudioEngine, index: usize, gain: f32) {
        self.gains[index] = gain;
        if let Some(channel) = self.channels.get(index).copied().flatten() {
            audio.set_gain(channel, gain);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
