//=========================================================================
// Runtime Configuration
//=========================================================================
//
// Immutable tunables snapshot, deserialized from TOML once at startup
// and read by state nodes through the shared context.
//
// Every section has stock defaults, so an empty document is a valid
// configuration:
//
//   min_update_time_ms = 16
//   max_update_time_ms = 33
//
//   [intro]
//   fade_wait_ms = 500
//
//   [bindings]
//   pause = [{ key = "KeyP" }, { key = "Escape" }]
//
// A `[bindings]` table replaces the default bindings as a whole.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::camera::Vec3;
use crate::core::input::bindings::ControlBindings;

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

//=== Config ==============================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lower tick clamp. The loop sleeps rather than emit a shorter tick.
    pub min_update_time_ms: u64,

    /// Upper tick clamp, bounding catch-up after a stall.
    pub max_update_time_ms: u64,

    pub window: WindowConfig,
    pub viewport: ViewportConfig,
    pub intro: IntroConfig,
    pub gameplay: GameplayConfig,
    pub pause: PauseConfig,
    pub audio: AudioConfig,
    pub bindings: ControlBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_update_time_ms: 1000 / 60,
            max_update_time_ms: 1000 / 30,
            window: WindowConfig::default(),
            viewport: ViewportConfig::default(),
            intro: IntroConfig::default(),
            gameplay: GameplayConfig::default(),
            pause: PauseConfig::default(),
            audio: AudioConfig::default(),
            bindings: ControlBindings::default(),
        }
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_update_time_ms == 0 {
            return Err(ConfigError::Invalid(
                "min_update_time_ms must be positive".into(),
            ));
        }
        if self.min_update_time_ms > self.max_update_time_ms {
            return Err(ConfigError::Invalid(format!(
                "min_update_time_ms ({}) exceeds max_update_time_ms ({})",
                self.min_update_time_ms, self.max_update_time_ms
            )));
        }
        if self.intro.fade_wait_ms == 0 || self.intro.fade_transition_ms == 0 {
            return Err(ConfigError::Invalid("intro fade durations must be positive".into()));
        }
        if self.gameplay.music_crossfade_ms == 0 {
            return Err(ConfigError::Invalid(
                "gameplay.music_crossfade_ms must be positive".into(),
            ));
        }
        if self.gameplay.lap_tracks.len() != 3 {
            return Err(ConfigError::Invalid(format!(
                "expected 3 lap tracks, found {}",
                self.gameplay.lap_tracks.len()
            )));
        }
        Ok(())
    }

    //--- Derived Durations ------------------------------------------------

    pub fn min_update_time(&self) -> Duration {
        Duration::from_millis(self.min_update_time_ms)
    }

    pub fn max_update_time(&self) -> Duration {
        Duration::from_millis(self.max_update_time_ms)
    }
}

//=== Sections ============================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Aetheric Runtime".into(),
            width: 1200,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Vertical field of view, radians.
    pub angle: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub cardboard_viewport_angle: f32,

    /// Enables the secondary (stereo) camera on every state node.
    pub head_mounted_display: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            angle: std::f32::consts::FRAC_PI_4,
            near_plane: 1.0,
            far_plane: 100.0,
            cardboard_viewport_angle: std::f32::consts::FRAC_PI_3,
            head_mounted_display: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Delay between confirm and the start of the fade.
    pub fade_wait_ms: u64,

    /// Length of the full fade-out-then-in cycle.
    pub fade_transition_ms: u64,

    pub fade_color: Vec3,
    pub box_entity: String,

    /// Added to the player position on entry, removed on exit.
    pub holding_offset: Vec3,
}

impl IntroConfig {
    pub fn fade_wait(&self) -> Duration {
        Duration::from_millis(self.fade_wait_ms)
    }

    pub fn fade_transition(&self) -> Duration {
        Duration::from_millis(self.fade_transition_ms)
    }
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            fade_wait_ms: 500,
            fade_transition_ms: 1000,
            fade_color: Vec3::ZERO,
            box_entity: "introbox-1".into(),
            holding_offset: Vec3::new(0.0, 0.0, 500.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub music_crossfade_ms: u64,

    /// One music track per lap, in lap order.
    pub lap_tracks: Vec<String>,
    pub pause_sound: String,
}

impl GameplayConfig {
    pub fn music_crossfade(&self) -> Duration {
        Duration::from_millis(self.music_crossfade_ms)
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            music_crossfade_ms: 2000,
            lap_tracks: vec![
                "music_gameplay_lap_1".into(),
                "music_gameplay_lap_2".into(),
                "music_gameplay_lap_3".into(),
            ],
            pause_sound: "pause".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    pub continue_sound: String,
    pub exit_sound: String,
    pub background: String,
    pub button_size: f32,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            continue_sound: "continue".into(),
            exit_sound: "exit".into(),
            background: "textures/ui_background_base.webp".into(),
            button_size: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub master_bus: String,
    pub sound_bank: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_bus: "master".into(),
            sound_bank: "sound_banks/sound_assets.bin".into(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::bindings::Control;
    use crate::core::input::event::{KeyCode, Trigger};

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.min_update_time(), Duration::from_millis(16));
        assert_eq!(config.max_update_time(), Duration::from_millis(33));
        assert_eq!(config.intro.fade_wait(), Duration::from_millis(500));
        assert_eq!(config.intro.box_entity, "introbox-1");
        assert_eq!(config.audio.master_bus, "master");
        assert_eq!(config.gameplay.lap_tracks.len(), 3);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            min_update_time_ms = 10

            [intro]
            fade_wait_ms = 250
            holding_offset = [1.0, 2.0, 3.0]

            [pause]
            exit_sound = "leave"
            "#,
        )
        .unwrap();

        assert_eq!(config.min_update_time_ms, 10);
        assert_eq!(config.max_update_time_ms, 33);
        assert_eq!(config.intro.fade_wait_ms, 250);
        assert_eq!(config.intro.fade_transition_ms, 1000);
        assert_eq!(config.intro.holding_offset, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.pause.exit_sound, "leave");
        assert_eq!(config.pause.continue_sound, "continue");
    }

    #[test]
    fn bindings_override_from_toml() {
        let config = Config::from_toml_str(
            r#"
            [bindings]
            quit = [{ key = "KeyQ" }]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.bindings.triggers(Control::Quit),
            &[Trigger::Key(KeyCode::KeyQ)]
        );
    }

    #[test]
    fn rejects_inverted_clamp() {
        let err = Config::from_toml_str("min_update_time_ms = 50\nmax_update_time_ms = 20")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_minimum() {
        let err = Config::from_toml_str("min_update_time_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_wrong_lap_track_count() {
        let err = Config::from_toml_str("[gameplay]\nlap_tracks = [\"a\", \"b\"]").unwrap_err();
        assert!(err.to_string().contains("expected 3 lap tracks"));
    }

    #[test]
    fn reports_parse_errors() {
        let err = Config::from_toml_str("min_update_time_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load("/nonexistent/aetheric/runtime.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
