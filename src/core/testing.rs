//=========================================================================
// Test Doubles
//=========================================================================
//
// Recording fakes for the external collaborators.
//
// Each fake is a cheap handle over shared state: clone it, box one clone
// into the context, keep the other to script behavior and inspect calls.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioEngine, AudioError, BusId, ChannelId, GainTarget, SoundId};
use crate::core::camera::{Camera, CameraView, Vec3};
use crate::core::config::Config;
use crate::core::context::AppContext;
use crate::core::fader::Overlay;
use crate::core::input::{InputEvent, InputSystem, KeyCode, Modifiers};
use crate::core::render::Renderer;
use crate::core::ui::{MenuLayout, MenuUi};
use crate::core::world::{EntityId, PlayerState, Simulation};

//=== Fixtures ============================================================

pub(crate) const PLAYER: EntityId = EntityId(1);
pub(crate) const INTRO_BOX: EntityId = EntityId(2);

pub(crate) const LAP_TRACKS: [&str; 3] = [
    "music_gameplay_lap_1",
    "music_gameplay_lap_2",
    "music_gameplay_lap_3",
];

const SOUNDS: [&str; 6] = [
    "music_gameplay_lap_1",
    "music_gameplay_lap_2",
    "music_gameplay_lap_3",
    "pause",
    "continue",
    "exit",
];

pub(crate) fn key_down(key: KeyCode) -> InputEvent {
    InputEvent::KeyDown {
        key,
        modifiers: Modifiers::NONE,
    }
}

pub(crate) fn key_up(key: KeyCode) -> InputEvent {
    InputEvent::KeyUp {
        key,
        modifiers: Modifiers::NONE,
    }
}

//=== FakeWorld ===========================================================

#[derive(Debug)]
pub(crate) struct WorldState {
    pub player: Option<EntityId>,
    pub player_position: Vec3,
    pub player_state: PlayerState,
    pub lap: u32,
    pub in_cardboard: bool,
    pub names: HashMap<String, EntityId>,
    pub visibility: HashMap<EntityId, bool>,
    pub updates: Vec<Duration>,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeWorld(Rc<RefCell<WorldState>>);

impl FakeWorld {
    pub fn new() -> Self {
        let mut names = HashMap::new();
        names.insert("introbox-1".to_string(), INTRO_BOX);
        Self(Rc::new(RefCell::new(WorldState {
            player: Some(PLAYER),
            player_position: Vec3::ZERO,
            player_state: PlayerState::Disabled,
            lap: 1,
            in_cardboard: true,
            names,
            visibility: HashMap::new(),
            updates: Vec::new(),
        })))
    }

    pub fn state(&self) -> RefMut<'_, WorldState> {
        self.0.borrow_mut()
    }

    pub fn is_visible(&self, entity: EntityId) -> Option<bool> {
        self.0.borrow().visibility.get(&entity).copied()
    }
}

impl Simulation for FakeWorld {
    fn update_components(&mut self, tick: Duration) {
        self.state().updates.push(tick);
    }

    fn player(&self) -> Option<EntityId> {
        self.0.borrow().player
    }

    fn entity_by_name(&self, name: &str) -> Option<EntityId> {
        self.0.borrow().names.get(name).copied()
    }

    fn position(&self, entity: EntityId) -> Option<Vec3> {
        let state = self.0.borrow();
        (state.player == Some(entity)).then_some(state.player_position)
    }

    fn set_position(&mut self, entity: EntityId, position: Vec3) {
        let mut state = self.state();
        if state.player == Some(entity) {
            state.player_position = position;
        }
    }

    fn set_visibility_recursively(&mut self, entity: EntityId, visible: bool) {
        self.state().visibility.insert(entity, visible);
    }

    fn set_player_state(&mut self, player_state: PlayerState) {
        self.state().player_state = player_state;
    }

    fn active_lap(&self) -> u32 {
        self.0.borrow().lap
    }

    fn player_view(&self) -> Option<CameraView> {
        let state = self.0.borrow();
        state.player.map(|_| CameraView {
            position: state.player_position,
            facing: Vec3::new(0.0, 1.0, 0.0),
        })
    }

    fn set_in_cardboard(&mut self, enabled: bool) {
        self.state().in_cardboard = enabled;
    }
}

//=== RecordingAudio ======================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Fade {
    pub target: GainTarget,
    pub gain: f32,
    pub duration: Duration,
}

#[derive(Debug, Default)]
pub(crate) struct AudioLog {
    pub buses: HashMap<String, BusId>,
    pub sounds: HashMap<String, SoundId>,
    pub played: Vec<(SoundId, ChannelId)>,
    pub gains: HashMap<ChannelId, f32>,
    pub gain_writes: usize,
    pub stopped: Vec<ChannelId>,
    pub fades: Vec<Fade>,
    pub paused: bool,
    pub advanced: Vec<f32>,
    pub banks: Vec<String>,
    pub bank_error: Option<AudioError>,
    next_channel: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordingAudio(Rc<RefCell<AudioLog>>);

impl RecordingAudio {
    /// An engine with the "master" bus and every stock sound loaded.
    pub fn new() -> Self {
        let mut log = AudioLog::default();
        log.buses.insert("master".into(), BusId(0));
        for (index, name) in SOUNDS.iter().enumerate() {
            log.sounds.insert((*name).into(), SoundId(index as u32 + 1));
        }
        Self(Rc::new(RefCell::new(log)))
    }

    pub fn log(&self) -> RefMut<'_, AudioLog> {
        self.0.borrow_mut()
    }

    fn name_of(&self, sound: SoundId) -> String {
        self.0
            .borrow()
            .sounds
            .iter()
            .find(|(_, id)| **id == sound)
            .map(|(name, _)| name.clone())
            .unwrap_or_default()
    }

    /// Names of every sound started, in order.
    pub fn played_names(&self) -> Vec<String> {
        let played = self.0.borrow().played.clone();
        played.into_iter().map(|(sound, _)| self.name_of(sound)).collect()
    }

    /// Last gain written to the most recent channel playing `name`.
    pub fn gain_of(&self, name: &str) -> Option<f32> {
        let log = self.0.borrow();
        let sound = *log.sounds.get(name)?;
        let (_, channel) = log.played.iter().rev().find(|(s, _)| *s == sound)?;
        log.gains.get(channel).copied()
    }

    pub fn bus_fades(&self) -> Vec<f32> {
        self.0
            .borrow()
            .fades
            .iter()
            .filter(|f| matches!(f.target, GainTarget::Bus(_)))
            .map(|f| f.gain)
            .collect()
    }
}

impl AudioEngine for RecordingAudio {
    fn load_sound_bank(&mut self, path: &str) -> Result<(), AudioError> {
        let mut log = self.log();
        log.banks.push(path.to_string());
        match log.bank_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn find_bus(&self, name: &str) -> Option<BusId> {
        self.0.borrow().buses.get(name).copied()
    }

    fn sound_handle(&self, name: &str) -> Option<SoundId> {
        self.0.borrow().sounds.get(name).copied()
    }

    fn play_sound(&mut self, sound: SoundId) -> Option<ChannelId> {
        let mut log = self.log();
        log.next_channel += 1;
        let channel = ChannelId(log.next_channel);
        log.played.push((sound, channel));
        Some(channel)
    }

    fn stop(&mut self, channel: ChannelId) {
        self.log().stopped.push(channel);
    }

    fn set_gain(&mut self, channel: ChannelId, gain: f32) {
        let mut log = self.log();
        log.gains.insert(channel, gain);
        log.gain_writes += 1;
    }

    fn fade_to(&mut self, target: GainTarget, gain: f32, duration: Duration) {
        self.log().fades.push(Fade {
            target,
            gain,
            duration,
        });
    }

    fn pause(&mut self, paused: bool) {
        self.log().paused = paused;
    }

    fn advance_frame(&mut self, elapsed_seconds: f32) {
        self.log().advanced.push(elapsed_seconds);
    }
}

//=== FakeRenderer ========================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RenderCall {
    Prep,
    World { stereo: bool },
    Overlay(Overlay),
}

#[derive(Debug)]
pub(crate) struct RenderLog {
    pub window_size: (u32, u32),
    pub calls: Vec<RenderCall>,
    pub cameras: Vec<Camera>,
    pub pending_assets: u32,
    pub finalize_polls: u32,
    pub culling: Option<bool>,
    pub resizes: Vec<(u32, u32)>,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeRenderer(Rc<RefCell<RenderLog>>);

impl FakeRenderer {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(RenderLog {
            window_size: (1200, 800),
            calls: Vec::new(),
            cameras: Vec::new(),
            pending_assets: 0,
            finalize_polls: 0,
            culling: None,
            resizes: Vec::new(),
        })))
    }

    pub fn log(&self) -> RefMut<'_, RenderLog> {
        self.0.borrow_mut()
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.0.borrow().calls.clone()
    }

    pub fn clear(&self) {
        let mut log = self.log();
        log.calls.clear();
        log.cameras.clear();
    }
}

impl Renderer for FakeRenderer {
    fn window_size(&self) -> (u32, u32) {
        self.0.borrow().window_size
    }

    fn resize(&mut self, size: (u32, u32)) {
        let mut log = self.log();
        log.window_size = size;
        log.resizes.push(size);
    }

    fn try_finalize_assets(&mut self) -> bool {
        let mut log = self.log();
        log.finalize_polls += 1;
        if log.pending_assets == 0 {
            return true;
        }
        log.pending_assets -= 1;
        false
    }

    fn render_prep(&mut self, camera: &Camera, _world: &dyn Simulation) {
        let mut log = self.log();
        log.calls.push(RenderCall::Prep);
        log.cameras.push(camera.clone());
    }

    fn render_world(&mut self, _world: &dyn Simulation, _camera: &Camera, secondary: Option<&Camera>) {
        self.log().calls.push(RenderCall::World {
            stereo: secondary.is_some(),
        });
    }

    fn render_overlay(&mut self, overlay: &Overlay) {
        self.log().calls.push(RenderCall::Overlay(*overlay));
    }

    fn set_culling(&mut self, enabled: bool) {
        self.log().culling = Some(enabled);
    }
}

//=== ScriptedUi ==========================================================

#[derive(Debug, Default)]
pub(crate) struct UiLog {
    /// Item reported as activated on the next `run`.
    pub activate: Option<usize>,
    pub layouts: Vec<MenuLayout>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedUi(Rc<RefCell<UiLog>>);

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates item `index` on the next frame.
    pub fn press(&self, index: usize) {
        self.0.borrow_mut().activate = Some(index);
    }

    pub fn log(&self) -> RefMut<'_, UiLog> {
        self.0.borrow_mut()
    }
}

impl MenuUi for ScriptedUi {
    fn run(&mut self, layout: &MenuLayout, _input: &InputSystem) -> Option<usize> {
        let mut log = self.log();
        log.layouts.push(layout.clone());
        log.activate.take()
    }
}

//=== Context Harness =====================================================

/// Handles onto the fakes boxed inside a test context.
pub(crate) struct Fakes {
    pub world: FakeWorld,
    pub audio: RecordingAudio,
    pub renderer: FakeRenderer,
    pub ui: ScriptedUi,
}

pub(crate) fn test_context_with(config: Config) -> (AppContext, Fakes) {
    let fakes = Fakes {
        world: FakeWorld::new(),
        audio: RecordingAudio::new(),
        renderer: FakeRenderer::new(),
        ui: ScriptedUi::new(),
    };
    let context = AppContext::new(
        config,
        Box::new(fakes.world.clone()),
        Box::new(fakes.renderer.clone()),
        Box::new(fakes.audio.clone()),
        Box::new(fakes.ui.clone()),
    );
    (context, fakes)
}

pub(crate) fn test_context() -> (AppContext, Fakes) {
    test_context_with(Config::default())
}

/// Feeds one frame of input into the context.
pub(crate) fn press(context: &mut AppContext, events: &[InputEvent]) {
    let size = context.renderer.window_size();
    context.input.advance_frame(events, size);
}
