//=========================================================================
// Aetheric Runtime
//
// Entry point: assembles the collaborators, runs the startup sequence
// and hands the finished frame loop to a host.
//
// Architecture:
// ```text
//     EngineBuilder ──build()──> Engine ──run()──────────> Platform (winit)
//         │                        │                          └─ FrameLoop::step()
//         ├─ with_config_file()    └─ run_headless() ───> FrameLoop::run()
//         ├─ with_renderer() / with_world() / with_audio() / with_ui()
//         └─ with_states() / with_state() / initial_state()
// ```
//
// Startup order inside build():
//   config → renderer → asset gate → simulation → audio (degraded)
//   → sound bank (degraded) → input → Initialize (all) → OnEnter (initial)
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::path::PathBuf;

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Sender};
use log::{error, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioEngine, AudioError, SilentAudio};
use crate::core::clock::{FrameClock, SystemTimeSource, TimeSource};
use crate::core::config::{Config, ConfigError, WindowConfig};
use crate::core::context::AppContext;
use crate::core::frame_loop::{FrameLoop, LoopError, StepOutcome};
use crate::core::render::{finalize_assets, RenderError, Renderer};
use crate::core::state::{StateKey, StateMachine, StateNode};
use crate::core::ui::{HeadlessUi, MenuUi};
use crate::core::world::Simulation;
use crate::platform::{Platform, PlatformError, PlatformEvent};
use crate::states::{stock_machine, GameState};

//=== EngineError =========================================================

/// Fatal failures while starting or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Renderer(#[from] RenderError),

    #[error("no {0} was supplied to the engine builder")]
    MissingCollaborator(&'static str),

    #[error("no initial state was chosen")]
    NoInitialState,

    #[error("initial state {0} is not registered")]
    UnregisteredInitialState(String),

    #[error(transparent)]
    Loop(#[from] LoopError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

//=== Collaborator Factories ==============================================

type RendererFactory = Box<dyn FnOnce(&Config) -> Result<Box<dyn Renderer>, RenderError>>;
type WorldFactory = Box<dyn FnOnce(&Config) -> Box<dyn Simulation>>;
type AudioFactory = Box<dyn FnOnce(&Config) -> Result<Box<dyn AudioEngine>, AudioError>>;
type MachineFactory<S> = Box<dyn FnOnce(&Config) -> StateMachine<S>>;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Required
///
/// - a renderer factory ([`with_renderer`](Self::with_renderer))
/// - a simulation factory ([`with_world`](Self::with_world))
/// - at least one state and an initial state
///
/// # Defaults
///
/// - **Config**: [`Config::default()`] unless a value or file is given
/// - **Audio**: [`SilentAudio`]
/// - **Menu UI**: [`HeadlessUi`]
/// - **Time source**: [`SystemTimeSource`]
///
/// # Examples
///
/// ```no_run
/// # use aetheric_runtime::core::render::{RenderError, Renderer};
/// # use aetheric_runtime::core::world::Simulation;
/// # fn my_renderer() -> Box<dyn Renderer> { unimplemented!() }
/// # fn my_world() -> Box<dyn Simulation> { unimplemented!() }
/// use aetheric_runtime::states::GameState;
/// use aetheric_runtime::EngineBuilder;
///
/// EngineBuilder::<GameState>::new()
///     .with_config_file("runtime.toml")
///     .with_renderer(|_config| Ok(my_renderer()))
///     .with_world(|_config| my_world())
///     .with_stock_states()
///     .build()?
///     .run()?;
/// # Ok::<(), aetheric_runtime::EngineError>(())
/// ```
pub struct EngineBuilder<S: StateKey> {
    config: Option<Config>,
    config_path: Option<PathBuf>,
    renderer: Option<RendererFactory>,
    world: Option<WorldFactory>,
    audio: Option<AudioFactory>,
    ui: Option<Box<dyn MenuUi>>,
    time_source: Option<Box<dyn TimeSource>>,
    machine: Option<MachineFactory<S>>,
    extra_states: Vec<(S, Box<dyn StateNode<S>>)>,
    initial: Option<S>,
}

impl<S: StateKey> EngineBuilder<S> {
    pub fn new() -> Self {
        Self {
            config: None,
            config_path: None,
            renderer: None,
            world: None,
            audio: None,
            ui: None,
            time_source: None,
            machine: None,
            extra_states: Vec::new(),
            initial: None,
        }
    }

    //--- Configuration ----------------------------------------------------

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads the config from a TOML file at build time. Takes precedence
    /// over [`with_config`](Self::with_config).
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    //--- Collaborators ----------------------------------------------------

    pub fn with_renderer<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&Config) -> Result<Box<dyn Renderer>, RenderError> + 'static,
    {
        self.renderer = Some(Box::new(factory));
        self
    }

    pub fn with_world<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&Config) -> Box<dyn Simulation> + 'static,
    {
        self.world = Some(Box::new(factory));
        self
    }

    /// Audio is optional. A failing factory degrades to silence.
    pub fn with_audio<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&Config) -> Result<Box<dyn AudioEngine>, AudioError> + 'static,
    {
        self.audio = Some(Box::new(factory));
        self
    }

    pub fn with_ui(mut self, ui: impl MenuUi + 'static) -> Self {
        self.ui = Some(Box::new(ui));
        self
    }

    pub fn with_time_source(mut self, source: impl TimeSource + 'static) -> Self {
        self.time_source = Some(Box::new(source));
        self
    }

    //--- States -----------------------------------------------------------

    /// Supplies the state machine, built once the config is known.
    pub fn with_states<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&Config) -> StateMachine<S> + 'static,
    {
        self.machine = Some(Box::new(factory));
        self
    }

    /// Registers one more node on top of [`with_states`](Self::with_states).
    pub fn with_state(mut self, key: S, node: impl StateNode<S> + 'static) -> Self {
        self.extra_states.push((key, Box::new(node)));
        self
    }

    pub fn initial_state(mut self, key: S) -> Self {
        self.initial = Some(key);
        self
    }

    //--- Build ------------------------------------------------------------

    /// Runs the startup sequence and returns an engine whose initial
    /// state has already been entered.
    ///
    /// # Errors
    ///
    /// Config, renderer and state-setup failures are fatal. Audio and
    /// sound-bank failures are logged and replaced by silence.
    pub fn build(self) -> Result<Engine<S>, EngineError> {
        //--- 1. Config ---------------------------------------------------
        let config = match self.config_path {
            Some(path) => Config::load(&path)?,
            None => self.config.unwrap_or_default(),
        };
        if let Err(err) = config.validate() {
            error!("Invalid configuration: {}", err);
            return Err(err.into());
        }
        info!(
            "Building engine (update time {:?}..{:?})",
            config.min_update_time(),
            config.max_update_time()
        );

        //--- 2. Renderer and asset gate ---------------------------------
        let renderer_factory = self.renderer.ok_or(EngineError::MissingCollaborator("renderer"))?;
        let mut renderer = renderer_factory(&config).map_err(|err| {
            error!("Renderer creation failed: {}", err);
            EngineError::Renderer(err)
        })?;
        finalize_assets(renderer.as_mut());

        //--- 3. Simulation ----------------------------------------------
        let world_factory = self.world.ok_or(EngineError::MissingCollaborator("simulation"))?;
        let world = world_factory(&config);

        //--- 4. Audio (degraded on failure) -----------------------------
        let mut audio: Box<dyn AudioEngine> = match self.audio {
            Some(factory) => factory(&config).unwrap_or_else(|err| {
                warn!("{}; continuing without audio", err);
                Box::new(SilentAudio) as Box<dyn AudioEngine>
            }),
            None => {
                info!("No audio engine supplied, running silent");
                Box::new(SilentAudio)
            }
        };
        if let Err(err) = audio.load_sound_bank(&config.audio.sound_bank) {
            warn!("{}; sounds will be missing", err);
        }

        //--- 5. Input and shared context --------------------------------
        let ui = self.ui.unwrap_or_else(|| Box::new(HeadlessUi) as Box<dyn MenuUi>);
        let time_source = self
            .time_source
            .unwrap_or_else(|| Box::new(SystemTimeSource::new()) as Box<dyn TimeSource>);
        let clock = FrameClock::new(
            time_source,
            config.min_update_time(),
            config.max_update_time(),
        )
        .map_err(LoopError::from)?;
        let window = config.window.clone();
        let mut context = AppContext::new(config, world, renderer, audio, ui);

        //--- 6. States ---------------------------------------------------
        let mut machine = match self.machine {
            Some(factory) => factory(&context.config),
            None => StateMachine::new(),
        };
        for (key, node) in self.extra_states {
            machine.register_boxed(key, node);
        }

        let initial = self.initial.ok_or(EngineError::NoInitialState)?;
        if !machine.contains(initial) {
            error!("Initial state {:?} is not registered", initial);
            return Err(EngineError::UnregisteredInitialState(format!("{:?}", initial)));
        }

        machine.initialize_all(&mut context);
        machine.start(initial, &mut context);

        //--- 7. Frame loop -----------------------------------------------
        let (sender, receiver) = unbounded();
        info!("Engine ready, initial state {:?}", initial);

        Ok(Engine {
            frame_loop: FrameLoop::new(clock, machine, context, receiver),
            sender,
            window,
        })
    }
}

impl EngineBuilder<GameState> {
    /// Registers Intro, Gameplay, Pause and Menu, starting in Intro.
    pub fn with_stock_states(self) -> Self {
        self.with_states(stock_machine).initial_state(GameState::INITIAL)
    }
}

impl<S: StateKey> Default for EngineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// A started runtime, ready to be driven by a host.
///
/// # Hosts
///
/// - [`run`](Self::run): winit window, frames paced by the event loop
/// - [`run_headless`](Self::run_headless): no window, events arrive
///   through [`event_sender`](Self::event_sender); the loop ends on
///   `WindowClosed`, quit, or once every sender has been dropped
/// - [`step`](Self::step): one iteration at a time, for embedding
pub struct Engine<S: StateKey> {
    frame_loop: FrameLoop<S>,
    sender: Sender<PlatformEvent>,
    window: WindowConfig,
}

impl<S: StateKey> Engine<S> {
    //--- Accessors --------------------------------------------------------

    /// A handle for injecting platform events from outside.
    pub fn event_sender(&self) -> Sender<PlatformEvent> {
        self.sender.clone()
    }

    pub fn context(&self) -> &AppContext {
        self.frame_loop.context()
    }

    pub fn active_state(&self) -> Option<S> {
        self.frame_loop.active_state()
    }

    //--- Execution --------------------------------------------------------

    pub fn step(&mut self) -> Result<StepOutcome<S>, LoopError> {
        self.frame_loop.step()
    }

    /// Opens a window and runs until the frame loop exits.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Platform`] if winit fails and
    /// [`EngineError::Loop`] on a fatal frame-loop error.
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting windowed runtime");

        let mut platform = Platform::new(self.frame_loop, self.sender, self.window);
        platform.run()?;

        if let Some(err) = platform.take_loop_error() {
            return Err(err.into());
        }

        info!("Engine shutdown complete");
        Ok(())
    }

    /// Runs without a window. Events come only from
    /// [`event_sender`](Self::event_sender) handles taken beforehand.
    pub fn run_headless(self) -> Result<(), EngineError> {
        info!("Starting headless runtime");

        let Self { mut frame_loop, sender, .. } = self;
        drop(sender);
        frame_loop.run()?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
