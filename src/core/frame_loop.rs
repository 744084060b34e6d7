//=========================================================================
// Frame Loop
//
// Top-level driver tying the clock, input, simulation, state machine,
// renderer and audio engine together.
//
// Responsibilities:
// - Receive platform events over a crossbeam channel
// - Pull clamped ticks from the FrameClock, waiting when it is too soon
// - Run one strictly ordered frame per emitted tick
// - Stop on window close, quit control or the context's quit signal
//
// Per frame, with no interleaving:
//   input → simulation → state machine (≤ 1 transition) → render → audio
//
// Notes:
// Single-threaded. The only suspension point is the sleep on `Wait`
// in `run()`; the windowed platform replaces it with
// `ControlFlow::WaitUntil` so the OS event pump keeps running.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::thread;
use std::time::Duration;

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{error, info, trace};
use thiserror::Error;

//=== Internal Modules ====================================================

use crate::core::clock::{ClockError, ClockTick, FrameClock};
use crate::core::context::AppContext;
use crate::core::input::{Control, InputEvent};
use crate::core::state::{StateKey, StateMachine};
use crate::platform::PlatformEvent;

//=== LoopError ===========================================================

#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error("frame loop stepped with no active state")]
    NoActiveState,
}

//=== StepOutcome =========================================================

/// Result of one `FrameLoop::step()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome<S: StateKey> {
    /// Too soon for a tick. Nothing ran; retry after the duration.
    Wait(Duration),

    /// A full frame ran with `tick`, possibly switching states.
    Advanced {
        tick: Duration,
        transition: Option<(S, S)>,
    },

    /// An exit condition was observed. The loop should stop.
    Exit,
}

//=== TickControl =========================================================
//
// Control flow signal from draining the platform channel.
//
enum TickControl {
    Continue,
    Exit,
}

//=== FrameLoop ===========================================================

pub struct FrameLoop<S: StateKey> {
    clock: FrameClock,
    machine: StateMachine<S>,
    context: AppContext,
    events: Receiver<PlatformEvent>,
    pending: Vec<InputEvent>,
}

impl<S: StateKey> FrameLoop<S> {
    //--- Construction -----------------------------------------------------

    /// Assembles a loop around a machine that has already been started.
    pub fn new(
        clock: FrameClock,
        machine: StateMachine<S>,
        context: AppContext,
        events: Receiver<PlatformEvent>,
    ) -> Self {
        Self {
            clock,
            machine,
            context,
            events,
            pending: Vec::with_capacity(32),
        }
    }

    //--- step() -----------------------------------------------------------
    //
    // One loop iteration:
    //  1. Drain platform events
    //  2. Poll the clock (Wait if too soon, fatal on regression)
    //  3. Advance input with the current surface size
    //  4. Advance the simulation
    //  5. Advance the state machine, applying at most one transition
    //  6. Render the (possibly new) active state
    //  7. Advance audio by the tick in seconds
    //
    pub fn step(&mut self) -> Result<StepOutcome<S>, LoopError> {
        //--- Step 1: Gather platform events ----------------------------
        if let TickControl::Exit = self.collect_platform_events() {
            info!("Frame loop exiting: platform closed");
            return Ok(StepOutcome::Exit);
        }

        if self.machine.active().is_none() {
            error!("Frame loop stepped before the state machine was started");
            return Err(LoopError::NoActiveState);
        }

        //--- Step 2: Pull a tick ---------------------------------------
        let tick = match self.clock.tick() {
            Ok(ClockTick::Ready(tick)) => tick,
            Ok(ClockTick::TooSoon { wait }) => return Ok(StepOutcome::Wait(wait)),
            Err(err) => {
                error!("Fatal clock failure: {}", err);
                return Err(err.into());
            }
        };

        //--- Step 3: Input ---------------------------------------------
        let surface_size = self.context.renderer.window_size();
        self.context.input.advance_frame(&self.pending, surface_size);
        self.pending.clear();

        if self.exit_requested() {
            info!("Frame loop exiting: quit requested");
            return Ok(StepOutcome::Exit);
        }

        //--- Step 4: Simulation ----------------------------------------
        self.context.world.update_components(tick);

        //--- Step 5: State machine -------------------------------------
        let transition = self.machine.advance_frame(tick, &mut self.context);

        //--- Step 6: Render --------------------------------------------
        self.machine.render(&mut self.context);

        //--- Step 7: Audio ---------------------------------------------
        self.context.audio.advance_frame(tick.as_secs_f32());

        trace!("Frame advanced by {:?}", tick);
        Ok(StepOutcome::Advanced { tick, transition })
    }

    //--- run() ------------------------------------------------------------
    //
    // Drives `step()` until an exit condition, sleeping through waits.
    //
    pub fn run(&mut self) -> Result<(), LoopError> {
        loop {
            match self.step()? {
                StepOutcome::Wait(wait) => thread::sleep(wait),
                StepOutcome::Advanced { .. } => {}
                StepOutcome::Exit => return Ok(()),
            }
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.context
    }

    pub fn active_state(&self) -> Option<S> {
        self.machine.active()
    }

    //--- Internal Helpers -------------------------------------------------

    fn exit_requested(&self) -> bool {
        self.context.input.went_down(Control::Quit)
            || self.context.input.exit_requested()
            || self.context.quit_requested()
    }

    //--- collect_platform_events() ---------------------------------------
    //
    // Drains everything queued since the last step without blocking.
    // Input is held in `pending` until a tick is actually emitted, so
    // nothing is lost across `Wait` outcomes.
    //
    fn collect_platform_events(&mut self) -> TickControl {
        loop {
            match self.events.try_recv() {
                Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                    self.pending.extend(discrete);
                    self.pending.extend(continuous);
                }
                Ok(PlatformEvent::Resized { width, height }) => {
                    self.context.renderer.resize((width, height));
                    self.context.input.set_minimized(width == 0 || height == 0);
                }
                Ok(PlatformEvent::Suspended) => {
                    info!("Application suspended, pausing audio");
                    self.context.audio.pause(true);
                    self.context.input.release_all();
                }
                Ok(PlatformEvent::Resumed) => {
                    info!("Application resumed, unpausing audio");
                    self.context.audio.pause(false);
                }
                Ok(PlatformEvent::WindowClosed) => {
                    self.context.input.request_exit();
                    return TickControl::Exit;
                }
                Err(TryRecvError::Empty) => return TickControl::Continue,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
