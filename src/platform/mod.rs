//=========================================================================
// Platform Subsystem
//
// Hosts the frame loop inside the winit event loop.
//
// Architecture:
// ```text
//  Main Thread (single):
//  ┌──────────────────────────────────────────────────────┐
//  │  Winit Event Loop                                    │
//  │   ├─ window_event ─> InputProcessor ─> InputBuffer   │
//  │   ├─ Resized / Suspended / Resumed / CloseRequested  │
//  │   │        │                                         │
//  │   │        └──> crossbeam channel (PlatformEvent) ─┐ │
//  │   ↓                                                │ │
//  │  about_to_wait                                     │ │
//  │   ├─ flush InputBuffer ─> channel ─────────────────┤ │
//  │   └─ FrameLoop::step() <── drains channel ─────────┘ │
//  │        ├─ Wait(d)   → ControlFlow::WaitUntil(now+d)  │
//  │        ├─ Advanced  → ControlFlow::Poll              │
//  │        └─ Exit      → event_loop.exit()              │
//  └──────────────────────────────────────────────────────┘
// ```
//
// Notes:
// - The frame loop never sleeps here. Waiting is delegated to winit so
//   the OS event pump keeps running between ticks.
// - Cursor capture follows `InputSystem::relative_mouse_mode` after
//   every advanced frame.
// - Winit mandates the main thread on macOS/iOS, so this runs on the
//   thread that called `Engine::run()`.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== Standard Library Imports ============================================

use std::time::Instant;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::{debug, error, info, trace, warn};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    error::{EventLoopError, OsError},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::config::WindowConfig;
use crate::core::frame_loop::{FrameLoop, LoopError, StepOutcome};
use crate::core::input::InputEvent;
use crate::core::state::StateKey;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== PlatformEvent =======================================================

/// Messages from the platform layer to the frame loop.
///
/// Headless hosts and tests feed the loop through the same channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Input gathered since the last flush.
    ///
    /// `discrete` holds key and button edges in arrival order,
    /// `continuous` the coalesced cursor motion. Empty batches are not
    /// sent.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// The drawable surface changed size. Zero in either dimension
    /// means minimized.
    Resized { width: u32, height: u32 },

    /// The application was backgrounded.
    Suspended,

    /// The application returned to the foreground.
    Resumed,

    /// Window close requested by the user or the OS.
    WindowClosed,
}

//=== PlatformError =======================================================

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] EventLoopError),

    #[error("window creation failed: {0}")]
    WindowCreation(#[from] OsError),
}

//=== Platform ============================================================

/// Window owner and host of the frame loop.
///
/// # Lifecycle
///
/// 1. `Platform::new(frame_loop, sender, window)`: nothing is created yet
/// 2. `run()`: starts the winit loop; the window appears in `resumed()`
/// 3. Each `about_to_wait` flushes input and steps the frame loop
/// 4. Exit on `StepOutcome::Exit` or a fatal `LoopError`
pub struct Platform<S: StateKey> {
    window: Option<Window>,
    window_config: WindowConfig,

    buffer: InputBuffer,
    input_processor: InputProcessor,
    event_sender: Sender<PlatformEvent>,

    frame_loop: FrameLoop<S>,
    cursor_captured: bool,

    /// First fatal error observed inside the event loop.
    loop_error: Option<LoopError>,
    window_error: Option<PlatformError>,
}

impl<S: StateKey> Platform<S> {
    //--- Construction -----------------------------------------------------

    pub fn new(
        frame_loop: FrameLoop<S>,
        event_sender: Sender<PlatformEvent>,
        window_config: WindowConfig,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            window_config,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            event_sender,
            frame_loop,
            cursor_captured: false,
            loop_error: None,
            window_error: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the frame loop exits.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop or window could not be
    /// created. A fatal frame-loop error ends the loop normally and is
    /// retrieved with [`Platform::take_loop_error`].
    pub fn run(&mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(self)
            .map_err(PlatformError::EventLoopExecution)?;

        match self.window_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn take_loop_error(&mut self) -> Option<LoopError> {
        self.loop_error.take()
    }

    pub fn frame_loop(&self) -> &FrameLoop<S> {
        &self.frame_loop
    }

    //--- Internal Helpers -------------------------------------------------

    fn send(&self, event: PlatformEvent) {
        if self.event_sender.send(event).is_err() {
            warn!(target: "platform", "Frame loop channel disconnected, event dropped");
        }
    }

    /// Sends everything buffered since the last flush as one batch.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete.len(),
                continuous.len()
            );
            self.send(PlatformEvent::Inputs { discrete, continuous });
        }
    }

    /// Steps the frame loop once and maps the outcome onto winit's
    /// control flow.
    fn drive_frame_loop(&mut self, event_loop: &ActiveEventLoop) {
        match self.frame_loop.step() {
            Ok(StepOutcome::Wait(wait)) => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + wait));
            }
            Ok(StepOutcome::Advanced { transition, .. }) => {
                if let Some((from, to)) = transition {
                    debug!(target: "platform", "State switched {:?} -> {:?}", from, to);
                }
                self.apply_cursor_capture();
                event_loop.set_control_flow(ControlFlow::Poll);
            }
            Ok(StepOutcome::Exit) => {
                info!(target: "platform", "Frame loop finished, leaving event loop");
                event_loop.exit();
            }
            Err(err) => {
                error!(target: "platform", "Frame loop failed: {}", err);
                self.loop_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn apply_cursor_capture(&mut self) {
        let wanted = self.frame_loop.context().input.relative_mouse_mode();
        if wanted == self.cursor_captured {
            return;
        }
        let Some(window) = &self.window else {
            return;
        };

        let grabbed = if wanted {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(err) = grabbed {
            warn!(target: "platform", "Cursor grab change failed: {}", err);
        }
        window.set_cursor_visible(!wanted);

        debug!(target: "platform", "Relative mouse mode {}", if wanted { "on" } else { "off" });
        self.cursor_captured = wanted;
    }
}

//=== Winit Integration ===================================================

impl<S: StateKey> ApplicationHandler for Platform<S> {
    /// Creates the window on first activation; later calls are
    /// foreground returns.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.send(PlatformEvent::Resumed);
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.send(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
                self.window = Some(window);
            }
            Err(err) => {
                error!(target: "platform", "Window creation failed: {}", err);
                self.window_error = Some(err.into());
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.send(PlatformEvent::Suspended);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
            }

            WindowEvent::Resized(size) => {
                self.send(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input_processor.update_modifiers(modifiers.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_mouse_move(position.x, position.y);
                self.buffer.push(event);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(&event) {
                    self.buffer.push(event);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.buffer.push(event);
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }
        self.flush_input_buffer();
        self.drive_frame_loop(event_loop);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
