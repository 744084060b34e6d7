//=========================================================================
// Full Screen Fader
//=========================================================================
//
// Timed overlay used to mask state transitions.
//
// Lifecycle:
//   finished ──start()──> running ──advance_frame() ... ──> finished
//                                         │
//                                         └─ returns true on the
//                                            completion frame only
//
// The fader is shared through the application context; whichever node
// started it is responsible for rendering it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::camera::Vec3;
use crate::core::render::Renderer;

//=== FadeMode ============================================================

/// Opacity curve over the fade's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeMode {
    /// Transparent → opaque.
    FadeOut,

    /// Opaque → transparent.
    FadeIn,

    /// Transparent → opaque at the midpoint → transparent.
    FadeOutThenIn,
}

impl FadeMode {
    /// Overlay opacity at `progress` in `[0, 1]`.
    pub fn opacity(self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            Self::FadeOut => p,
            Self::FadeIn => 1.0 - p,
            Self::FadeOutThenIn => 1.0 - (2.0 * p - 1.0).abs(),
        }
    }
}

//=== Overlay =============================================================

/// What the renderer should draw this frame: a colored quad spanning
/// `from_corner`..`to_corner` in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub color: Vec3,
    pub opacity: f32,
    pub from_corner: Vec3,
    pub to_corner: Vec3,
}

//=== FullScreenFader =====================================================

#[derive(Debug, Clone)]
pub struct FullScreenFader {
    running: bool,
    duration: Duration,
    elapsed: Duration,
    color: Vec3,
    mode: FadeMode,
    from_corner: Vec3,
    to_corner: Vec3,
}

impl FullScreenFader {
    /// Creates an idle fader. `finished()` is true until the first `start()`.
    pub fn new() -> Self {
        Self {
            running: false,
            duration: Duration::ZERO,
            elapsed: Duration::ZERO,
            color: Vec3::ZERO,
            mode: FadeMode::FadeOutThenIn,
            from_corner: Vec3::new(-1.0, 1.0, 0.0),
            to_corner: Vec3::new(1.0, -1.0, 0.0),
        }
    }

    //--- Control ----------------------------------------------------------

    /// Arms a new fade, discarding any fade in flight.
    pub fn start(
        &mut self,
        duration: Duration,
        color: Vec3,
        mode: FadeMode,
        from_corner: Vec3,
        to_corner: Vec3,
    ) {
        debug!("Fader started: {:?} over {:?}", mode, duration);
        self.running = true;
        self.duration = duration;
        self.elapsed = Duration::ZERO;
        self.color = color;
        self.mode = mode;
        self.from_corner = from_corner;
        self.to_corner = to_corner;
    }

    /// Advances the fade by `tick`.
    ///
    /// Returns `true` exactly once, on the frame the fade completes.
    pub fn advance_frame(&mut self, tick: Duration) -> bool {
        if !self.running {
            return false;
        }

        self.elapsed = (self.elapsed + tick).min(self.duration);
        if self.elapsed >= self.duration {
            debug!("Fader finished after {:?}", self.duration);
            self.running = false;
            return true;
        }
        false
    }

    /// Abandons any fade in flight without reporting completion.
    pub fn cancel(&mut self) {
        if self.running {
            debug!("Fader cancelled at {:.0}%", self.progress() * 100.0);
        }
        self.running = false;
    }

    //--- Queries ----------------------------------------------------------

    /// `true` when there is nothing to draw: before any `start()` and
    /// after completion.
    pub fn finished(&self) -> bool {
        !self.running
    }

    /// Fraction of the fade elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn overlay(&self) -> Option<Overlay> {
        if self.finished() {
            return None;
        }
        Some(Overlay {
            color: self.color,
            opacity: self.mode.opacity(self.progress()),
            from_corner: self.from_corner,
            to_corner: self.to_corner,
        })
    }

    //--- Rendering --------------------------------------------------------

    /// Draws the overlay while a fade is running.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        if let Some(overlay) = self.overlay() {
            renderer.render_overlay(&overlay);
        }
    }
}

impl Default for FullScreenFader {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
