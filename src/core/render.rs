//=========================================================================
// Renderer Boundary
//=========================================================================
//
// The renderer and its mesh/material/shader pipeline are an external
// collaborator. State nodes hand it cameras and a content flag; they
// never issue pixel-level commands.
//
// Per frame, for the active node only:
//   render_prep(camera, world) → render_world(world, camera, secondary)
//   → render_overlay(fader) while a fade runs
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::camera::Camera;
use crate::core::fader::Overlay;
use crate::core::world::Simulation;

//=== RenderError =========================================================

/// Renderer or window creation failed. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("renderer initialization failed: {0}")]
pub struct RenderError(pub String);

//=== Renderer ============================================================

pub trait Renderer {
    /// Current drawable size in pixels.
    fn window_size(&self) -> (u32, u32);

    /// Notifies the renderer that the surface changed size.
    fn resize(&mut self, size: (u32, u32));

    /// Polled once per spin of the startup asset gate.
    ///
    /// Returns `true` once every pending asset has been finalized.
    fn try_finalize_assets(&mut self) -> bool;

    /// Uploads per-frame camera data ahead of drawing.
    fn render_prep(&mut self, camera: &Camera, world: &dyn Simulation);

    /// Draws the world. `secondary` is the second eye when rendering for
    /// a head-mounted display.
    fn render_world(&mut self, world: &dyn Simulation, camera: &Camera, secondary: Option<&Camera>);

    /// Draws a full-screen fade overlay on top of the scene.
    fn render_overlay(&mut self, overlay: &Overlay);

    fn set_culling(&mut self, enabled: bool);
}

//--- Asset Gate ----------------------------------------------------------

/// Spin-polls the renderer until every pending asset is finalized.
///
/// Startup only. Returns the number of polls that reported work left.
pub fn finalize_assets(renderer: &mut dyn Renderer) -> u64 {
    let mut polls: u64 = 0;
    while !renderer.try_finalize_assets() {
        polls += 1;
        std::hint::spin_loop();
    }
    debug!("Assets finalized after {} polls", polls);
    polls
}

//=========================================================================
// Unit Tests
//=========================================================================
