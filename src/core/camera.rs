//=========================================================================
// Camera
//=========================================================================
//
// View parameters handed to the renderer by each state node.
//
// Each node exclusively owns its cameras and recomputes them from the
// simulation's player view every frame (and on entry), so a camera
// never carries stale data across a state re-entry.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::{Add, AddAssign, Sub};

use serde::Deserialize;

//=== Internal Dependencies ===============================================

use crate::core::config::ViewportConfig;
use crate::core::render::Renderer;
use crate::core::world::Simulation;

//=== Vec3 ================================================================

/// Minimal 3-component vector for positions and directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "[f32; 3]")]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

//=== CameraView ==========================================================

/// Position and facing reported by the simulation for the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub facing: Vec3,
}

//=== Camera ==============================================================

/// Perspective camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub facing: Vec3,
    pub viewport_angle: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub viewport_resolution: (u32, u32),
}

impl Camera {
    pub fn new(viewport_angle: f32, near_plane: f32, far_plane: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            facing: Vec3::new(0.0, 1.0, 0.0),
            viewport_angle,
            near_plane,
            far_plane,
            viewport_resolution: (0, 0),
        }
    }

    /// Re-derives position and facing from the player's view.
    ///
    /// Leaves the camera untouched if the simulation has no player yet.
    pub fn follow(&mut self, world: &dyn Simulation) {
        if let Some(view) = world.player_view() {
            self.position = view.position;
            self.facing = view.facing;
        }
    }

    pub fn set_viewport_resolution(&mut self, size: (u32, u32)) {
        self.viewport_resolution = size;
    }
}

//=== CameraRig ===========================================================

/// The cameras a state node owns: the main view plus, when a
/// head-mounted display is configured, the second eye.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub main: Camera,
    pub secondary: Option<Camera>,
}

impl CameraRig {
    pub fn new(viewport: &ViewportConfig) -> Self {
        let main = Camera::new(viewport.angle, viewport.near_plane, viewport.far_plane);
        let secondary = viewport.head_mounted_display.then(|| {
            Camera::new(
                viewport.cardboard_viewport_angle,
                viewport.near_plane,
                viewport.far_plane,
            )
        });
        Self { main, secondary }
    }

    /// Recomputes every camera from the player view and surface size.
    pub fn follow(&mut self, world: &dyn Simulation, surface_size: (u32, u32)) {
        for camera in std::iter::once(&mut self.main).chain(self.secondary.as_mut()) {
            camera.follow(world);
            camera.set_viewport_resolution(surface_size);
        }
    }

    pub fn prep(&self, renderer: &mut dyn Renderer, world: &dyn Simulation) {
        renderer.render_prep(&self.main, world);
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, world: &dyn Simulation) {
        renderer.render_world(world, &self.main, self.secondary.as_ref());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
