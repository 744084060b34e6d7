//=========================================================================
// Simulation Boundary
//=========================================================================
//
// The entity-component simulation is an external collaborator. The
// runtime advances it once per frame and reads/writes a handful of
// component fields on behalf of the state nodes.
//
// Architecture:
//   FrameLoop ──update_components(tick)──> Simulation
//   StateNode ──position / visibility / player state / lap──> Simulation
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::camera::{CameraView, Vec3};

//=== EntityId ============================================================

/// Stable reference to a simulation entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

//=== PlayerState =========================================================

/// Whether the simulation should act on player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Active,
    Disabled,
}

//=== Simulation ==========================================================

/// Boundary contract of the entity-component simulation.
///
/// Component storage, update ordering and per-component logic are
/// entirely the implementor's business.
pub trait Simulation {
    /// Advances every component by one tick.
    fn update_components(&mut self, tick: Duration);

    /// The player entity, if one has been spawned.
    fn player(&self) -> Option<EntityId>;

    /// Looks up a tagged entity by its dictionary name.
    fn entity_by_name(&self, name: &str) -> Option<EntityId>;

    fn position(&self, entity: EntityId) -> Option<Vec3>;

    fn set_position(&mut self, entity: EntityId, position: Vec3);

    /// Shows or hides an entity and all of its children.
    fn set_visibility_recursively(&mut self, entity: EntityId, visible: bool);

    fn set_player_state(&mut self, state: PlayerState);

    /// Monotonically tracked lap counter of the active player (1-based).
    fn active_lap(&self) -> u32;

    /// Camera placement derived from the player's current transform.
    fn player_view(&self) -> Option<CameraView>;

    /// Toggles head-mounted ("cardboard") rendering mode.
    fn set_in_cardboard(&mut self, enabled: bool);
}
