//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement
//! to drive the platformer controller. The controller only needs to read
//! and write body velocity and ask a few questions about the body; ground
//! probing and zone contacts are produced by systems the backend plugin
//! installs.

use bevy::prelude::*;

use crate::config::PlatformerGravity;

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the platformer
/// controller. The backend plugin is expected to:
///
/// - write [`GroundContact`](crate::probe::GroundContact) for every character
///   in [`PlatformerSet::Sensors`](crate::PlatformerSet::Sensors) of `FixedUpdate`
/// - report growth clearance on [`ScaleMachine`](crate::scale::ScaleMachine)
///   in [`PlatformerSet::Sensors`](crate::PlatformerSet::Sensors) of `Update`
/// - send [`ZoneContact`](crate::events::ZoneContact) events when characters
///   touch [`Zone`](crate::zone::Zone) colliders
///
/// See the `rapier` module's `Rapier2dBackend` for a complete implementation.
pub trait PlatformerPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Get the current velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Get the current position of an entity.
    fn get_position(world: &World, entity: Entity) -> Vec2;

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32;

    /// Get the unscaled size of the entity's collider.
    ///
    /// Returns `None` if the entity has no collider the backend understands.
    fn get_collider_size(world: &World, entity: Entity) -> Option<Vec2>;

    /// Get the gravity the integrator applies to an entity.
    ///
    /// Defaults to the [`PlatformerGravity`] resource.
    fn get_gravity(world: &World, _entity: Entity) -> Vec2 {
        world
            .get_resource::<PlatformerGravity>()
            .copied()
            .unwrap_or_default()
            .0
    }

    /// Get the mass of an entity.
    ///
    /// Jump impulses and movement forces are divided by it.
    fn get_mass(_world: &World, _entity: Entity) -> f32 {
        // Default implementation returns 1.0 (no scaling)
        1.0
    }
}
