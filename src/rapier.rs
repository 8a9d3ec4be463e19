//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.

use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

use crate::backend::PlatformerPhysicsBackend;
use crate::config::{ControllerConfig, PlatformerGravity, ScaleConfig};
use crate::controller::PlatformerController;
use crate::events::ZoneContact;
use crate::probe::{GroundCast, GroundContact, GrowthClearance, ProbeBox};
use crate::scale::ScaleMachine;
use crate::zone::Zone;
use crate::{PlatformerCharacter, PlatformerSet};

/// Rapier2D physics backend for the platformer controller.
///
/// Velocity is read from and written to Rapier's [`Velocity`]; Rapier keeps
/// integrating baseline gravity. Ground probing, growth clearance and zone
/// contacts are handled by dedicated Rapier systems that receive the
/// `RapierContext` as a system parameter.
pub struct Rapier2dBackend;

impl PlatformerPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn get_position(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation.xy())
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation().xy())
            })
            .unwrap_or(Vec2::ZERO)
    }

    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.delta_secs())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 60.0)
    }

    fn get_collider_size(world: &World, entity: Entity) -> Option<Vec2> {
        world.get::<Collider>(entity).and_then(get_collider_size)
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        // Rapier fills mass properties in after the body's first step
        world
            .get::<ReadMassProperties>(entity)
            .map(|props| props.mass)
            .filter(|mass| *mass > 0.0 && mass.is_finite())
            .unwrap_or(1.0)
    }
}

/// Plugin that sets up Rapier2D-specific systems for the platformer controller.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        // Keep Rapier's integrator on the same gravity the controller scales by
        app.add_systems(
            FixedUpdate,
            sync_rapier_gravity.in_set(PlatformerSet::Preparation),
        );

        app.add_systems(
            FixedUpdate,
            rapier_ground_detection.in_set(PlatformerSet::Sensors),
        );

        app.add_systems(
            Update,
            rapier_growth_clearance.in_set(PlatformerSet::Sensors),
        );
        app.add_systems(
            Update,
            rapier_zone_contacts
                .in_set(PlatformerSet::Zones)
                .before(crate::systems::apply_zone_contacts),
        );
    }
}

/// Get the unscaled size of a collider's bounding box.
///
/// Supports cuboids, capsules and balls. Returns `None` for other shapes.
pub fn get_collider_size(collider: &Collider) -> Option<Vec2> {
    let size = if let Some(cuboid) = collider.as_cuboid() {
        cuboid.half_extents() * 2.0
    } else if let Some(capsule) = collider.as_capsule() {
        // Segment length plus the radius on both ends, on each axis
        let segment = capsule.segment();
        let span = (segment.a() - segment.b()).abs();
        span + Vec2::splat(capsule.radius() * 2.0)
    } else if let Some(ball) = collider.as_ball() {
        Vec2::splat(ball.radius() * 2.0)
    } else {
        return None;
    };

    // Shape views report the transform-scaled shape
    Some(size / collider.scale())
}

/// Query filter that only sees solid ground on the given mask.
fn ground_filter(exclude_entity: Entity, mask: u32) -> QueryFilter<'static> {
    QueryFilter::default()
        .exclude_rigid_body(exclude_entity)
        .exclude_sensors()
        .groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(mask),
        ))
}

/// Sweep the ground probe box straight down. Returns the ground entity hit.
fn rapier_box_cast(
    context: &RapierContext,
    cast: &GroundCast,
    exclude_entity: Entity,
) -> Option<Entity> {
    let shape = Collider::cuboid(cast.shape.half_extents.x, cast.shape.half_extents.y);

    context
        .cast_shape(
            cast.shape.center,
            0.0,
            Vec2::NEG_Y,
            &shape,
            ShapeCastOptions {
                max_time_of_impact: cast.distance,
                // A probe already resting inside the ground counts as a hit
                stop_at_penetration: true,
                ..default()
            },
            ground_filter(exclude_entity, cast.mask),
        )
        .map(|(hit_entity, _)| hit_entity)
}

/// Whether a probe box overlaps any solid on the mask.
fn rapier_box_overlaps(
    context: &RapierContext,
    probe: &ProbeBox,
    exclude_entity: Entity,
    mask: u32,
) -> bool {
    let shape = Collider::cuboid(probe.half_extents.x, probe.half_extents.y);
    let mut hit = false;
    context.intersections_with_shape(
        probe.center,
        0.0,
        &shape,
        ground_filter(exclude_entity, mask),
        |_| {
            hit = true;
            false
        },
    );
    hit
}

/// Copy [`PlatformerGravity`] into Rapier's configuration when it changes.
fn sync_rapier_gravity(
    gravity: Res<PlatformerGravity>,
    mut configs: Query<&mut RapierConfiguration>,
) {
    if !gravity.is_changed() {
        return;
    }
    for mut config in &mut configs {
        config.gravity = gravity.0;
    }
}

/// Rapier-specific ground detection system using a box cast.
///
/// The box spans the collider's width at its current scale and sweeps down
/// by 60% of its own thickness.
fn rapier_ground_detection(
    rapier_context: ReadRapierContext,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &ControllerConfig,
        &PlatformerController,
        Option<&ScaleMachine>,
        &mut GroundContact,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, controller, machine, mut contact) in &mut q_controllers {
        let mut extents = *controller.extents();
        extents.set_scale(machine.map(ScaleMachine::scale).unwrap_or(1.0));

        let cast = GroundCast::below(transform.translation().xy(), &extents, config);

        *contact = match rapier_box_cast(&context, &cast, entity) {
            Some(ground) => GroundContact::hit(Some(ground)),
            None => GroundContact::miss(),
        };
    }
}

/// Rapier-specific growth clearance check.
///
/// Only characters inside a grower zone are checked; everyone else keeps
/// their last result. The boxes start `ground_check_distance` out from the
/// collider, and a grounded character skips the floor side.
fn rapier_growth_clearance(
    rapier_context: ReadRapierContext,
    mut q_machines: Query<(
        Entity,
        &GlobalTransform,
        &ControllerConfig,
        &ScaleConfig,
        &PlatformerController,
        &GroundContact,
        &mut ScaleMachine,
    )>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, scale_config, controller, contact, mut machine) in
        &mut q_machines
    {
        if !machine.in_grower() {
            continue;
        }

        let mut extents = *controller.extents();
        extents.set_scale(machine.scale());

        let clearance = GrowthClearance::around(
            transform.translation().xy(),
            &extents,
            scale_config.clearance_distance,
            config.ground_check_distance,
        )
        .with_grounded(contact.grounded);
        let clear = clearance
            .boxes()
            .iter()
            .all(|probe| !rapier_box_overlaps(&context, probe, entity, config.ground_mask));

        if machine.growth_clearance() != clear {
            machine.set_growth_clearance(clear);
        }
    }
}

/// Translate Rapier collision events between characters and zones into
/// [`ZoneContact`] events.
///
/// Zone colliders need [`ActiveEvents::COLLISION_EVENTS`] to be reported.
fn rapier_zone_contacts(
    mut collisions: EventReader<CollisionEvent>,
    characters: Query<(), With<PlatformerCharacter>>,
    zones: Query<&Zone>,
    mut contacts: EventWriter<ZoneContact>,
) {
    for event in collisions.read() {
        let (a, b, entered) = match *event {
            CollisionEvent::Started(a, b, _) => (a, b, true),
            CollisionEvent::Stopped(a, b, _) => (a, b, false),
        };

        for (character, other) in [(a, b), (b, a)] {
            if !characters.contains(character) {
                continue;
            }
            if let Ok(zone) = zones.get(other) {
                contacts.write(ZoneContact {
                    controller: character,
                    kind: zone.kind(),
                    entered,
                });
            }
        }
    }
}

/// Bundle of Rapier2D physics components for a platformer character.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use msg_platformer_controller::prelude::*;
/// use msg_platformer_controller::rapier::Rapier2dPlatformerBundle;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         PlatformerCharacter,
///         ControllerConfig::default(),
///         Rapier2dPlatformerBundle::default(),
///         Collider::cuboid(0.5, 1.0),
///     ));
/// }
/// ```
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::Dynamic`]
/// - `locked_axes`: [`LockedAxes::ROTATION_LOCKED`], platformer characters stay upright
/// - `damping`: none, the controller's acceleration law does all slowing down
/// - `active_events`: collision events on, so zone sensors are reported
#[derive(Bundle)]
pub struct Rapier2dPlatformerBundle {
    /// The rigid body type.
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity. The controller reads and writes it.
    pub velocity: Velocity,
    /// Which axes are locked.
    pub locked_axes: LockedAxes,
    /// Damping coefficients for velocity reduction.
    pub damping: Damping,
    /// Computed mass properties. Rapier updates this based on the entity's collider.
    pub mass_properties: ReadMassProperties,
    /// Contact events needed for zones.
    pub active_events: ActiveEvents,
}

impl Default for Rapier2dPlatformerBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            locked_axes: LockedAxes::ROTATION_LOCKED,
            damping: Damping {
                linear_damping: 0.0,
                angular_damping: 0.0,
            },
            // Rapier will update this based on collider after first physics step
            mass_properties: ReadMassProperties::default(),
            active_events: ActiveEvents::COLLISION_EVENTS,
        }
    }
}

impl Rapier2dPlatformerBundle {
    /// Set the rigid body type for the character.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }

    /// Set the damping coefficients for velocity reduction.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.damping = Damping {
            linear_damping: linear,
            angular_damping: angular,
        };
        self
    }
}
