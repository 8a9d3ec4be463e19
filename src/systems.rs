//! Core controller systems.
//!
//! These systems drive [`PlatformerController`] from the ECS. They are
//! generic over the physics backend so different physics engines can be
//! used; the backend is only asked for body data, the controller does the
//! rest.

use bevy::prelude::*;

use crate::backend::PlatformerPhysicsBackend;
use crate::config::{ControllerConfig, ScaleConfig};
use crate::controller::{PlatformerController, StepContext};
use crate::events::{Died, Jumped, Landed, ZoneContact};
use crate::intent::PlatformerIntent;
use crate::probe::GroundContact;
use crate::scale::{ScaleChange, ScaleMachine};
use crate::state::MovementState;
use crate::PlatformerCharacter;

/// Create a [`PlatformerController`] for every new platformer character.
///
/// # Panics
///
/// A character without a collider, or with an invalid configuration, cannot
/// be driven at all; both panic with the offending entity.
pub fn initialize_controllers<B: PlatformerPhysicsBackend>(world: &mut World) {
    let pending: Vec<(Entity, ControllerConfig, Option<ScaleConfig>)> = world
        .query_filtered::<(Entity, &ControllerConfig, Option<&ScaleConfig>), (
            With<PlatformerCharacter>,
            Without<PlatformerController>,
        )>()
        .iter(world)
        .map(|(e, config, scale)| (e, *config, scale.copied()))
        .collect();

    for (entity, config, scale_config) in pending {
        let Some(collider_size) = B::get_collider_size(world, entity) else {
            panic!("Platformer character {entity} has no collider to size its ground probe");
        };

        if let Some(scale_config) = scale_config {
            if let Err(err) = scale_config.validate() {
                panic!("Platformer character {entity} has an invalid scale config: {err}");
            }
        }

        let controller = match PlatformerController::initialize(&config, collider_size) {
            Ok(controller) => controller,
            Err(err) => panic!("Platformer character {entity} has an invalid config: {err}"),
        };

        debug!("Initialized platformer controller for {entity} with collider {collider_size}");
        world.entity_mut(entity).insert(controller);
    }
}

/// Frame tick: sample jump input into the jump buffer.
pub fn sample_jump_input(
    mut q: Query<(&mut PlatformerController, &PlatformerIntent, &ControllerConfig)>,
) {
    for (mut controller, intent, config) in &mut q {
        controller.tick_variable(intent, config);
    }
}

/// Fixed tick: advance every controller by one physics step.
///
/// The body's integrated velocity is pulled into the controller first and
/// the shaped velocity is written back afterwards.
pub fn tick_fixed_controllers<B: PlatformerPhysicsBackend>(world: &mut World) {
    let dt = B::get_fixed_timestep(world);

    let entities: Vec<(
        Entity,
        PlatformerController,
        PlatformerIntent,
        ControllerConfig,
        GroundContact,
        f32,
    )> = world
        .query::<(
            Entity,
            &PlatformerController,
            &PlatformerIntent,
            &ControllerConfig,
            Option<&GroundContact>,
            Option<&ScaleMachine>,
        )>()
        .iter(world)
        .map(|(e, controller, intent, config, contact, machine)| {
            (
                e,
                controller.clone(),
                *intent,
                *config,
                contact.copied().unwrap_or_default(),
                machine.map(ScaleMachine::scale).unwrap_or(1.0),
            )
        })
        .collect();

    for (entity, mut controller, mut intent, config, contact, scale) in entities {
        let ctx = StepContext::new(
            dt,
            B::get_position(world, entity),
            B::get_gravity(world, entity),
        )
        .with_mass(B::get_mass(world, entity))
        .with_scale(scale);

        controller.sync_velocity(B::get_velocity(world, entity));
        let report = controller.tick_fixed(&ctx, &contact, &mut intent, &config);
        B::set_velocity(world, entity, controller.velocity());

        if report.landed {
            debug!("{entity} landed");
            world.send_event(Landed { entity });
        }
        if report.jumped {
            debug!("{entity} jumped with velocity {}", controller.velocity());
            world.send_event(Jumped { entity });
        }

        if let Some(mut stored) = world.get_mut::<PlatformerController>(entity) {
            *stored = controller;
        }
        if let Some(mut stored) = world.get_mut::<PlatformerIntent>(entity) {
            *stored = intent;
        }
    }
}

/// Mirror each controller's state onto its [`MovementState`] component.
pub fn sync_state_markers(mut q: Query<(&PlatformerController, &mut MovementState)>) {
    for (controller, mut state) in &mut q {
        state.set_if_neq(controller.state());
    }
}

/// Apply zone contacts: scale zone flags and hazard deaths.
pub fn apply_zone_contacts(
    mut contacts: EventReader<ZoneContact>,
    mut machines: Query<&mut ScaleMachine>,
    mut deaths: EventWriter<Died>,
) {
    for contact in contacts.read() {
        if contact.kind.affects_scale() {
            if let Ok(mut machine) = machines.get_mut(contact.controller) {
                machine.set_zone(contact.kind, contact.entered);
            }
        } else if contact.entered {
            debug!("{} touched a hazard", contact.controller);
            deaths.write(Died);
        }
    }
}

/// Advance scale machines and apply the result to the transform.
pub fn update_scale_machines(
    time: Res<Time>,
    mut q: Query<(Entity, &mut ScaleMachine, &ScaleConfig, &mut Transform)>,
) {
    let dt = time.delta_secs();

    for (entity, mut machine, config, mut transform) in &mut q {
        match machine.tick(config, dt) {
            ScaleChange::Shrunk | ScaleChange::Grew => {
                let scale = machine.scale();
                transform.scale = Vec3::new(scale, scale, transform.scale.z);
            }
            ScaleChange::Blocked => trace!("{entity} has no room to grow"),
            ScaleChange::Unchanged => {}
        }
    }
}
