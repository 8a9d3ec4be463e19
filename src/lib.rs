//! # `msg_platformer_controller`
//!
//! A feel-tuned 2D platformer character controller with physics backend abstraction.
//!
//! This crate provides a deterministic, fixed-step character controller that:
//! - Accelerates horizontally with a non-linear force law and separate ground/air tuning
//! - Jumps from the ground or within a short coyote window after leaving it
//! - Buffers jump presses made shortly before landing
//! - Cuts jumps short on early release and pulls harder when falling
//! - Grows and shrinks inside scale zones when there is room
//! - Abstracts the physics backend for easy swapping (Rapier2D included)
//!
//! ## Architecture
//!
//! The physics engine owns the body and integrates baseline gravity. Each
//! fixed step the controller:
//! 1. Pulls the body's velocity
//! 2. Probes for ground with a thin box sweep below the collider
//! 3. Shapes the velocity (horizontal force, jump, jump cut, extra gravity)
//! 4. Writes the velocity back
//!
//! Input is fed through [`PlatformerIntent`](intent::PlatformerIntent); press
//! and release edges are latched until a fixed step has consumed them.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_platformer_controller::prelude::*;
//!
//! // A platformer character needs only the marker and a config
//! let character = (PlatformerCharacter, ControllerConfig::default());
//!
//! // Feed input each frame
//! let mut intent = PlatformerIntent::new();
//! intent.set_horizontal(1.0);
//! intent.set_jump_held(true);
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod intent;
pub mod level;
pub mod probe;
pub mod scale;
pub mod state;
pub mod systems;
pub mod timers;
pub mod zone;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::PlatformerPhysicsBackend;
    pub use crate::config::{ControllerConfig, PlatformerGravity, ScaleConfig};
    pub use crate::controller::{PlatformerController, StepContext, StepReport};
    pub use crate::error::{ConfigError, LevelError};
    pub use crate::events::{Died, Jumped, Landed, ZoneContact};
    pub use crate::intent::PlatformerIntent;
    pub use crate::level::{
        ActiveScene, LevelCommand, LevelFlowPlugin, LevelManager, Menu, SceneRequest,
    };
    pub use crate::probe::{
        ColliderExtents, GroundCast, GroundContact, GroundSensor, GrowthClearance, ProbeBox,
    };
    pub use crate::scale::{ScaleChange, ScaleMachine};
    pub use crate::state::MovementState;
    pub use crate::timers::JumpWindows;
    pub use crate::zone::{Zone, ZoneKind};
    pub use crate::{PlatformerCharacter, PlatformerControllerPlugin, PlatformerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::Rapier2dBackend;
}

/// Marks an entity as a platformer character.
///
/// The controller itself is created on the first fixed step, once the
/// backend can report the collider size.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
#[require(
    config::ControllerConfig,
    intent::PlatformerIntent,
    probe::GroundContact,
    state::MovementState
)]
pub struct PlatformerCharacter;

/// System sets for the platformer controller.
///
/// In `FixedUpdate` they run in the order:
/// 1. `Preparation` - Initialize new controllers
/// 2. `Sensors` - Backend ground probes
/// 3. `Movement` - Fixed tick: velocity sync, shaping, write-back
/// 4. `Finalize` - Mirror state onto components
///
/// In `Update` they run in the order `Input`, `Zones`, `Sensors` (growth
/// clearance), `Scale`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformerSet {
    Input,
    Preparation,
    Sensors,
    Movement,
    Zones,
    Scale,
    Finalize,
}

/// Main plugin for the platformer controller.
///
/// This plugin is generic over a physics backend `B` which provides the
/// body data and the backend-specific sensor systems.
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use msg_platformer_controller::prelude::*;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(PlatformerControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct PlatformerControllerPlugin<B: backend::PlatformerPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::PlatformerPhysicsBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::PlatformerPhysicsBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<PlatformerCharacter>();
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::ScaleConfig>();
        app.register_type::<config::PlatformerGravity>();
        app.register_type::<controller::PlatformerController>();
        app.register_type::<intent::PlatformerIntent>();
        app.register_type::<probe::GroundContact>();
        app.register_type::<scale::ScaleMachine>();
        app.register_type::<state::MovementState>();
        app.register_type::<zone::Zone>();

        app.init_resource::<config::PlatformerGravity>();

        app.add_event::<events::Landed>();
        app.add_event::<events::Jumped>();
        app.add_event::<events::ZoneContact>();
        app.add_event::<events::Died>();

        app.configure_sets(
            FixedUpdate,
            (
                PlatformerSet::Preparation,
                PlatformerSet::Sensors,
                PlatformerSet::Movement,
                PlatformerSet::Finalize,
            )
                .chain(),
        );
        app.configure_sets(
            Update,
            (
                PlatformerSet::Input,
                PlatformerSet::Zones,
                PlatformerSet::Sensors,
                PlatformerSet::Scale,
            )
                .chain(),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            systems::initialize_controllers::<B>.in_set(PlatformerSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            systems::tick_fixed_controllers::<B>.in_set(PlatformerSet::Movement),
        );
        app.add_systems(
            FixedUpdate,
            systems::sync_state_markers.in_set(PlatformerSet::Finalize),
        );

        app.add_systems(
            Update,
            systems::sample_jump_input.in_set(PlatformerSet::Input),
        );
        app.add_systems(
            Update,
            systems::apply_zone_contacts.in_set(PlatformerSet::Zones),
        );
        app.add_systems(
            Update,
            systems::update_scale_machines.in_set(PlatformerSet::Scale),
        );
    }
}
