//! The platformer controller core.
//!
//! [`PlatformerController`] is a small deterministic state machine. Each fixed
//! step it probes for ground, resolves its [`MovementState`], then shapes the
//! velocity it owns:
//!
//! 1. Extents follow the current scale
//! 2. Ground probe → state, landing edge refills coyote time
//! 3. Horizontal force law, clamped to max speed
//! 4. Timing windows, jump, jump cut, state-dependent gravity
//! 5. Terminal velocity clamp
//!
//! The core is engine agnostic: the Bevy systems in [`crate::systems`] are
//! one driver of [`PlatformerController::tick_fixed`], tests drive it
//! directly.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::error::ConfigError;
use crate::intent::PlatformerIntent;
use crate::probe::{ColliderExtents, GroundCast, GroundSensor};
use crate::state::MovementState;
use crate::timers::JumpWindows;

/// Per-step environment the controller needs from its driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepContext {
    /// Fixed step length in seconds.
    pub dt: f32,
    /// Collider center in world space.
    pub center: Vec2,
    /// Gravity the physics integrator applies.
    pub gravity: Vec2,
    /// Body mass, forces and impulses are divided by it.
    pub mass: f32,
    /// Current uniform scale of the body.
    pub scale: f32,
}

impl StepContext {
    /// Context for a unit-mass, unscaled body.
    pub fn new(dt: f32, center: Vec2, gravity: Vec2) -> Self {
        Self {
            dt,
            center,
            gravity,
            mass: 1.0,
            scale: 1.0,
        }
    }

    /// Builder: set the body mass.
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Builder: set the body scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// What happened during one fixed step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Ground probe result.
    pub grounded: bool,
    /// The character touched down this step.
    pub landed: bool,
    /// A jump fired this step.
    pub jumped: bool,
    /// An early release cut the jump short this step.
    pub jump_cut: bool,
}

/// Platformer controller state for one character.
#[derive(Component, Reflect, Debug, Clone, PartialEq)]
#[reflect(Component)]
pub struct PlatformerController {
    velocity: Vec2,
    state: MovementState,
    windows: JumpWindows,
    grounded_last_step: bool,
    extents: ColliderExtents,
}

impl PlatformerController {
    /// Create a controller for a collider of the given unscaled size.
    ///
    /// Fails if the configuration or the collider size is invalid.
    pub fn initialize(config: &ControllerConfig, collider_size: Vec2) -> Result<Self, ConfigError> {
        config.validate()?;
        if !(collider_size.is_finite() && collider_size.x > 0.0 && collider_size.y > 0.0) {
            return Err(ConfigError::InvalidColliderSize(collider_size));
        }

        Ok(Self {
            velocity: Vec2::ZERO,
            state: MovementState::Grounded,
            windows: JumpWindows::default(),
            grounded_last_step: true,
            extents: ColliderExtents::new(collider_size),
        })
    }

    /// Current velocity.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Overwrite the velocity with the body's integrated velocity.
    ///
    /// Drivers call this before each step so the controller works on what
    /// the physics engine actually did since the last step.
    pub fn sync_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Current movement state.
    #[inline]
    pub fn state(&self) -> MovementState {
        self.state
    }

    /// Coyote and jump-buffer countdowns.
    #[inline]
    pub fn windows(&self) -> &JumpWindows {
        &self.windows
    }

    /// Current collider extents.
    #[inline]
    pub fn extents(&self) -> &ColliderExtents {
        &self.extents
    }

    /// Frame tick: sample jump input into the buffer.
    ///
    /// Runs at frame rate so a press is registered even on frames without a
    /// fixed step. It never advances time.
    pub fn tick_variable(&mut self, intent: &PlatformerIntent, config: &ControllerConfig) {
        self.windows.sample_jump_buffer(intent.wants_jump(), config);
    }

    /// Fixed tick: advance the controller by one physics step.
    ///
    /// Consumes the latched press and release edges of `intent`.
    pub fn tick_fixed<S: GroundSensor + ?Sized>(
        &mut self,
        ctx: &StepContext,
        sensor: &S,
        intent: &mut PlatformerIntent,
        config: &ControllerConfig,
    ) -> StepReport {
        self.extents.set_scale(ctx.scale);

        let cast = GroundCast::below(ctx.center, &self.extents, config);
        let grounded = sensor.is_grounded(&cast);
        let landed = self.update_state(grounded, config);

        self.apply_horizontal(intent.horizontal(), config, ctx.mass, ctx.dt);

        self.windows.update_coyote(self.state, config, ctx.dt);
        self.windows
            .update_jump_buffer(intent.wants_jump(), config, ctx.dt);

        let jumped = self.can_jump();
        if jumped {
            self.perform_jump(intent.jump_held(), config, ctx.mass);
        }

        let jump_cut = intent.jump_released() && self.release_jump();

        self.apply_gravity(intent.jump_held(), config, ctx.gravity.y, ctx.dt);
        self.clamp_terminal_velocity(config);

        intent.clear_edges();

        StepReport {
            grounded,
            landed,
            jumped,
            jump_cut,
        }
    }

    /// Resolve the movement state from the probe result.
    ///
    /// Returns `true` on the landing edge, which also refills coyote time.
    pub fn update_state(&mut self, grounded: bool, config: &ControllerConfig) -> bool {
        self.state = MovementState::resolve(grounded, self.velocity.y, config.rising_threshold);

        let landed = grounded && !self.grounded_last_step;
        if landed {
            self.windows.refill_coyote(config);
        }
        self.grounded_last_step = grounded;
        landed
    }

    /// Whether a jump may fire right now.
    ///
    /// Requires a buffered press and either ground contact or a falling body
    /// still inside coyote time. A rising body can never jump again.
    pub fn can_jump(&self) -> bool {
        let from_state = match self.state {
            MovementState::Grounded => true,
            MovementState::Falling => self.windows.coyote_active(),
            MovementState::Jumping => false,
        };
        self.windows.jump_buffered() && from_state
    }

    /// Fire a jump.
    ///
    /// Downward velocity is discarded first so the height doesn't depend on
    /// how fast the body was falling. Holding jump boosts the impulse.
    pub fn perform_jump(&mut self, held: bool, config: &ControllerConfig, mass: f32) {
        let mut impulse = config.jump_force;
        if held {
            impulse *= config.high_jump_multiplier;
        }

        if self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
        self.velocity.y += impulse / mass;

        self.windows.consume_jump_buffer();
        self.state = MovementState::Jumping;
    }

    /// Cut a rising jump short after the button is released.
    ///
    /// Halves upward velocity and closes the coyote window. No-op when not
    /// rising. Returns whether the cut happened.
    pub fn release_jump(&mut self) -> bool {
        if self.velocity.y <= 0.0 {
            return false;
        }
        self.velocity.y *= 0.5;
        self.windows.expire_coyote();
        true
    }

    /// Ease horizontal velocity toward the input's target speed.
    pub fn apply_horizontal(&mut self, axis: f32, config: &ControllerConfig, mass: f32, dt: f32) {
        let target_speed = axis * config.max_speed;
        let accelerating = target_speed.abs() > config.input_deadzone;
        let rate = match (self.state.is_grounded(), accelerating) {
            (true, true) => config.ground_accel,
            (true, false) => config.ground_decel,
            (false, true) => config.air_accel,
            (false, false) => config.air_decel,
        };

        let speed_diff = target_speed - self.velocity.x;
        let force = (speed_diff * rate).abs().powf(0.8) * speed_diff.signum();
        self.velocity.x += force / mass * dt;

        if self.velocity.x.abs() > config.max_speed {
            self.velocity.x = self.velocity.x.signum() * config.max_speed;
        }
    }

    /// Add the state-dependent extra gravity on top of baseline gravity.
    pub fn apply_gravity(&mut self, held: bool, config: &ControllerConfig, gravity_y: f32, dt: f32) {
        match self.state {
            MovementState::Jumping => {
                if self.velocity.y > 0.0 && !held {
                    self.velocity.y += gravity_y * (config.low_jump_multiplier - 1.0) * dt;
                }
                // Snappier apex, applied whether or not jump is held
                self.velocity.y += gravity_y * (config.fall_multiplier - 1.0) * dt * 0.5;
            }
            MovementState::Falling => {
                self.velocity.y += gravity_y * (config.fall_multiplier - 1.0) * dt;
            }
            MovementState::Grounded => {
                if self.velocity.y < 0.0 {
                    self.velocity.y = -config.ground_stick_speed;
                }
            }
        }
    }

    /// Limit downward speed to the terminal velocity.
    pub fn clamp_terminal_velocity(&mut self, config: &ControllerConfig) {
        if self.velocity.y < -config.terminal_velocity {
            self.velocity.y = -config.terminal_velocity;
        }
    }
}
