//! Controller configuration components.
//!
//! Every tunable that shapes how the character feels lives here. Values are
//! validated once when the controller is initialized; the per-tick code trusts
//! them afterwards.

use bevy::prelude::*;

use crate::error::ConfigError;

/// Gravity used to scale the extra fall and low-jump pull.
///
/// This is the same gravity the physics integrator applies to the body. The
/// controller never applies baseline gravity itself, it only adds the
/// state-dependent extra on top.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Resource)]
pub struct PlatformerGravity(pub Vec2);

impl Default for PlatformerGravity {
    fn default() -> Self {
        Self(Vec2::new(0.0, -9.81))
    }
}

/// Tuning parameters for the platformer controller.
///
/// Units are world units and seconds. Multipliers are dimensionless factors
/// where values above 1.0 mean "stronger than baseline gravity".
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct ControllerConfig {
    // === Horizontal Movement ===
    /// Maximum horizontal speed (units/second).
    pub max_speed: f32,
    /// How quickly max speed is reached while grounded.
    pub ground_accel: f32,
    /// How quickly direction can change while airborne.
    pub air_accel: f32,
    /// How quickly the character stops on the ground without input.
    pub ground_decel: f32,
    /// How quickly the character slows in the air without input.
    pub air_decel: f32,
    /// Horizontal input magnitude below which the character decelerates.
    pub input_deadzone: f32,

    // === Vertical Movement ===
    /// Base upward impulse of a jump.
    pub jump_force: f32,
    /// Gravity multiplier while falling.
    pub fall_multiplier: f32,
    /// Gravity multiplier while rising without holding jump.
    pub low_jump_multiplier: f32,
    /// Impulse multiplier when jump is held at the moment the jump fires.
    pub high_jump_multiplier: f32,
    /// Grace period after leaving the ground during which a jump still fires.
    pub coyote_time: f32,
    /// Grace period before landing during which a jump press is remembered.
    pub jump_buffer_time: f32,
    /// Maximum downward speed. Stored as a positive magnitude.
    pub terminal_velocity: f32,
    /// Downward speed the body is pinned to while grounded, keeps it seated on steps.
    pub ground_stick_speed: f32,
    /// Upward speed above which an airborne character counts as jumping.
    pub rising_threshold: f32,

    // === Ground Probe ===
    /// Thickness of the ground probe box. The sweep distance is 60% of this.
    pub ground_check_distance: f32,
    /// Collision filter bits of the colliders that count as ground.
    pub ground_mask: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            ground_accel: 50.0,
            air_accel: 25.0,
            ground_decel: 60.0,
            air_decel: 20.0,
            input_deadzone: 0.01,

            jump_force: 12.0,
            fall_multiplier: 3.0,
            low_jump_multiplier: 2.0,
            high_jump_multiplier: 1.25,
            coyote_time: 0.1,
            jump_buffer_time: 0.1,
            terminal_velocity: 80.0,
            ground_stick_speed: 2.0,
            rising_threshold: 0.1,

            ground_check_distance: 0.05,
            ground_mask: u32::MAX,
        }
    }
}

impl ControllerConfig {
    /// Check every tunable against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_speed", self.max_speed)?;
        positive("ground_accel", self.ground_accel)?;
        positive("air_accel", self.air_accel)?;
        positive("ground_decel", self.ground_decel)?;
        positive("air_decel", self.air_decel)?;
        at_least("input_deadzone", 0.0, self.input_deadzone)?;

        positive("jump_force", self.jump_force)?;
        at_least("fall_multiplier", 1.0, self.fall_multiplier)?;
        at_least("low_jump_multiplier", 1.0, self.low_jump_multiplier)?;
        at_least("high_jump_multiplier", 1.0, self.high_jump_multiplier)?;
        at_least("coyote_time", 0.0, self.coyote_time)?;
        at_least("jump_buffer_time", 0.0, self.jump_buffer_time)?;
        positive("terminal_velocity", self.terminal_velocity)?;
        at_least("ground_stick_speed", 0.0, self.ground_stick_speed)?;
        at_least("rising_threshold", 0.0, self.rising_threshold)?;

        positive("ground_check_distance", self.ground_check_distance)?;
        Ok(())
    }

    /// Sweep distance of the ground probe.
    #[inline]
    pub fn ground_probe_distance(&self) -> f32 {
        self.ground_check_distance * 0.6
    }

    /// Builder: set horizontal movement parameters.
    pub fn with_movement(mut self, max_speed: f32, ground_accel: f32, ground_decel: f32) -> Self {
        self.max_speed = max_speed;
        self.ground_accel = ground_accel;
        self.ground_decel = ground_decel;
        self
    }

    /// Builder: set air control parameters.
    pub fn with_air_control(mut self, air_accel: f32, air_decel: f32) -> Self {
        self.air_accel = air_accel;
        self.air_decel = air_decel;
        self
    }

    /// Builder: set max speed.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Builder: set jump force.
    pub fn with_jump_force(mut self, force: f32) -> Self {
        self.jump_force = force;
        self
    }

    /// Builder: set the fall and low-jump gravity multipliers.
    pub fn with_gravity_multipliers(mut self, fall: f32, low_jump: f32) -> Self {
        self.fall_multiplier = fall;
        self.low_jump_multiplier = low_jump;
        self
    }

    /// Builder: disable all extra gravity shaping, leaving only baseline gravity.
    pub fn with_neutral_gravity(self) -> Self {
        self.with_gravity_multipliers(1.0, 1.0)
    }

    /// Builder: set high jump multiplier.
    pub fn with_high_jump_multiplier(mut self, multiplier: f32) -> Self {
        self.high_jump_multiplier = multiplier;
        self
    }

    /// Builder: set coyote time.
    pub fn with_coyote_time(mut self, time: f32) -> Self {
        self.coyote_time = time;
        self
    }

    /// Builder: set jump buffer time.
    pub fn with_jump_buffer_time(mut self, time: f32) -> Self {
        self.jump_buffer_time = time;
        self
    }

    /// Builder: set terminal velocity (positive magnitude).
    pub fn with_terminal_velocity(mut self, speed: f32) -> Self {
        self.terminal_velocity = speed;
        self
    }

    /// Builder: set ground probe thickness.
    pub fn with_ground_check_distance(mut self, distance: f32) -> Self {
        self.ground_check_distance = distance;
        self
    }

    /// Builder: set the collision filter bits that count as ground.
    pub fn with_ground_mask(mut self, mask: u32) -> Self {
        self.ground_mask = mask;
        self
    }
}

/// Bounds and rates of the grow/shrink scale machine.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct ScaleConfig {
    /// Smallest uniform scale the character can shrink to.
    pub min_scale: f32,
    /// Largest uniform scale the character can grow to.
    pub max_scale: f32,
    /// Fraction of the current scale lost per second inside a shrinker.
    pub shrink_speed: f32,
    /// Fraction of the current scale gained per second inside a grower.
    pub grow_speed: f32,
    /// Thickness of the side boxes used to check for room to grow.
    pub clearance_distance: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 10.0,
            shrink_speed: 0.8,
            grow_speed: 0.8,
            clearance_distance: 0.1,
        }
    }
}

impl ScaleConfig {
    /// Check the scale bounds and rates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("min_scale", self.min_scale)?;
        positive("max_scale", self.max_scale)?;
        if self.min_scale >= self.max_scale {
            return Err(ConfigError::InvertedScaleBounds {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        positive("shrink_speed", self.shrink_speed)?;
        positive("grow_speed", self.grow_speed)?;
        positive("clearance_distance", self.clearance_distance)?;
        Ok(())
    }

    /// Builder: set the scale bounds.
    pub fn with_bounds(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    /// Builder: set shrink and grow rates.
    pub fn with_speeds(mut self, shrink_speed: f32, grow_speed: f32) -> Self {
        self.shrink_speed = shrink_speed;
        self.grow_speed = grow_speed;
        self
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn at_least(field: &'static str, min: f32, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(ConfigError::BelowMinimum { field, min, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
        assert_eq!(ScaleConfig::default().validate(), Ok(()));
    }

    #[test]
    fn probe_distance_is_derived_from_thickness() {
        let config = ControllerConfig::default().with_ground_check_distance(0.5);
        assert!((config.ground_probe_distance() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_positive_speed() {
        let config = ControllerConfig::default().with_max_speed(0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "max_speed",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_multiplier_weaker_than_gravity() {
        let config = ControllerConfig::default().with_gravity_multipliers(0.5, 2.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BelowMinimum {
                field: "fall_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn rejects_nan() {
        let config = ControllerConfig::default().with_coyote_time(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn neutral_gravity_is_valid() {
        let config = ControllerConfig::default().with_neutral_gravity();
        assert_eq!(config.fall_multiplier, 1.0);
        assert_eq!(config.low_jump_multiplier, 1.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_windows_are_allowed() {
        let config = ControllerConfig::default()
            .with_coyote_time(0.0)
            .with_jump_buffer_time(0.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_scale_bounds() {
        let config = ScaleConfig::default().with_bounds(2.0, 1.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedScaleBounds { min: 2.0, max: 1.0 })
        );
    }

    #[test]
    fn default_gravity_points_down() {
        assert!(PlatformerGravity::default().0.y < 0.0);
    }
}
