//! Movement state.
//!
//! The state is recomputed once per fixed step from the ground probe and the
//! sign of the vertical velocity. It is mirrored onto the entity as a
//! [`MovementState`] component so animation and audio can read it.

use bevy::prelude::*;

/// Coarse movement state of a platformer character.
///
/// # Example
///
/// ```rust
/// use msg_platformer_controller::prelude::*;
///
/// assert_eq!(MovementState::resolve(true, 5.0, 0.1), MovementState::Grounded);
/// assert_eq!(MovementState::resolve(false, 5.0, 0.1), MovementState::Jumping);
/// assert_eq!(MovementState::resolve(false, 0.05, 0.1), MovementState::Falling);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[reflect(Component)]
pub enum MovementState {
    /// Standing on ground. Can jump.
    #[default]
    Grounded,
    /// Moving upward through the air.
    Jumping,
    /// Moving downward through the air, after a jump or off a ledge.
    Falling,
}

impl MovementState {
    /// Resolve the state for this step.
    ///
    /// Ground contact wins over velocity; an airborne body only counts as
    /// jumping while it rises faster than `rising_threshold`.
    pub fn resolve(grounded: bool, vertical_velocity: f32, rising_threshold: f32) -> Self {
        if grounded {
            Self::Grounded
        } else if vertical_velocity > rising_threshold {
            Self::Jumping
        } else {
            Self::Falling
        }
    }

    /// Check if the character is on the ground.
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded)
    }

    /// Check if the character is in the air.
    pub fn is_airborne(&self) -> bool {
        !self.is_grounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounded_is_default() {
        assert_eq!(MovementState::default(), MovementState::Grounded);
    }

    #[test]
    fn ground_contact_takes_precedence() {
        assert_eq!(MovementState::resolve(true, 20.0, 0.1), MovementState::Grounded);
        assert_eq!(MovementState::resolve(true, -20.0, 0.1), MovementState::Grounded);
    }

    #[test]
    fn rising_faster_than_threshold_is_jumping() {
        assert_eq!(MovementState::resolve(false, 0.11, 0.1), MovementState::Jumping);
    }

    #[test]
    fn slow_rise_counts_as_falling() {
        // At the apex the body is still barely rising
        assert_eq!(MovementState::resolve(false, 0.1, 0.1), MovementState::Falling);
        assert_eq!(MovementState::resolve(false, 0.0, 0.1), MovementState::Falling);
        assert_eq!(MovementState::resolve(false, -3.0, 0.1), MovementState::Falling);
    }

    #[test]
    fn airborne_helpers() {
        assert!(MovementState::Grounded.is_grounded());
        assert!(MovementState::Jumping.is_airborne());
        assert!(MovementState::Falling.is_airborne());
    }
}
