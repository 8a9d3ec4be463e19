//! Platformer input intent.
//!
//! The intent is the only thing the controller knows about input. You feed it
//! a horizontal axis and the current held state of the jump button; the
//! intent derives press and release edges itself and latches them until a
//! fixed step has seen them, so an edge that happens between two fixed steps
//! is never dropped.

use bevy::prelude::*;

/// Raw platformer input for one character.
///
/// # Example
///
/// ```rust
/// use msg_platformer_controller::prelude::*;
///
/// let mut intent = PlatformerIntent::new();
/// intent.set_horizontal(0.7);
/// assert_eq!(intent.horizontal(), 1.0);
///
/// intent.set_jump_held(true);
/// assert!(intent.jump_pressed());
/// assert!(intent.jump_held());
///
/// intent.set_jump_held(false);
/// assert!(intent.jump_released());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct PlatformerIntent {
    /// Horizontal axis, discretized to -1, 0 or 1.
    horizontal: f32,
    /// Whether jump is held right now.
    jump_held: bool,
    /// Latched rising edge of the jump button.
    jump_pressed: bool,
    /// Latched falling edge of the jump button.
    jump_released: bool,
}

impl PlatformerIntent {
    /// Create a new empty intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the horizontal axis.
    ///
    /// Any analog value is reduced to its direction, mirroring a raw digital
    /// axis read. Values inside `[-0.5, 0.5]` count as no input.
    pub fn set_horizontal(&mut self, axis: f32) {
        self.horizontal = if axis > 0.5 {
            1.0
        } else if axis < -0.5 {
            -1.0
        } else {
            0.0
        };
    }

    /// Horizontal axis in {-1, 0, 1}.
    pub fn horizontal(&self) -> f32 {
        self.horizontal
    }

    /// Set the held state of the jump button.
    ///
    /// Call this every frame with the current button state. A false→true
    /// transition latches a press, true→false latches a release.
    pub fn set_jump_held(&mut self, held: bool) {
        if held && !self.jump_held {
            self.jump_pressed = true;
        } else if !held && self.jump_held {
            self.jump_released = true;
        }
        self.jump_held = held;
    }

    /// Register a jump press without holding the button.
    ///
    /// Useful for AI or scripted input: the jump buffers and fires with its
    /// base force, and the missing hold cuts it short like a quick tap.
    pub fn tap_jump(&mut self) {
        self.jump_pressed = true;
    }

    /// Whether the jump button is held.
    pub fn jump_held(&self) -> bool {
        self.jump_held
    }

    /// Whether a jump press was latched since the last fixed step.
    pub fn jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    /// Whether a jump release was latched since the last fixed step.
    pub fn jump_released(&self) -> bool {
        self.jump_released
    }

    /// Whether this sample asks for a jump (new press or still held).
    pub fn wants_jump(&self) -> bool {
        self.jump_pressed || self.jump_held
    }

    /// Clear latched edges after a fixed step has consumed them.
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
    }

    /// Reset all input, including the held state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_intent_is_idle() {
        let intent = PlatformerIntent::new();
        assert_eq!(intent.horizontal(), 0.0);
        assert!(!intent.jump_held());
        assert!(!intent.jump_pressed());
        assert!(!intent.jump_released());
        assert!(!intent.wants_jump());
    }

    #[test]
    fn horizontal_is_discretized() {
        let mut intent = PlatformerIntent::new();
        intent.set_horizontal(0.9);
        assert_eq!(intent.horizontal(), 1.0);
        intent.set_horizontal(-0.6);
        assert_eq!(intent.horizontal(), -1.0);
        intent.set_horizontal(0.3);
        assert_eq!(intent.horizontal(), 0.0);
        intent.set_horizontal(-7.0);
        assert_eq!(intent.horizontal(), -1.0);
    }

    #[test]
    fn press_edge_is_latched_until_cleared() {
        let mut intent = PlatformerIntent::new();
        intent.set_jump_held(true);
        // Holding on the next frame doesn't re-trigger, but the first edge survives
        intent.set_jump_held(true);
        assert!(intent.jump_pressed());

        intent.clear_edges();
        assert!(!intent.jump_pressed());
        assert!(intent.jump_held());
    }

    #[test]
    fn press_and_release_between_steps_are_both_kept() {
        let mut intent = PlatformerIntent::new();
        intent.set_jump_held(true);
        intent.set_jump_held(false);

        assert!(intent.jump_pressed());
        assert!(intent.jump_released());
        assert!(!intent.jump_held());
        assert!(intent.wants_jump());
    }

    #[test]
    fn release_without_press_is_not_an_edge() {
        let mut intent = PlatformerIntent::new();
        intent.set_jump_held(false);
        assert!(!intent.jump_released());
    }

    #[test]
    fn tap_jump_does_not_hold() {
        let mut intent = PlatformerIntent::new();
        intent.tap_jump();
        assert!(intent.jump_pressed());
        assert!(!intent.jump_held());
    }

    #[test]
    fn clear_resets_everything() {
        let mut intent = PlatformerIntent::new();
        intent.set_horizontal(1.0);
        intent.set_jump_held(true);
        intent.clear();
        assert_eq!(intent, PlatformerIntent::default());
    }
}
