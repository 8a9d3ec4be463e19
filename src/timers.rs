//! Jump timing windows.
//!
//! Coyote time lets a jump fire shortly after walking off a ledge; the jump
//! buffer remembers a press made shortly before landing. Both are plain
//! countdowns in seconds where only positivity matters.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::state::MovementState;

/// Coyote and jump-buffer countdowns.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpWindows {
    /// Remaining coyote time. May go negative.
    pub coyote: f32,
    /// Remaining jump buffer time.
    pub jump_buffer: f32,
}

impl JumpWindows {
    /// Refill coyote time while grounded, otherwise let it run down.
    pub fn update_coyote(&mut self, state: MovementState, config: &ControllerConfig, dt: f32) {
        if state.is_grounded() {
            self.coyote = config.coyote_time;
        } else {
            self.coyote -= dt;
        }
    }

    /// Fixed-step buffer update: refill on a jump sample, otherwise run down.
    pub fn update_jump_buffer(&mut self, wants_jump: bool, config: &ControllerConfig, dt: f32) {
        if wants_jump {
            self.jump_buffer = config.jump_buffer_time;
        } else if self.jump_buffer > 0.0 {
            self.jump_buffer -= dt;
        }
    }

    /// Frame-tick buffer sample. Only refills; time is accounted in fixed steps.
    pub fn sample_jump_buffer(&mut self, wants_jump: bool, config: &ControllerConfig) {
        if wants_jump {
            self.jump_buffer = config.jump_buffer_time;
        }
    }

    /// Whether a coyote jump is still possible.
    #[inline]
    pub fn coyote_active(&self) -> bool {
        self.coyote > 0.0
    }

    /// Whether a jump request is buffered.
    #[inline]
    pub fn jump_buffered(&self) -> bool {
        self.jump_buffer > 0.0
    }

    /// Consume the buffered jump.
    pub fn consume_jump_buffer(&mut self) {
        self.jump_buffer = 0.0;
    }

    /// Close the coyote window.
    pub fn expire_coyote(&mut self) {
        self.coyote = 0.0;
    }

    /// Reopen the coyote window to its full length.
    pub fn refill_coyote(&mut self, config: &ControllerConfig) {
        self.coyote = config.coyote_time;
    }
}
