//! Grow/shrink scale machine.
//!
//! Shrinker and grower zones set flags on the [`ScaleMachine`]; each frame the
//! machine eases the character's uniform scale toward the configured bounds.
//! Growth additionally needs room around the character, which the physics
//! backend reports through [`ScaleMachine::set_growth_clearance`].

use bevy::prelude::*;

use crate::config::ScaleConfig;
use crate::zone::ZoneKind;

/// Which way the scale moved during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleChange {
    /// Scale did not change.
    Unchanged,
    /// The character shrank.
    Shrunk,
    /// The character grew.
    Grew,
    /// Growing was requested but there was no room.
    Blocked,
}

/// Current scale and zone flags of a growable character.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
#[require(ScaleConfig)]
pub struct ScaleMachine {
    scale: f32,
    in_shrinker: bool,
    in_grower: bool,
    growth_clearance: bool,
}

impl Default for ScaleMachine {
    fn default() -> Self {
        Self {
            scale: 1.0,
            in_shrinker: false,
            in_grower: false,
            growth_clearance: true,
        }
    }
}

impl ScaleMachine {
    /// Create a machine at the given uniform scale.
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            ..default()
        }
    }

    /// Current uniform scale.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether the character is inside a shrinker zone.
    pub fn in_shrinker(&self) -> bool {
        self.in_shrinker
    }

    /// Whether the character is inside a grower zone.
    pub fn in_grower(&self) -> bool {
        self.in_grower
    }

    /// Track zone enter/exit. Hazards are not the machine's concern.
    pub fn set_zone(&mut self, kind: ZoneKind, inside: bool) {
        match kind {
            ZoneKind::Shrinker => self.in_shrinker = inside,
            ZoneKind::Grower => self.in_grower = inside,
            ZoneKind::Hazard => {}
        }
    }

    /// Record whether the clearance overlap check found room to grow.
    pub fn set_growth_clearance(&mut self, clear: bool) {
        self.growth_clearance = clear;
    }

    /// Whether the last clearance check found room to grow.
    pub fn growth_clearance(&self) -> bool {
        self.growth_clearance
    }

    /// Advance the machine by one frame.
    ///
    /// Overlapping shrinker and grower zones freeze the scale. Scale is
    /// compared on the 2D scale vector, so shrinking stops slightly above the
    /// minimum and growing slightly below the maximum before the clamp.
    pub fn tick(&mut self, config: &ScaleConfig, dt: f32) -> ScaleChange {
        if self.in_shrinker && self.in_grower {
            return ScaleChange::Unchanged;
        }

        let current = Vec2::splat(self.scale).length_squared();
        if self.in_shrinker {
            let floor = Vec2::splat(config.min_scale).length_squared();
            if current > floor * 1.1 {
                self.scale = (self.scale * (1.0 - config.shrink_speed * dt)).max(config.min_scale);
                return ScaleChange::Shrunk;
            }
        } else if self.in_grower {
            let ceiling = Vec2::splat(config.max_scale).length_squared();
            if current < ceiling * 0.9 {
                if !self.growth_clearance {
                    return ScaleChange::Blocked;
                }
                self.scale = (self.scale * (1.0 + config.grow_speed * dt)).min(config.max_scale);
                return ScaleChange::Grew;
            }
        }
        ScaleChange::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn idle_machine_keeps_scale() {
        let mut machine = ScaleMachine::default();
        assert_eq!(machine.tick(&ScaleConfig::default(), DT), ScaleChange::Unchanged);
        assert_eq!(machine.scale(), 1.0);
    }

    #[test]
    fn shrinker_shrinks() {
        let config = ScaleConfig::default();
        let mut machine = ScaleMachine::default();
        machine.set_zone(ZoneKind::Shrinker, true);

        assert_eq!(machine.tick(&config, DT), ScaleChange::Shrunk);
        assert!((machine.scale() - (1.0 - config.shrink_speed * DT)).abs() < 1e-6);
    }

    #[test]
    fn shrinking_never_goes_below_minimum() {
        let config = ScaleConfig::default().with_speeds(50.0, 0.8);
        let mut machine = ScaleMachine::default();
        machine.set_zone(ZoneKind::Shrinker, true);

        for _ in 0..600 {
            machine.tick(&config, DT);
            assert!(machine.scale() >= config.min_scale);
        }
        assert_eq!(machine.tick(&config, DT), ScaleChange::Unchanged);
    }

    #[test]
    fn grower_grows_when_clear() {
        let config = ScaleConfig::default();
        let mut machine = ScaleMachine::default();
        machine.set_zone(ZoneKind::Grower, true);

        assert_eq!(machine.tick(&config, DT), ScaleChange::Grew);
        assert!((machine.scale() - (1.0 + config.grow_speed * DT)).abs() < 1e-6);
    }

    #[test]
    fn growth_stops_below_maximum() {
        let config = ScaleConfig::default().with_bounds(0.1, 2.0);
        let mut machine = ScaleMachine::default();
        machine.set_zone(ZoneKind::Grower, true);

        for _ in 0..6000 {
            machine.tick(&config, DT);
            assert!(machine.scale() <= config.max_scale);
        }
        assert_eq!(machine.tick(&config, DT), ScaleChange::Unchanged);
    }

    #[test]
    fn blocked_growth_keeps_scale() {
        let mut machine = ScaleMachine::default();
        machine.set_zone(ZoneKind::Grower, true);
        machine.set_growth_clearance(false);

        assert_eq!(machine.tick(&ScaleConfig::default(), DT), ScaleChange::Blocked);
        assert_eq!(machine.scale(), 1.0);
    }

    #[test]
    fn both_zones_freeze_scale() {
        let mut machine = ScaleMachine::new(2.0);
        machine.set_zone(ZoneKind::Shrinker, true);
        machine.set_zone(ZoneKind::Grower, true);

        assert_eq!(machine.tick(&ScaleConfig::default(), DT), ScaleChange::Unchanged);
        assert_eq!(machine.scale(), 2.0);

        machine.set_zone(ZoneKind::Grower, false);
        assert_eq!(machine.tick(&ScaleConfig::default(), DT), ScaleChange::Shrunk);
    }

    #[test]
    fn hazards_do_not_touch_flags() {
        let mut machine = ScaleMachine::default();
        machine.set_zone(ZoneKind::Hazard, true);
        assert!(!machine.in_shrinker());
        assert!(!machine.in_grower());
    }
}
