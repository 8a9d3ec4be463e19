//! Collider geometry and probe shapes.
//!
//! The controller never talks to a physics engine directly. It describes the
//! boxes it wants tested (the downward ground sweep and the growth
//! clearance boxes) and a [`GroundSensor`] answers whether they hit anything.

use bevy::prelude::*;

use crate::config::ControllerConfig;

/// Axis-aligned box in world space.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ProbeBox {
    /// Box center.
    pub center: Vec2,
    /// Half of the box size on each axis.
    pub half_extents: Vec2,
}

impl ProbeBox {
    /// Create a box from its center and full size.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Full size of the box.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// Lowest corner.
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Highest corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Strict overlap test. Boxes that only touch do not overlap.
    pub fn overlaps(&self, other: &ProbeBox) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// Current collider size of the character, base size times uniform scale.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ColliderExtents {
    base: Vec2,
    scale: f32,
}

impl Default for ColliderExtents {
    fn default() -> Self {
        Self {
            base: Vec2::ONE,
            scale: 1.0,
        }
    }
}

impl ColliderExtents {
    /// Create extents from the unscaled collider size.
    pub fn new(base: Vec2) -> Self {
        Self { base, scale: 1.0 }
    }

    /// Unscaled collider size.
    #[inline]
    pub fn base(&self) -> Vec2 {
        self.base
    }

    /// Current uniform scale.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current collider size.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.base * self.scale
    }

    /// Distance from the collider center to its bottom edge.
    #[inline]
    pub fn bottom_offset(&self) -> f32 {
        self.size().y * 0.5
    }

    /// Update the scale. Returns `true` if it changed.
    pub fn set_scale(&mut self, scale: f32) -> bool {
        if scale == self.scale {
            return false;
        }
        self.scale = scale;
        true
    }

    /// The collider as a box around `center`.
    pub fn bounds(&self, center: Vec2) -> ProbeBox {
        ProbeBox::from_center_size(center, self.size())
    }
}

/// Downward box sweep used to decide whether the character stands on ground.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct GroundCast {
    /// The box at the start of the sweep.
    pub shape: ProbeBox,
    /// Sweep distance, straight down.
    pub distance: f32,
    /// Collision filter bits of valid ground.
    pub mask: u32,
}

impl GroundCast {
    /// Build the probe for a collider centered at `center`.
    ///
    /// The box is as wide as the collider and `ground_check_distance` thick,
    /// resting just above the collider's bottom edge.
    pub fn below(center: Vec2, extents: &ColliderExtents, config: &ControllerConfig) -> Self {
        let thickness = config.ground_check_distance;
        let bottom = center.y - extents.bottom_offset();
        Self {
            shape: ProbeBox::from_center_size(
                Vec2::new(center.x, bottom + thickness * 0.5),
                Vec2::new(extents.size().x, thickness),
            ),
            distance: config.ground_probe_distance(),
            mask: config.ground_mask,
        }
    }

    /// The whole region covered by the sweep.
    pub fn swept_region(&self) -> ProbeBox {
        let top = self.shape.max().y;
        let bottom = self.shape.min().y - self.distance;
        ProbeBox::from_center_size(
            Vec2::new(self.shape.center.x, (top + bottom) * 0.5),
            Vec2::new(self.shape.size().x, top - bottom),
        )
    }
}

/// Answers the ground probe.
pub trait GroundSensor {
    /// Returns true if the sweep hits any ground collider.
    fn is_grounded(&self, cast: &GroundCast) -> bool;
}

/// Static solids are a sensor on their own, handy without a physics engine.
impl GroundSensor for [ProbeBox] {
    fn is_grounded(&self, cast: &GroundCast) -> bool {
        let region = cast.swept_region();
        self.iter().any(|solid| solid.overlaps(&region))
    }
}

impl<const N: usize> GroundSensor for [ProbeBox; N] {
    fn is_grounded(&self, cast: &GroundCast) -> bool {
        self.as_slice().is_grounded(cast)
    }
}

/// Result of a ground probe already performed by a physics backend.
///
/// Backend sensor systems write this component each fixed step; the tick
/// driver then uses it as its sensor.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct GroundContact {
    /// Whether the last probe hit ground.
    pub grounded: bool,
    /// The ground entity that was hit, if any.
    pub entity: Option<Entity>,
}

impl GroundContact {
    /// Contact with the given ground entity.
    pub fn hit(entity: Option<Entity>) -> Self {
        Self {
            grounded: true,
            entity,
        }
    }

    /// No ground below.
    pub fn miss() -> Self {
        Self::default()
    }
}

impl GroundSensor for GroundContact {
    fn is_grounded(&self, _cast: &GroundCast) -> bool {
        self.grounded
    }
}

/// The boxes that must be free before the character may grow.
///
/// One box sits just outside each side of the collider, `clearance` thick
/// and 81% as long as that side. Each starts `skin` away from the collider,
/// which absorbs contact slop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthClearance {
    /// Right, left, up, down.
    sides: [ProbeBox; 4],
    grounded: bool,
}

impl GrowthClearance {
    /// Clearance boxes around a collider centered at `center`.
    pub fn around(center: Vec2, extents: &ColliderExtents, clearance: f32, skin: f32) -> Self {
        let body = extents.bounds(center);
        let side_length = body.size() * 0.9 * 0.9;
        let horizontal = Vec2::new(clearance, side_length.y);
        let vertical = Vec2::new(side_length.x, clearance);
        let offset = body.half_extents + Vec2::splat(skin + clearance * 0.5);

        Self {
            sides: [
                ProbeBox::from_center_size(center + Vec2::new(offset.x, 0.0), horizontal),
                ProbeBox::from_center_size(center - Vec2::new(offset.x, 0.0), horizontal),
                ProbeBox::from_center_size(center + Vec2::new(0.0, offset.y), vertical),
                ProbeBox::from_center_size(center - Vec2::new(0.0, offset.y), vertical),
            ],
            grounded: false,
        }
    }

    /// A grounded character grows up off the floor it stands on, so the
    /// floor side is not checked.
    pub fn with_grounded(mut self, grounded: bool) -> Self {
        self.grounded = grounded;
        self
    }

    /// The boxes to test.
    pub fn boxes(&self) -> &[ProbeBox] {
        if self.grounded {
            &self.sides[..3]
        } else {
            &self.sides
        }
    }

    /// Whether none of the boxes overlap a solid.
    pub fn is_clear_of(&self, solids: &[ProbeBox]) -> bool {
        self.boxes()
            .iter()
            .all(|probe| solids.iter().all(|solid| !probe.overlaps(solid)))
    }
}
