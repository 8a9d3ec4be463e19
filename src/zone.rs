//! Zone volumes.
//!
//! Level geometry marks special volumes with a [`Zone`] component. The kind
//! decides what touching it does to a character.

use bevy::prelude::*;

/// What a zone does to a character touching it.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    /// Shrinks the character while inside.
    Shrinker,
    /// Grows the character while inside, if there is room.
    Grower,
    /// Kills the character on contact.
    Hazard,
}

impl ZoneKind {
    /// Whether this zone drives the scale machine.
    pub fn affects_scale(&self) -> bool {
        matches!(self, Self::Shrinker | Self::Grower)
    }
}

/// Marks an entity as a zone volume.
///
/// # Example
///
/// ```rust
/// use msg_platformer_controller::prelude::*;
///
/// let spikes = Zone::hazard();
/// assert_eq!(spikes.kind(), ZoneKind::Hazard);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct Zone(pub ZoneKind);

impl Zone {
    /// A shrinker zone.
    pub fn shrinker() -> Self {
        Self(ZoneKind::Shrinker)
    }

    /// A grower zone.
    pub fn grower() -> Self {
        Self(ZoneKind::Grower)
    }

    /// A hazard.
    pub fn hazard() -> Self {
        Self(ZoneKind::Hazard)
    }

    /// The zone kind.
    pub fn kind(&self) -> ZoneKind {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_machines_affect_scale() {
        assert!(ZoneKind::Shrinker.affects_scale());
        assert!(ZoneKind::Grower.affects_scale());
        assert!(!ZoneKind::Hazard.affects_scale());
    }

    #[test]
    fn constructors_set_kind() {
        assert_eq!(Zone::shrinker().kind(), ZoneKind::Shrinker);
        assert_eq!(Zone::grower().kind(), ZoneKind::Grower);
        assert_eq!(Zone::hazard().kind(), ZoneKind::Hazard);
    }
}
