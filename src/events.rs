//! Events emitted and consumed by the controller.

use bevy::prelude::*;

use crate::zone::ZoneKind;

/// A character touched a hazard.
///
/// Carries no payload; the level flow answers it by reloading the current
/// scene.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Died;

/// A character touched down this fixed step.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landed {
    pub entity: Entity,
}

/// A character jumped this fixed step.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jumped {
    pub entity: Entity,
}

/// A character started or stopped touching a zone.
///
/// Physics backends produce these from their own contact events.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneContact {
    /// The character entity.
    pub controller: Entity,
    /// Kind of the zone touched.
    pub kind: ZoneKind,
    /// `true` on enter, `false` on exit.
    pub entered: bool,
}

impl ZoneContact {
    /// Character entered a zone.
    pub fn enter(controller: Entity, kind: ZoneKind) -> Self {
        Self {
            controller,
            kind,
            entered: true,
        }
    }

    /// Character left a zone.
    pub fn exit(controller: Entity, kind: ZoneKind) -> Self {
        Self {
            controller,
            kind,
            entered: false,
        }
    }
}
