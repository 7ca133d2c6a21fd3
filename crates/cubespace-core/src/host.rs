//! Seams between the registry and the game host.
//!
//! The registry never touches the world directly. Whatever runs the world
//! implements these traits; [`crate::engine::MachineEngine`] is the in-crate
//! reference implementation.

use cubespace_logic::effects::StatusEffect;
use cubespace_logic::geometry::{Aabb, Coordinate, Pose, SpawnLocation};

/// Host-side occupant handle.
pub type OccupantId = u64;

/// Read access to where occupants were last seen.
pub trait OccupantTracker {
    /// The room the occupant last entered, if any.
    fn last_coordinate(&self, occupant: OccupantId) -> Option<Coordinate>;
}

/// Everything the registry asks of the host world.
///
/// Calls are synchronous and assumed to succeed; a host whose teleport or
/// chunk loading can fail is expected to handle that on its own side.
pub trait RoomHost: OccupantTracker {
    /// Build the shell of a freshly allocated room.
    fn generate_cube(&mut self, coordinate: Coordinate, size: u32, bounds: &Aabb);

    /// Keep the region backing `coordinate` loaded.
    fn force_load_region(&mut self, coordinate: Coordinate);

    /// Move an occupant into the room at `coordinate`. `recovery` marks a
    /// corrective move rather than a deliberate entry.
    fn teleport(
        &mut self,
        occupant: OccupantId,
        coordinate: Coordinate,
        destination: &SpawnLocation,
        recovery: bool,
    );

    fn apply_effect(&mut self, occupant: OccupantId, effect: StatusEffect);
}

/// Per-tick snapshot of one live occupant.
#[derive(Debug, Clone, Copy)]
pub struct OccupantView {
    pub id: OccupantId,
    pub pose: Pose,
    /// Holds operator privileges.
    pub operator: bool,
    /// Is in an unrestricted observation mode (creative, spectator, ...).
    pub unrestricted: bool,
}

/// Decides which occupants confinement leaves alone.
pub trait ExemptionPolicy {
    fn is_exempt(&self, occupant: &OccupantView) -> bool;
}

/// Operators in an unrestricted mode may leave their rooms.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivilegedUnrestricted;

impl ExemptionPolicy for PrivilegedUnrestricted {
    fn is_exempt(&self, occupant: &OccupantView) -> bool {
        occupant.operator && occupant.unrestricted
    }
}

/// Nobody is exempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExemptions;

impl ExemptionPolicy for NoExemptions {
    fn is_exempt(&self, _occupant: &OccupantView) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(operator: bool, unrestricted: bool) -> OccupantView {
        OccupantView {
            id: 1,
            pose: Pose::default(),
            operator,
            unrestricted,
        }
    }

    #[test]
    fn only_unrestricted_operators_are_exempt() {
        let policy = PrivilegedUnrestricted;
        assert!(policy.is_exempt(&view(true, true)));
        assert!(!policy.is_exempt(&view(true, false)));
        assert!(!policy.is_exempt(&view(false, true)));
    }

    #[test]
    fn strict_policy_exempts_nobody() {
        assert!(!NoExemptions.is_exempt(&view(true, true)));
    }
}
