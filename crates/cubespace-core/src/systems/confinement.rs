//! Confinement system - snapshots occupants and runs the registry check

use hecs::World;

use crate::components::{Occupant, Pose, Privileges};
use crate::host::{ExemptionPolicy, OccupantView};
use crate::host_world::{occupant_id, HostWorld};
use crate::registry::{EnforcementReport, RoomRegistry};

/// Snapshot of every live occupant, in entity order.
pub fn occupant_views(world: &World) -> Vec<OccupantView> {
    let mut views: Vec<OccupantView> = world
        .query::<(&Occupant, &Pose, Option<&Privileges>)>()
        .iter()
        .map(|(entity, (_, pose, privileges))| {
            let privileges = privileges.copied().unwrap_or_default();
            OccupantView {
                id: occupant_id(entity),
                pose: *pose,
                operator: privileges.operator,
                unrestricted: privileges.mode.is_unrestricted(),
            }
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

/// Run one confinement pass against the host world.
///
/// The snapshot is taken before any teleport, so an occupant moved back
/// this tick is not checked again until the next interval.
pub fn confinement_system<P: ExemptionPolicy + ?Sized>(
    host: &mut HostWorld,
    registry: &RoomRegistry,
    tick: u64,
    policy: &P,
) -> EnforcementReport {
    let occupants = occupant_views(&host.world);
    registry.enforce(tick, &occupants, host, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GameMode;

    #[test]
    fn views_carry_privileges() {
        let mut world = World::new();
        world.spawn((Occupant::new("guest"), Pose::new(1.0, 2.0, 3.0)));
        world.spawn((
            Occupant::new("admin"),
            Pose::default(),
            Privileges {
                operator: true,
                mode: GameMode::Creative,
            },
        ));
        world.spawn((Pose::default(),)); // not an occupant

        let views = occupant_views(&world);

        assert_eq!(views.len(), 2);
        assert_eq!(views.iter().filter(|v| v.operator && v.unrestricted).count(), 1);
        assert!(views.iter().any(|v| v.pose.position.x == 1.0 && !v.operator));
    }
}
