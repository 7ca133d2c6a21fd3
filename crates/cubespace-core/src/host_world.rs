//! hecs world acting as the room host.
//!
//! Occupant ids are entity bits, so any id handed to the registry maps back
//! to the entity it came from. Room shells are not built block by block;
//! the host records what it was asked to generate and which regions it
//! keeps loaded.

use std::collections::BTreeSet;

use cubespace_logic::effects::{merge_effect, StatusEffect};
use cubespace_logic::geometry::{Aabb, Coordinate, SpawnLocation};
use hecs::{Entity, World};

use crate::components::{ActiveEffects, InMachine, Pose};
use crate::host::{OccupantId, OccupantTracker, RoomHost};

/// A room shell the host was asked to build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratedCube {
    pub coordinate: Coordinate,
    pub size: u32,
    pub bounds: Aabb,
}

pub fn occupant_id(entity: Entity) -> OccupantId {
    entity.to_bits().get()
}

pub fn occupant_entity(id: OccupantId) -> Option<Entity> {
    Entity::from_bits(id)
}

#[derive(Default)]
pub struct HostWorld {
    pub world: World,
    pub generated: Vec<GeneratedCube>,
    pub forced_regions: BTreeSet<Coordinate>,
}

impl HostWorld {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OccupantTracker for HostWorld {
    fn last_coordinate(&self, occupant: OccupantId) -> Option<Coordinate> {
        let entity = occupant_entity(occupant)?;
        self.world
            .get::<&InMachine>(entity)
            .ok()
            .map(|m| m.coordinate)
    }
}

impl RoomHost for HostWorld {
    fn generate_cube(&mut self, coordinate: Coordinate, size: u32, bounds: &Aabb) {
        log::debug!("Generating room shell {} ({}x{}x{})", coordinate, size, size, size);
        self.generated.push(GeneratedCube {
            coordinate,
            size,
            bounds: *bounds,
        });
    }

    fn force_load_region(&mut self, coordinate: Coordinate) {
        self.forced_regions.insert(coordinate);
    }

    fn teleport(
        &mut self,
        occupant: OccupantId,
        coordinate: Coordinate,
        destination: &SpawnLocation,
        recovery: bool,
    ) {
        let Some(entity) = occupant_entity(occupant) else {
            return;
        };
        let previous = match self.world.get::<&mut Pose>(entity) {
            Ok(mut pose) => {
                let previous = *pose;
                pose.position = destination.position;
                if let Some(facing) = destination.facing {
                    pose.facing = facing;
                }
                previous
            }
            Err(_) => return,
        };

        // Keep the first return point when hopping between rooms.
        let tracked = match self.world.get::<&mut InMachine>(entity) {
            Ok(mut m) => {
                m.coordinate = coordinate;
                true
            }
            Err(_) => false,
        };
        if !tracked {
            let _ = self.world.insert_one(
                entity,
                InMachine {
                    coordinate,
                    return_pose: previous,
                },
            );
        }

        if !recovery {
            log::info!("Occupant {} entered room {}", occupant, coordinate);
        }
    }

    fn apply_effect(&mut self, occupant: OccupantId, effect: StatusEffect) {
        let Some(entity) = occupant_entity(occupant) else {
            return;
        };
        if let Ok(mut active) = self.world.get::<&mut ActiveEffects>(entity) {
            merge_effect(&mut active.0, effect);
            return;
        }
        let _ = self.world.insert_one(entity, ActiveEffects(vec![effect]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubespace_logic::effects::EffectKind;
    use cubespace_logic::geometry::{Facing, Vec3};

    #[test]
    fn teleport_tracks_coordinate_and_return_point() {
        let mut host = HostWorld::new();
        let entity = host.world.spawn((Pose::new(10.0, 64.0, 10.0),));
        let id = occupant_id(entity);
        assert_eq!(host.last_coordinate(id), None);

        host.teleport(id, 2, &SpawnLocation::at(Vec3::new(67.0, 42.0, 3.0)), false);
        host.teleport(id, 4, &SpawnLocation::at(Vec3::new(131.0, 42.0, 3.0)), false);

        assert_eq!(host.last_coordinate(id), Some(4));
        let tracked = *host.world.get::<&InMachine>(entity).expect("tracked");
        assert_eq!(tracked.return_pose.position, Vec3::new(10.0, 64.0, 10.0));
    }

    #[test]
    fn teleport_applies_saved_facing() {
        let mut host = HostWorld::new();
        let entity = host.world.spawn((Pose::new(0.0, 0.0, 0.0).with_facing(5.0, 5.0),));
        let destination = SpawnLocation {
            position: Vec3::new(2.0, 42.0, 2.0),
            facing: Some(Facing {
                yaw: 90.0,
                pitch: 0.0,
            }),
        };

        host.teleport(occupant_id(entity), 0, &destination, true);

        let pose = *host.world.get::<&Pose>(entity).expect("pose");
        assert_eq!(pose.facing.yaw, 90.0);
    }

    #[test]
    fn effects_merge_on_the_entity() {
        let mut host = HostWorld::new();
        let entity = host.world.spawn((Pose::default(),));
        let id = occupant_id(entity);

        host.apply_effect(id, StatusEffect::new(EffectKind::Slowness, 200, 5));
        host.apply_effect(id, StatusEffect::new(EffectKind::Slowness, 200, 5));
        host.apply_effect(id, StatusEffect::new(EffectKind::Nausea, 200, 5));

        let active = host.world.get::<&ActiveEffects>(entity).expect("effects");
        assert_eq!(active.0.len(), 2);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut host = HostWorld::new();
        host.teleport(0, 1, &SpawnLocation::at(Vec3::ZERO), true);
        host.apply_effect(0, StatusEffect::new(EffectKind::Nausea, 1, 1));
        assert_eq!(host.last_coordinate(0), None);
    }
}
