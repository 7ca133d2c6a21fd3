//! Room registry - coordinate allocation, spawnpoints and confinement.
//!
//! One registry exists per machine dimension. It owns the coordinate
//! counter, the size of every allocated room and the spawnpoints players
//! saved inside them. Missing entries are never an error: the world may lag
//! behind occupant state (right after a restart, for example), so lookups
//! fall back or skip instead.

use std::collections::BTreeMap;

use cubespace_logic::config::MachinesConfig;
use cubespace_logic::confinement::{check_confinement, is_check_tick, ConfinementCheck, Verdict};
use cubespace_logic::constants::machine_sizes;
use cubespace_logic::effects::confinement_debuffs;
use cubespace_logic::geometry::{
    bounding_box_for, default_spawn, room_center_spawn, Aabb, Coordinate, Pose, SpawnLocation,
};

use crate::host::{ExemptionPolicy, OccupantId, OccupantTracker, OccupantView, RoomHost};

/// What became of a spawnpoint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnpointOutcome {
    Recorded(Coordinate),
    /// The occupant is not in any known room.
    UnknownCoordinate,
    /// The occupant's room has no registered size yet.
    UnknownRoom(Coordinate),
    /// The occupant stood outside their room.
    OutOfBounds(Coordinate),
}

/// Summary of one confinement pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnforcementReport {
    /// False when the pass was skipped (disabled or off-interval tick).
    pub ran: bool,
    pub checked: usize,
    pub exempt: usize,
    pub unknown_coordinate: usize,
    pub unknown_room: usize,
    /// Occupants teleported back, with the room they were returned to.
    pub confined: Vec<(OccupantId, Coordinate)>,
}

/// Registry operations that cannot complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The coordinate counter is at its maximum, nothing is left to hand out.
    CoordinatesExhausted,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::CoordinatesExhausted => write!(f, "machine coordinates exhausted"),
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Clone)]
pub struct RoomRegistry {
    pub(crate) next_coordinate: Coordinate,
    pub(crate) room_sizes: BTreeMap<Coordinate, u32>,
    pub(crate) spawnpoints: BTreeMap<Coordinate, SpawnLocation>,
    config: MachinesConfig,
    dirty: bool,
}

impl RoomRegistry {
    pub fn new(config: MachinesConfig) -> Self {
        Self {
            next_coordinate: 0,
            room_sizes: BTreeMap::new(),
            spawnpoints: BTreeMap::new(),
            config,
            dirty: false,
        }
    }

    /// Return the coordinate a machine already holds, or allocate a new room.
    ///
    /// A new room gets the next coordinate, a size from `meta`, a generated
    /// shell and a force-loaded region. Coordinates are assigned exactly once;
    /// once the counter cannot advance, allocation fails and nothing is built.
    pub fn allocate_or_get<H: RoomHost>(
        &mut self,
        existing: Option<Coordinate>,
        meta: u8,
        host: &mut H,
    ) -> Result<Coordinate, RegistryError> {
        if let Some(coordinate) = existing {
            return Ok(coordinate);
        }

        let coordinate = self.next_coordinate;
        let Some(next) = coordinate.checked_add(1) else {
            log::error!("No machine coordinate left after {}, room not allocated", coordinate);
            return Err(RegistryError::CoordinatesExhausted);
        };
        self.next_coordinate = next;

        let size = machine_sizes::box_size(meta);
        let bounds = bounding_box_for(coordinate, size, self.config.cube_spacing);
        host.generate_cube(coordinate, size, &bounds);
        host.force_load_region(coordinate);

        self.room_sizes.insert(coordinate, size);
        self.dirty = true;

        log::info!(
            "Allocated {} machine room at coordinate {} (size {})",
            machine_sizes::name(meta),
            coordinate,
            size
        );
        Ok(coordinate)
    }

    /// Save the occupant's current pose as the spawnpoint of their room.
    ///
    /// Only recorded while the occupant stands inside the room, so nothing
    /// is saved mid-teleport. The registry is marked dirty either way.
    pub fn set_spawnpoint<T: OccupantTracker>(
        &mut self,
        occupant: OccupantId,
        pose: &Pose,
        tracker: &T,
    ) -> SpawnpointOutcome {
        let outcome = match tracker.last_coordinate(occupant) {
            None => SpawnpointOutcome::UnknownCoordinate,
            Some(coordinate) => match self.bounds_of(coordinate) {
                None => SpawnpointOutcome::UnknownRoom(coordinate),
                Some(bounds) if bounds.contains(&pose.position) => {
                    self.spawnpoints.insert(
                        coordinate,
                        SpawnLocation {
                            position: pose.position,
                            facing: Some(pose.facing),
                        },
                    );
                    SpawnpointOutcome::Recorded(coordinate)
                }
                Some(_) => SpawnpointOutcome::OutOfBounds(coordinate),
            },
        };

        if !matches!(outcome, SpawnpointOutcome::Recorded(_)) {
            log::debug!("Spawnpoint for occupant {} not recorded: {:?}", occupant, outcome);
        }
        self.dirty = true;
        outcome
    }

    /// Where to put someone entering `coordinate`: their saved spawnpoint,
    /// else the room center, else a default spot for an unknown room.
    pub fn spawn_location(&self, coordinate: Coordinate) -> SpawnLocation {
        let spacing = self.config.cube_spacing;
        if let Some(saved) = self.spawnpoints.get(&coordinate) {
            return *saved;
        }
        match self.room_sizes.get(&coordinate) {
            Some(&size) => SpawnLocation::at(room_center_spawn(coordinate, size, spacing)),
            None => SpawnLocation::at(default_spawn(coordinate, spacing)),
        }
    }

    /// Drag occupants found outside their room back in.
    ///
    /// Does nothing unless confinement is enabled and `tick` falls on the
    /// check interval. Escapees are teleported to their room's spawn location
    /// and get the confinement debuffs once per detection.
    pub fn enforce<H: RoomHost, P: ExemptionPolicy + ?Sized>(
        &self,
        tick: u64,
        occupants: &[OccupantView],
        host: &mut H,
        policy: &P,
    ) -> EnforcementReport {
        let mut report = EnforcementReport::default();
        if !self.config.keep_occupants_inside || !is_check_tick(tick, self.config.check_interval)
        {
            return report;
        }
        report.ran = true;

        for occupant in occupants {
            report.checked += 1;
            let coordinate = host.last_coordinate(occupant.id);
            let verdict = check_confinement(&ConfinementCheck {
                exempt: policy.is_exempt(occupant),
                coordinate,
                room_size: coordinate.and_then(|c| self.room_size(c)),
                position: occupant.pose.position,
                spacing: self.config.cube_spacing,
            });

            match verdict {
                Verdict::Exempt => report.exempt += 1,
                Verdict::UnknownCoordinate => report.unknown_coordinate += 1,
                Verdict::UnknownRoom(_) => report.unknown_room += 1,
                Verdict::Inside => {}
                Verdict::Escaped { coordinate, .. } => {
                    log::warn!(
                        "Occupant {} left room {} at ({:.1}, {:.1}, {:.1}), returning them",
                        occupant.id,
                        coordinate,
                        occupant.pose.position.x,
                        occupant.pose.position.y,
                        occupant.pose.position.z
                    );
                    let destination = self.spawn_location(coordinate);
                    host.teleport(occupant.id, coordinate, &destination, true);
                    for effect in confinement_debuffs(
                        self.config.effect_duration_ticks,
                        self.config.effect_amplifier,
                    ) {
                        host.apply_effect(occupant.id, effect);
                    }
                    report.confined.push((occupant.id, coordinate));
                }
            }
        }

        report
    }

    pub fn room_size(&self, coordinate: Coordinate) -> Option<u32> {
        self.room_sizes.get(&coordinate).copied()
    }

    /// Bounding box of a registered room.
    pub fn bounds_of(&self, coordinate: Coordinate) -> Option<Aabb> {
        self.room_size(coordinate)
            .map(|size| bounding_box_for(coordinate, size, self.config.cube_spacing))
    }

    pub fn spawnpoint(&self, coordinate: Coordinate) -> Option<&SpawnLocation> {
        self.spawnpoints.get(&coordinate)
    }

    /// Coordinate the next allocation will receive.
    pub fn next_coordinate(&self) -> Coordinate {
        self.next_coordinate
    }

    pub fn room_count(&self) -> usize {
        self.room_sizes.len()
    }

    /// Registered rooms in coordinate order.
    pub fn rooms(&self) -> impl Iterator<Item = (Coordinate, u32)> + '_ {
        self.room_sizes.iter().map(|(&c, &s)| (c, s))
    }

    pub fn spacing(&self) -> f64 {
        self.config.cube_spacing
    }

    pub fn config(&self) -> &MachinesConfig {
        &self.config
    }

    /// Whether there are changes not yet written out.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Replace all state with a loaded snapshot.
    ///
    /// Fails without touching the registry if the snapshot holds a room at
    /// the last representable coordinate.
    pub(crate) fn replace_state(
        &mut self,
        next_coordinate: Coordinate,
        room_sizes: BTreeMap<Coordinate, u32>,
        spawnpoints: BTreeMap<Coordinate, SpawnLocation>,
    ) -> Result<(), RegistryError> {
        let mut next = next_coordinate;

        // A counter behind its own rooms would hand out a coordinate twice.
        if let Some((&highest, _)) = room_sizes.last_key_value() {
            if highest >= next {
                next = highest
                    .checked_add(1)
                    .ok_or(RegistryError::CoordinatesExhausted)?;
                log::warn!(
                    "Saved coordinate counter {} is behind room {}, advancing it",
                    next_coordinate,
                    highest
                );
            }
        }

        self.room_sizes = room_sizes;
        self.spawnpoints = spawnpoints;
        self.next_coordinate = next;
        self.dirty = false;
        Ok(())
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(MachinesConfig::default())
    }
}

impl PartialEq for RoomRegistry {
    /// Registries are equal when they hold the same rooms; config and the
    /// dirty flag are not part of the persisted identity.
    fn eq(&self, other: &Self) -> bool {
        self.next_coordinate == other.next_coordinate
            && self.room_sizes == other.room_sizes
            && self.spawnpoints == other.spawnpoints
    }
}
