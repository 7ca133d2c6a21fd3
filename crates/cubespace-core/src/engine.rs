//! Machine engine - reference host driving the registry from a tick loop

use cubespace_logic::config::MachinesConfig;
use cubespace_logic::confinement::is_check_tick;
use cubespace_logic::effects::StatusEffect;
use cubespace_logic::geometry::{Coordinate, Vec3};
use hecs::Entity;

use crate::components::*;
use crate::host::{ExemptionPolicy, OccupantId, OccupantTracker, PrivilegedUnrestricted, RoomHost};
use crate::host_world::{occupant_entity, occupant_id, HostWorld};
use crate::persistence::SaveError;
use crate::registry::{EnforcementReport, RoomRegistry, SpawnpointOutcome};
use crate::systems::{confinement_system, effects_system};

/// One machine dimension: host world, registry and world clock.
pub struct MachineEngine {
    /// Host world containing occupants and machines
    pub host: HostWorld,
    pub registry: RoomRegistry,
    /// Host ticks since start
    tick: u64,
    policy: Box<dyn ExemptionPolicy + Send + Sync>,
    /// Result of the most recent confinement pass that actually ran
    last_report: Option<EnforcementReport>,
}

impl MachineEngine {
    pub fn new(config: MachinesConfig) -> Self {
        Self {
            host: HostWorld::new(),
            registry: RoomRegistry::new(config),
            tick: 0,
            policy: Box::new(PrivilegedUnrestricted),
            last_report: None,
        }
    }

    /// Replace the rule deciding who may leave their room.
    pub fn with_policy(mut self, policy: impl ExemptionPolicy + Send + Sync + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn spawn_occupant(&mut self, name: impl Into<String>, pose: Pose) -> OccupantId {
        let entity = self
            .host
            .world
            .spawn((Occupant::new(name), pose, Privileges::default()));
        occupant_id(entity)
    }

    pub fn spawn_machine(&mut self, meta: u8) -> Entity {
        self.host.world.spawn((Machine::new(meta),))
    }

    pub fn set_privileges(&mut self, occupant: OccupantId, operator: bool, mode: GameMode) {
        if let Some(mut privileges) = occupant_entity(occupant)
            .and_then(|e| self.host.world.get::<&mut Privileges>(e).ok())
        {
            privileges.operator = operator;
            privileges.mode = mode;
        }
    }

    /// Place an occupant somewhere else without going through a machine.
    pub fn move_occupant(&mut self, occupant: OccupantId, position: Vec3) {
        if let Some(mut pose) =
            occupant_entity(occupant).and_then(|e| self.host.world.get::<&mut Pose>(e).ok())
        {
            pose.position = position;
        }
    }

    /// Walk an occupant into a machine, allocating its room on first use.
    ///
    /// Returns the room's coordinate, or `None` if either entity is gone or
    /// no coordinate is left to allocate.
    pub fn enter_machine(&mut self, occupant: OccupantId, machine: Entity) -> Option<Coordinate> {
        occupant_entity(occupant).filter(|e| self.host.world.contains(*e))?;
        let placed = *self.host.world.get::<&Machine>(machine).ok()?;

        let coordinate = self
            .registry
            .allocate_or_get(placed.coordinate, placed.meta, &mut self.host)
            .ok()?;
        if let Ok(mut m) = self.host.world.get::<&mut Machine>(machine) {
            m.coordinate = Some(coordinate);
        }

        let destination = self.registry.spawn_location(coordinate);
        self.host.teleport(occupant, coordinate, &destination, false);
        Some(coordinate)
    }

    /// Send an occupant back to where they stood before entering.
    ///
    /// Returns false if the occupant was not in a machine.
    pub fn leave_machine(&mut self, occupant: OccupantId) -> bool {
        let Some(entity) = occupant_entity(occupant) else {
            return false;
        };
        let Ok(tracked) = self.host.world.remove_one::<InMachine>(entity) else {
            return false;
        };
        if let Ok(mut pose) = self.host.world.get::<&mut Pose>(entity) {
            *pose = tracked.return_pose;
        }
        log::info!("Occupant {} left room {}", occupant, tracked.coordinate);
        true
    }

    /// Save the occupant's current pose as their room's spawnpoint.
    pub fn set_spawnpoint(&mut self, occupant: OccupantId) -> Option<SpawnpointOutcome> {
        let pose = self.occupant_pose(occupant)?;
        Some(self.registry.set_spawnpoint(occupant, &pose, &self.host))
    }

    /// Advance the world clock by one tick.
    pub fn update(&mut self) {
        self.tick += 1;

        // Every tick: effect countdown
        effects_system(&mut self.host.world, 1);

        // Every check interval: confinement
        let config = self.registry.config();
        if config.keep_occupants_inside && is_check_tick(self.tick, config.check_interval) {
            let report =
                confinement_system(&mut self.host, &self.registry, self.tick, &*self.policy);
            self.last_report = Some(report);
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn last_report(&self) -> Option<&EnforcementReport> {
        self.last_report.as_ref()
    }

    pub fn occupant_pose(&self, occupant: OccupantId) -> Option<Pose> {
        let entity = occupant_entity(occupant)?;
        self.host.world.get::<&Pose>(entity).ok().map(|p| *p)
    }

    pub fn occupant_coordinate(&self, occupant: OccupantId) -> Option<Coordinate> {
        self.host.last_coordinate(occupant)
    }

    pub fn active_effects(&self, occupant: OccupantId) -> Vec<StatusEffect> {
        occupant_entity(occupant)
            .and_then(|e| self.host.world.get::<&ActiveEffects>(e).ok())
            .map(|a| a.0.clone())
            .unwrap_or_default()
    }

    pub fn occupant_count(&self) -> usize {
        self.host.world.query::<&Occupant>().iter().count()
    }

    /// Save the registry to a writer and mark it clean.
    pub fn save<W: std::io::Write>(&mut self, writer: W) -> Result<(), SaveError> {
        self.registry.save(writer)?;
        self.registry.mark_clean();
        Ok(())
    }

    /// Save only if something changed since the last save. Returns whether
    /// anything was written.
    pub fn save_if_dirty<W: std::io::Write>(&mut self, writer: W) -> Result<bool, SaveError> {
        if !self.registry.is_dirty() {
            return Ok(false);
        }
        self.save(writer)?;
        Ok(true)
    }

    /// Replace the registry with a saved one.
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        self.registry.load(reader)?;
        self.last_report = None;
        Ok(())
    }
}

impl Default for MachineEngine {
    fn default() -> Self {
        Self::new(MachinesConfig::default())
    }
}
