//! Save/Load for the room registry
//!
//! The binary save is bincode, wrapped in a version header. The same state
//! can be written as JSON for inspection or hand-edited fixtures. Rooms and
//! spawnpoints are written as lists in coordinate order; loading rebuilds
//! both maps from scratch.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use cubespace_logic::geometry::{Coordinate, Facing, SpawnLocation, Vec3};
use serde::{Deserialize, Serialize};

use crate::registry::{RegistryError, RoomRegistry};

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Binary save file: version header plus state.
#[derive(Serialize, Deserialize)]
pub struct RegistrySave {
    pub version: u32,
    pub state: RegistryState,
}

/// Persisted registry contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryState {
    #[serde(rename = "nextMachineCoord")]
    pub next_coordinate: Coordinate,
    #[serde(rename = "roomsizes")]
    pub room_sizes: Vec<RoomSizeRecord>,
    pub spawnpoints: Vec<SpawnpointRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSizeRecord {
    #[serde(rename = "coords")]
    pub coordinate: Coordinate,
    /// Interior side length in blocks, not the machine's meta value.
    pub size: u32,
}

/// Saved spawnpoint. `yaw` and `pitch` are written together or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnpointRecord {
    #[serde(rename = "coords")]
    pub coordinate: Coordinate,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: Option<f32>,
    #[serde(default)]
    pub pitch: Option<f32>,
}

impl SpawnpointRecord {
    fn from_location(coordinate: Coordinate, location: &SpawnLocation) -> Self {
        Self {
            coordinate,
            x: location.position.x,
            y: location.position.y,
            z: location.position.z,
            yaw: location.facing.map(|f| f.yaw),
            pitch: location.facing.map(|f| f.pitch),
        }
    }

    fn to_location(&self) -> SpawnLocation {
        let facing = match (self.yaw, self.pitch) {
            (Some(yaw), Some(pitch)) => Some(Facing { yaw, pitch }),
            _ => None,
        };
        SpawnLocation {
            position: Vec3::new(self.x, self.y, self.z),
            facing,
        }
    }
}

impl From<&RoomRegistry> for RegistryState {
    fn from(registry: &RoomRegistry) -> Self {
        Self {
            next_coordinate: registry.next_coordinate,
            room_sizes: registry
                .room_sizes
                .iter()
                .map(|(&coordinate, &size)| RoomSizeRecord { coordinate, size })
                .collect(),
            spawnpoints: registry
                .spawnpoints
                .iter()
                .map(|(&c, location)| SpawnpointRecord::from_location(c, location))
                .collect(),
        }
    }
}

/// Replace the registry's contents with `state`.
///
/// The registry is left untouched if the state cannot be applied.
pub fn apply_state(registry: &mut RoomRegistry, state: RegistryState) -> Result<(), SaveError> {
    let room_sizes: BTreeMap<Coordinate, u32> = state
        .room_sizes
        .iter()
        .map(|r| (r.coordinate, r.size))
        .collect();
    let spawnpoints: BTreeMap<Coordinate, SpawnLocation> = state
        .spawnpoints
        .iter()
        .map(|s| (s.coordinate, s.to_location()))
        .collect();

    let (rooms, saved_spawnpoints) = (room_sizes.len(), spawnpoints.len());
    registry.replace_state(state.next_coordinate, room_sizes, spawnpoints)?;

    log::info!(
        "Loaded machine registry: {} rooms, {} spawnpoints, next coordinate {}",
        rooms,
        saved_spawnpoints,
        registry.next_coordinate()
    );
    Ok(())
}

/// Save the registry to a writer
pub fn save_registry<W: Write>(writer: W, registry: &RoomRegistry) -> Result<(), SaveError> {
    let save = RegistrySave {
        version: SAVE_VERSION,
        state: RegistryState::from(registry),
    };
    bincode::serialize_into(writer, &save)?;
    Ok(())
}

/// Load a registry snapshot from a reader
pub fn load_registry<R: Read>(reader: R) -> Result<RegistryState, SaveError> {
    let save: RegistrySave = bincode::deserialize_from(reader)?;

    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }
    Ok(save.state)
}

/// Write the registry as pretty JSON
pub fn export_json<W: Write>(writer: W, registry: &RoomRegistry) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(writer, &RegistryState::from(registry))?;
    Ok(())
}

/// Read a JSON registry snapshot
pub fn import_json<R: Read>(reader: R) -> Result<RegistryState, SaveError> {
    Ok(serde_json::from_reader(reader)?)
}

impl RoomRegistry {
    /// Write the registry in the binary save format.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        save_registry(writer, self)
    }

    /// Replace this registry's contents with a binary save.
    ///
    /// Nothing is changed if the save cannot be read.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let state = load_registry(reader)?;
        apply_state(self, state)
    }
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    Json(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
    /// A saved room sits at the last coordinate, so the counter cannot move past it.
    CounterExhausted,
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl From<RegistryError> for SaveError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::CoordinatesExhausted => SaveError::CounterExhausted,
        }
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::Json(e) => write!(f, "JSON error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveError::CounterExhausted => write!(f, "Saved rooms leave no coordinate to allocate"),
        }
    }
}

impl std::error::Error for SaveError {}
