//! cubespace core - machine room registry and host seams
//!
//! Every machine placed in the world leads to its own cubic room in a
//! separate machine dimension. This crate keeps track of those rooms:
//!
//! - **Registry**: hands out room coordinates, remembers room sizes and
//!   saved spawnpoints, and drags occupants back into their room
//! - **Host traits**: the narrow interface the registry needs from the game
//!   world (teleport, region loading, effects, occupant tracking)
//! - **Engine**: a `hecs` world implementing those traits, driven by a
//!   tick loop; used by the headless harness and the tests
//!
//! # Example
//!
//! ```rust,no_run
//! use cubespace_core::prelude::*;
//! use cubespace_logic::constants::machine_sizes;
//!
//! let mut engine = MachineEngine::default();
//! let machine = engine.spawn_machine(machine_sizes::NORMAL);
//! let player = engine.spawn_occupant("steve", Pose::new(0.0, 64.0, 0.0));
//! engine.enter_machine(player, machine);
//!
//! loop {
//!     engine.update(); // one host tick
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod host;
pub mod host_world;
pub mod persistence;
pub mod registry;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::MachineEngine;
    pub use crate::host::{ExemptionPolicy, OccupantId, OccupantView, RoomHost};
    pub use crate::registry::{EnforcementReport, RegistryError, RoomRegistry, SpawnpointOutcome};
}
