//! Component definitions for the reference host world.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod machine;
mod occupant;

pub use machine::*;
pub use occupant::*;

pub use cubespace_logic::geometry::Pose;
