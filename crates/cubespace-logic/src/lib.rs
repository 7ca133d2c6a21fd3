//! Pure room logic for cubespace.
//!
//! Everything a machine dimension needs to decide *where* a room is and
//! *whether* an occupant is still inside it, without any world, engine or
//! save-file dependency. Functions take plain data and return results, so
//! the registry in `cubespace-core` and the headless harness share them.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Machine dimension settings and their validation |
//! | [`confinement`] | Per-occupant confinement verdicts and check scheduling |
//! | [`constants`] | Machine sizes, floor height, effect ids |
//! | [`effects`] | Temporary status effects applied to escapees |
//! | [`geometry`] | Room bounding boxes and spawn placement math |

pub mod config;
pub mod confinement;
pub mod constants;
pub mod effects;
pub mod geometry;

pub use geometry::Coordinate;
