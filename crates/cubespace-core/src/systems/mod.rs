//! Systems - logic that operates on components

mod confinement;
mod effects;

pub use confinement::*;
pub use effects::*;
