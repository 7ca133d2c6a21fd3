//! Occupant components: players and anything else that can enter a room.

use cubespace_logic::effects::StatusEffect;
use cubespace_logic::geometry::{Coordinate, Pose};
use serde::{Deserialize, Serialize};

/// Marks an entity as something confinement looks at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occupant {
    pub name: String,
}

impl Occupant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Present only while the occupant is inside a machine room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InMachine {
    /// The room the occupant last entered.
    pub coordinate: Coordinate,
    /// Where the occupant stood before entering, restored on leave.
    pub return_pose: Pose,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Survival,
    Adventure,
    Creative,
    Spectator,
}

impl GameMode {
    /// Modes in which the occupant is not bound by the world's rules.
    pub fn is_unrestricted(self) -> bool {
        matches!(self, GameMode::Creative | GameMode::Spectator)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Privileges {
    pub operator: bool,
    pub mode: GameMode,
}

/// Status effects currently running on an occupant. Removed once empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects(pub Vec<StatusEffect>);
