//! Machine components: the blocks that lead into rooms.

use cubespace_logic::geometry::Coordinate;
use serde::{Deserialize, Serialize};

/// A machine placed in the outside world.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Machine {
    /// Assigned the first time someone enters; never changes afterwards.
    pub coordinate: Option<Coordinate>,
    /// Machine variant, see [`cubespace_logic::constants::machine_sizes`].
    pub meta: u8,
}

impl Machine {
    pub fn new(meta: u8) -> Self {
        Self {
            coordinate: None,
            meta,
        }
    }
}
