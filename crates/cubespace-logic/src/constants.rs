//! Machine dimension constants: sizes, heights, confinement timing.
//!
//! Plain constants with no world dependency. Both the registry and the
//! simtest harness read these.

/// Machine variants, stored as the `meta` value of a machine block.
pub mod machine_sizes {
    pub const TINY: u8 = 0;
    pub const SMALL: u8 = 1;
    pub const NORMAL: u8 = 2;
    pub const LARGE: u8 = 3;
    pub const GIANT: u8 = 4;
    pub const MAXIMUM: u8 = 5;

    /// Interior side length of the largest machine.
    pub const MAX_BOX_SIZE: u32 = 13;

    /// Interior side length for a machine variant.
    ///
    /// Unknown variants are treated as the largest machine.
    pub fn box_size(meta: u8) -> u32 {
        match meta {
            TINY => 3,
            SMALL => 5,
            NORMAL => 7,
            LARGE => 9,
            GIANT => 11,
            _ => MAX_BOX_SIZE,
        }
    }

    pub fn name(meta: u8) -> &'static str {
        match meta {
            TINY => "tiny",
            SMALL => "small",
            NORMAL => "normal",
            LARGE => "large",
            GIANT => "giant",
            _ => "maximum",
        }
    }
}

/// Height at which room shells are generated.
pub const ROOM_BASE_Y: f64 = 40.0;

/// Height occupants are placed at when no spawnpoint was saved.
pub const FLOOR_Y: f64 = 42.0;

/// Inset that keeps room bounds off integer grid lines.
pub const BOX_INSET: f64 = 0.5;

/// Horizontal offset of the generic default spawn.
pub const DEFAULT_SPAWN_OFFSET: f64 = 1.5;

/// Default distance between two neighbouring room origins.
pub const DEFAULT_CUBE_SPACING: f64 = 32.0;

/// Host ticks between two confinement checks.
pub const CONFINEMENT_CHECK_INTERVAL: u64 = 10;

pub const CONFINEMENT_EFFECT_TICKS: u32 = 200;
pub const CONFINEMENT_EFFECT_AMPLIFIER: u8 = 5;

#[cfg(test)]
mod tests {
    use super::machine_sizes::*;

    #[test]
    fn sizes_grow_by_two() {
        let sizes: Vec<u32> = (TINY..=MAXIMUM).map(box_size).collect();
        assert_eq!(sizes, vec![3, 5, 7, 9, 11, 13]);
    }

    #[test]
    fn unknown_meta_is_maximum() {
        assert_eq!(box_size(42), MAX_BOX_SIZE);
        assert_eq!(name(42), "maximum");
    }
}
