//! Room layout in the machine dimension.
//!
//! Rooms are laid out in a single row along the x axis: room `c` starts at
//! `c * spacing`. Every box is inset by [`BOX_INSET`] so that bounds never sit
//! on integer grid lines. The spawn helpers use the same origin, so a room's
//! computed center is always inside its own bounding box.
//!
//! ```
//! use cubespace_logic::geometry::{bounding_box_for, Vec3};
//!
//! let bb = bounding_box_for(1, 5, 32.0);
//! assert_eq!(bb.min.x, 32.5);
//! assert_eq!(bb.max.x, 37.5);
//! assert!(!bb.contains(&Vec3::new(5.0, 42.0, 3.0)));
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{BOX_INSET, DEFAULT_SPAWN_OFFSET, FLOOR_Y, ROOM_BASE_Y};

/// Dense room key, assigned in allocation order and never reused.
pub type Coordinate = u32;

/// World-space point.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn depth(&self) -> f64 {
        self.max.z - self.min.z
    }

    /// Inclusive on every face.
    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Strict overlap: boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }
}

/// View direction in degrees.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Facing {
    pub yaw: f32,
    pub pitch: f32,
}

/// Where an occupant stands and looks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub facing: Facing,
}

impl Pose {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            facing: Facing::default(),
        }
    }

    pub fn with_facing(mut self, yaw: f32, pitch: f32) -> Self {
        self.facing = Facing { yaw, pitch };
        self
    }
}

/// A teleport destination. Computed placements carry no facing, so the
/// occupant keeps looking wherever they looked before.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpawnLocation {
    pub position: Vec3,
    pub facing: Option<Facing>,
}

impl SpawnLocation {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            facing: None,
        }
    }
}

/// x position of a room's origin.
pub fn room_origin_x(coordinate: Coordinate, spacing: f64) -> f64 {
    coordinate as f64 * spacing
}

/// Bounding box of the room at `coordinate` with interior side `size`.
pub fn bounding_box_for(coordinate: Coordinate, size: u32, spacing: f64) -> Aabb {
    let side = size as f64;
    let min = Vec3::new(
        room_origin_x(coordinate, spacing) + BOX_INSET,
        ROOM_BASE_Y + BOX_INSET,
        BOX_INSET,
    );
    Aabb::new(min, Vec3::new(min.x + side, min.y + side, min.z + side))
}

/// Floor-level placement near the middle of a known room.
///
/// The half side is rounded down, matching the block the room shell is
/// generated around.
pub fn room_center_spawn(coordinate: Coordinate, size: u32, spacing: f64) -> Vec3 {
    let half = (size / 2) as f64;
    Vec3::new(
        room_origin_x(coordinate, spacing) + BOX_INSET + half,
        FLOOR_Y,
        BOX_INSET + half,
    )
}

/// Placement for a coordinate whose room size is not known yet.
pub fn default_spawn(coordinate: Coordinate, spacing: f64) -> Vec3 {
    Vec3::new(
        room_origin_x(coordinate, spacing) + DEFAULT_SPAWN_OFFSET,
        FLOOR_Y,
        DEFAULT_SPAWN_OFFSET,
    )
}
