//! Confinement decisions.
//!
//! Occupants are checked at fixed tick intervals, not continuously, so an
//! occupant may stand outside their room between two checks. Each check
//! produces one [`Verdict`]; only [`Verdict::Escaped`] asks the host to act.
//!
//! ```
//! use cubespace_logic::confinement::{check_confinement, ConfinementCheck, Verdict};
//! use cubespace_logic::geometry::Vec3;
//!
//! let check = ConfinementCheck {
//!     exempt: false,
//!     coordinate: Some(0),
//!     room_size: Some(5),
//!     position: Vec3::new(40.0, 42.0, 2.0),
//!     spacing: 32.0,
//! };
//! assert!(matches!(check_confinement(&check), Verdict::Escaped { coordinate: 0, .. }));
//! ```

use crate::geometry::{bounding_box_for, Aabb, Coordinate, Vec3};

/// Everything needed to judge one occupant.
#[derive(Debug, Clone, Copy)]
pub struct ConfinementCheck {
    /// Whether the host policy lets this occupant roam.
    pub exempt: bool,
    /// The occupant's last known room.
    pub coordinate: Option<Coordinate>,
    /// Registered size of that room.
    pub room_size: Option<u32>,
    pub position: Vec3,
    pub spacing: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Privileged occupant, left alone.
    Exempt,
    /// No idea which room the occupant belongs to.
    UnknownCoordinate,
    /// Room geometry not registered yet; retried once the room is known.
    UnknownRoom(Coordinate),
    Inside,
    /// Outside the bounds of their room.
    Escaped { coordinate: Coordinate, bounds: Aabb },
}

pub fn check_confinement(check: &ConfinementCheck) -> Verdict {
    if check.exempt {
        return Verdict::Exempt;
    }
    let Some(coordinate) = check.coordinate else {
        return Verdict::UnknownCoordinate;
    };
    let Some(size) = check.room_size else {
        return Verdict::UnknownRoom(coordinate);
    };

    let bounds = bounding_box_for(coordinate, size, check.spacing);
    if bounds.contains(&check.position) {
        Verdict::Inside
    } else {
        Verdict::Escaped { coordinate, bounds }
    }
}

/// Whether confinement runs on this host tick.
pub fn is_check_tick(tick: u64, interval: u64) -> bool {
    interval > 0 && tick % interval == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_at(position: Vec3) -> ConfinementCheck {
        ConfinementCheck {
            exempt: false,
            coordinate: Some(3),
            room_size: Some(7),
            position,
            spacing: 32.0,
        }
    }

    #[test]
    fn inside_room() {
        let verdict = check_confinement(&check_at(Vec3::new(99.0, 42.0, 3.0)));
        assert_eq!(verdict, Verdict::Inside);
    }

    #[test]
    fn escaped_reports_bounds() {
        let verdict = check_confinement(&check_at(Vec3::new(120.0, 42.0, 3.0)));
        match verdict {
            Verdict::Escaped { coordinate, bounds } => {
                assert_eq!(coordinate, 3);
                assert_eq!(bounds.min.x, 96.5);
                assert_eq!(bounds.max.x, 103.5);
            }
            other => panic!("expected escape, got {other:?}"),
        }
    }

    #[test]
    fn exemption_wins_over_everything() {
        let mut check = check_at(Vec3::new(500.0, 0.0, 0.0));
        check.exempt = true;
        assert_eq!(check_confinement(&check), Verdict::Exempt);
    }

    #[test]
    fn unknown_coordinate_and_room_are_skipped() {
        let mut check = check_at(Vec3::new(500.0, 0.0, 0.0));
        check.room_size = None;
        assert_eq!(check_confinement(&check), Verdict::UnknownRoom(3));
        check.coordinate = None;
        assert_eq!(check_confinement(&check), Verdict::UnknownCoordinate);
    }

    #[test]
    fn check_ticks_are_spaced() {
        let ticks: Vec<u64> = (1..=30).filter(|t| is_check_tick(*t, 10)).collect();
        assert_eq!(ticks, vec![10, 20, 30]);
        assert!(!is_check_tick(10, 0));
    }
}
