//! Longitudinal occupancy along a segment
//!
//! Every placed object reserves a span `[start_z, end_z]` in one lane. New
//! candidates are tested against all reserved spans with a spacing buffer:
//! - same lane: the buffer of the placement phase that is running
//! - different lane: the cross-lane buffer

use serde::{Deserialize, Serialize};

/// What reserved an interval (diagnostics only, the validity rule ignores it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementKind {
    Obstacle,
    CoinCluster,
}

/// A span of one lane reserved by a placed object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupiedInterval {
    pub start_z: f32,
    pub end_z: f32,
    pub lane: usize,
    pub kind: PlacementKind,
}

impl OccupiedInterval {
    pub fn new(start_z: f32, end_z: f32, lane: usize, kind: PlacementKind) -> Self {
        Self {
            start_z,
            end_z,
            lane,
            kind,
        }
    }

    /// Length along Z
    #[inline]
    pub fn length(&self) -> f32 {
        self.end_z - self.start_z
    }

    /// Does `[start_z, end_z]` come within `buffer` of this interval?
    ///
    /// Two spans are clear of each other only if one ends (plus buffer)
    /// strictly before the other starts (minus buffer).
    #[inline]
    pub fn conflicts_with(&self, start_z: f32, end_z: f32, buffer: f32) -> bool {
        !(end_z + buffer < self.start_z || start_z - buffer > self.end_z)
    }

    /// Gap between two intervals along Z (negative when they overlap)
    pub fn gap_to(&self, other: &OccupiedInterval) -> f32 {
        if self.end_z <= other.start_z {
            other.start_z - self.end_z
        } else if other.end_z <= self.start_z {
            self.start_z - other.end_z
        } else {
            -(self.end_z.min(other.end_z) - self.start_z.max(other.start_z))
        }
    }
}

/// Check a candidate span against everything already reserved
///
/// `min_distance` applies to intervals in the same lane and is chosen by the
/// caller's placement phase, not by the kind of the existing interval.
pub fn is_position_valid(
    occupied: &[OccupiedInterval],
    start_z: f32,
    end_z: f32,
    lane: usize,
    min_distance: f32,
    cross_lane_min_distance: f32,
) -> bool {
    occupied.iter().all(|space| {
        let buffer = if space.lane == lane {
            min_distance
        } else {
            cross_lane_min_distance
        };
        !space.conflicts_with(start_z, end_z, buffer)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(start: f32, end: f32, lane: usize) -> OccupiedInterval {
        OccupiedInterval::new(start, end, lane, PlacementKind::Obstacle)
    }

    #[test]
    fn test_conflict_requires_strict_clearance() {
        let space = obstacle(50.0, 55.0, 1);
        // Exactly at the buffer edge still conflicts
        assert!(space.conflicts_with(30.0, 35.0, 15.0));
        // Just past the buffer is clear
        assert!(!space.conflicts_with(30.0, 34.9, 15.0));
        assert!(!space.conflicts_with(70.1, 75.0, 15.0));
        // Overlap always conflicts
        assert!(space.conflicts_with(52.0, 53.0, 0.0));
    }

    #[test]
    fn test_same_lane_uses_phase_distance() {
        let occupied = [obstacle(50.0, 55.0, 0)];
        // 20 units away in the same lane: fails a 25 buffer, passes a 15 buffer
        assert!(!is_position_valid(&occupied, 75.0, 80.0, 0, 25.0, 10.0));
        assert!(is_position_valid(&occupied, 75.0, 80.0, 0, 15.0, 10.0));
    }

    #[test]
    fn test_cross_lane_uses_cross_distance() {
        let occupied = [obstacle(50.0, 55.0, 0)];
        // 8 units away in another lane: fails a cross buffer of 10
        assert!(!is_position_valid(&occupied, 63.0, 68.0, 2, 25.0, 10.0));
        // 12 units away is fine even though the same-lane buffer is 25
        assert!(is_position_valid(&occupied, 67.0, 72.0, 2, 25.0, 10.0));
    }

    #[test]
    fn test_empty_is_always_valid() {
        assert!(is_position_valid(&[], 0.0, 100.0, 0, 1000.0, 1000.0));
    }

    #[test]
    fn test_gap_to() {
        let a = obstacle(10.0, 20.0, 0);
        let b = obstacle(25.0, 30.0, 0);
        assert!((a.gap_to(&b) - 5.0).abs() < 1e-6);
        assert!((b.gap_to(&a) - 5.0).abs() < 1e-6);
        let c = obstacle(18.0, 22.0, 0);
        assert!(a.gap_to(&c) < 0.0);
        assert!((a.length() - 10.0).abs() < 1e-6);
        assert!((c.length() - 4.0).abs() < 1e-6);
    }
}
