//! Touch swipe recognition
//!
//! The host feeds pointer down/up positions in screen space (y up); a long
//! enough drag along its dominant axis becomes a lane change, jump or slide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_SWIPE_DISTANCE;
use crate::sim::TickInput;

/// Recognized gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Swipe {
    Left,
    Right,
    Up,
    Down,
}

impl Swipe {
    /// Merge this gesture's intent into a tick's input
    pub fn apply(self, input: &mut TickInput) {
        match self {
            Swipe::Left => input.lane_change = -1,
            Swipe::Right => input.lane_change = 1,
            Swipe::Up => input.jump = true,
            Swipe::Down => input.slide = true,
        }
    }
}

/// Tracks one touch from begin to end
#[derive(Debug, Clone)]
pub struct SwipeDetector {
    pub min_distance: f32,
    start: Option<Vec2>,
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self::new(MIN_SWIPE_DISTANCE)
    }
}

impl SwipeDetector {
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            start: None,
        }
    }

    /// Touch began
    pub fn begin(&mut self, pos: Vec2) {
        self.start = Some(pos);
    }

    /// Touch cancelled by the platform
    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// Touch ended; returns the swipe if the drag was long enough
    pub fn end(&mut self, pos: Vec2) -> Option<Swipe> {
        let start = self.start.take()?;
        classify(pos - start, self.min_distance)
    }
}

/// Map a drag vector to a swipe along its dominant axis
pub fn classify(delta: Vec2, min_distance: f32) -> Option<Swipe> {
    if delta.x.abs() >= delta.y.abs() {
        if delta.x.abs() <= min_distance {
            None
        } else if delta.x > 0.0 {
            Some(Swipe::Right)
        } else {
            Some(Swipe::Left)
        }
    } else if delta.y.abs() <= min_distance {
        None
    } else if delta.y > 0.0 {
        Some(Swipe::Up)
    } else {
        Some(Swipe::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_drag_ignored() {
        let mut d = SwipeDetector::default();
        d.begin(Vec2::new(100.0, 100.0));
        assert_eq!(d.end(Vec2::new(150.0, 100.0)), None);
        assert!(!d.is_tracking());
    }

    #[test]
    fn test_directions() {
        let mut d = SwipeDetector::default();
        let cases = [
            (Vec2::new(80.0, 10.0), Swipe::Right),
            (Vec2::new(-80.0, 10.0), Swipe::Left),
            (Vec2::new(10.0, 80.0), Swipe::Up),
            (Vec2::new(10.0, -80.0), Swipe::Down),
        ];
        for (delta, expected) in cases {
            d.begin(Vec2::new(200.0, 200.0));
            assert_eq!(d.end(Vec2::new(200.0, 200.0) + delta), Some(expected));
        }
    }

    #[test]
    fn test_end_without_begin() {
        let mut d = SwipeDetector::default();
        assert_eq!(d.end(Vec2::new(500.0, 0.0)), None);
        d.begin(Vec2::ZERO);
        d.cancel();
        assert_eq!(d.end(Vec2::new(500.0, 0.0)), None);
    }

    #[test]
    fn test_apply() {
        let mut input = TickInput::default();
        Swipe::Left.apply(&mut input);
        Swipe::Up.apply(&mut input);
        assert_eq!(input.lane_change, -1);
        assert!(input.jump);
        assert!(!input.slide);
    }
}
