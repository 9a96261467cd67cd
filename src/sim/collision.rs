//! Overlap tests between the runner and placed objects
//!
//! Everything is an axis-aligned box in world space. The runner crashes when
//! its box overlaps an obstacle's box on all three axes, which is what makes
//! low barriers jumpable and overhead bars slidable.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layout::ObstacleType;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box for an obstacle of `ty` standing at `(x, z)` with Z extent `depth`
    pub fn for_obstacle(ty: &ObstacleType, x: f32, z: f32, depth: f32) -> Self {
        Self {
            min: Vec3::new(x - ty.half_width, ty.bottom, z - depth / 2.0),
            max: Vec3::new(x + ty.half_width, ty.top, z + depth / 2.0),
        }
    }

    /// Strict overlap on every axis (touching faces don't count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Grow by `amount` in every direction
    pub fn inflated(&self, amount: f32) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Does the runner's box hit this obstacle?
#[inline]
pub fn hits_obstacle(player: &Aabb, obstacle: &Aabb) -> bool {
    player.overlaps(obstacle)
}

/// Is a coin at `coin` within `radius` of the runner's box?
#[inline]
pub fn collects_coin(player: &Aabb, coin: Vec3, radius: f32) -> bool {
    player.inflated(radius).contains_point(coin)
}
