//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (segments by origin, objects by id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod interval;
pub mod layout;
pub mod player;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::{Aabb, collects_coin, hits_obstacle};
pub use interval::{OccupiedInterval, PlacementKind, is_position_valid};
pub use layout::{
    LayoutConfig, LayoutResult, MAX_PLACEMENT_ATTEMPTS, ObstacleType, PlacedCluster,
    PlacedObstacle, SegmentLayout, generate_layout,
};
pub use player::{AirState, Player, PlayerConfig, SlideState};
pub use state::{GameEvent, RunPhase, RunState, Score};
pub use tick::{TickInput, autopilot, tick};
pub use track::{Coin, Obstacle, Segment, Track, TrackConfig};
