//! Track made of consecutive segments
//!
//! New segments are spawned on a timer ahead of the runner, each with a
//! random layout variant and its own seed drawn from the run RNG. Segments
//! that fall far enough behind the runner are dropped.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::layout::{LayoutConfig, SegmentLayout};
use super::state::GameEvent;
use crate::error::{ConfigError, ensure_non_negative, ensure_positive};

/// Segment spawning tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Origin of the first timed spawn
    pub first_spawn_z: f32,
    /// Distance between consecutive segment origins
    pub segment_spacing: f32,
    /// Stop spawning while this many segments start ahead of the runner
    pub max_segments_ahead: usize,
    /// Drop a segment once its end is this far behind the runner
    pub despawn_distance: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 3.0,
            first_spawn_z: 105.0,
            segment_spacing: 105.0,
            max_segments_ahead: 4,
            despawn_distance: 30.0,
        }
    }
}

impl TrackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("spawn_interval", self.spawn_interval)?;
        ensure_positive("segment_spacing", self.segment_spacing)?;
        ensure_non_negative("first_spawn_z", self.first_spawn_z)?;
        ensure_non_negative("despawn_distance", self.despawn_distance)?;
        Ok(())
    }
}

/// A coin in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Index within the segment
    pub id: u32,
    pub cluster: u32,
    pub position: Vec3,
    /// Cleared on pickup
    pub active: bool,
}

/// An obstacle in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub obstacle_type: usize,
    pub lane: usize,
    pub bounds: Aabb,
}

/// One populated stretch of track
#[derive(Debug, Clone)]
pub struct Segment {
    pub id: u32,
    pub variant: usize,
    pub origin_z: f32,
    pub layout: SegmentLayout,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
}

impl Segment {
    pub fn new(id: u32, variant: usize, origin_z: f32, config: LayoutConfig, seed: u64) -> Self {
        let mut segment = Self {
            id,
            variant,
            origin_z,
            layout: SegmentLayout::new(config, seed),
            obstacles: Vec::new(),
            coins: Vec::new(),
        };
        segment.regenerate();
        segment
    }

    /// World Z of the far end
    pub fn end_z(&self) -> f32 {
        self.origin_z + self.layout.config().segment_length
    }

    /// Rebuild the layout and every object on it (all coins active again)
    pub fn regenerate(&mut self) {
        self.layout.regenerate();
        self.rebuild_objects();
    }

    /// Convert segment-local placements into world-space objects
    fn rebuild_objects(&mut self) {
        let config = self.layout.config();
        let result = self.layout.result();
        let origin = self.origin_z;

        self.obstacles = result
            .obstacles
            .iter()
            .map(|o| Obstacle {
                id: o.id,
                obstacle_type: o.obstacle_type,
                lane: o.lane,
                bounds: Aabb::for_obstacle(
                    &config.obstacle_types[o.obstacle_type],
                    o.x,
                    origin + o.z,
                    config.obstacle_size,
                ),
            })
            .collect();

        let mut coins = Vec::with_capacity(result.coin_count());
        for cluster in &result.clusters {
            for &z in &cluster.coins {
                coins.push(Coin {
                    id: coins.len() as u32,
                    cluster: cluster.id,
                    position: Vec3::new(cluster.x, config.coin_height, origin + z),
                    active: true,
                });
            }
        }
        self.coins = coins;
    }

    pub fn active_coins(&self) -> usize {
        self.coins.iter().filter(|c| c.active).count()
    }
}

/// All live segments of a run
#[derive(Debug, Clone)]
pub struct Track {
    /// Sorted by origin
    pub segments: Vec<Segment>,
    /// Origin of the next timed spawn
    pub next_spawn_z: f32,
    /// Seconds accumulated toward the next spawn
    pub spawn_timer: f32,
    next_segment_id: u32,
}

impl Track {
    /// New track with one segment at the start line
    pub fn new(
        config: &TrackConfig,
        variants: &[LayoutConfig],
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        let mut track = Self {
            segments: Vec::new(),
            next_spawn_z: config.first_spawn_z,
            // Full, so the first timed spawn happens on the first update
            spawn_timer: config.spawn_interval,
            next_segment_id: 1,
        };
        track.spawn_segment(0.0, variants, rng, events);
        track
    }

    /// Add a segment at `origin_z` with a random variant
    pub fn spawn_segment(
        &mut self,
        origin_z: f32,
        variants: &[LayoutConfig],
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) -> Option<u32> {
        if variants.is_empty() {
            log::warn!("No layout variants configured, cannot spawn segment");
            return None;
        }
        let variant = rng.random_range(0..variants.len());
        let seed: u64 = rng.random();
        let id = self.next_segment_id;
        self.next_segment_id += 1;

        let segment = Segment::new(id, variant, origin_z, variants[variant].clone(), seed);
        log::debug!(
            "Spawned segment {} (variant {}) at z={} with {} obstacles, {} coins",
            id,
            variant,
            origin_z,
            segment.obstacles.len(),
            segment.coins.len()
        );
        self.segments.push(segment);
        events.push(GameEvent::SegmentSpawned { segment: id, z: origin_z });
        Some(id)
    }

    /// Advance the spawn timer and drop segments left behind
    pub fn update(
        &mut self,
        dt: f32,
        runner_z: f32,
        config: &TrackConfig,
        variants: &[LayoutConfig],
        rng: &mut Pcg32,
        events: &mut Vec<GameEvent>,
    ) {
        self.spawn_timer += dt;
        if self.spawn_timer >= config.spawn_interval {
            self.spawn_timer -= config.spawn_interval;
            if self.segments_ahead(runner_z) < config.max_segments_ahead {
                let z = self.next_spawn_z;
                if self.spawn_segment(z, variants, rng, events).is_some() {
                    self.next_spawn_z += config.segment_spacing;
                }
            }
        }

        let cutoff = runner_z - config.despawn_distance;
        self.segments.retain(|s| {
            let keep = s.end_z() >= cutoff;
            if !keep {
                events.push(GameEvent::SegmentDespawned { segment: s.id });
            }
            keep
        });
    }

    /// Segments starting beyond the runner
    pub fn segments_ahead(&self, runner_z: f32) -> usize {
        self.segments.iter().filter(|s| s.origin_z > runner_z).count()
    }

    /// Segments whose span contains `[z_min, z_max]` at least partly
    pub fn segments_near(&mut self, z_min: f32, z_max: f32) -> impl Iterator<Item = &mut Segment> {
        self.segments
            .iter_mut()
            .filter(move |s| s.origin_z <= z_max && s.end_z() >= z_min)
    }

    pub fn obstacle_count(&self) -> usize {
        self.segments.iter().map(|s| s.obstacles.len()).sum()
    }

    pub fn active_coin_count(&self) -> usize {
        self.segments.iter().map(|s| s.active_coins()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn new_track(config: &TrackConfig) -> (Track, Pcg32, Vec<GameEvent>) {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut events = Vec::new();
        let variants = [LayoutConfig::default()];
        let track = Track::new(config, &variants, &mut rng, &mut events);
        (track, rng, events)
    }

    #[test]
    fn test_starts_with_segment_at_origin() {
        let (track, _, events) = new_track(&TrackConfig::default());
        assert_eq!(track.segments.len(), 1);
        assert_eq!(track.segments[0].origin_z, 0.0);
        assert_eq!(events, vec![GameEvent::SegmentSpawned { segment: 1, z: 0.0 }]);
    }

    #[test]
    fn test_spawns_on_interval_at_spacing() {
        let config = TrackConfig::default();
        let (mut track, mut rng, mut events) = new_track(&config);
        let variants = [LayoutConfig::default()];

        // First update spawns straight away
        track.update(0.02, 0.0, &config, &variants, &mut rng, &mut events);
        assert_eq!(track.segments.len(), 2);
        assert_eq!(track.segments[1].origin_z, 105.0);
        assert_eq!(track.next_spawn_z, 210.0);

        // Next one a little over 3 seconds later at 50 Hz
        for _ in 0..140 {
            track.update(0.02, 0.0, &config, &variants, &mut rng, &mut events);
        }
        assert_eq!(track.segments.len(), 2);
        for _ in 0..15 {
            track.update(0.02, 0.0, &config, &variants, &mut rng, &mut events);
        }
        assert_eq!(track.segments.len(), 3);
        assert_eq!(track.segments[2].origin_z, 210.0);
        let placed: usize = track
            .segments
            .iter()
            .map(|s| s.layout.result().obstacles.len())
            .sum();
        assert!(placed >= 3);
        assert_eq!(track.obstacle_count(), placed);
    }

    #[test]
    fn test_spawning_capped_ahead() {
        let config = TrackConfig {
            max_segments_ahead: 2,
            ..Default::default()
        };
        let (mut track, mut rng, mut events) = new_track(&config);
        let variants = [LayoutConfig::default()];
        for _ in 0..2000 {
            track.update(0.02, 0.0, &config, &variants, &mut rng, &mut events);
        }
        assert_eq!(track.segments_ahead(0.0), 2);
    }

    #[test]
    fn test_despawns_behind_runner() {
        let config = TrackConfig::default();
        let (mut track, mut rng, mut events) = new_track(&config);
        let variants = [LayoutConfig::default()];
        events.clear();
        track.update(0.01, 200.0, &config, &variants, &mut rng, &mut events);
        // The start segment is dropped, the one spawned at 105 reaches past 170
        assert_eq!(track.segments.len(), 1);
        assert_eq!(track.segments[0].id, 2);
        assert_eq!(
            events,
            vec![
                GameEvent::SegmentSpawned { segment: 2, z: 105.0 },
                GameEvent::SegmentDespawned { segment: 1 },
            ]
        );
    }

    #[test]
    fn test_world_objects_offset_by_origin() {
        let segment = Segment::new(1, 0, 105.0, LayoutConfig::default(), 11);
        let result = segment.layout.result();
        for (coin, z) in segment
            .coins
            .iter()
            .zip(result.clusters.iter().flat_map(|c| c.coins.iter()))
        {
            assert!((coin.position.z - (105.0 + z)).abs() < 1e-4);
            assert!(coin.active);
        }
        assert_eq!(segment.obstacles.len(), result.obstacles.len());
    }

    #[test]
    fn test_regenerate_restores_coins() {
        let mut segment = Segment::new(1, 0, 0.0, LayoutConfig::default(), 11);
        let total = segment.coins.len();
        assert!(total > 0);
        for coin in &mut segment.coins {
            coin.active = false;
        }
        segment.regenerate();
        assert_eq!(segment.active_coins(), total);
    }
}
