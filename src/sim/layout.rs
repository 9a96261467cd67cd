//! Segment layout generation
//!
//! Populates one fixed-length track segment with obstacles and coin clusters
//! by bounded rejection sampling. Obstacles claim space first, then every lane
//! gets its coin clusters in whatever room is left. A placement that finds no
//! valid spot within the attempt budget is skipped and counted, never retried.
//!
//! All coordinates here are segment-local: Z runs from 0 to `segment_length`,
//! X is the lane center plus `lane_offset_x`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::interval::{OccupiedInterval, PlacementKind, is_position_valid};
use crate::error::{ConfigError, ensure_non_negative, ensure_positive};

/// Random draws allowed per obstacle or cluster before giving up on it
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;

/// One kind of obstacle that can be placed on a segment
///
/// The vertical band `[bottom, top]` decides how the runner gets past it:
/// a low barrier is jumped, an overhead bar is slid under, a full block
/// needs a lane change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleType {
    pub name: String,
    /// Lateral half extent
    pub half_width: f32,
    /// Underside height above the track
    pub bottom: f32,
    /// Top height above the track
    pub top: f32,
}

impl ObstacleType {
    pub fn new(name: &str, half_width: f32, bottom: f32, top: f32) -> Self {
        Self {
            name: name.to_string(),
            half_width,
            bottom,
            top,
        }
    }

    /// Knee-high barrier, clear it by jumping
    pub fn barrier() -> Self {
        Self::new("barrier", 2.0, 0.0, 1.0)
    }

    /// Raised bar, clear it by sliding
    pub fn overhead() -> Self {
        Self::new("overhead", 2.0, 1.2, 3.0)
    }

    /// Full-height block, only a lane change gets past
    pub fn block() -> Self {
        Self::new("block", 2.0, 0.0, 4.0)
    }
}

/// Everything the generator needs to populate one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    // === Lanes ===
    /// Lateral center of each lane (the lane count is the length)
    pub lane_positions: Vec<f32>,
    /// Extra lateral shift applied to everything placed in a lane
    pub lane_offset_x: f32,
    /// Segment extent along Z
    pub segment_length: f32,

    // === Coins ===
    pub coins_per_lane: u32,
    pub coins_per_cluster: u32,
    /// Z distance between coins within a cluster
    pub coin_spacing: f32,
    /// Height coins float above the track
    pub coin_height: f32,

    // === Obstacles ===
    pub obstacle_types: Vec<ObstacleType>,
    pub obstacles_per_type: u32,
    /// Approximate Z extent of one obstacle
    pub obstacle_size: f32,

    // === Spacing ===
    /// Same-lane buffer while placing obstacles
    pub min_distance_between_obstacles: f32,
    /// Same-lane buffer while placing coin clusters
    pub min_distance_between_clusters: f32,
    /// Buffer against anything in another lane
    pub min_distance_between_obstacle_and_cluster: f32,
    /// Keep-out zone at both ends of the segment
    pub edge_buffer: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lane_positions: vec![-20.0, 0.0, 20.0],
            lane_offset_x: 3.0,
            segment_length: 115.0,

            coins_per_lane: 9,
            coins_per_cluster: 3,
            coin_spacing: 2.0,
            coin_height: 1.0,

            obstacle_types: vec![ObstacleType::barrier(), ObstacleType::overhead()],
            obstacles_per_type: 2,
            obstacle_size: 5.0,

            min_distance_between_obstacles: 25.0,
            min_distance_between_clusters: 15.0,
            min_distance_between_obstacle_and_cluster: 10.0,
            edge_buffer: 5.0,
        }
    }
}

impl LayoutConfig {
    #[inline]
    pub fn lane_count(&self) -> usize {
        self.lane_positions.len()
    }

    /// Lateral position of everything placed in `lane`
    #[inline]
    pub fn lane_x(&self, lane: usize) -> f32 {
        self.lane_positions[lane] + self.lane_offset_x
    }

    /// Z extent of a whole coin cluster
    #[inline]
    pub fn cluster_length(&self) -> f32 {
        self.coins_per_cluster.saturating_sub(1) as f32 * self.coin_spacing
    }

    /// Cluster slots per lane, rounded up when coins don't divide evenly
    pub fn clusters_per_lane(&self) -> u32 {
        if self.coins_per_cluster == 0 {
            return 0;
        }
        self.coins_per_lane.div_ceil(self.coins_per_cluster)
    }

    /// Obstacles requested across all types
    pub fn requested_obstacles(&self) -> usize {
        self.obstacle_types.len() * self.obstacles_per_type as usize
    }

    /// Cluster slots requested across all lanes
    pub fn requested_clusters(&self) -> usize {
        self.lane_count() * self.clusters_per_lane() as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_positions.is_empty() {
            return Err(ConfigError::NoLanes);
        }
        if self.coins_per_cluster == 0 {
            return Err(ConfigError::ZeroCoinsPerCluster);
        }
        ensure_positive("segment_length", self.segment_length)?;
        ensure_positive("obstacle_size", self.obstacle_size)?;
        ensure_non_negative("coin_spacing", self.coin_spacing)?;
        ensure_non_negative("edge_buffer", self.edge_buffer)?;
        ensure_non_negative(
            "min_distance_between_obstacles",
            self.min_distance_between_obstacles,
        )?;
        ensure_non_negative(
            "min_distance_between_clusters",
            self.min_distance_between_clusters,
        )?;
        ensure_non_negative(
            "min_distance_between_obstacle_and_cluster",
            self.min_distance_between_obstacle_and_cluster,
        )?;
        for ty in &self.obstacle_types {
            ensure_non_negative("obstacle half_width", ty.half_width)?;
            if ty.top <= ty.bottom {
                return Err(ConfigError::InvertedObstacle {
                    name: ty.name.clone(),
                    bottom: ty.bottom,
                    top: ty.top,
                });
            }
        }
        Ok(())
    }
}

/// An obstacle placed at a single (lane, z) point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObstacle {
    pub id: u32,
    /// Index into `LayoutConfig::obstacle_types`
    pub obstacle_type: usize,
    pub lane: usize,
    pub x: f32,
    /// Center along Z
    pub z: f32,
    pub start_z: f32,
    pub end_z: f32,
}

/// A run of coins in one lane, placed as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedCluster {
    pub id: u32,
    pub lane: usize,
    pub x: f32,
    pub start_z: f32,
    pub end_z: f32,
    /// Z of each member coin, `coin_spacing` apart from `start_z`
    pub coins: Vec<f32>,
}

/// Output of one generation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub obstacles: Vec<PlacedObstacle>,
    pub clusters: Vec<PlacedCluster>,
    /// Obstacles skipped after exhausting the attempt budget
    pub unplaced_obstacles: u32,
    /// Cluster slots skipped after exhausting the attempt budget
    pub unplaced_clusters: u32,
}

impl LayoutResult {
    /// Total coins across all placed clusters
    pub fn coin_count(&self) -> usize {
        self.clusters.iter().map(|c| c.coins.len()).sum()
    }

    /// Coins placed in one lane
    pub fn coins_in_lane(&self, lane: usize) -> usize {
        self.clusters
            .iter()
            .filter(|c| c.lane == lane)
            .map(|c| c.coins.len())
            .sum()
    }

    /// True if every requested placement succeeded
    pub fn is_complete(&self) -> bool {
        self.unplaced_obstacles == 0 && self.unplaced_clusters == 0
    }
}

/// Populate a segment using the supplied random source
///
/// Deterministic for a given config and RNG state.
pub fn generate_layout<R: Rng + ?Sized>(config: &LayoutConfig, rng: &mut R) -> LayoutResult {
    let mut occupied = Vec::new();
    populate(config, rng, &mut occupied)
}

/// Place obstacles then coin clusters, recording every reserved span
fn populate<R: Rng + ?Sized>(
    config: &LayoutConfig,
    rng: &mut R,
    occupied: &mut Vec<OccupiedInterval>,
) -> LayoutResult {
    let mut result = LayoutResult::default();
    if config.lane_positions.is_empty() {
        log::warn!("Segment has no lanes, nothing to place");
        return result;
    }

    place_obstacles(config, rng, occupied, &mut result);
    place_coin_clusters(config, rng, occupied, &mut result);

    log::debug!(
        "Segment layout: {} obstacles ({} unplaced), {} clusters ({} unplaced)",
        result.obstacles.len(),
        result.unplaced_obstacles,
        result.clusters.len(),
        result.unplaced_clusters
    );
    result
}

fn place_obstacles<R: Rng + ?Sized>(
    config: &LayoutConfig,
    rng: &mut R,
    occupied: &mut Vec<OccupiedInterval>,
    result: &mut LayoutResult,
) {
    if config.obstacle_types.is_empty() {
        log::warn!("No obstacle types configured, skipping obstacles");
        return;
    }

    // Obstacle center range keeps the whole span inside the edge buffers
    let half = config.obstacle_size / 2.0;
    let min_z = config.edge_buffer + half;
    let max_z = config.segment_length - config.edge_buffer - half;
    if min_z > max_z {
        let requested = config.requested_obstacles() as u32;
        log::warn!(
            "Segment length {} too short for obstacles (edge buffer {}, size {}), skipping {}",
            config.segment_length,
            config.edge_buffer,
            config.obstacle_size,
            requested
        );
        result.unplaced_obstacles += requested;
        return;
    }

    let lane_count = config.lane_count();
    for obstacle_type in 0..config.obstacle_types.len() {
        for _ in 0..config.obstacles_per_type {
            let mut placed = false;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let lane = rng.random_range(0..lane_count);
                let z = rng.random_range(min_z..=max_z);
                let (start_z, end_z) = (z - half, z + half);

                if is_position_valid(
                    occupied,
                    start_z,
                    end_z,
                    lane,
                    config.min_distance_between_obstacles,
                    config.min_distance_between_obstacle_and_cluster,
                ) {
                    occupied.push(OccupiedInterval::new(
                        start_z,
                        end_z,
                        lane,
                        PlacementKind::Obstacle,
                    ));
                    result.obstacles.push(PlacedObstacle {
                        id: result.obstacles.len() as u32,
                        obstacle_type,
                        lane,
                        x: config.lane_x(lane),
                        z,
                        start_z,
                        end_z,
                    });
                    placed = true;
                    break;
                }
            }

            if !placed {
                log::warn!(
                    "Could not find valid position for obstacle '{}' after {} attempts",
                    config.obstacle_types[obstacle_type].name,
                    MAX_PLACEMENT_ATTEMPTS
                );
                result.unplaced_obstacles += 1;
            }
        }
    }
}

fn place_coin_clusters<R: Rng + ?Sized>(
    config: &LayoutConfig,
    rng: &mut R,
    occupied: &mut Vec<OccupiedInterval>,
    result: &mut LayoutResult,
) {
    if config.coins_per_cluster == 0 {
        log::warn!("coins_per_cluster is 0, skipping coins");
        return;
    }
    if config.coins_per_lane % config.coins_per_cluster != 0 {
        log::warn!(
            "Coins per lane ({}) not divisible by coins per cluster ({}), rounding clusters up",
            config.coins_per_lane,
            config.coins_per_cluster
        );
    }
    let clusters_per_lane = config.clusters_per_lane();
    if clusters_per_lane == 0 {
        return;
    }

    let cluster_length = config.cluster_length();
    let min_z = config.edge_buffer;
    let max_z = config.segment_length - cluster_length - config.edge_buffer;
    if min_z > max_z {
        let requested = config.requested_clusters() as u32;
        log::warn!(
            "Segment length {} too short for clusters of length {}, skipping {}",
            config.segment_length,
            cluster_length,
            requested
        );
        result.unplaced_clusters += requested;
        return;
    }

    for lane in 0..config.lane_count() {
        let x = config.lane_x(lane);
        for _ in 0..clusters_per_lane {
            let mut placed = false;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let start_z = rng.random_range(min_z..=max_z);
                let end_z = start_z + cluster_length;

                if is_position_valid(
                    occupied,
                    start_z,
                    end_z,
                    lane,
                    config.min_distance_between_clusters,
                    config.min_distance_between_obstacle_and_cluster,
                ) {
                    occupied.push(OccupiedInterval::new(
                        start_z,
                        end_z,
                        lane,
                        PlacementKind::CoinCluster,
                    ));
                    let coins = (0..config.coins_per_cluster)
                        .map(|i| start_z + i as f32 * config.coin_spacing)
                        .collect();
                    result.clusters.push(PlacedCluster {
                        id: result.clusters.len() as u32,
                        lane,
                        x,
                        start_z,
                        end_z,
                        coins,
                    });
                    placed = true;
                    break;
                }
            }

            if !placed {
                log::warn!(
                    "Could not find valid position for coin cluster in lane {} after {} attempts",
                    lane,
                    MAX_PLACEMENT_ATTEMPTS
                );
                result.unplaced_clusters += 1;
            }
        }
    }
}

/// A segment's generator: config, seed and the spans it has reserved
///
/// Generation always restarts the RNG from the stored seed, so repeated
/// regeneration reproduces the same layout until `reseed` is called.
#[derive(Debug, Clone)]
pub struct SegmentLayout {
    config: LayoutConfig,
    seed: u64,
    occupied: Vec<OccupiedInterval>,
    result: LayoutResult,
}

impl SegmentLayout {
    /// Create an empty generator (call `generate` to populate)
    pub fn new(config: LayoutConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            occupied: Vec::new(),
            result: LayoutResult::default(),
        }
    }

    /// Create and populate in one go
    pub fn generated(config: LayoutConfig, seed: u64) -> Self {
        let mut layout = Self::new(config, seed);
        layout.generate();
        layout
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Last generated placements
    pub fn result(&self) -> &LayoutResult {
        &self.result
    }

    /// Spans reserved by the last generation pass
    pub fn intervals(&self) -> &[OccupiedInterval] {
        &self.occupied
    }

    /// Drop all placements and reserved spans
    pub fn clear(&mut self) {
        self.occupied.clear();
        self.result = LayoutResult::default();
    }

    /// Clear, then populate from the stored seed
    pub fn generate(&mut self) -> &LayoutResult {
        self.clear();
        let mut rng = Pcg32::seed_from_u64(self.seed);
        self.result = populate(&self.config, &mut rng, &mut self.occupied);
        &self.result
    }

    /// Rebuild the layout from scratch
    pub fn regenerate(&mut self) -> &LayoutResult {
        self.generate()
    }

    /// Switch to a new seed and rebuild
    pub fn reseed(&mut self, seed: u64) -> &LayoutResult {
        self.seed = seed;
        self.generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clusters_per_lane_rounds_up() {
        let mut config = LayoutConfig::default();
        config.coins_per_lane = 9;
        config.coins_per_cluster = 3;
        assert_eq!(config.clusters_per_lane(), 3);
        config.coins_per_lane = 10;
        assert_eq!(config.clusters_per_lane(), 4);
        config.coins_per_lane = 0;
        assert_eq!(config.clusters_per_lane(), 0);
    }

    #[test]
    fn test_cluster_length() {
        let config = LayoutConfig::default();
        assert!((config.cluster_length() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_lane_x_includes_offset() {
        let config = LayoutConfig::default();
        assert!((config.lane_x(0) - -17.0).abs() < 1e-6);
        assert!((config.lane_x(2) - 23.0).abs() < 1e-6);
    }

    #[test]
    fn test_obstacles_claim_space_first() {
        let config = LayoutConfig::default();
        let layout = SegmentLayout::generated(config.clone(), 7);
        let n = layout.result().obstacles.len();
        assert!(
            layout.intervals()[..n]
                .iter()
                .all(|i| i.kind == PlacementKind::Obstacle)
        );
        assert!(
            layout.intervals()[n..]
                .iter()
                .all(|i| i.kind == PlacementKind::CoinCluster)
        );
    }

    #[test]
    fn test_interval_count_matches_placements() {
        let layout = SegmentLayout::generated(LayoutConfig::default(), 42);
        let result = layout.result();
        assert_eq!(
            layout.intervals().len(),
            result.obstacles.len() + result.clusters.len()
        );
        assert_eq!(
            result.obstacles.len() + result.unplaced_obstacles as usize,
            LayoutConfig::default().requested_obstacles()
        );
        assert_eq!(
            result.clusters.len() + result.unplaced_clusters as usize,
            LayoutConfig::default().requested_clusters()
        );
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut layout = SegmentLayout::generated(LayoutConfig::default(), 3);
        assert!(!layout.intervals().is_empty());
        layout.clear();
        assert!(layout.intervals().is_empty());
        assert!(layout.result().obstacles.is_empty());
        assert!(layout.result().clusters.is_empty());
    }

    #[test]
    fn test_no_lanes_places_nothing() {
        let config = LayoutConfig {
            lane_positions: Vec::new(),
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let result = generate_layout(&config, &mut rng);
        assert!(result.obstacles.is_empty());
        assert!(result.clusters.is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(LayoutConfig::default().validate().is_ok());

        let config = LayoutConfig {
            coins_per_cluster: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroCoinsPerCluster)
        ));

        let config = LayoutConfig {
            segment_length: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "segment_length",
                ..
            })
        ));

        let config = LayoutConfig {
            obstacle_types: vec![ObstacleType::new("bad", 1.0, 2.0, 1.0)],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedObstacle { .. })
        ));
    }
}
