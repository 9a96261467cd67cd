//! Run configuration
//!
//! One serializable bundle for every tunable in the simulation. Hosts load it
//! from JSON (or use the defaults) and hand it to `RunState`.

use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::consts::MIN_SWIPE_DISTANCE;
use crate::error::{ConfigError, ensure_non_negative, ensure_positive};
use crate::input::SwipeDetector;
use crate::sim::{LayoutConfig, ObstacleType, PlayerConfig, TrackConfig};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Forward speed multiplier
    pub fn speed_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
        }
    }

    /// Obstacles of each type per segment
    pub fn obstacles_per_type(&self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// Crash and pickup tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seconds the runner stays dazed after a crash
    pub crash_stun_duration: f32,
    /// Seconds of fade before the run restarts
    pub fade_duration: f32,
    /// Extra reach around the runner for coin pickup
    pub coin_pickup_radius: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            crash_stun_duration: 1.0,
            fade_duration: 3.0,
            coin_pickup_radius: 0.75,
        }
    }
}

/// Everything a run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    /// Segment layouts to pick from when spawning (all share one lane set)
    pub layout_variants: Vec<LayoutConfig>,
    pub player: PlayerConfig,
    pub track: TrackConfig,
    pub camera: CameraConfig,
    pub run: RunConfig,

    /// Screen-space drag needed to register a swipe
    pub min_swipe_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let base = LayoutConfig::default();
        Self {
            difficulty: Difficulty::Normal,

            // Three segment flavors: jump-heavy, slide-heavy, mixed
            layout_variants: vec![
                LayoutConfig {
                    obstacle_types: vec![ObstacleType::barrier()],
                    ..base.clone()
                },
                LayoutConfig {
                    obstacle_types: vec![ObstacleType::overhead()],
                    ..base.clone()
                },
                LayoutConfig {
                    obstacle_types: vec![ObstacleType::barrier(), ObstacleType::block()],
                    ..base
                },
            ],
            player: PlayerConfig::default(),
            track: TrackConfig::default(),
            camera: CameraConfig::default(),
            run: RunConfig::default(),

            min_swipe_distance: MIN_SWIPE_DISTANCE,
        }
    }
}

impl Settings {
    /// Defaults adjusted for a difficulty
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_difficulty(difficulty);
        settings
    }

    /// Rescale speed and obstacle counts for a difficulty
    pub fn apply_difficulty(&mut self, difficulty: Difficulty) {
        let base_speed = self.player.forward_speed / self.difficulty.speed_scale();
        self.difficulty = difficulty;
        self.player.forward_speed = base_speed * difficulty.speed_scale();
        for variant in &mut self.layout_variants {
            variant.obstacles_per_type = difficulty.obstacles_per_type();
        }
    }

    /// World X of each lane center (taken from the first variant)
    pub fn lane_xs(&self) -> Vec<f32> {
        self.layout_variants
            .first()
            .map(|v| (0..v.lane_count()).map(|lane| v.lane_x(lane)).collect())
            .unwrap_or_default()
    }

    /// Swipe recognizer using the configured drag threshold
    pub fn swipe_detector(&self) -> SwipeDetector {
        SwipeDetector::new(self.min_swipe_distance)
    }

    pub fn lane_count(&self) -> usize {
        self.layout_variants
            .first()
            .map(LayoutConfig::lane_count)
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let first = self
            .layout_variants
            .first()
            .ok_or(ConfigError::NoLayoutVariants)?;
        for variant in &self.layout_variants {
            variant.validate()?;
            if variant.lane_positions != first.lane_positions
                || variant.lane_offset_x != first.lane_offset_x
            {
                return Err(ConfigError::LaneMismatch);
            }
        }
        self.player.validate()?;
        self.track.validate()?;
        self.camera.validate()?;
        ensure_non_negative("crash_stun_duration", self.run.crash_stun_duration)?;
        ensure_non_negative("fade_duration", self.run.fade_duration)?;
        ensure_non_negative("coin_pickup_radius", self.run.coin_pickup_radius)?;
        ensure_positive("min_swipe_distance", self.min_swipe_distance)?;
        Ok(())
    }

    /// Parse and validate; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings ({}, {} layout variants)",
            settings.difficulty.as_str(),
            settings.layout_variants.len()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.layout_variants.len(), 3);
        assert_eq!(settings.lane_count(), 3);
        assert_eq!(settings.lane_xs(), vec![-17.0, 3.0, 23.0]);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::from_difficulty(Difficulty::Hard);
        let json = settings.to_json().unwrap();
        let loaded = Settings::from_json(&json).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let loaded = Settings::from_json(r#"{ "player": { "forward_speed": 14.0 } }"#).unwrap();
        assert_eq!(loaded.player.forward_speed, 14.0);
        assert_eq!(loaded.player.jump_height, PlayerConfig::default().jump_height);
        assert_eq!(loaded.layout_variants.len(), 3);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "layout_variants": [] }"#),
            Err(ConfigError::NoLayoutVariants)
        ));
    }

    #[test]
    fn test_lane_mismatch_rejected() {
        let mut settings = Settings::default();
        settings.layout_variants[1].lane_positions = vec![-1.0, 1.0];
        assert!(matches!(settings.validate(), Err(ConfigError::LaneMismatch)));
    }

    #[test]
    fn test_swipe_threshold_from_json() {
        use glam::Vec2;

        let loaded = Settings::from_json(r#"{ "min_swipe_distance": 300.0 }"#).unwrap();
        let mut swipes = loaded.swipe_detector();
        assert_eq!(swipes.min_distance, 300.0);

        swipes.begin(Vec2::ZERO);
        assert_eq!(swipes.end(Vec2::new(100.0, 0.0)), None);
        swipes.begin(Vec2::ZERO);
        assert_eq!(
            swipes.end(Vec2::new(320.0, 0.0)),
            Some(crate::input::Swipe::Right)
        );
    }

    #[test]
    fn test_difficulty() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nope"), None);

        let mut settings = Settings::from_difficulty(Difficulty::Easy);
        assert!((settings.player.forward_speed - 8.0).abs() < 1e-5);
        assert!(settings.layout_variants.iter().all(|v| v.obstacles_per_type == 1));

        settings.apply_difficulty(Difficulty::Hard);
        assert!((settings.player.forward_speed - 13.0).abs() < 1e-4);
    }
}
