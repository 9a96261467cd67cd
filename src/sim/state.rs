//! Run state and core simulation types
//!
//! Everything a run needs to advance deterministically lives here: the seed,
//! the RNG every segment seed is drawn from, the runner, the track and the
//! score.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::track::Track;
use crate::camera::CameraFollow;
use crate::consts::COIN_VALUE;
use crate::settings::Settings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Runner moving, collisions live
    Running,
    /// Frozen until unpaused
    Paused,
    /// Hit an obstacle, runner dazed
    Crashed,
    /// Screen fading before the restart
    FadingOut,
}

/// Fire-and-forget cues for audio/animation hosts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { segment: u32, coin: u32, score: u32 },
    Crashed { segment: u32, obstacle: u32 },
    Jumped,
    Landed,
    SlideStarted,
    SlideEnded,
    LaneChanged { lane: usize },
    SegmentSpawned { segment: u32, z: f32 },
    SegmentDespawned { segment: u32 },
    FadeOut,
    RunRestarted { run: u32 },
}

/// Score counter owned by the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub points: u32,
    pub coins: u32,
}

impl Score {
    /// Count one coin, returns the new total
    pub fn add_coin(&mut self) -> u32 {
        self.coins += 1;
        self.points += COIN_VALUE;
        self.points
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// HUD text
    pub fn display_text(&self) -> String {
        format!("Score: {}", self.points)
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source of every segment seed and variant pick
    pub rng: Pcg32,
    pub settings: Settings,
    /// Restarts so far (0 for the first run)
    pub run_index: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: RunPhase,
    /// Seconds spent in the current crash/fade phase
    pub phase_timer: f32,
    pub score: Score,
    /// Best score across restarts
    pub best_score: u32,
    pub player: Player,
    pub track: Track,
    pub camera: CameraFollow,
    /// Cues since the host last drained them
    pub events: Vec<GameEvent>,
    /// Cached lane centers
    pub(crate) lane_xs: Vec<f32>,
}

impl RunState {
    /// New run with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(Settings::default(), seed)
    }

    /// New run with the given settings (validate them first)
    pub fn with_settings(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut events = Vec::new();
        let lane_xs = settings.lane_xs();
        let player = Player::new(&settings.player, &lane_xs);
        let track = Track::new(
            &settings.track,
            &settings.layout_variants,
            &mut rng,
            &mut events,
        );
        let camera = CameraFollow::new(settings.camera.clone(), Some(player.position));

        log::info!("Started run with seed {}", seed);

        Self {
            seed,
            rng,
            settings,
            run_index: 0,
            time_ticks: 0,
            phase: RunPhase::Running,
            phase_timer: 0.0,
            score: Score::default(),
            best_score: 0,
            player,
            track,
            camera,
            events,
            lane_xs,
        }
    }

    /// Lane centers in world X
    pub fn lane_xs(&self) -> &[f32] {
        &self.lane_xs
    }

    /// Distance covered this run
    pub fn distance(&self) -> f32 {
        self.player.position.z
    }

    /// Where the camera should look (the runner)
    pub fn camera_target(&self) -> Vec3 {
        self.player.position
    }

    /// Take all pending cues
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset after a crash: score to zero, fresh runner and track
    ///
    /// The new track draws from the same RNG stream, so a restart is as
    /// deterministic as the first run.
    pub fn restart(&mut self) {
        self.best_score = self.best_score.max(self.score.points);
        log::info!(
            "Run {} ended: score {}, distance {:.1}, best {}",
            self.run_index,
            self.score.points,
            self.distance(),
            self.best_score
        );

        self.run_index += 1;
        self.score.reset();
        self.phase = RunPhase::Running;
        self.phase_timer = 0.0;
        self.player = Player::new(&self.settings.player, &self.lane_xs);
        self.track = Track::new(
            &self.settings.track,
            &self.settings.layout_variants,
            &mut self.rng,
            &mut self.events,
        );
        self.camera.snap_to(self.player.position);
        self.events.push(GameEvent::RunRestarted {
            run: self.run_index,
        });
    }
}
