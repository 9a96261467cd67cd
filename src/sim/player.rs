//! The runner: forward motion, lane changes, jump arc and slide
//!
//! Timed actions are explicit state machines advanced by `update(dt)`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::error::{ConfigError, ensure_non_negative, ensure_positive};

/// Runner movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Constant forward speed (units/s)
    pub forward_speed: f32,
    /// Lateral speed while switching lanes (units/s)
    pub lane_change_speed: f32,
    /// Lane index at run start
    pub start_lane: usize,

    // === Jump ===
    /// Apex height the launch velocity is solved for
    pub jump_height: f32,
    /// Vertical gravity (negative is down)
    pub gravity: f32,
    /// Gravity scale while falling
    pub fall_multiplier: f32,
    /// Gravity scale while rising
    pub low_jump_multiplier: f32,

    // === Slide ===
    pub slide_duration: f32,

    // === Collider ===
    pub half_width: f32,
    pub half_depth: f32,
    /// Standing collider height
    pub height: f32,
    /// Collider height while sliding
    pub slide_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            forward_speed: 10.0,
            lane_change_speed: 60.0,
            start_lane: 1,

            jump_height: 2.5,
            gravity: -9.81,
            fall_multiplier: 1.5,
            low_jump_multiplier: 1.0,

            slide_duration: 0.8,

            half_width: 0.5,
            half_depth: 0.5,
            height: 2.0,
            slide_height: 0.8,
        }
    }
}

impl PlayerConfig {
    /// Magnitude of gravity
    #[inline]
    pub fn gravity_magnitude(&self) -> f32 {
        self.gravity.abs()
    }

    /// Launch velocity for `jump_height`: v = sqrt(2 * g * h)
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * self.gravity_magnitude() * self.jump_height).sqrt()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("forward_speed", self.forward_speed)?;
        ensure_positive("lane_change_speed", self.lane_change_speed)?;
        ensure_positive("jump_height", self.jump_height)?;
        ensure_positive("gravity magnitude", self.gravity_magnitude())?;
        ensure_positive("fall_multiplier", self.fall_multiplier)?;
        ensure_positive("low_jump_multiplier", self.low_jump_multiplier)?;
        ensure_positive("slide_duration", self.slide_duration)?;
        ensure_positive("half_width", self.half_width)?;
        ensure_positive("half_depth", self.half_depth)?;
        ensure_positive("height", self.height)?;
        ensure_positive("slide_height", self.slide_height)?;
        Ok(())
    }
}

/// Vertical state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AirState {
    #[default]
    Grounded,
    /// Moving up, gravity scaled by `low_jump_multiplier`
    Rising,
    /// Moving down, gravity scaled by `fall_multiplier`
    Falling,
    /// Touched down this step, grounded next step
    Landed,
}

impl AirState {
    pub fn is_airborne(self) -> bool {
        matches!(self, AirState::Rising | AirState::Falling)
    }
}

/// Slide state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum SlideState {
    #[default]
    Standing,
    Sliding {
        remaining: f32,
    },
}

/// Things that happened during one `update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    pub landed: bool,
    pub slide_ended: bool,
    pub lane_reached: bool,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lane being run in (or moved toward)
    pub lane: usize,
    /// Feet position: x lateral, y height above track, z distance
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub air: AirState,
    pub slide: SlideState,
    /// Moving laterally toward `lane`
    pub changing_lanes: bool,
}

impl Player {
    /// Place the runner on its start lane at `z = 0`
    pub fn new(config: &PlayerConfig, lane_xs: &[f32]) -> Self {
        let lane = config.start_lane.min(lane_xs.len().saturating_sub(1));
        let x = lane_xs.get(lane).copied().unwrap_or(0.0);
        Self {
            lane,
            position: Vec3::new(x, 0.0, 0.0),
            vertical_velocity: 0.0,
            air: AirState::Grounded,
            slide: SlideState::Standing,
            changing_lanes: false,
        }
    }

    pub fn is_grounded(&self) -> bool {
        !self.air.is_airborne()
    }

    pub fn is_sliding(&self) -> bool {
        matches!(self.slide, SlideState::Sliding { .. })
    }

    /// Shift one lane left (-1) or right (+1)
    ///
    /// Ignored mid-change; clamped to the outer lanes. Returns whether the
    /// target lane changed.
    pub fn request_lane_change(&mut self, direction: i32, lane_count: usize) -> bool {
        if self.changing_lanes || direction == 0 || lane_count == 0 {
            return false;
        }
        let target =
            (self.lane as i64 + direction.signum() as i64).clamp(0, lane_count as i64 - 1) as usize;
        if target == self.lane {
            return false;
        }
        self.lane = target;
        self.changing_lanes = true;
        true
    }

    /// Start a jump from the ground (cancels a slide)
    pub fn jump(&mut self, config: &PlayerConfig) -> bool {
        if !self.is_grounded() {
            return false;
        }
        self.slide = SlideState::Standing;
        self.vertical_velocity = config.jump_velocity();
        self.air = AirState::Rising;
        true
    }

    /// Start a slide (only on the ground, not while already sliding)
    pub fn start_slide(&mut self, config: &PlayerConfig) -> bool {
        if !self.is_grounded() || self.is_sliding() {
            return false;
        }
        self.slide = SlideState::Sliding {
            remaining: config.slide_duration,
        };
        true
    }

    /// Advance movement by one step
    pub fn update(&mut self, dt: f32, config: &PlayerConfig, lane_xs: &[f32]) -> PlayerStep {
        let mut step = PlayerStep::default();

        self.position.z += config.forward_speed * dt;

        if self.changing_lanes {
            if let Some(&target_x) = lane_xs.get(self.lane) {
                let max_move = config.lane_change_speed * dt;
                let delta = target_x - self.position.x;
                if delta.abs() <= max_move {
                    // Snap instead of overshooting
                    self.position.x = target_x;
                    self.changing_lanes = false;
                    step.lane_reached = true;
                } else {
                    self.position.x += max_move * delta.signum();
                }
            } else {
                self.changing_lanes = false;
            }
        }

        let g = config.gravity_magnitude();
        match self.air {
            AirState::Grounded => {}
            AirState::Landed => self.air = AirState::Grounded,
            AirState::Rising => {
                self.vertical_velocity -= g * config.low_jump_multiplier * dt;
                self.position.y += self.vertical_velocity * dt;
                if self.vertical_velocity <= 0.0 {
                    self.air = AirState::Falling;
                }
            }
            AirState::Falling => {
                self.vertical_velocity -= g * config.fall_multiplier * dt;
                self.position.y += self.vertical_velocity * dt;
                if self.position.y <= 0.0 {
                    self.position.y = 0.0;
                    self.vertical_velocity = 0.0;
                    self.air = AirState::Landed;
                    step.landed = true;
                }
            }
        }

        if let SlideState::Sliding { remaining } = self.slide {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                self.slide = SlideState::Standing;
                step.slide_ended = true;
            } else {
                self.slide = SlideState::Sliding { remaining };
            }
        }

        step
    }

    /// Current collider height
    pub fn collider_height(&self, config: &PlayerConfig) -> f32 {
        if self.is_sliding() {
            config.slide_height
        } else {
            config.height
        }
    }

    /// World-space collider
    pub fn bounds(&self, config: &PlayerConfig) -> Aabb {
        let p = self.position;
        Aabb::new(
            Vec3::new(p.x - config.half_width, p.y, p.z - config.half_depth),
            Vec3::new(
                p.x + config.half_width,
                p.y + self.collider_height(config),
                p.z + config.half_depth,
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANES: [f32; 3] = [-2.0, 0.0, 2.0];
    const DT: f32 = 1.0 / 50.0;

    fn player() -> (Player, PlayerConfig) {
        let config = PlayerConfig::default();
        (Player::new(&config, &LANES), config)
    }

    #[test]
    fn test_starts_on_start_lane() {
        let (p, _) = player();
        assert_eq!(p.lane, 1);
        assert_eq!(p.position, Vec3::ZERO);
        assert!(p.is_grounded());
    }

    #[test]
    fn test_start_lane_clamped() {
        let config = PlayerConfig {
            start_lane: 9,
            ..Default::default()
        };
        let p = Player::new(&config, &LANES);
        assert_eq!(p.lane, 2);
        assert_eq!(p.position.x, 2.0);
    }

    #[test]
    fn test_forward_motion() {
        let (mut p, config) = player();
        for _ in 0..50 {
            p.update(DT, &config, &LANES);
        }
        assert!((p.position.z - config.forward_speed).abs() < 0.01);
    }

    #[test]
    fn test_lane_change_clamps_and_blocks_mid_change() {
        let (mut p, config) = player();
        assert!(p.request_lane_change(1, 3));
        assert_eq!(p.lane, 2);
        // Mid-change requests are ignored
        assert!(!p.request_lane_change(-1, 3));
        assert_eq!(p.lane, 2);

        let mut reached = false;
        for _ in 0..50 {
            reached |= p.update(DT, &config, &LANES).lane_reached;
        }
        assert!(reached);
        assert_eq!(p.position.x, 2.0);
        assert!(!p.changing_lanes);

        // Already on the rightmost lane
        assert!(!p.request_lane_change(1, 3));
        assert_eq!(p.lane, 2);
    }

    #[test]
    fn test_lane_change_left_edge() {
        let config = PlayerConfig {
            start_lane: 0,
            ..Default::default()
        };
        let mut p = Player::new(&config, &LANES);
        assert!(!p.request_lane_change(-1, 3));
        assert_eq!(p.lane, 0);
    }

    #[test]
    fn test_jump_arc_phases() {
        let (mut p, config) = player();
        assert!(p.jump(&config));
        assert_eq!(p.air, AirState::Rising);
        // No double jump
        assert!(!p.jump(&config));

        let mut apex: f32 = 0.0;
        let mut saw_falling = false;
        let mut landed = false;
        for _ in 0..200 {
            let step = p.update(DT, &config, &LANES);
            apex = apex.max(p.position.y);
            saw_falling |= p.air == AirState::Falling;
            if step.landed {
                landed = true;
                assert_eq!(p.air, AirState::Landed);
                break;
            }
        }
        assert!(saw_falling);
        assert!(landed);
        assert!(apex > 1.0);
        assert_eq!(p.position.y, 0.0);

        p.update(DT, &config, &LANES);
        assert_eq!(p.air, AirState::Grounded);
    }

    #[test]
    fn test_jump_velocity_formula() {
        let config = PlayerConfig {
            jump_height: 2.0,
            gravity: -10.0,
            ..Default::default()
        };
        assert!((config.jump_velocity() - 40.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_slide_expires() {
        let (mut p, config) = player();
        assert!(p.start_slide(&config));
        assert!(!p.start_slide(&config));
        assert_eq!(p.collider_height(&config), config.slide_height);

        let steps = (config.slide_duration / DT).ceil() as usize + 1;
        let mut ended = false;
        for _ in 0..steps {
            ended |= p.update(DT, &config, &LANES).slide_ended;
        }
        assert!(ended);
        assert!(!p.is_sliding());
        assert_eq!(p.collider_height(&config), config.height);
    }

    #[test]
    fn test_jump_cancels_slide_and_no_slide_midair() {
        let (mut p, config) = player();
        p.start_slide(&config);
        assert!(p.jump(&config));
        assert!(!p.is_sliding());
        assert!(!p.start_slide(&config));
    }
}
