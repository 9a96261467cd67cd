//! Smoothed chase camera
//!
//! Sits behind and above the runner and eases toward it every frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ensure_non_negative};

/// Camera follow tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Position relative to the target
    pub offset: Vec3,
    /// Lerp rate (fraction per second, clamped per frame)
    pub smooth_speed: f32,
    pub look_at_target: bool,
    /// Aim point relative to the target
    pub look_offset: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 3.5, -6.0),
            smooth_speed: 10.0,
            look_at_target: true,
            look_offset: Vec3::new(0.0, 1.0, 0.0), // A bit above the runner's feet
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("smooth_speed", self.smooth_speed)
    }
}

/// Camera state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFollow {
    pub config: CameraConfig,
    pub position: Vec3,
    /// Where the camera is aimed, if anywhere
    pub look_at: Option<Vec3>,
    #[serde(skip)]
    warned_missing_target: bool,
}

impl CameraFollow {
    /// Start at the follow position of `target`, or at the origin without one
    pub fn new(config: CameraConfig, target: Option<Vec3>) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            look_at: None,
            config,
            warned_missing_target: false,
        };
        match target {
            Some(t) => camera.snap_to(t),
            None => camera.warn_missing_target(),
        }
        camera
    }

    /// Jump straight to the follow position (no smoothing)
    pub fn snap_to(&mut self, target: Vec3) {
        self.position = target + self.config.offset;
        self.aim(target);
    }

    /// Ease toward `target`; without a target this does nothing
    pub fn update(&mut self, target: Option<Vec3>, dt: f32) {
        let Some(target) = target else {
            self.warn_missing_target();
            return;
        };
        let desired = target + self.config.offset;
        let t = (self.config.smooth_speed * dt).clamp(0.0, 1.0);
        self.position = self.position.lerp(desired, t);
        self.aim(target);
    }

    /// Unit view direction, if aimed
    pub fn forward(&self) -> Option<Vec3> {
        self.look_at
            .map(|p| (p - self.position).normalize_or_zero())
            .filter(|d| *d != Vec3::ZERO)
    }

    fn aim(&mut self, target: Vec3) {
        self.look_at = self
            .config
            .look_at_target
            .then_some(target + self.config.look_offset);
    }

    fn warn_missing_target(&mut self) {
        if !self.warned_missing_target {
            log::warn!("Camera has no target to follow");
            self.warned_missing_target = true;
        }
    }
}
