//! Lane Runner - a three-lane endless runner simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (segment layouts, runner, track, run state)
//! - `input`: Swipe gestures to runner intents
//! - `camera`: Smoothed chase camera
//! - `settings`: Serializable tuning for all of the above
//!
//! Rendering, audio and input devices belong to the host. It calls `sim::tick`
//! at `consts::SIM_DT`, feeds it swipes, and plays the `GameEvent` cues.

pub mod camera;
pub mod error;
pub mod input;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Points per coin
    pub const COIN_VALUE: u32 = 5;

    /// Screen-space drag (pixels) before a touch counts as a swipe
    pub const MIN_SWIPE_DISTANCE: f32 = 50.0;
}
