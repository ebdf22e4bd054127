//! Aim Trainer - A browser reflex trainer with bouncing, expiring targets
//!
//! Core modules:
//! - `sim`: Target simulation (pool, motion, lifetimes, hit regions)
//! - `session`: Session controller (start/stop, scoring, retuning)
//! - `settings`: Difficulty presets and the settings resolver
//! - `platform`: Host abstraction (browser DOM, headless)
//! - `error`: Configuration errors

pub mod error;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use session::{Session, SessionEvent};
pub use settings::{DifficultyRegistry, ManualSettings, PartScores, RawPreset, SimulationConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Difficulty document fetched at startup (relative to the page)
    pub const CONFIG_PATH: &str = "config.json";
    /// Difficulty selected after the config loads, if present
    pub const DEFAULT_DIFFICULTY: &str = "simple";
    /// Difficulty key reported after manual tuning
    pub const MANUAL_DIFFICULTY: &str = "custom";

    /// Settings defaults (used when a preset field is missing or invalid)
    pub const DEFAULT_TARGET_COUNT: usize = 3;
    pub const DEFAULT_SPEED: f32 = 200.0;
    pub const DEFAULT_LIFETIME_SECS: f32 = 2.0;
    pub const DEFAULT_TARGET_SIZE: f32 = 60.0;

    /// Settings bounds
    pub const MIN_SPEED: f32 = 10.0;
    pub const MAX_SPEED: f32 = 2000.0;
    pub const MIN_LIFETIME_SECS: f32 = 0.1;
    pub const MAX_LIFETIME_SECS: f32 = 60.0;
    pub const MIN_TARGET_SIZE: f32 = 8.0;
    pub const MAX_TARGET_SIZE: f32 = 400.0;
    pub const MAX_TARGET_COUNT: usize = 100;

    /// Humanoid targets are this many widths tall
    pub const HUMANOID_ASPECT: f32 = 2.0;

    /// Default part scores for humanoid targets
    pub const DEFAULT_HEAD_SCORE: i32 = 3;
    pub const DEFAULT_BODY_SCORE: i32 = 2;
    pub const DEFAULT_LIMB_SCORE: i32 = 1;
    /// Score for any hit on a plain circular target
    pub const FLAT_HIT_SCORE: i32 = 1;
}

/// Convert polar (magnitude, angle) to a cartesian vector
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a cartesian vector to polar (magnitude, angle)
#[inline]
pub fn cartesian_to_polar(v: Vec2) -> (f32, f32) {
    (v.length(), v.y.atan2(v.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_round_trip() {
        let v = polar_to_cartesian(400.0, PI / 3.0);
        let (r, theta) = cartesian_to_polar(v);
        assert!((r - 400.0).abs() < 0.01);
        assert!((theta - PI / 3.0).abs() < 0.0001);
    }

    #[test]
    fn test_zero_vector_angle() {
        // atan2(0, 0) is 0, so a stopped target keeps heading right
        let (r, theta) = cartesian_to_polar(Vec2::ZERO);
        assert_eq!(r, 0.0);
        assert_eq!(theta, 0.0);
    }
}
