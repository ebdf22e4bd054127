//! Session state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::platform::VisualHandle;
use crate::settings::{SimulationConfig, TargetKind};

/// Arena id of a target (allocated in increasing order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionPhase {
    /// No simulation loop; no live targets
    #[default]
    Idle,
    /// Targets moving, frames scheduled
    Running,
}

/// A moving, expiring target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Velocity (pixels/s)
    pub vel: Vec2,
    /// Bounding box (width, height)
    pub size: Vec2,
    /// Host time at spawn (or last retune), ms
    pub created_at: f64,
    pub lifetime_ms: f64,
    pub visual: VisualHandle,
}

impl Target {
    /// Largest valid top-left position inside an area
    #[inline]
    pub fn max_pos(&self, area: Vec2) -> Vec2 {
        (area - self.size).max(Vec2::ZERO)
    }

    /// Pull the target back inside the area (after a resize)
    pub fn clamp_into(&mut self, area: Vec2) {
        self.pos = self.pos.clamp(Vec2::ZERO, self.max_pos(area));
    }

    pub fn age_ms(&self, now: f64) -> f64 {
        now - self.created_at
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Point inside the bounding box (area coordinates)
    pub fn contains(&self, point: Vec2) -> bool {
        let local = point - self.pos;
        local.x >= 0.0 && local.y >= 0.0 && local.x <= self.size.x && local.y <= self.size.y
    }
}

/// Complete state of one play area
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Running score (part scores may be negative)
    pub score: i64,
    /// Host time when the current run started
    pub started_at: Option<f64>,
    /// Active config, replaced wholesale on retune
    pub config: SimulationConfig,
    /// Live targets, oldest first
    pub targets: Vec<Target>,
    /// Timestamp of the previous tick (None before the first tick of a run)
    pub last_timestamp: Option<f64>,
    /// Spawn RNG
    pub rng: Pcg32,
    /// Next target ID
    next_id: u32,
}

impl SessionState {
    pub fn new(seed: u64, config: SimulationConfig) -> Self {
        Self {
            phase: SessionPhase::Idle,
            score: 0,
            started_at: None,
            config,
            targets: Vec::new(),
            last_timestamp: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new target ID
    pub fn next_target_id(&mut self) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn target_index(&self, id: TargetId) -> Option<usize> {
        self.targets.iter().position(|t| t.id == id)
    }

    pub fn live_count(&self) -> usize {
        self.targets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(pos: Vec2, size: Vec2) -> Target {
        Target {
            id: TargetId(1),
            kind: TargetKind::Circle,
            pos,
            vel: Vec2::new(3.0, 4.0),
            size,
            created_at: 100.0,
            lifetime_ms: 2000.0,
            visual: VisualHandle(1),
        }
    }

    #[test]
    fn test_ids_increase() {
        let mut state = SessionState::new(1, SimulationConfig::default());
        let a = state.next_target_id();
        let b = state.next_target_id();
        assert!(b > a);
        assert_eq!(state.phase, SessionPhase::Idle);
    }

    #[test]
    fn test_clamp_into_shrunk_area() {
        let mut t = target(Vec2::new(250.0, 280.0), Vec2::splat(60.0));
        t.clamp_into(Vec2::new(300.0, 300.0));
        assert_eq!(t.pos, Vec2::new(240.0, 240.0));

        // Area smaller than the target pins it to the origin
        t.clamp_into(Vec2::new(40.0, 40.0));
        assert_eq!(t.pos, Vec2::ZERO);
    }

    #[test]
    fn test_contains_and_speed() {
        let t = target(Vec2::new(10.0, 10.0), Vec2::splat(20.0));
        assert!(t.contains(Vec2::new(15.0, 29.0)));
        assert!(!t.contains(Vec2::new(31.0, 15.0)));
        assert!((t.speed() - 5.0).abs() < 0.0001);
        assert_eq!(t.age_ms(600.0), 500.0);
    }
}
