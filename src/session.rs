//! Session controller
//!
//! Owns one play area's state and drives it through Idle -> Running -> Idle.
//! The host calls in for every user action (start, stop, hit, difficulty
//! change, manual tuning) and once per animation frame (`on_tick`). The
//! controller answers through the [`Host`]: visuals, frame requests, and
//! [`SessionEvent`]s for the score/status UI.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::platform::Host;
use crate::settings::{DifficultyRegistry, ManualSettings, RawPreset, SimulationConfig, TargetKind};
use crate::sim::{Part, SessionPhase, SessionState, Target, TargetId, lifetime, motion, parts, pool};

/// Notifications for the surrounding UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// New score total
    ScoreChanged(i64),
    /// Free-text status line
    StatusChanged(String),
    /// A target (part) was hit
    TargetHit { id: TargetId, part: Part, delta: i32 },
    /// Active difficulty key (sync radio buttons)
    DifficultyChanged(String),
    /// Whether the start button should be enabled
    StartAvailable(bool),
}

/// One play area's game session
pub struct Session<H: Host> {
    host: H,
    state: SessionState,
    registry: Option<DifficultyRegistry>,
    current_difficulty: String,
    kind: TargetKind,
    config_ready: bool,
}

impl<H: Host> Session<H> {
    /// Session that waits for a difficulty registry before it can start
    pub fn new(host: H, kind: TargetKind, seed: u64) -> Self {
        Self {
            host,
            state: SessionState::new(seed, SimulationConfig::with_kind(kind)),
            registry: None,
            current_difficulty: DEFAULT_DIFFICULTY.to_string(),
            kind,
            config_ready: false,
        }
    }

    /// Manually tuned session: no registry, startable right away
    pub fn manual(host: H, kind: TargetKind, seed: u64) -> Self {
        let mut session = Self::new(host, kind, seed);
        session.current_difficulty = MANUAL_DIFFICULTY.to_string();
        session.config_ready = true;
        session.host.emit(SessionEvent::StartAvailable(true));
        session
    }

    // === Accessors ===

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.state.config
    }

    pub fn targets(&self) -> &[Target] {
        &self.state.targets
    }

    pub fn is_config_ready(&self) -> bool {
        self.config_ready
    }

    pub fn current_difficulty(&self) -> &str {
        &self.current_difficulty
    }

    /// Display label of the active difficulty
    pub fn difficulty_label(&self) -> &str {
        match &self.registry {
            Some(registry) => registry.label(&self.current_difficulty),
            None => &self.current_difficulty,
        }
    }

    // === Configuration ===

    /// Install the fetched difficulty registry (or record why there is none)
    pub fn load_registry(&mut self, result: Result<DifficultyRegistry, ConfigError>) {
        match result {
            Ok(registry) => {
                if !registry.contains(&self.current_difficulty) {
                    if let Some(first) = registry.first_key() {
                        self.current_difficulty = first.to_string();
                    }
                }
                self.registry = Some(registry);
                self.config_ready = true;

                let key = self.current_difficulty.clone();
                self.set_difficulty(&key);
                self.host.emit(SessionEvent::StartAvailable(true));
                let status = format!("Configuration loaded. Difficulty: {}.", self.difficulty_label());
                self.set_status(status);
            }
            Err(e) => {
                log::error!("Difficulty config unavailable: {}", e);
                self.config_ready = false;
                self.host.emit(SessionEvent::StartAvailable(false));
                self.set_status("Failed to load configuration. Please refresh the page to retry.");
            }
        }
    }

    /// Switch to a registry difficulty; false (and no change) for unknown keys
    pub fn set_difficulty(&mut self, key: &str) -> bool {
        let Some(preset) = self.registry.as_ref().and_then(|r| r.get(key)) else {
            log::warn!("Unknown difficulty '{}'", key);
            return false;
        };
        let config = SimulationConfig::resolve(preset, Some(&self.state.config), self.kind);

        log::info!(
            "Difficulty '{}': speed={} lifetime={}s size={} count={}",
            key,
            config.speed,
            config.lifetime_secs,
            config.target_width,
            config.desired_count
        );
        self.current_difficulty = key.to_string();
        self.retune(config);
        self.host
            .emit(SessionEvent::DifficultyChanged(self.current_difficulty.clone()));
        true
    }

    /// Difficulty picked in the UI: like `set_difficulty`, plus status updates
    pub fn select_difficulty(&mut self, key: &str) -> bool {
        if self.config_ready && self.registry.is_none() {
            self.set_status("Difficulty presets are not available here. Use the manual settings.");
            self.host
                .emit(SessionEvent::DifficultyChanged(self.current_difficulty.clone()));
            return false;
        }
        if !self.config_ready {
            self.set_status("Configuration is still loading, please try again shortly.");
            self.host
                .emit(SessionEvent::DifficultyChanged(self.current_difficulty.clone()));
            return false;
        }
        if !self.set_difficulty(key) {
            self.host
                .emit(SessionEvent::DifficultyChanged(self.current_difficulty.clone()));
            return false;
        }

        let label = self.difficulty_label().to_string();
        if self.is_running() {
            self.set_status(format!("Switched to {} difficulty. Keep going!", label));
        } else {
            self.set_status(format!("Selected {} difficulty. Press Start to begin.", label));
        }
        true
    }

    /// Apply values from the manual tuning panel
    pub fn apply_manual_settings(&mut self, settings: &ManualSettings) {
        self.apply_raw(&settings.to_raw());
        self.current_difficulty = MANUAL_DIFFICULTY.to_string();
        self.host
            .emit(SessionEvent::DifficultyChanged(self.current_difficulty.clone()));
        let c = &self.state.config;
        let status = format!(
            "Custom settings applied: speed {}, lifetime {}s, size {}, {} targets.",
            c.speed, c.lifetime_secs, c.target_width, c.desired_count
        );
        self.set_status(status);
    }

    fn apply_raw(&mut self, raw: &RawPreset) {
        let config = SimulationConfig::resolve(raw, Some(&self.state.config), self.kind);
        self.retune(config);
    }

    /// Replace the active config, normalizing live targets when running
    ///
    /// Every live target keeps its heading but takes the new speed and size,
    /// and its clock restarts under the new lifetime.
    pub fn retune(&mut self, config: SimulationConfig) {
        self.state.config = config;
        if !self.state.is_running() {
            return;
        }

        let now = self.host.now_ms();
        let area = self.host.area_size();
        let c = &self.state.config;
        let size = Vec2::new(c.target_width, c.target_height);
        let (speed, lifetime_ms) = (c.speed, c.lifetime_ms());

        for target in self.state.targets.iter_mut() {
            let (_, angle) = crate::cartesian_to_polar(target.vel);
            target.vel = crate::polar_to_cartesian(speed, angle);
            lifetime::reset_clock(target, now, lifetime_ms);
            target.size = size;
            target.clamp_into(area);
            self.host.place_target(target.visual, target.pos, target.size);
        }
        log::debug!("Retuned {} live targets", self.state.targets.len());

        pool::ensure_count(&mut self.state, &mut self.host);
    }

    // === Lifecycle ===

    /// Start (or restart) a run; false if the config has not loaded
    pub fn start(&mut self) -> bool {
        if !self.config_ready {
            self.set_status("Configuration is still loading, please try again shortly.");
            return false;
        }
        if self.is_running() {
            self.stop(false);
        }

        self.state.score = 0;
        self.host.emit(SessionEvent::ScoreChanged(0));

        self.state.phase = SessionPhase::Running;
        self.state.started_at = Some(self.host.now_ms());
        self.state.last_timestamp = None;
        let status = format!(
            "Difficulty: {}. Click as many targets as you can!",
            self.difficulty_label()
        );
        self.set_status(status);
        log::info!("Session started ({})", self.current_difficulty);

        pool::ensure_count(&mut self.state, &mut self.host);
        self.host.request_frame();
        true
    }

    /// Stop the run, destroying every target; false if already idle
    pub fn stop(&mut self, show_summary: bool) -> bool {
        if !self.is_running() {
            return false;
        }

        self.state.phase = SessionPhase::Idle;
        self.host.cancel_frame();
        pool::clear(&mut self.state, &mut self.host);
        self.state.last_timestamp = None;

        let elapsed_secs = self
            .state
            .started_at
            .take()
            .map(|t| (self.host.now_ms() - t) / 1000.0)
            .unwrap_or(0.0);
        log::info!(
            "Session stopped: score {} after {:.1}s",
            self.state.score,
            elapsed_secs
        );

        if show_summary {
            let status = format!("Training stopped. Final score: {}.", self.state.score);
            self.set_status(status);
        }
        true
    }

    /// Per-frame driver
    ///
    /// `timestamp` is the animation-frame time in ms. A callback that fires
    /// after stop is a no-op and does not reschedule.
    pub fn on_tick(&mut self, timestamp: f64) {
        if !self.is_running() {
            log::trace!("Stale frame callback ignored");
            return;
        }

        let delta = match self.state.last_timestamp {
            Some(prev) => ((timestamp - prev) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.state.last_timestamp = Some(timestamp);

        let area = self.host.area_size();
        let now = self.host.now_ms();

        // Move everything first
        motion::integrate(&mut self.state.targets, delta as f32, area);
        for target in &self.state.targets {
            self.host.place_target(target.visual, target.pos, target.size);
        }

        // Then reap the expired
        let expired = lifetime::collect_expired(&self.state.targets, now);
        if !expired.is_empty() {
            log::debug!("{} targets expired", expired.len());
        }
        for id in expired {
            pool::remove(&mut self.state, &mut self.host, id, true);
        }

        // Then refill
        pool::ensure_count(&mut self.state, &mut self.host);
        self.host.request_frame();
    }

    /// A click landed on a target part; false if it was ignored
    pub fn on_hit(&mut self, id: TargetId, part: Part) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(target) = self.state.target(id) else {
            log::debug!("Hit on removed target {:?} ignored", id);
            return false;
        };
        if !parts::has_part(target.kind, part) {
            log::debug!("Target {:?} has no '{}' region", id, part.key());
            return false;
        }

        let delta = part.score(&self.state.config.part_scores);
        self.state.score += i64::from(delta);
        log::debug!("Hit {:?} on {}: {:+}", id, part.key(), delta);

        self.host.emit(SessionEvent::ScoreChanged(self.state.score));
        self.host.emit(SessionEvent::TargetHit { id, part, delta });
        let status = match part {
            Part::Whole => "Nice shot! Keep clicking targets.".to_string(),
            _ => format!("Nice shot! {} {:+}. Keep going.", part.key(), delta),
        };
        self.set_status(status);

        pool::remove(&mut self.state, &mut self.host, id, true);
        true
    }

    /// A click at an area-space point; hits the newest target under it
    pub fn on_click(&mut self, point: Vec2) -> bool {
        if !self.is_running() {
            return false;
        }
        match parts::pick(&self.state.targets, point) {
            Some((id, part)) => self.on_hit(id, part),
            None => false,
        }
    }

    /// Reconcile the population now (e.g. after the play area is laid out)
    pub fn ensure_count(&mut self) {
        pool::ensure_count(&mut self.state, &mut self.host);
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.host.emit(SessionEvent::StatusChanged(message.into()));
    }
}
