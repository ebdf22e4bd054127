//! Target pool: spawning, removal and reconciliation
//!
//! While a session runs the pool keeps exactly `config.desired_count` live
//! targets. Growth spawns new targets at random; shrinking drops the oldest
//! ones. Removal with respawn refills in the same call so a hit or an expiry
//! never leaves the play area short for a frame.

use glam::Vec2;
use rand::Rng;

use super::state::{SessionState, Target, TargetId};
use crate::platform::Host;

/// Bring the live population in line with the desired count
///
/// No-op when idle or when the play area has not been laid out yet.
pub fn ensure_count<H: Host + ?Sized>(state: &mut SessionState, host: &mut H) {
    if !state.is_running() {
        return;
    }
    let area = host.area_size();
    if area.x <= 0.0 || area.y <= 0.0 {
        log::debug!("Play area not laid out ({}x{}), deferring spawn", area.x, area.y);
        return;
    }

    let desired = state.config.desired_count;
    while state.targets.len() < desired {
        spawn(state, host, area);
    }

    if state.targets.len() > desired {
        let excess = state.targets.len() - desired;
        let oldest: Vec<TargetId> = state.targets.iter().take(excess).map(|t| t.id).collect();
        log::debug!("Shrinking pool by {} targets", excess);
        for id in oldest {
            remove(state, host, id, false);
        }
    }
}

/// Spawn one target at a random position with a random heading
pub fn spawn<H: Host + ?Sized>(state: &mut SessionState, host: &mut H, area: Vec2) -> TargetId {
    let config = &state.config;
    let size = Vec2::new(config.target_width, config.target_height);
    let speed = config.speed;
    let lifetime_ms = config.lifetime_ms();
    let kind = config.kind;

    let max = (area - size).max(Vec2::ZERO);
    let pos = Vec2::new(
        state.rng.random::<f32>() * max.x,
        state.rng.random::<f32>() * max.y,
    );
    let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
    let vel = crate::polar_to_cartesian(speed, angle);

    let id = state.next_target_id();
    let visual = host.create_target(id, kind, size);
    host.place_target(visual, pos, size);

    state.targets.push(Target {
        id,
        kind,
        pos,
        vel,
        size,
        created_at: host.now_ms(),
        lifetime_ms,
        visual,
    });
    id
}

/// Remove a target, optionally refilling the pool right away
///
/// Returns false if the target was not live.
pub fn remove<H: Host + ?Sized>(
    state: &mut SessionState,
    host: &mut H,
    id: TargetId,
    respawn: bool,
) -> bool {
    let Some(index) = state.target_index(id) else {
        return false;
    };
    let target = state.targets.remove(index);
    host.destroy_target(target.visual);

    if respawn && state.is_running() {
        ensure_count(state, host);
    }
    true
}

/// Destroy every live target without respawning
pub fn clear<H: Host + ?Sized>(state: &mut SessionState, host: &mut H) {
    for target in state.targets.drain(..) {
        host.destroy_target(target.visual);
    }
}
