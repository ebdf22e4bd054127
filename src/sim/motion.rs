//! Target motion with elastic wall reflection
//!
//! Each axis is handled independently: a target that crosses an edge while
//! moving toward it is clamped onto the edge and its velocity on that axis is
//! negated. Corner hits simply reflect both axes. Speed is never damped.

use glam::Vec2;

use super::state::Target;

/// Reflect one axis against [0, max]
///
/// Returns the corrected (position, velocity).
#[inline]
pub fn reflect_axis(pos: f32, vel: f32, max: f32) -> (f32, f32) {
    if pos <= 0.0 && vel < 0.0 {
        (0.0, -vel)
    } else if pos >= max && vel > 0.0 {
        (max, -vel)
    } else {
        (pos, vel)
    }
}

/// Advance every target by `delta` seconds inside `area`
pub fn integrate(targets: &mut [Target], delta: f32, area: Vec2) {
    for target in targets.iter_mut() {
        step(target, delta, area);
    }
}

/// Advance one target
pub fn step(target: &mut Target, delta: f32, area: Vec2) {
    target.pos += target.vel * delta;

    let max = target.max_pos(area);
    let (x, vx) = reflect_axis(target.pos.x, target.vel.x, max.x);
    let (y, vy) = reflect_axis(target.pos.y, target.vel.y, max.y);
    // The area can shrink under a target already heading back inside
    target.pos = Vec2::new(x, y).clamp(Vec2::ZERO, max);
    target.vel = Vec2::new(vx, vy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::VisualHandle;
    use crate::settings::TargetKind;
    use crate::sim::TargetId;
    use proptest::prelude::*;

    fn target(pos: Vec2, vel: Vec2) -> Target {
        Target {
            id: TargetId(1),
            kind: TargetKind::Circle,
            pos,
            vel,
            size: Vec2::splat(60.0),
            created_at: 0.0,
            lifetime_ms: 2000.0,
            visual: VisualHandle(1),
        }
    }

    const AREA: Vec2 = Vec2::new(300.0, 300.0);

    #[test]
    fn test_free_motion() {
        let mut t = target(Vec2::new(100.0, 100.0), Vec2::new(200.0, -100.0));
        step(&mut t, 0.1, AREA);
        assert!((t.pos.x - 120.0).abs() < 0.001);
        assert!((t.pos.y - 90.0).abs() < 0.001);
        assert_eq!(t.vel, Vec2::new(200.0, -100.0));
    }

    #[test]
    fn test_zero_delta_is_still() {
        let mut t = target(Vec2::new(100.0, 100.0), Vec2::new(200.0, 200.0));
        step(&mut t, 0.0, AREA);
        assert_eq!(t.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_reflect_left_and_top() {
        let mut t = target(Vec2::new(5.0, 3.0), Vec2::new(-100.0, -100.0));
        step(&mut t, 0.1, AREA);
        assert_eq!(t.pos, Vec2::ZERO);
        assert_eq!(t.vel, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_reflect_right_and_bottom() {
        // max = 300 - 60 = 240
        let mut t = target(Vec2::new(235.0, 238.0), Vec2::new(100.0, 50.0));
        step(&mut t, 0.1, AREA);
        assert_eq!(t.pos, Vec2::new(240.0, 240.0));
        assert_eq!(t.vel, Vec2::new(-100.0, -50.0));
    }

    #[test]
    fn test_moving_away_from_edge_is_not_reflected() {
        // On the left edge but already heading right
        let (pos, vel) = reflect_axis(0.0, 50.0, 240.0);
        assert_eq!((pos, vel), (0.0, 50.0));
        let (pos, vel) = reflect_axis(240.0, -50.0, 240.0);
        assert_eq!((pos, vel), (240.0, -50.0));
    }

    #[test]
    fn test_target_larger_than_area() {
        let mut t = target(Vec2::ZERO, Vec2::new(100.0, 100.0));
        step(&mut t, 0.5, Vec2::new(30.0, 30.0));
        assert_eq!(t.pos, Vec2::ZERO);
        assert_eq!(t.vel, Vec2::new(-100.0, -100.0));
    }

    #[test]
    fn test_shrunk_area_pulls_target_inside() {
        // Already moving inward, far outside the new bounds
        let mut t = target(Vec2::new(500.0, 500.0), Vec2::new(-200.0, -200.0));
        step(&mut t, 0.016, AREA);
        assert_eq!(t.pos, Vec2::new(240.0, 240.0));
        // Heading is kept: it keeps moving inward next step
        assert_eq!(t.vel, Vec2::new(-200.0, -200.0));
        step(&mut t, 0.1, AREA);
        assert!(t.pos.x < 240.0 && t.pos.y < 240.0);
    }

    proptest! {
        #[test]
        fn prop_stays_inside_area(
            x in 0.0f32..240.0,
            y in 0.0f32..240.0,
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 10.0f32..2000.0,
            deltas in prop::collection::vec(0.0f32..0.1, 1..60),
        ) {
            let mut t = target(Vec2::new(x, y), crate::polar_to_cartesian(speed, angle));
            for delta in deltas {
                step(&mut t, delta, AREA);
                prop_assert!(t.pos.x >= 0.0 && t.pos.x <= 240.0);
                prop_assert!(t.pos.y >= 0.0 && t.pos.y <= 240.0);
            }
        }

        #[test]
        fn prop_stays_inside_changing_area(
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 10.0f32..2000.0,
            steps in prop::collection::vec((0.0f32..0.1, 20.0f32..800.0, 20.0f32..800.0), 1..60),
        ) {
            let mut t = target(Vec2::new(120.0, 120.0), crate::polar_to_cartesian(speed, angle));
            for (delta, w, h) in steps {
                let area = Vec2::new(w, h);
                step(&mut t, delta, area);
                let max = t.max_pos(area);
                prop_assert!(t.pos.x >= 0.0 && t.pos.x <= max.x);
                prop_assert!(t.pos.y >= 0.0 && t.pos.y <= max.y);
            }
        }

        #[test]
        fn prop_speed_conserved(
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 10.0f32..2000.0,
            deltas in prop::collection::vec(0.0f32..0.1, 1..60),
        ) {
            let mut t = target(Vec2::new(120.0, 120.0), crate::polar_to_cartesian(speed, angle));
            for delta in deltas {
                step(&mut t, delta, AREA);
            }
            prop_assert!((t.speed() - speed).abs() < speed * 1e-4);
        }
    }
}
