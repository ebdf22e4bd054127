//! Clickable regions of a target
//!
//! Regions are rectangles expressed as fractions of the target's bounding
//! box, so they follow the target through resizes. A circle has a single
//! region; a humanoid has a head, a torso, two arms and two legs (arms and
//! legs score as limbs).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Target, TargetId};
use crate::consts::FLAT_HIT_SCORE;
use crate::settings::{PartScores, TargetKind};

/// Part-key of a clickable region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Part {
    /// The whole target (plain circles)
    Whole,
    Head,
    Body,
    Limb,
}

impl Part {
    /// Part-key string (also the CSS class suffix)
    pub fn key(&self) -> &'static str {
        match self {
            Part::Whole => "whole",
            Part::Head => "head",
            Part::Body => "body",
            Part::Limb => "limb",
        }
    }

    /// Score for hitting this part
    pub fn score(&self, scores: &PartScores) -> i32 {
        match self {
            Part::Whole => FLAT_HIT_SCORE,
            Part::Head => scores.head,
            Part::Body => scores.body,
            Part::Limb => scores.limb,
        }
    }
}

/// A rectangle inside the unit bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartRegion {
    pub part: Part,
    /// Top-left, as a fraction of the bounding box
    pub min: Vec2,
    /// Size, as a fraction of the bounding box
    pub extent: Vec2,
}

impl PartRegion {
    const fn new(part: Part, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            part,
            min: Vec2::new(x, y),
            extent: Vec2::new(w, h),
        }
    }

    /// Unit-space point inside this region
    pub fn contains(&self, unit: Vec2) -> bool {
        let max = self.min + self.extent;
        unit.x >= self.min.x && unit.y >= self.min.y && unit.x <= max.x && unit.y <= max.y
    }
}

const CIRCLE_REGIONS: [PartRegion; 1] = [PartRegion::new(Part::Whole, 0.0, 0.0, 1.0, 1.0)];

// Humanoid box is 1 wide by 2 tall in world units, so a 0.4 x 0.2 head is square.
// Head first: overlapping edges resolve to the higher-value part.
const HUMANOID_REGIONS: [PartRegion; 6] = [
    PartRegion::new(Part::Head, 0.30, 0.00, 0.40, 0.20),
    PartRegion::new(Part::Body, 0.25, 0.20, 0.50, 0.40),
    PartRegion::new(Part::Limb, 0.00, 0.20, 0.25, 0.35),
    PartRegion::new(Part::Limb, 0.75, 0.20, 0.25, 0.35),
    PartRegion::new(Part::Limb, 0.25, 0.60, 0.23, 0.40),
    PartRegion::new(Part::Limb, 0.52, 0.60, 0.23, 0.40),
];

/// Clickable regions for a target kind
pub fn regions(kind: TargetKind) -> &'static [PartRegion] {
    match kind {
        TargetKind::Circle => &CIRCLE_REGIONS,
        TargetKind::Humanoid => &HUMANOID_REGIONS,
    }
}

/// Whether a target of this kind has a region mapped to `part`
pub fn has_part(kind: TargetKind, part: Part) -> bool {
    regions(kind).iter().any(|r| r.part == part)
}

/// Part of `target` under an area-space point
pub fn hit_test(target: &Target, point: Vec2) -> Option<Part> {
    if !target.contains(point) || target.size.x <= 0.0 || target.size.y <= 0.0 {
        return None;
    }
    let unit = (point - target.pos) / target.size;
    regions(target.kind)
        .iter()
        .find(|r| r.contains(unit))
        .map(|r| r.part)
}

/// Topmost (newest) target part under a point
pub fn pick(targets: &[Target], point: Vec2) -> Option<(TargetId, Part)> {
    targets
        .iter()
        .rev()
        .find_map(|t| hit_test(t, point).map(|part| (t.id, part)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::VisualHandle;

    fn humanoid(id: u32, pos: Vec2) -> Target {
        Target {
            id: TargetId(id),
            kind: TargetKind::Humanoid,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(50.0, 100.0),
            created_at: 0.0,
            lifetime_ms: 1000.0,
            visual: VisualHandle(id),
        }
    }

    #[test]
    fn test_humanoid_parts() {
        let t = humanoid(1, Vec2::new(100.0, 100.0));
        assert_eq!(hit_test(&t, Vec2::new(125.0, 105.0)), Some(Part::Head));
        assert_eq!(hit_test(&t, Vec2::new(125.0, 140.0)), Some(Part::Body));
        assert_eq!(hit_test(&t, Vec2::new(103.0, 130.0)), Some(Part::Limb));
        assert_eq!(hit_test(&t, Vec2::new(115.0, 190.0)), Some(Part::Limb));
        // Beside the head: inside the box but no region
        assert_eq!(hit_test(&t, Vec2::new(102.0, 105.0)), None);
        // Outside the box
        assert_eq!(hit_test(&t, Vec2::new(90.0, 105.0)), None);
    }

    #[test]
    fn test_circle_single_region() {
        let mut t = humanoid(1, Vec2::ZERO);
        t.kind = TargetKind::Circle;
        t.size = Vec2::splat(40.0);
        assert_eq!(hit_test(&t, Vec2::new(1.0, 39.0)), Some(Part::Whole));
        assert!(has_part(TargetKind::Circle, Part::Whole));
        assert!(!has_part(TargetKind::Circle, Part::Head));
        assert!(!has_part(TargetKind::Humanoid, Part::Whole));
    }

    #[test]
    fn test_pick_prefers_newest() {
        let targets = vec![humanoid(1, Vec2::ZERO), humanoid(2, Vec2::ZERO)];
        assert_eq!(pick(&targets, Vec2::new(25.0, 5.0)), Some((TargetId(2), Part::Head)));
        assert_eq!(pick(&targets, Vec2::new(400.0, 400.0)), None);
    }

    #[test]
    fn test_part_scores() {
        let scores = PartScores { head: 3, body: 2, limb: -1 };
        assert_eq!(Part::Head.score(&scores), 3);
        assert_eq!(Part::Limb.score(&scores), -1);
        assert_eq!(Part::Whole.score(&scores), FLAT_HIT_SCORE);
    }
}
