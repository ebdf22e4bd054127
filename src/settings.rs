//! Difficulty presets and the settings resolver
//!
//! Raw presets come from the difficulty document (`config.json`) or from the
//! manual tuning inputs. Both are resolved into a [`SimulationConfig`] that
//! never fails: bad fields degrade to the previous value or a default so the
//! player is never blocked by a broken config.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::*;
use crate::error::ConfigError;

/// Target shape for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetKind {
    /// Single circular hit region, flat score
    #[default]
    Circle,
    /// Segmented humanoid with per-part scores
    Humanoid,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Circle => "circle",
            TargetKind::Humanoid => "humanoid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "circle" | "plain" => Some(TargetKind::Circle),
            "humanoid" | "segmented" | "body" => Some(TargetKind::Humanoid),
            _ => None,
        }
    }

    /// Bounding box height for a target of the given width
    pub fn height_for(&self, width: f32) -> f32 {
        match self {
            TargetKind::Circle => width,
            TargetKind::Humanoid => width * HUMANOID_ASPECT,
        }
    }
}

/// Score per humanoid part (may be negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartScores {
    pub head: i32,
    pub body: i32,
    pub limb: i32,
}

impl Default for PartScores {
    fn default() -> Self {
        Self {
            head: DEFAULT_HEAD_SCORE,
            body: DEFAULT_BODY_SCORE,
            limb: DEFAULT_LIMB_SCORE,
        }
    }
}

/// A preset as written in the difficulty document
///
/// Every field is kept as raw JSON so that strings, nulls and junk can be
/// coerced (or rejected) per field instead of failing the whole entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPreset {
    #[serde(default)]
    pub label: Option<Value>,
    #[serde(default)]
    pub speed: Option<Value>,
    #[serde(default)]
    pub lifetime: Option<Value>,
    #[serde(default)]
    pub size: Option<Value>,
    #[serde(default)]
    pub count: Option<Value>,
    #[serde(default)]
    pub scores: Option<Value>,
}

impl RawPreset {
    /// Display label, if the preset has a non-empty one
    pub fn label(&self) -> Option<&str> {
        self.label
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Values typed into the manual tuning panel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualSettings {
    pub speed: Option<f64>,
    pub lifetime: Option<f64>,
    pub size: Option<f64>,
    pub count: Option<f64>,
    pub head: Option<f64>,
    pub body: Option<f64>,
    pub limb: Option<f64>,
}

impl ManualSettings {
    /// Express the manual input as a raw preset so it resolves like any other
    pub fn to_raw(&self) -> RawPreset {
        let num = |v: Option<f64>| v.map(Value::from);
        let mut scores = serde_json::Map::new();
        for (key, value) in [("head", self.head), ("body", self.body), ("limb", self.limb)] {
            if let Some(v) = value {
                scores.insert(key.to_string(), Value::from(v));
            }
        }
        RawPreset {
            label: None,
            speed: num(self.speed),
            lifetime: num(self.lifetime),
            size: num(self.size),
            count: num(self.count),
            scores: (!scores.is_empty()).then_some(Value::Object(scores)),
        }
    }
}

/// Resolved, bounded simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Target speed (pixels/s)
    pub speed: f32,
    /// Target lifetime (seconds)
    pub lifetime_secs: f32,
    pub target_width: f32,
    pub target_height: f32,
    /// Live targets to keep on screen
    pub desired_count: usize,
    pub part_scores: PartScores,
    pub kind: TargetKind,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::with_kind(TargetKind::Circle)
    }
}

impl SimulationConfig {
    /// Hard-coded defaults for a target kind
    pub fn with_kind(kind: TargetKind) -> Self {
        Self {
            speed: DEFAULT_SPEED,
            lifetime_secs: DEFAULT_LIFETIME_SECS,
            target_width: DEFAULT_TARGET_SIZE,
            target_height: kind.height_for(DEFAULT_TARGET_SIZE),
            desired_count: DEFAULT_TARGET_COUNT,
            part_scores: PartScores::default(),
            kind,
        }
    }

    /// Merge a raw preset over the previous config (or defaults)
    pub fn resolve(raw: &RawPreset, previous: Option<&SimulationConfig>, kind: TargetKind) -> Self {
        let fallback = previous
            .cloned()
            .unwrap_or_else(|| Self::with_kind(kind));

        let speed = positive(raw.speed.as_ref())
            .map(|v| v.clamp(MIN_SPEED, MAX_SPEED))
            .unwrap_or(fallback.speed);
        let lifetime_secs = positive(raw.lifetime.as_ref())
            .map(|v| v.clamp(MIN_LIFETIME_SECS, MAX_LIFETIME_SECS))
            .unwrap_or(fallback.lifetime_secs);
        let target_width = positive(raw.size.as_ref())
            .map(|v| v.clamp(MIN_TARGET_SIZE, MAX_TARGET_SIZE))
            .unwrap_or(fallback.target_width);

        // Count never inherits the previous value: a bad count means the default
        let desired_count = raw
            .count
            .as_ref()
            .and_then(coerce_number)
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| (v.ceil() as usize).clamp(1, MAX_TARGET_COUNT))
            .unwrap_or(DEFAULT_TARGET_COUNT);

        Self {
            speed,
            lifetime_secs,
            target_width,
            target_height: kind.height_for(target_width),
            desired_count,
            part_scores: resolve_scores(raw.scores.as_ref()),
            kind,
        }
    }

    /// Lifetime in milliseconds (target clocks run on host milliseconds)
    pub fn lifetime_ms(&self) -> f64 {
        f64::from(self.lifetime_secs) * 1000.0
    }
}

/// Overlay raw score overrides on the default part scores
fn resolve_scores(raw: Option<&Value>) -> PartScores {
    let mut scores = PartScores::default();
    let Some(Value::Object(map)) = raw else {
        return scores;
    };

    let pick = |keys: &[&str]| {
        keys.iter()
            .filter_map(|k| map.get(*k))
            .filter_map(coerce_number)
            .find(|v| v.is_finite())
            .map(|v| v.round() as i32)
    };

    if let Some(v) = pick(&["head"]) {
        scores.head = v;
    }
    if let Some(v) = pick(&["body"]) {
        scores.body = v;
    }
    if let Some(v) = pick(&["limb", "four", "limbs"]) {
        scores.limb = v;
    }
    scores
}

/// Finite positive number from a raw field, as f32
fn positive(value: Option<&Value>) -> Option<f32> {
    value
        .and_then(coerce_number)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v as f32)
}

/// Loose numeric coercion: numbers, numeric strings and booleans
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Difficulty key -> raw preset, in document order
#[derive(Debug, Clone, Default)]
pub struct DifficultyRegistry {
    entries: Vec<(String, RawPreset)>,
}

impl DifficultyRegistry {
    /// Parse the difficulty document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(ConfigError::NotAnObject);
        };

        let mut entries = Vec::with_capacity(map.len());
        for (key, raw) in map {
            if !raw.is_object() {
                log::warn!("Skipping difficulty '{}': preset is not an object", key);
                continue;
            }
            match serde_json::from_value::<RawPreset>(raw) {
                Ok(preset) => entries.push((key, preset)),
                Err(e) => log::warn!("Skipping difficulty '{}': {}", key, e),
            }
        }

        if entries.is_empty() {
            return Err(ConfigError::Empty);
        }

        log::info!("Loaded {} difficulty presets", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&RawPreset> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Display label for a difficulty (falls back to the key itself)
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).and_then(RawPreset::label).unwrap_or(key)
    }

    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(k, _)| k.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawPreset {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolve_full_preset() {
        let preset = raw(json!({
            "label": "Hard", "speed": 400, "lifetime": 1.5, "size": 40, "count": 5
        }));
        let config = SimulationConfig::resolve(&preset, None, TargetKind::Circle);
        assert_eq!(config.speed, 400.0);
        assert_eq!(config.lifetime_secs, 1.5);
        assert_eq!(config.target_width, 40.0);
        assert_eq!(config.target_height, 40.0);
        assert_eq!(config.desired_count, 5);
        assert_eq!(config.part_scores, PartScores::default());
    }

    #[test]
    fn test_resolve_falls_back_to_previous() {
        let previous = SimulationConfig {
            speed: 321.0,
            lifetime_secs: 4.0,
            target_width: 77.0,
            target_height: 77.0,
            desired_count: 9,
            ..SimulationConfig::default()
        };
        let preset = raw(json!({ "speed": "fast", "lifetime": -2, "size": 0 }));
        let config = SimulationConfig::resolve(&preset, Some(&previous), TargetKind::Circle);
        assert_eq!(config.speed, 321.0);
        assert_eq!(config.lifetime_secs, 4.0);
        assert_eq!(config.target_width, 77.0);
        // Missing count goes to the default, not the previous value
        assert_eq!(config.desired_count, DEFAULT_TARGET_COUNT);
    }

    #[test]
    fn test_resolve_defaults_without_previous() {
        let config = SimulationConfig::resolve(&RawPreset::default(), None, TargetKind::Circle);
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_resolve_numeric_strings_and_bounds() {
        let preset = raw(json!({ "speed": " 250 ", "size": 10000, "count": 2.2 }));
        let config = SimulationConfig::resolve(&preset, None, TargetKind::Circle);
        assert_eq!(config.speed, 250.0);
        assert_eq!(config.target_width, MAX_TARGET_SIZE);
        // Fractional counts round up (2.2 targets means 3 on screen)
        assert_eq!(config.desired_count, 3);
    }

    #[test]
    fn test_resolve_humanoid_height() {
        let preset = raw(json!({ "size": 50 }));
        let config = SimulationConfig::resolve(&preset, None, TargetKind::Humanoid);
        assert_eq!(config.target_width, 50.0);
        assert_eq!(config.target_height, 50.0 * HUMANOID_ASPECT);
    }

    #[test]
    fn test_resolve_part_scores() {
        let preset = raw(json!({ "scores": { "head": 5, "body": "x", "four": -1 } }));
        let config = SimulationConfig::resolve(&preset, None, TargetKind::Humanoid);
        assert_eq!(config.part_scores.head, 5);
        assert_eq!(config.part_scores.body, DEFAULT_BODY_SCORE);
        assert_eq!(config.part_scores.limb, -1);
    }

    #[test]
    fn test_limb_alias_skips_invalid_value() {
        let preset = raw(json!({ "scores": { "limb": "x", "four": 5 } }));
        let config = SimulationConfig::resolve(&preset, None, TargetKind::Humanoid);
        assert_eq!(config.part_scores.limb, 5);

        let preset = raw(json!({ "scores": { "limb": null, "four": [], "limbs": "7" } }));
        let config = SimulationConfig::resolve(&preset, None, TargetKind::Humanoid);
        assert_eq!(config.part_scores.limb, 7);
    }

    #[test]
    fn test_manual_settings_resolve() {
        let manual = ManualSettings {
            speed: Some(150.0),
            count: Some(0.0),
            head: Some(10.0),
            ..Default::default()
        };
        let previous = SimulationConfig::with_kind(TargetKind::Humanoid);
        let config =
            SimulationConfig::resolve(&manual.to_raw(), Some(&previous), TargetKind::Humanoid);
        assert_eq!(config.speed, 150.0);
        assert_eq!(config.lifetime_secs, previous.lifetime_secs);
        assert_eq!(config.desired_count, DEFAULT_TARGET_COUNT);
        assert_eq!(config.part_scores.head, 10);
        assert_eq!(config.part_scores.limb, DEFAULT_LIMB_SCORE);
    }

    #[test]
    fn test_registry_order_and_labels() {
        let registry = DifficultyRegistry::from_json(
            r#"{ "normal": { "label": "Normal", "speed": 200 },
                 "easy": { "speed": 100 },
                 "broken": 7 }"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.first_key(), Some("normal"));
        assert_eq!(registry.label("normal"), "Normal");
        assert_eq!(registry.label("easy"), "easy");
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_registry_errors() {
        assert!(matches!(
            DifficultyRegistry::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DifficultyRegistry::from_json("[1, 2]"),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            DifficultyRegistry::from_json("{}"),
            Err(ConfigError::Empty)
        ));
    }

    #[test]
    fn test_shipped_config_parses() {
        let registry = DifficultyRegistry::from_json(include_str!("../assets/config.json")).unwrap();
        assert!(registry.contains(DEFAULT_DIFFICULTY));
        for key in registry.keys() {
            let preset = registry.get(key).unwrap();
            assert!(preset.label().is_some(), "{} has no label", key);
        }
    }

    #[test]
    fn test_target_kind_from_str() {
        assert_eq!(TargetKind::from_str("Humanoid"), Some(TargetKind::Humanoid));
        assert_eq!(TargetKind::from_str("plain"), Some(TargetKind::Circle));
        assert_eq!(TargetKind::from_str("square"), None);
    }
}
