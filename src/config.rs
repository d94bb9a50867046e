use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::Direction;
use crate::gesture::{
    DirectionSet, GestureConfig, GestureKind, Parameter, ParameterKind, Requirement,
    ThresholdProfile,
};
use crate::pointer::DEFAULT_VECTOR_TIMESPAN_MS;


pub const DEFAULT_IDLE_TICK_MS: u64 = 100;

/// Long press and drag exclude each other; a drag also rules out a tap on release.
pub const DEFAULT_BLOCKS: [(GestureKind, GestureKind); 3] = [
    (GestureKind::Press, GestureKind::Pan),
    (GestureKind::Pan, GestureKind::Press),
    (GestureKind::Pan, GestureKind::Tap),
];

/// Engine setup, fixed at construction.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Enabled gestures in evaluation order.
    pub gestures: Vec<GestureKind>,
    pub simultaneous_gestures: bool,
    pub consecutive_gestures: bool,
    /// Emit `<name><direction>` events next to updates and swipes.
    pub direction_events: bool,
    pub vector_timespan_ms: u64,
    /// Interval the host is expected to call `on_idle_tick` at.
    pub idle_tick_ms: u64,
    /// Explicit block rules. When omitted, the built-in rules apply to enabled gestures.
    pub blocks: Option<Vec<BlockRule>>,
    pub tap: Option<GestureOverride>,
    pub press: Option<GestureOverride>,
    pub pan: Option<GestureOverride>,
    pub pinch: Option<GestureOverride>,
    pub rotate: Option<GestureOverride>,
    pub two_finger_pan: Option<GestureOverride>,
}

/// While `gesture` is active, every gesture in `blocks` is kept from starting.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockRule {
    pub gesture: GestureKind,
    pub blocks: Vec<GestureKind>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GestureOverride {
    pub initial: BTreeMap<String, Bound>,
    pub active: BTreeMap<String, Bound>,
    pub directions: Option<Vec<Direction>>,
    pub swipe_min_speed: Option<f32>,
}

/// `{ min, max }` for numeric parameters, `{ is }` for flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bound {
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub is: Option<bool>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gestures: GestureKind::ALL.to_vec(),
            simultaneous_gestures: true,
            consecutive_gestures: true,
            direction_events: true,
            vector_timespan_ms: DEFAULT_VECTOR_TIMESPAN_MS,
            idle_tick_ms: DEFAULT_IDLE_TICK_MS,
            blocks: None,
            tap: None,
            press: None,
            pan: None,
            pinch: None,
            rotate: None,
            two_finger_pan: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vector_timespan_ms == 0 {
            return Err(invalid("vector_timespan_ms must be > 0"));
        }
        if self.idle_tick_ms == 0 {
            return Err(invalid("idle_tick_ms must be > 0"));
        }

        let mut enabled = BTreeSet::new();
        for kind in &self.gestures {
            if !enabled.insert(*kind) {
                return Err(invalid(format!(
                    "gestures lists {} more than once",
                    kind.config_key()
                )));
            }
        }

        for rule in self.blocks.iter().flatten() {
            let owner = rule.gesture.config_key();
            if !enabled.contains(&rule.gesture) {
                return Err(invalid(format!("blocks: {owner} is not an enabled gesture")));
            }
            for target in &rule.blocks {
                if *target == rule.gesture {
                    return Err(invalid(format!("blocks: {owner} cannot block itself")));
                }
                if !enabled.contains(target) {
                    return Err(invalid(format!(
                        "blocks: {owner} blocks {}, which is not an enabled gesture",
                        target.config_key()
                    )));
                }
            }
        }

        for kind in GestureKind::ALL {
            self.gesture_config(kind)?;
        }
        Ok(())
    }

    pub fn override_for(&self, kind: GestureKind) -> Option<&GestureOverride> {
        match kind {
            GestureKind::Tap => self.tap.as_ref(),
            GestureKind::Press => self.press.as_ref(),
            GestureKind::Pan => self.pan.as_ref(),
            GestureKind::Pinch => self.pinch.as_ref(),
            GestureKind::Rotate => self.rotate.as_ref(),
            GestureKind::TwoFingerPan => self.two_finger_pan.as_ref(),
        }
    }

    /// Built-in tuning for `kind` with this config's override table layered on top.
    pub fn gesture_config(&self, kind: GestureKind) -> Result<GestureConfig, ConfigError> {
        let mut config = GestureConfig::for_kind(kind);
        let Some(overrides) = self.override_for(kind) else {
            return Ok(config);
        };
        let table = kind.config_key();

        apply_bounds(&mut config.initial, &overrides.initial, table, "initial")?;

        if !overrides.active.is_empty() {
            let Some(active) = config.active.as_mut() else {
                return Err(invalid(format!(
                    "{table}.active: {table} fires once and has no active phase"
                )));
            };
            apply_bounds(active, &overrides.active, table, "active")?;
        }

        if let Some(directions) = &overrides.directions {
            if directions.is_empty() {
                return Err(invalid(format!("{table}.directions must not be empty")));
            }
            if directions.contains(&Direction::None) {
                return Err(invalid(format!("{table}.directions cannot contain none")));
            }
            config.directions = DirectionSet::from_directions(directions.iter().copied());
        }

        if let Some(speed) = overrides.swipe_min_speed {
            if kind != GestureKind::Pan {
                return Err(invalid(format!("{table}.swipe_min_speed applies to pan only")));
            }
            if speed.is_nan() || speed <= 0.0 {
                return Err(invalid("pan.swipe_min_speed must be > 0"));
            }
            config.swipe_min_speed = Some(speed);
        }

        Ok(config)
    }

    /// `(gesture, blocked)` pairs in declaration order. Built-in pairs naming a disabled
    /// gesture are skipped.
    pub fn block_pairs(&self) -> Vec<(GestureKind, GestureKind)> {
        match &self.blocks {
            Some(rules) => rules
                .iter()
                .flat_map(|rule| rule.blocks.iter().map(move |target| (rule.gesture, *target)))
                .collect(),
            None => DEFAULT_BLOCKS
                .iter()
                .copied()
                .filter(|(owner, target)| {
                    self.gestures.contains(owner) && self.gestures.contains(target)
                })
                .collect(),
        }
    }
}

fn apply_bounds(
    profile: &mut ThresholdProfile,
    bounds: &BTreeMap<String, Bound>,
    table: &str,
    phase: &str,
) -> Result<(), ConfigError> {
    for (key, bound) in bounds {
        let path = format!("{table}.{phase}.{key}");
        let Some(parameter) = Parameter::from_key(key) else {
            return Err(invalid(format!("{path}: unknown parameter")));
        };
        profile.set(parameter, requirement(parameter, bound, &path)?);
    }
    Ok(())
}

fn requirement(
    parameter: Parameter,
    bound: &Bound,
    path: &str,
) -> Result<Requirement, ConfigError> {
    match parameter.kind() {
        ParameterKind::Flag => match (bound.is, bound.min, bound.max) {
            (Some(expected), None, None) => Ok(Requirement::is(expected)),
            _ => Err(invalid(format!("{path}: flag takes `is` only"))),
        },
        ParameterKind::Numeric => {
            if bound.is.is_some() {
                return Err(invalid(format!(
                    "{path}: numeric parameter takes min/max, not `is`"
                )));
            }
            match (bound.min, bound.max) {
                (None, None) => Err(invalid(format!("{path}: needs min or max"))),
                (Some(min), Some(max)) if max < min => {
                    Err(invalid(format!("{path}: max must be >= min")))
                }
                (min, max) if min.is_some_and(f32::is_nan) || max.is_some_and(f32::is_nan) => {
                    Err(invalid(format!("{path}: bounds must be numbers")))
                }
                (min, max) => Ok(Requirement::Range { min, max }),
            }
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}
