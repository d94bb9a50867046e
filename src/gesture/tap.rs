use super::recognizer::GestureConfig;
use super::thresholds::{Parameter, Requirement};
use super::types::GestureKind;

pub const MAX_DURATION_MS: f32 = 200.0;
pub const MAX_DISTANCE: f32 = 30.0;

/// Short, still contact with no other pointer joining the session.
pub(super) fn default_config() -> GestureConfig {
    let mut config = GestureConfig::empty(GestureKind::Tap);
    config.initial = config
        .initial
        .with(Parameter::Duration, Requirement::at_most(MAX_DURATION_MS))
        .with(Parameter::Distance, Requirement::at_most(MAX_DISTANCE))
        .with(Parameter::PointerCount, Requirement::between(1.0, 1.0));
    config
}
