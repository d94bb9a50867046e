use super::recognizer::GestureConfig;
use super::thresholds::{Parameter, Requirement, ThresholdProfile};
use super::types::GestureKind;

pub const MIN_DURATION_MS: f32 = 600.0;
pub const MAX_DISTANCE: f32 = 10.0;

fn hold() -> ThresholdProfile {
    ThresholdProfile::new()
        .with(Parameter::Duration, Requirement::at_least(MIN_DURATION_MS))
        .with(Parameter::Distance, Requirement::at_most(MAX_DISTANCE))
}

/// Matures from idle ticks alone; the same hold must keep holding while active.
pub(super) fn default_config() -> GestureConfig {
    let mut config = GestureConfig::empty(GestureKind::Press);
    config.initial = hold();
    config.active = Some(hold());
    config
}
