use super::recognizer::GestureConfig;
use super::thresholds::{Parameter, Requirement, ThresholdProfile};
use super::types::GestureKind;

/// Both contacts travel together, keeping their distance.
pub(super) fn default_config() -> GestureConfig {
    let mut config = GestureConfig::empty(GestureKind::TwoFingerPan);
    config.initial = config
        .initial
        .with(Parameter::CenterMovement, Requirement::at_least(3.0))
        .with(Parameter::DistanceChange, Requirement::at_most(50.0))
        .with(Parameter::RotationAngle, Requirement::at_most(20.0))
        .with(Parameter::VectorAngle, Requirement::at_most(45.0));
    config.active = Some(
        ThresholdProfile::new().with(Parameter::DistanceChange, Requirement::at_most(100.0)),
    );
    config
}
