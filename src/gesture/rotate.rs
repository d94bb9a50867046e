use super::recognizer::GestureConfig;
use super::thresholds::{Parameter, Requirement, ThresholdProfile};
use super::types::GestureKind;

pub(super) fn default_config() -> GestureConfig {
    let mut config = GestureConfig::empty(GestureKind::Rotate);
    config.initial = config
        .initial
        .with(Parameter::CenterMovement, Requirement::at_most(50.0))
        .with(Parameter::DistanceChange, Requirement::at_most(50.0))
        .with(Parameter::RotationAngle, Requirement::at_least(5.0));
    config.active = Some(
        ThresholdProfile::new().with(Parameter::CenterMovement, Requirement::at_most(150.0)),
    );
    config
}
