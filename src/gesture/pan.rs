use crate::geometry::Direction;
use crate::pointer::PointerTrack;

use super::recognizer::GestureConfig;
use super::thresholds::{Parameter, Requirement, ThresholdProfile};
use super::types::GestureKind;

pub const MIN_DISTANCE: f32 = 10.0;
pub const SWIPE_MIN_SPEED: f32 = 600.0;

/// Runs for as long as the pointer stays down.
pub(super) fn default_config() -> GestureConfig {
    let mut config = GestureConfig::empty(GestureKind::Pan);
    config.initial = config
        .initial
        .with(Parameter::Distance, Requirement::at_least(MIN_DISTANCE))
        .with(Parameter::HasBeenMoved, Requirement::is(true));
    config.active = Some(ThresholdProfile::new());
    config.swipe_min_speed = Some(SWIPE_MIN_SPEED);
    config
}

/// Direction of a release fast enough to count as a swipe.
pub(super) fn swipe_direction(track: &PointerTrack, min_speed: f32) -> Option<Direction> {
    let final_speed = track.global().final_speed?;
    let direction = track.live().vector.direction;
    if final_speed > min_speed && direction != Direction::None {
        Some(direction)
    } else {
        None
    }
}
