//! Gesture recognizers: threshold tables, the Inactive/Active/Blocked machine and the
//! default tuning of every supported gesture.

mod pan;
mod pinch;
mod press;
mod recognizer;
mod rotate;
mod tap;
mod thresholds;
mod two_finger_pan;
mod types;

#[cfg(test)]
mod tests;

pub use recognizer::{Gesture, GestureConfig, RecognitionContext};
pub use thresholds::{
    DirectionSet, Parameter, ParameterKind, Requirement, Subject, ThresholdProfile, Value,
};
pub use types::{
    GestureEvent, GestureEventKind, GestureEvents, GestureKind, GestureState, InputUnit,
    Measurement, Recognition, RejectReason, Verdict, MAX_EVENTS_PER_CALL,
};
