//! Contact tracking: per-pointer kinematics and the one/two pointer arity machine.

mod input;
mod manager;
mod track;
mod types;

pub use input::{DualParameters, DualPointerInput, PointerInput, SinglePointerInput};
pub use manager::{ArityState, PointerManager};
pub use track::{
    GlobalTrackParameters, LiveTrackParameters, PointerTrack, TrackStatus,
    DEFAULT_VECTOR_TIMESPAN_MS, TRACK_HISTORY_LEN,
};
pub use types::{PointerId, PointerPhase, PointerSample};
