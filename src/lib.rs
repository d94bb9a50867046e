//! Pointer gesture recognition.
//!
//! Raw contact samples go into a [`GestureEngine`]; each call returns the named gesture
//! events (tap, press, pan, swipe, pinch, rotate, two-finger pan) recognized on that step.

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod pointer;

pub use config::EngineConfig;
pub use engine::{GestureEngine, GestureOutput, RecognitionTrace};
pub use error::{ConfigError, EngineError};
pub use geometry::{Direction, Point, Vector};
pub use gesture::{GestureEvent, GestureEventKind, GestureKind, GestureState, Measurement};
pub use pointer::{PointerId, PointerPhase, PointerSample};
