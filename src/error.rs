use crate::gesture::GestureKind;
use crate::pointer::ArityState;

/// Internal consistency violations. Recognition output is not trustworthy after one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("last pointer released with {on_surface} tracked and {unused} parked pointers left")]
    StrayPointers { on_surface: usize, unused: usize },
    #[error("{gesture:?} has no threshold profile for its active phase")]
    MissingThresholdProfile { gesture: GestureKind },
    #[error("active unit does not match arity state {state:?}")]
    UnitMismatch { state: ArityState },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Validation(String),
}
