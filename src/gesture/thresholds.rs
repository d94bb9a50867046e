use std::collections::BTreeMap;

use crate::geometry::Direction;
use crate::pointer::{DualPointerInput, PointerTrack};

/// Measured quantity a threshold can be declared against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    Duration,
    Distance,
    MaxDistance,
    Speed,
    MaxSpeed,
    HasBeenMoved,
    IsMoving,
    PointerCount,
    CenterMovement,
    /// Magnitude of the live contact distance change.
    DistanceChange,
    /// Magnitude of the live chord rotation.
    RotationAngle,
    VectorAngle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    Numeric,
    Flag,
}

impl Parameter {
    pub const ALL: [Self; 12] = [
        Self::Duration,
        Self::Distance,
        Self::MaxDistance,
        Self::Speed,
        Self::MaxSpeed,
        Self::HasBeenMoved,
        Self::IsMoving,
        Self::PointerCount,
        Self::CenterMovement,
        Self::DistanceChange,
        Self::RotationAngle,
        Self::VectorAngle,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::Distance => "distance",
            Self::MaxDistance => "max_distance",
            Self::Speed => "speed",
            Self::MaxSpeed => "max_speed",
            Self::HasBeenMoved => "has_been_moved",
            Self::IsMoving => "is_moving",
            Self::PointerCount => "pointer_count",
            Self::CenterMovement => "center_movement",
            Self::DistanceChange => "distance_change",
            Self::RotationAngle => "rotation_angle",
            Self::VectorAngle => "vector_angle",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|parameter| parameter.key() == key)
    }

    pub const fn kind(self) -> ParameterKind {
        match self {
            Self::HasBeenMoved | Self::IsMoving => ParameterKind::Flag,
            _ => ParameterKind::Numeric,
        }
    }

    /// Reads this parameter off the input a gesture is validated against.
    /// `None` when the input does not carry it.
    pub fn measure(self, subject: &Subject<'_>) -> Option<Value> {
        match subject {
            Subject::Track {
                track,
                session_pointer_count,
            } => {
                let global = track.global();
                let live = track.live();
                let value = match self {
                    Self::Duration => Value::Number(global.duration_ms as f32),
                    Self::Distance => Value::Number(global.vector.length),
                    Self::MaxDistance => Value::Number(global.max_distance),
                    Self::Speed => Value::Number(live.speed),
                    Self::MaxSpeed => Value::Number(global.max_speed),
                    Self::HasBeenMoved => Value::Flag(global.has_been_moved),
                    Self::IsMoving => Value::Flag(live.is_moving),
                    Self::PointerCount => Value::Number(*session_pointer_count as f32),
                    Self::CenterMovement
                    | Self::DistanceChange
                    | Self::RotationAngle
                    | Self::VectorAngle => return None,
                };
                Some(value)
            }
            Subject::Dual {
                input,
                session_pointer_count,
            } => {
                let global = input.global();
                let live = input.live();
                let value = match self {
                    Self::Duration => Value::Number(global.duration_ms as f32),
                    Self::Distance | Self::CenterMovement => {
                        Value::Number(global.center_movement.length)
                    }
                    Self::Speed => Value::Number(live.speed),
                    Self::IsMoving => Value::Flag(!live.center_movement.is_zero()),
                    Self::PointerCount => Value::Number(*session_pointer_count as f32),
                    Self::DistanceChange => Value::Number(live.distance_change.abs()),
                    Self::RotationAngle => Value::Number(live.rotation_angle.abs()),
                    Self::VectorAngle => Value::Number(live.vector_angle?),
                    Self::MaxDistance | Self::MaxSpeed | Self::HasBeenMoved => return None,
                };
                Some(value)
            }
        }
    }
}

/// Input a gesture's thresholds are evaluated against.
#[derive(Clone, Copy, Debug)]
pub enum Subject<'a> {
    Track {
        track: &'a PointerTrack,
        session_pointer_count: usize,
    },
    Dual {
        input: DualPointerInput<'a>,
        session_pointer_count: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Number(f32),
    Flag(bool),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Requirement {
    /// Inclusive bounds; an absent bound is open.
    Range { min: Option<f32>, max: Option<f32> },
    Flag(bool),
}

impl Requirement {
    pub const fn at_least(min: f32) -> Self {
        Self::Range {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: f32) -> Self {
        Self::Range {
            min: None,
            max: Some(max),
        }
    }

    pub const fn between(min: f32, max: f32) -> Self {
        Self::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn is(expected: bool) -> Self {
        Self::Flag(expected)
    }

    pub fn holds(&self, value: Option<Value>) -> bool {
        match (self, value) {
            (Self::Range { min, max }, Some(Value::Number(value))) => {
                min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
            }
            (Self::Flag(expected), Some(Value::Flag(value))) => *expected == value,
            _ => false,
        }
    }
}

/// Per-parameter requirements checked together; all must hold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThresholdProfile {
    requirements: BTreeMap<Parameter, Requirement>,
}

impl ThresholdProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, parameter: Parameter, requirement: Requirement) -> Self {
        self.set(parameter, requirement);
        self
    }

    pub fn set(&mut self, parameter: Parameter, requirement: Requirement) {
        self.requirements.insert(parameter, requirement);
    }

    pub fn get(&self, parameter: Parameter) -> Option<&Requirement> {
        self.requirements.get(&parameter)
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, &Requirement)> {
        self.requirements
            .iter()
            .map(|(parameter, requirement)| (*parameter, requirement))
    }

    /// First parameter whose requirement fails against `subject`.
    pub fn first_violation(&self, subject: &Subject<'_>) -> Option<Parameter> {
        self.iter()
            .find(|(parameter, requirement)| !requirement.holds(parameter.measure(subject)))
            .map(|(parameter, _)| parameter)
    }
}

/// Allowed live directions. The full set means unrestricted, `Direction::None` included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const ALL: Self = Self(0b1111);
    pub const HORIZONTAL: Self = Self(Self::bit(Direction::Left) | Self::bit(Direction::Right));
    pub const VERTICAL: Self = Self(Self::bit(Direction::Up) | Self::bit(Direction::Down));

    const fn bit(direction: Direction) -> u8 {
        match direction {
            Direction::None => 0,
            Direction::Left => 0b0001,
            Direction::Right => 0b0010,
            Direction::Up => 0b0100,
            Direction::Down => 0b1000,
        }
    }

    pub fn from_directions(directions: impl IntoIterator<Item = Direction>) -> Self {
        Self(
            directions
                .into_iter()
                .fold(0, |bits, direction| bits | Self::bit(direction)),
        )
    }

    pub const fn is_unrestricted(self) -> bool {
        self.0 == Self::ALL.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn allows(self, direction: Direction) -> bool {
        self.is_unrestricted() || self.0 & Self::bit(direction) != 0
    }
}

impl Default for DirectionSet {
    fn default() -> Self {
        Self::ALL
    }
}
