use serde::Deserialize;

use crate::geometry::{Direction, Point};
use crate::pointer::{ArityState, PointerSample};

use super::thresholds::Parameter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Tap,
    Press,
    Pan,
    Pinch,
    Rotate,
    TwoFingerPan,
}

impl GestureKind {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Tap,
        Self::Press,
        Self::Pan,
        Self::Pinch,
        Self::Rotate,
        Self::TwoFingerPan,
    ];

    /// Prefix of every event name the gesture emits.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tap => "tap",
            Self::Press => "press",
            Self::Pan => "pan",
            Self::Pinch => "pinch",
            Self::Rotate => "rotate",
            Self::TwoFingerPan => "twofingerpan",
        }
    }

    /// Key of the per-gesture override table in the engine config.
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::TwoFingerPan => "two_finger_pan",
            _ => self.label(),
        }
    }

    pub const fn unit(self) -> InputUnit {
        match self {
            Self::Tap => InputUnit::Released,
            Self::Press | Self::Pan => InputUnit::Single,
            Self::Pinch | Self::Rotate | Self::TwoFingerPan => InputUnit::Dual,
        }
    }

    /// Fires once from a single evaluation instead of running an active phase.
    pub const fn is_instant(self) -> bool {
        matches!(self, Self::Tap)
    }

    /// Emits per-update events while active.
    pub const fn emits_updates(self) -> bool {
        !matches!(self, Self::Tap | Self::Press)
    }

    /// Emits `<name><direction>` next to every update.
    pub const fn emits_directional(self) -> bool {
        matches!(self, Self::Pan | Self::TwoFingerPan)
    }

    /// Drops the direction restriction once started, so a diagonal jiggle does not end it.
    pub const fn widens_directions_when_active(self) -> bool {
        matches!(self, Self::Pan)
    }
}

/// Which contacts a gesture is validated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputUnit {
    /// The track released by the latest sample, once the surface is empty.
    Released,
    Single,
    Dual,
}

impl InputUnit {
    pub const fn arity(self) -> ArityState {
        match self {
            Self::Released => ArityState::NoPointer,
            Self::Single => ArityState::SinglePointer,
            Self::Dual => ArityState::DualPointer,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Inactive,
    Active,
    Blocked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEventKind {
    /// Single-shot gesture recognized.
    Fire,
    Start,
    Update,
    Directional(Direction),
    End,
    Swipe,
    SwipeDirectional(Direction),
}

/// Kinematics attached to an emitted event, for one window (live or global).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Measurement {
    pub delta_x: f32,
    pub delta_y: f32,
    pub distance: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub speed: f32,
    pub direction: Direction,
    /// Ratio of contact distance now against the window start; 1 for one contact.
    pub scale: f32,
    /// Signed chord rotation in degrees, clockwise positive; 0 for one contact.
    pub rotation: f32,
    pub center: Point,
    pub duration_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureEvent {
    pub gesture: GestureKind,
    pub kind: GestureEventKind,
    pub t_ms: u64,
    pub global: Measurement,
    pub live: Measurement,
    pub source: Option<PointerSample>,
}

impl GestureEvent {
    /// Host-facing event name, e.g. `panstart`, `panleft`, `swipeup`, `pressend`.
    pub fn name(&self) -> String {
        let label = self.gesture.label();
        match self.kind {
            GestureEventKind::Fire | GestureEventKind::Update => label.to_owned(),
            // Press announces itself once on start.
            GestureEventKind::Start if self.gesture == GestureKind::Press => label.to_owned(),
            GestureEventKind::Start => format!("{label}start"),
            GestureEventKind::End => format!("{label}end"),
            GestureEventKind::Directional(direction) => format!("{label}{}", direction.label()),
            GestureEventKind::Swipe => "swipe".to_owned(),
            GestureEventKind::SwipeDirectional(direction) => {
                format!("swipe{}", direction.label())
            }
        }
    }
}

pub const MAX_EVENTS_PER_CALL: usize = 16;

/// Events emitted during one engine call. Overflowing events are dropped with a warning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureEvents {
    events: heapless::Vec<GestureEvent, MAX_EVENTS_PER_CALL>,
}

impl GestureEvents {
    pub const MAX: usize = MAX_EVENTS_PER_CALL;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GestureEvent) {
        if self.events.push(event).is_err() {
            log::warn!(
                "gesture output full, dropping {} at {}ms",
                event.name(),
                event.t_ms
            );
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureEvent> {
        self.events.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.events.iter().map(GestureEvent::name).collect()
    }
}

impl<'a> IntoIterator for &'a GestureEvents {
    type Item = &'a GestureEvent;
    type IntoIter = core::slice::Iter<'a, GestureEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// First failed validation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    Blocked,
    WrongArity,
    MissingInput,
    Direction,
    Threshold(Parameter),
    UnitChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(RejectReason),
}

impl Verdict {
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// What a single `recognize` pass did to the gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recognition {
    Idle,
    Fired,
    Started,
    Updated,
    Ended,
}
