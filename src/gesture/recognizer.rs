use crate::error::EngineError;
use crate::geometry::{self, Direction};
use crate::pointer::{
    ArityState, DualParameters, PointerManager, PointerSample, PointerTrack, TrackStatus,
};

use super::thresholds::{DirectionSet, Subject, ThresholdProfile};
use super::types::{
    GestureEvent, GestureEventKind, GestureEvents, GestureKind, GestureState, InputUnit,
    Measurement, Recognition, RejectReason, Verdict,
};
use super::{pan, pinch, press, rotate, tap, two_finger_pan};

/// Thresholds and options of one gesture, fixed once the engine is built.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    pub kind: GestureKind,
    /// Checked while the gesture is not yet active.
    pub initial: ThresholdProfile,
    /// Checked once active. Single-shot gestures have none.
    pub active: Option<ThresholdProfile>,
    pub directions: DirectionSet,
    /// Release speed above which a finished pan also reports a swipe.
    pub swipe_min_speed: Option<f32>,
}

impl GestureConfig {
    pub fn for_kind(kind: GestureKind) -> Self {
        match kind {
            GestureKind::Tap => tap::default_config(),
            GestureKind::Press => press::default_config(),
            GestureKind::Pan => pan::default_config(),
            GestureKind::Pinch => pinch::default_config(),
            GestureKind::Rotate => rotate::default_config(),
            GestureKind::TwoFingerPan => two_finger_pan::default_config(),
        }
    }

    pub(super) fn empty(kind: GestureKind) -> Self {
        Self {
            kind,
            initial: ThresholdProfile::new(),
            active: None,
            directions: DirectionSet::ALL,
            swipe_min_speed: None,
        }
    }
}

/// Everything a gesture may look at during one recognition pass.
#[derive(Clone, Copy)]
pub struct RecognitionContext<'a> {
    pub manager: &'a PointerManager,
    pub t_ms: u64,
    pub sample: Option<PointerSample>,
    pub direction_events: bool,
}

#[derive(Clone, Debug)]
pub struct Gesture {
    config: GestureConfig,
    state: GestureState,
    unit_serial: Option<u64>,
    last_measurement: Option<(Measurement, Measurement)>,
    last_reject: Option<RejectReason>,
}

impl Gesture {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::Inactive,
            unit_serial: None,
            last_measurement: None,
            last_reject: None,
        }
    }

    pub fn kind(&self) -> GestureKind {
        self.config.kind
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == GestureState::Active
    }

    /// Why the latest validation failed, if it did.
    pub fn last_reject(&self) -> Option<RejectReason> {
        self.last_reject
    }

    /// Forces an inactive gesture into `Blocked`. Returns whether it changed.
    pub fn block(&mut self) -> bool {
        if self.state != GestureState::Inactive {
            return false;
        }
        log::debug!("{}: blocked", self.kind().label());
        self.state = GestureState::Blocked;
        true
    }

    pub fn unblock(&mut self) -> bool {
        if self.state != GestureState::Blocked {
            return false;
        }
        log::debug!("{}: unblocked", self.kind().label());
        self.state = GestureState::Inactive;
        true
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Inactive;
        self.unit_serial = None;
        self.last_measurement = None;
        self.last_reject = None;
    }

    /// Runs the validation pipeline, stopping at the first failed step.
    pub fn validate(&self, manager: &PointerManager) -> Result<Verdict, EngineError> {
        if self.state == GestureState::Blocked {
            return Ok(Verdict::Invalid(RejectReason::Blocked));
        }
        let subject = match self.subject(manager) {
            Ok(subject) => subject,
            Err(reason) => return Ok(Verdict::Invalid(reason)),
        };
        if self.is_active() && self.unit_serial != manager.unit_serial() {
            return Ok(Verdict::Invalid(RejectReason::UnitChanged));
        }

        let widened = self.is_active() && self.kind().widens_directions_when_active();
        if !widened && !self.config.directions.allows(live_direction(&subject)) {
            return Ok(Verdict::Invalid(RejectReason::Direction));
        }

        let profile = self.current_profile()?;
        Ok(match profile.first_violation(&subject) {
            Some(parameter) => Verdict::Invalid(RejectReason::Threshold(parameter)),
            None => Verdict::Valid,
        })
    }

    /// Threshold profile for the gesture's current phase.
    pub fn current_profile(&self) -> Result<&ThresholdProfile, EngineError> {
        if !self.is_active() {
            return Ok(&self.config.initial);
        }
        self.config
            .active
            .as_ref()
            .ok_or(EngineError::MissingThresholdProfile {
                gesture: self.kind(),
            })
    }

    pub fn recognize(
        &mut self,
        context: &RecognitionContext<'_>,
        events: &mut GestureEvents,
    ) -> Result<Recognition, EngineError> {
        let verdict = self.validate(context.manager)?;
        self.last_reject = match verdict {
            Verdict::Valid => None,
            Verdict::Invalid(reason) => Some(reason),
        };

        match (self.state, verdict) {
            (GestureState::Inactive, Verdict::Valid) if self.kind().is_instant() => {
                let (global, live) = self.measure(context.manager);
                log::debug!("{}: fired at {}ms", self.kind().label(), context.t_ms);
                self.emit(context, events, GestureEventKind::Fire, global, live);
                Ok(Recognition::Fired)
            }
            (GestureState::Inactive, Verdict::Valid) => {
                self.state = GestureState::Active;
                self.unit_serial = context.manager.unit_serial();
                let (global, live) = self.measure(context.manager);
                self.last_measurement = Some((global, live));
                log::debug!(
                    "{}: started at {}ms on unit {:?}",
                    self.kind().label(),
                    context.t_ms,
                    self.unit_serial
                );
                self.emit(context, events, GestureEventKind::Start, global, live);
                Ok(Recognition::Started)
            }
            (GestureState::Active, Verdict::Valid) => {
                let (global, live) = self.measure(context.manager);
                self.last_measurement = Some((global, live));
                // Idle ticks re-validate without reporting motion.
                if self.kind().emits_updates() && context.sample.is_some() {
                    self.emit(context, events, GestureEventKind::Update, global, live);
                    if context.direction_events
                        && self.kind().emits_directional()
                        && live.direction != Direction::None
                    {
                        let kind = GestureEventKind::Directional(live.direction);
                        self.emit(context, events, kind, global, live);
                    }
                }
                Ok(Recognition::Updated)
            }
            (GestureState::Active, Verdict::Invalid(reason)) => {
                self.end(context, events, reason);
                Ok(Recognition::Ended)
            }
            (GestureState::Inactive | GestureState::Blocked, Verdict::Invalid(_))
            | (GestureState::Blocked, Verdict::Valid) => Ok(Recognition::Idle),
        }
    }

    fn end(
        &mut self,
        context: &RecognitionContext<'_>,
        events: &mut GestureEvents,
        reason: RejectReason,
    ) {
        let released = self.released_track(context.manager);
        let (global, live) = match released {
            Some(track) => track_measurements(track),
            None => self.last_measurement.unwrap_or_default(),
        };
        log::debug!(
            "{}: ended at {}ms ({:?})",
            self.kind().label(),
            context.t_ms,
            reason
        );
        self.emit(context, events, GestureEventKind::End, global, live);

        if let Some(direction) = released.and_then(|track| self.swipe_direction(track)) {
            self.emit(context, events, GestureEventKind::Swipe, global, live);
            if context.direction_events {
                let kind = GestureEventKind::SwipeDirectional(direction);
                self.emit(context, events, kind, global, live);
            }
        }

        self.state = GestureState::Inactive;
        self.unit_serial = None;
        self.last_measurement = None;
    }

    /// The track whose release ended a single-pointer gesture.
    fn released_track<'m>(&self, manager: &'m PointerManager) -> Option<&'m PointerTrack> {
        if self.kind().unit() != InputUnit::Single || manager.state() != ArityState::NoPointer {
            return None;
        }
        manager.last_removed()
    }

    fn swipe_direction(&self, track: &PointerTrack) -> Option<Direction> {
        let min_speed = self.config.swipe_min_speed?;
        if track.status() != TrackStatus::Released {
            return None;
        }
        pan::swipe_direction(track, min_speed)
    }

    fn subject<'m>(&self, manager: &'m PointerManager) -> Result<Subject<'m>, RejectReason> {
        let unit = self.kind().unit();
        if manager.state() != unit.arity() {
            return Err(RejectReason::WrongArity);
        }
        let session_pointer_count = manager.session_pointer_count();
        match unit {
            // A canceled contact never completes a release gesture.
            InputUnit::Released => manager
                .last_removed()
                .filter(|track| track.status() == TrackStatus::Released)
                .map(|track| Subject::Track {
                    track,
                    session_pointer_count,
                })
                .ok_or(RejectReason::MissingInput),
            InputUnit::Single => manager
                .single_input()
                .map(|input| Subject::Track {
                    track: input.track(),
                    session_pointer_count,
                })
                .ok_or(RejectReason::MissingInput),
            InputUnit::Dual => manager
                .dual_input()
                .map(|input| Subject::Dual {
                    input,
                    session_pointer_count,
                })
                .ok_or(RejectReason::MissingInput),
        }
    }

    fn measure(&self, manager: &PointerManager) -> (Measurement, Measurement) {
        match self.subject(manager) {
            Ok(Subject::Track { track, .. }) => track_measurements(track),
            Ok(Subject::Dual { input, .. }) => {
                (dual_measurement(input.global()), dual_measurement(input.live()))
            }
            Err(_) => self.last_measurement.unwrap_or_default(),
        }
    }

    fn emit(
        &self,
        context: &RecognitionContext<'_>,
        events: &mut GestureEvents,
        kind: GestureEventKind,
        global: Measurement,
        live: Measurement,
    ) {
        events.push(GestureEvent {
            gesture: self.kind(),
            kind,
            t_ms: context.t_ms,
            global,
            live,
            source: context.sample,
        });
    }
}

fn live_direction(subject: &Subject<'_>) -> Direction {
    match subject {
        Subject::Track { track, .. } => track.live().vector.direction,
        Subject::Dual { input, .. } => input.live().center_movement.direction,
    }
}

fn track_measurements(track: &PointerTrack) -> (Measurement, Measurement) {
    let global = track.global();
    let live = track.live();
    let center = track.current().point;

    let global = Measurement {
        delta_x: global.vector.delta_x,
        delta_y: global.vector.delta_y,
        distance: global.vector.length,
        speed_x: geometry::per_second(global.vector.delta_x, 0, global.duration_ms),
        speed_y: geometry::per_second(global.vector.delta_y, 0, global.duration_ms),
        speed: global.speed,
        direction: global.vector.direction,
        scale: 1.0,
        rotation: 0.0,
        center,
        duration_ms: global.duration_ms,
    };
    let live = Measurement {
        delta_x: live.vector.delta_x,
        delta_y: live.vector.delta_y,
        distance: live.vector.length,
        speed_x: geometry::per_second(live.vector.delta_x, live.start_ms, live.end_ms),
        speed_y: geometry::per_second(live.vector.delta_y, live.start_ms, live.end_ms),
        speed: live.speed,
        direction: live.vector.direction,
        scale: 1.0,
        rotation: 0.0,
        center,
        duration_ms: live.end_ms.saturating_sub(live.start_ms),
    };
    (global, live)
}

fn dual_measurement(parameters: &DualParameters) -> Measurement {
    let movement = parameters.center_movement;
    Measurement {
        delta_x: movement.delta_x,
        delta_y: movement.delta_y,
        distance: movement.length,
        speed_x: geometry::per_second(movement.delta_x, 0, parameters.duration_ms),
        speed_y: geometry::per_second(movement.delta_y, 0, parameters.duration_ms),
        speed: parameters.speed,
        direction: movement.direction,
        scale: parameters.relative_distance_change,
        rotation: parameters.rotation_angle,
        center: parameters.center,
        duration_ms: parameters.duration_ms,
    }
}
