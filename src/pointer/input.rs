use crate::geometry::{self, Direction, Point, Vector};

use super::track::{GlobalTrackParameters, LiveTrackParameters, PointerTrack};
use super::types::{PointerId, PointerSample};


/// Read-through view over the one track driving single-pointer gestures.
#[derive(Clone, Copy, Debug)]
pub struct SinglePointerInput<'a> {
    track: &'a PointerTrack,
}

impl<'a> SinglePointerInput<'a> {
    pub fn new(track: &'a PointerTrack) -> Self {
        Self { track }
    }

    pub fn track(&self) -> &'a PointerTrack {
        self.track
    }

    pub fn pointer_id(&self) -> PointerId {
        self.track.id()
    }

    pub fn global(&self) -> &'a GlobalTrackParameters {
        self.track.global()
    }

    pub fn live(&self) -> &'a LiveTrackParameters {
        self.track.live()
    }

    pub fn current(&self) -> &'a PointerSample {
        self.track.current()
    }
}

/// Measurements derived from a pair of contact vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DualParameters {
    pub center: Point,
    pub center_movement: Vector,
    pub speed: f32,
    pub distance_change: f32,
    pub relative_distance_change: f32,
    pub rotation_angle: f32,
    /// `None` while either contact stands still over the measured span.
    pub vector_angle: Option<f32>,
    pub duration_ms: u64,
}

impl DualParameters {
    fn measure(first: &Vector, second: &Vector, start_ms: u64, end_ms: u64) -> Self {
        let center_movement = geometry::center_movement(first, second);
        let vector_angle = if first.is_zero() || second.is_zero() {
            None
        } else {
            Some(geometry::vector_angle(first, second))
        };
        Self {
            center: geometry::center(first.start, second.start),
            center_movement,
            speed: geometry::speed(&center_movement, start_ms, end_ms),
            distance_change: geometry::absolute_distance_change(first, second),
            relative_distance_change: geometry::relative_distance_change(first, second)
                .unwrap_or(1.0),
            rotation_angle: geometry::rotation_angle(first, second),
            vector_angle,
            duration_ms: end_ms.saturating_sub(start_ms),
        }
    }
}

/// Pairing state kept by the manager for the two tracks of a dual unit.
#[derive(Clone, Debug)]
pub(crate) struct DualUnit {
    serial: u64,
    first: PointerId,
    second: PointerId,
    first_origin: PointerSample,
    second_origin: PointerSample,
    formed_ms: u64,
    global: DualParameters,
    live: DualParameters,
}

impl DualUnit {
    pub(crate) fn form(serial: u64, first: &PointerTrack, second: &PointerTrack) -> Self {
        let formed_ms = first.current().t_ms.max(second.current().t_ms);
        let mut unit = Self {
            serial,
            first: first.id(),
            second: second.id(),
            first_origin: *first.current(),
            second_origin: *second.current(),
            formed_ms,
            global: DualParameters::default(),
            live: DualParameters::default(),
        };
        unit.refresh(first, second);
        unit
    }

    pub(crate) fn serial(&self) -> u64 {
        self.serial
    }

    pub(crate) fn first(&self) -> PointerId {
        self.first
    }

    pub(crate) fn second(&self) -> PointerId {
        self.second
    }

    pub(crate) fn partner_of(&self, id: PointerId) -> Option<PointerId> {
        if self.first == id {
            Some(self.second)
        } else if self.second == id {
            Some(self.first)
        } else {
            None
        }
    }

    pub(crate) fn refresh(&mut self, first: &PointerTrack, second: &PointerTrack) {
        let now_ms = first.current().t_ms.max(second.current().t_ms);

        let first_global = geometry::vector(self.first_origin.point, first.current().point);
        let second_global = geometry::vector(self.second_origin.point, second.current().point);
        self.global =
            DualParameters::measure(&first_global, &second_global, self.formed_ms, now_ms);

        let first_live = first.live();
        let second_live = second.live();
        self.live = DualParameters::measure(
            &first_live.vector,
            &second_live.vector,
            first_live.start_ms.min(second_live.start_ms),
            first_live.end_ms.max(second_live.end_ms),
        );
    }

    pub(crate) fn on_idle(&mut self, now_ms: u64) {
        self.global.duration_ms = now_ms.saturating_sub(self.formed_ms);
    }
}

/// View over the two paired tracks and the parameters derived from them.
#[derive(Clone, Copy, Debug)]
pub struct DualPointerInput<'a> {
    unit: &'a DualUnit,
    first: &'a PointerTrack,
    second: &'a PointerTrack,
}

impl<'a> DualPointerInput<'a> {
    pub(crate) fn new(
        unit: &'a DualUnit,
        first: &'a PointerTrack,
        second: &'a PointerTrack,
    ) -> Self {
        Self {
            unit,
            first,
            second,
        }
    }

    /// Changes whenever the pair is re-formed, even if one track survives.
    pub fn serial(&self) -> u64 {
        self.unit.serial
    }

    pub fn first(&self) -> &'a PointerTrack {
        self.first
    }

    pub fn second(&self) -> &'a PointerTrack {
        self.second
    }

    pub fn formed_ms(&self) -> u64 {
        self.unit.formed_ms
    }

    pub fn global(&self) -> &'a DualParameters {
        &self.unit.global
    }

    pub fn live(&self) -> &'a DualParameters {
        &self.unit.live
    }
}

#[derive(Clone, Copy, Debug)]
pub enum PointerInput<'a> {
    Single(SinglePointerInput<'a>),
    Dual(DualPointerInput<'a>),
}

impl PointerInput<'_> {
    pub fn live_direction(&self) -> Direction {
        match self {
            Self::Single(input) => input.live().vector.direction,
            Self::Dual(input) => input.live().center_movement.direction,
        }
    }
}
