use heapless::Deque;

use crate::geometry::{self, Vector};

use super::types::{PointerId, PointerPhase, PointerSample};


pub const TRACK_HISTORY_LEN: usize = 20;
pub const DEFAULT_VECTOR_TIMESPAN_MS: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackStatus {
    Active,
    Released,
    Canceled,
}

/// Measurements spanning the whole contact, first sample to latest.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlobalTrackParameters {
    pub vector: Vector,
    pub speed: f32,
    pub max_speed: f32,
    pub max_distance: f32,
    pub duration_ms: u64,
    pub has_been_moved: bool,
    pub final_speed: Option<f32>,
}

/// Measurements over the trailing vector timespan.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LiveTrackParameters {
    pub vector: Vector,
    pub speed: f32,
    pub is_moving: bool,
    pub start_ms: u64,
    pub end_ms: u64,
}

#[derive(Clone, Debug)]
pub struct PointerTrack {
    id: PointerId,
    initial: PointerSample,
    current: PointerSample,
    history: Deque<PointerSample, TRACK_HISTORY_LEN>,
    vector_timespan_ms: u64,
    status: TrackStatus,
    global: GlobalTrackParameters,
    live: LiveTrackParameters,
}

impl PointerTrack {
    pub fn new(sample: PointerSample, vector_timespan_ms: u64) -> Self {
        let mut history = Deque::new();
        let _ = history.push_back(sample);
        let mut track = Self {
            id: sample.id,
            initial: sample,
            current: sample,
            history,
            vector_timespan_ms: vector_timespan_ms.max(1),
            status: TrackStatus::Active,
            global: GlobalTrackParameters::default(),
            live: LiveTrackParameters::default(),
        };
        track.recompute();
        track
    }

    pub fn id(&self) -> PointerId {
        self.id
    }

    pub fn initial(&self) -> &PointerSample {
        &self.initial
    }

    pub fn current(&self) -> &PointerSample {
        &self.current
    }

    pub fn status(&self) -> TrackStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, TrackStatus::Active)
    }

    pub fn global(&self) -> &GlobalTrackParameters {
        &self.global
    }

    pub fn live(&self) -> &LiveTrackParameters {
        &self.live
    }

    pub fn vector_timespan_ms(&self) -> u64 {
        self.vector_timespan_ms
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Applies a move, up or cancel sample for this contact.
    pub fn update(&mut self, sample: PointerSample) {
        if !self.is_active() {
            log::warn!("pointer {:?}: sample after release ignored", self.id);
            return;
        }

        let mut sample = sample;
        if sample.t_ms < self.current.t_ms {
            log::warn!(
                "pointer {:?}: sample at {}ms precedes {}ms, clamped",
                self.id,
                sample.t_ms,
                self.current.t_ms
            );
            sample.t_ms = self.current.t_ms;
        }

        self.current = sample;
        self.record(sample);
        self.recompute();
        log::trace!(
            "pointer {:?}: {:?} at ({}, {}) live={:.1}px/s global={:.1}px",
            self.id,
            sample.phase,
            sample.point.x,
            sample.point.y,
            self.live.speed,
            self.global.vector.length
        );

        match sample.phase {
            PointerPhase::Up => self.finish(TrackStatus::Released),
            PointerPhase::Cancel => self.finish(TrackStatus::Canceled),
            PointerPhase::Down | PointerPhase::Move => {}
        }
    }

    /// Time passed without a new sample. Vectors keep their last value.
    pub fn on_idle(&mut self, now_ms: u64) {
        if self.is_active() {
            self.global.duration_ms = now_ms.saturating_sub(self.initial.t_ms);
        }
    }

    /// Oldest retained sample the live vector starts from: the newest sample at least one
    /// timespan older than the current one, otherwise the first retained sample.
    pub fn live_window_start(&self) -> PointerSample {
        let now_ms = self.current.t_ms;
        self.history
            .iter()
            .rev()
            .skip(1)
            .find(|sample| now_ms.saturating_sub(sample.t_ms) >= self.vector_timespan_ms)
            .or_else(|| self.history.front())
            .copied()
            .unwrap_or(self.initial)
    }

    fn record(&mut self, sample: PointerSample) {
        let timespan_ms = self.vector_timespan_ms;
        // The oldest sample may go once its successor already spans the window.
        while self.history.len() >= 2 {
            let successor_spans = self
                .history
                .iter()
                .nth(1)
                .is_some_and(|next| sample.t_ms.saturating_sub(next.t_ms) >= timespan_ms);
            if !successor_spans {
                break;
            }
            let _ = self.history.pop_front();
        }

        if self.history.is_full() {
            // Thin the window behind its anchor so the anchor stays a valid start.
            if let Some(anchor) = self.history.pop_front() {
                let _ = self.history.pop_front();
                let _ = self.history.push_front(anchor);
            }
        }
        let _ = self.history.push_back(sample);
    }

    fn recompute(&mut self) {
        let start = self.live_window_start();
        let live_vector = geometry::vector(start.point, self.current.point);
        let live_speed = geometry::speed(&live_vector, start.t_ms, self.current.t_ms);
        self.live = LiveTrackParameters {
            vector: live_vector,
            speed: live_speed,
            is_moving: !live_vector.is_zero(),
            start_ms: start.t_ms,
            end_ms: self.current.t_ms,
        };

        let global_vector = geometry::vector(self.initial.point, self.current.point);
        self.global.speed =
            geometry::speed(&global_vector, self.initial.t_ms, self.current.t_ms);
        self.global.duration_ms = self.current.t_ms.saturating_sub(self.initial.t_ms);
        self.global.max_speed = self.global.max_speed.max(live_speed);
        self.global.max_distance = self.global.max_distance.max(global_vector.length);
        self.global.has_been_moved |= !global_vector.is_zero();
        self.global.vector = global_vector;
    }

    fn finish(&mut self, status: TrackStatus) {
        self.global.final_speed = Some(self.live.speed);
        self.live.speed = 0.0;
        self.live.is_moving = false;
        self.status = status;
    }
}
