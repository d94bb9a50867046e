use statig::blocking::IntoStateMachineExt as _;

use crate::error::EngineError;

use super::input::{DualPointerInput, DualUnit, PointerInput, SinglePointerInput};
use super::track::PointerTrack;
use super::types::{PointerId, PointerPhase, PointerSample};

mod hsm;

#[cfg(test)]
mod tests;

use hsm::ArityHsm;

/// How many contacts currently form the active recognition unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArityState {
    #[default]
    NoPointer,
    SinglePointer,
    DualPointer,
}

#[derive(Clone, Copy, Debug)]
enum ArityEvent {
    Sample(PointerSample),
    Idle { now_ms: u64 },
    Reset,
}

#[derive(Debug, Default)]
struct DispatchContext {
    removed: Option<PointerTrack>,
    violation: Option<EngineError>,
}

#[derive(Clone, Debug)]
enum ActiveUnit {
    None,
    Single { id: PointerId, serial: u64 },
    Dual(DualUnit),
}

pub struct PointerManager {
    machine: statig::blocking::StateMachine<ArityHsm>,
    last_removed: Option<PointerTrack>,
}

impl Default for PointerManager {
    fn default() -> Self {
        Self::new(super::track::DEFAULT_VECTOR_TIMESPAN_MS)
    }
}

impl PointerManager {
    pub fn new(vector_timespan_ms: u64) -> Self {
        Self {
            machine: ArityHsm::new(vector_timespan_ms).state_machine(),
            last_removed: None,
        }
    }

    /// Routes one host sample to its track, then refreshes the active unit.
    pub fn handle_sample(&mut self, sample: PointerSample) -> Result<(), EngineError> {
        self.dispatch(ArityEvent::Sample(sample))
    }

    /// Ages every on-surface track without new positions.
    pub fn on_idle_tick(&mut self, now_ms: u64) -> Result<(), EngineError> {
        self.dispatch(ArityEvent::Idle { now_ms })
    }

    /// Cancels parked pointers first, then the active unit, leaving the surface empty.
    pub fn cancel_all(&mut self, now_ms: u64) -> Result<(), EngineError> {
        let inner = self.machine.inner();
        let mut ids: Vec<PointerId> = inner.unused.iter().copied().collect();
        ids.extend(
            inner
                .on_surface
                .iter()
                .map(PointerTrack::id)
                .filter(|id| !inner.unused.contains(id)),
        );
        let samples: Vec<PointerSample> = ids
            .into_iter()
            .filter_map(|id| inner.track(id))
            .map(|track| {
                PointerSample::new(
                    track.id(),
                    track.current().point,
                    now_ms.max(track.current().t_ms),
                    PointerPhase::Cancel,
                )
            })
            .collect();

        for sample in samples {
            self.handle_sample(sample)?;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        let _ = self.dispatch(ArityEvent::Reset);
        self.last_removed = None;
    }

    pub fn state(&self) -> ArityState {
        self.machine.inner().arity
    }

    /// Serial of the active unit; a new one is issued each time a unit forms.
    pub fn unit_serial(&self) -> Option<u64> {
        let inner = self.machine.inner();
        match &inner.unit {
            ActiveUnit::None => None,
            ActiveUnit::Single { serial, .. } => Some(*serial),
            ActiveUnit::Dual(unit) => Some(unit.serial()),
        }
    }

    /// Counts interaction sessions; bumps when the first pointer lands on an empty surface.
    pub fn session(&self) -> u64 {
        self.machine.inner().session
    }

    /// Pointers that touched the surface since it was last empty.
    pub fn session_pointer_count(&self) -> usize {
        self.machine.inner().session_pointer_count
    }

    pub fn on_surface_count(&self) -> usize {
        self.machine.inner().on_surface.len()
    }

    pub fn unused_ids(&self) -> impl Iterator<Item = PointerId> + '_ {
        self.machine.inner().unused.iter().copied()
    }

    pub fn track(&self, id: PointerId) -> Option<&PointerTrack> {
        self.machine.inner().track(id)
    }

    /// The track released by the latest sample; cleared by the next sample or idle tick.
    pub fn last_removed(&self) -> Option<&PointerTrack> {
        self.last_removed.as_ref()
    }

    pub fn single_input(&self) -> Option<SinglePointerInput<'_>> {
        let inner = self.machine.inner();
        match &inner.unit {
            ActiveUnit::Single { id, .. } => inner.track(*id).map(SinglePointerInput::new),
            _ => None,
        }
    }

    pub fn dual_input(&self) -> Option<DualPointerInput<'_>> {
        let inner = self.machine.inner();
        match &inner.unit {
            ActiveUnit::Dual(unit) => {
                let first = inner.track(unit.first())?;
                let second = inner.track(unit.second())?;
                Some(DualPointerInput::new(unit, first, second))
            }
            _ => None,
        }
    }

    pub fn active_input(&self) -> Option<PointerInput<'_>> {
        match self.state() {
            ArityState::NoPointer => None,
            ArityState::SinglePointer => self.single_input().map(PointerInput::Single),
            ArityState::DualPointer => self.dual_input().map(PointerInput::Dual),
        }
    }

    fn dispatch(&mut self, event: ArityEvent) -> Result<(), EngineError> {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        self.last_removed = context.removed;
        match context.violation {
            Some(violation) => Err(violation),
            None => Ok(()),
        }
    }
}
