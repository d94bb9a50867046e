use std::collections::VecDeque;

use statig::prelude::*;

use super::*;

pub(super) struct ArityHsm {
    vector_timespan_ms: u64,
    next_serial: u64,
    pub(super) arity: ArityState,
    pub(super) on_surface: Vec<PointerTrack>,
    pub(super) unused: VecDeque<PointerId>,
    pub(super) unit: ActiveUnit,
    pub(super) session: u64,
    pub(super) session_pointer_count: usize,
}

#[state_machine(initial = "State::no_pointer()")]
impl ArityHsm {
    #[state]
    fn no_pointer(&mut self, event: &ArityEvent) -> Outcome<State> {
        match event {
            ArityEvent::Sample(sample) => match sample.phase {
                PointerPhase::Down => {
                    self.begin_session();
                    self.add_track(*sample);
                    self.form_single(sample.id);
                    Transition(State::single_pointer())
                }
                PointerPhase::Move | PointerPhase::Up | PointerPhase::Cancel => {
                    log::warn!(
                        "pointer {:?}: {:?} on an empty surface ignored",
                        sample.id,
                        sample.phase
                    );
                    Handled
                }
            },
            ArityEvent::Idle { .. } => Handled,
            ArityEvent::Reset => {
                self.clear();
                Handled
            }
        }
    }

    #[state]
    fn single_pointer(
        &mut self,
        context: &mut DispatchContext,
        event: &ArityEvent,
    ) -> Outcome<State> {
        match event {
            ArityEvent::Sample(sample) => match sample.phase {
                PointerPhase::Down => {
                    if self.is_on_surface(sample.id) {
                        self.repeat_down(*sample);
                        return Handled;
                    }
                    let Some(first) = self.single_id() else {
                        context.violation = Some(EngineError::UnitMismatch {
                            state: self.arity,
                        });
                        return Handled;
                    };
                    self.add_track(*sample);
                    self.form_dual(first, sample.id);
                    Transition(State::dual_pointer())
                }
                PointerPhase::Move => {
                    self.move_track(*sample);
                    Handled
                }
                PointerPhase::Up | PointerPhase::Cancel => {
                    let Some(removed) = self.remove_track(*sample) else {
                        return Handled;
                    };
                    context.removed = Some(removed);
                    self.unit = ActiveUnit::None;
                    self.arity = ArityState::NoPointer;
                    log::debug!("arity: single -> none ({:?} left)", sample.id);
                    if !self.on_surface.is_empty() || !self.unused.is_empty() {
                        context.violation = Some(EngineError::StrayPointers {
                            on_surface: self.on_surface.len(),
                            unused: self.unused.len(),
                        });
                    }
                    Transition(State::no_pointer())
                }
            },
            ArityEvent::Idle { now_ms } => {
                self.idle(*now_ms);
                Handled
            }
            ArityEvent::Reset => {
                self.clear();
                Transition(State::no_pointer())
            }
        }
    }

    #[state]
    fn dual_pointer(
        &mut self,
        context: &mut DispatchContext,
        event: &ArityEvent,
    ) -> Outcome<State> {
        match event {
            ArityEvent::Sample(sample) => match sample.phase {
                PointerPhase::Down => {
                    if self.is_on_surface(sample.id) {
                        self.repeat_down(*sample);
                        return Handled;
                    }
                    self.add_track(*sample);
                    self.unused.push_back(sample.id);
                    log::debug!(
                        "pointer {:?} parked, {} waiting for a free slot",
                        sample.id,
                        self.unused.len()
                    );
                    Handled
                }
                PointerPhase::Move => {
                    self.move_track(*sample);
                    Handled
                }
                PointerPhase::Up | PointerPhase::Cancel => {
                    let partner = match &self.unit {
                        ActiveUnit::Dual(unit) => unit.partner_of(sample.id),
                        _ => None,
                    };
                    let Some(removed) = self.remove_track(*sample) else {
                        return Handled;
                    };
                    context.removed = Some(removed);

                    // A parked pointer leaving does not touch the pair.
                    let Some(survivor) = partner else {
                        return Handled;
                    };

                    if let Some(parked) = self.unused.pop_front() {
                        self.form_dual(survivor, parked);
                        Handled
                    } else {
                        self.form_single(survivor);
                        Transition(State::single_pointer())
                    }
                }
            },
            ArityEvent::Idle { now_ms } => {
                self.idle(*now_ms);
                Handled
            }
            ArityEvent::Reset => {
                self.clear();
                Transition(State::no_pointer())
            }
        }
    }
}

impl ArityHsm {
    pub(super) fn new(vector_timespan_ms: u64) -> Self {
        Self {
            vector_timespan_ms,
            next_serial: 0,
            arity: ArityState::NoPointer,
            on_surface: Vec::new(),
            unused: VecDeque::new(),
            unit: ActiveUnit::None,
            session: 0,
            session_pointer_count: 0,
        }
    }

    pub(super) fn track(&self, id: PointerId) -> Option<&PointerTrack> {
        self.on_surface.iter().find(|track| track.id() == id)
    }

    fn is_on_surface(&self, id: PointerId) -> bool {
        self.track(id).is_some()
    }

    fn single_id(&self) -> Option<PointerId> {
        match &self.unit {
            ActiveUnit::Single { id, .. } => Some(*id),
            _ => None,
        }
    }

    fn issue_serial(&mut self) -> u64 {
        self.next_serial = self.next_serial.wrapping_add(1);
        self.next_serial
    }

    fn begin_session(&mut self) {
        self.session = self.session.wrapping_add(1);
        self.session_pointer_count = 0;
    }

    fn add_track(&mut self, sample: PointerSample) {
        self.on_surface
            .push(PointerTrack::new(sample, self.vector_timespan_ms));
        self.session_pointer_count = self.session_pointer_count.saturating_add(1);
    }

    fn repeat_down(&mut self, sample: PointerSample) {
        log::warn!("pointer {:?}: repeated down treated as move", sample.id);
        self.move_track(sample);
    }

    fn move_track(&mut self, sample: PointerSample) {
        let Some(track) = self.on_surface.iter_mut().find(|t| t.id() == sample.id) else {
            log::warn!("pointer {:?}: move for an unknown contact ignored", sample.id);
            return;
        };
        track.update(sample);
        self.refresh_unit();
    }

    fn remove_track(&mut self, sample: PointerSample) -> Option<PointerTrack> {
        let Some(index) = self.on_surface.iter().position(|t| t.id() == sample.id) else {
            log::warn!(
                "pointer {:?}: {:?} for an unknown contact ignored",
                sample.id,
                sample.phase
            );
            return None;
        };
        let mut track = self.on_surface.remove(index);
        track.update(sample);
        self.unused.retain(|id| *id != sample.id);
        self.refresh_unit();
        Some(track)
    }

    fn form_single(&mut self, id: PointerId) {
        let serial = self.issue_serial();
        self.unit = ActiveUnit::Single { id, serial };
        self.arity = ArityState::SinglePointer;
        log::debug!("arity: single unit #{serial} on {id:?}");
    }

    fn form_dual(&mut self, first: PointerId, second: PointerId) {
        let serial = self.issue_serial();
        let unit = match (self.track(first), self.track(second)) {
            (Some(first), Some(second)) => DualUnit::form(serial, first, second),
            _ => {
                log::error!("arity: cannot pair {first:?} with {second:?}, track missing");
                return;
            }
        };
        self.unit = ActiveUnit::Dual(unit);
        self.arity = ArityState::DualPointer;
        log::debug!("arity: dual unit #{serial} on {first:?} + {second:?}");
    }

    fn refresh_unit(&mut self) {
        if let ActiveUnit::Dual(unit) = &mut self.unit {
            let first = self.on_surface.iter().find(|t| t.id() == unit.first());
            let second = self.on_surface.iter().find(|t| t.id() == unit.second());
            if let (Some(first), Some(second)) = (first, second) {
                unit.refresh(first, second);
            }
        }
    }

    fn idle(&mut self, now_ms: u64) {
        for track in &mut self.on_surface {
            track.on_idle(now_ms);
        }
        if let ActiveUnit::Dual(unit) = &mut self.unit {
            unit.on_idle(now_ms);
        }
    }

    fn clear(&mut self) {
        self.on_surface.clear();
        self.unused.clear();
        self.unit = ActiveUnit::None;
        self.arity = ArityState::NoPointer;
        self.session_pointer_count = 0;
    }
}
