use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::gesture::{
    Gesture, GestureConfig, GestureEvents, GestureKind, GestureState, Recognition,
    RecognitionContext, RejectReason,
};
use crate::pointer::{ArityState, PointerManager, PointerSample};


/// Per-gesture snapshot taken after a recognition pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureTrace {
    pub kind: GestureKind,
    pub state: GestureState,
    pub reject: Option<RejectReason>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecognitionTrace {
    pub t_ms: u64,
    pub arity: ArityState,
    pub unit_serial: Option<u64>,
    pub session: u64,
    pub gestures: heapless::Vec<GestureTrace, { GestureKind::COUNT }>,
}

impl RecognitionTrace {
    pub fn gesture(&self, kind: GestureKind) -> Option<&GestureTrace> {
        self.gestures.iter().find(|trace| trace.kind == kind)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureOutput {
    pub events: GestureEvents,
    pub trace: RecognitionTrace,
}

impl GestureOutput {
    pub fn names(&self) -> Vec<String> {
        self.events.names()
    }
}

/// Feeds contact samples through the pointer manager, then every enabled gesture.
pub struct GestureEngine {
    config: EngineConfig,
    pointers: PointerManager,
    gestures: Vec<Gesture>,
    /// `blocks[i]` holds the indices gesture `i` suppresses while active.
    blocks: Vec<Vec<usize>>,
    /// Session in which a gesture last ended.
    ended_in_session: Option<u64>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let gestures = GestureKind::ALL
            .iter()
            .map(|kind| Gesture::new(GestureConfig::for_kind(*kind)))
            .collect();
        let blocks = resolve_blocks(&config);
        Self {
            pointers: PointerManager::new(config.vector_timespan_ms),
            config,
            gestures,
            blocks,
            ended_in_session: None,
        }
    }
}

impl GestureEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let gestures = config
            .gestures
            .iter()
            .map(|kind| config.gesture_config(*kind).map(Gesture::new))
            .collect::<Result<Vec<_>, _>>()?;
        let blocks = resolve_blocks(&config);
        log::debug!(
            "engine: {} gestures, simultaneous={}, consecutive={}",
            gestures.len(),
            config.simultaneous_gestures,
            config.consecutive_gestures
        );
        Ok(Self {
            pointers: PointerManager::new(config.vector_timespan_ms),
            config,
            gestures,
            blocks,
            ended_in_session: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pointers(&self) -> &PointerManager {
        &self.pointers
    }

    pub fn gesture(&self, kind: GestureKind) -> Option<&Gesture> {
        self.gestures.iter().find(|gesture| gesture.kind() == kind)
    }

    pub fn gesture_state(&self, kind: GestureKind) -> Option<GestureState> {
        self.gesture(kind).map(Gesture::state)
    }

    pub fn handle_sample(&mut self, sample: PointerSample) -> Result<GestureOutput, EngineError> {
        self.pointers.handle_sample(sample)?;
        self.recognize(sample.t_ms, Some(sample))
    }

    /// Lets time-based gestures mature while no sample arrives.
    pub fn on_idle_tick(&mut self, now_ms: u64) -> Result<GestureOutput, EngineError> {
        self.pointers.on_idle_tick(now_ms)?;
        self.recognize(now_ms, None)
    }

    /// Host-level cancel: every contact is canceled, then active gestures get to end.
    pub fn cancel(&mut self, now_ms: u64) -> Result<GestureOutput, EngineError> {
        log::debug!(
            "engine: cancel at {now_ms}ms with {} contacts",
            self.pointers.on_surface_count()
        );
        self.pointers.cancel_all(now_ms)?;
        self.recognize(now_ms, None)
    }

    /// Drops all contacts and gesture state without emitting anything.
    pub fn reset(&mut self) {
        log::debug!("engine: reset");
        self.pointers.reset();
        for gesture in &mut self.gestures {
            gesture.reset();
        }
        self.ended_in_session = None;
    }

    fn recognize(
        &mut self,
        t_ms: u64,
        sample: Option<PointerSample>,
    ) -> Result<GestureOutput, EngineError> {
        let Self {
            config,
            pointers,
            gestures,
            blocks,
            ended_in_session,
        } = &mut *self;

        let mut events = GestureEvents::new();
        let context = RecognitionContext {
            manager: pointers,
            t_ms,
            sample,
            direction_events: config.direction_events,
        };
        let session = pointers.session();
        let exclusive = !config.simultaneous_gestures;
        let active = gestures.iter().position(Gesture::is_active);

        for index in 0..gestures.len() {
            if exclusive && active.is_some_and(|active| active != index) {
                continue;
            }
            let may_start = config.consecutive_gestures || *ended_in_session != Some(session);
            if !may_start && !gestures[index].is_active() {
                continue;
            }

            match gestures[index].recognize(&context, &mut events)? {
                Recognition::Started => {
                    block_peers(gestures, &blocks[index]);
                    if exclusive {
                        break;
                    }
                }
                Recognition::Fired if exclusive => break,
                Recognition::Ended => {
                    release_peers(gestures, blocks, index);
                    *ended_in_session = Some(session);
                }
                Recognition::Fired | Recognition::Updated | Recognition::Idle => {}
            }
        }

        if !events.is_empty() {
            log::trace!("engine: {} events at {t_ms}ms", events.len());
        }
        let trace = self.trace(t_ms);
        Ok(GestureOutput { events, trace })
    }

    fn trace(&self, t_ms: u64) -> RecognitionTrace {
        let mut trace = RecognitionTrace {
            t_ms,
            arity: self.pointers.state(),
            unit_serial: self.pointers.unit_serial(),
            session: self.pointers.session(),
            gestures: heapless::Vec::new(),
        };
        for gesture in &self.gestures {
            let _ = trace.gestures.push(GestureTrace {
                kind: gesture.kind(),
                state: gesture.state(),
                reject: gesture.last_reject(),
            });
        }
        trace
    }
}

fn resolve_blocks(config: &EngineConfig) -> Vec<Vec<usize>> {
    let index_of = |kind: GestureKind| config.gestures.iter().position(|enabled| *enabled == kind);
    let mut blocks = vec![Vec::new(); config.gestures.len()];
    for (owner, target) in config.block_pairs() {
        if let (Some(owner), Some(target)) = (index_of(owner), index_of(target)) {
            if !blocks[owner].contains(&target) {
                blocks[owner].push(target);
            }
        }
    }
    blocks
}

fn block_peers(gestures: &mut [Gesture], peers: &[usize]) {
    for &peer in peers {
        gestures[peer].block();
    }
}

/// Unblocks the peers of `owner` that no other active gesture still holds.
fn release_peers(gestures: &mut [Gesture], blocks: &[Vec<usize>], owner: usize) {
    for &peer in &blocks[owner] {
        let still_held = blocks.iter().enumerate().any(|(other, targets)| {
            other != owner && gestures[other].is_active() && targets.contains(&peer)
        });
        if !still_held {
            gestures[peer].unblock();
        }
    }
}
