use super::*;
use crate::geometry::Direction;
use crate::pointer::{PointerManager, PointerSample};

fn down(id: u32, x: f32, y: f32, t_ms: u64) -> PointerSample {
    PointerSample::down(id, x, y, t_ms)
}

fn moved(id: u32, x: f32, y: f32, t_ms: u64) -> PointerSample {
    PointerSample::moved(id, x, y, t_ms)
}

fn up(id: u32, x: f32, y: f32, t_ms: u64) -> PointerSample {
    PointerSample::up(id, x, y, t_ms)
}

struct Rig {
    manager: PointerManager,
    gesture: Gesture,
    events: Vec<GestureEvent>,
}

impl Rig {
    fn new(kind: GestureKind) -> Self {
        Self::with_config(GestureConfig::for_kind(kind))
    }

    fn with_config(config: GestureConfig) -> Self {
        Self {
            manager: PointerManager::new(100),
            gesture: Gesture::new(config),
            events: Vec::new(),
        }
    }

    fn feed(&mut self, samples: &[PointerSample]) -> Vec<String> {
        let mut names = Vec::new();
        for sample in samples {
            self.manager
                .handle_sample(*sample)
                .unwrap_or_else(|err| panic!("sample {sample:?}: {err}"));
            names.extend(self.recognize(sample.t_ms, Some(*sample)));
        }
        names
    }

    fn idle(&mut self, now_ms: u64) -> Vec<String> {
        self.manager
            .on_idle_tick(now_ms)
            .unwrap_or_else(|err| panic!("idle {now_ms}: {err}"));
        self.recognize(now_ms, None)
    }

    fn recognize(&mut self, t_ms: u64, sample: Option<PointerSample>) -> Vec<String> {
        let mut events = GestureEvents::new();
        let context = RecognitionContext {
            manager: &self.manager,
            t_ms,
            sample,
            direction_events: true,
        };
        self.gesture
            .recognize(&context, &mut events)
            .unwrap_or_else(|err| panic!("recognize at {t_ms}: {err}"));
        self.events.extend(events.iter().copied());
        events.names()
    }
}

#[test]
fn tap_fires_once_on_quick_release() {
    let mut rig = Rig::new(GestureKind::Tap);
    let names = rig.feed(&[down(1, 0.0, 0.0, 0), up(1, 0.0, 0.0, 150)]);
    assert_eq!(names, vec!["tap"]);

    let tap = &rig.events[0];
    assert_eq!(tap.kind, GestureEventKind::Fire);
    assert_eq!(tap.global.distance, 0.0);
    assert_eq!(tap.global.duration_ms, 150);
    assert_eq!(rig.gesture.state(), GestureState::Inactive);
}

#[test]
fn tap_rejects_long_contact() {
    let mut rig = Rig::new(GestureKind::Tap);
    let names = rig.feed(&[down(1, 0.0, 0.0, 0), up(1, 2.0, 0.0, 350)]);
    assert!(names.is_empty());
    assert_eq!(
        rig.gesture.last_reject(),
        Some(RejectReason::Threshold(Parameter::Duration))
    );
}

#[test]
fn tap_rejects_multi_pointer_session() {
    let mut rig = Rig::new(GestureKind::Tap);
    let names = rig.feed(&[
        down(1, 0.0, 0.0, 0),
        down(2, 40.0, 0.0, 10),
        up(2, 40.0, 0.0, 60),
        up(1, 0.0, 0.0, 80),
    ]);
    assert!(names.is_empty());
    assert_eq!(
        rig.gesture.last_reject(),
        Some(RejectReason::Threshold(Parameter::PointerCount))
    );
}

#[test]
fn press_matures_from_idle_ticks_and_fires_once() {
    let mut rig = Rig::new(GestureKind::Press);
    let mut names = rig.feed(&[down(1, 5.0, 5.0, 0)]);
    for t_ms in (100..=1_000).step_by(100) {
        names.extend(rig.idle(t_ms));
    }
    assert_eq!(names, vec!["press"]);
    assert!(rig.gesture.is_active());

    let names = rig.feed(&[up(1, 5.0, 5.0, 1_050)]);
    assert_eq!(names, vec!["pressend"]);
    assert_eq!(rig.gesture.state(), GestureState::Inactive);
}

#[test]
fn press_ends_when_contact_drifts() {
    let mut rig = Rig::new(GestureKind::Press);
    rig.feed(&[down(1, 0.0, 0.0, 0)]);
    let started = rig.idle(700);
    assert_eq!(started, vec!["press"]);

    let names = rig.feed(&[moved(1, 30.0, 0.0, 750)]);
    assert_eq!(names, vec!["pressend"]);
}

#[test]
fn pan_updates_with_direction_and_swipes_on_fast_release() {
    let mut rig = Rig::new(GestureKind::Pan);
    let names = rig.feed(&[
        down(1, 0.0, 0.0, 0),
        moved(1, 20.0, 0.0, 20),
        moved(1, 200.0, 0.0, 50),
        up(1, 200.0, 0.0, 50),
    ]);
    assert_eq!(
        names,
        vec!["panstart", "pan", "panright", "panend", "swipe", "swiperight"]
    );

    let swipe = rig
        .events
        .iter()
        .find(|event| event.kind == GestureEventKind::Swipe)
        .copied()
        .unwrap_or_else(|| panic!("no swipe in {:?}", rig.events));
    assert_eq!(swipe.live.direction, Direction::Right);
    assert!((swipe.live.distance - 200.0).abs() < 1e-3);
}

#[test]
fn pan_slow_release_has_no_swipe() {
    let mut rig = Rig::new(GestureKind::Pan);
    let names = rig.feed(&[
        down(1, 0.0, 0.0, 0),
        moved(1, 20.0, 0.0, 500),
        up(1, 20.0, 0.0, 1_000),
    ]);
    assert_eq!(names, vec!["panstart", "panend"]);
}

#[test]
fn pan_direction_filter_applies_only_before_start() {
    let mut config = GestureConfig::for_kind(GestureKind::Pan);
    config.directions = DirectionSet::HORIZONTAL;

    let mut vertical = Rig::with_config(config.clone());
    let names = vertical.feed(&[down(1, 0.0, 0.0, 0), moved(1, 0.0, 40.0, 50)]);
    assert!(names.is_empty());
    assert_eq!(
        vertical.gesture.last_reject(),
        Some(RejectReason::Direction)
    );

    let mut rig = Rig::with_config(config);
    let names = rig.feed(&[
        down(1, 0.0, 0.0, 0),
        moved(1, 20.0, 0.0, 20),
        moved(1, 20.0, 40.0, 40),
    ]);
    assert_eq!(names, vec!["panstart", "pan", "pandown"]);
}

#[test]
fn pinch_starts_once_both_contacts_converge() {
    let mut rig = Rig::new(GestureKind::Pinch);
    let names = rig.feed(&[
        down(1, 0.0, 0.0, 0),
        down(2, 100.0, 0.0, 0),
        moved(1, 25.0, 0.0, 200),
    ]);
    assert!(names.is_empty());

    let names = rig.feed(&[moved(2, 75.0, 0.0, 200)]);
    assert_eq!(names, vec!["pinchstart"]);
    let start = rig.events[0];
    assert!((start.live.scale - 0.5).abs() < 1e-3);

    let names = rig.feed(&[up(1, 25.0, 0.0, 250)]);
    assert_eq!(names, vec!["pinchend"]);
}

#[test]
fn rotation_about_midpoint_is_rotate_not_pinch() {
    // Both contacts turn 30 degrees clockwise around (50, 0), radius 50.
    let (sin, cos) = 30f32.to_radians().sin_cos();
    let first = (50.0 - 50.0 * cos, -50.0 * sin);
    let second = (50.0 + 50.0 * cos, 50.0 * sin);
    let samples = [
        down(1, 0.0, 0.0, 0),
        down(2, 100.0, 0.0, 0),
        moved(1, first.0, first.1, 200),
        moved(2, second.0, second.1, 200),
    ];

    let mut pinch = Rig::new(GestureKind::Pinch);
    assert!(pinch.feed(&samples).is_empty());

    let mut rotate = Rig::new(GestureKind::Rotate);
    let names = rotate.feed(&samples);
    assert_eq!(names.first().map(String::as_str), Some("rotatestart"));
    assert!(rotate.gesture.is_active());

    let last = rotate.events.last().copied().unwrap_or_else(|| panic!("no events"));
    assert!((last.live.rotation - 30.0).abs() < 1e-2);
    assert!(last.global.distance < 1e-3);
}

#[test]
fn two_finger_pan_follows_parallel_contacts() {
    let mut rig = Rig::new(GestureKind::TwoFingerPan);
    let names = rig.feed(&[
        down(1, 0.0, 0.0, 0),
        down(2, 100.0, 0.0, 0),
        moved(1, 0.0, 40.0, 150),
        moved(2, 100.0, 40.0, 150),
    ]);
    assert_eq!(names, vec!["twofingerpanstart"]);

    let names = rig.feed(&[moved(1, 0.0, 80.0, 300), moved(2, 100.0, 80.0, 300)]);
    assert_eq!(
        names,
        vec![
            "twofingerpan",
            "twofingerpandown",
            "twofingerpan",
            "twofingerpandown"
        ]
    );
}

#[test]
fn re_formed_pair_ends_dual_gesture() {
    let mut rig = Rig::new(GestureKind::Pinch);
    let names = rig.feed(&[
        down(1, 0.0, 0.0, 0),
        down(2, 100.0, 0.0, 0),
        down(3, 50.0, 80.0, 0),
        moved(1, 25.0, 0.0, 200),
        moved(2, 75.0, 0.0, 200),
    ]);
    assert_eq!(names, vec!["pinchstart"]);

    let names = rig.feed(&[up(1, 25.0, 0.0, 250)]);
    assert_eq!(names, vec!["pinchend"]);
    assert_eq!(
        rig.gesture.last_reject(),
        Some(RejectReason::UnitChanged)
    );
}

#[test]
fn blocked_gesture_stays_silent_until_unblocked() {
    let mut rig = Rig::new(GestureKind::Tap);
    assert!(rig.gesture.block());
    assert!(!rig.gesture.block());

    let names = rig.feed(&[down(1, 0.0, 0.0, 0), up(1, 0.0, 0.0, 100)]);
    assert!(names.is_empty());
    assert_eq!(rig.gesture.state(), GestureState::Blocked);
    assert_eq!(rig.gesture.last_reject(), Some(RejectReason::Blocked));

    assert!(rig.gesture.unblock());
    let names = rig.feed(&[down(1, 0.0, 0.0, 200), up(1, 0.0, 0.0, 300)]);
    assert_eq!(names, vec!["tap"]);
}

#[test]
fn active_phase_without_profile_is_an_error() {
    let mut config = GestureConfig::for_kind(GestureKind::Press);
    config.active = None;
    let mut rig = Rig::with_config(config);
    rig.feed(&[down(1, 0.0, 0.0, 0)]);
    assert_eq!(rig.idle(650), vec!["press"]);

    rig.manager
        .on_idle_tick(700)
        .unwrap_or_else(|err| panic!("idle: {err}"));
    let context = RecognitionContext {
        manager: &rig.manager,
        t_ms: 700,
        sample: None,
        direction_events: true,
    };
    let result = rig.gesture.recognize(&context, &mut GestureEvents::new());
    assert_eq!(
        result,
        Err(crate::EngineError::MissingThresholdProfile {
            gesture: GestureKind::Press
        })
    );
}

#[test]
fn requirements_are_inclusive_and_type_checked() {
    let range = Requirement::between(5.0, 10.0);
    assert!(range.holds(Some(Value::Number(5.0))));
    assert!(range.holds(Some(Value::Number(10.0))));
    assert!(!range.holds(Some(Value::Number(10.5))));
    assert!(!range.holds(Some(Value::Flag(true))));
    assert!(!range.holds(None));

    assert!(Requirement::at_least(3.0).holds(Some(Value::Number(1e6))));
    assert!(Requirement::is(true).holds(Some(Value::Flag(true))));
    assert!(!Requirement::is(true).holds(Some(Value::Flag(false))));
}

#[test]
fn direction_sets() {
    assert!(DirectionSet::ALL.allows(Direction::None));
    assert!(DirectionSet::HORIZONTAL.allows(Direction::Left));
    assert!(!DirectionSet::HORIZONTAL.allows(Direction::Up));
    assert!(!DirectionSet::HORIZONTAL.allows(Direction::None));

    let set = DirectionSet::from_directions([Direction::Up, Direction::Down]);
    assert_eq!(set, DirectionSet::VERTICAL);
    let all = DirectionSet::from_directions([
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ]);
    assert!(all.is_unrestricted());
}

#[test]
fn parameter_keys_round_trip() {
    for parameter in Parameter::ALL {
        assert_eq!(Parameter::from_key(parameter.key()), Some(parameter));
    }
    assert_eq!(Parameter::from_key("wobble"), None);
    assert_eq!(Parameter::IsMoving.kind(), ParameterKind::Flag);
}

#[test]
fn event_names() {
    let event = |gesture, kind| GestureEvent {
        gesture,
        kind,
        t_ms: 0,
        global: Measurement::default(),
        live: Measurement::default(),
        source: None,
    };
    let cases = [
        (GestureKind::Tap, GestureEventKind::Fire, "tap"),
        (GestureKind::Press, GestureEventKind::Start, "press"),
        (GestureKind::Press, GestureEventKind::End, "pressend"),
        (GestureKind::Pan, GestureEventKind::Start, "panstart"),
        (
            GestureKind::Pan,
            GestureEventKind::Directional(Direction::Left),
            "panleft",
        ),
        (GestureKind::Pan, GestureEventKind::Swipe, "swipe"),
        (
            GestureKind::Pan,
            GestureEventKind::SwipeDirectional(Direction::Up),
            "swipeup",
        ),
        (GestureKind::Rotate, GestureEventKind::Update, "rotate"),
        (GestureKind::TwoFingerPan, GestureEventKind::End, "twofingerpanend"),
    ];
    for (gesture, kind, expected) in cases {
        assert_eq!(event(gesture, kind).name(), expected);
    }
}
