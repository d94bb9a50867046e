use super::*;

fn manager() -> PointerManager {
    PointerManager::new(100)
}

fn feed(manager: &mut PointerManager, samples: &[PointerSample]) {
    for sample in samples {
        manager
            .handle_sample(*sample)
            .unwrap_or_else(|err| panic!("sample {sample:?} failed: {err}"));
    }
}

#[test]
fn single_down_then_up_returns_to_empty_surface() {
    let mut manager = manager();
    feed(&mut manager, &[PointerSample::down(1, 0.0, 0.0, 0)]);
    assert_eq!(manager.state(), ArityState::SinglePointer);
    assert!(manager.single_input().is_some());
    assert!(manager.dual_input().is_none());

    feed(&mut manager, &[PointerSample::up(1, 0.0, 0.0, 150)]);
    assert_eq!(manager.state(), ArityState::NoPointer);
    assert_eq!(manager.on_surface_count(), 0);
    assert_eq!(manager.unused_ids().count(), 0);
    assert!(manager.active_input().is_none());

    let removed = manager.last_removed().map(PointerTrack::id);
    assert_eq!(removed, Some(PointerId(1)));
    assert_eq!(manager.session_pointer_count(), 1);
}

#[test]
fn second_pointer_forms_dual_unit() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 100.0, 0.0, 10),
        ],
    );
    assert_eq!(manager.state(), ArityState::DualPointer);
    let dual = manager.dual_input().map(|input| (input.first().id(), input.second().id()));
    assert_eq!(dual, Some((PointerId(1), PointerId(2))));
    assert_eq!(manager.session_pointer_count(), 2);
}

#[test]
fn third_pointer_is_parked_without_touching_the_pair() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 100.0, 0.0, 10),
        ],
    );
    let serial = manager.unit_serial();

    feed(&mut manager, &[PointerSample::down(3, 50.0, 50.0, 20)]);
    assert_eq!(manager.state(), ArityState::DualPointer);
    assert_eq!(manager.unit_serial(), serial);
    assert_eq!(manager.unused_ids().collect::<Vec<_>>(), vec![PointerId(3)]);
    assert_eq!(manager.on_surface_count(), 3);
}

#[test]
fn releasing_paired_pointers_promotes_parked_one() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 100.0, 0.0, 10),
            PointerSample::down(3, 50.0, 50.0, 20),
        ],
    );
    let first_serial = manager.unit_serial();

    feed(&mut manager, &[PointerSample::up(1, 0.0, 0.0, 30)]);
    assert_eq!(manager.state(), ArityState::DualPointer);
    assert_ne!(manager.unit_serial(), first_serial);
    let pair = manager.dual_input().map(|input| (input.first().id(), input.second().id()));
    assert_eq!(pair, Some((PointerId(2), PointerId(3))));
    assert_eq!(manager.unused_ids().count(), 0);

    feed(&mut manager, &[PointerSample::up(2, 100.0, 0.0, 40)]);
    assert_eq!(manager.state(), ArityState::SinglePointer);
    let single = manager.single_input().map(|input| input.pointer_id());
    assert_eq!(single, Some(PointerId(3)));

    feed(&mut manager, &[PointerSample::up(3, 50.0, 50.0, 50)]);
    assert_eq!(manager.state(), ArityState::NoPointer);
    assert_eq!(manager.on_surface_count(), 0);
}

#[test]
fn releasing_parked_pointer_keeps_unit() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 100.0, 0.0, 10),
            PointerSample::down(3, 50.0, 50.0, 20),
        ],
    );
    let serial = manager.unit_serial();

    feed(&mut manager, &[PointerSample::up(3, 50.0, 50.0, 30)]);
    assert_eq!(manager.state(), ArityState::DualPointer);
    assert_eq!(manager.unit_serial(), serial);
    assert_eq!(manager.unused_ids().count(), 0);
    assert_eq!(manager.on_surface_count(), 2);
}

#[test]
fn dual_release_without_parked_pointer_degrades_to_single() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 100.0, 0.0, 10),
            PointerSample::cancel(2, 100.0, 0.0, 20),
        ],
    );
    assert_eq!(manager.state(), ArityState::SinglePointer);
    assert_eq!(
        manager.single_input().map(|input| input.pointer_id()),
        Some(PointerId(1))
    );
    assert_eq!(
        manager.last_removed().map(PointerTrack::status),
        Some(crate::pointer::TrackStatus::Canceled)
    );
}

#[test]
fn moves_refresh_dual_parameters() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 100.0, 0.0, 0),
            PointerSample::moved(1, 25.0, 0.0, 200),
            PointerSample::moved(2, 75.0, 0.0, 200),
        ],
    );
    let live = manager.dual_input().map(|input| *input.live());
    let live = live.unwrap_or_default();
    assert!((live.distance_change + 50.0).abs() < 1e-3);
    assert!(live.center_movement.length < 1e-3);
}

#[test]
fn last_removed_lasts_one_step() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::up(1, 0.0, 0.0, 100),
        ],
    );
    assert!(manager.last_removed().is_some());
    manager.on_idle_tick(200).unwrap_or_default();
    assert!(manager.last_removed().is_none());
}

#[test]
fn idle_tick_ages_tracks_and_unit() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 100.0, 0.0, 100),
        ],
    );
    manager.on_idle_tick(700).unwrap_or_default();

    let first = manager.track(PointerId(1)).map(|t| t.global().duration_ms);
    assert_eq!(first, Some(700));
    let unit_duration = manager.dual_input().map(|input| input.global().duration_ms);
    assert_eq!(unit_duration, Some(600));
}

#[test]
fn unknown_and_repeated_samples_are_tolerated() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::moved(9, 1.0, 1.0, 0),
            PointerSample::up(9, 1.0, 1.0, 5),
            PointerSample::down(1, 0.0, 0.0, 10),
            PointerSample::down(1, 5.0, 0.0, 20),
            PointerSample::up(4, 0.0, 0.0, 30),
        ],
    );
    assert_eq!(manager.state(), ArityState::SinglePointer);
    assert_eq!(manager.on_surface_count(), 1);
    let x = manager.track(PointerId(1)).map(|t| t.current().point.x);
    assert_eq!(x, Some(5.0));
}

#[test]
fn new_session_resets_pointer_count() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 10.0, 0.0, 5),
            PointerSample::up(2, 10.0, 0.0, 10),
            PointerSample::up(1, 0.0, 0.0, 15),
        ],
    );
    let session = manager.session();
    assert_eq!(manager.session_pointer_count(), 2);

    feed(&mut manager, &[PointerSample::down(3, 0.0, 0.0, 100)]);
    assert_eq!(manager.session(), session + 1);
    assert_eq!(manager.session_pointer_count(), 1);
}

#[test]
fn cancel_all_empties_surface() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 10.0, 0.0, 5),
            PointerSample::down(3, 20.0, 0.0, 10),
        ],
    );
    manager
        .cancel_all(50)
        .unwrap_or_else(|err| panic!("cancel failed: {err}"));
    assert_eq!(manager.state(), ArityState::NoPointer);
    assert_eq!(manager.on_surface_count(), 0);
    assert!(manager.last_removed().is_some());
}

#[test]
fn reset_drops_everything() {
    let mut manager = manager();
    feed(
        &mut manager,
        &[
            PointerSample::down(1, 0.0, 0.0, 0),
            PointerSample::down(2, 10.0, 0.0, 5),
        ],
    );
    manager.reset();
    assert_eq!(manager.state(), ArityState::NoPointer);
    assert_eq!(manager.on_surface_count(), 0);

    feed(&mut manager, &[PointerSample::down(5, 0.0, 0.0, 100)]);
    assert_eq!(manager.state(), ArityState::SinglePointer);
}
