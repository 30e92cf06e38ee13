mod support;

use dispatch_core::courier_state::{CourierStateStore, CourierStatus};
use dispatch_core::model::CourierId;
use dispatch_core::spatial::Location;
use dispatch_core::test_helpers::snapshot;
use proptest::prelude::*;

fn fleet(t0: i64) -> CourierStateStore {
    let (store, _) = CourierStateStore::initialize(
        t0,
        &[
            snapshot(1, 0.0, 0.0, false),
            snapshot(2, 1.0, 0.0, false),
            snapshot(3, 0.0, 1.0, true),
        ],
        600,
    );
    store
}

fn is_listed(store: &mut CourierStateStore, time: i64, courier: CourierId) -> bool {
    store
        .available_at(time)
        .0
        .iter()
        .any(|c| c.courier_id == courier)
}

proptest! {
    #[test]
    fn busy_courier_reappears_exactly_at_release(
        assigned_at in 0i64..100_000,
        duration in 0i64..10_000,
        probe in 0i64..120_000,
    ) {
        let mut store = fleet(0);
        store
            .apply_assignment(CourierId(1), assigned_at, Location::new(3.0, 4.0), duration)
            .expect("known courier");

        let listed = is_listed(&mut store, probe.max(assigned_at), CourierId(1));
        prop_assert_eq!(listed, probe.max(assigned_at) >= assigned_at + duration);
    }

    #[test]
    fn summary_is_idempotent(time in 0i64..2_000) {
        let store = fleet(0);
        let before: Vec<_> = store.iter().copied().collect();
        let first = store.summary(time);
        let second = store.summary(time);
        prop_assert_eq!(first, second);
        let after: Vec<_> = store.iter().copied().collect();
        prop_assert_eq!(before, after);
    }
}

#[test]
fn release_is_monotone_in_time() {
    let mut store = fleet(0);
    store
        .apply_assignment(CourierId(2), 100, Location::default(), 50)
        .expect("known courier");

    for t in [100, 120, 149] {
        assert!(!is_listed(&mut store, t, CourierId(2)), "listed at {t}");
    }
    for t in [150, 151, 10_000] {
        assert!(is_listed(&mut store, t, CourierId(2)), "missing at {t}");
    }
}

#[test]
fn available_at_never_lists_a_courier_twice() {
    let mut store = fleet(0);
    let (available, released) = store.available_at(600);
    assert_eq!(released.len(), 1);
    let mut ids: Vec<_> = available.iter().map(|c| c.courier_id).collect();
    ids.dedup();
    assert_eq!(ids, vec![CourierId(1), CourierId(2), CourierId(3)]);
}

#[test]
fn summary_counts_due_couriers_without_releasing_them() {
    let mut store = fleet(0);
    let summary = store.summary(10_000);
    assert_eq!(summary.busy, 0);
    assert_eq!(summary.available, 3);
    assert_eq!(store.summary(599).busy, 1);
    assert_eq!(
        store.get(CourierId(3)).expect("courier 3").status,
        CourierStatus::Busy
    );

    store.advance_time(10_000);
    assert_eq!(store.summary(10_000).busy, 0);
}
