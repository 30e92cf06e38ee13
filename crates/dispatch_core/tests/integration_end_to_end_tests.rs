mod support;

use dispatch_core::config::SimulationConfig;
use dispatch_core::cost::CostFunctionKind;
use dispatch_core::courier_state::{CourierStatus, TransitionReason};
use dispatch_core::history::HistoricalData;
use dispatch_core::matching::StrategyKind;
use dispatch_core::model::{CourierId, OrderId};
use dispatch_core::runner::Simulation;
use dispatch_core::telemetry::SimTelemetry;
use dispatch_core::telemetry_export::validate_courier_timeline;
use dispatch_core::test_helpers::{order_at, single_moment_history, snapshot, waiting};

const T: i64 = 1_665_000_000;

fn scenario() -> HistoricalData {
    single_moment_history(
        T,
        vec![order_at(1, 1.0, 0.0), order_at(2, 0.0, 1.0)],
        &[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 0.0, 10.0)],
    )
}

fn simulate(
    data: &HistoricalData,
    strategy: StrategyKind,
    config: SimulationConfig,
) -> (Simulation<'_>, SimTelemetry) {
    let mut sim = Simulation::new(
        config,
        data,
        strategy.build(CostFunctionKind::DistanceToPickup, &config),
    )
    .expect("simulation builds");
    let mut sink = SimTelemetry::new();
    sim.run(&mut sink).expect("run completes");
    (sim, sink)
}

#[test]
fn three_courier_scenario_end_to_end() {
    let data = scenario();
    let config = SimulationConfig::default().with_rejection_probability(0.0);
    let (_, sink) = simulate(&data, StrategyKind::OptimalBipartite, config);

    assert_eq!(sink.cycles.len(), 1);
    let cycle = &sink.cycles[0];
    assert_eq!(cycle.num_orders_in_batch, 2);
    assert_eq!(cycle.num_available_couriers, 3);
    assert_eq!(cycle.supply_demand_ratio, 1.5);
    assert_eq!(cycle.num_accepted_assignments, 2);
    assert!((cycle.total_cost_of_cycle - 10.0).abs() < 1e-9);
    assert!((cycle.avg_cost_per_assignment - 5.0).abs() < 1e-9);
}

#[test]
fn certain_rejection_leaves_courier_state_untouched() {
    let data = scenario();
    let config = SimulationConfig::default().with_rejection_probability(1.0);
    let initial: Vec<_> = {
        let sim = Simulation::new(
            config,
            &data,
            StrategyKind::OptimalBipartite.build(CostFunctionKind::DistanceToPickup, &config),
        )
        .expect("simulation builds");
        sim.couriers().iter().copied().collect()
    };

    for strategy in StrategyKind::ALL {
        let (sim, sink) = simulate(&data, strategy, config);
        let cycle = &sink.cycles[0];
        assert_eq!(cycle.num_accepted_assignments, 0, "{}", strategy.as_str());
        assert_eq!(cycle.num_rejections, cycle.num_proposed_assignments);
        assert!(cycle.num_proposed_assignments > 0);

        let after: Vec<_> = sim.couriers().iter().copied().collect();
        assert_eq!(after, initial, "{} mutated couriers", strategy.as_str());
        assert!(sink
            .timeline
            .iter()
            .all(|r| r.reason == TransitionReason::Initialized));
    }
}

#[test]
fn certain_acceptance_busies_every_proposed_courier() {
    let data = scenario();
    let config = SimulationConfig::default()
        .with_rejection_probability(0.0)
        .with_task_duration_secs(1451);

    for strategy in StrategyKind::ALL {
        let (sim, sink) = simulate(&data, strategy, config);
        let cycle = &sink.cycles[0];
        assert_eq!(cycle.num_accepted_assignments, cycle.num_proposed_assignments);

        for row in sink.assignments.iter().filter(|r| r.is_proposed) {
            assert!(row.was_accepted);
            let courier = row.proposed_courier_id.expect("proposed courier");
            let state = sim.couriers().get(courier).expect("known courier");
            assert_eq!(state.status, CourierStatus::Busy);
            assert_eq!(state.becomes_available_at, T + 1451);
        }
    }
}

#[test]
fn accepted_courier_moves_to_delivery_point() {
    let data = single_moment_history(T, vec![order_at(1, 2.0, 2.0)], &[(7, 2.0, 2.0)]);
    let config = SimulationConfig::default().with_rejection_probability(0.0);
    let (sim, _) = simulate(&data, StrategyKind::OnlineGreedy, config);
    let state = sim.couriers().get(CourierId(7)).expect("courier");
    assert_eq!(state.location.lat, 3.0);
    assert_eq!(state.location.lng, 3.0);
}

#[test]
fn couriers_come_back_after_task_duration() {
    let data = HistoricalData::builder()
        .order(order_at(1, 0.0, 0.0))
        .order(order_at(2, 0.0, 0.0))
        .order(order_at(3, 0.0, 0.0))
        .courier_snapshot(0, snapshot(1, 0.0, 0.0, false))
        .waiting_order(waiting(1, 0))
        .waiting_order(waiting(2, 100))
        .waiting_order(waiting(3, 200))
        .build();
    let config = SimulationConfig::default()
        .with_rejection_probability(0.0)
        .with_task_duration_secs(200);
    let (_, sink) = simulate(&data, StrategyKind::OnlineGreedy, config);

    let accepted: Vec<_> = sink
        .cycles
        .iter()
        .map(|c| (c.dispatch_time, c.num_accepted_assignments, c.skipped))
        .collect();
    assert_eq!(accepted, vec![(0, 1, false), (100, 0, true), (200, 1, false)]);

    let released = sink
        .timeline
        .iter()
        .find(|r| r.reason == TransitionReason::CompletedDelivery)
        .expect("release");
    assert_eq!(released.timestamp, 200);
    assert_eq!(validate_courier_timeline(&sink.timeline), None);
}

#[test]
fn loaded_couriers_start_busy_for_grace_offset() {
    let data = HistoricalData::builder()
        .order(order_at(1, 0.0, 0.0))
        .order(order_at(2, 0.0, 0.0))
        .courier_snapshot(0, snapshot(1, 0.0, 0.0, true))
        .waiting_order(waiting(1, 0))
        .waiting_order(waiting(2, 600))
        .build();
    let config = SimulationConfig::default().with_rejection_probability(0.0);
    let (_, sink) = simulate(&data, StrategyKind::OptimalBipartite, config);

    assert!(sink.cycles[0].skipped);
    assert_eq!(sink.cycles[0].courier_utilization, 1.0);
    assert!(!sink.cycles[1].skipped);
    assert_eq!(sink.cycles[1].num_accepted_assignments, 1);
}

#[test]
fn skipped_moments_are_counted_and_logged() {
    let data = HistoricalData::builder()
        .order(order_at(1, 0.0, 0.0))
        .waiting_order(waiting(1, 50))
        .build();
    let config = SimulationConfig::default();
    let (sim, sink) = simulate(&data, StrategyKind::OptimalBipartite, config);

    assert_eq!(sim.totals().dispatch_moments, 1);
    assert_eq!(sim.totals().skipped_moments, 1);
    assert_eq!(sim.totals().orders, 1);
    assert_eq!(sink.assignments.len(), 1);
    assert!(!sink.assignments[0].is_proposed);
    assert_eq!(sink.assignments[0].order_id, OrderId(1));
}

#[test]
fn same_seed_same_run() {
    let data = HistoricalData::builder()
        .order(order_at(1, 0.0, 0.0))
        .order(order_at(2, 1.0, 0.0))
        .order(order_at(3, 2.0, 0.0))
        .order(order_at(4, 3.0, 0.0))
        .courier_snapshot(0, snapshot(1, 0.0, 0.0, false))
        .courier_snapshot(0, snapshot(2, 3.0, 0.0, false))
        .courier_snapshot(0, snapshot(3, 6.0, 0.0, false))
        .waiting_order(waiting(1, 0))
        .waiting_order(waiting(2, 0))
        .waiting_order(waiting(3, 10))
        .waiting_order(waiting(4, 10))
        .build();
    let config = SimulationConfig::default()
        .with_rejection_probability(0.5)
        .with_seed(9);

    for strategy in StrategyKind::ALL {
        let (_, left) = simulate(&data, strategy, config);
        let (_, right) = simulate(&data, strategy, config);
        assert_eq!(left.assignments, right.assignments);
        assert_eq!(left.cycles, right.cycles);
        assert_eq!(left.timeline, right.timeline);
    }
}

#[test]
fn repeated_waiting_row_is_dispatched_once() {
    let data = HistoricalData::builder()
        .order(order_at(1, 1.0, 0.0))
        .courier_snapshot(T, snapshot(1, 0.0, 0.0, false))
        .courier_snapshot(T, snapshot(2, 5.0, 0.0, false))
        .waiting_order(waiting(1, T))
        .waiting_order(waiting(1, T))
        .build();
    assert_eq!(data.duplicate_waiting_orders(), 1);

    let config = SimulationConfig::default().with_rejection_probability(0.0);
    for strategy in StrategyKind::ALL {
        let (sim, sink) = simulate(&data, strategy, config);
        let cycle = &sink.cycles[0];
        assert_eq!(cycle.num_orders_in_batch, 1, "{}", strategy.as_str());
        assert_eq!(cycle.num_proposed_assignments, 1);
        assert_eq!(cycle.num_accepted_assignments, 1);
        assert_eq!(sink.assignments.len(), 1);
        assert_eq!(sim.couriers().summary(T).busy, 1);
    }
}
