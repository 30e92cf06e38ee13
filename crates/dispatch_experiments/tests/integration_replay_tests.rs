mod support;

use std::fs;

use dispatch_core::config::SimulationConfig;
use dispatch_core::cost::CostFunctionKind;
use dispatch_core::matching::StrategyKind;
use dispatch_core::model::{CourierId, OrderId};
use dispatch_experiments::{
    export_run_logs, export_to_csv, export_to_json, export_to_parquet, find_cheapest_run_index,
    load_historical_data, run_parallel, run_single, ExperimentError, InputFiles, OutputFormat,
    RunSpec,
};

use support::write_fixture;

fn certain_acceptance() -> SimulationConfig {
    SimulationConfig::default().with_rejection_probability(0.0)
}

#[test]
fn loads_fixture_tables() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path());

    let (data, stats) = load_historical_data(dir.path(), &InputFiles::default()).expect("load");
    assert_eq!(stats.waybill_rows, 4);
    assert_eq!(stats.duplicate_orders, 1);
    assert_eq!(stats.rider_snapshot_rows, 4);
    assert_eq!(stats.dispatch_waybill_rows, 5);
    assert_eq!(stats.duplicate_waiting_orders, 1);
    assert_eq!(data.dispatch_moments(), vec![1000, 1060]);

    let order = data.orders().get(OrderId(2)).expect("order 2");
    assert_eq!(order.actual_courier_id, Some(CourierId(13)));
    assert_eq!(order.platform_order_time, 900);

    let first = data.courier_snapshot_at(1000);
    let loaded: Vec<_> = first.iter().map(|s| s.has_in_flight_load).collect();
    assert_eq!(loaded, vec![false, true, false]);
}

#[test]
fn missing_file_is_reported_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_historical_data(dir.path(), &InputFiles::default()).unwrap_err();
    match err {
        ExperimentError::InvalidInput { file, .. } => {
            assert!(file.ends_with("all_waybill_info_meituan_0322.csv"));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn replay_of_fixture_under_optimal_bipartite() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path());
    let (data, _) = load_historical_data(dir.path(), &InputFiles::default()).expect("load");

    let spec = RunSpec::new(
        StrategyKind::OptimalBipartite,
        CostFunctionKind::DistanceToPickup,
        certain_acceptance(),
    );
    let result = run_single(&data, &spec).expect("run");

    // t=1000: couriers 11 (0,0) and 13 (1000,0) are free; order 1 at (100,0)
    // and order 2 at (0,100). Order 3 is unknown.
    let first = &result.telemetry.cycles[0];
    assert_eq!(first.num_orders_in_batch, 3);
    assert_eq!(first.num_available_couriers, 2);
    assert_eq!(first.num_missing_orders, 1);
    assert_eq!(first.num_accepted_assignments, 2);

    // t=1060: everyone is busy, so order 4 is skipped.
    let second = &result.telemetry.cycles[1];
    assert!(second.skipped);

    assert_eq!(result.totals.orders, 4);
    assert_eq!(result.totals.accepted, 2);
    assert_eq!(result.totals.missing_orders, 1);
    assert_eq!(result.scorecard.accepted_assignments, 2);
    assert!(result.scorecard.customer_median_wait_secs.is_some());
}

#[test]
fn exports_csv_logs_with_expected_headers() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path());
    let (data, _) = load_historical_data(dir.path(), &InputFiles::default()).expect("load");
    let specs = RunSpec::grid(
        &[StrategyKind::OnlineGreedy, StrategyKind::BatchClusterRoute],
        &[CostFunctionKind::DistanceToPickup],
        certain_acceptance(),
    );
    let results: Vec<_> = run_parallel(&data, specs, Some(2), false)
        .expect("pool")
        .into_iter()
        .map(|r| r.expect("run"))
        .collect();

    let out = dir.path().join("out");
    let paths = export_run_logs(&results[0], &out, OutputFormat::Csv).expect("export");
    assert!(paths
        .assignment_log
        .ends_with("online_greedy__distance_to_pickup_assignment_log.csv"));

    let assignment_log = fs::read_to_string(&paths.assignment_log).expect("read");
    let header = assignment_log.lines().next().expect("header");
    assert!(header.starts_with("dispatch_time,order_id,proposed_courier_id,proposed_cost"));
    assert!(header.ends_with("wait_for_assignment_secs,cost_function"));
    assert_eq!(assignment_log.lines().count(), 1 + 4);

    let timeline = fs::read_to_string(&paths.courier_timeline).expect("read");
    assert_eq!(
        timeline.lines().next(),
        Some("timestamp,courier_id,event_type,new_state,reason")
    );
    assert!(timeline.contains("state_change,BUSY,initialized"));
    assert!(timeline.contains("assigned_order"));

    let cycles = fs::read_to_string(&paths.cycle_summary).expect("read");
    assert_eq!(cycles.lines().count(), 1 + 2);

    let summary_csv = out.join("summary.csv");
    export_to_csv(&results, &summary_csv).expect("summary csv");
    assert_eq!(fs::read_to_string(&summary_csv).expect("read").lines().count(), 3);

    let summary_json = out.join("summary.json");
    export_to_json(&results, &summary_json).expect("summary json");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_json).expect("read")).expect("json");
    assert_eq!(json.as_array().map(Vec::len), Some(2));
    assert_eq!(json[0]["strategy"], "online_greedy");
    assert!(json[0]["scorecard"]["courier_idle_hours"].is_number());
}

#[test]
fn exports_parquet_logs_and_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path());
    let (data, _) = load_historical_data(dir.path(), &InputFiles::default()).expect("load");
    let spec = RunSpec::new(
        StrategyKind::OptimalBipartite,
        CostFunctionKind::PickupAndDelivery,
        certain_acceptance(),
    );
    let result = run_single(&data, &spec).expect("run");

    let paths = export_run_logs(&result, dir.path(), OutputFormat::Parquet).expect("export");
    for path in [&paths.assignment_log, &paths.cycle_summary, &paths.courier_timeline] {
        let bytes = fs::read(path).expect("parquet file");
        assert_eq!(&bytes[..4], b"PAR1");
    }

    let summary = dir.path().join("summary.parquet");
    export_to_parquet(std::slice::from_ref(&result), &summary).expect("summary parquet");
    assert!(fs::metadata(&summary).expect("metadata").len() > 0);
}

#[test]
fn empty_summary_export_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = export_to_csv(&[], dir.path().join("summary.csv")).unwrap_err();
    assert!(matches!(err, ExperimentError::NoResults));
}

#[test]
fn cheapest_run_prefers_lower_average_cost() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_fixture(dir.path());
    let (data, _) = load_historical_data(dir.path(), &InputFiles::default()).expect("load");
    let specs = RunSpec::grid(
        &[StrategyKind::OptimalBipartite],
        &[CostFunctionKind::PickupAndDelivery, CostFunctionKind::DistanceToPickup],
        certain_acceptance(),
    );
    let results: Vec<_> = specs
        .iter()
        .map(|spec| run_single(&data, spec).expect("run"))
        .collect();

    // Pickup-and-delivery adds the delivery leg, so distance-to-pickup is cheaper.
    assert_eq!(find_cheapest_run_index(&results), Some(1));
    assert_eq!(find_cheapest_run_index(&[]), None);
}
