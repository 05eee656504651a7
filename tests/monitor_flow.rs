//! End-to-end run of the instrument: driver, engine, history, and sinks
//! wired together the way the demo binary wires them.

use std::sync::Arc;
use std::time::Duration;

use ssb_cell_monitor::{
    DegradationModel, EngineConfig, EnvironmentalInputs, FixedInputs, MonitorDriver,
    RecordingSink, SharedInputs, SimulationEngine,
};

fn demo_engine() -> SimulationEngine {
    SimulationEngine::new(EngineConfig::default(), DegradationModel::default())
}

#[tokio::test(start_paused = true)]
async fn a_full_run_produces_an_aligned_bounded_history() {
    let sink = RecordingSink::new();
    let records = sink.records();

    let driver = MonitorDriver::new(
        demo_engine(),
        Arc::new(FixedInputs::demo_preset()),
        Box::new(sink),
        Duration::from_millis(10),
    );
    let handle = driver.spawn();

    // Enough scheduled ticks to wrap the 30-entry window.
    tokio::time::sleep(Duration::from_millis(455)).await;
    handle.stop();

    let state = handle.snapshot();
    let history = handle.history_snapshot();
    handle.join().await;

    assert!(!state.running);
    assert!(state.cycle_count > 30);
    assert_eq!(history.len(), 30);

    // The window holds the most recent cycles, oldest first, labels aligned
    // with the cycle counter.
    let newest: u64 = history.last().unwrap().cycle_label[1..].parse().unwrap();
    let oldest: u64 = history.first().unwrap().cycle_label[1..].parse().unwrap();
    assert_eq!(newest, state.cycle_count);
    assert_eq!(newest - oldest, 29);

    // SoH series is non-increasing and floored.
    for pair in history.windows(2) {
        assert!(pair[1].state_of_health_percent <= pair[0].state_of_health_percent);
    }
    assert!(history.last().unwrap().state_of_health_percent >= 70.0);

    // One recorded outcome per applied cycle.
    assert_eq!(records.lock().len() as u64, state.cycle_count);
}

#[tokio::test(start_paused = true)]
async fn operator_adjustments_show_up_in_later_samples() {
    let operator = SharedInputs::new(EnvironmentalInputs::new(32.0, 1350.0, 75.0));

    let driver = MonitorDriver::new(
        demo_engine(),
        Arc::new(operator.clone()),
        Box::new(RecordingSink::new()),
        Duration::from_millis(10),
    );
    let handle = driver.spawn();

    tokio::time::sleep(Duration::from_millis(45)).await;
    operator.set_temperature_c(55.0);
    tokio::time::sleep(Duration::from_millis(45)).await;
    handle.stop();

    let history = handle.history_snapshot();
    handle.join().await;

    assert!(history.iter().any(|s| s.temperature_c == 32.0));
    assert!(history.iter().any(|s| s.temperature_c == 55.0));
    // Once the adjustment lands it stays in effect for every later cycle.
    let first_hot = history.iter().position(|s| s.temperature_c == 55.0).unwrap();
    assert!(history[first_hot..].iter().all(|s| s.temperature_c == 55.0));
}

#[tokio::test(start_paused = true)]
async fn a_poisoned_sensor_ends_the_run_with_clean_state() {
    let sink = RecordingSink::new();
    let records = sink.records();

    let driver = MonitorDriver::new(
        demo_engine(),
        Arc::new(FixedInputs(EnvironmentalInputs::new(32.0, f64::NAN, 75.0))),
        Box::new(sink),
        Duration::from_millis(10),
    );
    let handle = driver.spawn();

    tokio::time::sleep(Duration::from_millis(50)).await;
    let state = handle.snapshot();
    handle.stop();
    handle.join().await;

    assert!(!state.running);
    assert_eq!(state.cycle_count, 0);
    assert_eq!(state.state_of_health_percent, 100.0);
    assert!(records.lock().is_empty());
}
