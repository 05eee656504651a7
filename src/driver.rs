//! # Monitor Driver
//!
//! The periodic scheduler that turns the synchronous engine into a live
//! instrument: a tokio interval pulls fresh inputs, applies one tick, and
//! forwards the outcome to the display sink. The engine itself stays
//! decoupled from the scheduling mechanism; cancellation is owned here.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::inputs::InputSource;
use crate::simulation::{DegradationSample, EngineSnapshot, SimulationEngine};
use crate::sink::DisplaySink;

/// Canonical demo tick period.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(800);

/// Owns the engine and its collaborators until [`spawn`](Self::spawn) hands
/// control to the scheduler task.
pub struct MonitorDriver {
    engine: Arc<RwLock<SimulationEngine>>,
    inputs: Arc<dyn InputSource>,
    sink: Box<dyn DisplaySink>,
    tick_interval: Duration,
}

impl MonitorDriver {
    pub fn new(
        engine: SimulationEngine,
        inputs: Arc<dyn InputSource>,
        sink: Box<dyn DisplaySink>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            inputs,
            sink,
            tick_interval: tick_interval.max(Duration::from_millis(1)),
        }
    }

    /// Start the run: marks the engine running and spawns the tick loop.
    ///
    /// The loop ends when the handle's token is cancelled, or on the first
    /// input-validation failure. Either way the engine is stopped before the
    /// task exits, so a late scheduled tick can never apply.
    pub fn spawn(self) -> MonitorHandle {
        let cancel = CancellationToken::new();
        let engine = self.engine.clone();
        let task = tokio::spawn(run_loop(
            self.engine,
            self.inputs,
            self.sink,
            self.tick_interval,
            cancel.clone(),
        ));

        MonitorHandle {
            engine,
            cancel,
            task,
        }
    }
}

async fn run_loop(
    engine: Arc<RwLock<SimulationEngine>>,
    inputs: Arc<dyn InputSource>,
    mut sink: Box<dyn DisplaySink>,
    tick_interval: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(tick_interval);
    // A stalled consumer should not cause a burst of catch-up cycles.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    engine.write().start();
    info!(interval_ms = tick_interval.as_millis() as u64, "monitor run started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let reading = inputs.current();
                // One lock scope per tick: the stop check, the state update,
                // and the history append are a single atomic step.
                let mut eng = engine.write();
                match eng.tick(reading) {
                    Ok(Some(outcome)) => sink.on_tick(&outcome, eng.history()),
                    Ok(None) => break, // stopped from outside, run is over
                    Err(e) => {
                        warn!(error = %e, "input validation failed, ending run");
                        break;
                    }
                }
            }
        }
    }

    let mut eng = engine.write();
    eng.stop();
    info!(
        cycles = eng.cycle_count(),
        soh_percent = format_args!("{:.1}", eng.state_of_health_percent()),
        "monitor run ended"
    );
}

/// Control side of a spawned run.
pub struct MonitorHandle {
    engine: Arc<RwLock<SimulationEngine>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stop the run. Effective immediately: the engine flag flips under the
    /// same lock the tick loop uses, so any in-flight or later scheduled
    /// tick is a no-op even before the task observes the cancellation.
    pub fn stop(&self) {
        self.engine.write().stop();
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.engine.read().is_running()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.read().snapshot()
    }

    pub fn history_snapshot(&self) -> Vec<DegradationSample> {
        self.engine.read().history().snapshot()
    }

    /// Wait for the scheduler task to finish.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(error = %e, "monitor task join failed");
        }
    }
}
