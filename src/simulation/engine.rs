//! # Simulation Engine
//!
//! Owns the mutable run state of the simulated cell and advances it one
//! charge/discharge cycle per tick. The engine is deliberately synchronous
//! and single-threaded: an external driver schedules `tick`, and all
//! mutation happens inside `start`/`stop`/`tick`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::history::{DegradationSample, HistoryBuffer};
use super::model::{DegradationModel, EnvironmentalInputs, InputError};

/// Engine tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// State of health at construction (%)
    pub initial_soh_percent: f64,
    /// Hard floor the demo never degrades below (%)
    pub soh_floor_percent: f64,
    /// Chart window size
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_soh_percent: 100.0,
            soh_floor_percent: 70.0,
            history_capacity: HistoryBuffer::DEFAULT_CAPACITY,
        }
    }
}

/// Read-only view of the engine's run state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state_of_health_percent: f64,
    pub cycle_count: u64,
    pub running: bool,
}

/// Display metrics derived from a single tick. Recomputed every cycle,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickMetrics {
    /// Estimated internal resistance (mΩ)
    pub internal_resistance_mohm: u32,
    /// Estimated cell voltage variance (V); display to 3 decimal places
    pub voltage_variance_v: f64,
    /// Projected state of health after three years at the current rate (%)
    pub projected_soh_3y_percent: f64,
}

/// Everything a display sink needs from one applied cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub state: EngineSnapshot,
    /// Capacity loss attributed to this cycle (%)
    pub degradation_percent: f64,
    pub metrics: TickMetrics,
    pub inputs: EnvironmentalInputs,
}

/// Progressive-degradation simulation engine.
///
/// Two logical states, `Stopped` (initial) and `Running`. Invalid
/// transitions and ticks while stopped are silent no-ops so UI races cannot
/// corrupt the run. Stopping preserves state of health and cycle count.
#[derive(Debug)]
pub struct SimulationEngine {
    config: EngineConfig,
    model: DegradationModel,
    state_of_health_percent: f64,
    cycle_count: u64,
    running: bool,
    history: HistoryBuffer,
}

// Display-metric shape factors.
const RESISTANCE_BASE_MOHM: f64 = 50.0;
const VOLTAGE_VARIANCE_BASE_V: f64 = 0.05;
const PROJECTION_CYCLES_3Y: f64 = 365.0 * 3.0 * 0.8;

/// Slows SoH loss relative to the raw per-cycle rate so a short demo run
/// shows a readable curve. Not physically derived.
const DEMO_DAMPING: f64 = 10.0;

impl SimulationEngine {
    pub fn new(config: EngineConfig, model: DegradationModel) -> Self {
        Self {
            state_of_health_percent: config.initial_soh_percent,
            cycle_count: 0,
            running: false,
            history: HistoryBuffer::new(config.history_capacity),
            config,
            model,
        }
    }

    pub fn state_of_health_percent(&self) -> f64 {
        self.state_of_health_percent
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state_of_health_percent: self.state_of_health_percent,
            cycle_count: self.cycle_count,
            running: self.running,
        }
    }

    /// Stopped → Running. No-op while already running; in particular a
    /// repeated `start` must not disturb an in-flight run.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        debug!(cycle = self.cycle_count, "simulation started");
    }

    /// Running → Stopped. No-op while already stopped. State of health and
    /// cycle count are preserved for a later resume.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        debug!(
            cycle = self.cycle_count,
            soh_percent = self.state_of_health_percent,
            "simulation stopped"
        );
    }

    /// Apply one simulated cycle.
    ///
    /// Returns `Ok(None)` while stopped (a scheduled tick that raced a stop
    /// must have no effect). Non-finite inputs are rejected before any state
    /// is touched.
    pub fn tick(&mut self, inputs: EnvironmentalInputs) -> Result<Option<TickOutcome>, InputError> {
        if !self.running {
            return Ok(None);
        }
        inputs.ensure_finite()?;

        let degradation = self.model.predict(&inputs, self.cycle_count);

        self.state_of_health_percent = (self.state_of_health_percent - degradation / DEMO_DAMPING)
            .max(self.config.soh_floor_percent);
        self.cycle_count += 1;

        let metrics = self.derive_metrics(degradation);
        self.history.append(DegradationSample::new(
            self.cycle_count,
            self.state_of_health_percent,
            &inputs,
        ));

        Ok(Some(TickOutcome {
            state: self.snapshot(),
            degradation_percent: degradation,
            metrics,
            inputs,
        }))
    }

    fn derive_metrics(&self, degradation: f64) -> TickMetrics {
        let projected = self.config.initial_soh_percent - degradation * PROJECTION_CYCLES_3Y;
        TickMetrics {
            internal_resistance_mohm: (RESISTANCE_BASE_MOHM * (1.0 + degradation / 100.0)).round()
                as u32,
            voltage_variance_v: VOLTAGE_VARIANCE_BASE_V * (1.0 + degradation / 50.0),
            projected_soh_3y_percent: projected.max(self.config.soh_floor_percent),
        }
    }
}
