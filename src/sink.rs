//! # Display Sinks
//!
//! Downstream consumers of the engine's per-tick output. The core never
//! formats a UI; it hands each [`TickOutcome`] plus the current history
//! window to a [`DisplaySink`] and lets that side decide how to render it.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

use crate::simulation::{HistoryBuffer, TickOutcome};

/// Receives the result of every applied cycle.
pub trait DisplaySink: Send {
    fn on_tick(&mut self, outcome: &TickOutcome, history: &HistoryBuffer);
}

/// Console "chart": one structured log line per cycle.
pub struct TracingSink;

impl DisplaySink for TracingSink {
    fn on_tick(&mut self, outcome: &TickOutcome, history: &HistoryBuffer) {
        info!(
            cycle = outcome.state.cycle_count,
            soh_percent = format_args!("{:.1}", outcome.state.state_of_health_percent),
            degradation_percent = format_args!("{:.3}", outcome.degradation_percent),
            resistance_mohm = outcome.metrics.internal_resistance_mohm,
            voltage_variance_v = format_args!("{:.3}", outcome.metrics.voltage_variance_v),
            projected_soh_3y = format_args!("{:.0}", outcome.metrics.projected_soh_3y_percent),
            temperature_c = outcome.inputs.temperature_c,
            salt_ppm = outcome.inputs.salt_ppm,
            dod_percent = outcome.inputs.dod_percent,
            window = history.len(),
            "cycle applied"
        );
    }
}

/// Machine-readable feed: one JSON object per cycle, for an external chart
/// or capture script.
pub struct JsonLineSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> DisplaySink for JsonLineSink<W> {
    fn on_tick(&mut self, outcome: &TickOutcome, _history: &HistoryBuffer) {
        match serde_json::to_string(outcome) {
            Ok(line) => {
                if let Err(e) = writeln!(self.writer, "{line}") {
                    warn!(error = %e, "display feed write failed");
                }
            }
            Err(e) => warn!(error = %e, "tick outcome serialization failed"),
        }
    }
}

/// Test double that records every outcome it sees. Handed out by value to
/// the driver while the test keeps a [`records`](RecordingSink::records)
/// handle.
#[derive(Clone, Default)]
pub struct RecordingSink {
    outcomes: Arc<Mutex<Vec<TickOutcome>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Arc<Mutex<Vec<TickOutcome>>> {
        self.outcomes.clone()
    }
}

impl DisplaySink for RecordingSink {
    fn on_tick(&mut self, outcome: &TickOutcome, _history: &HistoryBuffer) {
        self.outcomes.lock().push(outcome.clone());
    }
}
