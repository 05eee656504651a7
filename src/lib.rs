//! # SSB Cell Monitor
//!
//! Demo instrument that simulates progressive degradation of a solid-state
//! battery cell under operator-chosen environmental stress and replays the
//! trajectory as a live, bounded time series.
//!
//! The crate is split along the instrument's seams:
//!
//! - [`simulation`] — the core: degradation model, tick engine, history window
//! - [`inputs`] — where each tick's environmental stress comes from
//! - [`sink`] — where each tick's outcome goes
//! - [`driver`] — the cancellable periodic scheduler tying the seams together
//! - [`config`] / [`telemetry`] — process-level wiring for the demo binary

pub mod config;
pub mod driver;
pub mod inputs;
pub mod simulation;
pub mod sink;
pub mod telemetry;

pub use config::Config;
pub use driver::{MonitorDriver, MonitorHandle, DEFAULT_TICK_INTERVAL};
pub use inputs::{FixedInputs, InputSource, JitterInputs, SharedInputs};
pub use simulation::{
    DegradationModel, DegradationModelConfig, DegradationSample, EngineConfig, EngineSnapshot,
    EnvironmentalInputs, HistoryBuffer, InputError, SimulationEngine, TickMetrics, TickOutcome,
};
pub use sink::{DisplaySink, JsonLineSink, RecordingSink, TracingSink};
