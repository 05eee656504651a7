//! # Cell Degradation Simulation
//!
//! The simulation core of the instrument: the empirical degradation model,
//! the tick-driven engine that owns the run state, and the bounded history
//! window that feeds any chart.
//!
//! ## Components
//!
//! - **Model**: pure mapping from environmental stress and cycle age to a
//!   per-cycle capacity-loss rate
//! - **Engine**: run-state owner (state of health, cycle counter, running
//!   flag) with `start`/`stop`/`tick` as its only mutation points
//! - **History**: FIFO window of the 30 most recent cycles
//!
//! ## Usage
//!
//! ```rust
//! use ssb_cell_monitor::simulation::{
//!     DegradationModel, EngineConfig, EnvironmentalInputs, SimulationEngine,
//! };
//!
//! let mut engine = SimulationEngine::new(EngineConfig::default(), DegradationModel::default());
//! engine.start();
//!
//! let inputs = EnvironmentalInputs::new(32.0, 1350.0, 75.0);
//! let outcome = engine.tick(inputs).unwrap().unwrap();
//! assert!(outcome.state.state_of_health_percent < 100.0);
//! ```

pub mod engine;
pub mod history;
pub mod model;

pub use engine::{EngineConfig, EngineSnapshot, SimulationEngine, TickMetrics, TickOutcome};
pub use history::{DegradationSample, HistoryBuffer};
pub use model::{DegradationModel, DegradationModelConfig, EnvironmentalInputs, InputError};
