//! # Degradation Model
//!
//! Empirical per-cycle capacity-loss model for a solid-state cell.
//!
//! The predicted rate is a base loss scaled by four stress factors:
//!
//! rate = base * f_temp * f_salt * f_dod * f_cycle
//!
//! Where:
//! - f_temp  = 1 + k_temp  * (T - T_ref)
//! - f_salt  = 1 + k_salt  * (ppm - ppm_ref)
//! - f_dod   = 1 + k_dod   * (DoD / 100)
//! - f_cycle = 1 + k_cycle * cycle_count
//!
//! The result is capped at `rate_cap_percent` (1.5 % per cycle by default).
//! There is no lower clamp: inputs far below the reference points can drive
//! the combined factors negative, which is accepted demo behavior.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environmental stress applied to the cell for one cycle.
///
/// Snapshot semantics: the engine reads one immutable set of inputs per tick.
/// No range enforcement happens here; any finite values are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalInputs {
    /// Cell temperature (°C)
    pub temperature_c: f64,
    /// Electrolyte salt concentration (ppm)
    pub salt_ppm: f64,
    /// Depth of discharge per cycle (%)
    pub dod_percent: f64,
}

/// Input-validation errors surfaced by the engine
#[derive(Debug, Error)]
pub enum InputError {
    #[error("non-finite {field} reading: {value}")]
    NonFinite { field: &'static str, value: f64 },
}

impl EnvironmentalInputs {
    pub fn new(temperature_c: f64, salt_ppm: f64, dod_percent: f64) -> Self {
        Self {
            temperature_c,
            salt_ppm,
            dod_percent,
        }
    }

    /// Reject NaN/±∞ readings before they can reach simulation state.
    pub fn ensure_finite(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("temperature_c", self.temperature_c),
            ("salt_ppm", self.salt_ppm),
            ("dod_percent", self.dod_percent),
        ] {
            if !value.is_finite() {
                return Err(InputError::NonFinite { field, value });
            }
        }
        Ok(())
    }
}

/// Degradation model coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DegradationModelConfig {
    /// Base capacity loss per cycle (%) under reference conditions
    pub base_rate_percent: f64,

    /// Loss increase per °C away from the reference temperature
    pub temp_coeff_per_c: f64,

    /// Reference temperature (°C)
    pub ref_temperature_c: f64,

    /// Loss increase per ppm away from the reference concentration
    pub salt_coeff_per_ppm: f64,

    /// Reference salt concentration (ppm)
    pub ref_salt_ppm: f64,

    /// Loss increase per unit of full-range depth of discharge
    pub dod_coeff: f64,

    /// Cycle-aging coefficient per elapsed cycle
    pub cycle_coeff: f64,

    /// Upper cap on the predicted rate (% per cycle)
    pub rate_cap_percent: f64,
}

impl Default for DegradationModelConfig {
    fn default() -> Self {
        Self {
            base_rate_percent: 0.028,
            temp_coeff_per_c: 0.02,
            ref_temperature_c: 25.0,
            salt_coeff_per_ppm: 0.0005,
            ref_salt_ppm: 1000.0,
            dod_coeff: 0.015,
            cycle_coeff: 0.0001,
            rate_cap_percent: 1.5,
        }
    }
}

/// Pure per-cycle degradation predictor. No hidden state; the cycle counter
/// is supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct DegradationModel {
    config: DegradationModelConfig,
}

impl DegradationModel {
    pub fn new(config: DegradationModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DegradationModelConfig {
        &self.config
    }

    /// Predict the capacity loss (%) attributable to the cycle about to run.
    pub fn predict(&self, inputs: &EnvironmentalInputs, cycle_count: u64) -> f64 {
        let c = &self.config;

        let temp_factor = 1.0 + c.temp_coeff_per_c * (inputs.temperature_c - c.ref_temperature_c);
        let salt_factor = 1.0 + c.salt_coeff_per_ppm * (inputs.salt_ppm - c.ref_salt_ppm);
        let dod_factor = 1.0 + c.dod_coeff * (inputs.dod_percent / 100.0);
        let cycle_factor = 1.0 + c.cycle_coeff * cycle_count as f64;

        let rate = c.base_rate_percent * temp_factor * salt_factor * dod_factor * cycle_factor;
        rate.min(c.rate_cap_percent)
    }
}
