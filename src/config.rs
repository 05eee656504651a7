use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::time::Duration;

use crate::driver::DEFAULT_TICK_INTERVAL;
use crate::simulation::{DegradationModelConfig, EngineConfig, EnvironmentalInputs};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub driver: DriverConfig,
    pub inputs: InputsConfig,
    pub model: DegradationModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub tick_interval_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
        }
    }
}

impl DriverConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// Initial operator stress setting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    pub temperature_c: f64,
    pub salt_ppm: f64,
    pub dod_percent: f64,
    /// Add Gaussian sensor noise around the preset
    pub jitter: bool,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            temperature_c: 32.0,
            salt_ppm: 1350.0,
            dod_percent: 75.0,
            jitter: false,
        }
    }
}

impl InputsConfig {
    pub fn initial(&self) -> EnvironmentalInputs {
        EnvironmentalInputs::new(self.temperature_c, self.salt_ppm, self.dod_percent)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("SSB__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_preset() {
        let cfg = Config::default();
        assert_eq!(cfg.driver.tick_interval(), Duration::from_millis(800));
        assert_eq!(cfg.engine.initial_soh_percent, 100.0);
        assert_eq!(cfg.engine.soh_floor_percent, 70.0);
        assert_eq!(cfg.engine.history_capacity, 30);

        let inputs = cfg.inputs.initial();
        assert_eq!(inputs.temperature_c, 32.0);
        assert_eq!(inputs.salt_ppm, 1350.0);
        assert_eq!(inputs.dod_percent, 75.0);
        assert!(!cfg.inputs.jitter);
    }

    #[test]
    fn partial_toml_fills_the_rest_from_defaults() {
        let cfg: Config = Figment::new()
            .merge(figment::providers::Toml::string(
                r#"
                [driver]
                tick_interval_ms = 100

                [inputs]
                temperature_c = 45.0
                "#,
            ))
            .extract()
            .unwrap();

        assert_eq!(cfg.driver.tick_interval_ms, 100);
        assert_eq!(cfg.inputs.temperature_c, 45.0);
        assert_eq!(cfg.inputs.salt_ppm, 1350.0);
        assert_eq!(cfg.model.base_rate_percent, 0.028);
    }

    #[test]
    fn zero_interval_is_bumped_to_one_ms() {
        let cfg = DriverConfig {
            tick_interval_ms: 0,
        };
        assert_eq!(cfg.tick_interval(), Duration::from_millis(1));
    }
}
