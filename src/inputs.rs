//! # Input Sources
//!
//! The operator-facing side of the instrument. The engine pulls one
//! immutable snapshot of environmental stress per tick through the
//! [`InputSource`] seam; what sits behind it (a fixed preset, a live
//! operator handle, a noisy sensor) is the caller's choice.

use parking_lot::RwLock;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::sync::Arc;

use crate::simulation::EnvironmentalInputs;

/// Supplies the current environmental stress, once per tick.
///
/// Implementations must return promptly; the driver calls this on the tick
/// path. Values are expected to be finite, the engine enforces it.
pub trait InputSource: Send + Sync {
    fn current(&self) -> EnvironmentalInputs;
}

/// Constant operator preset.
#[derive(Debug, Clone, Copy)]
pub struct FixedInputs(pub EnvironmentalInputs);

impl FixedInputs {
    /// The instrument's default demo stress setting.
    pub fn demo_preset() -> Self {
        Self(EnvironmentalInputs::new(32.0, 1350.0, 75.0))
    }
}

impl InputSource for FixedInputs {
    fn current(&self) -> EnvironmentalInputs {
        self.0
    }
}

/// Live operator handle: any front-end can adjust the stress between ticks
/// while the driver keeps reading the latest setting.
#[derive(Debug, Clone)]
pub struct SharedInputs {
    inner: Arc<RwLock<EnvironmentalInputs>>,
}

impl SharedInputs {
    pub fn new(initial: EnvironmentalInputs) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn set(&self, inputs: EnvironmentalInputs) {
        *self.inner.write() = inputs;
    }

    pub fn set_temperature_c(&self, temperature_c: f64) {
        self.inner.write().temperature_c = temperature_c;
    }

    pub fn set_salt_ppm(&self, salt_ppm: f64) {
        self.inner.write().salt_ppm = salt_ppm;
    }

    pub fn set_dod_percent(&self, dod_percent: f64) {
        self.inner.write().dod_percent = dod_percent;
    }

    pub fn get(&self) -> EnvironmentalInputs {
        *self.inner.read()
    }
}

impl InputSource for SharedInputs {
    fn current(&self) -> EnvironmentalInputs {
        self.get()
    }
}

/// Wraps another source and adds Gaussian sensor noise, so a demo run with a
/// fixed preset still produces a live-looking trace.
pub struct JitterInputs {
    inner: Arc<dyn InputSource>,
    temperature_sd_c: f64,
    salt_sd_ppm: f64,
    dod_sd_percent: f64,
}

impl JitterInputs {
    pub fn new(inner: Arc<dyn InputSource>) -> Self {
        Self {
            inner,
            temperature_sd_c: 0.4,
            salt_sd_ppm: 15.0,
            dod_sd_percent: 1.0,
        }
    }

    pub fn with_deviations(
        inner: Arc<dyn InputSource>,
        temperature_sd_c: f64,
        salt_sd_ppm: f64,
        dod_sd_percent: f64,
    ) -> Self {
        Self {
            inner,
            temperature_sd_c,
            salt_sd_ppm,
            dod_sd_percent,
        }
    }

    fn jitter<R: Rng>(rng: &mut R, value: f64, sd: f64) -> f64 {
        if sd <= 0.0 {
            return value;
        }
        // Normal::new only fails on non-finite or negative sd.
        match Normal::new(value, sd) {
            Ok(dist) => dist.sample(rng),
            Err(_) => value,
        }
    }
}

impl InputSource for JitterInputs {
    fn current(&self) -> EnvironmentalInputs {
        let base = self.inner.current();
        let mut rng = rand::thread_rng();
        EnvironmentalInputs::new(
            Self::jitter(&mut rng, base.temperature_c, self.temperature_sd_c),
            Self::jitter(&mut rng, base.salt_ppm, self.salt_sd_ppm).max(0.0),
            Self::jitter(&mut rng, base.dod_percent, self.dod_sd_percent).clamp(0.0, 100.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_inputs_return_the_preset() {
        let preset = FixedInputs::demo_preset();
        let inputs = preset.current();
        assert_eq!(inputs.temperature_c, 32.0);
        assert_eq!(inputs.salt_ppm, 1350.0);
        assert_eq!(inputs.dod_percent, 75.0);
    }

    #[test]
    fn shared_inputs_reflect_operator_updates() {
        let shared = SharedInputs::new(FixedInputs::demo_preset().current());
        shared.set_temperature_c(45.0);
        shared.set_salt_ppm(2000.0);

        let seen = shared.current();
        assert_eq!(seen.temperature_c, 45.0);
        assert_eq!(seen.salt_ppm, 2000.0);
        assert_eq!(seen.dod_percent, 75.0);
    }

    #[test]
    fn jitter_stays_near_the_base_and_finite() {
        let base = Arc::new(FixedInputs::demo_preset());
        let noisy = JitterInputs::new(base);

        for _ in 0..100 {
            let inputs = noisy.current();
            assert!(inputs.ensure_finite().is_ok());
            assert!((inputs.temperature_c - 32.0).abs() < 10.0);
            assert!(inputs.salt_ppm >= 0.0);
            assert!((0.0..=100.0).contains(&inputs.dod_percent));
        }
    }

    #[test]
    fn zero_deviation_jitter_passes_values_through() {
        let base = Arc::new(FixedInputs::demo_preset());
        let noisy = JitterInputs::with_deviations(base, 0.0, 0.0, 0.0);
        assert_eq!(noisy.current(), FixedInputs::demo_preset().current());
    }
}
