//! # Degradation History
//!
//! Bounded chronological record of simulated cycles. Everything a chart needs
//! per cycle lives in one row, so the state-of-health series, the input
//! series, and the label sequence can never drift out of alignment.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::model::EnvironmentalInputs;

/// One recorded cycle: label, resulting state of health, and the inputs that
/// produced it. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationSample {
    /// Chart label, `C{cycle}`
    pub cycle_label: String,
    /// State of health after the cycle (%)
    pub state_of_health_percent: f64,
    /// Cell temperature during the cycle (°C)
    pub temperature_c: f64,
    /// Salt concentration during the cycle (ppm)
    pub salt_ppm: f64,
    /// Depth of discharge during the cycle (%)
    pub dod_percent: f64,
    /// Wall-clock time the sample was recorded
    pub recorded_at: DateTime<Local>,
}

impl DegradationSample {
    pub fn new(cycle_count: u64, state_of_health_percent: f64, inputs: &EnvironmentalInputs) -> Self {
        Self {
            cycle_label: format!("C{cycle_count}"),
            state_of_health_percent,
            temperature_c: inputs.temperature_c,
            salt_ppm: inputs.salt_ppm,
            dod_percent: inputs.dod_percent,
            recorded_at: Local::now(),
        }
    }
}

/// FIFO ring of the most recent samples.
///
/// Invariants: `len() <= capacity`, insertion order is chronological, and an
/// append over capacity evicts exactly the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<DegradationSample>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Chart window size of the demo display.
    pub const DEFAULT_CAPACITY: usize = 30;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append a sample, evicting the oldest entry if the window is full.
    pub fn append(&mut self, sample: DegradationSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Chronological read-only view, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &DegradationSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&DegradationSample> {
        self.samples.back()
    }

    /// Owned copy of the current window, for consumers that outlive the
    /// engine borrow (charts, JSON feeds).
    pub fn snapshot(&self) -> Vec<DegradationSample> {
        self.samples.iter().cloned().collect()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(cycle: u64) -> DegradationSample {
        let inputs = EnvironmentalInputs::new(32.0, 1350.0, 75.0);
        DegradationSample::new(cycle, 100.0 - cycle as f64 * 0.01, &inputs)
    }

    #[test]
    fn append_keeps_chronological_order() {
        let mut history = HistoryBuffer::new(5);
        for cycle in 1..=3 {
            history.append(sample(cycle));
        }

        let labels: Vec<_> = history.entries().map(|s| s.cycle_label.as_str()).collect();
        assert_eq!(labels, ["C1", "C2", "C3"]);
        assert_eq!(history.latest().unwrap().cycle_label, "C3");
    }

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest() {
        let mut history = HistoryBuffer::default();
        for cycle in 1..=40 {
            history.append(sample(cycle));
            assert!(history.len() <= HistoryBuffer::DEFAULT_CAPACITY);
        }

        assert_eq!(history.len(), 30);
        let labels: Vec<_> = history.entries().map(|s| s.cycle_label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"C11"));
        assert_eq!(labels.last(), Some(&"C40"));
    }

    #[test]
    fn rows_keep_soh_and_inputs_aligned() {
        let mut history = HistoryBuffer::new(3);
        for cycle in 1..=10 {
            history.append(sample(cycle));
        }

        // Each surviving row still pairs its label with the SoH written at
        // that cycle, regardless of how many evictions happened.
        for row in history.entries() {
            let cycle: u64 = row.cycle_label[1..].parse().unwrap();
            assert_eq!(row.state_of_health_percent, 100.0 - cycle as f64 * 0.01);
            assert_eq!(row.temperature_c, 32.0);
        }
    }

    #[test]
    fn zero_capacity_is_bumped_to_one() {
        let mut history = HistoryBuffer::new(0);
        history.append(sample(1));
        history.append(sample(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().cycle_label, "C2");
    }
}
