use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::telemetry::{Sample, TelemetryField};

/// First sample at which a tracked field takes a new value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    /// Lap-relative timestamp of the sample
    pub time: f64,
    pub value: f64,
}

/// Indices where a discrete signal changes value.
///
/// Index 0 is always emitted for a non-empty input, then every index whose value
/// differs from the previous one.
pub fn change_points<V: PartialEq>(values: &[V]) -> Vec<usize> {
    let mut points = Vec::new();
    let mut previous: Option<&V> = None;
    for (i, value) in values.iter().enumerate() {
        if previous.is_none_or(|p| p != value) {
            points.push(i);
            previous = Some(value);
        }
    }
    points
}

/// Sorted, deduplicated union of detected change points and forced boundaries.
/// Forced boundaries outside `0..len` are dropped.
pub fn merge_boundaries(detected: &[usize], forced: &[usize], len: usize) -> Vec<usize> {
    detected
        .iter()
        .merge(forced.iter().sorted())
        .copied()
        .filter(|i| *i < len)
        .dedup()
        .collect()
}

/// Change point detection over continuous signals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangingPointDetector {
    /// Absolute difference above which two values count as different. 0 means exact.
    pub tolerance: f64,
}

impl ChangingPointDetector {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    /// Indices where `values` moves further than the tolerance away from the value at
    /// the last emitted index. When `boundaries` is given every boundary inside the
    /// sequence is emitted as well, so the result is a superset of them.
    pub fn detect(&self, values: &[f64], boundaries: Option<&[usize]>) -> Vec<usize> {
        let detected = if self.tolerance == 0. {
            change_points(values)
        } else {
            self.detect_with_tolerance(values)
        };
        match boundaries {
            Some(forced) => merge_boundaries(&detected, forced, values.len()),
            None => detected,
        }
    }

    fn detect_with_tolerance(&self, values: &[f64]) -> Vec<usize> {
        let mut points = Vec::new();
        let mut reference: Option<f64> = None;
        for (i, value) in values.iter().enumerate() {
            let changed = match reference {
                None => true,
                Some(r) => (value - r).abs() > self.tolerance || r.is_nan() != value.is_nan(),
            };
            if changed {
                points.push(i);
                reference = Some(*value);
            }
        }
        points
    }

    /// Change point trace of a sample field as `(time, value)` pairs.
    pub fn trace(&self, samples: &[Sample], field: TelemetryField) -> Vec<ChangePoint> {
        self.detect(&field.column(samples), None)
            .into_iter()
            .map(|i| ChangePoint {
                time: samples[i].timestamp,
                value: field.value(&samples[i]),
            })
            .collect()
    }
}
