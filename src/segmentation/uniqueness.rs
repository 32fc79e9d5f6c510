use itertools::Itertools;

use super::LapAnomaly;
use crate::telemetry::{Sample, TelemetryField};

/// Reads a field that should hold the same value on every sample of a lap.
///
/// Returns `Ok(None)` for a lap without samples and an `InconsistentField` anomaly
/// when more than one distinct value is present.
pub fn extract_unique(
    samples: &[Sample],
    field: TelemetryField,
) -> Result<Option<f64>, LapAnomaly> {
    let distinct = samples
        .iter()
        .map(|s| field.value(s))
        .unique_by(|v| v.to_bits())
        .collect_vec();
    match distinct.as_slice() {
        [] => Ok(None),
        [value] => Ok(Some(*value)),
        _ => Err(LapAnomaly::InconsistentField {
            field,
            distinct_values: distinct.len(),
        }),
    }
}
