use std::path::Path;

use serde::Serialize;

use crate::LapsplitError;
use crate::lap::Lap;
use crate::segmentation::{ChangePoint, LapAnomaly, Section};

/// Per-lap record written to the summary file.
#[derive(Serialize, Debug)]
pub struct LapSummary<'lap> {
    pub number: i32,
    pub driver: &'lap str,
    pub laptime: Option<f64>,
    pub global_delta: Option<f64>,
    pub delta: &'lap [ChangePoint],
    pub sectors: &'lap [Section],
    pub microsectors: &'lap [Section],
    pub anomalies: &'lap [LapAnomaly],
}

impl<'lap> From<&'lap Lap> for LapSummary<'lap> {
    fn from(lap: &'lap Lap) -> Self {
        Self {
            number: lap.number,
            driver: &lap.driver,
            laptime: lap.laptime,
            global_delta: lap.global_delta,
            delta: &lap.delta,
            sectors: lap.sectors(),
            microsectors: lap.microsectors(),
            anomalies: lap.anomalies(),
        }
    }
}

/// Writes one JSON line per lap.
pub fn write_laps(file: &Path, laps: &[Lap]) -> Result<(), LapsplitError> {
    serde_jsonlines::write_json_lines(file, laps.iter().map(LapSummary::from))
        .map_err(|e| LapsplitError::WriterError { source: e })
}
