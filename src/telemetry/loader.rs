use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info};

use super::Sample;
use crate::LapsplitError;

pub fn load_telemetry_csv(source_file: &Path) -> Result<Vec<Sample>, LapsplitError> {
    if !source_file.is_file() {
        return Err(LapsplitError::InvalidTelemetryFile {
            path: format!("{:?}", source_file),
        });
    }
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(source_file)
        .map_err(|e| LapsplitError::TelemetryLoaderError { source: e })?;
    let samples = read_samples(reader)?;
    info!("Loaded {:?}, found {} samples", source_file, samples.len());
    Ok(samples)
}

/// Reads samples from any CSV source with a header row. Unknown columns are ignored.
pub fn load_telemetry_reader<R: Read>(source: R) -> Result<Vec<Sample>, LapsplitError> {
    read_samples(ReaderBuilder::new().has_headers(true).from_reader(source))
}

fn read_samples<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Sample>, LapsplitError> {
    reader
        .deserialize::<Sample>()
        .collect::<Result<Vec<Sample>, csv::Error>>()
        .map_err(|e| LapsplitError::TelemetryLoaderError { source: e })
}

/// Splits a session table into per-lap tables ordered by lap id.
///
/// Rows inside a lap keep their original order, so each returned table starts at
/// row 0 of its lap.
pub fn group_laps(samples: Vec<Sample>) -> Vec<Vec<Sample>> {
    let mut laps: BTreeMap<i64, Vec<Sample>> = BTreeMap::new();
    for sample in samples {
        laps.entry(sample.lap_id).or_default().push(sample);
    }
    debug!("Grouped telemetry into {} laps", laps.len());
    laps.into_values().collect()
}
