use std::ops::Add;
use std::path::Path;

use log::info;
use rayon::prelude::*;

use crate::LapsplitError;
use crate::lap::{Lap, LapConfig};
use crate::segmentation::LapSegmenter;
use crate::telemetry::{Sample, group_laps, load_telemetry_csv};

/// A driving session: the raw sample table and the laps built from it.
#[derive(Clone, Debug, Default)]
pub struct Run {
    /// Rows as loaded, before per-lap normalisation
    pub table: Vec<Sample>,
    pub laps: Vec<Lap>,
}

impl Run {
    pub fn from_csv(
        csv_path: &Path,
        driver: &str,
        segmenter: &LapSegmenter,
    ) -> Result<Self, LapsplitError> {
        let samples = load_telemetry_csv(csv_path)?;
        let run = Self::from_samples(samples, driver, segmenter);
        info!(
            "Built {} laps for {} from {:?}",
            run.laps.len(),
            driver,
            csv_path
        );
        Ok(run)
    }

    /// Groups `samples` by lap id and builds every lap in parallel. Laps are
    /// numbered from 0 in ascending lap id order.
    pub fn from_samples(samples: Vec<Sample>, driver: &str, segmenter: &LapSegmenter) -> Self {
        let laps = group_laps(samples.clone())
            .into_par_iter()
            .enumerate()
            .map(|(number, lap_samples)| {
                Lap::new(
                    lap_samples,
                    LapConfig {
                        number: number as i32,
                        driver: driver.to_string(),
                    },
                    segmenter,
                )
            })
            .collect();
        Self {
            table: samples,
            laps,
        }
    }

    /// Number the next appended lap gets
    fn next_lap_number(&self) -> i32 {
        self.laps.last().map(|lap| lap.number + 1).unwrap_or(0)
    }

    /// Lap times of the laps whose lap time is known, as `(number, laptime)`.
    pub fn laptimes(&self) -> Vec<(i32, f64)> {
        self.laps
            .iter()
            .filter_map(|lap| lap.laptime.map(|laptime| (lap.number, laptime)))
            .collect()
    }
}

/// Appends `other` to `self`. The laps of `other` are moved into the result and
/// renumbered to follow the last lap of `self`; nothing else on them changes.
impl Add for Run {
    type Output = Run;

    fn add(mut self, other: Run) -> Run {
        let offset = self.next_lap_number();
        self.table.extend(other.table);
        self.laps.extend(other.laps.into_iter().map(|mut lap| {
            lap.number += offset;
            lap
        }));
        self
    }
}
