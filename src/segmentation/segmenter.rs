use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::LapAnomaly;
use super::change_points::ChangingPointDetector;
use super::sections::{Section, build_sections};
use crate::LapsplitError;
use crate::lap::Lap;
use crate::telemetry::{Sample, TelemetryField};

const DEFAULT_SECTOR_COUNT: usize = 3;
const DEFAULT_MICROSECTOR_LENGTH_M: f64 = 100.;

/// The signal whose change points split a lap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentSignal {
    /// `count` bins of equal lap distance
    EqualDistance { count: usize },
    /// Bins of `length_m` meters from the start of the lap
    DistanceBins { length_m: f64 },
    /// Change points of a telemetry field
    Field {
        field: TelemetryField,
        #[serde(default)]
        tolerance: f64,
    },
}

impl SegmentSignal {
    /// Per-sample signal values, aligned with `samples`.
    pub fn values(&self, samples: &[Sample]) -> Vec<f64> {
        match self {
            Self::EqualDistance { count } => {
                let count = (*count).max(1);
                let (start, end) = distance_range(samples);
                distance_bins(samples, (end - start) / count as f64, count)
            }
            Self::DistanceBins { length_m } => distance_bins(samples, *length_m, usize::MAX),
            Self::Field { field, .. } => field.column(samples),
        }
    }

    pub fn detector(&self) -> ChangingPointDetector {
        match self {
            Self::Field { tolerance, .. } => ChangingPointDetector::new(*tolerance),
            _ => ChangingPointDetector::default(),
        }
    }
}

fn distance_range(samples: &[Sample]) -> (f64, f64) {
    samples
        .iter()
        .map(|s| s.distance)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

// bin index of each sample; a non-positive width puts the whole lap in bin 0
fn distance_bins(samples: &[Sample], width: f64, count: usize) -> Vec<f64> {
    let (start, _) = distance_range(samples);
    samples
        .iter()
        .map(|s| {
            if width > 0. {
                ((s.distance - start) / width)
                    .floor()
                    .clamp(0., (count - 1) as f64)
            } else {
                0.
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    pub sector_signal: SegmentSignal,
    pub microsector_signal: SegmentSignal,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            sector_signal: SegmentSignal::EqualDistance {
                count: DEFAULT_SECTOR_COUNT,
            },
            microsector_signal: SegmentSignal::DistanceBins {
                length_m: DEFAULT_MICROSECTOR_LENGTH_M,
            },
        }
    }
}

/// Sector and microsector partitions of one lap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LapSections {
    pub sector_boundaries: Vec<usize>,
    pub sectors: Vec<Section>,
    pub microsector_boundaries: Vec<usize>,
    pub microsectors: Vec<Section>,
}

#[derive(Clone, Debug, Default)]
pub struct LapSegmenter {
    config: SegmentationConfig,
}

impl LapSegmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Splits `samples` into sectors, then refines every sector into microsectors.
    ///
    /// Microsector boundaries always contain the sector boundaries. Laps with fewer
    /// than two samples cannot be split and return `DegenerateLap`.
    pub fn sections(&self, samples: &[Sample]) -> Result<LapSections, LapsplitError> {
        let sector_signal = &self.config.sector_signal;
        let sector_boundaries = close_boundaries(
            sector_signal
                .detector()
                .detect(&sector_signal.values(samples), None),
            samples.len(),
        );
        if sector_boundaries.len() < 2 {
            return Err(LapsplitError::DegenerateLap {
                samples: samples.len(),
                boundaries: sector_boundaries.len(),
            });
        }
        let sectors = build_sections(samples, &sector_boundaries)?;

        let microsector_signal = &self.config.microsector_signal;
        let microsector_boundaries = microsector_signal
            .detector()
            .detect(&microsector_signal.values(samples), Some(&sector_boundaries));
        let microsectors = build_sections(samples, &microsector_boundaries)?;

        debug!(
            "Split {} samples into {} sectors and {} microsectors",
            samples.len(),
            sectors.len(),
            microsectors.len()
        );
        Ok(LapSections {
            sector_boundaries,
            sectors,
            microsector_boundaries,
            microsectors,
        })
    }

    /// Populates the lap's sections. A lap that cannot be split keeps empty sections
    /// and records the failure as an anomaly.
    pub fn segment(&self, mut lap: Lap) -> Lap {
        match self.sections(lap.samples()) {
            Ok(sections) => lap.set_sections(sections),
            Err(e) => {
                warn!("Could not segment lap {}: {}", lap.number, e);
                let anomaly = match e {
                    LapsplitError::DegenerateLap {
                        samples,
                        boundaries,
                    } => LapAnomaly::DegenerateLap {
                        samples,
                        boundaries,
                    },
                    other => LapAnomaly::SegmentationFailed {
                        reason: other.to_string(),
                    },
                };
                lap.record_anomaly(anomaly);
            }
        }
        lap
    }
}

// change points only mark section starts, the final sample closes the lap
fn close_boundaries(mut boundaries: Vec<usize>, len: usize) -> Vec<usize> {
    if let Some(last) = len.checked_sub(1) {
        if boundaries.last() != Some(&last) {
            boundaries.push(last);
        }
    }
    boundaries
}
