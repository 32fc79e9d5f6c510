use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::segmentation::{
    ChangePoint, ChangingPointDetector, DeltaClass, LapAnomaly, LapSections, LapSegmenter,
    Section, classify, extract_unique,
};
use crate::telemetry::{Sample, TelemetryField};

/// Identity given to a lap when it is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapConfig {
    /// Lap number within its run, -1 when unknown
    pub number: i32,
    pub driver: String,
}

impl Default for LapConfig {
    fn default() -> Self {
        Self {
            number: -1,
            driver: "Unknown".to_string(),
        }
    }
}

/// One traversal of the circuit with its derived timing data.
#[derive(Clone, Debug)]
pub struct Lap {
    pub number: i32,
    pub driver: String,
    /// Total lap time, `None` if the samples disagree
    pub laptime: Option<f64>,
    /// Gap to the reference lap at the line, `None` if the samples disagree
    pub global_delta: Option<f64>,
    /// Change points of the running delta
    pub delta: Vec<ChangePoint>,
    samples: Vec<Sample>,
    sections: LapSections,
    anomalies: Vec<LapAnomaly>,
}

impl Lap {
    /// Builds a lap from its samples in recording order.
    ///
    /// Timestamps and distances are shifted so the lap starts at zero. Anomalies
    /// found along the way are recorded on the lap and never abort construction.
    pub fn new(samples: Vec<Sample>, config: LapConfig, segmenter: &LapSegmenter) -> Self {
        let mut lap = Self {
            number: config.number,
            driver: config.driver,
            laptime: None,
            global_delta: None,
            delta: Vec::new(),
            samples,
            sections: LapSections::default(),
            anomalies: Vec::new(),
        };
        lap.normalize();
        lap.laptime = lap.expected_unique(TelemetryField::Laptime);
        lap.global_delta = lap.expected_unique(TelemetryField::GlobalDelta);
        lap.delta = ChangingPointDetector::default().trace(&lap.samples, TelemetryField::Delta);
        segmenter.segment(lap)
    }

    fn normalize(&mut self) {
        let min_of = |field: TelemetryField, samples: &[Sample]| {
            samples
                .iter()
                .map(|s| field.value(s))
                .fold(f64::INFINITY, f64::min)
        };
        if self.samples.is_empty() {
            return;
        }
        let start_time = min_of(TelemetryField::Timestamp, &self.samples);
        let start_distance = min_of(TelemetryField::Distance, &self.samples);
        for sample in self.samples.iter_mut() {
            sample.timestamp -= start_time;
            sample.distance -= start_distance;
        }
    }

    fn expected_unique(&mut self, field: TelemetryField) -> Option<f64> {
        match extract_unique(&self.samples, field) {
            Ok(value) => value,
            Err(anomaly) => {
                warn!("Multiple {} found for lap {}", field, self.number);
                self.record_anomaly(anomaly);
                None
            }
        }
    }

    pub(crate) fn set_sections(&mut self, sections: LapSections) {
        self.sections = sections;
    }

    pub(crate) fn record_anomaly(&mut self, anomaly: LapAnomaly) {
        self.anomalies.push(anomaly);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sectors(&self) -> &[Section] {
        &self.sections.sectors
    }

    pub fn microsectors(&self) -> &[Section] {
        &self.sections.microsectors
    }

    pub fn sector_boundaries(&self) -> &[usize] {
        &self.sections.sector_boundaries
    }

    pub fn microsector_boundaries(&self) -> &[usize] {
        &self.sections.microsector_boundaries
    }

    /// Ahead/behind label of every sample, in sample order.
    pub fn delta_classes(&self) -> Vec<DeltaClass> {
        self.samples.iter().map(|s| classify(s.delta)).collect()
    }

    pub fn anomalies(&self) -> &[LapAnomaly] {
        &self.anomalies
    }
}

impl fmt::Display for Lap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.laptime {
            Some(laptime) => write!(f, "[Lap {}] {}s -> {}", self.number, laptime, self.driver),
            None => write!(f, "[Lap {}] unknown laptime -> {}", self.number, self.driver),
        }
    }
}
