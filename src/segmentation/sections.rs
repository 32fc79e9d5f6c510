use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::LapsplitError;
use crate::telemetry::Sample;

/// A contiguous stretch of a lap between two boundary sample indices.
///
/// `start` is inclusive. `end` is exclusive, except for the last section of a lap
/// whose end is the lap's final sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start: usize,
    pub end: usize,
    /// Seconds spent between the start and end samples
    pub time: f64,
    /// Lap distance at the start sample
    pub start_distance: f64,
    /// Lap distance at the end sample
    pub end_distance: f64,
}

impl Section {
    fn between(samples: &[Sample], start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            time: samples[end].timestamp - samples[start].timestamp,
            start_distance: samples[start].distance,
            end_distance: samples[end].distance,
        }
    }

    pub fn length(&self) -> f64 {
        self.end_distance - self.start_distance
    }
}

/// Builds one section per consecutive pair of `boundaries`.
///
/// Boundaries are sample indices in ascending order and must all point inside
/// `samples`. Detected change points only mark where sections start, so callers
/// append the final sample index to close the last one.
pub fn build_sections(
    samples: &[Sample],
    boundaries: &[usize],
) -> Result<Vec<Section>, LapsplitError> {
    if boundaries.len() < 2 {
        return Err(LapsplitError::TooFewBoundaries {
            count: boundaries.len(),
        });
    }
    Ok(boundaries
        .iter()
        .tuple_windows()
        .map(|(start, end)| Section::between(samples, *start, *end))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn samples_at(times: &[f64]) -> Vec<Sample> {
        times
            .iter()
            .enumerate()
            .map(|(i, t)| Sample {
                timestamp: *t,
                distance: i as f64 * 10.,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_build_sections_example() {
        let samples = samples_at(&[0.0, 0.1, 0.3, 0.6, 1.0, 1.5, 2.1, 2.8, 3.6]);
        let sections = build_sections(&samples, &[0, 3, 5]).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!((sections[0].start, sections[0].end), (0, 3));
        assert!((sections[0].time - 0.6).abs() < 1e-12);
        assert_eq!((sections[1].start, sections[1].end), (3, 5));
        assert!((sections[1].time - 0.9).abs() < 1e-12);
        assert_eq!(sections[1].start_distance, 30.);
        assert_eq!(sections[1].length(), 20.);
    }

    #[test]
    fn test_build_sections_rejects_fewer_than_two_boundaries() {
        let samples = samples_at(&[0.0, 1.0]);
        assert!(matches!(
            build_sections(&samples, &[0]),
            Err(LapsplitError::TooFewBoundaries { count: 1 })
        ));
        assert!(matches!(
            build_sections(&samples, &[]),
            Err(LapsplitError::TooFewBoundaries { count: 0 })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_sections_are_contiguous_and_exhaustive(
            len in 2usize..200,
            cuts in prop::collection::btree_set(1usize..199, 0..20),
        ) {
            let times: Vec<f64> = (0..len).map(|i| i as f64 * 0.05).collect();
            let samples = samples_at(&times);
            let mut boundaries = vec![0];
            boundaries.extend(cuts.into_iter().filter(|c| *c < len - 1));
            boundaries.push(len - 1);

            let sections = build_sections(&samples, &boundaries).unwrap();
            prop_assert_eq!(sections.len(), boundaries.len() - 1);
            prop_assert_eq!(sections[0].start, 0);
            prop_assert_eq!(sections.last().unwrap().end, len - 1);
            for (a, b) in sections.iter().tuple_windows() {
                prop_assert_eq!(a.end, b.start);
            }
            let total: f64 = sections.iter().map(|s| s.time).sum();
            prop_assert!((total - times[len - 1]).abs() < 1e-9);
        }
    }
}
