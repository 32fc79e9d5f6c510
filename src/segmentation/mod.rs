pub mod change_points;
pub mod delta;
pub mod sections;
pub mod segmenter;
pub mod uniqueness;

use serde::{Deserialize, Serialize};

pub use change_points::{ChangePoint, ChangingPointDetector, change_points};
pub use delta::{DeltaClass, classify};
pub use sections::{Section, build_sections};
pub use segmenter::{LapSections, LapSegmenter, SegmentSignal, SegmentationConfig};
pub use uniqueness::extract_unique;

use crate::telemetry::TelemetryField;

/// Non-fatal problem found while building a lap. Kept on the lap it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LapAnomaly {
    /// A field expected to be constant over the lap has several values
    InconsistentField {
        field: TelemetryField,
        distinct_values: usize,
    },
    /// The lap has too few samples to produce two section boundaries
    DegenerateLap { samples: usize, boundaries: usize },
    SegmentationFailed { reason: String },
}

impl std::fmt::Display for LapAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InconsistentField {
                field,
                distinct_values,
            } => write!(f, "{distinct_values} different {field} values"),
            Self::DegenerateLap {
                samples,
                boundaries,
            } => write!(f, "{samples} samples gave only {boundaries} boundaries"),
            Self::SegmentationFailed { reason } => write!(f, "segmentation failed: {reason}"),
        }
    }
}
