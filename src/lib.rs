// Library interface for lapsplit
// The binary and the integration tests both go through these modules

pub mod config;
pub mod errors;
pub mod lap;
pub mod run;
pub mod segmentation;
pub mod telemetry;
pub mod writer;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::LapsplitError;
pub use lap::{Lap, LapConfig};
pub use run::Run;
pub use segmentation::{LapAnomaly, LapSegmenter, Section, SegmentSignal, SegmentationConfig};
pub use telemetry::{Sample, TelemetryField};
