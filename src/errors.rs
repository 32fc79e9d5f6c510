// Error types for lapsplit

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum LapsplitError {
    // Errors while loading telemetry tables
    #[snafu(display("Invalid telemetry file: {path}"))]
    InvalidTelemetryFile { path: String },
    #[snafu(display("Error reading telemetry CSV"))]
    TelemetryLoaderError { source: csv::Error },

    // Segmentation errors
    #[snafu(display("At least two boundaries are needed to build sections, got {count}"))]
    TooFewBoundaries { count: usize },
    #[snafu(display("Lap with {samples} samples produced {boundaries} boundaries"))]
    DegenerateLap { samples: usize, boundaries: usize },

    // Errors for the lap summary writer
    #[snafu(display("Error writing lap summary file"))]
    WriterError { source: io::Error },

    // Config management errors
    #[snafu(display("Could not find application config directory"))]
    NoConfigDir,
    #[snafu(display("Error accessing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
    #[snafu(display("Error parsing config file {path}"))]
    ConfigParseError {
        path: String,
        source: serde_json::Error,
    },
}
