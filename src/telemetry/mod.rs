pub mod loader;

pub use loader::{group_laps, load_telemetry_csv, load_telemetry_reader};
use serde::{Deserialize, Deserializer, Serialize};

/// Column names every telemetry table must provide.
pub const COLUMNS: [&str; 15] = [
    "TimeStamp",
    "Throttle",
    "Steering",
    "VN_ax",
    "VN_ay",
    "xPosition",
    "yPosition",
    "zPosition",
    "xVelocity",
    "yVelocity",
    "laps",
    "laptime",
    "globalDelta",
    "delta",
    "dist1",
];

/// A single telemetry reading. Rows keep the order they were recorded in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds, lap-relative once the sample belongs to a `Lap`
    #[serde(rename = "TimeStamp")]
    pub timestamp: f64,
    /// Throttle use. 0=off throttle to 1=full throttle
    #[serde(rename = "Throttle")]
    pub throttle: f64,
    /// Steering wheel angle
    #[serde(rename = "Steering")]
    pub steering: f64,
    /// Longitudinal acceleration, m/s^2
    #[serde(rename = "VN_ax")]
    pub lon_accel: f64,
    /// Lateral acceleration, m/s^2
    #[serde(rename = "VN_ay")]
    pub lat_accel: f64,
    #[serde(rename = "xPosition")]
    pub x_position: f64,
    #[serde(rename = "yPosition")]
    pub y_position: f64,
    #[serde(rename = "zPosition")]
    pub z_position: f64,
    #[serde(rename = "xVelocity")]
    pub x_velocity: f64,
    #[serde(rename = "yVelocity")]
    pub y_velocity: f64,
    /// Lap identifier as recorded by the logger
    #[serde(rename = "laps", deserialize_with = "deserialize_lap_id")]
    pub lap_id: i64,
    /// Total lap time, repeated on every row of the lap
    pub laptime: f64,
    /// Final gap to the reference lap, repeated on every row of the lap
    #[serde(rename = "globalDelta")]
    pub global_delta: f64,
    /// Running gap to the reference lap in seconds. Negative is ahead.
    pub delta: f64,
    /// Meters traveled, lap-relative once the sample belongs to a `Lap`
    #[serde(rename = "dist1")]
    pub distance: f64,
}

// loggers write the lap column as either `3` or `3.0`
fn deserialize_lap_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round() as i64)
}

/// Numeric sample fields that can drive segmentation or be checked for uniqueness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryField {
    Timestamp,
    Throttle,
    Steering,
    LonAccel,
    LatAccel,
    XPosition,
    YPosition,
    ZPosition,
    XVelocity,
    YVelocity,
    Laptime,
    GlobalDelta,
    Delta,
    Distance,
}

impl TelemetryField {
    pub fn value(&self, sample: &Sample) -> f64 {
        match self {
            Self::Timestamp => sample.timestamp,
            Self::Throttle => sample.throttle,
            Self::Steering => sample.steering,
            Self::LonAccel => sample.lon_accel,
            Self::LatAccel => sample.lat_accel,
            Self::XPosition => sample.x_position,
            Self::YPosition => sample.y_position,
            Self::ZPosition => sample.z_position,
            Self::XVelocity => sample.x_velocity,
            Self::YVelocity => sample.y_velocity,
            Self::Laptime => sample.laptime,
            Self::GlobalDelta => sample.global_delta,
            Self::Delta => sample.delta,
            Self::Distance => sample.distance,
        }
    }

    /// Extracts this field from every sample, keeping sample order.
    pub fn column(&self, samples: &[Sample]) -> Vec<f64> {
        samples.iter().map(|s| self.value(s)).collect()
    }

    /// Column header used by the telemetry tables
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Timestamp => "TimeStamp",
            Self::Throttle => "Throttle",
            Self::Steering => "Steering",
            Self::LonAccel => "VN_ax",
            Self::LatAccel => "VN_ay",
            Self::XPosition => "xPosition",
            Self::YPosition => "yPosition",
            Self::ZPosition => "zPosition",
            Self::XVelocity => "xVelocity",
            Self::YVelocity => "yVelocity",
            Self::Laptime => "laptime",
            Self::GlobalDelta => "globalDelta",
            Self::Delta => "delta",
            Self::Distance => "dist1",
        }
    }
}

impl std::fmt::Display for TelemetryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}
