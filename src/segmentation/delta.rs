use serde::{Deserialize, Serialize};

/// Position relative to the reference lap at one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeltaClass {
    /// Faster than the reference lap
    Ahead,
    /// Level with or slower than the reference lap
    Behind,
}

/// Strictly negative deltas are ahead, everything else (including NaN) is behind.
pub fn classify(delta: f64) -> DeltaClass {
    if delta < 0. {
        DeltaClass::Ahead
    } else {
        DeltaClass::Behind
    }
}
