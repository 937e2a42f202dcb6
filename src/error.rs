use thiserror::Error;

use crate::core::{CurveId, RulerId, Tick};

pub type TrendResult<T> = Result<T, TrendError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendError {
    #[error("time series has no samples")]
    EmptySeries,

    #[error("no samples inside the requested time range")]
    EmptyRange,

    #[error(
        "sample {index} at tick {timestamp} is older than the previous sample at tick {previous}"
    )]
    UnsortedInput {
        index: usize,
        timestamp: Tick,
        previous: Tick,
    },

    #[error("pinch gesture implies a non-positive time scale: {scale}")]
    InvalidPinchScale { scale: f64 },

    #[error("buffer size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("unknown curve: {0:?}")]
    UnknownCurve(CurveId),

    #[error("unknown ruler: {0:?}")]
    UnknownRuler(RulerId),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
