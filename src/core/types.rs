use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TrendError, TrendResult};

/// Absolute time unit used for every timestamp: 100 ns since the Unix epoch.
pub type Tick = i64;

/// Ticks in one millisecond.
pub const TICKS_PER_MILLISECOND: Tick = 10_000;

/// Ticks in one second.
pub const TICKS_PER_SECOND: Tick = 1_000 * TICKS_PER_MILLISECOND;

/// Converts a UTC timestamp into ticks.
#[must_use]
pub fn datetime_to_ticks(time: DateTime<Utc>) -> Tick {
    let seconds = time.timestamp() * TICKS_PER_SECOND;
    seconds + Tick::from(time.timestamp_subsec_nanos() / 100)
}

/// Converts ticks back into a UTC timestamp.
pub fn ticks_to_datetime(ticks: Tick) -> TrendResult<DateTime<Utc>> {
    let seconds = ticks.div_euclid(TICKS_PER_SECOND);
    let nanos = (ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(seconds, nanos)
        .ok_or_else(|| TrendError::InvalidData(format!("tick {ticks} is out of datetime range")))
}

/// Signed distance `to - from` in ticks as a float; never overflows.
#[must_use]
pub fn tick_distance(from: Tick, to: Tick) -> f64 {
    (i128::from(to) - i128::from(from)) as f64
}

/// `base` moved by `offset` ticks, truncated toward zero.
///
/// Offsets that are not finite or that leave the tick range are
/// `InvalidData`.
pub fn offset_tick(base: Tick, offset: f64) -> TrendResult<Tick> {
    // `Tick::MAX as f64` rounds up to 2^63, which is already out of range.
    if !offset.is_finite() || offset.abs() >= Tick::MAX as f64 {
        return Err(TrendError::InvalidData(format!(
            "tick offset {offset} is out of range"
        )));
    }
    base.checked_add(offset as Tick).ok_or_else(|| {
        TrendError::InvalidData(format!("tick {base} moved by {offset} overflows"))
    })
}

/// One recorded value of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: Tick,
    pub value: f64,
}

impl Sample {
    #[must_use]
    pub const fn new(timestamp: Tick, value: f64) -> Self {
        Self { timestamp, value }
    }

    #[must_use]
    pub fn at(time: DateTime<Utc>, value: f64) -> Self {
        Self::new(datetime_to_ticks(time), value)
    }

    /// Value of the straight line through `self` and `other` at `timestamp`.
    ///
    /// Equal timestamps have no slope; the value of `self` is returned.
    #[must_use]
    pub fn interpolate(self, other: Self, timestamp: Tick) -> f64 {
        if timestamp == self.timestamp || other.timestamp == self.timestamp {
            return self.value;
        }
        if timestamp == other.timestamp {
            return other.value;
        }
        let slope = (other.value - self.value) / tick_distance(self.timestamp, other.timestamp);
        self.value + tick_distance(self.timestamp, timestamp) * slope
    }
}

/// Point in screen space, in pixels. Integer coordinates address pixel centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point on the line through `self` and `other` whose x equals `x`.
    #[must_use]
    pub fn at_x(self, other: Self, x: f64) -> Self {
        if other.x == self.x {
            return Self::new(x, self.y);
        }
        let slope = (other.y - self.y) / (other.x - self.x);
        Self::new(x, self.y + (x - self.x) * slope)
    }
}

/// Integer pixel rectangle; `x..x+width` by `y..y+height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Grows the rectangle vertically by `margin` pixels on both sides.
    #[must_use]
    pub const fn expand_vertical(self, margin: i32) -> Self {
        Self::new(self.x, self.y - margin, self.width, self.height + 2 * margin)
    }

    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self::new(left, top, (right - left).max(0), (bottom - top).max(0))
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }
}

/// Size of the host display surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub const fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub fn bounds(self) -> PixelRect {
        PixelRect::new(
            0,
            0,
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}
