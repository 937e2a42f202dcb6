use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::core::{Sample, Tick};
use crate::error::{TrendError, TrendResult};

/// Which neighbour of a timestamp `TimeSeries::find_index` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexSide {
    /// Sample at or before the timestamp (first sample when before the series).
    Lower,
    /// Sample after the timestamp (last sample when past the series).
    Upper,
    /// Closer of the two; equal distances resolve to `Upper`.
    Nearest,
}

/// Append-only sequence of samples ordered by non-decreasing timestamp.
///
/// Every lookup is a binary search, so the ordering invariant is checked
/// whenever samples enter the series and never afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    samples: Vec<Sample>,
}

impl TimeSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from pre-sorted samples.
    pub fn from_samples(samples: Vec<Sample>) -> TrendResult<Self> {
        ensure_sorted(None, &samples, 0)?;
        Ok(Self { samples })
    }

    /// Appends one sample; rejects samples older than the last one.
    pub fn push(&mut self, sample: Sample) -> TrendResult<()> {
        if let Some(last) = self.samples.last()
            && sample.timestamp < last.timestamp
        {
            return Err(TrendError::UnsortedInput {
                index: self.samples.len(),
                timestamp: sample.timestamp,
                previous: last.timestamp,
            });
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Appends a batch of samples. Nothing is appended when the batch is unsorted.
    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) -> TrendResult<()> {
        let batch: Vec<Sample> = samples.into_iter().collect();
        ensure_sorted(self.samples.last().copied(), &batch, self.samples.len())?;
        self.samples.extend(batch);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).copied()
    }

    #[must_use]
    pub fn first(&self) -> Option<Sample> {
        self.samples.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    /// First and last timestamp of the series.
    #[must_use]
    pub fn time_span(&self) -> Option<(Tick, Tick)> {
        Some((self.first()?.timestamp, self.last()?.timestamp))
    }

    /// Smallest and largest finite value of the series.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .map(|sample| sample.value)
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }

    /// Binary search for the samples around `timestamp`.
    ///
    /// The search keeps two cursors and halves the gap until they are
    /// adjacent, so `Lower` and `Upper` always differ by at most one and both
    /// saturate at the series edges for timestamps outside the series.
    pub fn find_index(&self, timestamp: Tick, side: IndexSide) -> TrendResult<usize> {
        let (lower, upper) = self.bracket(timestamp)?;
        Ok(match side {
            IndexSide::Lower => lower,
            IndexSide::Upper => upper,
            IndexSide::Nearest => self.nearest_of(lower, upper, timestamp),
        })
    }

    /// Value of the series at `timestamp`.
    ///
    /// With `interpolate` the bracketing samples are joined by a straight
    /// line (which extrapolates past either end of the series); without it
    /// the temporally closer bracketing sample is returned, ties going to the
    /// later one.
    pub fn value_at(&self, timestamp: Tick, interpolate: bool) -> TrendResult<f64> {
        let (lower, upper) = self.bracket(timestamp)?;
        let below = self.samples[lower];
        let above = self.samples[upper];

        if interpolate {
            return Ok(below.interpolate(above, timestamp));
        }

        let distance_below = timestamp.abs_diff(below.timestamp);
        let distance_above = above.timestamp.abs_diff(timestamp);
        if distance_below < distance_above {
            Ok(below.value)
        } else {
            Ok(above.value)
        }
    }

    /// Mean value of the samples between the nearest indices of both timestamps.
    ///
    /// The arguments may be given in either order.
    pub fn average_in_range(&self, first: Tick, second: Tick) -> TrendResult<f64> {
        let start = self.find_index(first.min(second), IndexSide::Nearest)?;
        let end = self.find_index(first.max(second), IndexSide::Nearest)?;

        let Some(window) = self.samples.get(start..=end).filter(|w| !w.is_empty()) else {
            return Err(TrendError::EmptyRange);
        };

        let sum: f64 = window.iter().map(|sample| sample.value).sum();
        Ok(sum / window.len() as f64)
    }

    /// Index range covering `start..=end` plus one sample on each side.
    ///
    /// The extra samples let the curve enter and leave the plot area with the
    /// correct slope. The range is clamped to the series.
    pub fn visible_window(&self, start: Tick, end: Tick) -> TrendResult<RangeInclusive<usize>> {
        let lower = self
            .find_index(start, IndexSide::Lower)?
            .saturating_sub(1);
        let upper = (self.find_index(end, IndexSide::Upper)? + 1).min(self.samples.len() - 1);
        Ok(lower..=upper.max(lower))
    }

    fn bracket(&self, timestamp: Tick) -> TrendResult<(usize, usize)> {
        if self.samples.is_empty() {
            return Err(TrendError::EmptySeries);
        }

        let mut lower = 0;
        let mut upper = self.samples.len() - 1;
        while upper - lower > 1 {
            let middle = lower + (upper - lower) / 2;
            if self.samples[middle].timestamp > timestamp {
                upper = middle;
            } else {
                lower = middle;
            }
        }
        Ok((lower, upper))
    }

    fn nearest_of(&self, lower: usize, upper: usize, timestamp: Tick) -> usize {
        if lower == upper {
            return lower;
        }
        let distance_lower = timestamp.abs_diff(self.samples[lower].timestamp);
        let distance_upper = timestamp.abs_diff(self.samples[upper].timestamp);
        if distance_lower < distance_upper {
            lower
        } else {
            upper
        }
    }
}

fn ensure_sorted(previous: Option<Sample>, batch: &[Sample], offset: usize) -> TrendResult<()> {
    let mut previous = previous;
    for (index, sample) in batch.iter().enumerate() {
        if let Some(prev) = previous
            && sample.timestamp < prev.timestamp
        {
            return Err(TrendError::UnsortedInput {
                index: offset + index,
                timestamp: sample.timestamp,
                previous: prev.timestamp,
            });
        }
        previous = Some(*sample);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{IndexSide, TimeSeries};
    use crate::core::Sample;
    use crate::error::TrendError;

    fn series(points: &[(i64, f64)]) -> TimeSeries {
        TimeSeries::from_samples(points.iter().map(|&(t, v)| Sample::new(t, v)).collect())
            .expect("sorted samples")
    }

    #[test]
    fn find_index_brackets_inner_timestamp() {
        let s = series(&[(0, 0.0), (10, 1.0), (20, 2.0), (30, 3.0)]);
        assert_eq!(s.find_index(14, IndexSide::Lower), Ok(1));
        assert_eq!(s.find_index(14, IndexSide::Upper), Ok(2));
        assert_eq!(s.find_index(14, IndexSide::Nearest), Ok(1));
        assert_eq!(s.find_index(16, IndexSide::Nearest), Ok(2));
    }

    #[test]
    fn nearest_tie_resolves_to_upper() {
        let s = series(&[(0, 0.0), (10, 1.0)]);
        assert_eq!(s.find_index(5, IndexSide::Nearest), Ok(1));
    }

    #[test]
    fn single_sample_series_is_degenerate_but_valid() {
        let s = series(&[(42, 7.0)]);
        for side in [IndexSide::Lower, IndexSide::Upper, IndexSide::Nearest] {
            assert_eq!(s.find_index(-100, side), Ok(0));
        }
        assert_eq!(s.value_at(1_000, true), Ok(7.0));
        assert_eq!(s.average_in_range(0, 100), Ok(7.0));
    }

    #[test]
    fn empty_series_lookups_fail() {
        let s = TimeSeries::new();
        assert_eq!(
            s.find_index(0, IndexSide::Lower),
            Err(TrendError::EmptySeries)
        );
        assert_eq!(s.value_at(0, true), Err(TrendError::EmptySeries));
        assert_eq!(s.average_in_range(0, 10), Err(TrendError::EmptySeries));
    }

    #[test]
    fn push_rejects_older_sample() {
        let mut s = series(&[(0, 0.0), (10, 1.0)]);
        let err = s.push(Sample::new(5, 0.5)).expect_err("unsorted");
        assert_eq!(
            err,
            TrendError::UnsortedInput {
                index: 2,
                timestamp: 5,
                previous: 10
            }
        );
        assert_eq!(s.len(), 2);
        s.push(Sample::new(10, 2.0)).expect("equal timestamp is allowed");
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut s = series(&[(0, 0.0)]);
        let batch = vec![Sample::new(5, 1.0), Sample::new(3, 1.0)];
        assert!(s.extend(batch).is_err());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn visible_window_over_fetches_one_sample_each_side() {
        let s = series(&[(0, 0.0), (10, 1.0), (20, 2.0), (30, 3.0), (40, 4.0), (50, 5.0)]);
        assert_eq!(s.visible_window(22, 28), Ok(1..=4));
        assert_eq!(s.visible_window(-50, 100), Ok(0..=5));
    }

    #[test]
    fn snap_value_picks_closer_sample() {
        let s = series(&[(0, 1.0), (10, 3.0)]);
        assert_eq!(s.value_at(2, false), Ok(1.0));
        assert_eq!(s.value_at(5, false), Ok(3.0));
        assert_eq!(s.value_at(8, false), Ok(3.0));
    }
}
