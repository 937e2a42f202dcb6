use proptest::prelude::*;
use trend_rs::core::{IndexSide, Sample, TimeSeries};

fn sorted_series(steps: Vec<(i64, f64)>) -> TimeSeries {
    let mut timestamp = 0_i64;
    let samples = steps
        .into_iter()
        .map(|(step, value)| {
            timestamp += step;
            Sample::new(timestamp, value)
        })
        .collect();
    TimeSeries::from_samples(samples).expect("generated samples are sorted")
}

proptest! {
    #[test]
    fn find_index_brackets_stay_adjacent_and_in_bounds(
        steps in prop::collection::vec((0i64..1_000, -1_000.0f64..1_000.0), 1..200),
        probe in -10_000i64..250_000
    ) {
        let series = sorted_series(steps);
        let lower = series.find_index(probe, IndexSide::Lower).expect("lower");
        let upper = series.find_index(probe, IndexSide::Upper).expect("upper");
        let nearest = series.find_index(probe, IndexSide::Nearest).expect("nearest");

        prop_assert!(lower <= upper);
        prop_assert!(upper - lower <= 1);
        prop_assert!(upper < series.len());
        prop_assert!(nearest == lower || nearest == upper);
    }

    #[test]
    fn interpolation_is_exact_at_stored_timestamps(
        steps in prop::collection::vec((1i64..1_000, -1_000.0f64..1_000.0), 1..200),
        pick in 0usize..200
    ) {
        let series = sorted_series(steps);
        let sample = series.get(pick % series.len()).expect("in range");

        let value = series.value_at(sample.timestamp, true).expect("value");
        prop_assert_eq!(value, sample.value);
    }

    #[test]
    fn interpolated_value_stays_between_bracketing_samples(
        steps in prop::collection::vec((1i64..1_000, -1_000.0f64..1_000.0), 2..100),
        fraction in 0.0f64..1.0
    ) {
        let series = sorted_series(steps);
        let (first, last) = series.time_span().expect("non-empty");
        let probe = first + ((last - first) as f64 * fraction) as i64;

        let lower = series.get(series.find_index(probe, IndexSide::Lower).expect("lower")).expect("sample");
        let upper = series.get(series.find_index(probe, IndexSide::Upper).expect("upper")).expect("sample");
        let value = series.value_at(probe, true).expect("value");

        let (min, max) = (lower.value.min(upper.value), lower.value.max(upper.value));
        prop_assert!(value >= min - 1e-9 && value <= max + 1e-9);
    }
}
