use tracing::trace;

use crate::core::{Curve, PixelRect, Sample, ScreenPoint, Viewport};
use crate::error::TrendResult;

/// Thins a time-ordered window so no two plotted samples are closer than `min_spacing` ticks.
///
/// A candidate sample is held back until a later sample lies more than
/// `min_spacing` after it; only then is the candidate emitted and replaced.
/// The first and the last sample of the window are always kept.
#[must_use]
pub fn decimate(window: &[Sample], min_spacing: f64) -> Vec<Sample> {
    let Some(&last) = window.last() else {
        return Vec::new();
    };
    if window.len() == 1 {
        return vec![last];
    }

    let mut kept = Vec::new();
    let mut candidate = 0;
    for (index, sample) in window.iter().enumerate().skip(1) {
        if sample.timestamp as f64 > window[candidate].timestamp as f64 + min_spacing {
            kept.push(window[candidate]);
            candidate = index;
        }
    }
    if kept.is_empty() {
        kept.push(window[0]);
    }
    kept.push(last);
    kept
}

/// Moves the outermost points onto the left/right edge of `rect`.
///
/// Each edge point is slid along the line to its neighbour, so the stroke
/// leaves the plot area with its true slope.
pub fn clip_to_horizontal_edges(points: &mut [ScreenPoint], rect: PixelRect) {
    let count = points.len();
    if count < 2 {
        return;
    }

    let left = f64::from(rect.x);
    let right = f64::from(rect.right());
    if points[0].x < left {
        points[0] = points[0].at_x(points[1], left);
    }
    if points[count - 1].x > right {
        points[count - 1] = points[count - 1].at_x(points[count - 2], right);
    }
}

/// Screen points of the part of `curve` inside the viewport, decimated and edge-clipped.
///
/// At most about `max_points_per_pixel` points are produced per pixel
/// column, whatever the length of the series.
pub fn plot_points(
    curve: &Curve,
    viewport: Viewport,
    max_points_per_pixel: f64,
) -> TrendResult<Vec<ScreenPoint>> {
    let series = curve.series();
    if series.is_empty() {
        return Ok(Vec::new());
    }

    let window = series.visible_window(viewport.start(), viewport.end())?;
    let min_spacing = viewport.ticks_per_pixel() / max_points_per_pixel;
    let window_len = window.end() - window.start() + 1;
    let kept = decimate(&series.samples()[window], min_spacing);

    let style = curve.style();
    let mut points: Vec<ScreenPoint> = kept
        .iter()
        .map(|sample| {
            ScreenPoint::new(
                viewport.time_to_pixel(sample.timestamp),
                viewport.value_to_pixel_y(sample.value, style),
            )
        })
        .collect();
    clip_to_horizontal_edges(&mut points, viewport.draw_rect());

    trace!(
        window = window_len,
        plotted = points.len(),
        "decimated curve window"
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::{clip_to_horizontal_edges, decimate};
    use crate::core::{PixelRect, Sample, ScreenPoint};

    fn samples(timestamps: &[i64]) -> Vec<Sample> {
        timestamps
            .iter()
            .map(|&t| Sample::new(t, t as f64))
            .collect()
    }

    #[test]
    fn dense_window_keeps_first_and_last() {
        let window = samples(&[0, 1, 2, 3, 4]);
        let kept = decimate(&window, 100.0);
        assert_eq!(kept, samples(&[0, 4]));
    }

    #[test]
    fn sparse_window_keeps_everything() {
        let window = samples(&[0, 10, 20, 30]);
        assert_eq!(decimate(&window, 5.0), window);
    }

    #[test]
    fn candidate_is_emitted_once_next_sample_is_far_enough() {
        let window = samples(&[0, 3, 6, 12, 13, 14]);
        assert_eq!(decimate(&window, 5.0), samples(&[0, 6, 14]));
    }

    #[test]
    fn degenerate_windows() {
        assert!(decimate(&[], 1.0).is_empty());
        assert_eq!(decimate(&samples(&[7]), 1.0), samples(&[7]));
    }

    #[test]
    fn clipping_slides_edge_points_along_neighbour() {
        let mut points = vec![
            ScreenPoint::new(-10.0, 0.0),
            ScreenPoint::new(10.0, 20.0),
            ScreenPoint::new(30.0, 0.0),
        ];
        clip_to_horizontal_edges(&mut points, PixelRect::new(0, 0, 20, 20));
        assert_eq!(points[0], ScreenPoint::new(0.0, 10.0));
        assert_eq!(points[2], ScreenPoint::new(20.0, 10.0));
    }
}
