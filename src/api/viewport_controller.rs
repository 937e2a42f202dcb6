use tracing::{debug, trace};

use crate::core::{CurveId, Tick};
use crate::error::{TrendError, TrendResult};
use crate::render::DirtyLevel;

use super::TrendChart;

/// Mouse wheel delta that changes the visible span by 100%.
const WHEEL_DELTA_PER_ZOOM: f64 = 1000.0;

impl TrendChart {
    pub fn set_range(&mut self, start: Tick, end: Tick) -> TrendResult<()> {
        self.viewport.set_range(start, end)?;
        debug!(start, end, "set visible range");
        self.pipeline.request(DirtyLevel::Curves);
        Ok(())
    }

    /// Shows a curve from its first to its last sample.
    pub fn show_full_curve(&mut self, id: CurveId) -> TrendResult<()> {
        let series = self
            .curves
            .get(&id)
            .ok_or(TrendError::UnknownCurve(id))?
            .series();
        if series.len() < 2 {
            return Err(TrendError::InvalidData(format!(
                "curve {} needs at least two samples to span a range",
                id.raw()
            )));
        }
        let (start, end) = series.time_span().ok_or(TrendError::EmptySeries)?;
        self.set_range(start, end)
    }

    /// Pans so content follows a pointer moved by `delta_px` pixels.
    pub fn pan(&mut self, delta_px: f64) -> TrendResult<()> {
        self.viewport.pan_by_pixels(delta_px)?;
        trace!(delta_px, start = self.viewport.start(), "pan");
        self.pipeline.request(DirtyLevel::Curves);
        Ok(())
    }

    /// Scales the visible span by `factor` keeping `anchor` at its pixel.
    pub fn zoom_at_anchor(&mut self, factor: f64, anchor: Tick) -> TrendResult<()> {
        self.viewport.zoom_by_factor(factor, anchor)?;
        trace!(factor, anchor, span = self.viewport.span(), "zoom");
        self.pipeline.request(DirtyLevel::Curves);
        Ok(())
    }

    /// Zooms to a visible span of exactly `span` ticks around `anchor`.
    pub fn zoom_to_span(&mut self, span: Tick, anchor: Tick) -> TrendResult<()> {
        self.viewport.zoom_to_span(span, anchor)?;
        trace!(span, anchor, "zoom to span");
        self.pipeline.request(DirtyLevel::Curves);
        Ok(())
    }

    /// Zooms around the time under pixel column `x` for a wheel step of `delta`.
    ///
    /// Positive deltas widen the visible span.
    pub fn wheel_zoom(&mut self, delta: f64, x: f64) -> TrendResult<()> {
        let anchor = self.viewport.pixel_to_time(x);
        self.zoom_at_anchor(1.0 + delta / WHEEL_DELTA_PER_ZOOM, anchor)
    }

    #[must_use]
    pub fn pixel_to_time(&self, x: f64) -> Tick {
        self.viewport.pixel_to_time(x)
    }

    #[must_use]
    pub fn time_to_pixel(&self, time: Tick) -> f64 {
        self.viewport.time_to_pixel(time)
    }
}
