use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::core::{Curve, CurveId, Ruler, RulerId, ScreenPoint, SurfaceSize, Viewport, plot_points};
use crate::error::TrendError;
use crate::render::{CurveRasterizer, LayerPainter, PixelBuffer, draw_dot};

use super::{TrendChart, TrendChartConfig};

/// Grid lines are drawn one pixel thick.
const GRID_LINE_THICKNESS: f64 = 1.0;

impl TrendChart {
    /// Redraw tick: rebuilds whatever layers are stale for a `width` x `height`
    /// surface and returns the frame to display.
    ///
    /// Returns `None` for a zero-sized surface, in which case nothing is drawn
    /// and pending work is kept for the next tick.
    pub fn tick(&mut self, width: u32, height: u32) -> Option<&PixelBuffer> {
        let size = SurfaceSize::new(width, height);
        if size.is_valid() {
            self.viewport
                .set_draw_rect(self.config.padding.draw_rect(size));
        }
        trace!(width, height, level = ?self.pipeline.pending(), "tick");

        let mut painter = ChartPainter {
            config: &self.config,
            viewport: self.viewport,
            curves: &self.curves,
            rulers: &mut self.rulers,
            selected: self.gestures.selected_ruler(),
        };
        self.pipeline.render(size, &mut painter)
    }
}

struct ChartPainter<'a> {
    config: &'a TrendChartConfig,
    viewport: Viewport,
    curves: &'a IndexMap<CurveId, Curve>,
    rulers: &'a mut IndexMap<RulerId, Ruler>,
    selected: Option<RulerId>,
}

impl ChartPainter<'_> {
    fn draw_ruler(
        &self,
        layer: &mut PixelBuffer,
        rasterizer: &mut CurveRasterizer,
        id: RulerId,
        ruler: Ruler,
    ) {
        let style = self.config.ruler_style;
        let rect = self.viewport.draw_rect();
        let x = self.viewport.time_to_pixel(ruler.location).trunc();
        let thickness = if self.selected == Some(id) {
            style.selected_thickness
        } else {
            style.thickness
        };
        let bounds = layer.bounds();
        rasterizer.draw_curve(
            layer,
            &[
                ScreenPoint::new(x, f64::from(rect.y)),
                ScreenPoint::new(x, f64::from(rect.bottom())),
            ],
            thickness,
            style.color,
            bounds,
        );

        for (curve_id, curve) in self.curves.iter().filter(|(_, curve)| curve.is_visible()) {
            let value = match curve.series().value_at(ruler.location, true) {
                Ok(value) => value,
                Err(TrendError::EmptySeries) => continue,
                Err(err) => {
                    warn!(
                        curve = curve_id.raw(),
                        ruler = id.raw(),
                        error = %err,
                        "skipping ruler marker"
                    );
                    continue;
                }
            };
            let marker = ScreenPoint::new(
                self.viewport.time_to_pixel(ruler.location),
                self.viewport.value_to_pixel_y(value, curve.style()),
            );
            draw_dot(layer, marker, style.marker_outer_diameter, style.color);
            draw_dot(layer, marker, style.marker_inner_diameter, curve.style().color);
        }
    }
}

impl LayerPainter for ChartPainter<'_> {
    fn paint_background(&mut self, layer: &mut PixelBuffer, rasterizer: &mut CurveRasterizer) {
        layer.clear(self.config.background);

        let rect = self.viewport.draw_rect();
        let divisions = i64::from(self.config.grid_divisions);
        if divisions == 0 || rect.is_empty() {
            return;
        }
        let bounds = layer.bounds();
        for line in 0..=divisions {
            let y = f64::from(rect.y) + (line * i64::from(rect.height) / divisions) as f64;
            rasterizer.draw_curve(
                layer,
                &[
                    ScreenPoint::new(f64::from(rect.x), y),
                    ScreenPoint::new(f64::from(rect.right()), y),
                ],
                GRID_LINE_THICKNESS,
                self.config.grid_color,
                bounds,
            );
        }
    }

    fn paint_curves(&mut self, layer: &mut PixelBuffer, rasterizer: &mut CurveRasterizer) {
        let clip = self
            .viewport
            .draw_rect()
            .expand_vertical(self.config.curve_clip_margin_px);

        for (id, curve) in self.curves.iter().filter(|(_, curve)| curve.is_visible()) {
            let points = match plot_points(curve, self.viewport, self.config.max_points_per_pixel)
            {
                Ok(points) => points,
                Err(err) => {
                    warn!(curve = id.raw(), error = %err, "skipping curve draw");
                    continue;
                }
            };
            let style = curve.style();
            rasterizer.draw_curve(layer, &points, style.thickness, style.color, clip);
        }
    }

    fn paint_overlay(&mut self, layer: &mut PixelBuffer, rasterizer: &mut CurveRasterizer) {
        let (start, end) = self.viewport.range();
        for ruler in self.rulers.values_mut() {
            ruler.clamp_into(start, end);
        }
        for (&id, &ruler) in self.rulers.iter() {
            self.draw_ruler(layer, rasterizer, id, ruler);
        }
    }
}
