#[cfg(feature = "parallel-composite")]
use rayon::prelude::*;
use tracing::warn;

use crate::core::{PixelRect, ScreenPoint, SurfaceSize};
use crate::render::brush::Brush;
use crate::render::color::blend_packed;
use crate::render::{Color, PixelBuffer};

/// Distance between two brush stamps along a segment, in pixels.
const STEP_WIDTH: f64 = 1.0;

/// Surfaces with at least this many pixels are composited in parallel.
#[cfg(feature = "parallel-composite")]
const PARALLEL_COMPOSITE_MIN_PIXELS: usize = 256 * 256;

/// Pixels handed to one rayon task during compositing.
#[cfg(feature = "parallel-composite")]
const COMPOSITE_CHUNK_PIXELS: usize = 16 * 1024;

/// Per-pixel opacity accumulator for one polyline, `0..=255`.
///
/// The allocation is kept between rasterizations and only grows or shrinks
/// when the surface size changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageBuffer {
    width: u32,
    height: u32,
    values: Vec<u8>,
}

impl CoverageBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(self.values[y as usize * self.width as usize + x as usize])
    }

    /// Sizes the buffer for `size` and zeroes every value.
    pub fn reset(&mut self, size: SurfaceSize) {
        self.width = size.width;
        self.height = size.height;
        self.values.clear();
        self.values.resize(size.pixel_count(), 0);
    }
}

/// Anti-aliased variable-width polyline rasterizer.
///
/// A curve is drawn in two passes: every segment stamps a round brush into a
/// shared coverage buffer, then the coverage is composited onto the target in
/// one color. Overlapping stamps of the same curve therefore merge before any
/// color is mixed.
#[derive(Debug, Clone, Default)]
pub struct CurveRasterizer {
    coverage: CoverageBuffer,
}

impl CurveRasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn coverage(&self) -> &CoverageBuffer {
        &self.coverage
    }

    /// Rasterizes `points` and composites the stroke onto `target`.
    ///
    /// Fewer than two points draw nothing.
    pub fn draw_curve(
        &mut self,
        target: &mut PixelBuffer,
        points: &[ScreenPoint],
        thickness: f64,
        color: Color,
        clip: PixelRect,
    ) {
        if points.len() < 2 {
            return;
        }
        self.accumulate(target.size(), points, thickness, clip);
        self.composite(target, color);
    }

    /// Fills the coverage buffer for a polyline of `points`.
    ///
    /// Each segment is first cut to the clip area grown by the brush reach,
    /// then the remaining piece is walked in steps of one pixel. The step count
    /// is rounded up, so every stamp's ring contribution is scaled by
    /// `ideal_steps / steps` to keep the ink per unit length constant.
    /// Contributions add up and saturate at 255.
    pub fn accumulate(
        &mut self,
        size: SurfaceSize,
        points: &[ScreenPoint],
        thickness: f64,
        clip: PixelRect,
    ) {
        self.coverage.reset(size);
        if points.len() < 2 {
            return;
        }
        if !thickness.is_finite() || thickness <= 0.0 {
            warn!(thickness, "skipping curve with invalid stroke thickness");
            return;
        }

        let clip = clip.intersect(size.bounds());
        if clip.is_empty() {
            return;
        }

        let brush = Brush::for_thickness(thickness);
        let ring_alpha = 255.0 / thickness * STEP_WIDTH;
        let mut stamper = Stamper {
            values: &mut self.coverage.values,
            stride: size.width as usize,
            clip,
            brush,
        };

        for (segment, pair) in points.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            if !is_finite_point(from) || !is_finite_point(to) {
                continue;
            }

            if from == to {
                if segment == 0 {
                    stamper.stamp(from, ring_alpha);
                }
                continue;
            }
            let Some(visible) = clip_segment(from, to, clip, brush.reach()) else {
                continue;
            };

            let dx = visible.end.x - visible.start.x;
            let dy = visible.end.y - visible.start.y;
            let ideal_steps = dx.hypot(dy) / STEP_WIDTH;
            // Bounded by the diagonal of the grown clip area.
            let steps = ideal_steps.ceil() as u64;
            let correction = if steps == 0 {
                1.0
            } else {
                ideal_steps / steps as f64
            };

            // Later segments start where the previous one ended; skip the shared point.
            let first_step = u64::from(segment > 0 && !visible.start_clipped);
            for step in first_step..=steps {
                let t = if steps == 0 {
                    0.0
                } else {
                    step as f64 / steps as f64
                };
                stamper.stamp(
                    ScreenPoint::new(visible.start.x + dx * t, visible.start.y + dy * t),
                    ring_alpha * correction,
                );
            }
        }
    }

    /// Writes the accumulated coverage onto `target` in `color`.
    ///
    /// Full coverage overwrites, partial coverage blends, zero coverage leaves
    /// the pixel alone. Pixels are independent, so large surfaces are split
    /// into chunks processed on the rayon pool.
    pub fn composite(&self, target: &mut PixelBuffer, color: Color) {
        if self.coverage.size() != target.size() {
            warn!(
                coverage_width = self.coverage.width,
                coverage_height = self.coverage.height,
                target_width = target.width(),
                target_height = target.height(),
                "skipping composite onto a differently sized buffer"
            );
            return;
        }

        let packed = color.opaque().packed();
        let coverage = self.coverage.values();
        let pixels = target.pixels_mut();

        #[cfg(feature = "parallel-composite")]
        {
            if pixels.len() >= PARALLEL_COMPOSITE_MIN_PIXELS {
                pixels
                    .par_chunks_mut(COMPOSITE_CHUNK_PIXELS)
                    .zip(coverage.par_chunks(COMPOSITE_CHUNK_PIXELS))
                    .for_each(|(pixels, coverage)| composite_span(pixels, coverage, packed));
                return;
            }
        }

        composite_span(pixels, coverage, packed);
    }
}

struct Stamper<'a> {
    values: &'a mut [u8],
    stride: usize,
    clip: PixelRect,
    brush: Brush,
}

impl Stamper<'_> {
    /// Adds one brush stamp centered at `center`.
    ///
    /// `ring_alpha` is the contribution of a ring pixel at falloff factor 1;
    /// solid-core pixels always add 255.
    #[inline]
    fn stamp(&mut self, center: ScreenPoint, ring_alpha: f64) {
        let reach = self.brush.reach();
        let center_x = center.x.round() as i32;
        let center_y = center.y.round() as i32;

        let x_min = center_x.saturating_sub(reach).max(self.clip.x);
        let x_max = center_x.saturating_add(reach).min(self.clip.right() - 1);
        let y_min = center_y.saturating_sub(reach).max(self.clip.y);
        let y_max = center_y.saturating_add(reach).min(self.clip.bottom() - 1);

        for y in y_min..=y_max {
            let row = y as usize * self.stride;
            let dy = f64::from(y) - center.y;
            for x in x_min..=x_max {
                let index = row + x as usize;
                let current = self.values[index];
                if current == u8::MAX {
                    continue;
                }

                let dx = f64::from(x) - center.x;
                let distance_sq = dx * dx + dy * dy;
                let alpha = if self.brush.is_solid(distance_sq, false) {
                    255.0
                } else {
                    match self.brush.falloff(distance_sq) {
                        Some(factor) => ring_alpha * factor,
                        None => continue,
                    }
                };

                self.values[index] = (f64::from(current) + alpha).min(255.0) as u8;
            }
        }
    }
}

fn composite_span(pixels: &mut [u32], coverage: &[u8], packed: u32) {
    for (pixel, &alpha) in pixels.iter_mut().zip(coverage) {
        match alpha {
            0 => {}
            u8::MAX => *pixel = packed,
            alpha => *pixel = blend_packed(*pixel, packed, alpha),
        }
    }
}

fn is_finite_point(point: ScreenPoint) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// Piece of a segment that lies inside a clip area.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VisibleSegment {
    start: ScreenPoint,
    end: ScreenPoint,
    /// `true` when `start` was moved onto the clip border.
    start_clipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClipEdge {
    Vertical(f64),
    Horizontal(f64),
}

/// Cuts the segment `from..to` to `clip` grown by `margin` on every side.
///
/// Liang-Barsky clipping; `None` when the segment misses the area. Cut
/// endpoints are solved on the border line they cross rather than by
/// `from + t * (to - from)`, so a point 1e17 pixels away still lands on
/// the border exactly.
fn clip_segment(
    from: ScreenPoint,
    to: ScreenPoint,
    clip: PixelRect,
    margin: i32,
) -> Option<VisibleSegment> {
    let margin = f64::from(margin);
    let x_min = f64::from(clip.x) - margin;
    let x_max = f64::from(clip.right()) + margin;
    let y_min = f64::from(clip.y) - margin;
    let y_max = f64::from(clip.bottom()) + margin;

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let mut enter = None;
    let mut exit = None;

    for (p, q, edge) in [
        (-dx, from.x - x_min, ClipEdge::Vertical(x_min)),
        (dx, x_max - from.x, ClipEdge::Vertical(x_max)),
        (-dy, from.y - y_min, ClipEdge::Horizontal(y_min)),
        (dy, y_max - from.y, ClipEdge::Horizontal(y_max)),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t0 {
                t0 = r;
                enter = Some(edge);
            }
        } else if r < t1 {
            t1 = r;
            exit = Some(edge);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some(VisibleSegment {
        start: enter.map_or(from, |edge| point_on_edge(from, to, edge)),
        end: exit.map_or(to, |edge| point_on_edge(from, to, edge)),
        start_clipped: enter.is_some(),
    })
}

fn point_on_edge(from: ScreenPoint, to: ScreenPoint, edge: ClipEdge) -> ScreenPoint {
    match edge {
        ClipEdge::Vertical(x) => from.at_x(to, x),
        ClipEdge::Horizontal(y) => {
            let swapped = ScreenPoint::new(from.y, from.x).at_x(ScreenPoint::new(to.y, to.x), y);
            ScreenPoint::new(swapped.y, swapped.x)
        }
    }
}
