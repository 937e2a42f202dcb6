use serde::{Deserialize, Serialize};

use crate::core::{CurveStyle, PixelRect, Tick, offset_tick, tick_distance};
use crate::error::{TrendError, TrendResult};

/// One touch contact of a two-finger gesture.
///
/// `down_time` is the time that was under the finger when it touched down;
/// the pinch keeps that time glued under the current `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinchContact {
    pub down_time: Tick,
    pub down_position: f64,
    pub position: f64,
}

/// Visible time range and the pixel rectangle it is mapped onto.
///
/// Pan and zoom operations are the only writers of `start`/`end`. Results of
/// float arithmetic are truncated toward zero when converted back to ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    start: Tick,
    end: Tick,
    draw_rect: PixelRect,
}

impl Viewport {
    pub fn new(start: Tick, end: Tick, draw_rect: PixelRect) -> TrendResult<Self> {
        validate_range(start, end)?;
        Ok(Self {
            start,
            end,
            draw_rect,
        })
    }

    #[must_use]
    pub fn start(self) -> Tick {
        self.start
    }

    #[must_use]
    pub fn end(self) -> Tick {
        self.end
    }

    #[must_use]
    pub fn range(self) -> (Tick, Tick) {
        (self.start, self.end)
    }

    /// Visible duration; the range is validated so this cannot overflow.
    #[must_use]
    pub fn span(self) -> Tick {
        self.end - self.start
    }

    #[must_use]
    pub fn draw_rect(self) -> PixelRect {
        self.draw_rect
    }

    pub fn set_draw_rect(&mut self, draw_rect: PixelRect) {
        self.draw_rect = draw_rect;
    }

    /// Time covered by one pixel column of the draw rectangle.
    ///
    /// A collapsed draw rectangle is treated as one pixel wide.
    #[must_use]
    pub fn ticks_per_pixel(self) -> f64 {
        self.span() as f64 / f64::from(self.draw_rect.width.max(1))
    }

    pub fn set_range(&mut self, start: Tick, end: Tick) -> TrendResult<()> {
        validate_range(start, end)?;
        self.start = start;
        self.end = end;
        Ok(())
    }

    #[must_use]
    pub fn time_to_pixel(self, time: Tick) -> f64 {
        f64::from(self.draw_rect.x) + tick_distance(self.start, time) / self.ticks_per_pixel()
    }

    /// Time under pixel column `x`, saturating at the ends of the tick range.
    #[must_use]
    pub fn pixel_to_time(self, x: f64) -> Tick {
        let offset = ((x - f64::from(self.draw_rect.x)) * self.ticks_per_pixel()) as Tick;
        self.start.saturating_add(offset)
    }

    /// Vertical pixel of `value` on the curve's own value axis (larger values are higher).
    #[must_use]
    pub fn value_to_pixel_y(self, value: f64, style: &CurveStyle) -> f64 {
        let height = f64::from(self.draw_rect.height);
        let scale = height / (style.max_value - style.min_value);
        f64::from(self.draw_rect.y) + height - (value - style.min_value) * scale
    }

    /// Scales the visible range by `factor` around `anchor`.
    ///
    /// `factor > 1.0` shows more time (zoom out), `factor < 1.0` less.
    pub fn zoom_by_factor(&mut self, factor: f64, anchor: Tick) -> TrendResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(TrendError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }

        let start = offset_tick(anchor, tick_distance(anchor, self.start) * factor)?;
        let end = offset_tick(anchor, tick_distance(anchor, self.end) * factor)?;
        self.set_range(start, end)
    }

    /// Zooms so the visible range lasts exactly `span` ticks.
    ///
    /// The end is scaled around `anchor` and the start is derived from it, so
    /// the resulting span is exact.
    pub fn zoom_to_span(&mut self, span: Tick, anchor: Tick) -> TrendResult<()> {
        if span <= 0 {
            return Err(TrendError::InvalidData(
                "zoom span must be > 0 ticks".to_owned(),
            ));
        }

        let factor = span as f64 / self.span() as f64;
        let end = offset_tick(anchor, tick_distance(anchor, self.end) * factor)?;
        let start = end.checked_sub(span).ok_or_else(|| {
            TrendError::InvalidData(format!("zoom span {span} ending at {end} overflows"))
        })?;
        self.set_range(start, end)
    }

    /// Moves the visible range so content follows a pointer moved by `delta_px`.
    pub fn pan_by_pixels(&mut self, delta_px: f64) -> TrendResult<()> {
        if !delta_px.is_finite() {
            return Err(TrendError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }

        let delta = -delta_px * self.ticks_per_pixel();
        let start = offset_tick(self.start, delta)?;
        let end = offset_tick(self.end, delta)?;
        self.set_range(start, end)
    }

    /// Applies a two-contact pinch.
    ///
    /// The scale comes from the touch-down samples and is fixed for the whole
    /// gesture; the range is then solved so `first.down_time` sits under
    /// `first.position`.
    pub fn pinch(&mut self, first: PinchContact, second: PinchContact) -> TrendResult<()> {
        let scale = tick_distance(second.down_time, first.down_time)
            / (first.down_position - second.down_position);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(TrendError::InvalidPinchScale { scale });
        }

        let offset = first.position - f64::from(self.draw_rect.x);
        let start = offset_tick(first.down_time, -(offset * scale))?;
        let end = offset_tick(start, f64::from(self.draw_rect.width) * scale)?;
        self.set_range(start, end)
    }
}

fn validate_range(start: Tick, end: Tick) -> TrendResult<()> {
    if end <= start {
        return Err(TrendError::InvalidData(format!(
            "time range end ({end}) must be after start ({start})"
        )));
    }
    if end.checked_sub(start).is_none() {
        return Err(TrendError::InvalidData(format!(
            "time range {start}..{end} is wider than the tick range"
        )));
    }
    Ok(())
}
