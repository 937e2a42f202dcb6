use serde::{Deserialize, Serialize};

use crate::core::{PixelRect, SurfaceSize, TICKS_PER_SECOND, Tick};
use crate::error::{TrendError, TrendResult};
use crate::interaction::HitTolerance;
use crate::render::Color;

/// Space between the surface border and the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Padding {
    #[must_use]
    pub const fn uniform(pixels: u32) -> Self {
        Self {
            left: pixels,
            top: pixels,
            right: pixels,
            bottom: pixels,
        }
    }

    /// Plot area of a surface of `size`; collapses to zero width/height when
    /// the padding does not fit.
    #[must_use]
    pub fn draw_rect(self, size: SurfaceSize) -> PixelRect {
        let width = size.width.saturating_sub(self.left + self.right);
        let height = size.height.saturating_sub(self.top + self.bottom);
        PixelRect::new(
            clamp_to_i32(self.left),
            clamp_to_i32(self.top),
            clamp_to_i32(width),
            clamp_to_i32(height),
        )
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(15)
    }
}

/// Look of ruler lines and the markers drawn where they cross curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RulerStyle {
    pub color: Color,
    pub thickness: f64,
    pub selected_thickness: f64,
    /// Outer marker disc, drawn in `color`.
    pub marker_outer_diameter: f64,
    /// Inner marker disc, drawn in the curve color.
    pub marker_inner_diameter: f64,
}

impl Default for RulerStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            thickness: 3.0,
            selected_thickness: 4.0,
            marker_outer_diameter: 12.0,
            marker_inner_diameter: 6.0,
        }
    }
}

/// Public chart bootstrap configuration.
///
/// Serializable so hosts can keep chart setup next to their own settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendChartConfig {
    #[serde(default = "default_start")]
    pub start: Tick,
    #[serde(default = "default_end")]
    pub end: Tick,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default = "default_grid_color")]
    pub grid_color: Color,
    /// Number of horizontal grid bands; `divisions + 1` lines are drawn.
    #[serde(default = "default_grid_divisions")]
    pub grid_divisions: u32,
    /// Upper bound on plotted samples per pixel column.
    #[serde(default = "default_max_points_per_pixel")]
    pub max_points_per_pixel: f64,
    #[serde(default = "default_hit_tolerance_px")]
    pub mouse_hit_tolerance_px: f64,
    #[serde(default = "default_hit_tolerance_px")]
    pub touch_hit_tolerance_px: f64,
    #[serde(default)]
    pub ruler_style: RulerStyle,
    /// Extra pixels above and below the plot area in which thick strokes may still draw.
    #[serde(default = "default_curve_clip_margin_px")]
    pub curve_clip_margin_px: i32,
}

impl Default for TrendChartConfig {
    fn default() -> Self {
        Self::new(default_start(), default_end())
    }
}

impl TrendChartConfig {
    /// Creates a config showing `start..end` with default styling.
    #[must_use]
    pub fn new(start: Tick, end: Tick) -> Self {
        Self {
            start,
            end,
            padding: Padding::default(),
            background: default_background(),
            grid_color: default_grid_color(),
            grid_divisions: default_grid_divisions(),
            max_points_per_pixel: default_max_points_per_pixel(),
            mouse_hit_tolerance_px: default_hit_tolerance_px(),
            touch_hit_tolerance_px: default_hit_tolerance_px(),
            ruler_style: RulerStyle::default(),
            curve_clip_margin_px: default_curve_clip_margin_px(),
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, background: Color, grid_color: Color) -> Self {
        self.background = background;
        self.grid_color = grid_color;
        self
    }

    #[must_use]
    pub fn with_grid_divisions(mut self, divisions: u32) -> Self {
        self.grid_divisions = divisions;
        self
    }

    #[must_use]
    pub fn with_max_points_per_pixel(mut self, max_points_per_pixel: f64) -> Self {
        self.max_points_per_pixel = max_points_per_pixel;
        self
    }

    #[must_use]
    pub fn with_hit_tolerances(mut self, mouse_px: f64, touch_px: f64) -> Self {
        self.mouse_hit_tolerance_px = mouse_px;
        self.touch_hit_tolerance_px = touch_px;
        self
    }

    #[must_use]
    pub fn with_ruler_style(mut self, style: RulerStyle) -> Self {
        self.ruler_style = style;
        self
    }

    #[must_use]
    pub fn hit_tolerance_px(&self, tolerance: HitTolerance) -> f64 {
        match tolerance {
            HitTolerance::Mouse => self.mouse_hit_tolerance_px,
            HitTolerance::Touch => self.touch_hit_tolerance_px,
        }
    }

    pub fn validate(&self) -> TrendResult<()> {
        if self.end <= self.start {
            return Err(TrendError::InvalidData(format!(
                "initial range end ({}) must be after start ({})",
                self.end, self.start
            )));
        }
        if !self.max_points_per_pixel.is_finite() || self.max_points_per_pixel <= 0.0 {
            return Err(TrendError::InvalidData(
                "max points per pixel must be finite and > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("mouse hit tolerance", self.mouse_hit_tolerance_px),
            ("touch hit tolerance", self.touch_hit_tolerance_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TrendError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        let style = self.ruler_style;
        for (name, value) in [
            ("ruler thickness", style.thickness),
            ("selected ruler thickness", style.selected_thickness),
            ("outer marker diameter", style.marker_outer_diameter),
            ("inner marker diameter", style.marker_inner_diameter),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrendError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if self.curve_clip_margin_px < 0 {
            return Err(TrendError::InvalidData(
                "curve clip margin must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> TrendResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| TrendError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> TrendResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| TrendError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn default_start() -> Tick {
    0
}

fn default_end() -> Tick {
    60 * TICKS_PER_SECOND
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_grid_color() -> Color {
    Color::LIGHT_GRAY
}

fn default_grid_divisions() -> u32 {
    10
}

fn default_max_points_per_pixel() -> f64 {
    10.0
}

fn default_hit_tolerance_px() -> f64 {
    10.0
}

fn default_curve_clip_margin_px() -> i32 {
    2
}

#[cfg(test)]
mod tests {
    use super::{Padding, TrendChartConfig};
    use crate::core::{PixelRect, SurfaceSize};

    #[test]
    fn padding_shrinks_surface_into_draw_rect() {
        let rect = Padding::default().draw_rect(SurfaceSize::new(530, 230));
        assert_eq!(rect, PixelRect::new(15, 15, 500, 200));

        let collapsed = Padding::uniform(20).draw_rect(SurfaceSize::new(30, 30));
        assert_eq!((collapsed.width, collapsed.height), (0, 0));
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let config = TrendChartConfig::from_json_str(r#"{ "start": 5, "end": 10 }"#)
            .expect("partial config");
        assert_eq!(config, TrendChartConfig::new(5, 10));
    }

    #[test]
    fn validate_rejects_empty_range() {
        assert!(TrendChartConfig::new(10, 10).validate().is_err());
        assert!(
            TrendChartConfig::default()
                .with_max_points_per_pixel(0.0)
                .validate()
                .is_err()
        );
    }
}
