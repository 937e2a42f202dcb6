use serde::{Deserialize, Serialize};

use crate::core::TimeSeries;
use crate::error::{TrendError, TrendResult};
use crate::render::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveId(u32);

impl CurveId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Display attributes of a curve.
///
/// `min_value..max_value` is the value range mapped onto the full height of
/// the plot area; every curve has its own value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveStyle {
    pub min_value: f64,
    pub max_value: f64,
    pub color: Color,
    pub thickness: f64,
    pub visible: bool,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 1.0,
            color: Color::BLUE,
            thickness: 2.0,
            visible: true,
        }
    }
}

impl CurveStyle {
    #[must_use]
    pub fn new(min_value: f64, max_value: f64, color: Color, thickness: f64) -> Self {
        Self {
            min_value,
            max_value,
            color,
            thickness,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn validate(self) -> TrendResult<Self> {
        if !self.min_value.is_finite() || !self.max_value.is_finite() {
            return Err(TrendError::InvalidData(
                "curve value range must be finite".to_owned(),
            ));
        }
        if self.max_value <= self.min_value {
            return Err(TrendError::InvalidData(
                "curve max value must be greater than min value".to_owned(),
            ));
        }
        if !self.thickness.is_finite() || self.thickness <= 0.0 {
            return Err(TrendError::InvalidData(
                "curve thickness must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// A time series together with the attributes used to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    series: TimeSeries,
    style: CurveStyle,
}

impl Curve {
    pub fn new(style: CurveStyle) -> TrendResult<Self> {
        Self::with_series(TimeSeries::new(), style)
    }

    pub fn with_series(series: TimeSeries, style: CurveStyle) -> TrendResult<Self> {
        Ok(Self {
            series,
            style: style.validate()?,
        })
    }

    #[must_use]
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    #[must_use]
    pub fn style(&self) -> &CurveStyle {
        &self.style
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.style.visible
    }

    // Mutation goes through the chart so it can invalidate the curve layer.
    pub(crate) fn series_mut(&mut self) -> &mut TimeSeries {
        &mut self.series
    }

    pub(crate) fn set_style(&mut self, style: CurveStyle) -> TrendResult<()> {
        self.style = style.validate()?;
        Ok(())
    }
}
