use tracing::{debug, trace};

use crate::core::{Curve, CurveId, CurveStyle, RulerId, Sample};
use crate::error::{TrendError, TrendResult};
use crate::render::DirtyLevel;

use super::TrendChart;

impl TrendChart {
    /// Adds a curve on top of the existing ones and returns its id.
    pub fn add_curve(&mut self, curve: Curve) -> CurveId {
        let id = self.allocate_curve_id();
        debug!(
            curve = id.raw(),
            samples = curve.series().len(),
            "add curve"
        );
        self.curves.insert(id, curve);
        self.pipeline.request(DirtyLevel::Curves);
        id
    }

    /// Removes a curve, keeping the draw order of the others.
    pub fn remove_curve(&mut self, id: CurveId) -> TrendResult<Curve> {
        let curve = self
            .curves
            .shift_remove(&id)
            .ok_or(TrendError::UnknownCurve(id))?;
        debug!(curve = id.raw(), "remove curve");
        self.pipeline.request(DirtyLevel::Curves);
        Ok(curve)
    }

    #[must_use]
    pub fn curve(&self, id: CurveId) -> Option<&Curve> {
        self.curves.get(&id)
    }

    /// Curves in draw order.
    pub fn curves(&self) -> impl Iterator<Item = (CurveId, &Curve)> {
        self.curves.iter().map(|(&id, curve)| (id, curve))
    }

    pub fn update_curve_style(&mut self, id: CurveId, style: CurveStyle) -> TrendResult<()> {
        self.curve_mut(id)?.set_style(style)?;
        debug!(curve = id.raw(), visible = style.visible, "update curve style");
        self.pipeline.request(DirtyLevel::Curves);
        Ok(())
    }

    pub fn append_sample(&mut self, id: CurveId, sample: Sample) -> TrendResult<()> {
        let series = self.curve_mut(id)?.series_mut();
        series.push(sample)?;
        trace!(curve = id.raw(), count = series.len(), "append sample");
        self.pipeline.request(DirtyLevel::Curves);
        Ok(())
    }

    /// Appends a sorted batch; nothing is appended when the batch is rejected.
    pub fn extend_samples(
        &mut self,
        id: CurveId,
        samples: impl IntoIterator<Item = Sample>,
    ) -> TrendResult<()> {
        let series = self.curve_mut(id)?.series_mut();
        let before = series.len();
        series.extend(samples)?;
        trace!(
            curve = id.raw(),
            appended = series.len() - before,
            count = series.len(),
            "extend samples"
        );
        self.pipeline.request(DirtyLevel::Curves);
        Ok(())
    }

    /// Sets a curve's value range to the minimum and maximum of its samples.
    ///
    /// A flat curve gets a range of one unit on either side of its value.
    pub fn fit_values_to_data(&mut self, id: CurveId) -> TrendResult<()> {
        let curve = self.curve_mut(id)?;
        let (min, max) = curve
            .series()
            .value_range()
            .ok_or(TrendError::EmptySeries)?;
        let (min_value, max_value) = if max > min {
            (min, max)
        } else {
            (min - 1.0, max + 1.0)
        };

        let style = CurveStyle {
            min_value,
            max_value,
            ..*curve.style()
        };
        curve.set_style(style)?;
        debug!(curve = id.raw(), min_value, max_value, "fit curve values");
        self.pipeline.request(DirtyLevel::Curves);
        Ok(())
    }

    /// Interpolated value of a curve at a ruler's position.
    pub fn curve_value_at_ruler(&self, curve: CurveId, ruler: RulerId) -> TrendResult<f64> {
        let location = self.ruler_location(ruler)?;
        self.curves
            .get(&curve)
            .ok_or(TrendError::UnknownCurve(curve))?
            .series()
            .value_at(location, true)
    }

    /// Mean value of a curve between two rulers, in either order.
    pub fn curve_average_between(
        &self,
        curve: CurveId,
        first: RulerId,
        second: RulerId,
    ) -> TrendResult<f64> {
        let first = self.ruler_location(first)?;
        let second = self.ruler_location(second)?;
        self.curves
            .get(&curve)
            .ok_or(TrendError::UnknownCurve(curve))?
            .series()
            .average_in_range(first, second)
    }

    fn curve_mut(&mut self, id: CurveId) -> TrendResult<&mut Curve> {
        self.curves.get_mut(&id).ok_or(TrendError::UnknownCurve(id))
    }
}
