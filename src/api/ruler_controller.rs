use tracing::debug;

use crate::core::{Ruler, RulerId, Tick};
use crate::error::{TrendError, TrendResult};
use crate::interaction::HitTolerance;
use crate::render::DirtyLevel;

use super::TrendChart;

impl TrendChart {
    pub fn add_ruler(&mut self, location: Tick) -> RulerId {
        let id = self.allocate_ruler_id();
        debug!(ruler = id.raw(), location, "add ruler");
        self.rulers.insert(id, Ruler::new(location));
        self.pipeline.request(DirtyLevel::Overlay);
        id
    }

    pub fn remove_ruler(&mut self, id: RulerId) -> TrendResult<Ruler> {
        let ruler = self
            .rulers
            .shift_remove(&id)
            .ok_or(TrendError::UnknownRuler(id))?;
        if self.gestures.selected_ruler() == Some(id) {
            self.gestures.release_ruler();
        }
        debug!(ruler = id.raw(), "remove ruler");
        self.pipeline.request(DirtyLevel::Overlay);
        Ok(ruler)
    }

    #[must_use]
    pub fn ruler(&self, id: RulerId) -> Option<Ruler> {
        self.rulers.get(&id).copied()
    }

    pub fn rulers(&self) -> impl Iterator<Item = (RulerId, Ruler)> + '_ {
        self.rulers.iter().map(|(&id, &ruler)| (id, ruler))
    }

    /// Moves a ruler. Locations outside the visible range are pulled back
    /// onto its edge when the overlay is next drawn.
    pub fn set_ruler_location(&mut self, id: RulerId, location: Tick) -> TrendResult<()> {
        let ruler = self
            .rulers
            .get_mut(&id)
            .ok_or(TrendError::UnknownRuler(id))?;
        ruler.location = location;
        self.pipeline.request(DirtyLevel::Overlay);
        Ok(())
    }

    /// Ruler closest to pixel column `x`, if one lies within the tolerance.
    ///
    /// On equal distance the ruler added first wins.
    #[must_use]
    pub fn ruler_at_pixel(&self, x: f64, tolerance: HitTolerance) -> Option<RulerId> {
        let limit = self.config.hit_tolerance_px(tolerance);
        self.rulers
            .iter()
            .map(|(&id, ruler)| (id, (self.viewport.time_to_pixel(ruler.location) - x).abs()))
            .filter(|&(_, distance)| distance < limit)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Whether a mouse cursor at column `x` would grab a ruler.
    #[must_use]
    pub fn is_over_ruler(&self, x: f64) -> bool {
        self.ruler_at_pixel(x, HitTolerance::Mouse).is_some()
    }

    pub(super) fn ruler_location(&self, id: RulerId) -> TrendResult<Tick> {
        self.rulers
            .get(&id)
            .map(|ruler| ruler.location)
            .ok_or(TrendError::UnknownRuler(id))
    }
}
