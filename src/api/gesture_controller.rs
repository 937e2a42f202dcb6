use tracing::{trace, warn};

use crate::core::offset_tick;
use crate::error::{TrendError, TrendResult};
use crate::interaction::{ContactId, HitTolerance, TouchContact};
use crate::render::DirtyLevel;

use super::TrendChart;

impl TrendChart {
    /// Mouse button down at column `x`.
    ///
    /// Grabs the nearest ruler within the mouse tolerance; without one the
    /// drag pans the chart.
    pub fn begin_drag(&mut self, x: f64) {
        if let Some(ruler) = self.ruler_at_pixel(x, HitTolerance::Mouse)
            && let Some(location) = self.ruler(ruler).map(|ruler| ruler.location)
        {
            self.gestures.grab_ruler(ruler, location);
            self.pipeline.request(DirtyLevel::Overlay);
        }
        let (start, end) = self.viewport.range();
        self.gestures.begin_drag(x, start, end);
        trace!(x, mode = ?self.gestures.mode(), "begin drag");
    }

    /// Mouse moved to column `x` with the button held.
    ///
    /// Offsets are measured from the button-down snapshot, so rounding does
    /// not accumulate over many move events. Without an active drag this is a
    /// no-op.
    pub fn continue_drag(&mut self, x: f64) -> TrendResult<()> {
        let Some(drag) = self.gestures.drag() else {
            return Ok(());
        };
        let delta = (x - drag.down_x) * self.viewport.ticks_per_pixel();

        if let Some(grab) = self.gestures.grab() {
            let location = offset_tick(grab.location_on_down, delta)?;
            return self.set_ruler_location(grab.ruler, location);
        }
        let start = offset_tick(drag.start_on_down, -delta)?;
        let end = offset_tick(drag.end_on_down, -delta)?;
        self.set_range(start, end)
    }

    /// Mouse button released.
    pub fn end_drag(&mut self) {
        self.gestures.end_drag();
        if self.gestures.release_ruler().is_some() {
            self.pipeline.request(DirtyLevel::Overlay);
        }
    }

    /// Touch contact `id` went down at column `x`; returns `false` when the
    /// contact is ignored because two contacts are already tracked.
    ///
    /// A first contact on a ruler grabs it with the touch tolerance.
    pub fn begin_pinch(&mut self, id: ContactId, x: f64) -> bool {
        let contact = TouchContact::new(id, self.viewport.pixel_to_time(x), x);
        if !self.gestures.add_contact(contact) {
            trace!(contact = id.raw(), "ignore extra touch contact");
            return false;
        }

        if self.gestures.contacts().len() == 1
            && let Some(ruler) = self.ruler_at_pixel(x, HitTolerance::Touch)
            && let Some(location) = self.ruler(ruler).map(|ruler| ruler.location)
        {
            self.gestures.grab_ruler(ruler, location);
            self.pipeline.request(DirtyLevel::Overlay);
        }
        true
    }

    /// Touch contact `id` moved to column `x`.
    ///
    /// One contact drags the grabbed ruler or pans with the touched time glued
    /// under the finger; two contacts pinch. A degenerate pinch returns
    /// [`crate::error::TrendError::InvalidPinchScale`] and leaves the viewport
    /// unchanged. Untracked contacts are ignored.
    pub fn continue_pinch(&mut self, id: ContactId, x: f64) -> TrendResult<()> {
        if self.gestures.move_contact(id, x).is_none() {
            return Ok(());
        }

        let contacts = self.gestures.contacts();
        match (self.gestures.grab(), contacts) {
            (Some(grab), [_]) => {
                let location = self.viewport.pixel_to_time(x);
                self.set_ruler_location(grab.ruler, location)
            }
            (Some(_), _) => Ok(()),
            (None, [single]) => {
                let offset = single.position - f64::from(self.viewport.draw_rect().x);
                let ticks_per_pixel = self.viewport.ticks_per_pixel();
                let start = offset_tick(single.down_time, -(offset * ticks_per_pixel))?;
                let span = self.viewport.span();
                let end = start.checked_add(span).ok_or_else(|| {
                    TrendError::InvalidData(format!("pan to {start} overflows the tick range"))
                })?;
                self.set_range(start, end)
            }
            (None, [first, second]) => {
                let (first, second) = (first.pinch_contact(), second.pinch_contact());
                if let Err(err) = self.viewport.pinch(first, second) {
                    warn!(error = %err, "ignoring pinch update");
                    return Err(err);
                }
                self.pipeline.request(DirtyLevel::Curves);
                Ok(())
            }
            (None, _) => Ok(()),
        }
    }

    /// Touch contact `id` lifted. The grabbed ruler is released once no
    /// contact remains.
    pub fn end_pinch(&mut self, id: ContactId) {
        if self.gestures.remove_contact(id).is_none() {
            return;
        }
        if self.gestures.contacts().is_empty() && self.gestures.release_ruler().is_some() {
            self.pipeline.request(DirtyLevel::Overlay);
        }
    }
}
