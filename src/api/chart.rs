use indexmap::IndexMap;
use tracing::debug;

use crate::core::{Curve, CurveId, PixelRect, Ruler, RulerId, Viewport};
use crate::error::TrendResult;
use crate::interaction::GestureState;
use crate::render::{DirtyLevel, PixelBuffer, RenderPipeline};

use super::TrendChartConfig;

/// Main facade consumed by host applications.
///
/// `TrendChart` owns curves, rulers, the viewport and the cached render
/// layers. Hosts forward input as method calls and call [`TrendChart::tick`]
/// on their own display cadence; every mutation only records which layers
/// are stale, and the next tick rebuilds them.
#[derive(Debug, Clone)]
pub struct TrendChart {
    pub(super) config: TrendChartConfig,
    pub(super) viewport: Viewport,
    pub(super) curves: IndexMap<CurveId, Curve>,
    pub(super) rulers: IndexMap<RulerId, Ruler>,
    pub(super) pipeline: RenderPipeline,
    pub(super) gestures: GestureState,
    next_curve_id: u32,
    next_ruler_id: u32,
}

impl TrendChart {
    pub fn new(config: TrendChartConfig) -> TrendResult<Self> {
        config.validate()?;
        let viewport = Viewport::new(config.start, config.end, PixelRect::default())?;
        debug!(start = config.start, end = config.end, "create trend chart");

        Ok(Self {
            config,
            viewport,
            curves: IndexMap::new(),
            rulers: IndexMap::new(),
            pipeline: RenderPipeline::new(),
            gestures: GestureState::default(),
            next_curve_id: 1,
            next_ruler_id: 1,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrendChartConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn gestures(&self) -> &GestureState {
        &self.gestures
    }

    /// Work the next [`TrendChart::tick`] will do.
    #[must_use]
    pub fn pending_dirty_level(&self) -> DirtyLevel {
        self.pipeline.pending()
    }

    /// Requests a redraw starting at `level` on the next tick.
    pub fn mark_dirty(&mut self, level: DirtyLevel) {
        self.pipeline.request(level);
    }

    /// Last rendered frame, if any tick has produced one.
    #[must_use]
    pub fn frame(&self) -> Option<&PixelBuffer> {
        self.pipeline.output()
    }

    pub(super) fn allocate_curve_id(&mut self) -> CurveId {
        let id = CurveId::new(self.next_curve_id);
        self.next_curve_id = self.next_curve_id.wrapping_add(1);
        id
    }

    pub(super) fn allocate_ruler_id(&mut self) -> RulerId {
        let id = RulerId::new(self.next_ruler_id);
        self.next_ruler_id = self.next_ruler_id.wrapping_add(1);
        id
    }
}
