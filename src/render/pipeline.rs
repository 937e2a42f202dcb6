use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::SurfaceSize;
use crate::render::{CurveRasterizer, LayerKind, LayerStack, PixelBuffer};

/// Pending redraw work. Lower non-clean levels mean more work.
///
/// A level rebuilds its own layer and every layer above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum DirtyLevel {
    #[default]
    Clean = 0,
    /// Surface size changed: reallocate and repaint everything.
    Surface = 1,
    /// Data or viewport changed: redraw curves and overlay.
    Curves = 2,
    /// Only rulers or markers changed.
    Overlay = 3,
}

impl DirtyLevel {
    /// Combines a pending level with a new request.
    ///
    /// A clean pending level takes any request; otherwise the level that
    /// rebuilds more layers wins.
    #[must_use]
    pub const fn raise(self, requested: Self) -> Self {
        match (self, requested) {
            (current, Self::Clean) => current,
            (Self::Clean, requested) => requested,
            (current, requested) => {
                if (requested as u8) < (current as u8) {
                    requested
                } else {
                    current
                }
            }
        }
    }

    #[must_use]
    pub const fn is_clean(self) -> bool {
        matches!(self, Self::Clean)
    }

    /// Whether consuming this level repaints `layer`.
    #[must_use]
    pub const fn rebuilds(self, layer: LayerKind) -> bool {
        let stage = match layer {
            LayerKind::Background => Self::Surface,
            LayerKind::Curves => Self::Curves,
            LayerKind::Overlay => Self::Overlay,
        };
        !self.is_clean() && (self as u8) <= (stage as u8)
    }
}

/// Content drawn into each layer after it has been rebuilt from the one below.
pub trait LayerPainter {
    /// Paints a freshly allocated background layer.
    fn paint_background(&mut self, layer: &mut PixelBuffer, rasterizer: &mut CurveRasterizer);

    /// Draws curves over a copy of the background.
    fn paint_curves(&mut self, layer: &mut PixelBuffer, rasterizer: &mut CurveRasterizer);

    /// Draws rulers and markers over a copy of the curve layer.
    fn paint_overlay(&mut self, layer: &mut PixelBuffer, rasterizer: &mut CurveRasterizer);
}

/// Three cached layers plus the dirty-level state machine deciding which of
/// them a redraw tick must rebuild.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    layers: Option<LayerStack>,
    pending: DirtyLevel,
    rasterizer: CurveRasterizer,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPipeline {
    /// Creates a pipeline with no layers; the first tick allocates them.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: None,
            pending: DirtyLevel::Surface,
            rasterizer: CurveRasterizer::new(),
        }
    }

    #[must_use]
    pub fn pending(&self) -> DirtyLevel {
        self.pending
    }

    pub fn request(&mut self, level: DirtyLevel) {
        self.pending = self.pending.raise(level);
    }

    #[must_use]
    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.layers.as_ref().map(LayerStack::size)
    }

    #[must_use]
    pub fn layers(&self) -> Option<&LayerStack> {
        self.layers.as_ref()
    }

    /// Last completed overlay, the buffer shown by the host.
    #[must_use]
    pub fn output(&self) -> Option<&PixelBuffer> {
        self.layers
            .as_ref()
            .map(|layers| layers.layer(LayerKind::Overlay))
    }

    /// Consumes the pending level and rebuilds the affected layers for `size`.
    ///
    /// A zero-sized surface draws nothing and keeps the pending level. A
    /// surface size different from the current layers forces a full rebuild.
    pub fn render(
        &mut self,
        size: SurfaceSize,
        painter: &mut impl LayerPainter,
    ) -> Option<&PixelBuffer> {
        if !size.is_valid() {
            trace!(
                width = size.width,
                height = size.height,
                "skip redraw of empty surface"
            );
            return None;
        }
        if self.surface_size() != Some(size) {
            self.request(DirtyLevel::Surface);
        }

        let level = std::mem::take(&mut self.pending);
        if level.is_clean() {
            return self.output();
        }
        trace!(?level, "rebuilding layers");

        if level.rebuilds(LayerKind::Background) {
            debug!(
                width = size.width,
                height = size.height,
                "reallocating layers"
            );
            self.layers = Some(LayerStack::new(size));
        }
        let layers = self.layers.as_mut()?;

        if level.rebuilds(LayerKind::Background) {
            painter.paint_background(
                layers.layer_mut(LayerKind::Background),
                &mut self.rasterizer,
            );
        }

        if level.rebuilds(LayerKind::Curves)
            && let Some((below, layer)) = layers.split_with_below(LayerKind::Curves)
        {
            match layer.fill_from(below) {
                Ok(()) => painter.paint_curves(layer, &mut self.rasterizer),
                Err(err) => warn!(error = %err, "skipping curve layer rebuild"),
            }
        }

        if level.rebuilds(LayerKind::Overlay)
            && let Some((below, layer)) = layers.split_with_below(LayerKind::Overlay)
        {
            let mut lock = layer.lock();
            match lock.fill_from(below) {
                Ok(()) => {
                    painter.paint_overlay(&mut lock, &mut self.rasterizer);
                    lock.mark_all_dirty();
                }
                Err(err) => warn!(error = %err, "skipping overlay rebuild"),
            }
        }

        Some(layers.layer(LayerKind::Overlay))
    }
}

#[cfg(test)]
mod tests {
    use super::{DirtyLevel, LayerPainter, RenderPipeline};
    use crate::core::SurfaceSize;
    use crate::render::{Color, CurveRasterizer, LayerKind, PixelBuffer};

    #[derive(Default)]
    struct CountingPainter {
        background: usize,
        curves: usize,
        overlay: usize,
    }

    impl LayerPainter for CountingPainter {
        fn paint_background(&mut self, layer: &mut PixelBuffer, _rasterizer: &mut CurveRasterizer) {
            self.background += 1;
            layer.clear(Color::WHITE);
        }

        fn paint_curves(&mut self, layer: &mut PixelBuffer, _rasterizer: &mut CurveRasterizer) {
            self.curves += 1;
            layer.set_pixel(0, 0, Color::RED).expect("in bounds");
        }

        fn paint_overlay(&mut self, layer: &mut PixelBuffer, _rasterizer: &mut CurveRasterizer) {
            self.overlay += 1;
            layer.set_pixel(1, 0, Color::BLUE).expect("in bounds");
        }
    }

    #[test]
    fn raise_keeps_the_most_urgent_level() {
        use DirtyLevel::{Clean, Curves, Overlay, Surface};
        assert_eq!(Clean.raise(Overlay), Overlay);
        assert_eq!(Overlay.raise(Curves), Curves);
        assert_eq!(Curves.raise(Overlay), Curves);
        assert_eq!(Surface.raise(Curves), Surface);
        assert_eq!(Curves.raise(Clean), Curves);
    }

    #[test]
    fn rebuilds_covers_own_layer_and_above() {
        assert!(DirtyLevel::Curves.rebuilds(LayerKind::Overlay));
        assert!(DirtyLevel::Curves.rebuilds(LayerKind::Curves));
        assert!(!DirtyLevel::Curves.rebuilds(LayerKind::Background));
        assert!(!DirtyLevel::Clean.rebuilds(LayerKind::Overlay));
    }

    #[test]
    fn first_render_builds_every_layer_then_goes_clean() {
        let mut pipeline = RenderPipeline::new();
        let mut painter = CountingPainter::default();
        let size = SurfaceSize::new(4, 2);

        let output = pipeline.render(size, &mut painter).expect("valid size");
        assert_eq!(output.pixel(0, 0), Some(Color::RED));
        assert_eq!(output.pixel(1, 0), Some(Color::BLUE));
        assert_eq!(output.pixel(2, 1), Some(Color::WHITE));
        assert_eq!(output.generation(), 1);
        assert_eq!(pipeline.pending(), DirtyLevel::Clean);

        pipeline.render(size, &mut painter);
        assert_eq!(
            (painter.background, painter.curves, painter.overlay),
            (1, 1, 1)
        );
    }

    #[test]
    fn overlay_request_rebuilds_only_the_overlay() {
        let mut pipeline = RenderPipeline::new();
        let mut painter = CountingPainter::default();
        let size = SurfaceSize::new(4, 2);
        pipeline.render(size, &mut painter);

        pipeline.request(DirtyLevel::Overlay);
        pipeline.render(size, &mut painter);
        assert_eq!(
            (painter.background, painter.curves, painter.overlay),
            (1, 1, 2)
        );
    }

    #[test]
    fn empty_surface_keeps_pending_work() {
        let mut pipeline = RenderPipeline::new();
        let mut painter = CountingPainter::default();
        pipeline.request(DirtyLevel::Curves);

        assert!(pipeline.render(SurfaceSize::new(0, 10), &mut painter).is_none());
        assert_eq!(pipeline.pending(), DirtyLevel::Surface);
        assert_eq!(painter.background, 0);
    }

    #[test]
    fn resize_forces_a_full_rebuild() {
        let mut pipeline = RenderPipeline::new();
        let mut painter = CountingPainter::default();
        pipeline.render(SurfaceSize::new(4, 2), &mut painter);
        pipeline.request(DirtyLevel::Overlay);

        let output = pipeline
            .render(SurfaceSize::new(6, 3), &mut painter)
            .expect("valid size");
        assert_eq!(output.width(), 6);
        assert_eq!(painter.background, 2);
    }
}
