use serde::{Deserialize, Serialize};

use crate::core::SurfaceSize;
use crate::render::PixelBuffer;

/// Cached layers, bottom to top. Each layer starts as a copy of the one below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Background fill and grid.
    Background,
    /// Background plus every visible curve.
    Curves,
    /// Curves plus rulers and markers; the buffer handed to the display.
    Overlay,
}

impl LayerKind {
    pub const ALL: [Self; 3] = [Self::Background, Self::Curves, Self::Overlay];
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    background: PixelBuffer,
    curves: PixelBuffer,
    overlay: PixelBuffer,
}

impl LayerStack {
    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            background: PixelBuffer::new(size.width, size.height),
            curves: PixelBuffer::new(size.width, size.height),
            overlay: PixelBuffer::new(size.width, size.height),
        }
    }

    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.background.size()
    }

    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> &PixelBuffer {
        match kind {
            LayerKind::Background => &self.background,
            LayerKind::Curves => &self.curves,
            LayerKind::Overlay => &self.overlay,
        }
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut PixelBuffer {
        match kind {
            LayerKind::Background => &mut self.background,
            LayerKind::Curves => &mut self.curves,
            LayerKind::Overlay => &mut self.overlay,
        }
    }

    /// The layer `kind` together with the layer it is rebuilt from.
    ///
    /// Returns `None` for the background, which has nothing below it.
    pub fn split_with_below(&mut self, kind: LayerKind) -> Option<(&PixelBuffer, &mut PixelBuffer)> {
        match kind {
            LayerKind::Background => None,
            LayerKind::Curves => Some((&self.background, &mut self.curves)),
            LayerKind::Overlay => Some((&self.curves, &mut self.overlay)),
        }
    }
}
