mod brush;
mod color;
mod curve_rasterizer;
mod dot_rasterizer;
mod layer_stack;
mod pipeline;
mod pixel_buffer;

pub use color::{Color, blend_packed};
pub use curve_rasterizer::{CoverageBuffer, CurveRasterizer};
pub use dot_rasterizer::draw_dot;
pub use layer_stack::{LayerKind, LayerStack};
pub use pipeline::{DirtyLevel, LayerPainter, RenderPipeline};
pub use pixel_buffer::{PixelBuffer, PixelBufferLock};
