//! trend-rs: software-rasterized time-series trend charts.
//!
//! Curves are drawn straight into owned `0xAARRGGBB` pixel buffers by an
//! anti-aliased variable-width rasterizer. Three cached layers (background,
//! curves, overlay) are rebuilt incrementally according to a dirty level, so
//! a ruler drag never re-rasterizes curves and an idle chart costs nothing.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{TrendChart, TrendChartConfig};
pub use error::{TrendError, TrendResult};
