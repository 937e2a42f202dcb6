mod chart;
mod chart_config;
mod curve_controller;
mod gesture_controller;
mod render_controller;
mod ruler_controller;
mod viewport_controller;

pub use chart::TrendChart;
pub use chart_config::{Padding, RulerStyle, TrendChartConfig};
