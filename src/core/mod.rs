pub mod curve;
pub mod decimation;
pub mod ruler;
pub mod time_series;
pub mod types;
pub mod viewport;

pub use curve::{Curve, CurveId, CurveStyle};
pub use decimation::{clip_to_horizontal_edges, decimate, plot_points};
pub use ruler::{Ruler, RulerId};
pub use time_series::{IndexSide, TimeSeries};
pub use types::{
    PixelRect, Sample, ScreenPoint, SurfaceSize, TICKS_PER_MILLISECOND, TICKS_PER_SECOND, Tick,
    datetime_to_ticks, offset_tick, tick_distance, ticks_to_datetime,
};
pub use viewport::{PinchContact, Viewport};
