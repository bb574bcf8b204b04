//! Charts module - static PNG rendering of dashboard views

mod renderer;

pub use renderer::{ChartError, StaticChartRenderer};
