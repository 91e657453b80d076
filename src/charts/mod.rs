//! Charts module - Chart data and static rendering

mod chart_data;
mod renderer;

pub use chart_data::{ChartData, ChartOptions};
pub use renderer::{RenderError, StaticChartRenderer};
