//! Charts module - Chart rendering

mod palette;
mod plotter;
mod renderer;

pub use palette::{classification_color, classification_rgb, REAL_COLOR, SWEEPS_COLOR};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
