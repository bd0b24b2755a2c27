//! Comparison views of measured DESTEST series against synthetic profiles.
//!
//! [`Renderer`] is picked once from configuration: with an output directory
//! it writes SVG charts, without one it falls back to a text summary.

pub mod figure;
pub mod renderer;
pub mod svg;

pub use figure::{comparison_figures, ComparisonInput, Figure, Panel, Series};
pub use renderer::{write_annual_table, RenderOutcome, Renderer};
pub use svg::render_svg;
