//! Report outputs: the LaTeX frequency tables and the bar charts.

pub mod chart;
pub mod latex;

pub use chart::render_charts;
pub use latex::write_latex_report;
