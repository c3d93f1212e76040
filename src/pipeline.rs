//! The load → summarize → render run.

use crate::analysis::{self, CellRules};
use crate::config::Config;
use crate::loader::{self, Encoding};
use crate::models::Summary;
use crate::report;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Export that was read.
    pub input: PathBuf,
    /// Encoding the export was decoded with.
    pub encoding: Encoding,
    /// Number of data rows in the export.
    pub rows: usize,
    /// Frequency counts per question.
    pub summary: Summary,
    /// LaTeX document that was written.
    pub document: PathBuf,
    /// Directory holding the chart images.
    pub figures_dir: PathBuf,
    /// Chart images that were written.
    pub charts: Vec<PathBuf>,
}

/// Run the whole report once.
///
/// Paths in `config` are used as given; resolve them against the root
/// directory first. A missing input returns before any output is touched.
pub fn run(config: &Config) -> Result<RunOutcome> {
    let loaded = loader::load_table(&config.input)?;

    let rules = CellRules::from(&config.report);
    let summary = analysis::summarize(&loaded.table, &config.questions, &rules);

    report::write_latex_report(
        &summary,
        &config.output.document,
        config.report.escape_markup,
    )?;

    let charts = report::render_charts(&summary, &config.charts, &config.output.figures_dir)?;

    info!(
        "Run complete: {} sections, {} charts",
        summary.available().count(),
        charts.len()
    );

    Ok(RunOutcome {
        input: loaded.path,
        encoding: loaded.encoding,
        rows: loaded.table.row_count(),
        summary,
        document: config.output.document.clone(),
        figures_dir: config.output.figures_dir.clone(),
        charts,
    })
}
