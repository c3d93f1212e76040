//! Bar chart rendering.
//!
//! Draws one PNG bar chart per charted question, bars ordered by label.

use crate::config::ChartsConfig;
use crate::models::{ChartSpec, Distribution, Question, Summary};
use anyhow::{Context, Result};
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Font family every chart text is drawn with.
const FONT_FAMILY: &str = "sans-serif";

/// Errors raised while drawing a single chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The distribution has no categories to draw.
    #[error("no categories to chart for {0}")]
    Empty(Question),

    /// No configured font could be loaded for the chart text.
    #[error("no usable font for the {0} chart text")]
    NoFont(Question),

    /// The drawing backend failed.
    #[error("failed to render chart: {0}")]
    Render(String),
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Register the first readable font from `paths` for chart text.
///
/// Returns the path that was registered, or `None` if no font could be
/// loaded.
pub fn load_font(paths: &[PathBuf]) -> Option<PathBuf> {
    for path in paths {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Font {} not readable: {}", path.display(), e);
                continue;
            }
        };

        // The font registry keeps a 'static reference for the rest of the run.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        match plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
            Ok(()) => {
                debug!("Registered chart font {}", path.display());
                return Some(path.clone());
            }
            Err(_) => warn!("Font {} is not a usable TrueType font", path.display()),
        }
    }

    None
}

/// Draw a vertical bar chart of `dist` to `path`.
///
/// Categories are sorted by label. A font must already be registered
/// with [`load_font`] for the title and axis text.
pub fn render_bar_chart(
    question: Question,
    dist: &Distribution,
    spec: &ChartSpec,
    path: &Path,
    size: (u32, u32),
) -> Result<(), ChartError> {
    if dist.is_empty() {
        return Err(ChartError::Empty(question));
    }

    let bars = dist.sorted_by_label();
    let labels: Vec<&str> = bars.iter().map(|(label, _)| *label).collect();
    let max_count = bars.iter().map(|(_, count)| *count as u64).max().unwrap_or(0);
    let y_max = max_count + max_count / 10 + 1;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .caption(spec.title, (FONT_FAMILY, 22))
        .x_label_area_size(60)
        .y_label_area_size(55)
        .build_cartesian_2d((0usize..labels.len()).into_segmented(), 0u64..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => {
                labels.get(*i).map(|l| l.to_string()).unwrap_or_default()
            }
            _ => String::new(),
        })
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .label_style((FONT_FAMILY, 13))
        .axis_desc_style((FONT_FAMILY, 15))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.filled())
                .margin(8)
                .data(bars.iter().enumerate().map(|(i, (_, count))| (i, *count as u64))),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;

    Ok(())
}

/// Render the charts of every charted question that has a distribution.
///
/// The figures directory is created if missing. Returns the written image
/// paths. A failed chart aborts the run unless `isolate_failures` is set,
/// in which case it is logged and skipped.
pub fn render_charts(
    summary: &Summary,
    config: &ChartsConfig,
    figures_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(figures_dir)
        .with_context(|| format!("Failed to create directory {}", figures_dir.display()))?;

    let charted: Vec<_> = summary
        .available()
        .filter_map(|(question, dist)| question.chart().map(|spec| (question, dist, spec)))
        .collect();
    if charted.is_empty() {
        return Ok(Vec::new());
    }

    let font = load_font(&config.font_paths);
    if font.is_none() {
        warn!("None of the configured chart fonts could be loaded");
    }

    let mut written = Vec::new();

    for (question, dist, spec) in charted {
        let path = figures_dir.join(spec.file_name);
        debug!("Rendering {} chart to {}", question, path.display());

        let result = if font.is_some() {
            render_bar_chart(question, dist, &spec, &path, (config.width, config.height))
        } else {
            Err(ChartError::NoFont(question))
        };

        match result {
            Ok(()) => {
                info!("Chart written to {}", path.display());
                written.push(path);
            }
            Err(e) if config.isolate_failures => {
                error!("Skipping {} chart: {}", question, e);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to render {}", path.display()));
            }
        }
    }

    Ok(written)
}
