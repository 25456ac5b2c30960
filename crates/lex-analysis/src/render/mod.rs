//! Rendering backends for report artifacts.
//!
//! Charts and tables are produced behind two traits so the pipeline can be
//! driven with alternative backends:
//! - [`ChartRenderer`] draws the correlation heatmap and the missing-values
//!   bar chart as image files. [`PlottersChartRenderer`] is the default.
//! - [`TableRenderer`] turns a [`Table`] into markdown text.
//!   [`MarkdownTableRenderer`] emits GitHub pipe tables.

mod bar_chart;
mod heatmap;
mod palette;
mod table;

use crate::error::{AnalysisError, Result};
use crate::types::CorrelationMatrix;
use std::path::Path;

pub use table::{Alignment, MarkdownTableRenderer, Table};

/// File name of the correlation heatmap inside the output directory.
pub const HEATMAP_FILE: &str = "correlation_heatmap.png";

/// File name of the missing-values bar chart inside the output directory.
pub const MISSING_PLOT_FILE: &str = "missing_values_plot.png";

/// Draws chart images to disk.
pub trait ChartRenderer: Send + Sync {
    /// Annotated heatmap of a correlation matrix.
    fn render_heatmap(
        &self,
        matrix: &CorrelationMatrix,
        path: &Path,
        size: (u32, u32),
    ) -> Result<()>;

    /// Bar chart of per-column missing-value counts.
    ///
    /// `counts` only holds columns with a non-zero count.
    fn render_missing_values(
        &self,
        counts: &[(String, usize)],
        path: &Path,
        size: (u32, u32),
    ) -> Result<()>;
}

/// Formats tables for the markdown report.
pub trait TableRenderer: Send + Sync {
    fn render(&self, table: &Table) -> String;
}

/// PNG charts drawn with `plotters`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersChartRenderer;

impl PlottersChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for PlottersChartRenderer {
    fn render_heatmap(
        &self,
        matrix: &CorrelationMatrix,
        path: &Path,
        size: (u32, u32),
    ) -> Result<()> {
        heatmap::draw(matrix, path, size).map_err(|e| render_error(path, e))
    }

    fn render_missing_values(
        &self,
        counts: &[(String, usize)],
        path: &Path,
        size: (u32, u32),
    ) -> Result<()> {
        bar_chart::draw(counts, path, size).map_err(|e| render_error(path, e))
    }
}

/// Longest column name drawn on a chart axis, in characters.
const MAX_AXIS_LABEL_CHARS: usize = 25;

/// Column name shortened to fit a chart axis.
pub(crate) fn axis_label(name: &str) -> String {
    if name.chars().count() <= MAX_AXIS_LABEL_CHARS {
        return name.to_string();
    }
    let mut label: String = name.chars().take(MAX_AXIS_LABEL_CHARS - 3).collect();
    label.push_str("...");
    label
}

fn render_error(path: &Path, err: anyhow::Error) -> AnalysisError {
    AnalysisError::Render(format!("{}: {:#}", path.display(), err))
}

static_assertions::assert_impl_all!(PlottersChartRenderer: Send, Sync);
static_assertions::assert_impl_all!(MarkdownTableRenderer: Send, Sync);
