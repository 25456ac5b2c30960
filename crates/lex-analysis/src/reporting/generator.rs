use crate::error::{Result, ResultExt};
use crate::render::{Alignment, MarkdownTableRenderer, Table, TableRenderer};
use crate::types::{
    ColumnStatistics, Dataset, MissingValueCounts, OutlierCounts, SummaryStatistics,
};
use crate::utils::format_number;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// File name of the report inside the output directory.
pub const REPORT_FILE: &str = "README.md";

/// Everything the report is compiled from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub dataset_name: &'a str,
    pub dataset: &'a Dataset,
    pub summary: &'a SummaryStatistics,
    pub missing: &'a MissingValueCounts,
    /// Heatmap link target, relative to the report directory
    pub heatmap_path: Option<&'a str>,
    /// Missing-values plot link target, relative to the report directory
    pub missing_plot_path: Option<&'a str>,
    pub outliers: &'a OutlierCounts,
    /// Z-score cutoff quoted in the outlier section
    pub zscore_threshold: f64,
}

/// Compiles the markdown analysis report.
pub struct ReportGenerator {
    tables: Arc<dyn TableRenderer>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(Arc::new(MarkdownTableRenderer))
    }
}

impl ReportGenerator {
    pub fn new(tables: Arc<dyn TableRenderer>) -> Self {
        Self { tables }
    }

    /// Build the report text.
    ///
    /// Sections appear in a fixed order. The two image sections are present
    /// only when a path is given, and the outlier section only when some
    /// column has at least one outlier.
    pub fn compile(&self, inputs: ReportInputs<'_>) -> String {
        let mut report = String::new();
        let dataset = inputs.dataset;

        let _ = writeln!(report, "# Analysis Report: {}\n", inputs.dataset_name);
        let _ = writeln!(
            report,
            "## Overview\nDataset contains {} rows and {} columns.\n",
            dataset.height(),
            dataset.width()
        );

        report.push_str("### Columns:\n");
        for column in dataset.columns() {
            let _ = writeln!(report, "- **{}**: {}", column.name, column.dtype);
        }

        report.push_str("\n## Summary Statistics\n");
        report.push_str(&self.tables.render(&summary_table(inputs.summary)));
        report.push('\n');

        report.push_str("## Missing Values\n");
        report.push_str(&self.tables.render(&count_table("Missing Values", &inputs.missing.entries)));
        report.push('\n');

        if let Some(path) = inputs.heatmap_path {
            let _ = writeln!(report, "## Correlation Heatmap\n![Correlation Heatmap]({})\n", path);
        }

        if let Some(path) = inputs.missing_plot_path {
            let _ = writeln!(report, "## Missing Values Plot\n![Missing Values Bar Plot]({})\n", path);
        }

        if inputs.outliers.has_outliers() {
            let _ = writeln!(
                report,
                "## Outliers\nDetected outliers (Z-score > {}):",
                format_number(inputs.zscore_threshold)
            );
            report.push_str(&self.tables.render(&count_table("Outliers", &inputs.outliers.entries)));
            report.push('\n');
        } else {
            debug!("No outliers detected; outlier section omitted");
        }

        report
    }

    /// Write the report into `dir` as `README.md`, replacing any previous one.
    pub fn write_report(&self, dir: &Path, report: &str) -> Result<PathBuf> {
        let report_path = dir.join(REPORT_FILE);
        fs::write(&report_path, report)
            .context(format!("Failed to write report {}", report_path.display()))?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

/// One row per column; stat columns appear only when some column has them.
fn summary_table(summary: &SummaryStatistics) -> Table {
    type Cell = fn(&ColumnStatistics) -> String;

    let mut columns: Vec<(&str, Cell)> = Vec::new();
    columns.push(("count", |s| s.count.to_string()));
    if summary.has_non_numeric() {
        columns.push(("unique", |s| s.unique.map(|u| u.to_string()).unwrap_or_default()));
        columns.push(("top", |s| s.top.clone().unwrap_or_default()));
        columns.push(("freq", |s| s.freq.map(|f| f.to_string()).unwrap_or_default()));
    }
    if summary.has_numeric() {
        columns.push(("mean", |s| number_cell(s.mean)));
        columns.push(("std", |s| number_cell(s.std)));
        columns.push(("min", |s| number_cell(s.min)));
        columns.push(("25%", |s| number_cell(s.q25)));
        columns.push(("50%", |s| number_cell(s.median)));
        columns.push(("75%", |s| number_cell(s.q75)));
        columns.push(("max", |s| number_cell(s.max)));
    }

    let headers = std::iter::once("").chain(columns.iter().map(|(name, _)| *name));
    let mut table = Table::new(headers).with_alignments(
        std::iter::once(Alignment::Left).chain(columns.iter().map(|(name, _)| {
            if *name == "top" {
                Alignment::Left
            } else {
                Alignment::Right
            }
        })),
    );

    for stats in &summary.rows {
        let mut cells = vec![stats.column.clone()];
        cells.extend(columns.iter().map(|(_, cell)| cell(stats)));
        table.push_row(cells);
    }
    table
}

fn count_table(label: &str, entries: &[(String, usize)]) -> Table {
    let mut table =
        Table::new(["Column", label]).with_alignments([Alignment::Left, Alignment::Right]);
    for (column, count) in entries {
        table.push_row(vec![column.clone(), count.to_string()]);
    }
    table
}

fn number_cell(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}
