use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{ColumnKind, column_kind, numeric_values};

/// A loaded table: named, typed columns over a fixed number of rows.
///
/// Immutable once constructed; every later stage only reads from it.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    frame: DataFrame,
}

/// Name, dtype and kind of one dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub kind: ColumnKind,
}

impl Dataset {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            frame,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn columns(&self) -> Vec<ColumnInfo> {
        self.frame
            .get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                kind: column_kind(col.dtype()),
            })
            .collect()
    }

    /// Numeric columns with their values as `f64`, in dataset order.
    pub fn numeric_columns(&self) -> PolarsResult<Vec<(String, Vec<Option<f64>>)>> {
        self.frame
            .get_columns()
            .iter()
            .filter(|col| column_kind(col.dtype()) == ColumnKind::Numeric)
            .map(|col| {
                let values = numeric_values(col.as_materialized_series())?;
                Ok((col.name().to_string(), values))
            })
            .collect()
    }

    pub fn has_numeric_columns(&self) -> bool {
        self.frame
            .get_columns()
            .iter()
            .any(|col| column_kind(col.dtype()) == ColumnKind::Numeric)
    }
}

/// Descriptive statistics of one column.
///
/// Numeric columns fill `mean` through `max`; other columns fill
/// `unique`, `top` and `freq`. Fields that do not apply stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub column: String,
    pub kind: Option<ColumnKind>,
    pub count: usize,
    pub unique: Option<usize>,
    pub top: Option<String>,
    pub freq: Option<usize>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// One [`ColumnStatistics`] row per dataset column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub rows: Vec<ColumnStatistics>,
}

impl SummaryStatistics {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnStatistics> {
        self.rows.iter().find(|row| row.column == column)
    }

    pub fn has_numeric(&self) -> bool {
        self.rows.iter().any(|row| row.kind == Some(ColumnKind::Numeric))
    }

    pub fn has_non_numeric(&self) -> bool {
        self.rows.iter().any(|row| row.kind != Some(ColumnKind::Numeric))
    }
}

/// Null count per column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingValueCounts {
    pub entries: Vec<(String, usize)>,
}

impl MissingValueCounts {
    pub fn get(&self, column: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Columns with at least one missing value.
    pub fn non_zero(&self) -> Vec<(String, usize)> {
        self.entries
            .iter()
            .filter(|(_, count)| *count > 0)
            .cloned()
            .collect()
    }
}

/// Pairwise Pearson correlation between numeric columns.
///
/// Square and symmetric with a unit diagonal. Pairs that cannot be
/// computed (constant column, fewer than two complete rows) hold `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// Number of outliers per numeric column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlierCounts {
    pub entries: Vec<(String, usize)>,
}

impl OutlierCounts {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, count)| *count)
    }

    /// True when at least one column has a non-zero count.
    pub fn has_outliers(&self) -> bool {
        self.entries.iter().any(|(_, count)| *count > 0)
    }
}

/// Result of a visualization stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    /// The image was written to `path`.
    Written { path: PathBuf },
    /// Nothing to draw; no file was written.
    Skipped { reason: String },
}

impl StageOutcome {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Written { path } => Some(path),
            Self::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub dataset_name: String,
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub report_path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub heatmap: StageOutcome,
    pub missing_values_plot: StageOutcome,
    pub missing_values: MissingValueCounts,
    pub outliers: OutlierCounts,
    pub duration_ms: u64,
    pub generated_at: String,
}
