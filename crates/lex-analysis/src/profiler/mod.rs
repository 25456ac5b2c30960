//! Data profiling module for dataset analysis.
//!
//! This module provides the descriptive side of the analysis:
//! - Per-column summary statistics
//! - Per-column missing-value counts
//! - Pairwise correlation of numeric columns

mod correlation;
pub(crate) mod statistics;

use crate::error::Result;
use crate::types::{
    ColumnStatistics, CorrelationMatrix, Dataset, MissingValueCounts, SummaryStatistics,
};
use crate::utils::{ColumnKind, column_kind};
use polars::prelude::*;
use tracing::debug;

use statistics::{present_floats, text_summary};

/// Data profiler for describing dataset columns.
pub struct DataProfiler;

impl DataProfiler {
    /// Summary statistics for every column, in dataset order.
    pub fn describe(dataset: &Dataset) -> Result<SummaryStatistics> {
        let rows = dataset
            .frame()
            .get_columns()
            .iter()
            .map(|col| Self::describe_column(col.as_materialized_series()))
            .collect::<Result<Vec<_>>>()?;
        Ok(SummaryStatistics { rows })
    }

    /// Null count of every column, in dataset order.
    pub fn missing_values(dataset: &Dataset) -> MissingValueCounts {
        MissingValueCounts {
            entries: dataset
                .frame()
                .get_columns()
                .iter()
                .map(|col| (col.name().to_string(), col.null_count()))
                .collect(),
        }
    }

    /// Pearson correlation matrix of the numeric columns, if there are any.
    pub fn correlation_matrix(dataset: &Dataset) -> Result<Option<CorrelationMatrix>> {
        correlation::correlation_matrix(dataset)
    }

    fn describe_column(series: &Series) -> Result<ColumnStatistics> {
        let kind = column_kind(series.dtype());
        let name = series.name().to_string();
        debug!("Describing column '{}' ({})", name, kind.as_str());

        if kind == ColumnKind::Numeric {
            let values = present_floats(series)?;
            let quartile = |q: f64| values.quantile(q, QuantileMethod::Linear);

            return Ok(ColumnStatistics {
                column: name,
                kind: Some(kind),
                count: values.len(),
                mean: values.mean(),
                std: values.std(1),
                min: values.min(),
                q25: quartile(0.25)?,
                median: quartile(0.5)?,
                q75: quartile(0.75)?,
                max: values.max(),
                ..Default::default()
            });
        }

        let text = text_summary(series)?;
        Ok(ColumnStatistics {
            column: name,
            kind: Some(kind),
            count: text.count,
            unique: Some(text.unique),
            freq: text.top.as_ref().map(|(_, count)| *count),
            top: text.top.map(|(value, _)| value),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_dataset() -> Dataset {
        let frame = df!(
            "a" => &[Some(1i64), Some(2), Some(3), None],
            "city" => &[Some("Paris"), Some("Lyon"), Some("Paris"), None],
            "flag" => &[true, false, true, true]
        )
        .unwrap();
        Dataset::new("mixed", frame)
    }

    #[test]
    fn test_describe_has_one_row_per_column() {
        let dataset = mixed_dataset();
        let summary = DataProfiler::describe(&dataset).unwrap();
        assert_eq!(summary.len(), dataset.width());
        assert!(summary.has_numeric());
        assert!(summary.has_non_numeric());
    }

    #[test]
    fn test_describe_numeric_column() {
        let summary = DataProfiler::describe(&mixed_dataset()).unwrap();
        let a = summary.get("a").unwrap();

        assert_eq!(a.count, 3);
        assert_eq!(a.mean, Some(2.0));
        assert_eq!(a.std, Some(1.0));
        assert_eq!(a.min, Some(1.0));
        assert_eq!(a.q25, Some(1.5));
        assert_eq!(a.median, Some(2.0));
        assert_eq!(a.q75, Some(2.5));
        assert_eq!(a.max, Some(3.0));
        assert!(a.unique.is_none());
        assert!(a.top.is_none());
    }

    #[test]
    fn test_describe_text_column() {
        let summary = DataProfiler::describe(&mixed_dataset()).unwrap();
        let city = summary.get("city").unwrap();

        assert_eq!(city.count, 3);
        assert_eq!(city.unique, Some(2));
        assert_eq!(city.top.as_deref(), Some("Paris"));
        assert_eq!(city.freq, Some(2));
        assert!(city.mean.is_none());
    }

    #[test]
    fn test_describe_boolean_is_non_numeric() {
        let summary = DataProfiler::describe(&mixed_dataset()).unwrap();
        let flag = summary.get("flag").unwrap();

        assert_eq!(flag.kind, Some(ColumnKind::Boolean));
        assert_eq!(flag.unique, Some(2));
        assert_eq!(flag.top.as_deref(), Some("true"));
        assert_eq!(flag.freq, Some(3));
    }

    #[test]
    fn test_describe_all_null_numeric_column() {
        let frame = df!("x" => &[None::<f64>, None]).unwrap();
        let summary = DataProfiler::describe(&Dataset::new("t", frame)).unwrap();
        let x = summary.get("x").unwrap();
        assert_eq!(x.count, 0);
        assert!(x.mean.is_none());
        assert!(x.std.is_none());
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let frame = df!("x" => &[Some(7.0), None]).unwrap();
        let summary = DataProfiler::describe(&Dataset::new("t", frame)).unwrap();
        let x = summary.get("x").unwrap();
        assert_eq!(x.count, 1);
        assert_eq!(x.mean, Some(7.0));
        assert!(x.std.is_none());
        assert_eq!(x.median, Some(7.0));
    }

    #[test]
    fn test_missing_values() {
        let dataset = mixed_dataset();
        let missing = DataProfiler::missing_values(&dataset);

        assert_eq!(missing.get("a"), Some(1));
        assert_eq!(missing.get("city"), Some(1));
        assert_eq!(missing.get("flag"), Some(0));
        assert!(missing.total() <= dataset.height() * dataset.width());
    }
}
