//! Shared utilities for the analysis pipeline.
//!
//! Dtype classification, column value extraction and number formatting
//! used by the profiler, the outlier detector and the report compiler.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Classification of a column's data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// String or categorical values
    Text,
    /// Boolean values
    Boolean,
    /// Date, datetime or time values
    Temporal,
    /// Anything else (nested, binary, all-null, ...)
    Other,
}

impl ColumnKind {
    /// Lowercase name used in logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Temporal => "temporal",
            Self::Other => "other",
        }
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date/time type.
#[inline]
pub fn is_temporal_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the kind of a DataType.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if is_temporal_dtype(dtype) {
        ColumnKind::Temporal
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Column values as `f64`, nulls preserved as `None`.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let casted = series.cast(&DataType::Float64)?;
    let values = casted.f64()?;
    Ok(values.into_iter().collect())
}

/// Column values rendered as strings, nulls preserved as `None`.
pub fn string_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    let casted = series.cast(&DataType::String)?;
    let values = casted.str()?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

// =============================================================================
// Formatting
// =============================================================================

/// Format a float for report tables.
///
/// Six decimals at most, trailing zeros dropped, so `3.0` renders as `3`
/// and `2.516611478` as `2.516611`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let mut text = format!("{value:.6}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

/// Dataset name derived from the input path: base name with extension stripped.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("dataset")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_mapping() {
        assert_eq!(column_kind(&DataType::Int64), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::Float32), ColumnKind::Numeric);
        assert_eq!(column_kind(&DataType::String), ColumnKind::Text);
        assert_eq!(column_kind(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(column_kind(&DataType::Date), ColumnKind::Temporal);
        assert_eq!(column_kind(&DataType::Null), ColumnKind::Other);
    }

    #[test]
    fn test_numeric_values_preserves_nulls() {
        let series = Series::new("v".into(), &[Some(1i64), None, Some(3)]);
        let values = numeric_values(&series).unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_string_values_from_boolean() {
        let series = Series::new("flag".into(), &[Some(true), None, Some(false)]);
        let values = string_values(&series).unwrap();
        assert_eq!(
            values,
            vec![Some("true".to_string()), None, Some("false".to_string())]
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(2.516611478), "2.516611");
        assert_eq!(format_number(-0.0000001), "0");
        assert_eq!(format_number(1200.0), "1200");
        assert_eq!(format_number(f64::NAN), "nan");
    }

    #[test]
    fn test_dataset_name() {
        assert_eq!(dataset_name(Path::new("data/goodreads.csv")), "goodreads");
        assert_eq!(dataset_name(Path::new("media.tar.csv")), "media.tar");
        assert_eq!(dataset_name(Path::new("noext")), "noext");
        assert_eq!(dataset_name(Path::new("/")), "dataset");
    }
}
