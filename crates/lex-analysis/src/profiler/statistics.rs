//! Statistical functions for column profiling.

use polars::prelude::*;
use std::collections::HashSet;

const VALUE_COLUMN: &str = "value";
const COUNT_COLUMN: &str = "count";

/// Count, distinct count and most frequent value of a non-numeric column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TextSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<(String, usize)>,
}

/// Non-null, non-NaN values of a numeric column as `f64`.
pub(crate) fn present_floats(series: &Series) -> PolarsResult<Float64Chunked> {
    let present = series.cast(&DataType::Float64)?.drop_nulls();
    let values = present.f64()?;
    values.filter(&values.is_not_nan())
}

/// Describe a column through its string representation. Nulls are excluded.
pub(crate) fn text_summary(series: &Series) -> PolarsResult<TextSummary> {
    let present = series.cast(&DataType::String)?.drop_nulls();
    if present.is_empty() {
        return Ok(TextSummary::default());
    }

    Ok(TextSummary {
        count: present.len(),
        unique: present.n_unique()?,
        top: most_frequent(&present)?,
    })
}

/// Most frequent value and its count.
///
/// Ties go to the value seen first.
fn most_frequent(values: &Series) -> PolarsResult<Option<(String, usize)>> {
    let values = values.clone().with_name(PlSmallStr::from_static(VALUE_COLUMN));
    let tally = values.value_counts(true, false, PlSmallStr::from_static(COUNT_COLUMN), false)?;

    let counts = tally
        .column(COUNT_COLUMN)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    let counts = counts.u64()?;
    let Some(top) = counts.get(0) else {
        return Ok(None);
    };

    let keys = tally.column(VALUE_COLUMN)?.as_materialized_series().str()?;
    let leaders: HashSet<&str> = keys
        .into_iter()
        .zip(counts)
        .filter_map(|(key, count)| (count == Some(top)).then_some(key).flatten())
        .collect();

    let first = values
        .str()?
        .into_iter()
        .flatten()
        .find(|value| leaders.contains(value));
    Ok(first.map(|value| (value.to_string(), top as usize)))
}

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (n denominator), `None` for an empty slice.
pub(crate) fn population_std(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Pearson correlation over the rows where both values are present.
///
/// `NaN` when fewer than two complete pairs exist or either side is constant.
pub(crate) fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== present_floats tests ====================

    #[test]
    fn test_present_floats_drops_nulls_and_nan() {
        let series = Series::new("v".into(), &[Some(1.0), None, Some(f64::NAN), Some(4.0)]);
        let values = present_floats(&series).unwrap();
        assert_eq!(values.into_iter().collect::<Vec<_>>(), vec![Some(1.0), Some(4.0)]);
    }

    #[test]
    fn test_present_floats_describe_aggregates() {
        let series = Series::new("v".into(), &[Some(1i64), Some(2), Some(3), Some(4), None]);
        let values = present_floats(&series).unwrap();

        assert_eq!(values.mean(), Some(2.5));
        assert_eq!(values.quantile(0.25, QuantileMethod::Linear).unwrap(), Some(1.75));
        assert_eq!(values.quantile(0.75, QuantileMethod::Linear).unwrap(), Some(3.25));
        let std = values.std(1).unwrap();
        assert!((std - 1.290994).abs() < 1e-6);
    }

    // ==================== text_summary tests ====================

    #[test]
    fn test_text_summary_most_common() {
        let series = Series::new("s".into(), &["b", "a", "b", "c", "b", "a"]);
        let summary = text_summary(&series).unwrap();
        assert_eq!(summary.count, 6);
        assert_eq!(summary.unique, 3);
        assert_eq!(summary.top, Some(("b".to_string(), 3)));
    }

    #[test]
    fn test_text_summary_tie_prefers_first_seen() {
        let series = Series::new("s".into(), &["Paris", "Lyon", "Berlin", "Lyon", "Paris"]);
        let summary = text_summary(&series).unwrap();
        assert_eq!(summary.top, Some(("Paris".to_string(), 2)));
    }

    #[test]
    fn test_text_summary_ignores_nulls() {
        let series = Series::new("s".into(), &[None, Some("x"), None]);
        let summary = text_summary(&series).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.unique, 1);

        let empty = Series::new("s".into(), &[None::<&str>, None]);
        assert_eq!(text_summary(&empty).unwrap(), TextSummary::default());
    }

    #[test]
    fn test_text_summary_column_named_count() {
        let series = Series::new("count".into(), &["x", "y", "y"]);
        let summary = text_summary(&series).unwrap();
        assert_eq!(summary.top, Some(("y".to_string(), 2)));
    }

    // ==================== mean / std tests ====================

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_population_std_basic() {
        // Values: 2, 4, 4, 4, 5, 5, 7, 9 -> population std 2
        let std = population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_population_std_identical_values() {
        assert_eq!(population_std(&[3.0, 3.0, 3.0]), Some(0.0));
    }

    // ==================== pearson tests ====================

    #[test]
    fn test_pearson_perfect_positive() {
        let xs = [Some(1.0), Some(2.0), Some(3.0)];
        let ys = [Some(2.0), Some(4.0), Some(6.0)];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let xs = [Some(1.0), Some(2.0), Some(3.0)];
        let ys = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&xs, &ys) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_uses_complete_pairs_only() {
        let xs = [Some(1.0), None, Some(2.0), Some(3.0)];
        let ys = [Some(10.0), Some(99.0), Some(20.0), Some(30.0)];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_nan() {
        let xs = [Some(1.0), Some(1.0), Some(1.0)];
        let ys = [Some(1.0), Some(2.0), Some(3.0)];
        assert!(pearson(&xs, &ys).is_nan());
    }

    #[test]
    fn test_pearson_too_few_pairs_is_nan() {
        let xs = [Some(1.0), None];
        let ys = [Some(1.0), Some(2.0)];
        assert!(pearson(&xs, &ys).is_nan());
    }
}
