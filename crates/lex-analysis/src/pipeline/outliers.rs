//! Outlier detection module.
//!
//! Counts values in numeric columns whose Z-score magnitude exceeds a
//! threshold. Values are standardized with the column mean and the
//! population standard deviation of the non-null entries.

use crate::error::Result;
use crate::profiler::statistics::{mean, population_std};
use crate::types::{Dataset, OutlierCounts};
use tracing::{debug, info};

/// Detects Z-score outliers in numeric columns.
pub struct OutlierDetector {
    threshold: f64,
}

impl Default for OutlierDetector {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ZSCORE_THRESHOLD)
    }
}

impl OutlierDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Count outliers for every numeric column.
    ///
    /// Returns an empty result when the dataset has no numeric column.
    pub fn detect(&self, dataset: &Dataset) -> Result<OutlierCounts> {
        let numeric = dataset.numeric_columns()?;
        if numeric.is_empty() {
            info!("No numeric columns available for outlier detection.");
            return Ok(OutlierCounts::default());
        }

        let entries = numeric
            .into_iter()
            .map(|(name, values)| {
                let count = self.count_outliers(&name, &values);
                (name, count)
            })
            .collect();

        Ok(OutlierCounts { entries })
    }

    /// Number of present values with `|z| > threshold`.
    ///
    /// Zero-variance columns have no defined Z-score and count zero.
    pub fn count_outliers(&self, column: &str, values: &[Option<f64>]) -> usize {
        let present: Vec<f64> = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect();

        let (Some(mean), Some(std)) = (mean(&present), population_std(&present)) else {
            debug!("Column '{}' has no values, no outliers counted", column);
            return 0;
        };

        if std == 0.0 {
            debug!("Column '{}' has zero variance, no outliers counted", column);
            return 0;
        }

        let count = present
            .iter()
            .filter(|v| ((*v - mean) / std).abs() > self.threshold)
            .count();
        debug!("Column '{}': {} outliers (|z| > {})", column, count, self.threshold);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn spiked_values() -> Vec<Option<f64>> {
        // 19 x 10.0 and one 100.0: z(100) ~ 4.36, z(10) ~ 0.23
        let mut values = vec![Some(10.0); 19];
        values.push(Some(100.0));
        values
    }

    #[test]
    fn test_count_outliers_single_spike() {
        let detector = OutlierDetector::default();
        assert_eq!(detector.count_outliers("v", &spiked_values()), 1);
    }

    #[test]
    fn test_count_outliers_small_sample_has_none() {
        // With three points the largest possible |z| is sqrt(2)
        let detector = OutlierDetector::default();
        let values = [Some(1.0), Some(2.0), Some(1000.0)];
        assert_eq!(detector.count_outliers("v", &values), 0);
    }

    #[test]
    fn test_count_outliers_zero_variance() {
        let detector = OutlierDetector::default();
        let values = [Some(4.0), Some(4.0), Some(4.0), Some(4.0)];
        assert_eq!(detector.count_outliers("v", &values), 0);
    }

    #[test]
    fn test_count_outliers_ignores_nulls() {
        let detector = OutlierDetector::default();
        let mut values = spiked_values();
        values.insert(3, None);
        values.push(None);
        assert_eq!(detector.count_outliers("v", &values), 1);
    }

    #[test]
    fn test_count_outliers_all_null() {
        let detector = OutlierDetector::default();
        assert_eq!(detector.count_outliers("v", &[None, None]), 0);
    }

    #[test]
    fn test_lower_threshold_counts_more() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 30.0]
            .into_iter()
            .map(Some)
            .collect();
        let strict = OutlierDetector::new(3.0).count_outliers("v", &values);
        let loose = OutlierDetector::new(1.0).count_outliers("v", &values);
        assert!(loose >= strict);
        assert!(loose <= values.len());
    }

    #[test]
    fn test_detect_covers_numeric_columns_only() {
        let mut spike: Vec<f64> = vec![10.0; 19];
        spike.push(100.0);
        let frame = df!(
            "value" => &spike,
            "steady" => &vec![5i64; 20],
            "label" => &vec!["x"; 20]
        )
        .unwrap();
        let dataset = Dataset::new("t", frame);
        let counts = OutlierDetector::default().detect(&dataset).unwrap();

        assert_eq!(counts.entries.len(), 2);
        assert_eq!(counts.get("value"), Some(1));
        assert_eq!(counts.get("steady"), Some(0));
        assert_eq!(counts.get("label"), None);
        assert!(counts.has_outliers());
    }

    #[test]
    fn test_detect_without_numeric_columns_is_empty() {
        let frame = df!("city" => &["Paris", "Lyon"]).unwrap();
        let counts = OutlierDetector::default()
            .detect(&Dataset::new("t", frame))
            .unwrap();
        assert!(counts.is_empty());
    }
}
