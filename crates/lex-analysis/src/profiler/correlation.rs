//! Pairwise correlation over numeric columns.

use crate::error::Result;
use crate::profiler::statistics::pearson;
use crate::types::{CorrelationMatrix, Dataset};
use tracing::debug;

/// Compute the Pearson correlation matrix of all numeric columns.
///
/// Returns `None` when the dataset has no numeric column.
pub(crate) fn correlation_matrix(dataset: &Dataset) -> Result<Option<CorrelationMatrix>> {
    let numeric = dataset.numeric_columns()?;
    if numeric.is_empty() {
        return Ok(None);
    }

    let n = numeric.len();
    let mut values = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let r = pearson(&numeric[i].1, &numeric[j].1);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!("Computed {}x{} correlation matrix", n, n);
    Ok(Some(CorrelationMatrix {
        columns: numeric.into_iter().map(|(name, _)| name).collect(),
        values,
    }))
}
