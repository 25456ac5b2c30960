//! Dataset Analysis Library
//!
//! Descriptive-statistics reports for CSV files, built with Rust and Polars.
//!
//! # Overview
//!
//! One run reads a CSV file and writes a report directory next to it:
//!
//! - **Loading**: Legacy-encoding decoding, null-token recognition and dtype inference
//! - **Profiling**: Per-column summary statistics and missing-value counts
//! - **Correlation Heatmap**: Annotated Pearson matrix of the numeric columns
//! - **Missing Values Plot**: Bar chart of the columns that have nulls
//! - **Outlier Detection**: Z-score counts per numeric column
//! - **Report**: Markdown `README.md` linking the charts
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_analysis::{AnalysisConfig, Pipeline};
//!
//! let config = AnalysisConfig::builder()
//!     .output_root("reports")
//!     .encoding("windows-1252")
//!     .build()?;
//!
//! let outcome = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run("data/media.csv")?;
//!
//! println!("Report: {}", outcome.report_path.display());
//! ```
//!
//! # Renderers
//!
//! Charts and tables go through the [`render::ChartRenderer`] and
//! [`render::TableRenderer`] traits. The defaults draw PNGs with `plotters`
//! and emit GitHub pipe tables; either can be swapped on the builder.

pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod render;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use loader::{DatasetLoader, LoadedDataset};
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, OutlierDetector, Pipeline, PipelineBuilder,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::DataProfiler;
pub use render::{
    Alignment, ChartRenderer, MarkdownTableRenderer, PlottersChartRenderer, Table, TableRenderer,
};
pub use reporting::{ReportGenerator, ReportInputs};
pub use types::{
    AnalysisOutcome, ColumnInfo, ColumnStatistics, CorrelationMatrix, Dataset, MissingValueCounts,
    OutlierCounts, StageOutcome, SummaryStatistics,
};
pub use utils::{ColumnKind, dataset_name, format_number};
