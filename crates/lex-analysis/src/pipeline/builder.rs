//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating one analysis run: load, visualize, detect outliers and
//! write the report.

use crate::config::{AnalysisConfig, ConfigValidationError};
use crate::error::{AnalysisError, Result, ResultExt};
use crate::loader::{DatasetLoader, LoadedDataset};
use crate::pipeline::outliers::OutlierDetector;
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::render::{
    ChartRenderer, HEATMAP_FILE, MISSING_PLOT_FILE, MarkdownTableRenderer, PlottersChartRenderer,
    TableRenderer,
};
use crate::reporting::{ReportGenerator, ReportInputs};
use crate::types::{AnalysisOutcome, Dataset, MissingValueCounts, StageOutcome};
use crate::utils::dataset_name;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The main analysis pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_analysis::{AnalysisConfig, Pipeline};
///
/// let outcome = Pipeline::builder()
///     .config(AnalysisConfig::builder().output_root("reports").build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run("data/media.csv")?;
///
/// println!("Report written to {}", outcome.report_path.display());
/// ```
pub struct Pipeline {
    config: AnalysisConfig,
    loader: DatasetLoader,
    detector: OutlierDetector,
    charts: Arc<dyn ChartRenderer>,
    reporter: ReportGenerator,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Embedding applications move the pipeline to a worker thread
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Directory the artifacts for `input` are written to.
    pub fn output_dir_for(&self, input: &Path) -> PathBuf {
        self.config.output_root.join(dataset_name(input))
    }

    /// Analyze one input file and write its report directory.
    ///
    /// Artifacts already written when a later stage fails are left in place.
    pub fn run(&self, input: impl AsRef<Path>) -> Result<AnalysisOutcome> {
        match self.run_internal(input.as_ref()) {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, input: &Path) -> Result<AnalysisOutcome> {
        let start_time = Instant::now();

        info!("Starting analysis of {}", input.display());
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            0.0,
            format!("Loading {}...", input.display()),
        ));

        if !input.exists() {
            return Err(AnalysisError::NotFound(input.to_path_buf()));
        }

        let name = dataset_name(input);
        let output_dir = self.output_dir_for(input);
        fs::create_dir_all(&output_dir).context(format!(
            "Failed to create output directory {}",
            output_dir.display()
        ))?;
        debug!("Output directory: {}", output_dir.display());

        // Step 1: Load and describe
        let LoadedDataset {
            dataset,
            summary,
            missing,
        } = self.loader.load(input)?;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Describing,
            1.0,
            format!(
                "Described {} rows x {} columns",
                dataset.height(),
                dataset.width()
            ),
        ));

        // Step 2: Correlation heatmap
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::CorrelationHeatmap,
            0.0,
            "Computing correlation matrix...",
        ));
        let heatmap = self.correlation_heatmap(&dataset, &output_dir)?;

        // Step 3: Missing-values plot
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::MissingValuesPlot,
            0.0,
            "Plotting missing values...",
        ));
        let missing_values_plot = self.missing_values_plot(&missing, &output_dir)?;

        // Step 4: Outliers
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::OutlierDetection,
            0.0,
            "Detecting outliers...",
        ));
        let outliers = self.detector.detect(&dataset)?;

        // Step 5: Report
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::ReportCompilation,
            0.0,
            "Compiling report...",
        ));
        let report = self.reporter.compile(ReportInputs {
            dataset_name: &name,
            dataset: &dataset,
            summary: &summary,
            missing: &missing,
            heatmap_path: heatmap.path().map(|_| HEATMAP_FILE),
            missing_plot_path: missing_values_plot.path().map(|_| MISSING_PLOT_FILE),
            outliers: &outliers,
            zscore_threshold: self.detector.threshold(),
        });
        let report_path = self.reporter.write_report(&output_dir, &report)?;
        info!("Analysis complete. Report saved to {}", report_path.display());

        Ok(AnalysisOutcome {
            dataset_name: name,
            input_file: input.to_path_buf(),
            output_dir,
            report_path,
            rows: dataset.height(),
            columns: dataset.width(),
            heatmap,
            missing_values_plot,
            missing_values: missing,
            outliers,
            duration_ms: u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }

    fn correlation_heatmap(&self, dataset: &Dataset, output_dir: &Path) -> Result<StageOutcome> {
        let Some(matrix) = DataProfiler::correlation_matrix(dataset)? else {
            info!("No numeric columns found for correlation matrix.");
            return Ok(StageOutcome::Skipped {
                reason: "no numeric columns".to_string(),
            });
        };

        let path = output_dir.join(HEATMAP_FILE);
        self.charts
            .render_heatmap(&matrix, &path, self.config.heatmap_size)?;
        info!("Correlation heatmap saved to {}", path.display());
        Ok(StageOutcome::Written { path })
    }

    fn missing_values_plot(
        &self,
        missing: &MissingValueCounts,
        output_dir: &Path,
    ) -> Result<StageOutcome> {
        let counts = missing.non_zero();
        if counts.is_empty() {
            info!("No missing values to visualize.");
            return Ok(StageOutcome::Skipped {
                reason: "no missing values".to_string(),
            });
        }

        let path = output_dir.join(MISSING_PLOT_FILE);
        self.charts
            .render_missing_values(&counts, &path, self.config.missing_plot_size)?;
        info!("Missing values bar plot saved to {}", path.display());
        Ok(StageOutcome::Written { path })
    }
}

/// Builder for creating a [`Pipeline`] with custom configuration.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnalysisConfig>,
    chart_renderer: Option<Arc<dyn ChartRenderer>>,
    table_renderer: Option<Arc<dyn TableRenderer>>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the chart backend. Defaults to [`PlottersChartRenderer`].
    pub fn chart_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.chart_renderer = Some(renderer);
        self
    }

    /// Replace the table formatter. Defaults to [`MarkdownTableRenderer`].
    pub fn table_renderer(mut self, renderer: Arc<dyn TableRenderer>) -> Self {
        self.table_renderer = Some(renderer);
        self
    }

    /// Set a progress reporter for receiving updates during a run.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use lex_analysis::{ProgressReporter, ProgressUpdate};
    /// use std::sync::Arc;
    ///
    /// struct MyReporter;
    ///
    /// impl ProgressReporter for MyReporter {
    ///     fn report(&self, update: ProgressUpdate) {
    ///         println!("{}: {}", update.stage.display_name(), update.message);
    ///     }
    /// }
    ///
    /// let pipeline = Pipeline::builder()
    ///     .progress_reporter(Arc::new(MyReporter))
    ///     .build()?;
    /// ```
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let loader = DatasetLoader::with_encoding(config.resolve_encoding()?, config.infer_schema_length);
        let tables = self
            .table_renderer
            .unwrap_or_else(|| Arc::new(MarkdownTableRenderer));

        Ok(Pipeline {
            detector: OutlierDetector::new(config.zscore_threshold),
            loader,
            charts: self
                .chart_renderer
                .unwrap_or_else(|| Arc::new(PlottersChartRenderer)),
            reporter: ReportGenerator::new(tables),
            progress_reporter: self.progress_reporter,
            config,
        })
    }
}
