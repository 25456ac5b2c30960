//! Report generation module.
//!
//! This module compiles the markdown analysis report and writes it as
//! `README.md` into the dataset's output directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_analysis::reporting::{ReportGenerator, ReportInputs};
//!
//! let generator = ReportGenerator::default();
//! let markdown = generator.compile(ReportInputs {
//!     dataset_name: "media",
//!     dataset: &dataset,
//!     summary: &summary,
//!     missing: &missing,
//!     heatmap_path: Some("correlation_heatmap.png"),
//!     missing_plot_path: None,
//!     outliers: &outliers,
//!     zscore_threshold: 3.0,
//! });
//! generator.write_report(&output_dir, &markdown)?;
//! ```

mod generator;

pub use generator::{REPORT_FILE, ReportGenerator, ReportInputs};
