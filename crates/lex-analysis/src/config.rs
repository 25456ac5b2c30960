//! Configuration types for the analysis pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default input text encoding (single-byte, accepts any byte sequence).
///
/// Labels resolve under WHATWG rules, so `iso-8859-1` decodes as
/// windows-1252: bytes 0x80-0x9F become printable characters such as `€`
/// rather than C1 control codes.
pub const DEFAULT_ENCODING: &str = "iso-8859-1";

/// Default Z-score magnitude above which a value counts as an outlier.
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

/// Environment variable holding the optional API token.
pub const API_TOKEN_ENV: &str = "AIPROXY_TOKEN";

/// Configuration for the analysis pipeline.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_analysis::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .output_root("reports")
///     .encoding("windows-1252")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Directory in which the per-dataset output directory is created.
    /// Default: "." (current directory)
    pub output_root: PathBuf,

    /// Label of the text encoding used to decode the input file.
    /// Any WHATWG label understood by `encoding_rs` is accepted.
    /// Default: "iso-8859-1"
    pub encoding: String,

    /// Number of rows used for column type inference. `None` scans the whole file.
    /// Default: Some(10000)
    pub infer_schema_length: Option<usize>,

    /// Absolute Z-score above which a value is reported as an outlier.
    /// Default: 3.0
    pub zscore_threshold: f64,

    /// Correlation heatmap image size in pixels (width, height).
    /// Default: (1000, 800)
    pub heatmap_size: (u32, u32),

    /// Missing-values bar chart image size in pixels (width, height).
    /// Default: (1200, 600)
    pub missing_plot_size: (u32, u32),

    /// Optional API token read from `AIPROXY_TOKEN`.
    ///
    /// Carried for forward compatibility; no stage consumes it.
    #[serde(skip)]
    pub api_token: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            encoding: DEFAULT_ENCODING.to_string(),
            infer_schema_length: Some(10_000),
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
            heatmap_size: (1000, 800),
            missing_plot_size: (1200, 600),
            api_token: None,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Resolve the configured encoding label.
    pub fn resolve_encoding(&self) -> Result<&'static Encoding, ConfigValidationError> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| ConfigValidationError::UnknownEncoding(self.encoding.clone()))
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.zscore_threshold.is_finite() || self.zscore_threshold <= 0.0 {
            return Err(ConfigValidationError::InvalidThreshold(self.zscore_threshold));
        }

        for (field, (width, height)) in [
            ("heatmap_size", self.heatmap_size),
            ("missing_plot_size", self.missing_plot_size),
        ] {
            if width == 0 || height == 0 {
                return Err(ConfigValidationError::InvalidImageSize {
                    field: field.to_string(),
                    width,
                    height,
                });
            }
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidInferLength);
        }

        self.resolve_encoding()?;
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid Z-score threshold: {0} (must be a positive finite number)")]
    InvalidThreshold(f64),

    #[error("Invalid image size for '{field}': {width}x{height} (both dimensions must be non-zero)")]
    InvalidImageSize {
        field: String,
        width: u32,
        height: u32,
    },

    #[error("Invalid schema inference length: 0 (use None to scan the whole file)")]
    InvalidInferLength,

    #[error("Unknown text encoding label: '{0}'")]
    UnknownEncoding(String),
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    output_root: Option<PathBuf>,
    encoding: Option<String>,
    infer_schema_length: Option<Option<usize>>,
    zscore_threshold: Option<f64>,
    heatmap_size: Option<(u32, u32)>,
    missing_plot_size: Option<(u32, u32)>,
    api_token: Option<String>,
}

impl AnalysisConfigBuilder {
    /// Set the directory under which the dataset's output directory is created.
    pub fn output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_root = Some(path.into());
        self
    }

    /// Set the input text encoding label (e.g. "iso-8859-1", "utf-8").
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Set how many rows are used for type inference (`None` = all rows).
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the absolute Z-score outlier threshold.
    pub fn zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = Some(threshold);
        self
    }

    /// Set the heatmap image size in pixels.
    pub fn heatmap_size(mut self, width: u32, height: u32) -> Self {
        self.heatmap_size = Some((width, height));
        self
    }

    /// Set the missing-values bar chart size in pixels.
    pub fn missing_plot_size(mut self, width: u32, height: u32) -> Self {
        self.missing_plot_size = Some((width, height));
        self
    }

    /// Set the optional API token.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Read the API token from `AIPROXY_TOKEN` if it is set and non-empty.
    pub fn api_token_from_env(mut self) -> Self {
        if let Ok(token) = std::env::var(API_TOKEN_ENV)
            && !token.trim().is_empty()
        {
            self.api_token = Some(token);
        }
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            output_root: self.output_root.unwrap_or(defaults.output_root),
            encoding: self.encoding.unwrap_or(defaults.encoding),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            zscore_threshold: self.zscore_threshold.unwrap_or(defaults.zscore_threshold),
            heatmap_size: self.heatmap_size.unwrap_or(defaults.heatmap_size),
            missing_plot_size: self.missing_plot_size.unwrap_or(defaults.missing_plot_size),
            api_token: self.api_token,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encoding_resolves_to_windows_1252() {
        let encoding = AnalysisConfig::default().resolve_encoding().unwrap();
        assert_eq!(encoding, encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.output_root, PathBuf::from("."));
        assert_eq!(config.encoding, "iso-8859-1");
        assert_eq!(config.zscore_threshold, 3.0);
        assert_eq!(config.heatmap_size, (1000, 800));
        assert!(config.api_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .output_root("reports")
            .encoding("utf-8")
            .infer_schema_length(None)
            .zscore_threshold(2.5)
            .heatmap_size(640, 480)
            .api_token("secret")
            .build()
            .unwrap();

        assert_eq!(config.output_root, PathBuf::from("reports"));
        assert_eq!(config.encoding, "utf-8");
        assert_eq!(config.infer_schema_length, None);
        assert_eq!(config.zscore_threshold, 2.5);
        assert_eq!(config.heatmap_size, (640, 480));
        assert_eq!(config.missing_plot_size, (1200, 600));
        assert_eq!(config.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_latin1_label_resolves() {
        let config = AnalysisConfig::default();
        assert!(config.resolve_encoding().is_ok());
    }

    #[test]
    fn test_validation_unknown_encoding() {
        let result = AnalysisConfig::builder().encoding("klingon-8").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::UnknownEncoding(_)
        ));
    }

    #[test]
    fn test_validation_invalid_threshold() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = AnalysisConfig::builder().zscore_threshold(bad).build();
            assert!(matches!(
                result.unwrap_err(),
                ConfigValidationError::InvalidThreshold(_)
            ));
        }
    }

    #[test]
    fn test_validation_zero_image_dimension() {
        let result = AnalysisConfig::builder().missing_plot_size(0, 600).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidImageSize { .. }
        ));
    }

    #[test]
    fn test_validation_zero_infer_length() {
        let result = AnalysisConfig::builder().infer_schema_length(Some(0)).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidInferLength
        ));
    }

    #[test]
    fn test_api_token_is_not_serialized() {
        let config = AnalysisConfig::builder().api_token("hunter2").build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("api_token"));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "output_root": "out",
            "encoding": "windows-1252",
            "infer_schema_length": null,
            "zscore_threshold": 2.0,
            "heatmap_size": [800, 800],
            "missing_plot_size": [900, 450]
        }"#;

        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_root, PathBuf::from("out"));
        assert_eq!(config.infer_schema_length, None);
        assert_eq!(config.heatmap_size, (800, 800));
        assert!(config.api_token.is_none());
        assert!(config.validate().is_ok());
    }
}
