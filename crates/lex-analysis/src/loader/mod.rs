//! Dataset loading.
//!
//! Reads a delimited text file, decodes it from the configured legacy
//! encoding and parses it into a [`Dataset`]. Loading is all-or-nothing:
//! any failure returns an error and no partial dataset.

mod decode;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::profiler::DataProfiler;
use crate::types::{Dataset, MissingValueCounts, SummaryStatistics};
use crate::utils::dataset_name;
use encoding_rs::Encoding;
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

pub(crate) use decode::decode_bytes;

/// Tokens read as null in every column, in addition to empty fields.
pub const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A dataset together with its derived summaries.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub summary: SummaryStatistics,
    pub missing: MissingValueCounts,
}

/// Reads CSV files into [`Dataset`]s.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    encoding: &'static Encoding,
    infer_schema_length: Option<usize>,
}

impl DatasetLoader {
    /// Create a loader for the given encoding label.
    pub fn new(encoding_label: &str, infer_schema_length: Option<usize>) -> Result<Self> {
        let encoding = Encoding::for_label(encoding_label.trim().as_bytes()).ok_or_else(|| {
            AnalysisError::DataFormat(format!("unknown text encoding '{}'", encoding_label))
        })?;
        Ok(Self::with_encoding(encoding, infer_schema_length))
    }

    pub fn with_encoding(encoding: &'static Encoding, infer_schema_length: Option<usize>) -> Self {
        Self {
            encoding,
            infer_schema_length,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        Self::new(&config.encoding, config.infer_schema_length)
    }

    /// Load a file and derive its summary statistics and missing-value counts.
    pub fn load(&self, path: &Path) -> Result<LoadedDataset> {
        let dataset = self.read_dataset(path)?;
        let summary = DataProfiler::describe(&dataset)?;
        let missing = DataProfiler::missing_values(&dataset);
        Ok(LoadedDataset {
            dataset,
            summary,
            missing,
        })
    }

    /// Read and parse a file into a [`Dataset`] named after its base name.
    pub fn read_dataset(&self, path: &Path) -> Result<Dataset> {
        if !path.exists() {
            return Err(AnalysisError::NotFound(path.to_path_buf()));
        }

        info!("Loading dataset from: {}", path.display());
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AnalysisError::NotFound(path.to_path_buf()),
            _ => AnalysisError::Io(e),
        })?;

        let dataset = self.parse_bytes(dataset_name(path), &bytes)?;
        info!(
            "Dataset loaded successfully: {} rows x {} columns",
            dataset.height(),
            dataset.width()
        );
        Ok(dataset)
    }

    /// Parse in-memory CSV bytes.
    pub fn parse_bytes(&self, name: impl Into<String>, bytes: &[u8]) -> Result<Dataset> {
        let text = decode_bytes(bytes, self.encoding);
        if text.trim().is_empty() {
            return Err(AnalysisError::DataFormat("file is empty".to_string()));
        }
        debug!("Decoded {} bytes as {}", bytes.len(), self.encoding.name());

        let null_values = NullValues::AllColumns(
            NULL_TOKENS
                .into_iter()
                .map(PlSmallStr::from_static)
                .collect(),
        );

        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_quote_char(Some(b'"'))
                    .with_null_values(Some(null_values)),
            )
            .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
            .finish()
            .map_err(|e| AnalysisError::DataFormat(e.to_string()))?;

        if frame.width() == 0 {
            return Err(AnalysisError::DataFormat("no columns found".to_string()));
        }

        Ok(Dataset::new(name, frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ColumnKind;

    fn latin1_loader() -> DatasetLoader {
        DatasetLoader::new("iso-8859-1", Some(100)).unwrap()
    }

    #[test]
    fn test_unknown_encoding_is_data_format_error() {
        let err = DatasetLoader::new("not-an-encoding", None).unwrap_err();
        assert_eq!(err.error_code(), "DATA_FORMAT");
    }

    #[test]
    fn test_from_config_uses_encoding() {
        let config = AnalysisConfig::builder().encoding("utf-8").build().unwrap();
        let dataset = DatasetLoader::from_config(&config)
            .unwrap()
            .parse_bytes("t", "ville\nZürich\n".as_bytes())
            .unwrap();
        let column = dataset.frame().column("ville").unwrap();
        let values = crate::utils::string_values(column.as_materialized_series()).unwrap();
        assert_eq!(values[0].as_deref(), Some("Zürich"));
    }

    #[test]
    fn test_parse_numeric_and_text_columns() {
        let dataset = latin1_loader()
            .parse_bytes("t", b"id,name,score\n1,ann,2.5\n2,bob,3.5\n")
            .unwrap();

        assert_eq!(dataset.height(), 2);
        let kinds: Vec<ColumnKind> = dataset.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ColumnKind::Numeric, ColumnKind::Text, ColumnKind::Numeric]
        );
    }

    #[test]
    fn test_parse_latin1_text() {
        let dataset = latin1_loader()
            .parse_bytes("t", b"word,n\ncaf\xe9,1\nna\xefve,2\n")
            .unwrap();
        let column = dataset.frame().column("word").unwrap();
        let words = crate::utils::string_values(column.as_materialized_series()).unwrap();
        assert_eq!(words[0].as_deref(), Some("café"));
        assert_eq!(words[1].as_deref(), Some("naïve"));
    }

    #[test]
    fn test_default_encoding_maps_c1_bytes() {
        let dataset = DatasetLoader::from_config(&AnalysisConfig::default())
            .unwrap()
            .parse_bytes("t", b"price\n\x80 5\n")
            .unwrap();
        let column = dataset.frame().column("price").unwrap();
        let values = crate::utils::string_values(column.as_materialized_series()).unwrap();
        assert_eq!(values[0].as_deref(), Some("\u{20ac} 5"));
    }

    #[test]
    fn test_null_tokens_become_nulls() {
        let dataset = latin1_loader()
            .parse_bytes("t", b"x,y\n1,a\nNA,\n3,N/A\n")
            .unwrap();
        let columns = dataset.columns();
        assert_eq!(columns[0].kind, ColumnKind::Numeric);
        assert_eq!(dataset.frame().column("x").unwrap().null_count(), 1);
        assert_eq!(dataset.frame().column("y").unwrap().null_count(), 2);
    }

    #[test]
    fn test_lowercase_null_token() {
        let dataset = latin1_loader().parse_bytes("t", b"x\n1\nnull\n").unwrap();
        assert_eq!(dataset.frame().column("x").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_input_is_data_format_error() {
        let err = latin1_loader().parse_bytes("t", b"  \n").unwrap_err();
        assert!(matches!(err, AnalysisError::DataFormat(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = latin1_loader()
            .read_dataset(Path::new("definitely/not/here.csv"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
