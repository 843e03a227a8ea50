//! Dataset layer for the escuelas school browser.
//!
//! This crate owns everything about getting the Mexican schools point
//! dataset into memory: the column schema, the parquet parse with its
//! geojson fallback, the process-lifetime cache, and the fixture
//! generators used by tests across the workspace.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use tracing::warn;

pub mod loader;
pub mod schema;
pub mod test_data;

mod dataset;

static TEST_DATA_DIR: Lazy<tempfile::TempDir> = Lazy::new(|| {
    tempfile::TempDir::new().expect("Failed to create global temporary test data directory")
});

pub const DATA_DIR_DEFAULT: &str = "./escuelas_data";

/// File name of the schools dataset inside the data directory.
pub const DATASET_FILE_NAME: &str = "qutf_gpd_combined_escuelas_mexico.parquet";

/// Centralized function to determine if we should use test data.
pub fn should_use_test_data() -> bool {
    let is_test_environment = cfg!(test) || cfg!(doctest);

    let explicit_test_data = std::env::var("USE_TEST_DATA")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    is_test_environment || explicit_test_data
}

/// Global data directory path that automatically determines the appropriate location.
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    if should_use_test_data() {
        let temp_dir = TEST_DATA_DIR.path().to_path_buf();
        warn!(temp_dir = ?temp_dir, "Using temporary data directory for tests");
        return temp_dir;
    }
    if let Ok(dir) = std::env::var("DATA_DIR") {
        return PathBuf::from(dir);
    }
    #[cfg(feature = "system-dirs")]
    if let Some(dirs) = directories::ProjectDirs::from("mx", "escuelas", "escuelas") {
        return dirs.data_dir().to_path_buf();
    }
    PathBuf::from(DATA_DIR_DEFAULT)
});

/// Path of the dataset file the shared cache loads from.
///
/// `ESCUELAS_DATASET` overrides the full path; otherwise the dataset is
/// expected at [`DATASET_FILE_NAME`] inside the data directory.
pub fn dataset_path() -> PathBuf {
    std::env::var("ESCUELAS_DATASET").map_or_else(
        |_| DATA_DIR.join(DATASET_FILE_NAME),
        PathBuf::from,
    )
}

mod error {
    use polars::prelude::PolarsError;
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum DataError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("Polars error: {0}")]
        Polars(#[from] PolarsError),
        #[error("Serialization error: {0}")]
        Serde(#[from] serde_json::Error),
        #[error("Dataset file not found at {path:?}")]
        DatasetFileNotFound { path: std::path::PathBuf },
        #[error("Required column '{0}' missing from dataset")]
        MissingColumn(String),
        #[error(
            "Dataset could not be parsed as parquet ({primary}) nor as a geojson feature collection ({fallback})"
        )]
        LoadFailed {
            primary: Box<DataError>,
            fallback: Box<DataError>,
        },
    }

    pub type Result<T> = std::result::Result<T, DataError>;
}

pub use error::{DataError, Result};

// Re-export main types
pub use dataset::{DatasetMetadata, SchoolDataset};
pub use loader::{LoadOutcome, load_dataset};
pub use test_data::TestDataConfig;

#[cfg(test)]
pub(crate) mod tests_utils {
    use polars::prelude::*;

    pub fn assert_has_columns(df: &DataFrame, expected_columns: &[&str]) {
        let actual_columns: Vec<_> = df.get_column_names().iter().map(|s| s.as_str()).collect();
        for expected_col in expected_columns {
            assert!(
                actual_columns.contains(expected_col),
                "Missing column: {}. Available columns: {:?}",
                expected_col,
                actual_columns
            );
        }
    }

    pub fn assert_column_type(df: &DataFrame, column: &str, expected_type: &DataType) {
        let actual_type = df
            .column(column)
            .unwrap_or_else(|_| panic!("Column '{}' not found", column))
            .dtype();
        assert_eq!(
            actual_type, expected_type,
            "Column '{}' has wrong type. Expected: {:?}, Got: {:?}",
            column, expected_type, actual_type
        );
    }

    pub fn assert_no_nulls_in_column(df: &DataFrame, column: &str) {
        let null_count = df
            .column(column)
            .unwrap_or_else(|_| panic!("Column '{}' not found", column))
            .null_count();
        assert_eq!(
            null_count, 0,
            "Column '{}' contains {} null values",
            column, null_count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_uses_tempdir_under_tests() {
        // cfg(test) forces the temporary directory, never a user path.
        assert!(should_use_test_data());
        assert!(DATA_DIR.starts_with(TEST_DATA_DIR.path()));
    }

    #[test]
    fn test_dataset_path_defaults_to_data_dir() {
        if std::env::var("ESCUELAS_DATASET").is_ok() {
            return;
        }
        let path = dataset_path();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(DATASET_FILE_NAME)
        );
        assert!(path.starts_with(&*DATA_DIR));
    }
}
