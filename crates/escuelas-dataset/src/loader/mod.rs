//! Dataset parsing: parquet first, geojson feature collection as fallback.
//!
//! The fallback is an explicit degraded mode: it is entered only after the
//! parquet parse failed, it is logged, and the outcome is reported to the
//! caller so the browser can surface a warning.

use std::{fs::File, path::Path};

use polars::prelude::*;
use tracing::{info, instrument, warn};

use crate::{DataError, Result, schema};

mod geojson;

/// Which parse branch produced the loaded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Parquet parsed cleanly.
    Primary,
    /// Parquet failed; the geojson fallback succeeded.
    Fallback,
}

/// Load the schools dataset from `path`.
///
/// Tries parquet first. On failure the file is re-read as a geojson
/// feature collection with permissive text decoding. Only when both
/// branches fail is the error fatal ([`DataError::LoadFailed`], carrying
/// both causes).
#[instrument(name = "Load schools dataset", skip_all, level = "info")]
pub fn load_dataset(path: &Path) -> Result<(DataFrame, LoadOutcome)> {
    if !path.exists() {
        return Err(DataError::DatasetFileNotFound {
            path: path.to_path_buf(),
        });
    }

    info!("Loading dataset from: {}", path.display());
    let t_load = std::time::Instant::now();

    let primary = match read_parquet(path) {
        Ok(df) => {
            schema::validate_columns(&df)?;
            let df = drop_rows_without_coordinates(df)?;
            info!(
                rows = df.height(),
                elapsed = ?t_load.elapsed(),
                "Parquet parse succeeded"
            );
            return Ok((df, LoadOutcome::Primary));
        }
        Err(e) => e,
    };

    warn!("Could not read parquet directly ({primary}), trying geojson fallback");

    match geojson::read_feature_collection(path) {
        Ok(df) => {
            schema::validate_columns(&df)?;
            info!(
                rows = df.height(),
                elapsed = ?t_load.elapsed(),
                "Geojson fallback parse succeeded"
            );
            Ok((df, LoadOutcome::Fallback))
        }
        Err(fallback) => Err(DataError::LoadFailed {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }),
    }
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)?;
    ParquetReader::new(file).finish().map_err(From::from)
}

/// Every record must carry a coordinate pair; rows without one are dropped.
fn drop_rows_without_coordinates(df: DataFrame) -> Result<DataFrame> {
    let total = df.height();
    let cleaned = df
        .lazy()
        .drop_nulls(Some(vec![col(schema::LATITUDE), col(schema::LONGITUDE)]))
        .collect()?;
    let dropped = total - cleaned.height();
    if dropped > 0 {
        warn!(dropped, total, "Dropped rows without coordinates");
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_data::{
            TestDataConfig, create_latin1_geojson_file, create_test_geojson_file,
            create_test_parquet_file, create_unparseable_file,
        },
        tests_utils::*,
    };

    #[test]
    fn test_load_dataset_prefers_parquet() {
        let file = create_test_parquet_file(&TestDataConfig::minimal()).unwrap();

        let (df, outcome) = load_dataset(file.path()).unwrap();

        assert_eq!(outcome, LoadOutcome::Primary);
        assert!(df.height() > 0);
        assert_has_columns(&df, &schema::REQUIRED_COLUMNS);
        assert_no_nulls_in_column(&df, schema::LATITUDE);
        assert_no_nulls_in_column(&df, schema::LONGITUDE);
    }

    #[test]
    fn test_load_dataset_falls_back_to_geojson() {
        let file = create_test_geojson_file(&TestDataConfig::minimal()).unwrap();

        let (df, outcome) = load_dataset(file.path()).unwrap();

        assert_eq!(outcome, LoadOutcome::Fallback);
        assert!(df.height() > 0);
        assert_has_columns(&df, &schema::REQUIRED_COLUMNS);
    }

    #[test]
    fn test_load_dataset_decodes_latin1_fallback_payload() {
        let file = create_latin1_geojson_file().unwrap();

        let (df, outcome) = load_dataset(file.path()).unwrap();

        assert_eq!(outcome, LoadOutcome::Fallback);
        let states: Vec<Option<&str>> = df
            .column(schema::STATE)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert!(
            states.contains(&Some("Yucatán")),
            "Accented state name should survive the permissive decode, got {states:?}"
        );
    }

    #[test]
    fn test_load_dataset_fails_when_both_parses_fail() {
        let file = create_unparseable_file().unwrap();

        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, DataError::LoadFailed { .. }), "got {err:?}");
    }

    #[test]
    fn test_rows_without_coordinates_are_dropped() {
        let mut df = df!(
            schema::CODE => [Some("20DPR0132K"), Some("14DPR2133F")],
            schema::STATE => [Some("Oaxaca"), Some("Jalisco")],
            schema::MUNICIPALITY => [Some("Oaxaca de Juárez"), Some("Guadalajara")],
            schema::LOCALITY => [Some("Centro"), None],
            schema::SCHOOL_NAME => [Some("PRIMARIA BENITO JUAREZ"), Some("PRIMARIA NIÑOS HEROES")],
            schema::LATITUDE => [Some(17.0654), None],
            schema::LONGITUDE => [Some(-96.7266), Some(-103.3475)],
        )
        .unwrap();
        let temp = tempfile::NamedTempFile::new().unwrap();
        let mut file = File::create(temp.path()).unwrap();
        ParquetWriter::new(&mut file).finish(&mut df).unwrap();

        let (loaded, outcome) = load_dataset(temp.path()).unwrap();
        assert_eq!(outcome, LoadOutcome::Primary);
        assert_eq!(loaded.height(), 1);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_dataset(Path::new("/nonexistent/escuelas.parquet")).unwrap_err();
        assert!(
            matches!(err, DataError::DatasetFileNotFound { .. }),
            "got {err:?}"
        );
    }
}
