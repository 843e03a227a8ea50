//! Column layout of the schools dataset.
//!
//! The raw column names are kept as they appear in the source file; the
//! browser maps them to localized labels only at the display/export edge.

use polars::prelude::DataFrame;

use crate::{DataError, Result};

/// Working-center code, the display key of a record.
pub const CODE: &str = "name";
/// State (administrative level 1).
pub const STATE: &str = "nombre_entidad";
/// Municipality (administrative level 2, nested under the state).
pub const MUNICIPALITY: &str = "nombre_municipio";
/// Locality, finer grained than the municipality.
pub const LOCALITY: &str = "nombre_localidad";
/// Human-readable school name.
pub const SCHOOL_NAME: &str = "nombre_de_centro_de_trabajo";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Columns shown in the table, searched, and exported — coordinates are
/// deliberately not part of this set.
pub const DISPLAY_COLUMNS: [&str; 5] = [CODE, STATE, MUNICIPALITY, LOCALITY, SCHOOL_NAME];

/// Every column a loaded frame must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    CODE,
    STATE,
    MUNICIPALITY,
    LOCALITY,
    SCHOOL_NAME,
    LATITUDE,
    LONGITUDE,
];

/// Check that `df` carries every required column.
pub fn validate_columns(df: &DataFrame) -> Result<()> {
    let names: Vec<_> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    for required in REQUIRED_COLUMNS {
        if !names.contains(&required) {
            return Err(DataError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}
