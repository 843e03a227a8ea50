//! CSV serialization of filtered rows.
//!
//! The same function serves the "all filtered" and "current page" download
//! buttons: both hand in a frame and get back a self-contained UTF-8 CSV
//! with localized header labels.

use polars::prelude::*;

use escuelas_dataset::schema;

use crate::locale::{Language, column_label};

pub use error::ExportError;
mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum ExportError {
        #[error("DataFrame error: {0}")]
        DataFrame(#[from] polars::prelude::PolarsError),
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
    }
    pub type Result<T> = std::result::Result<T, ExportError>;
}
use error::Result;

/// Download file name for the full filtered result.
pub const FILTERED_FILE_NAME: &str = "filtered_schools.csv";

/// Download file name for one page of the filtered result.
pub fn page_file_name(page_number: usize) -> String {
    format!("schools_page_{page_number}.csv")
}

/// Serialize the display columns of `df` as comma-delimited UTF-8 bytes.
///
/// Header labels come from the given language; coordinates are not
/// exported. An empty frame produces a header-only file.
pub fn to_csv_bytes(df: &DataFrame, language: Language) -> Result<Vec<u8>> {
    let selected = schema::DISPLAY_COLUMNS
        .iter()
        .map(|&column| {
            let label = column_label(language, column).unwrap_or(column);
            col(column).cast(DataType::String).alias(label)
        })
        .collect::<Vec<_>>();

    let mut localized = df.clone().lazy().select(selected).collect()?;

    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut localized)?;
    Ok(buffer)
}
