//! Exporting filtered records
//!
//! Demonstrates the two download paths: the full filtered result and a
//! single page, both as self-contained UTF-8 CSV files.

use std::fs;

use escuelas::{FILTERED_FILE_NAME, FilterState, PageSize, SchoolBrowser, page_file_name};
use escuelas_dataset::{TestDataConfig, test_data::create_test_parquet_file};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    escuelas::init_logging(tracing::Level::INFO)?;

    let file = create_test_parquet_file(&TestDataConfig::sample())?;
    let browser = SchoolBrowser::open(file.path())?;

    let filter = FilterState::new().with_state("Oaxaca");

    // Everything matching the filters
    let csv = browser.export_filtered(&filter)?;
    let out_dir = tempfile::tempdir()?;
    let all_path = out_dir.path().join(FILTERED_FILE_NAME);
    fs::write(&all_path, &csv)?;
    println!("Wrote {} bytes to {}", csv.len(), all_path.display());

    // Just the current page
    let page_number = 1;
    let csv = browser.export_page(&filter, PageSize::Fifty, page_number)?;
    let page_path = out_dir.path().join(page_file_name(page_number));
    fs::write(&page_path, &csv)?;
    println!("Wrote {} bytes to {}", csv.len(), page_path.display());

    Ok(())
}
