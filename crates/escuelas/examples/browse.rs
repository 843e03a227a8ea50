//! Basic browsing functionality
//!
//! This example demonstrates the fundamental pipeline operations:
//! - Opening a browser over a dataset file
//! - Cascading state/municipality dropdowns
//! - Filtering, searching and paginating

use escuelas::{FilterState, Language, PageSize, SchoolBrowser, fmt_count};
use escuelas_dataset::{TestDataConfig, test_data::create_test_parquet_file};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    escuelas::init_logging(tracing::Level::INFO)?;

    // A small generated dataset keeps the example self-contained; point
    // SchoolBrowser::open at a real file (or use SchoolBrowser::shared)
    // for production data.
    let file = create_test_parquet_file(&TestDataConfig::sample())?;
    let browser = SchoolBrowser::open(file.path())?;

    let t = Language::default().translations();
    println!("{}", t.title);
    println!(
        "{}",
        t.subtitle.replacen("{}", &fmt_count(browser.dataset().len()), 1)
    );

    // Cascading dropdowns
    let states = browser.states()?;
    println!("\nStates: {states:?}");
    let municipalities = browser.municipalities(&states[0])?;
    println!("Municipalities of {}: {municipalities:?}", states[0]);

    // Filter to one state, then search within it
    let filter = FilterState::new()
        .with_state(states[0].clone())
        .with_search("primaria");
    let view = browser.browse(&filter, PageSize::Fifty, 1)?;

    println!(
        "\n{} points on map, {} matching table rows, page {}/{}",
        fmt_count(view.map_set.height()),
        fmt_count(view.table_rows),
        view.page.page_number,
        view.page.total_pages,
    );
    for warning in &view.warnings {
        println!("warning: {warning:?}");
    }
    println!("{}", view.page.rows.head(Some(5)));

    Ok(())
}
