//! Rendering the map artifact
//!
//! Produces a standalone Leaflet HTML document with clustered markers for
//! the capped map result set and writes it next to the current directory.

use escuelas::{FilterState, SchoolBrowser};
use escuelas_dataset::{TestDataConfig, test_data::create_test_parquet_file};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    escuelas::init_logging(tracing::Level::INFO)?;

    let file = create_test_parquet_file(&TestDataConfig::sample())?;
    let browser = SchoolBrowser::open(file.path())?;

    let filter = FilterState::new().with_state("Yucatán");
    let html = browser.render_map_view(&filter)?;

    let out = std::env::temp_dir().join("escuelas_map.html");
    std::fs::write(&out, &html)?;
    println!("Wrote map with {} bytes to {}", html.len(), out.display());
    println!("Open it in a browser to inspect markers and popups.");

    Ok(())
}
