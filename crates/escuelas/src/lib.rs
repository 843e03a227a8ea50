//! Escuelas - Interactive Browser for the Mexican Schools Point Dataset
//!
//! Escuelas loads a geospatial dataset of school locations and lets an
//! embedding surface progressively filter, map, paginate, search, and
//! export subsets of it. The pipeline is a set of pure transformations
//! over a Polars `DataFrame`; the map is delivered as a self-contained
//! Leaflet HTML artifact with a narrow, sanitized interface.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use escuelas::{FilterState, PageSize, SchoolBrowser};
//!
//! // Browser over the process-wide shared dataset
//! let browser = SchoolBrowser::shared()?;
//!
//! // Cascading dropdowns: municipalities depend on the selected state
//! let states = browser.states()?;
//! let municipalities = browser.municipalities("Oaxaca")?;
//! println!("{} states, {} in Oaxaca", states.len(), municipalities.len());
//!
//! // One interaction = one pipeline run
//! let filter = FilterState::new()
//!     .with_state("Oaxaca")
//!     .with_search("primaria");
//! let view = browser.browse(&filter, PageSize::Hundred, 1)?;
//!
//! // Map and downloads come from the same run
//! let map_html = browser.render_map_view(&filter)?;
//! let csv = browser.export_filtered(&filter)?;
//! # Ok::<(), escuelas::error::EscuelasError>(())
//! ```
//!
//! # Pipeline
//!
//! Data flows one direction per interaction:
//! loader (cached) → hierarchical filter → map cap → search → pagination.
//! The search term narrows only the table and export path; the map always
//! shows the hierarchical result, truncated to a hard cap with a warning
//! when necessary.
//!
//! # Data
//!
//! The dataset is read once per process from a parquet file (with a
//! permissive geojson fallback) and cached immutably; see the
//! [`dataset`] crate for the loading contract.

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
pub mod error;
mod export;
mod filter;
mod locale;
mod map;
mod page;

pub use self::core::{BrowseView, BrowseWarning, SchoolBrowser};

pub use config::{BrowseConfig, BrowseConfigBuilder};
pub use escuelas_dataset as dataset;
pub use escuelas_dataset::{LoadOutcome, SchoolDataset, schema};
pub use export::{ExportError, FILTERED_FILE_NAME, page_file_name, to_csv_bytes};
pub use filter::{
    FilterError, FilterOutput, FilterState, MAP_POINT_CAP, TruncationWarning,
    hierarchical_filter, municipality_options, search_filter, state_options,
};
pub use locale::{Language, Translations, column_label, fmt_count};
pub use map::{DEFAULT_CENTER, MapError, map_center, render_map};
pub use page::{Page, PageError, PageSize, paginate};
pub use polars;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the Escuelas library.
///
/// This sets up structured logging with configurable levels and filtering.
/// Call this once at the start of your application to enable detailed
/// logging output from browsing operations.
///
/// # Arguments
///
/// * `level` - The minimum log level to display
///
/// # Examples
///
/// ```rust
/// use escuelas::init_logging;
/// use tracing::Level;
///
/// // Initialize with info-level logging
/// init_logging(Level::INFO)?;
/// # Ok::<(), escuelas::error::EscuelasError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::EscuelasError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("polars=warn".parse().unwrap());

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use escuelas_dataset::{TestDataConfig, test_data::test_frame};

    use super::*;

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    fn test_browser() -> SchoolBrowser {
        let df = test_frame(&TestDataConfig::minimal()).unwrap();
        SchoolBrowser::from_dataset(SchoolDataset::from_frame(df).unwrap())
    }

    #[test]
    fn test_browser_creation() {
        setup_test_env();

        let browser = test_browser();
        assert!(!browser.dataset().is_empty());
    }

    #[test]
    fn test_full_interaction() {
        setup_test_env();

        let browser = test_browser();
        let filter = FilterState::new().with_state("Oaxaca");

        let view = browser.browse(&filter, PageSize::Fifty, 1).unwrap();
        assert!(view.map_set.height() > 0);

        let html = browser.render_map_view(&filter).unwrap();
        assert!(html.contains("L.circleMarker("));

        let csv = browser.export_filtered(&filter).unwrap();
        assert!(!csv.is_empty());
    }

    #[test]
    fn test_configuration() {
        setup_test_env();

        let config = BrowseConfig::builder()
            .map_point_cap(3)
            .language(Language::En)
            .build();
        assert_eq!(config.map_point_cap, 3);

        let browser = test_browser().with_config(config);
        let view = browser
            .browse(&FilterState::new(), PageSize::Fifty, 1)
            .unwrap();
        assert_eq!(view.map_set.height(), 3);
        assert!(matches!(
            view.warnings[0],
            BrowseWarning::Truncated { cap: 3, .. }
        ));
    }

    #[test]
    fn test_empty_search_returns_hierarchical_result() {
        setup_test_env();

        let browser = test_browser();
        let base = FilterState::new().with_state("Jalisco");
        let with_empty_search = base.clone().with_search("");

        let plain = browser.browse(&base, PageSize::Fifty, 1).unwrap();
        let searched = browser.browse(&with_empty_search, PageSize::Fifty, 1).unwrap();

        assert_eq!(plain.table_rows, searched.table_rows);
        assert_eq!(plain.page.rows, searched.page.rows);
    }
}
