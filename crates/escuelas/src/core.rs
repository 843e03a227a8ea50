//! Browsing pipeline orchestration.
//!
//! This module provides the main [`SchoolBrowser`] interface. Every user
//! interaction — a filter change, a page change, a search — is one
//! synchronous run of the same pipeline: hierarchical filter, map cap,
//! search, pagination. There is no feedback loop and no background work;
//! identical inputs always produce an identical view.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use escuelas::{FilterState, PageSize, SchoolBrowser};
//!
//! // Browser over the process-wide shared dataset
//! let browser = SchoolBrowser::shared()?;
//!
//! let states = browser.states()?;
//! let filter = FilterState::new().with_state(&states[0]);
//!
//! let view = browser.browse(&filter, PageSize::Hundred, 1)?;
//! println!(
//!     "{} points on map, {} rows in table",
//!     view.map_set.height(),
//!     view.table_rows
//! );
//! # Ok::<(), escuelas::error::EscuelasError>(())
//! ```

use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{info, instrument};

use escuelas_dataset::{LoadOutcome, SchoolDataset};

use crate::{
    config::BrowseConfig,
    error::EscuelasError,
    export,
    filter::{self, FilterOutput, FilterState},
    locale::Language,
    map,
    page::{self, Page, PageSize},
};

/// Non-fatal conditions surfaced alongside a browse result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BrowseWarning {
    /// The map path was truncated to the configured cap; the table and
    /// export paths still carry every matching record.
    Truncated { total: usize, cap: usize },
    /// The dataset came from the degraded geojson fallback parse.
    FallbackData,
}

/// Everything the UI needs to redraw after one interaction.
#[derive(Debug, Clone)]
pub struct BrowseView {
    /// Capped result set for the map renderer.
    pub map_set: DataFrame,
    /// Center coordinate for the map view.
    pub map_center: (f64, f64),
    /// Row count of the table path after the search term.
    pub table_rows: usize,
    /// The requested page of the table path.
    pub page: Page,
    pub warnings: Vec<BrowseWarning>,
}

/// The main browser over the schools dataset.
///
/// Holds the immutable dataset and a [`BrowseConfig`]; all methods are
/// read-only, so one browser can serve any number of sequential
/// interactions, and clones can serve parallel sessions sharing the same
/// underlying frame.
///
/// # Examples
///
/// ```rust,no_run
/// use escuelas::{BrowseConfig, FilterState, Language, PageSize, SchoolBrowser};
///
/// let browser = SchoolBrowser::open("schools.parquet")?
///     .with_config(BrowseConfig::builder().language(Language::En).build());
///
/// let filter = FilterState::new().with_state("Oaxaca").with_search("primaria");
/// let view = browser.browse(&filter, PageSize::Fifty, 1)?;
/// # Ok::<(), escuelas::error::EscuelasError>(())
/// ```
#[derive(Clone)]
pub struct SchoolBrowser {
    dataset: SchoolDataset,
    config: BrowseConfig,
}

impl SchoolBrowser {
    /// Browser over the process-wide shared dataset.
    ///
    /// The dataset is loaded on first call and cached for the process
    /// lifetime; a changed file on disk is only picked up after a restart.
    pub fn shared() -> Result<Self, EscuelasError> {
        Ok(Self::from_dataset(SchoolDataset::shared()?.clone()))
    }

    /// Browser over a dataset at an explicit path, bypassing the shared
    /// cache.
    #[instrument(name = "Open school browser", skip_all, level = "info")]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EscuelasError> {
        Ok(Self::from_dataset(SchoolDataset::open(path)?))
    }

    /// Browser over an already-loaded dataset.
    pub fn from_dataset(dataset: SchoolDataset) -> Self {
        Self {
            dataset,
            config: BrowseConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: BrowseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dataset(&self) -> &SchoolDataset {
        &self.dataset
    }

    pub fn config(&self) -> &BrowseConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    /// Options for the state dropdown.
    pub fn states(&self) -> Result<Vec<String>, EscuelasError> {
        filter::state_options(self.dataset.frame()).map_err(From::from)
    }

    /// Options for the municipality dropdown once a state is selected.
    pub fn municipalities(&self, state: &str) -> Result<Vec<String>, EscuelasError> {
        filter::municipality_options(self.dataset.frame(), state).map_err(From::from)
    }

    /// Run the full pipeline for one interaction.
    #[instrument(name = "Browse", skip_all, level = "debug")]
    pub fn browse(
        &self,
        filter_state: &FilterState,
        page_size: PageSize,
        page_number: usize,
    ) -> Result<BrowseView, EscuelasError> {
        let t_browse = std::time::Instant::now();

        let FilterOutput {
            map_set,
            table_set,
            truncated,
        } = filter::apply(self.dataset.frame(), filter_state, self.config.map_point_cap)?;

        let map_center = map::map_center(&map_set)?;
        let table_rows = table_set.height();
        let page = page::paginate(&table_set, page_size, page_number);

        let mut warnings = Vec::new();
        if let Some(warning) = truncated {
            warnings.push(BrowseWarning::Truncated {
                total: warning.total,
                cap: warning.cap,
            });
        }
        if self.dataset.outcome() == LoadOutcome::Fallback {
            warnings.push(BrowseWarning::FallbackData);
        }

        info!(
            map_points = map_set.height(),
            table_rows,
            page = page.page_number,
            elapsed = ?t_browse.elapsed(),
            "Browse pipeline complete"
        );

        Ok(BrowseView {
            map_set,
            map_center,
            table_rows,
            page,
            warnings,
        })
    }

    /// CSV bytes for every record matching the current filters.
    pub fn export_filtered(&self, filter_state: &FilterState) -> Result<Vec<u8>, EscuelasError> {
        let output =
            filter::apply(self.dataset.frame(), filter_state, self.config.map_point_cap)?;
        export::to_csv_bytes(&output.table_set, self.config.language).map_err(From::from)
    }

    /// CSV bytes for a single page of the current filters.
    pub fn export_page(
        &self,
        filter_state: &FilterState,
        page_size: PageSize,
        page_number: usize,
    ) -> Result<Vec<u8>, EscuelasError> {
        let output =
            filter::apply(self.dataset.frame(), filter_state, self.config.map_point_cap)?;
        let page = page::paginate(&output.table_set, page_size, page_number);
        export::to_csv_bytes(&page.rows, self.config.language).map_err(From::from)
    }

    /// Self-contained Leaflet document for the capped map set.
    pub fn render_map_view(&self, filter_state: &FilterState) -> Result<String, EscuelasError> {
        let output =
            filter::apply(self.dataset.frame(), filter_state, self.config.map_point_cap)?;
        let center = map::map_center(&output.map_set)?;
        map::render_map(
            &output.map_set,
            center,
            self.language().translations().click_to_copy,
        )
        .map_err(From::from)
    }
}

#[cfg(test)]
mod tests {
    use escuelas_dataset::{TestDataConfig, test_data::test_frame};

    use super::*;

    fn browser() -> SchoolBrowser {
        let df = test_frame(&TestDataConfig::minimal()).unwrap();
        SchoolBrowser::from_dataset(SchoolDataset::from_frame(df).unwrap())
    }

    #[test]
    fn test_browse_without_filters_shows_everything() {
        let browser = browser();
        let view = browser
            .browse(&FilterState::new(), PageSize::Hundred, 1)
            .unwrap();

        assert_eq!(view.map_set.height(), browser.dataset().len());
        assert_eq!(view.table_rows, browser.dataset().len());
        assert_eq!(view.page.total_pages, 1);
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn test_browse_reports_truncation_warning() {
        let browser =
            browser().with_config(BrowseConfig::builder().map_point_cap(4).build());

        let view = browser
            .browse(&FilterState::new(), PageSize::Fifty, 1)
            .unwrap();

        assert_eq!(view.map_set.height(), 4);
        assert_eq!(view.table_rows, browser.dataset().len());
        assert_eq!(
            view.warnings,
            vec![BrowseWarning::Truncated {
                total: browser.dataset().len(),
                cap: 4
            }]
        );
    }

    #[test]
    fn test_browse_search_does_not_move_the_map() {
        let browser = browser();
        let filter = FilterState::new().with_state("Oaxaca");
        let unsearched = browser.browse(&filter, PageSize::Fifty, 1).unwrap();

        let filter = filter.with_search("benito");
        let searched = browser.browse(&filter, PageSize::Fifty, 1).unwrap();

        assert_eq!(searched.map_set, unsearched.map_set);
        assert_eq!(searched.map_center, unsearched.map_center);
        assert!(searched.table_rows < unsearched.table_rows);
    }

    #[test]
    fn test_empty_result_uses_default_center() {
        let browser = browser();
        let filter = FilterState::new().with_state("Zacatecas");

        let view = browser.browse(&filter, PageSize::Fifty, 1).unwrap();

        assert_eq!(view.map_set.height(), 0);
        assert_eq!(view.map_center, crate::map::DEFAULT_CENTER);
        assert_eq!(view.table_rows, 0);
        assert!(view.page.is_empty());
    }

    #[test]
    fn test_dropdowns_delegate_to_filter() {
        let browser = browser();
        assert_eq!(browser.states().unwrap().len(), 5);
        assert_eq!(browser.municipalities("Jalisco").unwrap().len(), 2);
    }
}
