//! Hierarchical filtering and free-text search over the schools frame.
//!
//! Filtering runs in two stages. The hierarchical stage (state, then
//! municipality) feeds both the map and the table; the search stage
//! narrows the table and export path only, so typing in the search box
//! never changes what the map shows.

use polars::prelude::*;
use tracing::warn;

use escuelas_dataset::schema;
use itertools::Itertools;

pub use error::FilterError;
mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum FilterError {
        #[error("DataFrame error: {0}")]
        DataFrame(#[from] polars::prelude::PolarsError),
    }
    pub type Result<T> = std::result::Result<T, FilterError>;
}
use error::Result;

/// Hard maximum number of points handed to the map renderer.
pub const MAP_POINT_CAP: usize = 10_000;

/// User-selected filter tuple: state, municipality within it, search term.
///
/// The municipality is only meaningful while a state is selected; selecting
/// a different state resets it. All constructors keep that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterState {
    state: Option<String>,
    municipality: Option<String>,
    search: Option<String>,
}

impl FilterState {
    /// No filters: the whole dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a state. Always resets the municipality, because the set of
    /// selectable municipalities depends on the state.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self.municipality = None;
        self
    }

    /// Back to "all states". The municipality goes with it.
    pub fn clear_state(mut self) -> Self {
        self.state = None;
        self.municipality = None;
        self
    }

    /// Narrow to a municipality within the selected state. Ignored while no
    /// state is selected — the dropdown is disabled in that case.
    pub fn with_municipality(mut self, municipality: impl Into<String>) -> Self {
        if self.state.is_some() {
            self.municipality = Some(municipality.into());
        }
        self
    }

    pub fn clear_municipality(mut self) -> Self {
        self.municipality = None;
        self
    }

    /// Set the free-text search term for the table path.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn municipality(&self) -> Option<&str> {
        self.municipality.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// Raised when the hierarchical result overflows the map cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationWarning {
    /// Rows the hierarchical filter actually matched.
    pub total: usize,
    pub cap: usize,
}

/// Both result sets of one pipeline run.
#[derive(Debug, Clone)]
pub struct FilterOutput {
    /// Hierarchical result, truncated to the cap. Never affected by search.
    pub map_set: DataFrame,
    /// Hierarchical result narrowed by the search term. Never capped.
    pub table_set: DataFrame,
    pub truncated: Option<TruncationWarning>,
}

/// Apply the state/municipality selection, preserving dataset order.
pub fn hierarchical_filter(df: &DataFrame, filter: &FilterState) -> Result<DataFrame> {
    let Some(state) = filter.state() else {
        return Ok(df.clone());
    };

    let mut predicate = col(schema::STATE).eq(lit(state));
    if let Some(municipality) = filter.municipality() {
        predicate = predicate.and(col(schema::MUNICIPALITY).eq(lit(municipality)));
    }

    df.clone()
        .lazy()
        .filter(predicate)
        .collect()
        .map_err(From::from)
}

/// Case-insensitive substring search across the display columns.
///
/// A row matches when any display column, coerced to text, contains the
/// term. Missing values coerce to the empty string, so they can never match
/// a non-empty term. An empty or whitespace-only term is a no-op.
pub fn search_filter(df: &DataFrame, term: &str) -> Result<DataFrame> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(df.clone());
    }
    let needle = term.to_lowercase();

    let mut mask = column_contains(schema::DISPLAY_COLUMNS[0], &needle);
    for column in &schema::DISPLAY_COLUMNS[1..] {
        mask = mask.or(column_contains(column, &needle));
    }

    df.clone().lazy().filter(mask).collect().map_err(From::from)
}

fn column_contains(column: &str, needle: &str) -> Expr {
    col(column)
        .cast(DataType::String)
        .fill_null(lit(""))
        .str()
        .to_lowercase()
        .str()
        .contains_literal(lit(needle.to_string()))
}

/// Run the full filter pipeline for one interaction.
///
/// Hierarchical filter first; its result is capped for the map path (with a
/// warning when rows were dropped) and searched for the table path. The cap
/// never changes what the table path considers "filtered".
pub fn apply(df: &DataFrame, filter: &FilterState, cap: usize) -> Result<FilterOutput> {
    let hierarchical = hierarchical_filter(df, filter)?;
    let total = hierarchical.height();

    let (map_set, truncated) = if total > cap {
        warn!(total, cap, "Map result truncated for performance");
        (
            hierarchical.head(Some(cap)),
            Some(TruncationWarning { total, cap }),
        )
    } else {
        (hierarchical.clone(), None)
    };

    let table_set = match filter.search() {
        Some(term) => search_filter(&hierarchical, term)?,
        None => hierarchical,
    };

    Ok(FilterOutput {
        map_set,
        table_set,
        truncated,
    })
}

/// Selectable states: sorted distinct non-missing values over the whole
/// dataset.
pub fn state_options(df: &DataFrame) -> Result<Vec<String>> {
    distinct_non_null(df, schema::STATE)
}

/// Selectable municipalities within `state`: sorted distinct non-missing
/// values, restricted to that state.
pub fn municipality_options(df: &DataFrame, state: &str) -> Result<Vec<String>> {
    let within = df
        .clone()
        .lazy()
        .filter(col(schema::STATE).eq(lit(state)))
        .collect()?;
    distinct_non_null(&within, schema::MUNICIPALITY)
}

fn distinct_non_null(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let values = df.column(column)?.str()?;
    Ok(values
        .into_iter()
        .flatten()
        .map(str::to_string)
        .sorted()
        .dedup()
        .collect())
}
