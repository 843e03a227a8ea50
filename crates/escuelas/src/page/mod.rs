//! Pure pagination over a filtered result set.

use polars::prelude::DataFrame;

pub use error::PageError;
mod error {
    use thiserror::Error;

    #[derive(Error, Debug, PartialEq, Eq)]
    pub enum PageError {
        #[error("Invalid page size {0}, allowed values are 50, 100, 200 and 500")]
        InvalidPageSize(usize),
    }
}

/// Allowed page sizes for the table view.
///
/// Any other row count is rejected at the boundary via `TryFrom<usize>`;
/// the pipeline itself only ever sees a valid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSize {
    Fifty,
    Hundred,
    TwoHundred,
    FiveHundred,
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Hundred
    }
}

impl PageSize {
    pub const ALLOWED: [usize; 4] = [50, 100, 200, 500];

    pub const fn rows(self) -> usize {
        match self {
            Self::Fifty => 50,
            Self::Hundred => 100,
            Self::TwoHundred => 200,
            Self::FiveHundred => 500,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PageError;

    fn try_from(value: usize) -> Result<Self, PageError> {
        match value {
            50 => Ok(Self::Fifty),
            100 => Ok(Self::Hundred),
            200 => Ok(Self::TwoHundred),
            500 => Ok(Self::FiveHundred),
            other => Err(PageError::InvalidPageSize(other)),
        }
    }
}

/// One page of a result set, with enough context to render the pager.
#[derive(Debug, Clone)]
pub struct Page {
    pub rows: DataFrame,
    /// 1-based, already clamped to `[1, total_pages]`.
    pub page_number: usize,
    pub total_pages: usize,
    pub page_size: PageSize,
    /// Row count of the full result set this page was cut from.
    pub total_rows: usize,
}

impl Page {
    /// Offset of the first row of this page within the result set.
    pub fn start(&self) -> usize {
        (self.page_number - 1) * self.page_size.rows()
    }

    pub fn len(&self) -> usize {
        self.rows.height()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.height() == 0
    }
}

/// Slice `df` into the requested page.
///
/// Pure function of its inputs: identical arguments always produce an
/// identical page, so UI re-renders can call it repeatedly. Out-of-range
/// page numbers are clamped to the nearest valid page instead of failing;
/// an empty frame yields a single empty page.
pub fn paginate(df: &DataFrame, page_size: PageSize, page_number: usize) -> Page {
    let total_rows = df.height();
    let size = page_size.rows();
    let total_pages = total_rows.div_ceil(size).max(1);
    let page_number = page_number.clamp(1, total_pages);

    let start = (page_number - 1) * size;
    let len = size.min(total_rows.saturating_sub(start));

    Page {
        rows: df.slice(start as i64, len),
        page_number,
        total_pages,
        page_size,
        total_rows,
    }
}
