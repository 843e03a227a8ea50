//! Process-lifetime dataset resource.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use polars::prelude::*;
use tracing::{info, instrument};

use crate::{
    Result,
    loader::{self, LoadOutcome},
    schema,
};

static SHARED: OnceCell<SchoolDataset> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct DatasetMetadata {
    pub source: PathBuf,
    pub rows: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Immutable, load-once view of the schools dataset.
///
/// The shared instance is initialized on first use and never invalidated:
/// picking up a changed file on disk requires a process restart. Cloning is
/// cheap (the frame's column buffers are shared), so parallel sessions can
/// each hold a clone while the underlying data stays single-copy.
#[derive(Clone)]
pub struct SchoolDataset {
    frame: DataFrame,
    outcome: LoadOutcome,
    metadata: DatasetMetadata,
}

impl SchoolDataset {
    /// Load the dataset from an explicit path, bypassing the shared cache.
    #[instrument(name = "Open schools dataset", skip_all, level = "info")]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let t_open = std::time::Instant::now();

        let (frame, outcome) = loader::load_dataset(path)?;
        let metadata = DatasetMetadata {
            source: path.to_path_buf(),
            rows: frame.height(),
            loaded_at: chrono::Utc::now(),
        };

        info!(
            rows = metadata.rows,
            outcome = ?outcome,
            elapsed = ?t_open.elapsed(),
            "Dataset ready"
        );

        Ok(Self {
            frame,
            outcome,
            metadata,
        })
    }

    /// Wrap an already-built frame, for tests and embedders that assemble
    /// their own data.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        schema::validate_columns(&frame)?;
        let metadata = DatasetMetadata {
            source: PathBuf::from("<memory>"),
            rows: frame.height(),
            loaded_at: chrono::Utc::now(),
        };
        Ok(Self {
            frame,
            outcome: LoadOutcome::Primary,
            metadata,
        })
    }

    /// Process-lifetime shared instance.
    ///
    /// Loaded from [`crate::dataset_path`] on first call and cached for the
    /// rest of the process; the cache is written exactly once and is safe to
    /// read from any thread.
    pub fn shared() -> Result<&'static Self> {
        SHARED.get_or_try_init(|| Self::open(crate::dataset_path()))
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn outcome(&self) -> LoadOutcome {
        self.outcome
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}
