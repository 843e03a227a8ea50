use thiserror::Error;

#[derive(Error, Debug)]
pub enum EscuelasError {
    #[error("Filter error: {0}")]
    Filter(#[from] crate::filter::FilterError),
    #[error("Pagination error: {0}")]
    Page(#[from] crate::page::PageError),
    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),
    #[error("Map render error: {0}")]
    Map(#[from] crate::map::MapError),
    #[error("Dataset error: {0}")]
    Dataset(#[from] escuelas_dataset::DataError),
    #[error("DataFrame error: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EscuelasError>;
