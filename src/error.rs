use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the dataset, reshaping tables or exporting them.
///
/// An empty selection is not an error: the dashboard reports it as
/// [`crate::dashboard::View::NoData`].
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("arrow conversion failed: {0}")]
    Arrow(#[from] arrow2::error::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("table has no column named `{0}`")]
    UnknownColumn(String),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
