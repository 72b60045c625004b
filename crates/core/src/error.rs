use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or empty tree, negative values, bad canvas dimensions.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to fetch {}: {source}", .path.display())]
    FetchFailure {
        path: PathBuf,
        #[source]
        source: FetchError,
    },

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("not a treemap document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("pdf: {0}")]
    Pdf(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
