use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not persist temporary file to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
