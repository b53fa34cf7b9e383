use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("could not read entity catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad entity catalog row in {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("csv error reading edges from {path}: {source}")]
    EdgeRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("edge file {path} is missing required columns")]
    EdgeHeader { path: PathBuf },
}
