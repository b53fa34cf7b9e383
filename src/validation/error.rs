use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(
        "overlay has {count} keys absent from the base dict (examples: {examples:?})"
    )]
    OverlayKeysNotInBase {
        count: usize,
        examples: Vec<String>,
    },
    #[error(
        "overlay intersects base surfaces for {keys} keys ({aliases} overlapping surfaces; examples: {examples:?})"
    )]
    OverlayIntersectsBase {
        keys: usize,
        aliases: usize,
        examples: Vec<String>,
    },
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
