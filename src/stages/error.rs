use crate::extract::error::ExtractError;
use crate::load::error::LoadError;
use crate::transform::error::TransformError;
use crate::validation::error::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

fn list_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("missing required input files:\n{}", list_paths(.0))]
    MissingInputs(Vec<PathBuf>),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
