use crate::load::error::LoadError;
use crate::stages::error::StageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage {stage} failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: StageError,
    },
    #[error("invalid build configuration: {0}")]
    Config(#[from] validator::ValidationErrors),
    #[error("could not create the output directory: {0}")]
    OutputDir(#[source] std::io::Error),
    #[error("could not digest outputs for the manifest: {0}")]
    Manifest(#[source] std::io::Error),
    #[error("could not write a report: {0}")]
    Report(#[from] LoadError),
}
