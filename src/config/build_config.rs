use crate::constants::DEFAULT_PROGRESS_EVERY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

fn default_out_root() -> PathBuf {
    PathBuf::from("data_processed/biokg")
}

fn default_progress_every() -> u64 {
    DEFAULT_PROGRESS_EVERY
}

/// Build parameters for one pipeline run.
///
/// `raw_root` must contain the `UMLS/`, `RxNorm/`, `Mesh/`, `DrugBank/`,
/// `SIDER/` and `CTD/` source directories; artifacts land under
/// `out_root/<version>/`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct BuildConfig {
    pub raw_root: PathBuf,
    #[serde(default = "default_out_root")]
    pub out_root: PathBuf,
    /// Version label naming the artifact directory, e.g. `v1`.
    #[validate(length(min = 1, message = "version label must not be empty"))]
    pub version: String,
    /// Reader progress-log interval in lines; 0 disables progress logging.
    #[serde(default = "default_progress_every")]
    pub progress_every: u64,
    /// Permit overlay keys that are absent from the base dictionary.
    #[serde(default)]
    pub allow_overlay_new_keys: bool,
}
