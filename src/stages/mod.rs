pub mod catalog_stage;
pub mod ctd_edges_stage;
pub mod dict_stage;
pub mod error;
pub mod merge_stage;
pub mod sider_edges_stage;
pub mod umls_edges_stage;

pub use self::catalog_stage::CatalogStage;
pub use self::ctd_edges_stage::CtdEdgesStage;
pub use self::dict_stage::DictStage;
pub use self::error::StageError;
pub use self::merge_stage::MergeStage;
pub use self::sider_edges_stage::SiderEdgesStage;
pub use self::umls_edges_stage::UmlsEdgesStage;

use crate::config::build_config::BuildConfig;
use crate::constants::MESH_DESCRIPTOR_FILE;
use crate::extract::ctd::resolve_ctd_path;
use crate::report::stage_report::StageReport;
use crate::transform::edges::sider::resolve_meddra_path;
use std::path::PathBuf;

/// Everything a stage needs to locate its inputs and outputs: the raw source
/// tree, the versioned artifact directory, and the build knobs. Stages share
/// nothing else — they communicate through the files in `out_dir` only.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub raw_root: PathBuf,
    pub out_dir: PathBuf,
    pub version: String,
    pub progress_every: u64,
    pub allow_overlay_new_keys: bool,
}

impl BuildContext {
    pub fn from_config(config: &BuildConfig) -> Self {
        BuildContext {
            raw_root: config.raw_root.clone(),
            out_dir: config.out_root.join(&config.version),
            version: config.version.clone(),
            progress_every: config.progress_every,
            allow_overlay_new_keys: config.allow_overlay_new_keys,
        }
    }

    // raw inputs

    pub fn mrconso(&self) -> PathBuf {
        self.raw_root.join("UMLS").join("MRCONSO.RRF")
    }

    pub fn mrsty(&self) -> PathBuf {
        self.raw_root.join("UMLS").join("MRSTY.RRF")
    }

    pub fn mrrel(&self) -> PathBuf {
        self.raw_root.join("UMLS").join("MRREL.RRF")
    }

    pub fn rxnconso(&self) -> PathBuf {
        self.raw_root.join("RxNorm").join("RXNCONSO.RRF")
    }

    pub fn mesh_xml(&self) -> PathBuf {
        self.raw_root.join("Mesh").join(MESH_DESCRIPTOR_FILE)
    }

    pub fn drugbank_xml(&self) -> PathBuf {
        self.raw_root.join("DrugBank").join("drugbank.xml")
    }

    pub fn sider_drug_names(&self) -> PathBuf {
        self.raw_root.join("SIDER").join("drug_names.tsv")
    }

    pub fn sider_meddra(&self) -> PathBuf {
        resolve_meddra_path(&self.raw_root)
    }

    pub fn ctd_chemicals_diseases(&self) -> PathBuf {
        resolve_ctd_path(&self.raw_root)
    }

    // artifacts

    pub fn entity_catalog(&self) -> PathBuf {
        self.out_dir.join("entity_catalog.jsonl")
    }

    pub fn edges_umls(&self) -> PathBuf {
        self.out_dir.join("kg_edges.umls.csv")
    }

    pub fn edges_sider(&self) -> PathBuf {
        self.out_dir.join("kg_edges.sider.csv")
    }

    pub fn edges_ctd(&self) -> PathBuf {
        self.out_dir.join("kg_edges.ctd.csv")
    }

    pub fn edges_merged(&self) -> PathBuf {
        self.out_dir.join("kg_edges.merged.csv")
    }

    pub fn edges_merged_plus(&self) -> PathBuf {
        self.out_dir.join("kg_edges.merged.plus.csv")
    }

    /// The base dictionary. The `.txt` name is historical and load-bearing
    /// for downstream consumers; the content is JSON.
    pub fn umls_dict(&self) -> PathBuf {
        self.out_dir.join("umls_dict.txt")
    }

    pub fn umls_dict_overlay(&self) -> PathBuf {
        self.out_dir.join("umls_dict.overlay.json")
    }

    /// `stage_NN_report.json`, derived from the numeric stage-id prefix.
    pub fn stage_report_path(&self, stage_id: &str) -> PathBuf {
        let number: String = stage_id.chars().take_while(char::is_ascii_digit).collect();
        self.out_dir.join(format!("stage_{number}_report.json"))
    }

    pub fn build_manifest_path(&self) -> PathBuf {
        self.out_dir.join("build_manifest.json")
    }

    /// Every artifact the manifest digests, in a fixed order.
    pub fn tracked_outputs(&self) -> Vec<PathBuf> {
        vec![
            self.entity_catalog(),
            self.edges_umls(),
            self.edges_sider(),
            self.edges_ctd(),
            self.edges_merged(),
            self.edges_merged_plus(),
            self.umls_dict(),
            self.umls_dict_overlay(),
        ]
    }
}

/// One build stage: a pure function of its declared inputs and the version
/// label, writing its outputs atomically and returning a [`StageReport`].
pub trait Stage {
    /// Stable stage identifier, e.g. `01_build_entity_catalog`.
    fn id(&self) -> &'static str;

    /// Inputs whose absence must abort before any work starts.
    fn required_inputs(&self, ctx: &BuildContext) -> Vec<PathBuf>;

    fn run(&self, ctx: &BuildContext) -> Result<StageReport, StageError>;
}

/// Up-front existence check for a stage's declared inputs. Partial files
/// from a cancelled run never exist (stages write via temp-and-rename), so
/// existence is sufficient.
pub fn ensure_files(paths: &[PathBuf]) -> Result<(), StageError> {
    let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.exists()).cloned().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(StageError::MissingInputs(missing))
    }
}
