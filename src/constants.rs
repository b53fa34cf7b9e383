//! Fixed tables the pipeline is parameterized by. These are configuration,
//! not state: the TUI sets drive the semantic type classifier and the scores
//! are the per-source defaults attached to extracted edges.

/// UMLS semantic types classified as drugs.
pub const DRUG_TUIS: &[&str] = &[
    "T109", "T110", "T116", "T121", "T126", "T129", "T130", "T195", "T200",
];

/// UMLS semantic types classified as diseases.
pub const DISEASE_TUIS: &[&str] = &["T047", "T048", "T184", "T191"];

/// UMLS semantic types classified as chemicals. Overlaps with [`DRUG_TUIS`];
/// the classifier's priority order resolves the overlap in favor of drug.
pub const CHEMICAL_TUIS: &[&str] = &[
    "T103", "T104", "T109", "T110", "T111", "T114", "T115", "T116", "T196",
];

/// UMLS semantic types classified as genes.
pub const GENE_TUIS: &[&str] = &["T028", "T085", "T086", "T087", "T088"];

/// Score attached to edges extracted from UMLS MRREL.
pub const UMLS_EDGE_SCORE: f64 = 1.0;

/// Score attached to SIDER adverse-effect edges.
pub const SIDER_EDGE_SCORE: f64 = 0.9;

/// Fallback score for CTD rows without a parseable inference score.
pub const CTD_DEFAULT_SCORE: f64 = 0.75;

/// Names shorter than this (after trimming) are never attached as synonyms.
pub const MIN_SYNONYM_LEN: usize = 2;

/// Default interval for reader progress logging, in lines.
pub const DEFAULT_PROGRESS_EVERY: u64 = 500_000;

/// RxNorm term types whose names are eligible for synonym enrichment.
pub const RXNORM_ENRICH_TTYS: &[&str] = &["IN", "BN", "PIN"];

/// The MeSH descriptor file expected under `Mesh/` in the raw root.
pub const MESH_DESCRIPTOR_FILE: &str = "desc2025.xml";

/// The DrugBank XML namespace. Elements outside it are ignored.
pub const DRUGBANK_NS: &str = "http://www.drugbank.ca";
