use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Tag identifying which upstream source contributed a concept name or edge.
///
/// Variant order matches the lexicographic order of the serialized tags, so
/// `BTreeSet<SourceTag>` iterates exactly as the sorted string forms do.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
pub enum SourceTag {
    #[serde(rename = "CTD")]
    #[strum(serialize = "CTD")]
    Ctd,
    #[serde(rename = "DrugBank")]
    #[strum(serialize = "DrugBank")]
    DrugBank,
    #[serde(rename = "MeSH")]
    #[strum(serialize = "MeSH")]
    Mesh,
    #[serde(rename = "RxNorm")]
    #[strum(serialize = "RxNorm")]
    RxNorm,
    #[serde(rename = "SIDER")]
    #[strum(serialize = "SIDER")]
    Sider,
    #[serde(rename = "UMLS")]
    #[strum(serialize = "UMLS")]
    Umls,
}
