use crate::transform::semtype::EntityType;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The fixed canonical predicate set. The relation vocabulary of every source
/// is reconciled to these five; anything unmappable is dropped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Predicate {
    Treats,
    AdverseEffect,
    ContraindicatedFor,
    InteractsWith,
    AssociatedWith,
}

/// Maps an MRREL `(REL, RELA)` pair to a canonical predicate.
///
/// The specific RELA string is consulted first (falling back to REL when RELA
/// is empty); the coarse REL classes RO/RQ only map when no specific rule
/// matched. Returns `None` for relations outside the predicate set.
pub fn map_relation(rel: &str, rela: &str) -> Option<Predicate> {
    let specific = if rela.trim().is_empty() { rel } else { rela };
    let r = specific.trim().to_lowercase();
    match r.as_str() {
        "may_treat" | "treats" | "treated_by" | "treatment_of" => Some(Predicate::Treats),
        "causes" | "induces" | "adverse_effect_of" => Some(Predicate::AdverseEffect),
        "contraindicated_with_disease" | "contraindicated_with" => {
            Some(Predicate::ContraindicatedFor)
        }
        "interacts_with" | "ddi" | "drug_interaction" => Some(Predicate::InteractsWith),
        _ => match rel.trim().to_uppercase().as_str() {
            "RO" | "RQ" => Some(Predicate::AssociatedWith),
            _ => None,
        },
    }
}

/// Maps a CTD direct-evidence string (already lowercased by the reader) to a
/// predicate: therapeutic evidence means TREATS, everything else is an
/// association.
pub fn map_ctd_evidence(direct_evidence: &str) -> Predicate {
    if direct_evidence.contains("therapeutic") {
        Predicate::Treats
    } else {
        Predicate::AssociatedWith
    }
}

/// The per-predicate type contract applied to every candidate triple.
///
/// TREATS, ADVERSE_EFFECT and CONTRAINDICATED_FOR require (drug-like,
/// disease); INTERACTS_WITH requires drug-like on both sides;
/// ASSOCIATED_WITH accepts any pair.
pub fn passes_type_gate(predicate: Predicate, head: EntityType, tail: EntityType) -> bool {
    match predicate {
        Predicate::Treats | Predicate::AdverseEffect | Predicate::ContraindicatedFor => {
            head.is_drug_like() && tail.is_disease_like()
        }
        Predicate::InteractsWith => head.is_drug_like() && tail.is_drug_like(),
        Predicate::AssociatedWith => true,
    }
}
