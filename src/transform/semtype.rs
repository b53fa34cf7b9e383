use crate::constants::{CHEMICAL_TUIS, DISEASE_TUIS, DRUG_TUIS, GENE_TUIS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display, EnumString};

/// The coarse semantic type of a concept, derived from its UMLS TUI set.
///
/// `Other` exists only during classification; concepts of that type are
/// dropped before the catalog is written.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityType {
    Drug,
    Disease,
    Chemical,
    Gene,
    Other,
}

impl EntityType {
    /// Drug-side of the predicate type gate: drugs and chemicals.
    pub fn is_drug_like(self) -> bool {
        matches!(self, EntityType::Drug | EntityType::Chemical)
    }

    /// Disease-side of the predicate type gate.
    pub fn is_disease_like(self) -> bool {
        matches!(self, EntityType::Disease)
    }

    /// Whether the type earns a `{type}_{slug}` identifier.
    pub fn is_typed(self) -> bool {
        !matches!(self, EntityType::Other)
    }
}

fn intersects(tuis: &BTreeSet<String>, table: &[&str]) -> bool {
    tuis.iter().any(|t| table.contains(&t.as_str()))
}

/// Classifies a CUI's TUI set into exactly one [`EntityType`].
///
/// First match wins, in the order drug, disease, chemical, gene. The order is
/// significant: T109/T110 appear in both the drug and chemical tables and
/// must classify as drug.
pub fn infer_entity_type(tuis: &BTreeSet<String>) -> EntityType {
    if intersects(tuis, DRUG_TUIS) {
        EntityType::Drug
    } else if intersects(tuis, DISEASE_TUIS) {
        EntityType::Disease
    } else if intersects(tuis, CHEMICAL_TUIS) {
        EntityType::Chemical
    } else if intersects(tuis, GENE_TUIS) {
        EntityType::Gene
    } else {
        EntityType::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tuis(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&["T109"], EntityType::Drug)]
    #[case(&["T110"], EntityType::Drug)]
    #[case(&["T047"], EntityType::Disease)]
    #[case(&["T103"], EntityType::Chemical)]
    #[case(&["T028"], EntityType::Gene)]
    #[case(&["T999"], EntityType::Other)]
    #[case(&[], EntityType::Other)]
    fn single_tui(#[case] input: &[&str], #[case] expected: EntityType) {
        assert_eq!(infer_entity_type(&tuis(input)), expected);
    }

    #[rstest]
    fn drug_wins_over_chemical_on_overlap() {
        // T109 is in both tables; priority order keeps it a drug.
        assert_eq!(infer_entity_type(&tuis(&["T109", "T103"])), EntityType::Drug);
    }

    #[rstest]
    fn disease_wins_over_gene() {
        assert_eq!(
            infer_entity_type(&tuis(&["T028", "T047"])),
            EntityType::Disease
        );
    }

    #[rstest]
    fn string_forms_round_trip() {
        assert_eq!(EntityType::Drug.to_string(), "drug");
        assert_eq!("disease".parse::<EntityType>().unwrap(), EntityType::Disease);
    }
}
