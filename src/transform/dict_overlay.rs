use crate::extract::error::ExtractError;
use crate::extract::line_reader::FieldReader;
use crate::report::stage_report::Counters;
use crate::transform::catalog::Catalog;
use std::collections::{BTreeMap, BTreeSet};

/// The two-tier synonym dictionary: `base` is reproducible from UMLS alone
/// (MRCONSO English surfaces plus the catalog canonical), `overlay` holds
/// only the enriched names absent from base. Keeping them apart lets the
/// base stay byte-stable while enrichment sources evolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictOverlay {
    pub base: BTreeMap<String, Vec<String>>,
    pub overlay: BTreeMap<String, Vec<String>>,
}

/// Case-insensitive sort with the raw string as tiebreak, so surfaces
/// differing only in case order deterministically.
pub fn casefold_sorted(surfaces: &BTreeSet<String>) -> Vec<String> {
    let mut sorted: Vec<String> = surfaces.iter().cloned().collect();
    sorted.sort_by_key(|s| (s.to_lowercase(), s.clone()));
    sorted
}

/// Builds the base dictionary and overlay from the catalog and a fresh
/// MRCONSO pass.
///
/// Base surfaces per concept: every English MRCONSO string of the concept's
/// CUI, plus the canonical name. Overlay per concept: catalog synonyms not
/// in base, omitted when empty.
pub fn build_dicts(
    catalog: &Catalog,
    mrconso: &mut FieldReader,
    counters: &mut Counters,
) -> Result<DictOverlay, ExtractError> {
    let mut base_sets: BTreeMap<String, BTreeSet<String>> = catalog
        .concepts()
        .map(|c| (c.kg_id.clone(), BTreeSet::new()))
        .collect();
    counters.set("entities_with_cui", base_sets.len() as u64);

    while let Some(fields) = mrconso.next_row()? {
        counters.bump("mrconso_rows_seen");
        if fields.len() < 15 {
            counters.bump("mrconso_short_rows");
            continue;
        }
        let cui = fields[0].trim().to_uppercase();
        let lat = fields[1].trim().to_uppercase();
        let text = fields[14].trim();
        if cui.is_empty() || text.is_empty() || lat != "ENG" {
            continue;
        }
        let Some(kg_id) = catalog.kg_for_cui(&cui) else {
            continue;
        };
        if let Some(set) = base_sets.get_mut(kg_id) {
            set.insert(text.to_string());
            counters.bump("mrconso_english_rows_mapped");
        }
    }

    for concept in catalog.concepts() {
        if !concept.canonical_name.is_empty() {
            if let Some(set) = base_sets.get_mut(&concept.kg_id) {
                set.insert(concept.canonical_name.clone());
            }
        }
    }

    let mut dicts = DictOverlay::default();
    for (kg_id, base_set) in &base_sets {
        if !base_set.is_empty() {
            let sorted = casefold_sorted(base_set);
            counters.add("total_base_synonyms", sorted.len() as u64);
            dicts.base.insert(kg_id.clone(), sorted);
        }
        if let Some(concept) = catalog.get(kg_id) {
            let extra: BTreeSet<String> = concept.synonyms.difference(base_set).cloned().collect();
            if !extra.is_empty() {
                let sorted = casefold_sorted(&extra);
                counters.add("total_overlay_synonyms", sorted.len() as u64);
                dicts.overlay.insert(kg_id.clone(), sorted);
            }
        }
    }
    counters.set("overlay_keys", dicts.overlay.len() as u64);
    Ok(dicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::semtype::EntityType;
    use crate::transform::sources::SourceTag;
    use pretty_assertions::assert_eq;

    #[test]
    fn casefold_sort_orders_case_insensitively_with_stable_ties() {
        let set = BTreeSet::from([
            "beta".to_string(),
            "Alpha".to_string(),
            "alpha".to_string(),
            "ALPHA".to_string(),
        ]);
        assert_eq!(casefold_sorted(&set), vec!["ALPHA", "Alpha", "alpha", "beta"]);
    }

    fn mrconso_reader(dir: &tempfile::TempDir, body: &str) -> FieldReader {
        let path = dir.path().join("MRCONSO.RRF");
        std::fs::write(&path, body).unwrap();
        FieldReader::rrf(&path, 0).unwrap()
    }

    #[test]
    fn overlay_holds_only_enriched_names() {
        let mut catalog = Catalog::new();
        catalog.observe_umls_surface("C1", "Aspirin", false, EntityType::Drug);
        // enriched name, never present in MRCONSO
        catalog.attach_synonym("drug_aspirin", "Acetosal", SourceTag::DrugBank);

        let dir = tempfile::tempdir().unwrap();
        let mut mrconso = mrconso_reader(
            &dir,
            "C1|ENG|P|L1|PF|S1|Y|A1|SA1||||RXNORM|IN|Aspirin|0|N||\n\
             C1|ENG|S|L2|VO|S2|N|A2|SA2||||MSH|SY|ASA tablet|0|N||\n\
             C1|FRE|S|L3|VO|S3|N|A3|SA3||||MSHFRE|SY|Aspirine|0|N||\n",
        );
        let mut counters = Counters::new();
        let dicts = build_dicts(&catalog, &mut mrconso, &mut counters).unwrap();

        assert_eq!(
            dicts.base["drug_aspirin"],
            vec!["ASA tablet".to_string(), "Aspirin".to_string()]
        );
        assert_eq!(dicts.overlay["drug_aspirin"], vec!["Acetosal".to_string()]);
        assert_eq!(counters.get("mrconso_english_rows_mapped"), 2);
        assert_eq!(counters.get("total_base_synonyms"), 2);
        assert_eq!(counters.get("total_overlay_synonyms"), 1);
    }

    #[test]
    fn concepts_with_no_extra_names_have_no_overlay_entry() {
        let mut catalog = Catalog::new();
        catalog.observe_umls_surface("C1", "Aspirin", false, EntityType::Drug);

        let dir = tempfile::tempdir().unwrap();
        let mut mrconso = mrconso_reader(
            &dir,
            "C1|ENG|P|L1|PF|S1|Y|A1|SA1||||RXNORM|IN|Aspirin|0|N||\n",
        );
        let mut counters = Counters::new();
        let dicts = build_dicts(&catalog, &mut mrconso, &mut counters).unwrap();

        assert!(dicts.overlay.is_empty());
        assert_eq!(counters.get("overlay_keys"), 0);
    }

    #[test]
    fn canonical_name_lands_in_base_even_without_mrconso_row() {
        // canonical replaced by a preferred row that MRCONSO no longer carries
        let mut catalog = Catalog::new();
        catalog.observe_umls_surface("C1", "Aspirin", false, EntityType::Drug);
        catalog.observe_umls_surface("C1", "Acetylsalicylic Acid", true, EntityType::Drug);

        let dir = tempfile::tempdir().unwrap();
        let mut mrconso = mrconso_reader(
            &dir,
            "C1|ENG|P|L1|PF|S1|N|A1|SA1||||RXNORM|IN|Aspirin|0|N||\n",
        );
        let mut counters = Counters::new();
        let dicts = build_dicts(&catalog, &mut mrconso, &mut counters).unwrap();

        assert!(
            dicts.base["drug_aspirin"].contains(&"Acetylsalicylic Acid".to_string()),
            "canonical must be in base"
        );
    }
}
