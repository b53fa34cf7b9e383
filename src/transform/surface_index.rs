use crate::transform::catalog::Catalog;
use crate::transform::normalize::normalize_surface;
use crate::transform::semtype::EntityType;
use std::collections::{BTreeSet, HashMap};

/// Ephemeral index from normalized surface to the set of `kg_id`s carrying
/// that surface as a synonym.
///
/// A surface owned by more than one concept is ambiguous and unusable for
/// linking external names; [`SurfaceIndex::sole_target`] encodes that rule.
/// The index is built once per stage and never updated afterwards, so names
/// attached during enrichment cannot act as anchors in the same run.
#[derive(Debug, Default)]
pub struct SurfaceIndex {
    map: HashMap<String, BTreeSet<String>>,
}

impl SurfaceIndex {
    /// Indexes every synonym of every concept.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self::from_catalog_filtered(catalog, |_| true)
    }

    /// Indexes only concepts whose entity type passes `keep`.
    pub fn from_catalog_filtered(catalog: &Catalog, keep: impl Fn(EntityType) -> bool) -> Self {
        let mut index = SurfaceIndex::default();
        for concept in catalog.concepts() {
            if !keep(concept.entity_type) {
                continue;
            }
            for synonym in &concept.synonyms {
                index
                    .map
                    .entry(normalize_surface(synonym))
                    .or_default()
                    .insert(concept.kg_id.clone());
            }
        }
        index
    }

    /// All owners of an already-normalized surface.
    pub fn get(&self, normalized: &str) -> Option<&BTreeSet<String>> {
        self.map.get(normalized)
    }

    /// The single owner of an already-normalized surface, or `None` when the
    /// surface is unknown or ambiguous.
    pub fn sole_target(&self, normalized: &str) -> Option<&str> {
        match self.map.get(normalized) {
            Some(hits) if hits.len() == 1 => hits.iter().next().map(String::as_str),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.observe_umls_surface("C1", "Aspirin", false, EntityType::Drug);
        catalog.observe_umls_surface("C2", "Paracetamol", false, EntityType::Drug);
        catalog.observe_umls_surface("C3", "Paracetamol Something", false, EntityType::Drug);
        catalog.observe_umls_surface("C3", "Paracetamol", false, EntityType::Drug);
        catalog.observe_umls_surface("C4", "Hemorrhage", false, EntityType::Disease);
        catalog
    }

    #[test]
    fn surfaces_map_to_all_owners() {
        let index = SurfaceIndex::from_catalog(&sample_catalog());
        assert_eq!(index.get("paracetamol").unwrap().len(), 2);
        assert_eq!(index.get("aspirin").unwrap().len(), 1);
        assert!(index.get("unknown surface").is_none());
    }

    #[test]
    fn sole_target_rejects_ambiguous_surfaces() {
        let index = SurfaceIndex::from_catalog(&sample_catalog());
        assert_eq!(index.sole_target("aspirin"), Some("drug_aspirin"));
        assert_eq!(index.sole_target("paracetamol"), None);
        assert_eq!(index.sole_target("nope"), None);
    }

    #[test]
    fn type_filter_restricts_owners() {
        let catalog = sample_catalog();
        let diseases = SurfaceIndex::from_catalog_filtered(&catalog, |t| t.is_disease_like());
        assert!(diseases.get("aspirin").is_none());
        assert_eq!(diseases.sole_target("hemorrhage"), Some("disease_hemorrhage"));
    }
}
