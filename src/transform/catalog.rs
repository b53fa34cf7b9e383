use crate::load::error::LoadError;
use crate::load::writers::write_jsonl;
use crate::transform::error::TransformError;
use crate::transform::normalize::slugify;
use crate::transform::semtype::EntityType;
use crate::transform::sources::SourceTag;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One typed, de-duplicated catalog entry. Serialized key order is the field
/// order below and must not change: the catalog file is consumed byte-wise by
/// downstream tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Concept {
    pub kg_id: String,
    pub cui: String,
    pub entity_type: EntityType,
    pub canonical_name: String,
    pub synonyms: BTreeSet<String>,
    pub sources: BTreeSet<SourceTag>,
}

/// The stable identifier for a concept: `{type}_{slug}` for typed entities,
/// `umls_{cui}` otherwise. Once assigned within a build it never changes,
/// even when a later preferred row replaces the canonical name.
pub fn kg_id_for(cui: &str, canonical: &str, entity_type: EntityType) -> String {
    if entity_type.is_typed() {
        format!("{entity_type}_{}", slugify(canonical))
    } else {
        format!("umls_{}", cui.to_lowercase())
    }
}

/// What [`Catalog::observe_umls_surface`] did with a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    /// A distinct CUI slugged to an already-taken `kg_id`; the new concept
    /// fell back to its `umls_{cui}` identifier to keep both ids unique.
    CreatedWithFallbackId,
    Updated,
}

/// The entity catalog under construction (or reloaded from disk).
///
/// Concepts are keyed by `kg_id` in a `BTreeMap`, so iteration — and
/// therefore emission — is always in sorted `kg_id` order.
#[derive(Debug, Default)]
pub struct Catalog {
    concepts: BTreeMap<String, Concept>,
    cui_to_kg: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Folds one English MRCONSO surface into the catalog.
    ///
    /// The first surface seen for a CUI fixes its `kg_id` and becomes the
    /// initial canonical name; a later row flagged preferred replaces the
    /// canonical name only. Every surface joins the synonym set.
    pub fn observe_umls_surface(
        &mut self,
        cui: &str,
        surface: &str,
        is_pref: bool,
        entity_type: EntityType,
    ) -> UpsertOutcome {
        if let Some(kg_id) = self.cui_to_kg.get(cui) {
            if let Some(concept) = self.concepts.get_mut(kg_id) {
                if is_pref {
                    concept.canonical_name = surface.to_string();
                }
                concept.synonyms.insert(surface.to_string());
            }
            return UpsertOutcome::Updated;
        }

        let mut kg_id = kg_id_for(cui, surface, entity_type);
        let mut outcome = UpsertOutcome::Created;
        if self.concepts.contains_key(&kg_id) {
            kg_id = format!("umls_{}", cui.to_lowercase());
            outcome = UpsertOutcome::CreatedWithFallbackId;
        }
        self.concepts.insert(
            kg_id.clone(),
            Concept {
                kg_id: kg_id.clone(),
                cui: cui.to_string(),
                entity_type,
                canonical_name: surface.to_string(),
                synonyms: BTreeSet::from([surface.to_string()]),
                sources: BTreeSet::from([SourceTag::Umls]),
            },
        );
        self.cui_to_kg.insert(cui.to_string(), kg_id);
        outcome
    }

    /// Adds an externally-sourced name to a concept's synonym set and tags
    /// the source. The caller is responsible for the single-target rule.
    pub fn attach_synonym(&mut self, kg_id: &str, name: &str, source: SourceTag) -> bool {
        match self.concepts.get_mut(kg_id) {
            Some(concept) => {
                concept.synonyms.insert(name.to_string());
                concept.sources.insert(source);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn get(&self, kg_id: &str) -> Option<&Concept> {
        self.concepts.get(kg_id)
    }

    pub fn kg_for_cui(&self, cui: &str) -> Option<&str> {
        self.cui_to_kg.get(cui).map(String::as_str)
    }

    pub fn entity_type_of(&self, kg_id: &str) -> Option<EntityType> {
        self.concepts.get(kg_id).map(|c| c.entity_type)
    }

    /// Concepts in sorted `kg_id` order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// Writes `entity_catalog.jsonl`: one concept per line, sorted by
    /// `kg_id`, fixed key order, non-ASCII preserved. Returns rows written.
    pub fn write_jsonl(&self, path: &Path) -> Result<u64, LoadError> {
        write_jsonl(path, self.concepts.values())
    }

    /// Reloads a catalog written by [`Catalog::write_jsonl`]. Blank lines are
    /// tolerated; anything else malformed is an error.
    pub fn load_jsonl(path: &Path) -> Result<Catalog, TransformError> {
        let file = File::open(path).map_err(|source| TransformError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut catalog = Catalog::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| TransformError::CatalogRead {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let concept: Concept =
                serde_json::from_str(&line).map_err(|source| TransformError::CatalogParse {
                    path: path.to_path_buf(),
                    source,
                })?;
            catalog
                .cui_to_kg
                .insert(concept.cui.clone(), concept.kg_id.clone());
            catalog.concepts.insert(concept.kg_id.clone(), concept);
        }
        Ok(catalog)
    }
}
