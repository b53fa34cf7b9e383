use crate::constants::SIDER_EDGE_SCORE;
use crate::extract::error::ExtractError;
use crate::extract::line_reader::FieldReader;
use crate::report::stage_report::Counters;
use crate::transform::catalog::Catalog;
use crate::transform::edges::{Edge, EdgeSet};
use crate::transform::normalize::normalize_surface;
use crate::transform::relation::Predicate;
use crate::transform::sources::SourceTag;
use crate::transform::surface_index::SurfaceIndex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loads the SIDER STITCH-id → drug-name table.
pub fn load_stitch_names(
    reader: &mut FieldReader,
    counters: &mut Counters,
) -> Result<HashMap<String, String>, ExtractError> {
    let mut names = HashMap::new();
    while let Some(fields) = reader.next_row()? {
        counters.bump("drug_names_rows");
        if fields.len() < 2 {
            counters.bump("drug_names_short_rows");
            continue;
        }
        names.insert(fields[0].trim().to_string(), fields[1].trim().to_string());
    }
    Ok(names)
}

/// Streams `meddra_all_se.tsv` and produces ADVERSE_EFFECT edges.
///
/// Each row is resolved STITCH → drug name → normalized surface → drug-like
/// concepts, and side-effect text → disease concepts; the cross product of
/// both hit sets is emitted. The side-effect name is the last column; the
/// STITCH id falls back to the second column when the first is empty.
pub fn extract_sider_edges(
    meddra: &mut FieldReader,
    stitch_names: &HashMap<String, String>,
    catalog: &Catalog,
    counters: &mut Counters,
) -> Result<Vec<Edge>, ExtractError> {
    let drug_index = SurfaceIndex::from_catalog_filtered(catalog, |t| t.is_drug_like());
    let disease_index = SurfaceIndex::from_catalog_filtered(catalog, |t| t.is_disease_like());

    let mut edges = EdgeSet::new();
    while let Some(fields) = meddra.next_row()? {
        counters.bump("meddra_rows");
        if fields.len() < 6 {
            counters.bump("meddra_short_rows");
            continue;
        }
        let stitch = {
            let first = fields[0].trim();
            if first.is_empty() { fields[1].trim() } else { first }
        };
        let effect = fields.last().map(|f| f.trim()).unwrap_or_default();
        let drug_name = stitch_names.get(stitch).map(String::as_str).unwrap_or("");

        if drug_name.is_empty() {
            counters.bump("unmapped_drug");
            continue;
        }
        if effect.is_empty() {
            counters.bump("unmapped_effect");
            continue;
        }

        let drug_hits = drug_index.get(&normalize_surface(drug_name));
        let Some(drug_hits) = drug_hits.filter(|h| !h.is_empty()) else {
            counters.bump("unmapped_drug");
            continue;
        };
        let effect_hits = disease_index.get(&normalize_surface(effect));
        let Some(effect_hits) = effect_hits.filter(|h| !h.is_empty()) else {
            counters.bump("unmapped_effect");
            continue;
        };

        for drug in drug_hits {
            for disease in effect_hits {
                edges.insert_first(Edge {
                    head: drug.clone(),
                    relation: Predicate::AdverseEffect,
                    tail: disease.clone(),
                    source: SourceTag::Sider,
                    score: SIDER_EDGE_SCORE,
                    evidence: format!("{drug_name} -> {effect}"),
                });
            }
        }
    }
    Ok(edges.into_edges())
}

/// SIDER archives sometimes unpack `meddra_all_se.tsv` as a directory holding
/// the real file; resolve the nested path when the declared one is not a
/// regular file.
pub fn resolve_meddra_path(raw_root: &Path) -> PathBuf {
    let declared = raw_root.join("SIDER").join("meddra_all_se.tsv");
    if declared.is_file() {
        declared
    } else {
        declared.join("meddra_all_se.tsv")
    }
}
