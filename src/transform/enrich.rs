use crate::constants::{MIN_SYNONYM_LEN, RXNORM_ENRICH_TTYS};
use crate::extract::drugbank::DrugBankReader;
use crate::extract::error::ExtractError;
use crate::extract::line_reader::FieldReader;
use crate::extract::mesh::MeshReader;
use crate::report::stage_report::Counters;
use crate::transform::catalog::Catalog;
use crate::transform::normalize::normalize_surface;
use crate::transform::semtype::EntityType;
use crate::transform::sources::SourceTag;
use crate::transform::surface_index::SurfaceIndex;

/// What [`try_attach`] decided about one external name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached,
    /// Shorter than the minimum synonym length after trimming.
    TooShort,
    /// The normalized surface is owned by no concept.
    NoAnchor,
    /// The normalized surface is owned by more than one concept; such a
    /// name is never attached to an arbitrary pick.
    Ambiguous,
    /// A unique owner exists but its entity type fails the source filter.
    TypeMismatch,
}

/// Attaches one external name to the catalog under the single-target rule.
///
/// The name is accepted only when its normalized surface is owned by exactly
/// one concept and that concept passes the source's type filter; an unknown
/// or ambiguous surface is never guessed at. Accepted names are stored
/// verbatim (trimmed, un-normalized).
pub fn try_attach(
    catalog: &mut Catalog,
    index: &SurfaceIndex,
    raw_name: &str,
    source: SourceTag,
    type_ok: impl Fn(EntityType) -> bool,
) -> AttachOutcome {
    let name = raw_name.trim();
    if name.chars().count() < MIN_SYNONYM_LEN {
        return AttachOutcome::TooShort;
    }
    let normalized = normalize_surface(name);
    let hits = match index.get(&normalized) {
        None => return AttachOutcome::NoAnchor,
        Some(hits) if hits.is_empty() => return AttachOutcome::NoAnchor,
        Some(hits) if hits.len() > 1 => return AttachOutcome::Ambiguous,
        Some(hits) => hits,
    };
    let kg_id = hits.iter().next().map(String::clone).unwrap_or_default();
    let Some(entity_type) = catalog.entity_type_of(&kg_id) else {
        return AttachOutcome::NoAnchor;
    };
    if !type_ok(entity_type) {
        return AttachOutcome::TypeMismatch;
    }
    catalog.attach_synonym(&kg_id, name, source);
    AttachOutcome::Attached
}

/// RXNCONSO pass: RXNORM-sourced IN/BN/PIN names onto drug concepts.
pub fn enrich_from_rxnorm(
    catalog: &mut Catalog,
    index: &SurfaceIndex,
    reader: &mut FieldReader,
    counters: &mut Counters,
) -> Result<(), ExtractError> {
    while let Some(fields) = reader.next_row()? {
        counters.bump("rxnorm_rows");
        if fields.len() < 15 {
            counters.bump("rxnorm_short_rows");
            continue;
        }
        let sab = fields[11].trim().to_uppercase();
        let tty = fields[12].trim().to_uppercase();
        let text = fields[14].trim();
        if sab != "RXNORM" || !RXNORM_ENRICH_TTYS.contains(&tty.as_str()) {
            continue;
        }
        match try_attach(catalog, index, text, SourceTag::RxNorm, |t| {
            t == EntityType::Drug
        }) {
            AttachOutcome::Attached => counters.bump("rxnorm_synonyms_added"),
            AttachOutcome::Ambiguous => counters.bump("rxnorm_ambiguous_rejected"),
            _ => {}
        }
    }
    Ok(())
}

/// DrugBank pass: primary names, brands and synonyms onto drug concepts.
pub fn enrich_from_drugbank(
    catalog: &mut Catalog,
    index: &SurfaceIndex,
    reader: &mut DrugBankReader,
    counters: &mut Counters,
) -> Result<(), ExtractError> {
    while let Some(record) = reader.next_record()? {
        for name in record.all_names() {
            match try_attach(catalog, index, &name, SourceTag::DrugBank, |t| {
                t == EntityType::Drug
            }) {
                AttachOutcome::Attached => counters.bump("drugbank_synonyms_added"),
                AttachOutcome::Ambiguous => counters.bump("drugbank_ambiguous_rejected"),
                _ => {}
            }
        }
    }
    Ok(())
}

/// MeSH pass: descriptor names and entry terms onto disease concepts.
pub fn enrich_from_mesh(
    catalog: &mut Catalog,
    index: &SurfaceIndex,
    reader: &mut MeshReader,
    counters: &mut Counters,
) -> Result<(), ExtractError> {
    while let Some(record) = reader.next_record()? {
        for term in record.all_terms() {
            match try_attach(catalog, index, &term, SourceTag::Mesh, |t| {
                t == EntityType::Disease
            }) {
                AttachOutcome::Attached => counters.bump("mesh_synonyms_added"),
                AttachOutcome::Ambiguous => counters.bump("mesh_ambiguous_rejected"),
                _ => {}
            }
        }
    }
    Ok(())
}
