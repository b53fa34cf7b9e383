use crate::constants::UMLS_EDGE_SCORE;
use crate::extract::error::ExtractError;
use crate::extract::line_reader::FieldReader;
use crate::report::stage_report::Counters;
use crate::transform::catalog::Catalog;
use crate::transform::edges::{Edge, EdgeSet};
use crate::transform::relation::{map_relation, passes_type_gate};
use crate::transform::sources::SourceTag;

/// Streams MRREL and produces UMLS edges against the catalog.
///
/// A row survives when its relation maps to a canonical predicate, both CUIs
/// resolve to catalog concepts, and the triple passes the predicate type
/// gate. Everything dropped is counted by cause. MRREL asserts relations from
/// CUI1 to CUI2, so CUI1 is the head.
pub fn extract_umls_edges(
    reader: &mut FieldReader,
    catalog: &Catalog,
    counters: &mut Counters,
) -> Result<Vec<Edge>, ExtractError> {
    let mut edges = EdgeSet::new();
    while let Some(fields) = reader.next_row()? {
        counters.bump("mrrel_rows");
        if fields.len() < 11 {
            counters.bump("mrrel_short_rows");
            continue;
        }
        let cui1 = fields[0].trim().to_uppercase();
        let rel = fields[3].trim().to_uppercase();
        let cui2 = fields[4].trim().to_uppercase();
        let rela = fields[7].trim();
        let sab = fields[10].trim();

        let Some(predicate) = map_relation(&rel, rela) else {
            counters.bump("filtered_relation");
            continue;
        };
        counters.bump("mapped_relation");

        let (Some(head), Some(tail)) = (catalog.kg_for_cui(&cui1), catalog.kg_for_cui(&cui2))
        else {
            counters.bump("unmapped_cui");
            continue;
        };
        let (head, tail) = (head.to_string(), tail.to_string());

        let head_type = catalog.entity_type_of(&head);
        let tail_type = catalog.entity_type_of(&tail);
        let gate_ok = matches!((head_type, tail_type), (Some(h), Some(t)) if passes_type_gate(predicate, h, t));
        if !gate_ok {
            counters.bump("filtered_semantic_type");
            continue;
        }

        let relation_label = if rela.is_empty() { rel.as_str() } else { rela };
        edges.insert_first(Edge {
            head,
            relation: predicate,
            tail,
            source: SourceTag::Umls,
            score: UMLS_EDGE_SCORE,
            evidence: format!("{sab}:{relation_label}"),
        });
    }
    Ok(edges.into_edges())
}
