use crate::constants::CTD_DEFAULT_SCORE;
use crate::extract::ctd::CtdReader;
use crate::extract::error::ExtractError;
use crate::report::stage_report::Counters;
use crate::transform::catalog::Catalog;
use crate::transform::edges::{Edge, EdgeSet};
use crate::transform::normalize::normalize_surface;
use crate::transform::relation::map_ctd_evidence;
use crate::transform::sources::SourceTag;
use crate::transform::surface_index::SurfaceIndex;

/// Lenient CTD inference-score parse: ASCII digits with at most one dot.
///
/// Negative and exponent forms are deliberately rejected (callers fall back
/// to the default score), as is anything like `1.2.3`.
pub fn parse_inference_score(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    let mut dots = 0;
    for c in raw.chars() {
        if c == '.' {
            dots += 1;
            if dots > 1 {
                return None;
            }
        } else if !c.is_ascii_digit() {
            return None;
        }
    }
    raw.parse().ok()
}

/// Streams `CTD_chemicals_diseases` rows and produces chemical–disease edges.
///
/// Chemical names resolve against drug-like concepts, disease names against
/// disease concepts; the predicate comes from the direct-evidence field and
/// the score from the inference column (default when absent or unparseable).
pub fn extract_ctd_edges(
    reader: &mut CtdReader,
    catalog: &Catalog,
    counters: &mut Counters,
) -> Result<Vec<Edge>, ExtractError> {
    let chemical_index = SurfaceIndex::from_catalog_filtered(catalog, |t| t.is_drug_like());
    let disease_index = SurfaceIndex::from_catalog_filtered(catalog, |t| t.is_disease_like());

    let mut edges = EdgeSet::new();
    while let Some(fields) = reader.next_record()? {
        if fields.len() < 6 {
            counters.bump("ctd_short_rows");
            continue;
        }
        counters.bump("ctd_rows");
        let chemical_name = fields[0].trim();
        let disease_name = fields[3].trim();
        let direct_evidence = fields[4].trim().to_lowercase();
        let inference_score = fields.get(7).map(|f| f.trim()).unwrap_or_default();

        let chemical_hits = chemical_index.get(&normalize_surface(chemical_name));
        let Some(chemical_hits) = chemical_hits.filter(|h| !h.is_empty()) else {
            counters.bump("unmapped_chemical");
            continue;
        };
        let disease_hits = disease_index.get(&normalize_surface(disease_name));
        let Some(disease_hits) = disease_hits.filter(|h| !h.is_empty()) else {
            counters.bump("unmapped_disease");
            continue;
        };

        let relation = map_ctd_evidence(&direct_evidence);
        let score = parse_inference_score(inference_score).unwrap_or(CTD_DEFAULT_SCORE);
        for head in chemical_hits {
            for tail in disease_hits {
                edges.insert_first(Edge {
                    head: head.clone(),
                    relation,
                    tail: tail.clone(),
                    source: SourceTag::Ctd,
                    score,
                    evidence: format!("{chemical_name} -> {disease_name} ({direct_evidence})"),
                });
            }
        }
    }
    Ok(edges.into_edges())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::relation::Predicate;
    use crate::transform::semtype::EntityType;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("0.42", Some(0.42))]
    #[case("123", Some(123.0))]
    #[case(".5", Some(0.5))]
    #[case("5.", Some(5.0))]
    #[case("1.2.3", None)]
    #[case("-1", None)]
    #[case("1e-3", None)]
    #[case("", None)]
    #[case(".", None)]
    #[case("abc", None)]
    fn lenient_score_parse(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_inference_score(raw), expected);
    }

    fn catalog() -> Catalog {
        let mut c = Catalog::new();
        c.observe_umls_surface("C1", "Warfarin", false, EntityType::Drug);
        c.observe_umls_surface("C2", "Hemorrhage", false, EntityType::Disease);
        c
    }

    fn reader(dir: &tempfile::TempDir, body: &str) -> CtdReader {
        let path = dir.path().join("CTD_chemicals_diseases.csv");
        std::fs::write(&path, body).unwrap();
        CtdReader::open(&path, 0).unwrap()
    }

    #[test]
    fn marker_row_becomes_association_with_inference_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctd = reader(
            &dir,
            "Warfarin,C01,11-11,Hemorrhage,marker/mechanism,D01,,0.42\n",
        );
        let mut counters = Counters::new();
        let edges = extract_ctd_edges(&mut ctd, &catalog(), &mut counters).unwrap();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, Predicate::AssociatedWith);
        assert_eq!(edges[0].score, 0.42);
        assert_eq!(
            edges[0].evidence,
            "Warfarin -> Hemorrhage (marker/mechanism)"
        );
    }

    #[test]
    fn therapeutic_row_becomes_treats_with_default_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctd = reader(&dir, "Warfarin,C01,11-11,Hemorrhage,therapeutic,D01,,\n");
        let mut counters = Counters::new();
        let edges = extract_ctd_edges(&mut ctd, &catalog(), &mut counters).unwrap();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relation, Predicate::Treats);
        assert_eq!(edges[0].score, CTD_DEFAULT_SCORE);
    }

    #[test]
    fn unmapped_names_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctd = reader(
            &dir,
            "NotAChemical,C01,,Hemorrhage,marker/mechanism,D01,,\n\
             Warfarin,C01,,NotADisease,marker/mechanism,D01,,\n",
        );
        let mut counters = Counters::new();
        let edges = extract_ctd_edges(&mut ctd, &catalog(), &mut counters).unwrap();

        assert!(edges.is_empty());
        assert_eq!(counters.get("unmapped_chemical"), 1);
        assert_eq!(counters.get("unmapped_disease"), 1);
        assert_eq!(counters.get("ctd_rows"), 2);
    }

    #[test]
    fn duplicate_pairs_keep_the_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctd = reader(
            &dir,
            "Warfarin,C01,,Hemorrhage,marker/mechanism,D01,,0.42\n\
             Warfarin,C01,,Hemorrhage,marker/mechanism,D01,,0.99\n",
        );
        let mut counters = Counters::new();
        let edges = extract_ctd_edges(&mut ctd, &catalog(), &mut counters).unwrap();

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].score, 0.42);
    }
}
