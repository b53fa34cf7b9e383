use crate::transform::error::TransformError;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// A fused cross-source edge: provenance unioned, best score kept.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEdge {
    pub head: String,
    pub relation: String,
    pub tail: String,
    pub sources: BTreeSet<String>,
    pub score: f64,
    pub evidence: BTreeSet<String>,
}

/// Accumulates edge rows from the per-source files, keyed by
/// `(head, relation, tail)`.
///
/// The reader tolerates both header spellings (`h,r,t` and
/// `head,relation,tail`); source and evidence cells are split on `|` so
/// re-merging an already merged file stays idempotent. An unparseable score
/// defaults to 1.0.
#[derive(Debug, Default)]
pub struct EdgeMerger {
    map: HashMap<(String, String, String), MergedEdge>,
}

fn column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
}

fn insert_tokens(set: &mut BTreeSet<String>, cell: &str) {
    for token in cell.split('|') {
        let token = token.trim();
        if !token.is_empty() {
            set.insert(token.to_string());
        }
    }
}

impl EdgeMerger {
    pub fn new() -> Self {
        EdgeMerger::default()
    }

    /// Folds one edge CSV into the accumulator. Returns rows consumed.
    pub fn absorb_file(&mut self, path: &Path) -> Result<u64, TransformError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|source| TransformError::EdgeRead {
                path: path.to_path_buf(),
                source,
            })?;
        let headers = reader
            .headers()
            .map_err(|source| TransformError::EdgeRead {
                path: path.to_path_buf(),
                source,
            })?
            .clone();
        let head_col = column(&headers, &["h", "head"]);
        let rel_col = column(&headers, &["r", "relation"]);
        let tail_col = column(&headers, &["t", "tail"]);
        let (Some(head_col), Some(rel_col), Some(tail_col)) = (head_col, rel_col, tail_col) else {
            return Err(TransformError::EdgeHeader {
                path: path.to_path_buf(),
            });
        };
        let source_col = column(&headers, &["source"]);
        let score_col = column(&headers, &["score"]);
        let evidence_col = column(&headers, &["evidence"]);

        let mut rows_seen = 0u64;
        for record in reader.records() {
            let record = record.map_err(|source| TransformError::EdgeRead {
                path: path.to_path_buf(),
                source,
            })?;
            let field = |col: Option<usize>| {
                col.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
            };
            let head = field(Some(head_col));
            let relation = field(Some(rel_col));
            let tail = field(Some(tail_col));
            if head.is_empty() || relation.is_empty() || tail.is_empty() {
                continue;
            }
            rows_seen += 1;

            let score = field(score_col).parse::<f64>().unwrap_or(1.0);
            let key = (head.to_string(), relation.to_string(), tail.to_string());
            let entry = self.map.entry(key).or_insert_with(|| MergedEdge {
                head: head.to_string(),
                relation: relation.to_string(),
                tail: tail.to_string(),
                sources: BTreeSet::new(),
                score,
                evidence: BTreeSet::new(),
            });
            insert_tokens(&mut entry.sources, field(source_col));
            insert_tokens(&mut entry.evidence, field(evidence_col));
            if score > entry.score {
                entry.score = score;
            }
        }
        Ok(rows_seen)
    }

    /// Fused edges in `(head, relation, tail)` order.
    pub fn into_sorted_edges(self) -> Vec<MergedEdge> {
        let mut edges: Vec<MergedEdge> = self.map.into_values().collect();
        edges.sort_by(|a, b| {
            (&a.head, &a.relation, &a.tail).cmp(&(&b.head, &b.relation, &b.tail))
        });
        edges
    }
}
