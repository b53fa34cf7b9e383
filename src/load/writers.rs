use crate::load::atomic::AtomicFile;
use crate::load::error::LoadError;
use crate::transform::edges::Edge;
use crate::transform::edges::merge::MergedEdge;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Per-source edge file header (short form).
pub const SOURCE_EDGE_HEADER: [&str; 6] = ["h", "r", "t", "source", "score", "evidence"];

/// Merged edge file header (long form).
pub const MERGED_EDGE_HEADER: [&str; 6] = ["head", "relation", "tail", "source", "score", "evidence"];

/// Pretty-prints `value` as JSON (2-space indent, non-ASCII preserved) and
/// lands it atomically.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), LoadError> {
    let mut file = AtomicFile::create(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    file.commit()
}

/// Scores in per-source files keep their natural decimal form, with a
/// fractional part even when whole (`1.0`, not `1`).
fn fmt_source_score(score: f64) -> String {
    if score == score.trunc() {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}

/// Writes a per-source edge file with the `h,r,t,source,score,evidence`
/// header. Edges must already be in emission order. Returns rows written.
pub fn write_source_edges_csv(path: &Path, edges: &[Edge]) -> Result<u64, LoadError> {
    let file = AtomicFile::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(SOURCE_EDGE_HEADER)?;
    let mut count = 0u64;
    for edge in edges {
        let relation = edge.relation.to_string();
        let source = edge.source.to_string();
        let score = fmt_source_score(edge.score);
        writer.write_record([
            edge.head.as_str(),
            relation.as_str(),
            edge.tail.as_str(),
            source.as_str(),
            score.as_str(),
            edge.evidence.as_str(),
        ])?;
        count += 1;
    }
    let file = writer.into_inner().map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    file.commit()?;
    Ok(count)
}

/// Writes a merged edge file: long header, pipe-joined sorted source and
/// evidence tokens, score to four decimal places.
pub fn write_merged_edges_csv(path: &Path, edges: &[MergedEdge]) -> Result<u64, LoadError> {
    let file = AtomicFile::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(MERGED_EDGE_HEADER)?;
    let mut count = 0u64;
    for edge in edges {
        let sources: Vec<&str> = edge.sources.iter().map(String::as_str).collect();
        let evidence: Vec<&str> = edge.evidence.iter().map(String::as_str).collect();
        let sources = sources.join("|");
        let evidence = evidence.join("|");
        let score = format!("{:.4}", edge.score);
        writer.write_record([
            edge.head.as_str(),
            edge.relation.as_str(),
            edge.tail.as_str(),
            sources.as_str(),
            score.as_str(),
            evidence.as_str(),
        ])?;
        count += 1;
    }
    let file = writer.into_inner().map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    file.commit()?;
    Ok(count)
}

/// Writes one JSON document per line (JSONL), atomically.
pub fn write_jsonl<T: Serialize>(
    path: &Path,
    rows: impl IntoIterator<Item = T>,
) -> Result<u64, LoadError> {
    let mut file = AtomicFile::create(path)?;
    let mut count = 0u64;
    for row in rows {
        serde_json::to_writer(&mut file, &row)?;
        file.write_all(b"\n").map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        count += 1;
    }
    file.commit()?;
    Ok(count)
}
