use crate::validation::error::ValidationError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const EXAMPLE_LIMIT: usize = 10;
const TOP_OVERLAY_LIMIT: usize = 20;

/// Summary produced by a successful dictionary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStats {
    pub dict_keys: usize,
    pub overlay_keys: usize,
    pub total_aliases_base: usize,
    pub total_aliases_overlay: usize,
    /// The overlay keys with the most surfaces, count-descending then
    /// id-ascending, capped at twenty.
    pub top_overlay: Vec<(String, usize)>,
}

/// Enforces the dictionary schema contract: overlay keys must be a subset of
/// base keys (unless `allow_new_keys`), and for every key the overlay must
/// not repeat a base surface. Violations are build failures, not warnings.
pub fn validate_dict_overlay(
    base: &BTreeMap<String, Vec<String>>,
    overlay: &BTreeMap<String, Vec<String>>,
    allow_new_keys: bool,
) -> Result<OverlayStats, ValidationError> {
    if !allow_new_keys {
        let missing: Vec<&String> = overlay.keys().filter(|k| !base.contains_key(*k)).collect();
        if !missing.is_empty() {
            return Err(ValidationError::OverlayKeysNotInBase {
                count: missing.len(),
                examples: missing
                    .iter()
                    .take(EXAMPLE_LIMIT)
                    .map(|k| (*k).clone())
                    .collect(),
            });
        }
    }

    let mut overlap_keys: Vec<String> = Vec::new();
    let mut overlap_total = 0usize;
    for (kg_id, surfaces) in overlay {
        if let Some(base_surfaces) = base.get(kg_id) {
            let base_set: BTreeSet<&String> = base_surfaces.iter().collect();
            let overlap = surfaces.iter().filter(|s| base_set.contains(s)).count();
            if overlap > 0 {
                overlap_keys.push(kg_id.clone());
                overlap_total += overlap;
            }
        }
    }
    if !overlap_keys.is_empty() {
        let examples = overlap_keys.iter().take(EXAMPLE_LIMIT).cloned().collect();
        return Err(ValidationError::OverlayIntersectsBase {
            keys: overlap_keys.len(),
            aliases: overlap_total,
            examples,
        });
    }

    let mut top_overlay: Vec<(String, usize)> = overlay
        .iter()
        .map(|(k, v)| (k.clone(), v.len()))
        .collect();
    top_overlay.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_overlay.truncate(TOP_OVERLAY_LIMIT);

    Ok(OverlayStats {
        dict_keys: base.len(),
        overlay_keys: overlay.len(),
        total_aliases_base: base.values().map(Vec::len).sum(),
        total_aliases_overlay: overlay.values().map(Vec::len).sum(),
        top_overlay,
    })
}

fn read_dict(path: &Path) -> Result<BTreeMap<String, Vec<String>>, ValidationError> {
    let body = std::fs::read_to_string(path).map_err(|source| ValidationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| ValidationError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Companion checker over written files, for validating an existing artifact
/// directory without re-running the build.
pub fn validate_files(
    dict_path: &Path,
    overlay_path: &Path,
    allow_new_keys: bool,
) -> Result<OverlayStats, ValidationError> {
    let base = read_dict(dict_path)?;
    let overlay = read_dict(overlay_path)?;
    validate_dict_overlay(&base, &overlay, allow_new_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dict(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn clean_dictionaries_pass_with_stats() {
        let base = dict(&[("drug_a", &["A", "a-form"]), ("drug_b", &["B"])]);
        let overlay = dict(&[("drug_a", &["alpha"])]);
        let stats = validate_dict_overlay(&base, &overlay, false).unwrap();
        assert_eq!(stats.dict_keys, 2);
        assert_eq!(stats.overlay_keys, 1);
        assert_eq!(stats.total_aliases_base, 3);
        assert_eq!(stats.total_aliases_overlay, 1);
        assert_eq!(stats.top_overlay, vec![("drug_a".to_string(), 1)]);
    }

    #[test]
    fn overlay_key_missing_from_base_fails() {
        let base = dict(&[("drug_a", &["A"])]);
        let overlay = dict(&[("drug_ghost", &["x"])]);
        let err = validate_dict_overlay(&base, &overlay, false).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OverlayKeysNotInBase { count: 1, .. }
        ));
        // explicitly permitted when the flag is set
        assert!(validate_dict_overlay(&base, &overlay, true).is_ok());
    }

    #[test]
    fn overlay_repeating_base_surface_fails() {
        let base = dict(&[("drug_a", &["A", "alpha"])]);
        let overlay = dict(&[("drug_a", &["alpha", "beta"])]);
        let err = validate_dict_overlay(&base, &overlay, false).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OverlayIntersectsBase {
                keys: 1,
                aliases: 1,
                ..
            }
        ));
    }

    #[test]
    fn top_overlay_orders_by_count_then_key() {
        let base = dict(&[("a", &["x"]), ("b", &["x"]), ("c", &["x"])]);
        let overlay = dict(&[("a", &["1"]), ("b", &["1", "2"]), ("c", &["1", "2"])]);
        let stats = validate_dict_overlay(&base, &overlay, false).unwrap();
        assert_eq!(
            stats.top_overlay,
            vec![
                ("b".to_string(), 2),
                ("c".to_string(), 2),
                ("a".to_string(), 1)
            ]
        );
    }

    #[test]
    fn file_checker_round_trips_json() {
        let dir = tempfile::tempdir().unwrap();
        let dict_path = dir.path().join("umls_dict.txt");
        let overlay_path = dir.path().join("umls_dict.overlay.json");
        std::fs::write(&dict_path, r#"{"drug_a": ["A"]}"#).unwrap();
        std::fs::write(&overlay_path, r#"{"drug_a": ["alpha"]}"#).unwrap();
        let stats = validate_files(&dict_path, &overlay_path, false).unwrap();
        assert_eq!(stats.dict_keys, 1);
    }
}
