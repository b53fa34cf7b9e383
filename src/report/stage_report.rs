use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-cause row counters for one stage. Keys are stable strings; emission is
/// sorted, so reports are byte-stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Counters(BTreeMap<String, u64>);

impl Counters {
    pub fn new() -> Self {
        Counters::default()
    }

    /// Counters pre-seeded at zero so every expected key appears in the
    /// report even when never hit.
    pub fn preset(keys: &[&str]) -> Self {
        Counters(keys.iter().map(|k| (k.to_string(), 0)).collect())
    }

    pub fn bump(&mut self, key: &str) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: &str, n: u64) {
        *self.0.entry(key.to_string()).or_insert(0) += n;
    }

    pub fn set(&mut self, key: &str, value: u64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or(0)
    }
}

/// What one stage read, counted, and wrote. Serialized after every stage as
/// `stage_NN_report.json` and embedded in the final build manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageReport {
    pub stage: String,
    pub version: String,
    pub inputs: BTreeMap<String, String>,
    pub counts: Counters,
    pub outputs: BTreeMap<String, String>,
}

impl StageReport {
    pub fn new(stage: &str, version: &str) -> Self {
        StageReport {
            stage: stage.to_string(),
            version: version.to_string(),
            inputs: BTreeMap::new(),
            counts: Counters::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn input(mut self, name: &str, path: impl AsRef<std::path::Path>) -> Self {
        self.inputs
            .insert(name.to_string(), path.as_ref().display().to_string());
        self
    }

    pub fn output(mut self, name: &str, path: impl AsRef<std::path::Path>) -> Self {
        self.outputs
            .insert(name.to_string(), path.as_ref().display().to_string());
        self
    }

    pub fn counts(mut self, counts: Counters) -> Self {
        self.counts = counts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counters_accumulate_and_default_to_zero() {
        let mut counters = Counters::preset(&["seen", "skipped"]);
        counters.bump("seen");
        counters.bump("seen");
        counters.add("written", 3);
        assert_eq!(counters.get("seen"), 2);
        assert_eq!(counters.get("skipped"), 0);
        assert_eq!(counters.get("written"), 3);
        assert_eq!(counters.get("missing"), 0);
    }

    #[test]
    fn report_serializes_with_fixed_key_order() {
        let report = StageReport::new("01_build_entity_catalog", "v1")
            .input("MRCONSO", "/raw/UMLS/MRCONSO.RRF")
            .output("entity_catalog", "/out/v1/entity_catalog.jsonl");
        let json = serde_json::to_string(&report).unwrap();
        let stage_pos = json.find("\"stage\"").unwrap();
        let inputs_pos = json.find("\"inputs\"").unwrap();
        let counts_pos = json.find("\"counts\"").unwrap();
        let outputs_pos = json.find("\"outputs\"").unwrap();
        assert!(stage_pos < inputs_pos && inputs_pos < counts_pos && counts_pos < outputs_pos);
    }
}
