use crate::constants::DRUGBANK_NS;
use crate::extract::error::ExtractError;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::collections::BTreeSet;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One top-level DrugBank `drug` element: the primary name plus brand names
/// and synonyms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrugRecord {
    pub name: String,
    pub brands: BTreeSet<String>,
    pub synonyms: BTreeSet<String>,
}

impl DrugRecord {
    /// Every name carried by the record, deduplicated.
    pub fn all_names(&self) -> BTreeSet<String> {
        let mut all: BTreeSet<String> = self.brands.union(&self.synonyms).cloned().collect();
        if !self.name.is_empty() {
            all.insert(self.name.clone());
        }
        all
    }
}

const NAME_PATH: &[&str] = &["name"];
const BRAND_PATH: &[&str] = &["brands", "brand"];
const SYNONYM_PATH: &[&str] = &["synonyms", "synonym"];

struct Frame {
    name: String,
    in_ns: bool,
}

fn path_matches(stack: &[Frame], expected: &[&str]) -> bool {
    stack.len() == expected.len()
        && stack
            .iter()
            .zip(expected)
            .all(|(frame, want)| frame.in_ns && frame.name == *want)
}

/// Streaming reader over a DrugBank XML dump.
///
/// Only elements bound to the `http://www.drugbank.ca` namespace are
/// considered, and only `drug` elements that are direct children of the
/// document root start a record; a drug's `name` is its direct child, so
/// names nested deeper (interactions, products) never leak in.
pub struct DrugBankReader {
    xml: NsReader<Box<dyn BufRead>>,
    path: PathBuf,
    buf: Vec<u8>,
    depth: usize,
    // open elements below the current top-level drug
    stack: Vec<Frame>,
    in_drug: bool,
}

impl DrugBankReader {
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let raw = crate::extract::line_reader::open_raw_auto(path)?;
        let mut xml = NsReader::from_reader(Box::new(BufReader::new(raw)) as Box<dyn BufRead>);
        xml.config_mut().trim_text(true);
        Ok(DrugBankReader {
            xml,
            path: path.to_path_buf(),
            buf: Vec::new(),
            depth: 0,
            stack: Vec::new(),
            in_drug: false,
        })
    }

    pub fn next_record(&mut self) -> Result<Option<DrugRecord>, ExtractError> {
        let mut record = DrugRecord::default();
        loop {
            self.buf.clear();
            let (resolve, event) = self
                .xml
                .read_resolved_event_into(&mut self.buf)
                .map_err(|source| ExtractError::Xml {
                    path: self.path.clone(),
                    source,
                })?;
            match event {
                Event::Start(e) => {
                    let in_ns = matches!(&resolve, ResolveResult::Bound(ns) if ns.0 == DRUGBANK_NS.as_bytes());
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    self.depth += 1;
                    if self.in_drug {
                        self.stack.push(Frame { name, in_ns });
                    } else if self.depth == 2 && in_ns && name == "drug" {
                        // direct child of the <drugbank> root
                        self.in_drug = true;
                        self.stack.clear();
                        record = DrugRecord::default();
                    }
                }
                Event::Text(e) => {
                    if self.in_drug {
                        let text = e.unescape().unwrap_or_default().trim().to_string();
                        if text.is_empty() {
                            continue;
                        }
                        if path_matches(&self.stack, NAME_PATH) && record.name.is_empty() {
                            record.name = text;
                        } else if path_matches(&self.stack, BRAND_PATH) {
                            record.brands.insert(text);
                        } else if path_matches(&self.stack, SYNONYM_PATH) {
                            record.synonyms.insert(text);
                        }
                    }
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.in_drug {
                        if self.stack.is_empty() {
                            // closed the drug element itself
                            self.in_drug = false;
                            return Ok(Some(record));
                        }
                        self.stack.pop();
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<drugbank xmlns="http://www.drugbank.ca" version="5.1">
  <drug type="small molecule">
    <drugbank-id primary="true">DB00945</drugbank-id>
    <name>Acetylsalicylic acid</name>
    <brands>
      <brand>Aspirin</brand>
      <brand>Aspergum</brand>
    </brands>
    <synonyms>
      <synonym language="english">ASA</synonym>
    </synonyms>
    <drug-interactions>
      <drug-interaction>
        <name>Warfarin</name>
      </drug-interaction>
    </drug-interactions>
  </drug>
  <drug>
    <name>Warfarin</name>
    <synonyms/>
  </drug>
</drugbank>
"#;

    fn write_sample(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("drugbank.xml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn streams_top_level_drugs() {
        let dir = tempfile::tempdir().unwrap();
        let mut reader = DrugBankReader::open(&write_sample(&dir, SAMPLE)).unwrap();

        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.name, "Acetylsalicylic acid");
        assert_eq!(
            first.brands,
            BTreeSet::from(["Aspirin".to_string(), "Aspergum".to_string()])
        );
        assert_eq!(first.synonyms, BTreeSet::from(["ASA".to_string()]));
        // the interaction partner's name is nested deeper and must not leak
        assert!(!first.all_names().contains("Warfarin"));

        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.name, "Warfarin");
        assert!(second.brands.is_empty());

        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn foreign_namespace_elements_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"<?xml version="1.0"?>
<drugbank xmlns="http://www.drugbank.ca" xmlns:x="http://example.org">
  <drug>
    <x:name>Not a drug name</x:name>
    <name>Lisinopril</name>
  </drug>
</drugbank>
"#;
        let mut reader = DrugBankReader::open(&write_sample(&dir, body)).unwrap();
        let record = reader.next_record().unwrap().unwrap();
        assert_eq!(record.name, "Lisinopril");
    }

    #[test]
    fn unnamespaced_document_yields_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let body = "<drugbank><drug><name>X</name></drug></drugbank>";
        let mut reader = DrugBankReader::open(&write_sample(&dir, body)).unwrap();
        assert!(reader.next_record().unwrap().is_none());
    }
}
