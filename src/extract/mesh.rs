use crate::extract::error::ExtractError;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::BTreeSet;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One MeSH `DescriptorRecord`: the descriptor name plus every entry term
/// under `ConceptList/Concept/TermList/Term/String`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshRecord {
    pub name: String,
    pub terms: BTreeSet<String>,
}

impl MeshRecord {
    /// Descriptor name and entry terms as one deduplicated set.
    pub fn all_terms(&self) -> BTreeSet<String> {
        let mut all = self.terms.clone();
        if !self.name.is_empty() {
            all.insert(self.name.clone());
        }
        all
    }
}

const NAME_PATH: &[&str] = &["DescriptorName", "String"];
const TERM_PATH: &[&str] = &["ConceptList", "Concept", "TermList", "Term", "String"];

/// Streaming reader over a MeSH descriptor XML file.
///
/// Event-based: only the record currently being assembled is resident, so
/// memory does not scale with descriptor count.
pub struct MeshReader {
    xml: Reader<Box<dyn BufRead>>,
    path: PathBuf,
    buf: Vec<u8>,
    // open elements below the current DescriptorRecord
    stack: Vec<String>,
    in_record: bool,
}

impl MeshReader {
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        let raw = crate::extract::line_reader::open_raw_auto(path)?;
        let mut xml = Reader::from_reader(Box::new(BufReader::new(raw)) as Box<dyn BufRead>);
        xml.config_mut().trim_text(true);
        Ok(MeshReader {
            xml,
            path: path.to_path_buf(),
            buf: Vec::new(),
            stack: Vec::new(),
            in_record: false,
        })
    }

    pub fn next_record(&mut self) -> Result<Option<MeshRecord>, ExtractError> {
        let mut record = MeshRecord::default();
        loop {
            self.buf.clear();
            let event = self
                .xml
                .read_event_into(&mut self.buf)
                .map_err(|source| ExtractError::Xml {
                    path: self.path.clone(),
                    source,
                })?;
            match event {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if self.in_record {
                        self.stack.push(name);
                    } else if name == "DescriptorRecord" {
                        self.in_record = true;
                        self.stack.clear();
                        record = MeshRecord::default();
                    }
                }
                Event::Text(e) => {
                    if self.in_record {
                        let text = e.unescape().unwrap_or_default().trim().to_string();
                        if text.is_empty() {
                            continue;
                        }
                        if self.stack == NAME_PATH && record.name.is_empty() {
                            record.name = text;
                        } else if self.stack == TERM_PATH {
                            record.terms.insert(text);
                        }
                    }
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if self.in_record {
                        if self.stack.is_empty() && name == "DescriptorRecord" {
                            self.in_record = false;
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
<DescriptorRecordSet>
  <DescriptorRecord>
    <DescriptorUI>D006470</DescriptorUI>
    <DescriptorName><String>Hemorrhage</String></DescriptorName>
    <ConceptList>
      <Concept>
        <ConceptName><String>Hemorrhage</String></ConceptName>
        <TermList>
          <Term><String>Bleeding</String></Term>
          <Term><String>Haemorrhage</String></Term>
        </TermList>
      </Concept>
    </ConceptList>
  </DescriptorRecord>
  <DescriptorRecord>
    <DescriptorName><String>Asthma</String></DescriptorName>
    <ConceptList>
      <Concept>
        <TermList>
          <Term><String>Bronchial Asthma</String></Term>
        </TermList>
      </Concept>
    </ConceptList>
  </DescriptorRecord>
</DescriptorRecordSet>
"#;

    fn write_sample(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("desc.xml");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn streams_descriptor_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut reader = MeshReader::open(&write_sample(&dir)).unwrap();

        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.name, "Hemorrhage");
        assert_eq!(
            first.terms,
            BTreeSet::from(["Bleeding".to_string(), "Haemorrhage".to_string()])
        );
        assert_eq!(
            first.all_terms(),
            BTreeSet::from([
                "Bleeding".to_string(),
                "Haemorrhage".to_string(),
                "Hemorrhage".to_string()
            ])
        );

        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.name, "Asthma");
        assert_eq!(second.terms, BTreeSet::from(["Bronchial Asthma".to_string()]));

        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn concept_names_outside_term_paths_are_ignored() {
        // ConceptName/String must not leak into terms.
        let dir = tempfile::tempdir().unwrap();
        let mut reader = MeshReader::open(&write_sample(&dir)).unwrap();
        let first = reader.next_record().unwrap().unwrap();
        assert!(!first.terms.contains("D006470"));
    }
}
