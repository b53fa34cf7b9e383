use crate::extract::error::ExtractError;
use crate::extract::line_reader::open_raw_auto;
use log::info;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Streaming reader for `CTD_chemicals_diseases.csv[.gz]`.
///
/// Handles standard CSV quoting (chemical names contain commas), skips `#`
/// comment lines and the repeated `ChemicalName,...` header row, and decodes
/// fields as UTF-8 with malformed bytes replaced. Rows come back as raw field
/// vectors; width checks belong to the caller so short rows can be counted.
pub struct CtdReader {
    reader: csv::Reader<Box<dyn Read>>,
    record: csv::ByteRecord,
    path: PathBuf,
    label: String,
    progress_every: u64,
    rows_read: u64,
}

impl CtdReader {
    pub fn open(path: &Path, progress_every: u64) -> Result<Self, ExtractError> {
        let raw = open_raw_auto(path)?;
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(raw);
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(CtdReader {
            reader,
            record: csv::ByteRecord::new(),
            path: path.to_path_buf(),
            label,
            progress_every,
            rows_read: 0,
        })
    }

    pub fn next_record(&mut self) -> Result<Option<Vec<String>>, ExtractError> {
        loop {
            let more = self
                .reader
                .read_byte_record(&mut self.record)
                .map_err(|source| ExtractError::Csv {
                    path: self.path.clone(),
                    source,
                })?;
            if !more {
                return Ok(None);
            }
            self.rows_read += 1;
            if self.progress_every > 0 && self.rows_read % self.progress_every == 0 {
                info!("[{}] read {} rows", self.label, self.rows_read);
            }
            if self.record.is_empty() {
                continue;
            }
            let fields: Vec<String> = self
                .record
                .iter()
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect();
            if fields.first().is_some_and(|f| f == "ChemicalName") {
                continue;
            }
            return Ok(Some(fields));
        }
    }
}

/// CTD ships either gzipped or plain; prefer the `.csv.gz` name and fall back
/// to `.csv` when only the decompressed file is present.
pub fn resolve_ctd_path(raw_root: &Path) -> PathBuf {
    let gz = raw_root.join("CTD").join("CTD_chemicals_diseases.csv.gz");
    if gz.exists() {
        gz
    } else {
        raw_root.join("CTD").join("CTD_chemicals_diseases.csv")
    }
}
