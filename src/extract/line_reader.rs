use crate::extract::error::ExtractError;
use flate2::read::MultiGzDecoder;
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Opens `path` for raw byte reading, transparently decompressing when the
/// file name ends in `.gz`.
pub fn open_raw_auto(path: &Path) -> Result<Box<dyn Read>, ExtractError> {
    let file = File::open(path).map_err(|source| ExtractError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lazy line iterator over a (possibly gzipped) text file.
///
/// Lines are decoded as UTF-8 with malformed bytes replaced, trailing
/// `\r\n`/`\n` stripped. Memory use is one line at a time. Progress is logged
/// every `progress_every` lines (0 disables).
pub struct LineReader {
    inner: Box<dyn BufRead>,
    path: PathBuf,
    label: String,
    progress_every: u64,
    lines_read: u64,
    buf: Vec<u8>,
}

impl std::fmt::Debug for LineReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("path", &self.path)
            .field("label", &self.label)
            .field("progress_every", &self.progress_every)
            .field("lines_read", &self.lines_read)
            .finish()
    }
}

impl LineReader {
    pub fn open(path: &Path, progress_every: u64) -> Result<Self, ExtractError> {
        let raw = open_raw_auto(path)?;
        Ok(LineReader {
            inner: Box::new(BufReader::new(raw)),
            path: path.to_path_buf(),
            label: file_label(path),
            progress_every,
            lines_read: 0,
            buf: Vec::new(),
        })
    }

    /// Returns the next line without its terminator, or `None` at EOF.
    pub fn next_line(&mut self) -> Result<Option<String>, ExtractError> {
        self.buf.clear();
        let n = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| ExtractError::Read {
                path: self.path.clone(),
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        self.lines_read += 1;
        if self.progress_every > 0 && self.lines_read % self.progress_every == 0 {
            info!("[{}] read {} lines", self.label, self.lines_read);
        }
        let mut line = String::from_utf8_lossy(&self.buf).into_owned();
        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

/// Field-vector iterator over a delimited text file.
///
/// Splitting preserves empty fields, including trailing ones, so RRF rows
/// keep their positional layout.
pub struct FieldReader {
    lines: LineReader,
    delimiter: char,
}

impl FieldReader {
    /// Reader for pipe-delimited UMLS/RxNorm RRF files.
    pub fn rrf(path: &Path, progress_every: u64) -> Result<Self, ExtractError> {
        Ok(FieldReader {
            lines: LineReader::open(path, progress_every)?,
            delimiter: '|',
        })
    }

    /// Reader for tab-separated files (SIDER).
    pub fn tsv(path: &Path, progress_every: u64) -> Result<Self, ExtractError> {
        Ok(FieldReader {
            lines: LineReader::open(path, progress_every)?,
            delimiter: '\t',
        })
    }

    pub fn next_row(&mut self) -> Result<Option<Vec<String>>, ExtractError> {
        Ok(self
            .lines
            .next_line()?
            .map(|line| line.split(self.delimiter).map(str::to_owned).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn rrf_rows_preserve_trailing_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.RRF", b"C01|ENG||Y|text||\nC02|FRE|\n");
        let mut reader = FieldReader::rrf(&path, 0).unwrap();
        assert_eq!(
            reader.next_row().unwrap().unwrap(),
            vec!["C01", "ENG", "", "Y", "text", "", ""]
        );
        assert_eq!(reader.next_row().unwrap().unwrap(), vec!["C02", "FRE", ""]);
        assert!(reader.next_row().unwrap().is_none());
    }

    #[test]
    fn gzip_is_transparent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.tsv.gz");
        let mut enc = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::fast());
        enc.write_all(b"a\tb\nc\td\n").unwrap();
        enc.finish().unwrap();

        let mut reader = FieldReader::tsv(&path, 0).unwrap();
        assert_eq!(reader.next_row().unwrap().unwrap(), vec!["a", "b"]);
        assert_eq!(reader.next_row().unwrap().unwrap(), vec!["c", "d"]);
        assert!(reader.next_row().unwrap().is_none());
    }

    #[test]
    fn malformed_utf8_is_replaced_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.RRF", b"C01|bad\xffbyte\n");
        let mut reader = FieldReader::rrf(&path, 0).unwrap();
        let row = reader.next_row().unwrap().unwrap();
        assert_eq!(row[0], "C01");
        assert!(row[1].contains('\u{FFFD}'));
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "x.tsv", b"a\tb\r\nc\td");
        let mut reader = FieldReader::tsv(&path, 0).unwrap();
        assert_eq!(reader.next_row().unwrap().unwrap(), vec!["a", "b"]);
        // last line without terminator still comes through
        assert_eq!(reader.next_row().unwrap().unwrap(), vec!["c", "d"]);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = LineReader::open(Path::new("/nonexistent/file.RRF"), 0).unwrap_err();
        assert!(matches!(err, ExtractError::Open { .. }));
    }
}
