use crate::load::error::LoadError;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writer that lands a file atomically: bytes go to a temporary file in the
/// destination directory and the file is renamed into place on [`commit`].
///
/// A partial write that is never committed leaves no trace — the temporary
/// file is removed on drop — so interrupted stages can simply be re-run.
///
/// [`commit`]: AtomicFile::commit
pub struct AtomicFile {
    dest: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl AtomicFile {
    pub fn create(dest: &Path) -> Result<Self, LoadError> {
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|source| LoadError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
        let tmp = NamedTempFile::new_in(parent).map_err(|source| LoadError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        Ok(AtomicFile {
            dest: dest.to_path_buf(),
            writer: BufWriter::new(tmp),
        })
    }

    pub fn commit(mut self) -> Result<(), LoadError> {
        self.writer.flush().map_err(|source| LoadError::Io {
            path: self.dest.clone(),
            source,
        })?;
        let tmp = self.writer.into_inner().map_err(|e| LoadError::Io {
            path: self.dest.clone(),
            source: e.into_error(),
        })?;
        tmp.persist(&self.dest).map_err(|e| LoadError::Persist {
            path: self.dest.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
