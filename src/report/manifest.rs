use crate::report::stage_report::StageReport;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Tag written into every manifest so consumers can recognize the producer.
pub const BUILDER_TAG: &str = "biokg_kb_build";

/// SHA-256 of a file's bytes, hex-encoded, streamed in 1 MiB chunks.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDigest {
    pub sha256: String,
    pub bytes: u64,
}

/// The self-describing summary of one build: every stage report in run order
/// plus a content hash and byte length for each tracked output.
///
/// The timestamp is the only field allowed to differ between re-runs on
/// identical inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildManifest {
    pub builder: String,
    pub version: String,
    pub timestamp_utc: String,
    pub raw_root: String,
    pub output_dir: String,
    pub stages: Vec<StageReport>,
    pub files: BTreeMap<String, FileDigest>,
}

impl BuildManifest {
    /// Digests every tracked path that exists and assembles the manifest.
    pub fn collect(
        raw_root: &Path,
        output_dir: &Path,
        version: &str,
        stages: Vec<StageReport>,
        tracked: &[std::path::PathBuf],
    ) -> std::io::Result<BuildManifest> {
        let mut files = BTreeMap::new();
        for path in tracked {
            if path.exists() {
                let digest = FileDigest {
                    sha256: sha256_file(path)?,
                    bytes: std::fs::metadata(path)?.len(),
                };
                files.insert(path.display().to_string(), digest);
            }
        }
        Ok(BuildManifest {
            builder: BUILDER_TAG.to_string(),
            version: version.to_string(),
            timestamp_utc: chrono::Utc::now().to_rfc3339(),
            raw_root: raw_root.display().to_string(),
            output_dir: output_dir.display().to_string(),
            stages,
            files,
        })
    }
}
