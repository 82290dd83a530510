//! Where redacted documents end up

use redact_core::RedactedArtifact;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::info;

/// Receives the bytes of a successful redaction
pub trait DownloadSink: Send + Sync {
    /// Returns where the document was stored
    fn deliver(&self, artifact: &RedactedArtifact) -> io::Result<PathBuf>;
}

/// Saves into a directory without overwriting existing files
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

const MAX_SUFFIX: usize = 10_000;

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: &RedactedArtifact) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(&artifact.bytes)?;
        file.flush()?;

        for n in 0..MAX_SUFFIX {
            let target = self.dir.join(candidate_name(&artifact.file_name, n));
            if target.exists() {
                continue;
            }
            match file.persist_noclobber(&target) {
                Ok(_) => {
                    info!("Saved {} ({} bytes)", target.display(), artifact.size());
                    return Ok(target);
                }
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => file = e.file,
                Err(e) => return Err(e.error),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("No free name for {} in {}", artifact.file_name, self.dir.display()),
        ))
    }
}

/// `name.ext`, then `name (1).ext`, `name (2).ext`, ...
fn candidate_name(file_name: &str, n: usize) -> String {
    if n == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, n, ext),
        _ => format!("{} ({})", file_name, n),
    }
}

/// Keeps delivered artifacts in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    delivered: Mutex<Vec<RedactedArtifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<RedactedArtifact> {
        self.delivered
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, artifact: &RedactedArtifact) -> io::Result<PathBuf> {
        self.delivered
            .lock()
            .map_err(|_| io::Error::other("memory sink poisoned"))?
            .push(artifact.clone());
        Ok(PathBuf::from(&artifact.file_name))
    }
}
