//! Artifact publication

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

/// Receives finished PNG artifacts and exposes them for retrieval.
///
/// Names are unique within a batch by construction of the conversion loop;
/// the sink does not validate them.
pub trait ArtifactSink {
    /// Discard artifacts published for the previous command.
    fn begin_batch(&mut self);

    /// Make `bytes` retrievable under exactly `name`.
    fn publish(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes artifacts into a directory, one file per page.
///
/// Tracks what it wrote so `begin_batch` removes only its own prior files,
/// never anything else in the directory.
pub struct DirSink {
    dir: PathBuf,
    published: Vec<PathBuf>,
}

impl DirSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            published: Vec::new(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirSink {
    fn begin_batch(&mut self) {
        for path in self.published.drain(..) {
            if let Err(e) = fs::remove_file(&path) {
                debug!("could not remove stale artifact {}: {e}", path.display());
            }
        }
    }

    fn publish(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, bytes)?;
        info!("wrote {}", path.display());
        self.published.push(path);
        Ok(())
    }
}

/// Keeps artifacts in memory: the download-list analog, also used by tests.
#[derive(Debug, Default)]
pub struct MemSink {
    artifacts: Vec<(String, Vec<u8>)>,
}

impl MemSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn artifacts(&self) -> &[(String, Vec<u8>)] {
        &self.artifacts
    }

    /// Published names in publication order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl ArtifactSink for MemSink {
    fn begin_batch(&mut self) {
        self.artifacts.clear();
    }

    fn publish(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.artifacts.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_sink_clears_on_new_batch() {
        let mut sink = MemSink::new();
        sink.publish("a.png", b"one").unwrap();
        sink.publish("b.png", b"two").unwrap();
        assert_eq!(sink.names(), vec!["a.png", "b.png"]);

        sink.begin_batch();
        assert!(sink.artifacts().is_empty());
    }

    #[test]
    fn dir_sink_writes_and_removes_its_own_files() {
        let dir = tempfile::tempdir().unwrap();
        let foreign = dir.path().join("keep.txt");
        fs::write(&foreign, b"untouched").unwrap();

        let mut sink = DirSink::new(dir.path());
        sink.publish("doc_page_1.png", b"png bytes").unwrap();

        let artifact = dir.path().join("doc_page_1.png");
        assert_eq!(fs::read(&artifact).unwrap(), b"png bytes");

        sink.begin_batch();
        assert!(!artifact.exists());
        assert!(foreign.exists());
    }

    #[test]
    fn dir_sink_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("pages");

        let mut sink = DirSink::new(&nested);
        sink.publish("doc_page_1.png", b"png bytes").unwrap();
        assert!(nested.join("doc_page_1.png").exists());
    }
}
