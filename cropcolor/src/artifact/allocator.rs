//! Reservation of artifact file paths.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::job::ArtifactKind;

/// Prefix of every reserved artifact file name.
pub const ARTIFACT_PREFIX: &str = "crop_color_";

/// Hands out unique, writable paths for job artifacts.
pub trait ArtifactAllocator: Send + Sync {
    /// Reserves a fresh path carrying the kind's extension.
    fn reserve(&self, kind: ArtifactKind) -> io::Result<PathBuf>;
}

/// Reserves empty files with random names in a directory.
///
/// Reserved files are kept on disk so they outlive the job that produced
/// them; cleanup is left to the operator.
#[derive(Debug, Clone)]
pub struct TempFileAllocator {
    dir: PathBuf,
}

impl TempFileAllocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactAllocator for TempFileAllocator {
    fn reserve(&self, kind: ArtifactKind) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let file = tempfile::Builder::new()
            .prefix(ARTIFACT_PREFIX)
            .suffix(kind.extension())
            .tempfile_in(&self.dir)?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        debug!(kind = kind.output_name(), path = %path.display(), "Reserved artifact");
        Ok(path)
    }
}

/// Deterministic `<prefix>-<n><ext>` names in a directory.
///
/// Nothing is created on disk; the transformer writes the file.
#[derive(Debug)]
pub struct SequentialAllocator {
    dir: PathBuf,
    prefix: String,
    next: AtomicU64,
}

impl SequentialAllocator {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }

    /// Number of paths handed out so far.
    pub fn reserved(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl ArtifactAllocator for SequentialAllocator {
    fn reserve(&self, kind: ArtifactKind) -> io::Result<PathBuf> {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .dir
            .join(format!("{}-{}{}", self.prefix, n, kind.extension())))
    }
}
