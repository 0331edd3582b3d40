//! Serving produced artifacts back to callers.

use std::fs;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Media type for files whose extension mentions XML.
pub const XML_MEDIA_TYPE: &str = "text/xml";

/// A file's contents, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactBody {
    pub bytes: Vec<u8>,
    /// `None` leaves the content type to the caller.
    pub media_type: Option<&'static str>,
}

/// The requested file does not exist under the responder root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("artifact not found: {0}")]
pub struct ArtifactNotFound(pub String);

/// Serves files below a root directory by relative path.
#[derive(Debug, Clone)]
pub struct ArtifactResponder {
    root: PathBuf,
}

impl ArtifactResponder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads `relative` below the root.
    ///
    /// Paths that are absolute or climb out of the root are reported as not
    /// found, the same as missing files.
    pub fn respond(&self, relative: &str) -> Result<ArtifactBody, ArtifactNotFound> {
        let not_found = || ArtifactNotFound(relative.to_string());

        let path = Path::new(relative);
        let contained = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if relative.is_empty() || !contained {
            debug!(path = relative, "Rejected artifact path");
            return Err(not_found());
        }

        let full = self.root.join(path);
        if !full.is_file() {
            return Err(not_found());
        }
        let bytes = fs::read(&full).map_err(|_| not_found())?;

        Ok(ArtifactBody {
            bytes,
            media_type: media_type_for(path),
        })
    }
}

/// `text/xml` when the extension contains lowercase `xml`, otherwise
/// unspecified. The match is case-sensitive.
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    path.extension()
        .filter(|ext| ext.to_string_lossy().contains("xml"))
        .map(|_| XML_MEDIA_TYPE)
}
