//! Job outputs and artifacts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Media type of CZML documents.
pub const CZML_MEDIA_TYPE: &str = "application/czml+json";

/// Media type of GeoTIFF rasters.
pub const GEOTIFF_MEDIA_TYPE: &str = "image/tiff; subtype=geotiff";

/// Media type of the raster-name echo.
pub const STRING_MEDIA_TYPE: &str = "text/plain";

/// The kinds of output a job can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Czml,
    Tif,
    RasterNameEcho,
}

impl ArtifactKind {
    /// Output identifier in the response.
    pub fn output_name(&self) -> &'static str {
        match self {
            ArtifactKind::Czml => "czml",
            ArtifactKind::Tif => "tif",
            ArtifactKind::RasterNameEcho => "r",
        }
    }

    /// File extension, including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Czml => ".czml",
            ArtifactKind::Tif => ".tif",
            ArtifactKind::RasterNameEcho => ".txt",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ArtifactKind::Czml => CZML_MEDIA_TYPE,
            ArtifactKind::Tif => GEOTIFF_MEDIA_TYPE,
            ArtifactKind::RasterNameEcho => STRING_MEDIA_TYPE,
        }
    }
}

/// Where an artifact's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    File(PathBuf),
    Inline(Vec<u8>),
}

/// A typed output produced by a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub media_type: &'static str,
    pub location: ArtifactLocation,
}

impl Artifact {
    /// An artifact stored in a file, typed by its kind.
    pub fn file(kind: ArtifactKind, path: PathBuf) -> Self {
        Self {
            kind,
            media_type: kind.media_type(),
            location: ArtifactLocation::File(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            ArtifactLocation::File(path) => Some(path),
            ArtifactLocation::Inline(_) => None,
        }
    }
}

/// One named output value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Literal(String),
    Artifact(Artifact),
}

/// Outputs of one job, keyed by output identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSet {
    outputs: BTreeMap<&'static str, Output>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the raster-name echo.
    pub fn set_raster_name(&mut self, raster_ref: &str) {
        self.outputs.insert(
            ArtifactKind::RasterNameEcho.output_name(),
            Output::Literal(raster_ref.to_string()),
        );
    }

    /// Attaches an artifact under its kind's output name.
    pub fn attach(&mut self, artifact: Artifact) {
        self.outputs
            .insert(artifact.kind.output_name(), Output::Artifact(artifact));
    }

    pub fn raster_name(&self) -> Option<&str> {
        match self.outputs.get(ArtifactKind::RasterNameEcho.output_name()) {
            Some(Output::Literal(name)) => Some(name),
            _ => None,
        }
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        match self.outputs.get(kind.output_name()) {
            Some(Output::Artifact(artifact)) => Some(artifact),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Output> {
        self.outputs.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.outputs.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Output)> {
        self.outputs.iter().map(|(name, output)| (*name, output))
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
