//! Capability traits for raster access and transformation.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::extent::GeoRectangle;
use crate::job::{ContainerFormat, Resource};

/// Errors reported by a raster engine.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The dataset could not be opened or recognized.
    #[error("unreadable raster: {0}")]
    Unreadable(String),

    /// An engine tool exited unsuccessfully.
    #[error("{tool} failed (exit status {status:?}): {stderr}")]
    Tool {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    /// An engine tool could not be started.
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// Dataset metadata was missing or malformed.
    #[error("invalid dataset metadata: {0}")]
    Metadata(String),

    /// Filesystem error while preparing inputs or writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// An open source raster.
///
/// Implementations release the underlying dataset when dropped, so the
/// handle is released on every exit path of the code that owns it.
pub trait RasterHandle: Send + fmt::Debug {
    /// Reference the handle was opened from.
    fn reference(&self) -> &str;

    /// Location the engine reads the dataset from.
    fn path(&self) -> &Path;
}

/// Opens source rasters.
pub trait RasterAccess: Send + Sync {
    fn open(&self, reference: &str) -> Result<Box<dyn RasterHandle>, RasterError>;
}

/// Everything a single transformation call needs.
#[derive(Debug, Clone, Copy)]
pub struct TransformRequest<'a> {
    pub source: &'a dyn RasterHandle,
    pub cutline: Option<&'a Resource>,
    pub extent: Option<&'a GeoRectangle>,
    pub color_palette: Option<&'a Resource>,
    pub czml_output: Option<&'a Path>,
    pub tif_output: Option<&'a Path>,
    pub container_format: ContainerFormat,
}

/// What a transformation wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutcome {
    pub czml: Option<PathBuf>,
    pub tif: Option<PathBuf>,
}

/// Crops, masks and colors a raster.
pub trait RasterTransformer: Send + Sync {
    fn transform(&self, request: TransformRequest<'_>) -> Result<TransformOutcome, RasterError>;
}
