//! Raster engine abstraction.
//!
//! The orchestrator only depends on the [`RasterAccess`] and
//! [`RasterTransformer`] traits. [`GdalEngine`] implements both on top of the
//! GDAL command-line utilities.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cropcolor::raster::GdalEngine;
//!
//! let engine = Arc::new(GdalEngine::new(None).with_data_dir("data"));
//! let handle = engine.open("srtm_x35_y32.tif")?;
//! ```

mod gdal;
mod types;

pub use gdal::{rectangle_document, DatasetInfo, GdalDataset, GdalEngine, GdalTools, CZML_VERSION};
pub use types::{
    RasterAccess, RasterError, RasterHandle, RasterTransformer, TransformOutcome,
    TransformRequest,
};
