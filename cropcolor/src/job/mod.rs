//! The `crop_color` job: parameter resolution, execution and outputs.
//!
//! A request flows through [`resolve`] into a typed [`JobSpec`], which a
//! [`JobOrchestrator`] executes against the raster engine. [`CropColorProcess`]
//! composes both and records the lifecycle in a [`JobTrace`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cropcolor::artifact::TempFileAllocator;
//! use cropcolor::job::{CropColorProcess, JobOrchestrator};
//! use cropcolor::raster::GdalEngine;
//!
//! let engine = Arc::new(GdalEngine::new(None));
//! let orchestrator = JobOrchestrator::new(
//!     engine.clone(),
//!     engine,
//!     Arc::new(TempFileAllocator::new("outputs")),
//! );
//! let process = CropColorProcess::new(orchestrator);
//! let run = process.handle(&request);
//! ```

mod error;
mod orchestrator;
mod output;
mod phase;
mod process;
mod spec;

pub use error::{codes, JobError, ProcessError, ValidationError};
pub use orchestrator::JobOrchestrator;
pub use output::{
    Artifact, ArtifactKind, ArtifactLocation, Output, OutputSet, CZML_MEDIA_TYPE,
    GEOTIFF_MEDIA_TYPE, STRING_MEDIA_TYPE,
};
pub use phase::{JobPhase, JobTrace};
pub use process::{CropColorProcess, JobRun};
pub use spec::{
    resolve, ContainerFormat, JobSpec, Resource, DEFAULT_WANT_CZML, DEFAULT_WANT_TIF,
    INPUT_COLOR_PALETTE, INPUT_CUTLINE, INPUT_EXTENT, INPUT_OUTPUT_CZML, INPUT_OUTPUT_TIF,
    INPUT_RASTER,
};
