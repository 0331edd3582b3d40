//! cropcolor - raster cropping and color relief as a job service.
//!
//! A `crop_color` job takes a source raster, optionally crops it to an
//! extent and/or cutline polygons, optionally applies a color palette, and
//! produces a CZML document and/or a GeoTIFF. Jobs arrive over a small
//! WPS-style HTTP surface or from the command line.
//!
//! The pipeline, from request to response:
//!
//! ```text
//! request ──► job::resolve ──► JobSpec ──► JobOrchestrator ──► OutputSet
//!                                  │             │
//!                                  │     raster::{RasterAccess, RasterTransformer}
//!                                  │     artifact::ArtifactAllocator
//!                                  └── server renders outputs as artifact links
//! ```

pub mod app;
pub mod artifact;
pub mod config;
pub mod extent;
pub mod job;
pub mod logging;
pub mod raster;
pub mod request;
pub mod server;

/// Crate version, reported by the CLI and in startup logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
