//! Artifact storage.
//!
//! Jobs write their outputs to paths handed out by an [`ArtifactAllocator`];
//! the HTTP layer reads them back through an [`ArtifactResponder`].
//!
//! # Example
//!
//! ```ignore
//! use cropcolor::artifact::{ArtifactAllocator, ArtifactResponder, TempFileAllocator};
//! use cropcolor::job::ArtifactKind;
//!
//! let allocator = TempFileAllocator::new("outputs");
//! let path = allocator.reserve(ArtifactKind::Czml)?;
//!
//! let responder = ArtifactResponder::new("outputs");
//! let body = responder.respond(path.file_name().unwrap().to_str().unwrap())?;
//! ```

mod allocator;
mod responder;

pub use allocator::{ArtifactAllocator, SequentialAllocator, TempFileAllocator, ARTIFACT_PREFIX};
pub use responder::{
    media_type_for, ArtifactBody, ArtifactNotFound, ArtifactResponder, XML_MEDIA_TYPE,
};
