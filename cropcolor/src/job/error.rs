//! Job error types.
//!
//! Validation failures are reported before anything runs; execution failures
//! are terminal for the job. Neither is retried.

use std::io;

use thiserror::Error;

use crate::extent::ExtentError;
use crate::raster::RasterError;

/// OWS exception codes used when reporting errors to callers.
pub mod codes {
    pub const MISSING_PARAMETER_VALUE: &str = "MissingParameterValue";
    pub const INVALID_PARAMETER_VALUE: &str = "InvalidParameterValue";
    pub const NO_APPLICABLE_CODE: &str = "NoApplicableCode";
}

/// Request rejected before execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The request targets a process that is not published.
    #[error("unknown process '{0}'")]
    UnknownProcess(String),

    /// An input the process does not declare.
    #[error("unknown input '{0}'")]
    UnknownInput(String),

    /// A required input is absent.
    #[error("missing required input '{0}'")]
    MissingInput(String),

    /// An input occurs more often than declared.
    #[error("input '{identifier}' occurs {found} times (max {max})")]
    TooManyOccurrences {
        identifier: String,
        max: usize,
        found: usize,
    },

    /// A literal value could not be interpreted.
    #[error("input '{identifier}' has invalid value '{value}', expected {expected}")]
    InvalidLiteral {
        identifier: String,
        value: String,
        expected: &'static str,
    },

    /// A resource input carries a value that is not a resource.
    #[error("input '{identifier}' is not a valid resource: {reason}")]
    InvalidResource { identifier: String, reason: String },

    /// The extent is not four numeric ordinates in EPSG:4326.
    #[error("malformed extent: {0}")]
    MalformedExtent(#[from] ExtentError),

    /// A `DataInputs` entry could not be parsed.
    #[error("malformed DataInputs entry '{0}'")]
    MalformedDataInputs(String),
}

impl ValidationError {
    /// OWS exception code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingInput(_) => codes::MISSING_PARAMETER_VALUE,
            _ => codes::INVALID_PARAMETER_VALUE,
        }
    }

    /// Name of the offending parameter, if there is one.
    pub fn locator(&self) -> Option<&str> {
        match self {
            ValidationError::UnknownProcess(_) => Some("identifier"),
            ValidationError::UnknownInput(name) | ValidationError::MissingInput(name) => Some(name),
            ValidationError::TooManyOccurrences { identifier, .. }
            | ValidationError::InvalidLiteral { identifier, .. }
            | ValidationError::InvalidResource { identifier, .. } => Some(identifier),
            ValidationError::MalformedExtent(_) => Some("extent"),
            ValidationError::MalformedDataInputs(_) => Some("DataInputs"),
        }
    }
}

/// Failure while executing a resolved job.
#[derive(Debug, Error)]
pub enum JobError {
    /// The source raster could not be opened.
    #[error("cannot open file {reference}: {source}")]
    SourceUnreadable {
        reference: String,
        #[source]
        source: RasterError,
    },

    /// A temporary artifact path could not be reserved.
    #[error("failed to reserve {kind} artifact: {source}")]
    ArtifactAllocation {
        kind: &'static str,
        #[source]
        source: io::Error,
    },

    /// The transformation engine reported an error.
    #[error("transformation failed: {0}")]
    TransformationFailed(#[source] RasterError),
}

/// Anything that can fail a `crop_color` job.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] JobError),
}

impl ProcessError {
    pub fn code(&self) -> &'static str {
        match self {
            ProcessError::Validation(e) => e.code(),
            ProcessError::Execution(_) => codes::NO_APPLICABLE_CODE,
        }
    }

    pub fn locator(&self) -> Option<&str> {
        match self {
            ProcessError::Validation(e) => e.locator(),
            ProcessError::Execution(_) => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ProcessError::Validation(_))
    }
}
