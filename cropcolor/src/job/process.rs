//! The published `crop_color` process: resolution plus execution.

use tracing::{info, warn};

use super::error::ProcessError;
use super::orchestrator::JobOrchestrator;
use super::output::OutputSet;
use super::phase::{JobPhase, JobTrace};
use super::spec::resolve;
use crate::request::{ProcessDescription, RawRequest};

/// Outcome of handling one request.
#[derive(Debug)]
pub struct JobRun {
    pub trace: JobTrace,
    pub result: Result<OutputSet, ProcessError>,
}

impl JobRun {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Validates raw requests against the process description and runs them.
#[derive(Clone)]
pub struct CropColorProcess {
    description: ProcessDescription,
    orchestrator: JobOrchestrator,
}

impl CropColorProcess {
    pub fn new(orchestrator: JobOrchestrator) -> Self {
        Self {
            description: ProcessDescription::crop_color(),
            orchestrator,
        }
    }

    pub fn describe(&self) -> &ProcessDescription {
        &self.description
    }

    /// Resolves and executes one request.
    pub fn handle(&self, request: &RawRequest) -> JobRun {
        let mut trace = JobTrace::new();

        let spec = match resolve(request, &self.description) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(error = %e, locator = ?e.locator(), "Rejected request");
                trace.fail();
                return JobRun {
                    trace,
                    result: Err(e.into()),
                };
            }
        };
        trace.advance(JobPhase::Validated);
        info!(
            raster = %spec.raster_ref,
            czml = spec.want_czml,
            tif = spec.want_tif,
            "Accepted request"
        );

        let result = self
            .orchestrator
            .run(&spec, &mut trace)
            .map_err(ProcessError::from);
        JobRun { trace, result }
    }
}
