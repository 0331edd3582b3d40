//! Job execution: open, reserve, transform, package.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, info_span, warn};

use super::error::JobError;
use super::output::{Artifact, ArtifactKind, OutputSet};
use super::phase::{JobPhase, JobTrace};
use super::spec::JobSpec;
use crate::artifact::ArtifactAllocator;
use crate::raster::{RasterAccess, RasterTransformer, TransformRequest};

/// Executes resolved jobs against a raster engine.
///
/// Holds no per-job state; one orchestrator serves any number of
/// concurrent jobs.
#[derive(Clone)]
pub struct JobOrchestrator {
    access: Arc<dyn RasterAccess>,
    transformer: Arc<dyn RasterTransformer>,
    allocator: Arc<dyn ArtifactAllocator>,
}

impl JobOrchestrator {
    pub fn new(
        access: Arc<dyn RasterAccess>,
        transformer: Arc<dyn RasterTransformer>,
        allocator: Arc<dyn ArtifactAllocator>,
    ) -> Self {
        Self {
            access,
            transformer,
            allocator,
        }
    }

    /// Runs a job from a freshly validated trace.
    pub fn execute(&self, spec: &JobSpec) -> Result<OutputSet, JobError> {
        let mut trace = JobTrace::validated();
        self.run(spec, &mut trace)
    }

    /// Runs a job, recording each phase in `trace`.
    ///
    /// `trace` must be positioned at `Validated`. On error the trace ends in
    /// `Failed` and no outputs are returned.
    pub fn run(&self, spec: &JobSpec, trace: &mut JobTrace) -> Result<OutputSet, JobError> {
        let span = info_span!("job", raster = %spec.raster_ref);
        let _enter = span.enter();

        let result = self.run_phases(spec, trace);
        match &result {
            Ok(outputs) => {
                trace.advance(JobPhase::Completed);
                info!(outputs = outputs.len(), "Job completed");
            }
            Err(e) => {
                trace.fail();
                warn!(error = %e, "Job failed");
            }
        }
        result
    }

    fn run_phases(&self, spec: &JobSpec, trace: &mut JobTrace) -> Result<OutputSet, JobError> {
        let mut outputs = OutputSet::new();
        outputs.set_raster_name(&spec.raster_ref);

        if !spec.requires_transformation() {
            debug!("No outputs requested");
            trace.advance(JobPhase::SkippedNoOutput);
            return Ok(outputs);
        }

        let source = self
            .access
            .open(&spec.raster_ref)
            .map_err(|source| JobError::SourceUnreadable {
                reference: spec.raster_ref.clone(),
                source,
            })?;
        trace.advance(JobPhase::Opened);

        let czml_path = self.reserve_if(spec.want_czml, ArtifactKind::Czml)?;
        let tif_path = self.reserve_if(spec.want_tif, ArtifactKind::Tif)?;

        let request = TransformRequest {
            source: source.as_ref(),
            cutline: spec.cutline.as_ref(),
            extent: spec.extent.as_ref(),
            color_palette: spec.color_palette.as_ref(),
            czml_output: czml_path.as_deref(),
            tif_output: tif_path.as_deref(),
            container_format: spec.output_container_format,
        };

        let outcome = self
            .transformer
            .transform(request)
            .map_err(JobError::TransformationFailed)?;
        drop(source);
        trace.advance(JobPhase::Transformed);

        debug!(?outcome, "Transformation returned");

        if let Some(path) = czml_path {
            outputs.attach(Artifact::file(ArtifactKind::Czml, path));
        }
        if let Some(path) = tif_path {
            outputs.attach(Artifact::file(ArtifactKind::Tif, path));
        }
        trace.advance(JobPhase::Packaged);

        Ok(outputs)
    }

    fn reserve_if(&self, wanted: bool, kind: ArtifactKind) -> Result<Option<PathBuf>, JobError> {
        if !wanted {
            return Ok(None);
        }
        self.allocator
            .reserve(kind)
            .map(Some)
            .map_err(|source| JobError::ArtifactAllocation {
                kind: kind.output_name(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::SequentialAllocator;
    use crate::extent::GeoRectangle;
    use crate::job::{ContainerFormat, Resource};
    use crate::raster::{RasterError, RasterHandle, TransformOutcome};
    use std::io;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct MockHandle {
        reference: String,
        path: PathBuf,
        released: Arc<AtomicUsize>,
    }

    impl RasterHandle for MockHandle {
        fn reference(&self) -> &str {
            &self.reference
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for MockHandle {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct MockAccess {
        unreadable: bool,
        opened: AtomicUsize,
        released: Arc<AtomicUsize>,
    }

    impl RasterAccess for MockAccess {
        fn open(&self, reference: &str) -> Result<Box<dyn RasterHandle>, RasterError> {
            if self.unreadable {
                return Err(RasterError::Unreadable(format!("{reference}: no such file")));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockHandle {
                reference: reference.to_string(),
                path: PathBuf::from(reference),
                released: Arc::clone(&self.released),
            }))
        }
    }

    /// Records what each call received.
    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        source: String,
        cutline: Option<Resource>,
        extent: Option<GeoRectangle>,
        palette: Option<Resource>,
        czml: Option<PathBuf>,
        tif: Option<PathBuf>,
        container: ContainerFormat,
    }

    #[derive(Default)]
    struct MockTransformer {
        fail: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl MockTransformer {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RasterTransformer for MockTransformer {
        fn transform(&self, request: TransformRequest<'_>) -> Result<TransformOutcome, RasterError> {
            self.calls.lock().unwrap().push(Call {
                source: request.source.reference().to_string(),
                cutline: request.cutline.cloned(),
                extent: request.extent.copied(),
                palette: request.color_palette.cloned(),
                czml: request.czml_output.map(Path::to_path_buf),
                tif: request.tif_output.map(Path::to_path_buf),
                container: request.container_format,
            });
            if self.fail {
                return Err(RasterError::Tool {
                    tool: "gdalwarp".to_string(),
                    status: Some(1),
                    stderr: "ERROR 1: cutline does not intersect".to_string(),
                });
            }
            Ok(TransformOutcome {
                czml: request.czml_output.map(Path::to_path_buf),
                tif: request.tif_output.map(Path::to_path_buf),
            })
        }
    }

    struct FailingAllocator;

    impl ArtifactAllocator for FailingAllocator {
        fn reserve(&self, _kind: ArtifactKind) -> io::Result<PathBuf> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    struct Fixture {
        access: Arc<MockAccess>,
        transformer: Arc<MockTransformer>,
        allocator: Arc<SequentialAllocator>,
        orchestrator: JobOrchestrator,
    }

    fn fixture(access: MockAccess, transformer: MockTransformer) -> Fixture {
        let access = Arc::new(access);
        let transformer = Arc::new(transformer);
        let allocator = Arc::new(SequentialAllocator::new("/out", "a"));
        let orchestrator = JobOrchestrator::new(
            access.clone(),
            transformer.clone(),
            allocator.clone(),
        );
        Fixture {
            access,
            transformer,
            allocator,
            orchestrator,
        }
    }

    #[test]
    fn test_default_outputs_produce_czml_only() {
        let f = fixture(MockAccess::default(), MockTransformer::default());
        let spec = JobSpec::new("dem.tif");

        let outputs = f.orchestrator.execute(&spec).unwrap();

        assert_eq!(outputs.raster_name(), Some("dem.tif"));
        let czml = outputs.artifact(ArtifactKind::Czml).unwrap();
        assert_eq!(czml.media_type, "application/czml+json");
        assert_eq!(czml.path(), Some(Path::new("/out/a-1.czml")));
        assert!(outputs.artifact(ArtifactKind::Tif).is_none());

        let calls = f.transformer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].czml, Some(PathBuf::from("/out/a-1.czml")));
        assert_eq!(calls[0].tif, None);
        assert_eq!(calls[0].container, ContainerFormat::Memory);
    }

    #[test]
    fn test_tif_only() {
        let f = fixture(MockAccess::default(), MockTransformer::default());
        let spec = JobSpec::new("dem.tif").with_outputs(false, true);

        let outputs = f.orchestrator.execute(&spec).unwrap();

        assert!(outputs.artifact(ArtifactKind::Czml).is_none());
        let tif = outputs.artifact(ArtifactKind::Tif).unwrap();
        assert!(tif.media_type.starts_with("image/tiff"));
        assert_eq!(tif.path(), Some(Path::new("/out/a-1.tif")));
        assert_eq!(f.transformer.calls()[0].container, ContainerFormat::GTiff);
    }

    #[test]
    fn test_both_outputs_single_transformation() {
        let f = fixture(MockAccess::default(), MockTransformer::default());
        let spec = JobSpec::new("dem.tif").with_outputs(true, true);

        let outputs = f.orchestrator.execute(&spec).unwrap();

        assert_eq!(outputs.len(), 3);
        assert_eq!(f.transformer.calls().len(), 1);
        assert_eq!(f.allocator.reserved(), 2);
    }

    #[test]
    fn test_no_outputs_skips_everything() {
        let f = fixture(MockAccess::default(), MockTransformer::default());
        let spec = JobSpec::new("dem.tif").with_outputs(false, false);
        let mut trace = JobTrace::validated();

        let outputs = f.orchestrator.run(&spec, &mut trace).unwrap();

        assert_eq!(outputs.names().collect::<Vec<_>>(), vec!["r"]);
        assert_eq!(outputs.raster_name(), Some("dem.tif"));
        assert!(f.transformer.calls().is_empty());
        assert_eq!(f.access.opened.load(Ordering::SeqCst), 0);
        assert_eq!(f.allocator.reserved(), 0);
        assert_eq!(
            trace.phases(),
            &[
                JobPhase::Received,
                JobPhase::Validated,
                JobPhase::SkippedNoOutput,
                JobPhase::Completed,
            ]
        );
    }

    #[test]
    fn test_unreadable_source_reserves_nothing() {
        let access = MockAccess {
            unreadable: true,
            ..Default::default()
        };
        let f = fixture(access, MockTransformer::default());
        let spec = JobSpec::new("missing.tif").with_outputs(true, true);
        let mut trace = JobTrace::validated();

        let err = f.orchestrator.run(&spec, &mut trace).unwrap_err();

        assert!(matches!(err, JobError::SourceUnreadable { ref reference, .. } if reference == "missing.tif"));
        assert_eq!(f.allocator.reserved(), 0);
        assert!(f.transformer.calls().is_empty());
        assert_eq!(trace.current(), JobPhase::Failed);
    }

    #[test]
    fn test_transformation_failure_releases_handle() {
        let f = fixture(MockAccess::default(), MockTransformer::failing());
        let spec = JobSpec::new("dem.tif").with_outputs(true, true);
        let mut trace = JobTrace::validated();

        let err = f.orchestrator.run(&spec, &mut trace).unwrap_err();

        assert!(matches!(err, JobError::TransformationFailed(_)));
        assert_eq!(f.access.opened.load(Ordering::SeqCst), 1);
        assert_eq!(f.access.released.load(Ordering::SeqCst), 1);
        assert_eq!(
            trace.phases(),
            &[JobPhase::Received, JobPhase::Validated, JobPhase::Opened, JobPhase::Failed]
        );
    }

    #[test]
    fn test_success_releases_handle() {
        let f = fixture(MockAccess::default(), MockTransformer::default());
        let mut trace = JobTrace::validated();

        f.orchestrator
            .run(&JobSpec::new("dem.tif"), &mut trace)
            .unwrap();

        assert_eq!(f.access.released.load(Ordering::SeqCst), 1);
        assert_eq!(
            trace.phases(),
            &[
                JobPhase::Received,
                JobPhase::Validated,
                JobPhase::Opened,
                JobPhase::Transformed,
                JobPhase::Packaged,
                JobPhase::Completed,
            ]
        );
    }

    #[test]
    fn test_allocation_failure_releases_handle() {
        let access = Arc::new(MockAccess::default());
        let transformer = Arc::new(MockTransformer::default());
        let orchestrator =
            JobOrchestrator::new(access.clone(), transformer.clone(), Arc::new(FailingAllocator));

        let err = orchestrator.execute(&JobSpec::new("dem.tif")).unwrap_err();

        assert!(matches!(err, JobError::ArtifactAllocation { kind: "czml", .. }));
        assert_eq!(access.released.load(Ordering::SeqCst), 1);
        assert!(transformer.calls().is_empty());
    }

    #[test]
    fn test_optional_inputs_are_forwarded() {
        let f = fixture(MockAccess::default(), MockTransformer::default());
        let extent = GeoRectangle::from_wire(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        let spec = JobSpec::new("dem.tif")
            .with_extent(extent)
            .with_cutline(Resource::Href("area.gml".to_string()))
            .with_color_palette(Resource::Inline(String::new()));

        f.orchestrator.execute(&spec).unwrap();

        let call = &f.transformer.calls()[0];
        assert_eq!(call.source, "dem.tif");
        assert_eq!(call.extent, Some(extent));
        assert_eq!(call.cutline, Some(Resource::Href("area.gml".to_string())));
        assert_eq!(call.palette, Some(Resource::Inline(String::new())));
    }

    #[test]
    fn test_concurrent_jobs_get_distinct_paths() {
        let f = fixture(MockAccess::default(), MockTransformer::default());
        let orchestrator = f.orchestrator.clone();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let orchestrator = orchestrator.clone();
                std::thread::spawn(move || {
                    orchestrator
                        .execute(&JobSpec::new(format!("dem{i}.tif")))
                        .unwrap()
                })
            })
            .collect();

        let mut paths: Vec<PathBuf> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .map(|o| o.artifact(ArtifactKind::Czml).unwrap().path().unwrap().to_path_buf())
            .collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);
    }
}
