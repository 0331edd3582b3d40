//! GDAL command-line raster engine.
//!
//! Sources are opened with `gdalinfo`, cropped with `gdalwarp`, colored with
//! `gdaldem color-relief` and written out with `gdal_translate`. Intermediate
//! datasets live in a scratch directory that is removed when the
//! transformation returns.

mod czml;
mod info;
mod tools;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::job::{ContainerFormat, Resource};
use crate::raster::{
    RasterAccess, RasterError, RasterHandle, RasterTransformer, TransformOutcome,
    TransformRequest,
};

pub use czml::{rectangle_document, CZML_VERSION};
pub use info::DatasetInfo;
pub use tools::GdalTools;
use tools::{GDALDEM, GDALINFO, GDALWARP, GDAL_TRANSLATE};

/// Prefix for GDAL's network virtual file system.
const VSICURL_PREFIX: &str = "/vsicurl/";

/// Scratch directory name prefix.
const SCRATCH_PREFIX: &str = "crop_color_work";

/// An opened source raster.
#[derive(Debug)]
pub struct GdalDataset {
    reference: String,
    path: PathBuf,
}

impl RasterHandle for GdalDataset {
    fn reference(&self) -> &str {
        &self.reference
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for GdalDataset {
    fn drop(&mut self) {
        debug!(reference = %self.reference, "Released dataset");
    }
}

/// Raster engine backed by the GDAL utilities.
#[derive(Debug, Clone, Default)]
pub struct GdalEngine {
    tools: GdalTools,
    data_dir: Option<PathBuf>,
}

impl GdalEngine {
    /// Creates an engine that runs tools from `bin_dir`, or from `PATH`.
    pub fn new(bin_dir: Option<PathBuf>) -> Self {
        Self {
            tools: GdalTools::new(bin_dir),
            data_dir: None,
        }
    }

    /// Resolves relative references against `dir` when the file exists there.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Maps a reference to the location handed to GDAL.
    pub fn locate(&self, reference: &str) -> PathBuf {
        if is_url(reference) {
            return PathBuf::from(format!("{VSICURL_PREFIX}{reference}"));
        }

        let path = Path::new(reference);
        if path.is_relative() {
            if let Some(dir) = &self.data_dir {
                let candidate = dir.join(path);
                if candidate.exists() {
                    return candidate;
                }
            }
        }
        path.to_path_buf()
    }

    fn info(&self, path: &Path) -> Result<DatasetInfo, RasterError> {
        let stdout = self.tools.run(GDALINFO, tools::info_args(path))?;
        DatasetInfo::from_json(&stdout)
    }

    /// Writes inline content to the scratch directory; references are located.
    fn materialize(
        &self,
        resource: &Resource,
        scratch: &Path,
        file_name: &str,
    ) -> Result<PathBuf, RasterError> {
        match resource {
            Resource::Href(href) => Ok(self.locate(href)),
            Resource::Inline(content) => {
                let path = scratch.join(file_name);
                fs::write(&path, content)?;
                Ok(path)
            }
        }
    }

    fn write_czml(
        &self,
        source: &Path,
        name: &str,
        scratch: &Path,
        czml_path: &Path,
    ) -> Result<(), RasterError> {
        let info = self.info(source)?;
        let bounds = info.wgs84_bounds.ok_or_else(|| {
            RasterError::Metadata(format!("{} has no geographic footprint", source.display()))
        })?;

        let png = scratch.join("preview.png");
        self.tools.run(
            GDAL_TRANSLATE,
            tools::translate_args(source, &png, "PNG", !info.is_byte()),
        )?;

        let document = rectangle_document(name, &bounds, &fs::read(&png)?);
        let bytes =
            serde_json::to_vec(&document).map_err(|e| RasterError::Metadata(e.to_string()))?;
        fs::write(czml_path, bytes)?;
        Ok(())
    }
}

impl RasterAccess for GdalEngine {
    #[instrument(skip(self))]
    fn open(&self, reference: &str) -> Result<Box<dyn RasterHandle>, RasterError> {
        let path = self.locate(reference);
        let info = self.info(&path).map_err(|e| match e {
            RasterError::Tool { stderr, .. } => RasterError::Unreadable(stderr),
            other => other,
        })?;

        debug!(
            path = %path.display(),
            width = info.width,
            height = info.height,
            bands = info.band_count,
            "Opened dataset"
        );

        Ok(Box::new(GdalDataset {
            reference: reference.to_string(),
            path,
        }))
    }
}

impl RasterTransformer for GdalEngine {
    #[instrument(skip_all, fields(source = request.source.reference()))]
    fn transform(&self, request: TransformRequest<'_>) -> Result<TransformOutcome, RasterError> {
        let scratch = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
        let (format, extension) = cli_format(request.container_format);

        let cutline = request
            .cutline
            .map(|r| self.materialize(r, scratch.path(), "cutline.gml"))
            .transpose()?;
        let palette = request
            .color_palette
            .map(|r| self.materialize(r, scratch.path(), "palette.txt"))
            .transpose()?;

        let mut current = request.source.path().to_path_buf();

        if request.extent.is_some() || cutline.is_some() {
            let cropped = scratch.path().join(format!("cropped{extension}"));
            self.tools.run(
                GDALWARP,
                tools::warp_args(
                    &current,
                    &cropped,
                    format,
                    request.extent,
                    cutline.as_deref(),
                ),
            )?;
            current = cropped;
        }

        if let Some(palette) = &palette {
            let colored = scratch.path().join(format!("colored{extension}"));
            self.tools.run(
                GDALDEM,
                tools::color_relief_args(&current, palette, &colored, format),
            )?;
            current = colored;
        }

        let mut outcome = TransformOutcome::default();

        if let Some(tif) = request.tif_output {
            self.tools
                .run(GDAL_TRANSLATE, tools::translate_args(&current, tif, "GTiff", false))?;
            outcome.tif = Some(tif.to_path_buf());
        }

        if let Some(czml) = request.czml_output {
            let name = display_name(request.source.reference());
            self.write_czml(&current, &name, scratch.path(), czml)?;
            outcome.czml = Some(czml.to_path_buf());
        }

        info!(
            czml = outcome.czml.is_some(),
            tif = outcome.tif.is_some(),
            "Transformation complete"
        );
        Ok(outcome)
    }
}

/// Output format and extension for intermediate datasets.
///
/// The utilities cannot hand a `MEM` dataset to one another, so the
/// in-memory container is expressed as a VRT in the scratch directory.
fn cli_format(container: ContainerFormat) -> (&'static str, &'static str) {
    match container {
        ContainerFormat::GTiff => ("GTiff", ".tif"),
        ContainerFormat::Memory => ("VRT", ".vrt"),
    }
}

fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

fn display_name(reference: &str) -> String {
    Path::new(reference)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| reference.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_urls_through_vsicurl() {
        let engine = GdalEngine::default();
        assert_eq!(
            engine.locate("https://example.com/dem.tif"),
            PathBuf::from("/vsicurl/https://example.com/dem.tif")
        );
    }

    #[test]
    fn test_locate_prefers_data_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dem.tif"), b"").unwrap();
        let engine = GdalEngine::default().with_data_dir(temp.path());

        assert_eq!(engine.locate("dem.tif"), temp.path().join("dem.tif"));
        assert_eq!(engine.locate("other.tif"), PathBuf::from("other.tif"));
        assert_eq!(engine.locate("/abs/dem.tif"), PathBuf::from("/abs/dem.tif"));
    }

    #[test]
    fn test_materialize_inline_writes_scratch_file() {
        let temp = TempDir::new().unwrap();
        let engine = GdalEngine::default();

        let path = engine
            .materialize(
                &Resource::Inline("0 0 0 255\n100 255 0 0".to_string()),
                temp.path(),
                "palette.txt",
            )
            .unwrap();
        assert_eq!(path, temp.path().join("palette.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "0 0 0 255\n100 255 0 0");

        let path = engine
            .materialize(&Resource::Href("/data/cut.gml".to_string()), temp.path(), "cutline.gml")
            .unwrap();
        assert_eq!(path, PathBuf::from("/data/cut.gml"));
    }

    #[test]
    fn test_cli_format() {
        assert_eq!(cli_format(ContainerFormat::GTiff), ("GTiff", ".tif"));
        assert_eq!(cli_format(ContainerFormat::Memory), ("VRT", ".vrt"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("static/sample/srtm_x35_y32.tif"), "srtm_x35_y32.tif");
        assert_eq!(display_name("https://host/a/b.tif"), "b.tif");
    }

    #[test]
    fn test_open_without_tools_fails() {
        let engine = GdalEngine::new(Some(PathBuf::from("/nonexistent/gdal/bin")));
        let err = engine.open("dem.tif").unwrap_err();
        assert!(matches!(err, RasterError::Launch { .. }));
    }
}
