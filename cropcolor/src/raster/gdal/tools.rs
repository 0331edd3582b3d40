//! Invocation of the GDAL command-line utilities.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::extent::GeoRectangle;
use crate::raster::RasterError;

pub const GDALINFO: &str = "gdalinfo";
pub const GDALWARP: &str = "gdalwarp";
pub const GDALDEM: &str = "gdaldem";
pub const GDAL_TRANSLATE: &str = "gdal_translate";

/// Runs GDAL tools from `PATH` or from a configured directory.
#[derive(Debug, Clone, Default)]
pub struct GdalTools {
    bin_dir: Option<PathBuf>,
}

impl GdalTools {
    pub fn new(bin_dir: Option<PathBuf>) -> Self {
        Self { bin_dir }
    }

    /// Path or bare name of a tool executable.
    pub fn program(&self, tool: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(tool),
            None => PathBuf::from(tool),
        }
    }

    /// True when `gdalinfo --version` runs successfully.
    pub fn is_available(&self) -> bool {
        Command::new(self.program(GDALINFO))
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Runs a tool to completion and returns its stdout.
    pub fn run<I, S>(&self, tool: &str, args: I) -> Result<Vec<u8>, RasterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        debug!(tool, args = ?args, "Running GDAL tool");

        let output = Command::new(self.program(tool))
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RasterError::Launch {
                tool: tool.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(RasterError::Tool {
                tool: tool.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        trace!(tool, bytes = output.stdout.len(), "GDAL tool finished");
        Ok(output.stdout)
    }
}

/// `gdalinfo -json <src>`
pub fn info_args(src: &Path) -> Vec<OsString> {
    vec!["-json".into(), src.into()]
}

/// `gdalwarp` arguments cropping `src` to an extent and/or cutline.
pub fn warp_args(
    src: &Path,
    dst: &Path,
    format: &str,
    extent: Option<&GeoRectangle>,
    cutline: Option<&Path>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-overwrite".into(), "-of".into(), format.into()];

    if let Some(extent) = extent {
        args.push("-te".into());
        for v in extent.wsen() {
            args.push(v.to_string().into());
        }
        args.push("-te_srs".into());
        args.push("EPSG:4326".into());
    }

    if let Some(cutline) = cutline {
        args.push("-cutline".into());
        args.push(cutline.into());
        args.push("-crop_to_cutline".into());
        args.push("-dstalpha".into());
    }

    args.push(src.into());
    args.push(dst.into());
    args
}

/// `gdaldem color-relief` arguments.
pub fn color_relief_args(src: &Path, palette: &Path, dst: &Path, format: &str) -> Vec<OsString> {
    vec![
        "color-relief".into(),
        src.into(),
        palette.into(),
        dst.into(),
        "-alpha".into(),
        "-of".into(),
        format.into(),
    ]
}

/// `gdal_translate` arguments. `scale_to_byte` rescales non-byte data.
pub fn translate_args(src: &Path, dst: &Path, format: &str, scale_to_byte: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-of".into(), format.into()];
    if scale_to_byte {
        args.push("-ot".into());
        args.push("Byte".into());
        args.push("-scale".into());
    }
    args.push(src.into());
    args.push(dst.into());
    args
}
