//! Parameter resolution: raw request → [`JobSpec`].

use tracing::debug;

use super::error::ValidationError;
use crate::extent::{check_crs, parse_wire_extent, ExtentError, GeoRectangle};
use crate::request::{InputValue, ProcessDescription, RawRequest};

pub const INPUT_RASTER: &str = "r";
pub const INPUT_OUTPUT_CZML: &str = "output_czml";
pub const INPUT_OUTPUT_TIF: &str = "output_tif";
pub const INPUT_COLOR_PALETTE: &str = "color_palette";
pub const INPUT_CUTLINE: &str = "cutline";
pub const INPUT_EXTENT: &str = "extent";

/// Default for `output_czml`.
pub const DEFAULT_WANT_CZML: bool = true;

/// Default for `output_tif`.
pub const DEFAULT_WANT_TIF: bool = false;

/// A complex input: either a reference or inline content.
///
/// Inline content may be empty; that is still a present resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Href(String),
    Inline(String),
}

/// Container the engine writes its intermediate raster into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Persisted GeoTIFF.
    GTiff,
    /// Non-persisted, in-memory dataset.
    Memory,
}

impl ContainerFormat {
    /// GDAL driver short name.
    pub fn driver(&self) -> &'static str {
        match self {
            ContainerFormat::GTiff => "GTiff",
            ContainerFormat::Memory => "MEM",
        }
    }

    /// A GeoTIFF container is only needed when the caller asked for one.
    pub fn for_outputs(want_tif: bool) -> Self {
        if want_tif {
            ContainerFormat::GTiff
        } else {
            ContainerFormat::Memory
        }
    }
}

/// Normalized description of one `crop_color` execution.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    pub raster_ref: String,
    pub want_czml: bool,
    pub want_tif: bool,
    pub color_palette: Option<Resource>,
    pub cutline: Option<Resource>,
    pub extent: Option<GeoRectangle>,
    pub output_container_format: ContainerFormat,
}

impl JobSpec {
    /// A spec with default output flags and no optional inputs.
    pub fn new(raster_ref: impl Into<String>) -> Self {
        Self {
            raster_ref: raster_ref.into(),
            want_czml: DEFAULT_WANT_CZML,
            want_tif: DEFAULT_WANT_TIF,
            color_palette: None,
            cutline: None,
            extent: None,
            output_container_format: ContainerFormat::for_outputs(DEFAULT_WANT_TIF),
        }
    }

    pub fn with_outputs(mut self, want_czml: bool, want_tif: bool) -> Self {
        self.want_czml = want_czml;
        self.want_tif = want_tif;
        self.output_container_format = ContainerFormat::for_outputs(want_tif);
        self
    }

    pub fn with_color_palette(mut self, palette: Resource) -> Self {
        self.color_palette = Some(palette);
        self
    }

    pub fn with_cutline(mut self, cutline: Resource) -> Self {
        self.cutline = Some(cutline);
        self
    }

    pub fn with_extent(mut self, extent: GeoRectangle) -> Self {
        self.extent = Some(extent);
        self
    }

    /// False when neither output is requested.
    pub fn requires_transformation(&self) -> bool {
        self.want_czml || self.want_tif
    }
}

/// Validates a raw request and resolves it into a [`JobSpec`].
///
/// When neither output is requested the optional inputs are not even read:
/// a malformed extent in such a request is not an error.
pub fn resolve(
    request: &RawRequest,
    description: &ProcessDescription,
) -> Result<JobSpec, ValidationError> {
    description.check_cardinality(request)?;

    let raster_ref = request
        .first(INPUT_RASTER)
        .ok_or_else(|| ValidationError::MissingInput(INPUT_RASTER.to_string()))
        .and_then(|value| {
            value.text().ok_or_else(|| ValidationError::InvalidResource {
                identifier: INPUT_RASTER.to_string(),
                reason: "expected a raster reference".to_string(),
            })
        })?;

    let want_czml = resolve_flag(request, INPUT_OUTPUT_CZML, DEFAULT_WANT_CZML)?;
    let want_tif = resolve_flag(request, INPUT_OUTPUT_TIF, DEFAULT_WANT_TIF)?;

    let spec = JobSpec::new(raster_ref).with_outputs(want_czml, want_tif);
    if !spec.requires_transformation() {
        debug!(raster = %spec.raster_ref, "No outputs requested, skipping optional inputs");
        return Ok(spec);
    }

    Ok(JobSpec {
        cutline: resolve_resource(request, INPUT_CUTLINE)?,
        color_palette: resolve_resource(request, INPUT_COLOR_PALETTE)?,
        extent: resolve_extent(request)?,
        ..spec
    })
}

fn resolve_flag(request: &RawRequest, name: &str, default: bool) -> Result<bool, ValidationError> {
    match request.first(name) {
        None => Ok(default),
        Some(value) => value.as_bool().ok_or_else(|| ValidationError::InvalidLiteral {
            identifier: name.to_string(),
            value: value.text().unwrap_or_default(),
            expected: "a boolean",
        }),
    }
}

fn resolve_resource(request: &RawRequest, name: &str) -> Result<Option<Resource>, ValidationError> {
    let Some(value) = request.first(name) else {
        return Ok(None);
    };

    match value {
        InputValue::Reference { href } => Ok(Some(Resource::Href(href.clone()))),
        other => other
            .text()
            .map(|text| Some(Resource::Inline(text)))
            .ok_or_else(|| ValidationError::InvalidResource {
                identifier: name.to_string(),
                reason: "expected a reference or inline text".to_string(),
            }),
    }
}

fn resolve_extent(request: &RawRequest) -> Result<Option<GeoRectangle>, ValidationError> {
    let Some(value) = request.first(INPUT_EXTENT) else {
        return Ok(None);
    };

    let rect = match value {
        InputValue::BoundingBox { bbox, crs } => {
            if let Some(crs) = crs {
                check_crs(crs)?;
            }
            GeoRectangle::from_wire(bbox)?
        }
        other => {
            let text = other
                .text()
                .ok_or(ValidationError::MalformedExtent(ExtentError::WrongOrdinateCount(0)))?;
            parse_wire_extent(&text)?
        }
    };

    Ok(Some(rect))
}
