//! Process description for `crop_color`.
//!
//! Declares the inputs and outputs the process accepts, with their
//! cardinalities. The protocol layer uses it to reject malformed requests
//! before any resolution happens, and serves it as the DescribeProcess reply.

use serde::Serialize;

use super::input::RawRequest;
use super::PROCESS_IDENTIFIER;
use crate::job::{ValidationError, CZML_MEDIA_TYPE, GEOTIFF_MEDIA_TYPE};

/// Media type for GML cutline geometries.
pub const GML_MEDIA_TYPE: &str = "application/gml+xml";

/// Media type for plain-text palettes.
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// What kind of value an input carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputKind {
    Complex {
        #[serde(rename = "mimeTypes")]
        media_types: Vec<&'static str>,
    },
    Literal {
        #[serde(rename = "dataType")]
        data_type: &'static str,
    },
    BoundingBox {
        crs: Vec<&'static str>,
    },
}

/// One declared input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub identifier: &'static str,
    pub title: &'static str,
    #[serde(flatten)]
    pub kind: InputKind,
    pub min_occurs: usize,
    pub max_occurs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
}

/// What kind of value an output carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutputKind {
    Literal {
        #[serde(rename = "dataType")]
        data_type: &'static str,
    },
    Complex {
        #[serde(rename = "mimeType")]
        media_type: &'static str,
    },
}

/// One declared output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDescriptor {
    pub identifier: &'static str,
    pub title: &'static str,
    #[serde(flatten)]
    pub kind: OutputKind,
}

/// Full description of a process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessDescription {
    pub identifier: &'static str,
    pub version: &'static str,
    pub title: &'static str,
    #[serde(rename = "abstract")]
    pub abstract_text: &'static str,
    pub inputs: Vec<InputDescriptor>,
    pub outputs: Vec<OutputDescriptor>,
}

impl ProcessDescription {
    /// The `crop_color` process.
    pub fn crop_color() -> Self {
        Self {
            identifier: PROCESS_IDENTIFIER,
            version: "0.1",
            title: "crops to an extent and/or to a cutline polygon[s] and/or makes a color relief",
            abstract_text:
                "returns a color relief of the input raster inside the given extent or cutline polygon[s]",
            inputs: vec![
                InputDescriptor {
                    identifier: "r",
                    title: "input raster",
                    kind: InputKind::Complex {
                        media_types: vec![GEOTIFF_MEDIA_TYPE],
                    },
                    min_occurs: 1,
                    max_occurs: 1,
                    default: None,
                },
                InputDescriptor {
                    identifier: "output_czml",
                    title: "make output as czml",
                    kind: InputKind::Literal { data_type: "boolean" },
                    min_occurs: 0,
                    max_occurs: 1,
                    default: Some("true"),
                },
                InputDescriptor {
                    identifier: "output_tif",
                    title: "make output as tif",
                    kind: InputKind::Literal { data_type: "boolean" },
                    min_occurs: 0,
                    max_occurs: 1,
                    default: Some("false"),
                },
                InputDescriptor {
                    identifier: "color_palette",
                    title: "color palette",
                    kind: InputKind::Complex {
                        media_types: vec![TEXT_MEDIA_TYPE],
                    },
                    min_occurs: 0,
                    max_occurs: 1,
                    default: None,
                },
                InputDescriptor {
                    identifier: "cutline",
                    title: "input vector cutline",
                    kind: InputKind::Complex {
                        media_types: vec![GML_MEDIA_TYPE],
                    },
                    min_occurs: 0,
                    max_occurs: 1,
                    default: None,
                },
                InputDescriptor {
                    identifier: "extent",
                    title: "extent BoundingBox",
                    kind: InputKind::BoundingBox {
                        crs: vec!["EPSG:4326"],
                    },
                    min_occurs: 0,
                    max_occurs: 1,
                    default: None,
                },
            ],
            outputs: vec![
                OutputDescriptor {
                    identifier: "r",
                    title: "input raster name",
                    kind: OutputKind::Literal { data_type: "string" },
                },
                OutputDescriptor {
                    identifier: "tif",
                    title: "result as GeoTIFF",
                    kind: OutputKind::Complex {
                        media_type: GEOTIFF_MEDIA_TYPE,
                    },
                },
                OutputDescriptor {
                    identifier: "czml",
                    title: "result as CZML",
                    kind: OutputKind::Complex {
                        media_type: CZML_MEDIA_TYPE,
                    },
                },
            ],
        }
    }

    /// Looks up an input by identifier.
    pub fn input(&self, identifier: &str) -> Option<&InputDescriptor> {
        self.inputs.iter().find(|i| i.identifier == identifier)
    }

    /// Checks every input against its declared cardinality.
    ///
    /// Unknown inputs are rejected rather than ignored.
    pub fn check_cardinality(&self, request: &RawRequest) -> Result<(), ValidationError> {
        if request.identifier != self.identifier {
            return Err(ValidationError::UnknownProcess(request.identifier.clone()));
        }

        if let Some(name) = request.inputs.keys().find(|name| self.input(name).is_none()) {
            return Err(ValidationError::UnknownInput(name.clone()));
        }

        for descriptor in &self.inputs {
            let found = request.occurrences(descriptor.identifier).len();
            if found < descriptor.min_occurs {
                return Err(ValidationError::MissingInput(descriptor.identifier.to_string()));
            }
            if found > descriptor.max_occurs {
                return Err(ValidationError::TooManyOccurrences {
                    identifier: descriptor.identifier.to_string(),
                    max: descriptor.max_occurs,
                    found,
                });
            }
        }

        Ok(())
    }
}
