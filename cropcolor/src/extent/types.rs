//! Extent types and errors.

use serde::Serialize;
use thiserror::Error;

/// CRS identifiers accepted for bounding boxes, compared case-insensitively.
pub const SUPPORTED_CRS: &[&str] = &[
    "EPSG:4326",
    "URN:OGC:DEF:CRS:EPSG::4326",
    "URN:OGC:DEF:CRS:EPSG:6.6:4326",
    "HTTP://WWW.OPENGIS.NET/DEF/CRS/EPSG/0/4326",
    "URN:OGC:DEF:CRS:OGC:1.3:CRS84",
    "CRS84",
];

/// Errors raised while building an extent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtentError {
    /// Wrong number of ordinates.
    #[error("expected 4 ordinates (minY, minX, maxY, maxX), got {0}")]
    WrongOrdinateCount(usize),

    /// An ordinate could not be parsed.
    #[error("ordinate '{0}' is not a number")]
    NotANumber(String),

    /// An ordinate is NaN or infinite.
    #[error("ordinate {0} is not finite")]
    NotFinite(f64),

    /// The bounding box is expressed in a CRS other than EPSG:4326.
    #[error("unsupported CRS '{0}', only EPSG:4326 is accepted")]
    UnsupportedCrs(String),
}

/// Axis-aligned rectangle in geographic coordinates (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoRectangle {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl GeoRectangle {
    /// Builds a rectangle from per-axis bounds.
    ///
    /// Bounds are taken as given; an inverted axis is left for the engine to
    /// report.
    pub fn from_min_max(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self, ExtentError> {
        for v in [min_x, max_x, min_y, max_y] {
            if !v.is_finite() {
                return Err(ExtentError::NotFinite(v));
            }
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Builds a rectangle from wire ordinates `(minY, minX, maxY, maxX)`.
    ///
    /// Upstream bounding boxes are latitude-first; the axes are swapped here
    /// so that the result is in `(x, y)` order.
    pub fn from_wire(ordinates: &[f64]) -> Result<Self, ExtentError> {
        match *ordinates {
            [min_y, min_x, max_y, max_x] => Self::from_min_max(min_x, max_x, min_y, max_y),
            _ => Err(ExtentError::WrongOrdinateCount(ordinates.len())),
        }
    }

    /// Wire encoding, `(minY, minX, maxY, maxX)`.
    pub fn to_wire(&self) -> [f64; 4] {
        [self.min_y, self.min_x, self.max_y, self.max_x]
    }

    /// West, south, east, north.
    pub fn wsen(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
