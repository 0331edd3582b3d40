//! Dataset metadata from `gdalinfo -json`.

use serde::Deserialize;

use crate::extent::GeoRectangle;
use crate::raster::RasterError;

/// The subset of `gdalinfo -json` output the engine relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub width: u32,
    pub height: u32,
    pub band_count: usize,
    /// First band data type, e.g. `Byte` or `Float32`.
    pub data_type: Option<String>,
    /// Footprint in WGS84, when GDAL could compute one.
    pub wgs84_bounds: Option<GeoRectangle>,
}

impl DatasetInfo {
    /// Parses `gdalinfo -json` output.
    pub fn from_json(bytes: &[u8]) -> Result<Self, RasterError> {
        let raw: RawInfo =
            serde_json::from_slice(bytes).map_err(|e| RasterError::Metadata(e.to_string()))?;

        let wgs84_bounds = match raw.wgs84_extent {
            Some(extent) => bounds_of(extent.coordinates.iter().flatten())?,
            None => raw
                .corner_coordinates
                .and_then(|corners| corners.geographic_bounds()),
        };

        Ok(Self {
            width: raw.size[0],
            height: raw.size[1],
            band_count: raw.bands.len(),
            data_type: raw.bands.first().and_then(|b| b.data_type.clone()),
            wgs84_bounds,
        })
    }

    /// Byte rasters can be written to PNG without rescaling.
    pub fn is_byte(&self) -> bool {
        self.data_type.as_deref() == Some("Byte")
    }
}

fn bounds_of<'a>(
    points: impl Iterator<Item = &'a [f64; 2]>,
) -> Result<Option<GeoRectangle>, RasterError> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for [x, y] in points {
        bounds = Some(match bounds {
            None => (*x, *y, *x, *y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(*x), min_y.min(*y), max_x.max(*x), max_y.max(*y))
            }
        });
    }

    bounds
        .map(|(min_x, min_y, max_x, max_y)| {
            GeoRectangle::from_min_max(min_x, max_x, min_y, max_y)
                .map_err(|e| RasterError::Metadata(e.to_string()))
        })
        .transpose()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInfo {
    size: [u32; 2],
    #[serde(default)]
    bands: Vec<RawBand>,
    #[serde(default)]
    wgs84_extent: Option<RawWgs84Extent>,
    #[serde(default)]
    corner_coordinates: Option<RawCorners>,
}

#[derive(Debug, Deserialize)]
struct RawBand {
    #[serde(rename = "type", default)]
    data_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawWgs84Extent {
    coordinates: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCorners {
    upper_left: [f64; 2],
    lower_right: [f64; 2],
}

impl RawCorners {
    /// Corner coordinates are in the dataset CRS; they are only usable as a
    /// WGS84 footprint when they look geographic.
    fn geographic_bounds(&self) -> Option<GeoRectangle> {
        let [ulx, uly] = self.upper_left;
        let [lrx, lry] = self.lower_right;
        let geographic = [ulx, lrx].iter().all(|x| (-180.0..=180.0).contains(x))
            && [uly, lry].iter().all(|y| (-90.0..=90.0).contains(y));
        if !geographic {
            return None;
        }
        GeoRectangle::from_min_max(ulx.min(lrx), ulx.max(lrx), uly.min(lry), uly.max(lry)).ok()
    }
}
