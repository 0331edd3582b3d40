//! CZML packaging of a colored raster.
//!
//! The raster is draped as a PNG image material on a rectangle entity that
//! spans its WGS84 footprint.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};

use crate::extent::GeoRectangle;

/// CZML packet version written into the document packet.
pub const CZML_VERSION: &str = "1.0";

/// Identifier of the rectangle entity.
pub const ENTITY_ID: &str = "crop_color";

/// Builds a CZML document draping `png` over `bounds`.
pub fn rectangle_document(name: &str, bounds: &GeoRectangle, png: &[u8]) -> Value {
    let uri = format!("data:image/png;base64,{}", STANDARD.encode(png));

    json!([
        {
            "id": "document",
            "name": name,
            "version": CZML_VERSION,
        },
        {
            "id": ENTITY_ID,
            "name": name,
            "rectangle": {
                "coordinates": { "wsenDegrees": bounds.wsen() },
                "fill": true,
                "material": {
                    "image": {
                        "image": { "uri": uri },
                        "transparent": true,
                    }
                }
            }
        }
    ])
}
