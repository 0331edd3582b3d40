//! Geographic extents in EPSG:4326.
//!
//! Bounding boxes arrive on the wire latitude-first: `(minY, minX, maxY, maxX)`.
//! Everything past the request layer works with [`GeoRectangle`], which stores
//! the ordinates in the usual `(minX, minY, maxX, maxY)` order.

mod types;

pub use types::{ExtentError, GeoRectangle, SUPPORTED_CRS};

/// Number of ordinates in a wire-encoded extent.
pub const WIRE_ORDINATES: usize = 4;

/// Parses a comma-separated wire extent.
///
/// Accepts `minY,minX,maxY,maxX` optionally followed by a CRS token, e.g.
/// `10,20,30,40,urn:ogc:def:crs:EPSG::4326`. Only EPSG:4326 (or CRS84) is
/// accepted since the rectangle is always interpreted geographically.
pub fn parse_wire_extent(text: &str) -> Result<GeoRectangle, ExtentError> {
    let mut tokens: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() == WIRE_ORDINATES + 1 {
        let crs = tokens.pop().unwrap_or_default();
        if crs.parse::<f64>().is_err() {
            check_crs(crs)?;
        } else {
            return Err(ExtentError::WrongOrdinateCount(WIRE_ORDINATES + 1));
        }
    }

    if tokens.len() != WIRE_ORDINATES {
        return Err(ExtentError::WrongOrdinateCount(tokens.len()));
    }

    let ordinates = tokens
        .iter()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| ExtentError::NotANumber(t.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    GeoRectangle::from_wire(&ordinates)
}

/// Verifies that a CRS identifier denotes geographic WGS84.
pub fn check_crs(crs: &str) -> Result<(), ExtentError> {
    let crs = crs.trim();
    if SUPPORTED_CRS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(crs))
    {
        Ok(())
    } else {
        Err(ExtentError::UnsupportedCrs(crs.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_extent_is_transposed() {
        let rect = parse_wire_extent("10,20,30,40").unwrap();
        assert_eq!(rect.min_x, 20.0);
        assert_eq!(rect.min_y, 10.0);
        assert_eq!(rect.max_x, 40.0);
        assert_eq!(rect.max_y, 30.0);
    }

    #[test]
    fn test_wire_extent_with_crs_suffix() {
        let rect = parse_wire_extent("31.5, 34.2, 32.0, 35.1, urn:ogc:def:crs:EPSG::4326").unwrap();
        assert_eq!(rect.min_x, 34.2);
        assert_eq!(rect.max_y, 32.0);

        let rect = parse_wire_extent("10,20,30,40,EPSG:4326").unwrap();
        assert_eq!(rect.min_x, 20.0);
    }

    #[test]
    fn test_wire_extent_rejects_foreign_crs() {
        let err = parse_wire_extent("10,20,30,40,EPSG:3857").unwrap_err();
        assert_eq!(err, ExtentError::UnsupportedCrs("EPSG:3857".to_string()));
    }

    #[test]
    fn test_wire_extent_wrong_count() {
        assert_eq!(
            parse_wire_extent("10,20,30").unwrap_err(),
            ExtentError::WrongOrdinateCount(3)
        );
        assert_eq!(
            parse_wire_extent("1,2,3,4,5").unwrap_err(),
            ExtentError::WrongOrdinateCount(5)
        );
        assert_eq!(
            parse_wire_extent("").unwrap_err(),
            ExtentError::WrongOrdinateCount(0)
        );
    }

    #[test]
    fn test_wire_extent_not_a_number() {
        assert_eq!(
            parse_wire_extent("10,north,30,40").unwrap_err(),
            ExtentError::NotANumber("north".to_string())
        );
    }

    #[test]
    fn test_check_crs_variants() {
        assert!(check_crs("EPSG:4326").is_ok());
        assert!(check_crs("epsg:4326").is_ok());
        assert!(check_crs("http://www.opengis.net/def/crs/EPSG/0/4326").is_ok());
        assert!(check_crs("urn:ogc:def:crs:OGC:1.3:CRS84").is_ok());
        assert!(check_crs("EPSG:32636").is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_transposition_property(
                min_y in -90.0..0.0_f64,
                min_x in -180.0..0.0_f64,
                dy in 0.0..90.0_f64,
                dx in 0.0..180.0_f64,
            ) {
                let max_y = min_y + dy;
                let max_x = min_x + dx;
                let text = format!("{},{},{},{}", min_y, min_x, max_y, max_x);
                let rect = parse_wire_extent(&text)?;

                prop_assert_eq!(rect.min_x, min_x);
                prop_assert_eq!(rect.min_y, min_y);
                prop_assert_eq!(rect.max_x, max_x);
                prop_assert_eq!(rect.max_y, max_y);
            }

            #[test]
            fn test_wire_roundtrip_preserves_order(
                min_y in -90.0..0.0_f64,
                min_x in -180.0..0.0_f64,
                dy in 0.0..90.0_f64,
                dx in 0.0..180.0_f64,
            ) {
                let wire = [min_y, min_x, min_y + dy, min_x + dx];
                let rect = GeoRectangle::from_wire(&wire)?;
                prop_assert_eq!(rect.to_wire(), wire);
            }
        }
    }
}
