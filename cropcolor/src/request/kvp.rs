//! WPS 1.0 key-value-pair encoding of `DataInputs`.
//!
//! ```text
//! DataInputs=r=@xlink:href=static/sample/srtm.tif;output_tif=true;extent=10,20,30,40
//! ```
//!
//! Entries are separated by `;`, names and values by the first `=`. A value
//! may carry `@attribute=value` suffixes; `@xlink:href=` turns the entry into a
//! by-reference input. Reserved characters inside values are percent-escaped.

use super::input::{InputValue, RawRequest};
use crate::job::ValidationError;

const HREF_ATTRIBUTE: &str = "xlink:href";

/// Attribute names recognized after `@`; any other `@` is part of the value.
const ATTRIBUTES: &[&str] = &[HREF_ATTRIBUTE, "mimeType", "encoding", "schema", "uom", "datatype"];

/// Parses a `DataInputs` string into a request for `identifier`.
pub fn parse_data_inputs(identifier: &str, data_inputs: &str) -> Result<RawRequest, ValidationError> {
    let mut request = RawRequest::new(identifier);

    for entry in data_inputs.split(';') {
        if entry.trim().is_empty() {
            continue;
        }

        let (name, raw_value) = entry
            .split_once('=')
            .ok_or_else(|| ValidationError::MalformedDataInputs(entry.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MalformedDataInputs(entry.to_string()));
        }

        request.push(name, parse_value(raw_value)?);
    }

    Ok(request)
}

fn parse_value(raw: &str) -> Result<InputValue, ValidationError> {
    let mut segments = raw.split('@');
    let mut literal = segments.next().unwrap_or_default().to_string();
    let mut attributes: Vec<(&str, String)> = Vec::new();

    for segment in segments {
        match segment.split_once('=') {
            Some((key, value)) if is_attribute(key) => attributes.push((key, value.to_string())),
            _ => {
                let target = match attributes.last_mut() {
                    Some((_, value)) => value,
                    None => &mut literal,
                };
                target.push('@');
                target.push_str(segment);
            }
        }
    }

    match attributes
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(HREF_ATTRIBUTE))
    {
        Some((_, href)) => Ok(InputValue::reference(percent_decode(href)?)),
        None => Ok(InputValue::literal(percent_decode(&literal)?)),
    }
}

fn is_attribute(key: &str) -> bool {
    ATTRIBUTES.iter().any(|name| name.eq_ignore_ascii_case(key))
}

/// Decodes `%XX` escapes.
fn percent_decode(text: &str) -> Result<String, ValidationError> {
    if !text.contains('%') {
        return Ok(text.to_string());
    }

    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes
                .get(i + 1..i + 3)
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| ValidationError::MalformedDataInputs(text.to_string()))?;
            out.push(escape);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| ValidationError::MalformedDataInputs(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_and_literals() {
        let request = parse_data_inputs(
            "crop_color",
            "r=@xlink:href=static/sample/srtm_x35_y32.tif;output_tif=true;output_czml=false",
        )
        .unwrap();

        assert_eq!(
            request.first("r"),
            Some(&InputValue::reference("static/sample/srtm_x35_y32.tif"))
        );
        assert_eq!(request.first("output_tif").unwrap().as_bool(), Some(true));
        assert_eq!(request.first("output_czml").unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_extent_keeps_commas() {
        let request = parse_data_inputs("crop_color", "r=a.tif;extent=10,20,30,40").unwrap();
        assert_eq!(
            request.first("extent").unwrap().text().as_deref(),
            Some("10,20,30,40")
        );
    }

    #[test]
    fn test_reference_with_extra_attributes() {
        let request = parse_data_inputs(
            "crop_color",
            "cutline=@mimeType=application/gml+xml@xlink:href=http://host/cut.gml",
        )
        .unwrap();
        assert_eq!(
            request.first("cutline"),
            Some(&InputValue::reference("http://host/cut.gml"))
        );
    }

    #[test]
    fn test_at_sign_inside_values_is_kept() {
        let request = parse_data_inputs(
            "crop_color",
            "r=data/dem@2x.tif;cutline=@xlink:href=http://host/cut@v2.gml@mimeType=text/xml",
        )
        .unwrap();

        assert_eq!(
            request.first("r"),
            Some(&InputValue::literal("data/dem@2x.tif"))
        );
        assert_eq!(
            request.first("cutline"),
            Some(&InputValue::reference("http://host/cut@v2.gml"))
        );
    }

    #[test]
    fn test_unknown_attribute_stays_in_literal() {
        let request = parse_data_inputs("crop_color", "r=user@host=dem.tif").unwrap();
        assert_eq!(
            request.first("r").unwrap().text().as_deref(),
            Some("user@host=dem.tif")
        );
    }

    #[test]
    fn test_percent_escapes_in_values() {
        let request =
            parse_data_inputs("crop_color", "color_palette=0 0 0 0%3B100 255 0 0").unwrap();
        assert_eq!(
            request.first("color_palette").unwrap().text().as_deref(),
            Some("0 0 0 0;100 255 0 0")
        );
    }

    #[test]
    fn test_repeated_entries_accumulate() {
        let request = parse_data_inputs("crop_color", "r=a.tif;r=b.tif;").unwrap();
        assert_eq!(request.occurrences("r").len(), 2);
    }

    #[test]
    fn test_entry_without_equals_is_rejected() {
        let err = parse_data_inputs("crop_color", "r=a.tif;output_tif").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedDataInputs("output_tif".to_string())
        );
    }

    #[test]
    fn test_bad_escape_is_rejected() {
        assert!(parse_data_inputs("crop_color", "r=a%2.tif").is_err());
    }

    #[test]
    fn test_empty_data_inputs() {
        let request = parse_data_inputs("crop_color", "").unwrap();
        assert!(request.inputs.is_empty());
    }
}
