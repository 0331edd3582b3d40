//! Raw request inputs as they arrive from the protocol layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::PROCESS_IDENTIFIER;

/// A single occurrence of a process input.
///
/// In JSON an occurrence is either an object (`{"href": ..}`, `{"bbox": [..]}`,
/// `{"value": ..}`) or a bare scalar such as `true` or `"10,20,30,40"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    /// By-reference input (file path or URL).
    Reference { href: String },

    /// Bounding box ordinates in wire order, with an optional CRS.
    BoundingBox {
        bbox: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        crs: Option<String>,
    },

    /// Inline data wrapped in an object.
    Data { value: Value },

    /// Inline scalar.
    Bare(Value),
}

impl InputValue {
    pub fn reference(href: impl Into<String>) -> Self {
        InputValue::Reference { href: href.into() }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        InputValue::Data {
            value: Value::String(value.into()),
        }
    }

    pub fn bbox(ordinates: Vec<f64>) -> Self {
        InputValue::BoundingBox {
            bbox: ordinates,
            crs: None,
        }
    }

    /// Textual form of the occurrence, if it has one.
    ///
    /// References yield their href; strings, booleans and numbers yield their
    /// literal text. Bounding boxes, arrays and objects have none.
    pub fn text(&self) -> Option<String> {
        match self {
            InputValue::Reference { href } => Some(href.clone()),
            InputValue::Data { value } | InputValue::Bare(value) => scalar_text(value),
            InputValue::BoundingBox { .. } => None,
        }
    }

    /// Boolean interpretation, accepting `true/false/1/0/yes/no`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InputValue::Data { value } | InputValue::Bare(value) => match value {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(1) => Some(true),
                    Some(0) => Some(false),
                    _ => None,
                },
                Value::String(s) => parse_bool(s),
                _ => None,
            },
            _ => None,
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses a boolean literal the way WPS literal inputs are commonly written.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// A loosely typed execute request: input identifiers mapped to occurrences.
///
/// This is the only place the request is handled by name. The resolver turns
/// it into a [`crate::job::JobSpec`] and nothing downstream sees it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRequest {
    #[serde(default = "default_identifier")]
    pub identifier: String,

    #[serde(default, deserialize_with = "deserialize_occurrences")]
    pub inputs: BTreeMap<String, Vec<InputValue>>,
}

fn default_identifier() -> String {
    PROCESS_IDENTIFIER.to_string()
}

impl Default for RawRequest {
    fn default() -> Self {
        Self::new(PROCESS_IDENTIFIER)
    }
}

impl RawRequest {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            inputs: BTreeMap::new(),
        }
    }

    /// Adds one occurrence of an input.
    pub fn with_input(mut self, name: impl Into<String>, value: InputValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: InputValue) {
        self.inputs.entry(name.into()).or_default().push(value);
    }

    /// All occurrences of an input; empty when absent.
    pub fn occurrences(&self, name: &str) -> &[InputValue] {
        self.inputs.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First occurrence of an input.
    pub fn first(&self, name: &str) -> Option<&InputValue> {
        self.occurrences(name).first()
    }

    pub fn contains(&self, name: &str) -> bool {
        !self.occurrences(name).is_empty()
    }
}

/// Accepts either a list of occurrences or a single occurrence per input.
fn deserialize_occurrences<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<InputValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Occurrences {
        Many(Vec<InputValue>),
        One(InputValue),
    }

    let raw = BTreeMap::<String, Occurrences>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, occurrences)| {
            let values = match occurrences {
                Occurrences::Many(values) => values,
                Occurrences::One(value) => vec![value],
            };
            (name, values)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_occurrences() {
        let json = r#"{
            "identifier": "crop_color",
            "inputs": {
                "r": [{"href": "static/sample/srtm_x35_y32.tif"}],
                "output_tif": true,
                "output_czml": {"value": "false"},
                "extent": {"bbox": [10, 20, 30, 40], "crs": "EPSG:4326"},
                "color_palette": "0 0 0 255\n100 255 255 255"
            }
        }"#;

        let request: RawRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.identifier, "crop_color");
        assert_eq!(
            request.first("r"),
            Some(&InputValue::reference("static/sample/srtm_x35_y32.tif"))
        );
        assert_eq!(request.first("output_tif").unwrap().as_bool(), Some(true));
        assert_eq!(request.first("output_czml").unwrap().as_bool(), Some(false));
        assert!(matches!(
            request.first("extent"),
            Some(InputValue::BoundingBox { bbox, crs: Some(_) }) if bbox.len() == 4
        ));
        assert_eq!(
            request.first("color_palette").unwrap().text().as_deref(),
            Some("0 0 0 255\n100 255 255 255")
        );
    }

    #[test]
    fn test_missing_identifier_defaults_to_process() {
        let request: RawRequest = serde_json::from_str(r#"{"inputs": {}}"#).unwrap();
        assert_eq!(request.identifier, PROCESS_IDENTIFIER);
        assert!(request.inputs.is_empty());
    }

    #[test]
    fn test_array_means_multiple_occurrences() {
        let request: RawRequest =
            serde_json::from_str(r#"{"inputs": {"r": ["a.tif", "b.tif"]}}"#).unwrap();
        assert_eq!(request.occurrences("r").len(), 2);
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" yes "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("No"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_numeric_bool() {
        assert_eq!(InputValue::Bare(Value::from(1)).as_bool(), Some(true));
        assert_eq!(InputValue::Bare(Value::from(0)).as_bool(), Some(false));
        assert_eq!(InputValue::Bare(Value::from(2)).as_bool(), None);
        assert_eq!(InputValue::reference("true").as_bool(), None);
    }

    #[test]
    fn test_text_of_each_variant() {
        assert_eq!(InputValue::reference("x.tif").text().as_deref(), Some("x.tif"));
        assert_eq!(InputValue::literal("").text().as_deref(), Some(""));
        assert_eq!(InputValue::Bare(Value::from(2.5)).text().as_deref(), Some("2.5"));
        assert_eq!(InputValue::bbox(vec![1.0, 2.0, 3.0, 4.0]).text(), None);
    }

    #[test]
    fn test_occurrences_of_absent_input() {
        let request = RawRequest::default();
        assert!(request.occurrences("cutline").is_empty());
        assert!(request.first("cutline").is_none());
        assert!(!request.contains("cutline"));
    }
}
