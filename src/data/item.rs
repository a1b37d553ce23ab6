//! Dataset items.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::data::localized::{resolve_text, Language};

/// One record of a category. Only `id` is typed; everything else is kept as
/// the JSON the dataset provided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique within its category. Numeric ids are accepted as strings.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, found {other}"
        ))),
    }
}

impl Item {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The field as a plain string, if it is one.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// The field resolved as localized text.
    pub fn text(&self, name: &str, lang: Language) -> String {
        resolve_text(self.field(name), lang)
    }

    /// The field as an array, empty if missing or not an array.
    pub fn list(&self, name: &str) -> &[Value] {
        self.field(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Map position from `coordinates`, accepting `lat`/`lng` or
    /// `latitude`/`longitude`. Zero components count as missing.
    pub fn coordinates(&self) -> Option<Coordinates> {
        let coords = self.field("coordinates")?.as_object()?;
        let component = |short: &str, long: &str| {
            coords
                .get(short)
                .and_then(Value::as_f64)
                .filter(|v| *v != 0.0)
                .or_else(|| coords.get(long).and_then(Value::as_f64).filter(|v| *v != 0.0))
        };
        Some(Coordinates {
            lat: component("lat", "latitude")?,
            lng: component("lng", "longitude")?,
        })
    }
}

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}
