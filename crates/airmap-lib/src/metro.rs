//! City ("metro") payload carried by each node of the flight map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Fields every metro record must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "code",
    "name",
    "country",
    "continent",
    "timezone",
    "coordinates",
    "population",
    "region",
];

/// Geographic position expressed with hemisphere letters, as in
/// `{"N": 19, "W": 99}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub north: Option<f64>,
    #[serde(rename = "S", default, skip_serializing_if = "Option::is_none")]
    pub south: Option<f64>,
    #[serde(rename = "E", default, skip_serializing_if = "Option::is_none")]
    pub east: Option<f64>,
    #[serde(rename = "W", default, skip_serializing_if = "Option::is_none")]
    pub west: Option<f64>,
}

impl Coordinates {
    /// Signed latitude in degrees (north positive).
    pub fn latitude(&self) -> Option<f64> {
        self.north.or(self.south.map(|south| -south))
    }

    /// Signed longitude in degrees (east positive).
    pub fn longitude(&self) -> Option<f64> {
        self.east.or(self.west.map(|west| -west))
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.north, self.south) {
            (Some(north), _) => write!(f, "{}° N", north)?,
            (None, Some(south)) => write!(f, "{}° S", south)?,
            (None, None) => f.write_str("?")?,
        }
        match (self.east, self.west) {
            (Some(east), _) => write!(f, ", {}° E", east),
            (None, Some(west)) => write!(f, ", {}° W", west),
            (None, None) => f.write_str(", ?"),
        }
    }
}

/// A payload value that is either numeric or textual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(number) => write!(f, "{}", number),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

/// City attributes stored on each graph node.
///
/// The recognised fields are typed; anything else found in the source data
/// is kept verbatim in `extra` and written back on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metro {
    pub code: String,
    pub name: String,
    pub country: String,
    pub continent: String,
    pub timezone: f64,
    pub coordinates: Coordinates,
    pub population: u64,
    pub region: FieldValue,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Metro {
    /// Parse a metro from a JSON object, naming the first missing field when
    /// the record is incomplete.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|err| Error::malformed(format!("could not parse city JSON: {err}")))?;
        Self::from_value(value)
    }

    /// Convert an already-parsed JSON value into a metro.
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::malformed("city data must be a JSON object"));
        };
        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|field| !object.contains_key(**field))
        {
            return Err(Error::malformed(format!("missing field: {missing}")));
        }
        serde_json::from_value(value).map_err(|err| Error::malformed(err.to_string()))
    }

    /// Update one field from user-supplied text.
    ///
    /// The text is only ever parsed as data. Recognised fields use their own
    /// type and `region` is a number when the text parses as one, otherwise
    /// text. Unrecognised keys also accept `true`/`false` as booleans.
    pub fn set_field(&mut self, field: &str, raw: &str) -> Result<()> {
        match field {
            "code" => {
                return Err(Error::malformed(
                    "the city code identifies the node and cannot be edited",
                ))
            }
            "name" => self.name = raw.to_string(),
            "country" => self.country = raw.to_string(),
            "continent" => self.continent = raw.to_string(),
            "timezone" => self.timezone = parse_number(field, raw)?,
            "population" => {
                self.population = raw.trim().parse().map_err(|_| {
                    Error::malformed(format!(
                        "population must be a non-negative integer, got '{raw}'"
                    ))
                })?
            }
            "coordinates" => {
                self.coordinates = serde_json::from_str(raw).map_err(|err| {
                    Error::malformed(format!("coordinates must be a JSON object: {err}"))
                })?
            }
            "region" => {
                self.region = match infer_value(raw) {
                    Value::Number(number) => {
                        FieldValue::Number(number.as_f64().unwrap_or_default())
                    }
                    _ => FieldValue::Text(raw.to_string()),
                }
            }
            other => {
                self.extra.insert(other.to_string(), infer_value(raw));
            }
        }
        Ok(())
    }

    /// Read a single field as JSON, including keys kept in `extra`.
    pub fn field(&self, field: &str) -> Option<Value> {
        match field {
            "code" => Some(Value::from(self.code.clone())),
            "name" => Some(Value::from(self.name.clone())),
            "country" => Some(Value::from(self.country.clone())),
            "continent" => Some(Value::from(self.continent.clone())),
            "timezone" => Some(Value::from(self.timezone)),
            "coordinates" => serde_json::to_value(self.coordinates).ok(),
            "population" => Some(Value::from(self.population)),
            "region" => serde_json::to_value(&self.region).ok(),
            other => self.extra.get(other).cloned(),
        }
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::malformed(format!("{field} must be a number, got '{raw}'")))
}

fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Value::from(integer);
    }
    if let Some(number) = trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
    {
        return Value::Number(number);
    }
    match trimmed {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mexico_city() -> Metro {
        Metro::from_value(json!({
            "code": "MEX",
            "name": "Mexico City",
            "country": "MX",
            "continent": "North America",
            "timezone": -6,
            "coordinates": {"N": 19, "W": 99},
            "population": 23400000,
            "region": 1
        }))
        .expect("valid metro")
    }

    #[test]
    fn coordinates_render_with_hemispheres() {
        let metro = mexico_city();
        assert_eq!(metro.coordinates.to_string(), "19° N, 99° W");
        assert_eq!(metro.coordinates.latitude(), Some(19.0));
        assert_eq!(metro.coordinates.longitude(), Some(-99.0));
    }

    #[test]
    fn missing_field_is_named() {
        let err = Metro::from_json_str(r#"{"code": "BBB"}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { ref message } if message == "missing field: name"));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            Metro::from_json_str("{not json"),
            Err(Error::MalformedInput { .. })
        ));
        assert!(matches!(
            Metro::from_json_str("[1, 2]"),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn unknown_keys_survive_in_extra() {
        let metro = Metro::from_value(json!({
            "code": "AAA",
            "name": "AAA",
            "country": "AAA",
            "continent": "AAA",
            "timezone": 5,
            "coordinates": {"S": 1, "W": 1},
            "population": 500,
            "region": "AAA",
            "airline": "CSAir"
        }))
        .unwrap();
        assert_eq!(metro.region, FieldValue::Text("AAA".to_string()));
        assert_eq!(metro.field("airline"), Some(json!("CSAir")));

        let round_trip = serde_json::to_value(&metro).unwrap();
        assert_eq!(round_trip["airline"], json!("CSAir"));
    }

    #[test]
    fn set_field_parses_values_as_data() {
        let mut metro = mexico_city();
        metro.set_field("population", "100").unwrap();
        assert_eq!(metro.population, 100);

        metro.set_field("timezone", "-5.5").unwrap();
        assert_eq!(metro.timezone, -5.5);

        metro.set_field("region", "3").unwrap();
        assert_eq!(metro.region, FieldValue::Number(3.0));

        metro.set_field("region", "true").unwrap();
        assert_eq!(metro.region, FieldValue::Text("true".to_string()));
        assert_eq!(metro.field("region"), Some(json!("true")));

        metro.set_field("nickname", "CDMX").unwrap();
        assert_eq!(metro.field("nickname"), Some(json!("CDMX")));

        metro.set_field("hub", "true").unwrap();
        assert_eq!(metro.field("hub"), Some(json!(true)));

        // Expressions stay text; they are never evaluated.
        metro.set_field("motto", "1 + 1").unwrap();
        assert_eq!(metro.field("motto"), Some(json!("1 + 1")));
    }

    #[test]
    fn set_field_rejects_bad_values_without_change() {
        let mut metro = mexico_city();
        assert!(metro.set_field("population", "lots").is_err());
        assert!(metro.set_field("population", "-4").is_err());
        assert!(metro.set_field("timezone", "east").is_err());
        assert!(metro.set_field("coordinates", "north").is_err());
        assert!(metro.set_field("code", "XXX").is_err());
        assert_eq!(metro, mexico_city());
    }

    #[test]
    fn coordinates_can_be_replaced_with_json() {
        let mut metro = mexico_city();
        metro.set_field("coordinates", r#"{"S": 33, "W": 71}"#).unwrap();
        assert_eq!(metro.coordinates.to_string(), "33° S, 71° W");
    }
}
