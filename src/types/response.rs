//! Dynamically shaped API responses.
//!
//! The provider owns the schema and changes it without notice, so responses
//! are kept as named-field records rather than fixed structs. Callers that want
//! static types can deserialize a record into their own serde types.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::ops::Index;

use super::text::{decode_double_encoded, is_double_encoded_field};
use crate::errors::{BrawlhallaError, BrawlhallaResult};

static NULL: FieldValue = FieldValue::Null;

/// A single field value inside a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON `null`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Number, integer or float.
    Number(Number),
    /// Text.
    Text(String),
    /// Nested object.
    Record(Record),
    /// Nested array; objects inside it are records.
    List(Vec<FieldValue>),
}

impl FieldValue {
    fn from_json(field: Option<&str>, value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => match field {
                Some(field) if is_double_encoded_field(field) => {
                    FieldValue::Text(decode_double_encoded(&s).into_owned())
                }
                _ => FieldValue::Text(s),
            },
            Value::Object(map) => FieldValue::Record(Record::from_map(map)),
            Value::Array(items) => FieldValue::List(
                items
                    .into_iter()
                    .map(|item| FieldValue::from_json(field, item))
                    .collect(),
            ),
        }
    }

    /// Returns true for `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the text, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns an integer, coercing numeric strings such as `"1234"`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => n.as_i64(),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns an unsigned integer, coercing numeric strings.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::Number(n) => n.as_u64(),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns a float, coercing numeric strings such as `"2.5"`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the nested record, if this is an object.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the nested items, if this is an array.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A JSON object exposed by field name.
///
/// Field names need not be valid identifiers: `record["2v2"]` works.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    fn from_map(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .map(|(key, value)| {
                let value = FieldValue::from_json(Some(&key), value);
                (key, value)
            })
            .collect();
        Self { fields }
    }

    /// Returns the field value, if present.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns true if the field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the field names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over all fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a text field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    /// Returns an integer field, coercing numeric strings.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_i64)
    }

    /// Returns an unsigned integer field, coercing numeric strings.
    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.get(field).and_then(FieldValue::as_u64)
    }

    /// Returns a float field, coercing numeric strings.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    /// Returns a boolean field.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    /// Returns a nested record.
    pub fn get_record(&self, field: &str) -> Option<&Record> {
        self.get(field).and_then(FieldValue::as_record)
    }

    /// Returns a nested array.
    pub fn get_list(&self, field: &str) -> Option<&[FieldValue]> {
        self.get(field).and_then(FieldValue::as_list)
    }

    /// Iterates over the records of a nested array, skipping non-object items.
    pub fn records<'a>(&'a self, field: &str) -> impl Iterator<Item = &'a Record> + 'a {
        self.get_list(field)
            .unwrap_or_default()
            .iter()
            .filter_map(FieldValue::as_record)
    }

    /// Deserializes the record into a caller-defined type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> BrawlhallaResult<T> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }
}

impl Index<&str> for Record {
    type Output = FieldValue;

    /// Returns [`FieldValue::Null`] for missing fields.
    fn index(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&NULL)
    }
}

/// A normalized API payload: one record or a sequence of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResponse {
    /// The provider returned a JSON object.
    Record(Record),
    /// The provider returned a JSON array of objects, order preserved.
    List(Vec<Record>),
}

impl NormalizedResponse {
    /// Normalizes a parsed JSON payload.
    ///
    /// Anything other than an object or an array of objects is a
    /// [`BrawlhallaError::MalformedResponse`].
    pub fn from_json(value: Value) -> BrawlhallaResult<Self> {
        match value {
            Value::Object(map) => Ok(NormalizedResponse::Record(Record::from_map(map))),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(map) => Ok(Record::from_map(map)),
                    other => Err(BrawlhallaError::MalformedResponse {
                        message: format!(
                            "array element {} is {}, expected an object",
                            index,
                            json_kind(&other)
                        ),
                    }),
                })
                .collect::<BrawlhallaResult<Vec<_>>>()
                .map(NormalizedResponse::List),
            other => Err(BrawlhallaError::MalformedResponse {
                message: format!(
                    "payload is {}, expected an object or array",
                    json_kind(&other)
                ),
            }),
        }
    }

    /// Parses and normalizes a raw JSON body.
    pub fn from_slice(body: &[u8]) -> BrawlhallaResult<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| BrawlhallaError::MalformedResponse {
                message: format!("body is not JSON: {}", e),
            })?;
        Self::from_json(value)
    }

    /// Returns the record of an object payload.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            NormalizedResponse::Record(r) => Some(r),
            NormalizedResponse::List(_) => None,
        }
    }

    /// Returns the records of an array payload.
    pub fn as_list(&self) -> Option<&[Record]> {
        match self {
            NormalizedResponse::List(items) => Some(items),
            NormalizedResponse::Record(_) => None,
        }
    }

    /// Returns every record: one for an object payload, all for an array.
    pub fn records(&self) -> &[Record] {
        match self {
            NormalizedResponse::Record(r) => std::slice::from_ref(r),
            NormalizedResponse::List(items) => items,
        }
    }

    /// Consumes the response into its records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            NormalizedResponse::Record(r) => vec![r],
            NormalizedResponse::List(items) => items,
        }
    }

    /// Looks up a field on an object payload.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.as_record().and_then(|r| r.get(field))
    }

    /// Deserializes the whole payload into a caller-defined type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> BrawlhallaResult<T> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
