//! Dynamic values forming the object graph under validation.

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Field map of an object node.
pub type Object = BTreeMap<String, Value>;

/// A runtime value inside a validation target graph.
///
/// `Undefined` marks a value that was never supplied and is distinct from an
/// explicit `Null`. Object nodes keep `Undefined` entries so "present but
/// undefined" can be told apart from "property does not exist".
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    /// A date; `None` is an invalid date.
    Date(Option<DateTime<Utc>>),
    Pattern(Regex),
    Array(Vec<Value>),
    Set(Vec<Value>),
    Object(Object),
}

/// Runtime type names used by type guards and comparability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Undefined,
    Null,
    Boolean,
    Number,
    BigInt,
    String,
    Date,
    Pattern,
    Array,
    Set,
    Object,
}

impl ValueType {
    /// The lowercase name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Undefined => "undefined",
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::BigInt => "bigint",
            ValueType::String => "string",
            ValueType::Date => "date",
            ValueType::Pattern => "pattern",
            ValueType::Array => "array",
            ValueType::Set => "set",
            ValueType::Object => "object",
        }
    }

    /// Parse a type from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "undefined" => ValueType::Undefined,
            "null" => ValueType::Null,
            "boolean" => ValueType::Boolean,
            "number" => ValueType::Number,
            "bigint" => ValueType::BigInt,
            "string" => ValueType::String,
            "date" => ValueType::Date,
            "pattern" => ValueType::Pattern,
            "array" => ValueType::Array,
            "set" => ValueType::Set,
            "object" => ValueType::Object,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Build an object node from `(name, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a set node, dropping deep-equal duplicates.
    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    pub fn date(date: DateTime<Utc>) -> Self {
        Value::Date(Some(date))
    }

    pub fn invalid_date() -> Self {
        Value::Date(None)
    }

    /// Compile a regular expression value.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Value::Pattern(Regex::new(pattern)?))
    }

    /// The runtime type of this value.
    pub fn type_of(&self) -> ValueType {
        match self {
            Value::Undefined => ValueType::Undefined,
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::BigInt(_) => ValueType::BigInt,
            Value::String(_) => ValueType::String,
            Value::Date(_) => ValueType::Date,
            Value::Pattern(_) => ValueType::Pattern,
            Value::Array(_) => ValueType::Array,
            Value::Set(_) => ValueType::Set,
            Value::Object(_) => ValueType::Object,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `true` for `Undefined` and `Null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Whether this value can hold named or indexed children.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_) | Value::Set(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of a number or big integer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::BigInt(b) => Some(*b as f64),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Elements of an array or set.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a property on an object node.
    ///
    /// `None` means the property does not exist; a present property holding
    /// `Undefined` is returned as `Some(&Value::Undefined)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Length of a string (in characters), array or set.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) | Value::Set(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Convert a JSON document into a value graph.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert into JSON. `Undefined` entries are dropped from objects.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn date_label(date: &Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => "Invalid Date".to_string(),
    }
}

impl PartialEq for Value {
    /// Deep structural equality. `NaN` equals `NaN`, invalid dates equal each
    /// other, patterns compare by source, sets compare regardless of order.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.as_str() == b.as_str(),
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::BigInt(b) => write!(f, "{}", b),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => f.write_str(&date_label(d)),
            Value::Pattern(p) => write!(f, "/{}/", p.as_str()),
            Value::Array(items) | Value::Set(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Number(_) => serializer.serialize_none(),
            Value::BigInt(b) => match i64::try_from(*b) {
                Ok(small) => serializer.serialize_i64(small),
                Err(_) => serializer.serialize_str(&b.to_string()),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(Some(d)) => serializer.serialize_str(&date_label(&Some(*d))),
            Value::Date(None) => serializer.serialize_none(),
            Value::Pattern(p) => serializer.serialize_str(p.as_str()),
            Value::Array(items) | Value::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let present: Vec<_> = map.iter().filter(|(_, v)| !v.is_undefined()).collect();
                let mut out = serializer.serialize_map(Some(present.len()))?;
                for (key, value) in present {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from_json)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(Some(d))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deep_equality() {
        let a = Value::object([
            ("name", Value::from("x")),
            ("tags", Value::from(vec![Value::from(1), Value::from(2)])),
        ]);
        let b = a.clone();
        assert_eq!(a, b);

        let c = Value::object([("name", Value::from("y"))]);
        assert_ne!(a, c);

        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::Number(1.0), Value::BigInt(1));
        assert_eq!(Value::invalid_date(), Value::invalid_date());
        assert_eq!(Value::pattern("^a+$").unwrap(), Value::pattern("^a+$").unwrap());
    }

    #[test]
    fn sets_ignore_order_and_duplicates() {
        let a = Value::set([Value::from(1), Value::from(2), Value::from(1)]);
        let b = Value::set([Value::from(2), Value::from(1)]);
        assert_eq!(a.len(), Some(2));
        assert_eq!(a, b);
    }

    #[test]
    fn undefined_property_differs_from_missing() {
        let obj = Value::object([("a", Value::Undefined)]);
        assert!(matches!(obj.get("a"), Some(Value::Undefined)));
        assert!(obj.get("b").is_none());
    }

    #[test]
    fn json_roundtrip_drops_undefined() {
        let obj = Value::object([
            ("a", Value::from(1)),
            ("b", Value::Undefined),
            ("c", Value::date(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())),
        ]);
        let json = obj.to_json();
        assert_eq!(json["a"], serde_json::json!(1.0));
        assert!(json.get("b").is_none());
        assert_eq!(json["c"], serde_json::json!("2024-01-02T03:04:05.000Z"));

        let parsed = Value::from_json(serde_json::json!({"a": [1, "x", null]}));
        assert_eq!(
            parsed.get("a"),
            Some(&Value::from(vec![Value::from(1), Value::from("x"), Value::Null]))
        );
    }

    #[test]
    fn type_names_roundtrip() {
        for ty in [ValueType::Number, ValueType::BigInt, ValueType::Date, ValueType::Set] {
            assert_eq!(ValueType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ValueType::from_name("widget"), None);
    }
}
