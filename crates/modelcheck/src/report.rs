//! Structured validation reports.
//!
//! An [`ErrorReport`] maps field names, in declaration order, to a
//! [`FieldReport`]. A field report carries the messages of its own failed
//! validators, the report of a nested model and, for list/set fields, a
//! positional slot per element.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Reserved key holding per-element slots in the nested JSON form.
pub const ITEMS_KEY: &str = "$items";

/// Reserved key holding a nested model's fields in the nested JSON form.
pub const FIELDS_KEY: &str = "$fields";

/// Key used for element type mismatches in the flattened form.
pub const ELEMENT_KEY: &str = "$element";

/// How [`ErrorReport::to_json`] lays out nested reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestingStrategy {
    /// Nested reports sit under `$fields` in their field's object.
    #[default]
    Nested,
    /// One entry per dotted path (`address.street`, `items.1.sku`).
    Flattened,
}

/// The outcome of one list or set element.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemError {
    /// The element is a model with violations.
    Report(ErrorReport),
    /// The element is not a model at all.
    Message(String),
}

/// A single violation addressed by dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatError {
    pub path: String,
    pub key: String,
    pub message: String,
}

/// Violations attached to one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldReport {
    errors: Vec<(String, String)>,
    nested: Option<ErrorReport>,
    items: Option<Vec<Option<ItemError>>>,
}

impl FieldReport {
    /// Build a field report, or `None` when nothing failed.
    pub(crate) fn from_parts(
        errors: Vec<(String, String)>,
        nested: Option<ErrorReport>,
        items: Option<Vec<Option<ItemError>>>,
    ) -> Option<Self> {
        let items = items.filter(|slots| slots.iter().any(Option::is_some));
        if errors.is_empty() && nested.is_none() && items.is_none() {
            return None;
        }
        Some(Self {
            errors,
            nested,
            items,
        })
    }

    /// Own violations as `(validator key, message)` pairs.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, m)| (k.as_str(), m.as_str()))
    }

    /// Message of the validator registered under `key`.
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, m)| m.as_str())
    }

    pub fn nested(&self) -> Option<&ErrorReport> {
        self.nested.as_ref()
    }

    /// Positional element slots, `None` for elements that passed.
    pub fn items(&self) -> Option<&[Option<ItemError>]> {
        self.items.as_deref()
    }

    /// Total number of violations under this field.
    pub fn len(&self) -> usize {
        let items = self.items.iter().flatten().flatten().map(|item| match item {
            ItemError::Report(report) => report.len(),
            ItemError::Message(_) => 1,
        });
        self.errors.len() + self.nested.as_ref().map_or(0, ErrorReport::len) + items.sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_nested_json(&self) -> JsonValue {
        let mut map = Map::new();
        for (key, message) in &self.errors {
            map.insert(key.clone(), JsonValue::String(message.clone()));
        }
        if let Some(nested) = &self.nested {
            map.insert(FIELDS_KEY.to_string(), nested.to_nested_json());
        }
        if let Some(items) = &self.items {
            let slots = items
                .iter()
                .map(|slot| match slot {
                    None => JsonValue::Null,
                    Some(ItemError::Report(report)) => report.to_nested_json(),
                    Some(ItemError::Message(message)) => JsonValue::String(message.clone()),
                })
                .collect();
            map.insert(ITEMS_KEY.to_string(), JsonValue::Array(slots));
        }
        JsonValue::Object(map)
    }

    fn flatten_into(&self, path: &str, out: &mut Vec<FlatError>) {
        for (key, message) in &self.errors {
            out.push(FlatError {
                path: path.to_string(),
                key: key.clone(),
                message: message.clone(),
            });
        }
        if let Some(nested) = &self.nested {
            nested.flatten_into(Some(path), out);
        }
        for (index, slot) in self.items.iter().flatten().enumerate() {
            let item_path = format!("{path}.{index}");
            match slot {
                None => {}
                Some(ItemError::Report(report)) => report.flatten_into(Some(&item_path), out),
                Some(ItemError::Message(message)) => out.push(FlatError {
                    path: item_path,
                    key: ELEMENT_KEY.to_string(),
                    message: message.clone(),
                }),
            }
        }
    }
}

/// Every violation found in one validated model, keyed by field.
///
/// Validation never hands out an empty report: "no violations" is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorReport {
    fields: Vec<(String, FieldReport)>,
}

impl ErrorReport {
    /// Build a report, or `None` when no field failed.
    pub(crate) fn from_fields(fields: Vec<(String, FieldReport)>) -> Option<Self> {
        if fields.is_empty() {
            None
        } else {
            Some(Self { fields })
        }
    }

    /// Report for a direct field.
    pub fn get(&self, field: &str) -> Option<&FieldReport> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, report)| report)
    }

    /// Report for a dotted path through nested models and list indices.
    ///
    /// ```text
    /// report.get_path("address.street")
    /// report.get_path("items.1.sku")
    /// ```
    pub fn get_path(&self, path: &str) -> Option<&FieldReport> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        while let Some(segment) = segments.next() {
            let report = match segment.parse::<usize>() {
                Ok(index) if current.items.is_some() => {
                    match current.items()?.get(index)?.as_ref()? {
                        ItemError::Report(report) => report,
                        ItemError::Message(_) => return None,
                    }
                }
                _ => {
                    current = current.nested()?.get(segment)?;
                    continue;
                }
            };
            current = report.get(segments.next()?)?;
        }
        Some(current)
    }

    /// Field names with violations, in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldReport)> {
        self.fields.iter().map(|(name, report)| (name.as_str(), report))
    }

    /// Total number of violations, nested ones included.
    pub fn len(&self) -> usize {
        self.fields.iter().map(|(_, report)| report.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every violation with its dotted path, depth first in declaration order.
    pub fn flatten(&self) -> Vec<FlatError> {
        let mut out = Vec::new();
        self.flatten_into(None, &mut out);
        out
    }

    /// Render the report as JSON.
    pub fn to_json(&self, strategy: NestingStrategy) -> JsonValue {
        match strategy {
            NestingStrategy::Nested => self.to_nested_json(),
            NestingStrategy::Flattened => {
                let mut map = Map::new();
                for error in self.flatten() {
                    let entry = map
                        .entry(error.path)
                        .or_insert_with(|| JsonValue::Object(Map::new()));
                    if let JsonValue::Object(messages) = entry {
                        messages.insert(error.key, JsonValue::String(error.message));
                    }
                }
                JsonValue::Object(map)
            }
        }
    }

    fn to_nested_json(&self) -> JsonValue {
        JsonValue::Object(
            self.fields
                .iter()
                .map(|(name, report)| (name.clone(), report.to_nested_json()))
                .collect(),
        )
    }

    fn flatten_into(&self, prefix: Option<&str>, out: &mut Vec<FlatError>) {
        for (name, report) in &self.fields {
            let path = match prefix {
                Some(prefix) => format!("{prefix}.{name}"),
                None => name.clone(),
            };
            report.flatten_into(&path, out);
        }
    }
}

impl Serialize for ErrorReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_nested_json().serialize(serializer)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.flatten().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} - {}", error.path, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorReport {}
