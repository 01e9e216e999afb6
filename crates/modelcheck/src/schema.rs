//! Per-model validation configuration.
//!
//! A [`ModelSchema`] lists a model's fields in declaration order. Each field
//! carries the validators attached to it, in attachment order, and says
//! whether its value is a scalar, a nested model, or a list/set of models.

use crate::error::EngineError;
use crate::options::ValidatorOptions;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A validator key and the options it runs with on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorBinding {
    pub key: String,
    #[serde(default)]
    pub options: ValidatorOptions,
}

impl ValidatorBinding {
    pub fn new(key: impl Into<String>, options: ValidatorOptions) -> Self {
        Self {
            key: key.into(),
            options,
        }
    }
}

/// The declared shape of a field's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "schema", rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Scalar,
    /// A nested model validated with its own schema
    Model(Arc<ModelSchema>),
    /// A list whose elements are models
    List(Arc<ModelSchema>),
    /// A set whose elements are models
    Set(Arc<ModelSchema>),
}

impl FieldKind {
    /// The schema of nested nodes, if any.
    pub fn model(&self) -> Option<&ModelSchema> {
        match self {
            FieldKind::Scalar => None,
            FieldKind::Model(schema) | FieldKind::List(schema) | FieldKind::Set(schema) => {
                Some(schema)
            }
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub validators: Vec<ValidatorBinding>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar,
            validators: Vec::new(),
        }
    }

    /// Attach a validator with empty options.
    pub fn rule(self, key: impl Into<String>) -> Self {
        self.rule_with(key, ValidatorOptions::new())
    }

    /// Attach a validator with options.
    pub fn rule_with(mut self, key: impl Into<String>, options: ValidatorOptions) -> Self {
        self.validators.push(ValidatorBinding::new(key, options));
        self
    }

    /// Declare the field as a nested model.
    pub fn model(mut self, schema: impl Into<Arc<ModelSchema>>) -> Self {
        self.kind = FieldKind::Model(schema.into());
        self
    }

    /// Declare the field as a list of models.
    pub fn list_of(mut self, schema: impl Into<Arc<ModelSchema>>) -> Self {
        self.kind = FieldKind::List(schema.into());
        self
    }

    /// Declare the field as a set of models.
    pub fn set_of(mut self, schema: impl Into<Arc<ModelSchema>>) -> Self {
        self.kind = FieldKind::Set(schema.into());
        self
    }
}

/// Validation configuration for one model type, built once and shared.
///
/// ```rust
/// use modelcheck::prelude::*;
///
/// let address = ModelSchema::new("Address")
///     .field(FieldSchema::new("street").rule("required"));
///
/// let user = ModelSchema::new("User")
///     .field(FieldSchema::new("age").rule_with("min", ValidatorOptions::with("min", 18)))
///     .field(FieldSchema::new("address").model(address));
///
/// assert_eq!(user.fields.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare the next field.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Load a schema from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}
