//! # modelcheck
//!
//! Declarative validation of object graphs. Fields are described by a
//! [`ModelSchema`]; each field names validators by key, and validators are
//! looked up in a [`Registry`] at validation time.
//!
//! ## Example
//!
//! ```rust
//! use modelcheck::prelude::*;
//!
//! let schema = ModelSchema::new("Booking")
//!     .field(FieldSchema::new("start").rule("required"))
//!     .field(
//!         FieldSchema::new("end")
//!             .rule("required")
//!             .rule_with("greaterThan", ValidatorOptions::compare_to("start")),
//!     );
//!
//! let booking = Value::object([("start", Value::from(10)), ("end", Value::from(5))]);
//! let report = validate(&booking, &schema, false, &[])
//!     .unwrap()
//!     .into_ready()
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(report.to_string(), "end - The value must be greater than start");
//! ```
//!
//! ## Paths
//!
//! Cross-field validators address other values with paths relative to the
//! model owning the field: `other` for a sibling, `a/b` or `a.b` to descend,
//! and `..` to step out to the model that contains the current one.
//!
//! ## Async validators
//!
//! Validators flagged async return a future instead of a message. They only
//! run when validation is called with async allowed, in which case
//! [`Validation::Pending`] resolves to the merged report. Paths an async
//! validator declares are resolved before its future starts and reach it as
//! [`ResolvedPaths`].
//!
//! ## Error Format
//!
//! [`ErrorReport`] serializes field by field. A nested model's report goes
//! under `$fields` inside its field and list elements go under `$items`:
//!
//! ```json
//! {
//!   "end": {"greaterThan": "The value must be greater than start"},
//!   "address": {"$fields": {"street": {"required": "This field is required"}}},
//!   "lines": {"$items": [null, {"sku": {"required": "This field is required"}}]}
//! }
//! ```

#[macro_use]
mod tracing_macros;

mod error;
mod message;
mod options;
mod path;
mod registry;
mod report;
mod schema;
mod traits;
mod validate;
mod value;

pub mod rules;


pub use error::{ComparabilityError, EngineError, PathError, ValidatorError};
pub use message::{format_message, resolve_message};
pub use options::{ValidatorOptions, DEFAULT_TARGET_KEY};
pub use path::{tokenize, PathAccessor, PathToken, ResolvedPaths, Scope};
pub use registry::{
    custom_validator_keys, get_validator, register_validator, register_validators,
    set_registry, set_registry_with, validator_keys, with_registry, CustomKey, DefaultRegistry,
    Registry, ValidatorDefinition,
};
pub use report::{
    ErrorReport, FieldReport, FlatError, ItemError, NestingStrategy, ELEMENT_KEY, FIELDS_KEY,
    ITEMS_KEY,
};
pub use schema::{FieldKind, FieldSchema, ModelSchema, ValidatorBinding};
pub use traits::{
    AsyncRule, AsyncValidator, BoxFuture, GuardedValidator, Outcome, Validator,
    TYPE_MISMATCH_MESSAGE,
};
pub use validate::{
    validate, validate_with, Engine, ValidateOptions, Validation, NESTED_KEY,
    NOT_A_MODEL_MESSAGE,
};
pub use value::{Object, Value, ValueType};

/// Prelude module for validation
pub mod prelude {
    pub use crate::error::{ComparabilityError, EngineError, PathError, ValidatorError};
    pub use crate::message::{format_message, resolve_message};
    pub use crate::options::ValidatorOptions;
    pub use crate::path::{PathAccessor, ResolvedPaths};
    pub use crate::registry::{
        get_validator, register_validator, register_validators, Registry, ValidatorDefinition,
    };
    pub use crate::report::{ErrorReport, FieldReport, ItemError, NestingStrategy};
    pub use crate::rules::{AsyncFnValidator, FnValidator};
    pub use crate::schema::{FieldSchema, ModelSchema};
    pub use crate::traits::{AsyncRule, AsyncValidator, GuardedValidator, Outcome, Validator};
    pub use crate::validate::{validate, validate_with, ValidateOptions, Validation};
    pub use crate::value::{Value, ValueType};
}
