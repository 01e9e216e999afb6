//! Recursive validation of a model graph.
//!
//! Validation runs in two phases. The collection phase walks the instance
//! depth first in field declaration order, runs every synchronous validator
//! and parks the futures of asynchronous ones, recording where each result
//! belongs. The assembly phase turns those records into an [`ErrorReport`],
//! immediately when nothing is pending, or once every parked future has
//! completed otherwise.

use crate::error::{EngineError, ValidatorError};
use crate::message::format_message;
use crate::options::ValidatorOptions;
use crate::path::{PathAccessor, Scope};
use crate::registry::{with_registry, Registry};
use crate::report::{ErrorReport, FieldReport, ItemError};
use crate::schema::{FieldKind, FieldSchema, ModelSchema};
use crate::traits::{BoxFuture, Outcome};
use crate::value::Value;
use futures_util::future::join_all;
use std::fmt;

/// Message for a nested or element value that is not an object.
pub const NOT_A_MODEL_MESSAGE: &str = "Expected an object of model {0}, received {1}";

/// Key under which [`NOT_A_MODEL_MESSAGE`] is reported on a field.
pub const NESTED_KEY: &str = "nested";

static UNDEFINED: Value = Value::Undefined;

type PendingCheck = BoxFuture<Result<Option<String>, ValidatorError>>;

/// Per-call validation settings.
///
/// ```rust
/// use modelcheck::ValidateOptions;
///
/// let options = ValidateOptions::new().allow_async(true).exclude("password");
/// assert!(options.is_excluded("password"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    allow_async: bool,
    exclude: Vec<String>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run async validators and return a pending result when any exist.
    pub fn allow_async(mut self, allow: bool) -> Self {
        self.allow_async = allow;
        self
    }

    /// Skip a top-level field.
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.exclude.push(field.into());
        self
    }

    pub fn excluding<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn is_async_allowed(&self) -> bool {
        self.allow_async
    }

    pub fn is_excluded(&self, field: &str) -> bool {
        self.exclude.iter().any(|f| f == field)
    }
}

/// The result of validating a model.
///
/// `Ready(None)` means the model has no violations.
pub enum Validation {
    Ready(Option<ErrorReport>),
    /// Async validators are still running. Resolves to the full report.
    Pending(BoxFuture<Option<ErrorReport>>),
}

impl Validation {
    pub fn is_pending(&self) -> bool {
        matches!(self, Validation::Pending(_))
    }

    /// Wait for the report, whichever way it was produced.
    pub async fn resolve(self) -> Option<ErrorReport> {
        match self {
            Validation::Ready(report) => report,
            Validation::Pending(future) => future.await,
        }
    }

    /// The report if it is already available, otherwise the pending validation.
    pub fn into_ready(self) -> Result<Option<ErrorReport>, Self> {
        match self {
            Validation::Ready(report) => Ok(report),
            pending => Err(pending),
        }
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Ready(report) => f.debug_tuple("Ready").field(report).finish(),
            Validation::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Validation front end bound to one registry.
///
/// The free functions [`validate`] and [`validate_with`] use the
/// process-wide registry.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'r> {
    registry: &'r dyn Registry,
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r dyn Registry) -> Self {
        Self { registry }
    }

    /// Validate `instance` against `schema`.
    ///
    /// Fails only when `instance` is not an object. Every other problem,
    /// including misconfigured validators and unresolvable paths, ends up
    /// in the report.
    pub fn validate(
        &self,
        instance: &Value,
        schema: &ModelSchema,
        options: &ValidateOptions,
    ) -> Result<Validation, EngineError> {
        if !matches!(instance, Value::Object(_)) {
            return Err(EngineError::NotAnObject {
                found: instance.type_of(),
            });
        }

        let mut collector = Collector {
            registry: self.registry,
            allow_async: options.allow_async,
            pending: Vec::new(),
        };
        let root = Scope::root(instance);
        let draft = collector.collect(&root, schema, Some(options));

        if collector.pending.is_empty() {
            return Ok(Validation::Ready(draft.assemble(&[])));
        }

        trace_debug!(
            model = %schema.name,
            pending = collector.pending.len(),
            "awaiting async validators"
        );
        let pending = collector.pending;
        Ok(Validation::Pending(Box::pin(async move {
            let results: Vec<Option<String>> = join_all(pending)
                .await
                .into_iter()
                .map(|result| result.unwrap_or_else(|err| Some(err.to_string())))
                .collect();
            draft.assemble(&results)
        })))
    }
}

/// Validate `instance` with the process-wide registry.
///
/// ```rust
/// use modelcheck::prelude::*;
///
/// let schema = ModelSchema::new("User")
///     .field(FieldSchema::new("name").rule("required"))
///     .field(FieldSchema::new("age").rule_with("min", ValidatorOptions::with("min", 18)));
///
/// let user = Value::object([("name", Value::from("")), ("age", Value::from(12))]);
/// let report = validate(&user, &schema, false, &[])
///     .unwrap()
///     .into_ready()
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(report.get("name").unwrap().error("required"), Some("This field is required"));
/// assert_eq!(report.get("age").unwrap().error("min"), Some("The minimum value is 18"));
/// ```
pub fn validate(
    instance: &Value,
    schema: &ModelSchema,
    allow_async: bool,
    excluded: &[&str],
) -> Result<Validation, EngineError> {
    let options = ValidateOptions::new()
        .allow_async(allow_async)
        .excluding(excluded.iter().copied());
    validate_with(instance, schema, &options)
}

/// Validate `instance` with the process-wide registry and explicit options.
pub fn validate_with(
    instance: &Value,
    schema: &ModelSchema,
    options: &ValidateOptions,
) -> Result<Validation, EngineError> {
    with_registry(|registry| Engine::new(registry).validate(instance, schema, options))
}

/// Where one validator's result comes from.
enum Check {
    Ready(String),
    Awaiting(usize),
}

enum ItemDraft {
    Node(NodeDraft),
    Message(String),
}

struct FieldDraft {
    name: String,
    checks: Vec<(String, Check)>,
    nested: Option<NodeDraft>,
    items: Option<Vec<ItemDraft>>,
}

/// The shape of a node's report before pending results are known.
struct NodeDraft {
    fields: Vec<FieldDraft>,
}

impl NodeDraft {
    fn assemble(self, results: &[Option<String>]) -> Option<ErrorReport> {
        let fields = self
            .fields
            .into_iter()
            .filter_map(|field| {
                let name = field.name.clone();
                field.assemble(results).map(|report| (name, report))
            })
            .collect();
        ErrorReport::from_fields(fields)
    }
}

impl FieldDraft {
    fn assemble(self, results: &[Option<String>]) -> Option<FieldReport> {
        let mut errors: Vec<(String, String)> = Vec::new();
        for (key, check) in self.checks {
            let message = match check {
                Check::Ready(message) => Some(message),
                Check::Awaiting(index) => results.get(index).cloned().flatten(),
            };
            // A key attached twice keeps its first violation.
            if let Some(message) = message {
                if !errors.iter().any(|(k, _)| *k == key) {
                    errors.push((key, message));
                }
            }
        }

        let nested = self.nested.and_then(|node| node.assemble(results));
        let items = self.items.map(|items| {
            items
                .into_iter()
                .map(|item| match item {
                    ItemDraft::Node(node) => node.assemble(results).map(ItemError::Report),
                    ItemDraft::Message(message) => Some(ItemError::Message(message)),
                })
                .collect()
        });

        FieldReport::from_parts(errors, nested, items)
    }
}

struct Collector<'e> {
    registry: &'e dyn Registry,
    allow_async: bool,
    pending: Vec<PendingCheck>,
}

impl Collector<'_> {
    /// Collect one node. `options` is only passed for the root, where the
    /// exclusion list applies.
    fn collect(
        &mut self,
        scope: &Scope<'_>,
        schema: &ModelSchema,
        options: Option<&ValidateOptions>,
    ) -> NodeDraft {
        trace_trace!(model = %schema.name, depth = scope.depth(), "validating node");

        let mut fields = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            if options.is_some_and(|o| o.is_excluded(&field.name)) {
                trace_trace!(field = %field.name, "field excluded");
                continue;
            }
            fields.push(self.collect_field(scope, field));
        }
        NodeDraft { fields }
    }

    fn collect_field(&mut self, scope: &Scope<'_>, field: &FieldSchema) -> FieldDraft {
        let value = scope.node().get(&field.name).unwrap_or(&UNDEFINED);
        let accessor = PathAccessor::new(scope);

        let mut checks = Vec::with_capacity(field.validators.len());
        for binding in &field.validators {
            if let Some(check) = self.run_validator(&binding.key, &binding.options, value, &accessor)
            {
                checks.push((binding.key.clone(), check));
            }
        }

        let mut draft = FieldDraft {
            name: field.name.clone(),
            checks,
            nested: None,
            items: None,
        };

        match &field.kind {
            FieldKind::Scalar => {}
            FieldKind::Model(model) => match value {
                Value::Object(_) => {
                    let child = scope.child(value);
                    draft.nested = Some(self.collect(&child, model, None));
                }
                other if other.is_nullish() => {}
                other => draft.checks.push(not_a_model(model, other)),
            },
            FieldKind::List(model) | FieldKind::Set(model) => match value.as_items() {
                Some(elements) => {
                    let items = elements
                        .iter()
                        .map(|element| match element {
                            Value::Object(_) => {
                                // Elements see the owning model as their parent.
                                let child = scope.child(element);
                                ItemDraft::Node(self.collect(&child, model, None))
                            }
                            other => ItemDraft::Message(format_message(
                                NOT_A_MODEL_MESSAGE,
                                &[&model.name, &other.type_of()],
                            )),
                        })
                        .collect();
                    draft.items = Some(items);
                }
                None if value.is_nullish() => {}
                None => draft.checks.push(not_a_model(model, value)),
            },
        }

        draft
    }

    fn run_validator(
        &mut self,
        key: &str,
        options: &ValidatorOptions,
        value: &Value,
        accessor: &PathAccessor<'_>,
    ) -> Option<Check> {
        let Some(validator) = self.registry.get(key) else {
            trace_warn!(key = %key, "no validator registered under this key");
            return Some(Check::Ready(ValidatorError::Unknown(key.to_string()).to_string()));
        };

        if validator.is_async() && !self.allow_async {
            trace_debug!(key = %key, "skipping async validator");
            return None;
        }

        match validator.has_errors(value, options, accessor) {
            Ok(Outcome::Ready(message)) => message.map(Check::Ready),
            Ok(Outcome::Pending(future)) if self.allow_async => {
                self.pending.push(future);
                Some(Check::Awaiting(self.pending.len() - 1))
            }
            Ok(Outcome::Pending(_)) => {
                trace_debug!(key = %key, "dropping pending result, async validation is disabled");
                None
            }
            Err(err) => {
                trace_warn!(key = %key, error = %err, "validator failed");
                Some(Check::Ready(err.to_string()))
            }
        }
    }
}

fn not_a_model(model: &ModelSchema, value: &Value) -> (String, Check) {
    (
        NESTED_KEY.to_string(),
        Check::Ready(format_message(
            NOT_A_MODEL_MESSAGE,
            &[&model.name, &value.type_of()],
        )),
    )
}
