//! The validator contract and the type guard wrapped around it.

use crate::error::ValidatorError;
use crate::message::format_message;
use crate::options::ValidatorOptions;
use crate::path::{PathAccessor, ResolvedPaths};
use crate::value::{Value, ValueType};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by pending validator outcomes.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Message produced when a value fails a validator's accepted-type check.
pub const TYPE_MISMATCH_MESSAGE: &str = "Expected a value of type {0}, received {1}";

/// Result of invoking a validator: either known now, or pending.
pub enum Outcome {
    /// `None` means the value passed.
    Ready(Option<String>),
    Pending(BoxFuture<Result<Option<String>, ValidatorError>>),
}

impl Outcome {
    pub fn pass() -> Self {
        Outcome::Ready(None)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Outcome::Ready(Some(message.into()))
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Option<String>, ValidatorError>> + Send + 'static,
    {
        Outcome::Pending(Box::pin(future))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending(_))
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(message) => f.debug_tuple("Ready").field(message).finish(),
            Outcome::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// A keyed validation rule.
///
/// Implementors only write the rule body in [`Validator::check`]; the
/// accepted-type check declared by [`Validator::accepted_types`] runs first
/// once the validator is wrapped in a [`GuardedValidator`].
///
/// ## Example
///
/// ```rust
/// use modelcheck::prelude::*;
///
/// #[derive(Debug)]
/// struct Positive;
///
/// impl Validator for Positive {
///     fn key(&self) -> &str {
///         "positive"
///     }
///
///     fn default_message(&self) -> &str {
///         "The value must be positive"
///     }
///
///     fn accepted_types(&self) -> Option<&[ValueType]> {
///         Some(&[ValueType::Number])
///     }
///
///     fn check(
///         &self,
///         value: &Value,
///         options: &ValidatorOptions,
///         _accessor: &PathAccessor<'_>,
///     ) -> Result<Outcome, ValidatorError> {
///         match value.as_f64() {
///             Some(n) if n <= 0.0 => Ok(Outcome::fail(
///                 resolve_message(options, self.default_message(), &[]),
///             )),
///             _ => Ok(Outcome::pass()),
///         }
///     }
/// }
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// The key this validator is registered under by default.
    fn key(&self) -> &str;

    /// Default message template.
    fn default_message(&self) -> &str;

    /// Runtime types this validator accepts, `None` for any.
    fn accepted_types(&self) -> Option<&[ValueType]> {
        None
    }

    /// Whether this validator produces pending outcomes.
    ///
    /// Async validators are skipped entirely when a validation call disallows
    /// async work.
    fn is_async(&self) -> bool {
        false
    }

    /// The rule body.
    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError>;
}

/// A validator behind its type guard.
///
/// This is the form stored in registries and invoked by the orchestrator.
#[derive(Debug, Clone)]
pub struct GuardedValidator {
    inner: Arc<dyn Validator>,
}

impl GuardedValidator {
    pub fn new(validator: impl Validator + 'static) -> Self {
        Self {
            inner: Arc::new(validator),
        }
    }

    pub fn from_arc(validator: Arc<dyn Validator>) -> Self {
        Self { inner: validator }
    }

    pub fn key(&self) -> &str {
        self.inner.key()
    }

    pub fn default_message(&self) -> &str {
        self.inner.default_message()
    }

    pub fn accepted_types(&self) -> Option<&[ValueType]> {
        self.inner.accepted_types()
    }

    pub fn is_async(&self) -> bool {
        self.inner.is_async()
    }

    /// Check accepted types, then run the rule body.
    ///
    /// With accepted types declared, `Undefined` passes without reaching the
    /// rule: absence is the `required` validator's concern.
    pub fn has_errors(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        if let Some(accepted) = self.inner.accepted_types() {
            if value.is_undefined() {
                return Ok(Outcome::pass());
            }
            let actual = value.type_of();
            if !accepted.contains(&actual) {
                return Ok(Outcome::fail(type_mismatch_message(accepted, actual)));
            }
        }
        self.inner.check(value, options, accessor)
    }
}

fn type_mismatch_message(accepted: &[ValueType], actual: ValueType) -> String {
    let names: Vec<&str> = accepted.iter().map(|t| t.name()).collect();
    format_message(TYPE_MISMATCH_MESSAGE, &[&names.join(" or "), &actual])
}

/// An asynchronous rule, for checks that wait on something external.
///
/// Wrap it in an [`AsyncValidator`] to register it. Async rules receive owned
/// copies of the value and options since their futures outlive the call.
/// Other values of the graph are reached by naming their paths in
/// [`paths`](AsyncRule::paths); they are resolved before the future is built.
#[async_trait]
pub trait AsyncRule: Send + Sync + fmt::Debug + 'static {
    fn key(&self) -> &str;

    fn default_message(&self) -> &str;

    fn accepted_types(&self) -> Option<&[ValueType]> {
        None
    }

    /// Paths, relative to the field's model, to resolve for `check_async`.
    fn paths(&self, _options: &ValidatorOptions) -> Vec<String> {
        Vec::new()
    }

    async fn check_async(
        &self,
        value: Value,
        options: ValidatorOptions,
        resolved: ResolvedPaths,
    ) -> Result<Option<String>, ValidatorError>;
}

/// Adapts an [`AsyncRule`] to the [`Validator`] contract.
#[derive(Debug)]
pub struct AsyncValidator<R> {
    rule: Arc<R>,
}

impl<R: AsyncRule> AsyncValidator<R> {
    pub fn new(rule: R) -> Self {
        Self {
            rule: Arc::new(rule),
        }
    }
}

impl<R: AsyncRule> Validator for AsyncValidator<R> {
    fn key(&self) -> &str {
        self.rule.key()
    }

    fn default_message(&self) -> &str {
        self.rule.default_message()
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        self.rule.accepted_types()
    }

    fn is_async(&self) -> bool {
        true
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let resolved = ResolvedPaths::capture(accessor, self.rule.paths(options));
        let rule = Arc::clone(&self.rule);
        let value = value.clone();
        let options = options.clone();
        Ok(Outcome::pending(async move {
            rule.check_async(value, options, resolved).await
        }))
    }
}
