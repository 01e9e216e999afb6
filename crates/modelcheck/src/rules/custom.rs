//! Closure-backed validators for application-specific rules.

use crate::error::ValidatorError;
use crate::options::ValidatorOptions;
use crate::path::{PathAccessor, ResolvedPaths};
use crate::traits::{BoxFuture, Outcome, Validator};
use crate::value::{Value, ValueType};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type CheckFn = dyn Fn(&Value, &ValidatorOptions, &PathAccessor<'_>) -> Result<Outcome, ValidatorError>
    + Send
    + Sync;

type AsyncCheckFn = dyn Fn(Value, ValidatorOptions, ResolvedPaths) -> BoxFuture<Result<Option<String>, ValidatorError>>
    + Send
    + Sync;

/// A synchronous validator defined by a closure.
///
/// ```rust
/// use modelcheck::prelude::*;
///
/// let even = FnValidator::new("even", "The value must be even", |value, options, _| {
///     match value.as_f64() {
///         Some(n) if n % 2.0 != 0.0 => Ok(Outcome::fail(resolve_message(
///             options,
///             "The value must be even",
///             &[],
///         ))),
///         _ => Ok(Outcome::pass()),
///     }
/// })
/// .accepting([ValueType::Number]);
///
/// register_validator(ValidatorDefinition::new(even));
/// assert!(get_validator("even").is_some());
/// ```
#[derive(Clone)]
pub struct FnValidator {
    key: String,
    message: String,
    accepted: Option<Vec<ValueType>>,
    check: Arc<CheckFn>,
}

impl FnValidator {
    pub fn new<F>(key: impl Into<String>, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value, &ValidatorOptions, &PathAccessor<'_>) -> Result<Outcome, ValidatorError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            key: key.into(),
            message: message.into(),
            accepted: None,
            check: Arc::new(check),
        }
    }

    /// Restrict the validator to the given runtime types.
    pub fn accepting(mut self, types: impl IntoIterator<Item = ValueType>) -> Self {
        self.accepted = Some(types.into_iter().collect());
        self
    }
}

impl fmt::Debug for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("key", &self.key)
            .field("message", &self.message)
            .field("accepted", &self.accepted)
            .finish()
    }
}

impl Validator for FnValidator {
    fn key(&self) -> &str {
        &self.key
    }

    fn default_message(&self) -> &str {
        &self.message
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        self.accepted.as_deref()
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        (self.check)(value, options, accessor)
    }
}

/// An asynchronous validator defined by a closure returning a future.
///
/// The closure receives owned copies of the value and options. Paths given to
/// [`with_paths`](AsyncFnValidator::with_paths) are resolved against the
/// field's model before the future is built and passed in as
/// [`ResolvedPaths`]. Validations that disallow async work skip this
/// validator entirely.
#[derive(Clone)]
pub struct AsyncFnValidator {
    key: String,
    message: String,
    accepted: Option<Vec<ValueType>>,
    paths: Vec<String>,
    check: Arc<AsyncCheckFn>,
}

impl AsyncFnValidator {
    pub fn new<F, Fut>(key: impl Into<String>, message: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, ValidatorOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<String>, ValidatorError>> + Send + 'static,
    {
        Self::with_paths(key, message, Vec::<String>::new(), move |value, options, _| {
            f(value, options)
        })
    }

    /// A validator whose closure also reads the values at `paths`.
    ///
    /// ```rust
    /// use modelcheck::prelude::*;
    ///
    /// let within = AsyncFnValidator::with_paths(
    ///     "withinBudget",
    ///     "Over budget",
    ///     ["../budget"],
    ///     |value, _, resolved| async move {
    ///         let budget = resolved.resolve("../budget")?;
    ///         let over = matches!(
    ///             (value.as_f64(), budget.as_f64()),
    ///             (Some(cost), Some(limit)) if cost > limit
    ///         );
    ///         Ok::<_, ValidatorError>(over.then(|| "Over budget".to_string()))
    ///     },
    /// );
    /// assert!(within.is_async());
    /// ```
    pub fn with_paths<F, Fut, I, S>(
        key: impl Into<String>,
        message: impl Into<String>,
        paths: I,
        f: F,
    ) -> Self
    where
        F: Fn(Value, ValidatorOptions, ResolvedPaths) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<String>, ValidatorError>> + Send + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let check: Arc<AsyncCheckFn> = Arc::new(
            move |value: Value, options: ValidatorOptions, resolved: ResolvedPaths| {
                Box::pin(f(value, options, resolved)) as BoxFuture<Result<Option<String>, ValidatorError>>
            },
        );
        Self {
            key: key.into(),
            message: message.into(),
            accepted: None,
            paths: paths.into_iter().map(Into::into).collect(),
            check,
        }
    }

    pub fn accepting(mut self, types: impl IntoIterator<Item = ValueType>) -> Self {
        self.accepted = Some(types.into_iter().collect());
        self
    }
}

impl fmt::Debug for AsyncFnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFnValidator")
            .field("key", &self.key)
            .field("message", &self.message)
            .field("accepted", &self.accepted)
            .field("paths", &self.paths)
            .finish()
    }
}

impl Validator for AsyncFnValidator {
    fn key(&self) -> &str {
        &self.key
    }

    fn default_message(&self) -> &str {
        &self.message
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        self.accepted.as_deref()
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
        let resolved = ResolvedPaths::capture(accessor, self.paths.iter().map(String::as_str));
        Ok(Outcome::Pending((self.check)(
            value.clone(),
            options.clone(),
            resolved,
        )))
    }
}
