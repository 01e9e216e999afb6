//! Validator registry.
//!
//! A registry maps validator keys to validator instances. The process-wide
//! registry starts out holding every built-in validator and can be replaced
//! at configuration time with [`set_registry`] / [`set_registry_with`].
//! Callers must not register validators while validations are in flight.

use crate::rules::builtin_validators;
use crate::traits::{GuardedValidator, Validator};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

/// A validator plus registration details.
#[derive(Debug, Clone)]
pub struct ValidatorDefinition {
    pub validator: GuardedValidator,
    /// Register under this key instead of the validator's own key
    pub key: Option<String>,
    /// Carry this registration over when the registry is replaced
    pub persist: bool,
}

impl ValidatorDefinition {
    pub fn new(validator: impl Validator + 'static) -> Self {
        Self::from_guarded(GuardedValidator::new(validator))
    }

    pub fn from_guarded(validator: GuardedValidator) -> Self {
        Self {
            validator,
            key: None,
            persist: false,
        }
    }

    /// Register under a custom key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// The key the definition registers under.
    pub fn effective_key(&self) -> &str {
        self.key.as_deref().unwrap_or_else(|| self.validator.key())
    }
}

impl From<GuardedValidator> for ValidatorDefinition {
    fn from(validator: GuardedValidator) -> Self {
        Self::from_guarded(validator)
    }
}

/// Bookkeeping for a validator registered under a custom key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomKey {
    /// The validator's own key
    pub validator_key: String,
    pub persist: bool,
}

/// A table of validators addressable by key.
pub trait Registry: Send + Sync + fmt::Debug {
    /// Register a validator. Returns `false` if the key was already taken,
    /// in which case the existing validator is kept.
    fn register(&mut self, definition: ValidatorDefinition) -> bool;

    fn get(&self, key: &str) -> Option<GuardedValidator>;

    /// All registered keys, in registration order.
    fn keys(&self) -> Vec<String>;

    /// Keys registered through a custom key.
    fn custom_keys(&self) -> BTreeMap<String, CustomKey>;
}

/// The standard in-memory registry.
#[derive(Debug, Default)]
pub struct DefaultRegistry {
    validators: HashMap<String, GuardedValidator>,
    order: Vec<String>,
    custom: BTreeMap<String, CustomKey>,
}

impl DefaultRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in validator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for validator in builtin_validators() {
            registry.register(ValidatorDefinition::from_guarded(validator));
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Registry for DefaultRegistry {
    fn register(&mut self, definition: ValidatorDefinition) -> bool {
        let key = definition.effective_key().to_string();
        if self.validators.contains_key(&key) {
            trace_debug!(key = %key, "validator already registered, keeping the first registration");
            return false;
        }

        if definition.key.is_some() {
            self.custom.insert(
                key.clone(),
                CustomKey {
                    validator_key: definition.validator.key().to_string(),
                    persist: definition.persist,
                },
            );
        }
        trace_debug!(key = %key, "registered validator");
        self.validators.insert(key.clone(), definition.validator);
        self.order.push(key);
        true
    }

    fn get(&self, key: &str) -> Option<GuardedValidator> {
        self.validators.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    fn custom_keys(&self) -> BTreeMap<String, CustomKey> {
        self.custom.clone()
    }
}

static GLOBAL_REGISTRY: OnceLock<RwLock<Box<dyn Registry>>> = OnceLock::new();

fn global() -> &'static RwLock<Box<dyn Registry>> {
    GLOBAL_REGISTRY.get_or_init(|| RwLock::new(Box::new(DefaultRegistry::with_builtins())))
}

/// Run `f` against the process-wide registry.
pub fn with_registry<T>(f: impl FnOnce(&dyn Registry) -> T) -> T {
    let guard = global().read().unwrap_or_else(PoisonError::into_inner);
    f(guard.as_ref())
}

/// Register a validator in the process-wide registry.
pub fn register_validator(definition: impl Into<ValidatorDefinition>) -> bool {
    let mut guard = global().write().unwrap_or_else(PoisonError::into_inner);
    guard.register(definition.into())
}

/// Register several validators. Returns how many were newly added.
pub fn register_validators<I>(definitions: I) -> usize
where
    I: IntoIterator<Item = ValidatorDefinition>,
{
    let mut guard = global().write().unwrap_or_else(PoisonError::into_inner);
    definitions
        .into_iter()
        .filter(|definition| guard.register(definition.clone()))
        .count()
}

/// Look up a validator in the process-wide registry.
pub fn get_validator(key: &str) -> Option<GuardedValidator> {
    with_registry(|registry| registry.get(key))
}

pub fn validator_keys() -> Vec<String> {
    with_registry(|registry| registry.keys())
}

pub fn custom_validator_keys() -> BTreeMap<String, CustomKey> {
    with_registry(|registry| registry.custom_keys())
}

/// Replace the process-wide registry.
///
/// Validators registered under a custom key with `persist` set are carried
/// over into the new registry. Returns the previous registry.
pub fn set_registry(registry: impl Registry + 'static) -> Box<dyn Registry> {
    set_registry_with(registry, |key, validator, custom, target| {
        if let Some(custom) = custom.filter(|c| c.persist) {
            target.register(
                ValidatorDefinition::from_guarded(validator)
                    .with_key(key)
                    .persist(custom.persist),
            );
        }
    })
}

/// Replace the process-wide registry, calling `migrate` once for every key
/// of the previous registry.
///
/// `migrate` receives the key, its validator, its custom-key record if any,
/// and the new registry.
pub fn set_registry_with<F>(registry: impl Registry + 'static, mut migrate: F) -> Box<dyn Registry>
where
    F: FnMut(&str, GuardedValidator, Option<&CustomKey>, &mut dyn Registry),
{
    let mut replacement: Box<dyn Registry> = Box::new(registry);
    let mut guard = global().write().unwrap_or_else(PoisonError::into_inner);

    let custom = guard.custom_keys();
    for key in guard.keys() {
        if let Some(validator) = guard.get(&key) {
            migrate(&key, validator, custom.get(&key), replacement.as_mut());
        }
    }

    trace_debug!(
        migrated = replacement.keys().len(),
        "replaced the process-wide validator registry"
    );
    std::mem::replace(&mut *guard, replacement)
}
