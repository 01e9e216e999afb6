//! Synchronous single-field validators.
//!
//! Every validator here treats an `Undefined` value as valid; only
//! [`RequiredValidator`] flags missing values.

use crate::error::ValidatorError;
use crate::message::resolve_message;
use crate::options::ValidatorOptions;
use crate::path::PathAccessor;
use crate::rules::comparison::compare_ordering;
use crate::traits::{Outcome, Validator};
use crate::value::{Value, ValueType};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{OnceLock, PoisonError, RwLock};

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified email regex
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
        ).unwrap()
    })
}

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").unwrap())
}

const NUMERIC: &[ValueType] = &[ValueType::Number, ValueType::BigInt];
const SIZED: &[ValueType] = &[ValueType::String, ValueType::Array, ValueType::Set];
const TEXT: &[ValueType] = &[ValueType::String];
const DATES: &[ValueType] = &[ValueType::Date];
const LISTS: &[ValueType] = &[ValueType::Array, ValueType::Set];

fn violation(options: &ValidatorOptions, template: &str, args: &[&dyn Display]) -> Outcome {
    Outcome::fail(resolve_message(options, template, args))
}

fn require_param<'o>(
    options: &'o ValidatorOptions,
    validator: &str,
    param: &str,
) -> Result<&'o Value, ValidatorError> {
    options
        .get(param)
        .ok_or_else(|| ValidatorError::missing_option(validator, param))
}

fn numeric_param<'o>(
    options: &'o ValidatorOptions,
    validator: &str,
    param: &str,
) -> Result<&'o Value, ValidatorError> {
    let value = require_param(options, validator, param)?;
    match value {
        Value::Number(_) | Value::BigInt(_) => Ok(value),
        other => Err(ValidatorError::invalid_option(
            validator,
            param,
            format!("expected a number, got {}", other.type_of()),
        )),
    }
}

fn length_param(options: &ValidatorOptions, validator: &str, param: &str) -> Result<usize, ValidatorError> {
    let value = require_param(options, validator, param)?;
    match value {
        Value::Number(n) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => Ok(*n as usize),
        Value::BigInt(b) if *b >= 0 => usize::try_from(*b).map_err(|_| {
            ValidatorError::invalid_option(validator, param, "length is out of range")
        }),
        _ => Err(ValidatorError::invalid_option(
            validator,
            param,
            "expected a non-negative integer",
        )),
    }
}

fn date_param(options: &ValidatorOptions, validator: &str, param: &str) -> Result<Value, ValidatorError> {
    let value = require_param(options, validator, param)?;
    match value {
        Value::Date(_) => Ok(value.clone()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| Value::date(d.with_timezone(&Utc)))
            .map_err(|e| ValidatorError::invalid_option(validator, param, e.to_string())),
        other => Err(ValidatorError::invalid_option(
            validator,
            param,
            format!("expected a date, got {}", other.type_of()),
        )),
    }
}

/// Flags `Undefined`, `Null` and the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl Validator for RequiredValidator {
    fn key(&self) -> &str {
        "required"
    }

    fn default_message(&self) -> &str {
        "This field is required"
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let missing = match value {
            Value::Undefined | Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        if missing {
            Ok(violation(options, self.default_message(), &[]))
        } else {
            Ok(Outcome::pass())
        }
    }
}

/// Lower bound on a number or big integer, read from the `min` param.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinValidator;

impl Validator for MinValidator {
    fn key(&self) -> &str {
        "min"
    }

    fn default_message(&self) -> &str {
        "The minimum value is {0}"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(NUMERIC)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let min = numeric_param(options, "min", "min")?;
        if compare_ordering(value, min)?.is_lt() {
            Ok(violation(options, self.default_message(), &[min]))
        } else {
            Ok(Outcome::pass())
        }
    }
}

/// Upper bound on a number or big integer, read from the `max` param.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxValidator;

impl Validator for MaxValidator {
    fn key(&self) -> &str {
        "max"
    }

    fn default_message(&self) -> &str {
        "The maximum value is {0}"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(NUMERIC)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let max = numeric_param(options, "max", "max")?;
        if compare_ordering(value, max)?.is_gt() {
            Ok(violation(options, self.default_message(), &[max]))
        } else {
            Ok(Outcome::pass())
        }
    }
}

/// Minimum length of a string, array or set.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinLengthValidator;

impl Validator for MinLengthValidator {
    fn key(&self) -> &str {
        "minLength"
    }

    fn default_message(&self) -> &str {
        "The minimum length is {0}"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(SIZED)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let min = length_param(options, "minLength", "minLength")?;
        match value.len() {
            Some(len) if len < min => Ok(violation(options, self.default_message(), &[&min])),
            _ => Ok(Outcome::pass()),
        }
    }
}

/// Maximum length of a string, array or set.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLengthValidator;

impl Validator for MaxLengthValidator {
    fn key(&self) -> &str {
        "maxLength"
    }

    fn default_message(&self) -> &str {
        "The maximum length is {0}"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(SIZED)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let max = length_param(options, "maxLength", "maxLength")?;
        match value.len() {
            Some(len) if len > max => Ok(violation(options, self.default_message(), &[&max])),
            _ => Ok(Outcome::pass()),
        }
    }
}

/// Upper bound on string patterns kept compiled by one [`PatternValidator`].
const MAX_CACHED_PATTERNS: usize = 256;

/// Matches a string against the `pattern` param (a string or pattern value).
///
/// String patterns are compiled once and kept for later checks.
#[derive(Debug, Default)]
pub struct PatternValidator {
    compiled: RwLock<HashMap<String, Regex>>,
}

impl PatternValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(&self, source: &str) -> Result<Regex, ValidatorError> {
        if let Some(regex) = self
            .compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
        {
            return Ok(regex.clone());
        }

        let regex = Regex::new(source)
            .map_err(|e| ValidatorError::invalid_option("pattern", "pattern", e.to_string()))?;
        let mut compiled = self.compiled.write().unwrap_or_else(PoisonError::into_inner);
        if compiled.len() >= MAX_CACHED_PATTERNS {
            trace_debug!(cached = compiled.len(), "pattern cache full, clearing");
            compiled.clear();
        }
        compiled.insert(source.to_string(), regex.clone());
        Ok(regex)
    }

    #[cfg(test)]
    fn cached(&self) -> usize {
        self.compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Validator for PatternValidator {
    fn key(&self) -> &str {
        "pattern"
    }

    fn default_message(&self) -> &str {
        "The value does not match the pattern {0}"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(TEXT)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let text = value.as_str().unwrap_or_default();
        let matched = match require_param(options, "pattern", "pattern")? {
            Value::Pattern(regex) => regex.is_match(text),
            Value::String(source) => self.compile(source)?.is_match(text),
            other => {
                return Err(ValidatorError::invalid_option(
                    "pattern",
                    "pattern",
                    format!("expected a pattern, got {}", other.type_of()),
                ))
            }
        };

        if matched {
            Ok(Outcome::pass())
        } else {
            let source = options.get("pattern").map(|p| match p {
                Value::Pattern(regex) => regex.as_str().to_string(),
                other => other.to_string(),
            });
            Ok(violation(
                options,
                self.default_message(),
                &[&source.unwrap_or_default()],
            ))
        }
    }
}

/// Email address format.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl Validator for EmailValidator {
    fn key(&self) -> &str {
        "email"
    }

    fn default_message(&self) -> &str {
        "Invalid email format"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(TEXT)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        if email_regex().is_match(value.as_str().unwrap_or_default()) {
            Ok(Outcome::pass())
        } else {
            Ok(violation(options, self.default_message(), &[]))
        }
    }
}

/// URL format.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlValidator;

impl Validator for UrlValidator {
    fn key(&self) -> &str {
        "url"
    }

    fn default_message(&self) -> &str {
        "Invalid URL format"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(TEXT)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        if url_regex().is_match(value.as_str().unwrap_or_default()) {
            Ok(Outcome::pass())
        } else {
            Ok(violation(options, self.default_message(), &[]))
        }
    }
}

/// Earliest allowed date, from the `minDate` param (a date or RFC 3339 string).
#[derive(Debug, Clone, Copy, Default)]
pub struct MinDateValidator;

impl Validator for MinDateValidator {
    fn key(&self) -> &str {
        "minDate"
    }

    fn default_message(&self) -> &str {
        "The minimum date is {0}"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(DATES)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let min = date_param(options, "minDate", "minDate")?;
        if compare_ordering(value, &min)?.is_lt() {
            Ok(violation(options, self.default_message(), &[&min]))
        } else {
            Ok(Outcome::pass())
        }
    }
}

/// Latest allowed date, from the `maxDate` param.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxDateValidator;

impl Validator for MaxDateValidator {
    fn key(&self) -> &str {
        "maxDate"
    }

    fn default_message(&self) -> &str {
        "The maximum date is {0}"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(DATES)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let max = date_param(options, "maxDate", "maxDate")?;
        if compare_ordering(value, &max)?.is_gt() {
            Ok(violation(options, self.default_message(), &[&max]))
        } else {
            Ok(Outcome::pass())
        }
    }
}

/// Runtime type check against the `type` param: a type name or a list of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeValidator;

impl TypeValidator {
    fn expected(options: &ValidatorOptions) -> Result<Vec<ValueType>, ValidatorError> {
        let names: Vec<&Value> = match require_param(options, "type", "type")? {
            Value::Array(items) | Value::Set(items) => items.iter().collect(),
            single => vec![single],
        };
        names
            .into_iter()
            .map(|name| {
                name.as_str()
                    .and_then(ValueType::from_name)
                    .ok_or_else(|| {
                        ValidatorError::invalid_option("type", "type", format!("unknown type {}", name))
                    })
            })
            .collect()
    }
}

impl Validator for TypeValidator {
    fn key(&self) -> &str {
        "type"
    }

    fn default_message(&self) -> &str {
        "The value must be of type {0}"
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        if value.is_undefined() {
            return Ok(Outcome::pass());
        }
        let expected = Self::expected(options)?;
        if expected.contains(&value.type_of()) {
            Ok(Outcome::pass())
        } else {
            let names: Vec<&str> = expected.iter().map(|t| t.name()).collect();
            Ok(violation(options, self.default_message(), &[&names.join(" or ")]))
        }
    }
}

/// Rejects lists holding deep-equal duplicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueValidator;

impl Validator for UniqueValidator {
    fn key(&self) -> &str {
        "unique"
    }

    fn default_message(&self) -> &str {
        "The list contains duplicate values"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(LISTS)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let items = value.as_items().unwrap_or_default();
        let duplicated = items
            .iter()
            .enumerate()
            .any(|(i, item)| items[i + 1..].contains(item));
        if duplicated {
            Ok(violation(options, self.default_message(), &[]))
        } else {
            Ok(Outcome::pass())
        }
    }
}

/// Membership in the `options` param list.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneOfValidator;

impl Validator for OneOfValidator {
    fn key(&self) -> &str {
        "oneOf"
    }

    fn default_message(&self) -> &str {
        "The value must be one of {0}"
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        if value.is_undefined() {
            return Ok(Outcome::pass());
        }
        let allowed = require_param(options, "oneOf", "options")?;
        let items = allowed.as_items().ok_or_else(|| {
            ValidatorError::invalid_option("oneOf", "options", "expected a list of allowed values")
        })?;
        if items.contains(value) {
            Ok(Outcome::pass())
        } else {
            Ok(violation(options, self.default_message(), &[allowed]))
        }
    }
}

/// The value must be a whole multiple of the `step` param.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepValidator;

impl Validator for StepValidator {
    fn key(&self) -> &str {
        "step"
    }

    fn default_message(&self) -> &str {
        "The value must be a multiple of {0}"
    }

    fn accepted_types(&self) -> Option<&[ValueType]> {
        Some(NUMERIC)
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        _accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        let step = numeric_param(options, "step", "step")?;
        let aligned = match (value, step) {
            (Value::BigInt(v), Value::BigInt(s)) if *s > 0 => v % s == 0,
            _ => {
                let step = step.as_f64().unwrap_or(f64::NAN);
                if !step.is_finite() || step <= 0.0 {
                    return Err(ValidatorError::invalid_option(
                        "step",
                        "step",
                        "expected a positive finite number",
                    ));
                }
                let quotient = value.as_f64().unwrap_or(f64::NAN) / step;
                quotient.is_finite() && (quotient - quotient.round()).abs() < 1e-9
            }
        };
        if aligned {
            Ok(Outcome::pass())
        } else {
            Ok(violation(options, self.default_message(), &[step]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Scope;
    use crate::traits::GuardedValidator;
    use chrono::TimeZone;

    fn check(validator: impl Validator + 'static, value: Value, options: ValidatorOptions) -> Option<String> {
        let root = Value::object([("field", value.clone())]);
        let scope = Scope::root(&root);
        let accessor = PathAccessor::new(&scope);
        match GuardedValidator::new(validator).has_errors(&value, &options, &accessor) {
            Ok(Outcome::Ready(message)) => message,
            Ok(Outcome::Pending(_)) => panic!("sync validators never pend"),
            Err(err) => Some(err.to_string()),
        }
    }

    #[test]
    fn required_flags_missing_values() {
        let none = ValidatorOptions::new();
        assert_eq!(
            check(RequiredValidator, Value::from(""), none.clone()).as_deref(),
            Some("This field is required")
        );
        assert!(check(RequiredValidator, Value::Undefined, none.clone()).is_some());
        assert!(check(RequiredValidator, Value::Null, none.clone()).is_some());
        assert!(check(RequiredValidator, Value::from(0), none.clone()).is_none());
        assert!(check(RequiredValidator, Value::from(" "), none).is_none());
    }

    #[test]
    fn min_and_max() {
        assert_eq!(
            check(MinValidator, Value::from(5), ValidatorOptions::with("min", 10)).as_deref(),
            Some("The minimum value is 10")
        );
        assert!(check(MinValidator, Value::from(10), ValidatorOptions::with("min", 10)).is_none());
        assert!(check(MinValidator, Value::BigInt(11), ValidatorOptions::with("min", 10)).is_none());
        assert_eq!(
            check(MaxValidator, Value::from(2.5), ValidatorOptions::with("max", 2)).as_deref(),
            Some("The maximum value is 2")
        );
        assert_eq!(
            check(MinValidator, Value::from("5"), ValidatorOptions::with("min", 1)).as_deref(),
            Some("Expected a value of type number or bigint, received string")
        );
        assert_eq!(
            check(MinValidator, Value::from(f64::NAN), ValidatorOptions::with("min", 1)).as_deref(),
            Some("Cannot compare NaN or infinite numbers")
        );
    }

    #[test]
    fn min_without_param_is_configuration_error() {
        assert_eq!(
            check(MinValidator, Value::from(5), ValidatorOptions::new()).as_deref(),
            Some("Validator \"min\" requires option \"min\"")
        );
    }

    #[test]
    fn lengths() {
        let min = ValidatorOptions::with("minLength", 3);
        assert_eq!(
            check(MinLengthValidator, Value::from("ab"), min.clone()).as_deref(),
            Some("The minimum length is 3")
        );
        assert!(check(MinLengthValidator, Value::from("héé"), min).is_none());

        let max = ValidatorOptions::with("maxLength", 1);
        assert_eq!(
            check(
                MaxLengthValidator,
                Value::from(vec![Value::from(1), Value::from(2)]),
                max
            )
            .as_deref(),
            Some("The maximum length is 1")
        );
        assert!(check(
            MaxLengthValidator,
            Value::from("x"),
            ValidatorOptions::with("maxLength", -1)
        )
        .unwrap()
        .contains("expected a non-negative integer"));
    }

    #[test]
    fn pattern_accepts_strings_and_compiled_patterns() {
        let options = ValidatorOptions::with("pattern", r"^\d{3}$");
        assert!(check(PatternValidator::new(), Value::from("123"), options.clone()).is_none());
        assert_eq!(
            check(PatternValidator::new(), Value::from("12a"), options).as_deref(),
            Some(r"The value does not match the pattern ^\d{3}$")
        );

        let compiled = ValidatorOptions::with("pattern", Value::pattern("^a+$").unwrap());
        assert!(check(PatternValidator::new(), Value::from("aaa"), compiled).is_none());

        let broken = ValidatorOptions::with("pattern", "(");
        assert!(check(PatternValidator::new(), Value::from("x"), broken)
            .unwrap()
            .starts_with("Validator \"pattern\" has an invalid \"pattern\" option"));
    }

    #[test]
    fn string_patterns_compile_once() {
        let validator = PatternValidator::new();
        let root = Value::object([("code", Value::from("123"))]);
        let scope = Scope::root(&root);
        let accessor = PathAccessor::new(&scope);
        let options = ValidatorOptions::with("pattern", r"^\d+$");

        for text in ["123", "456", "abc"] {
            validator
                .check(&Value::from(text), &options, &accessor)
                .unwrap();
        }
        assert_eq!(validator.cached(), 1);

        let broken = ValidatorOptions::with("pattern", "(");
        assert!(validator.check(&Value::from("x"), &broken, &accessor).is_err());
        assert_eq!(validator.cached(), 1);
    }

    #[test]
    fn email_and_url() {
        let none = ValidatorOptions::new();
        assert!(check(EmailValidator, Value::from("test@example.com"), none.clone()).is_none());
        assert_eq!(
            check(EmailValidator, Value::from("user@"), none.clone()).as_deref(),
            Some("Invalid email format")
        );
        assert!(check(UrlValidator, Value::from("https://example.com/a?b=1"), none.clone()).is_none());
        assert_eq!(
            check(UrlValidator, Value::from("not-a-url"), none).as_deref(),
            Some("Invalid URL format")
        );
    }

    #[test]
    fn date_bounds() {
        let day = |d| Value::date(Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap());
        let options = ValidatorOptions::with("minDate", "2024-01-10T00:00:00Z");
        assert_eq!(
            check(MinDateValidator, day(5), options.clone()).as_deref(),
            Some("The minimum date is 2024-01-10T00:00:00.000Z")
        );
        assert!(check(MinDateValidator, day(10), options.clone()).is_none());
        assert_eq!(
            check(MinDateValidator, Value::invalid_date(), options).as_deref(),
            Some("Cannot compare invalid dates")
        );
        assert!(check(MaxDateValidator, day(5), ValidatorOptions::with("maxDate", day(6))).is_none());
    }

    #[test]
    fn type_validator() {
        let options = ValidatorOptions::with("type", "string");
        assert!(check(TypeValidator, Value::from("x"), options.clone()).is_none());
        assert_eq!(
            check(TypeValidator, Value::from(1), options).as_deref(),
            Some("The value must be of type string")
        );

        let either = ValidatorOptions::with(
            "type",
            vec![Value::from("number"), Value::from("bigint")],
        );
        assert!(check(TypeValidator, Value::BigInt(1), either).is_none());
        assert!(check(TypeValidator, Value::from(1), ValidatorOptions::with("type", "widget"))
            .unwrap()
            .contains("unknown type widget"));
    }

    #[test]
    fn unique_and_one_of() {
        let list = Value::from(vec![Value::from(1), Value::from(2), Value::from(1)]);
        assert_eq!(
            check(UniqueValidator, list, ValidatorOptions::new()).as_deref(),
            Some("The list contains duplicate values")
        );

        let options = ValidatorOptions::with("options", vec![Value::from("a"), Value::from("b")]);
        assert!(check(OneOfValidator, Value::from("a"), options.clone()).is_none());
        assert_eq!(
            check(OneOfValidator, Value::from("c"), options).as_deref(),
            Some("The value must be one of [a, b]")
        );
    }

    #[test]
    fn step() {
        let options = ValidatorOptions::with("step", 0.5);
        assert!(check(StepValidator, Value::from(1.5), options.clone()).is_none());
        assert_eq!(
            check(StepValidator, Value::from(1.2), options).as_deref(),
            Some("The value must be a multiple of 0.5")
        );
        assert!(check(StepValidator, Value::BigInt(12), ValidatorOptions::with("step", 4i128)).is_none());
        assert!(check(StepValidator, Value::from(3), ValidatorOptions::with("step", 0))
            .unwrap()
            .contains("expected a positive finite number"));
    }

    #[test]
    fn undefined_passes_every_non_required_validator() {
        let cases: Vec<(GuardedValidator, ValidatorOptions)> = vec![
            (GuardedValidator::new(MinValidator), ValidatorOptions::with("min", 1)),
            (GuardedValidator::new(MaxValidator), ValidatorOptions::with("max", 1)),
            (GuardedValidator::new(MinLengthValidator), ValidatorOptions::with("minLength", 1)),
            (GuardedValidator::new(MaxLengthValidator), ValidatorOptions::with("maxLength", 1)),
            (GuardedValidator::new(PatternValidator::new()), ValidatorOptions::with("pattern", "x")),
            (GuardedValidator::new(EmailValidator), ValidatorOptions::new()),
            (GuardedValidator::new(UrlValidator), ValidatorOptions::new()),
            (GuardedValidator::new(TypeValidator), ValidatorOptions::with("type", "string")),
            (GuardedValidator::new(UniqueValidator), ValidatorOptions::new()),
            (GuardedValidator::new(OneOfValidator), ValidatorOptions::with("options", vec![Value::from(1)])),
            (GuardedValidator::new(StepValidator), ValidatorOptions::with("step", 2)),
        ];
        let root = Value::object([("field", Value::Undefined)]);
        let scope = Scope::root(&root);
        let accessor = PathAccessor::new(&scope);
        for (validator, options) in cases {
            match validator.has_errors(&Value::Undefined, &options, &accessor) {
                Ok(Outcome::Ready(None)) => {}
                other => panic!("{} flagged undefined: {:?}", validator.key(), other),
            }
        }
    }
}
