//! Cross-field comparison validators.
//!
//! Each comparison validator reads a target path from its options, resolves it
//! with the [`PathAccessor`] it is handed, and applies its predicate to
//! `(field value, target value)`. A failed resolution becomes the field's
//! message verbatim.

use crate::error::{ComparabilityError, PathError, ValidatorError};
use crate::message::resolve_message;
use crate::options::ValidatorOptions;
use crate::path::PathAccessor;
use crate::traits::{Outcome, Validator};
use crate::value::{Value, ValueType};
use std::cmp::Ordering;

/// Order two values, if they are ordering-comparable.
///
/// Finite numbers, big integers and valid dates can be ordered. Numbers and
/// big integers compare across domains. Any other pair of differing types is
/// a [`ComparabilityError::TypeMismatch`], and two values of a shared type
/// that has no order are a [`ComparabilityError::UnsupportedType`].
pub fn compare_ordering(left: &Value, right: &Value) -> Result<Ordering, ComparabilityError> {
    if left.is_nullish() || right.is_nullish() {
        return Err(ComparabilityError::NullOrUndefined);
    }

    let (left_type, right_type) = (left.type_of(), right.type_of());
    let numeric = |t: ValueType| matches!(t, ValueType::Number | ValueType::BigInt);
    if left_type != right_type && !(numeric(left_type) && numeric(right_type)) {
        return Err(ComparabilityError::TypeMismatch {
            left: left_type,
            right: right_type,
        });
    }

    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if !a.is_finite() || !b.is_finite() {
                return Err(ComparabilityError::NotANumber);
            }
            a.partial_cmp(b).ok_or(ComparabilityError::NotANumber)
        }
        (Value::Number(a), Value::BigInt(b)) => {
            if !a.is_finite() {
                return Err(ComparabilityError::NotANumber);
            }
            Ok(cmp_number_bigint(*a, *b))
        }
        (Value::BigInt(a), Value::Number(b)) => {
            if !b.is_finite() {
                return Err(ComparabilityError::NotANumber);
            }
            Ok(cmp_number_bigint(*b, *a).reverse())
        }
        (Value::BigInt(a), Value::BigInt(b)) => Ok(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => match (a, b) {
            (Some(a), Some(b)) => Ok(a.cmp(b)),
            _ => Err(ComparabilityError::InvalidDate),
        },
        _ => Err(ComparabilityError::UnsupportedType(left_type)),
    }
}

fn cmp_number_bigint(number: f64, big: i128) -> Ordering {
    let whole = number.trunc();
    // i128::MAX as f64 rounds up to 2^127, hence the strict upper bound.
    if whole >= i128::MIN as f64 && whole < i128::MAX as f64 {
        match (whole as i128).cmp(&big) {
            Ordering::Equal => number.partial_cmp(&whole).unwrap_or(Ordering::Equal),
            other => other,
        }
    } else if number > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// The predicate applied by a comparison validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonKind {
    Equals,
    Differs,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl ComparisonKind {
    pub const ALL: [ComparisonKind; 6] = [
        ComparisonKind::Equals,
        ComparisonKind::Differs,
        ComparisonKind::LessThan,
        ComparisonKind::LessOrEqual,
        ComparisonKind::GreaterThan,
        ComparisonKind::GreaterOrEqual,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ComparisonKind::Equals => "equals",
            ComparisonKind::Differs => "differs",
            ComparisonKind::LessThan => "lessThan",
            ComparisonKind::LessOrEqual => "lessOrEqual",
            ComparisonKind::GreaterThan => "greaterThan",
            ComparisonKind::GreaterOrEqual => "greaterOrEqual",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ComparisonKind::Equals => "The value must be equal to {0}",
            ComparisonKind::Differs => "The value must differ from {0}",
            ComparisonKind::LessThan => "The value must be less than {0}",
            ComparisonKind::LessOrEqual => "The value must be less than or equal to {0}",
            ComparisonKind::GreaterThan => "The value must be greater than {0}",
            ComparisonKind::GreaterOrEqual => "The value must be greater than or equal to {0}",
        }
    }

    /// Whether `value` satisfies the predicate against `target`.
    pub fn holds(&self, value: &Value, target: &Value) -> Result<bool, ComparabilityError> {
        let holds = match self {
            ComparisonKind::Equals => value == target,
            ComparisonKind::Differs => value != target,
            ComparisonKind::LessThan => compare_ordering(value, target)?.is_lt(),
            ComparisonKind::LessOrEqual => compare_ordering(value, target)?.is_le(),
            ComparisonKind::GreaterThan => compare_ordering(value, target)?.is_gt(),
            ComparisonKind::GreaterOrEqual => compare_ordering(value, target)?.is_ge(),
        };
        Ok(holds)
    }
}

/// Compares a field against another value in the graph.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonValidator {
    kind: ComparisonKind,
}

impl ComparisonValidator {
    pub fn new(kind: ComparisonKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ComparisonKind {
        self.kind
    }

    fn target_path<'o>(&self, options: &'o ValidatorOptions) -> Result<&'o str, ValidatorError> {
        let target_key = options
            .target_key()
            .ok_or_else(|| ValidatorError::missing_option(self.kind.key(), "target_key"))?;
        let path = options
            .get(target_key)
            .ok_or_else(|| ValidatorError::missing_option(self.kind.key(), target_key))?;
        match path.as_str() {
            Some(path) if !path.is_empty() => Ok(path),
            _ => Err(PathError::InvalidPath {
                path: path.to_string(),
            }
            .into()),
        }
    }
}

impl Validator for ComparisonValidator {
    fn key(&self) -> &str {
        self.kind.key()
    }

    fn default_message(&self) -> &str {
        self.kind.default_message()
    }

    fn check(
        &self,
        value: &Value,
        options: &ValidatorOptions,
        accessor: &PathAccessor<'_>,
    ) -> Result<Outcome, ValidatorError> {
        if value.is_undefined() {
            return Ok(Outcome::pass());
        }

        let path = self.target_path(options)?;
        let target = accessor.resolve(path)?;

        if self.kind.holds(value, target)? {
            Ok(Outcome::pass())
        } else {
            Ok(Outcome::fail(resolve_message(
                options,
                self.kind.default_message(),
                &[&path],
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Scope;
    use chrono::{TimeZone, Utc};

    fn run(kind: ComparisonKind, root: &Value, field: &str, options: &ValidatorOptions) -> String {
        let scope = Scope::root(root);
        let accessor = PathAccessor::new(&scope);
        let validator = ComparisonValidator::new(kind);
        match validator.check(root.get(field).unwrap(), options, &accessor) {
            Ok(Outcome::Ready(Some(message))) => message,
            Ok(Outcome::Ready(None)) => String::new(),
            Ok(Outcome::Pending(_)) => panic!("comparisons are synchronous"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn orders_numbers_and_bigints() {
        assert_eq!(
            compare_ordering(&Value::from(1), &Value::from(2)),
            Ok(Ordering::Less)
        );
        assert_eq!(
            compare_ordering(&Value::BigInt(5), &Value::from(4.5)),
            Ok(Ordering::Greater)
        );
        assert_eq!(
            compare_ordering(&Value::from(5.0), &Value::BigInt(5)),
            Ok(Ordering::Equal)
        );
        assert_eq!(
            compare_ordering(&Value::from(-0.5), &Value::BigInt(0)),
            Ok(Ordering::Less)
        );
        assert_eq!(
            compare_ordering(&Value::from(1e40), &Value::BigInt(i128::MAX)),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn orders_dates() {
        let early = Value::date(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        let late = Value::date(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(compare_ordering(&early, &late), Ok(Ordering::Less));
        assert_eq!(
            compare_ordering(&early, &Value::invalid_date()),
            Err(ComparabilityError::InvalidDate)
        );
    }

    #[test]
    fn comparability_failure_classes() {
        assert_eq!(
            compare_ordering(&Value::Null, &Value::from(1)),
            Err(ComparabilityError::NullOrUndefined)
        );
        assert_eq!(
            compare_ordering(&Value::from(f64::NAN), &Value::from(1)),
            Err(ComparabilityError::NotANumber)
        );
        assert_eq!(
            compare_ordering(&Value::from("a"), &Value::from("b")),
            Err(ComparabilityError::UnsupportedType(ValueType::String))
        );
        assert!(matches!(
            compare_ordering(&Value::from(1), &Value::invalid_date()),
            Err(ComparabilityError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn differing_types_are_a_mismatch_before_orderability() {
        assert_eq!(
            compare_ordering(&Value::from("a"), &Value::from(1)),
            Err(ComparabilityError::TypeMismatch {
                left: ValueType::String,
                right: ValueType::Number,
            })
        );
        assert_eq!(
            compare_ordering(&Value::object([("x", Value::from(1))]), &Value::from(1)),
            Err(ComparabilityError::TypeMismatch {
                left: ValueType::Object,
                right: ValueType::Number,
            })
        );
        assert_eq!(
            compare_ordering(&Value::from("a"), &Value::from(true)),
            Err(ComparabilityError::TypeMismatch {
                left: ValueType::String,
                right: ValueType::Boolean,
            })
        );
        assert_eq!(
            compare_ordering(&Value::from(true), &Value::from(false)),
            Err(ComparabilityError::UnsupportedType(ValueType::Boolean))
        );
    }

    #[test]
    fn equal_objects_are_still_not_ordered() {
        let a = Value::object([("x", Value::from(1))]);
        assert_eq!(
            ComparisonKind::LessOrEqual.holds(&a, &a.clone()),
            Err(ComparabilityError::UnsupportedType(ValueType::Object))
        );
        assert_eq!(ComparisonKind::Equals.holds(&a, &a.clone()), Ok(true));
    }

    #[test]
    fn equals_names_target_path() {
        let root = Value::object([("a", Value::from(1)), ("b", Value::from(2))]);
        let message = run(
            ComparisonKind::Equals,
            &root,
            "a",
            &ValidatorOptions::compare_to("b"),
        );
        assert_eq!(message, "The value must be equal to b");
    }

    #[test]
    fn missing_target_reports_path_error() {
        let root = Value::object([("a", Value::from(1))]);
        let message = run(
            ComparisonKind::LessThan,
            &root,
            "a",
            &ValidatorOptions::compare_to("other"),
        );
        assert_eq!(message, "Property \"other\" does not exist in path \"other\"");
    }

    #[test]
    fn missing_target_key_is_a_configuration_error() {
        let root = Value::object([("a", Value::from(1))]);
        let message = run(
            ComparisonKind::GreaterThan,
            &root,
            "a",
            &ValidatorOptions::with("path", "b"),
        );
        assert_eq!(
            message,
            "Validator \"greaterThan\" requires option \"target_key\""
        );
    }

    #[test]
    fn non_string_path_is_invalid() {
        let root = Value::object([("a", Value::from(1))]);
        let options = ValidatorOptions::with("path", 3).with_target_key("path");
        let message = run(ComparisonKind::Equals, &root, "a", &options);
        assert_eq!(message, "Invalid path \"3\": path must be a non-empty string");
    }

    #[test]
    fn undefined_value_passes() {
        let root = Value::object([("a", Value::Undefined)]);
        for kind in ComparisonKind::ALL {
            assert_eq!(run(kind, &root, "a", &ValidatorOptions::compare_to("zzz")), "");
        }
    }

    #[test]
    fn message_override_interpolates_path() {
        let root = Value::object([("a", Value::from(3)), ("b", Value::from(2))]);
        let options = ValidatorOptions::compare_to("b").message("{0} must exceed this");
        assert_eq!(run(ComparisonKind::LessOrEqual, &root, "a", &options), "b must exceed this");
        assert_eq!(
            run(ComparisonKind::GreaterOrEqual, &root, "a", &options),
            ""
        );
    }
}
