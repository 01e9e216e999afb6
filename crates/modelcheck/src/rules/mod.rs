//! Built-in and closure-backed validators.
//!
//! This module contains the single-field rules, the cross-field comparison
//! family and the closure adapters used for custom rules.

mod comparison;
mod custom;
mod sync_rules;

pub use comparison::*;
pub use custom::*;
pub use sync_rules::*;

use crate::traits::GuardedValidator;

/// Every built-in validator, guarded and ready for registration.
pub fn builtin_validators() -> Vec<GuardedValidator> {
    let mut validators = vec![
        GuardedValidator::new(RequiredValidator),
        GuardedValidator::new(MinValidator),
        GuardedValidator::new(MaxValidator),
        GuardedValidator::new(MinLengthValidator),
        GuardedValidator::new(MaxLengthValidator),
        GuardedValidator::new(PatternValidator::new()),
        GuardedValidator::new(EmailValidator),
        GuardedValidator::new(UrlValidator),
        GuardedValidator::new(MinDateValidator),
        GuardedValidator::new(MaxDateValidator),
        GuardedValidator::new(TypeValidator),
        GuardedValidator::new(UniqueValidator),
        GuardedValidator::new(OneOfValidator),
        GuardedValidator::new(StepValidator),
    ];
    validators.extend(
        ComparisonKind::ALL
            .into_iter()
            .map(|kind| GuardedValidator::new(ComparisonValidator::new(kind))),
    );
    validators
}
