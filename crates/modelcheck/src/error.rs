//! Error types for the validation engine.
//!
//! The `Display` output of every error here is user visible: the orchestrator
//! turns these errors into report messages at the validator boundary.

use crate::value::ValueType;
use thiserror::Error;

/// Failure to resolve a path against an object graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Invalid path \"{path}\": path must be a non-empty string")]
    InvalidPath { path: String },

    /// A `..` step found no recorded parent.
    #[error("Cannot resolve step {step} of path \"{path}\": no parent recorded")]
    NoParent { step: usize, path: String },

    /// A `..` step reached a parent that cannot hold properties.
    #[error("Cannot resolve step {step} of path \"{path}\": parent is not an object")]
    ParentNotObject { step: usize, path: String },

    #[error(
        "Property \"{segment}\" does not exist{} in path \"{path}\"",
        hops_suffix(.parent_hops)
    )]
    NotFound {
        path: String,
        segment: String,
        parent_hops: usize,
    },

    #[error("Invalid property \"{segment}\" in path \"{path}\": value is undefined or null")]
    InvalidProperty { path: String, segment: String },
}

fn hops_suffix(hops: &usize) -> String {
    if *hops == 0 {
        String::new()
    } else {
        format!(" after {} parent hop(s)", hops)
    }
}

/// Why two values cannot be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparabilityError {
    #[error("Cannot compare null or undefined values")]
    NullOrUndefined,

    #[error("Cannot compare values of different types: {left} and {right}")]
    TypeMismatch { left: ValueType, right: ValueType },

    #[error("Cannot compare NaN or infinite numbers")]
    NotANumber,

    #[error("Cannot compare invalid dates")]
    InvalidDate,

    #[error("Cannot compare values of unsupported type: {0}")]
    UnsupportedType(ValueType),
}

/// Error raised by a validator body instead of a rule violation.
///
/// These signal misconfiguration or an aborted check. The orchestrator
/// reports them under the validator's key like any other message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidatorError {
    #[error("Unknown validator \"{0}\"")]
    Unknown(String),

    #[error("Validator \"{validator}\" requires option \"{option}\"")]
    MissingOption { validator: String, option: String },

    #[error("Validator \"{validator}\" has an invalid \"{option}\" option: {reason}")]
    InvalidOption {
        validator: String,
        option: String,
        reason: String,
    },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Comparability(#[from] ComparabilityError),

    #[error("{0}")]
    Failed(String),
}

impl ValidatorError {
    pub fn missing_option(validator: impl Into<String>, option: impl Into<String>) -> Self {
        Self::MissingOption {
            validator: validator.into(),
            option: option.into(),
        }
    }

    pub fn invalid_option(
        validator: impl Into<String>,
        option: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            validator: validator.into(),
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Errors visible to callers of the validation entry points.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cannot validate a value of type {found}: expected an object")]
    NotAnObject { found: ValueType },

    #[error("Invalid model schema: {0}")]
    InvalidSchema(#[from] serde_json::Error),
}
