//! Options and per-call state for validation.
//!
//! [`ValidationOptions`] is what callers configure. [`ValidationContext`] is
//! threaded through nested schemas during one `validate` call and decides,
//! through [`ErrorReport`], whether the first error ends the run.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors};
use crate::ValidationResult;

/// Caller-facing knobs for a validation run.
///
/// The defaults stop at the first error and coerce numeric and boolean
/// strings.
///
/// ```rust
/// use conform::{Schema, ValidationOptions};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .key("a", Schema::string().required())
///     .key("b", Schema::string().required());
///
/// let all = ValidationOptions::default().abort_early(false);
/// let errors = schema.validate_with(&json!({}), &all).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    abort_early: bool,
    convert: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            abort_early: true,
            convert: true,
        }
    }
}

impl ValidationOptions {
    /// Stop at the first error (`true`, default) or collect all of them.
    pub fn abort_early(mut self, abort_early: bool) -> Self {
        self.abort_early = abort_early;
        self
    }

    /// Coerce `"24"` to `24` and `"true"` to `true` where a number or boolean
    /// is expected.
    pub fn convert(mut self, convert: bool) -> Self {
        self.convert = convert;
        self
    }

    pub fn aborts_early(&self) -> bool {
        self.abort_early
    }

    pub fn converts(&self) -> bool {
        self.convert
    }
}

/// State shared by every schema node during a single validation run.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    options: ValidationOptions,
}

impl ValidationContext {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Starts collecting errors for one schema node.
    pub(crate) fn report(&self) -> ErrorReport {
        ErrorReport {
            abort_early: self.options.abort_early,
            errors: Vec::new(),
        }
    }
}

/// Errors gathered by one schema node.
///
/// `record` and `absorb` return `true` when the caller must stop checking,
/// i.e. when running with `abort_early`.
pub(crate) struct ErrorReport {
    abort_early: bool,
    errors: Vec<SchemaError>,
}

impl ErrorReport {
    pub(crate) fn record(&mut self, error: SchemaError) -> bool {
        self.errors.push(error);
        self.abort_early
    }

    pub(crate) fn absorb(&mut self, errors: SchemaErrors) -> bool {
        self.errors.extend(errors);
        self.abort_early
    }

    /// `Success(value)` if nothing was recorded, otherwise every error.
    pub(crate) fn finish(self, value: Value) -> ValidationResult {
        match SchemaErrors::from_vec(self.errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(value),
        }
    }

    /// Ends a run cut short by `record`/`absorb`.
    pub(crate) fn stop(self) -> ValidationResult {
        self.finish(Value::Null)
    }
}

/// JSON type name of a value, used in `got` fields.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
