//! Boolean schema validation.

use serde_json::Value;
use stillwater::Validation;

use crate::describe::{Description, Flags, SchemaKind};
use crate::error::{SchemaError, SchemaErrors};
use crate::path::FieldPath;
use crate::validation::{value_type_name, ValidationContext};
use crate::ValidationResult;

use super::common::{label_for, render, schema_methods};
use super::traits::SchemaLike;

/// A schema for `true`/`false`.
///
/// With conversion enabled the strings `"true"` and `"false"` (any case)
/// are accepted and validate to the matching boolean.
#[derive(Debug, Clone)]
pub struct BooleanSchema {
    flags: Flags,
    type_error_message: Option<String>,
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self {
            flags: Flags::default(),
            type_error_message: None,
        }
    }

    schema_methods!();

    /// Custom message for the type check.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for BooleanSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Boolean
    }

    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn describe(&self) -> Description {
        Description::new(SchemaKind::Boolean, self.flags.clone(), Vec::new())
            .with_error(self.type_error_message.clone())
    }

    fn validate_at(&self, value: &Value, path: &FieldPath, ctx: &ValidationContext) -> ValidationResult {
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if ctx.options().converts() => {
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        };

        match parsed {
            Some(b) => Validation::Success(Value::Bool(b)),
            None => {
                let label = label_for(&self.flags, path);
                let message = render(self.type_error_message.as_ref(), &label, || {
                    format!("\"{}\" must be a boolean", label)
                });
                Validation::Failure(SchemaErrors::single(
                    SchemaError::new(path.clone(), message)
                        .with_code("boolean.base")
                        .with_got(value_type_name(value))
                        .with_expected("boolean"),
                ))
            }
        }
    }
}
