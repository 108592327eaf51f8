//! Object schema validation.
//!
//! [`ObjectSchema`] validates declared keys in declaration order, applying
//! each child's presence flags, and then decides what to do with keys it
//! does not declare.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::describe::{Description, Flags, SchemaKind, UnknownKeys};
use crate::error::{SchemaError, SchemaErrors};
use crate::path::FieldPath;
use crate::validation::{value_type_name, ValidationContext};
use crate::ValidationResult;

use super::common::{label_for, render, schema_methods};
use super::traits::SchemaLike;

/// A schema for JSON objects.
///
/// Keys are optional unless their schema is marked `required()`. Undeclared
/// keys are kept by default; see [`ObjectSchema::unknown`].
///
/// # Example
///
/// ```rust
/// use conform::Schema;
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .key("username", Schema::string().alphanum().min(3)?.max(30)?.required())
///     .key("email", Schema::string().email().required())
///     .key("age", Schema::number().integer().min(18.0)?.max(100.0)?);
///
/// let input = json!({"username": "testing", "email": "test@email.com", "age": 24});
/// assert_eq!(schema.validate(&input).into_result().unwrap(), input);
///
/// let errors = schema
///     .validate(&json!({"username": "t", "email": "test@email.com"}))
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.first().path.to_string(), "username");
/// assert_eq!(errors.first().code, "string.min");
/// # Ok::<(), conform::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    flags: Flags,
    keys: IndexMap<String, Arc<dyn SchemaLike>>,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self {
            flags: Flags::default(),
            keys: IndexMap::new(),
            type_error_message: None,
        }
    }

    schema_methods!();

    /// Declares a key. Redeclaring a key replaces its schema but keeps its
    /// original position.
    pub fn key<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.keys.insert(name.into(), Arc::new(schema));
        self
    }

    /// Declares several keys at once, in iteration order.
    pub fn keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = (K, Box<dyn SchemaLike>)>,
        K: Into<String>,
    {
        for (name, schema) in keys {
            self.keys.insert(name.into(), Arc::from(schema));
        }
        self
    }

    /// How undeclared keys are treated. Defaults to [`UnknownKeys::Allow`].
    ///
    /// ```rust
    /// use conform::{Schema, UnknownKeys};
    /// use serde_json::json;
    ///
    /// let input = json!({"name": "Ada", "extra": 1});
    /// let base = Schema::object().key("name", Schema::string());
    ///
    /// assert!(base.clone().validate(&input).is_success());
    ///
    /// let strict = base.clone().unknown(UnknownKeys::Deny);
    /// let errors = strict.validate(&input).into_result().unwrap_err();
    /// assert_eq!(errors.first().code, "object.unknown");
    ///
    /// let stripped = base.unknown(UnknownKeys::Strip).validate(&input);
    /// assert_eq!(stripped.into_result().unwrap(), json!({"name": "Ada"}));
    /// ```
    pub fn unknown(mut self, policy: UnknownKeys) -> Self {
        self.flags.unknown = match policy {
            UnknownKeys::Allow => None,
            other => Some(other),
        };
        self
    }

    /// Custom message used when the value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    /// Names of the declared keys, in declaration order.
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    fn unknown_policy(&self) -> UnknownKeys {
        self.flags.unknown.unwrap_or_default()
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ObjectSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }

    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn describe(&self) -> Description {
        let mut description = Description::new(SchemaKind::Object, self.flags.clone(), Vec::new())
            .with_error(self.type_error_message.clone());
        description.keys = Some(
            self.keys
                .iter()
                .map(|(name, schema)| (name.clone(), schema.describe()))
                .collect(),
        );
        description
    }

    fn validate_at(&self, value: &Value, path: &FieldPath, ctx: &ValidationContext) -> ValidationResult {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => {
                let label = label_for(&self.flags, path);
                let message = render(self.type_error_message.as_ref(), &label, || {
                    format!("\"{}\" must be of type object", label)
                });
                return Validation::Failure(SchemaErrors::single(
                    SchemaError::new(path.clone(), message)
                        .with_code("object.base")
                        .with_got(value_type_name(value))
                        .with_expected("object"),
                ));
            }
        };

        let mut report = ctx.report();
        let mut validated = Map::new();

        for (name, schema) in &self.keys {
            let field_path = path.key(name);
            let flags = schema.flags();

            match obj.get(name) {
                Some(_) if flags.forbidden => {
                    let label = label_for(flags, &field_path);
                    let error = SchemaError::new(field_path, format!("\"{}\" is not allowed", label))
                        .with_code("any.unknown")
                        .with_expected("no value");
                    if report.record(error) {
                        return report.stop();
                    }
                }
                Some(field_value) => match schema.validate_at(field_value, &field_path, ctx) {
                    Validation::Success(v) => {
                        validated.insert(name.clone(), v);
                    }
                    Validation::Failure(errors) => {
                        if report.absorb(errors) {
                            return report.stop();
                        }
                    }
                },
                None if flags.required => {
                    let label = label_for(flags, &field_path);
                    let error = SchemaError::new(field_path, format!("\"{}\" is required", label))
                        .with_code("any.required")
                        .with_expected("value");
                    if report.record(error) {
                        return report.stop();
                    }
                }
                None => {
                    if let Some(default) = &flags.default {
                        validated.insert(name.clone(), default.clone());
                    }
                }
            }
        }

        let policy = self.unknown_policy();
        for (key, value) in obj {
            if self.keys.contains_key(key) {
                continue;
            }
            match policy {
                UnknownKeys::Allow => {
                    validated.insert(key.clone(), value.clone());
                }
                UnknownKeys::Strip => {}
                UnknownKeys::Deny => {
                    let field_path = path.key(key);
                    let error = SchemaError::new(
                        field_path.clone(),
                        format!("\"{}\" is not allowed", field_path.label()),
                    )
                    .with_code("object.unknown")
                    .with_got(key.clone());
                    if report.record(error) {
                        return report.stop();
                    }
                }
            }
        }

        report.finish(Value::Object(validated))
    }
}
