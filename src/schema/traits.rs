//! The trait every schema node implements.

use std::fmt;

use serde_json::Value;
use stillwater::Validation;

use crate::describe::{Description, Flags, SchemaKind};
use crate::path::FieldPath;
use crate::validation::{ValidationContext, ValidationOptions};
use crate::ValidationResult;

/// A schema node that can validate a JSON value and describe itself.
///
/// Object and array schemas hold their children as `Arc<dyn SchemaLike>`,
/// so any implementor can be nested. The `Send + Sync` bounds let a built
/// schema be shared between threads and validated concurrently.
///
/// # Example
///
/// ```rust
/// use conform::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let fields: Vec<(&str, Box<dyn SchemaLike>)> = vec![
///     ("name", Box::new(Schema::string().required())),
///     ("age", Box::new(Schema::number().integer())),
/// ];
/// let person = Schema::object().keys(fields);
///
/// assert!(person.validate(&json!({"name": "Ada", "age": 36})).is_success());
/// ```
pub trait SchemaLike: fmt::Debug + Send + Sync {
    fn kind(&self) -> SchemaKind;

    fn flags(&self) -> &Flags;

    /// Builds the introspection view of this node and its children.
    fn describe(&self) -> Description;

    /// Validates `value`, which sits at `path` in the record being checked.
    ///
    /// Presence (`required`, `forbidden`, `default`) is handled by the
    /// enclosing object; this method only sees values that exist.
    fn validate_at(&self, value: &Value, path: &FieldPath, ctx: &ValidationContext)
        -> ValidationResult;

    /// Validates with the default options.
    fn validate(&self, value: &Value) -> ValidationResult {
        self.validate_with(value, &ValidationOptions::default())
    }

    fn validate_with(&self, value: &Value, options: &ValidationOptions) -> ValidationResult {
        let ctx = ValidationContext::new(*options);
        let result = self.validate_at(value, &FieldPath::root(), &ctx);
        if let Validation::Failure(ref errors) = result {
            tracing::trace!(
                kind = self.kind().as_str(),
                errors = errors.len(),
                first = %errors.first(),
                "validation failed"
            );
        }
        result
    }
}
