//! Named schema storage.
//!
//! [`SchemaRegistry`] keeps built schemas under string names so independent
//! parts of an application (or many threads) can validate against the same
//! definitions.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::batch::validate_batch;
use crate::describe::Description;
use crate::schema::SchemaLike;
use crate::validation::ValidationOptions;
use crate::ValidationResult;

type SchemaMap = Arc<RwLock<HashMap<String, Arc<dyn SchemaLike>>>>;

/// A thread-safe map from names to schemas.
///
/// Clones share the same store. Lookups take a read lock, registration a
/// write lock; validation itself runs outside the lock.
///
/// # Example
///
/// ```rust
/// use conform::{Schema, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry.register("User", Schema::object()
///     .key("username", Schema::string().alphanum().min(3)?.max(30)?.required())
///     .key("email", Schema::string().email().required())
/// ).unwrap();
///
/// let result = registry
///     .validate("User", &json!({"username": "testing", "email": "test@email.com"}))
///     .unwrap();
/// assert!(result.is_success());
///
/// assert!(registry.validate("Order", &json!({})).is_err());
/// # Ok::<(), conform::ConfigError>(())
/// ```
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    schemas: SchemaMap,
    options: ValidationOptions,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options used by `validate` and `validate_batch`.
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Stores `schema` under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is taken.
    pub fn register<S>(&self, name: impl Into<String>, schema: S) -> Result<(), RegistryError>
    where
        S: SchemaLike + 'static,
    {
        let name = name.into();
        let mut schemas = self.schemas.write();

        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(schema = %name, kind = schema.kind().as_str(), "registered schema");
        schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SchemaLike>> {
        self.schemas.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Validates `value` against the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` for an unknown name. A value
    /// that fails validation is not an error here; inspect the returned
    /// `Validation`.
    pub fn validate(&self, name: &str, value: &Value) -> Result<ValidationResult, RegistryError> {
        let schema = self.lookup(name)?;
        Ok(schema.validate_with(value, &self.options))
    }

    /// Validates many records in parallel; see [`validate_batch`].
    pub fn validate_batch(&self, name: &str, values: &[Value]) -> Result<Vec<ValidationResult>, RegistryError> {
        let schema = self.lookup(name)?;
        Ok(validate_batch(schema.as_ref(), values, &self.options))
    }

    /// The description of the schema registered as `name`.
    pub fn describe(&self, name: &str) -> Result<Description, RegistryError> {
        Ok(self.lookup(name)?.describe())
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn SchemaLike>, RegistryError> {
        self.get(name).ok_or_else(|| {
            tracing::debug!(schema = %name, "schema not found");
            RegistryError::SchemaNotFound(name.to_string())
        })
    }
}

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    #[error("schema '{0}' not found")]
    SchemaNotFound(String),
}
