//! Parallel validation of independent records.

use rayon::prelude::*;
use serde_json::Value;

use crate::schema::SchemaLike;
use crate::validation::ValidationOptions;
use crate::ValidationResult;

/// Validates every record against `schema` on rayon's thread pool.
///
/// Results line up with `values`: `results[i]` is exactly what
/// `schema.validate_with(&values[i], options)` returns.
///
/// ```rust
/// use conform::{validate_batch, Schema, ValidationOptions};
/// use serde_json::json;
///
/// let schema = Schema::number().integer();
/// let values = vec![json!(1), json!(1.5), json!(3)];
///
/// let results = validate_batch(&schema, &values, &ValidationOptions::default());
/// let ok: Vec<bool> = results.iter().map(|r| r.is_success()).collect();
/// assert_eq!(ok, vec![true, false, true]);
/// ```
pub fn validate_batch<S>(schema: &S, values: &[Value], options: &ValidationOptions) -> Vec<ValidationResult>
where
    S: SchemaLike + ?Sized,
{
    tracing::debug!(records = values.len(), kind = schema.kind().as_str(), "validating batch");
    values
        .par_iter()
        .map(|value| schema.validate_with(value, options))
        .collect()
}
