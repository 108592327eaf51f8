//! # Conform
//!
//! Declarative schema validation for JSON-like records.
//!
//! Build a schema with chained calls, validate `serde_json::Value`s against
//! it, and introspect it with `describe()`. Validation stops at the first
//! failing check by default and returns it as data, never as a panic or an
//! `Err`; rule parameters that can never be satisfied (such as `min > max`)
//! are rejected while the schema is being built.
//!
//! ## Core Types
//!
//! - [`Schema`]: entry point for building schemas
//! - [`SchemaLike`]: the trait all schema nodes implement
//! - [`SchemaError`] / [`SchemaErrors`]: what a failed validation carries
//! - [`ConfigError`]: what a broken schema definition returns
//! - [`Description`]: the data-only view of a schema
//! - [`SchemaRegistry`]: named, shareable schemas
//!
//! ## Example
//!
//! ```rust
//! use conform::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .key("username", Schema::string().alphanum().min(3)?.max(30)?.required())
//!     .key("email", Schema::string().email().required())
//!     .key("age", Schema::number().integer().min(18.0)?.max(100.0)?);
//!
//! let result = schema.validate(&json!({
//!     "username": "testing",
//!     "email": "test@email.com",
//!     "age": 24
//! }));
//! assert!(result.is_success());
//!
//! let username = schema.describe().key("username").cloned().unwrap();
//! assert!(username.flags.required);
//! assert_eq!(username.rules.len(), 3);
//! # Ok::<(), conform::ConfigError>(())
//! ```

pub mod batch;
pub mod describe;
pub mod error;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validation;

pub use batch::validate_batch;
pub use describe::{Description, Flags, RuleDescriptor, SchemaKind, UnknownKeys};
pub use error::{ConfigError, SchemaError, SchemaErrors};
pub use path::{FieldPath, PathSegment};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{
    ArraySchema, BooleanSchema, NumberSchema, ObjectSchema, Schema, SchemaLike, StringSchema,
};
pub use validation::{ValidationContext, ValidationOptions};

/// Outcome of validating one value: the validated value or its errors.
pub type ValidationResult<T = serde_json::Value> = stillwater::Validation<T, SchemaErrors>;
