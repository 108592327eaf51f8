//! Schema definitions.
//!
//! Each schema type validates one kind of JSON value and carries an ordered
//! list of rules plus presence flags. Builders consume and return the schema,
//! so a configured schema never changes afterwards.
//!
//! # Example
//!
//! ```rust
//! use conform::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::string().min(1)?.max(100)?;
//!
//! assert!(schema.validate(&json!("hello")).is_success());
//! assert!(schema.validate(&json!(42)).is_failure());
//! # Ok::<(), conform::ConfigError>(())
//! ```

mod array;
mod boolean;
mod common;
mod number;
mod object;
mod string;
mod traits;

pub use array::ArraySchema;
pub use boolean::BooleanSchema;
pub use number::NumberSchema;
pub use object::ObjectSchema;
pub use string::StringSchema;
pub use traits::SchemaLike;

/// Entry point for building schemas.
///
/// ```rust
/// use conform::Schema;
///
/// let schema = Schema::object()
///     .key("username", Schema::string().alphanum().min(3)?.max(30)?.required())
///     .key("email", Schema::string().email().required())
///     .key("age", Schema::number().integer().min(18.0)?.max(100.0)?)
///     .key("tags", Schema::array().items(Schema::string()))
///     .key("newsletter", Schema::boolean().default(false.into()));
/// # Ok::<(), conform::ConfigError>(())
/// ```
pub struct Schema;

impl Schema {
    /// A schema for JSON objects; declare keys with `key` or `keys`.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// A schema for numbers; add `integer()` to reject fractions.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// A schema for arrays; set the element schema with `items`.
    pub fn array() -> ArraySchema {
        ArraySchema::new()
    }
}
