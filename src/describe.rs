//! Schema introspection.
//!
//! [`Description`] is a data-only projection of a schema tree: its kind, the
//! flags set on it, its rules in attachment order, and the descriptions of
//! its children. It is built fresh from the schema on every `describe()` call
//! and serializes with serde, so it can be printed, diffed or stored.
//!
//! ```rust
//! use conform::Schema;
//!
//! let schema = Schema::object()
//!     .key("username", Schema::string().alphanum().min(3)?.max(30)?.required());
//!
//! let description = schema.describe();
//! let username = description.key("username").unwrap();
//!
//! let names: Vec<_> = username.rules.iter().map(|r| r.name.as_str()).collect();
//! assert_eq!(names, vec!["alphanum", "min", "max"]);
//! assert!(username.flags.required);
//! # Ok::<(), conform::ConfigError>(())
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The type a schema node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Object,
    String,
    Number,
    Boolean,
    Array,
}

impl SchemaKind {
    /// Lowercase name, also used as the prefix of error codes.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Object => "object",
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array => "array",
        }
    }
}

/// What an object schema does with keys it does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Keep them in the output untouched.
    #[default]
    Allow,
    /// Fail with `object.unknown`.
    Deny,
    /// Drop them from the output.
    Strip,
}

/// Flags of a schema node. Unset flags are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub forbidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "is_false")]
    pub allow_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown: Option<UnknownKeys>,
}

impl Flags {
    /// True when no flag differs from its default.
    pub fn is_empty(&self) -> bool {
        *self == Flags::default()
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One rule as it appears in a [`Description`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub args: IndexMap<String, Value>,
    /// Custom message set with `.error()` right after this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RuleDescriptor {
    /// A rule without arguments, such as `alphanum` or `integer`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: IndexMap::new(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }
}

/// The introspection view of a schema.
///
/// Deserializing gives back an equal `Description`, so stored descriptions
/// can be compared against freshly built schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Flags::is_empty")]
    pub flags: Flags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleDescriptor>,
    /// Custom message for the type check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<IndexMap<String, Description>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Description>>,
}

impl Description {
    pub fn new(kind: SchemaKind, flags: Flags, rules: Vec<RuleDescriptor>) -> Self {
        Self {
            kind,
            flags,
            rules,
            error: None,
            keys: None,
            items: None,
        }
    }

    /// Sets the type-check message.
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    /// The description of a declared object key.
    pub fn key(&self, name: &str) -> Option<&Description> {
        self.keys.as_ref()?.get(name)
    }

    /// The first rule called `name`.
    pub fn rule(&self, name: &str) -> Option<&RuleDescriptor> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Renders a numeric limit, keeping whole numbers integral (`18`, not `18.0`).
pub(crate) fn number_arg(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}
