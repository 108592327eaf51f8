//! Array schema validation.
//!
//! [`ArraySchema`] checks the array's size rules first, in attachment order,
//! and then validates every element against the item schema.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::describe::{Description, Flags, RuleDescriptor, SchemaKind};
use crate::error::{ConfigError, SchemaError, SchemaErrors};
use crate::path::FieldPath;
use crate::validation::{value_type_name, ValidationContext};
use crate::ValidationResult;

use super::common::{attach, label_for, render, schema_methods, Checked, NamedRule};
use super::traits::SchemaLike;

#[derive(Debug, Clone, PartialEq)]
enum ArrayRule {
    Min(usize),
    Max(usize),
    Length(usize),
}

impl NamedRule for ArrayRule {
    fn name(&self) -> &'static str {
        match self {
            ArrayRule::Min(_) => "min",
            ArrayRule::Max(_) => "max",
            ArrayRule::Length(_) => "length",
        }
    }
}

/// A schema for arrays.
///
/// # Example
///
/// ```rust
/// use conform::Schema;
/// use serde_json::json;
///
/// let tags = Schema::array()
///     .items(Schema::string().alphanum())
///     .max(3)?;
///
/// assert!(tags.validate(&json!(["rust", "json"])).is_success());
///
/// let errors = tags.validate(&json!(["ok", "not ok"])).into_result().unwrap_err();
/// assert_eq!(errors.first().path.to_string(), "[1]");
/// # Ok::<(), conform::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArraySchema {
    flags: Flags,
    items: Option<Arc<dyn SchemaLike>>,
    rules: Vec<Checked<ArrayRule>>,
    type_error_message: Option<String>,
}

impl ArraySchema {
    pub fn new() -> Self {
        Self {
            flags: Flags::default(),
            items: None,
            rules: Vec::new(),
            type_error_message: None,
        }
    }

    schema_methods!();

    /// Every element must match `schema`. Replaces an earlier item schema.
    pub fn items<S>(mut self, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.items = Some(Arc::new(schema));
        self
    }

    /// At least `limit` elements.
    pub fn min(mut self, limit: usize) -> Result<Self, ConfigError> {
        attach(&mut self.rules, ArrayRule::Min(limit));
        self.check_bounds("min")?;
        Ok(self)
    }

    /// At most `limit` elements.
    pub fn max(mut self, limit: usize) -> Result<Self, ConfigError> {
        attach(&mut self.rules, ArrayRule::Max(limit));
        self.check_bounds("max")?;
        Ok(self)
    }

    /// Exactly `limit` elements.
    ///
    /// Fails if `limit` lies outside an attached `min`/`max`.
    pub fn length(mut self, limit: usize) -> Result<Self, ConfigError> {
        attach(&mut self.rules, ArrayRule::Length(limit));
        self.check_bounds("length")?;
        Ok(self)
    }

    /// Custom message for the most recently attached rule, or for the type
    /// check if no rule is attached yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.rules.last_mut() {
            Some(last) => last.message = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }

    fn check_bounds(&self, rule: &'static str) -> Result<(), ConfigError> {
        let mut min = None;
        let mut max = None;
        let mut length = None;
        for checked in &self.rules {
            match checked.rule {
                ArrayRule::Min(limit) => min = Some(limit),
                ArrayRule::Max(limit) => max = Some(limit),
                ArrayRule::Length(limit) => length = Some(limit),
            }
        }

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ConfigError::InvertedBounds {
                    kind: "array",
                    rule,
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }
        if let Some(length) = length {
            let conflict = match (min, max) {
                (Some(min), _) if length < min => Some(("min", min)),
                (_, Some(max)) if length > max => Some(("max", max)),
                _ => None,
            };
            if let Some((bound, limit)) = conflict {
                return Err(ConfigError::ConflictingLength {
                    kind: "array",
                    rule,
                    length,
                    bound,
                    limit,
                });
            }
        }
        Ok(())
    }
}

impl Default for ArraySchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ArraySchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Array
    }

    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn describe(&self) -> Description {
        let rules = self
            .rules
            .iter()
            .map(|c| {
                RuleDescriptor::new(c.rule.name())
                    .with_arg("limit", limit_of(&c.rule))
                    .with_message(c.message.clone())
            })
            .collect();
        let mut description = Description::new(SchemaKind::Array, self.flags.clone(), rules)
            .with_error(self.type_error_message.clone());
        description.items = self.items.as_ref().map(|items| Box::new(items.describe()));
        description
    }

    fn validate_at(&self, value: &Value, path: &FieldPath, ctx: &ValidationContext) -> ValidationResult {
        let label = label_for(&self.flags, path);

        let elements = match value.as_array() {
            Some(elements) => elements,
            None => {
                let message = render(self.type_error_message.as_ref(), &label, || {
                    format!("\"{}\" must be an array", label)
                });
                return Validation::Failure(SchemaErrors::single(
                    SchemaError::new(path.clone(), message)
                        .with_code("array.base")
                        .with_got(value_type_name(value))
                        .with_expected("array"),
                ));
            }
        };

        let mut report = ctx.report();
        for checked in &self.rules {
            if let Some(error) = check_rule(checked, elements.len(), path, &label) {
                if report.record(error) {
                    return report.stop();
                }
            }
        }

        let validated = match &self.items {
            None => elements.clone(),
            Some(items) => {
                let mut validated = Vec::with_capacity(elements.len());
                for (i, element) in elements.iter().enumerate() {
                    match items.validate_at(element, &path.index(i), ctx) {
                        Validation::Success(v) => validated.push(v),
                        Validation::Failure(errors) => {
                            if report.absorb(errors) {
                                return report.stop();
                            }
                        }
                    }
                }
                validated
            }
        };

        report.finish(Value::Array(validated))
    }
}

fn limit_of(rule: &ArrayRule) -> usize {
    match rule {
        ArrayRule::Min(limit) | ArrayRule::Max(limit) | ArrayRule::Length(limit) => *limit,
    }
}

fn check_rule(checked: &Checked<ArrayRule>, len: usize, path: &FieldPath, label: &str) -> Option<SchemaError> {
    let (passed, code, builtin) = match checked.rule {
        ArrayRule::Min(limit) => (
            len >= limit,
            "array.min",
            format!("\"{}\" must contain at least {} items", label, limit),
        ),
        ArrayRule::Max(limit) => (
            len <= limit,
            "array.max",
            format!("\"{}\" must contain less than or equal to {} items", label, limit),
        ),
        ArrayRule::Length(limit) => (
            len == limit,
            "array.length",
            format!("\"{}\" must contain {} items", label, limit),
        ),
    };

    if passed {
        return None;
    }
    let message = render(checked.message.as_ref(), label, || builtin);
    Some(
        SchemaError::new(path.clone(), message)
            .with_code(code)
            .with_expected(format!("{} items", limit_of(&checked.rule)))
            .with_got(format!("{} items", len)),
    )
}
