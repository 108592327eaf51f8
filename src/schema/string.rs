//! String schema validation.
//!
//! [`StringSchema`] checks that a value is a non-empty string and then
//! applies its rules (`alphanum`, `min`, `max`, `length`, `email`,
//! `pattern`) in the order they were attached.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::describe::{Description, Flags, RuleDescriptor, SchemaKind};
use crate::error::{ConfigError, SchemaError, SchemaErrors};
use crate::path::FieldPath;
use crate::validation::{value_type_name, ValidationContext};
use crate::ValidationResult;

use super::common::{attach, label_for, render, schema_methods, Checked, NamedRule};
use super::traits::SchemaLike;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email pattern is valid")
});

/// Longest address accepted by `email`.
const EMAIL_MAX_LEN: usize = 254;

#[derive(Debug, Clone)]
enum StringRule {
    Alphanum,
    Min(usize),
    Max(usize),
    Length(usize),
    Email,
    Pattern { regex: Regex, source: String },
}

impl NamedRule for StringRule {
    fn name(&self) -> &'static str {
        match self {
            StringRule::Alphanum => "alphanum",
            StringRule::Min(_) => "min",
            StringRule::Max(_) => "max",
            StringRule::Length(_) => "length",
            StringRule::Email => "email",
            StringRule::Pattern { .. } => "pattern",
        }
    }
}

impl StringRule {
    fn descriptor(&self) -> RuleDescriptor {
        let rule = RuleDescriptor::new(self.name());
        match self {
            StringRule::Min(limit) | StringRule::Max(limit) | StringRule::Length(limit) => {
                rule.with_arg("limit", *limit)
            }
            StringRule::Pattern { source, .. } => rule.with_arg("regex", source.as_str()),
            StringRule::Alphanum | StringRule::Email => rule,
        }
    }
}

/// A schema for string values.
///
/// Empty strings are rejected with `string.empty` unless `allow_empty` is
/// set. Lengths count Unicode scalar values.
///
/// # Example
///
/// ```rust
/// use conform::Schema;
/// use serde_json::json;
///
/// let username = Schema::string().alphanum().min(3)?.max(30)?.required();
///
/// assert!(username.validate(&json!("testing")).is_success());
///
/// let errors = username.validate(&json!("t")).into_result().unwrap_err();
/// assert_eq!(errors.first().code, "string.min");
/// # Ok::<(), conform::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StringSchema {
    flags: Flags,
    rules: Vec<Checked<StringRule>>,
    type_error_message: Option<String>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self {
            flags: Flags::default(),
            rules: Vec::new(),
            type_error_message: None,
        }
    }

    schema_methods!();

    /// Only ASCII letters and digits.
    pub fn alphanum(mut self) -> Self {
        attach(&mut self.rules, StringRule::Alphanum);
        self
    }

    /// At least `limit` characters.
    ///
    /// Fails if a `max` smaller than `limit` is already attached.
    pub fn min(mut self, limit: usize) -> Result<Self, ConfigError> {
        attach(&mut self.rules, StringRule::Min(limit));
        self.check_bounds("min")?;
        Ok(self)
    }

    /// At most `limit` characters.
    ///
    /// Fails if a `min` larger than `limit` is already attached.
    pub fn max(mut self, limit: usize) -> Result<Self, ConfigError> {
        attach(&mut self.rules, StringRule::Max(limit));
        self.check_bounds("max")?;
        Ok(self)
    }

    /// Exactly `limit` characters.
    ///
    /// Fails if `limit` lies outside an attached `min`/`max`.
    pub fn length(mut self, limit: usize) -> Result<Self, ConfigError> {
        attach(&mut self.rules, StringRule::Length(limit));
        self.check_bounds("length")?;
        Ok(self)
    }

    /// A plausible email address: `local@domain.tld`, at most 254 characters.
    pub fn email(mut self) -> Self {
        attach(&mut self.rules, StringRule::Email);
        self
    }

    /// Must match the regular expression `pattern`.
    ///
    /// ```rust
    /// use conform::{ConfigError, Schema};
    ///
    /// assert!(Schema::string().pattern(r"^[a-z]+$").is_ok());
    /// assert!(matches!(
    ///     Schema::string().pattern("[unclosed"),
    ///     Err(ConfigError::Pattern(_))
    /// ));
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern)?;
        attach(
            &mut self.rules,
            StringRule::Pattern {
                regex,
                source: pattern.to_string(),
            },
        );
        Ok(self)
    }

    /// Accept `""` instead of failing with `string.empty`.
    pub fn allow_empty(mut self) -> Self {
        self.flags.allow_empty = true;
        self
    }

    /// Custom message for the most recently attached rule, or for the type
    /// check if no rule is attached yet. `{label}` is replaced by the label.
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
                StringRule::Min(limit) => min = Some(limit),
                StringRule::Max(limit) => max = Some(limit),
                StringRule::Length(limit) => length = Some(limit),
                _ => {}
            }
        }

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ConfigError::InvertedBounds {
                    kind: "string",
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
                    kind: "string",
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

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for StringSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::String
    }

    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn describe(&self) -> Description {
        Description::new(
            SchemaKind::String,
            self.flags.clone(),
            self.rules
                .iter()
                .map(|c| c.rule.descriptor().with_message(c.message.clone()))
                .collect(),
        )
        .with_error(self.type_error_message.clone())
    }

    fn validate_at(&self, value: &Value, path: &FieldPath, ctx: &ValidationContext) -> ValidationResult {
        let label = label_for(&self.flags, path);

        let s = match value.as_str() {
            Some(s) => s,
            None => {
                let message = render(self.type_error_message.as_ref(), &label, || {
                    format!("\"{}\" must be a string", label)
                });
                return Validation::Failure(SchemaErrors::single(
                    SchemaError::new(path.clone(), message)
                        .with_code("string.base")
                        .with_got(value_type_name(value))
                        .with_expected("string"),
                ));
            }
        };

        if s.is_empty() && !self.flags.allow_empty {
            let message = render(self.type_error_message.as_ref(), &label, || {
                format!("\"{}\" is not allowed to be empty", label)
            });
            return Validation::Failure(SchemaErrors::single(
                SchemaError::new(path.clone(), message)
                    .with_code("string.empty")
                    .with_expected("non-empty string"),
            ));
        }

        let mut report = ctx.report();
        for checked in &self.rules {
            if let Some(error) = check_rule(checked, s, path, &label) {
                if report.record(error) {
                    return report.stop();
                }
            }
        }
        report.finish(Value::String(s.to_string()))
    }
}

fn check_rule(checked: &Checked<StringRule>, value: &str, path: &FieldPath, label: &str) -> Option<SchemaError> {
    let custom = checked.message.as_ref();
    match &checked.rule {
        StringRule::Alphanum => {
            if value.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
            let msg = render(custom, label, || {
                format!("\"{}\" must only contain alpha-numeric characters", label)
            });
            Some(
                SchemaError::new(path.clone(), msg)
                    .with_code("string.alphanum")
                    .with_expected("letters and digits only")
                    .with_got(value),
            )
        }
        StringRule::Min(limit) => {
            let len = value.chars().count();
            if len >= *limit {
                return None;
            }
            let msg = render(custom, label, || {
                format!("\"{}\" length must be at least {} characters long", label, limit)
            });
            Some(
                SchemaError::new(path.clone(), msg)
                    .with_code("string.min")
                    .with_expected(format!("at least {} characters", limit))
                    .with_got(format!("{} characters", len)),
            )
        }
        StringRule::Max(limit) => {
            let len = value.chars().count();
            if len <= *limit {
                return None;
            }
            let msg = render(custom, label, || {
                format!(
                    "\"{}\" length must be less than or equal to {} characters long",
                    label, limit
                )
            });
            Some(
                SchemaError::new(path.clone(), msg)
                    .with_code("string.max")
                    .with_expected(format!("at most {} characters", limit))
                    .with_got(format!("{} characters", len)),
            )
        }
        StringRule::Length(limit) => {
            let len = value.chars().count();
            if len == *limit {
                return None;
            }
            let msg = render(custom, label, || {
                format!("\"{}\" length must be {} characters long", label, limit)
            });
            Some(
                SchemaError::new(path.clone(), msg)
                    .with_code("string.length")
                    .with_expected(format!("exactly {} characters", limit))
                    .with_got(format!("{} characters", len)),
            )
        }
        StringRule::Email => {
            if value.len() <= EMAIL_MAX_LEN && EMAIL.is_match(value) {
                return None;
            }
            let msg = render(custom, label, || format!("\"{}\" must be a valid email", label));
            Some(
                SchemaError::new(path.clone(), msg)
                    .with_code("string.email")
                    .with_expected("email address")
                    .with_got(value),
            )
        }
        StringRule::Pattern { regex, source } => {
            if regex.is_match(value) {
                return None;
            }
            let msg = render(custom, label, || {
                format!(
                    "\"{}\" with value \"{}\" fails to match the required pattern: /{}/",
                    label, value, source
                )
            });
            Some(
                SchemaError::new(path.clone(), msg)
                    .with_code("string.pattern.base")
                    .with_expected(format!("string matching /{}/", source))
                    .with_got(value),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationOptions;
    use serde_json::json;

    fn unwrap_failure(v: ValidationResult) -> SchemaErrors {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_accepts_string_unchanged() {
        let result = StringSchema::new().validate(&json!("hello"));
        assert_eq!(result.into_result().unwrap(), json!("hello"));
    }

    #[test]
    fn test_rejects_non_string() {
        for value in [json!(42), json!(null), json!(true), json!([1]), json!({"a": 1})] {
            let errors = unwrap_failure(StringSchema::new().validate(&value));
            assert_eq!(errors.first().code, "string.base");
            assert_eq!(errors.first().message, "\"value\" must be a string");
        }
    }

    #[test]
    fn test_empty_string() {
        let errors = unwrap_failure(StringSchema::new().validate(&json!("")));
        assert_eq!(errors.first().code, "string.empty");

        let result = StringSchema::new().allow_empty().validate(&json!(""));
        assert!(result.is_success());
    }

    #[test]
    fn test_alphanum() {
        let schema = StringSchema::new().alphanum();
        assert!(schema.validate(&json!("abc123")).is_success());

        let errors = unwrap_failure(schema.validate(&json!("abc-123")));
        assert_eq!(errors.first().code, "string.alphanum");

        // only ASCII counts
        assert!(schema.validate(&json!("café")).is_failure());
    }

    #[test]
    fn test_min_and_max_are_inclusive() {
        let schema = StringSchema::new().min(3).unwrap().max(5).unwrap();
        assert!(schema.validate(&json!("abc")).is_success());
        assert!(schema.validate(&json!("abcde")).is_success());

        let errors = unwrap_failure(schema.validate(&json!("ab")));
        assert_eq!(errors.first().code, "string.min");
        assert_eq!(
            errors.first().message,
            "\"value\" length must be at least 3 characters long"
        );

        let errors = unwrap_failure(schema.validate(&json!("abcdef")));
        assert_eq!(errors.first().code, "string.max");
    }

    #[test]
    fn test_length() {
        let schema = StringSchema::new().length(4).unwrap();
        assert!(schema.validate(&json!("abcd")).is_success());
        let errors = unwrap_failure(schema.validate(&json!("abc")));
        assert_eq!(errors.first().code, "string.length");
    }

    #[test]
    fn test_length_outside_bounds_fails_at_build_time() {
        let err = StringSchema::new().min(5).unwrap().length(3).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ConflictingLength {
                kind: "string",
                rule: "length",
                length: 3,
                bound: "min",
                limit: 5,
            }
        );

        assert!(matches!(
            StringSchema::new().length(8).unwrap().max(4),
            Err(ConfigError::ConflictingLength { rule: "max", bound: "max", .. })
        ));
        assert!(StringSchema::new().min(2).unwrap().max(6).unwrap().length(4).is_ok());
    }

    #[test]
    fn test_describe_records_custom_messages() {
        let plain = StringSchema::new().min(3).unwrap();
        let custom = StringSchema::new().min(3).unwrap().error("custom {label}");
        assert_ne!(plain.describe(), custom.describe());
        assert_eq!(
            custom.describe().rule("min").unwrap().message.as_deref(),
            Some("custom {label}")
        );

        let typed = StringSchema::new().error("{label} must be text").describe();
        assert_eq!(typed.error.as_deref(), Some("{label} must be text"));
        assert!(plain.describe().error.is_none());
    }

    #[test]
    fn test_inverted_bounds_fail_at_build_time() {
        let err = StringSchema::new().min(10).unwrap().max(2).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvertedBounds {
                kind: "string",
                rule: "max",
                min: "10".to_string(),
                max: "2".to_string(),
            }
        );

        assert!(StringSchema::new().max(2).unwrap().min(3).is_err());
        assert!(StringSchema::new().min(3).unwrap().max(3).is_ok());
    }

    #[test]
    fn test_repeated_rule_replaces_earlier() {
        let schema = StringSchema::new().min(2).unwrap().alphanum().min(4).unwrap();
        let names: Vec<_> = schema.describe().rules.into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["alphanum", "min"]);
        assert!(schema.validate(&json!("abc")).is_failure());
    }

    #[test]
    fn test_email() {
        let schema = StringSchema::new().email();
        for ok in ["test@email.com", "first.last+tag@sub.example.org"] {
            assert!(schema.validate(&json!(ok)).is_success(), "{ok}");
        }
        for bad in ["plain", "a@b", "@example.com", "a@.com", "a b@example.com", "a@example.c"] {
            let errors = unwrap_failure(schema.validate(&json!(bad)));
            assert_eq!(errors.first().code, "string.email", "{bad}");
        }
    }

    #[test]
    fn test_pattern() {
        let schema = StringSchema::new().pattern(r"^\d+$").unwrap();
        assert!(schema.validate(&json!("12345")).is_success());

        let errors = unwrap_failure(schema.validate(&json!("abc")));
        assert_eq!(errors.first().code, "string.pattern.base");
        assert_eq!(errors.first().rule(), "pattern");
        assert!(errors.first().message.contains(r"/^\d+$/"));
    }

    #[test]
    fn test_rules_checked_in_attachment_order() {
        let schema = StringSchema::new().min(5).unwrap().alphanum();
        let errors = unwrap_failure(schema.validate(&json!("a-b")));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().code, "string.min");

        let schema = StringSchema::new().alphanum().min(5).unwrap();
        let errors = unwrap_failure(schema.validate(&json!("a-b")));
        assert_eq!(errors.first().code, "string.alphanum");
    }

    #[test]
    fn test_collects_all_rule_errors_without_abort_early() {
        let schema = StringSchema::new().alphanum().min(5).unwrap();
        let options = ValidationOptions::default().abort_early(false);
        let errors = unwrap_failure(schema.validate_with(&json!("a-b"), &options));
        let codes: Vec<_> = errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["string.alphanum", "string.min"]);
    }

    #[test]
    fn test_custom_messages() {
        let schema = StringSchema::new()
            .min(5)
            .unwrap()
            .error("{label} needs five characters")
            .label("Nickname");
        let errors = unwrap_failure(schema.validate(&json!("ab")));
        assert_eq!(errors.first().message, "Nickname needs five characters");

        let schema = StringSchema::new().error("text only");
        let errors = unwrap_failure(schema.validate(&json!(1)));
        assert_eq!(errors.first().message, "text only");
    }

    #[test]
    fn test_unicode_length_counts_chars() {
        let schema = StringSchema::new().min(3).unwrap().max(3).unwrap();
        assert!(schema.validate(&json!("日本語")).is_success());
        assert!(schema.validate(&json!("🎉🎊")).is_failure());
    }

    #[test]
    fn test_describe() {
        let schema = StringSchema::new()
            .alphanum()
            .min(3)
            .unwrap()
            .max(30)
            .unwrap()
            .required();
        let description = schema.describe();
        assert_eq!(
            description.to_json().unwrap(),
            json!({
                "type": "string",
                "flags": {"required": true},
                "rules": [
                    {"name": "alphanum"},
                    {"name": "min", "args": {"limit": 3}},
                    {"name": "max", "args": {"limit": 30}}
                ]
            })
        );
    }
}
