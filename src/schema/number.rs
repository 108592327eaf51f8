//! Numeric schema validation.
//!
//! [`NumberSchema`] accepts JSON numbers (and, when converting, numeric
//! strings) and applies `integer`, bound, sign and `multiple` rules in
//! attachment order.

use serde_json::Value;
use stillwater::Validation;

use crate::describe::{number_arg, Description, Flags, RuleDescriptor, SchemaKind};
use crate::error::{ConfigError, SchemaError, SchemaErrors};
use crate::path::FieldPath;
use crate::validation::{value_type_name, ValidationContext};
use crate::ValidationResult;

use super::common::{attach, label_for, render, schema_methods, Checked, NamedRule};
use super::traits::SchemaLike;

#[derive(Debug, Clone, PartialEq)]
enum NumberRule {
    Integer,
    Min(f64),
    Max(f64),
    Greater(f64),
    Less(f64),
    Positive,
    Negative,
    Multiple(f64),
}

impl NamedRule for NumberRule {
    fn name(&self) -> &'static str {
        match self {
            NumberRule::Integer => "integer",
            NumberRule::Min(_) => "min",
            NumberRule::Max(_) => "max",
            NumberRule::Greater(_) => "greater",
            NumberRule::Less(_) => "less",
            NumberRule::Positive => "positive",
            NumberRule::Negative => "negative",
            NumberRule::Multiple(_) => "multiple",
        }
    }
}

impl NumberRule {
    fn descriptor(&self) -> RuleDescriptor {
        let rule = RuleDescriptor::new(self.name());
        match self {
            NumberRule::Min(limit)
            | NumberRule::Max(limit)
            | NumberRule::Greater(limit)
            | NumberRule::Less(limit) => rule.with_arg("limit", number_arg(*limit)),
            NumberRule::Multiple(base) => rule.with_arg("base", number_arg(*base)),
            NumberRule::Integer | NumberRule::Positive | NumberRule::Negative => rule,
        }
    }
}

/// A schema for numeric values.
///
/// Limits are `f64`; whole-number limits are described as integers
/// (`{"limit": 18}`). With conversion enabled (the default) a string such as
/// `"24"` validates to the number `24`.
///
/// # Example
///
/// ```rust
/// use conform::Schema;
/// use serde_json::json;
///
/// let age = Schema::number().integer().min(18.0)?.max(100.0)?;
///
/// assert!(age.validate(&json!(24)).is_success());
/// assert_eq!(age.validate(&json!("24")).into_result().unwrap(), json!(24));
///
/// let errors = age.validate(&json!(16)).into_result().unwrap_err();
/// assert_eq!(errors.first().code, "number.min");
/// # Ok::<(), conform::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct NumberSchema {
    flags: Flags,
    rules: Vec<Checked<NumberRule>>,
    type_error_message: Option<String>,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self {
            flags: Flags::default(),
            rules: Vec::new(),
            type_error_message: None,
        }
    }

    schema_methods!();

    /// No fractional part. `24.0` counts as an integer.
    pub fn integer(mut self) -> Self {
        attach(&mut self.rules, NumberRule::Integer);
        self
    }

    /// Greater than or equal to `limit`.
    pub fn min(self, limit: f64) -> Result<Self, ConfigError> {
        self.bounded("min", NumberRule::Min(limit), limit)
    }

    /// Less than or equal to `limit`.
    pub fn max(self, limit: f64) -> Result<Self, ConfigError> {
        self.bounded("max", NumberRule::Max(limit), limit)
    }

    /// Strictly greater than `limit`.
    pub fn greater(self, limit: f64) -> Result<Self, ConfigError> {
        self.bounded("greater", NumberRule::Greater(limit), limit)
    }

    /// Strictly less than `limit`.
    pub fn less(self, limit: f64) -> Result<Self, ConfigError> {
        self.bounded("less", NumberRule::Less(limit), limit)
    }

    pub fn positive(mut self) -> Self {
        attach(&mut self.rules, NumberRule::Positive);
        self
    }

    pub fn negative(mut self) -> Self {
        attach(&mut self.rules, NumberRule::Negative);
        self
    }

    /// An exact multiple of `base`, which must be greater than 0.
    pub fn multiple(mut self, base: f64) -> Result<Self, ConfigError> {
        if !base.is_finite() {
            return Err(ConfigError::NonFiniteLimit {
                kind: "number",
                rule: "multiple",
                limit: base,
            });
        }
        if base <= 0.0 {
            return Err(ConfigError::NonPositiveMultiple(base));
        }
        attach(&mut self.rules, NumberRule::Multiple(base));
        Ok(self)
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

    fn bounded(mut self, name: &'static str, rule: NumberRule, limit: f64) -> Result<Self, ConfigError> {
        if !limit.is_finite() {
            return Err(ConfigError::NonFiniteLimit {
                kind: "number",
                rule: name,
                limit,
            });
        }
        attach(&mut self.rules, rule);

        let mut min = None;
        let mut max = None;
        let mut greater = None;
        let mut less = None;
        for checked in &self.rules {
            match checked.rule {
                NumberRule::Min(limit) => min = Some(limit),
                NumberRule::Max(limit) => max = Some(limit),
                NumberRule::Greater(limit) => greater = Some(limit),
                NumberRule::Less(limit) => less = Some(limit),
                _ => {}
            }
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ConfigError::InvertedBounds {
                    kind: "number",
                    rule: name,
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }

        let lower = tighter(min.map(Bound::Inclusive), greater.map(Bound::Exclusive), |a, b| a > b);
        let upper = tighter(max.map(Bound::Inclusive), less.map(Bound::Exclusive), |a, b| a < b);
        if let (Some(lower), Some(upper)) = (lower, upper) {
            let empty = match (lower, upper) {
                (Bound::Inclusive(lo), Bound::Inclusive(hi)) => lo > hi,
                (lo, hi) => lo.value() >= hi.value(),
            };
            if empty {
                return Err(ConfigError::EmptyRange {
                    kind: "number",
                    rule: name,
                    lower: lower.render(">"),
                    upper: upper.render("<"),
                });
            }
        }
        Ok(self)
    }

    /// Reads a number, coercing numeric strings when `convert` is on.
    ///
    /// Returns the number and the value to hand back on success.
    fn coerce(value: &Value, convert: bool) -> Option<(f64, Value)> {
        match value {
            Value::Number(n) => n.as_f64().map(|f| (f, value.clone())),
            Value::String(s) if convert => {
                let n = s.trim().parse::<f64>().ok().filter(|n| n.is_finite())?;
                Some((n, number_arg(n)))
            }
            _ => None,
        }
    }
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for NumberSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Number
    }

    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn describe(&self) -> Description {
        Description::new(
            SchemaKind::Number,
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

        let (n, output) = match Self::coerce(value, ctx.options().converts()) {
            Some(parsed) => parsed,
            None => {
                let message = render(self.type_error_message.as_ref(), &label, || {
                    format!("\"{}\" must be a number", label)
                });
                return Validation::Failure(SchemaErrors::single(
                    SchemaError::new(path.clone(), message)
                        .with_code("number.base")
                        .with_got(value_type_name(value))
                        .with_expected("number"),
                ));
            }
        };

        let mut report = ctx.report();
        for checked in &self.rules {
            if let Some(error) = check_rule(checked, n, path, &label) {
                if report.record(error) {
                    return report.stop();
                }
            }
        }
        report.finish(output)
    }
}

/// One side of the accepted range.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    fn value(self) -> f64 {
        match self {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
        }
    }

    fn render(self, strict: &str) -> String {
        match self {
            Bound::Inclusive(v) => format!("{}= {}", strict, v),
            Bound::Exclusive(v) => format!("{} {}", strict, v),
        }
    }
}

/// The stricter of two bounds on the same side; on a tie the exclusive one.
fn tighter(inclusive: Option<Bound>, exclusive: Option<Bound>, stricter: fn(f64, f64) -> bool) -> Option<Bound> {
    match (inclusive, exclusive) {
        (Some(i), Some(e)) if stricter(i.value(), e.value()) => Some(i),
        (Some(_), Some(e)) => Some(e),
        (i, e) => i.or(e),
    }
}

/// Whether `n` is a whole multiple of `base`, allowing for the rounding
/// error of decimal bases such as `0.1`.
fn is_multiple(n: f64, base: f64) -> bool {
    let quotient = n / base;
    (quotient - quotient.round()).abs() <= 1e-9 * quotient.abs().max(1.0)
}

fn check_rule(checked: &Checked<NumberRule>, n: f64, path: &FieldPath, label: &str) -> Option<SchemaError> {
    let (passed, code, expected, builtin) = match checked.rule {
        NumberRule::Integer => (
            n.fract() == 0.0,
            "number.integer",
            "integer".to_string(),
            format!("\"{}\" must be an integer", label),
        ),
        NumberRule::Min(limit) => (
            n >= limit,
            "number.min",
            format!("at least {}", limit),
            format!("\"{}\" must be greater than or equal to {}", label, limit),
        ),
        NumberRule::Max(limit) => (
            n <= limit,
            "number.max",
            format!("at most {}", limit),
            format!("\"{}\" must be less than or equal to {}", label, limit),
        ),
        NumberRule::Greater(limit) => (
            n > limit,
            "number.greater",
            format!("greater than {}", limit),
            format!("\"{}\" must be greater than {}", label, limit),
        ),
        NumberRule::Less(limit) => (
            n < limit,
            "number.less",
            format!("less than {}", limit),
            format!("\"{}\" must be less than {}", label, limit),
        ),
        NumberRule::Positive => (
            n > 0.0,
            "number.positive",
            "value > 0".to_string(),
            format!("\"{}\" must be a positive number", label),
        ),
        NumberRule::Negative => (
            n < 0.0,
            "number.negative",
            "value < 0".to_string(),
            format!("\"{}\" must be a negative number", label),
        ),
        NumberRule::Multiple(base) => (
            is_multiple(n, base),
            "number.multiple",
            format!("multiple of {}", base),
            format!("\"{}\" must be a multiple of {}", label, base),
        ),
    };

    if passed {
        return None;
    }
    let message = render(checked.message.as_ref(), label, || builtin);
    Some(
        SchemaError::new(path.clone(), message)
            .with_code(code)
            .with_expected(expected)
            .with_got(n.to_string()),
    )
}
