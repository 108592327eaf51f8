//! Pieces shared by every schema type: rule bookkeeping, labels and the
//! presence/metadata builder methods.

use crate::describe::Flags;
use crate::path::FieldPath;

/// A rule together with its optional custom message.
#[derive(Debug, Clone)]
pub(crate) struct Checked<R> {
    pub(crate) rule: R,
    pub(crate) message: Option<String>,
}

/// Rules that may appear at most once per schema.
pub(crate) trait NamedRule {
    fn name(&self) -> &'static str;
}

/// Appends `rule`, first removing an earlier rule with the same name.
pub(crate) fn attach<R: NamedRule>(rules: &mut Vec<Checked<R>>, rule: R) {
    rules.retain(|c| c.rule.name() != rule.name());
    rules.push(Checked {
        rule,
        message: None,
    });
}

/// The name a value goes by in messages: its `label` flag, else its path.
pub(crate) fn label_for(flags: &Flags, path: &FieldPath) -> String {
    flags.label.clone().unwrap_or_else(|| path.label())
}

/// A custom message with `{label}` filled in, or the built-in text.
pub(crate) fn render(custom: Option<&String>, label: &str, builtin: impl FnOnce() -> String) -> String {
    match custom {
        Some(template) => template.replace("{label}", label),
        None => builtin(),
    }
}

/// Presence, metadata and entry-point methods every schema type exposes.
///
/// Expects the implementing struct to have a `flags: Flags` field and to
/// implement `SchemaLike`.
macro_rules! schema_methods {
    () => {
        /// The key must be present when this schema is used inside an object.
        pub fn required(mut self) -> Self {
            self.flags.required = true;
            self.flags.forbidden = false;
            self
        }

        /// The key may be absent (the default).
        pub fn optional(mut self) -> Self {
            self.flags.required = false;
            self.flags.forbidden = false;
            self
        }

        /// The key must be absent when this schema is used inside an object.
        pub fn forbidden(mut self) -> Self {
            self.flags.forbidden = true;
            self.flags.required = false;
            self
        }

        /// Name used for this value in error messages instead of its path.
        pub fn label(mut self, label: impl Into<String>) -> Self {
            self.flags.label = Some(label.into());
            self
        }

        /// Free-form documentation, reported by `describe` only.
        pub fn description(mut self, text: impl Into<String>) -> Self {
            self.flags.description = Some(text.into());
            self
        }

        /// Value substituted when the key is missing from an object.
        pub fn default(mut self, value: serde_json::Value) -> Self {
            self.flags.default = Some(value);
            self
        }

        /// Validates with the default options: stop at the first error.
        pub fn validate(&self, value: &serde_json::Value) -> $crate::ValidationResult {
            $crate::schema::SchemaLike::validate(self, value)
        }

        pub fn validate_with(
            &self,
            value: &serde_json::Value,
            options: &$crate::validation::ValidationOptions,
        ) -> $crate::ValidationResult {
            $crate::schema::SchemaLike::validate_with(self, value, options)
        }

        pub fn describe(&self) -> $crate::describe::Description {
            $crate::schema::SchemaLike::describe(self)
        }
    };
}

pub(crate) use schema_methods;
