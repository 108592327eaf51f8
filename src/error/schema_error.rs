//! Validation error types.
//!
//! [`SchemaError`] describes one failed check; [`SchemaErrors`] is the
//! non-empty list a failed validation carries.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::FieldPath;

/// A single failed check.
///
/// - **path**: where the failing value sits in the validated record
/// - **code**: `<kind>.<rule>`, e.g. `string.min` or `any.required`
/// - **message**: human-readable text naming the field by its label
/// - **expected** / **got**: optional context for the failure
///
/// # Example
///
/// ```rust
/// use conform::{FieldPath, SchemaError};
///
/// let error = SchemaError::new(
///     FieldPath::root().key("age"),
///     "\"age\" must be greater than or equal to 18",
/// )
/// .with_code("number.min")
/// .with_expected("at least 18")
/// .with_got("12");
///
/// assert_eq!(error.rule(), "min");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Location of the failing value.
    pub path: FieldPath,
    /// Human-readable error message.
    pub message: String,
    /// The offending value or measurement, formatted.
    pub got: Option<String>,
    /// What the rule required instead.
    pub expected: Option<String>,
    /// Machine-readable code of the violated rule.
    pub code: String,
}

impl SchemaError {
    /// Creates an error with the generic `any.invalid` code.
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "any.invalid".to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// The violated rule: the second component of `code`.
    ///
    /// `string.min` yields `min`, `string.pattern.base` yields `pattern`, and
    /// a code without a dot is returned whole.
    pub fn rule(&self) -> &str {
        let mut parts = self.code.split('.');
        match (parts.next(), parts.next()) {
            (_, Some(rule)) => rule,
            (Some(whole), None) => whole,
            (None, None) => "",
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// A non-empty list of [`SchemaError`]s, in the order they were found.
///
/// With the default options a failed validation carries exactly one error.
/// Setting `abort_early(false)` collects all of them.
///
/// ```rust
/// use conform::{FieldPath, SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let missing = SchemaErrors::single(
///     SchemaError::new(FieldPath::root().key("email"), "\"email\" is required")
///         .with_code("any.required"),
/// );
/// let short = SchemaErrors::single(
///     SchemaError::new(FieldPath::root().key("username"), "too short")
///         .with_code("string.min"),
/// );
///
/// let both = missing.combine(short);
/// assert_eq!(both.len(), 2);
/// assert_eq!(both.first().code, "any.required");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Builds a collection from a vec, or `None` if the vec is empty.
    pub fn from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = errors.next()?;
        Some(errors.fold(Self::single(head), |acc, error| {
            acc.combine(Self::single(error))
        }))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// The first error found, which is the only one under `abort_early`.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Errors reported at exactly `path`.
    pub fn at_path(&self, path: &FieldPath) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Errors whose code equals `code`.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len() == 1 {
            return write!(f, "{}", self.first());
        }
        writeln!(f, "{} validation errors:", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

// Results cross threads in batch validation.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaErrors>();
    assert_sync::<SchemaErrors>();
};
