//! Error types.
//!
//! Validation failures are data ([`SchemaErrors`] inside a failed
//! `Validation`); schema-building mistakes are [`ConfigError`]s returned as
//! `Err` by the builder.

mod config_error;
mod schema_error;

pub use config_error::ConfigError;
pub use schema_error::{SchemaError, SchemaErrors};
