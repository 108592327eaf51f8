//! Demonstration: build a sign-up schema, validate one record, and print
//! what the schema looks like from the outside.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use serde_json::json;
use stillwater::Validation;
use tracing_subscriber::EnvFilter;

use conform::{ObjectSchema, Schema};

fn signup_schema() -> Result<ObjectSchema> {
    Ok(Schema::object()
        .key(
            "username",
            Schema::string().alphanum().min(3)?.max(30)?.required(),
        )
        .key("email", Schema::string().email().required())
        .key("age", Schema::number().integer().min(18.0)?.max(100.0)?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let schema = signup_schema().context("building sign-up schema")?;
    println!("{:#?}", schema);

    let record = json!({"username": "testing", "email": "test@email.com", "age": 24});
    match schema.validate(&record) {
        Validation::Success(value) => println!("Ok({})", value),
        Validation::Failure(errors) => println!("Error({})", errors),
    }

    let description = schema.describe();
    println!("{}", serde_json::to_string_pretty(&description)?);

    let username = description
        .key("username")
        .context("description has no username key")?;
    println!("{}", serde_json::to_string_pretty(&username.rules)?);
    println!("{}", serde_json::to_string_pretty(&username.flags)?);

    Ok(())
}
