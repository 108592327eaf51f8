//! The username/email/age sign-up schema, end to end.

use conform::{ObjectSchema, Schema, SchemaErrors, ValidationOptions};
use proptest::prelude::*;
use serde_json::{json, Value};

fn signup() -> ObjectSchema {
    Schema::object()
        .key(
            "username",
            Schema::string()
                .alphanum()
                .min(3)
                .unwrap()
                .max(30)
                .unwrap()
                .required(),
        )
        .key("email", Schema::string().email().required())
        .key(
            "age",
            Schema::number()
                .integer()
                .min(18.0)
                .unwrap()
                .max(100.0)
                .unwrap(),
        )
}

/// Helper to extract the error value from a Validation
fn unwrap_failure(v: conform::ValidationResult) -> SchemaErrors {
    v.into_result().unwrap_err()
}

#[test]
fn test_valid_record_is_returned_unchanged() {
    let input = json!({"username": "testing", "email": "test@email.com", "age": 24});
    let result = signup().validate(&input);
    assert_eq!(result.into_result().unwrap(), input);
}

#[test]
fn test_short_username_fails_on_min_length() {
    let errors = unwrap_failure(signup().validate(&json!({"username": "t", "email": "test@email.com"})));
    assert_eq!(errors.len(), 1);

    let error = errors.first();
    assert_eq!(error.path.to_string(), "username");
    assert_eq!(error.code, "string.min");
    assert_eq!(error.rule(), "min");
    assert_eq!(
        error.message,
        "\"username\" length must be at least 3 characters long"
    );
}

#[test]
fn test_age_is_optional() {
    let result = signup().validate(&json!({"username": "abc", "email": "a@b.co"}));
    assert!(result.is_success());
}

#[test]
fn test_unknown_keys_are_kept() {
    let input = json!({"username": "abc", "email": "a@b.co", "referrer": "friend"});
    let result = signup().validate(&input);
    assert_eq!(result.into_result().unwrap(), input);
}

#[test]
fn test_first_error_follows_declaration_order() {
    let errors = unwrap_failure(signup().validate(&json!({"age": 5})));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "username");
    assert_eq!(errors.first().code, "any.required");
}

#[test]
fn test_all_errors_when_not_aborting_early() {
    let options = ValidationOptions::default().abort_early(false);
    let errors = unwrap_failure(signup().validate_with(&json!({"username": "a!", "age": 5.5}), &options));

    let found: Vec<_> = errors
        .iter()
        .map(|e| (e.path.to_string(), e.code.clone()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("username".to_string(), "string.alphanum".to_string()),
            ("username".to_string(), "string.min".to_string()),
            ("email".to_string(), "any.required".to_string()),
            ("age".to_string(), "number.integer".to_string()),
            ("age".to_string(), "number.min".to_string()),
        ]
    );
}

#[test]
fn test_describe_username() {
    let description = signup().describe();
    let username = description.key("username").unwrap();

    let names: Vec<_> = username.rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alphanum", "min", "max"]);
    assert_eq!(username.rule("min").unwrap().arg("limit"), Some(&json!(3)));
    assert_eq!(username.rule("max").unwrap().arg("limit"), Some(&json!(30)));

    assert!(username.flags.required);
    assert_eq!(
        serde_json::to_value(&username.flags).unwrap(),
        json!({"required": true})
    );
}

#[test]
fn test_describe_is_deterministic() {
    assert_eq!(signup().describe(), signup().describe());

    let schema = signup();
    assert_eq!(schema.describe(), schema.describe());
}

#[test]
fn test_validation_is_repeatable() {
    let schema = signup();
    for input in [
        json!({"username": "testing", "email": "test@email.com", "age": 24}),
        json!({"username": "t", "email": "nope"}),
        json!("not an object"),
    ] {
        let first = schema.validate(&input).into_result();
        let second = schema.validate(&input).into_result();
        assert_eq!(first, second);
    }
}

fn record(username: Option<String>, email: Option<String>, age: Option<i64>) -> Value {
    let mut map = serde_json::Map::new();
    if let Some(username) = username {
        map.insert("username".to_string(), json!(username));
    }
    if let Some(email) = email {
        map.insert("email".to_string(), json!(email));
    }
    if let Some(age) = age {
        map.insert("age".to_string(), json!(age));
    }
    Value::Object(map)
}

fn username() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{3,30}"
}

fn email() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}(\\.[a-z0-9]{1,8})?@[a-z0-9]{1,12}\\.[a-z]{2,6}"
}

proptest! {
    #[test]
    fn prop_valid_records_pass(
        name in username(),
        mail in email(),
        age in proptest::option::of(18i64..=100),
    ) {
        let input = record(Some(name), Some(mail), age);
        let result = signup().validate(&input);
        prop_assert_eq!(result.into_result().unwrap(), input);
    }

    #[test]
    fn prop_missing_username_is_reported(mail in email(), age in 18i64..=100) {
        let errors = unwrap_failure(signup().validate(&record(None, Some(mail), Some(age))));
        prop_assert_eq!(errors.first().path.to_string(), "username");
        prop_assert_eq!(errors.first().code.as_str(), "any.required");
    }

    #[test]
    fn prop_missing_email_is_reported(name in username(), age in 18i64..=100) {
        let errors = unwrap_failure(signup().validate(&record(Some(name), None, Some(age))));
        prop_assert_eq!(errors.first().path.to_string(), "email");
        prop_assert_eq!(errors.first().code.as_str(), "any.required");
    }

    #[test]
    fn prop_out_of_range_age_is_reported(
        name in username(),
        mail in email(),
        age in prop_oneof![-1000i64..18, 101i64..1000],
    ) {
        let errors = unwrap_failure(signup().validate(&record(Some(name), Some(mail), Some(age))));
        let error = errors.first();
        prop_assert_eq!(error.path.to_string(), "age");
        let expected = if age < 18 { "number.min" } else { "number.max" };
        prop_assert_eq!(error.code.as_str(), expected);
    }
}
