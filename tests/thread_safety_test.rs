//! Tests for sharing schemas and the registry across threads.

use conform::{validate_batch, Schema, SchemaLike, SchemaRegistry, ValidationOptions};
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;

fn user_schema() -> conform::ObjectSchema {
    Schema::object()
        .key("name", Schema::string().alphanum().required())
        .key("age", Schema::number().integer().positive())
}

#[test]
fn test_concurrent_validation() {
    let registry = Arc::new(SchemaRegistry::new());
    registry.register("User", user_schema()).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let result = registry
                    .validate("User", &json!({"name": format!("User{}", i), "age": 20 + i}))
                    .unwrap();
                assert!(result.is_success());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_registration_and_lookup() {
    let registry = SchemaRegistry::new();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                let name = format!("Schema{}", i);
                registry.register(name.clone(), Schema::string()).unwrap();
                assert!(registry.get(&name).is_some());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.len(), 8);
}

#[test]
fn test_shared_schema_gives_same_answers_on_every_thread() {
    let schema: Arc<dyn SchemaLike> = Arc::new(user_schema());
    let inputs = vec![
        json!({"name": "ada", "age": 36}),
        json!({"name": "no spaces", "age": 36}),
        json!({"age": -1}),
    ];
    let expected: Vec<_> = inputs.iter().map(|v| schema.validate(v).into_result()).collect();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let schema = Arc::clone(&schema);
            let inputs = inputs.clone();
            thread::spawn(move || {
                inputs
                    .iter()
                    .map(|v| schema.validate(v).into_result())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_batch_validation_preserves_input_order() {
    let values: Vec<Value> = (0..200)
        .map(|i| {
            if i % 3 == 0 {
                json!({"age": i})
            } else {
                json!({"name": format!("u{}", i), "age": i + 1})
            }
        })
        .collect();

    let results = validate_batch(&user_schema(), &values, &ValidationOptions::default());
    assert_eq!(results.len(), values.len());
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.is_failure(), i % 3 == 0, "record {}", i);
    }
}

#[test]
fn test_registry_batch_uses_registry_options() {
    let registry = SchemaRegistry::new().with_options(ValidationOptions::default().abort_early(false));
    registry.register("User", user_schema()).unwrap();

    let results = registry
        .validate_batch("User", &[json!({"age": 1.5}), json!({"name": "ok"})])
        .unwrap();
    assert!(results[1].is_success());
    let first = results.into_iter().next().unwrap().into_result().unwrap_err();
    assert_eq!(first.len(), 2);
}
