//! Shared helpers for the integration tests.

#![allow(dead_code)]

use fixture_core::{TypeCatalog, Value};
use fixture_generator::{ObjectGenerator, ObjectGeneratorBuilder, Parameters};

const BEANS: &str = include_str!("../fixtures/beans.yaml");

/// Load the bean catalog.
pub fn beans() -> TypeCatalog {
    TypeCatalog::from_yaml(BEANS).expect("bean catalog should parse")
}

/// Builder over the bean catalog.
pub fn builder() -> ObjectGeneratorBuilder {
    ObjectGenerator::builder(beans())
}

/// Generator over the bean catalog with the given parameters.
pub fn generator(params: Parameters) -> ObjectGenerator {
    ObjectGenerator::new(beans(), params).expect("generator should build")
}

/// Number of nested object levels in a value.
pub fn object_depth(value: &Value) -> usize {
    match value {
        Value::Object(obj) => 1 + obj.fields.values().map(object_depth).max().unwrap_or(0),
        Value::List(items) | Value::Set(items) | Value::Array(items) => {
            items.iter().map(object_depth).max().unwrap_or(0)
        }
        Value::Map(entries) => entries
            .iter()
            .map(|(k, v)| object_depth(k).max(object_depth(v)))
            .max()
            .unwrap_or(0),
        _ => 0,
    }
}
