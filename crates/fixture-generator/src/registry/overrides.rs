//! Registries holding user-supplied overrides.

use super::Registry;
use crate::predicate::{FieldKey, FieldPredicate};
use crate::randomizers::SharedRandomizer;
use fixture_core::{FieldDescriptor, TypeRef};
use std::collections::HashMap;

/// Overrides for exactly identified fields.
#[derive(Default)]
pub struct FieldOverrideRegistry {
    randomizers: HashMap<FieldKey, SharedRandomizer>,
}

impl FieldOverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `randomizer` for the field identified by `key`, replacing any earlier one.
    pub fn register(&mut self, key: FieldKey, randomizer: SharedRandomizer) {
        self.randomizers.insert(key, randomizer);
    }

    pub fn len(&self) -> usize {
        self.randomizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.randomizers.is_empty()
    }
}

impl Registry for FieldOverrideRegistry {
    fn name(&self) -> &str {
        "field-overrides"
    }

    fn resolve_field(&self, field: &FieldDescriptor) -> Option<SharedRandomizer> {
        if self.randomizers.is_empty() {
            return None;
        }
        self.randomizers.get(&FieldKey::of(field)).cloned()
    }

    fn resolve_type(&self, _ty: &TypeRef) -> Option<SharedRandomizer> {
        None
    }
}

/// Overrides for fields matching a predicate, tried in registration order.
#[derive(Default)]
pub struct PredicateRegistry {
    entries: Vec<(FieldPredicate, SharedRandomizer)>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, predicate: FieldPredicate, randomizer: SharedRandomizer) {
        self.entries.push((predicate, randomizer));
    }
}

impl Registry for PredicateRegistry {
    fn name(&self) -> &str {
        "predicate-overrides"
    }

    fn resolve_field(&self, field: &FieldDescriptor) -> Option<SharedRandomizer> {
        self.entries
            .iter()
            .find(|(predicate, _)| predicate.test(field))
            .map(|(_, randomizer)| randomizer.clone())
    }

    fn resolve_type(&self, _ty: &TypeRef) -> Option<SharedRandomizer> {
        None
    }
}

/// Overrides keyed by declared type.
#[derive(Default)]
pub struct TypeOverrideRegistry {
    randomizers: HashMap<TypeRef, SharedRandomizer>,
}

impl TypeOverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `randomizer` for `ty`, replacing any earlier one.
    pub fn register(&mut self, ty: TypeRef, randomizer: SharedRandomizer) {
        self.randomizers.insert(ty, randomizer);
    }
}

impl Registry for TypeOverrideRegistry {
    fn name(&self) -> &str {
        "type-overrides"
    }

    fn resolve_type(&self, ty: &TypeRef) -> Option<SharedRandomizer> {
        self.randomizers.get(ty).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ValueSource;
    use crate::randomizers::{ConstantRandomizer, Randomizer};
    use fixture_core::Value;
    use std::sync::Arc;

    #[test]
    fn test_field_override_replaces_earlier_registration() {
        let mut registry = FieldOverrideRegistry::new();
        let key = FieldKey::new("age", TypeRef::Int, "Person");
        registry.register(key.clone(), Arc::new(ConstantRandomizer::new(1)));
        registry.register(key, Arc::new(ConstantRandomizer::new(2)));
        assert_eq!(registry.len(), 1);

        let field = FieldDescriptor::new("age", TypeRef::Int).in_type("Person");
        let randomizer = registry.resolve_field(&field).unwrap();
        assert_eq!(randomizer.produce(&mut ValueSource::new(0)), Value::Int(2));
        assert!(registry.resolve_type(&TypeRef::Int).is_none());
    }

    #[test]
    fn test_first_matching_predicate_wins() {
        let mut registry = PredicateRegistry::new();
        registry.register(FieldPredicate::of_type(TypeRef::Int), Arc::new(ConstantRandomizer::new(1)));
        registry.register(FieldPredicate::named("age"), Arc::new(ConstantRandomizer::new(2)));

        let field = FieldDescriptor::new("age", TypeRef::Int);
        let randomizer = registry.resolve_field(&field).unwrap();
        assert_eq!(randomizer.produce(&mut ValueSource::new(0)), Value::Int(1));
        assert!(registry.resolve_field(&FieldDescriptor::new("x", TypeRef::Long)).is_none());
    }

    #[test]
    fn test_type_override() {
        let mut registry = TypeOverrideRegistry::new();
        registry.register(TypeRef::list(TypeRef::String), Arc::new(ConstantRandomizer::new(Value::List(Vec::new()))));

        let field = FieldDescriptor::new("tags", TypeRef::list(TypeRef::String));
        assert!(registry.resolve_field(&field).is_some());
        assert!(registry.resolve_type(&TypeRef::list(TypeRef::Int)).is_none());
    }
}
