//! Exclusion policy.
//!
//! Excluded fields keep their default value. Excluded types are never
//! populated: wherever they appear (top level, field, container element)
//! they yield `Value::default_for(type)`.

use crate::predicate::{FieldKey, FieldPredicate, TypePredicate};
use fixture_core::{FieldDescriptor, TypeCatalog, TypeRef};
use std::collections::HashSet;

/// Decides which fields and types are left unpopulated.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPolicy {
    field_keys: HashSet<FieldKey>,
    field_predicates: Vec<FieldPredicate>,
    type_predicates: Vec<TypePredicate>,
}

impl ExclusionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude exactly one field.
    pub fn exclude_field(&mut self, key: FieldKey) {
        self.field_keys.insert(key);
    }

    /// Exclude every field matching `predicate`.
    pub fn exclude_fields(&mut self, predicate: FieldPredicate) {
        self.field_predicates.push(predicate);
    }

    /// Exclude every type matching `predicate`.
    pub fn exclude_types(&mut self, predicate: TypePredicate) {
        self.type_predicates.push(predicate);
    }

    pub fn is_empty(&self) -> bool {
        self.field_keys.is_empty()
            && self.field_predicates.is_empty()
            && self.type_predicates.is_empty()
    }

    /// Check if `field` should be left at its default value.
    ///
    /// A field whose declared type is excluded is excluded as well.
    pub fn should_skip_field(&self, field: &FieldDescriptor, catalog: &TypeCatalog) -> bool {
        self.field_keys.contains(&FieldKey::of(field))
            || self.field_predicates.iter().any(|p| p.test(field))
            || self.should_skip_type(&field.field_type, catalog)
    }

    /// Check if `ty` should never be populated.
    pub fn should_skip_type(&self, ty: &TypeRef, catalog: &TypeCatalog) -> bool {
        if self.type_predicates.is_empty() {
            return false;
        }
        let descriptor = ty.as_named().and_then(|name| catalog.get_type(name));
        self.type_predicates.iter().any(|p| p.test(ty, descriptor))
    }
}
