//! Field and type predicates.
//!
//! Predicates select the fields and types that overrides and exclusions apply
//! to. They compose with [`and`](FieldPredicate::and), [`or`](FieldPredicate::or)
//! and [`negate`](FieldPredicate::negate).

use fixture_core::{FieldDescriptor, Modifier, TypeDescriptor, TypeRef};
use std::fmt;
use std::sync::Arc;

/// Exact identity of a field: name, declared type and owning type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub name: String,
    pub field_type: TypeRef,
    pub owner: String,
}

impl FieldKey {
    pub fn new(name: impl Into<String>, field_type: TypeRef, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            owner: owner.into(),
        }
    }

    /// Key of an existing field descriptor.
    pub fn of(field: &FieldDescriptor) -> Self {
        Self::new(&field.name, field.field_type.clone(), &field.owner)
    }

    /// Check if `field` is the field identified by this key.
    pub fn matches(&self, field: &FieldDescriptor) -> bool {
        self.name == field.name && self.field_type == field.field_type && self.owner == field.owner
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.name, self.field_type)
    }
}

type FieldTest = dyn Fn(&FieldDescriptor) -> bool + Send + Sync;

/// Predicate over field descriptors.
#[derive(Clone)]
pub struct FieldPredicate(Arc<FieldTest>);

impl FieldPredicate {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&FieldDescriptor) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(test))
    }

    pub fn test(&self, field: &FieldDescriptor) -> bool {
        (self.0)(field)
    }

    /// Fields with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |f| f.name == name)
    }

    /// Fields declared with the given type.
    pub fn of_type(ty: TypeRef) -> Self {
        Self::new(move |f| f.field_type == ty)
    }

    /// Fields declared by the given type.
    pub fn in_type(owner: impl Into<String>) -> Self {
        let owner = owner.into();
        Self::new(move |f| f.owner == owner)
    }

    /// Fields carrying every given modifier.
    pub fn has_modifiers(modifiers: &[Modifier]) -> Self {
        let modifiers = modifiers.to_vec();
        Self::new(move |f| f.has_modifiers(&modifiers))
    }

    /// Fields carrying the given annotation.
    pub fn annotated_with(annotation: impl Into<String>) -> Self {
        let annotation = annotation.into();
        Self::new(move |f| f.is_annotated_with(&annotation))
    }

    pub fn and(self, other: FieldPredicate) -> Self {
        Self::new(move |f| self.test(f) && other.test(f))
    }

    pub fn or(self, other: FieldPredicate) -> Self {
        Self::new(move |f| self.test(f) || other.test(f))
    }

    pub fn negate(self) -> Self {
        Self::new(move |f| !self.test(f))
    }
}

impl fmt::Debug for FieldPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldPredicate")
    }
}

impl From<FieldKey> for FieldPredicate {
    fn from(key: FieldKey) -> Self {
        Self::new(move |f| key.matches(f))
    }
}

type TypeTest = dyn Fn(&TypeRef, Option<&TypeDescriptor>) -> bool + Send + Sync;

/// Predicate over types.
///
/// The catalog descriptor is passed along for named types so predicates can
/// look at the kind of the type.
#[derive(Clone)]
pub struct TypePredicate(Arc<TypeTest>);

impl TypePredicate {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&TypeRef, Option<&TypeDescriptor>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(test))
    }

    pub fn test(&self, ty: &TypeRef, descriptor: Option<&TypeDescriptor>) -> bool {
        (self.0)(ty, descriptor)
    }

    /// Exactly the given type.
    pub fn is(ty: TypeRef) -> Self {
        Self::new(move |t, _| *t == ty)
    }

    /// The catalog type with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |t, _| t.as_named() == Some(name.as_str()))
    }

    /// Abstract types and interfaces.
    pub fn is_abstract() -> Self {
        Self::new(|_, d| d.is_some_and(TypeDescriptor::is_abstract))
    }

    /// Enum types.
    pub fn is_enum() -> Self {
        Self::new(|_, d| d.is_some_and(TypeDescriptor::is_enum))
    }

    /// Container types.
    pub fn is_container() -> Self {
        Self::new(|t, _| t.is_container())
    }

    pub fn and(self, other: TypePredicate) -> Self {
        Self::new(move |t, d| self.test(t, d) && other.test(t, d))
    }

    pub fn or(self, other: TypePredicate) -> Self {
        Self::new(move |t, d| self.test(t, d) || other.test(t, d))
    }

    pub fn negate(self) -> Self {
        Self::new(move |t, d| !self.test(t, d))
    }
}

impl fmt::Debug for TypePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypePredicate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_field() -> FieldDescriptor {
        FieldDescriptor::new("name", TypeRef::String)
            .in_type("Person")
            .with_modifiers(&[Modifier::Private, Modifier::Final])
            .with_annotation("NotNull")
    }

    #[test]
    fn test_simple_field_predicates() {
        let field = name_field();
        assert!(FieldPredicate::named("name").test(&field));
        assert!(!FieldPredicate::named("age").test(&field));
        assert!(FieldPredicate::of_type(TypeRef::String).test(&field));
        assert!(FieldPredicate::in_type("Person").test(&field));
        assert!(!FieldPredicate::in_type("Street").test(&field));
        assert!(FieldPredicate::has_modifiers(&[Modifier::Final]).test(&field));
        assert!(!FieldPredicate::has_modifiers(&[Modifier::Final, Modifier::Static]).test(&field));
        assert!(FieldPredicate::annotated_with("NotNull").test(&field));
    }

    #[test]
    fn test_field_predicate_combinators() {
        let field = name_field();
        let in_street = FieldPredicate::named("name").and(FieldPredicate::in_type("Street"));
        assert!(!in_street.test(&field));

        let either = FieldPredicate::named("age").or(FieldPredicate::of_type(TypeRef::String));
        assert!(either.test(&field));

        assert!(!FieldPredicate::named("name").negate().test(&field));
    }

    #[test]
    fn test_field_key() {
        let field = name_field();
        let key = FieldKey::of(&field);
        assert!(key.matches(&field));
        assert_eq!(key.to_string(), "Person.name: string");

        let other_owner = FieldKey::new("name", TypeRef::String, "Street");
        assert!(!other_owner.matches(&field));
        assert!(!FieldPredicate::from(other_owner).test(&field));
    }

    #[test]
    fn test_type_predicates() {
        let animal = TypeDescriptor::interface("Animal");
        let gender = TypeDescriptor::enumeration("Gender", &["MALE", "FEMALE"]);
        let animal_ref = TypeRef::named("Animal");

        assert!(TypePredicate::is_abstract().test(&animal_ref, Some(&animal)));
        assert!(!TypePredicate::is_abstract().test(&TypeRef::Int, None));
        assert!(TypePredicate::is_enum().test(&TypeRef::named("Gender"), Some(&gender)));
        assert!(TypePredicate::named("Animal").test(&animal_ref, Some(&animal)));
        assert!(TypePredicate::is(TypeRef::Int).test(&TypeRef::Int, None));
        assert!(TypePredicate::is_container().test(&TypeRef::list(TypeRef::Int), None));
        assert!(TypePredicate::is(TypeRef::Int)
            .or(TypePredicate::is(TypeRef::Long))
            .and(TypePredicate::is(TypeRef::Long).negate())
            .test(&TypeRef::Int, None));
    }
}
