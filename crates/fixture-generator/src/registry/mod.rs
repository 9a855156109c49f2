//! Randomizer registries and the resolution chain.
//!
//! For a field, the chain consults in this order (first match wins):
//! 1. exact field overrides
//! 2. field-predicate overrides, in registration order
//! 3. type overrides
//! 4. user registries, in registration order
//! 5. the built-in registry
//!
//! For a bare type, only type lookups apply, so the first two never match.

mod builtin;
mod overrides;

pub use builtin::BuiltinRegistry;
pub use overrides::{FieldOverrideRegistry, PredicateRegistry, TypeOverrideRegistry};

use crate::randomizers::SharedRandomizer;
use fixture_core::{FieldDescriptor, TypeRef};

/// Source of randomizers for fields and types.
///
/// Registries must be read-only once seeded: the same field or type resolves
/// to the same randomizer for the life of a generator.
pub trait Registry: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Receive the session seed. Called before first use and on every reseed.
    fn set_seed(&mut self, _seed: u64) {}

    /// Randomizer for a field, if this registry has one.
    ///
    /// Defaults to the randomizer for the field's declared type.
    fn resolve_field(&self, field: &FieldDescriptor) -> Option<SharedRandomizer> {
        self.resolve_type(&field.field_type)
    }

    /// Randomizer for a type, if this registry has one.
    fn resolve_type(&self, ty: &TypeRef) -> Option<SharedRandomizer>;
}

/// The ordered set of registries of a generator.
pub struct RegistryChain {
    field_overrides: FieldOverrideRegistry,
    predicate_overrides: PredicateRegistry,
    type_overrides: TypeOverrideRegistry,
    user: Vec<Box<dyn Registry>>,
    builtin: BuiltinRegistry,
}

impl RegistryChain {
    pub fn new(
        field_overrides: FieldOverrideRegistry,
        predicate_overrides: PredicateRegistry,
        type_overrides: TypeOverrideRegistry,
        user: Vec<Box<dyn Registry>>,
        builtin: BuiltinRegistry,
    ) -> Self {
        Self {
            field_overrides,
            predicate_overrides,
            type_overrides,
            user,
            builtin,
        }
    }

    fn registries(&self) -> impl Iterator<Item = &dyn Registry> + '_ {
        let overrides: [&dyn Registry; 3] = [
            &self.field_overrides,
            &self.predicate_overrides,
            &self.type_overrides,
        ];
        let builtin: &dyn Registry = &self.builtin;
        overrides
            .into_iter()
            .chain(self.user.iter().map(|r| r.as_ref() as &dyn Registry))
            .chain(std::iter::once(builtin))
    }

    /// Forward the session seed to every registry.
    pub fn set_seed(&mut self, seed: u64) {
        self.field_overrides.set_seed(seed);
        self.predicate_overrides.set_seed(seed);
        self.type_overrides.set_seed(seed);
        for registry in &mut self.user {
            registry.set_seed(seed);
        }
        self.builtin.set_seed(seed);
    }

    /// First randomizer for `field` in chain order.
    pub fn resolve_field(&self, field: &FieldDescriptor) -> Option<SharedRandomizer> {
        self.registries().find_map(|r| r.resolve_field(field))
    }

    /// First randomizer for `ty` in chain order.
    pub fn resolve_type(&self, ty: &TypeRef) -> Option<SharedRandomizer> {
        self.registries().find_map(|r| r.resolve_type(ty))
    }

    /// The built-in registry, used directly for primitive array elements.
    pub fn builtin(&self) -> &BuiltinRegistry {
        &self.builtin
    }

    /// Names of all registries, in chain order.
    pub fn names(&self) -> Vec<&str> {
        self.registries().map(|r| r.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;
    use crate::predicate::{FieldKey, FieldPredicate};
    use crate::random::ValueSource;
    use crate::randomizers::{ConstantRandomizer, Randomizer};
    use fixture_core::{TypeCatalog, Value};
    use std::sync::{Arc, Mutex};

    struct RecordingRegistry {
        seeds: Arc<Mutex<Vec<u64>>>,
    }

    impl Registry for RecordingRegistry {
        fn name(&self) -> &str {
            "recording"
        }

        fn set_seed(&mut self, seed: u64) {
            self.seeds.lock().unwrap().push(seed);
        }

        fn resolve_type(&self, ty: &TypeRef) -> Option<SharedRandomizer> {
            match ty {
                TypeRef::Long => Some(Arc::new(ConstantRandomizer::new(Value::Long(-1)))),
                _ => None,
            }
        }
    }

    fn constant(value: &str) -> SharedRandomizer {
        Arc::new(ConstantRandomizer::new(value))
    }

    fn produce(randomizer: Option<SharedRandomizer>) -> Value {
        randomizer.unwrap().produce(&mut ValueSource::new(0))
    }

    fn chain(seeds: Arc<Mutex<Vec<u64>>>) -> RegistryChain {
        let mut field_overrides = FieldOverrideRegistry::new();
        field_overrides.register(FieldKey::new("name", TypeRef::String, "Person"), constant("exact"));
        let mut predicate_overrides = PredicateRegistry::new();
        predicate_overrides.register(FieldPredicate::named("name"), constant("predicate"));
        predicate_overrides.register(FieldPredicate::named("nickname"), constant("nickname"));
        let mut type_overrides = TypeOverrideRegistry::new();
        type_overrides.register(TypeRef::String, constant("type"));

        let builtin =
            BuiltinRegistry::new(&Parameters::default(), &TypeCatalog::default()).unwrap();
        RegistryChain::new(
            field_overrides,
            predicate_overrides,
            type_overrides,
            vec![Box::new(RecordingRegistry { seeds })],
            builtin,
        )
    }

    #[test]
    fn test_resolution_order() {
        let chain = chain(Arc::new(Mutex::new(Vec::new())));

        let person_name = FieldDescriptor::new("name", TypeRef::String).in_type("Person");
        let street_name = FieldDescriptor::new("name", TypeRef::String).in_type("Street");
        let city = FieldDescriptor::new("city", TypeRef::String).in_type("Address");

        assert_eq!(produce(chain.resolve_field(&person_name)), Value::from("exact"));
        assert_eq!(produce(chain.resolve_field(&street_name)), Value::from("predicate"));
        assert_eq!(produce(chain.resolve_field(&city)), Value::from("type"));
    }

    #[test]
    fn test_bare_type_skips_field_registries() {
        let chain = chain(Arc::new(Mutex::new(Vec::new())));
        assert_eq!(produce(chain.resolve_type(&TypeRef::String)), Value::from("type"));
        assert_eq!(produce(chain.resolve_type(&TypeRef::Long)), Value::Long(-1));
        assert!(matches!(produce(chain.resolve_type(&TypeRef::Int)), Value::Int(_)));
        assert!(chain.resolve_type(&TypeRef::named("Person")).is_none());
        assert!(chain.resolve_type(&TypeRef::list(TypeRef::Int)).is_none());
    }

    #[test]
    fn test_same_randomizer_instance() {
        let chain = chain(Arc::new(Mutex::new(Vec::new())));
        let field = FieldDescriptor::new("age", TypeRef::Int).in_type("Person");
        let a = chain.resolve_field(&field).unwrap();
        let b = chain.resolve_field(&field).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_set_seed_reaches_user_registries() {
        let seeds = Arc::new(Mutex::new(Vec::new()));
        let mut chain = chain(seeds.clone());
        chain.set_seed(7);
        chain.set_seed(8);
        assert_eq!(*seeds.lock().unwrap(), vec![7, 8]);
        assert_eq!(
            chain.names(),
            vec!["field-overrides", "predicate-overrides", "type-overrides", "recording", "builtin"]
        );
    }
}
