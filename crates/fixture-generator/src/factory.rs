//! Object creation.
//!
//! The factory turns a catalog type name into an empty instance (every field
//! at its default value). Two collaborators can be swapped in:
//! - a [`SubstitutionProvider`] replacing a type by another before creation
//! - a [`ConcreteTypeResolver`] listing concrete candidates for abstract types
//!   and interfaces

use crate::context::PopulationContext;
use crate::error::PopulateError;
use fixture_core::{Object, TypeCatalog};
use rand::Rng;
use std::collections::HashMap;
use tracing::trace;

/// Lists the concrete types that can stand in for an abstract type or interface.
pub trait ConcreteTypeResolver: Send + Sync {
    /// Candidate type names, in a deterministic order.
    fn candidates(&self, abstract_type: &str, catalog: &TypeCatalog) -> Vec<String>;
}

/// Resolves abstract types to the constructible concrete catalog types that
/// extend or implement them, directly or transitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogTypeResolver;

impl ConcreteTypeResolver for CatalogTypeResolver {
    fn candidates(&self, abstract_type: &str, catalog: &TypeCatalog) -> Vec<String> {
        catalog
            .types()
            .iter()
            .filter(|t| !t.is_abstract() && !t.is_enum() && t.constructible)
            .filter(|t| catalog.is_subtype_of(&t.name, abstract_type))
            .map(|t| t.name.clone())
            .collect()
    }
}

/// Replaces a type by another one before it is created.
pub trait SubstitutionProvider: Send + Sync {
    fn substitute(&self, type_name: &str) -> Option<&str>;
}

/// Fixed type-to-replacement mapping.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    replacements: HashMap<String, String>,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>, replacement: impl Into<String>) {
        self.replacements.insert(type_name.into(), replacement.into());
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

impl SubstitutionProvider for SubstitutionTable {
    fn substitute(&self, type_name: &str) -> Option<&str> {
        self.replacements.get(type_name).map(String::as_str)
    }
}

/// Creates empty instances of catalog types.
pub struct ObjectFactory {
    resolver: Box<dyn ConcreteTypeResolver>,
    substitutions: Box<dyn SubstitutionProvider>,
    scan_for_concrete_types: bool,
}

impl ObjectFactory {
    pub fn new(
        resolver: Box<dyn ConcreteTypeResolver>,
        substitutions: Box<dyn SubstitutionProvider>,
        scan_for_concrete_types: bool,
    ) -> Self {
        Self {
            resolver,
            substitutions,
            scan_for_concrete_types,
        }
    }

    /// Create an empty instance for `type_name`.
    ///
    /// The returned object is named after the type actually created, which
    /// differs from `type_name` after substitution or abstract resolution.
    pub fn create(
        &self,
        type_name: &str,
        catalog: &TypeCatalog,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Object, PopulateError> {
        let fail = |ctx: &PopulationContext<'_>, name: &str, reason: String| {
            PopulateError::ObjectCreation {
                type_name: name.to_string(),
                path: ctx.current_path(),
                reason,
            }
        };

        let mut name = type_name;
        if let Some(replacement) = self.substitutions.substitute(type_name) {
            if catalog.get_type(replacement).is_none() {
                return Err(fail(
                    ctx,
                    type_name,
                    format!("substitute type '{replacement}' is not in the catalog"),
                ));
            }
            trace!("Substituting '{}' with '{}'", type_name, replacement);
            name = replacement;
        }

        let descriptor = catalog
            .get_type(name)
            .ok_or_else(|| fail(ctx, name, "type is not in the catalog".to_string()))?;

        let concrete = if descriptor.is_abstract() {
            if !self.scan_for_concrete_types {
                return Err(fail(
                    ctx,
                    name,
                    "abstract type or interface, and scanning for concrete types is disabled"
                        .to_string(),
                ));
            }
            let candidates = self.resolver.candidates(name, catalog);
            if candidates.is_empty() {
                return Err(fail(ctx, name, "no concrete subtype found".to_string()));
            }
            let picked = candidates[ctx.source().gen_range(0..candidates.len())].clone();
            trace!(
                "Resolved '{}' to '{}' out of {} candidates",
                name,
                picked,
                candidates.len()
            );
            catalog
                .get_type(&picked)
                .ok_or_else(|| fail(ctx, &picked, "resolved type is not in the catalog".to_string()))?
        } else {
            descriptor
        };

        if concrete.is_enum() {
            return Err(fail(
                ctx,
                &concrete.name,
                "enum types are not instantiated".to_string(),
            ));
        }
        if !concrete.constructible {
            return Err(fail(
                ctx,
                &concrete.name,
                "type has no accessible constructor".to_string(),
            ));
        }

        let fields = catalog.fields_of(&concrete.name)?;
        Ok(Object::with_defaults(&concrete.name, fields))
    }
}

impl Default for ObjectFactory {
    fn default() -> Self {
        Self::new(
            Box::new(CatalogTypeResolver),
            Box::new(SubstitutionTable::new()),
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ValueSource;
    use fixture_core::{FieldDescriptor, TypeDescriptor, TypeRef, Value};

    fn catalog() -> TypeCatalog {
        TypeCatalog::new(vec![
            TypeDescriptor::interface("Mammal"),
            TypeDescriptor::abstract_type(
                "Primate",
                vec![FieldDescriptor::new("name", TypeRef::String)],
            )
            .implementing("Mammal"),
            TypeDescriptor::concrete("Ape", vec![FieldDescriptor::new("age", TypeRef::Int)])
                .extending("Primate"),
            TypeDescriptor::concrete("Human", Vec::new()).extending("Primate"),
            TypeDescriptor {
                constructible: false,
                ..TypeDescriptor::concrete("Clone", Vec::new()).implementing("Mammal")
            },
            TypeDescriptor::interface("Unicorn"),
        ])
        .unwrap()
    }

    fn scanning_factory() -> ObjectFactory {
        ObjectFactory::new(
            Box::new(CatalogTypeResolver),
            Box::new(SubstitutionTable::new()),
            true,
        )
    }

    #[test]
    fn test_resolver_candidates() {
        let catalog = catalog();
        assert_eq!(
            CatalogTypeResolver.candidates("Mammal", &catalog),
            vec!["Ape".to_string(), "Human".to_string()]
        );
        assert!(CatalogTypeResolver.candidates("Unicorn", &catalog).is_empty());
    }

    #[test]
    fn test_create_concrete_with_defaults() {
        let catalog = catalog();
        let mut source = ValueSource::new(1);
        let mut ctx = PopulationContext::new(&mut source, 1);

        let ape = ObjectFactory::default().create("Ape", &catalog, &mut ctx).unwrap();
        assert_eq!(ape.type_name, "Ape");
        assert_eq!(ape.get("age"), Some(&Value::Int(0)));
        assert_eq!(ape.get("name"), Some(&Value::Null));
    }

    #[test]
    fn test_abstract_without_scanning_fails() {
        let catalog = catalog();
        let mut source = ValueSource::new(1);
        let mut ctx = PopulationContext::new(&mut source, 1);

        let err = ObjectFactory::default()
            .create("Mammal", &catalog, &mut ctx)
            .unwrap_err();
        match err {
            PopulateError::ObjectCreation { type_name, path, .. } => {
                assert_eq!(type_name, "Mammal");
                assert_eq!(path, "<root>");
            }
            other => panic!("Expected ObjectCreation, got {other:?}"),
        }
    }

    #[test]
    fn test_abstract_with_scanning_picks_candidate() {
        let catalog = catalog();
        let mut source = ValueSource::new(1);
        let mut ctx = PopulationContext::new(&mut source, 1);
        let factory = scanning_factory();

        for _ in 0..20 {
            let obj = factory.create("Mammal", &catalog, &mut ctx).unwrap();
            assert!(obj.type_name == "Ape" || obj.type_name == "Human");
        }
        assert!(matches!(
            factory.create("Unicorn", &catalog, &mut ctx),
            Err(PopulateError::ObjectCreation { .. })
        ));
    }

    #[test]
    fn test_non_constructible_fails() {
        let catalog = catalog();
        let mut source = ValueSource::new(1);
        let mut ctx = PopulationContext::new(&mut source, 1);
        assert!(matches!(
            ObjectFactory::default().create("Clone", &catalog, &mut ctx),
            Err(PopulateError::ObjectCreation { .. })
        ));
    }

    #[test]
    fn test_substitution() {
        let catalog = catalog();
        let mut source = ValueSource::new(1);
        let mut ctx = PopulationContext::new(&mut source, 1);

        let mut table = SubstitutionTable::new();
        table.insert("Mammal", "Human");
        table.insert("Ape", "Yeti");
        let factory = ObjectFactory::new(Box::new(CatalogTypeResolver), Box::new(table), false);

        let obj = factory.create("Mammal", &catalog, &mut ctx).unwrap();
        assert_eq!(obj.type_name, "Human");
        assert!(matches!(
            factory.create("Ape", &catalog, &mut ctx),
            Err(PopulateError::ObjectCreation { .. })
        ));
    }
}
