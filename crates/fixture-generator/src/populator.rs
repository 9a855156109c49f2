//! Graph population.
//!
//! [`GraphPopulator`] walks a type's structure and fills it:
//!
//! 1. `type_token` values are never populated (`Null`)
//! 2. excluded types keep their default value
//! 3. a randomizer from the registry chain wins over structure
//! 4. containers go to the [`ContainerStrategy`]
//! 5. `any` becomes an empty object
//! 6. catalog types pass the cycle guard, get created by the
//!    [`ObjectFactory`] and have their fields populated one by one
//!
//! A type that already occurs `randomization_depth` times on the current
//! path is not recursed into: a placeholder with default field values is
//! produced instead, which bounds every traversal.

use crate::container::{ContainerStrategy, ElementPopulator};
use crate::context::PopulationContext;
use crate::error::PopulateError;
use crate::exclusion::ExclusionPolicy;
use crate::factory::ObjectFactory;
use crate::parameters::Parameters;
use crate::randomizers::{Randomizer, SharedRandomizer};
use crate::registry::{Registry, RegistryChain};
use fixture_core::{Object, TypeCatalog, TypeRef, Value};
use tracing::trace;

/// Immutable population machinery shared by every call of a generator.
pub struct GraphPopulator {
    catalog: TypeCatalog,
    registries: RegistryChain,
    exclusions: ExclusionPolicy,
    containers: ContainerStrategy,
    factory: ObjectFactory,
}

impl GraphPopulator {
    pub fn new(
        catalog: TypeCatalog,
        params: &Parameters,
        registries: RegistryChain,
        exclusions: ExclusionPolicy,
        factory: ObjectFactory,
    ) -> Self {
        Self {
            catalog,
            registries,
            exclusions,
            containers: ContainerStrategy::new(params.collection_size_range),
            factory,
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn registries_mut(&mut self) -> &mut RegistryChain {
        &mut self.registries
    }

    /// Populate a value of type `ty`.
    pub fn populate(
        &self,
        ty: &TypeRef,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, PopulateError> {
        if *ty == TypeRef::TypeToken {
            return Ok(Value::Null);
        }
        if self.exclusions.should_skip_type(ty, &self.catalog) {
            return Ok(Value::default_for(ty));
        }
        if let Some(randomizer) = self.registries.resolve_type(ty) {
            return Ok(randomizer.produce(ctx.source()));
        }
        self.populate_structure(ty, ctx)
    }

    /// Populate `ty` from its structure alone, without consulting registries.
    fn populate_structure(
        &self,
        ty: &TypeRef,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, PopulateError> {
        match ty {
            TypeRef::TypeToken => Ok(Value::Null),
            TypeRef::Any => Ok(Value::Object(Object::new("any"))),
            TypeRef::Named(name) => self.populate_object(name, ctx),
            _ if ty.is_container() => self.containers.fill(ty, self, ctx),
            _ => Err(PopulateError::ObjectCreation {
                type_name: ty.to_string(),
                path: ctx.current_path(),
                reason: "no randomizer is registered for this type".to_string(),
            }),
        }
    }

    fn populate_object(
        &self,
        name: &str,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, PopulateError> {
        let descriptor = self
            .catalog
            .get_type(name)
            .ok_or_else(|| PopulateError::ObjectCreation {
                type_name: name.to_string(),
                path: ctx.current_path(),
                reason: "type is not in the catalog".to_string(),
            })?;

        // Enums with variants resolve through the built-in registry
        if descriptor.is_enum() {
            return Ok(Value::Null);
        }

        if !ctx.try_enter(name) {
            trace!(
                "Type '{}' already occurs {} times on path '{}', using a placeholder",
                name,
                ctx.occurrences(name),
                ctx.current_path()
            );
            let fields = self.catalog.fields_of(name)?;
            return Ok(Value::Object(Object::with_defaults(name, fields)));
        }

        let result = self.populate_fields(name, ctx);
        ctx.exit(name);
        result.map(Value::Object)
    }

    fn populate_fields(
        &self,
        name: &str,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Object, PopulateError> {
        let mut object = self.factory.create(name, &self.catalog, ctx)?;
        let fields = self.catalog.fields_of(&object.type_name)?;

        for field in fields {
            if field.is_static() || field.field_type == TypeRef::TypeToken {
                continue;
            }
            if self.exclusions.should_skip_field(field, &self.catalog) {
                continue;
            }

            ctx.push_field(&field.name);
            let value = match self.registries.resolve_field(field) {
                Some(randomizer) => Ok(randomizer.produce(ctx.source())),
                None => self.populate_structure(&field.field_type, ctx),
            };
            ctx.pop_field();
            object.set(field.name.clone(), value?);
        }

        Ok(object)
    }
}

impl ElementPopulator for GraphPopulator {
    fn populate_element(
        &self,
        ty: &TypeRef,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, PopulateError> {
        self.populate(ty, ctx)
    }

    fn primitive_randomizer(&self, ty: &TypeRef) -> Option<SharedRandomizer> {
        self.registries.builtin().resolve_type(ty)
    }
}
