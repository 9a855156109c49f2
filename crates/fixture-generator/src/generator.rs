//! Population sessions.

use crate::context::PopulationContext;
use crate::error::PopulateError;
use crate::exclusion::ExclusionPolicy;
use crate::factory::{
    CatalogTypeResolver, ConcreteTypeResolver, ObjectFactory, SubstitutionProvider,
    SubstitutionTable,
};
use crate::parameters::Parameters;
use crate::populator::GraphPopulator;
use crate::predicate::{FieldKey, FieldPredicate, TypePredicate};
use crate::random::ValueSource;
use crate::randomizers::Randomizer;
use crate::registry::{
    BuiltinRegistry, FieldOverrideRegistry, PredicateRegistry, Registry, RegistryChain,
    TypeOverrideRegistry,
};
use fixture_core::{TypeCatalog, TypeRef, Value};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// Object generator that produces deterministic object graphs.
///
/// The generator owns a seeded value source, so the same seed, catalog and
/// sequence of calls always yield the same values. Sequential calls take
/// `&mut self`; [`populate_with_seed`](Self::populate_with_seed) and
/// [`populate_many_par`](Self::populate_many_par) use their own sources and
/// only need `&self`.
pub struct ObjectGenerator {
    /// Catalog, registries and the rest of the population machinery
    populator: GraphPopulator,
    /// Validated parameters
    params: Parameters,
    /// Session value source
    source: ValueSource,
}

impl ObjectGenerator {
    /// Start configuring a generator over `catalog`.
    pub fn builder(catalog: TypeCatalog) -> ObjectGeneratorBuilder {
        ObjectGeneratorBuilder::new(catalog)
    }

    /// Create a generator with the given parameters and no customization.
    pub fn new(catalog: TypeCatalog, params: Parameters) -> Result<Self, PopulateError> {
        Self::builder(catalog).parameters(params).build()
    }

    /// Populate a value of type `ty`.
    pub fn populate(&mut self, ty: &TypeRef) -> Result<Value, PopulateError> {
        run(&self.populator, &self.params, ty, &mut self.source)
    }

    /// Populate an instance of the catalog type `name`.
    pub fn populate_named(&mut self, name: &str) -> Result<Value, PopulateError> {
        self.populate(&TypeRef::named(name))
    }

    /// Populate a value of type `ty` from a fresh source seeded with `seed`.
    ///
    /// The session source is left untouched.
    pub fn populate_with_seed(&self, ty: &TypeRef, seed: u64) -> Result<Value, PopulateError> {
        let mut source = ValueSource::new(seed);
        run(&self.populator, &self.params, ty, &mut source)
    }

    /// Populate `count` values of type `ty` in sequence.
    ///
    /// A negative count is rejected before anything is generated.
    pub fn populate_many(&mut self, ty: &TypeRef, count: i64) -> Result<Vec<Value>, PopulateError> {
        let count = check_count(count)?;
        let values = self.objects(ty, count).collect::<Result<Vec<_>, _>>()?;
        info!("Populated {} instances of {}", values.len(), ty);
        Ok(values)
    }

    /// Lazily populate `count` values of type `ty`.
    pub fn objects(&mut self, ty: &TypeRef, count: u64) -> ObjectIterator<'_> {
        ObjectIterator {
            generator: self,
            ty: ty.clone(),
            remaining: count,
        }
    }

    /// Populate `count` values of type `ty` in parallel.
    ///
    /// Element `i` is populated from its own source, derived from the session
    /// seed and `i`, so the batch does not depend on scheduling. The session
    /// source is left untouched.
    pub fn populate_many_par(&self, ty: &TypeRef, count: i64) -> Result<Vec<Value>, PopulateError> {
        let count = check_count(count)?;
        let len = usize::try_from(count).map_err(|_| {
            PopulateError::InvalidArgument(format!("count {count} is too large"))
        })?;
        let seed = self.source.seed();

        let values = (0..len)
            .into_par_iter()
            .map(|i| {
                let mut source = ValueSource::new(ValueSource::seed_for_index(seed, i as u64));
                run(&self.populator, &self.params, ty, &mut source)
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!("Populated {} instances of {} in parallel", values.len(), ty);
        Ok(values)
    }

    /// Restart the session from `seed`.
    ///
    /// Every registry receives the new seed as well, so identical call
    /// sequences after a reseed reproduce identical values.
    pub fn reseed(&mut self, seed: u64) {
        self.source.reseed(seed);
        self.populator.registries_mut().set_seed(seed);
        debug!("Reseeded object generator with seed {}", seed);
    }

    /// Current session seed.
    pub fn seed(&self) -> u64 {
        self.source.seed()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn catalog(&self) -> &TypeCatalog {
        self.populator.catalog()
    }
}

fn check_count(count: i64) -> Result<u64, PopulateError> {
    u64::try_from(count).map_err(|_| {
        PopulateError::InvalidArgument(format!("count must be non-negative, got {count}"))
    })
}

fn run(
    populator: &GraphPopulator,
    params: &Parameters,
    ty: &TypeRef,
    source: &mut ValueSource,
) -> Result<Value, PopulateError> {
    let mut ctx = PopulationContext::new(source, params.randomization_depth);
    let value = populator.populate(ty, &mut ctx)?;
    debug!(
        "Populated {} with {} placeholder(s)",
        ty,
        ctx.placeholders()
    );
    Ok(value)
}

/// Iterator that lazily populates values.
pub struct ObjectIterator<'a> {
    generator: &'a mut ObjectGenerator,
    ty: TypeRef,
    remaining: u64,
}

impl Iterator for ObjectIterator<'_> {
    type Item = Result<Value, PopulateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.populate(&self.ty))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ObjectIterator<'_> {}

/// Configures an [`ObjectGenerator`].
pub struct ObjectGeneratorBuilder {
    catalog: TypeCatalog,
    params: Parameters,
    field_overrides: FieldOverrideRegistry,
    predicate_overrides: PredicateRegistry,
    type_overrides: TypeOverrideRegistry,
    registries: Vec<Box<dyn Registry>>,
    exclusions: ExclusionPolicy,
    resolver: Box<dyn ConcreteTypeResolver>,
    substitutions: SubstitutionTable,
    substitution_provider: Option<Box<dyn SubstitutionProvider>>,
}

impl ObjectGeneratorBuilder {
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            params: Parameters::default(),
            field_overrides: FieldOverrideRegistry::new(),
            predicate_overrides: PredicateRegistry::new(),
            type_overrides: TypeOverrideRegistry::new(),
            registries: Vec::new(),
            exclusions: ExclusionPolicy::new(),
            resolver: Box::new(CatalogTypeResolver),
            substitutions: SubstitutionTable::new(),
            substitution_provider: None,
        }
    }

    /// Replace all parameters.
    pub fn parameters(mut self, params: Parameters) -> Self {
        self.params = params;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self
    }

    /// Use `randomizer` for exactly one field.
    pub fn randomize_field(mut self, key: FieldKey, randomizer: impl Randomizer + 'static) -> Self {
        self.field_overrides.register(key, Arc::new(randomizer));
        self
    }

    /// Use `randomizer` for every field matching `predicate`.
    ///
    /// Earlier registrations take precedence.
    pub fn randomize_fields(
        mut self,
        predicate: FieldPredicate,
        randomizer: impl Randomizer + 'static,
    ) -> Self {
        self.predicate_overrides.register(predicate, Arc::new(randomizer));
        self
    }

    /// Use `randomizer` for every value of type `ty`.
    pub fn randomize_type(mut self, ty: TypeRef, randomizer: impl Randomizer + 'static) -> Self {
        self.type_overrides.register(ty, Arc::new(randomizer));
        self
    }

    pub fn exclude_field(mut self, key: FieldKey) -> Self {
        self.exclusions.exclude_field(key);
        self
    }

    pub fn exclude_fields(mut self, predicate: FieldPredicate) -> Self {
        self.exclusions.exclude_fields(predicate);
        self
    }

    pub fn exclude_types(mut self, predicate: TypePredicate) -> Self {
        self.exclusions.exclude_types(predicate);
        self
    }

    /// Add a user registry, consulted after the overrides and before the
    /// built-in randomizers.
    pub fn registry(mut self, registry: impl Registry + 'static) -> Self {
        self.registries.push(Box::new(registry));
        self
    }

    pub fn concrete_type_resolver(mut self, resolver: impl ConcreteTypeResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Create `replacement` wherever `type_name` would be created.
    pub fn substitute(
        mut self,
        type_name: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.substitutions.insert(type_name, replacement);
        self
    }

    /// Replace the substitution table by a custom provider.
    pub fn substitution_provider(mut self, provider: impl SubstitutionProvider + 'static) -> Self {
        self.substitution_provider = Some(Box::new(provider));
        self
    }

    /// Validate the parameters and build the generator.
    pub fn build(self) -> Result<ObjectGenerator, PopulateError> {
        self.params.validate()?;

        let builtin = BuiltinRegistry::new(&self.params, &self.catalog)?;
        let mut registries = RegistryChain::new(
            self.field_overrides,
            self.predicate_overrides,
            self.type_overrides,
            self.registries,
            builtin,
        );
        registries.set_seed(self.params.seed);

        let substitutions = self
            .substitution_provider
            .unwrap_or_else(|| Box::new(self.substitutions) as Box<dyn SubstitutionProvider>);
        let factory = ObjectFactory::new(
            self.resolver,
            substitutions,
            self.params.scan_for_concrete_types,
        );

        debug!(
            "Built object generator over {} types with seed {} and registries {:?}",
            self.catalog.types().len(),
            self.params.seed,
            registries.names()
        );

        let source = ValueSource::new(self.params.seed);
        let populator = GraphPopulator::new(
            self.catalog,
            &self.params,
            registries,
            self.exclusions,
            factory,
        );

        Ok(ObjectGenerator {
            populator,
            params: self.params,
            source,
        })
    }
}
