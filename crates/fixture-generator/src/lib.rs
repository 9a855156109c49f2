//! Object-graph population engine for fixturegen.
//!
//! This crate provides the `ObjectGenerator` which fills instances of catalog
//! types with deterministic random values. The generator uses a seeded value
//! source to ensure reproducibility across runs with the same seed, catalog
//! and sequence of calls.
//!
//! # Architecture
//!
//! ```text
//! TypeCatalog (YAML) + Parameters
//!        │
//!        ▼
//! ┌──────────────────────────┐
//! │     ObjectGenerator      │
//! │                          │
//! │  - ValueSource (StdRng)  │
//! │  - GraphPopulator        │
//! │     - RegistryChain      │
//! │     - ExclusionPolicy    │
//! │     - ContainerStrategy  │
//! │     - ObjectFactory      │
//! └────────────┬─────────────┘
//!              │
//!              ▼
//!     Value::Object { type_name, fields }
//! ```
//!
//! Randomizers are resolved in a fixed order: exact field overrides,
//! field-predicate overrides, type overrides, user registries, then the
//! built-in randomizers. Types without a randomizer are populated from
//! their structure.
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{TypeCatalog, Value};
//! use fixture_generator::{FieldPredicate, ObjectGenerator, PatternRandomizer};
//!
//! let catalog = TypeCatalog::from_yaml(r#"
//! types:
//!   - name: User
//!     fields:
//!       - name: email
//!         type: string
//!       - name: friends
//!         type: { type: list, element: User }
//! "#).unwrap();
//!
//! let mut generator = ObjectGenerator::builder(catalog)
//!     .seed(42)
//!     .randomize_fields(
//!         FieldPredicate::named("email"),
//!         PatternRandomizer::new("user_{rand:4}@example.com").unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let user = generator.populate_named("User").unwrap();
//! assert!(user.field("email").and_then(Value::as_str).unwrap().ends_with("@example.com"));
//! ```

pub mod container;
pub mod context;
pub mod error;
pub mod exclusion;
pub mod factory;
pub mod generator;
pub mod parameters;
pub mod populator;
pub mod predicate;
pub mod random;
pub mod randomizers;
pub mod registry;

// Re-exports for convenience
pub use container::{ContainerStrategy, ElementPopulator, SET_RETRY_FACTOR};
pub use context::PopulationContext;
pub use error::PopulateError;
pub use exclusion::ExclusionPolicy;
pub use factory::{
    CatalogTypeResolver, ConcreteTypeResolver, ObjectFactory, SubstitutionProvider,
    SubstitutionTable,
};
pub use generator::{ObjectGenerator, ObjectGeneratorBuilder, ObjectIterator};
pub use parameters::{DateRange, Parameters, SizeRange};
pub use populator::GraphPopulator;
pub use predicate::{FieldKey, FieldPredicate, TypePredicate};
pub use random::ValueSource;
pub use randomizers::{
    ConstantRandomizer, EnumRandomizer, OneOfRandomizer, PatternRandomizer, Randomizer,
    SharedRandomizer,
};
pub use registry::{Registry, RegistryChain};
