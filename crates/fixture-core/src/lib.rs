//! Core types for the fixturegen object-population engine.
//!
//! This crate provides the foundational types shared by the generator and the
//! command-line tool:
//!
//! - [`TypeRef`] - Declared type of a field or of a population target
//! - [`FieldDescriptor`] / [`TypeDescriptor`] - Explicit descriptions of user types
//! - [`TypeCatalog`] - Validated collection of type descriptors loaded from YAML
//! - [`Value`] / [`Object`] - Dynamic value tree produced by population
//! - [`JsonValue`] - JSON rendering of a [`Value`]
//!
//! # Architecture
//!
//! ```text
//! fixture-core (this crate)
//!    │
//!    ├─── fixture-generator  (randomizers, registry chain, graph populator)
//!    │
//!    └─── fixturegen         (CLI: populate / describe)
//! ```
//!
//! # Example
//!
//! ```rust
//! use fixture_core::{TypeCatalog, TypeRef};
//!
//! let catalog = TypeCatalog::from_yaml(r#"
//! types:
//!   - name: Street
//!     fields:
//!       - name: name
//!         type: string
//!       - name: number
//!         type: int
//! "#).unwrap();
//!
//! let fields = catalog.fields_of("Street").unwrap();
//! assert_eq!(fields.len(), 2);
//! assert_eq!(fields[1].field_type, TypeRef::Int);
//! ```

pub mod json;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use json::JsonValue;
pub use schema::{FieldDescriptor, Modifier, SchemaError, TypeCatalog, TypeDescriptor, TypeKind};
pub use types::{QueueKind, TypeRef};
pub use values::{Object, Value};
