//! Type catalog definitions for the fixturegen engine.
//!
//! Rust has no runtime reflection, so the shape of every user type is
//! described explicitly and registered once in a [`TypeCatalog`]:
//!
//! - `FieldDescriptor` - A declared field (name, type, owner, modifiers, annotations)
//! - `TypeDescriptor` - A declared type (kind, parent, interfaces, fields, enum variants)
//! - `TypeCatalog` - Validated collection of types with cached flattened field lists
//!
//! ## YAML Format
//!
//! ```yaml
//! types:
//!   - name: Mammal
//!     kind: interface
//!   - name: Human
//!     implements: [Mammal]
//!     fields:
//!       - name: name
//!         type: string
//!   - name: Person
//!     extends: Human
//!     fields:
//!       - name: email
//!         type: string
//!         modifiers: [protected, transient]
//! ```

use crate::types::TypeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading catalog file
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Type not found in catalog
    #[error("Type not found: {0}")]
    TypeNotFound(String),

    /// A type refers to a type the catalog does not describe
    #[error("Type '{referrer}' refers to unknown type '{name}'")]
    UnknownType { referrer: String, name: String },

    /// Two descriptors share the same name
    #[error("Duplicate type: {0}")]
    DuplicateType(String),

    /// The `extends` chain of a type loops back on itself
    #[error("Inheritance cycle through type '{0}'")]
    InheritanceCycle(String),
}

// ============================================================================
// Field Descriptors
// ============================================================================

/// Field modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Transient,
    Volatile,
}

/// A declared field of a catalog type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,

    /// Declared field type
    #[serde(rename = "type")]
    pub field_type: TypeRef,

    /// Name of the type declaring this field (filled in by the catalog)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,

    /// Field modifiers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,

    /// Names of annotations present on the field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

impl FieldDescriptor {
    /// Create a new field descriptor without modifiers or annotations.
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            owner: String::new(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Set the owning type.
    pub fn in_type(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Add modifiers.
    pub fn with_modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers.extend_from_slice(modifiers);
        self
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Check if the field carries every given modifier.
    pub fn has_modifiers(&self, modifiers: &[Modifier]) -> bool {
        modifiers.iter().all(|m| self.modifiers.contains(m))
    }

    /// Check if the field is static.
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    /// Check if the field carries the given annotation.
    pub fn is_annotated_with(&self, annotation: &str) -> bool {
        self.annotations.iter().any(|a| a == annotation)
    }
}

// ============================================================================
// Type Descriptors
// ============================================================================

/// Kind of a catalog type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Instantiable type
    #[default]
    Concrete,
    /// Abstract type (needs a concrete subtype)
    Abstract,
    /// Interface (needs an implementing type)
    Interface,
    /// Enumeration of named variants
    Enum,
}

fn default_constructible() -> bool {
    true
}

/// A declared type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeDescriptor {
    /// Type name
    pub name: String,

    /// Type kind
    #[serde(default)]
    pub kind: TypeKind,

    /// Parent type whose fields are inherited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Implemented interfaces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,

    /// Declared fields (excluding inherited ones)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,

    /// Variants of an enum type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,

    /// Whether the type has an accessible constructor
    #[serde(default = "default_constructible")]
    pub constructible: bool,
}

impl TypeDescriptor {
    /// Create a concrete type with the given fields.
    pub fn concrete(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Concrete,
            extends: None,
            implements: Vec::new(),
            fields,
            variants: Vec::new(),
            constructible: true,
        }
    }

    /// Create an abstract type with the given fields.
    pub fn abstract_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            kind: TypeKind::Abstract,
            ..Self::concrete(name, fields)
        }
    }

    /// Create an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::Interface,
            ..Self::concrete(name, Vec::new())
        }
    }

    /// Create an enum type with the given variants.
    pub fn enumeration(name: impl Into<String>, variants: &[&str]) -> Self {
        Self {
            kind: TypeKind::Enum,
            variants: variants.iter().map(|v| v.to_string()).collect(),
            ..Self::concrete(name, Vec::new())
        }
    }

    /// Set the parent type.
    pub fn extending(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Add an implemented interface.
    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    /// Check if this type can only be populated through a concrete subtype.
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Abstract | TypeKind::Interface)
    }

    /// Check if this type is an enumeration.
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }
}

// ============================================================================
// Type Catalog
// ============================================================================

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<TypeDescriptor>,
}

/// Validated collection of type descriptors.
///
/// Flattened field lists (inherited fields first, root ancestor first) are
/// computed once at construction and served from a cache.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    /// Type descriptors in registration order
    types: Vec<TypeDescriptor>,

    /// Type lookup by name
    type_map: HashMap<String, usize>,

    /// Flattened fields per type
    field_cache: HashMap<String, Vec<FieldDescriptor>>,
}

impl TypeCatalog {
    /// Create a catalog from a list of descriptors.
    ///
    /// Fills in field owners, checks every reference, and caches flattened
    /// field lists.
    pub fn new(types: Vec<TypeDescriptor>) -> Result<Self, SchemaError> {
        let mut type_map = HashMap::with_capacity(types.len());
        let mut types = types;
        for (idx, ty) in types.iter_mut().enumerate() {
            for field in &mut ty.fields {
                field.owner = ty.name.clone();
            }
            if type_map.insert(ty.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateType(ty.name.clone()));
            }
        }

        let mut catalog = Self {
            types,
            type_map,
            field_cache: HashMap::new(),
        };
        catalog.validate_references()?;
        catalog.build_field_cache()?;
        Ok(catalog)
    }

    /// Parse a catalog from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.types)
    }

    /// Load a catalog from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    fn validate_references(&self) -> Result<(), SchemaError> {
        for ty in &self.types {
            let referenced = ty
                .extends
                .iter()
                .map(String::as_str)
                .chain(ty.implements.iter().map(String::as_str))
                .chain(ty.fields.iter().flat_map(|f| f.field_type.referenced_names()));
            for name in referenced {
                if !self.type_map.contains_key(name) {
                    return Err(SchemaError::UnknownType {
                        referrer: ty.name.clone(),
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn build_field_cache(&mut self) -> Result<(), SchemaError> {
        let mut cache = HashMap::with_capacity(self.types.len());
        for ty in &self.types {
            // Walk up to the root ancestor, then flatten downwards
            let mut lineage = vec![ty];
            let mut seen = HashSet::from([ty.name.as_str()]);
            let mut current = ty;
            while let Some(parent) = &current.extends {
                if !seen.insert(parent.as_str()) {
                    return Err(SchemaError::InheritanceCycle(ty.name.clone()));
                }
                current = self
                    .get_type(parent)
                    .ok_or_else(|| SchemaError::TypeNotFound(parent.clone()))?;
                lineage.push(current);
            }

            let mut fields: Vec<FieldDescriptor> = Vec::new();
            for ancestor in lineage.iter().rev() {
                for field in &ancestor.fields {
                    // A subtype field shadows an inherited field of the same name
                    fields.retain(|f| f.name != field.name);
                    fields.push(field.clone());
                }
            }
            cache.insert(ty.name.clone(), fields);
        }
        self.field_cache = cache;
        Ok(())
    }

    /// Get a type descriptor by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.type_map.get(name).and_then(|&idx| self.types.get(idx))
    }

    /// Get the flattened fields of a type (inherited fields included).
    pub fn fields_of(&self, name: &str) -> Result<&[FieldDescriptor], SchemaError> {
        self.field_cache
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SchemaError::TypeNotFound(name.to_string()))
    }

    /// Check if `name` extends or implements `ancestor`, directly or transitively.
    pub fn is_subtype_of(&self, name: &str, ancestor: &str) -> bool {
        let mut pending = vec![name];
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(ty) = self.get_type(current) else {
                continue;
            };
            for parent in ty.extends.iter().chain(ty.implements.iter()) {
                if parent == ancestor {
                    return true;
                }
                pending.push(parent);
            }
        }
        false
    }

    /// Get all descriptors, in registration order.
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Get all type names in the catalog.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Get all enum types in the catalog.
    pub fn enums(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter().filter(|t| t.is_enum())
    }

    /// Add a type to the catalog, re-validating it.
    pub fn add_type(&mut self, ty: TypeDescriptor) -> Result<(), SchemaError> {
        let mut types = std::mem::take(&mut self.types);
        types.push(ty);
        *self = Self::new(types)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_yaml() -> &'static str {
        r#"
types:
  - name: Mammal
    kind: interface

  - name: Gender
    kind: enum
    variants: [MALE, FEMALE]

  - name: Human
    implements: [Mammal]
    fields:
      - name: id
        type: long
        modifiers: [final]
      - name: name
        type: string

  - name: Person
    extends: Human
    fields:
      - name: email
        type: string
        modifiers: [protected, transient]
      - name: gender
        type: Gender
      - name: name
        type: string
        annotations: [NotNull]

  - name: SocialPerson
    extends: Person
    fields:
      - name: friends
        type:
          type: set
          element: Person
"#
    }

    #[test]
    fn test_parse_catalog() {
        let catalog = TypeCatalog::from_yaml(catalog_yaml()).unwrap();

        assert_eq!(
            catalog.type_names(),
            vec!["Mammal", "Gender", "Human", "Person", "SocialPerson"]
        );
        let gender = catalog.get_type("Gender").unwrap();
        assert!(gender.is_enum());
        assert_eq!(gender.variants, vec!["MALE", "FEMALE"]);
        assert!(catalog.get_type("Mammal").unwrap().is_abstract());
        assert!(catalog.get_type("Human").unwrap().constructible);
    }

    #[test]
    fn test_flattened_fields_follow_inheritance() {
        let catalog = TypeCatalog::from_yaml(catalog_yaml()).unwrap();

        let fields = catalog.fields_of("SocialPerson").unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        // `name` is redeclared by Person, so it moves after the inherited `id`
        assert_eq!(names, vec!["id", "email", "gender", "name", "friends"]);

        let name_field = fields.iter().find(|f| f.name == "name").unwrap();
        assert_eq!(name_field.owner, "Person");
        assert!(name_field.is_annotated_with("NotNull"));

        let email = fields.iter().find(|f| f.name == "email").unwrap();
        assert!(email.has_modifiers(&[Modifier::Transient, Modifier::Protected]));
        assert!(!email.has_modifiers(&[Modifier::Static]));
    }

    #[test]
    fn test_is_subtype_of() {
        let catalog = TypeCatalog::from_yaml(catalog_yaml()).unwrap();

        assert!(catalog.is_subtype_of("SocialPerson", "Mammal"));
        assert!(catalog.is_subtype_of("Person", "Human"));
        assert!(!catalog.is_subtype_of("Human", "Person"));
        assert!(!catalog.is_subtype_of("Gender", "Mammal"));
    }

    #[test]
    fn test_unknown_reference_is_rejected() {
        let yaml = r#"
types:
  - name: Person
    fields:
      - name: address
        type: Address
"#;
        let err = TypeCatalog::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownType { ref referrer, ref name } if referrer == "Person" && name == "Address"
        ));
    }

    #[test]
    fn test_inheritance_cycle_is_rejected() {
        let types = vec![
            TypeDescriptor::concrete("A", vec![]).extending("B"),
            TypeDescriptor::concrete("B", vec![]).extending("A"),
        ];
        assert!(matches!(
            TypeCatalog::new(types),
            Err(SchemaError::InheritanceCycle(_))
        ));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let types = vec![
            TypeDescriptor::concrete("A", vec![]),
            TypeDescriptor::interface("A"),
        ];
        assert!(matches!(
            TypeCatalog::new(types),
            Err(SchemaError::DuplicateType(name)) if name == "A"
        ));
    }

    #[test]
    fn test_add_type() {
        let mut catalog = TypeCatalog::from_yaml(catalog_yaml()).unwrap();
        catalog
            .add_type(
                TypeDescriptor::concrete("Ape", vec![FieldDescriptor::new("name", TypeRef::String)])
                    .implementing("Mammal"),
            )
            .unwrap();

        assert!(catalog.is_subtype_of("Ape", "Mammal"));
        assert_eq!(catalog.fields_of("Ape").unwrap()[0].owner, "Ape");
    }
}
