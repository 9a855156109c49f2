//! Type references for the fixturegen engine.
//!
//! This module defines `TypeRef`, the declared type of a field or of a
//! population target. Leaf kinds map to built-in randomizers, container kinds
//! are filled by the container strategy, and `Named` kinds refer to a
//! [`TypeDescriptor`](crate::schema::TypeDescriptor) in the catalog.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Declared type of a field or of a population target.
///
/// # YAML Format
///
/// Leaf types and catalog references are plain strings:
/// ```yaml
/// type: int
/// type: string
/// type: Address      # any unknown name refers to a catalog type
/// ```
///
/// Containers use object format:
/// ```yaml
/// type:
///   type: list
///   element: Address
/// type:
///   type: map
///   key: string
///   value: int
/// type:
///   type: queue
///   element: int
///   kind: bounded
///   capacity: 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    // Primitives
    /// Boolean
    Bool,
    /// Single character
    Char,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit IEEE 754 floating point
    Float,
    /// 64-bit IEEE 754 floating point
    Double,

    // Other leaf types
    /// Exact decimal
    Decimal,
    /// UTF-8 string
    String,
    /// Binary data
    Bytes,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time without offset
    DateTime,
    /// Date and time with a fixed UTC offset
    ZonedDateTime,
    /// UUID (128-bit)
    Uuid,
    /// Absolute URL
    Url,

    // Containers
    /// Ordered sequence
    List {
        /// Element type
        element: Box<TypeRef>,
    },
    /// Collection of distinct elements
    Set {
        /// Element type
        element: Box<TypeRef>,
    },
    /// Key-value map
    Map {
        /// Key type
        key: Box<TypeRef>,
        /// Value type
        value: Box<TypeRef>,
    },
    /// Fixed-length array
    Array {
        /// Element type
        element: Box<TypeRef>,
    },
    /// Queue with a handoff discipline
    Queue {
        /// Element type
        element: Box<TypeRef>,
        /// Queue discipline
        kind: QueueKind,
    },

    /// Reference to a type described in the catalog
    Named(String),

    /// The universal top type ("any object")
    Any,

    /// A value describing a type rather than data. Never populated.
    TypeToken,
}

/// Queue disciplines.
///
/// `Synchronous` and `Delay` queues have no meaningful notion of "fill with N
/// elements" and are rejected by the container strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    /// Unbounded first-in first-out queue
    Fifo,
    /// Queue with a fixed capacity
    Bounded {
        /// Maximum number of elements
        capacity: usize,
    },
    /// Zero-capacity handoff queue
    Synchronous,
    /// Queue whose elements become available after a delay
    Delay,
}

impl QueueKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::Bounded { .. } => "bounded",
            Self::Synchronous => "synchronous",
            Self::Delay => "delay",
        }
    }
}

/// Simple (string-form) type names.
fn simple_type(name: &str) -> Option<TypeRef> {
    let ty = match name {
        "bool" | "boolean" => TypeRef::Bool,
        "char" => TypeRef::Char,
        "byte" => TypeRef::Byte,
        "short" => TypeRef::Short,
        "int" | "integer" => TypeRef::Int,
        "long" => TypeRef::Long,
        "float" => TypeRef::Float,
        "double" => TypeRef::Double,
        "decimal" => TypeRef::Decimal,
        "string" => TypeRef::String,
        "bytes" => TypeRef::Bytes,
        "date" => TypeRef::Date,
        "time" => TypeRef::Time,
        "date_time" | "datetime" => TypeRef::DateTime,
        "zoned_date_time" | "timestamp_tz" => TypeRef::ZonedDateTime,
        "uuid" => TypeRef::Uuid,
        "url" => TypeRef::Url,
        "any" => TypeRef::Any,
        "type_token" => TypeRef::TypeToken,
        _ => return None,
    };
    Some(ty)
}

// Custom serialization/deserialization for TypeRef
// Supports both simple string format ("int", "Address") and object format ({"type": "list", "element": "int"})

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::List { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "list")?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Set { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "set")?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Array { element } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("element", element)?;
                map.end()
            }
            Self::Map { key, value } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("key", key)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
            Self::Queue { element, kind } => {
                let len = if matches!(kind, QueueKind::Bounded { .. }) { 4 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("type", "queue")?;
                map.serialize_entry("element", element)?;
                map.serialize_entry("kind", kind.as_str())?;
                if let QueueKind::Bounded { capacity } = kind {
                    map.serialize_entry("capacity", capacity)?;
                }
                map.end()
            }
            Self::Named(name) => serializer.serialize_str(name),
            // Leaf types - serialize as their canonical name
            leaf => serializer.serialize_str(&leaf.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct TypeRefVisitor;

        impl<'de> Visitor<'de> for TypeRefVisitor {
            type Value = TypeRef;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a type name or a map describing a container type")
            }

            // Handle string format: "int", "Address", etc.
            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                if value.is_empty() {
                    return Err(E::custom("type name must not be empty"));
                }
                Ok(simple_type(value).unwrap_or_else(|| TypeRef::Named(value.to_string())))
            }

            // Handle map format: {"type": "list", "element": "int"}
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                match type_name.as_str() {
                    "list" => Ok(TypeRef::list(get_field_required::<_, M::Error>(&fields, "element")?)),
                    "set" => Ok(TypeRef::set(get_field_required::<_, M::Error>(&fields, "element")?)),
                    "array" => Ok(TypeRef::array(get_field_required::<_, M::Error>(&fields, "element")?)),
                    "map" => {
                        let key = get_field_required::<_, M::Error>(&fields, "key")?;
                        let value = get_field_required::<_, M::Error>(&fields, "value")?;
                        Ok(TypeRef::map(key, value))
                    }
                    "queue" => {
                        let element = get_field_required::<_, M::Error>(&fields, "element")?;
                        let kind_name: String =
                            get_field(&fields, "kind").unwrap_or_else(|| "fifo".to_string());
                        let kind = match kind_name.as_str() {
                            "fifo" => QueueKind::Fifo,
                            "bounded" => QueueKind::Bounded {
                                capacity: get_field_required::<_, M::Error>(&fields, "capacity")?,
                            },
                            "synchronous" => QueueKind::Synchronous,
                            "delay" => QueueKind::Delay,
                            other => {
                                return Err(M::Error::custom(format!("unknown queue kind: {other}")))
                            }
                        };
                        Ok(TypeRef::queue(element, kind))
                    }
                    "named" => Ok(TypeRef::Named(get_field_required::<_, M::Error>(&fields, "name")?)),
                    other => simple_type(other)
                        .ok_or_else(|| M::Error::custom(format!("unknown type: {other}"))),
                }
            }
        }

        deserializer.deserialize_any(TypeRefVisitor)
    }
}

// Helper functions for deserialization
fn get_field<T: for<'de> Deserialize<'de>>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<T> {
    fields
        .get(key)
        .and_then(|v| serde_yaml::from_value(v.clone()).ok())
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    let value = fields.get(key).ok_or_else(|| E::missing_field(key))?;
    serde_yaml::from_value(value.clone())
        .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Char => f.write_str("char"),
            Self::Byte => f.write_str("byte"),
            Self::Short => f.write_str("short"),
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::Decimal => f.write_str("decimal"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
            Self::DateTime => f.write_str("date_time"),
            Self::ZonedDateTime => f.write_str("zoned_date_time"),
            Self::Uuid => f.write_str("uuid"),
            Self::Url => f.write_str("url"),
            Self::List { element } => write!(f, "list<{element}>"),
            Self::Set { element } => write!(f, "set<{element}>"),
            Self::Array { element } => write!(f, "array<{element}>"),
            Self::Map { key, value } => write!(f, "map<{key}, {value}>"),
            Self::Queue { element, kind } => match kind {
                QueueKind::Bounded { capacity } => write!(f, "queue<{element}; bounded({capacity})>"),
                other => write!(f, "queue<{element}; {}>", other.as_str()),
            },
            Self::Named(name) => f.write_str(name),
            Self::Any => f.write_str("any"),
            Self::TypeToken => f.write_str("type_token"),
        }
    }
}

impl TypeRef {
    /// Create a reference to a catalog type.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Create a list type with the given element type.
    pub fn list(element: TypeRef) -> Self {
        Self::List {
            element: Box::new(element),
        }
    }

    /// Create a set type with the given element type.
    pub fn set(element: TypeRef) -> Self {
        Self::Set {
            element: Box::new(element),
        }
    }

    /// Create an array type with the given element type.
    pub fn array(element: TypeRef) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    /// Create a map type with the given key and value types.
    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Create a queue type with the given element type and discipline.
    pub fn queue(element: TypeRef, kind: QueueKind) -> Self {
        Self::Queue {
            element: Box::new(element),
            kind,
        }
    }

    /// Check if this type is a primitive (eligible for the primitive-array fast path).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Char
                | Self::Byte
                | Self::Short
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
        )
    }

    /// Check if this type is a container filled by the container strategy.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::List { .. } | Self::Set { .. } | Self::Map { .. } | Self::Array { .. } | Self::Queue { .. }
        )
    }

    /// Check if this type is a leaf covered by the built-in registry.
    pub fn is_leaf(&self) -> bool {
        !self.is_container() && !matches!(self, Self::Named(_) | Self::Any | Self::TypeToken)
    }

    /// Get the catalog name if this is a named type.
    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Visit every catalog name referenced by this type, including inside containers.
    pub fn referenced_names(&self) -> Vec<&str> {
        match self {
            Self::Named(name) => vec![name.as_str()],
            Self::List { element }
            | Self::Set { element }
            | Self::Array { element }
            | Self::Queue { element, .. } => element.referenced_names(),
            Self::Map { key, value } => {
                let mut names = key.referenced_names();
                names.extend(value.referenced_names());
                names
            }
            _ => Vec::new(),
        }
    }
}
