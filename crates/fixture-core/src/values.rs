//! Value representations for the fixturegen engine.
//!
//! This module defines the dynamic value tree produced by population. Every
//! leaf `TypeRef` has a matching `Value` variant, containers hold nested
//! values, and catalog types become [`Object`]s keyed by field name.

use crate::schema::FieldDescriptor;
use crate::types::TypeRef;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use url::Url;
use uuid::Uuid;

/// Generated value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (default for non-primitive types)
    Null,

    /// Boolean value
    Bool(bool),

    /// Single character
    Char(char),

    /// 8-bit signed integer
    Byte(i8),

    /// 16-bit signed integer
    Short(i16),

    /// 32-bit signed integer
    Int(i32),

    /// 64-bit signed integer
    Long(i64),

    /// 32-bit floating point
    Float(f32),

    /// 64-bit floating point
    Double(f64),

    /// Exact decimal
    Decimal(Decimal),

    /// String value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),

    /// Date and time without offset
    DateTime(NaiveDateTime),

    /// Date and time with a fixed offset
    ZonedDateTime(DateTime<FixedOffset>),

    /// UUID value
    Uuid(Uuid),

    /// URL value
    Url(Url),

    /// Ordered sequence (lists and queues)
    List(Vec<Value>),

    /// Distinct elements, in insertion order
    Set(Vec<Value>),

    /// Fixed-length array
    Array(Vec<Value>),

    /// Key-value pairs with distinct keys, in insertion order
    Map(Vec<(Value, Value)>),

    /// Enum variant
    Enum {
        /// Enum type name
        type_name: String,
        /// Selected variant
        variant: String,
    },

    /// Populated catalog type
    Object(Object),
}

/// Instance of a catalog type.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Name of the concrete type
    pub type_name: String,

    /// Field values by field name
    pub fields: BTreeMap<String, Value>,
}

impl Object {
    /// Create an object with no fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create an object whose fields are all at their default values.
    ///
    /// Static fields are not instance state and are left out.
    pub fn with_defaults<'a>(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = &'a FieldDescriptor>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .filter(|f| !f.is_static())
            .map(|f| (f.name.clone(), Value::default_for(&f.field_type)))
            .collect();
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set a field value.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }
}

impl Value {
    /// The default ("zero") value for a declared type.
    ///
    /// Primitives get `false`, `'\0'` or zero; every other type gets `Null`.
    pub fn default_for(ty: &TypeRef) -> Self {
        match ty {
            TypeRef::Bool => Self::Bool(false),
            TypeRef::Char => Self::Char('\0'),
            TypeRef::Byte => Self::Byte(0),
            TypeRef::Short => Self::Short(0),
            TypeRef::Int => Self::Int(0),
            TypeRef::Long => Self::Long(0),
            TypeRef::Float => Self::Float(0.0),
            TypeRef::Double => Self::Double(0.0),
            _ => Self::Null,
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64 (any integer width).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Byte(i) => Some(i64::from(*i)),
            Self::Short(i) => Some(i64::from(*i)),
            Self::Int(i) => Some(i64::from(*i)),
            Self::Long(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64 (either float width).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(f64::from(*f)),
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Try to get the elements of a list, set, or array.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Set(items) | Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get the entries of a map.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Try to get the selected variant of an enum value.
    pub fn as_variant(&self) -> Option<&str> {
        match self {
            Self::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    /// Get a field of an object value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(name))
    }

    /// Follow a dotted field path (`"address.street.name"`) through nested objects.
    pub fn at_path(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(self, |value, segment| value.field(segment))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}
