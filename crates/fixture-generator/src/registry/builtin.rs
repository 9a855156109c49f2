//! Built-in randomizers for every leaf type and catalog enum.

use super::Registry;
use crate::error::PopulateError;
use crate::parameters::Parameters;
use crate::randomizers::{
    BooleanRandomizer, BytesRandomizer, CharRandomizer, DateRangeRandomizer,
    DateTimeRangeRandomizer, DecimalRangeRandomizer, EnumRandomizer, FloatKind, IntegerKind,
    SharedRandomizer, StringRandomizer, TimeRandomizer, UrlRandomizer, UuidRandomizer,
    ZonedDateTimeRangeRandomizer,
};
use fixture_core::{TypeCatalog, TypeRef};
use std::collections::HashMap;
use std::sync::Arc;

/// Last registry of the chain.
///
/// String and byte lengths follow the string length range; temporal values
/// follow the date range.
pub struct BuiltinRegistry {
    randomizers: HashMap<TypeRef, SharedRandomizer>,
}

impl BuiltinRegistry {
    pub fn new(params: &Parameters, catalog: &TypeCatalog) -> Result<Self, PopulateError> {
        let mut randomizers: HashMap<TypeRef, SharedRandomizer> = HashMap::new();

        randomizers.insert(TypeRef::Bool, Arc::new(BooleanRandomizer));
        randomizers.insert(TypeRef::Char, Arc::new(CharRandomizer));
        randomizers.insert(TypeRef::Byte, Arc::new(IntegerKind::Byte));
        randomizers.insert(TypeRef::Short, Arc::new(IntegerKind::Short));
        randomizers.insert(TypeRef::Int, Arc::new(IntegerKind::Int));
        randomizers.insert(TypeRef::Long, Arc::new(IntegerKind::Long));
        randomizers.insert(TypeRef::Float, Arc::new(FloatKind::Float));
        randomizers.insert(TypeRef::Double, Arc::new(FloatKind::Double));
        randomizers.insert(TypeRef::Decimal, Arc::new(DecimalRangeRandomizer::new(None, None)?));
        randomizers.insert(
            TypeRef::String,
            Arc::new(StringRandomizer::new(params.string_length_range)),
        );
        randomizers.insert(
            TypeRef::Bytes,
            Arc::new(BytesRandomizer::new(params.string_length_range)),
        );
        randomizers.insert(
            TypeRef::Date,
            Arc::new(DateRangeRandomizer::from_range(&params.date_range)),
        );
        randomizers.insert(TypeRef::Time, Arc::new(TimeRandomizer));
        randomizers.insert(
            TypeRef::DateTime,
            Arc::new(DateTimeRangeRandomizer::from_range(&params.date_range)),
        );
        randomizers.insert(
            TypeRef::ZonedDateTime,
            Arc::new(ZonedDateTimeRangeRandomizer::from_range(&params.date_range)),
        );
        randomizers.insert(TypeRef::Uuid, Arc::new(UuidRandomizer));
        randomizers.insert(TypeRef::Url, Arc::new(UrlRandomizer::default()));

        for ty in catalog.enums() {
            randomizers.insert(
                TypeRef::named(&ty.name),
                Arc::new(EnumRandomizer::new(&ty.name, ty.variants.clone())),
            );
        }

        Ok(Self { randomizers })
    }

    /// Check if a randomizer is registered for `ty`.
    pub fn supports(&self, ty: &TypeRef) -> bool {
        self.randomizers.contains_key(ty)
    }
}

impl Registry for BuiltinRegistry {
    fn name(&self) -> &str {
        "builtin"
    }

    fn resolve_type(&self, ty: &TypeRef) -> Option<SharedRandomizer> {
        self.randomizers.get(ty).cloned()
    }
}
