//! Container filling.

use crate::context::PopulationContext;
use crate::error::PopulateError;
use crate::parameters::SizeRange;
use crate::randomizers::{Randomizer, SharedRandomizer};
use fixture_core::{QueueKind, TypeRef, Value};

/// Attempts per requested set element before giving up on reaching the
/// target size.
pub const SET_RETRY_FACTOR: usize = 10;

/// Populates container elements.
pub trait ElementPopulator {
    /// Populate one element of type `ty`.
    fn populate_element(
        &self,
        ty: &TypeRef,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, PopulateError>;

    /// Built-in randomizer for a primitive element type.
    fn primitive_randomizer(&self, ty: &TypeRef) -> Option<SharedRandomizer>;
}

/// Fills lists, sets, maps, arrays and queues.
#[derive(Debug, Clone, Copy)]
pub struct ContainerStrategy {
    size: SizeRange,
}

impl ContainerStrategy {
    pub fn new(size: SizeRange) -> Self {
        Self { size }
    }

    /// Fill a container of type `ty`.
    ///
    /// The element count is drawn before any element. Synchronous and delay
    /// queues are rejected without drawing.
    pub fn fill(
        &self,
        ty: &TypeRef,
        elements: &dyn ElementPopulator,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Value, PopulateError> {
        match ty {
            TypeRef::List { element } => {
                let count = self.draw_count(ctx);
                Ok(Value::List(self.fill_sequence(element, count, elements, ctx)?))
            }
            TypeRef::Array { element } => {
                let count = self.draw_count(ctx);
                if element.is_primitive() {
                    if let Some(randomizer) = elements.primitive_randomizer(element) {
                        let items = (0..count).map(|_| randomizer.produce(ctx.source())).collect();
                        return Ok(Value::Array(items));
                    }
                }
                Ok(Value::Array(self.fill_sequence(element, count, elements, ctx)?))
            }
            TypeRef::Set { element } => {
                let count = self.draw_count(ctx);
                Ok(Value::Set(self.fill_set(element, count, elements, ctx)?))
            }
            TypeRef::Map { key, value } => {
                let count = self.draw_count(ctx);
                Ok(Value::Map(self.fill_map(key, value, count, elements, ctx)?))
            }
            TypeRef::Queue { element, kind } => {
                let count = match kind {
                    QueueKind::Synchronous | QueueKind::Delay => {
                        return Err(PopulateError::UnsupportedOperation(format!(
                            "cannot populate {ty}: the queue kind has no fixed element count"
                        )));
                    }
                    QueueKind::Fifo => self.draw_count(ctx),
                    QueueKind::Bounded { capacity } => self.draw_count(ctx).min(*capacity),
                };
                Ok(Value::List(self.fill_sequence(element, count, elements, ctx)?))
            }
            other => Err(PopulateError::InvalidArgument(format!(
                "{other} is not a container type"
            ))),
        }
    }

    fn draw_count(&self, ctx: &mut PopulationContext<'_>) -> usize {
        ctx.source().count_in(self.size.min, self.size.max)
    }

    fn fill_sequence(
        &self,
        element: &TypeRef,
        count: usize,
        elements: &dyn ElementPopulator,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Vec<Value>, PopulateError> {
        (0..count)
            .map(|_| elements.populate_element(element, ctx))
            .collect()
    }

    fn fill_set(
        &self,
        element: &TypeRef,
        count: usize,
        elements: &dyn ElementPopulator,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Vec<Value>, PopulateError> {
        let mut items: Vec<Value> = Vec::with_capacity(count);
        let mut attempts = 0;
        while items.len() < count && attempts < count * SET_RETRY_FACTOR {
            attempts += 1;
            let item = elements.populate_element(element, ctx)?;
            if !items.contains(&item) {
                items.push(item);
            }
        }
        Ok(items)
    }

    fn fill_map(
        &self,
        key: &TypeRef,
        value: &TypeRef,
        count: usize,
        elements: &dyn ElementPopulator,
        ctx: &mut PopulationContext<'_>,
    ) -> Result<Vec<(Value, Value)>, PopulateError> {
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(count);
        for _ in 0..count {
            let k = elements.populate_element(key, ctx)?;
            let v = elements.populate_element(value, ctx)?;
            match entries.iter_mut().find(|(existing, _)| *existing == k) {
                Some(entry) => entry.1 = v,
                None => entries.push((k, v)),
            }
        }
        Ok(entries)
    }
}
