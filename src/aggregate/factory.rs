use std::collections::HashMap;

use parking_lot::RwLock;

use crate::aggregate::{Aggregate, AggregateRoot};
use crate::error::Error;

/// A constructor producing a fresh, zero-version [`AggregateRoot`] for the
/// given id, with its registries already attached.
pub type FactoryFn<A> = Box<dyn Fn(<A as Aggregate>::Id) -> AggregateRoot<A> + Send + Sync>;

/// Creates aggregates by their registered type name.
///
/// The factory is owned by the aggregate store that loads through it;
/// nothing here is global.
pub struct AggregateFactory<A: Aggregate> {
    factories: RwLock<HashMap<&'static str, FactoryFn<A>>>,
}

impl<A: Aggregate> AggregateFactory<A> {
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a constructor under the type name the constructed
    /// aggregates report.
    pub fn register_aggregate(&self, factory: FactoryFn<A>) {
        self.factories.write().insert(A::aggregate_type(), factory);
    }

    /// Creates a fresh aggregate of the given type.
    pub fn create_aggregate(
        &self,
        aggregate_type: &str,
        aggregate_id: A::Id,
    ) -> Result<AggregateRoot<A>, Error<A::Error>> {
        let factories = self.factories.read();

        let factory = factories
            .get(aggregate_type)
            .ok_or_else(|| Error::AggregateTypeNotRegistered(aggregate_type.to_owned()))?;

        Ok(factory(aggregate_id))
    }
}

impl<A: Aggregate> Default for AggregateFactory<A> {
    fn default() -> Self {
        Self::new()
    }
}
