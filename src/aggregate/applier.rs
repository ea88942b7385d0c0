use std::collections::HashMap;

use parking_lot::RwLock;

use crate::aggregate::Aggregate;
use crate::error::Error;
use crate::event::DomainEvent;

/// A function that folds one event into the aggregate's state.
///
/// Appliers are total: an event that reached its applier always applies.
pub type EventApplierFn<A> = Box<dyn Fn(&mut A, &<A as Aggregate>::Event) + Send + Sync>;

/// Resolves and executes event appliers on behalf of an aggregate.
pub trait ApplyEvent<A: Aggregate> {
    /// Looks up the applier registered under `"On" + event_type` and
    /// invokes it.
    fn apply(&self, aggregate: &mut A, event: &A::Event) -> Result<(), Error<A::Error>>;
}

/// Event-applier registry populated by explicit registration.
pub struct StaticEventApplier<A: Aggregate> {
    appliers: RwLock<HashMap<String, EventApplierFn<A>>>,
}

impl<A: Aggregate> StaticEventApplier<A> {
    pub fn new() -> Self {
        Self {
            appliers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers an event applier under the given method name.
    ///
    /// The name carries the `On` marker prefix: the applier for a
    /// `GameCreated` event registers as `OnGameCreated`.
    pub fn register_applier(&self, method: impl Into<String>, applier: EventApplierFn<A>) {
        self.appliers.write().insert(method.into(), applier);
    }
}

impl<A: Aggregate> Default for StaticEventApplier<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> ApplyEvent<A> for StaticEventApplier<A> {
    fn apply(&self, aggregate: &mut A, event: &A::Event) -> Result<(), Error<A::Error>> {
        let appliers = self.appliers.read();

        let applier_id = format!("On{}", event.event_type());
        let applier = appliers
            .get(&applier_id)
            .ok_or(Error::ApplierNotFound(applier_id))?;

        applier(aggregate, event);

        Ok(())
    }
}

/// Declares the event appliers of an aggregate type, keyed by the
/// `"On" + event_type` convention.
///
/// The statically-checkable replacement for discovering `On*` methods at
/// runtime; [`DynamicEventApplier`] binds every entry on construction.
pub trait EventAppliers: Aggregate {
    fn appliers() -> Vec<(&'static str, EventApplierFn<Self>)>;
}

/// Event-applier registry populated from the aggregate type's declared
/// applier table.
pub struct DynamicEventApplier<A: Aggregate> {
    inner: StaticEventApplier<A>,
}

impl<A: EventAppliers> DynamicEventApplier<A> {
    pub fn new() -> Self {
        let inner = StaticEventApplier::new();
        for (method, applier) in A::appliers() {
            inner.register_applier(method, applier);
        }
        Self { inner }
    }
}

impl<A: EventAppliers> Default for DynamicEventApplier<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> DynamicEventApplier<A> {
    pub fn register_applier(&self, method: impl Into<String>, applier: EventApplierFn<A>) {
        self.inner.register_applier(method, applier);
    }
}

impl<A: Aggregate> ApplyEvent<A> for DynamicEventApplier<A> {
    fn apply(&self, aggregate: &mut A, event: &A::Event) -> Result<(), Error<A::Error>> {
        self.inner.apply(aggregate, event)
    }
}
