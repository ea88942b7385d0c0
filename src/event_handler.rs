use std::collections::HashMap;

use parking_lot::RwLock;

use crate::aggregate::Aggregate;
use crate::error::BoxedError;
use crate::event::{DomainEvent, EventMatcher};
use crate::store::StoreEvent;

/// A subscriber to published events. An event handler is intended to be an
/// entity which can build a read side or perform side effects.
pub trait EventHandler<A: Aggregate>: Send + Sync {
    /// Handle one published event and perform an action. This action could
    /// be over a read model or a side-effect.
    fn handle(&self, event: &StoreEvent<A::Event>) -> Result<(), BoxedError>;

    /// The events this subscriber is interested in. The bus evaluates the
    /// matcher per event; the default is interest in everything.
    fn subscribed_to(&self) -> EventMatcher {
        EventMatcher::Any
    }

    /// The name of the event handler. By default, this is the type name of
    /// the event handler, but it can be overridden to provide a custom
    /// name. This name is used as part of tracing spans.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A function handling one published event on behalf of the entity `T`.
pub type EventHandlerFn<T, A> = Box<
    dyn Fn(&T, &StoreEvent<<A as Aggregate>::Event>) -> Result<(), BoxedError> + Send + Sync,
>;

/// Returned when a subscriber registry receives an event it never
/// registered a handler for. Unreachable through the bus, which filters on
/// [`EventHandler::subscribed_to`] first.
#[derive(Debug, thiserror::Error)]
#[error("event handler for {0} event is not found")]
pub struct UnhandledEvent(pub String);

/// Subscriber registry populated by explicit registration.
///
/// Owns the entity (typically a projector building a read model) and
/// routes each event to the handler registered under
/// `"On" + event_type`. Its subscription set is derived from the
/// registered keys.
pub struct StaticEventHandler<T, A: Aggregate> {
    entity: T,
    handlers: RwLock<HashMap<String, EventHandlerFn<T, A>>>,
}

impl<T, A> StaticEventHandler<T, A>
where
    T: Send + Sync,
    A: Aggregate,
{
    pub fn new(entity: T) -> Self {
        Self {
            entity,
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers an event handler under the given method name, `On` marker
    /// included.
    pub fn register_handler(&self, method: impl Into<String>, handler: EventHandlerFn<T, A>) {
        self.handlers.write().insert(method.into(), handler);
    }

    pub fn entity(&self) -> &T {
        &self.entity
    }
}

impl<T, A> EventHandler<A> for StaticEventHandler<T, A>
where
    T: Send + Sync,
    A: Aggregate,
{
    fn handle(&self, event: &StoreEvent<A::Event>) -> Result<(), BoxedError> {
        let handlers = self.handlers.read();

        let handler_id = format!("On{}", event.payload().event_type());
        let handler = handlers
            .get(&handler_id)
            .ok_or_else(|| Box::new(UnhandledEvent(handler_id)) as BoxedError)?;

        handler(&self.entity, event)
    }

    fn subscribed_to(&self) -> EventMatcher {
        let handlers = self.handlers.read();

        EventMatcher::any_of(
            handlers
                .keys()
                .map(|method| method.strip_prefix("On").unwrap_or(method)),
        )
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Declares the event handlers of a subscriber entity, keyed by the
/// `"On" + event_type` convention; the subscriber-side counterpart of the
/// aggregate's applier table.
pub trait EventSubscriptions<A: Aggregate>: Sized {
    fn handlers() -> Vec<(&'static str, EventHandlerFn<Self, A>)>;
}

/// Subscriber registry populated from the entity type's declared handler
/// table.
pub struct DynamicEventHandler<T, A: Aggregate> {
    inner: StaticEventHandler<T, A>,
}

impl<T, A> DynamicEventHandler<T, A>
where
    T: EventSubscriptions<A> + Send + Sync,
    A: Aggregate,
{
    pub fn new(entity: T) -> Self {
        let inner = StaticEventHandler::new(entity);
        for (method, handler) in T::handlers() {
            inner.register_handler(method, handler);
        }
        Self { inner }
    }
}

impl<T, A> DynamicEventHandler<T, A>
where
    T: Send + Sync,
    A: Aggregate,
{
    pub fn entity(&self) -> &T {
        self.inner.entity()
    }
}

impl<T, A> EventHandler<A> for DynamicEventHandler<T, A>
where
    T: Send + Sync,
    A: Aggregate,
{
    fn handle(&self, event: &StoreEvent<A::Event>) -> Result<(), BoxedError> {
        self.inner.handle(event)
    }

    fn subscribed_to(&self) -> EventMatcher {
        self.inner.subscribed_to()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
