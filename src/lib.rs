//! A minimal, synchronous event-sourcing/CQRS runtime.
//!
//! State changes of an [`Aggregate`] are captured as an ordered log of
//! domain events rather than as mutable fields. The [`Dispatcher`] routes
//! a [`Command`] to its aggregate, persists the resulting events through
//! an [`EventStore`] under optimistic concurrency, and fans them out to
//! subscribers over an [`EventPublisher`].

mod aggregate;
mod command;
mod dispatcher;
mod error;
mod event;
mod event_bus;
mod event_handler;
mod manager;
mod store;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::aggregate::{
    Aggregate, AggregateFactory, AggregateRoot, ApplyEvent, CommandHandlerFn, CommandHandlers,
    DynamicCommandHandler, DynamicEventApplier, EventApplierFn, EventAppliers, FactoryFn,
    HandleCommand, StaticCommandHandler, StaticEventApplier,
};
pub use crate::command::Command;
pub use crate::dispatcher::Dispatcher;
pub use crate::error::{BoxedError, Error};
pub use crate::event::{DomainEvent, EventMatcher};
pub use crate::event_bus::{EventPublisher, InMemoryEventBus};
pub use crate::event_handler::{
    DynamicEventHandler, EventHandler, EventHandlerFn, EventSubscriptions, StaticEventHandler,
    UnhandledEvent,
};
pub use crate::manager::{AggregateManager, AggregateStore};
pub use crate::store::{EventStore, InMemoryStore, StoreEvent};
pub use crate::types::{Identifier, SequenceNumber};
