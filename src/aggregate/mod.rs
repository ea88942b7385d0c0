use crate::command::Command;
use crate::event::DomainEvent;
use crate::types::Identifier;

mod applier;
mod factory;
mod handler;
mod root;

pub use applier::{ApplyEvent, DynamicEventApplier, EventApplierFn, EventAppliers, StaticEventApplier};
pub use factory::{AggregateFactory, FactoryFn};
pub use handler::{CommandHandlerFn, CommandHandlers, DynamicCommandHandler, HandleCommand, StaticCommandHandler};
pub use root::AggregateRoot;

/// The pure, framework-free business entity.
///
/// An aggregate is a cluster of domain objects treated as a single unit:
/// every transaction is scoped to one aggregate instance, and its state
/// upholds the business rules commands are validated against. It holds only
/// its identifier and domain state, and knows nothing about persistence or
/// dispatch; the runtime couples it with registries through
/// [`AggregateRoot`].
pub trait Aggregate: Send + Sync + Sized + 'static {
    type Id: Identifier;
    type Command: Command<Id = Self::Id>;
    type Event: DomainEvent;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the name of this aggregate type.
    ///
    /// _Note:_ constructors are registered with the factory under this
    /// name, and commands carry it to select the constructor; it should
    /// never change.
    fn aggregate_type() -> &'static str;

    /// Returns the unique id of this aggregate instance.
    fn aggregate_id(&self) -> &Self::Id;
}
