use crate::aggregate::{Aggregate, ApplyEvent, HandleCommand};
use crate::error::Error;
use crate::types::SequenceNumber;

/// An aggregate coupled with its command-handler and event-applier
/// registries, plus the version counter used for optimistic concurrency.
///
/// The pure aggregate is held by explicit delegation: identity queries are
/// forwarded to it, and all state transitions flow through the applier
/// registry. The version strictly equals the number of events folded into
/// the aggregate over its lifetime, whether during command handling or
/// replay.
///
/// A root is built fresh per command-handling cycle — usually by an
/// [`AggregateFactory`](crate::AggregateFactory) constructor — hydrated by
/// replaying its history, mutated by one command and then discarded.
pub struct AggregateRoot<A: Aggregate> {
    aggregate: A,
    version: SequenceNumber,
    command_handler: Box<dyn HandleCommand<A> + Send + Sync>,
    event_applier: Box<dyn ApplyEvent<A> + Send + Sync>,
}

impl<A: Aggregate> AggregateRoot<A> {
    /// Couples the pure aggregate with both registries.
    ///
    /// Every collaborator is required; an aggregate with no handlers takes
    /// an empty [`StaticCommandHandler`](crate::StaticCommandHandler) as
    /// the sentinel.
    pub fn new(
        aggregate: A,
        command_handler: impl HandleCommand<A> + Send + Sync + 'static,
        event_applier: impl ApplyEvent<A> + Send + Sync + 'static,
    ) -> Self {
        Self {
            aggregate,
            version: 0,
            command_handler: Box::new(command_handler),
            event_applier: Box::new(event_applier),
        }
    }

    pub fn aggregate(&self) -> &A {
        &self.aggregate
    }

    pub fn aggregate_id(&self) -> &A::Id {
        self.aggregate.aggregate_id()
    }

    /// The number of events folded into the aggregate so far.
    pub fn version(&self) -> SequenceNumber {
        self.version
    }

    /// Executes the command and immediately folds the produced events into
    /// the aggregate's state, returning them.
    ///
    /// A handler failure leaves state and version untouched. An applier
    /// failure mid-fold keeps the already-applied prefix, counted in the
    /// version; nothing is persisted in either case, so the instance is
    /// discarded by the dispatch cycle.
    pub fn handle(&mut self, command: &A::Command) -> Result<Vec<A::Event>, Error<A::Error>> {
        let events = self.command_handler.handle(&mut self.aggregate, command)?;

        self.apply(&events)?;

        Ok(events)
    }

    /// Folds events into the aggregate's state, one version increment per
    /// applied event.
    ///
    /// This is the replay path: historical events are re-applied with no
    /// handler-resolution step. Application stops at the first event
    /// without an applier; events applied before the failure remain
    /// applied.
    pub fn apply<'e, I>(&mut self, events: I) -> Result<(), Error<A::Error>>
    where
        I: IntoIterator<Item = &'e A::Event>,
        A::Event: 'e,
    {
        for event in events {
            self.event_applier.apply(&mut self.aggregate, event)?;
            self.version += 1;
        }

        Ok(())
    }
}
