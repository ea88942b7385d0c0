use crate::aggregate::Aggregate;
use crate::command::Command;
use crate::error::Error;
use crate::event_bus::EventPublisher;
use crate::manager::AggregateStore;

/// Drives the overall command handling and event application/distribution
/// process: load the target aggregate, let it handle the command, persist
/// the produced events, publish them.
///
/// The dispatcher is stateless between calls and never retries: every
/// failure — including a [`ConcurrencyViolation`](Error::ConcurrencyViolation)
/// — is terminal for the invocation and must be resubmitted by the caller.
/// A publish failure is returned even though the events are already
/// durably stored at that point.
pub struct Dispatcher<A: Aggregate> {
    aggregate_store: Box<dyn AggregateStore<A>>,
    event_publisher: Box<dyn EventPublisher<A>>,
}

impl<A: Aggregate> Dispatcher<A> {
    pub fn new(
        aggregate_store: Box<dyn AggregateStore<A>>,
        event_publisher: Box<dyn EventPublisher<A>>,
    ) -> Self {
        Self {
            aggregate_store,
            event_publisher,
        }
    }

    /// Routes the command to its aggregate and returns the events it
    /// produced, after they have been persisted and published.
    #[tracing::instrument(
        skip_all,
        fields(aggregate_id = %command.aggregate_id(), command_type = command.command_type()),
        err
    )]
    pub fn handle(&self, command: A::Command) -> Result<Vec<A::Event>, Error<A::Error>> {
        let mut root = self
            .aggregate_store
            .load(command.aggregate_id(), command.aggregate_type())?;

        let events = root.handle(&command)?;

        let store_events = self.aggregate_store.store(&root, events.clone())?;

        self.event_publisher.publish(&store_events)?;

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::testing::{test_dispatcher, TestCommand, TestEvent};
    use crate::EventStore;

    #[test]
    fn it_loads_handles_stores_and_publishes() {
        let (dispatcher, store, projector) = test_dispatcher();
        let id = Uuid::new_v4();

        dispatcher
            .handle(TestCommand::Increment { id, amount: 2 })
            .unwrap();
        let events = dispatcher
            .handle(TestCommand::IncrementTwice { id, amount: 3 })
            .unwrap();

        assert_eq!(
            events,
            vec![
                TestEvent::Incremented { amount: 3 },
                TestEvent::Incremented { amount: 3 },
            ]
        );
        assert_eq!(store.by_aggregate_id(&id).unwrap().len(), 3);
        assert_eq!(projector.entity().total(), 8);
    }

    #[test]
    fn a_rejected_command_persists_nothing() {
        let (dispatcher, store, projector) = test_dispatcher();
        let id = Uuid::new_v4();

        let result = dispatcher.handle(TestCommand::Reject { id });

        assert!(matches!(result, Err(Error::Domain(_))));
        assert!(store.by_aggregate_id(&id).unwrap().is_empty());
        assert_eq!(projector.entity().total(), 0);
    }

    #[test]
    fn an_unroutable_command_fails_before_any_write() {
        let (dispatcher, store, _) = test_dispatcher();
        let id = Uuid::new_v4();

        let result = dispatcher.handle(TestCommand::Unroutable { id });

        assert!(matches!(result, Err(Error::HandlerNotFound(_))));
        assert!(store.by_aggregate_id(&id).unwrap().is_empty());
    }
}
