//! Shared fixtures for the unit tests: a counter aggregate, its commands
//! and events, and a projector counting what it sees.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    Aggregate, AggregateFactory, AggregateManager, AggregateRoot, Command, CommandHandlerFn,
    CommandHandlers, Dispatcher, DomainEvent, DynamicCommandHandler, DynamicEventApplier,
    DynamicEventHandler, EventApplierFn, EventAppliers, EventHandlerFn, EventSubscriptions,
    InMemoryEventBus, InMemoryStore, SequenceNumber, StoreEvent,
};

pub(crate) struct TestAggregate {
    id: Uuid,
    pub(crate) count: i64,
}

impl TestAggregate {
    pub(crate) fn new(id: Uuid) -> Self {
        Self { id, count: 0 }
    }

    pub(crate) fn increment(&self, command: &TestCommand) -> Result<Vec<TestEvent>, TestError> {
        let TestCommand::Increment { amount, .. } = command else {
            unreachable!("routed by command type");
        };
        Ok(vec![TestEvent::Incremented { amount: *amount }])
    }

    pub(crate) fn increment_twice(
        &self,
        command: &TestCommand,
    ) -> Result<Vec<TestEvent>, TestError> {
        let TestCommand::IncrementTwice { amount, .. } = command else {
            unreachable!("routed by command type");
        };
        Ok(vec![
            TestEvent::Incremented { amount: *amount },
            TestEvent::Incremented { amount: *amount },
        ])
    }

    pub(crate) fn on_incremented(&mut self, event: &TestEvent) {
        if let TestEvent::Incremented { amount } = event {
            self.count += amount;
        }
    }
}

impl Aggregate for TestAggregate {
    type Id = Uuid;
    type Command = TestCommand;
    type Event = TestEvent;
    type Error = TestError;

    fn aggregate_type() -> &'static str {
        "test"
    }

    fn aggregate_id(&self) -> &Uuid {
        &self.id
    }
}

impl CommandHandlers for TestAggregate {
    fn handlers() -> Vec<(&'static str, CommandHandlerFn<Self>)> {
        vec![
            (
                "Increment",
                Box::new(|aggregate: &mut Self, command| aggregate.increment(command)),
            ),
            (
                "IncrementTwice",
                Box::new(|aggregate: &mut Self, command| aggregate.increment_twice(command)),
            ),
            ("Reject", Box::new(|_, _| Err(TestError))),
        ]
    }
}

impl EventAppliers for TestAggregate {
    fn appliers() -> Vec<(&'static str, EventApplierFn<Self>)> {
        vec![(
            "OnIncremented",
            Box::new(|aggregate: &mut Self, event| aggregate.on_incremented(event)),
        )]
    }
}

#[derive(Debug)]
pub(crate) enum TestCommand {
    Increment { id: Uuid, amount: i64 },
    IncrementTwice { id: Uuid, amount: i64 },
    Reject { id: Uuid },
    Unroutable { id: Uuid },
}

impl Command for TestCommand {
    type Id = Uuid;

    fn aggregate_id(&self) -> &Uuid {
        match self {
            TestCommand::Increment { id, .. }
            | TestCommand::IncrementTwice { id, .. }
            | TestCommand::Reject { id }
            | TestCommand::Unroutable { id } => id,
        }
    }

    fn aggregate_type(&self) -> &'static str {
        "test"
    }

    fn command_type(&self) -> &'static str {
        match self {
            TestCommand::Increment { .. } => "Increment",
            TestCommand::IncrementTwice { .. } => "IncrementTwice",
            TestCommand::Reject { .. } => "Reject",
            TestCommand::Unroutable { .. } => "Unroutable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub(crate) enum TestEvent {
    Incremented { amount: i64 },
    Renamed { name: String },
}

impl DomainEvent for TestEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TestEvent::Incremented { .. } => "Incremented",
            TestEvent::Renamed { .. } => "Renamed",
        }
    }
}

#[derive(Debug)]
pub(crate) struct TestError;

impl Display for TestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "test error")
    }
}

impl std::error::Error for TestError {}

/// A read model counting every increment it observes.
#[derive(Default)]
pub(crate) struct CountingProjector {
    total: RwLock<i64>,
}

impl CountingProjector {
    pub(crate) fn total(&self) -> i64 {
        *self.total.read()
    }

    fn on_incremented(&self, event: &StoreEvent<TestEvent>) -> Result<(), crate::BoxedError> {
        if let TestEvent::Incremented { amount } = event.payload() {
            *self.total.write() += amount;
        }
        Ok(())
    }
}

impl EventSubscriptions<TestAggregate> for CountingProjector {
    fn handlers() -> Vec<(&'static str, EventHandlerFn<Self, TestAggregate>)> {
        vec![(
            "OnIncremented",
            Box::new(|projector: &Self, event| projector.on_incremented(event)),
        )]
    }
}

pub(crate) fn test_root(id: Uuid) -> AggregateRoot<TestAggregate> {
    AggregateRoot::new(
        TestAggregate::new(id),
        DynamicCommandHandler::new(),
        DynamicEventApplier::new(),
    )
}

pub(crate) fn test_store() -> Arc<InMemoryStore<TestAggregate>> {
    Arc::new(InMemoryStore::new())
}

pub(crate) fn test_manager(
    store: Arc<InMemoryStore<TestAggregate>>,
) -> AggregateManager<TestAggregate> {
    let factory = AggregateFactory::new();
    factory.register_aggregate(Box::new(test_root));
    AggregateManager::new(Box::new(store), factory)
}

pub(crate) fn test_dispatcher() -> (
    Dispatcher<TestAggregate>,
    Arc<InMemoryStore<TestAggregate>>,
    Arc<DynamicEventHandler<CountingProjector, TestAggregate>>,
) {
    let store = test_store();
    let manager = test_manager(Arc::clone(&store));

    let bus = InMemoryEventBus::new();
    let projector = Arc::new(DynamicEventHandler::new(CountingProjector::default()));
    bus.register(projector.clone());

    let dispatcher = Dispatcher::new(Box::new(manager), Box::new(bus));
    (dispatcher, store, projector)
}

pub(crate) fn recorded(event: TestEvent, sequence_number: SequenceNumber) -> StoreEvent<TestEvent> {
    StoreEvent {
        id: Uuid::new_v4(),
        payload: event,
        occurred_on: Utc::now(),
        sequence_number,
    }
}
