use crate::aggregate::{Aggregate, AggregateFactory, AggregateRoot};
use crate::error::Error;
use crate::store::{EventStore, StoreEvent};
use crate::types::SequenceNumber;

/// Loads and stores aggregates on top of an event store.
///
/// This is the storage-facing orchestration contract: an alternative
/// persistence backend plugs in by implementing it (or by implementing
/// [`EventStore`] and reusing [`AggregateManager`]).
pub trait AggregateStore<A: Aggregate>: Send + Sync {
    /// Rebuilds the aggregate's current state by replaying its recorded
    /// stream into a freshly constructed instance.
    fn load(
        &self,
        aggregate_id: &A::Id,
        aggregate_type: &str,
    ) -> Result<AggregateRoot<A>, Error<A::Error>>;

    /// Persists the events produced by the aggregate, under the version it
    /// had before they were folded in.
    fn store(
        &self,
        root: &AggregateRoot<A>,
        events: Vec<A::Event>,
    ) -> Result<Vec<StoreEvent<A::Event>>, Error<A::Error>>;
}

/// The [`AggregateStore`] implementation coupling an [`EventStore`] with an
/// [`AggregateFactory`], so that events can be persisted when handled and
/// state can be reconstructed by loading and applying events sequentially.
pub struct AggregateManager<A: Aggregate> {
    event_store: Box<dyn EventStore<A>>,
    factory: AggregateFactory<A>,
}

impl<A: Aggregate> AggregateManager<A> {
    pub fn new(event_store: Box<dyn EventStore<A>>, factory: AggregateFactory<A>) -> Self {
        Self {
            event_store,
            factory,
        }
    }
}

impl<A: Aggregate> AggregateStore<A> for AggregateManager<A> {
    fn load(
        &self,
        aggregate_id: &A::Id,
        aggregate_type: &str,
    ) -> Result<AggregateRoot<A>, Error<A::Error>> {
        let store_events = self.event_store.by_aggregate_id(aggregate_id)?;

        let mut root = self
            .factory
            .create_aggregate(aggregate_type, aggregate_id.clone())?;

        root.apply(store_events.iter().map(StoreEvent::payload))?;

        Ok(root)
    }

    #[tracing::instrument(skip_all, fields(aggregate_id = %root.aggregate_id()), err)]
    fn store(
        &self,
        root: &AggregateRoot<A>,
        events: Vec<A::Event>,
    ) -> Result<Vec<StoreEvent<A::Event>>, Error<A::Error>> {
        // The optimistic-concurrency token is the version the aggregate had
        // when it was loaded, i.e. before `events` were folded into it.
        let produced = events.len() as SequenceNumber;
        debug_assert!(
            root.version() >= produced,
            "events must already be folded into the aggregate"
        );
        let expected_version = root.version() - produced;

        self.event_store
            .persist(root.aggregate_id(), expected_version, events)
    }
}
