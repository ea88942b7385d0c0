use std::ops::Deref;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::error::Error;
use crate::types::SequenceNumber;

mod memory;

pub use memory::InMemoryStore;

/// An event store is responsible for persisting the events an aggregate
/// emits and loading back the stream that represents its history.
///
/// Writes are guarded by optimistic concurrency: the caller states the
/// stream length it observed, and the store only appends when the stream
/// has not moved since.
pub trait EventStore<A: Aggregate>: Send + Sync {
    /// Loads the full recorded stream of an aggregate instance, oldest
    /// first.
    ///
    /// An unknown id yields an empty stream, not an error.
    fn by_aggregate_id(
        &self,
        aggregate_id: &A::Id,
    ) -> Result<Vec<StoreEvent<A::Event>>, Error<A::Error>>;

    /// Appends `events` to the stream of `aggregate_id`, recording their
    /// metadata, and returns the recorded envelopes.
    ///
    /// Fails with [`Error::ConcurrencyViolation`] — writing nothing — when
    /// the current stream length differs from `expected_version`. The new
    /// stream is always the previous stream followed by `events`: history
    /// is never replaced.
    fn persist(
        &self,
        aggregate_id: &A::Id,
        expected_version: SequenceNumber,
        events: Vec<A::Event>,
    ) -> Result<Vec<StoreEvent<A::Event>>, Error<A::Error>>;
}

/// Blanket implementation making an [`EventStore`] of every (smart)
/// pointer to an [`EventStore`], e.g. `&Store`, `Box<Store>`, `Arc<Store>`.
/// This is particularly useful to share one store between an aggregate
/// store and test code observing the streams directly.
impl<A, T, S> EventStore<A> for T
where
    A: Aggregate,
    S: EventStore<A> + ?Sized,
    T: Deref<Target = S> + Send + Sync,
{
    fn by_aggregate_id(
        &self,
        aggregate_id: &A::Id,
    ) -> Result<Vec<StoreEvent<A::Event>>, Error<A::Error>> {
        self.deref().by_aggregate_id(aggregate_id)
    }

    fn persist(
        &self,
        aggregate_id: &A::Id,
        expected_version: SequenceNumber,
        events: Vec<A::Event>,
    ) -> Result<Vec<StoreEvent<A::Event>>, Error<A::Error>> {
        self.deref().persist(aggregate_id, expected_version, events)
    }
}

/// A `StoreEvent` contains the payload (the original event) alongside the
/// event's metadata.
#[derive(Debug, Clone)]
pub struct StoreEvent<Event> {
    /// Uniquely identifies an event among all events emitted from all
    /// aggregates.
    pub id: Uuid,
    /// The original, emitted, event.
    pub payload: Event,
    /// The timestamp of when the event was persisted.
    pub occurred_on: DateTime<Utc>,
    /// The sequence number of the event, within its specific aggregate
    /// instance.
    pub sequence_number: SequenceNumber,
}

impl<Event> StoreEvent<Event> {
    /// Returns the sequence number of the event, within its specific
    /// aggregate instance.
    pub const fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }

    /// Returns the original, emitted, event.
    pub const fn payload(&self) -> &Event {
        &self.payload
    }
}
