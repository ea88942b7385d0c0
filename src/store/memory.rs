use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::error::Error;
use crate::store::{EventStore, StoreEvent};
use crate::types::SequenceNumber;

/// One persisted event, payload kept in its serialized form.
#[derive(Debug, Clone)]
struct EventRow {
    id: Uuid,
    payload: serde_json::Value,
    occurred_on: DateTime<Utc>,
    sequence_number: SequenceNumber,
}

/// Event store backed by an in-memory map of id → stream.
///
/// The optimistic-concurrency check and the append run inside a single
/// critical section: the version is read under an upgradable lock that is
/// upgraded in place for the write, so two racing `persist` calls for the
/// same id can never both pass the check. Plain loads stay concurrent with
/// the check phase.
pub struct InMemoryStore<A: Aggregate> {
    streams: RwLock<HashMap<A::Id, Vec<EventRow>>>,
}

impl<A: Aggregate> InMemoryStore<A> {
    pub fn new() -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
        }
    }
}

impl<A: Aggregate> Default for InMemoryStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> EventStore<A> for InMemoryStore<A> {
    fn by_aggregate_id(
        &self,
        aggregate_id: &A::Id,
    ) -> Result<Vec<StoreEvent<A::Event>>, Error<A::Error>> {
        let streams = self.streams.read();

        let Some(rows) = streams.get(aggregate_id) else {
            return Ok(Vec::new());
        };

        rows.iter()
            .map(|row| {
                Ok(StoreEvent {
                    id: row.id,
                    payload: serde_json::from_value(row.payload.clone())?,
                    occurred_on: row.occurred_on,
                    sequence_number: row.sequence_number,
                })
            })
            .collect()
    }

    fn persist(
        &self,
        aggregate_id: &A::Id,
        expected_version: SequenceNumber,
        events: Vec<A::Event>,
    ) -> Result<Vec<StoreEvent<A::Event>>, Error<A::Error>> {
        let streams = self.streams.upgradable_read();

        let actual = streams
            .get(aggregate_id)
            .map_or(0, |rows| rows.len() as SequenceNumber);
        if actual != expected_version {
            return Err(Error::ConcurrencyViolation {
                aggregate_id: aggregate_id.to_string(),
                expected: expected_version,
                actual,
            });
        }

        let occurred_on: DateTime<Utc> = Utc::now();
        let mut rows: Vec<EventRow> = Vec::with_capacity(events.len());
        let mut store_events: Vec<StoreEvent<A::Event>> = Vec::with_capacity(events.len());

        for (offset, event) in events.into_iter().enumerate() {
            let row = EventRow {
                id: Uuid::new_v4(),
                payload: serde_json::to_value(&event)?,
                occurred_on,
                sequence_number: actual + offset as SequenceNumber + 1,
            };
            store_events.push(StoreEvent {
                id: row.id,
                payload: event,
                occurred_on: row.occurred_on,
                sequence_number: row.sequence_number,
            });
            rows.push(row);
        }

        let mut streams = RwLockUpgradableReadGuard::upgrade(streams);
        streams
            .entry(aggregate_id.clone())
            .or_default()
            .extend(rows);

        Ok(store_events)
    }
}
