use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::aggregate::Aggregate;
use crate::error::Error;
use crate::event::DomainEvent;
use crate::event_handler::EventHandler;
use crate::store::StoreEvent;

/// Outbound side of the event bus: fans persisted events out to whoever is
/// interested.
pub trait EventPublisher<A: Aggregate>: Send + Sync {
    /// Delivers the batch to every registered subscriber whose interest
    /// matches, stopping at the first subscriber error.
    fn publish(&self, events: &[StoreEvent<A::Event>]) -> Result<(), Error<A::Error>>;
}

/// Blanket implementation making an [`EventPublisher`] of every (smart)
/// pointer to an [`EventPublisher`], so a shared `Arc<InMemoryEventBus>`
/// can keep accepting registrations while the dispatcher publishes on it.
impl<A, T, P> EventPublisher<A> for T
where
    A: Aggregate,
    P: EventPublisher<A> + ?Sized,
    T: Deref<Target = P> + Send + Sync,
{
    fn publish(&self, events: &[StoreEvent<A::Event>]) -> Result<(), Error<A::Error>> {
        self.deref().publish(events)
    }
}

/// A synchronous, in-process event bus.
///
/// Suitable for a simple, single-node application that can safely build
/// its subscriber list at startup and keep it in memory. Subscribers are
/// invoked on the publishing thread; there is no delivery retry and no
/// atomicity across subscribers — whoever ran before a failing subscriber
/// has already observed its events.
pub struct InMemoryEventBus<A: Aggregate> {
    subscribers: RwLock<Vec<Arc<dyn EventHandler<A>>>>,
}

impl<A: Aggregate> InMemoryEventBus<A> {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Adds a subscriber. Registering the same allocation twice is a
    /// no-op.
    pub fn register(&self, subscriber: Arc<dyn EventHandler<A>>) {
        let mut subscribers = self.subscribers.write();

        let ptr = Arc::as_ptr(&subscriber) as *const ();
        if subscribers.iter().any(|s| std::ptr::eq(Arc::as_ptr(s) as *const (), ptr)) {
            return;
        }

        subscribers.push(subscriber);
    }
}

impl<A: Aggregate> Default for InMemoryEventBus<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> EventPublisher<A> for InMemoryEventBus<A> {
    fn publish(&self, events: &[StoreEvent<A::Event>]) -> Result<(), Error<A::Error>> {
        let subscribers = self.subscribers.read();

        for subscriber in subscribers.iter() {
            let matcher = subscriber.subscribed_to();

            for event in events {
                if !matcher.matches(event.payload().event_type()) {
                    continue;
                }

                let span = tracing::debug_span!(
                    "event_handler",
                    event_id = %event.id,
                    event_type = event.payload().event_type(),
                    event_handler = subscriber.name()
                );
                let _e = span.enter();

                if let Err(error) = subscriber.handle(event) {
                    tracing::error!({
                        event_id = %event.id,
                        event_handler = subscriber.name(),
                        error = ?error,
                    }, "subscriber failed to handle event");

                    return Err(Error::Subscriber(error));
                }
            }
        }

        Ok(())
    }
}
