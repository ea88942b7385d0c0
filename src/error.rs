use crate::types::SequenceNumber;

/// Error surfaced verbatim from an event subscriber.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Runtime errors of the command/event machinery.
///
/// `E` is the domain error type of the aggregate being driven; domain
/// rejections and subscriber failures pass through transparently, without
/// wrapping. Retrying is entirely up to the caller: a
/// [`ConcurrencyViolation`](Error::ConcurrencyViolation) is resolved by
/// reloading the aggregate and resubmitting the command.
#[derive(Debug, thiserror::Error)]
pub enum Error<E>
where
    E: std::error::Error,
{
    /// No command handler is registered for the command type.
    #[error("handler for {0} command is not found")]
    HandlerNotFound(String),
    /// No event applier is registered under the derived applier key.
    #[error("event applier for {0} event is not found")]
    ApplierNotFound(String),
    /// The event stream moved since the aggregate was loaded.
    #[error(
        "cannot store events for aggregate {aggregate_id}: expected version {expected}, stream is at {actual}"
    )]
    ConcurrencyViolation {
        aggregate_id: String,
        expected: SequenceNumber,
        actual: SequenceNumber,
    },
    /// The factory has no constructor for the requested aggregate type.
    #[error("{0} is not registered")]
    AggregateTypeNotRegistered(String),
    /// Serialization/deserialization error on an event payload.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The aggregate rejected the command.
    #[error(transparent)]
    Domain(E),
    /// A subscriber failed while handling a published event.
    #[error(transparent)]
    Subscriber(BoxedError),
}
