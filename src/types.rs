use std::fmt::Display;
use std::hash::Hash;

/// Sequence number of an event within its aggregate instance.
///
/// The version of an aggregate is the sequence number of the last event
/// folded into it, so this alias doubles as the optimistic-concurrency
/// token checked at persist time.
pub type SequenceNumber = u64;

/// An opaque value uniquely naming one aggregate instance.
///
/// Identifiers are equality-comparable, hashable and printable; an id is
/// never reused across aggregates. Blanket-implemented, so `Uuid`,
/// `String` or any newtype over them qualifies.
pub trait Identifier: Display + Clone + Eq + Hash + Send + Sync + 'static {}

impl<T> Identifier for T where T: Display + Clone + Eq + Hash + Send + Sync + 'static {}
