use serde::de::DeserializeOwned;
use serde::Serialize;

/// An immutable fact recording a state change that already happened.
///
/// Events are named with a past-participle verb, such as `OrderConfirmed`;
/// the event type name is the key appliers and subscriber interest are
/// resolved by.
pub trait DomainEvent: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The event type name.
    fn event_type(&self) -> &'static str;
}

/// A predicate over event type names, used by subscribers to declare which
/// events they want delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventMatcher {
    /// Matches every event.
    Any,
    /// Matches events whose type name is in the list.
    AnyOf(Vec<String>),
}

impl EventMatcher {
    /// Builds a matcher for the given event type names.
    pub fn any_of<I, S>(event_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut event_types: Vec<String> = event_types.into_iter().map(Into::into).collect();
        event_types.sort();
        event_types.dedup();
        EventMatcher::AnyOf(event_types)
    }

    pub fn matches(&self, event_type: &str) -> bool {
        match self {
            EventMatcher::Any => true,
            EventMatcher::AnyOf(event_types) => event_types.iter().any(|t| t == event_type),
        }
    }
}
