use crate::types::Identifier;

/// A request to change aggregate state; may be rejected.
///
/// A command names the aggregate instance it targets, the aggregate type
/// used to construct that instance, and its own command type, which is the
/// key command handlers are resolved by.
pub trait Command: Send + Sync {
    type Id: Identifier;

    /// The aggregate instance this command targets.
    fn aggregate_id(&self) -> &Self::Id;

    /// The aggregate type name, as registered with the factory.
    fn aggregate_type(&self) -> &'static str;

    /// The command type name, used for handler resolution.
    fn command_type(&self) -> &'static str;
}
