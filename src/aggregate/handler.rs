use std::collections::HashMap;

use parking_lot::RwLock;

use crate::aggregate::Aggregate;
use crate::command::Command;
use crate::error::Error;

/// A function that validates a command against the aggregate's current
/// state and produces the resulting events, or rejects the command with a
/// domain error.
pub type CommandHandlerFn<A> = Box<
    dyn Fn(
            &mut A,
            &<A as Aggregate>::Command,
        ) -> Result<Vec<<A as Aggregate>::Event>, <A as Aggregate>::Error>
        + Send
        + Sync,
>;

/// Resolves and executes command handlers on behalf of an aggregate.
pub trait HandleCommand<A: Aggregate> {
    /// Looks up the handler registered under the command's type name and
    /// invokes it, returning the produced events.
    fn handle(
        &self,
        aggregate: &mut A,
        command: &A::Command,
    ) -> Result<Vec<A::Event>, Error<A::Error>>;
}

/// Command-handler registry populated by explicit registration.
///
/// An empty registry is a valid collaborator for aggregates that handle no
/// commands (replay-only use).
pub struct StaticCommandHandler<A: Aggregate> {
    handlers: RwLock<HashMap<String, CommandHandlerFn<A>>>,
}

impl<A: Aggregate> StaticCommandHandler<A> {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a command handler under the given method name.
    pub fn register_handler(&self, method: impl Into<String>, handler: CommandHandlerFn<A>) {
        self.handlers.write().insert(method.into(), handler);
    }
}

impl<A: Aggregate> Default for StaticCommandHandler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> HandleCommand<A> for StaticCommandHandler<A> {
    fn handle(
        &self,
        aggregate: &mut A,
        command: &A::Command,
    ) -> Result<Vec<A::Event>, Error<A::Error>> {
        let handlers = self.handlers.read();

        let handler = handlers
            .get(command.command_type())
            .ok_or_else(|| Error::HandlerNotFound(command.command_type().to_owned()))?;

        handler(aggregate, command).map_err(Error::Domain)
    }
}

/// Declares the command handlers of an aggregate type, keyed by command
/// type name.
///
/// This table is the statically-checkable replacement for discovering
/// handler methods at runtime: the aggregate lists its handlers once, and
/// [`DynamicCommandHandler`] binds every entry on construction.
pub trait CommandHandlers: Aggregate {
    fn handlers() -> Vec<(&'static str, CommandHandlerFn<Self>)>;
}

/// Command-handler registry populated from the aggregate type's declared
/// handler table.
///
/// A thin convenience layer over [`StaticCommandHandler`]; late additions
/// through [`register_handler`](DynamicCommandHandler::register_handler)
/// behave exactly as on the static registry.
pub struct DynamicCommandHandler<A: Aggregate> {
    inner: StaticCommandHandler<A>,
}

impl<A: CommandHandlers> DynamicCommandHandler<A> {
    pub fn new() -> Self {
        let inner = StaticCommandHandler::new();
        for (method, handler) in A::handlers() {
            inner.register_handler(method, handler);
        }
        Self { inner }
    }
}

impl<A: CommandHandlers> Default for DynamicCommandHandler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> DynamicCommandHandler<A> {
    pub fn register_handler(&self, method: impl Into<String>, handler: CommandHandlerFn<A>) {
        self.inner.register_handler(method, handler);
    }
}

impl<A: Aggregate> HandleCommand<A> for DynamicCommandHandler<A> {
    fn handle(
        &self,
        aggregate: &mut A,
        command: &A::Command,
    ) -> Result<Vec<A::Event>, Error<A::Error>> {
        self.inner.handle(aggregate, command)
    }
}
