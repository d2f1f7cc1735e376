//! Handler functions and the uniform invocation contract.

use crate::core::{Event, State, Transition};
use crate::machine::{DispatchError, Machine};
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Fault raised by a handler body.
///
/// A handler returning this error aborts the dispatch; the machine keeps the
/// state it had before the event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<DispatchError> for HandlerError {
    fn from(err: DispatchError) -> Self {
        Self::new(err.to_string())
    }
}

/// What every handler produces.
pub type HandlerResult<S> = Result<Transition<S>, HandlerError>;

/// Handler that returns its outcome directly.
pub type ImmediateFn<S, E, C> =
    Arc<dyn Fn(&mut Machine<S, E, C>, E) -> HandlerResult<S> + Send + Sync>;

/// Handler that may suspend before producing its outcome.
/// The returned future borrows the machine for as long as it runs.
pub type SuspendingFn<S, E, C> = Arc<
    dyn for<'a> Fn(&'a mut Machine<S, E, C>, E) -> BoxFuture<'a, HandlerResult<S>> + Send + Sync,
>;

/// A registered handler.
///
/// Handlers are stateless behavior: cloning one clones an `Arc`, so registries
/// and the machines built from them share the same functions.
pub enum Handler<S: State, E: Event, C> {
    /// Runs to completion on the calling thread
    Immediate(ImmediateFn<S, E, C>),

    /// Must be awaited
    Suspending(SuspendingFn<S, E, C>),
}

impl<S: State, E: Event, C> Handler<S, E, C> {
    pub fn immediate<F>(handler: F) -> Self
    where
        F: Fn(&mut Machine<S, E, C>, E) -> HandlerResult<S> + Send + Sync + 'static,
    {
        Handler::Immediate(Arc::new(handler))
    }

    pub fn suspending<F>(handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut Machine<S, E, C>, E) -> BoxFuture<'a, HandlerResult<S>>
            + Send
            + Sync
            + 'static,
    {
        Handler::Suspending(Arc::new(handler))
    }

    pub fn is_suspending(&self) -> bool {
        matches!(self, Handler::Suspending(_))
    }

    /// Run the handler against `machine`.
    ///
    /// Both flavours come back as a future, so one call site serves every
    /// handler. An immediate handler has already run by the time this returns.
    pub fn invoke<'a>(
        &self,
        machine: &'a mut Machine<S, E, C>,
        event: E,
    ) -> BoxFuture<'a, HandlerResult<S>> {
        match self {
            Handler::Immediate(handler) => future::ready(handler(machine, event)).boxed(),
            Handler::Suspending(handler) => handler(machine, event),
        }
    }
}

impl<S: State, E: Event, C> Clone for Handler<S, E, C> {
    fn clone(&self) -> Self {
        match self {
            Handler::Immediate(handler) => Handler::Immediate(Arc::clone(handler)),
            Handler::Suspending(handler) => Handler::Suspending(Arc::clone(handler)),
        }
    }
}

impl<S: State, E: Event, C> fmt::Debug for Handler<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Immediate(_) => f.write_str("Handler::Immediate"),
            Handler::Suspending(_) => f.write_str("Handler::Suspending"),
        }
    }
}
