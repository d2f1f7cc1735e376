//! Dispatch errors.

use crate::registry::HandlerError;
use thiserror::Error;

/// Errors that can occur while dispatching an event.
///
/// Every variant leaves the machine in the state it had before the event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No handler for state '{state}' and event '{event}'")]
    NoHandler { state: String, event: String },

    #[error(
        "Handler for state '{state}' and event '{event}' suspends. Use dispatch() instead of dispatch_sync()"
    )]
    SuspendingHandler { state: String, event: String },

    #[error("Handler for state '{state}' and event '{event}' failed: {source}")]
    HandlerFailed {
        state: String,
        event: String,
        source: HandlerError,
    },
}
