//! Registration errors.

use thiserror::Error;

/// Errors that can occur while registering handlers
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The (state, event) pair already has a handler and the registry
    /// rejects duplicates. The original handler is left in place.
    #[error("Handler already registered for state '{state}' and event '{event}'")]
    DuplicateHandler { state: String, event: String },
}
