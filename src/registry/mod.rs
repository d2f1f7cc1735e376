//! Handler registry keyed by (state, event kind).
//!
//! A registry is filled during setup and read during dispatch. Machines hold
//! it behind an `Arc`; once two owners share it, registering through either
//! of them copies the registry first, so a registry somebody else can see is
//! never mutated.
//!
//! # Example
//!
//! ```rust
//! use switchyard::registry::{Handler, HandlerRegistry, RegistryError};
//! use switchyard::{event_enum, state_enum, Transition};
//!
//! state_enum! {
//!     enum Light {
//!         Off,
//!         On,
//!     }
//! }
//!
//! event_enum! {
//!     enum LightEvent {
//!         Toggle,
//!     }
//!     kind: LightEventKind
//! }
//!
//! let mut registry: HandlerRegistry<Light, LightEvent, ()> = HandlerRegistry::new();
//! registry
//!     .register(Light::Off, LightEventKind::Toggle, Handler::immediate(|_, _| Ok(Transition::To(Light::On))))
//!     .unwrap();
//!
//! let again = registry.register(
//!     Light::Off,
//!     LightEventKind::Toggle,
//!     Handler::immediate(|_, _| Ok(Transition::Stay)),
//! );
//! assert!(matches!(again, Err(RegistryError::DuplicateHandler { .. })));
//! assert!(registry.resolve(&Light::On, LightEventKind::Toggle).is_none());
//! ```

mod error;
mod handler;
mod policy;

pub use error::RegistryError;
pub use handler::{Handler, HandlerError, HandlerResult, ImmediateFn, SuspendingFn};
pub use policy::DuplicatePolicy;

use crate::core::{Event, State};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use tracing::{trace, warn};

/// Lookup key of a handler.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerKey<S, K> {
    pub state: S,
    pub event: K,
}

impl<S, K> HandlerKey<S, K> {
    pub fn new(state: S, event: K) -> Self {
        Self { state, event }
    }
}

/// Map from (state, event kind) to handler.
pub struct HandlerRegistry<S: State, E: Event, C> {
    handlers: HashMap<HandlerKey<S, E::Kind>, Handler<S, E, C>>,
    policy: DuplicatePolicy,
}

impl<S: State, E: Event, C> HandlerRegistry<S, E, C> {
    /// Create an empty registry that rejects duplicates.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            handlers: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Change the duplicate policy. Handlers already registered are kept.
    pub fn set_policy(&mut self, policy: DuplicatePolicy) {
        self.policy = policy;
    }

    /// Register `handler` for `(state, event)`.
    ///
    /// With [`DuplicatePolicy::Reject`] an occupied key fails with
    /// [`RegistryError::DuplicateHandler`] and the existing handler stays.
    /// With [`DuplicatePolicy::Overwrite`] it is replaced.
    pub fn register(
        &mut self,
        state: S,
        event: E::Kind,
        handler: Handler<S, E, C>,
    ) -> Result<(), RegistryError> {
        match self.handlers.entry(HandlerKey::new(state, event)) {
            Entry::Occupied(mut slot) => {
                let key = slot.key();
                match self.policy {
                    DuplicatePolicy::Reject => Err(duplicate(&key.state, key.event)),
                    DuplicatePolicy::Overwrite => {
                        warn!(
                            state = key.state.name(),
                            event = ?key.event,
                            "replacing registered handler"
                        );
                        slot.insert(handler);
                        Ok(())
                    }
                }
            }
            Entry::Vacant(slot) => {
                let key = slot.key();
                trace!(
                    state = key.state.name(),
                    event = ?key.event,
                    suspending = handler.is_suspending(),
                    "registered handler"
                );
                slot.insert(handler);
                Ok(())
            }
        }
    }

    /// Whether `register` would accept a handler for `(state, event)`.
    pub fn check(&self, state: &S, event: E::Kind) -> Result<(), RegistryError> {
        if self.policy == DuplicatePolicy::Reject && self.contains(state, event) {
            return Err(duplicate(state, event));
        }
        Ok(())
    }

    /// Exact-match lookup. No wildcard states, no fallback.
    pub fn resolve(&self, state: &S, event: E::Kind) -> Option<&Handler<S, E, C>> {
        self.handlers.get(&HandlerKey::new(state.clone(), event))
    }

    pub fn contains(&self, state: &S, event: E::Kind) -> bool {
        self.resolve(state, event).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &HandlerKey<S, E::Kind>> {
        self.handlers.keys()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

fn duplicate<S: State, K: fmt::Debug>(state: &S, event: K) -> RegistryError {
    RegistryError::DuplicateHandler {
        state: state.name().to_string(),
        event: format!("{:?}", event),
    }
}

impl<S: State, E: Event, C> Default for HandlerRegistry<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event, C> Clone for HandlerRegistry<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            policy: self.policy,
        }
    }
}

impl<S: State, E: Event, C> fmt::Debug for HandlerRegistry<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("keys", &self.handlers.keys().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}
