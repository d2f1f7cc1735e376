//! The state machine instance.
//!
//! A [`Machine`] owns its current state and context and holds a shared
//! [`HandlerRegistry`]. Dispatch looks up the handler for the current state
//! and the event's kind, runs it, and applies the [`Transition`] it returns.
//!
//! # Example
//!
//! ```rust
//! use switchyard::{event_enum, state_enum, Machine, Transition};
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
//! let mut light: Machine<Light, LightEvent, u32> = Machine::new(Light::Off, 0);
//! light
//!     .on(Light::Off, LightEventKind::Toggle, |fsm, _| {
//!         *fsm.context_mut() += 1;
//!         Ok(Transition::To(Light::On))
//!     })?
//!     .on(Light::On, LightEventKind::Toggle, |fsm, _| {
//!         *fsm.context_mut() += 1;
//!         Ok(Transition::To(Light::Off))
//!     })?;
//!
//! assert_eq!(light.dispatch_sync(LightEvent::Toggle)?, Light::On);
//! assert_eq!(light.dispatch_sync(LightEvent::Toggle)?, Light::Off);
//! assert_eq!(*light.context(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`Transition`]: crate::core::Transition

mod dispatch;
mod error;

pub use error::DispatchError;

use crate::core::{Event, State};
use crate::registry::{DuplicatePolicy, Handler, HandlerRegistry, HandlerResult, RegistryError};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// A finite state machine instance.
///
/// - `S`: the host's state type
/// - `E`: the host's event type (usually an enum of event cases)
/// - `C`: context data owned by this instance and mutated by handlers
pub struct Machine<S: State, E: Event, C> {
    state: S,
    context: C,
    registry: Arc<HandlerRegistry<S, E, C>>,
}

impl<S: State, E: Event, C> Machine<S, E, C> {
    /// Create a machine with an empty registry that rejects duplicate handlers.
    pub fn new(initial: S, context: C) -> Self {
        Self::with_policy(initial, context, DuplicatePolicy::default())
    }

    /// Create a machine with an empty registry using `policy` for duplicates.
    pub fn with_policy(initial: S, context: C, policy: DuplicatePolicy) -> Self {
        Self::with_registry(initial, context, Arc::new(HandlerRegistry::with_policy(policy)))
    }

    /// Create a machine on top of an existing, possibly shared, registry.
    pub fn with_registry(
        initial: S,
        context: C,
        registry: Arc<HandlerRegistry<S, E, C>>,
    ) -> Self {
        Self {
            state: initial,
            context,
            registry,
        }
    }

    /// Register a handler that returns its transition directly.
    pub fn on<F>(
        &mut self,
        state: S,
        event: E::Kind,
        handler: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn(&mut Machine<S, E, C>, E) -> HandlerResult<S> + Send + Sync + 'static,
    {
        self.register(state, event, Handler::immediate(handler))
    }

    /// Register a handler that may suspend; it only runs under [`Machine::dispatch`].
    pub fn on_async<F>(
        &mut self,
        state: S,
        event: E::Kind,
        handler: F,
    ) -> Result<&mut Self, RegistryError>
    where
        F: for<'a> Fn(&'a mut Machine<S, E, C>, E) -> BoxFuture<'a, HandlerResult<S>>
            + Send
            + Sync
            + 'static,
    {
        self.register(state, event, Handler::suspending(handler))
    }

    /// Register a prepared handler.
    ///
    /// If the registry is shared with other machines or a builder, this
    /// machine gets its own copy first and the others are unaffected.
    /// A rejected registration copies nothing.
    pub fn register(
        &mut self,
        state: S,
        event: E::Kind,
        handler: Handler<S, E, C>,
    ) -> Result<&mut Self, RegistryError> {
        self.registry.check(&state, event)?;
        Arc::make_mut(&mut self.registry).register(state, event, handler)?;
        Ok(self)
    }

    /// Current state (pure)
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Swap in a new context, returning the old one.
    /// State and handlers are untouched.
    pub fn replace_context(&mut self, context: C) -> C {
        std::mem::replace(&mut self.context, context)
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn registry(&self) -> &HandlerRegistry<S, E, C> {
        &self.registry
    }

    /// True when both machines dispatch through the same registry allocation.
    pub fn shares_registry_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry)
    }
}

/// Same state, an independent copy of the context, and the same registry.
impl<S: State, E: Event, C: Clone> Clone for Machine<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            context: self.context.clone(),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S: State, E: Event, C: fmt::Debug> fmt::Debug for Machine<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.state)
            .field("context", &self.context)
            .field("handlers", &self.registry.len())
            .finish()
    }
}
