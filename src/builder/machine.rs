//! Builder for defining handlers before a context exists.

use crate::core::{Event, State};
use crate::machine::Machine;
use crate::registry::{DuplicatePolicy, Handler, HandlerRegistry, HandlerResult, RegistryError};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Collects handlers and an initial state, then stamps out machines.
///
/// Every machine built from one builder shares the builder's registry and
/// gets its own context. Registering after a build affects later builds only.
///
/// # Example
///
/// ```rust
/// use switchyard::{event_enum, state_enum, MachineBuilder, Transition};
///
/// state_enum! {
///     enum Service {
///         Uninitialized,
///         Ready,
///     }
/// }
///
/// event_enum! {
///     enum ServiceEvent {
///         Initialize,
///     }
///     kind: ServiceEventKind
/// }
///
/// struct Connection {
///     url: String,
///     connected: bool,
/// }
///
/// let mut builder: MachineBuilder<Service, ServiceEvent, Connection> =
///     MachineBuilder::new(Service::Uninitialized);
/// builder.on(Service::Uninitialized, ServiceEventKind::Initialize, |fsm, _| {
///     fsm.context_mut().connected = true;
///     Ok(Transition::To(Service::Ready))
/// })?;
///
/// let mut primary = builder.build(Connection { url: "db://primary".into(), connected: false });
/// let replica = builder.build(Connection { url: "db://replica".into(), connected: false });
///
/// primary.dispatch_sync(ServiceEvent::Initialize)?;
/// assert!(primary.context().connected);
/// assert!(!replica.context().connected);
/// assert_eq!(replica.context().url, "db://replica");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct MachineBuilder<S: State, E: Event, C> {
    initial: S,
    registry: Arc<HandlerRegistry<S, E, C>>,
}

impl<S: State, E: Event, C> MachineBuilder<S, E, C> {
    /// Create a builder whose machines start in `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            registry: Arc::new(HandlerRegistry::new()),
        }
    }

    /// Set the duplicate registration policy (default: reject).
    pub fn on_duplicate(mut self, policy: DuplicatePolicy) -> Self {
        Arc::make_mut(&mut self.registry).set_policy(policy);
        self
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

    /// Register a handler that may suspend.
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

    pub fn initial(&self) -> &S {
        &self.initial
    }

    pub fn registry(&self) -> &HandlerRegistry<S, E, C> {
        &self.registry
    }

    /// Build a machine in the initial state that owns `context`.
    /// The builder stays usable.
    pub fn build(&self, context: C) -> Machine<S, E, C> {
        debug!(
            initial = self.initial.name(),
            handlers = self.registry.len(),
            "building machine"
        );
        Machine::with_registry(self.initial.clone(), context, Arc::clone(&self.registry))
    }

    pub(crate) fn shared_registry(&self) -> Arc<HandlerRegistry<S, E, C>> {
        Arc::clone(&self.registry)
    }
}

impl<S: State, E: Event, C> Clone for MachineBuilder<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S: State, E: Event, C> fmt::Debug for MachineBuilder<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineBuilder")
            .field("initial", &self.initial)
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transition;
    use crate::machine::DispatchError;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum Service {
            Uninitialized,
            Ready,
            Processing,
        }
    }

    event_enum! {
        enum ServiceEvent {
            Initialize,
            Request { id: String },
            Complete,
        }
        kind: ServiceEventKind
    }

    #[derive(Clone, Debug, Default)]
    struct ServiceContext {
        name: String,
        requests: Vec<String>,
    }

    fn service() -> MachineBuilder<Service, ServiceEvent, ServiceContext> {
        let mut builder: MachineBuilder<Service, ServiceEvent, ServiceContext> =
            MachineBuilder::new(Service::Uninitialized);
        builder
            .on(Service::Uninitialized, ServiceEventKind::Initialize, |_, _| {
                Ok(Transition::To(Service::Ready))
            })
            .unwrap()
            .on(Service::Ready, ServiceEventKind::Request, |fsm, event| {
                if let ServiceEvent::Request { id } = event {
                    fsm.context_mut().requests.push(id);
                }
                Ok(Transition::To(Service::Processing))
            })
            .unwrap()
            .on(Service::Processing, ServiceEventKind::Complete, |_, _| {
                Ok(Transition::To(Service::Ready))
            })
            .unwrap();
        builder
    }

    fn context(name: &str) -> ServiceContext {
        ServiceContext {
            name: name.to_string(),
            requests: Vec::new(),
        }
    }

    #[test]
    fn build_uses_initial_state_and_given_context() {
        let builder = service();
        let machine = builder.build(context("primary"));

        assert_eq!(machine.state(), &Service::Uninitialized);
        assert_eq!(machine.context().name, "primary");
        assert_eq!(machine.registry().len(), 3);
    }

    #[test]
    fn builds_are_independent_but_share_handlers() {
        let builder = service();
        let mut a = builder.build(context("a"));
        let mut b = builder.build(context("b"));

        assert!(a.shares_registry_with(&b));

        a.dispatch_sync(ServiceEvent::Initialize).unwrap();
        a.dispatch_sync(ServiceEvent::Request { id: "req-1".into() })
            .unwrap();

        assert_eq!(a.state(), &Service::Processing);
        assert_eq!(b.state(), &Service::Uninitialized);
        assert_eq!(a.context().requests, vec!["req-1".to_string()]);
        assert!(b.context().requests.is_empty());

        b.dispatch_sync(ServiceEvent::Initialize).unwrap();
        assert_eq!(b.state(), &Service::Ready);
    }

    #[test]
    fn duplicate_registration_on_builder_is_rejected() {
        let mut builder = service();
        let result = builder.on(Service::Ready, ServiceEventKind::Request, |_, _| {
            Ok(Transition::Stay)
        });

        assert!(matches!(result, Err(RegistryError::DuplicateHandler { .. })));
    }

    #[test]
    fn overwrite_policy_applies_to_builder() {
        let mut builder: MachineBuilder<Service, ServiceEvent, ServiceContext> =
            MachineBuilder::new(Service::Ready).on_duplicate(DuplicatePolicy::Overwrite);
        builder
            .on(Service::Ready, ServiceEventKind::Complete, |_, _| {
                Ok(Transition::To(Service::Processing))
            })
            .unwrap()
            .on(Service::Ready, ServiceEventKind::Complete, |_, _| Ok(Transition::Stay))
            .unwrap();

        let mut machine = builder.build(context("x"));
        assert_eq!(machine.dispatch_sync(ServiceEvent::Complete), Ok(Service::Ready));
        assert_eq!(builder.registry().policy(), DuplicatePolicy::Overwrite);
    }

    #[test]
    fn later_registrations_do_not_reach_built_machines() {
        let mut builder = service();
        let mut early = builder.build(context("early"));

        builder
            .on(Service::Ready, ServiceEventKind::Complete, |_, _| Ok(Transition::Stay))
            .unwrap();
        let mut late = builder.build(context("late"));

        early.dispatch_sync(ServiceEvent::Initialize).unwrap();
        late.dispatch_sync(ServiceEvent::Initialize).unwrap();

        assert!(matches!(
            early.dispatch_sync(ServiceEvent::Complete),
            Err(DispatchError::NoHandler { .. })
        ));
        assert_eq!(late.dispatch_sync(ServiceEvent::Complete), Ok(Service::Ready));
        assert!(!early.shares_registry_with(&late));
    }
}
