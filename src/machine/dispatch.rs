//! Event dispatch: resolve, invoke, apply.

use super::error::DispatchError;
use super::Machine;
use crate::core::{Event, State, Transition};
use crate::registry::{Handler, HandlerResult};
use tracing::{debug, warn};

impl<S: State, E: Event, C> Machine<S, E, C> {
    /// Dispatch `event` and return the resulting state.
    ///
    /// Looks up the handler registered for the current state and the event's
    /// kind, awaits it, and applies its [`Transition`]. Immediate and
    /// suspending handlers both run here.
    ///
    /// The state only changes once the handler has returned successfully.
    /// On any error the machine is back in the state the event arrived in,
    /// even if the handler dispatched on the machine itself before failing.
    /// Whatever the handler did to the context is not rolled back.
    pub async fn dispatch(&mut self, event: E) -> Result<S, DispatchError> {
        let kind = event.kind();
        let handler = self.handler_for(kind)?;
        let arrived = self.state.clone();
        let outcome = handler.invoke(self, event).await;
        self.settle(arrived, kind, outcome)
    }

    /// Dispatch without suspending.
    ///
    /// Runs immediate handlers in place. If the resolved handler was
    /// registered as suspending it is not invoked at all and
    /// [`DispatchError::SuspendingHandler`] is returned instead of blocking.
    pub fn dispatch_sync(&mut self, event: E) -> Result<S, DispatchError> {
        let kind = event.kind();
        let arrived = self.state.clone();
        let outcome = match self.handler_for(kind)? {
            Handler::Immediate(handler) => handler(self, event),
            Handler::Suspending(_) => {
                warn!(
                    state = self.state.name(),
                    event = ?kind,
                    "suspending handler reached through dispatch_sync"
                );
                return Err(DispatchError::SuspendingHandler {
                    state: self.state.name().to_string(),
                    event: format!("{:?}", kind),
                });
            }
        };
        self.settle(arrived, kind, outcome)
    }

    /// Whether an event of this kind has a handler in the current state.
    pub fn accepts(&self, kind: E::Kind) -> bool {
        self.registry.contains(&self.state, kind)
    }

    fn handler_for(&self, kind: E::Kind) -> Result<Handler<S, E, C>, DispatchError> {
        match self.registry.resolve(&self.state, kind) {
            Some(handler) => Ok(handler.clone()),
            None => {
                warn!(state = self.state.name(), event = ?kind, "no handler");
                Err(DispatchError::NoHandler {
                    state: self.state.name().to_string(),
                    event: format!("{:?}", kind),
                })
            }
        }
    }

    /// Apply a handler outcome. `arrived` is the state the event was
    /// dispatched in; a failure puts the machine back there.
    fn settle(
        &mut self,
        arrived: S,
        kind: E::Kind,
        outcome: HandlerResult<S>,
    ) -> Result<S, DispatchError> {
        match outcome {
            Ok(Transition::To(next)) => {
                debug!(
                    from = self.state.name(),
                    to = next.name(),
                    event = ?kind,
                    "transition"
                );
                self.state = next;
            }
            Ok(Transition::Stay) => {
                debug!(state = self.state.name(), event = ?kind, "stay");
            }
            Err(source) => {
                if self.state != arrived {
                    debug!(
                        from = self.state.name(),
                        to = arrived.name(),
                        "restoring state after nested dispatch"
                    );
                }
                warn!(
                    state = arrived.name(),
                    event = ?kind,
                    error = %source,
                    "handler failed"
                );
                let state = arrived.name().to_string();
                self.state = arrived;
                return Err(DispatchError::HandlerFailed {
                    state,
                    event: format!("{:?}", kind),
                    source,
                });
            }
        }
        Ok(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HandlerError;
    use crate::{event_enum, state_enum};
    use futures::FutureExt;
    use std::time::Duration;

    state_enum! {
        enum Job {
            Idle,
            Loading,
            Processing,
            Done,
        }
    }

    event_enum! {
        enum JobEvent {
            Start(String),
            Loaded { size: usize },
            Finished { result: String },
            Ping,
            Reset,
        }
        kind: JobEventKind
    }

    #[derive(Clone, Debug, Default)]
    struct JobContext {
        filename: String,
        size: usize,
        result: String,
        pings: u32,
    }

    fn job() -> Machine<Job, JobEvent, JobContext> {
        let mut machine = Machine::new(Job::Idle, JobContext::default());
        machine
            .on(Job::Idle, JobEventKind::Start, |fsm, event| {
                if let JobEvent::Start(filename) = event {
                    fsm.context_mut().filename = filename;
                }
                Ok(Transition::To(Job::Loading))
            })
            .unwrap()
            .on_async(Job::Loading, JobEventKind::Loaded, |fsm, event| {
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    if let JobEvent::Loaded { size } = event {
                        fsm.context_mut().size = size;
                    }
                    Ok(Transition::To(Job::Processing))
                }
                .boxed()
            })
            .unwrap()
            .on_async(Job::Processing, JobEventKind::Finished, |fsm, event| {
                async move {
                    tokio::task::yield_now().await;
                    match event {
                        JobEvent::Finished { result } if result.is_empty() => {
                            Err(HandlerError::new("empty result"))
                        }
                        JobEvent::Finished { result } => {
                            fsm.context_mut().result = result;
                            Ok(Transition::To(Job::Done))
                        }
                        _ => Ok(Transition::Stay),
                    }
                }
                .boxed()
            })
            .unwrap()
            .on(Job::Processing, JobEventKind::Ping, |fsm, _| {
                fsm.context_mut().pings += 1;
                Ok(Transition::Stay)
            })
            .unwrap()
            .on(Job::Done, JobEventKind::Reset, |fsm, _| {
                fsm.replace_context(JobContext::default());
                Ok(Transition::To(Job::Idle))
            })
            .unwrap()
            .on(Job::Done, JobEventKind::Ping, |_, _| Ok(Transition::To(Job::Done)))
            .unwrap();
        machine
    }

    #[tokio::test]
    async fn mixed_handlers_run_through_dispatch() {
        let mut machine = job();

        assert_eq!(
            machine.dispatch(JobEvent::Start("data.csv".into())).await,
            Ok(Job::Loading)
        );
        assert_eq!(
            machine.dispatch(JobEvent::Loaded { size: 1024 }).await,
            Ok(Job::Processing)
        );
        assert_eq!(
            machine
                .dispatch(JobEvent::Finished {
                    result: "42 records".into()
                })
                .await,
            Ok(Job::Done)
        );

        assert_eq!(machine.context().filename, "data.csv");
        assert_eq!(machine.context().size, 1024);
        assert_eq!(machine.context().result, "42 records");

        assert_eq!(machine.dispatch(JobEvent::Reset).await, Ok(Job::Idle));
        assert!(machine.context().filename.is_empty());
    }

    #[tokio::test]
    async fn missing_handler_leaves_state_unchanged() {
        let mut machine = job();

        let result = machine.dispatch(JobEvent::Reset).await;

        assert_eq!(
            result,
            Err(DispatchError::NoHandler {
                state: "Idle".to_string(),
                event: "Reset".to_string(),
            })
        );
        assert_eq!(machine.state(), &Job::Idle);
    }

    #[test]
    fn missing_handler_message_names_the_pair() {
        let mut machine = job();
        let err = machine
            .dispatch_sync(JobEvent::Loaded { size: 1 })
            .unwrap_err();
        assert_eq!(err.to_string(), "No handler for state 'Idle' and event 'Loaded'");
    }

    #[tokio::test]
    async fn stay_keeps_state_and_returns_it() {
        let mut machine = job();
        machine.dispatch_sync(JobEvent::Start("a".into())).unwrap();
        machine.dispatch(JobEvent::Loaded { size: 1 }).await.unwrap();

        assert_eq!(machine.dispatch_sync(JobEvent::Ping), Ok(Job::Processing));
        assert_eq!(machine.dispatch_sync(JobEvent::Ping), Ok(Job::Processing));
        assert_eq!(machine.context().pings, 2);
    }

    #[tokio::test]
    async fn handler_failure_keeps_previous_state() {
        let mut machine = job();
        machine.dispatch(JobEvent::Start("a".into())).await.unwrap();
        machine.dispatch(JobEvent::Loaded { size: 3 }).await.unwrap();

        let result = machine
            .dispatch(JobEvent::Finished {
                result: String::new(),
            })
            .await;

        assert!(matches!(
            result,
            Err(DispatchError::HandlerFailed { ref source, .. }) if source.message() == "empty result"
        ));
        assert_eq!(machine.state(), &Job::Processing);
    }

    #[test]
    fn dispatch_sync_rejects_suspending_handler() {
        let mut machine = job();
        machine.dispatch_sync(JobEvent::Start("a".into())).unwrap();

        let result = machine.dispatch_sync(JobEvent::Loaded { size: 10 });

        assert_eq!(
            result,
            Err(DispatchError::SuspendingHandler {
                state: "Loading".to_string(),
                event: "Loaded".to_string(),
            })
        );
        assert_eq!(machine.state(), &Job::Loading);
        // the handler never ran
        assert_eq!(machine.context().size, 0);
    }

    #[tokio::test]
    async fn self_transition_is_applied() {
        let mut machine = job();
        machine.dispatch(JobEvent::Start("a".into())).await.unwrap();
        machine.dispatch(JobEvent::Loaded { size: 3 }).await.unwrap();
        machine
            .dispatch(JobEvent::Finished {
                result: "ok".into(),
            })
            .await
            .unwrap();

        assert_eq!(machine.dispatch(JobEvent::Ping).await, Ok(Job::Done));
        assert_eq!(machine.state(), &Job::Done);
    }

    #[test]
    fn accepts_reflects_current_state() {
        let mut machine = job();
        assert!(machine.accepts(JobEventKind::Start));
        assert!(!machine.accepts(JobEventKind::Loaded));

        machine.dispatch_sync(JobEvent::Start("a".into())).unwrap();
        assert!(!machine.accepts(JobEventKind::Start));
        assert!(machine.accepts(JobEventKind::Loaded));
    }

    #[tokio::test]
    async fn handlers_can_dispatch_reentrantly() {
        let mut machine: Machine<Job, JobEvent, JobContext> =
            Machine::new(Job::Idle, JobContext::default());
        machine
            .on(Job::Idle, JobEventKind::Start, |_, _| Ok(Transition::To(Job::Loading)))
            .unwrap()
            .on(Job::Idle, JobEventKind::Reset, |fsm, _| {
                let reached = fsm.dispatch_sync(JobEvent::Start("nested".into()))?;
                assert_eq!(reached, Job::Loading);
                Ok(Transition::To(Job::Done))
            })
            .unwrap();

        assert_eq!(machine.dispatch(JobEvent::Reset).await, Ok(Job::Done));
    }

    fn nested_then_failing() -> Machine<Job, JobEvent, JobContext> {
        let mut machine: Machine<Job, JobEvent, JobContext> =
            Machine::new(Job::Idle, JobContext::default());
        machine
            .on(Job::Idle, JobEventKind::Start, |_, _| Ok(Transition::To(Job::Loading)))
            .unwrap()
            .on(Job::Idle, JobEventKind::Ping, |fsm, _| {
                fsm.dispatch_sync(JobEvent::Start("nested".into()))?;
                fsm.context_mut().pings += 1;
                Err(HandlerError::new("ping failed"))
            })
            .unwrap();
        machine
    }

    #[tokio::test]
    async fn failure_after_nested_dispatch_restores_arrival_state() {
        let mut machine = nested_then_failing();

        let result = machine.dispatch(JobEvent::Ping).await;

        assert_eq!(
            result,
            Err(DispatchError::HandlerFailed {
                state: "Idle".to_string(),
                event: "Ping".to_string(),
                source: HandlerError::new("ping failed"),
            })
        );
        assert_eq!(machine.state(), &Job::Idle);
        // context changes made before the failure stay
        assert_eq!(machine.context().pings, 1);
    }

    #[test]
    fn sync_failure_after_nested_dispatch_restores_arrival_state() {
        let mut machine = nested_then_failing();

        let err = machine.dispatch_sync(JobEvent::Ping).unwrap_err();

        assert!(matches!(
            err,
            DispatchError::HandlerFailed { ref state, .. } if state == "Idle"
        ));
        assert_eq!(machine.state(), &Job::Idle);
        assert!(machine.accepts(JobEventKind::Start));
    }
}
