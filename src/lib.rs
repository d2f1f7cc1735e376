//! Switchyard: a minimal typed finite state machine
//!
//! Handlers are registered per (state, event kind). Dispatching an event looks
//! up the handler for the machine's current state and the event's concrete
//! case, runs it, and moves to the state it returns.
//!
//! # Core Concepts
//!
//! - **State**: Host-defined states via the `State` trait
//! - **Event**: Host-defined events tagged by case via the `Event` trait
//! - **Registry**: Exact-match handler lookup, shared by cloned machines
//! - **Machine**: Current state, owned context, sync and async dispatch
//! - **Builder**: Handlers first, contexts later, many machines per builder
//!
//! # Example
//!
//! ```rust
//! use switchyard::{event_enum, state_enum, MachineBuilder, Transition};
//!
//! state_enum! {
//!     enum Door {
//!         Locked,
//!         Unlocked,
//!     }
//! }
//!
//! event_enum! {
//!     enum DoorEvent {
//!         Unlock { code: String, user_id: u32 },
//!         Lock,
//!     }
//!     kind: DoorEventKind
//! }
//!
//! #[derive(Clone, Default)]
//! struct Access {
//!     attempts: u32,
//!     last_user: Option<u32>,
//! }
//!
//! let mut builder: MachineBuilder<Door, DoorEvent, Access> = MachineBuilder::new(Door::Locked);
//! builder
//!     .on(Door::Locked, DoorEventKind::Unlock, |fsm, event| {
//!         let DoorEvent::Unlock { code, user_id } = event else {
//!             return Ok(Transition::Stay);
//!         };
//!         if code == "1234" {
//!             fsm.context_mut().last_user = Some(user_id);
//!             Ok(Transition::To(Door::Unlocked))
//!         } else {
//!             fsm.context_mut().attempts += 1;
//!             Ok(Transition::Stay)
//!         }
//!     })?
//!     .on(Door::Unlocked, DoorEventKind::Lock, |_, _| Ok(Transition::To(Door::Locked)))?;
//!
//! let mut door = builder.build(Access::default());
//! let state = door.dispatch_sync(DoorEvent::Unlock { code: "0000".into(), user_id: 9 })?;
//!
//! assert_eq!(state, Door::Locked);
//! assert_eq!(door.context().attempts, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;
pub mod registry;

// Re-export commonly used types
pub use builder::MachineBuilder;
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{Event, State, Transition};
pub use futures::future::{BoxFuture, FutureExt};
pub use machine::{DispatchError, Machine};
pub use registry::{
    DuplicatePolicy, Handler, HandlerError, HandlerRegistry, HandlerResult, RegistryError,
};
