//! Core value types shared by the registry and the machine.
//!
//! - States via the `State` trait
//! - Events and their dispatch tags via the `Event` trait
//! - Handler outcomes via `Transition`
//!
//! Nothing in this module knows about handlers or contexts.

mod event;
mod state;
mod transition;

pub use event::Event;
pub use state::State;
pub use transition::Transition;
