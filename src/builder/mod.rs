//! Builder API for defining handlers ahead of context.
//!
//! A [`MachineBuilder`] holds the initial state and the handlers; contexts
//! arrive later, one per [`build`](MachineBuilder::build). The macros in this
//! module declare state and event types with the traits dispatch needs.

pub mod machine;
pub mod macros;

pub use machine::MachineBuilder;
