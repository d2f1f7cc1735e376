//! Core State trait for state machine states.
//!
//! States are plain values from a closed domain owned by the host
//! application. The machine only needs to compare, hash and name them.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// A state is half of the key handlers are registered under, so it must be
/// hashable and comparable. No ordering is assumed, and no state is marked
/// terminal: a state without outgoing handlers simply stops accepting events.
///
/// # Required Traits
///
/// - `Clone`: States are copied into lookup keys, errors and checkpoints
/// - `Eq` + `Hash`: States key the handler registry
/// - `Debug`: States must be debuggable for diagnostics
///
/// Serialization is not required. Checkpoints ask for `Serialize` and
/// `Deserialize` on the state type only where they encode or decode.
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum DoorState {
///     Locked,
///     Unlocked,
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Locked => "Locked",
///             Self::Unlocked => "Unlocked",
///         }
///     }
/// }
///
/// assert_eq!(DoorState::Locked.name(), "Locked");
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}
