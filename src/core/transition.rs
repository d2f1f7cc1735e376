//! What a handler asks the machine to do next.

use super::state::State;

/// Outcome of a handler.
///
/// `To` always assigns the returned state, even when it equals the current
/// one; a self-transition is still a transition. `Stay` leaves the current
/// state untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition<S: State> {
    /// Move to the given state
    To(S),

    /// Keep the current state
    Stay,
}

impl<S: State> Transition<S> {
    /// Shorthand for `Transition::To(state)`.
    pub fn to(state: S) -> Self {
        Transition::To(state)
    }

    /// The target state, if this is a transition.
    pub fn target(&self) -> Option<&S> {
        match self {
            Transition::To(state) => Some(state),
            Transition::Stay => None,
        }
    }

    /// Resolve against the current state.
    pub fn resolve(self, current: &S) -> S {
        match self {
            Transition::To(state) => state,
            Transition::Stay => current.clone(),
        }
    }
}

impl<S: State> From<S> for Transition<S> {
    fn from(state: S) -> Self {
        Transition::To(state)
    }
}

impl<S: State> From<Option<S>> for Transition<S> {
    fn from(state: Option<S>) -> Self {
        state.map_or(Transition::Stay, Transition::To)
    }
}
