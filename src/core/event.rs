//! Events and their dispatch tags.
//!
//! A machine accepts a single event type, usually an enum whose variants are
//! the distinct event shapes. Handlers are looked up by the variant that was
//! actually sent, not by the enum as a whole, so every event exposes a small
//! copyable tag naming its case.

use std::fmt::Debug;
use std::hash::Hash;

/// An event that can be dispatched to a machine.
///
/// `Kind` identifies the concrete case of the event and is the second half of
/// a handler key. It is normally a fieldless enum mirroring the event enum's
/// variants; the [`event_enum!`](crate::event_enum) macro generates both.
///
/// # Example
///
/// ```rust
/// use switchyard::core::Event;
///
/// #[derive(Debug)]
/// enum PlayerEvent {
///     Play { track: u32 },
///     Stop,
/// }
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum PlayerEventKind {
///     Play,
///     Stop,
/// }
///
/// impl Event for PlayerEvent {
///     type Kind = PlayerEventKind;
///
///     fn kind(&self) -> PlayerEventKind {
///         match self {
///             Self::Play { .. } => PlayerEventKind::Play,
///             Self::Stop => PlayerEventKind::Stop,
///         }
///     }
/// }
///
/// assert_eq!(PlayerEvent::Play { track: 3 }.kind(), PlayerEventKind::Play);
/// ```
pub trait Event: Debug + Send + 'static {
    /// Tag naming the concrete case of an event.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// The tag of this event's case. Must not depend on payload values.
    fn kind(&self) -> Self::Kind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum TestEvent {
        Start(String),
        Progress { done: u32, total: u32 },
        Reset,
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestEventKind {
        Start,
        Progress,
        Reset,
    }

    impl Event for TestEvent {
        type Kind = TestEventKind;

        fn kind(&self) -> TestEventKind {
            match self {
                Self::Start(_) => TestEventKind::Start,
                Self::Progress { .. } => TestEventKind::Progress,
                Self::Reset => TestEventKind::Reset,
            }
        }
    }

    #[test]
    fn kind_ignores_payload() {
        let a = TestEvent::Progress { done: 1, total: 10 };
        let b = TestEvent::Progress { done: 9, total: 10 };
        assert_eq!(a.kind(), b.kind());
    }

    #[test]
    fn kind_distinguishes_cases() {
        assert_eq!(TestEvent::Start("x".into()).kind(), TestEventKind::Start);
        assert_eq!(TestEvent::Reset.kind(), TestEventKind::Reset);
        assert_ne!(TestEvent::Reset.kind(), TestEventKind::Start);
    }
}
