//! Macros for declaring states and events with minimal boilerplate.

/// Generate a fieldless state enum and its `State` implementation.
///
/// The enum derives `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Debug`,
/// `Serialize` and `Deserialize`; each state is named after its variant.
///
/// # Example
///
/// ```
/// use switchyard::state_enum;
/// use switchyard::core::State;
///
/// state_enum! {
///     pub enum TrafficLight {
///         Red,
///         Yellow,
///         Green,
///     }
/// }
///
/// assert_eq!(TrafficLight::Yellow.name(), "Yellow");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate an event enum, its fieldless kind enum, and the `Event` impl.
///
/// Variants may be unit, tuple or struct-like, and variants and fields may
/// carry attributes such as doc comments. The kind enum has one variant
/// per event variant with the same name and is what handlers are registered
/// under. The event enum derives `Debug`; add further derives as attributes.
///
/// # Example
///
/// ```
/// use switchyard::event_enum;
/// use switchyard::core::Event;
///
/// event_enum! {
///     #[derive(Clone)]
///     pub enum DoorEvent {
///         Unlock { code: String, user_id: u32 },
///         Knock(u8),
///         Lock,
///     }
///     kind: DoorEventKind
/// }
///
/// let event = DoorEvent::Unlock { code: "1234".into(), user_id: 7 };
/// assert_eq!(event.kind(), DoorEventKind::Unlock);
/// assert_eq!(DoorEvent::Knock(3).kind(), DoorEventKind::Knock);
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
                $( ( $( $(#[$tuple_meta:meta])* $tuple_ty:ty ),* $(,)? ) )?
                $( { $( $(#[$field_meta:meta])* $field:ident : $field_ty:ty ),* $(,)? } )?
            ),* $(,)?
        }
        kind: $kind:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
                $( ( $( $(#[$tuple_meta])* $tuple_ty ),* ) )?
                $( { $( $(#[$field_meta])* $field : $field_ty ),* } )?
            ),*
        }

        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $kind {
            $($variant),*
        }

        impl $crate::core::Event for $name {
            type Kind = $kind;

            fn kind(&self) -> $kind {
                match self {
                    $(Self::$variant { .. } => $kind::$variant),*
                }
            }
        }
    };
}
