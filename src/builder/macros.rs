//! Macros for ergonomic state machine construction.

/// Generate a state enum and its `State` implementation.
///
/// Each variant is paired with the name it carries in tables, logs and
/// snapshots. The enum also gets an `ALL` constant listing the variants in
/// declaration order.
///
/// # Example
///
/// ```
/// use vam::state_enum;
/// use vam::core::State;
///
/// state_enum! {
///     pub enum ToolState {
///         Idle => "idle",
///         Dragging => "dragging",
///     }
/// }
///
/// assert_eq!(ToolState::Dragging.name(), "dragging");
/// assert_eq!(ToolState::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}
