//! Macros for declaring state identifiers.

/// Declare a fieldless enum and implement [`State`](crate::core::State) for it.
///
/// The enum derives everything the engine needs (`Copy`, `Eq`, `Hash`,
/// `Debug`, serde) and each variant's name is its identifier.
///
/// # Example
///
/// ```
/// use cwsw::state_enum;
/// use cwsw::core::State;
///
/// state_enum! {
///     pub enum StopLight {
///         Red,
///         Green,
///         Yellow,
///     }
/// }
///
/// assert_eq!(StopLight::Yellow.name(), "Yellow");
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

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Processing.name(), "Processing");
        assert_eq!(TestState::Complete.name(), "Complete");
    }

    #[test]
    fn state_enum_derives_value_semantics() {
        let state = TestState::Processing;
        let copied = state;
        assert_eq!(state, copied);
        assert_ne!(state, TestState::Complete);
    }

    #[test]
    fn state_enum_supports_visibility_and_attributes() {
        state_enum! {
            /// Two-state switch.
            pub enum PublicState {
                On,
                #[allow(dead_code)]
                Off,
            }
        }

        assert_eq!(PublicState::On.name(), "On");
    }
}
