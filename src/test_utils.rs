//! Test utilities and proptest generators
//!
//! Provides common test helpers and proptest strategies for property-based testing.

use proptest::prelude::*;

use crate::core::definition::Token;

/// Proptest generators for definition tokens
pub mod generators {
    use super::*;

    /// Generate a plausible identifier (variant, example or file name)
    pub fn name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,15}"
    }

    /// Generate a definition key outside the vocabulary
    pub fn unknown_key() -> impl Strategy<Value = String> {
        "[A-Z][A-Z0-9_]{0,15}".prop_filter("Key must not be in the vocabulary", |k| {
            !matches!(
                k.as_str(),
                "MC_VARIANT"
                    | "DISPLAY_CLASS"
                    | "BUILD_EXAMPLE"
                    | "EXCLUDE_FROM_EXAMPLE"
                    | "MC_UI_FLAVOR"
            )
        })
    }

    /// Generate a single token, recognized or not
    pub fn token() -> impl Strategy<Value = Token> {
        prop_oneof![
            prop_oneof![
                Just("ESP32"),
                Just("NRF52_PLATFORM"),
                Just("RP2040_PLATFORM"),
                Just("STM32_PLATFORM"),
            ]
            .prop_map(Token::symbol),
            (
                prop_oneof![
                    Just("MC_VARIANT"),
                    Just("DISPLAY_CLASS"),
                    Just("BUILD_EXAMPLE"),
                    Just("EXCLUDE_FROM_EXAMPLE"),
                    Just("MC_UI_FLAVOR"),
                ],
                name()
            )
                .prop_map(|(key, value)| Token::pair(key, &value)),
            (unknown_key(), name()).prop_map(|(key, value)| Token::pair(&key, &value)),
            unknown_key().prop_map(Token::Symbol),
        ]
    }

    /// Generate an ordered token list
    pub fn token_list() -> impl Strategy<Value = Vec<Token>> {
        prop::collection::vec(token(), 0..12)
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::core::definition::{classify, Definition};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_name_generator(name in name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
        }

        #[test]
        fn test_unknown_key_generator(key in unknown_key()) {
            prop_assert!(matches!(classify(&crate::core::definition::Token::pair(&key, "x")), Definition::Unrecognized(_)));
        }
    }
}
