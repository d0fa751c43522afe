//! Source-set resolution
//!
//! Walks the definitions once, in order, turning each one into source filter
//! rules and include paths. Definitions scoped to "the current example" see
//! the most recent `BUILD_EXAMPLE` of the same pass; without one the pass
//! halts.

use std::fmt;

use serde::Serialize;

use crate::core::augment::{self, OrderedSet, SourceLayout};
use crate::core::definition::{classify, Definition, Token};
use crate::core::rules::{self, Rule};
use crate::error::ResolveError;

/// Outputs of a resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Source filter rules, baseline first
    #[serde(rename = "src_filter")]
    pub rules: Vec<Rule>,
    /// Include-search-paths
    pub include_paths: OrderedSet,
    /// Compiler flags (`-I <path>`)
    #[serde(rename = "build_flags")]
    pub flags: OrderedSet,
    /// Tokens outside the vocabulary, in encounter order
    pub ignored: Vec<String>,
}

impl Resolution {
    /// The rules as one space separated source filter value
    pub fn filter_string(&self) -> String {
        self.rules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A pass stopped by an error, with everything accumulated before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halted {
    pub partial: Resolution,
    pub error: ResolveError,
}

impl fmt::Display for Halted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for Halted {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Mutable state of a single resolution pass
#[derive(Debug)]
pub struct ResolverState {
    layout: SourceLayout,
    rules: Vec<Rule>,
    include_paths: OrderedSet,
    flags: OrderedSet,
    ignored: Vec<String>,
    current_example: Option<String>,
}

impl ResolverState {
    /// Fresh state holding the baseline rules
    pub fn new(layout: SourceLayout) -> Self {
        Self {
            layout,
            rules: rules::baseline(),
            include_paths: OrderedSet::new(),
            flags: OrderedSet::new(),
            ignored: Vec::new(),
            current_example: None,
        }
    }

    /// Example set by the most recent `BUILD_EXAMPLE`
    pub fn current_example(&self) -> Option<&str> {
        self.current_example.as_deref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Apply one definition: append its rules and, for platforms and
    /// variants, its include path and flag
    ///
    /// On error the state is left untouched.
    pub fn apply(&mut self, definition: &Definition) -> Result<(), ResolveError> {
        let appended = self.accumulate(definition)?;
        for rule in &self.rules[self.rules.len() - appended..] {
            tracing::debug!("{} -> {}", definition, rule);
        }
        augment::augment(
            &self.layout,
            &mut self.include_paths,
            &mut self.flags,
            definition,
        );
        Ok(())
    }

    /// Append the rules for a definition, returning how many were added
    fn accumulate(&mut self, definition: &Definition) -> Result<usize, ResolveError> {
        let before = self.rules.len();

        match definition {
            Definition::Platform(platform) => self.rules.push(rules::platform(*platform)),
            Definition::Variant(name) => self.rules.push(rules::variant(name)),
            Definition::DisplayClass(name) => self.rules.extend(rules::display_class(name)),
            Definition::Example(name) => {
                self.rules.push(rules::example(name));
                self.current_example = Some(name.clone());
            }
            Definition::ExcludeFromExample(file) => {
                let example = self.require_example(definition)?;
                let rule = rules::exclude_from_example(example, file);
                self.rules.push(rule);
            }
            Definition::UiFlavor(flavor) => {
                let example = self.require_example(definition)?;
                let rule = rules::ui_flavor(example, flavor);
                self.rules.push(rule);
            }
            Definition::Unrecognized(text) => {
                tracing::debug!("Ignoring unrecognized definition '{}'", text);
                self.ignored.push(text.clone());
            }
        }

        Ok(self.rules.len() - before)
    }

    fn require_example(&self, definition: &Definition) -> Result<&str, ResolveError> {
        self.current_example
            .as_deref()
            .ok_or_else(|| ResolveError::MissingExampleContext {
                definition: definition.to_string(),
            })
    }

    /// Consume the state, emitting its outputs
    pub fn finish(self) -> Resolution {
        Resolution {
            rules: self.rules,
            include_paths: self.include_paths,
            flags: self.flags,
            ignored: self.ignored,
        }
    }
}

/// Resolve definitions with the default source layout
pub fn resolve<I>(definitions: I) -> Result<Resolution, Halted>
where
    I: IntoIterator,
    I::Item: Into<Definition>,
{
    resolve_with(&SourceLayout::default(), definitions)
}

/// Resolve definitions in one forward pass
///
/// Accepts anything convertible into a [`Definition`], so raw [`Token`]s and
/// `NAME=VALUE` strings are classified on the way in. Stops at the first
/// definition that needs an example when none has been declared.
pub fn resolve_with<I>(layout: &SourceLayout, definitions: I) -> Result<Resolution, Halted>
where
    I: IntoIterator,
    I::Item: Into<Definition>,
{
    let mut state = ResolverState::new(layout.clone());

    for definition in definitions {
        let definition = definition.into();
        if let Err(error) = state.apply(&definition) {
            tracing::debug!("Resolution halted at '{}'", definition);
            return Err(Halted {
                partial: state.finish(),
                error,
            });
        }
    }

    Ok(state.finish())
}

/// Classify and resolve raw tokens
pub fn resolve_tokens(layout: &SourceLayout, tokens: &[Token]) -> Result<Resolution, Halted> {
    resolve_with(layout, tokens.iter().map(classify))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::definition::Platform;
    use crate::test_utils::generators;
    use proptest::prelude::*;

    fn rendered(resolution: &Resolution) -> Vec<String> {
        resolution.rules.iter().map(ToString::to_string).collect()
    }

    fn baseline_len() -> usize {
        rules::baseline().len()
    }

    #[test]
    fn test_empty_input_yields_baseline() {
        let resolution = resolve(Vec::<Definition>::new()).unwrap();
        assert_eq!(resolution.rules, rules::baseline());
        assert!(resolution.include_paths.is_empty());
        assert!(resolution.flags.is_empty());
        assert!(resolution.ignored.is_empty());
    }

    #[test]
    fn test_exclude_after_example() {
        let resolution = resolve(["BUILD_EXAMPLE=a", "EXCLUDE_FROM_EXAMPLE=x.cpp"]).unwrap();
        assert_eq!(
            resolution.rules.last(),
            Some(&Rule::exclude("../examples/a/x.cpp"))
        );
    }

    #[test]
    fn test_exclude_without_example_halts() {
        let halted = resolve(["EXCLUDE_FROM_EXAMPLE=x.cpp"]).unwrap_err();
        assert_eq!(
            halted.error,
            ResolveError::MissingExampleContext {
                definition: "EXCLUDE_FROM_EXAMPLE=x.cpp".to_string()
            }
        );
        assert_eq!(halted.partial.rules, rules::baseline());
        assert!(halted.partial.rules.iter().all(Rule::is_include));
    }

    #[test]
    fn test_ui_flavor_without_example_halts() {
        let halted = resolve(["ESP32", "MC_UI_FLAVOR=ui-new", "MC_VARIANT=heltec_v4"]).unwrap_err();
        assert!(matches!(
            halted.error,
            ResolveError::MissingExampleContext { .. }
        ));
        // Definitions before the offending one are kept, later ones are not
        assert_eq!(halted.partial.rules.len(), baseline_len() + 1);
        assert_eq!(halted.partial.flags.as_slice(), ["-I src/helpers/esp32"]);
    }

    #[test]
    fn test_ui_flavor_uses_latest_example() {
        let resolution = resolve([
            "BUILD_EXAMPLE=simple_repeater",
            "BUILD_EXAMPLE=companion_radio",
            "MC_UI_FLAVOR=ui-new",
        ])
        .unwrap();
        assert_eq!(
            rendered(&resolution)[baseline_len()..],
            [
                "+<../examples/simple_repeater/*.cpp>",
                "+<../examples/companion_radio/*.cpp>",
                "+<../examples/companion_radio/ui-new/*.cpp>",
            ]
        );
    }

    #[test]
    fn test_composite_display_expansion() {
        let resolution = resolve(["DISPLAY_CLASS=ST7789Display"]).unwrap();
        assert_eq!(
            rendered(&resolution)[baseline_len()..],
            [
                "+<helpers/ui/ST7789Display.cpp>",
                "+<helpers/ui/OLEDDisplay.cpp>",
                "+<helpers/ui/OLEDDisplayFonts.cpp>",
            ]
        );
    }

    #[test]
    fn test_platform_pairing() {
        let resolution = resolve([Definition::Platform(Platform::Esp32)]).unwrap();
        assert_eq!(
            resolution.rules[baseline_len()..],
            [Rule::include("helpers/esp32/*")]
        );
        assert_eq!(resolution.include_paths.as_slice(), ["src/helpers/esp32"]);
        assert_eq!(resolution.flags.as_slice(), ["-I src/helpers/esp32"]);
    }

    #[test]
    fn test_duplicate_platform_keeps_rules_collapses_paths() {
        let resolution = resolve(["ESP32", "ESP32"]).unwrap();
        assert_eq!(
            resolution.rules[baseline_len()..],
            [
                Rule::include("helpers/esp32/*"),
                Rule::include("helpers/esp32/*"),
            ]
        );
        assert_eq!(resolution.include_paths.len(), 1);
        assert_eq!(resolution.flags.len(), 1);
    }

    #[test]
    fn test_unrecognized_tokens_are_ignored() {
        let resolution = resolve(["LORA_FREQ=869.525", "ESP32", "WITH_BRIDGE"]).unwrap();
        assert_eq!(resolution.rules.len(), baseline_len() + 1);
        assert_eq!(resolution.ignored, vec!["LORA_FREQ=869.525", "WITH_BRIDGE"]);
    }

    #[test]
    fn test_full_board_environment() {
        let layout = SourceLayout::default();
        let tokens = Token::from_build_flags(
            "-D ESP32 -D MC_VARIANT=heltec_v4 -D DISPLAY_CLASS=SSD1306Display \
             -D BUILD_EXAMPLE=companion_radio -D MC_UI_FLAVOR=ui-new \
             -D EXCLUDE_FROM_EXAMPLE=UITask.cpp",
        );
        let resolution = resolve_tokens(&layout, &tokens).unwrap();

        assert_eq!(
            rendered(&resolution)[baseline_len()..],
            [
                "+<helpers/esp32/*>",
                "+<../variants/heltec_v4>",
                "+<helpers/ui/SSD1306Display.cpp>",
                "+<../examples/companion_radio/*.cpp>",
                "+<../examples/companion_radio/ui-new/*.cpp>",
                "-<../examples/companion_radio/UITask.cpp>",
            ]
        );
        assert_eq!(
            resolution.include_paths.as_slice(),
            ["src/helpers/esp32", "variants/heltec_v4"]
        );
        assert_eq!(
            resolution.flags.as_slice(),
            ["-I src/helpers/esp32", "-I variants/heltec_v4"]
        );
    }

    #[test]
    fn test_state_tracks_current_example() {
        let mut state = ResolverState::new(SourceLayout::default());
        assert_eq!(state.current_example(), None);
        state
            .apply(&Definition::Example("ping_server".to_string()))
            .unwrap();
        assert_eq!(state.current_example(), Some("ping_server"));
        state
            .apply(&Definition::Variant("rak4631".to_string()))
            .unwrap();
        assert_eq!(state.current_example(), Some("ping_server"));
    }

    #[test]
    fn test_failed_apply_leaves_state_untouched() {
        let mut state = ResolverState::new(SourceLayout::default());
        let before = state.rules().to_vec();
        assert!(state
            .apply(&Definition::UiFlavor("ui-orig".to_string()))
            .is_err());
        assert_eq!(state.rules(), before.as_slice());
    }

    #[test]
    fn test_filter_string() {
        let resolution = resolve(["MC_VARIANT=xiao_c6"]).unwrap();
        assert!(resolution
            .filter_string()
            .starts_with("+<*.cpp> +<helpers/*.cpp>"));
        assert!(resolution.filter_string().ends_with(" +<../variants/xiao_c6>"));
    }

    #[test]
    fn test_json_report_shape() {
        let resolution = resolve(["ESP32"]).unwrap();
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["src_filter"][5], "+<helpers/esp32/*>");
        assert_eq!(json["include_paths"][0], "src/helpers/esp32");
        assert_eq!(json["build_flags"][0], "-I src/helpers/esp32");
        assert!(json["ignored"].as_array().unwrap().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_resolution_is_deterministic(tokens in generators::token_list()) {
            let layout = SourceLayout::default();
            let first = resolve_tokens(&layout, &tokens);
            let second = resolve_tokens(&layout, &tokens);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_baseline_is_always_the_prefix(tokens in generators::token_list()) {
            let layout = SourceLayout::default();
            let resolution = match resolve_tokens(&layout, &tokens) {
                Ok(resolution) => resolution,
                Err(halted) => halted.partial,
            };
            let baseline = rules::baseline();
            prop_assert_eq!(&resolution.rules[..baseline.len()], baseline.as_slice());
        }

        #[test]
        fn prop_flags_mirror_include_paths(tokens in generators::token_list()) {
            let layout = SourceLayout::default();
            if let Ok(resolution) = resolve_tokens(&layout, &tokens) {
                let expected: Vec<String> = resolution
                    .include_paths
                    .iter()
                    .map(|p| format!("-I {p}"))
                    .collect();
                prop_assert_eq!(resolution.flags.as_slice(), expected.as_slice());
            }
        }
    }
}
