//! Definition classification
//!
//! Maps raw compile-definition tokens onto the closed set of definitions the
//! resolver understands. Tokens come either as bare symbols (`ESP32`) or as
//! key/value pairs (`MC_VARIANT=heltec_v4`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::defaults::keys;

/// A raw compile-definition token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Bare symbol, e.g. `ESP32`
    Symbol(String),
    /// Key/value pair, e.g. `MC_VARIANT=heltec_v4`
    Pair { key: String, value: String },
}

impl Token {
    /// Create a bare symbol token
    pub fn symbol(name: &str) -> Self {
        Self::Symbol(name.to_string())
    }

    /// Create a key/value token
    pub fn pair(key: &str, value: &str) -> Self {
        Self::Pair {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Parse a definition in `NAME` or `NAME=VALUE` form
    ///
    /// Surrounding whitespace is trimmed and one level of matching quotes
    /// around the value is removed.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.split_once('=') {
            Some((key, value)) => Self::pair(key.trim(), unquote(value.trim())),
            None => Self::symbol(input),
        }
    }

    /// Extract definition tokens from a compiler flag string
    ///
    /// Recognizes `-D NAME`, `-DNAME` and the `=VALUE` forms of both. Any
    /// other flag (and its argument, for `-I`/`-include`) is skipped. Words
    /// are split like a shell would, so `-D MC_VARIANT="a b"` keeps its space.
    ///
    /// ```
    /// use srcset::core::definition::Token;
    ///
    /// let tokens = Token::from_build_flags("-Os -D ESP32 -DMC_VARIANT=heltec_v4 -I include");
    /// assert_eq!(tokens, vec![Token::symbol("ESP32"), Token::pair("MC_VARIANT", "heltec_v4")]);
    /// ```
    pub fn from_build_flags(flags: &str) -> Vec<Self> {
        let mut tokens = Vec::new();
        let words = split_words(flags);
        let mut words = words.iter().map(String::as_str);

        while let Some(word) = words.next() {
            match word {
                "-D" => {
                    if let Some(def) = words.next() {
                        tokens.push(Self::parse(def));
                    }
                }
                "-I" | "-include" | "-imacros" | "-isystem" => {
                    words.next();
                }
                _ => {
                    if let Some(def) = word.strip_prefix("-D") {
                        tokens.push(Self::parse(def));
                    }
                }
            }
        }

        tokens
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(name) => write!(f, "{name}"),
            Self::Pair { key, value } => write!(f, "{key}={value}"),
        }
    }
}

/// Split a flag string into shell words
///
/// Quotes group and are removed; a backslash outside single quotes keeps the
/// next character literal.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"') | None, '\\') => {
                current.extend(chars.next());
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(current);
    }
    words
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Supported MCU families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Espressif ESP32 family
    Esp32,
    /// Nordic nRF52 family
    Nrf52,
    /// Raspberry Pi RP2040
    Rp2040,
    /// ST STM32 (WL) family
    Stm32,
}

impl Platform {
    /// All supported platforms
    pub const ALL: [Self; 4] = [Self::Esp32, Self::Nrf52, Self::Rp2040, Self::Stm32];

    /// Look up a platform by its compile-definition symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.symbol() == symbol)
    }

    /// Compile-definition symbol selecting this platform
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Esp32 => "ESP32",
            Self::Nrf52 => "NRF52_PLATFORM",
            Self::Rp2040 => "RP2040_PLATFORM",
            Self::Stm32 => "STM32_PLATFORM",
        }
    }

    /// Helper directory name under `helpers/`
    pub fn helper_dir(self) -> &'static str {
        match self {
            Self::Esp32 => "esp32",
            Self::Nrf52 => "nrf52",
            Self::Rp2040 => "rp2040",
            Self::Stm32 => "stm32",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A classified build definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// Target MCU family
    Platform(Platform),
    /// Hardware variant subtree
    Variant(String),
    /// Display driver source
    DisplayClass(String),
    /// Example application
    Example(String),
    /// File excluded from the current example
    ExcludeFromExample(String),
    /// UI flavor subtree of the current example
    UiFlavor(String),
    /// Token outside the vocabulary, kept verbatim for reporting
    Unrecognized(String),
}

impl Definition {
    /// Whether the definition needs a preceding [`Definition::Example`]
    pub fn needs_example(&self) -> bool {
        matches!(self, Self::ExcludeFromExample(_) | Self::UiFlavor(_))
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform(p) => write!(f, "{p}"),
            Self::Variant(name) => write!(f, "{}={name}", keys::VARIANT),
            Self::DisplayClass(name) => write!(f, "{}={name}", keys::DISPLAY_CLASS),
            Self::Example(name) => write!(f, "{}={name}", keys::BUILD_EXAMPLE),
            Self::ExcludeFromExample(name) => write!(f, "{}={name}", keys::EXCLUDE_FROM_EXAMPLE),
            Self::UiFlavor(name) => write!(f, "{}={name}", keys::UI_FLAVOR),
            Self::Unrecognized(text) => write!(f, "{text}"),
        }
    }
}

impl From<Token> for Definition {
    fn from(token: Token) -> Self {
        classify(&token)
    }
}

impl From<&str> for Definition {
    fn from(input: &str) -> Self {
        classify(&Token::parse(input))
    }
}

/// Classify a raw token
///
/// Never fails: tokens outside the vocabulary, and known keys carrying an
/// empty value, become [`Definition::Unrecognized`].
pub fn classify(token: &Token) -> Definition {
    match token {
        Token::Symbol(name) => Platform::from_symbol(name)
            .map_or_else(|| Definition::Unrecognized(token.to_string()), Definition::Platform),
        Token::Pair { value, .. } if value.is_empty() => {
            Definition::Unrecognized(token.to_string())
        }
        Token::Pair { key, value } => {
            let value = value.clone();
            match key.as_str() {
                keys::VARIANT => Definition::Variant(value),
                keys::DISPLAY_CLASS => Definition::DisplayClass(value),
                keys::BUILD_EXAMPLE => Definition::Example(value),
                keys::EXCLUDE_FROM_EXAMPLE => Definition::ExcludeFromExample(value),
                keys::UI_FLAVOR => Definition::UiFlavor(value),
                _ => Definition::Unrecognized(token.to_string()),
            }
        }
    }
}
