//! Source filter rules
//!
//! A rule either includes or excludes the files matched by a glob pattern.
//! Patterns are relative to the source directory, so board and example code
//! living beside it is reached through `../`. Rules are rendered in the
//! `+<pattern>` / `-<pattern>` syntax the build tool consumes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    BASELINE_INCLUDES, COMPOSITE_DISPLAY_CLASS, COMPOSITE_DISPLAY_SOURCES, EXAMPLES_DIR,
    VARIANTS_DIR,
};
use crate::core::definition::Platform;
use crate::error::FilterError;

/// Whether a rule adds or removes files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Include,
    Exclude,
}

impl RuleKind {
    fn sign(self) -> char {
        match self {
            Self::Include => '+',
            Self::Exclude => '-',
        }
    }
}

/// A single source filter rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub kind: RuleKind,
    pub pattern: String,
}

impl Rule {
    /// Rule selecting files matched by `pattern`
    pub fn include(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Include,
            pattern: pattern.into(),
        }
    }

    /// Rule deselecting files matched by `pattern`
    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Exclude,
            pattern: pattern.into(),
        }
    }

    pub fn is_include(&self) -> bool {
        self.kind == RuleKind::Include
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.kind.sign(), self.pattern)
    }
}

impl FromStr for Rule {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || FilterError::InvalidRule {
            rule: s.to_string(),
        };

        let kind = match s.chars().next() {
            Some('+') => RuleKind::Include,
            Some('-') => RuleKind::Exclude,
            _ => return Err(invalid()),
        };
        let pattern = s[1..]
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .filter(|p| !p.is_empty())
            .ok_or_else(invalid)?;

        Ok(Self {
            kind,
            pattern: pattern.to_string(),
        })
    }
}

impl Serialize for Rule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a whitespace separated list of rules, e.g. an existing `src_filter` value
pub fn parse_rules(input: &str) -> Result<Vec<Rule>, FilterError> {
    let mut rules = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        // Patterns may contain spaces, so split on the closing bracket
        let end = rest.find('>').ok_or_else(|| FilterError::InvalidRule {
            rule: rest.to_string(),
        })?;
        rules.push(rest[..=end].parse()?);
        rest = rest[end + 1..].trim_start();
    }

    Ok(rules)
}

/// Rules present in every resolution, in order
pub fn baseline() -> Vec<Rule> {
    BASELINE_INCLUDES.iter().map(|p| Rule::include(*p)).collect()
}

/// Everything under the platform's helper directory
pub fn platform(platform: Platform) -> Rule {
    Rule::include(format!("helpers/{}/*", platform.helper_dir()))
}

/// The whole variant directory
pub fn variant(name: &str) -> Rule {
    Rule::include(format!("../{VARIANTS_DIR}/{name}"))
}

/// The display driver source, plus the OLED base driver for the composite class
pub fn display_class(name: &str) -> Vec<Rule> {
    let mut rules = vec![Rule::include(format!("helpers/ui/{name}.cpp"))];
    if name == COMPOSITE_DISPLAY_CLASS {
        rules.extend(COMPOSITE_DISPLAY_SOURCES.iter().map(|p| Rule::include(*p)));
    }
    rules
}

/// Top-level sources of an example application
pub fn example(name: &str) -> Rule {
    Rule::include(format!("../{EXAMPLES_DIR}/{name}/*.cpp"))
}

/// One file removed from the current example
pub fn exclude_from_example(example: &str, file: &str) -> Rule {
    Rule::exclude(format!("../{EXAMPLES_DIR}/{example}/{file}"))
}

/// A UI flavor subtree of the current example
pub fn ui_flavor(example: &str, flavor: &str) -> Rule {
    Rule::include(format!("../{EXAMPLES_DIR}/{example}/{flavor}/*.cpp"))
}
