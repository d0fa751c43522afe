//! Check command logic
//!
//! Resolves every environment of a profile and reports halted passes,
//! ignored definitions and variant/example directories that do not exist.

use std::path::Path;

use serde::Serialize;

use crate::config::defaults::{EXAMPLES_DIR, VARIANTS_DIR};
use crate::core::augment::{OrderedSet, SourceLayout};
use crate::core::definition::{classify, Definition};
use crate::core::profile::Profile;
use crate::core::resolver::resolve_tokens;
use crate::infra::filesystem;

/// Outcome of checking one environment
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnvCheck {
    /// Environment name
    pub name: String,
    /// Resolution or profile error, if any
    pub error: Option<String>,
    /// Definitions the resolver ignored
    pub ignored: Vec<String>,
    /// Referenced directories missing from the project tree
    pub missing_dirs: Vec<String>,
    /// Number of rules resolved
    pub rule_count: usize,
}

impl EnvCheck {
    /// Whether the environment passes, optionally failing on ignored definitions
    pub fn is_valid(&self, strict: bool) -> bool {
        self.error.is_none() && self.missing_dirs.is_empty() && !(strict && !self.ignored.is_empty())
    }
}

/// Result of the check operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckResult {
    /// Per-environment outcomes in name order
    pub envs: Vec<EnvCheck>,
    /// Whether ignored definitions count as failures
    pub strict: bool,
}

impl CheckResult {
    /// Check if all environments passed
    pub fn is_valid(&self) -> bool {
        self.envs.iter().all(|env| env.is_valid(self.strict))
    }

    /// Environments that failed
    pub fn failures(&self) -> Vec<&EnvCheck> {
        self.envs
            .iter()
            .filter(|env| !env.is_valid(self.strict))
            .collect()
    }
}

/// Directories a definition list refers to, relative to the project root
///
/// Stops where resolution would halt, at the first definition that needs an
/// example before one is declared.
fn referenced_dirs(layout: &SourceLayout, definitions: &[Definition]) -> OrderedSet {
    let mut dirs = OrderedSet::new();
    let mut current_example: Option<&str> = None;

    for definition in definitions {
        if definition.needs_example() && current_example.is_none() {
            break;
        }
        let dir = match definition {
            Definition::Variant(name) => format!("../{VARIANTS_DIR}/{name}"),
            Definition::Example(name) => {
                current_example = Some(name.as_str());
                format!("../{EXAMPLES_DIR}/{name}")
            }
            Definition::UiFlavor(flavor) => match current_example {
                Some(example) => format!("../{EXAMPLES_DIR}/{example}/{flavor}"),
                None => break,
            },
            _ => continue,
        };
        dirs.insert(layout.project_path(&dir));
    }

    dirs
}

/// Check one environment
pub fn check_env(project_dir: &Path, profile: &Profile, name: &str) -> EnvCheck {
    let mut result = EnvCheck {
        name: name.to_string(),
        error: None,
        ignored: Vec::new(),
        missing_dirs: Vec::new(),
        rule_count: 0,
    };

    let tokens = match profile.tokens(name) {
        Ok(tokens) => tokens,
        Err(e) => {
            result.error = Some(e.to_string());
            return result;
        }
    };

    let layout = profile.layout(Some(project_dir));
    match resolve_tokens(&layout, &tokens) {
        Ok(resolution) => {
            result.rule_count = resolution.rules.len();
            result.ignored = resolution.ignored;
        }
        Err(halted) => {
            result.rule_count = halted.partial.rules.len();
            result.ignored = halted.partial.ignored;
            result.error = Some(halted.error.to_string());
        }
    }

    let definitions: Vec<Definition> = tokens.iter().map(classify).collect();
    result.missing_dirs = referenced_dirs(&layout, &definitions)
        .iter()
        .filter(|dir| !filesystem::dir_exists(project_dir, dir))
        .cloned()
        .collect();

    for dir in &result.missing_dirs {
        tracing::warn!("Environment '{}' references missing directory '{}'", name, dir);
    }
    for token in &result.ignored {
        tracing::debug!("Environment '{}' ignores '{}'", name, token);
    }

    result
}

/// Check every environment of a profile
pub fn check(project_dir: &Path, profile: &Profile, strict: bool) -> CheckResult {
    let envs = profile
        .env_names()
        .into_iter()
        .map(|name| check_env(project_dir, profile, name))
        .collect();

    CheckResult {
        envs,
        strict: strict || profile.settings.strict,
    }
}
