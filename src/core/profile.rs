//! Profile (srcset.toml) parsing
//!
//! A profile names build environments, each an ordered list of definitions.
//! Environments can extend one another; the base environment's definitions
//! come first. String values support `${VAR}` substitution from the process
//! environment.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::defaults::DEFAULT_SRC_DIR;
use crate::core::augment::SourceLayout;
use crate::core::definition::Token;
use crate::error::{ProfileError, SrcsetError};
use crate::infra::filesystem;

/// The profile file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Project-wide settings
    #[serde(default)]
    pub settings: Settings,

    /// Build environments by name
    #[serde(default)]
    pub env: BTreeMap<String, EnvConfig>,
}

/// Project-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Directory source filter patterns are relative to
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Treat unrecognized definitions as errors during `check`
    #[serde(default)]
    pub strict: bool,
}

fn default_src_dir() -> String {
    DEFAULT_SRC_DIR.to_string()
}

impl Settings {
    /// Reject source dirs that would anchor paths outside the project root
    pub fn validate(&self) -> Result<(), ProfileError> {
        let src_dir = self.src_dir.trim();
        let absolute = src_dir.starts_with(['/', '\\']) || Path::new(src_dir).is_absolute();
        if src_dir.trim_end_matches('/').is_empty() || absolute {
            return Err(ProfileError::InvalidSrcDir {
                src_dir: self.src_dir.clone(),
            });
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            strict: false,
        }
    }
}

/// A single build environment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnvConfig {
    /// Environment whose definitions precede this one's
    #[serde(default)]
    pub extends: Option<String>,

    /// Definitions in `NAME` / `NAME=VALUE` form
    #[serde(default)]
    pub defines: Vec<String>,

    /// Compiler flags; `-D` definitions are taken after `defines`
    #[serde(default)]
    pub build_flags: Option<String>,
}

impl EnvConfig {
    /// This environment's own tokens, without its base
    pub fn own_tokens(&self) -> Vec<Token> {
        let mut tokens: Vec<Token> = self.defines.iter().map(|d| Token::parse(d)).collect();
        if let Some(flags) = &self.build_flags {
            tokens.extend(Token::from_build_flags(flags));
        }
        tokens
    }
}

impl Profile {
    /// Parse from TOML, substituting `${VAR}` references first
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let mut value: toml::Value =
            toml::from_str(content).map_err(|e| format!("Failed to parse TOML: {e}"))?;
        substitute_in_value(&mut value)?;
        value
            .try_into()
            .map_err(|e: toml::de::Error| e.to_string())
    }

    /// Load the profile file at `path`
    pub fn load(path: &Path) -> Result<Self, SrcsetError> {
        if !path.exists() {
            return Err(ProfileError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = filesystem::read_file(path)?;
        let profile = Self::from_toml(&content).map_err(|error| ProfileError::Parse {
            path: path.to_path_buf(),
            error,
        })?;
        profile.settings.validate()?;

        tracing::debug!(
            "Loaded profile '{}' with {} environment(s)",
            path.display(),
            profile.env.len()
        );
        Ok(profile)
    }

    /// Environment names in sorted order
    pub fn env_names(&self) -> Vec<&str> {
        self.env.keys().map(String::as_str).collect()
    }

    /// Source layout for a project rooted at `root`
    pub fn layout(&self, root: Option<&Path>) -> SourceLayout {
        let layout = SourceLayout::default().with_src_dir(&self.settings.src_dir);
        match root {
            Some(root) => layout.with_root(root),
            None => layout,
        }
    }

    /// The full token list of an environment, base environments first
    pub fn tokens(&self, name: &str) -> Result<Vec<Token>, ProfileError> {
        let chain = self.extends_chain(name)?;

        Ok(chain
            .iter()
            .rev()
            .flat_map(|env| self.env[env.as_str()].own_tokens())
            .collect())
    }

    /// Environment names from `name` up to its root base
    fn extends_chain(&self, name: &str) -> Result<Vec<String>, ProfileError> {
        if !self.env.contains_key(name) {
            return Err(ProfileError::UnknownEnv {
                name: name.to_string(),
                available: self.env.keys().cloned().collect(),
            });
        }

        let mut chain = vec![name.to_string()];
        let mut current = name;

        while let Some(base) = self.env[current].extends.as_deref() {
            if chain.iter().any(|seen| seen == base) {
                chain.push(base.to_string());
                return Err(ProfileError::CircularExtends { chain });
            }
            if !self.env.contains_key(base) {
                return Err(ProfileError::UnknownBase {
                    env: current.to_string(),
                    base: base.to_string(),
                });
            }
            chain.push(base.to_string());
            current = base;
        }

        Ok(chain)
    }
}

/// Substitute environment variables in a string using ${VAR} syntax.
///
/// Unset variables expand to an empty string.
///
/// ```
/// use srcset::core::profile::substitute_env_vars;
///
/// std::env::set_var("SRCSET_DOC_VARIANT", "heltec_v4");
/// let result = substitute_env_vars("MC_VARIANT=${SRCSET_DOC_VARIANT}").unwrap();
/// assert_eq!(result, "MC_VARIANT=heltec_v4");
/// std::env::remove_var("SRCSET_DOC_VARIANT");
/// ```
pub fn substitute_env_vars(input: &str) -> Result<String, String> {
    let re =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| format!("Invalid regex: {e}"))?;

    let mut last_end = 0;
    let mut output = String::new();

    for cap in re.captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        output.push_str(&input[last_end..full_match.start()]);
        output.push_str(&std::env::var(&cap[1]).unwrap_or_default());
        last_end = full_match.end();
    }

    output.push_str(&input[last_end..]);
    Ok(output)
}

fn substitute_in_value(value: &mut toml::Value) -> Result<(), String> {
    match value {
        toml::Value::String(s) => {
            *s = substitute_env_vars(s)?;
        }
        toml::Value::Array(arr) => {
            for item in arr.iter_mut() {
                substitute_in_value(item)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, v) in table.iter_mut() {
                substitute_in_value(v)?;
            }
        }
        _ => {}
    }
    Ok(())
}
