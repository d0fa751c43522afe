//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod check;
pub mod envs;
pub mod resolve;
pub mod select;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};

use crate::config::defaults::{PROFILE_ENV_VAR, PROFILE_FILE};
use crate::core::augment::SourceLayout;
use crate::core::definition::Token;
use crate::core::profile::Profile;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve definitions into source filter rules, include paths and flags
    Resolve {
        #[command(flatten)]
        input: DefinitionArgs,

        /// Text layout of the result
        #[arg(long, value_enum, default_value_t = ResolveFormat::Text)]
        format: ResolveFormat,

        /// Anchor include paths at the absolute project root
        #[arg(long)]
        absolute: bool,
    },

    /// List the source files the resolved rules select
    Select {
        #[command(flatten)]
        input: DefinitionArgs,

        /// Show every source file with the rule deciding it
        #[arg(long)]
        explain: bool,

        /// Evaluate this source filter value instead of resolving definitions
        #[arg(
            long,
            value_name = "FILTER",
            allow_hyphen_values = true,
            conflicts_with_all = ["env", "defines", "build_flags"]
        )]
        rules: Option<String>,
    },

    /// List the environments of the profile
    Envs {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Resolve every environment of the profile and report problems
    Check {
        #[command(flatten)]
        project: ProjectArgs,

        /// Fail on definitions the resolver does not recognize
        #[arg(long)]
        strict: bool,
    },
}

/// Result layout for `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolveFormat {
    /// Sections with one entry per line
    Text,
    /// Rules only, space separated on one line
    Filter,
}

/// Project location arguments
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Firmware project root
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Profile file (defaults to srcset.toml in the project root)
    #[arg(long, value_name = "FILE", env = PROFILE_ENV_VAR)]
    pub config: Option<PathBuf>,
}

impl ProjectArgs {
    /// Project root, falling back to the working directory
    pub fn project_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    fn profile_path(&self, root: &Path) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| root.join(PROFILE_FILE))
    }

    /// Load the profile, failing when it does not exist
    pub fn load_profile(&self, root: &Path) -> Result<Profile> {
        let path = self.profile_path(root);
        Profile::load(&path).with_context(|| format!("Failed to load profile {}", path.display()))
    }

    /// Load the profile if present
    pub fn load_optional_profile(&self, root: &Path) -> Result<Option<Profile>> {
        let path = self.profile_path(root);
        if self.config.is_none() && !path.exists() {
            return Ok(None);
        }
        Profile::load(&path)
            .map(Some)
            .with_context(|| format!("Failed to load profile {}", path.display()))
    }
}

/// Where definitions come from
#[derive(Args, Debug, Clone)]
pub struct DefinitionArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Profile environment supplying the definitions
    #[arg(short, long, value_name = "NAME")]
    pub env: Option<String>,

    /// Definition in NAME or NAME=VALUE form (repeatable, applied in order)
    #[arg(short = 'D', long = "define", value_name = "DEFINE")]
    pub defines: Vec<String>,

    /// Compiler flag string whose -D definitions are applied after --define
    #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
    pub build_flags: Option<String>,
}

/// Definitions and layout gathered from the command line and profile
#[derive(Debug)]
pub struct ResolvedInput {
    pub root: PathBuf,
    pub tokens: Vec<Token>,
    pub layout: SourceLayout,
}

impl DefinitionArgs {
    /// Gather tokens: environment definitions first, then `-D`, then `--build-flags`
    pub fn gather(&self) -> Result<ResolvedInput> {
        let root = self.project.project_root()?;

        let profile = if self.env.is_some() {
            Some(self.project.load_profile(&root)?)
        } else {
            self.project.load_optional_profile(&root)?
        };

        let mut tokens = Vec::new();
        if let (Some(profile), Some(env)) = (&profile, &self.env) {
            tokens.extend(profile.tokens(env)?);
            tracing::info!("Using environment '{}'", env);
        }
        tokens.extend(self.defines.iter().map(|d| Token::parse(d)));
        if let Some(flags) = &self.build_flags {
            tokens.extend(Token::from_build_flags(flags));
        }

        let layout = profile
            .as_ref()
            .map(|p| p.layout(None))
            .unwrap_or_default();

        Ok(ResolvedInput {
            root,
            tokens,
            layout,
        })
    }
}

impl Commands {
    /// Execute the command
    pub fn run(self) -> Result<()> {
        match self {
            Self::Resolve {
                input,
                format,
                absolute,
            } => resolve::execute(&input, format, absolute),
            Self::Select {
                input,
                explain,
                rules,
            } => select::execute(&input, explain, rules.as_deref()),
            Self::Envs { project } => envs::execute(&project),
            Self::Check { project, strict } => check::execute(&project, strict),
        }
    }
}
