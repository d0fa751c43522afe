//! Error types for srcset
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Resolution errors
///
/// The resolver has a single fatal condition; everything else it sees is
/// either applied or ignored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A definition scoped to the current example appeared before any example
    #[error("'{definition}' requires a preceding BUILD_EXAMPLE definition")]
    MissingExampleContext { definition: String },
}

/// Profile file errors
#[derive(Error, Debug)]
pub enum ProfileError {
    /// Profile file not found
    #[error("Profile not found at '{path}'")]
    NotFound { path: PathBuf },

    /// Profile file could not be parsed
    #[error("Failed to parse profile '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Environment not defined in the profile
    #[error("Environment '{name}' not found in profile (available: {})", available.join(", "))]
    UnknownEnv {
        name: String,
        available: Vec<String>,
    },

    /// Environment extends an environment that does not exist
    #[error("Environment '{env}' extends unknown environment '{base}'")]
    UnknownBase { env: String, base: String },

    /// Source directory is empty or leaves the project root
    #[error("Invalid src_dir '{src_dir}': expected a directory relative to the project root")]
    InvalidSrcDir { src_dir: String },

    /// Extends chain loops back on itself
    #[error("Circular extends chain: {}", chain.join(" -> "))]
    CircularExtends { chain: Vec<String> },
}

/// Source filter errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Rule text is not of the form `+<pattern>` or `-<pattern>`
    #[error("Invalid source filter rule '{rule}'")]
    InvalidRule { rule: String },

    /// Pattern could not be compiled into a matcher
    #[error("Invalid pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to walk a directory tree
    #[error("Failed to scan '{path}': {error}")]
    Scan { path: PathBuf, error: String },
}

/// Errors from loading project files
#[derive(Error, Debug)]
pub enum SrcsetError {
    /// Profile error
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),
}
