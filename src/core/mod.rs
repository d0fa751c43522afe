//! Core business logic module
//!
//! This module contains the source-set resolution logic. Apart from profile
//! loading and the directory checks in [`check`], it performs no I/O; those
//! belong in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`definition`] - Token classification into typed definitions
//! - [`rules`] - Source filter rules and the per-definition rule builders
//! - [`augment`] - Include path and `-I` flag derivation
//! - [`resolver`] - The single-pass resolution driver
//! - [`filter`] - Evaluation of rule lists against file paths
//! - [`profile`] - Profile (srcset.toml) parsing
//! - [`check`] - Validation of every profile environment

pub mod augment;
pub mod check;
pub mod definition;
pub mod filter;
pub mod profile;
pub mod resolver;
pub mod rules;
