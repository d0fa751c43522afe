//! Infrastructure layer
//!
//! Handles all I/O operations: reading profiles and scanning source trees.
//! This module is the only place where side effects occur.

pub mod filesystem;
pub mod scan;
