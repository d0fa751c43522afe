//! Configuration and constants
//!
//! - [`defaults`] - Default values and the fixed definition vocabulary

pub mod defaults;
