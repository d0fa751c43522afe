//! Srcset - source-set resolver for multi-target mesh radio firmware
//!
//! Given the compile definitions of a build environment (platform, hardware
//! variant, display driver, example application, UI flavor, exclusions) this
//! library computes which sources enter the firmware image and which include
//! paths and flags the compiler needs.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic (classification, rules, resolution)
//! - [`infra`] - Infrastructure layer (filesystem, source tree scanning)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling
//!
//! # Example
//!
//! ```
//! use srcset::core::resolver::resolve;
//!
//! let resolution = resolve(["ESP32", "MC_VARIANT=heltec_v4"]).unwrap();
//! assert_eq!(resolution.flags.as_slice(), ["-I src/helpers/esp32", "-I variants/heltec_v4"]);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
