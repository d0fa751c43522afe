//! Output formatting
//!
//! Global output preferences (quiet, JSON, verbosity), status prefixes and
//! error display. Results go to stdout so the build tool can consume them;
//! status lines and errors go to stderr.

use std::sync::OnceLock;

use serde::Serialize;

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

/// Output preferences for the current process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress everything except results and errors
    pub quiet: bool,
    /// Emit results as JSON
    pub json: bool,
    /// Verbosity level from repeated `-v`
    pub verbose: u8,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Make this configuration visible to [`OutputConfig::current`]
    ///
    /// Only the first call has an effect.
    pub fn apply_global(self) {
        let _ = OUTPUT_CONFIG.set(self);
    }

    /// The global configuration, or the default when none was applied
    pub fn current() -> Self {
        OUTPUT_CONFIG.get().copied().unwrap_or_default()
    }

    /// Default log level implied by the flags
    pub fn log_level(&self) -> tracing::Level {
        match (self.quiet, self.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, _) => tracing::Level::DEBUG,
        }
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// Print a status line to stderr unless quiet
pub fn print_status(prefix: &str, message: &str) {
    if !OutputConfig::current().quiet {
        eprintln!("{prefix} {message}");
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Display an error and its causes on stderr
///
/// In JSON mode the error is printed as `{"error": "...", "causes": [...]}`
/// on stdout instead, so scripts always get parseable output.
pub fn display_error(error: &anyhow::Error) {
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if OutputConfig::current().json {
        let value = serde_json::json!({
            "error": error.to_string(),
            "causes": causes,
        });
        println!("{value}");
        return;
    }

    eprintln!("{} Error: {}", status::ERROR, error);
    for cause in causes {
        eprintln!("  caused by: {cause}");
    }
}
