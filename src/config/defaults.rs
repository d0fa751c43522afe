//! Default configuration values

/// Profile file looked up at the project root
pub const PROFILE_FILE: &str = "srcset.toml";

/// Environment variable overriding the profile file location
pub const PROFILE_ENV_VAR: &str = "SRCSET_CONFIG";

/// Directory source-filter patterns are relative to
pub const DEFAULT_SRC_DIR: &str = "src";

/// Directory holding per-variant board support code (relative to the project root)
pub const VARIANTS_DIR: &str = "variants";

/// Directory holding example applications (relative to the project root)
pub const EXAMPLES_DIR: &str = "examples";

/// Definition keys recognized by the classifier
pub mod keys {
    /// Hardware variant subtree
    pub const VARIANT: &str = "MC_VARIANT";

    /// Display driver source
    pub const DISPLAY_CLASS: &str = "DISPLAY_CLASS";

    /// Example application sources
    pub const BUILD_EXAMPLE: &str = "BUILD_EXAMPLE";

    /// Single file excluded from the current example
    pub const EXCLUDE_FROM_EXAMPLE: &str = "EXCLUDE_FROM_EXAMPLE";

    /// UI flavor subtree of the current example
    pub const UI_FLAVOR: &str = "MC_UI_FLAVOR";
}

/// Display class that cannot build without the OLED base driver
pub const COMPOSITE_DISPLAY_CLASS: &str = "ST7789Display";

/// Extra sources pulled in for [`COMPOSITE_DISPLAY_CLASS`], relative to the source dir
pub const COMPOSITE_DISPLAY_SOURCES: [&str; 2] =
    ["helpers/ui/OLEDDisplay.cpp", "helpers/ui/OLEDDisplayFonts.cpp"];

/// Source-filter rules present in every resolution, in order
pub const BASELINE_INCLUDES: [&str; 5] = [
    "*.cpp",
    "helpers/*.cpp",
    "helpers/radiolib/*.cpp",
    "helpers/ui/MomentaryButton.cpp",
    "helpers/ui/buzzer.cpp",
];

/// File extensions the build tool compiles
pub const SOURCE_EXTENSIONS: [&str; 6] = ["c", "cc", "cpp", "cxx", "s", "S"];

/// Directories never scanned for sources
pub const SKIPPED_DIRS: [&str; 3] = [".pio", "target", "node_modules"];
