//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary firmware tree and provides utilities for setting up
/// test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a project holding a small mesh firmware tree
    #[allow(dead_code)]
    pub fn with_firmware_tree() -> Self {
        let project = Self::new();
        for file in FIRMWARE_TREE {
            project.create_file(file, "");
        }
        project
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    #[allow(dead_code)]
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    #[allow(dead_code)]
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Run srcset in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_srcset"));
        cmd.current_dir(self.path());
        cmd.env_remove("SRCSET_CONFIG");
        cmd.env_remove("RUST_LOG");
        for arg in args {
            cmd.arg(arg);
        }
        cmd.output().expect("Failed to execute srcset")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stdout of a command as a string
#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a command as a string
#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Files of a small firmware tree
#[allow(dead_code)]
pub const FIRMWARE_TREE: &[&str] = &[
    "src/Mesh.cpp",
    "src/Mesh.h",
    "src/Dispatcher.cpp",
    "src/helpers/ClientACL.cpp",
    "src/helpers/radiolib/RadioLibWrappers.cpp",
    "src/helpers/esp32/ESPNOWRadio.cpp",
    "src/helpers/nrf52/T114Board.cpp",
    "src/helpers/ui/buzzer.cpp",
    "src/helpers/ui/MomentaryButton.cpp",
    "src/helpers/ui/SSD1306Display.cpp",
    "src/helpers/ui/ST7789Display.cpp",
    "src/helpers/ui/OLEDDisplay.cpp",
    "src/helpers/ui/OLEDDisplayFonts.cpp",
    "src/helpers/ui/E213Display.cpp",
    "variants/heltec_v4/target.cpp",
    "variants/xiao_c6/target.cpp",
    "examples/companion_radio/main.cpp",
    "examples/companion_radio/UITask.cpp",
    "examples/companion_radio/ui-new/UITask.cpp",
    "examples/companion_radio/ui-orig/UITask.cpp",
    "examples/simple_repeater/main.cpp",
];

/// Sample profile for testing
#[allow(dead_code)]
pub const SAMPLE_PROFILE: &str = r#"
[settings]
src_dir = "src"

[env.heltec_v4_companion]
defines = ["ESP32", "MC_VARIANT=heltec_v4", "BUILD_EXAMPLE=companion_radio"]
build_flags = "-Os -D DISPLAY_CLASS=SSD1306Display"

[env.heltec_v4_companion_newui]
extends = "heltec_v4_companion"
defines = ["MC_UI_FLAVOR=ui-new", "EXCLUDE_FROM_EXAMPLE=UITask.cpp"]
"#;
