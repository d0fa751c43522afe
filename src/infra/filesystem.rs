//! Filesystem operations
//!
//! Handles file reads for profiles and rule lists.

use std::path::Path;

use crate::error::FilesystemError;

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Whether `relative` names an existing directory under `root`
pub fn dir_exists(root: &Path, relative: &str) -> bool {
    root.join(relative).is_dir()
}
