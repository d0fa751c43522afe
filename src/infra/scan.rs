//! Source tree scanning
//!
//! Collects the compilable sources of a firmware tree so rule lists can be
//! evaluated against real files.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::config::defaults::{SKIPPED_DIRS, SOURCE_EXTENSIONS};
use crate::error::FilesystemError;

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|dir| *dir == name)
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// List source files under `root` as sorted, `/` separated relative paths
pub fn source_files(root: &Path) -> Result<Vec<String>, FilesystemError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = entry.map_err(|e| FilesystemError::Scan {
            path: root.to_path_buf(),
            error: e.to_string(),
        })?;

        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(parts.join("/"));
        }
    }

    files.sort();
    tracing::debug!("Found {} source file(s) under '{}'", files.len(), root.display());
    Ok(files)
}
