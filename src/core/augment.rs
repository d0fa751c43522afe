//! Include path and flag augmentation
//!
//! Platform and variant definitions make their headers visible to every
//! translation unit: each adds an include-search-path and the matching
//! `-I <path>` compiler flag.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::defaults::DEFAULT_SRC_DIR;
use crate::core::definition::Definition;
use crate::core::rules;

/// Where the firmware tree lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    /// Project root include paths are anchored at (relative paths when unset)
    pub root: Option<PathBuf>,
    /// Source directory, relative to the project root
    pub src_dir: String,
}

impl SourceLayout {
    /// Layout rooted at `root`
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Override the source directory
    ///
    /// An empty directory (or `/`) means the project root itself.
    #[must_use]
    pub fn with_src_dir(mut self, src_dir: &str) -> Self {
        let trimmed = src_dir.trim_end_matches('/');
        self.src_dir = if trimmed.is_empty() {
            ".".to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    /// Project-relative form of a path given relative to the source dir
    ///
    /// Source filter patterns, include paths and checked directories all go
    /// through here, so `../variants/x` lands beside the source dir however
    /// deeply it is nested.
    pub fn project_path(&self, relative: &str) -> String {
        normalize(&format!("{}/{}", self.src_dir, relative))
    }

    fn anchored(&self, relative: &str) -> String {
        match &self.root {
            Some(root) => root.join(relative).display().to_string(),
            None => relative.to_string(),
        }
    }
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            root: None,
            src_dir: DEFAULT_SRC_DIR.to_string(),
        }
    }
}

/// Lexically normalize a slash separated path
///
/// Resolves `.` and `..` segments without touching the filesystem. `..`
/// segments that climb above the start are kept. The result is always
/// relative.
pub(crate) fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Insertion-ordered set of strings
///
/// Iteration follows first insertion; re-inserting a value is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning whether it was new
    pub fn insert(&mut self, value: String) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }
}

impl Serialize for OrderedSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Include path relative to the project root contributed by a definition
///
/// Only platform and variant definitions contribute one.
pub fn include_dir(layout: &SourceLayout, definition: &Definition) -> Option<String> {
    match definition {
        Definition::Platform(p) => {
            Some(layout.project_path(&format!("helpers/{}", p.helper_dir())))
        }
        Definition::Variant(name) => Some(layout.project_path(&rules::variant(name).pattern)),
        _ => None,
    }
}

/// Add the include path and `-I` flag for a definition
///
/// Returns whether anything new was added.
pub fn augment(
    layout: &SourceLayout,
    include_paths: &mut OrderedSet,
    flags: &mut OrderedSet,
    definition: &Definition,
) -> bool {
    let Some(dir) = include_dir(layout, definition) else {
        return false;
    };

    let added_path = include_paths.insert(layout.anchored(&dir));
    let added_flag = flags.insert(format!("-I {dir}"));
    if !(added_path || added_flag) {
        tracing::debug!("Include path '{}' already present", dir);
    }
    added_path || added_flag
}
