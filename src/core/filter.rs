//! Source filter evaluation
//!
//! Applies a rule list to project-relative file paths the way the build tool
//! does: patterns are anchored at the source directory, a pattern matching a
//! directory covers everything below it, and the last matching rule decides.
//! Paths no rule matches are not built.

use regex::Regex;

use crate::core::augment::{normalize, SourceLayout};
use crate::core::rules::{Rule, RuleKind};
use crate::error::FilterError;

/// A rule compiled into a path matcher
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: Rule,
    matcher: Regex,
}

/// Compiled rule list
#[derive(Debug, Clone)]
pub struct SourceFilter {
    rules: Vec<CompiledRule>,
}

impl SourceFilter {
    /// Compile rules whose patterns are relative to the layout's source dir
    pub fn new(layout: &SourceLayout, rules: &[Rule]) -> Result<Self, FilterError> {
        let rules = rules
            .iter()
            .map(|rule| {
                let anchored = layout.project_path(&rule.pattern);
                let source = format!("^{}(?:/.*)?$", glob_to_regex(&anchored));
                let matcher = Regex::new(&source).map_err(|e| FilterError::InvalidPattern {
                    pattern: rule.pattern.clone(),
                    error: e.to_string(),
                })?;
                Ok(CompiledRule {
                    rule: rule.clone(),
                    matcher,
                })
            })
            .collect::<Result<Vec<_>, FilterError>>()?;

        Ok(Self { rules })
    }

    /// The rule deciding a path, if any matches
    pub fn deciding_rule(&self, path: &str) -> Option<&Rule> {
        let path = normalize(path);
        self.rules
            .iter()
            .rev()
            .find(|compiled| compiled.matcher.is_match(&path))
            .map(|compiled| &compiled.rule)
    }

    /// Whether a project-relative path is built
    pub fn is_selected(&self, path: &str) -> bool {
        self.deciding_rule(path)
            .is_some_and(|rule| rule.kind == RuleKind::Include)
    }

    /// Keep the selected paths, preserving their order
    pub fn select<'a, I>(&self, paths: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        paths.into_iter().filter(|p| self.is_selected(p)).collect()
    }
}

/// Translate a glob into a regex fragment
///
/// `**` crosses directories, `*` and `?` stay within one path segment.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2);
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }

    out
}
