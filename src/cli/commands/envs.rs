//! CLI command implementation for `srcset envs`

use std::collections::BTreeMap;

use anyhow::Result;

use super::ProjectArgs;
use crate::cli::output::{print_json, OutputConfig};

/// Execute the envs command
pub fn execute(project: &ProjectArgs) -> Result<()> {
    let root = project.project_root()?;
    let profile = project.load_profile(&root)?;

    let mut listing: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for name in profile.env_names() {
        let tokens = profile.tokens(name)?;
        listing.insert(name, tokens.iter().map(ToString::to_string).collect());
    }

    if OutputConfig::current().json {
        return print_json(&listing);
    }

    if listing.is_empty() {
        println!("(no environments)");
        return Ok(());
    }
    for (name, tokens) in &listing {
        println!("{name}: {}", tokens.join(" "));
    }
    Ok(())
}
