//! CLI command implementation for `srcset resolve`

use anyhow::{Context, Result};

use super::{DefinitionArgs, ResolveFormat};
use crate::cli::output::{print_json, OutputConfig};
use crate::core::resolver::{resolve_tokens, Resolution};

/// Execute the resolve command
pub fn execute(input: &DefinitionArgs, format: ResolveFormat, absolute: bool) -> Result<()> {
    let gathered = input.gather()?;

    let mut layout = gathered.layout;
    if absolute {
        let root = gathered.root.canonicalize().with_context(|| {
            format!("Failed to resolve project root {}", gathered.root.display())
        })?;
        layout = layout.with_root(root);
    }

    tracing::debug!("Resolving {} definition(s)", gathered.tokens.len());
    let resolution = resolve_tokens(&layout, &gathered.tokens)
        .map_err(|halted| halted.error)
        .context("Source set resolution failed")?;

    if !resolution.ignored.is_empty() {
        tracing::info!("Ignored definitions: {}", resolution.ignored.join(", "));
    }

    if OutputConfig::current().json {
        return print_json(&resolution);
    }

    match format {
        ResolveFormat::Text => print!("{}", render_text(&resolution)),
        ResolveFormat::Filter => println!("{}", resolution.filter_string()),
    }
    Ok(())
}

/// Render a resolution as `[section]` blocks with one entry per line
fn render_text(resolution: &Resolution) -> String {
    let mut out = String::from("[src_filter]\n");
    for rule in &resolution.rules {
        out.push_str(&format!("{rule}\n"));
    }

    out.push_str("\n[include_paths]\n");
    for path in &resolution.include_paths {
        out.push_str(&format!("{path}\n"));
    }

    out.push_str("\n[build_flags]\n");
    for flag in &resolution.flags {
        out.push_str(&format!("{flag}\n"));
    }

    out
}
