//! CLI command implementation for `srcset select`

use anyhow::{Context, Result};
use serde::Serialize;

use super::DefinitionArgs;
use crate::cli::output::{print_json, print_status, status, OutputConfig};
use crate::core::filter::SourceFilter;
use crate::core::resolver::resolve_tokens;
use crate::core::rules::parse_rules;
use crate::infra::scan;

/// One source file and the rule deciding it
#[derive(Debug, Serialize)]
struct Decision<'a> {
    path: &'a str,
    selected: bool,
    rule: Option<String>,
}

/// Execute the select command
pub fn execute(input: &DefinitionArgs, explain: bool, rules: Option<&str>) -> Result<()> {
    let gathered = input.gather()?;

    let rules = match rules {
        Some(text) => parse_rules(text).context("Failed to parse source filter")?,
        None => {
            resolve_tokens(&gathered.layout, &gathered.tokens)
                .map_err(|halted| halted.error)
                .context("Source set resolution failed")?
                .rules
        }
    };
    let filter = SourceFilter::new(&gathered.layout, &rules)?;

    let files = scan::source_files(&gathered.root)?;
    let json = OutputConfig::current().json;

    if explain {
        let decisions: Vec<Decision> = files
            .iter()
            .map(|path| {
                let rule = filter.deciding_rule(path);
                Decision {
                    path,
                    selected: rule.is_some_and(|r| r.is_include()),
                    rule: rule.map(ToString::to_string),
                }
            })
            .collect();

        if json {
            return print_json(&decisions);
        }
        for d in &decisions {
            let mark = if d.selected { '+' } else { '-' };
            match &d.rule {
                Some(rule) => println!("{mark} {}  {rule}", d.path),
                None => println!("{mark} {}", d.path),
            }
        }
        return Ok(());
    }

    let selected = filter.select(files.iter().map(String::as_str));
    if json {
        return print_json(&selected);
    }
    for path in &selected {
        println!("{path}");
    }
    print_status(
        status::INFO,
        &format!("{} of {} source file(s) selected", selected.len(), files.len()),
    );
    Ok(())
}
