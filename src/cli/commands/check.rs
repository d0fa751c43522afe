//! Check command implementation
//!
//! Implements `srcset check` to resolve every environment of the profile
//! without building anything.

use anyhow::{bail, Result};

use super::ProjectArgs;
use crate::cli::output::{print_json, status, OutputConfig};
use crate::core::check;

/// Execute the check command
pub fn execute(project: &ProjectArgs, strict: bool) -> Result<()> {
    let root = project.project_root()?;
    let profile = project.load_profile(&root)?;

    tracing::info!("Checking {} environment(s)", profile.env.len());
    let result = check::check(&root, &profile, strict);

    if OutputConfig::current().json {
        print_json(&result)?;
    } else {
        for env in &result.envs {
            let prefix = if env.is_valid(result.strict) {
                status::SUCCESS
            } else {
                status::ERROR
            };
            println!("{prefix} {} ({} rules)", env.name, env.rule_count);

            if let Some(error) = &env.error {
                println!("    {error}");
            }
            for dir in &env.missing_dirs {
                println!("    missing directory: {dir}");
            }
            if !env.ignored.is_empty() {
                let prefix = if result.strict { status::ERROR } else { status::WARNING };
                println!("    {prefix} ignored: {}", env.ignored.join(", "));
            }
        }
    }

    let failures = result.failures();
    if !failures.is_empty() {
        bail!(
            "{} of {} environment(s) failed the check",
            failures.len(),
            result.envs.len()
        );
    }
    Ok(())
}
