use anyhow::Result;
use colored::Colorize;

use crate::cli::CheckArgs;
use crate::config;
use crate::output::{print_success, print_summary};

pub fn run(args: &CheckArgs) -> Result<()> {
    let config = config::load(args.config.as_deref())?;
    let (schema, resolvers) = super::build_schema(&args.manifest, config)?;

    println!("{}: {}", "Manifest".cyan(), args.manifest.display());
    println!("{}: {}", "Resolvers".cyan(), resolvers.len());
    print_summary(&schema);
    print_success(&format!(
        "Schema is valid: {} definitions, {} fields",
        schema.definitions.len(),
        schema.bindings.len()
    ));
    Ok(())
}
