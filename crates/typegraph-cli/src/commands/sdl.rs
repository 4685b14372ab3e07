use std::fs;

use anyhow::{Context, Result};

use crate::cli::SdlArgs;
use crate::config;
use crate::output::print_success;

pub fn run(args: &SdlArgs) -> Result<()> {
    let config = config::load(args.config.as_deref())?;
    let (schema, _) = super::build_schema(&args.manifest, config)?;
    let sdl = schema.sdl();

    match &args.output {
        Some(path) => {
            fs::write(path, &sdl)
                .with_context(|| format!("Failed to write SDL to {}", path.display()))?;
            print_success(&format!(
                "Wrote {} definitions to {}",
                schema.definitions.len(),
                path.display()
            ));
        }
        None => print!("{sdl}"),
    }

    if let Some(path) = &args.bindings {
        let json = serde_json::to_string_pretty(&schema.bindings)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write bindings to {}", path.display()))?;
        print_success(&format!(
            "Wrote {} field bindings to {}",
            schema.bindings.len(),
            path.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{MANIFEST, manifest_file};

    #[test]
    fn test_writes_sdl_file() {
        let manifest = manifest_file(".json", MANIFEST);
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("schema.graphql");
        let args = SdlArgs {
            manifest: manifest.path().to_path_buf(),
            config: None,
            output: Some(output.clone()),
            bindings: Some(dir.path().join("bindings.json")),
        };
        run(&args).unwrap();

        let sdl = fs::read_to_string(output).unwrap();
        assert!(sdl.contains("type Query {\n    products: [Product]\n}\n"));
        assert!(sdl.contains("type Product {\n    title: String\n    price: Float!\n}\n"));

        let bindings: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("bindings.json")).unwrap())
                .unwrap();
        assert_eq!(bindings[0]["parent_type"], "Query");
        assert_eq!(bindings[0]["method"], "products");
        assert_eq!(bindings[0]["shape"], "list");
    }
}
