pub mod check;
pub mod sdl;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use typegraph_schema::{GeneratedSchema, ResolverDescriptor, SchemaBuilder, SchemaConfig, SchemaManifest};

/// Reads a manifest, choosing the decoder by file extension.
pub fn load_manifest(path: &Path) -> Result<SchemaManifest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => SchemaManifest::from_json_str(&content),
        Some("toml") => SchemaManifest::from_toml_str(&content),
        _ => bail!(
            "Unsupported manifest format: {}. Use a .json or .toml file",
            path.display()
        ),
    }
    .with_context(|| format!("Failed to load manifest {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        types = manifest.types.len(),
        resolvers = manifest.resolvers.len(),
        "Loaded manifest"
    );
    Ok(manifest)
}

/// Builds the schema for a manifest file.
pub fn build_schema(manifest: &Path, config: SchemaConfig) -> Result<(GeneratedSchema, Vec<ResolverDescriptor>)> {
    let (catalog, resolvers) = load_manifest(manifest)?.into_parts();
    let schema = SchemaBuilder::new(Arc::new(catalog), config)
        .build(&resolvers)
        .context("Schema generation failed")?;
    Ok((schema, resolvers))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;

    pub const MANIFEST: &str = r#"{
  "types": [
    {
      "key": "shop::Product",
      "methods": [
        { "name": "getTitle", "returns": { "type": "boxed", "kind": "string" } },
        { "name": "getPrice", "returns": { "type": "primitive", "kind": "double" } }
      ]
    }
  ],
  "resolvers": [
    {
      "name": "ProductQuery",
      "role": "query",
      "methods": [
        { "name": "products", "returns": { "type": "generic", "shape": "list", "args": [{ "type": "named", "key": "shop::Product" }] } }
      ]
    }
  ]
}"#;

    pub fn manifest_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{MANIFEST, manifest_file};
    use super::*;

    #[test]
    fn test_load_json_manifest() {
        let file = manifest_file(".json", MANIFEST);
        let manifest = load_manifest(file.path()).unwrap();
        assert_eq!(manifest.types.len(), 1);
        assert_eq!(manifest.resolvers[0].name, "ProductQuery");
    }

    #[test]
    fn test_unknown_extension_fails() {
        let file = manifest_file(".yaml", MANIFEST);
        let err = load_manifest(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported manifest format"));
    }

    #[test]
    fn test_malformed_manifest_fails() {
        let file = manifest_file(".toml", "types = 1");
        assert!(load_manifest(file.path()).is_err());
    }

    #[test]
    fn test_build_schema() {
        let file = manifest_file(".json", MANIFEST);
        let (schema, resolvers) = build_schema(file.path(), SchemaConfig::default()).unwrap();
        assert_eq!(resolvers.len(), 1);
        assert!(schema.sdl().contains("price: Float!"));
    }
}
