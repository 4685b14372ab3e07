//! Schemas built from on-disk manifests, eagerly and lazily.

use std::sync::Arc;

use typegraph_schema::{LazySchema, SchemaBuilder, SchemaConfig, SchemaManifest};
use typegraph_schema::schema::SchemaState;

const GARAGE: &str = r#"
[[types]]
key = "garage::Car"
tags = [{ tag = "description", text = "A parked car." }]
fields = [{ name = "plate", ty = { type = "boxed", kind = "string" }, tags = [{ tag = "not_null" }] }]
methods = [
    { name = "getPlate", returns = { type = "boxed", kind = "string" } },
    { name = "getColor", returns = { type = "named", key = "garage::Color" } },
    { name = "getSpecs", returns = { type = "generic", shape = "map", args = [
        { type = "boxed", kind = "string" },
        { type = "boxed", kind = "string" },
    ] } },
]

[[types]]
key = "garage::Color"
form = { kind = "enum", members = ["RED", "BLACK"] }

[[types]]
key = "garage::CarFilter"
methods = [
    { name = "setColor", params = [{ name = "color", ty = { type = "named", key = "garage::Color" } }] },
]

[[resolvers]]
name = "GarageQuery"
role = "query"
methods = [
    { name = "cars", params = [
        { name = "filter", ty = { type = "named", key = "garage::CarFilter" } },
        { name = "limit", ty = { type = "primitive", kind = "int" }, tags = [{ tag = "default", value = "20" }] },
    ], returns = { type = "generic", shape = "list", args = [{ type = "named", key = "garage::Car" }] } },
]
"#;

fn builder() -> (SchemaBuilder, Vec<typegraph_schema::ResolverDescriptor>) {
    let manifest = SchemaManifest::from_toml_str(GARAGE).unwrap();
    let (catalog, resolvers) = manifest.into_parts();
    (SchemaBuilder::new(Arc::new(catalog), SchemaConfig::default()), resolvers)
}

#[test]
fn test_toml_manifest_builds() {
    let (builder, resolvers) = builder();
    let schema = builder.build(&resolvers).unwrap();
    let sdl = schema.sdl();

    assert!(sdl.contains("cars(filter: CarFilter, limit: Int! = 20): [Car]"), "{sdl}");
    assert!(sdl.contains("    plate: String!\n"), "{sdl}");
    assert!(sdl.contains("    color: Color\n"), "{sdl}");
    assert!(sdl.contains("    specs: JSON\n"), "{sdl}");
    assert!(sdl.contains("enum Color {\n    RED\n    BLACK\n}\n"), "{sdl}");
    assert!(sdl.contains("input CarFilter {\n    color: Color\n}\n"), "{sdl}");
    assert!(async_graphql_parser::parse_schema(&sdl).is_ok(), "{sdl}");
}

#[test]
fn test_json_manifest_matches_toml() {
    let toml_manifest = SchemaManifest::from_toml_str(GARAGE).unwrap();
    let json = serde_json::to_string(&toml_manifest).unwrap();
    let json_manifest = SchemaManifest::from_json_str(&json).unwrap();

    let config = SchemaConfig::default();
    let build = |manifest: SchemaManifest| {
        let (catalog, resolvers) = manifest.into_parts();
        SchemaBuilder::new(Arc::new(catalog), config.clone())
            .build(&resolvers)
            .unwrap()
            .sdl()
    };
    assert_eq!(build(toml_manifest), build(json_manifest));
}

#[test]
fn test_lazy_schema_from_manifest() {
    let (builder, resolvers) = builder();
    let lazy = LazySchema::new(builder, resolvers);

    tokio_test::block_on(async {
        assert_eq!(lazy.state().await, SchemaState::Uninitialized);
        let schema = lazy.get_or_build_wait().await.unwrap();
        assert_eq!(lazy.state().await, SchemaState::Ready);
        assert!(schema.implementations.is_empty());
        assert_eq!(schema.binding("Query", "cars").unwrap().method, "cars");
    });
}
